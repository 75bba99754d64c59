//! Terminal shell
//!
//! After login the shell runs a polled read-eval loop on the serial line:
//! - every received byte is echoed raw to serial, and to the display unless it
//!   is a line terminator;
//! - CR/LF completes the line, which is parsed and dispatched if non-empty,
//!   then the prompt is printed again;
//! - DEL/BS removes the last character and rubs it out on the serial terminal;
//! - printable ASCII is buffered up to the line capacity, the rest is dropped.
//!
//! The shell owns its state ([`Shell`]); everything it talks to arrives in an
//! [`Environment`], so several independent instances can run under test.

pub mod command;
pub mod commands;
pub mod line;
pub mod registry;
pub mod session;

use uos_allocator::LockedBumpAllocator;

use crate::components::console::{FanOut, SerialInput};
use crate::components::timer::Clock;
use crate::config::{INPUT_POLL_INTERVAL_US, LINE_CAPACITY, PROMPT};
use crate::error::{KernelError, Result};

pub use command::CommandLine;
pub use line::{Key, LineBuffer};
pub use registry::{Command, CommandEntry, CommandRegistry, EntryKind};
pub use session::{authenticate, Identity, Session, SessionState};

/// What the read-eval loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The session is over; the caller halts the machine
    Halt,
}

/// Devices and shared state available to commands
pub struct Environment<'a> {
    pub out: FanOut<'a>,
    pub clock: &'a dyn Clock,
    pub heap: &'a LockedBumpAllocator,
}

/// Wait for the next input byte, idling between polls
pub fn next_key(input: &dyn SerialInput, clock: &dyn Clock) -> u8 {
    while !input.has_input() {
        clock.delay_us(INPUT_POLL_INTERVAL_US);
    }
    input.read_byte()
}

/// Authenticated command shell
pub struct Shell {
    line: LineBuffer<LINE_CAPACITY>,
    registry: CommandRegistry,
    user: Identity,
}

impl Shell {
    pub const fn new(user: Identity) -> Self {
        Self {
            line: LineBuffer::new(),
            registry: CommandRegistry::builtin(),
            user,
        }
    }

    pub fn user(&self) -> Identity {
        self.user
    }

    /// Characters typed on the current line
    pub fn pending(&self) -> &str {
        self.line.as_str()
    }

    pub fn prompt(&self, env: &Environment<'_>) {
        env.out.write_str(PROMPT);
    }

    /// Handle one received byte
    pub fn feed(&mut self, c: u8, env: &Environment<'_>) -> Flow {
        let key = Key::classify(c);

        env.out.echo(c);
        if key != Key::Terminator {
            env.out.mirror(c);
        }

        match key {
            Key::Terminator => {
                env.out.newline();
                let line = self.line.take();
                let flow = if line.is_empty() {
                    Flow::Continue
                } else {
                    self.execute(line.as_str(), env)
                };

                if flow == Flow::Continue {
                    self.prompt(env);
                }
                flow
            }
            Key::Backspace => {
                if self.line.pop() {
                    env.out.erase();
                }
                Flow::Continue
            }
            Key::Printable(c) => {
                self.line.push(c);
                Flow::Continue
            }
            Key::Ignored => Flow::Continue,
        }
    }

    /// Parse and run one complete line; unknown verbs are reported and skipped
    pub fn execute(&self, line: &str, env: &Environment<'_>) -> Flow {
        self.dispatch(&CommandLine::parse(line), env)
            .unwrap_or(Flow::Continue)
    }

    pub fn dispatch(&self, cmd: &CommandLine, env: &Environment<'_>) -> Result<Flow> {
        if cmd.is_empty() {
            return Ok(Flow::Continue);
        }

        match self.registry.lookup(cmd.verb()) {
            Some(entry) => Ok(entry.command.run(cmd.args(), self.user, env)),
            None => {
                log::debug!("unknown command {:?}", cmd.verb());
                let _ = write!(env.out, "% Invalid command: {}\n", cmd.verb());
                env.out.write_str("Type HELP for a list of commands.\n");
                Err(KernelError::UnknownCommand)
            }
        }
    }

    /// Read-eval loop; returns once a command ends the session
    pub fn run(&mut self, input: &dyn SerialInput, env: &Environment<'_>) {
        loop {
            if self.feed(next_key(input, env.clock), env) == Flow::Halt {
                log::info!("session for {} ended", self.user);
                return;
            }
        }
    }
}
