//! Login session state machine
//!
//! ```text
//! AwaitingUsername --CR/LF--> AwaitingPassword --CR/LF--> Authenticated(user)
//!                                                    \--> Rejected
//! ```
//!
//! The machine runs once per boot. Both terminal states are final: there is no
//! retry and no path back to the username prompt.

use core::fmt;

use super::line::{Key, LineBuffer};
use super::next_key;
use crate::components::console::{FanOut, SerialInput};
use crate::components::timer::Clock;
use crate::config::{LOGIN_FIELD_CAPACITY, PASSWORD_MASK};
use crate::error::{KernelError, Result};

/// Built-in user identities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Admin,
    Guest,
    Maint,
}

impl Identity {
    pub const fn name(self) -> &'static str {
        match self {
            Identity::Admin => "ADMIN",
            Identity::Guest => "GUEST",
            Identity::Maint => "MAINT",
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed username/password pair
pub struct Account {
    pub identity: Identity,
    pub username: &'static str,
    pub password: &'static str,
}

/// Accounts in match order
pub static ACCOUNTS: [Account; 3] = [
    Account {
        identity: Identity::Admin,
        username: "ADMIN",
        password: "ADMIN",
    },
    Account {
        identity: Identity::Guest,
        username: "GUEST",
        password: "GUEST",
    },
    Account {
        identity: Identity::Maint,
        username: "MAINT",
        password: "MAINT",
    },
];

/// Match credentials against [`ACCOUNTS`], ignoring ASCII case
pub fn authenticate(username: &str, password: &str) -> Option<Identity> {
    ACCOUNTS
        .iter()
        .find(|account| {
            account.username.eq_ignore_ascii_case(username)
                && account.password.eq_ignore_ascii_case(password)
        })
        .map(|account| account.identity)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingUsername,
    AwaitingPassword,
    Authenticated(Identity),
    Rejected,
}

impl SessionState {
    pub fn is_final(self) -> bool {
        matches!(self, SessionState::Authenticated(_) | SessionState::Rejected)
    }
}

type Field = LineBuffer<LOGIN_FIELD_CAPACITY>;

/// Credential capture for one login attempt
pub struct Session {
    state: SessionState,
    username: Field,
    password: Field,
}

impl Session {
    pub const fn new() -> Self {
        Self {
            state: SessionState::AwaitingUsername,
            username: Field::new(),
            password: Field::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_user(&self) -> Option<Identity> {
        match self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Show the first prompt
    pub fn begin(&self, out: &FanOut<'_>) {
        if self.state == SessionState::AwaitingUsername {
            out.write_str("Username: ");
        }
    }

    /// Advance the machine by one received byte
    pub fn feed(&mut self, c: u8, out: &FanOut<'_>) -> SessionState {
        match self.state {
            SessionState::AwaitingUsername => match Key::classify(c) {
                Key::Terminator => {
                    out.newline();
                    out.write_str("Password: ");
                    self.state = SessionState::AwaitingPassword;
                }
                Key::Backspace => {
                    if self.username.pop() {
                        out.erase();
                    }
                }
                Key::Printable(c) => {
                    if self.username.push(c) {
                        out.write_byte(c);
                    }
                }
                Key::Ignored => {}
            },
            SessionState::AwaitingPassword => match Key::classify(c) {
                Key::Terminator => {
                    out.newline();
                    self.finish(out);
                }
                Key::Backspace => {
                    if self.password.pop() {
                        out.erase();
                    }
                }
                Key::Printable(c) => {
                    if self.password.push(c) {
                        out.write_byte(PASSWORD_MASK);
                    }
                }
                Key::Ignored => {}
            },
            SessionState::Authenticated(_) | SessionState::Rejected => {}
        }

        self.state
    }

    fn finish(&mut self, out: &FanOut<'_>) {
        let outcome = authenticate(self.username.as_str(), self.password.as_str());
        self.password.clear();

        match outcome {
            Some(user) => {
                log::info!("login: {}", user);
                let _ = write!(out, "\nLogin successful. Welcome, {}!\n", user);
                self.state = SessionState::Authenticated(user);
            }
            None => {
                log::info!("login rejected");
                out.write_str("\nAccess denied. Invalid credentials.\n");
                self.state = SessionState::Rejected;
            }
        }
    }

    /// Prompt and read credentials until the machine reaches a final state
    pub fn run(
        &mut self,
        input: &dyn SerialInput,
        clock: &dyn Clock,
        out: &FanOut<'_>,
    ) -> Result<Identity> {
        self.begin(out);
        loop {
            match self.feed(next_key(input, clock), out) {
                SessionState::Authenticated(user) => return Ok(user),
                SessionState::Rejected => return Err(KernelError::AuthenticationRejected),
                SessionState::AwaitingUsername | SessionState::AwaitingPassword => {}
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
