//! Built-in command bodies
//!
//! Most commands are placeholders on this system (there is no filesystem and no
//! program loader); they print fixed text. SHOW reports live uptime and heap
//! figures, LOGOUT/EXIT end the session.

use super::registry::{Command, CommandRegistry};
use super::session::{Identity, ACCOUNTS};
use super::{Environment, Flow};
use crate::config::{
    BUILD_DATE, COPYRIGHT, HELP_COLUMN_WIDTH, KERNEL_VERSION, TARGET_PLATFORM, VERSION,
};

const RULE: &str =
    "================================================================================";

impl Command {
    /// Run the command with its (upper-cased, unparsed) arguments
    pub fn run(self, args: &str, user: Identity, env: &Environment<'_>) -> Flow {
        let out = &env.out;
        match self {
            Command::Help => help(env),
            Command::Directory => {
                out.write_str("\nDirectory of /SYSTEM\n\n");
                out.write_str("CONFIG.SYS;1        1024  2077-10-23 09:15\n");
                out.write_str("USERS.DB;1          2048  2077-10-23 09:15\n");
                out.write_str("TERMINAL.CONF;1      512  2077-10-23 09:15\n");
                out.write_str("NETWORK.CONF;1       512  2077-10-23 09:15\n");
                out.write_str("\nTotal of 4 files, 4096 blocks\n\n");
            }
            Command::Type => out.write_str("\n% File not found or access denied\n\n"),
            Command::Copy => not_implemented(env, "COPY"),
            Command::Delete => not_implemented(env, "DELETE"),
            Command::Rename => not_implemented(env, "RENAME"),
            Command::Run => not_implemented(env, "RUN"),
            Command::Set => set(args, env),
            Command::Show => show(args, user, env),
            Command::Logout | Command::Exit => return logout(env),
            Command::Robco => robco(env),
        }
        Flow::Continue
    }
}

fn not_implemented(env: &Environment<'_>, name: &str) {
    let _ = write!(env.out, "\n% {} command not yet implemented\n\n", name);
}

fn help(env: &Environment<'_>) {
    let out = &env.out;
    out.write_str("\nUOS Command Reference:\n");
    out.write_str("======================\n\n");

    for entry in CommandRegistry::builtin().primaries() {
        out.write_str("  ");
        out.write_str(entry.name);
        out.pad(HELP_COLUMN_WIDTH.saturating_sub(entry.name.len()));
        out.write_line(entry.description);
    }
    out.newline();
}

fn set(args: &str, env: &Environment<'_>) {
    let out = &env.out;
    if !args.starts_with("HALT") {
        out.write_str("\n% SET command not fully implemented\n\n");
        return;
    }

    // Maintenance-mode easter egg: fixed text, nothing is actually dumped
    out.write_str("\n% WARNING: Maintenance mode initiated\n");
    out.write_str("% System will reboot and dump credentials to memory\n");
    out.write_str("% Memory address: 0x000FFF00\n\n");
    out.write_str("% Dumping credentials:\n");
    for account in ACCOUNTS.iter() {
        let _ = write!(out, "  {}:{}\n", account.username, account.password);
    }
    out.newline();
}

fn show(args: &str, user: Identity, env: &Environment<'_>) {
    let out = &env.out;
    match args.split(' ').next().unwrap_or("") {
        "USER" => {
            let _ = write!(out, "\nCurrent user:    {}\n\n", user);
        }
        "MEMORY" => {
            let stats = env.heap.stats();
            out.write_str("\nMemory Status:\n");
            out.write_str("==============\n");
            let _ = write!(out, "Total:           {} bytes\n", stats.total);
            let _ = write!(out, "Used:            {} bytes\n", stats.used);
            let _ = write!(out, "Free:            {} bytes\n\n", stats.free);
        }
        _ => {
            out.write_str("\nSystem Status:\n");
            out.write_str("==============\n");
            let _ = write!(out, "UOS Version:     {}\n", VERSION);
            let _ = write!(out, "Kernel:          {}\n", KERNEL_VERSION);
            let _ = write!(out, "Uptime:          {} seconds\n", env.clock.uptime_secs());
            let _ = write!(out, "Memory:          {} bytes free\n", env.heap.stats().free);
            let _ = write!(out, "User:            {}\n", user);
            out.write_str("Terminal:        Active\n\n");
        }
    }
}

fn logout(env: &Environment<'_>) -> Flow {
    let out = &env.out;
    out.write_str("\nLogging out...\n");
    out.write_str("Session terminated.\n\n");
    out.write_str("System halted. Please reset.\n");
    Flow::Halt
}

fn robco(env: &Environment<'_>) {
    let out = &env.out;
    out.newline();
    out.write_line(RULE);
    out.write_str("                         ROBCO INDUSTRIES (TM)\n");
    let _ = write!(out, "                  UNIFIED OPERATING SYSTEM {}\n", VERSION);
    out.write_line(RULE);
    out.newline();
    let _ = write!(out, "  Kernel Version:    {}\n", KERNEL_VERSION);
    let _ = write!(out, "  Copyright:         {}\n", COPYRIGHT);
    let _ = write!(out, "  Build Date:        {}\n", BUILD_DATE);
    let _ = write!(out, "  Target Platform:   {}\n", TARGET_PLATFORM);
    out.newline();
    out.write_str("  \"The Future of Computing, Yesterday!\"\n");
    out.newline();
    out.write_line(RULE);
    out.newline();
}
