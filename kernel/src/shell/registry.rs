//! Command registry
//!
//! An immutable, ordered table of verb names. Aliases are separate entries that
//! map to the same [`Command`] and are flagged so HELP lists each command once.

/// Built-in command handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Directory,
    Type,
    Copy,
    Delete,
    Rename,
    Set,
    Show,
    Run,
    Logout,
    Exit,
    Robco,
}

/// Whether an entry is the canonical name of its command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Primary,
    Alias,
}

/// One verb in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub name: &'static str,
    pub command: Command,
    pub description: &'static str,
    pub kind: EntryKind,
}

impl CommandEntry {
    const fn primary(name: &'static str, command: Command, description: &'static str) -> Self {
        Self {
            name,
            command,
            description,
            kind: EntryKind::Primary,
        }
    }

    const fn alias(name: &'static str, command: Command, description: &'static str) -> Self {
        Self {
            name,
            command,
            description,
            kind: EntryKind::Alias,
        }
    }

    pub fn is_alias(&self) -> bool {
        self.kind == EntryKind::Alias
    }
}

const BUILTIN: [CommandEntry; 15] = [
    CommandEntry::primary("HELP", Command::Help, "Display command help"),
    CommandEntry::alias("?", Command::Help, "Display command help"),
    CommandEntry::primary("DIRECTORY", Command::Directory, "List files and directories"),
    CommandEntry::alias("DIR", Command::Directory, "List files and directories"),
    CommandEntry::primary("TYPE", Command::Type, "Display file contents"),
    CommandEntry::primary("COPY", Command::Copy, "Copy files"),
    CommandEntry::primary("DELETE", Command::Delete, "Remove files"),
    CommandEntry::alias("DEL", Command::Delete, "Remove files"),
    CommandEntry::primary("RENAME", Command::Rename, "Rename files"),
    CommandEntry::primary("SET", Command::Set, "Configure system settings"),
    CommandEntry::primary("SHOW", Command::Show, "Display system information"),
    CommandEntry::primary("RUN", Command::Run, "Execute a program"),
    CommandEntry::primary("LOGOUT", Command::Logout, "End current session"),
    CommandEntry::primary("EXIT", Command::Exit, "Exit system"),
    CommandEntry::primary("ROBCO", Command::Robco, "RobCo system information"),
];

/// Ordered verb table
#[derive(Clone, Copy)]
pub struct CommandRegistry {
    entries: &'static [CommandEntry],
}

impl CommandRegistry {
    pub const fn builtin() -> Self {
        Self { entries: &BUILTIN }
    }

    /// First entry whose name matches `verb`, ignoring ASCII case
    pub fn lookup(&self, verb: &str) -> Option<&'static CommandEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(verb))
    }

    pub fn entries(&self) -> &'static [CommandEntry] {
        self.entries
    }

    /// Entries shown by HELP, in registry order
    pub fn primaries(&self) -> impl Iterator<Item = &'static CommandEntry> {
        self.entries.iter().filter(|entry| !entry.is_alias())
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_resolves_to_same_command() {
        let registry = CommandRegistry::builtin();
        let del = registry.lookup("DEL").unwrap();
        let delete = registry.lookup("DELETE").unwrap();

        assert_eq!(del.command, delete.command);
        assert!(del.is_alias());
        assert!(!delete.is_alias());

        assert_eq!(registry.lookup("?").unwrap().command, Command::Help);
        assert_eq!(registry.lookup("DIR").unwrap().command, Command::Directory);
    }

    #[test]
    fn test_unknown_verb() {
        let registry = CommandRegistry::builtin();
        assert!(registry.lookup("FOOBAR").is_none());
        assert!(registry.lookup("").is_none());
        assert!(registry.lookup("HEL").is_none());
    }

    #[test]
    fn test_lookup_ignores_case() {
        let registry = CommandRegistry::builtin();
        assert_eq!(registry.lookup("robco").unwrap().command, Command::Robco);
    }

    #[test]
    fn test_primaries_skip_aliases_in_order() {
        let registry = CommandRegistry::builtin();
        let mut names = registry.primaries().map(|entry| entry.name);

        assert_eq!(names.next(), Some("HELP"));
        assert_eq!(names.next(), Some("DIRECTORY"));
        assert_eq!(names.next(), Some("TYPE"));
        assert_eq!(registry.primaries().count(), 12);
        assert!(registry.primaries().all(|entry| entry.name.len() < 15));
    }

    #[test]
    fn test_every_command_has_a_primary_entry() {
        let registry = CommandRegistry::builtin();
        for entry in registry.entries() {
            assert!(registry
                .primaries()
                .any(|primary| primary.command == entry.command));
        }
    }
}
