//! Command registry for the REPL.

use std::fmt::Write as _;

/// What a command does when dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    Exit,
    Map,
    MapBack,
    Explore,
    Catch,
    Inspect,
    Pokedex,
    Cache,
}

/// A registered command.
#[derive(Clone, Copy, Debug)]
pub struct CommandSpec {
    /// Word typed to invoke it
    pub name: &'static str,
    /// Name plus argument placeholders, shown in help and usage errors
    pub usage: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Handler selector
    pub kind: CommandKind,
    /// Whether it may hit the network (a spinner is shown)
    pub remote: bool,
}

/// Ordered table of commands. Help lists them in registration order.
#[derive(Clone, Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandSpec>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in command.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for spec in [
            CommandSpec {
                name: "help",
                usage: "help",
                description: "Display this help message.",
                kind: CommandKind::Help,
                remote: false,
            },
            CommandSpec {
                name: "map",
                usage: "map",
                description: "Display the next page of location areas.",
                kind: CommandKind::Map,
                remote: true,
            },
            CommandSpec {
                name: "mapb",
                usage: "mapb",
                description: "Display the previous page of location areas.",
                kind: CommandKind::MapBack,
                remote: true,
            },
            CommandSpec {
                name: "explore",
                usage: "explore <location area>",
                description: "List the pokemon found in a location area.",
                kind: CommandKind::Explore,
                remote: true,
            },
            CommandSpec {
                name: "catch",
                usage: "catch <pokemon>",
                description: "Try to catch a pokemon.",
                kind: CommandKind::Catch,
                remote: true,
            },
            CommandSpec {
                name: "inspect",
                usage: "inspect <pokemon>",
                description: "Show details of a caught pokemon.",
                kind: CommandKind::Inspect,
                remote: false,
            },
            CommandSpec {
                name: "pokedex",
                usage: "pokedex",
                description: "List every pokemon you have caught.",
                kind: CommandKind::Pokedex,
                remote: false,
            },
            CommandSpec {
                name: "cache",
                usage: "cache",
                description: "Show response cache statistics.",
                kind: CommandKind::Cache,
                remote: false,
            },
            CommandSpec {
                name: "exit",
                usage: "exit",
                description: "Quit the pokedex.",
                kind: CommandKind::Exit,
                remote: false,
            },
        ] {
            registry.register(spec);
        }
        registry
    }

    /// Adds a command, replacing any command with the same name in place.
    pub fn register(&mut self, spec: CommandSpec) {
        match self.commands.iter_mut().find(|c| c.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.commands.push(spec),
        }
    }

    /// Finds a command by name.
    pub fn lookup(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Iterates over commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.iter()
    }

    /// Renders the help screen.
    pub fn help_text(&self) -> String {
        let width = self.iter().map(|c| c.usage.len()).max().unwrap_or(0);
        let mut text = String::from("Welcome to the Pokedex!\n\nUsage:\n");
        for command in self.iter() {
            let _ = write!(text, "\n  {:width$}  {}", command.usage, command.description);
        }
        text
    }
}
