use std::collections::HashSet;
use std::io::Write;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::{Flag, FlagBuilder};
use crate::matcher::{FlagConfig, TokenMatcher};
use crate::parser::{
    terminal_width, Command, CommandNode, ConfigError, ConsoleInterface, Handler, UserInterface,
    WriterInterface,
};

/// Declares a command, its flags and its sub-commands.
///
/// ### Example
/// ```
/// # use flagtree_builder as flagtree;
/// use flagtree::{CommandBuilder, Flag};
///
/// let mut verbose = false;
/// let mut command = CommandBuilder::new("program")
///     .about("Does things.")
///     .flag(Flag::bool(&mut verbose, "verbose", false, "Talk more.").short('v'))
///     .handler(|arguments| {
///         println!("{arguments:?}");
///         0
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(command.run(&["-v", "a"]), 0);
/// drop(command);
/// assert!(verbose);
/// ```
pub struct CommandBuilder<'a> {
    name: String,
    about: Option<String>,
    flags: Vec<FlagBuilder<'a>>,
    subcommands: Vec<CommandBuilder<'a>>,
    handler: Option<Handler<'a>>,
    user_interface: Option<Box<dyn UserInterface + 'a>>,
}

impl<'a> CommandBuilder<'a> {
    /// Start a command named `name`.
    /// For the root command, this is the program name shown in help.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            flags: Vec::default(),
            subcommands: Vec::default(),
            handler: None,
            user_interface: None,
        }
    }

    /// Describe the command in help.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about.replace(about.into());
        self
    }

    /// Add a flag.
    pub fn flag(mut self, flag: impl Into<FlagBuilder<'a>>) -> Self {
        self.flags.push(flag.into());
        self
    }

    /// Add several flags.
    pub fn flags<F: Into<FlagBuilder<'a>>>(mut self, flags: impl IntoIterator<Item = F>) -> Self {
        self.flags.extend(flags.into_iter().map(Into::into));
        self
    }

    /// Add a sub-command.
    pub fn subcommand(mut self, subcommand: CommandBuilder<'a>) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    /// Set the function called with the positional arguments when this command is resolved.
    /// Its return value is the exit code.
    pub fn handler(mut self, handler: impl FnMut(&[String]) -> i32 + 'a) -> Self {
        self.handler.replace(Box::new(handler));
        self
    }

    /// Send help to `normal` and failures to `diagnostic`, instead of stdout and stderr.
    /// Help is not wrapped to the terminal width when the output is redirected.
    ///
    /// Only applies to the root command.
    pub fn output(mut self, normal: impl Write + 'a, diagnostic: impl Write + 'a) -> Self {
        self.user_interface
            .replace(Box::new(WriterInterface::new(normal, diagnostic)));
        self
    }

    /// Check the whole tree and produce the runnable [`Command`].
    pub fn build(mut self) -> Result<Command<'a>, ConfigError> {
        let (user_interface, terminal_width): (Box<dyn UserInterface + 'a>, Option<usize>) =
            match self.user_interface.take() {
                Some(user_interface) => (user_interface, None),
                None => (Box::new(ConsoleInterface::default()), terminal_width()),
            };
        let root = self.build_node(&[])?;
        Ok(Command::new(root, user_interface, terminal_width))
    }

    fn build_node(self, inherited: &[FlagConfig]) -> Result<CommandNode<'a>, ConfigError> {
        let CommandBuilder {
            name,
            about,
            flags,
            subcommands,
            handler,
            ..
        } = self;

        if name.trim().is_empty() {
            return Err(ConfigError::UnnamedCommand);
        }

        let flags = flags
            .into_iter()
            .map(FlagBuilder::build)
            .collect::<Result<Vec<Flag<'a>>, ConfigError>>()?;
        let own: Vec<FlagConfig> = flags.iter().map(FlagConfig::from).collect();
        let reachable: Vec<FlagConfig> = inherited.iter().chain(own.iter()).cloned().collect();

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Checking {} reachable flags of '{name}'.", reachable.len());
        }

        TokenMatcher::new(reachable).map_err(|error| ConfigError::from_matcher(&name, error))?;

        let passed: Vec<FlagConfig> = inherited
            .iter()
            .cloned()
            .chain(
                flags
                    .iter()
                    .filter(|flag| flag.is_inherited())
                    .map(FlagConfig::from),
            )
            .collect();
        let mut names = HashSet::new();
        let mut children = Vec::default();

        for subcommand in subcommands {
            if !names.insert(subcommand.name.clone()) {
                return Err(ConfigError::DuplicateCommand {
                    parent: name,
                    command: subcommand.name,
                });
            }

            children.push(subcommand.build_node(&passed)?);
        }

        Ok(CommandNode::new(name, about, flags, children, handler))
    }
}

/// Anything which produces a built [`Command`].
pub trait Commander<'a> {
    /// Produce the command, or report why its declaration is invalid.
    fn command(self) -> Result<Command<'a>, ConfigError>;
}

impl<'a> Commander<'a> for CommandBuilder<'a> {
    fn command(self) -> Result<Command<'a>, ConfigError> {
        self.build()
    }
}

impl<'a> Commander<'a> for Command<'a> {
    fn command(self) -> Result<Command<'a>, ConfigError> {
        Ok(self)
    }
}

/// Build `command` and run it against `tokens`, returning the exit code.
///
/// A declaration error is printed to stderr and yields the exit code `1`.
///
/// ### Example
/// ```
/// # use flagtree_builder as flagtree;
/// use flagtree::{run, CommandBuilder};
///
/// let code = run(CommandBuilder::new("program").handler(|_| 3), &["a"]);
/// assert_eq!(code, 3);
/// ```
pub fn run<'a>(command: impl Commander<'a>, tokens: &[&str]) -> i32 {
    match command.command() {
        Ok(mut command) => command.run(tokens),
        Err(error) => {
            eprintln!("{error}");
            1
        }
    }
}

/// Build `command` and run it against the process arguments, returning the exit code.
///
/// ```no_run
/// # use flagtree_builder as flagtree;
/// use flagtree::{run_env, CommandBuilder};
///
/// let command = CommandBuilder::new("program").handler(|_| 0);
/// std::process::exit(run_env(command));
/// ```
pub fn run_env<'a>(command: impl Commander<'a>) -> i32 {
    match command.command() {
        Ok(mut command) => command.run_env(),
        Err(error) => {
            eprintln!("{error}");
            1
        }
    }
}
