use thiserror::Error;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::{Flag, InvalidValue};
use crate::matcher::*;
use crate::model::FlagName;

/// A mistake in the declaration of a command tree.
/// These are programming errors, reported before any token is parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A flag has neither a long nor a short name.
    #[error("Config error: a flag needs a name or a short name.")]
    UnnamedFlag,

    /// A flag named by a single character was given a different short name, which would drop the original.
    #[error("Config error: the short flag '-{short}' cannot be renamed to '-{replacement}'.")]
    ReplacedShort {
        /// The short name implied by the declared name.
        short: char,
        /// The short name given afterwards.
        replacement: char,
    },

    /// A long name starts with `-`, or contains `=` or whitespace.
    #[error("Config error: invalid flag name '{0}'.")]
    InvalidName(String),

    /// A short name is `-`, `=` or whitespace.
    #[error("Config error: invalid short flag name '{0}'.")]
    InvalidShort(char),

    /// A bounded cardinality whose minimum exceeds its maximum.
    #[error("Config error: {flag} cannot require {min} occurrences while allowing at most {max}.")]
    InvalidNargs {
        /// The flag.
        flag: FlagName,
        /// The declared minimum.
        min: u32,
        /// The declared maximum.
        max: u32,
    },

    /// A choices restriction which admits nothing.
    #[error("Config error: {0} declares an empty set of choices.")]
    EmptyChoices(FlagName),

    /// A flag uses the reserved `help` or `h` identifier.
    #[error("Config error: command '{command}' cannot declare the reserved flag '{flag}'.")]
    ReservedFlag {
        /// The declaring command.
        command: String,
        /// The identifier.
        flag: String,
    },

    /// Two flags reachable from one command share an identifier.
    #[error("Config error: command '{command}' cannot duplicate the flag '{flag}'.")]
    DuplicateFlag {
        /// The command where the collision is visible.
        command: String,
        /// The identifier.
        flag: String,
    },

    /// A command with an empty name.
    #[error("Config error: a command needs a name.")]
    UnnamedCommand,

    /// Two sibling commands share a name.
    #[error("Config error: command '{parent}' cannot duplicate the sub-command '{command}'.")]
    DuplicateCommand {
        /// The parent command.
        parent: String,
        /// The repeated name.
        command: String,
    },
}

impl ConfigError {
    pub(crate) fn from_matcher(command: &str, error: TokenMatcherError) -> Self {
        match error {
            TokenMatcherError::DuplicateFlag(flag) => ConfigError::DuplicateFlag {
                command: command.to_string(),
                flag,
            },
            TokenMatcherError::ReservedFlag(flag) => ConfigError::ReservedFlag {
                command: command.to_string(),
                flag,
            },
        }
    }
}

/// Why a flag rejected a literal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgumentCause {
    /// The literal is not one of the allowed choices.
    #[error("'{literal}' is not one of [{}]", .choices.join(", "))]
    Choice {
        /// The rejected literal.
        literal: String,
        /// The allowed literals, in declaration order.
        choices: Vec<String>,
    },

    /// The flag's validator rejected the literal.
    #[error("{0}")]
    Validation(String),

    /// The literal could not be converted by the flag's value.
    #[error(transparent)]
    Conversion(InvalidValue),
}

/// A literal that a flag rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{name}: {cause}")]
pub struct ArgumentError {
    /// The rejecting flag.
    pub name: FlagName,
    /// The rejected literal.
    pub literal: String,
    /// Why it was rejected.
    pub cause: ArgumentCause,
}

impl ArgumentError {
    pub(crate) fn new(name: FlagName, literal: &str, cause: ArgumentCause) -> Self {
        Self {
            name,
            literal: literal.to_string(),
            cause,
        }
    }
}

/// A failure while parsing or dispatching one command line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A flag rejected its literal.
    #[error("Argument error: {0}")]
    Argument(#[from] ArgumentError),

    /// A flag which takes a value was the last token.
    #[error("Parse error: {0}: flag needs an argument.")]
    MissingValue(FlagName),

    /// A flag token names no reachable flag.
    #[error("Parse error: {0}: flag provided but not defined.")]
    UnknownFlag(FlagName),

    /// A positional token names no sub-command of a command which cannot handle it.
    #[error("Parse error: unknown command '{command}' for '{program}'.")]
    UnknownCommand {
        /// The command line path resolved so far.
        program: String,
        /// The unmatched token.
        command: String,
    },

    /// A flag occurred too few or too many times.
    #[error("Parse error: {0}")]
    Cardinality(#[from] CardinalityError),

    /// The resolved command has no handler.
    #[error("Dispatch error: '{0}' has no handler.")]
    NoHandler(String),
}

impl From<MatchError> for ParseError {
    fn from(error: MatchError) -> Self {
        match error {
            MatchError::UnknownFlag(name) => ParseError::UnknownFlag(name),
            MatchError::MissingValue(name) => ParseError::MissingValue(name),
            MatchError::Cardinality(error) => ParseError::Cardinality(error),
        }
    }
}

/// Matches the flag tokens of one resolved command, writing each literal into its flag as it is seen.
pub(crate) struct Parser<'n, 'a> {
    token_matcher: TokenMatcher,
    flags: Vec<&'n mut Flag<'a>>,
}

impl<'n, 'a> std::fmt::Debug for Parser<'n, 'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser{..}").finish()
    }
}

impl<'n, 'a> Parser<'n, 'a> {
    pub(crate) fn new(flags: Vec<&'n mut Flag<'a>>) -> Result<Self, TokenMatcherError> {
        let configs = flags.iter().map(|flag| FlagConfig::from(&**flag)).collect();
        let token_matcher = TokenMatcher::new(configs)?;

        Ok(Self {
            token_matcher,
            flags,
        })
    }

    pub(crate) fn consume(self, tokens: &[&str]) -> Result<Action, ParseError> {
        let Parser {
            mut token_matcher,
            mut flags,
        } = self;

        let mut positionals = Vec::default();

        for token in tokens {
            match token_matcher.feed(token)? {
                Matched::Nothing => {}
                Matched::Value { index, literal } => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Accepting '{literal}' into {:?}.", flags[index]);
                    }

                    flags[index].accept(&literal)?;
                }
                Matched::Positional(positional) => positionals.push(positional),
                Matched::Help => return Ok(Action::PrintHelp),
            }
        }

        token_matcher.close()?;
        Ok(Action::Continue { positionals })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Continue { positionals: Vec<String> },
    PrintHelp,
}
