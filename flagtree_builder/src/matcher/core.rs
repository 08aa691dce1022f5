use std::collections::HashMap;
use thiserror::Error;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::constant::*;
use crate::matcher::api::*;
use crate::matcher::model::*;
use crate::model::FlagName;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum TokenMatcherError {
    #[error("Cannot duplicate the flag '{0}'.")]
    DuplicateFlag(String),

    #[error("The flag '{0}' is reserved.")]
    ReservedFlag(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum MatchError {
    #[error("{0}: flag provided but not defined.")]
    UnknownFlag(FlagName),

    #[error("{0}: flag needs an argument.")]
    MissingValue(FlagName),

    #[error(transparent)]
    Cardinality(#[from] CardinalityError),
}

/// The outcome of feeding one token.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Matched {
    /// The token was consumed without yielding a literal (a flag awaiting its value, or the terminator).
    Nothing,
    /// The flag at `index` received `literal`.
    Value { index: usize, literal: String },
    /// The token belongs to no flag.
    Positional(String),
    /// `-h` or `--help`.
    Help,
}

#[derive(Debug)]
pub(crate) struct TokenMatcher {
    lookup: HashMap<FlagName, usize>,
    booleans: Vec<bool>,
    tallies: Vec<Tally>,
    pending: Option<usize>,
    terminated: bool,
}

impl TokenMatcher {
    pub(crate) fn new(configs: Vec<FlagConfig>) -> Result<Self, TokenMatcherError> {
        let reserved = [FlagName::Long(HELP_NAME.to_string()), FlagName::Short(HELP_SHORT)];
        let mut lookup = HashMap::default();
        let mut booleans = Vec::default();
        let mut tallies = Vec::default();

        for (index, config) in configs.into_iter().enumerate() {
            for identifier in config.identifiers() {
                if reserved.contains(&identifier) {
                    return Err(TokenMatcherError::ReservedFlag(identifier.identifier()));
                }

                let text = identifier.identifier();

                if lookup.insert(identifier, index).is_some() {
                    return Err(TokenMatcherError::DuplicateFlag(text));
                }
            }

            booleans.push(config.boolean());
            tallies.push(Tally::new(config.name(), config.nargs()));
        }

        Ok(Self {
            lookup,
            booleans,
            tallies,
            pending: None,
            terminated: false,
        })
    }

    pub(crate) fn feed(&mut self, token: &str) -> Result<Matched, MatchError> {
        // 1. A flag from the previous token takes this one as its value, whatever it looks like.
        if let Some(index) = self.pending.take() {
            return Ok(Matched::Value {
                index,
                literal: token.to_string(),
            });
        }

        // 2. Everything after the terminator is positional.
        if self.terminated {
            return Ok(Matched::Positional(token.to_string()));
        }

        if token == TERMINATOR {
            self.terminated = true;
            return Ok(Matched::Nothing);
        }

        // 3. Find a 'long' flag, such as:
        //  --initial
        //  --initial ..
        //  --initial=..
        // 4. Find a 'short' flag, such as:
        //  -i
        //  -i ..
        //  -i..
        //  -i=..
        // 5. Anything else is positional, including a lone '-'.
        if let Some(body) = token.strip_prefix("--") {
            let (name, value) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };

            if name == HELP_NAME {
                return Ok(Matched::Help);
            }

            self.match_flag(FlagName::Long(name.to_string()), value)
        } else if let Some(body) = token.strip_prefix('-') {
            let mut characters = body.chars();

            match characters.next() {
                None => Ok(Matched::Positional(token.to_string())),
                Some(short) if short == HELP_SHORT => Ok(Matched::Help),
                Some(short) => {
                    let remainder = characters.as_str();
                    let value = if remainder.is_empty() {
                        None
                    } else {
                        Some(remainder.strip_prefix('=').unwrap_or(remainder))
                    };

                    self.match_flag(FlagName::Short(short), value)
                }
            }
        } else {
            Ok(Matched::Positional(token.to_string()))
        }
    }

    fn match_flag(&mut self, name: FlagName, value: Option<&str>) -> Result<Matched, MatchError> {
        let index = match self.lookup.get(&name) {
            Some(index) => *index,
            None => return Err(MatchError::UnknownFlag(name)),
        };
        self.tallies[index].observe();

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Matched '{name}' to flag #{index}, value={value:?}.");
        }

        match value {
            Some(literal) => Ok(Matched::Value {
                index,
                literal: literal.to_string(),
            }),
            None if self.booleans[index] => Ok(Matched::Value {
                index,
                literal: BARE_BOOL_LITERAL.to_string(),
            }),
            None => {
                self.pending.replace(index);
                Ok(Matched::Nothing)
            }
        }
    }

    pub(crate) fn close(self) -> Result<(), MatchError> {
        if let Some(index) = self.pending {
            return Err(MatchError::MissingValue(self.tallies[index].name().clone()));
        }

        for tally in &self.tallies {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Closing {tally:?}.");
            }

            tally.close()?;
        }

        Ok(())
    }
}
