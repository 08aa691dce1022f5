use thiserror::Error;

use crate::model::{FlagName, Nargs};

/// A flag occurred fewer or more times than its cardinality allows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardinalityError {
    /// Fewer occurrences than the minimum.
    #[error("{name}: too few occurrences (provided={provided}, expected at least {expected}).")]
    TooFew {
        /// The flag.
        name: FlagName,
        /// How many times it occurred.
        provided: u32,
        /// The minimum.
        expected: u32,
    },
    /// More occurrences than the maximum.
    #[error("{name}: too many occurrences (provided={provided}, expected at most {expected}).")]
    TooMany {
        /// The flag.
        name: FlagName,
        /// How many times it occurred.
        provided: u32,
        /// The maximum.
        expected: u32,
    },
}

/// Counts the occurrences of one flag during a run.
#[derive(Debug)]
pub(super) struct Tally {
    name: FlagName,
    nargs: Nargs,
    count: u32,
}

impl Tally {
    pub(super) fn new(name: FlagName, nargs: Nargs) -> Self {
        Self {
            name,
            nargs,
            count: 0,
        }
    }

    pub(super) fn name(&self) -> &FlagName {
        &self.name
    }

    pub(super) fn observe(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    pub(super) fn close(&self) -> Result<(), CardinalityError> {
        if self.count < self.nargs.min() {
            return Err(CardinalityError::TooFew {
                name: self.name.clone(),
                provided: self.count,
                expected: self.nargs.min(),
            });
        }

        match self.nargs.max() {
            Some(max) if self.count > max => Err(CardinalityError::TooMany {
                name: self.name.clone(),
                provided: self.count,
                expected: max,
            }),
            _ => Ok(()),
        }
    }
}
