use crate::model::{FlagName, Nargs};

#[cfg(test)]
use rand::{distributions::Standard, prelude::Distribution, Rng};

#[cfg(test)]
impl Distribution<Nargs> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Nargs {
        match rng.gen_range(0..2) {
            0 => {
                let max: u32 = rng.gen_range(1..16);
                Nargs::Between(rng.gen_range(0..=max), max)
            }
            1 => Nargs::AtLeast(rng.gen_range(0..16)),
            _ => unreachable!("internal error - impossible gen_range()"),
        }
    }
}

/// What the matcher needs to know about a flag, detached from its value box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FlagConfig {
    long: Option<String>,
    short: Option<char>,
    nargs: Nargs,
    boolean: bool,
}

impl FlagConfig {
    pub(crate) fn new(long: Option<String>, short: Option<char>, nargs: Nargs, boolean: bool) -> Self {
        Self {
            long,
            short,
            nargs,
            boolean,
        }
    }

    pub(crate) fn name(&self) -> FlagName {
        match (&self.long, self.short) {
            (Some(long), _) => FlagName::Long(long.clone()),
            (None, Some(short)) => FlagName::Short(short),
            (None, None) => unreachable!("internal error - flags are built with a name"),
        }
    }

    /// The names this flag answers to: `--long` and `-s` are distinct, so `--s` does not reach `-s`.
    pub(crate) fn identifiers(&self) -> Vec<FlagName> {
        self.long
            .iter()
            .cloned()
            .map(FlagName::Long)
            .chain(self.short.map(FlagName::Short))
            .collect()
    }

    pub(crate) fn nargs(&self) -> Nargs {
        self.nargs
    }

    pub(crate) fn boolean(&self) -> bool {
        self.boolean
    }
}
