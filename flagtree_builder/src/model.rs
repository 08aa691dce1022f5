/// The number of times a flag may occur on a single invocation.
///
/// A flag with a non-zero minimum is *required*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nargs {
    /// Between `min` and `max` occurrences, inclusive.
    Between(u32, u32),
    /// At least `min` occurrences, without an upper limit.
    AtLeast(u32),
}

impl Nargs {
    /// Create the cardinality `[min, max]`, where a `max` of `0` means unbounded.
    ///
    /// ### Example
    /// ```
    /// # use flagtree_builder as flagtree;
    /// use flagtree::Nargs;
    ///
    /// assert_eq!(Nargs::new(0, 1), Nargs::Between(0, 1));
    /// assert_eq!(Nargs::new(1, 0), Nargs::AtLeast(1));
    /// ```
    pub fn new(min: u32, max: u32) -> Self {
        if max == 0 {
            Nargs::AtLeast(min)
        } else {
            Nargs::Between(min, max)
        }
    }

    /// The minimum number of occurrences.
    pub fn min(&self) -> u32 {
        match self {
            Nargs::Between(min, _) | Nargs::AtLeast(min) => *min,
        }
    }

    /// The maximum number of occurrences, if bounded.
    pub fn max(&self) -> Option<u32> {
        match self {
            Nargs::Between(_, max) => Some(*max),
            Nargs::AtLeast(_) => None,
        }
    }

    /// Whether the flag must be present at least once.
    pub fn is_required(&self) -> bool {
        self.min() > 0
    }

    /// Whether the flag may be present more than once.
    pub fn is_repeatable(&self) -> bool {
        self.max().map_or(true, |max| max > 1)
    }
}

impl std::fmt::Display for Nargs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Nargs::Between(min, max) => write!(f, "[{min}, {max}]"),
            Nargs::AtLeast(min) => write!(f, "[{min}, ∞)"),
        }
    }
}

/// The identifier a flag is reported under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlagName {
    /// A long name, written `--name`.
    Long(String),
    /// A single character short name, written `-n`.
    Short(char),
}

impl FlagName {
    /// The identifier without its leading dashes.
    pub fn identifier(&self) -> String {
        match self {
            FlagName::Long(name) => name.clone(),
            FlagName::Short(short) => short.to_string(),
        }
    }
}

impl std::fmt::Display for FlagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagName::Long(name) => write!(f, "--{name}"),
            FlagName::Short(short) => write!(f, "-{short}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, Nargs::AtLeast(0), None, false, true)]
    #[case(1, 0, Nargs::AtLeast(1), None, true, true)]
    #[case(0, 1, Nargs::Between(0, 1), Some(1), false, false)]
    #[case(1, 1, Nargs::Between(1, 1), Some(1), true, false)]
    #[case(2, 5, Nargs::Between(2, 5), Some(5), true, true)]
    fn nargs_new(
        #[case] min: u32,
        #[case] max: u32,
        #[case] expected: Nargs,
        #[case] expected_max: Option<u32>,
        #[case] required: bool,
        #[case] repeatable: bool,
    ) {
        let nargs = Nargs::new(min, max);
        assert_eq!(nargs, expected);
        assert_eq!(nargs.min(), min);
        assert_eq!(nargs.max(), expected_max);
        assert_eq!(nargs.is_required(), required);
        assert_eq!(nargs.is_repeatable(), repeatable);
    }

    #[test]
    fn flag_name_display() {
        assert_eq!(FlagName::Long("ip".to_string()).to_string(), "--ip");
        assert_eq!(FlagName::Short('v').to_string(), "-v");
        assert_eq!(FlagName::Long("ip".to_string()).identifier(), "ip");
        assert_eq!(FlagName::Short('v').identifier(), "v");
    }
}
