use std::fmt::Display;
use std::time::Duration;

use crate::api::{Collection, Func, Primitive, Scalar};
use crate::matcher::FlagConfig;
use crate::model::{FlagName, Nargs};
use crate::parser::{ArgumentCause, ArgumentError, ConfigError, OptionParameter};
use crate::prelude::{Destination, Value};

type Validator<'a> = Box<dyn Fn(&str) -> Result<(), String> + 'a>;

/// A named, typed slot on a command.
///
/// Build one through the typed constructors (ex: [`Flag::string`]) and finish with [`FlagBuilder::build`].
pub struct Flag<'a> {
    name: Option<String>,
    short: Option<char>,
    usage: String,
    nargs: Nargs,
    value: Box<dyn Value + 'a>,
    validator: Option<Validator<'a>>,
    choices: Option<Vec<String>>,
    default: Option<String>,
    inherited: bool,
    hidden: bool,
}

impl<'a> std::fmt::Debug for Flag<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let short = match (&self.name, &self.short) {
            (Some(_), Some(s)) => format!(" -{s},"),
            _ => "".to_string(),
        };
        let name = match (&self.name, &self.short) {
            (Some(n), _) => format!("--{n}"),
            (None, Some(s)) => format!("-{s}"),
            (None, None) => "<unnamed>".to_string(),
        };

        write!(f, "Flag[{nargs},{short} {name}, {u}]", nargs = self.nargs, u = self.usage)
    }
}

impl<'a> Flag<'a> {
    /// Declare a flag over a custom [`Value`].
    ///
    /// A single character `name` declares a short-only flag (ex: `-v`); an empty `name` leaves only [`FlagBuilder::short`].
    ///
    /// ### Example
    /// ```
    /// # use flagtree_builder as flagtree;
    /// use flagtree::{Flag, InvalidValue};
    /// use flagtree::prelude::Value;
    ///
    /// struct Level(u8);
    ///
    /// impl Value for Level {
    ///     fn set(&mut self, literal: &str) -> Result<(), InvalidValue> {
    ///         self.0 = literal.len() as u8;
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let flag = Flag::var(Level(0), "level", "Verbosity.").build().unwrap();
    /// ```
    pub fn var(
        value: impl Value + 'a,
        name: impl Into<String>,
        usage: impl Into<String>,
    ) -> FlagBuilder<'a> {
        let name: String = name.into();
        let mut characters = name.chars();
        let (name, short) = match (characters.next(), characters.next()) {
            (None, _) => (None, None),
            (Some(c), None) => (None, Some(c)),
            _ => (Some(name), None),
        };
        let nargs = value.nargs();

        FlagBuilder {
            flag: Flag {
                name,
                short,
                usage: usage.into(),
                nargs,
                value: Box::new(value),
                validator: None,
                choices: None,
                default: None,
                inherited: false,
                hidden: false,
            },
            replaced_short: None,
        }
    }

    /// Declare a flag whose literals are handed to `callback`.
    ///
    /// ### Example
    /// ```
    /// # use flagtree_builder as flagtree;
    /// use flagtree::Flag;
    ///
    /// let flag = Flag::func("echo", "Print the value.", |literal: &str| -> Result<(), String> {
    ///     println!("{literal}");
    ///     Ok(())
    /// })
    /// .build()
    /// .unwrap();
    /// ```
    pub fn func<F, E>(
        name: impl Into<String>,
        usage: impl Into<String>,
        callback: F,
    ) -> FlagBuilder<'a>
    where
        F: FnMut(&str) -> Result<(), E> + 'a,
        E: Display + 'a,
    {
        Flag::var(Func::new(callback), name, usage)
    }

    /// Declare a flag over any [`Primitive`].
    /// The `initial` value is written into the destination immediately.
    pub fn scalar<T: Primitive + 'a>(
        destination: impl Destination<T> + 'a,
        name: impl Into<String>,
        initial: T,
        usage: impl Into<String>,
    ) -> FlagBuilder<'a> {
        Flag::var(Scalar::new(destination, initial), name, usage)
    }

    /// Declare a repeatable flag which collects any [`Primitive`].
    /// The `initial` list is written into the destination immediately, and replaced by the first occurrence.
    pub fn list<T: Primitive + 'a>(
        destination: impl Destination<Vec<T>> + 'a,
        name: impl Into<String>,
        initial: Vec<T>,
        usage: impl Into<String>,
    ) -> FlagBuilder<'a> {
        Flag::var(Collection::new(destination, initial), name, usage)
    }

    /// Declare a boolean flag, which may be given bare.
    pub fn bool(
        destination: impl Destination<bool> + 'a,
        name: impl Into<String>,
        initial: bool,
        usage: impl Into<String>,
    ) -> FlagBuilder<'a> {
        Flag::scalar(destination, name, initial, usage)
    }

    /// Declare a duration flag (ex: `300ms`, `1h30m`).
    pub fn duration(
        destination: impl Destination<Duration> + 'a,
        name: impl Into<String>,
        initial: Duration,
        usage: impl Into<String>,
    ) -> FlagBuilder<'a> {
        Flag::scalar(destination, name, initial, usage)
    }

    /// Declare a 64-bit float flag.
    pub fn float64(
        destination: impl Destination<f64> + 'a,
        name: impl Into<String>,
        initial: f64,
        usage: impl Into<String>,
    ) -> FlagBuilder<'a> {
        Flag::scalar(destination, name, initial, usage)
    }

    /// Declare a native width signed integer flag.
    pub fn int(
        destination: impl Destination<isize> + 'a,
        name: impl Into<String>,
        initial: isize,
        usage: impl Into<String>,
    ) -> FlagBuilder<'a> {
        Flag::scalar(destination, name, initial, usage)
    }

    /// Declare a 64-bit signed integer flag.
    pub fn int64(
        destination: impl Destination<i64> + 'a,
        name: impl Into<String>,
        initial: i64,
        usage: impl Into<String>,
    ) -> FlagBuilder<'a> {
        Flag::scalar(destination, name, initial, usage)
    }

    /// Declare a string flag.
    pub fn string(
        destination: impl Destination<String> + 'a,
        name: impl Into<String>,
        initial: impl Into<String>,
        usage: impl Into<String>,
    ) -> FlagBuilder<'a> {
        Flag::scalar(destination, name, initial.into(), usage)
    }

    /// Declare a repeatable string flag.
    pub fn strings(
        destination: impl Destination<Vec<String>> + 'a,
        name: impl Into<String>,
        initial: Vec<String>,
        usage: impl Into<String>,
    ) -> FlagBuilder<'a> {
        Flag::list(destination, name, initial, usage)
    }

    /// Declare a native width unsigned integer flag.
    pub fn uint(
        destination: impl Destination<usize> + 'a,
        name: impl Into<String>,
        initial: usize,
        usage: impl Into<String>,
    ) -> FlagBuilder<'a> {
        Flag::scalar(destination, name, initial, usage)
    }

    /// Declare a 64-bit unsigned integer flag.
    pub fn uint64(
        destination: impl Destination<u64> + 'a,
        name: impl Into<String>,
        initial: u64,
        usage: impl Into<String>,
    ) -> FlagBuilder<'a> {
        Flag::scalar(destination, name, initial, usage)
    }

    /// The name used to identify this flag in messages: the long name when present, otherwise the short.
    pub fn name(&self) -> FlagName {
        match (&self.name, self.short) {
            (Some(name), _) => FlagName::Long(name.clone()),
            (None, Some(short)) => FlagName::Short(short),
            (None, None) => unreachable!("internal error - flags are built with a name"),
        }
    }

    /// The long name, if any.
    pub fn long(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The short name, if any.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// The one line description shown in help.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// How many times this flag must/may appear.
    pub fn nargs(&self) -> Nargs {
        self.nargs
    }

    /// Whether this flag is visible to sub-commands.
    pub fn is_inherited(&self) -> bool {
        self.inherited
    }

    /// Whether this flag is omitted from help.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub(crate) fn is_bool(&self) -> bool {
        self.value.is_bool_flag()
    }

    pub(crate) fn rewind(&mut self) {
        self.value.rewind();
    }

    /// Check a literal against the choices, then the validator, and finally store it.
    pub(crate) fn accept(&mut self, literal: &str) -> Result<(), ArgumentError> {
        if let Some(choices) = &self.choices {
            if !choices.iter().any(|choice| choice == literal) {
                return Err(ArgumentError::new(
                    self.name(),
                    literal,
                    ArgumentCause::Choice {
                        literal: literal.to_string(),
                        choices: choices.clone(),
                    },
                ));
            }
        }

        if let Some(validator) = &self.validator {
            validator(literal).map_err(|message| {
                ArgumentError::new(self.name(), literal, ArgumentCause::Validation(message))
            })?;
        }

        self.value
            .set(literal)
            .map_err(|error| ArgumentError::new(self.name(), literal, ArgumentCause::Conversion(error)))
    }
}

impl<'a> From<&Flag<'a>> for FlagConfig {
    fn from(value: &Flag<'a>) -> Self {
        FlagConfig::new(value.name.clone(), value.short, value.nargs, value.is_bool())
    }
}

impl<'a> From<&Flag<'a>> for OptionParameter {
    fn from(value: &Flag<'a>) -> Self {
        OptionParameter::new(
            value.name.clone(),
            value.short,
            value.nargs,
            value.is_bool(),
            value.usage.clone(),
            value.choices.clone(),
            value.default.clone(),
        )
    }
}

/// Refines a [`Flag`] before it is attached to a command.
pub struct FlagBuilder<'a> {
    flag: Flag<'a>,
    replaced_short: Option<(char, char)>,
}

impl<'a> std::fmt::Debug for FlagBuilder<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FlagBuilder[{:?}]", self.flag)
    }
}

impl<'a> FlagBuilder<'a> {
    /// Add a single character alias (ex: `-i` for `--ip`).
    ///
    /// A flag declared with a one character name already is `-<name>`; giving it a different short name is rejected by [`FlagBuilder::build`].
    pub fn short(mut self, short: char) -> Self {
        if let (None, Some(current)) = (&self.flag.name, self.flag.short) {
            if current != short && self.replaced_short.is_none() {
                self.replaced_short = Some((current, short));
            }
        }

        self.flag.short = Some(short);
        self
    }

    /// Set how many times the flag must (`min`) and may (`max`) appear.
    /// A `max` of 0 means unbounded.
    ///
    /// ### Example
    /// ```
    /// # use flagtree_builder as flagtree;
    /// use flagtree::{Flag, Nargs};
    ///
    /// let mut name = String::default();
    /// let flag = Flag::string(&mut name, "name", "", "Widget name.")
    ///     .nargs(1, 1)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(flag.nargs(), Nargs::Between(1, 1));
    /// ```
    pub fn nargs(mut self, min: u32, max: u32) -> Self {
        self.flag.nargs = Nargs::new(min, max);
        self
    }

    /// Restrict the accepted literals to exactly these strings.
    pub fn choices(mut self, choices: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.flag.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Run `validator` on each literal before it is converted.
    ///
    /// ### Example
    /// ```
    /// # use flagtree_builder as flagtree;
    /// use flagtree::Flag;
    ///
    /// let mut port: u64 = 0;
    /// let flag = Flag::uint64(&mut port, "port", 80, "Port.")
    ///     .validate(|literal| {
    ///         if literal.starts_with('0') {
    ///             Err("no leading zeros")
    ///         } else {
    ///             Ok(())
    ///         }
    ///     })
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn validate<F, E>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> Result<(), E> + 'a,
        E: Display,
    {
        self.flag.validator = Some(Box::new(move |literal: &str| {
            validator(literal).map_err(|error| error.to_string())
        }));
        self
    }

    /// Make the flag visible to every sub-command below the declaring command.
    pub fn inherited(mut self) -> Self {
        self.flag.inherited = true;
        self
    }

    /// Omit the flag from help.
    pub fn hidden(mut self) -> Self {
        self.flag.hidden = true;
        self
    }

    /// Check the declaration.
    pub fn build(self) -> Result<Flag<'a>, ConfigError> {
        let mut flag = self.flag;

        if flag.name.is_none() && flag.short.is_none() {
            return Err(ConfigError::UnnamedFlag);
        }

        if let Some((short, replacement)) = self.replaced_short {
            return Err(ConfigError::ReplacedShort { short, replacement });
        }

        if let Some(name) = &flag.name {
            if name.starts_with('-') || name.contains(|c: char| c == '=' || c.is_whitespace()) {
                return Err(ConfigError::InvalidName(name.clone()));
            }
        }

        if let Some(short) = flag.short {
            if short == '-' || short == '=' || short.is_whitespace() {
                return Err(ConfigError::InvalidShort(short));
            }
        }

        if let Nargs::Between(min, max) = flag.nargs {
            if min > max {
                return Err(ConfigError::InvalidNargs {
                    flag: flag.name(),
                    min,
                    max,
                });
            }
        }

        if matches!(&flag.choices, Some(choices) if choices.is_empty()) {
            return Err(ConfigError::EmptyChoices(flag.name()));
        }

        // Help shows the declared default, not whatever a previous run stored.
        flag.default = flag.value.render();
        Ok(flag)
    }

    /// Like [`FlagBuilder::build`], but panics on an invalid declaration.
    pub fn must(self) -> Flag<'a> {
        match self.build() {
            Ok(flag) => flag,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<'a> From<Flag<'a>> for FlagBuilder<'a> {
    fn from(flag: Flag<'a>) -> Self {
        FlagBuilder {
            flag,
            replaced_short: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InvalidValue;
    use rstest::rstest;
    use std::cell::RefCell;

    #[rstest]
    #[case("ip", Some("ip"), None)]
    #[case("v", None, Some('v'))]
    #[case("", None, None)]
    fn var_names(#[case] name: &str, #[case] long: Option<&str>, #[case] short: Option<char>) {
        let mut variable = false;
        let builder = Flag::bool(&mut variable, name, false, "");
        assert_eq!(builder.flag.long(), long);
        assert_eq!(builder.flag.short(), short);
    }

    #[test]
    fn build_unnamed() {
        let mut variable = false;
        assert_matches!(
            Flag::bool(&mut variable, "", false, "").build(),
            Err(ConfigError::UnnamedFlag)
        );

        let mut variable = false;
        let flag = Flag::bool(&mut variable, "", false, "").short('q').build().unwrap();
        assert_eq!(flag.name(), FlagName::Short('q'));
    }

    #[test]
    fn build_replaced_short() {
        let count = RefCell::new(0usize);
        assert_matches!(
            Flag::uint(&count, "c", 0, "").short('x').build(),
            Err(ConfigError::ReplacedShort { short: 'c', replacement: 'x' })
        );

        // Restating the same short name is harmless.
        let flag = Flag::uint(&count, "c", 0, "").short('c').build().unwrap();
        assert_eq!(flag.name(), FlagName::Short('c'));

        let flag = Flag::uint(&count, "count", 0, "").short('x').build().unwrap();
        assert_eq!(flag.short(), Some('x'));
    }

    #[rstest]
    #[case("--ip")]
    #[case("-ip")]
    #[case("a=b")]
    #[case("a b")]
    fn build_invalid_name(#[case] name: &str) {
        let mut variable = String::default();
        assert_matches!(
            Flag::string(&mut variable, name, "", "").build(),
            Err(ConfigError::InvalidName(n)) => {
                assert_eq!(n, name);
            }
        );
    }

    #[rstest]
    #[case('-')]
    #[case('=')]
    #[case(' ')]
    fn build_invalid_short(#[case] short: char) {
        let mut variable = String::default();
        assert_matches!(
            Flag::string(&mut variable, "name", "", "").short(short).build(),
            Err(ConfigError::InvalidShort(c)) => {
                assert_eq!(c, short);
            }
        );
    }

    #[test]
    fn build_invalid_nargs() {
        let mut variable = String::default();
        assert_matches!(
            Flag::string(&mut variable, "name", "", "").nargs(3, 2).build(),
            Err(ConfigError::InvalidNargs { min: 3, max: 2, .. })
        );
    }

    #[test]
    fn build_empty_choices() {
        let mut variable = String::default();
        assert_matches!(
            Flag::string(&mut variable, "foo", "", "")
                .choices(Vec::<String>::default())
                .build(),
            Err(ConfigError::EmptyChoices(FlagName::Long(n))) => {
                assert_eq!(n, "foo");
            }
        );
    }

    #[test]
    fn default_nargs() {
        let mut scalar = 0u64;
        let mut list: Vec<u64> = Vec::default();
        assert_eq!(
            Flag::uint64(&mut scalar, "n", 0, "").must().nargs(),
            Nargs::Between(0, 1)
        );
        assert_eq!(
            Flag::list(&mut list, "ns", Vec::default(), "").must().nargs(),
            Nargs::AtLeast(0)
        );
    }

    #[rstest]
    #[case("bar")]
    #[case("baz")]
    fn accept_choice(#[case] literal: &str) {
        let variable = RefCell::new(String::default());
        let mut flag = Flag::string(&variable, "foo", "", "")
            .choices(["bar", "baz"])
            .must();

        flag.accept(literal).unwrap();
        assert_eq!(*variable.borrow(), literal);
    }

    #[rstest]
    #[case("ba")]
    #[case("barr")]
    #[case("qux")]
    fn accept_choice_invalid(#[case] literal: &str) {
        let variable = RefCell::new(String::default());
        let mut flag = Flag::string(&variable, "foo", "", "")
            .choices(["bar", "baz"])
            .must();

        assert_matches!(flag.accept(literal), Err(ArgumentError { cause: ArgumentCause::Choice { .. }, .. }));
        assert_eq!(*variable.borrow(), "");
    }

    #[test]
    fn accept_order() {
        // Choices are checked before the validator, which is checked before conversion.
        let calls = RefCell::new(0);
        let mut variable: u64 = 0;
        let mut flag = Flag::uint64(&mut variable, "n", 0, "")
            .choices(["1", "x"])
            .validate(|literal| {
                *calls.borrow_mut() += 1;
                if literal == "1" {
                    Err("one is not allowed")
                } else {
                    Ok(())
                }
            })
            .must();

        assert_matches!(flag.accept("2"), Err(ArgumentError { cause: ArgumentCause::Choice { .. }, .. }));
        assert_eq!(*calls.borrow(), 0);

        assert_matches!(flag.accept("1"), Err(ArgumentError { cause: ArgumentCause::Validation(message), .. }) => {
            assert_eq!(message, "one is not allowed");
        });
        assert_eq!(*calls.borrow(), 1);

        assert_matches!(flag.accept("x"), Err(ArgumentError { cause: ArgumentCause::Conversion(InvalidValue::Syntax { .. }), .. }));
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn accept_func() {
        let seen = RefCell::new(Vec::default());
        let mut flag = Flag::func("x", "", |literal: &str| -> Result<(), String> {
            seen.borrow_mut().push(literal.to_string());
            Ok(())
        })
        .must();

        flag.accept("a").unwrap();
        flag.accept("b").unwrap();
        drop(flag);
        assert_eq!(seen.into_inner(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn accept_error_display() {
        let mut variable = String::default();
        let mut flag = Flag::string(&mut variable, "ip", "", "")
            .validate(|literal| {
                if literal.split('.').all(|part| part.parse::<u8>().is_ok()) {
                    Ok(())
                } else {
                    Err(format!("invalid IP: {literal}"))
                }
            })
            .must();

        let error = flag.accept("256.0.0.1").unwrap_err();
        assert_eq!(error.to_string(), "--ip: invalid IP: 256.0.0.1");
    }

    #[test]
    #[should_panic]
    fn must_panics() {
        let mut variable = String::default();
        Flag::string(&mut variable, "", "", "").must();
    }
}
