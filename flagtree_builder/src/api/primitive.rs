use std::any::type_name;
use std::num::IntErrorKind;
use std::time::Duration;
use thiserror::Error;

use crate::api::duration::{self, DurationError};

/// Why a literal could not be stored into a flag's value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidValue {
    /// The literal is not a well formed value of the target type.
    #[error("cannot convert '{token}' to {type_name}")]
    Syntax {
        /// The offending literal.
        token: String,
        /// The target type.
        type_name: &'static str,
    },
    /// The literal is well formed, but does not fit in the target type.
    #[error("'{token}' is out of range for {type_name}")]
    OutOfRange {
        /// The offending literal.
        token: String,
        /// The target type.
        type_name: &'static str,
    },
    /// The literal is not a valid duration.
    #[error("invalid duration '{token}': {reason}")]
    Duration {
        /// The offending literal.
        token: String,
        /// What is wrong with it.
        reason: DurationError,
    },
    /// A user supplied conversion rejected the literal.
    #[error("{0}")]
    Custom(String),
}

impl InvalidValue {
    fn syntax<T>(token: &str) -> Self {
        InvalidValue::Syntax {
            token: token.to_string(),
            type_name: type_name::<T>(),
        }
    }

    fn out_of_range<T>(token: &str) -> Self {
        InvalidValue::OutOfRange {
            token: token.to_string(),
            type_name: type_name::<T>(),
        }
    }
}

mod private {
    pub trait Sealed {}
}

/// A type that a single command line literal converts into.
///
/// The set of primitives is closed.
/// For anything else, implement [`Value`](crate::prelude::Value) directly, or use [`Flag::func`](crate::Flag::func).
pub trait Primitive: private::Sealed + Clone + Default + PartialEq + Sized {
    /// Whether a flag of this type may appear without a value (ex: `--verbose`).
    const IS_BOOL: bool = false;

    /// Convert a literal into this type.
    fn parse(literal: &str) -> Result<Self, InvalidValue>;

    /// Render this value in a form which [`Primitive::parse`] accepts.
    fn render(&self) -> String;
}

impl private::Sealed for String {}

impl Primitive for String {
    fn parse(literal: &str) -> Result<Self, InvalidValue> {
        Ok(literal.to_string())
    }

    fn render(&self) -> String {
        self.clone()
    }
}

impl private::Sealed for bool {}

impl Primitive for bool {
    const IS_BOOL: bool = true;

    fn parse(literal: &str) -> Result<Self, InvalidValue> {
        match literal {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(InvalidValue::syntax::<bool>(literal)),
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

macro_rules! integer_primitive {
    ($($t:ty),*) => {
        $(
            impl private::Sealed for $t {}

            impl Primitive for $t {
                fn parse(literal: &str) -> Result<Self, InvalidValue> {
                    literal.parse::<$t>().map_err(|error| match error.kind() {
                        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                            InvalidValue::out_of_range::<$t>(literal)
                        }
                        _ => InvalidValue::syntax::<$t>(literal),
                    })
                }

                fn render(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

integer_primitive!(isize, i64, usize, u64);

impl private::Sealed for f64 {}

impl Primitive for f64 {
    fn parse(literal: &str) -> Result<Self, InvalidValue> {
        let value = literal
            .parse::<f64>()
            .map_err(|_| InvalidValue::syntax::<f64>(literal))?;

        // Rust saturates to infinity where a finite literal is too large.
        if value.is_infinite() && !literal.to_ascii_lowercase().contains("inf") {
            return Err(InvalidValue::out_of_range::<f64>(literal));
        }

        Ok(value)
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl private::Sealed for Duration {}

impl Primitive for Duration {
    fn parse(literal: &str) -> Result<Self, InvalidValue> {
        duration::parse(literal).map_err(|reason| InvalidValue::Duration {
            token: literal.to_string(),
            reason,
        })
    }

    fn render(&self) -> String {
        duration::format(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", true)]
    #[case("t", true)]
    #[case("T", true)]
    #[case("TRUE", true)]
    #[case("true", true)]
    #[case("True", true)]
    #[case("0", false)]
    #[case("f", false)]
    #[case("F", false)]
    #[case("FALSE", false)]
    #[case("false", false)]
    #[case("False", false)]
    fn bool_parse(#[case] literal: &str, #[case] expected: bool) {
        assert_eq!(bool::parse(literal).unwrap(), expected);
    }

    #[rstest]
    #[case("yes")]
    #[case("tRUE")]
    #[case("")]
    #[case("2")]
    fn bool_parse_invalid(#[case] literal: &str) {
        assert_matches!(bool::parse(literal), Err(InvalidValue::Syntax { token, type_name: "bool" }) => {
            assert_eq!(token, literal);
        });
    }

    #[rstest]
    #[case("0", 0)]
    #[case("-5", -5)]
    #[case("+5", 5)]
    #[case("9223372036854775807", i64::MAX)]
    fn i64_parse(#[case] literal: &str, #[case] expected: i64) {
        assert_eq!(i64::parse(literal).unwrap(), expected);
    }

    #[test]
    fn integer_parse_out_of_range() {
        assert_matches!(
            i64::parse("9223372036854775808"),
            Err(InvalidValue::OutOfRange { type_name: "i64", .. })
        );
        assert_matches!(
            u64::parse("18446744073709551616"),
            Err(InvalidValue::OutOfRange { type_name: "u64", .. })
        );
    }

    #[rstest]
    #[case("-1")]
    #[case("1.0")]
    #[case("abc")]
    #[case("")]
    fn unsigned_parse_invalid(#[case] literal: &str) {
        assert_matches!(usize::parse(literal), Err(InvalidValue::Syntax { type_name: "usize", .. }));
        assert_matches!(u64::parse(literal), Err(InvalidValue::Syntax { type_name: "u64", .. }));
    }

    #[rstest]
    #[case("1", 1.0)]
    #[case("-2.5", -2.5)]
    #[case("1e3", 1000.0)]
    #[case("inf", f64::INFINITY)]
    fn f64_parse(#[case] literal: &str, #[case] expected: f64) {
        assert_eq!(f64::parse(literal).unwrap(), expected);
    }

    #[test]
    fn f64_parse_invalid() {
        assert_matches!(f64::parse("1e999"), Err(InvalidValue::OutOfRange { .. }));
        assert_matches!(f64::parse("one"), Err(InvalidValue::Syntax { .. }));
    }

    #[test]
    fn duration_parse_invalid() {
        assert_matches!(Duration::parse("1"), Err(InvalidValue::Duration { token, reason: DurationError::MissingUnit }) => {
            assert_eq!(token, "1");
        });
    }

    #[rstest]
    #[case(Duration::from_secs(1), "1s")]
    #[case(Duration::from_millis(1500), "1.5s")]
    fn duration_render(#[case] value: Duration, #[case] expected: &str) {
        assert_eq!(value.render(), expected);
    }

    fn assert_round_trip<T: Primitive + std::fmt::Debug>(value: T) {
        let literal = value.render();
        assert_eq!(T::parse(&literal), Ok(value), "via '{literal}'");
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn bool_round_trip(#[case] value: bool) {
        assert_round_trip(value);
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(isize::MIN)]
    #[case(isize::MAX)]
    fn isize_round_trip(#[case] value: isize) {
        assert_round_trip(value);
    }

    #[rstest]
    #[case(0)]
    #[case(-9_000_000_000)]
    #[case(i64::MIN)]
    #[case(i64::MAX)]
    fn i64_round_trip(#[case] value: i64) {
        assert_round_trip(value);
    }

    #[rstest]
    #[case(0)]
    #[case(7)]
    #[case(usize::MAX)]
    fn usize_round_trip(#[case] value: usize) {
        assert_round_trip(value);
    }

    #[rstest]
    #[case(0)]
    #[case(42)]
    #[case(u64::MAX)]
    fn u64_round_trip(#[case] value: u64) {
        assert_round_trip(value);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.0)]
    #[case(0.1 + 0.2)]
    #[case(-2.5)]
    #[case(1e300)]
    #[case(f64::MIN_POSITIVE)]
    #[case(f64::MAX)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn f64_round_trip(#[case] value: f64) {
        assert_round_trip(value);
        assert_eq!(
            f64::parse(&value.render()).unwrap().is_sign_negative(),
            value.is_sign_negative()
        );
    }

    #[rstest]
    #[case("")]
    #[case("hello world")]
    #[case("--not-a-flag")]
    #[case("ünïcödé=1")]
    fn string_round_trip(#[case] value: &str) {
        assert_round_trip(value.to_string());
    }

    #[rstest]
    #[case(Duration::ZERO)]
    #[case(Duration::from_nanos(7))]
    #[case(Duration::from_micros(1500))]
    #[case(Duration::from_millis(300))]
    #[case(Duration::from_secs(90))]
    #[case(Duration::from_secs(3600))]
    #[case(Duration::new(3723, 500_000_000))]
    fn duration_round_trip(#[case] value: Duration) {
        assert_round_trip(value);
    }

    #[test]
    fn invalid_value_display() {
        assert_eq!(
            InvalidValue::syntax::<u64>("abc").to_string(),
            "cannot convert 'abc' to u64"
        );
        assert_eq!(
            InvalidValue::out_of_range::<i64>("1e99").to_string(),
            "'1e99' is out of range for i64"
        );
        assert_eq!(InvalidValue::Custom("nope".to_string()).to_string(), "nope");
    }
}
