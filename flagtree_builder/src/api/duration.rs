use std::time::Duration;
use thiserror::Error;

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

const UNITS: [(&str, u64); 8] = [
    ("ns", NANOSECOND),
    ("us", MICROSECOND),
    ("µs", MICROSECOND), // U+00B5 micro sign
    ("μs", MICROSECOND), // U+03BC greek mu
    ("ms", MILLISECOND),
    ("s", SECOND),
    ("m", MINUTE),
    ("h", HOUR),
];

// More fraction digits than this cannot change the result at nanosecond precision.
const MAX_FRACTION_DIGITS: usize = 18;

/// Why a duration literal was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationError {
    /// The literal is not a sequence of `<number><unit>` pairs.
    #[error("invalid syntax")]
    InvalidSyntax,
    /// A number is not followed by a unit.
    #[error("missing unit")]
    MissingUnit,
    /// A unit is not one of `ns`, `us`, `µs`, `ms`, `s`, `m`, `h`.
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),
    /// The duration does not fit in 64 bits of nanoseconds.
    #[error("overflow")]
    Overflow,
    /// The duration is below zero.
    #[error("negative durations are not supported")]
    Negative,
}

/// Parse a duration such as `300ms`, `1.5h` or `2h45m`.
pub(crate) fn parse(literal: &str) -> Result<Duration, DurationError> {
    let (negative, mut rest) = match literal.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, literal.strip_prefix('+').unwrap_or(literal)),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }

    if rest.is_empty() {
        return Err(DurationError::InvalidSyntax);
    }

    let mut total: u64 = 0;

    while !rest.is_empty() {
        let (whole, tail) = split_digits(rest);
        rest = tail;
        let mut fraction = "";

        if let Some(tail) = rest.strip_prefix('.') {
            let (digits, tail) = split_digits(tail);
            fraction = digits;
            rest = tail;
        }

        if whole.is_empty() && fraction.is_empty() {
            return Err(DurationError::InvalidSyntax);
        }

        let unit_length = rest.len()
            - rest
                .trim_start_matches(|c: char| c != '.' && !c.is_ascii_digit())
                .len();
        let (unit, tail) = rest.split_at(unit_length);
        rest = tail;

        if unit.is_empty() {
            return Err(DurationError::MissingUnit);
        }

        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| DurationError::UnknownUnit(unit.to_string()))?;

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| DurationError::Overflow)?
        };
        let mut nanos = whole.checked_mul(scale).ok_or(DurationError::Overflow)?;

        if !fraction.is_empty() {
            let digits = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
            let numerator: u64 = digits.parse().map_err(|_| DurationError::InvalidSyntax)?;
            let denominator = 10f64.powi(digits.len() as i32);
            let partial = (numerator as f64 * (scale as f64 / denominator)) as u64;
            nanos = nanos.checked_add(partial).ok_or(DurationError::Overflow)?;
        }

        total = total.checked_add(nanos).ok_or(DurationError::Overflow)?;
    }

    if negative && total > 0 {
        return Err(DurationError::Negative);
    }

    Ok(Duration::from_nanos(total))
}

/// Render a duration in the form accepted by [`parse`], ex: `1h2m3.5s`.
pub(crate) fn format(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < MICROSECOND as u128 {
        return format!("{nanos}ns");
    }

    if nanos < MILLISECOND as u128 {
        return format!("{}µs", fractional(nanos, 3));
    }

    if nanos < SECOND as u128 {
        return format!("{}ms", fractional(nanos, 6));
    }

    let hours = nanos / HOUR as u128;
    let minutes = (nanos / MINUTE as u128) % 60;
    let seconds = fractional(nanos % MINUTE as u128, 9);

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

fn split_digits(value: &str) -> (&str, &str) {
    let length = value.len() - value.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    value.split_at(length)
}

fn fractional(value: u128, precision: u32) -> String {
    let scale = 10u128.pow(precision);
    let whole = value / scale;
    let fraction = value % scale;

    if fraction == 0 {
        whole.to_string()
    } else {
        let digits = format!("{fraction:0width$}", width = precision as usize);
        format!("{whole}.{}", digits.trim_end_matches('0'))
    }
}
