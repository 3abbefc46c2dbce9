use chrono::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("empty duration string")]
    Empty,

    #[error("invalid numeric value '{0}'")]
    InvalidNumber(String),

    #[error("missing unit in duration '{0}'")]
    MissingUnit(String),

    #[error("unknown unit '{unit}' in duration '{value}'")]
    UnknownUnit { value: String, unit: String },

    #[error("duration '{0}' out of range")]
    OutOfRange(String),
}

const NANOS_PER_MICRO: i128 = 1_000;
const NANOS_PER_MILLI: i128 = 1_000_000;
const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Parse a signed duration made of one or more `<number><unit>` terms.
///
/// Accepts the units `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`, fractional
/// values (`1.5h`) and an optional leading sign (`-5m`). A lone `0` is the
/// only value allowed without a unit.
pub fn parse_signed_duration(value: &str) -> Result<Duration, DurationError> {
    let (negative, mut rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    if rest.is_empty() {
        return Err(DurationError::Empty);
    }
    if rest == "0" {
        return Ok(Duration::zero());
    }

    let mut total: i128 = 0;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        if number.is_empty() || number == "." {
            return Err(DurationError::InvalidNumber(value.to_string()));
        }

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        if unit.is_empty() {
            return Err(DurationError::MissingUnit(value.to_string()));
        }

        let unit_nanos = unit_in_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            value: value.to_string(),
            unit: unit.to_string(),
        })?;

        total = total
            .checked_add(term_in_nanos(number, unit_nanos, value)?)
            .ok_or_else(|| DurationError::OutOfRange(value.to_string()))?;
        rest = tail;
    }

    let nanos =
        i64::try_from(total).map_err(|_| DurationError::OutOfRange(value.to_string()))?;
    Ok(Duration::nanoseconds(if negative { -nanos } else { nanos }))
}

fn unit_in_nanos(unit: &str) -> Option<i128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(60 * NANOS_PER_SECOND),
        "h" => Some(3600 * NANOS_PER_SECOND),
        _ => None,
    }
}

fn term_in_nanos(number: &str, unit_nanos: i128, value: &str) -> Result<i128, DurationError> {
    let invalid = || DurationError::InvalidNumber(value.to_string());
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if fraction.contains('.') {
        return Err(invalid());
    }

    let whole: i128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };

    // Digits past nanosecond resolution of the largest unit cannot matter.
    let fraction = &fraction[..fraction.len().min(18)];
    let fraction_nanos = if fraction.is_empty() {
        0
    } else {
        let digits: i128 = fraction.parse().map_err(|_| invalid())?;
        digits * unit_nanos / 10i128.pow(fraction.len() as u32)
    };

    whole
        .checked_mul(unit_nanos)
        .and_then(|n| n.checked_add(fraction_nanos))
        .ok_or_else(|| DurationError::OutOfRange(value.to_string()))
}
