use super::duration::parse_signed_duration;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// Resolves to the Unix epoch.
pub const ALL: &str = "all";
/// Resolves to the reference instant.
pub const NOW: &str = "now";

const LOCAL_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S";
const LOCAL_DATE_TIME_NANO: &str = "%Y-%m-%dT%H:%M:%S%.f";
const LOCAL_DATE: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Error)]
pub enum TimeError {
    #[error("failed to parse time '{expression}' as {layout}: {source}")]
    MalformedTimestamp {
        expression: String,
        layout: &'static str,
        #[source]
        source: chrono::ParseError,
    },

    #[error("failed to parse time '{0}'")]
    InvalidTimeExpression(String),
}

/// Resolve a user supplied time expression against `reference`.
///
/// Tried in order: `all`, `now`, a signed duration subtracted from the
/// reference (`42m`, `1h`; a bare `0` is not a duration), an absolute
/// timestamp whose layout is inferred from its shape, and finally Unix
/// seconds.
pub fn resolve(
    expression: &str,
    reference: DateTime<FixedOffset>,
) -> Result<DateTime<Utc>, TimeError> {
    match expression {
        ALL => return Ok(DateTime::<Utc>::UNIX_EPOCH),
        NOW => return Ok(reference.with_timezone(&Utc)),
        _ => {}
    }

    if expression != "0" {
        if let Ok(duration) = parse_signed_duration(expression) {
            return reference
                .checked_sub_signed(duration)
                .map(|t| t.with_timezone(&Utc))
                .ok_or_else(|| TimeError::InvalidTimeExpression(expression.to_string()));
        }
    }

    match parse_timestamp(expression, reference.offset()) {
        Ok(t) => Ok(t),
        // Shaped like a date, so falling back to an integer would hide the mistake.
        Err(e) if expression.contains('-') => Err(e),
        Err(_) => expression
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| TimeError::InvalidTimeExpression(expression.to_string())),
    }
}

/// Resolve against the current local time.
pub fn resolve_now(expression: &str) -> Result<DateTime<Utc>, TimeError> {
    resolve(expression, Local::now().fixed_offset())
}

/// Parse an absolute timestamp, picking the layout from the literal's shape.
fn parse_timestamp(value: &str, local: &FixedOffset) -> Result<DateTime<Utc>, TimeError> {
    let zone_aware = value.contains(['Z', 'z', '+']) || value.matches('-').count() == 3;

    if zone_aware {
        parse_zoned(value)
    } else {
        parse_local(value, local)
    }
}

fn parse_local(value: &str, local: &FixedOffset) -> Result<DateTime<Utc>, TimeError> {
    let naive = if value.contains('.') {
        NaiveDateTime::parse_from_str(value, LOCAL_DATE_TIME_NANO)
            .map_err(|e| malformed(value, "local date-time with fractional seconds", e))?
    } else if let Some((_, time)) = value.split_once('T') {
        let padded = pad_time(value, time);
        NaiveDateTime::parse_from_str(&padded, LOCAL_DATE_TIME)
            .map_err(|e| malformed(value, local_precision(time), e))?
    } else {
        NaiveDate::parse_from_str(value, LOCAL_DATE)
            .map_err(|e| malformed(value, "local date", e))?
            .and_time(chrono::NaiveTime::MIN)
    };

    local
        .from_local_datetime(&naive)
        .single()
        .map(|t| t.with_timezone(&Utc))
        .ok_or_else(|| TimeError::InvalidTimeExpression(value.to_string()))
}

fn parse_zoned(value: &str) -> Result<DateTime<Utc>, TimeError> {
    if value.contains('.') {
        return DateTime::parse_from_rfc3339(value)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| malformed(value, "RFC 3339 with fractional seconds", e));
    }

    let (body, zone) = split_zone(value);
    let zone = if zone.eq_ignore_ascii_case("z") { "Z" } else { zone };

    let (candidate, layout) = match body.split_once('T') {
        Some((_, time)) => (
            format!("{}{}", pad_time(body, time), zone),
            zoned_precision(time),
        ),
        None => (format!("{body}T00:00:00{zone}"), "date with zone"),
    };

    DateTime::parse_from_rfc3339(&candidate)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| malformed(value, layout, e))
}

/// Split a zone-aware literal into its date/time body and zone suffix.
fn split_zone(value: &str) -> (&str, &str) {
    let zone_start = value
        .find(['Z', 'z'])
        .or_else(|| value.rfind('+'))
        .or_else(|| {
            // Two dashes belong to the date, the third starts a negative offset.
            value.match_indices('-').nth(2).map(|(ix, _)| ix)
        });

    match zone_start {
        Some(ix) => value.split_at(ix),
        None => (value, ""),
    }
}

/// Complete an hour or hour:minute time portion to full second precision.
fn pad_time(body: &str, time: &str) -> String {
    match time.matches(':').count() {
        0 => format!("{body}:00:00"),
        1 => format!("{body}:00"),
        _ => body.to_string(),
    }
}

fn local_precision(time: &str) -> &'static str {
    match time.matches(':').count() {
        0 => "local date-time (hour)",
        1 => "local date-time (minute)",
        _ => "local date-time",
    }
}

fn zoned_precision(time: &str) -> &'static str {
    match time.matches(':').count() {
        0 => "date-time with zone (hour)",
        1 => "date-time with zone (minute)",
        _ => "RFC 3339",
    }
}

fn malformed(value: &str, layout: &'static str, source: chrono::ParseError) -> TimeError {
    TimeError::MalformedTimestamp {
        expression: value.to_string(),
        layout,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn reference() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2020-06-15T12:00:00+02:00").unwrap()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(resolve("all", reference()).unwrap(), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(resolve("now", reference()).unwrap(), reference());
    }

    #[test]
    fn test_durations_subtract_from_reference() {
        for (expr, delta) in [
            ("42m", Duration::minutes(42)),
            ("1h", Duration::hours(1)),
            ("90s", Duration::seconds(90)),
            ("1h30m", Duration::minutes(90)),
            ("-10m", Duration::minutes(-10)),
        ] {
            assert_eq!(resolve(expr, reference()).unwrap(), reference() - delta, "{expr}");
        }
    }

    #[test]
    fn test_zero_is_unix_seconds_not_duration() {
        // As a duration "0" would resolve to the reference itself.
        assert_eq!(resolve("0", reference()).unwrap(), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_unix_seconds() {
        assert_eq!(
            resolve("1357133017", reference()).unwrap(),
            utc("2013-01-02T13:23:37Z")
        );
    }

    #[test]
    fn test_local_second_precision() {
        assert_eq!(
            resolve("2013-01-02T13:23:37", reference()).unwrap(),
            utc("2013-01-02T11:23:37Z")
        );
    }

    #[test]
    fn test_local_hour_and_minute_precision() {
        assert_eq!(
            resolve("2013-01-02T13", reference()).unwrap(),
            utc("2013-01-02T11:00:00Z")
        );
        assert_eq!(
            resolve("2013-01-02T13:23", reference()).unwrap(),
            utc("2013-01-02T11:23:00Z")
        );
    }

    #[test]
    fn test_local_fractional_and_date_only() {
        assert_eq!(
            resolve("2013-01-02T13:23:37.250", reference()).unwrap(),
            utc("2013-01-02T11:23:37.250Z")
        );
        assert_eq!(
            resolve("2013-01-02", reference()).unwrap(),
            utc("2013-01-01T22:00:00Z")
        );
    }

    #[test]
    fn test_zone_aware_layouts() {
        assert_eq!(
            resolve("2013-01-02T13:23:37Z", reference()).unwrap(),
            utc("2013-01-02T13:23:37Z")
        );
        assert_eq!(
            resolve("2013-01-02T13:23:37+05:00", reference()).unwrap(),
            utc("2013-01-02T08:23:37Z")
        );
        assert_eq!(
            resolve("2013-01-02T13:23-07:00", reference()).unwrap(),
            utc("2013-01-02T20:23:00Z")
        );
        assert_eq!(
            resolve("2013-01-02T13Z", reference()).unwrap(),
            utc("2013-01-02T13:00:00Z")
        );
        assert_eq!(
            resolve("2013-01-02T13:23:37.5Z", reference()).unwrap(),
            utc("2013-01-02T13:23:37.5Z")
        );
    }

    #[test]
    fn test_zone_aware_date_only() {
        assert_eq!(
            resolve("2013-01-02Z", reference()).unwrap(),
            utc("2013-01-02T00:00:00Z")
        );
        assert_eq!(
            resolve("2013-01-02-07:00", reference()).unwrap(),
            utc("2013-01-02T07:00:00Z")
        );
    }

    #[test]
    fn test_zone_aware_round_trip_ignores_reference_zone() {
        let t = utc("2019-11-05T08:09:10.123456789Z");
        let other = DateTime::parse_from_rfc3339("2020-01-01T00:00:00-09:30").unwrap();
        for literal in [
            t.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true),
            t.with_timezone(&FixedOffset::east_opt(3600).unwrap())
                .to_rfc3339_opts(chrono::SecondsFormat::Nanos, false),
        ] {
            assert_eq!(resolve(&literal, reference()).unwrap(), t, "{literal}");
            assert_eq!(resolve(&literal, other).unwrap(), t, "{literal}");
        }
    }

    #[test]
    fn test_malformed_date_does_not_fall_back() {
        assert!(matches!(
            resolve("2013-13-02", reference()),
            Err(TimeError::MalformedTimestamp { .. })
        ));
        assert!(matches!(
            resolve("2013-01-02T25:00", reference()),
            Err(TimeError::MalformedTimestamp { .. })
        ));
    }

    #[test]
    fn test_unrecognized_expression() {
        assert!(matches!(
            resolve("yesterday", reference()),
            Err(TimeError::InvalidTimeExpression(_))
        ));
        assert!(matches!(
            resolve("", reference()),
            Err(TimeError::InvalidTimeExpression(_))
        ));
    }
}
