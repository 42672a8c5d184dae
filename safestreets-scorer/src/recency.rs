//! Exponential recency decay and report timestamp parsing.
#![forbid(unsafe_code)]

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::AttributionConfigError;

/// Decay rate per day applied when none is configured.
pub const DEFAULT_DECAY_RATE: f64 = 0.03;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Offset-aware layouts, including the `2024/01/15 18:30:00+00` form used by
/// DC open data.
const ZONED_FORMATS: [&str; 2] = ["%Y/%m/%d %H:%M:%S%#z", "%Y-%m-%d %H:%M:%S%#z"];

/// Layouts without an offset, read as UTC.
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Digit-only date layout, `YYYYMMDD`.
const COMPACT_DATE_FORMAT: &str = "%Y%m%d";
const COMPACT_DATE_LEN: usize = 8;

/// Epoch milliseconds shorter than this predate 1970-01-02 and are treated
/// as malformed rather than as ancient reports.
const MIN_EPOCH_MILLIS_DIGITS: usize = 10;

/// Multiplier `exp(-rate * age_days)` applied to a crime's base weight.
///
/// Ages are clamped to zero, so the multiplier always lies in `[0, 1]`.
///
/// # Examples
/// ```
/// use safestreets_scorer::RecencyDecay;
///
/// let decay = RecencyDecay::default();
/// assert_eq!(decay.multiplier(0.0), 1.0);
/// assert!((decay.multiplier(10.0) - (-0.3_f64).exp()).abs() < 1e-12);
/// assert_eq!(decay.multiplier(-5.0), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecencyDecay {
    rate_per_day: f64,
}

impl RecencyDecay {
    /// Create a decay with `rate_per_day`.
    ///
    /// # Errors
    ///
    /// Returns [`AttributionConfigError::InvalidDecayRate`] when the rate is
    /// negative or not finite.
    pub fn new(rate_per_day: f64) -> Result<Self, AttributionConfigError> {
        if !rate_per_day.is_finite() || rate_per_day < 0.0 {
            return Err(AttributionConfigError::InvalidDecayRate { rate: rate_per_day });
        }
        Ok(Self { rate_per_day })
    }

    /// Configured rate per day.
    #[must_use]
    pub const fn rate_per_day(&self) -> f64 {
        self.rate_per_day
    }

    /// Multiplier for a crime `age_days` old.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "exponential decay is inherently floating point"
    )]
    pub fn multiplier(&self, age_days: f64) -> f64 {
        let age = if age_days.is_nan() { 0.0 } else { age_days.max(0.0) };
        (-self.rate_per_day * age).exp()
    }
}

impl Default for RecencyDecay {
    fn default() -> Self {
        Self {
            rate_per_day: DEFAULT_DECAY_RATE,
        }
    }
}

/// Fractional days between `reported` and `now`, clamped at zero.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use safestreets_scorer::age_in_days;
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 11, 12, 0, 0).unwrap();
/// let then = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(age_in_days(then, now), 10.5);
/// assert_eq!(age_in_days(now, then), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "millisecond spans convert to fractional days"
)]
pub fn age_in_days(reported: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = now.signed_duration_since(reported).num_milliseconds();
    (millis as f64 / MILLIS_PER_DAY).max(0.0)
}

/// Parse a report timestamp as supplied by a crime feed.
///
/// Accepts RFC 3339, `YYYY/MM/DD HH:MM:SS±hh[mm]`, naive ISO date-times (read
/// as UTC), bare dates including `YYYYMMDD` (midnight UTC) and epoch
/// milliseconds of at least ten digits. Shorter digit strings are rejected.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use safestreets_scorer::parse_report_timestamp;
///
/// let expected = Utc.with_ymd_and_hms(2024, 1, 15, 18, 30, 0).unwrap();
/// assert_eq!(parse_report_timestamp("2024/01/15 18:30:00+00"), Some(expected));
/// assert_eq!(parse_report_timestamp("2024-01-15T18:30:00Z"), Some(expected));
/// assert_eq!(parse_report_timestamp("1705343400000"), Some(expected));
/// assert_eq!(
///     parse_report_timestamp("20240115"),
///     Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).single(),
/// );
/// assert_eq!(parse_report_timestamp("last tuesday"), None);
/// ```
#[must_use]
pub fn parse_report_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(parsed) = ZONED_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(text, format).ok())
    {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(parsed) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(parsed.and_utc());
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
    {
        return date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if text.len() == COMPACT_DATE_LEN {
        return NaiveDate::parse_from_str(text, COMPACT_DATE_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc());
    }
    if text.len() < MIN_EPOCH_MILLIS_DIGITS {
        return None;
    }
    text.parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case(-0.01)]
    #[case(f64::NAN)]
    #[case(f64::NEG_INFINITY)]
    fn invalid_rates_are_rejected(#[case] rate: f64) {
        assert!(RecencyDecay::new(rate).is_err());
    }

    #[rstest]
    fn zero_rate_never_decays() {
        let decay = RecencyDecay::new(0.0).expect("zero is valid");
        assert_eq!(decay.multiplier(10_000.0), 1.0);
    }

    #[rstest]
    fn nan_age_is_treated_as_fresh() {
        assert_eq!(RecencyDecay::default().multiplier(f64::NAN), 1.0);
    }

    #[rstest]
    #[case("2023-06-01T12:00:00+02:00", 2023, 6, 1, 10)]
    #[case("2023-06-01T10:00:00", 2023, 6, 1, 10)]
    #[case("2023-06-01 10:00:00.250", 2023, 6, 1, 10)]
    #[case("2023/06/01 10:00:00", 2023, 6, 1, 10)]
    #[case("2023/06/01 06:00:00-0400", 2023, 6, 1, 10)]
    #[case("2023-06-01", 2023, 6, 1, 0)]
    #[case("20230601", 2023, 6, 1, 0)]
    #[case("1685613600000", 2023, 6, 1, 10)]
    fn accepted_layouts(
        #[case] raw: &str,
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
        #[case] hour: u32,
    ) {
        let parsed = parse_report_timestamp(raw).expect("timestamp parses");
        let expected = Utc
            .with_ymd_and_hms(year, month, day, hour, 0, 0)
            .single()
            .expect("valid date");
        assert_eq!(parsed.date_naive(), expected.date_naive());
        assert_eq!(parsed.format("%H").to_string(), expected.format("%H").to_string());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("2023-13-45")]
    #[case("yesterday")]
    #[case("-1705343400000")]
    #[case("20231345")]
    #[case("1234")]
    fn rejected_layouts(#[case] raw: &str) {
        assert_eq!(parse_report_timestamp(raw), None);
    }
}
