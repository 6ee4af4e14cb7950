//! Recurrence rules and next-occurrence calculation.
//!
//! A rule is stored as a short text specification:
//!
//! | Rule | Meaning |
//! |------|---------|
//! | `y` | every year on the original month and day |
//! | `d N` | every `N` days (`1..=400`) counted from the original date |
//! | `w 1,3,7` | on the listed weekdays (1 = Monday .. 7 = Sunday) |
//! | `m 1,-1 [1,6]` | on the listed days of month (`-1` last, `-2` second to last), optionally restricted to the listed months |
//!
//! [`RecurrenceRule`] performs all validation when parsed, so the evaluators
//! in [`RecurrenceEngine`] only deal with calendar arithmetic.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use thiserror::Error;

/// Storage and wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Largest interval accepted by a daily rule.
pub const MAX_DAILY_INTERVAL: u32 = 400;

const WEEKDAY_RANGE: (i32, i32) = (1, 7);
const MONTH_DAY_RANGE: (i32, i32) = (-2, 31);
const MONTH_RANGE: (i32, i32) = (1, 12);

/// A problem with the arguments of an otherwise recognised rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("rule '{kind}' requires {what}")]
    Missing { kind: char, what: &'static str },

    #[error("'{0}' is not an integer")]
    NotInteger(String),

    #[error("value {value} is outside the allowed range {min}..={max}")]
    OutOfRange { value: i32, min: i32, max: i32 },

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("no recurrence rule specified")]
    NoRule,

    #[error("invalid date '{0}', expected YYYYMMDD")]
    InvalidDate(String),

    #[error("invalid recurrence rule: {0}")]
    Validation(#[from] ValidationError),

    #[error("unsupported recurrence format '{0}'")]
    Unsupported(String),

    #[error("no occurrence found on or after {0}")]
    NoSolution(NaiveDate),

    #[error("date is outside the supported calendar range")]
    DateOverflow,
}

/// Parses an eight digit `YYYYMMDD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, RecurrenceError> {
    let invalid = || RecurrenceError::InvalidDate(value.to_string());

    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let year = value[0..4].parse().map_err(|_| invalid())?;
    let month = value[4..6].parse().map_err(|_| invalid())?;
    let day = value[6..8].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Formats a date as `YYYYMMDD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// How a candidate date compares against the reference date before it is
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// The candidate must lie after the reference date.
    StrictlyAfter,
    /// The candidate may equal the reference date.
    OnOrAfter,
}

impl Boundary {
    #[inline]
    pub fn admits(self, candidate: NaiveDate, now: NaiveDate) -> bool {
        match self {
            Boundary::StrictlyAfter => candidate > now,
            Boundary::OnOrAfter => candidate >= now,
        }
    }
}

/// A parsed and validated recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRule {
    Yearly,
    Daily {
        interval: u32,
    },
    /// Weekdays as written in the rule, 1 = Monday .. 7 = Sunday.
    Weekly {
        weekdays: Vec<u32>,
    },
    /// `days` is kept in evaluation order: non-negative values ascending,
    /// then negative values ascending. Explicit `months` are not sorted and
    /// are searched in the order written, so `m 20 12,3` tries December
    /// before March. `None` means the two-month window around the anchor
    /// date.
    Monthly {
        days: Vec<i32>,
        months: Option<Vec<u32>>,
    },
}

impl RecurrenceRule {
    /// The comparison each kind applies when deciding whether a candidate
    /// is far enough in the future.
    pub fn boundary(&self) -> Boundary {
        match self {
            RecurrenceRule::Yearly | RecurrenceRule::Weekly { .. } => Boundary::StrictlyAfter,
            RecurrenceRule::Daily { .. } | RecurrenceRule::Monthly { .. } => Boundary::OnOrAfter,
        }
    }

    /// The single-letter token that selects this rule.
    pub fn kind(&self) -> char {
        match self {
            RecurrenceRule::Yearly => 'y',
            RecurrenceRule::Daily { .. } => 'd',
            RecurrenceRule::Weekly { .. } => 'w',
            RecurrenceRule::Monthly { .. } => 'm',
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let kind = tokens.next().ok_or(RecurrenceError::NoRule)?;

        let rule = match kind {
            "y" => RecurrenceRule::Yearly,
            "d" => {
                let arg = tokens.next().ok_or(ValidationError::Missing {
                    kind: 'd',
                    what: "an interval in days",
                })?;
                let interval = parse_int(arg, 1, MAX_DAILY_INTERVAL as i32)?;
                RecurrenceRule::Daily {
                    interval: interval as u32,
                }
            }
            "w" => {
                let arg = tokens.next().ok_or(ValidationError::Missing {
                    kind: 'w',
                    what: "a list of weekdays",
                })?;
                let weekdays = parse_list(arg, WEEKDAY_RANGE)?
                    .into_iter()
                    .map(|d| d as u32)
                    .collect();
                RecurrenceRule::Weekly { weekdays }
            }
            "m" => {
                let arg = tokens.next().ok_or(ValidationError::Missing {
                    kind: 'm',
                    what: "a list of days of month",
                })?;
                let mut days = parse_list(arg, MONTH_DAY_RANGE)?;
                sort_month_days(&mut days);
                let months = tokens
                    .next()
                    .map(|arg| parse_list(arg, MONTH_RANGE))
                    .transpose()?
                    .map(|months| months.into_iter().map(|m| m as u32).collect());
                RecurrenceRule::Monthly { days, months }
            }
            other => return Err(RecurrenceError::Unsupported(other.to_string())),
        };

        if let Some(extra) = tokens.next() {
            return Err(ValidationError::UnexpectedArgument(extra.to_string()).into());
        }

        Ok(rule)
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceRule::Yearly => write!(f, "y"),
            RecurrenceRule::Daily { interval } => write!(f, "d {}", interval),
            RecurrenceRule::Weekly { weekdays } => write!(f, "w {}", join(weekdays)),
            RecurrenceRule::Monthly { days, months } => {
                write!(f, "m {}", join(days))?;
                if let Some(months) = months {
                    write!(f, " {}", join(months))?;
                }
                Ok(())
            }
        }
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_int(value: &str, min: i32, max: i32) -> Result<i32, ValidationError> {
    let number: i32 = value
        .parse()
        .map_err(|_| ValidationError::NotInteger(value.to_string()))?;

    if number < min || number > max {
        return Err(ValidationError::OutOfRange {
            value: number,
            min,
            max,
        });
    }
    Ok(number)
}

fn parse_list(value: &str, (min, max): (i32, i32)) -> Result<Vec<i32>, ValidationError> {
    value.split(',').map(|item| parse_int(item, min, max)).collect()
}

/// Non-negative days ascending, followed by negative days ascending, so
/// `[-1, 5, -2, 1]` becomes `[1, 5, -2, -1]`.
fn sort_month_days(days: &mut [i32]) {
    days.sort_by_key(|&day| (day < 0, day));
}

/// Computes next occurrences for recurrence rules.
///
/// The engine holds no state besides the calendar year used to lay out
/// months for monthly rules. Left unset, that year is read from the local
/// clock on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecurrenceEngine {
    calendar_year: Option<i32>,
}

impl RecurrenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine that lays out monthly rules in `year` instead of the
    /// current year.
    pub fn with_year(year: i32) -> Self {
        Self {
            calendar_year: Some(year),
        }
    }

    pub fn calendar_year(&self) -> i32 {
        self.calendar_year.unwrap_or_else(|| Local::now().year())
    }

    /// Computes the next occurrence of `rule` for a task originally due on
    /// `original` (`YYYYMMDD`), relative to `now`.
    ///
    /// A blank rule (empty or whitespace only) is [`RecurrenceError::NoRule`].
    pub fn next_date(
        &self,
        now: NaiveDate,
        original: &str,
        rule: &str,
    ) -> Result<NaiveDate, RecurrenceError> {
        if rule.trim().is_empty() {
            return Err(RecurrenceError::NoRule);
        }
        let original = parse_date(original)?;
        let rule: RecurrenceRule = rule.parse()?;

        self.next_occurrence(now, original, &rule)
    }

    /// Same as [`RecurrenceEngine::next_date`], formatted as `YYYYMMDD`.
    pub fn next_date_string(
        &self,
        now: NaiveDate,
        original: &str,
        rule: &str,
    ) -> Result<String, RecurrenceError> {
        self.next_date(now, original, rule).map(format_date)
    }

    pub fn next_occurrence(
        &self,
        now: NaiveDate,
        original: NaiveDate,
        rule: &RecurrenceRule,
    ) -> Result<NaiveDate, RecurrenceError> {
        let boundary = rule.boundary();

        let next = match rule {
            RecurrenceRule::Yearly => next_yearly(now, original, boundary),
            RecurrenceRule::Daily { interval } => next_daily(now, original, *interval, boundary),
            RecurrenceRule::Weekly { weekdays } => next_weekly(now, weekdays, boundary),
            RecurrenceRule::Monthly { days, months } => {
                self.next_monthly(now, original, days, months.as_deref(), boundary)
            }
        }?;

        tracing::debug!(%now, %original, %rule, %next, "computed next occurrence");
        Ok(next)
    }

    fn next_monthly(
        &self,
        now: NaiveDate,
        original: NaiveDate,
        days: &[i32],
        months: Option<&[u32]>,
        boundary: Boundary,
    ) -> Result<NaiveDate, RecurrenceError> {
        let months = match months {
            Some(months) => months.to_vec(),
            None => {
                let anchor = if original > now {
                    original.month()
                } else {
                    now.month()
                };
                vec![anchor, anchor + 1]
            }
        };

        let year = self.calendar_year();
        let spans = months
            .iter()
            .map(|&month| MonthSpan::new(year, month))
            .collect::<Result<Vec<_>, _>>()?;

        for &day in days {
            for span in &spans {
                let Some(candidate) = span.resolve(day) else {
                    continue;
                };
                if boundary.admits(candidate, now) {
                    return Ok(candidate);
                }
            }
        }

        Err(RecurrenceError::NoSolution(now))
    }
}

/// Computes the next occurrence with an engine that reads the calendar year
/// from the local clock.
pub fn next_date(now: NaiveDate, original: &str, rule: &str) -> Result<String, RecurrenceError> {
    RecurrenceEngine::new().next_date_string(now, original, rule)
}

fn next_yearly(
    now: NaiveDate,
    original: NaiveDate,
    boundary: Boundary,
) -> Result<NaiveDate, RecurrenceError> {
    let mut candidate = add_year(original)?;
    while !boundary.admits(candidate, now) {
        candidate = add_year(candidate)?;
    }
    Ok(candidate)
}

/// Moves a date one year ahead. Days past the end of the target month roll
/// into the following month, so Feb 29 becomes Mar 1 in a common year.
fn add_year(date: NaiveDate) -> Result<NaiveDate, RecurrenceError> {
    let first = NaiveDate::from_ymd_opt(date.year() + 1, date.month(), 1)
        .ok_or(RecurrenceError::DateOverflow)?;
    first
        .checked_add_days(Days::new(u64::from(date.day() - 1)))
        .ok_or(RecurrenceError::DateOverflow)
}

fn next_daily(
    now: NaiveDate,
    original: NaiveDate,
    interval: u32,
    boundary: Boundary,
) -> Result<NaiveDate, RecurrenceError> {
    let step = Days::new(u64::from(interval));
    let mut candidate = original
        .checked_add_days(step)
        .ok_or(RecurrenceError::DateOverflow)?;

    // Skip whole intervals in one go; the loop below settles the boundary.
    let lag = (now - candidate).num_days();
    if lag > 0 {
        let skipped = lag as u64 / u64::from(interval) * u64::from(interval);
        candidate = candidate
            .checked_add_days(Days::new(skipped))
            .ok_or(RecurrenceError::DateOverflow)?;
    }

    while !boundary.admits(candidate, now) {
        candidate = candidate
            .checked_add_days(step)
            .ok_or(RecurrenceError::DateOverflow)?;
    }
    Ok(candidate)
}

fn next_weekly(
    now: NaiveDate,
    weekdays: &[u32],
    boundary: Boundary,
) -> Result<NaiveDate, RecurrenceError> {
    for offset in 1..=7 {
        let candidate = now
            .checked_add_days(Days::new(offset))
            .ok_or(RecurrenceError::DateOverflow)?;
        // Sunday is 0 here and may be written as 7 in the rule.
        let weekday = candidate.weekday().num_days_from_sunday();
        let matches = weekdays
            .iter()
            .any(|&day| day == weekday || (weekday == 0 && day == 7));

        if matches && boundary.admits(candidate, now) {
            return Ok(candidate);
        }
    }

    Err(RecurrenceError::NoSolution(now))
}

/// The days of one calendar month.
#[derive(Debug, Clone, Copy)]
struct MonthSpan {
    first: NaiveDate,
    len: i32,
}

impl MonthSpan {
    /// Month numbers past 12 continue into the following year.
    fn new(year: i32, month: u32) -> Result<Self, RecurrenceError> {
        let year = year + ((month - 1) / 12) as i32;
        let month = (month - 1) % 12 + 1;

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(RecurrenceError::DateOverflow)?;
        let next = first
            .checked_add_months(Months::new(1))
            .ok_or(RecurrenceError::DateOverflow)?;

        Ok(Self {
            first,
            len: (next - first).num_days() as i32,
        })
    }

    /// Positive days count from the 1st, negative days back from the last.
    /// Day 0 and days past the end of the month resolve to nothing.
    fn resolve(&self, day: i32) -> Option<NaiveDate> {
        let index = match day {
            d if d > 0 => d - 1,
            d if d < 0 => self.len + d,
            _ => return None,
        };
        if index < 0 || index >= self.len {
            return None;
        }
        self.first.checked_add_days(Days::new(index as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(value: &str) -> NaiveDate {
        parse_date(value).unwrap()
    }

    fn engine() -> RecurrenceEngine {
        RecurrenceEngine::with_year(2023)
    }

    mod parse_tests {
        use super::*;

        #[rstest]
        #[case("y", RecurrenceRule::Yearly)]
        #[case("d 1", RecurrenceRule::Daily { interval: 1 })]
        #[case("d 400", RecurrenceRule::Daily { interval: 400 })]
        #[case("w 7,1", RecurrenceRule::Weekly { weekdays: vec![7, 1] })]
        #[case("m -1,15,-2,1", RecurrenceRule::Monthly { days: vec![1, 15, -2, -1], months: None })]
        #[case("m 0,31 12,2", RecurrenceRule::Monthly { days: vec![0, 31], months: Some(vec![12, 2]) })]
        #[case("  d   7 ", RecurrenceRule::Daily { interval: 7 })]
        fn test_parse_valid(#[case] input: &str, #[case] expected: RecurrenceRule) {
            assert_eq!(input.parse::<RecurrenceRule>().unwrap(), expected);
        }

        #[rstest]
        #[case("d 401", ValidationError::OutOfRange { value: 401, min: 1, max: 400 })]
        #[case("d 0", ValidationError::OutOfRange { value: 0, min: 1, max: 400 })]
        #[case("d x", ValidationError::NotInteger("x".to_string()))]
        #[case("w 8", ValidationError::OutOfRange { value: 8, min: 1, max: 7 })]
        #[case("w 0", ValidationError::OutOfRange { value: 0, min: 1, max: 7 })]
        #[case("w 1,,3", ValidationError::NotInteger("".to_string()))]
        #[case("m -3", ValidationError::OutOfRange { value: -3, min: -2, max: 31 })]
        #[case("m 32", ValidationError::OutOfRange { value: 32, min: -2, max: 31 })]
        #[case("m 1 13", ValidationError::OutOfRange { value: 13, min: 1, max: 12 })]
        #[case("m 1 0", ValidationError::OutOfRange { value: 0, min: 1, max: 12 })]
        #[case("y 2", ValidationError::UnexpectedArgument("2".to_string()))]
        #[case("d 5 6", ValidationError::UnexpectedArgument("6".to_string()))]
        #[case("m 1 2 3", ValidationError::UnexpectedArgument("3".to_string()))]
        fn test_parse_rejects_bad_arguments(#[case] input: &str, #[case] expected: ValidationError) {
            assert_eq!(
                input.parse::<RecurrenceRule>().unwrap_err(),
                RecurrenceError::Validation(expected)
            );
        }

        #[rstest]
        #[case("d")]
        #[case("w")]
        #[case("m")]
        fn test_parse_missing_argument(#[case] input: &str) {
            assert!(matches!(
                input.parse::<RecurrenceRule>(),
                Err(RecurrenceError::Validation(ValidationError::Missing { .. }))
            ));
        }

        #[test]
        fn test_parse_unsupported_kind() {
            assert_eq!(
                "x 1".parse::<RecurrenceRule>().unwrap_err(),
                RecurrenceError::Unsupported("x".to_string())
            );
            assert_eq!(
                "Y".parse::<RecurrenceRule>().unwrap_err(),
                RecurrenceError::Unsupported("Y".to_string())
            );
        }

        #[test]
        fn test_display_is_canonical() {
            let rule: RecurrenceRule = "m  -1,3   2,1".parse().unwrap();
            assert_eq!(rule.to_string(), "m 3,-1 2,1");
            assert_eq!("w 1,3".parse::<RecurrenceRule>().unwrap().to_string(), "w 1,3");
            assert_eq!("y".parse::<RecurrenceRule>().unwrap().to_string(), "y");
        }

        #[test]
        fn test_boundaries_per_kind() {
            assert_eq!(RecurrenceRule::Yearly.boundary(), Boundary::StrictlyAfter);
            assert_eq!(
                RecurrenceRule::Daily { interval: 1 }.boundary(),
                Boundary::OnOrAfter
            );
            assert_eq!(
                RecurrenceRule::Weekly { weekdays: vec![1] }.boundary(),
                Boundary::StrictlyAfter
            );
            assert_eq!(
                RecurrenceRule::Monthly { days: vec![1], months: None }.boundary(),
                Boundary::OnOrAfter
            );
        }
    }

    mod date_tests {
        use super::*;

        #[test]
        fn test_parse_date() {
            assert_eq!(
                parse_date("20230315").unwrap(),
                NaiveDate::from_ymd_opt(2023, 3, 15).unwrap()
            );
        }

        #[rstest]
        #[case("")]
        #[case("2023031")]
        #[case("202303150")]
        #[case("2023-03-15")]
        #[case("20230230")]
        #[case("20231301")]
        #[case("+2023031")]
        fn test_parse_date_rejects(#[case] input: &str) {
            assert_eq!(
                parse_date(input).unwrap_err(),
                RecurrenceError::InvalidDate(input.to_string())
            );
        }

        #[test]
        fn test_format_date() {
            let date = NaiveDate::from_ymd_opt(987, 1, 2).unwrap();
            assert_eq!(format_date(date), "09870102");
        }
    }

    mod engine_tests {
        use super::*;

        const NOW: &str = "20230315";

        #[rstest]
        #[case("20230301", "y", "20240301")]
        #[case("20230310", "d 5", "20230315")]
        #[case("20230301", "w 1,3", "20230320")]
        #[case("20230301", "m -1", "20230331")]
        fn test_reference_scenarios(
            #[case] original: &str,
            #[case] rule: &str,
            #[case] expected: &str,
        ) {
            let next = engine().next_date_string(date(NOW), original, rule).unwrap();
            assert_eq!(next, expected);
        }

        #[test]
        fn test_empty_rule() {
            assert_eq!(
                engine().next_date(date(NOW), "20230301", "").unwrap_err(),
                RecurrenceError::NoRule
            );
            assert_eq!(
                engine().next_date(date(NOW), "20230301", "   ").unwrap_err(),
                RecurrenceError::NoRule
            );
        }

        #[test]
        fn test_empty_rule_checked_before_date() {
            assert_eq!(
                engine().next_date(date(NOW), "garbage", "").unwrap_err(),
                RecurrenceError::NoRule
            );
        }

        #[test]
        fn test_invalid_original_date() {
            assert_eq!(
                engine().next_date(date(NOW), "15.03.2023", "y").unwrap_err(),
                RecurrenceError::InvalidDate("15.03.2023".to_string())
            );
        }

        #[test]
        fn test_weekday_out_of_range() {
            assert!(matches!(
                engine().next_date(date(NOW), "20230301", "w 8"),
                Err(RecurrenceError::Validation(ValidationError::OutOfRange { value: 8, .. }))
            ));
        }

        #[test]
        fn test_yearly_advances_past_equal_date() {
            assert_eq!(
                engine().next_date_string(date("20240301"), "20230301", "y").unwrap(),
                "20250301"
            );
        }

        #[test]
        fn test_yearly_from_future_original_still_moves_a_year() {
            assert_eq!(
                engine().next_date_string(date(NOW), "20250601", "y").unwrap(),
                "20260601"
            );
        }

        #[test]
        fn test_yearly_leap_day_rolls_into_march() {
            assert_eq!(
                engine().next_date_string(date("20240301"), "20240229", "y").unwrap(),
                "20250301"
            );
            assert_eq!(
                engine().next_date_string(date("20270101"), "20240229", "y").unwrap(),
                "20270301"
            );
        }

        #[test]
        fn test_daily_accepts_equal_date() {
            assert_eq!(
                engine().next_date_string(date("20230320"), "20230310", "d 5").unwrap(),
                "20230320"
            );
            assert_eq!(
                engine().next_date_string(date("20230321"), "20230310", "d 5").unwrap(),
                "20230325"
            );
        }

        #[test]
        fn test_daily_always_moves_at_least_one_interval() {
            assert_eq!(
                engine().next_date_string(date(NOW), "20230401", "d 3").unwrap(),
                "20230404"
            );
        }

        #[test]
        fn test_daily_interval_limits() {
            assert_eq!(
                engine().next_date_string(date(NOW), "20230101", "d 400").unwrap(),
                "20240205"
            );
            assert!(matches!(
                engine().next_date(date(NOW), "20230101", "d 401"),
                Err(RecurrenceError::Validation(ValidationError::OutOfRange { value: 401, .. }))
            ));
        }

        #[test]
        fn test_daily_far_past_original() {
            assert_eq!(
                engine().next_date_string(date(NOW), "20000101", "d 7").unwrap(),
                "20230318"
            );
        }

        #[test]
        fn test_weekly_never_returns_today() {
            // 2023-03-15 is a Wednesday.
            assert_eq!(
                engine().next_date_string(date(NOW), "20230101", "w 3").unwrap(),
                "20230322"
            );
        }

        #[test]
        fn test_weekly_sunday_alias() {
            assert_eq!(
                engine().next_date_string(date(NOW), "20230101", "w 7").unwrap(),
                "20230319"
            );
        }

        #[test]
        fn test_weekly_order_of_days_is_irrelevant() {
            assert_eq!(
                engine().next_date_string(date(NOW), "20230101", "w 6,4").unwrap(),
                "20230316"
            );
        }

        #[test]
        fn test_monthly_accepts_equal_date() {
            assert_eq!(
                engine().next_date_string(date(NOW), "20230101", "m 15").unwrap(),
                "20230315"
            );
        }

        #[test]
        fn test_monthly_last_day_of_thirty_day_month() {
            assert_eq!(
                engine().next_date_string(date("20230405"), "20230101", "m -1").unwrap(),
                "20230430"
            );
        }

        #[test]
        fn test_monthly_second_to_last_day() {
            assert_eq!(
                engine().next_date_string(date("20230201"), "20230101", "m -2").unwrap(),
                "20230227"
            );
        }

        #[test]
        fn test_monthly_positive_days_take_precedence() {
            // 31 is tried in every month of the window before -1 is.
            assert_eq!(
                engine().next_date_string(date("20230401"), "20230101", "m -1,31").unwrap(),
                "20230531"
            );
            // 16 in March wins over the last day of March.
            assert_eq!(
                engine().next_date_string(date(NOW), "20230101", "m -1,16").unwrap(),
                "20230316"
            );
        }

        #[test]
        fn test_monthly_day_order_beats_month_order() {
            // Day 1 of April is found before day 20 of March.
            assert_eq!(
                engine().next_date_string(date(NOW), "20230101", "m 20,1").unwrap(),
                "20230401"
            );
        }

        #[test]
        fn test_monthly_window_follows_future_original() {
            assert_eq!(
                engine().next_date_string(date(NOW), "20230610", "m 5").unwrap(),
                "20230605"
            );
        }

        #[test]
        fn test_monthly_window_wraps_into_next_year() {
            let engine = RecurrenceEngine::with_year(2023);
            assert_eq!(
                engine.next_date_string(date("20231220"), "20230101", "m 10").unwrap(),
                "20240110"
            );
        }

        #[test]
        fn test_monthly_explicit_months_in_given_order() {
            assert_eq!(
                engine().next_date_string(date(NOW), "20230101", "m 20 12,3").unwrap(),
                "20231220"
            );
            assert_eq!(
                engine().next_date_string(date(NOW), "20230101", "m 20 3,12").unwrap(),
                "20230320"
            );
        }

        #[test]
        fn test_monthly_skips_unreachable_days() {
            assert_eq!(
                engine().next_date_string(date("20230201"), "20230101", "m 31 2,3").unwrap(),
                "20230331"
            );
        }

        #[test]
        fn test_monthly_day_zero_never_matches() {
            assert_eq!(
                engine().next_date(date(NOW), "20230101", "m 0 3").unwrap_err(),
                RecurrenceError::NoSolution(date(NOW))
            );
        }

        #[test]
        fn test_monthly_no_solution() {
            assert_eq!(
                engine().next_date(date(NOW), "20230101", "m 30 2").unwrap_err(),
                RecurrenceError::NoSolution(date(NOW))
            );
            assert_eq!(
                engine().next_date(date(NOW), "20230101", "m 1 1,2").unwrap_err(),
                RecurrenceError::NoSolution(date(NOW))
            );
        }

        #[test]
        fn test_monthly_uses_engine_calendar_year() {
            let engine = RecurrenceEngine::with_year(2024);
            assert_eq!(
                engine.next_date_string(date(NOW), "20230101", "m -1 2").unwrap(),
                "20240229"
            );
            assert_eq!(
                RecurrenceEngine::with_year(2022)
                    .next_date(date(NOW), "20230101", "m -1 2")
                    .unwrap_err(),
                RecurrenceError::NoSolution(date(NOW))
            );
        }

        #[test]
        fn test_default_engine_reads_local_year() {
            assert_eq!(RecurrenceEngine::new().calendar_year(), Local::now().year());
            assert_eq!(RecurrenceEngine::with_year(1999).calendar_year(), 1999);
        }

        #[test]
        fn test_unsupported_rule_reported_after_date_check() {
            assert_eq!(
                engine().next_date(date(NOW), "20230101", "q 1").unwrap_err(),
                RecurrenceError::Unsupported("q".to_string())
            );
            assert_eq!(
                engine().next_date(date(NOW), "bad", "q 1").unwrap_err(),
                RecurrenceError::InvalidDate("bad".to_string())
            );
        }

        #[test]
        fn test_overflow_is_an_error() {
            let now = NaiveDate::MAX;
            assert_eq!(
                engine().next_date(now, "20230101", "w 1").unwrap_err(),
                RecurrenceError::DateOverflow
            );
        }
    }

    mod month_span_tests {
        use super::*;

        #[test]
        fn test_month_lengths() {
            assert_eq!(MonthSpan::new(2023, 2).unwrap().len, 28);
            assert_eq!(MonthSpan::new(2024, 2).unwrap().len, 29);
            assert_eq!(MonthSpan::new(2023, 4).unwrap().len, 30);
            assert_eq!(MonthSpan::new(2023, 12).unwrap().len, 31);
        }

        #[test]
        fn test_month_thirteen_is_next_january() {
            let span = MonthSpan::new(2023, 13).unwrap();
            assert_eq!(span.first, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        }

        #[test]
        fn test_resolve() {
            let april = MonthSpan::new(2023, 4).unwrap();
            assert_eq!(april.resolve(1), NaiveDate::from_ymd_opt(2023, 4, 1));
            assert_eq!(april.resolve(30), NaiveDate::from_ymd_opt(2023, 4, 30));
            assert_eq!(april.resolve(31), None);
            assert_eq!(april.resolve(-1), NaiveDate::from_ymd_opt(2023, 4, 30));
            assert_eq!(april.resolve(-2), NaiveDate::from_ymd_opt(2023, 4, 29));
            assert_eq!(april.resolve(0), None);
        }
    }
}
