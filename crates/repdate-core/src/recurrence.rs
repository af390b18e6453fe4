//! Recurrence expansion for repeating dates.
//!
//! A [`RecurrenceRule`] describes a window (`start..=end`), a repeat mode and an
//! interval. Expanding it yields every occurrence inside the window, in
//! ascending order, bounded by [`MAX_OCCURRENCES`].
//!
//! Day arithmetic is performed on UTC calendar dates. The time-of-day of the
//! rule's start is carried over unchanged to every occurrence.

use std::fmt;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Hard upper bound on the number of occurrences a single expansion returns.
///
/// Reaching it is a silent truncation; callers that care can compare the
/// returned length against this constant or use [`expand_with_diagnostics`].
pub const MAX_OCCURRENCES: usize = 9999;

/// Days between 0001-01-01 (day 1 of the common era) and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// How a rule repeats between its start and end bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "TEXT", rename_all = "kebab-case")]
pub enum RepeatMode {
    /// Every `interval` days.
    Days,
    /// Every `interval` weeks.
    #[default]
    Weeks,
    /// Same day of the month, every `interval` months.
    MonthsByDate,
    /// Same weekday in the same week bucket of the month, every `interval` months.
    MonthsByWeekday,
    /// Same month and day, every `interval` years.
    YearsByDate,
    /// Same weekday in the same week bucket of the year, every `interval` years.
    YearsByWeekday,
}

impl RepeatMode {
    pub const ALL: [RepeatMode; 6] = [
        RepeatMode::Days,
        RepeatMode::Weeks,
        RepeatMode::MonthsByDate,
        RepeatMode::MonthsByWeekday,
        RepeatMode::YearsByDate,
        RepeatMode::YearsByWeekday,
    ];

    /// Maps a mode keyword to a mode. Matching ignores case and surrounding
    /// whitespace; anything unrecognized repeats weekly.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim().to_lowercase().as_str() {
            "days" => RepeatMode::Days,
            "weeks" => RepeatMode::Weeks,
            "months-by-date" => RepeatMode::MonthsByDate,
            "months-by-weekday" => RepeatMode::MonthsByWeekday,
            "years-by-date" => RepeatMode::YearsByDate,
            "years-by-weekday" => RepeatMode::YearsByWeekday,
            _ => RepeatMode::Weeks,
        }
    }

    /// The keyword this mode is stored and parsed as.
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatMode::Days => "days",
            RepeatMode::Weeks => "weeks",
            RepeatMode::MonthsByDate => "months-by-date",
            RepeatMode::MonthsByWeekday => "months-by-weekday",
            RepeatMode::YearsByDate => "years-by-date",
            RepeatMode::YearsByWeekday => "years-by-weekday",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            RepeatMode::Days => "Days",
            RepeatMode::Weeks => "Weeks",
            RepeatMode::MonthsByDate => "Months (by Date)",
            RepeatMode::MonthsByWeekday => "Months (by Weekday)",
            RepeatMode::YearsByDate => "Years (by Date)",
            RepeatMode::YearsByWeekday => "Years (by Weekday)",
        }
    }
}

impl From<&str> for RepeatMode {
    fn from(keyword: &str) -> Self {
        RepeatMode::from_keyword(keyword)
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coerces a raw repeat interval to a usable one: anything below 1 becomes 1.
pub fn normalize_interval(raw: i64) -> u32 {
    if raw > 0 {
        u32::try_from(raw).unwrap_or(u32::MAX)
    } else {
        1
    }
}

/// A single recurrence rule.
///
/// The interval is normalized at construction, so a rule always holds an
/// interval of at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecurrenceRule {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    mode: RepeatMode,
    interval: u32,
}

impl RecurrenceRule {
    /// Creates a rule from its four fields.
    ///
    /// # Arguments
    /// * `start` - First candidate occurrence and alignment anchor
    /// * `end` - Inclusive upper bound; nothing after it is produced
    /// * `mode` - How the rule repeats
    /// * `interval` - Units to advance between occurrences; values below 1 are treated as 1
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, mode: RepeatMode, interval: i64) -> Self {
        Self {
            start,
            end,
            mode,
            interval: normalize_interval(interval),
        }
    }

    /// Creates a rule from a mode keyword, falling back to weekly repeats for
    /// unknown keywords.
    pub fn from_keyword(start: DateTime<Utc>, end: DateTime<Utc>, mode: &str, interval: i64) -> Self {
        Self::new(start, end, RepeatMode::from_keyword(mode), interval)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn mode(&self) -> RepeatMode {
        self.mode
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Expands the rule. See [`expand`].
    pub fn expand(&self) -> Vec<DateTime<Utc>> {
        expand(self)
    }

    /// Expands the rule into Unix timestamps (seconds), ready for storage.
    pub fn timestamps(&self) -> Vec<i64> {
        self.expand().into_iter().map(|at| at.timestamp()).collect()
    }
}

/// Result of an expansion along with whether the occurrence cap cut it short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub occurrences: Vec<DateTime<Utc>>,
    /// `true` when at least one more occurrence inside the window was dropped
    /// because [`MAX_OCCURRENCES`] had been reached.
    pub truncated: bool,
}

/// Expands a rule into its ordered occurrences.
///
/// # Behavior
/// - Every occurrence lies within `start..=end`; an inverted window yields nothing
/// - Occurrences are strictly increasing
/// - At most [`MAX_OCCURRENCES`] entries are returned; the rest are dropped silently
pub fn expand(rule: &RecurrenceRule) -> Vec<DateTime<Utc>> {
    expand_with_diagnostics(rule).occurrences
}

/// Expands a rule and reports whether the result was truncated.
pub fn expand_with_diagnostics(rule: &RecurrenceRule) -> Expansion {
    let start = rule.start.naive_utc();
    let mut out = Occurrences::new(rule.end.naive_utc());
    let interval = rule.interval;

    match rule.mode {
        RepeatMode::Days => step(start, &mut out, |at| {
            at.checked_add_days(Days::new(u64::from(interval)))
        }),
        RepeatMode::Weeks => step(start, &mut out, |at| {
            at.checked_add_days(Days::new(u64::from(interval) * 7))
        }),
        RepeatMode::MonthsByDate => {
            let anchor_day = start.day();
            step(start, &mut out, |at| {
                let target = first_of_month(at.date()).checked_add_months(Months::new(interval))?;
                let date = snap_day(target.year(), target.month(), anchor_day)?;
                Some(date.and_time(at.time()))
            })
        }
        RepeatMode::YearsByDate => {
            let (anchor_month, anchor_day) = (start.month(), start.day());
            step(start, &mut out, |at| {
                let year = add_years(at.year(), interval)?;
                let date = snap_day(year, anchor_month, anchor_day)?;
                Some(date.and_time(at.time()))
            })
        }
        RepeatMode::MonthsByWeekday => scan(start, &mut out, week_of_month, |day| {
            first_of_month(day).checked_add_months(Months::new(interval))
        }),
        RepeatMode::YearsByWeekday => {
            let anchor_month = start.month();
            scan(start, &mut out, week_of_year, |day| {
                NaiveDate::from_ymd_opt(add_years(day.year(), interval)?, anchor_month, 1)
            })
        }
    }

    if out.truncated {
        warn!(
            mode = %rule.mode,
            interval = rule.interval,
            limit = MAX_OCCURRENCES,
            "recurrence expansion truncated"
        );
    }

    Expansion {
        occurrences: out.items,
        truncated: out.truncated,
    }
}

/// Whole number of 7-day periods between the Unix epoch and `date`, floored.
///
/// Equivalent to `floor(seconds_since_epoch / 604800)` for a midnight-aligned
/// date. Epoch weeks start on Thursdays (1970-01-01 was a Thursday).
pub fn epoch_week(date: NaiveDate) -> i64 {
    days_since_epoch(date).div_euclid(7)
}

/// One-based week of `date` counted from `period_start`.
///
/// The day offset is taken before dividing by seven, so days 1 to 7 of the
/// period are week 1, days 8 to 14 week 2, and so on. Within a month this is
/// the n-th occurrence of the date's weekday (at most 5).
pub fn week_index(date: NaiveDate, period_start: NaiveDate) -> i64 {
    (days_since_epoch(date) - days_since_epoch(period_start)).div_euclid(7) + 1
}

/// Week bucket of `date` relative to the first day of its month.
pub fn week_of_month(date: NaiveDate) -> i64 {
    week_index(date, first_of_month(date))
}

/// Week bucket of `date` relative to January 1st of its year.
pub fn week_of_year(date: NaiveDate) -> i64 {
    week_index(date, date.with_ordinal(1).unwrap_or(date))
}

fn days_since_epoch(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn add_years(year: i32, years: u32) -> Option<i32> {
    year.checked_add(i32::try_from(years).ok()?)
}

/// Number of days in the given month, or `None` outside chrono's range.
fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// The anchor day in the given month, clamped to the month's last day.
fn snap_day(year: i32, month: u32, anchor_day: u32) -> Option<NaiveDate> {
    let day = anchor_day.min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Accumulates occurrences up to the window end and the occurrence cap.
struct Occurrences {
    end: NaiveDateTime,
    items: Vec<DateTime<Utc>>,
    truncated: bool,
}

impl Occurrences {
    fn new(end: NaiveDateTime) -> Self {
        Self {
            end,
            items: Vec::new(),
            truncated: false,
        }
    }

    fn in_window(&self, at: NaiveDateTime) -> bool {
        at <= self.end
    }

    /// Records `at`, or returns `false` if the cap has already been reached.
    fn record(&mut self, at: NaiveDateTime) -> bool {
        if self.items.len() >= MAX_OCCURRENCES {
            self.truncated = true;
            return false;
        }
        self.items.push(at.and_utc());
        true
    }
}

/// Records `start` and every value produced by repeatedly applying `next`,
/// while inside the window.
fn step<F>(start: NaiveDateTime, out: &mut Occurrences, mut next: F)
where
    F: FnMut(NaiveDateTime) -> Option<NaiveDateTime>,
{
    let mut current = Some(start);
    while let Some(at) = current {
        if !out.in_window(at) || !out.record(at) {
            break;
        }
        current = next(at);
    }
}

/// Walks forward one day at a time from `start`, recording every day that
/// falls on the start's weekday and in the start's week bucket (as computed
/// by `bucket`). After each match the walk continues from `jump(match)`.
fn scan<B, J>(start: NaiveDateTime, out: &mut Occurrences, bucket: B, mut jump: J)
where
    B: Fn(NaiveDate) -> i64,
    J: FnMut(NaiveDate) -> Option<NaiveDate>,
{
    let time = start.time();
    let weekday = start.weekday();
    let target_bucket = bucket(start.date());

    let mut current = Some(start.date());
    while let Some(day) = current {
        let at = day.and_time(time);
        if !out.in_window(at) {
            break;
        }

        if day.weekday() == weekday && bucket(day) == target_bucket {
            if !out.record(at) {
                break;
            }
            current = jump(day);
        } else {
            current = day.succ_opt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rstest::rstest;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dates(occurrences: &[DateTime<Utc>]) -> Vec<NaiveDate> {
        occurrences.iter().map(|at| at.date_naive()).collect()
    }

    mod repeat_mode_tests {
        use super::*;

        #[rstest]
        #[case("days", RepeatMode::Days)]
        #[case("weeks", RepeatMode::Weeks)]
        #[case("months-by-date", RepeatMode::MonthsByDate)]
        #[case("months-by-weekday", RepeatMode::MonthsByWeekday)]
        #[case("years-by-date", RepeatMode::YearsByDate)]
        #[case("years-by-weekday", RepeatMode::YearsByWeekday)]
        #[case("Months-By-Date", RepeatMode::MonthsByDate)]
        #[case("  DAYS ", RepeatMode::Days)]
        fn test_from_keyword(#[case] keyword: &str, #[case] expected: RepeatMode) {
            assert_eq!(RepeatMode::from_keyword(keyword), expected);
        }

        #[rstest]
        #[case("")]
        #[case("fortnights")]
        #[case("monthly")]
        fn test_unknown_keyword_falls_back_to_weeks(#[case] keyword: &str) {
            assert_eq!(RepeatMode::from_keyword(keyword), RepeatMode::Weeks);
        }

        #[test]
        fn test_keyword_round_trip() {
            for mode in RepeatMode::ALL {
                assert_eq!(RepeatMode::from_keyword(mode.as_str()), mode);
                assert_eq!(mode.to_string(), mode.as_str());
            }
        }
    }

    mod rule_tests {
        use super::*;

        #[rstest]
        #[case(-5, 1)]
        #[case(0, 1)]
        #[case(1, 1)]
        #[case(7, 7)]
        #[case(i64::MAX, u32::MAX)]
        fn test_interval_normalization(#[case] raw: i64, #[case] expected: u32) {
            let rule = RecurrenceRule::new(utc(2024, 1, 1), utc(2024, 2, 1), RepeatMode::Days, raw);
            assert_eq!(rule.interval(), expected);
        }

        #[test]
        fn test_from_keyword_unknown_mode_is_weekly() {
            let rule = RecurrenceRule::from_keyword(utc(2024, 1, 1), utc(2024, 2, 1), "hourly", 1);
            assert_eq!(rule.mode(), RepeatMode::Weeks);
        }

        #[test]
        fn test_timestamps_match_occurrences() {
            let rule = RecurrenceRule::new(utc(2024, 1, 1), utc(2024, 1, 3), RepeatMode::Days, 1);
            assert_eq!(rule.timestamps(), vec![1_704_067_200, 1_704_153_600, 1_704_240_000]);
        }
    }

    mod week_tests {
        use super::*;

        #[test]
        fn test_epoch_week_starts_on_thursday() {
            assert_eq!(epoch_week(date(1970, 1, 1)), 0);
            assert_eq!(epoch_week(date(1970, 1, 7)), 0);
            assert_eq!(epoch_week(date(1970, 1, 8)), 1);
            assert_eq!(epoch_week(date(1969, 12, 31)), -1);
        }

        #[rstest]
        #[case(date(2024, 5, 1), 1)]
        #[case(date(2024, 5, 2), 1)]
        #[case(date(2024, 5, 6), 1)]
        #[case(date(2024, 5, 7), 1)]
        #[case(date(2024, 5, 8), 2)]
        #[case(date(2024, 5, 29), 5)]
        #[case(date(2024, 5, 31), 5)]
        fn test_week_of_month_counts_from_the_first(#[case] day: NaiveDate, #[case] expected: i64) {
            assert_eq!(week_of_month(day), expected);
        }

        #[test]
        fn test_week_index_ignores_epoch_week_boundaries() {
            // 2024-05-01 is a Wednesday and the 2nd a Thursday; both are week 1.
            assert_eq!(epoch_week(date(2024, 5, 2)), epoch_week(date(2024, 5, 1)) + 1);
            assert_eq!(week_index(date(2024, 5, 2), date(2024, 5, 1)), 1);
        }

        #[test]
        fn test_week_of_year() {
            assert_eq!(week_of_year(date(2024, 1, 1)), 1);
            assert_eq!(week_of_year(date(2024, 3, 12)), 11);
            assert_eq!(week_of_year(date(2026, 1, 1)), 1);
            assert_eq!(week_of_year(date(2026, 1, 8)), 2);
        }
    }

    mod expansion_tests {
        use super::*;

        #[test]
        fn test_days_every_third_day() {
            let rule = RecurrenceRule::new(utc(2024, 1, 1), utc(2024, 1, 10), RepeatMode::Days, 3);
            assert_eq!(
                dates(&rule.expand()),
                vec![date(2024, 1, 1), date(2024, 1, 4), date(2024, 1, 7), date(2024, 1, 10)]
            );
        }

        #[test]
        fn test_weeks_every_monday() {
            let rule = RecurrenceRule::new(utc(2024, 1, 1), utc(2024, 2, 1), RepeatMode::Weeks, 1);
            assert_eq!(
                dates(&rule.expand()),
                vec![
                    date(2024, 1, 1),
                    date(2024, 1, 8),
                    date(2024, 1, 15),
                    date(2024, 1, 22),
                    date(2024, 1, 29),
                ]
            );
        }

        #[test]
        fn test_months_by_date_clamps_short_months() {
            let rule = RecurrenceRule::new(utc(2024, 1, 31), utc(2024, 6, 30), RepeatMode::MonthsByDate, 1);
            assert_eq!(
                dates(&rule.expand()),
                vec![
                    date(2024, 1, 31),
                    date(2024, 2, 29),
                    date(2024, 3, 31),
                    date(2024, 4, 30),
                    date(2024, 5, 31),
                    date(2024, 6, 30),
                ]
            );
        }

        #[test]
        fn test_months_by_date_with_interval() {
            let rule = RecurrenceRule::new(utc(2024, 1, 15), utc(2024, 12, 31), RepeatMode::MonthsByDate, 4);
            assert_eq!(
                dates(&rule.expand()),
                vec![date(2024, 1, 15), date(2024, 5, 15), date(2024, 9, 15)]
            );
        }

        #[test]
        fn test_months_by_weekday_first_monday_of_each_month() {
            let rule = RecurrenceRule::new(utc(2024, 1, 1), utc(2024, 6, 30), RepeatMode::MonthsByWeekday, 1);
            assert_eq!(
                dates(&rule.expand()),
                vec![
                    date(2024, 1, 1),
                    date(2024, 2, 5),
                    date(2024, 3, 4),
                    date(2024, 4, 1),
                    date(2024, 5, 6),
                    date(2024, 6, 3),
                ]
            );
        }

        #[test]
        fn test_months_by_weekday_end_before_next_match() {
            let rule = RecurrenceRule::new(utc(2024, 1, 1), utc(2024, 6, 1), RepeatMode::MonthsByWeekday, 1);
            assert_eq!(dates(&rule.expand()).last(), Some(&date(2024, 5, 6)));
            assert_eq!(rule.expand().len(), 5);
        }

        #[test]
        fn test_months_by_weekday_fifth_week_only_in_long_months() {
            // The 5th Friday exists only in months with five Fridays.
            let rule = RecurrenceRule::new(utc(2024, 5, 31), utc(2025, 12, 31), RepeatMode::MonthsByWeekday, 1);
            assert_eq!(
                dates(&rule.expand()),
                vec![
                    date(2024, 5, 31),
                    date(2024, 8, 30),
                    date(2024, 11, 29),
                    date(2025, 1, 31),
                    date(2025, 5, 30),
                    date(2025, 8, 29),
                    date(2025, 10, 31),
                ]
            );
        }

        #[test]
        fn test_years_by_date_leap_day() {
            let rule = RecurrenceRule::new(utc(2024, 2, 29), utc(2029, 3, 1), RepeatMode::YearsByDate, 1);
            assert_eq!(
                dates(&rule.expand()),
                vec![
                    date(2024, 2, 29),
                    date(2025, 2, 28),
                    date(2026, 2, 28),
                    date(2027, 2, 28),
                    date(2028, 2, 29),
                    date(2029, 2, 28),
                ]
            );
        }

        #[test]
        fn test_years_by_weekday_keeps_week_of_year() {
            // 2024-03-12 is day 72 of the year, in week 11 (days 71 to 77).
            let rule = RecurrenceRule::new(utc(2024, 3, 12), utc(2029, 3, 31), RepeatMode::YearsByWeekday, 1);
            let occurrences = rule.expand();
            assert_eq!(
                dates(&occurrences),
                vec![
                    date(2024, 3, 12),
                    date(2025, 3, 18),
                    date(2026, 3, 17),
                    date(2027, 3, 16),
                    date(2028, 3, 14),
                    date(2029, 3, 13),
                ]
            );
            for at in &occurrences {
                assert_eq!(at.weekday(), chrono::Weekday::Tue);
                assert_eq!(week_of_year(at.date_naive()), 11);
            }
        }

        #[test]
        fn test_years_by_weekday_five_year_window() {
            let start = utc(2024, 3, 12);
            let end = utc(2029, 3, 12);
            let rule = RecurrenceRule::new(start, end, RepeatMode::YearsByWeekday, 1);
            // The 2029 match falls on the 13th, one day past the window.
            assert_eq!(rule.expand().len(), 5);
        }

        #[test]
        fn test_time_of_day_is_preserved() {
            let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
            let end = Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap();
            let rule = RecurrenceRule::new(start, end, RepeatMode::Days, 1);
            assert_eq!(
                rule.expand(),
                vec![start, Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap()]
            );
        }

        #[test]
        fn test_weekday_scan_keeps_time_of_day() {
            let start = Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap();
            let rule = RecurrenceRule::new(start, utc(2024, 3, 31), RepeatMode::MonthsByWeekday, 1);
            assert_eq!(
                rule.expand(),
                vec![
                    start,
                    Utc.with_ymd_and_hms(2024, 2, 5, 18, 0, 0).unwrap(),
                    Utc.with_ymd_and_hms(2024, 3, 4, 18, 0, 0).unwrap(),
                ]
            );
        }

        #[test]
        fn test_inverted_window_is_empty() {
            for mode in RepeatMode::ALL {
                let rule = RecurrenceRule::new(utc(2024, 2, 1), utc(2024, 1, 1), mode, 1);
                assert!(rule.expand().is_empty(), "{mode} should be empty");
            }
        }

        #[test]
        fn test_single_day_window() {
            for mode in RepeatMode::ALL {
                let rule = RecurrenceRule::new(utc(2024, 2, 1), utc(2024, 2, 1), mode, 1);
                assert_eq!(rule.expand(), vec![utc(2024, 2, 1)], "{mode}");
            }
        }

        #[test]
        fn test_cap_truncates_silently() {
            let rule = RecurrenceRule::new(utc(2000, 1, 1), utc(2100, 1, 1), RepeatMode::Days, 1);
            let expansion = expand_with_diagnostics(&rule);
            assert_eq!(expansion.occurrences.len(), MAX_OCCURRENCES);
            assert!(expansion.truncated);
            assert_eq!(
                expansion.occurrences.last().copied(),
                utc(2000, 1, 1).checked_add_days(Days::new(9998))
            );
            assert_eq!(rule.expand(), expansion.occurrences);
        }

        #[test]
        fn test_exact_cap_is_not_truncated() {
            let start = utc(2000, 1, 1);
            let end = start.checked_add_days(Days::new(9998)).unwrap();
            let expansion = expand_with_diagnostics(&RecurrenceRule::new(start, end, RepeatMode::Days, 1));
            assert_eq!(expansion.occurrences.len(), MAX_OCCURRENCES);
            assert!(!expansion.truncated);
        }

        #[test]
        fn test_huge_interval_stops_at_calendar_limit() {
            let rule = RecurrenceRule::new(utc(2024, 1, 1), DateTime::<Utc>::MAX_UTC, RepeatMode::YearsByDate, i64::MAX);
            assert_eq!(rule.expand(), vec![utc(2024, 1, 1)]);
        }
    }

    fn any_mode() -> impl Strategy<Value = RepeatMode> {
        prop::sample::select(RepeatMode::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_occurrences_within_window_and_increasing(
            start_day in 0i64..30_000,
            span in 0i64..4_000,
            mode in any_mode(),
            interval in -3i64..40,
        ) {
            let start = utc(1970, 1, 1) + chrono::Duration::days(start_day);
            let end = start + chrono::Duration::days(span);
            let occurrences = RecurrenceRule::new(start, end, mode, interval).expand();

            prop_assert!(occurrences.len() <= MAX_OCCURRENCES);
            for at in &occurrences {
                prop_assert!(*at >= start && *at <= end);
            }
            for pair in occurrences.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
        }

        #[test]
        fn prop_non_positive_interval_equals_one(
            start_day in 0i64..30_000,
            span in 0i64..1_500,
            mode in any_mode(),
            interval in -10i64..=0,
        ) {
            let start = utc(1970, 1, 1) + chrono::Duration::days(start_day);
            let end = start + chrono::Duration::days(span);
            prop_assert_eq!(
                RecurrenceRule::new(start, end, mode, interval).expand(),
                RecurrenceRule::new(start, end, mode, 1).expand()
            );
        }

        #[test]
        fn prop_inverted_window_is_empty(
            start_day in 1i64..30_000,
            gap in 1i64..500,
            mode in any_mode(),
            interval in -3i64..40,
        ) {
            let start = utc(1970, 1, 1) + chrono::Duration::days(start_day);
            let end = start - chrono::Duration::seconds(gap);
            prop_assert!(RecurrenceRule::new(start, end, mode, interval).expand().is_empty());
        }

        #[test]
        fn prop_first_week_weekday_repeats_every_month(
            year in 1971i32..2100,
            month in 1u32..=12,
            day in 1u32..=7,
        ) {
            let start = utc(year, month, day);
            let end = utc(year, month, 1).checked_add_months(Months::new(12)).unwrap()
                - chrono::Duration::days(1);
            let occurrences = RecurrenceRule::new(start, end, RepeatMode::MonthsByWeekday, 1).expand();
            prop_assert_eq!(occurrences.len(), 12);
            for at in &occurrences {
                prop_assert_eq!(at.weekday(), start.weekday());
                prop_assert!(at.day() <= 7);
            }
        }

        #[test]
        fn prop_expansion_is_deterministic(
            start_day in 0i64..30_000,
            span in 0i64..2_000,
            mode in any_mode(),
            interval in 1i64..12,
        ) {
            let start = utc(1970, 1, 1) + chrono::Duration::days(start_day);
            let rule = RecurrenceRule::new(start, start + chrono::Duration::days(span), mode, interval);
            prop_assert_eq!(rule.expand(), rule.expand());
        }
    }
}
