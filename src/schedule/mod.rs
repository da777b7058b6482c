//! Calendar arithmetic for budget cycles and recurring schedules.
//!
//! Every month has a 28th, so reset days and recurring due days are clamped
//! to 28 and month arithmetic never lands on an invalid date.

use chrono::{Datelike, Days, NaiveDate};

use crate::models::Frequency;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const MAX_CYCLE_DAY: u32 = 28;

/// Half-open date range `[start, end)` a budget's spend is measured over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CycleWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

impl std::fmt::Display for CycleWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", format_date(self.start), format_date(self.end))
    }
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn clamp_cycle_day(day: i64) -> u32 {
    // Lossless: the clamped value is within 1..=28.
    day.clamp(1, i64::from(MAX_CYCLE_DAY)) as u32
}

/// The budget cycle containing `reference` for a budget that resets on
/// `cycle_day`.
///
/// If the reset day has been reached this month the cycle started this
/// month, otherwise it started last month. Either way it ends one month
/// after it started.
pub fn cycle_window(cycle_day: u32, reference: NaiveDate) -> CycleWindow {
    let day = clamp_cycle_day(i64::from(cycle_day));
    let anchor = reference.with_day(day).unwrap_or(reference);

    let start = if reference.day() >= day {
        anchor
    } else {
        add_months_clamped(anchor, -1).unwrap_or(NaiveDate::MIN)
    };
    let end = add_months_clamped(start, 1).unwrap_or(NaiveDate::MAX);

    CycleWindow { start, end }
}

/// The due date following `current` for a rule repeating every `interval`
/// periods of `every`. Always strictly later than `current` (an interval of
/// zero is treated as one).
///
/// Monthly and yearly schedules clamp the day of month to 28.
pub fn advance(current: NaiveDate, every: Frequency, interval: u32) -> NaiveDate {
    let interval = interval.max(1);
    let next = match every {
        Frequency::Weekly => current.checked_add_days(Days::new(7 * u64::from(interval))),
        Frequency::Monthly => add_months_clamped(current, i64::from(interval)),
        Frequency::Yearly => add_months_clamped(current, 12 * i64::from(interval)),
    };
    next.unwrap_or(NaiveDate::MAX)
}

/// [advance] for a due date still in its stored text form.
///
/// Text that is not an ISO date is replaced by `today` before advancing, so
/// the result is always a usable date.
pub fn advance_stored(current: &str, every: Frequency, interval: u32, today: NaiveDate) -> NaiveDate {
    let base = match parse_date(current) {
        Ok(date) => date,
        Err(e) => {
            tracing::warn!(
                stored = current,
                %today,
                "Unreadable due date ({e}); advancing from today"
            );
            today
        }
    };
    advance(base, every, interval)
}

/// Shift `date` by `months` whole months, clamping the day to 28.
/// `None` only when the result falls outside chrono's representable range.
fn add_months_clamped(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let day = date.day().min(MAX_CYCLE_DAY);
    let index = i64::from(date.year()) * 12 + i64::from(date.month0()) + months;
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(year, month, day)
}
