//! Contract duration in months.

use chrono::{Datelike, Local, Months, NaiveDate};

use crate::contract::ContractPeriod;
use crate::validation::parse_iso_date;

fn plus_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Whole months from `start` to `end`, rounding any leftover days up.
///
/// Months are counted by corresponding day (Jan 15 → Feb 15 is one month,
/// clamped to the month's last day where needed). A positive span shorter
/// than a month is still one month; an empty or negative span is zero.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    if end <= start {
        return 0;
    }

    let raw = i64::from(end.year() - start.year()) * 12
        + (i64::from(end.month()) - i64::from(start.month()));
    let mut whole = raw.max(0) as u32;
    while whole > 0 && plus_months(start, whole).is_none_or(|d| d > end) {
        whole -= 1;
    }

    let boundary = plus_months(start, whole).unwrap_or(start);
    if boundary < end {
        whole += 1;
    }
    whole.max(1)
}

/// [`months_between`] on ISO date strings; `None` if either does not parse.
pub fn diff_in_months(start: &str, end: &str) -> Option<u32> {
    Some(months_between(parse_iso_date(start)?, parse_iso_date(end)?))
}

/// Duration of a contract period, when both ends are known.
pub fn contract_months(period: &ContractPeriod) -> Option<u32> {
    diff_in_months(period.mulai.as_deref()?, period.akhir.as_deref()?)
}

/// Months elapsed between `start` and `today`.
pub fn elapsed_months(start: NaiveDate, today: NaiveDate) -> u32 {
    months_between(start, today)
}

/// [`elapsed_months`] against the local clock. Not used by any derived figure.
pub fn elapsed_months_to_today(start: NaiveDate) -> u32 {
    elapsed_months(start, Local::now().date_naive())
}
