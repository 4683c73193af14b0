//! Payment eligibility schedule.
//!
//! Each compensation type has its own date-driven rule deciding whether a
//! given run date triggers a payment.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::models::{CompensationType, Employee};

/// Contract start for salaried and commissioned employees.
pub const CONTRACT_START: NaiveDate = match NaiveDate::from_ymd_opt(2005, 1, 1) {
    Some(date) => date,
    None => panic!("valid date"),
};

/// The first biweekly Friday commissioned employees are paid on.
pub const BIWEEKLY_ANCHOR: NaiveDate = match NaiveDate::from_ymd_opt(2005, 1, 14) {
    Some(date) => date,
    None => panic!("valid date"),
};

/// Decides whether `date` is a payday for this employee.
///
/// - Hourly: every Friday.
/// - Salaried: the last calendar day of the month.
/// - Commissioned: a Friday on or after [`BIWEEKLY_ANCHOR`] that is a whole
///   number of fortnights after it.
pub fn is_payday(employee: &Employee, date: NaiveDate) -> bool {
    match employee.compensation {
        CompensationType::Hourly { .. } => date.weekday() == Weekday::Fri,
        CompensationType::Salaried { .. } => is_last_day_of_month(date),
        CompensationType::Commissioned { .. } => {
            date.weekday() == Weekday::Fri
                && date >= BIWEEKLY_ANCHOR
                && (date - BIWEEKLY_ANCHOR).num_days() % 14 == 0
        }
    }
}

fn is_last_day_of_month(date: NaiveDate) -> bool {
    match date.checked_add_days(Days::new(1)) {
        Some(next) => next.month() != date.month(),
        None => true,
    }
}
