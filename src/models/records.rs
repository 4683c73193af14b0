//! Ledger record types.
//!
//! Attendance, sale and union-fee rows are append-only: once recorded they
//! are never edited by payroll runs, only read through range queries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Daily hours cap before the excess counts as overtime.
pub const REGULAR_HOURS_CAP: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// One day of attendance for an hourly employee.
///
/// At most one record exists per (employee, date); recording a second entry
/// for the same date accumulates into the existing record and re-splits the
/// day's total against the 8-hour cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The day worked.
    pub date: NaiveDate,
    /// Hours up to the daily cap.
    pub regular: Decimal,
    /// Hours past the daily cap, paid at 1.5x.
    pub overtime: Decimal,
}

impl AttendanceRecord {
    /// Builds a record by splitting a day's total hours at the 8-hour cap.
    pub fn from_total(date: NaiveDate, total: Decimal) -> Self {
        let regular = total.min(REGULAR_HOURS_CAP);
        AttendanceRecord {
            date,
            regular,
            overtime: total - regular,
        }
    }

    /// Adds more hours to this day and re-splits the total.
    pub fn accumulate(&mut self, hours: Decimal) {
        *self = AttendanceRecord::from_total(self.date, self.regular + self.overtime + hours);
    }
}

/// A sale credited to a commissioned employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// The date of the sale.
    pub date: NaiveDate,
    /// The sale amount; always positive.
    pub amount: Decimal,
}

/// A union service fee charged against a union member.
///
/// Fees are keyed by union id, not by registry id; resolution to an
/// employee goes through the active membership lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionFeeRecord {
    /// The union id the fee was charged to.
    pub union_id: String,
    /// The date of the charge.
    pub date: NaiveDate,
    /// The fee amount; always positive.
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2005, 3, 1).unwrap()
    }

    #[test]
    fn test_from_total_under_cap() {
        let r = AttendanceRecord::from_total(day(), dec("6"));
        assert_eq!(r.regular, dec("6"));
        assert_eq!(r.overtime, dec("0"));
    }

    #[test]
    fn test_from_total_over_cap() {
        let r = AttendanceRecord::from_total(day(), dec("10"));
        assert_eq!(r.regular, dec("8"));
        assert_eq!(r.overtime, dec("2"));
    }

    #[test]
    fn test_from_total_at_cap() {
        let r = AttendanceRecord::from_total(day(), dec("8"));
        assert_eq!(r.regular, dec("8"));
        assert_eq!(r.overtime, dec("0"));
    }

    #[test]
    fn test_accumulate_resplits_day_total() {
        // Two 5-hour entries on the same day: the 10-hour total splits 8 + 2.
        let mut r = AttendanceRecord::from_total(day(), dec("5"));
        r.accumulate(dec("5"));
        assert_eq!(r.regular, dec("8"));
        assert_eq!(r.overtime, dec("2"));
    }

    #[test]
    fn test_accumulate_fractional_hours() {
        let mut r = AttendanceRecord::from_total(day(), dec("7.5"));
        r.accumulate(dec("1"));
        assert_eq!(r.regular, dec("8"));
        assert_eq!(r.overtime, dec("0.5"));
    }

    #[test]
    fn test_regular_hours_cap_is_eight() {
        assert_eq!(REGULAR_HOURS_CAP, dec("8"));
    }
}
