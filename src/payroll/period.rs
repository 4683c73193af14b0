//! Pay period computation.
//!
//! A period is the date range whose activity a payroll run settles. Ledger
//! queries treat it as half-open `[start, end)`; proration counts its days
//! inclusively.

use chrono::{Days, NaiveDate};

use crate::dates;
use crate::models::{CompensationType, Employee};

use super::schedule::CONTRACT_START;

/// The settlement window of one paycheck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayPeriod {
    /// First day settled (inclusive).
    pub start: NaiveDate,
    /// The run date; excluded from ledger sums, included in proration.
    pub end: NaiveDate,
}

impl PayPeriod {
    /// Inclusive day count, the basis for union-due proration.
    pub fn days(&self) -> i64 {
        dates::days_inclusive(self.start, self.end)
    }
}

/// Computes the period an eligible employee is settled for on `run_date`.
///
/// Returns `None` only for hourly employees who have never clocked in: with
/// no admission date there is nothing to settle and the report shows a zero
/// row instead.
pub fn pay_period(employee: &Employee, run_date: NaiveDate) -> Option<PayPeriod> {
    let after_last_payment = employee
        .last_payment
        .and_then(|d| d.checked_add_days(Days::new(1)));

    match employee.compensation {
        CompensationType::Hourly { .. } => {
            let start = after_last_payment.or(employee.admission_date)?;
            Some(PayPeriod {
                start,
                end: run_date,
            })
        }
        CompensationType::Salaried { .. } => Some(PayPeriod {
            start: after_last_payment.unwrap_or(CONTRACT_START),
            end: run_date,
        }),
        CompensationType::Commissioned { .. } => {
            let mut start = after_last_payment.unwrap_or(CONTRACT_START);
            // A biweekly check always settles a full fortnight.
            if dates::days_inclusive(start, run_date) < 14 {
                start = run_date
                    .checked_sub_days(Days::new(13))
                    .unwrap_or(CONTRACT_START);
            }
            if start < CONTRACT_START {
                start = CONTRACT_START;
            }
            Some(PayPeriod {
                start,
                end: run_date,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmployeeId;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hourly() -> Employee {
        Employee::new(
            EmployeeId(1),
            "A",
            "addr",
            CompensationType::Hourly {
                rate: Decimal::from(20),
            },
        )
    }

    fn salaried() -> Employee {
        Employee::new(
            EmployeeId(2),
            "B",
            "addr",
            CompensationType::Salaried {
                monthly_salary: Decimal::from(1000),
            },
        )
    }

    fn commissioned() -> Employee {
        Employee::new(
            EmployeeId(3),
            "C",
            "addr",
            CompensationType::Commissioned {
                monthly_salary: Decimal::from(2600),
                commission_rate: Decimal::ONE,
            },
        )
    }

    #[test]
    fn test_hourly_without_admission_has_no_period() {
        let e = hourly();
        assert_eq!(pay_period(&e, date(2005, 1, 7)), None);
    }

    #[test]
    fn test_hourly_first_period_starts_at_admission() {
        let mut e = hourly();
        e.admission_date = Some(date(2005, 1, 3));
        let period = pay_period(&e, date(2005, 1, 7)).unwrap();
        assert_eq!(period.start, date(2005, 1, 3));
        assert_eq!(period.end, date(2005, 1, 7));
        assert_eq!(period.days(), 5);
    }

    #[test]
    fn test_hourly_rolls_from_last_payment() {
        let mut e = hourly();
        e.admission_date = Some(date(2005, 1, 3));
        e.last_payment = Some(date(2005, 1, 7));
        let period = pay_period(&e, date(2005, 1, 14)).unwrap();
        assert_eq!(period.start, date(2005, 1, 8));
        assert_eq!(period.days(), 7);
    }

    #[test]
    fn test_salaried_first_period_starts_at_contract() {
        let e = salaried();
        let period = pay_period(&e, date(2005, 1, 31)).unwrap();
        assert_eq!(period.start, date(2005, 1, 1));
        assert_eq!(period.end, date(2005, 1, 31));
        assert_eq!(period.days(), 31);
    }

    #[test]
    fn test_salaried_rolls_from_last_payment() {
        let mut e = salaried();
        e.last_payment = Some(date(2005, 1, 31));
        let period = pay_period(&e, date(2005, 2, 28)).unwrap();
        assert_eq!(period.start, date(2005, 2, 1));
        assert_eq!(period.days(), 28);
    }

    #[test]
    fn test_commissioned_exact_fortnight_untouched() {
        let mut e = commissioned();
        e.last_payment = Some(date(2005, 1, 14));
        // Next biweekly Friday: span from 15/1 is exactly 14 days, untouched.
        let period = pay_period(&e, date(2005, 1, 28)).unwrap();
        assert_eq!(period.start, date(2005, 1, 15));
        assert_eq!(period.days(), 14);
    }

    #[test]
    fn test_commissioned_first_period_spans_from_contract() {
        let e = commissioned();
        let period = pay_period(&e, date(2005, 1, 14)).unwrap();
        assert_eq!(period.start, date(2005, 1, 1));
        assert_eq!(period.end, date(2005, 1, 14));
    }

    #[test]
    fn test_commissioned_forced_start_is_clamped_to_contract() {
        let mut e = commissioned();
        // Last payment right before the run leaves a 7-day span; the start
        // is pushed back to 14 days, then clamped at the contract start.
        e.last_payment = Some(date(2005, 1, 7));
        let period = pay_period(&e, date(2005, 1, 14)).unwrap();
        assert_eq!(period.start, date(2005, 1, 1));
    }

    #[test]
    fn test_commissioned_forced_start_without_clamp() {
        let mut e = commissioned();
        e.last_payment = Some(date(2005, 2, 4));
        let period = pay_period(&e, date(2005, 2, 11)).unwrap();
        assert_eq!(period.start, date(2005, 1, 29));
        assert_eq!(period.days(), 14);
    }
}
