//! Per-employee pay computation.
//!
//! Pure functions over the registry and ledgers: gross pay per compensation
//! type, deductions with union-due proration, and the debt carry-forward
//! rule. Cursor updates are returned to the caller, never applied here.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::dates::floor2;
use crate::error::PayrollResult;
use crate::ledgers::{AttendanceLedger, SalesLedger, UnionFeeLedger};
use crate::models::{CompensationType, Employee, Paycheck, PaycheckDetail};

use super::period::PayPeriod;

/// Days a commissioned due proration always covers, whatever the period.
const COMMISSIONED_PRORATION_DAYS: i64 = 14;

/// Overtime premium for hourly employees.
fn overtime_rate(rate: Decimal) -> Decimal {
    rate * Decimal::new(15, 1)
}

/// The outcome of settling one employee.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedPay {
    /// The report row.
    pub check: Paycheck,
    /// The union debt to store back on the employee.
    pub new_debt: Decimal,
    /// The new `last_payment` cursor.
    pub cursor: NaiveDate,
}

/// Settles one eligible employee over a period.
pub fn compute_paycheck(
    employee: &Employee,
    period: &PayPeriod,
    attendance: &AttendanceLedger,
    sales: &SalesLedger,
    fees: &UnionFeeLedger,
) -> PayrollResult<ComputedPay> {
    // A run repeated on a date already settled rolls the start past the run
    // date; treat that as an empty window rather than an inverted range.
    let window = PayPeriod {
        start: period.start.min(period.end),
        end: period.end,
    };
    let (gross, detail) = gross_pay(employee, &window, attendance, sales)?;

    let fee_total = match employee.union_id() {
        Some(union_id) => fees.sum(union_id, window.start, window.end)?,
        None => Decimal::ZERO,
    };
    let proration_days = match employee.compensation {
        CompensationType::Commissioned { .. } => COMMISSIONED_PRORATION_DAYS,
        _ => period.days().max(0),
    };
    let deductions =
        fee_total + employee.union_debt + employee.daily_due() * Decimal::from(proration_days);

    // An uncoverable deduction rolls forward in full; nothing is partially
    // collected this period.
    let (net, applied, new_debt) = if gross < deductions {
        (Decimal::ZERO, Decimal::ZERO, deductions)
    } else {
        (gross - deductions, deductions, Decimal::ZERO)
    };

    Ok(ComputedPay {
        check: Paycheck {
            employee_id: employee.id,
            name: employee.name.clone(),
            method: employee.payment_method.describe(&employee.address),
            gross,
            deductions: applied,
            net,
            detail,
        },
        new_debt,
        cursor: period.end,
    })
}

fn gross_pay(
    employee: &Employee,
    period: &PayPeriod,
    attendance: &AttendanceLedger,
    sales: &SalesLedger,
) -> PayrollResult<(Decimal, PaycheckDetail)> {
    match &employee.compensation {
        CompensationType::Hourly { rate } => {
            let regular = attendance.sum_regular(employee, period.start, period.end)?;
            let overtime = attendance.sum_overtime(employee, period.start, period.end)?;
            let gross = regular * *rate + overtime * overtime_rate(*rate);
            Ok((gross, PaycheckDetail::Hourly { regular, overtime }))
        }
        CompensationType::Salaried { monthly_salary } => {
            Ok((*monthly_salary, PaycheckDetail::Salaried))
        }
        CompensationType::Commissioned {
            monthly_salary,
            commission_rate,
        } => {
            let fixed = floor2(*monthly_salary * Decimal::from(12) / Decimal::from(26));
            let sold = sales.sum(employee, period.start, period.end)?;
            let commission = floor2(sold * *commission_rate);
            Ok((
                fixed + commission,
                PaycheckDetail::Commissioned {
                    fixed,
                    sales: sold,
                    commission,
                },
            ))
        }
    }
}
