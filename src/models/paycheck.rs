//! Payroll run result types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::employee::EmployeeId;

/// Per-type breakdown carried by a [`Paycheck`] row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PaycheckDetail {
    /// Hours settled for an hourly employee.
    Hourly {
        /// Regular hours in the period.
        regular: Decimal,
        /// Overtime hours in the period.
        overtime: Decimal,
    },
    /// No extra columns for salaried employees.
    Salaried,
    /// Fixed portion, sales total and commission for a commissioned employee.
    Commissioned {
        /// The biweekly fixed portion.
        fixed: Decimal,
        /// Sales credited in the period.
        sales: Decimal,
        /// Commission on those sales.
        commission: Decimal,
    },
}

/// One settled row of a payroll run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paycheck {
    /// The employee paid.
    pub employee_id: EmployeeId,
    /// Employee name, used for row ordering in the report.
    pub name: String,
    /// Human description of the payment method.
    pub method: String,
    /// Gross pay for the period.
    pub gross: Decimal,
    /// Deductions actually applied (zero when the debt rolled forward).
    pub deductions: Decimal,
    /// Net pay, clamped at zero.
    pub net: Decimal,
    /// Per-type breakdown.
    pub detail: PaycheckDetail,
}

impl Paycheck {
    /// Regular/overtime hours for hourly rows, zero otherwise.
    pub fn hours(&self) -> (Decimal, Decimal) {
        match &self.detail {
            PaycheckDetail::Hourly { regular, overtime } => (*regular, *overtime),
            _ => (Decimal::ZERO, Decimal::ZERO),
        }
    }
}

/// Aggregated totals over a group of paychecks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupTotals {
    /// Sum of gross pay.
    pub gross: Decimal,
    /// Sum of applied deductions.
    pub deductions: Decimal,
    /// Sum of net pay.
    pub net: Decimal,
}

impl GroupTotals {
    /// Accumulates a paycheck into the totals.
    pub fn add(&mut self, check: &Paycheck) {
        self.gross += check.gross;
        self.deductions += check.deductions;
        self.net += check.net;
    }
}
