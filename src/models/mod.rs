//! Data model for the payroll engine.
//!
//! This module contains the employee entity, the append-only ledger record
//! types and the payroll run result types.

mod employee;
mod paycheck;
mod records;

pub use employee::{CompensationType, Employee, EmployeeId, PaymentMethod, UnionMembership};
pub use paycheck::{GroupTotals, Paycheck, PaycheckDetail};
pub use records::{AttendanceRecord, REGULAR_HOURS_CAP, SaleRecord, UnionFeeRecord};
