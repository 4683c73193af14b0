//! Payroll engine.
//!
//! A pure computation over the registry and ledgers, parameterized by a run
//! date: eligibility schedules, pay periods, per-employee settlement with
//! debt carry-forward, and the grouped fixed-width report.

mod compute;
mod period;
mod report;
mod schedule;

pub use compute::{ComputedPay, compute_paycheck};
pub use period::{PayPeriod, pay_period};
pub use report::{PayrollSummary, run_payroll, total_payroll};
pub use schedule::{BIWEEKLY_ANCHOR, CONTRACT_START, is_payday};
