//! Payroll engine with date-driven pay runs, undo/redo and flat-file
//! persistence.
//!
//! The crate manages hourly, salaried and commissioned employees, their
//! attendance, sales and union-fee ledgers, and settles payroll on the
//! dates each compensation type is due. [`facade::PayrollSystem`] is the
//! entry point; the inner modules hold the registry, ledgers, payroll
//! computation, snapshot history and persistence.

#![warn(missing_docs)]

pub mod dates;
pub mod error;
pub mod facade;
pub mod history;
pub mod ledgers;
pub mod models;
pub mod payroll;
pub mod registry;
pub mod store;

pub use error::{PayrollError, PayrollResult};
pub use facade::PayrollSystem;
pub use models::EmployeeId;
