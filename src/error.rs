//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all failure conditions that can occur while managing employees,
//! ledgers, payroll runs and the undo/redo history.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// Every fallible operation in the engine returns this type, so callers can
/// match on the failure kind without inspecting message strings.
///
/// # Example
///
/// ```
/// use payroll_engine::error::PayrollError;
///
/// let error = PayrollError::EmployeeNotFound;
/// assert_eq!(error.to_string(), "Employee does not exist.");
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayrollError {
    /// A required textual field was empty or missing.
    #[error("{field} cannot be empty.")]
    EmptyField {
        /// The field that was empty (e.g. "Name", "Address").
        field: &'static str,
    },

    /// A numeric field did not parse as a number.
    #[error("{field} must be numeric.")]
    MalformedNumber {
        /// The field that failed to parse.
        field: &'static str,
    },

    /// A numeric field parsed but was negative where only zero or more is allowed.
    #[error("{field} must be non-negative.")]
    NegativeValue {
        /// The offending field.
        field: &'static str,
    },

    /// A numeric field parsed but was zero or negative where a positive value is required.
    #[error("{field} must be positive.")]
    NonPositiveValue {
        /// The offending field.
        field: &'static str,
    },

    /// A flag field was something other than `true` or `false`.
    #[error("{field} must be true or false.")]
    InvalidBoolean {
        /// The offending field.
        field: &'static str,
    },

    /// A date string did not parse as a valid `d/M/yyyy` calendar date.
    #[error("{label} date is invalid.")]
    InvalidDate {
        /// Which date was invalid (e.g. "Start", "End", "Payroll").
        label: &'static str,
    },

    /// A range query was given a start date after its end date.
    #[error("Start date cannot be after end date.")]
    StartAfterEnd,

    /// The compensation type string was not one of the recognized variants.
    #[error("Invalid type.")]
    InvalidType,

    /// A recognized compensation type was used with the wrong constructor,
    /// or a type-specific attribute was requested on a non-matching type.
    #[error("Type not applicable.")]
    TypeNotApplicable,

    /// The payment method string was not one of the recognized variants.
    #[error("Invalid payment method.")]
    InvalidPaymentMethod,

    /// A ledger operation was applied to an employee of the wrong compensation type.
    #[error("Employee is not {expected}.")]
    WrongType {
        /// The compensation type the operation requires.
        expected: &'static str,
    },

    /// No employee exists with the given id.
    #[error("Employee does not exist.")]
    EmployeeNotFound,

    /// No employee (or not enough employees) matched a name lookup.
    #[error("There is no employee with that name.")]
    NameNotFound,

    /// No active union member holds the given union id.
    #[error("Union member does not exist.")]
    UnionMemberNotFound,

    /// The employee is not currently a union member.
    #[error("Employee is not a union member.")]
    NotUnionMember,

    /// Another active union member already holds this union id.
    #[error("There is already a union member with this id.")]
    DuplicateUnionId,

    /// An attribute name was not recognized by the dynamic dispatch layer.
    #[error("Attribute does not exist.")]
    UnknownAttribute,

    /// `undo` was called with an empty undo stack.
    #[error("There is no command to undo.")]
    NothingToUndo,

    /// `redo` was called with an empty redo stack.
    #[error("There is no command to redo.")]
    NothingToRedo,

    /// The operation was invoked after the system was shut down.
    #[error("System is closed.")]
    SystemShutdown,
}

/// A type alias for Results that return [`PayrollError`].
pub type PayrollResult<T> = Result<T, PayrollError>;
