//! Date and numeric parsing and formatting.
//!
//! All external dates use the `d/M/yyyy` format (no zero padding, 4-digit
//! year) and are validated strictly: `31/2/2005` is rejected. Numeric input
//! accepts either `.` or `,` as the decimal separator.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::error::{PayrollError, PayrollResult};

/// Parses a strict `d/M/yyyy` date, failing with [`PayrollError::InvalidDate`]
/// carrying the given label.
///
/// # Example
///
/// ```
/// use payroll_engine::dates::parse_date;
/// use chrono::NaiveDate;
///
/// let date = parse_date("14/1/2005", "Payroll").unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(2005, 1, 14).unwrap());
/// assert!(parse_date("31/2/2005", "Payroll").is_err());
/// ```
pub fn parse_date(input: &str, label: &'static str) -> PayrollResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(input.trim(), "%d/%m/%Y")
        .map_err(|_| PayrollError::InvalidDate { label })?;
    // %Y accepts fewer than four digits; the external format requires four.
    if !(1000..=9999).contains(&date.year()) {
        return Err(PayrollError::InvalidDate { label });
    }
    Ok(date)
}

/// Formats a date back into the external `d/M/yyyy` form.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

/// Parses a decimal number, accepting `,` as the decimal separator.
pub fn parse_decimal(input: &str, field: &'static str) -> PayrollResult<Decimal> {
    let normalized = input.trim().replace(',', ".");
    Decimal::from_str(&normalized).map_err(|_| PayrollError::MalformedNumber { field })
}

/// Parses a decimal that must be zero or greater.
pub fn parse_non_negative(input: &str, field: &'static str) -> PayrollResult<Decimal> {
    if input.trim().is_empty() {
        return Err(PayrollError::EmptyField { field });
    }
    let value = parse_decimal(input, field)?;
    if value.is_sign_negative() {
        return Err(PayrollError::NegativeValue { field });
    }
    Ok(value)
}

/// Parses a decimal that must be strictly positive.
pub fn parse_positive(input: &str, field: &'static str) -> PayrollResult<Decimal> {
    if input.trim().is_empty() {
        return Err(PayrollError::EmptyField { field });
    }
    let value = parse_decimal(input, field)?;
    if value <= Decimal::ZERO {
        return Err(PayrollError::NonPositiveValue { field });
    }
    Ok(value)
}

/// Truncates a non-negative amount to two decimal places.
///
/// Used for the commissioned fixed portion and commission, which the pay
/// rules define with a floor rather than ordinary rounding.
pub fn floor2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}

/// Formats a monetary amount with exactly two decimal places.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Formats an hour total: a plain integer when the sum is whole, otherwise
/// one decimal place.
pub fn format_hours(hours: Decimal) -> String {
    if hours.fract().is_zero() {
        format!("{}", hours.normalize())
    } else {
        format!("{:.1}", hours)
    }
}

/// Counts the days in an inclusive date range.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}
