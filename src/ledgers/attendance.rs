//! Attendance ledger for hourly employees.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{AttendanceRecord, Employee, EmployeeId};

/// Append-only per-employee attendance records.
///
/// At most one record exists per (employee, date); repeat entries for the
/// same date accumulate and the day's total is re-split at the 8-hour cap.
/// Rows outlive their employee: removing an employee from the registry does
/// not purge their history here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceLedger {
    records: BTreeMap<EmployeeId, Vec<AttendanceRecord>>,
}

impl AttendanceLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records hours worked on a date.
    ///
    /// Fails with [`PayrollError::WrongType`] for non-hourly employees and
    /// [`PayrollError::NonPositiveValue`] for zero or negative hours.
    pub fn record(
        &mut self,
        employee: &Employee,
        date: NaiveDate,
        hours: Decimal,
    ) -> PayrollResult<()> {
        if !employee.is_hourly() {
            return Err(PayrollError::WrongType { expected: "hourly" });
        }
        if hours <= Decimal::ZERO {
            return Err(PayrollError::NonPositiveValue { field: "Hours" });
        }

        let rows = self.records.entry(employee.id).or_default();
        match rows.iter_mut().find(|r| r.date == date) {
            Some(existing) => existing.accumulate(hours),
            None => rows.push(AttendanceRecord::from_total(date, hours)),
        }
        Ok(())
    }

    /// Sums regular hours over the half-open range `[start, end)`.
    pub fn sum_regular(
        &self,
        employee: &Employee,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<Decimal> {
        self.sum(employee, start, end, |r| r.regular)
    }

    /// Sums overtime hours over the half-open range `[start, end)`.
    pub fn sum_overtime(
        &self,
        employee: &Employee,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<Decimal> {
        self.sum(employee, start, end, |r| r.overtime)
    }

    fn sum(
        &self,
        employee: &Employee,
        start: NaiveDate,
        end: NaiveDate,
        pick: impl Fn(&AttendanceRecord) -> Decimal,
    ) -> PayrollResult<Decimal> {
        if !employee.is_hourly() {
            return Err(PayrollError::WrongType { expected: "hourly" });
        }
        if start > end {
            return Err(PayrollError::StartAfterEnd);
        }
        Ok(self
            .rows(employee.id)
            .iter()
            .filter(|r| r.date >= start && r.date < end)
            .map(pick)
            .sum())
    }

    /// All records for an employee, empty when none exist.
    pub fn rows(&self, id: EmployeeId) -> &[AttendanceRecord] {
        self.records.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates (employee, records) pairs; used by the persistence adapter.
    pub fn iter(&self) -> impl Iterator<Item = (EmployeeId, &[AttendanceRecord])> {
        self.records.iter().map(|(id, rows)| (*id, rows.as_slice()))
    }

    /// Re-inserts a persisted record without validation.
    pub fn restore(&mut self, id: EmployeeId, record: AttendanceRecord) {
        self.records.entry(id).or_default().push(record);
    }
}
