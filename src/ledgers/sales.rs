//! Sales ledger for commissioned employees.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Employee, EmployeeId, SaleRecord};

/// Append-only per-employee sale records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesLedger {
    records: BTreeMap<EmployeeId, Vec<SaleRecord>>,
}

impl SalesLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a sale for a commissioned employee.
    pub fn record(
        &mut self,
        employee: &Employee,
        date: NaiveDate,
        amount: Decimal,
    ) -> PayrollResult<()> {
        if !employee.is_commissioned() {
            return Err(PayrollError::WrongType {
                expected: "commissioned",
            });
        }
        if amount <= Decimal::ZERO {
            return Err(PayrollError::NonPositiveValue { field: "Amount" });
        }
        self.records
            .entry(employee.id)
            .or_default()
            .push(SaleRecord { date, amount });
        Ok(())
    }

    /// Sums sale amounts over the half-open range `[start, end)`.
    pub fn sum(
        &self,
        employee: &Employee,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<Decimal> {
        if !employee.is_commissioned() {
            return Err(PayrollError::WrongType {
                expected: "commissioned",
            });
        }
        if start > end {
            return Err(PayrollError::StartAfterEnd);
        }
        Ok(self
            .rows(employee.id)
            .iter()
            .filter(|r| r.date >= start && r.date < end)
            .map(|r| r.amount)
            .sum())
    }

    /// All records for an employee, empty when none exist.
    pub fn rows(&self, id: EmployeeId) -> &[SaleRecord] {
        self.records.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates (employee, records) pairs; used by the persistence adapter.
    pub fn iter(&self) -> impl Iterator<Item = (EmployeeId, &[SaleRecord])> {
        self.records.iter().map(|(id, rows)| (*id, rows.as_slice()))
    }

    /// Re-inserts a persisted record without validation.
    pub fn restore(&mut self, id: EmployeeId, record: SaleRecord) {
        self.records.entry(id).or_default().push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompensationType;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2005, 3, d).unwrap()
    }

    fn commissioned() -> Employee {
        Employee::new(
            EmployeeId(1),
            "A",
            "addr",
            CompensationType::Commissioned {
                monthly_salary: dec("2600"),
                commission_rate: dec("0.1"),
            },
        )
    }

    fn hourly() -> Employee {
        Employee::new(
            EmployeeId(2),
            "B",
            "addr",
            CompensationType::Hourly { rate: dec("20") },
        )
    }

    #[test]
    fn test_record_and_sum() {
        let mut ledger = SalesLedger::new();
        let e = commissioned();
        ledger.record(&e, date(1), dec("100.50")).unwrap();
        ledger.record(&e, date(3), dec("49.50")).unwrap();
        assert_eq!(ledger.sum(&e, date(1), date(10)).unwrap(), dec("150.00"));
    }

    #[test]
    fn test_sum_excludes_end_date() {
        let mut ledger = SalesLedger::new();
        let e = commissioned();
        ledger.record(&e, date(5), dec("100")).unwrap();
        assert_eq!(ledger.sum(&e, date(1), date(5)).unwrap(), Decimal::ZERO);
        assert_eq!(ledger.sum(&e, date(5), date(6)).unwrap(), dec("100"));
    }

    #[test]
    fn test_record_rejects_non_commissioned() {
        let mut ledger = SalesLedger::new();
        assert_eq!(
            ledger.record(&hourly(), date(1), dec("100")),
            Err(PayrollError::WrongType {
                expected: "commissioned"
            })
        );
    }

    #[test]
    fn test_record_rejects_non_positive_amount() {
        let mut ledger = SalesLedger::new();
        assert_eq!(
            ledger.record(&commissioned(), date(1), dec("0")),
            Err(PayrollError::NonPositiveValue { field: "Amount" })
        );
    }

    #[test]
    fn test_sum_rejects_inverted_range() {
        let ledger = SalesLedger::new();
        assert_eq!(
            ledger.sum(&commissioned(), date(5), date(1)),
            Err(PayrollError::StartAfterEnd)
        );
    }
}
