//! Union service-fee ledger.
//!
//! Fee rows are keyed by union id rather than registry id. Resolution to an
//! employee always goes through the registry's active-membership lookup, so
//! a fee recorded against `u1` follows whichever member currently holds
//! `u1` — the explicit indirection the payroll rules require.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::error::{PayrollError, PayrollResult};
use crate::models::UnionFeeRecord;

/// Append-only union fee records, grouped by union id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnionFeeLedger {
    records: BTreeMap<String, Vec<UnionFeeRecord>>,
}

impl UnionFeeLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fee against a union id.
    ///
    /// The caller resolves the id to an active member first; the ledger only
    /// validates the amount.
    pub fn record(
        &mut self,
        union_id: &str,
        date: NaiveDate,
        amount: Decimal,
    ) -> PayrollResult<()> {
        if amount <= Decimal::ZERO {
            return Err(PayrollError::NonPositiveValue { field: "Amount" });
        }
        self.records
            .entry(union_id.to_string())
            .or_default()
            .push(UnionFeeRecord {
                union_id: union_id.to_string(),
                date,
                amount,
            });
        Ok(())
    }

    /// Sums fees for a union id over the half-open range `[start, end)`.
    pub fn sum(&self, union_id: &str, start: NaiveDate, end: NaiveDate) -> PayrollResult<Decimal> {
        if start > end {
            return Err(PayrollError::StartAfterEnd);
        }
        Ok(self
            .rows(union_id)
            .iter()
            .filter(|r| r.date >= start && r.date < end)
            .map(|r| r.amount)
            .sum())
    }

    /// All fee rows charged to a union id, empty when none exist.
    pub fn rows(&self, union_id: &str) -> &[UnionFeeRecord] {
        self.records
            .get(union_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates every fee row; used by the persistence adapter.
    pub fn iter(&self) -> impl Iterator<Item = &UnionFeeRecord> {
        self.records.values().flatten()
    }

    /// Re-inserts a persisted record without validation.
    pub fn restore(&mut self, record: UnionFeeRecord) {
        self.records
            .entry(record.union_id.clone())
            .or_default()
            .push(record);
    }
}
