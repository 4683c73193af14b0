//! Full-state snapshots and undo/redo history.
//!
//! Every mutating facade call pushes a snapshot of the four aggregates
//! before delegating. Snapshots are copy-on-write: each aggregate sits
//! behind an [`Arc`], cloning a [`SystemState`] only bumps four reference
//! counts, and a mutation copies just the aggregate it touches through
//! [`Arc::make_mut`]. History entries therefore share every aggregate the
//! operations between them never modified.

use std::sync::Arc;

use crate::error::{PayrollError, PayrollResult};
use crate::ledgers::{AttendanceLedger, SalesLedger, UnionFeeLedger};
use crate::registry::EmployeeRegistry;

/// The four aggregates restored together by undo/redo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemState {
    registry: Arc<EmployeeRegistry>,
    attendance: Arc<AttendanceLedger>,
    sales: Arc<SalesLedger>,
    fees: Arc<UnionFeeLedger>,
}

impl SystemState {
    /// An empty system: no employees, empty ledgers, id counter at the start.
    pub fn new() -> Self {
        SystemState {
            registry: Arc::new(EmployeeRegistry::new()),
            attendance: Arc::new(AttendanceLedger::new()),
            sales: Arc::new(SalesLedger::new()),
            fees: Arc::new(UnionFeeLedger::new()),
        }
    }

    /// Read access to the registry.
    pub fn registry(&self) -> &EmployeeRegistry {
        &self.registry
    }

    /// Read access to the attendance ledger.
    pub fn attendance(&self) -> &AttendanceLedger {
        &self.attendance
    }

    /// Read access to the sales ledger.
    pub fn sales(&self) -> &SalesLedger {
        &self.sales
    }

    /// Read access to the union fee ledger.
    pub fn fees(&self) -> &UnionFeeLedger {
        &self.fees
    }

    /// Copy-on-write access to the registry.
    pub fn registry_mut(&mut self) -> &mut EmployeeRegistry {
        Arc::make_mut(&mut self.registry)
    }

    /// Copy-on-write access to the attendance ledger.
    pub fn attendance_mut(&mut self) -> &mut AttendanceLedger {
        Arc::make_mut(&mut self.attendance)
    }

    /// Copy-on-write access to the sales ledger.
    pub fn sales_mut(&mut self) -> &mut SalesLedger {
        Arc::make_mut(&mut self.sales)
    }

    /// Copy-on-write access to the union fee ledger.
    pub fn fees_mut(&mut self) -> &mut UnionFeeLedger {
        Arc::make_mut(&mut self.fees)
    }
}

/// The undo/redo stacks.
#[derive(Debug, Default)]
pub struct History {
    undo: Vec<SystemState>,
    redo: Vec<SystemState>,
    closed: bool,
}

impl History {
    /// Creates empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes the pre-mutation state onto the undo stack and invalidates
    /// any redo entries.
    pub fn checkpoint(&mut self, current: &SystemState) {
        self.undo.push(current.clone());
        self.redo.clear();
    }

    /// Restores the most recent checkpoint, moving the current state onto
    /// the redo stack.
    pub fn undo(&mut self, current: &mut SystemState) -> PayrollResult<()> {
        if self.closed {
            return Err(PayrollError::SystemShutdown);
        }
        let restored = self.undo.pop().ok_or(PayrollError::NothingToUndo)?;
        self.redo.push(current.clone());
        *current = restored;
        Ok(())
    }

    /// Re-applies the most recently undone state, moving the current state
    /// back onto the undo stack.
    pub fn redo(&mut self, current: &mut SystemState) -> PayrollResult<()> {
        if self.closed {
            return Err(PayrollError::SystemShutdown);
        }
        let restored = self.redo.pop().ok_or(PayrollError::NothingToRedo)?;
        self.undo.push(current.clone());
        *current = restored;
        Ok(())
    }

    /// Drops the most recent checkpoint and restores it. Used when a
    /// mutation fails after checkpointing, so failed operations never
    /// become undo steps.
    pub fn rollback(&mut self, current: &mut SystemState) {
        if let Some(snapshot) = self.undo.pop() {
            *current = snapshot;
        }
    }

    /// Drops both stacks; used on engine initialization and full reset.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Marks the system closed; undo and redo fail from here on.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Whether [`History::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
