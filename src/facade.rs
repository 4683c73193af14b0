//! The payroll system facade.
//!
//! [`PayrollSystem`] is the single entry point callers interact with. It
//! owns the registry, the three ledgers, the undo/redo history and an
//! optional flat-file store, and exposes one method per external operation.
//! All external input arrives as strings (dates `d/M/yyyy`, numbers with
//! `.` or `,` as the decimal separator) and is validated at this boundary;
//! the inner modules work on parsed types.
//!
//! Every mutating method checkpoints the state before delegating, so each
//! successful call is one undo step. Failed calls leave no history entry.
//! When a store is attached, successful mutations trigger a best-effort
//! save; save failures are logged and never surfaced.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::dates;
use crate::error::{PayrollError, PayrollResult};
use crate::history::{History, SystemState};
use crate::models::{EmployeeId, PaymentMethod};
use crate::payroll;
use crate::store::FileStore;

/// The payroll engine: registry, ledgers, history and optional persistence
/// behind a single facade.
#[derive(Debug, Default)]
pub struct PayrollSystem {
    state: SystemState,
    history: History,
    store: Option<FileStore>,
}

impl PayrollSystem {
    /// Creates an in-memory system with no persistence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a system backed by flat files under `dir`, reloading any
    /// state persisted there. An unreadable directory starts empty.
    pub fn with_store(dir: impl Into<std::path::PathBuf>) -> Self {
        let store = FileStore::new(dir);
        let state = match store.load() {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, dir = %store.dir().display(), "could not load persisted state");
                SystemState::new()
            }
        };
        PayrollSystem {
            state,
            history: History::new(),
            store: Some(store),
        }
    }

    /// The current state; read access for reporting and diagnostics.
    pub fn state(&self) -> &SystemState {
        &self.state
    }

    // ----- lifecycle -----

    /// Discards everything: employees, ledgers, id counter and history.
    /// Truncates the persisted files when a store is attached.
    pub fn reset(&mut self) {
        self.state = SystemState::new();
        self.history.clear();
        if let Some(store) = &self.store {
            if let Err(e) = store.clear() {
                warn!(error = %e, "could not truncate persisted state");
            }
        }
        info!("system reset");
    }

    /// Persists the current state and closes the system. Undo and redo fail
    /// from here on.
    pub fn shutdown(&mut self) {
        self.autosave();
        self.history.close();
        info!("system shut down");
    }

    // ----- employee management -----

    /// Creates an hourly or salaried employee.
    pub fn create_employee(
        &mut self,
        name: &str,
        address: &str,
        employee_type: &str,
        salary: &str,
    ) -> PayrollResult<EmployeeId> {
        let id = self.mutate(|state| {
            state
                .registry_mut()
                .create(name, address, employee_type, salary)
        })?;
        info!(%id, employee_type, "employee created");
        Ok(id)
    }

    /// Creates a commissioned employee.
    pub fn create_commissioned_employee(
        &mut self,
        name: &str,
        address: &str,
        salary: &str,
        commission: &str,
    ) -> PayrollResult<EmployeeId> {
        let id = self.mutate(|state| {
            state
                .registry_mut()
                .create_commissioned(name, address, salary, commission)
        })?;
        info!(%id, "commissioned employee created");
        Ok(id)
    }

    /// Reads an employee attribute by its external name.
    pub fn attribute(&self, id: EmployeeId, attribute: &str) -> PayrollResult<String> {
        self.state.registry().attribute(id, attribute)
    }

    /// Finds the n-th (1-indexed, insertion order) employee with an exactly
    /// matching name.
    pub fn find_by_name(&self, name: &str, index: usize) -> PayrollResult<EmployeeId> {
        self.state.registry().find_by_name(name, index)
    }

    /// Removes an employee. Ledger history survives and the union id, if
    /// any, becomes reassignable.
    pub fn remove(&mut self, id: EmployeeId) -> PayrollResult<()> {
        self.mutate(|state| state.registry_mut().remove(id))?;
        info!(%id, "employee removed");
        Ok(())
    }

    /// Number of employees currently registered.
    pub fn employee_count(&self) -> usize {
        self.state.registry().count()
    }

    /// Applies a single-value attribute update.
    pub fn update_attribute(
        &mut self,
        id: EmployeeId,
        attribute: &str,
        value: &str,
    ) -> PayrollResult<()> {
        self.mutate(|state| state.registry_mut().update_attribute(id, attribute, value))
    }

    /// Switches compensation type; `hourly` takes the new rate and
    /// `commissioned` the new commission rate in `extra`.
    pub fn update_type(
        &mut self,
        id: EmployeeId,
        new_type: &str,
        extra: Option<&str>,
    ) -> PayrollResult<()> {
        self.mutate(|state| state.registry_mut().update_type(id, new_type, extra))
    }

    /// Enrolls an employee in the union.
    pub fn update_union_membership(
        &mut self,
        id: EmployeeId,
        union_id: &str,
        daily_due: &str,
    ) -> PayrollResult<()> {
        let due = dates::parse_non_negative(daily_due, "Union due")?;
        self.mutate(|state| state.registry_mut().set_union_membership(id, union_id, due))
    }

    /// Switches the payment method to a bank deposit.
    pub fn update_bank_account(
        &mut self,
        id: EmployeeId,
        bank: &str,
        branch: &str,
        account: &str,
    ) -> PayrollResult<()> {
        for (value, field) in [(bank, "Bank"), (branch, "Branch"), (account, "Account")] {
            if value.trim().is_empty() {
                return Err(PayrollError::EmptyField { field });
            }
        }
        let method = PaymentMethod::Bank {
            bank: bank.to_string(),
            branch: branch.to_string(),
            account: account.to_string(),
        };
        self.mutate(|state| state.registry_mut().set_payment_method(id, method))
    }

    // ----- ledgers -----

    /// Records hours worked by an hourly employee. The first entry fixes
    /// the employee's admission date.
    pub fn record_attendance(
        &mut self,
        id: EmployeeId,
        date: &str,
        hours: &str,
    ) -> PayrollResult<()> {
        let date = dates::parse_date(date, "Attendance")?;
        let hours = dates::parse_positive(hours, "Hours")?;
        self.mutate(|state| {
            let employee = state.registry().get(id)?.clone();
            state.attendance_mut().record(&employee, date, hours)?;
            let employee = state.registry_mut().get_mut(id)?;
            if employee.admission_date.is_none() {
                employee.admission_date = Some(date);
            }
            Ok(())
        })
    }

    /// Sums regular hours over `[start, end)`, formatted as an integer when
    /// whole and with one decimal place otherwise.
    pub fn sum_regular_hours(
        &self,
        id: EmployeeId,
        start: &str,
        end: &str,
    ) -> PayrollResult<String> {
        let (start, end) = parse_range(start, end)?;
        let employee = self.state.registry().get(id)?;
        let total = self.state.attendance().sum_regular(employee, start, end)?;
        Ok(dates::format_hours(total))
    }

    /// Sums overtime hours over `[start, end)`, formatted like
    /// [`PayrollSystem::sum_regular_hours`].
    pub fn sum_overtime_hours(
        &self,
        id: EmployeeId,
        start: &str,
        end: &str,
    ) -> PayrollResult<String> {
        let (start, end) = parse_range(start, end)?;
        let employee = self.state.registry().get(id)?;
        let total = self.state.attendance().sum_overtime(employee, start, end)?;
        Ok(dates::format_hours(total))
    }

    /// Records a sale by a commissioned employee.
    pub fn record_sale(&mut self, id: EmployeeId, date: &str, amount: &str) -> PayrollResult<()> {
        let date = dates::parse_date(date, "Sale")?;
        let amount = dates::parse_positive(amount, "Amount")?;
        self.mutate(|state| {
            let employee = state.registry().get(id)?.clone();
            state.sales_mut().record(&employee, date, amount)
        })
    }

    /// Sums sale amounts over `[start, end)`, two decimal places.
    pub fn sum_sales(&self, id: EmployeeId, start: &str, end: &str) -> PayrollResult<String> {
        let (start, end) = parse_range(start, end)?;
        let employee = self.state.registry().get(id)?;
        let total = self.state.sales().sum(employee, start, end)?;
        Ok(dates::format_amount(total))
    }

    /// Records a union service fee against a union id. The id must belong
    /// to a currently unionized employee.
    pub fn record_union_fee(
        &mut self,
        union_id: &str,
        date: &str,
        amount: &str,
    ) -> PayrollResult<()> {
        let date = dates::parse_date(date, "Fee")?;
        let amount = dates::parse_positive(amount, "Amount")?;
        self.mutate(|state| {
            state.registry().find_by_union_id(union_id)?;
            state.fees_mut().record(union_id, date, amount)
        })
    }

    /// Sums union fees charged to an employee over `[start, end)`, two
    /// decimal places. The employee must be a union member.
    pub fn sum_union_fees(&self, id: EmployeeId, start: &str, end: &str) -> PayrollResult<String> {
        let (start, end) = parse_range(start, end)?;
        let employee = self.state.registry().get(id)?;
        let union_id = employee
            .union_id()
            .ok_or(PayrollError::NotUnionMember)?
            .to_string();
        let total = self.state.fees().sum(&union_id, start, end)?;
        Ok(dates::format_amount(total))
    }

    // ----- payroll -----

    /// Runs payroll for a date, writing the grouped report to `output` and
    /// advancing payment cursors and union debt.
    ///
    /// A report that cannot be written is logged; the settlement itself
    /// still stands.
    pub fn run_payroll(&mut self, date: &str, output: impl AsRef<Path>) -> PayrollResult<()> {
        let run_date = dates::parse_date(date, "Payroll")?;
        let summary = self.mutate(|state| {
            let (attendance, sales, fees) =
                (state.attendance().clone(), state.sales().clone(), state.fees().clone());
            payroll::run_payroll(state.registry_mut(), &attendance, &sales, &fees, run_date)
        })?;
        info!(date = %run_date, total = %summary.grand_total(), "payroll run");

        if let Err(e) = fs::write(output.as_ref(), summary.render()) {
            warn!(error = %e, path = %output.as_ref().display(), "could not write payroll report");
        }
        Ok(())
    }

    /// The grand total `run_payroll` would report for a date, two decimal
    /// places. Mutates nothing.
    pub fn total_payroll(&self, date: &str) -> PayrollResult<String> {
        let run_date = dates::parse_date(date, "Payroll")?;
        let total = payroll::total_payroll(
            self.state.registry(),
            self.state.attendance(),
            self.state.sales(),
            self.state.fees(),
            run_date,
        )?;
        Ok(dates::format_amount(total))
    }

    // ----- history -----

    /// Reverts the most recent successful mutation.
    pub fn undo(&mut self) -> PayrollResult<()> {
        self.history.undo(&mut self.state)?;
        self.autosave();
        Ok(())
    }

    /// Re-applies the most recently undone mutation.
    pub fn redo(&mut self) -> PayrollResult<()> {
        self.history.redo(&mut self.state)?;
        self.autosave();
        Ok(())
    }

    // ----- internals -----

    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut SystemState) -> PayrollResult<T>,
    ) -> PayrollResult<T> {
        self.history.checkpoint(&self.state);
        match op(&mut self.state) {
            Ok(value) => {
                self.autosave();
                Ok(value)
            }
            Err(e) => {
                self.history.rollback(&mut self.state);
                Err(e)
            }
        }
    }

    fn autosave(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.state) {
                warn!(error = %e, "could not persist state");
            }
        }
    }
}

fn parse_range(start: &str, end: &str) -> PayrollResult<(NaiveDate, NaiveDate)> {
    Ok((
        dates::parse_date(start, "Start")?,
        dates::parse_date(end, "End")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hourly_union_member(system: &mut PayrollSystem) -> EmployeeId {
        let id = system
            .create_employee("Maria Souza", "Rua A, 123", "hourly", "25")
            .unwrap();
        system.update_union_membership(id, "u1", "3,5").unwrap();
        id
    }

    #[test]
    fn test_create_and_read_attributes() {
        let mut system = PayrollSystem::new();
        let id = system
            .create_employee("Maria Souza", "Rua A, 123", "salaried", "1500,50")
            .unwrap();
        assert_eq!(system.attribute(id, "name").unwrap(), "Maria Souza");
        assert_eq!(system.attribute(id, "type").unwrap(), "salaried");
        assert_eq!(system.attribute(id, "salary").unwrap(), "1500.50");
        assert_eq!(system.employee_count(), 1);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut system = PayrollSystem::new();
        let id = hourly_union_member(&mut system);

        system.undo().unwrap();
        assert_eq!(system.attribute(id, "unionized").unwrap(), "false");
        system.undo().unwrap();
        assert_eq!(system.employee_count(), 0);

        system.redo().unwrap();
        system.redo().unwrap();
        assert_eq!(system.attribute(id, "unionized").unwrap(), "true");
        assert_eq!(system.attribute(id, "union_id").unwrap(), "u1");
    }

    #[test]
    fn test_failed_mutation_leaves_no_history() {
        let mut system = PayrollSystem::new();
        assert_eq!(
            system.create_employee("", "addr", "hourly", "10"),
            Err(PayrollError::EmptyField { field: "Name" })
        );
        assert_eq!(system.undo(), Err(PayrollError::NothingToUndo));
    }

    #[test]
    fn test_first_attendance_fixes_admission_date() {
        let mut system = PayrollSystem::new();
        let id = system
            .create_employee("Ana", "addr", "hourly", "20")
            .unwrap();
        system.record_attendance(id, "3/1/2005", "8").unwrap();
        system.record_attendance(id, "1/1/2005", "8").unwrap();

        let employee = system.state().registry().get(id).unwrap();
        assert_eq!(
            employee.admission_date,
            chrono::NaiveDate::from_ymd_opt(2005, 1, 3)
        );
    }

    #[test]
    fn test_hour_sums_are_formatted() {
        let mut system = PayrollSystem::new();
        let id = system
            .create_employee("Ana", "addr", "hourly", "20")
            .unwrap();
        system.record_attendance(id, "3/1/2005", "8").unwrap();
        system.record_attendance(id, "4/1/2005", "9,5").unwrap();

        assert_eq!(
            system.sum_regular_hours(id, "1/1/2005", "8/1/2005").unwrap(),
            "16"
        );
        assert_eq!(
            system
                .sum_overtime_hours(id, "1/1/2005", "8/1/2005")
                .unwrap(),
            "1.5"
        );
    }

    #[test]
    fn test_union_fee_flow() {
        let mut system = PayrollSystem::new();
        let id = hourly_union_member(&mut system);

        system.record_union_fee("u1", "5/1/2005", "2").unwrap();
        assert_eq!(
            system.record_union_fee("u9", "5/1/2005", "2"),
            Err(PayrollError::UnionMemberNotFound)
        );
        assert_eq!(
            system.sum_union_fees(id, "1/1/2005", "8/1/2005").unwrap(),
            "2.00"
        );
    }

    #[test]
    fn test_sum_union_fees_requires_membership() {
        let mut system = PayrollSystem::new();
        let id = system
            .create_employee("Solo", "addr", "salaried", "1000")
            .unwrap();
        assert_eq!(
            system.sum_union_fees(id, "1/1/2005", "8/1/2005"),
            Err(PayrollError::NotUnionMember)
        );
    }

    #[test]
    fn test_sales_flow() {
        let mut system = PayrollSystem::new();
        let id = system
            .create_commissioned_employee("Carla", "addr", "2600", "0,1")
            .unwrap();
        system.record_sale(id, "10/1/2005", "499,90").unwrap();
        assert_eq!(
            system.sum_sales(id, "1/1/2005", "15/1/2005").unwrap(),
            "499.90"
        );
    }

    #[test]
    fn test_run_payroll_writes_report_and_advances_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("payroll.txt");

        let mut system = PayrollSystem::new();
        let id = system
            .create_employee("Ana", "addr", "hourly", "20")
            .unwrap();
        system.record_attendance(id, "12/1/2005", "10").unwrap();

        system.run_payroll("14/1/2005", &report).unwrap();

        let text = fs::read_to_string(&report).unwrap();
        assert!(text.contains("TOTAL PAYROLL: 220.00"));
        let employee = system.state().registry().get(id).unwrap();
        assert_eq!(
            employee.last_payment,
            chrono::NaiveDate::from_ymd_opt(2005, 1, 14)
        );
    }

    #[test]
    fn test_total_payroll_does_not_mutate() {
        let mut system = PayrollSystem::new();
        let id = system
            .create_employee("Ana", "addr", "hourly", "20")
            .unwrap();
        system.record_attendance(id, "12/1/2005", "10").unwrap();

        assert_eq!(system.total_payroll("14/1/2005").unwrap(), "220.00");
        assert_eq!(
            system.state().registry().get(id).unwrap().last_payment,
            None
        );
        // Queries are not undoable steps.
        system.undo().unwrap();
        system.undo().unwrap();
        assert_eq!(system.undo(), Err(PayrollError::NothingToUndo));
    }

    #[test]
    fn test_undo_after_payroll_restores_cursor_and_debt() {
        let mut system = PayrollSystem::new();
        let id = system
            .create_employee("Ana", "addr", "hourly", "20")
            .unwrap();
        system.record_attendance(id, "12/1/2005", "8").unwrap();
        let report = tempfile::NamedTempFile::new().unwrap();
        system.run_payroll("14/1/2005", report.path()).unwrap();
        assert!(system.state().registry().get(id).unwrap().last_payment.is_some());

        system.undo().unwrap();
        assert_eq!(system.state().registry().get(id).unwrap().last_payment, None);
    }

    #[test]
    fn test_shutdown_blocks_undo_redo() {
        let mut system = PayrollSystem::new();
        hourly_union_member(&mut system);
        system.shutdown();
        assert_eq!(system.undo(), Err(PayrollError::SystemShutdown));
        assert_eq!(system.redo(), Err(PayrollError::SystemShutdown));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut system = PayrollSystem::new();
        hourly_union_member(&mut system);
        system.reset();
        assert_eq!(system.employee_count(), 0);
        assert_eq!(system.undo(), Err(PayrollError::NothingToUndo));
        // The id counter restarts too.
        let id = system
            .create_employee("Novo", "addr", "hourly", "10")
            .unwrap();
        assert_eq!(id, EmployeeId(1));
    }

    #[test]
    fn test_state_survives_restart_with_store() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut system = PayrollSystem::with_store(dir.path());
            hourly_union_member(&mut system);
            system.shutdown();
        }
        let system = PayrollSystem::with_store(dir.path());
        assert_eq!(system.employee_count(), 1);
        let id = system.find_by_name("Maria Souza", 1).unwrap();
        assert_eq!(system.attribute(id, "union_id").unwrap(), "u1");
    }
}
