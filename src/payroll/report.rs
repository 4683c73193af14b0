//! Payroll runs and the fixed-width report.
//!
//! [`run_payroll`] settles every eligible employee and advances their
//! payment cursors; [`total_payroll`] computes the same grand total without
//! touching any state.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt::Write;

use crate::dates::{format_amount, format_hours};
use crate::error::PayrollResult;
use crate::ledgers::{AttendanceLedger, SalesLedger, UnionFeeLedger};
use crate::models::{
    Employee, EmployeeId, GroupTotals, Paycheck, PaycheckDetail,
};
use crate::registry::EmployeeRegistry;

use super::compute::compute_paycheck;
use super::period::pay_period;
use super::schedule::is_payday;

/// The settled rows of one payroll run, grouped by compensation type.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollSummary {
    /// The run date.
    pub date: NaiveDate,
    /// Hourly rows, sorted by name.
    pub hourly: Vec<Paycheck>,
    /// Salaried rows, sorted by name.
    pub salaried: Vec<Paycheck>,
    /// Commissioned rows, sorted by name.
    pub commissioned: Vec<Paycheck>,
}

impl PayrollSummary {
    /// Sum of gross pay across every group; the report's final line.
    pub fn grand_total(&self) -> Decimal {
        self.hourly
            .iter()
            .chain(&self.salaried)
            .chain(&self.commissioned)
            .map(|c| c.gross)
            .sum()
    }

    /// Renders the fixed-width grouped report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "PAYROLL FOR {}", self.date.format("%Y-%m-%d"));
        let _ = writeln!(out, "{}", "=".repeat(36));
        let _ = writeln!(out);

        self.render_hourly(&mut out);
        self.render_salaried(&mut out);
        self.render_commissioned(&mut out);

        let _ = writeln!(out, "TOTAL PAYROLL: {}", format_amount(self.grand_total()));
        out
    }

    fn render_hourly(&self, out: &mut String) {
        section_banner(out, "HOURLY");
        let _ = writeln!(
            out,
            "{:<36} {:>5} {:>5} {:>13} {:>10} {:>15} {}",
            "Name", "Hours", "Extra", "Gross Pay", "Deductions", "Net Pay", "Method"
        );
        let _ = writeln!(
            out,
            "{} {} {} {} {} {} {}",
            "=".repeat(36),
            "=".repeat(5),
            "=".repeat(5),
            "=".repeat(13),
            "=".repeat(10),
            "=".repeat(15),
            "=".repeat(38)
        );

        let mut totals = GroupTotals::default();
        let mut regular_total = Decimal::ZERO;
        let mut overtime_total = Decimal::ZERO;
        for check in &self.hourly {
            let (regular, overtime) = check.hours();
            regular_total += regular;
            overtime_total += overtime;
            totals.add(check);
            let _ = writeln!(
                out,
                "{:<36} {:>5} {:>5} {:>13} {:>10} {:>15} {}",
                check.name,
                format_hours(regular),
                format_hours(overtime),
                format_amount(check.gross),
                format_amount(check.deductions),
                format_amount(check.net),
                check.method
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<36} {:>5} {:>5} {:>13} {:>10} {:>15}",
            "TOTAL HOURLY",
            format_hours(regular_total),
            format_hours(overtime_total),
            format_amount(totals.gross),
            format_amount(totals.deductions),
            format_amount(totals.net)
        );
        let _ = writeln!(out);
    }

    fn render_salaried(&self, out: &mut String) {
        section_banner(out, "SALARIED");
        let _ = writeln!(
            out,
            "{:<48} {:>13} {:>10} {:>15} {}",
            "Name", "Gross Pay", "Deductions", "Net Pay", "Method"
        );
        let _ = writeln!(
            out,
            "{} {} {} {} {}",
            "=".repeat(48),
            "=".repeat(13),
            "=".repeat(10),
            "=".repeat(15),
            "=".repeat(38)
        );

        let mut totals = GroupTotals::default();
        for check in &self.salaried {
            totals.add(check);
            let _ = writeln!(
                out,
                "{:<48} {:>13} {:>10} {:>15} {}",
                check.name,
                format_amount(check.gross),
                format_amount(check.deductions),
                format_amount(check.net),
                check.method
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<48} {:>13} {:>10} {:>15}",
            "TOTAL SALARIED",
            format_amount(totals.gross),
            format_amount(totals.deductions),
            format_amount(totals.net)
        );
        let _ = writeln!(out);
    }

    fn render_commissioned(&self, out: &mut String) {
        section_banner(out, "COMMISSIONED");
        let _ = writeln!(
            out,
            "{:<21} {:>9} {:>9} {:>10} {:>13} {:>10} {:>15} {}",
            "Name", "Fixed", "Sales", "Commission", "Gross Pay", "Deductions", "Net Pay", "Method"
        );
        let _ = writeln!(
            out,
            "{} {} {} {} {} {} {} {}",
            "=".repeat(21),
            "=".repeat(9),
            "=".repeat(9),
            "=".repeat(10),
            "=".repeat(13),
            "=".repeat(10),
            "=".repeat(15),
            "=".repeat(38)
        );

        let mut totals = GroupTotals::default();
        for check in &self.commissioned {
            totals.add(check);
            let (fixed, sales, commission) = match &check.detail {
                PaycheckDetail::Commissioned {
                    fixed,
                    sales,
                    commission,
                } => (*fixed, *sales, *commission),
                _ => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
            };
            let _ = writeln!(
                out,
                "{:<21} {:>9} {:>9} {:>10} {:>13} {:>10} {:>15} {}",
                check.name,
                format_amount(fixed),
                format_amount(sales),
                format_amount(commission),
                format_amount(check.gross),
                format_amount(check.deductions),
                format_amount(check.net),
                check.method
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<21} {:>53} {:>10} {:>15}",
            "TOTAL COMMISSIONED",
            format_amount(totals.gross),
            format_amount(totals.deductions),
            format_amount(totals.net)
        );
        let _ = writeln!(out);
    }
}

fn section_banner(out: &mut String, title: &str) {
    let bar = "=".repeat(127);
    let _ = writeln!(out, "{}", bar);
    let mut header = format!("===================== {} ", title);
    while header.len() < 127 {
        header.push('=');
    }
    let _ = writeln!(out, "{}", header);
    let _ = writeln!(out, "{}", bar);
}

struct CursorUpdate {
    id: EmployeeId,
    debt: Decimal,
    cursor: NaiveDate,
}

struct RunOutcome {
    summary: PayrollSummary,
    updates: Vec<CursorUpdate>,
}

fn compute_run(
    registry: &EmployeeRegistry,
    attendance: &AttendanceLedger,
    sales: &SalesLedger,
    fees: &UnionFeeLedger,
    run_date: NaiveDate,
) -> PayrollResult<RunOutcome> {
    let mut hourly: Vec<&Employee> = Vec::new();
    let mut salaried: Vec<&Employee> = Vec::new();
    let mut commissioned: Vec<&Employee> = Vec::new();
    for e in registry.iter().filter(|e| is_payday(e, run_date)) {
        if e.is_hourly() {
            hourly.push(e);
        } else if e.is_commissioned() {
            commissioned.push(e);
        } else {
            salaried.push(e);
        }
    }
    for group in [&mut hourly, &mut salaried, &mut commissioned] {
        group.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let mut updates = Vec::new();
    let mut settle = |employees: &[&Employee]| -> PayrollResult<Vec<Paycheck>> {
        let mut checks = Vec::with_capacity(employees.len());
        for e in employees {
            match pay_period(e, run_date) {
                Some(period) => {
                    let pay = compute_paycheck(e, &period, attendance, sales, fees)?;
                    updates.push(CursorUpdate {
                        id: e.id,
                        debt: pay.new_debt,
                        cursor: pay.cursor,
                    });
                    checks.push(pay.check);
                }
                // Hourly employee who never clocked in: a zero row, no
                // cursor update.
                None => checks.push(zero_check(e)),
            }
        }
        Ok(checks)
    };

    let hourly = settle(&hourly)?;
    let salaried = settle(&salaried)?;
    let commissioned = settle(&commissioned)?;

    Ok(RunOutcome {
        summary: PayrollSummary {
            date: run_date,
            hourly,
            salaried,
            commissioned,
        },
        updates,
    })
}

fn zero_check(employee: &Employee) -> Paycheck {
    Paycheck {
        employee_id: employee.id,
        name: employee.name.clone(),
        method: employee.payment_method.describe(&employee.address),
        gross: Decimal::ZERO,
        deductions: Decimal::ZERO,
        net: Decimal::ZERO,
        detail: PaycheckDetail::Hourly {
            regular: Decimal::ZERO,
            overtime: Decimal::ZERO,
        },
    }
}

/// Settles every eligible employee on `run_date`.
///
/// Advances `last_payment` and stores the carried union debt on each paid
/// employee, then returns the grouped summary. No eligible employees is not
/// an error; the summary is simply empty.
pub fn run_payroll(
    registry: &mut EmployeeRegistry,
    attendance: &AttendanceLedger,
    sales: &SalesLedger,
    fees: &UnionFeeLedger,
    run_date: NaiveDate,
) -> PayrollResult<PayrollSummary> {
    let outcome = compute_run(registry, attendance, sales, fees, run_date)?;
    for update in &outcome.updates {
        let employee = registry.get_mut(update.id)?;
        employee.union_debt = update.debt;
        employee.last_payment = Some(update.cursor);
    }
    Ok(outcome.summary)
}

/// Computes the grand total that `run_payroll` would report for `run_date`,
/// without mutating any state.
pub fn total_payroll(
    registry: &EmployeeRegistry,
    attendance: &AttendanceLedger,
    sales: &SalesLedger,
    fees: &UnionFeeLedger,
    run_date: NaiveDate,
) -> PayrollResult<Decimal> {
    let outcome = compute_run(registry, attendance, sales, fees, run_date)?;
    Ok(outcome.summary.grand_total())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixture() -> (
        EmployeeRegistry,
        AttendanceLedger,
        SalesLedger,
        UnionFeeLedger,
    ) {
        let mut registry = EmployeeRegistry::new();
        let hourly = registry
            .create("Ana Lima", "Rua A", "hourly", "20")
            .unwrap();
        registry
            .create("Bruno Costa", "Rua B", "salaried", "1500")
            .unwrap();
        let commissioned = registry
            .create_commissioned("Carla Dias", "Rua C", "2600", "0.1")
            .unwrap();

        let mut attendance = AttendanceLedger::new();
        {
            let e = registry.get_mut(hourly).unwrap();
            e.admission_date = Some(date(2005, 1, 10));
        }
        attendance
            .record(
                registry.get(hourly).unwrap(),
                date(2005, 1, 12),
                dec("10"),
            )
            .unwrap();

        let mut sales = SalesLedger::new();
        sales
            .record(
                registry.get(commissioned).unwrap(),
                date(2005, 1, 10),
                dec("500"),
            )
            .unwrap();

        (registry, attendance, sales, UnionFeeLedger::new())
    }

    #[test]
    fn test_run_groups_and_totals() {
        let (mut registry, attendance, sales, fees) = fixture();
        // 14/1/2005 is a biweekly Friday but not a month end.
        let summary =
            run_payroll(&mut registry, &attendance, &sales, &fees, date(2005, 1, 14)).unwrap();

        assert_eq!(summary.hourly.len(), 1);
        assert!(summary.salaried.is_empty());
        assert_eq!(summary.commissioned.len(), 1);

        assert_eq!(summary.hourly[0].gross, dec("220"));
        // 1200 fixed + 50 commission
        assert_eq!(summary.commissioned[0].gross, dec("1250.00"));
        assert_eq!(summary.grand_total(), dec("1470.00"));
    }

    #[test]
    fn test_run_advances_cursors() {
        let (mut registry, attendance, sales, fees) = fixture();
        run_payroll(&mut registry, &attendance, &sales, &fees, date(2005, 1, 14)).unwrap();

        let hourly = registry.find_by_name("Ana Lima", 1).unwrap();
        assert_eq!(
            registry.get(hourly).unwrap().last_payment,
            Some(date(2005, 1, 14))
        );
        let salaried = registry.find_by_name("Bruno Costa", 1).unwrap();
        assert_eq!(registry.get(salaried).unwrap().last_payment, None);
    }

    #[test]
    fn test_total_payroll_is_pure() {
        let (mut registry, attendance, sales, fees) = fixture();
        let total =
            total_payroll(&registry, &attendance, &sales, &fees, date(2005, 1, 14)).unwrap();
        assert_eq!(total, dec("1470.00"));

        // The query changed nothing; a run now sees the same state.
        let summary =
            run_payroll(&mut registry, &attendance, &sales, &fees, date(2005, 1, 14)).unwrap();
        assert_eq!(summary.grand_total(), total);
    }

    #[test]
    fn test_no_eligible_employees_is_empty_not_error() {
        let (registry, attendance, sales, fees) = fixture();
        // A Monday: nobody is paid.
        let total =
            total_payroll(&registry, &attendance, &sales, &fees, date(2005, 1, 10)).unwrap();
        assert_eq!(total, Decimal::ZERO);
    }

    #[test]
    fn test_hourly_without_admission_gets_zero_row() {
        let mut registry = EmployeeRegistry::new();
        registry.create("Idle", "addr", "hourly", "20").unwrap();
        let (attendance, sales, fees) = (
            AttendanceLedger::new(),
            SalesLedger::new(),
            UnionFeeLedger::new(),
        );
        let summary =
            run_payroll(&mut registry, &attendance, &sales, &fees, date(2005, 1, 7)).unwrap();
        assert_eq!(summary.hourly.len(), 1);
        assert_eq!(summary.hourly[0].gross, Decimal::ZERO);
        let id = registry.find_by_name("Idle", 1).unwrap();
        assert_eq!(registry.get(id).unwrap().last_payment, None);
    }

    #[test]
    fn test_rows_sorted_by_name() {
        let mut registry = EmployeeRegistry::new();
        registry.create("Zana", "a", "salaried", "100").unwrap();
        registry.create("Alan", "b", "salaried", "100").unwrap();
        let (attendance, sales, fees) = (
            AttendanceLedger::new(),
            SalesLedger::new(),
            UnionFeeLedger::new(),
        );
        let summary =
            run_payroll(&mut registry, &attendance, &sales, &fees, date(2005, 1, 31)).unwrap();
        let names: Vec<_> = summary.salaried.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alan", "Zana"]);
    }

    #[test]
    fn test_render_contains_sections_and_grand_total() {
        let (mut registry, attendance, sales, fees) = fixture();
        let summary =
            run_payroll(&mut registry, &attendance, &sales, &fees, date(2005, 1, 14)).unwrap();
        let text = summary.render();

        assert!(text.starts_with("PAYROLL FOR 2005-01-14"));
        assert!(text.contains("===================== HOURLY "));
        assert!(text.contains("===================== SALARIED "));
        assert!(text.contains("===================== COMMISSIONED "));
        assert!(text.contains("Ana Lima"));
        assert!(text.contains("Carla Dias"));
        assert!(text.contains("TOTAL HOURLY"));
        assert!(text.contains("TOTAL PAYROLL: 1470.00"));
    }

    #[test]
    fn test_render_hourly_row_values() {
        let (mut registry, attendance, sales, fees) = fixture();
        let summary =
            run_payroll(&mut registry, &attendance, &sales, &fees, date(2005, 1, 14)).unwrap();
        let text = summary.render();
        let row = text
            .lines()
            .find(|l| l.starts_with("Ana Lima"))
            .expect("hourly row");
        assert!(row.contains("220.00"));
        assert!(row.contains("In hand"));
    }
}
