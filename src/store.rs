//! Flat-file persistence adapter.
//!
//! Each aggregate is saved to a `;`-delimited text file in a caller-supplied
//! directory: `employees.csv`, `attendance.csv`, `sales.csv` and
//! `union_fees.csv`. Dates are written `d/M/yyyy`, matching the external
//! date format used everywhere else.
//!
//! The employee layout carries no admission date, payment cursor or union
//! debt, so a reload is a best-effort snapshot rather than a full state
//! restore. Malformed lines are skipped with a warning on load, and save
//! failures are the caller's to log; the facade treats persistence as
//! best-effort throughout.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::dates;
use crate::history::SystemState;
use crate::models::{
    AttendanceRecord, CompensationType, Employee, EmployeeId, PaymentMethod, SaleRecord,
    UnionFeeRecord, UnionMembership,
};

const EMPLOYEES_FILE: &str = "employees.csv";
const ATTENDANCE_FILE: &str = "attendance.csv";
const SALES_FILE: &str = "sales.csv";
const UNION_FEES_FILE: &str = "union_fees.csv";

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Persists and reloads the full system state under one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on the
    /// first save if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    /// The directory the store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes all four aggregate files, replacing previous contents.
    pub fn save(&self, state: &SystemState) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(EMPLOYEES_FILE), encode_employees(state))?;
        fs::write(self.dir.join(ATTENDANCE_FILE), encode_attendance(state))?;
        fs::write(self.dir.join(SALES_FILE), encode_sales(state))?;
        fs::write(self.dir.join(UNION_FEES_FILE), encode_union_fees(state))?;
        Ok(())
    }

    /// Reads the aggregate files back into a fresh [`SystemState`].
    ///
    /// Missing files read as empty aggregates; lines that fail to decode
    /// are skipped with a warning.
    pub fn load(&self) -> io::Result<SystemState> {
        let mut state = SystemState::new();

        for line in self.read_lines(EMPLOYEES_FILE)? {
            match decode_employee(&line) {
                Some(employee) => state.registry_mut().restore(employee),
                None => warn!(file = EMPLOYEES_FILE, line, "skipping malformed record"),
            }
        }
        for line in self.read_lines(ATTENDANCE_FILE)? {
            match decode_attendance(&line) {
                Some((id, record)) => state.attendance_mut().restore(id, record),
                None => warn!(file = ATTENDANCE_FILE, line, "skipping malformed record"),
            }
        }
        for line in self.read_lines(SALES_FILE)? {
            match decode_sale(&line) {
                Some((id, record)) => state.sales_mut().restore(id, record),
                None => warn!(file = SALES_FILE, line, "skipping malformed record"),
            }
        }
        for line in self.read_lines(UNION_FEES_FILE)? {
            match decode_union_fee(&line) {
                Some(record) => state.fees_mut().restore(record),
                None => warn!(file = UNION_FEES_FILE, line, "skipping malformed record"),
            }
        }

        Ok(state)
    }

    /// Truncates all four files; used by `reset`.
    pub fn clear(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        for file in [EMPLOYEES_FILE, ATTENDANCE_FILE, SALES_FILE, UNION_FEES_FILE] {
            fs::write(self.dir.join(file), "")?;
        }
        Ok(())
    }

    fn read_lines(&self, file: &str) -> io::Result<Vec<String>> {
        let path = self.dir.join(file);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

// ----- encoding -----

fn encode_employees(state: &SystemState) -> String {
    let mut out = String::new();
    for e in state.registry().iter() {
        let commission = match &e.compensation {
            CompensationType::Commissioned {
                commission_rate, ..
            } => commission_rate.to_string(),
            _ => String::new(),
        };
        let (union_flag, union_id, daily_due) = match &e.union_membership {
            Some(m) => ("true", m.union_id.clone(), m.daily_due.to_string()),
            None => ("false", String::new(), String::new()),
        };
        let _ = writeln!(
            out,
            "{};{};{};{};{};{};{};{};{};{}",
            e.id.0,
            e.name,
            e.address,
            e.compensation.name(),
            e.compensation.base_pay(),
            union_flag,
            union_id,
            daily_due,
            commission,
            encode_method(&e.payment_method),
        );
    }
    out
}

fn encode_method(method: &PaymentMethod) -> String {
    match method {
        PaymentMethod::InHand => "in-hand".to_string(),
        PaymentMethod::Mail => "mail".to_string(),
        PaymentMethod::Bank {
            bank,
            branch,
            account,
        } => format!("bank:{}:{}:{}", bank, branch, account),
    }
}

fn encode_attendance(state: &SystemState) -> String {
    let mut out = String::new();
    for (id, rows) in state.attendance().iter() {
        for r in rows {
            let _ = writeln!(
                out,
                "{};{};{};{}",
                id.0,
                dates::format_date(r.date),
                r.regular,
                r.overtime,
            );
        }
    }
    out
}

fn encode_sales(state: &SystemState) -> String {
    let mut out = String::new();
    for (id, rows) in state.sales().iter() {
        for r in rows {
            let _ = writeln!(out, "{};{};{}", id.0, dates::format_date(r.date), r.amount);
        }
    }
    out
}

fn encode_union_fees(state: &SystemState) -> String {
    let mut out = String::new();
    for r in state.fees().iter() {
        let _ = writeln!(
            out,
            "{};{};{}",
            r.union_id,
            dates::format_date(r.date),
            r.amount,
        );
    }
    out
}

// ----- decoding -----

fn decode_employee(line: &str) -> Option<Employee> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() != 10 {
        return None;
    }
    let id = EmployeeId(fields[0].parse().ok()?);
    let salary = Decimal::from_str(fields[4]).ok()?;
    let compensation = match fields[3] {
        "hourly" => CompensationType::Hourly { rate: salary },
        "salaried" => CompensationType::Salaried {
            monthly_salary: salary,
        },
        "commissioned" => CompensationType::Commissioned {
            monthly_salary: salary,
            commission_rate: Decimal::from_str(fields[8]).ok()?,
        },
        _ => return None,
    };

    let mut employee = Employee::new(id, fields[1], fields[2], compensation);
    employee.union_membership = match fields[5] {
        "true" => Some(UnionMembership {
            union_id: fields[6].to_string(),
            daily_due: Decimal::from_str(fields[7]).ok()?,
        }),
        "false" => None,
        _ => return None,
    };
    employee.payment_method = decode_method(fields[9])?;
    Some(employee)
}

fn decode_method(field: &str) -> Option<PaymentMethod> {
    match field {
        "in-hand" => Some(PaymentMethod::InHand),
        "mail" => Some(PaymentMethod::Mail),
        _ => {
            let mut parts = field.splitn(4, ':');
            if parts.next()? != "bank" {
                return None;
            }
            Some(PaymentMethod::Bank {
                bank: parts.next()?.to_string(),
                branch: parts.next()?.to_string(),
                account: parts.next()?.to_string(),
            })
        }
    }
}

fn decode_attendance(line: &str) -> Option<(EmployeeId, AttendanceRecord)> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() != 4 {
        return None;
    }
    Some((
        EmployeeId(fields[0].parse().ok()?),
        AttendanceRecord {
            date: parse_date(fields[1])?,
            regular: Decimal::from_str(fields[2]).ok()?,
            overtime: Decimal::from_str(fields[3]).ok()?,
        },
    ))
}

fn decode_sale(line: &str) -> Option<(EmployeeId, SaleRecord)> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() != 3 {
        return None;
    }
    Some((
        EmployeeId(fields[0].parse().ok()?),
        SaleRecord {
            date: parse_date(fields[1])?,
            amount: Decimal::from_str(fields[2]).ok()?,
        },
    ))
}

fn decode_union_fee(line: &str) -> Option<UnionFeeRecord> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() != 3 {
        return None;
    }
    Some(UnionFeeRecord {
        union_id: fields[0].to_string(),
        date: parse_date(fields[1])?,
        amount: Decimal::from_str(fields[2]).ok()?,
    })
}

fn parse_date(field: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(field, DATE_FORMAT).ok()
}
