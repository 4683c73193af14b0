//! Employee entity and related types.
//!
//! This module defines the [`Employee`] struct along with the
//! [`CompensationType`], [`PaymentMethod`] and [`UnionMembership`] types
//! that describe how an employee is paid.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque registry-assigned employee identifier.
///
/// Ids come from a monotonic counter and are never reused, even after the
/// employee is removed. The display form is `id{n}`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EmployeeId(pub u64);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id{}", self.0)
    }
}

/// The three mutually exclusive compensation arrangements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum CompensationType {
    /// Paid per hour worked, with overtime at 1.5x past 8 hours a day.
    Hourly {
        /// The hourly rate.
        rate: Decimal,
    },
    /// Paid a fixed monthly salary on the last day of the month.
    Salaried {
        /// The monthly salary.
        monthly_salary: Decimal,
    },
    /// Paid biweekly: a fixed portion of the monthly salary plus commission
    /// on sales in the period.
    Commissioned {
        /// The monthly salary the fixed portion derives from.
        monthly_salary: Decimal,
        /// The commission rate applied to sales.
        commission_rate: Decimal,
    },
}

impl CompensationType {
    /// The external name of this variant (`hourly`, `salaried`, `commissioned`).
    pub fn name(&self) -> &'static str {
        match self {
            CompensationType::Hourly { .. } => "hourly",
            CompensationType::Salaried { .. } => "salaried",
            CompensationType::Commissioned { .. } => "commissioned",
        }
    }

    /// The base salary or rate figure, whichever the variant carries.
    pub fn base_pay(&self) -> Decimal {
        match self {
            CompensationType::Hourly { rate } => *rate,
            CompensationType::Salaried { monthly_salary } => *monthly_salary,
            CompensationType::Commissioned { monthly_salary, .. } => *monthly_salary,
        }
    }
}

/// How an employee receives their pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "method")]
pub enum PaymentMethod {
    /// Collected in person at the office. The default.
    InHand,
    /// Posted to the employee's address.
    Mail,
    /// Deposited into a bank account.
    Bank {
        /// The bank name.
        bank: String,
        /// The branch identifier.
        branch: String,
        /// The account number.
        account: String,
    },
}

impl PaymentMethod {
    /// The external name of this variant (`in-hand`, `mail`, `bank`).
    pub fn name(&self) -> &'static str {
        match self {
            PaymentMethod::InHand => "in-hand",
            PaymentMethod::Mail => "mail",
            PaymentMethod::Bank { .. } => "bank",
        }
    }

    /// The human description printed in the payroll report.
    ///
    /// `Mail` includes the employee's address, so it takes the address of
    /// the owning employee.
    pub fn describe(&self, address: &str) -> String {
        match self {
            PaymentMethod::InHand => "In hand".to_string(),
            PaymentMethod::Mail => format!("Mail, {}", address),
            PaymentMethod::Bank {
                bank,
                branch,
                account,
            } => format!("Bank {}, branch {}, account {}", bank, branch, account),
        }
    }
}

/// Active union membership details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionMembership {
    /// The union-assigned member id; unique among active members.
    pub union_id: String,
    /// The daily due prorated over each pay period.
    pub daily_due: Decimal,
}

/// An employee tracked by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Registry-assigned identifier.
    pub id: EmployeeId,
    /// Full name; non-empty.
    pub name: String,
    /// Postal address; non-empty.
    pub address: String,
    /// The active compensation arrangement.
    pub compensation: CompensationType,
    /// Union membership, when the employee is currently unionized.
    pub union_membership: Option<UnionMembership>,
    /// How pay is delivered.
    pub payment_method: PaymentMethod,
    /// For hourly employees, the date of their first attendance entry.
    pub admission_date: Option<NaiveDate>,
    /// The run date of the last successful payment, if any.
    pub last_payment: Option<NaiveDate>,
    /// Deductions carried forward from periods where pay could not cover them.
    pub union_debt: Decimal,
}

impl Employee {
    /// Creates an employee with default payment method and no history.
    pub fn new(
        id: EmployeeId,
        name: impl Into<String>,
        address: impl Into<String>,
        compensation: CompensationType,
    ) -> Self {
        Employee {
            id,
            name: name.into(),
            address: address.into(),
            compensation,
            union_membership: None,
            payment_method: PaymentMethod::InHand,
            admission_date: None,
            last_payment: None,
            union_debt: Decimal::ZERO,
        }
    }

    /// Returns true if the employee is paid hourly.
    pub fn is_hourly(&self) -> bool {
        matches!(self.compensation, CompensationType::Hourly { .. })
    }

    /// Returns true if the employee is commissioned.
    pub fn is_commissioned(&self) -> bool {
        matches!(self.compensation, CompensationType::Commissioned { .. })
    }

    /// Returns true if the employee is currently a union member.
    pub fn is_unionized(&self) -> bool {
        self.union_membership.is_some()
    }

    /// The current union id, if unionized.
    pub fn union_id(&self) -> Option<&str> {
        self.union_membership.as_ref().map(|m| m.union_id.as_str())
    }

    /// The daily union due, zero for non-members.
    pub fn daily_due(&self) -> Decimal {
        self.union_membership
            .as_ref()
            .map(|m| m.daily_due)
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn hourly_employee() -> Employee {
        Employee::new(
            EmployeeId(1),
            "Maria Souza",
            "Rua A, 123",
            CompensationType::Hourly { rate: dec("20") },
        )
    }

    #[test]
    fn test_employee_id_display() {
        assert_eq!(EmployeeId(7).to_string(), "id7");
    }

    #[test]
    fn test_new_employee_defaults() {
        let e = hourly_employee();
        assert_eq!(e.payment_method, PaymentMethod::InHand);
        assert!(e.union_membership.is_none());
        assert!(e.admission_date.is_none());
        assert!(e.last_payment.is_none());
        assert_eq!(e.union_debt, Decimal::ZERO);
    }

    #[test]
    fn test_compensation_type_names() {
        assert_eq!(CompensationType::Hourly { rate: dec("1") }.name(), "hourly");
        assert_eq!(
            CompensationType::Salaried {
                monthly_salary: dec("1")
            }
            .name(),
            "salaried"
        );
        assert_eq!(
            CompensationType::Commissioned {
                monthly_salary: dec("1"),
                commission_rate: dec("0.1")
            }
            .name(),
            "commissioned"
        );
    }

    #[test]
    fn test_is_hourly_and_commissioned() {
        let e = hourly_employee();
        assert!(e.is_hourly());
        assert!(!e.is_commissioned());
    }

    #[test]
    fn test_daily_due_zero_for_non_member() {
        let e = hourly_employee();
        assert_eq!(e.daily_due(), Decimal::ZERO);
        assert_eq!(e.union_id(), None);
    }

    #[test]
    fn test_daily_due_for_member() {
        let mut e = hourly_employee();
        e.union_membership = Some(UnionMembership {
            union_id: "u1".to_string(),
            daily_due: dec("1.5"),
        });
        assert_eq!(e.daily_due(), dec("1.5"));
        assert_eq!(e.union_id(), Some("u1"));
    }

    #[test]
    fn test_payment_method_descriptions() {
        assert_eq!(PaymentMethod::InHand.describe("addr"), "In hand");
        assert_eq!(PaymentMethod::Mail.describe("Rua A, 123"), "Mail, Rua A, 123");
        let bank = PaymentMethod::Bank {
            bank: "First National".to_string(),
            branch: "042".to_string(),
            account: "99-1".to_string(),
        };
        assert_eq!(
            bank.describe("addr"),
            "Bank First National, branch 042, account 99-1"
        );
    }

    #[test]
    fn test_serialize_employee_round_trip() {
        let mut e = hourly_employee();
        e.union_membership = Some(UnionMembership {
            union_id: "u1".to_string(),
            daily_due: dec("1.5"),
        });
        e.admission_date = NaiveDate::from_ymd_opt(2005, 3, 1);

        let json = serde_json::to_string(&e).unwrap();
        let back: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }

    #[test]
    fn test_compensation_type_serialization_tag() {
        let json = serde_json::to_string(&CompensationType::Salaried {
            monthly_salary: dec("2500"),
        })
        .unwrap();
        assert!(json.contains("\"type\":\"salaried\""));
    }
}
