//! Employee registry.
//!
//! Owns the employee entities, assigns ids from a monotonic counter, and
//! provides attribute-level reads and updates. Known attributes go through
//! typed setters; the string-keyed [`EmployeeRegistry::attribute`] and
//! [`EmployeeRegistry::update_attribute`] layer exists only for dynamic
//! external input and reports unrecognized names as a distinct error.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::dates;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{CompensationType, Employee, EmployeeId, PaymentMethod, UnionMembership};

/// The registry of employees.
///
/// Ids are assigned from a counter that is never rewound by removals, so an
/// id observed once refers to the same employee forever. Iteration order is
/// id order, which equals insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRegistry {
    employees: BTreeMap<EmployeeId, Employee>,
    union_index: HashMap<String, EmployeeId>,
    next_id: u64,
}

impl Default for EmployeeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EmployeeRegistry {
    /// Creates an empty registry with the id counter at its start.
    pub fn new() -> Self {
        EmployeeRegistry {
            employees: BTreeMap::new(),
            union_index: HashMap::new(),
            next_id: 1,
        }
    }

    /// Creates an hourly or salaried employee from external string input.
    ///
    /// `commissioned` is rejected with [`PayrollError::TypeNotApplicable`]
    /// because it needs a commission rate; use
    /// [`EmployeeRegistry::create_commissioned`] instead. Unrecognized type
    /// strings fail with [`PayrollError::InvalidType`].
    pub fn create(
        &mut self,
        name: &str,
        address: &str,
        employee_type: &str,
        salary: &str,
    ) -> PayrollResult<EmployeeId> {
        validate_text(name, "Name")?;
        validate_text(address, "Address")?;

        let compensation = match employee_type.to_ascii_lowercase().as_str() {
            "hourly" => CompensationType::Hourly {
                rate: dates::parse_non_negative(salary, "Salary")?,
            },
            "salaried" => CompensationType::Salaried {
                monthly_salary: dates::parse_non_negative(salary, "Salary")?,
            },
            "commissioned" => return Err(PayrollError::TypeNotApplicable),
            _ => return Err(PayrollError::InvalidType),
        };

        Ok(self.insert(name, address, compensation))
    }

    /// Creates a commissioned employee from external string input.
    pub fn create_commissioned(
        &mut self,
        name: &str,
        address: &str,
        salary: &str,
        commission: &str,
    ) -> PayrollResult<EmployeeId> {
        validate_text(name, "Name")?;
        validate_text(address, "Address")?;

        let compensation = CompensationType::Commissioned {
            monthly_salary: dates::parse_non_negative(salary, "Salary")?,
            commission_rate: dates::parse_non_negative(commission, "Commission")?,
        };

        Ok(self.insert(name, address, compensation))
    }

    fn insert(&mut self, name: &str, address: &str, compensation: CompensationType) -> EmployeeId {
        let id = EmployeeId(self.next_id);
        self.next_id += 1;
        self.employees
            .insert(id, Employee::new(id, name, address, compensation));
        id
    }

    /// Looks up an employee by id.
    pub fn get(&self, id: EmployeeId) -> PayrollResult<&Employee> {
        self.employees.get(&id).ok_or(PayrollError::EmployeeNotFound)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: EmployeeId) -> PayrollResult<&mut Employee> {
        self.employees
            .get_mut(&id)
            .ok_or(PayrollError::EmployeeNotFound)
    }

    /// Returns the id of the n-th (1-indexed, insertion order) employee with
    /// an exactly matching name.
    pub fn find_by_name(&self, name: &str, index: usize) -> PayrollResult<EmployeeId> {
        if index < 1 {
            return Err(PayrollError::NameNotFound);
        }
        self.employees
            .values()
            .filter(|e| e.name == name)
            .nth(index - 1)
            .map(|e| e.id)
            .ok_or(PayrollError::NameNotFound)
    }

    /// Resolves an active union id to its member's registry id.
    pub fn find_by_union_id(&self, union_id: &str) -> PayrollResult<EmployeeId> {
        self.union_index
            .get(union_id)
            .copied()
            .ok_or(PayrollError::UnionMemberNotFound)
    }

    /// Removes an employee. Historical ledger rows are untouched and the
    /// union id, if any, becomes immediately reassignable.
    pub fn remove(&mut self, id: EmployeeId) -> PayrollResult<()> {
        let employee = self.employees.remove(&id).ok_or(PayrollError::EmployeeNotFound)?;
        if let Some(membership) = employee.union_membership {
            self.union_index.remove(&membership.union_id);
        }
        Ok(())
    }

    /// Re-inserts a persisted employee under its original id.
    ///
    /// Keeps the id counter ahead of every restored id so later creations
    /// never collide.
    pub fn restore(&mut self, employee: Employee) {
        if let Some(membership) = &employee.union_membership {
            self.union_index.insert(membership.union_id.clone(), employee.id);
        }
        self.next_id = self.next_id.max(employee.id.0 + 1);
        self.employees.insert(employee.id, employee);
    }

    /// Number of employees currently registered.
    pub fn count(&self) -> usize {
        self.employees.len()
    }

    /// Iterates employees in id (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = &Employee> {
        self.employees.values()
    }

    // ----- dynamic attribute reads -----

    /// Reads an attribute by its external name.
    pub fn attribute(&self, id: EmployeeId, attribute: &str) -> PayrollResult<String> {
        let e = self.get(id)?;
        match attribute {
            "name" => Ok(e.name.clone()),
            "address" => Ok(e.address.clone()),
            "type" => Ok(e.compensation.name().to_string()),
            "salary" => Ok(dates::format_amount(e.compensation.base_pay())),
            "commission" => match &e.compensation {
                CompensationType::Commissioned {
                    commission_rate, ..
                } => Ok(dates::format_amount(*commission_rate)),
                _ => Err(PayrollError::TypeNotApplicable),
            },
            "unionized" => Ok(e.is_unionized().to_string()),
            "union_id" => e
                .union_id()
                .map(str::to_string)
                .ok_or(PayrollError::NotUnionMember),
            "daily_due" => match &e.union_membership {
                Some(m) => Ok(dates::format_amount(m.daily_due)),
                None => Err(PayrollError::NotUnionMember),
            },
            "payment_method" => Ok(e.payment_method.name().to_string()),
            "bank" | "branch" | "account" => match &e.payment_method {
                PaymentMethod::Bank {
                    bank,
                    branch,
                    account,
                } => Ok(match attribute {
                    "bank" => bank.clone(),
                    "branch" => branch.clone(),
                    _ => account.clone(),
                }),
                _ => Err(PayrollError::WrongType {
                    expected: "paid through a bank",
                }),
            },
            _ => Err(PayrollError::UnknownAttribute),
        }
    }

    // ----- typed setters -----

    /// Renames an employee.
    pub fn set_name(&mut self, id: EmployeeId, name: &str) -> PayrollResult<()> {
        validate_text(name, "Name")?;
        self.get_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Changes an employee's address.
    pub fn set_address(&mut self, id: EmployeeId, address: &str) -> PayrollResult<()> {
        validate_text(address, "Address")?;
        self.get_mut(id)?.address = address.to_string();
        Ok(())
    }

    /// Updates the base salary or hourly rate of the current variant.
    pub fn set_salary(&mut self, id: EmployeeId, salary: Decimal) -> PayrollResult<()> {
        let e = self.get_mut(id)?;
        match &mut e.compensation {
            CompensationType::Hourly { rate } => *rate = salary,
            CompensationType::Salaried { monthly_salary } => *monthly_salary = salary,
            CompensationType::Commissioned { monthly_salary, .. } => *monthly_salary = salary,
        }
        Ok(())
    }

    /// Updates the commission rate; commissioned employees only.
    pub fn set_commission(&mut self, id: EmployeeId, commission: Decimal) -> PayrollResult<()> {
        let e = self.get_mut(id)?;
        match &mut e.compensation {
            CompensationType::Commissioned {
                commission_rate, ..
            } => {
                *commission_rate = commission;
                Ok(())
            }
            _ => Err(PayrollError::TypeNotApplicable),
        }
    }

    /// Switches the compensation type, re-initializing type-specific fields.
    pub fn set_compensation(
        &mut self,
        id: EmployeeId,
        compensation: CompensationType,
    ) -> PayrollResult<()> {
        self.get_mut(id)?.compensation = compensation;
        Ok(())
    }

    /// Changes the payment method.
    pub fn set_payment_method(
        &mut self,
        id: EmployeeId,
        method: PaymentMethod,
    ) -> PayrollResult<()> {
        self.get_mut(id)?.payment_method = method;
        Ok(())
    }

    /// Enables union membership, enforcing union-id uniqueness among active
    /// members.
    pub fn set_union_membership(
        &mut self,
        id: EmployeeId,
        union_id: &str,
        daily_due: Decimal,
    ) -> PayrollResult<()> {
        validate_text(union_id, "Union id")?;
        if daily_due.is_sign_negative() {
            return Err(PayrollError::NegativeValue { field: "Union due" });
        }
        if let Some(holder) = self.union_index.get(union_id) {
            if *holder != id {
                return Err(PayrollError::DuplicateUnionId);
            }
        }

        let e = self.get_mut(id)?;
        let previous = e.union_membership.replace(UnionMembership {
            union_id: union_id.to_string(),
            daily_due,
        });
        if let Some(previous) = previous {
            self.union_index.remove(&previous.union_id);
        }
        self.union_index.insert(union_id.to_string(), id);
        Ok(())
    }

    /// Disables union membership, clearing the union id and daily due.
    pub fn clear_union_membership(&mut self, id: EmployeeId) -> PayrollResult<()> {
        let e = self.get_mut(id)?;
        if let Some(membership) = e.union_membership.take() {
            self.union_index.remove(&membership.union_id);
        }
        Ok(())
    }

    // ----- dynamic updates -----

    /// Applies a single-value attribute update from external string input.
    ///
    /// Type changes to `hourly` or `commissioned` and union enrollment need
    /// extra arguments and go through [`EmployeeRegistry::update_type`] and
    /// [`EmployeeRegistry::set_union_membership`]; asking for them here
    /// fails with the missing-field error.
    pub fn update_attribute(
        &mut self,
        id: EmployeeId,
        attribute: &str,
        value: &str,
    ) -> PayrollResult<()> {
        // Probe existence first so unknown employees beat unknown attributes.
        self.get(id)?;
        match attribute {
            "name" => self.set_name(id, value),
            "address" => self.set_address(id, value),
            "salary" => {
                let salary = dates::parse_non_negative(value, "Salary")?;
                self.set_salary(id, salary)
            }
            "commission" => {
                let commission = dates::parse_non_negative(value, "Commission")?;
                self.set_commission(id, commission)
            }
            "type" => self.update_type(id, value, None),
            "unionized" => match value {
                "false" => self.clear_union_membership(id),
                "true" => Err(PayrollError::EmptyField { field: "Union id" }),
                _ => Err(PayrollError::InvalidBoolean { field: "Unionized" }),
            },
            "payment_method" => match value {
                "in-hand" => self.set_payment_method(id, PaymentMethod::InHand),
                "mail" => self.set_payment_method(id, PaymentMethod::Mail),
                "bank" => Err(PayrollError::EmptyField { field: "Bank" }),
                _ => Err(PayrollError::InvalidPaymentMethod),
            },
            _ => Err(PayrollError::UnknownAttribute),
        }
    }

    /// Switches compensation type from external input.
    ///
    /// `hourly` takes the new hourly rate and `commissioned` the new
    /// commission rate in `extra`; `salaried` takes none and keeps the
    /// current base figure as the monthly salary.
    pub fn update_type(
        &mut self,
        id: EmployeeId,
        new_type: &str,
        extra: Option<&str>,
    ) -> PayrollResult<()> {
        let base = self.get(id)?.compensation.base_pay();
        let compensation = match new_type.to_ascii_lowercase().as_str() {
            "hourly" => CompensationType::Hourly {
                rate: dates::parse_non_negative(extra.unwrap_or(""), "Rate")?,
            },
            "salaried" => CompensationType::Salaried {
                monthly_salary: base,
            },
            "commissioned" => CompensationType::Commissioned {
                monthly_salary: base,
                commission_rate: dates::parse_non_negative(extra.unwrap_or(""), "Commission")?,
            },
            _ => return Err(PayrollError::InvalidType),
        };
        self.set_compensation(id, compensation)
    }
}

fn validate_text(value: &str, field: &'static str) -> PayrollResult<()> {
    if value.trim().is_empty() {
        return Err(PayrollError::EmptyField { field });
    }
    Ok(())
}
