use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::Result;
use crate::model::employee::Employee;
use crate::model::salary::{AdjustmentKey, Period, SalaryAdjustment};

/// Source of the employee list the roster is built from.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// All employees, active or not, in directory order.
    async fn list_employees(&self) -> Result<Vec<Employee>>;
}

/// Persistence of salary adjustments, unique per (employee, month, year).
#[async_trait]
pub trait AdjustmentStore: Send + Sync {
    async fn fetch_period(&self, period: Period) -> Result<Vec<SalaryAdjustment>>;
    async fn get(&self, key: AdjustmentKey) -> Result<Option<SalaryAdjustment>>;
    /// Insert-or-replace by key; returns the stored record.
    async fn upsert(&self, adjustment: SalaryAdjustment) -> Result<SalaryAdjustment>;
}

/// Employee list held in memory, in insertion order.
#[derive(Default)]
pub struct InMemoryEmployeeDirectory {
    employees: RwLock<Vec<Employee>>,
}

impl InMemoryEmployeeDirectory {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees: RwLock::new(employees),
        }
    }

    pub fn push(&self, employee: Employee) {
        self.employees
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(employee);
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryEmployeeDirectory {
    async fn list_employees(&self) -> Result<Vec<Employee>> {
        Ok(self
            .employees
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

/// Adjustments keyed by their composite key. Later upserts win.
#[derive(Default)]
pub struct InMemoryAdjustmentStore {
    records: RwLock<HashMap<AdjustmentKey, SalaryAdjustment>>,
}

impl InMemoryAdjustmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl AdjustmentStore for InMemoryAdjustmentStore {
    async fn fetch_period(&self, period: Period) -> Result<Vec<SalaryAdjustment>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let mut found: Vec<SalaryAdjustment> = records
            .values()
            .filter(|a| a.period() == period)
            .cloned()
            .collect();
        found.sort_by_key(|a| a.empleado_id);
        Ok(found)
    }

    async fn get(&self, key: AdjustmentKey) -> Result<Option<SalaryAdjustment>> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned())
    }

    async fn upsert(&self, adjustment: SalaryAdjustment) -> Result<SalaryAdjustment> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(adjustment.key(), adjustment.clone());
        Ok(adjustment)
    }
}
