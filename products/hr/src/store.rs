use std::collections::HashMap;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

use crate::{Employee, EmployeeId, HrError, HrResult, PageRequest};

/// Owned employee store: one map behind one reader-writer lock.
///
/// Callers hold the returned guard for the whole unit of work, so decoding
/// and encoding around a store operation happen under the same lock.
#[derive(Debug, Default)]
pub struct EmployeeStore {
    records: RwLock<EmployeeRecords>,
}

impl EmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared access; any number of readers may hold it at once.
    pub async fn read(&self) -> RwLockReadGuard<'_, EmployeeRecords> {
        self.records.read().await
    }

    /// Exclusive access; excludes every reader and every other writer.
    pub async fn write(&self) -> RwLockWriteGuard<'_, EmployeeRecords> {
        self.records.write().await
    }
}

/// The map of employees keyed by identifier.
#[derive(Debug, Default)]
pub struct EmployeeRecords {
    entries: HashMap<EmployeeId, Employee>,
}

impl EmployeeRecords {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EmployeeId) -> HrResult<&Employee> {
        self.entries.get(&id).ok_or(HrError::NotFound(id))
    }

    /// Collect one page of employees, ordered by their `id` field.
    ///
    /// Candidates are the identifiers `1..=len()`. Once records have been
    /// deleted, entries stored above that bound are never listed.
    pub fn page(&self, request: PageRequest) -> Vec<Employee> {
        let limit = usize::try_from(request.limit).unwrap_or(usize::MAX);
        let mut skip = request.offset();
        let mut employees = Vec::new();

        for id in 1..=self.entries.len() as EmployeeId {
            let Some(employee) = self.entries.get(&id) else {
                continue;
            };
            if skip > 0 {
                skip -= 1;
                continue;
            }
            employees.push(employee.clone());
            if employees.len() >= limit {
                break;
            }
        }

        employees.sort_by_key(|employee| employee.id);
        employees
    }

    /// Identifier the next created record receives: current size plus one.
    ///
    /// This is not a counter. After a deletion it can repeat an identifier
    /// that is still in use.
    pub fn next_id(&self) -> EmployeeId {
        self.entries.len() as EmployeeId + 1
    }

    /// Store a new record under [`next_id`](Self::next_id), replacing
    /// whatever `id` the caller supplied. A record already stored under that
    /// identifier is overwritten.
    pub fn create(&mut self, mut employee: Employee) -> Employee {
        let id = self.next_id();
        employee.id = id;
        if self.entries.insert(id, employee.clone()).is_some() {
            trace!(id, "create overwrote an existing record");
        }
        employee
    }

    /// Replace the record stored under `id` wholesale. The replacement's own
    /// `id` field is kept as given, even when it differs from `id`.
    pub fn replace(&mut self, id: EmployeeId, employee: Employee) -> HrResult<Employee> {
        let slot = self.entries.get_mut(&id).ok_or(HrError::NotFound(id))?;
        *slot = employee.clone();
        Ok(employee)
    }

    pub fn remove(&mut self, id: EmployeeId) -> HrResult<Employee> {
        self.entries.remove(&id).ok_or(HrError::NotFound(id))
    }
}
