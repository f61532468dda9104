//! Canonical department/employee store with pluggable persistence.

use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::models::{
    CreateDepartment, CreateEmployee, Department, Employee, UpdateDepartment, UpdateEmployee,
};
use crate::storage::SnapshotRepository;
use crate::sync::Replicator;

/// The store owns the canonical department collection and the business rules:
/// id assignment, cascade deletion, and transfer reconciliation.
///
/// Every successful mutation persists the full collection through the snapshot
/// repository, then mirrors the change to the backend when a replicator is
/// configured. Replication failures surface to the caller; the local snapshot
/// is not rolled back.
pub struct OrgStore {
    repository: Box<dyn SnapshotRepository>,
    replicator: Option<Replicator>,
    departments: Vec<Department>,
}

impl OrgStore {
    /// Open the store over a snapshot repository, loading the persisted collection.
    pub async fn open(repository: Box<dyn SnapshotRepository>) -> Result<Self> {
        let departments = repository.load().await?;
        info!("Store opened with {} departments", departments.len());
        Ok(Self {
            repository,
            replicator: None,
            departments,
        })
    }

    /// Attach a backend replicator.
    pub fn with_replicator(mut self, replicator: Replicator) -> Self {
        self.replicator = Some(replicator);
        self
    }

    /// All departments with their embedded employees.
    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// Look up a department by id.
    pub fn department(&self, id: u32) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    /// Employees of a department.
    pub fn employees_of(&self, department_id: u32) -> Option<&[Employee]> {
        self.department(department_id).map(|d| d.employees.as_slice())
    }

    /// Look up an employee by id across all departments.
    pub fn employee(&self, employee_id: u32) -> Option<&Employee> {
        self.departments
            .iter()
            .flat_map(|d| d.employees.iter())
            .find(|e| e.id == employee_id)
    }

    /// Next department id: one greater than the current maximum, or 1 when empty.
    fn next_department_id(&self) -> u32 {
        self.departments.iter().map(|d| d.id).max().map_or(1, |max| max + 1)
    }

    /// Next employee id over all departments (employee ids are globally unique).
    fn next_employee_id(&self) -> u32 {
        self.departments
            .iter()
            .flat_map(|d| d.employees.iter().map(|e| e.id))
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Seed the store with a dataset and initialize the backend when configured.
    pub async fn seed(&mut self, departments: Vec<Department>) -> Result<()> {
        self.departments = departments;
        self.persist().await?;
        if let Some(replicator) = &self.replicator {
            replicator.push_seed(&self.departments).await?;
        }
        Ok(())
    }

    /// Replace local state with the backend's collection.
    pub async fn pull_from_backend(&mut self) -> Result<usize> {
        let Some(replicator) = &self.replicator else {
            return Err(AppError::config("Backend is not configured"));
        };
        let departments = replicator.pull().await?;
        let count = departments.len();
        self.departments = departments;
        self.persist().await?;
        Ok(count)
    }

    /// Create a department with a freshly assigned id.
    pub async fn create_department(&mut self, data: CreateDepartment) -> Result<Department> {
        data.validate()?;
        let id = self.next_department_id();
        let department = data.into_department(id);
        self.departments.push(department.clone());
        info!("Created department id[{id}]");

        self.persist().await?;
        if let Some(replicator) = &self.replicator {
            replicator.create_department(&department).await?;
        }
        Ok(department)
    }

    /// Update an existing department. Fields omitted from the update, including
    /// the employee collection, keep their current values.
    pub async fn update_department(&mut self, id: u32, data: UpdateDepartment) -> Result<Department> {
        data.validate()?;
        let department = self
            .departments
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::not_found(format!("Department id[{id}]")))?;
        data.apply(department);
        let updated = department.clone();
        info!("Updated department id[{id}]");

        self.persist().await?;
        if let Some(replicator) = &self.replicator {
            replicator.update_department(&updated).await?;
        }
        Ok(updated)
    }

    /// Delete a department; its employees are removed with it.
    pub async fn delete_department(&mut self, id: u32) -> Result<()> {
        let index = self
            .departments
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| AppError::not_found(format!("Department id[{id}]")))?;
        let removed = self.departments.remove(index);
        info!(
            "Deleted department id[{id}] with {} employees",
            removed.employees.len()
        );

        self.persist().await?;
        if let Some(replicator) = &self.replicator {
            replicator.delete_department(id).await?;
        }
        Ok(())
    }

    /// Create an employee inside a department, assigning the next global id.
    pub async fn create_employee(
        &mut self,
        department_id: u32,
        data: CreateEmployee,
    ) -> Result<Employee> {
        data.validate()?;
        let id = self.next_employee_id();
        let department = self
            .departments
            .iter_mut()
            .find(|d| d.id == department_id)
            .ok_or_else(|| AppError::not_found(format!("Department id[{department_id}]")))?;
        let employee = data.into_employee(id, department_id);
        department.employees.push(employee.clone());
        info!("Created employee id[{id}] in department id[{department_id}]");

        self.persist().await?;
        if let Some(replicator) = &self.replicator {
            replicator.create_employee(&employee).await?;
        }
        Ok(employee)
    }

    /// Update an employee of a department.
    pub async fn update_employee(
        &mut self,
        department_id: u32,
        employee_id: u32,
        data: UpdateEmployee,
    ) -> Result<Employee> {
        data.validate()?;
        let department = self
            .departments
            .iter_mut()
            .find(|d| d.id == department_id)
            .ok_or_else(|| AppError::not_found(format!("Department id[{department_id}]")))?;
        let employee = department
            .employees
            .iter_mut()
            .find(|e| e.id == employee_id)
            .ok_or_else(|| AppError::not_found(format!("Employee id[{employee_id}]")))?;
        data.apply(employee);
        let updated = employee.clone();
        info!("Updated employee id[{employee_id}] in department id[{department_id}]");

        self.persist().await?;
        if let Some(replicator) = &self.replicator {
            replicator.update_employee(&updated).await?;
        }
        Ok(updated)
    }

    /// Delete an employee from a department.
    pub async fn delete_employee(&mut self, department_id: u32, employee_id: u32) -> Result<()> {
        let department = self
            .departments
            .iter_mut()
            .find(|d| d.id == department_id)
            .ok_or_else(|| AppError::not_found(format!("Department id[{department_id}]")))?;
        let index = department
            .employees
            .iter()
            .position(|e| e.id == employee_id)
            .ok_or_else(|| AppError::not_found(format!("Employee id[{employee_id}]")))?;
        department.employees.remove(index);
        info!("Deleted employee id[{employee_id}] from department id[{department_id}]");

        self.persist().await?;
        if let Some(replicator) = &self.replicator {
            replicator.delete_employee(employee_id).await?;
        }
        Ok(())
    }

    /// Move the listed employees from the source department to the target.
    ///
    /// Each moved employee leaves the source collection, gets its back-reference
    /// rewritten, and joins the target collection, which is re-sorted by id.
    /// Ids missing from the source are skipped with a warning. Returns the
    /// number of employees moved.
    pub async fn transfer_employees(
        &mut self,
        source_id: u32,
        target_id: u32,
        employee_ids: &[u32],
    ) -> Result<usize> {
        if source_id == target_id {
            return Err(AppError::validation(
                "Source and target departments must differ",
            ));
        }
        if self.department(source_id).is_none() {
            return Err(AppError::not_found(format!("Department id[{source_id}]")));
        }
        if self.department(target_id).is_none() {
            return Err(AppError::not_found(format!("Department id[{target_id}]")));
        }

        let mut moved: Vec<Employee> = Vec::new();
        for &employee_id in employee_ids {
            // Both lookups re-run per iteration: the slices move under us.
            let source = self
                .departments
                .iter_mut()
                .find(|d| d.id == source_id)
                .ok_or_else(|| AppError::not_found(format!("Department id[{source_id}]")))?;
            let Some(index) = source.employees.iter().position(|e| e.id == employee_id) else {
                warn!("Employee id[{employee_id}] not in department id[{source_id}], skipped");
                continue;
            };
            let mut employee = source.employees.remove(index);
            employee.department_id = target_id;

            let target = self
                .departments
                .iter_mut()
                .find(|d| d.id == target_id)
                .ok_or_else(|| AppError::not_found(format!("Department id[{target_id}]")))?;
            target.employees.push(employee.clone());
            moved.push(employee);
        }

        if let Some(target) = self.departments.iter_mut().find(|d| d.id == target_id) {
            target.employees.sort_by_key(|e| e.id);
        }
        info!(
            "Transferred {} employees from department id[{source_id}] to id[{target_id}]",
            moved.len()
        );

        self.persist().await?;
        if let Some(replicator) = &self.replicator {
            if !moved.is_empty() {
                replicator
                    .transfer_employees(source_id, target_id, &moved)
                    .await?;
            }
        }
        Ok(moved.len())
    }

    async fn persist(&self) -> Result<()> {
        self.repository.save(&self.departments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Title;
    use crate::models::seed::initial_departments;
    use crate::storage::MemoryRepository;

    async fn seeded_store() -> OrgStore {
        let repository = MemoryRepository::with_data(initial_departments());
        OrgStore::open(Box::new(repository)).await.unwrap()
    }

    async fn empty_store() -> OrgStore {
        OrgStore::open(Box::new(MemoryRepository::new())).await.unwrap()
    }

    fn department_dto(name: &str) -> CreateDepartment {
        CreateDepartment {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn employee_dto(first: &str, last: &str) -> CreateEmployee {
        CreateEmployee {
            first_name: first.to_string(),
            last_name: last.to_string(),
            title: Some(Title::Analyst),
            phone: "555-0100".to_string(),
            mail: "someone@company.com".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_first_department_gets_id_one() {
        let mut store = empty_store().await;
        let created = store.create_department(department_dto("Main Office")).await.unwrap();
        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn test_department_id_is_max_plus_one() {
        let mut store = seeded_store().await;
        let created = store.create_department(department_dto("Trading Desk")).await.unwrap();
        assert_eq!(created.id, 3);
    }

    #[tokio::test]
    async fn test_employee_id_is_global_max_plus_one() {
        let mut store = seeded_store().await;
        // Seed holds employee ids 1..=4 spread over both departments.
        let created = store.create_employee(1, employee_dto("Ada", "Byron")).await.unwrap();
        assert_eq!(created.id, 5);
        assert_eq!(created.department_id, 1);
    }

    #[tokio::test]
    async fn test_first_employee_gets_id_one() {
        let mut store = empty_store().await;
        store.create_department(department_dto("Main Office")).await.unwrap();
        let created = store.create_employee(1, employee_dto("Ada", "Byron")).await.unwrap();
        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn test_create_employee_in_missing_department() {
        let mut store = seeded_store().await;
        let result = store.create_employee(99, employee_dto("Ada", "Byron")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_department_preserves_employees() {
        let mut store = seeded_store().await;
        let update = UpdateDepartment {
            name: Some("Front Office".to_string()),
            ..Default::default()
        };
        let updated = store.update_department(1, update).await.unwrap();
        assert_eq!(updated.name, "Front Office");
        assert_eq!(updated.employees.len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_department() {
        let mut store = seeded_store().await;
        let result = store.update_department(42, UpdateDepartment::default()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_department_cascades() {
        let mut store = seeded_store().await;
        store.delete_department(1).await.unwrap();

        assert!(store.department(1).is_none());
        // No employee of the deleted department survives anywhere.
        assert!(store.employee(1).is_none());
        assert!(store.employee(3).is_none());
        assert_eq!(store.departments().len(), 1);
    }

    #[tokio::test]
    async fn test_transfer_moves_employee_and_rewrites_back_reference() {
        let mut store = seeded_store().await;
        let moved = store.transfer_employees(1, 2, &[1]).await.unwrap();
        assert_eq!(moved, 1);

        let source = store.department(1).unwrap();
        assert!(source.employees.iter().all(|e| e.id != 1));

        let target = store.department(2).unwrap();
        let emily = target.employees.iter().find(|e| e.id == 1).unwrap();
        assert_eq!(emily.department_id, 2);
        assert_eq!(emily.first_name, "Emily");

        // Present in exactly one department after the transfer.
        let holders = store
            .departments()
            .iter()
            .filter(|d| d.employees.iter().any(|e| e.id == 1))
            .count();
        assert_eq!(holders, 1);
    }

    #[tokio::test]
    async fn test_transfer_sorts_target_by_id() {
        let mut store = seeded_store().await;
        // Move Nora (id 3) then Emily (id 1); target order must still be ascending.
        store.transfer_employees(1, 2, &[3, 1]).await.unwrap();
        let ids: Vec<u32> = store.department(2).unwrap().employees.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_transfer_to_missing_department() {
        let mut store = seeded_store().await;
        let result = store.transfer_employees(1, 99, &[1]).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_transfer_to_same_department_is_rejected() {
        let mut store = seeded_store().await;
        let result = store.transfer_employees(1, 1, &[1]).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_transfer_skips_ids_missing_from_source() {
        let mut store = seeded_store().await;
        // Id 2 lives in department 2, not in the source; only id 1 moves.
        let moved = store.transfer_employees(1, 2, &[2, 1]).await.unwrap();
        assert_eq!(moved, 1);
        assert_eq!(store.department(2).unwrap().employees.len(), 3);
    }

    #[tokio::test]
    async fn test_mutations_persist_through_repository() {
        let mut store = empty_store().await;
        store.create_department(department_dto("Main Office")).await.unwrap();
        store.create_employee(1, employee_dto("Ada", "Byron")).await.unwrap();

        let snapshot = store.repository.load().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].employees.len(), 1);
    }

    #[tokio::test]
    async fn test_pull_without_backend_is_config_error() {
        let mut store = seeded_store().await;
        let result = store.pull_from_backend().await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_single_employee_transfer_between_two_departments() {
        // Two departments, one employee; after transfer the source is empty and
        // the target holds the employee with a rewritten department id.
        let departments = vec![
            Department {
                id: 1,
                name: "Main Office".to_string(),
                start_date: None,
                end_date: None,
                notes: None,
                keywords: vec![],
                employees: vec![employee_dto("Emily", "Clark").into_employee(1, 1)],
            },
            Department {
                id: 2,
                name: "Back Office".to_string(),
                start_date: None,
                end_date: None,
                notes: None,
                keywords: vec![],
                employees: vec![],
            },
        ];
        let mut store = OrgStore::open(Box::new(MemoryRepository::with_data(departments)))
            .await
            .unwrap();

        store.transfer_employees(1, 2, &[1]).await.unwrap();
        assert!(store.department(1).unwrap().employees.is_empty());
        let target = store.department(2).unwrap();
        assert_eq!(target.employees.len(), 1);
        assert_eq!(target.employees[0].department_id, 2);
    }
}
