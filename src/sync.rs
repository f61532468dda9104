//! Backend replication orchestration.

use tracing::info;

use crate::client::{BackendClient, RetryPolicy};
use crate::error::Result;
use crate::models::{Department, Employee};

/// Mirrors store mutations to the remote backend under a retry policy.
///
/// Replication is issued after the local snapshot write in program order;
/// there is no rollback coupling between the two (last write wins).
pub struct Replicator {
    client: BackendClient,
    retry: RetryPolicy,
}

impl Replicator {
    /// Create a new replicator.
    pub fn new(client: BackendClient, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Fetch the backend's department collection.
    pub async fn pull(&self) -> Result<Vec<Department>> {
        let departments = self.retry.run(|| self.client.departments()).await?;
        info!("Pulled {} departments from backend", departments.len());
        Ok(departments)
    }

    /// Initialize the backend datastore with a full snapshot.
    pub async fn push_seed(&self, departments: &[Department]) -> Result<()> {
        self.retry.run(|| self.client.load_snapshot(departments)).await?;
        info!("Seeded backend with {} departments", departments.len());
        Ok(())
    }

    /// Mirror a department creation.
    pub async fn create_department(&self, department: &Department) -> Result<()> {
        self.retry.run(|| self.client.create_department(department)).await
    }

    /// Mirror a department update.
    pub async fn update_department(&self, department: &Department) -> Result<()> {
        self.retry.run(|| self.client.update_department(department)).await
    }

    /// Mirror a department deletion.
    pub async fn delete_department(&self, id: u32) -> Result<()> {
        self.retry.run(|| self.client.delete_department(id)).await
    }

    /// Mirror an employee creation.
    pub async fn create_employee(&self, employee: &Employee) -> Result<()> {
        self.retry.run(|| self.client.create_employee(employee)).await
    }

    /// Mirror an employee update.
    pub async fn update_employee(&self, employee: &Employee) -> Result<()> {
        self.retry.run(|| self.client.update_employee(employee)).await
    }

    /// Mirror an employee deletion.
    pub async fn delete_employee(&self, id: u32) -> Result<()> {
        self.retry.run(|| self.client.delete_employee(id)).await
    }

    /// Mirror a transfer batch.
    pub async fn transfer_employees(
        &self,
        source_department_id: u32,
        target_department_id: u32,
        employees: &[Employee],
    ) -> Result<()> {
        self.retry
            .run(|| {
                self.client
                    .transfer_employees(source_department_id, target_department_id, employees)
            })
            .await
    }
}
