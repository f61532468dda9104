//! REST client for the organizational data backend.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AppError, Result};
use crate::models::{Department, Employee};

/// Backing datastore selected on the backend via the `repositoryType` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepositoryType {
    #[serde(rename = "PostgreSQL")]
    PostgreSql,
    #[serde(rename = "MongoDB")]
    MongoDb,
}

impl RepositoryType {
    /// Wire value expected by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryType::PostgreSql => "PostgreSQL",
            RepositoryType::MongoDb => "MongoDB",
        }
    }
}

impl fmt::Display for RepositoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepositoryType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(RepositoryType::PostgreSql),
            "mongodb" | "mongo" => Ok(RepositoryType::MongoDb),
            other => Err(AppError::parse(format!("unknown repository type '{other}'"))),
        }
    }
}

/// Retry policy for backend calls.
///
/// A failed call is retried with a fixed delay until the attempt budget is
/// exhausted; the last error is returned to the caller.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Create a policy. An attempt budget of zero is treated as one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Run an operation under this policy.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts => {
                    warn!("Backend call failed (attempt {attempt}/{max_attempts}): {e}");
                    attempt += 1;
                    tokio::time::sleep(self.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Full-snapshot payload for the backend `load` endpoint.
#[derive(Debug, Serialize)]
struct SnapshotPayload<'a> {
    departments: &'a [Department],
}

/// Transfer payload for the backend `transfers` endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransferPayload<'a> {
    source_department_id: u32,
    target_department_id: u32,
    employees: &'a [Employee],
}

/// HTTP client for the organizational data backend.
///
/// All endpoints are parameterized by the repository type selecting the
/// backing datastore on the server side.
pub struct BackendClient {
    client: Client,
    base_url: String,
    repository_type: RepositoryType,
}

impl BackendClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The backend API root (e.g., "http://localhost:8028/api")
    pub fn new(base_url: &str, repository_type: RepositoryType, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            repository_type,
        })
    }

    /// Build a full endpoint URL with the repository type query parameter.
    fn url(&self, path: &str) -> String {
        format!(
            "{base}{path}?repositoryType={repo}",
            base = self.base_url,
            repo = self.repository_type.as_str()
        )
    }

    /// Fetch all departments with their embedded employees.
    pub async fn departments(&self) -> Result<Vec<Department>> {
        let url = self.url("/departments");
        let response = self.client.get(&url).send().await?;
        ensure_success("GET /departments", &response)?;
        Ok(response.json().await?)
    }

    /// Replace the backend datastore content with a full snapshot.
    pub async fn load_snapshot(&self, departments: &[Department]) -> Result<()> {
        let url = self.url("/load");
        let payload = SnapshotPayload { departments };
        let response = self.client.post(&url).json(&payload).send().await?;
        ensure_success("POST /load", &response)
    }

    /// Create a department on the backend.
    pub async fn create_department(&self, department: &Department) -> Result<()> {
        let url = self.url("/departments");
        let response = self.client.post(&url).json(department).send().await?;
        ensure_success("POST /departments", &response)
    }

    /// Update a department on the backend.
    pub async fn update_department(&self, department: &Department) -> Result<()> {
        let url = self.url(&format!("/departments/{id}", id = department.id));
        let response = self.client.patch(&url).json(department).send().await?;
        ensure_success("PATCH /departments", &response)
    }

    /// Delete a department on the backend.
    pub async fn delete_department(&self, id: u32) -> Result<()> {
        let url = self.url(&format!("/departments/{id}"));
        let response = self.client.delete(&url).send().await?;
        ensure_success("DELETE /departments", &response)
    }

    /// Create an employee on the backend.
    pub async fn create_employee(&self, employee: &Employee) -> Result<()> {
        let url = self.url("/employees");
        let response = self.client.post(&url).json(employee).send().await?;
        ensure_success("POST /employees", &response)
    }

    /// Update an employee on the backend.
    pub async fn update_employee(&self, employee: &Employee) -> Result<()> {
        let url = self.url(&format!("/employees/{id}", id = employee.id));
        let response = self.client.patch(&url).json(employee).send().await?;
        ensure_success("PATCH /employees", &response)
    }

    /// Delete an employee on the backend.
    pub async fn delete_employee(&self, id: u32) -> Result<()> {
        let url = self.url(&format!("/employees/{id}"));
        let response = self.client.delete(&url).send().await?;
        ensure_success("DELETE /employees", &response)
    }

    /// Replicate a transfer batch on the backend.
    pub async fn transfer_employees(
        &self,
        source_department_id: u32,
        target_department_id: u32,
        employees: &[Employee],
    ) -> Result<()> {
        let url = self.url("/transfers");
        let payload = TransferPayload {
            source_department_id,
            target_department_id,
            employees,
        };
        let response = self.client.post(&url).json(&payload).send().await?;
        ensure_success("POST /transfers", &response)
    }
}

/// Map a non-success HTTP status to a backend error.
fn ensure_success(context: &str, response: &reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(AppError::backend(format!("{context} returned HTTP {status}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> BackendClient {
        BackendClient::new(base_url, RepositoryType::PostgreSql, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_url_includes_repository_type() {
        let client = test_client("http://localhost:8028/api");
        assert_eq!(
            client.url("/departments"),
            "http://localhost:8028/api/departments?repositoryType=PostgreSQL"
        );
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = test_client("http://localhost:8028/api/");
        assert_eq!(
            client.url("/load"),
            "http://localhost:8028/api/load?repositoryType=PostgreSQL"
        );
    }

    #[test]
    fn test_repository_type_wire_values() {
        assert_eq!(RepositoryType::PostgreSql.to_string(), "PostgreSQL");
        assert_eq!(RepositoryType::MongoDb.to_string(), "MongoDB");
        assert_eq!(
            "postgresql".parse::<RepositoryType>().unwrap(),
            RepositoryType::PostgreSql
        );
        assert_eq!("Mongo".parse::<RepositoryType>().unwrap(), RepositoryType::MongoDb);
        assert!("sqlite".parse::<RepositoryType>().is_err());
    }

    #[tokio::test]
    async fn test_retry_returns_first_success() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let mut calls = 0;
        let result = policy
            .run(|| {
                calls += 1;
                let attempt = calls;
                async move {
                    if attempt < 3 {
                        Err(AppError::backend("boom"))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_retry_exhausts_attempt_budget() {
        let policy = RetryPolicy::new(2, Duration::from_millis(1));
        let mut calls = 0;
        let result: Result<()> = policy
            .run(|| {
                calls += 1;
                async { Err(AppError::backend("still down")) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_retry_zero_attempts_still_runs_once() {
        let policy = RetryPolicy::new(0, Duration::from_millis(1));
        let mut calls = 0;
        let result = policy
            .run(|| {
                calls += 1;
                async { Ok(()) }
            })
            .await;
        assert!(result.is_ok());
        assert_eq!(calls, 1);
    }
}
