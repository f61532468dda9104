//! Department records and DTOs for create and update operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::employee::Employee;

/// A department with its embedded employee collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub employees: Vec<Employee>,
}

/// DTO for creating a department. The id is assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartment {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CreateDepartment {
    /// Validate the department data before the store assigns an id.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Department name cannot be empty"));
        }
        validate_keywords(&self.keywords)?;
        validate_date_range(self.start_date, self.end_date)
    }

    /// Build the full record once the store has assigned an id.
    pub fn into_department(self, id: u32) -> Department {
        Department {
            id,
            name: self.name,
            start_date: self.start_date,
            end_date: self.end_date,
            notes: self.notes,
            keywords: self.keywords,
            employees: Vec::new(),
        }
    }
}

/// DTO for updating a department. `None` fields keep their current value;
/// `Some(None)` clears an optional field. An omitted employee collection
/// preserves the existing embedded employees.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartment {
    pub name: Option<String>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
    pub keywords: Option<Vec<String>>,
    pub employees: Option<Vec<Employee>>,
}

impl UpdateDepartment {
    /// Validate the fields present in the update.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Department name cannot be empty"));
            }
        }
        if let Some(keywords) = &self.keywords {
            validate_keywords(keywords)?;
        }
        Ok(())
    }

    /// Apply the update to an existing record.
    pub fn apply(self, department: &mut Department) {
        if let Some(name) = self.name {
            department.name = name;
        }
        if let Some(start_date) = self.start_date {
            department.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            department.end_date = end_date;
        }
        if let Some(notes) = self.notes {
            department.notes = notes;
        }
        if let Some(keywords) = self.keywords {
            department.keywords = keywords;
        }
        if let Some(employees) = self.employees {
            department.employees = employees;
        }
    }
}

/// Keywords form an ordered set: duplicates and blank entries are rejected.
fn validate_keywords(keywords: &[String]) -> Result<()> {
    for (index, keyword) in keywords.iter().enumerate() {
        if keyword.trim().is_empty() {
            return Err(AppError::validation("Keywords cannot be empty"));
        }
        if keywords[..index].contains(keyword) {
            return Err(AppError::validation(format!("Duplicate keyword '{keyword}'")));
        }
    }
    Ok(())
}

fn validate_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(AppError::validation("End date cannot precede start date"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_create() -> CreateDepartment {
        CreateDepartment {
            name: "Main Office".to_string(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 6),
            end_date: NaiveDate::from_ymd_opt(2020, 1, 7),
            notes: Some("Main product:\n - money transfer".to_string()),
            keywords: vec!["Banking".to_string()],
        }
    }

    #[test]
    fn test_valid_create_passes() {
        assert!(sample_create().validate().is_ok());
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let mut dto = sample_create();
        dto.name = "   ".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_rejects_duplicate_keywords() {
        let mut dto = sample_create();
        dto.keywords = vec!["Banking".to_string(), "Banking".to_string()];
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_rejects_inverted_date_range() {
        let mut dto = sample_create();
        dto.start_date = NaiveDate::from_ymd_opt(2020, 1, 7);
        dto.end_date = NaiveDate::from_ymd_opt(2020, 1, 6);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_into_department_starts_empty() {
        let department = sample_create().into_department(3);
        assert_eq!(department.id, 3);
        assert_eq!(department.name, "Main Office");
        assert!(department.employees.is_empty());
    }

    #[test]
    fn test_update_preserves_omitted_fields() {
        let mut department = sample_create().into_department(1);
        let update = UpdateDepartment {
            name: Some("Front Office".to_string()),
            ..Default::default()
        };
        update.apply(&mut department);

        assert_eq!(department.name, "Front Office");
        assert_eq!(department.keywords, vec!["Banking".to_string()]);
        assert!(department.notes.is_some());
    }

    #[test]
    fn test_update_clears_notes() {
        let mut department = sample_create().into_department(1);
        let update = UpdateDepartment {
            notes: Some(None),
            ..Default::default()
        };
        update.apply(&mut department);
        assert_eq!(department.notes, None);
    }

    #[test]
    fn test_snapshot_defaults_missing_collections() {
        let json = r#"{"id":1,"name":"Main Office"}"#;
        let department: Department = serde_json::from_str(json).unwrap();
        assert!(department.keywords.is_empty());
        assert!(department.employees.is_empty());
    }
}
