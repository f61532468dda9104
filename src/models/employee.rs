//! Employee records and DTOs for create and update operations.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::title::Title;

/// An employee record, owned by exactly one department.
///
/// Field names stay camelCase on the wire so snapshots and backend payloads
/// keep the shape the REST backend expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: u32,
    pub department_id: u32,
    pub first_name: String,
    pub last_name: String,
    pub title: Title,
    pub phone: String,
    pub mail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Employee {
    /// Display name used by the locator tree and reports.
    pub fn full_name(&self) -> String {
        format!("{first} {last}", first = self.first_name, last = self.last_name)
    }
}

/// DTO for creating an employee. Id and owning department are assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployee {
    pub first_name: String,
    pub last_name: String,
    pub title: Option<Title>,
    pub phone: String,
    pub mail: String,
    pub street_name: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
    pub locality: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
}

impl CreateEmployee {
    /// Validate required fields before the store assigns an id.
    pub fn validate(&self) -> Result<()> {
        if self.first_name.trim().is_empty() {
            return Err(AppError::validation("First name cannot be empty"));
        }
        if self.last_name.trim().is_empty() {
            return Err(AppError::validation("Last name cannot be empty"));
        }
        if self.phone.trim().is_empty() {
            return Err(AppError::validation("Phone cannot be empty"));
        }
        if !is_valid_mail(&self.mail) {
            return Err(AppError::validation(format!(
                "Invalid mail address '{mail}'",
                mail = self.mail
            )));
        }
        Ok(())
    }

    /// Build the full record once the store has assigned identity.
    pub fn into_employee(self, id: u32, department_id: u32) -> Employee {
        Employee {
            id,
            department_id,
            first_name: self.first_name,
            last_name: self.last_name,
            title: self.title.unwrap_or(Title::Developer),
            phone: self.phone,
            mail: self.mail,
            street_name: self.street_name,
            house_number: self.house_number,
            postal_code: self.postal_code,
            locality: self.locality,
            province: self.province,
            country: self.country,
        }
    }
}

/// DTO for updating an employee. `None` fields keep their current value;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<Title>,
    pub phone: Option<String>,
    pub mail: Option<String>,
    pub street_name: Option<Option<String>>,
    pub house_number: Option<Option<String>>,
    pub postal_code: Option<Option<String>>,
    pub locality: Option<Option<String>>,
    pub province: Option<Option<String>>,
    pub country: Option<Option<String>>,
}

impl UpdateEmployee {
    /// Validate the fields present in the update.
    pub fn validate(&self) -> Result<()> {
        if let Some(first_name) = &self.first_name {
            if first_name.trim().is_empty() {
                return Err(AppError::validation("First name cannot be empty"));
            }
        }
        if let Some(last_name) = &self.last_name {
            if last_name.trim().is_empty() {
                return Err(AppError::validation("Last name cannot be empty"));
            }
        }
        if let Some(phone) = &self.phone {
            if phone.trim().is_empty() {
                return Err(AppError::validation("Phone cannot be empty"));
            }
        }
        if let Some(mail) = &self.mail {
            if !is_valid_mail(mail) {
                return Err(AppError::validation(format!("Invalid mail address '{mail}'")));
            }
        }
        Ok(())
    }

    /// Apply the update to an existing record.
    pub fn apply(self, employee: &mut Employee) {
        if let Some(first_name) = self.first_name {
            employee.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            employee.last_name = last_name;
        }
        if let Some(title) = self.title {
            employee.title = title;
        }
        if let Some(phone) = self.phone {
            employee.phone = phone;
        }
        if let Some(mail) = self.mail {
            employee.mail = mail;
        }
        if let Some(street_name) = self.street_name {
            employee.street_name = street_name;
        }
        if let Some(house_number) = self.house_number {
            employee.house_number = house_number;
        }
        if let Some(postal_code) = self.postal_code {
            employee.postal_code = postal_code;
        }
        if let Some(locality) = self.locality {
            employee.locality = locality;
        }
        if let Some(province) = self.province {
            employee.province = province;
        }
        if let Some(country) = self.country {
            employee.country = country;
        }
    }
}

/// Basic structural mail check: one '@', non-empty local part, dotted domain.
pub fn is_valid_mail(mail: &str) -> bool {
    if mail.contains(char::is_whitespace) || mail.matches('@').count() != 1 {
        return false;
    }
    let Some((local, domain)) = mail.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
