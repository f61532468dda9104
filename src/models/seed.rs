//! Sample dataset used by `init` and by tests.

use chrono::NaiveDate;

use crate::models::department::Department;
use crate::models::employee::Employee;
use crate::models::title::Title;

/// Build the initial sample dataset: two departments, four employees.
pub fn initial_departments() -> Vec<Department> {
    vec![
        Department {
            id: 1,
            name: "Main Office".to_string(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 6),
            end_date: NaiveDate::from_ymd_opt(2020, 1, 7),
            notes: Some("Main product:\n - money transfer".to_string()),
            keywords: vec!["Banking".to_string()],
            employees: vec![
                Employee {
                    id: 1,
                    department_id: 1,
                    first_name: "Emily".to_string(),
                    last_name: "Clark".to_string(),
                    title: Title::Developer,
                    phone: "2025550143".to_string(),
                    mail: "emily.clark@company.com".to_string(),
                    street_name: Some("Maple Street".to_string()),
                    house_number: Some("42B".to_string()),
                    postal_code: Some("30301".to_string()),
                    locality: Some("Atlanta".to_string()),
                    province: Some("GA".to_string()),
                    country: Some("United States".to_string()),
                },
                Employee {
                    id: 3,
                    department_id: 1,
                    first_name: "Nora".to_string(),
                    last_name: "Meier".to_string(),
                    title: Title::Manager,
                    phone: "+41 44 668 18 00".to_string(),
                    mail: "nora.meier@company.com".to_string(),
                    street_name: None,
                    house_number: None,
                    postal_code: None,
                    locality: Some("Zurich".to_string()),
                    province: None,
                    country: Some("Switzerland".to_string()),
                },
            ],
        },
        Department {
            id: 2,
            name: "Back Office".to_string(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 6),
            end_date: NaiveDate::from_ymd_opt(2020, 1, 7),
            notes: Some("Main product:\n - credit".to_string()),
            keywords: vec!["Credit".to_string()],
            employees: vec![
                Employee {
                    id: 2,
                    department_id: 2,
                    first_name: "Thomas".to_string(),
                    last_name: "Ferguson".to_string(),
                    title: Title::Developer,
                    phone: "+41 21 613 12 12".to_string(),
                    mail: "Thomas.Ferguson@example.com".to_string(),
                    street_name: Some("Rue de Bourg".to_string()),
                    house_number: Some("20".to_string()),
                    postal_code: Some("1003".to_string()),
                    locality: Some("Lausanne".to_string()),
                    province: None,
                    country: Some("Switzerland".to_string()),
                },
                Employee {
                    id: 4,
                    department_id: 2,
                    first_name: "Priya".to_string(),
                    last_name: "Nair".to_string(),
                    title: Title::Analyst,
                    phone: "2025550178".to_string(),
                    mail: "priya.nair@company.com".to_string(),
                    street_name: None,
                    house_number: None,
                    postal_code: None,
                    locality: Some("Boston".to_string()),
                    province: Some("MA".to_string()),
                    country: Some("United States".to_string()),
                },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_ids_are_globally_unique() {
        let departments = initial_departments();
        let mut ids: Vec<u32> = departments
            .iter()
            .flat_map(|d| d.employees.iter().map(|e| e.id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_seed_back_references_are_consistent() {
        for department in initial_departments() {
            for employee in &department.employees {
                assert_eq!(employee.department_id, department.id);
            }
        }
    }
}
