//! Client-side tabular view state: filter, sort, and paginate composition.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::AppError;
use crate::models::{Department, Employee};

/// Default page size for table views.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sort direction for a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// A record type renderable by a table view.
pub trait TableRecord: Clone {
    type Column: Copy;

    /// Compare two records on a column.
    fn compare(a: &Self, b: &Self, column: Self::Column) -> Ordering;

    /// Whether the record's designated text fields contain the needle.
    /// The needle is already lowercased.
    fn matches(&self, needle: &str) -> bool;
}

/// Sortable columns of the department table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartmentColumn {
    Id,
    Name,
}

impl FromStr for DepartmentColumn {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(DepartmentColumn::Id),
            "name" => Ok(DepartmentColumn::Name),
            other => Err(AppError::parse(format!("unknown department column '{other}'"))),
        }
    }
}

impl TableRecord for Department {
    type Column = DepartmentColumn;

    fn compare(a: &Self, b: &Self, column: Self::Column) -> Ordering {
        match column {
            DepartmentColumn::Id => a.id.cmp(&b.id),
            DepartmentColumn::Name => a.name.cmp(&b.name),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

/// Sortable columns of the employee table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeColumn {
    Id,
    FirstName,
    LastName,
}

impl FromStr for EmployeeColumn {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(EmployeeColumn::Id),
            "first" | "firstname" => Ok(EmployeeColumn::FirstName),
            "last" | "lastname" => Ok(EmployeeColumn::LastName),
            other => Err(AppError::parse(format!("unknown employee column '{other}'"))),
        }
    }
}

impl TableRecord for Employee {
    type Column = EmployeeColumn;

    fn compare(a: &Self, b: &Self, column: Self::Column) -> Ordering {
        match column {
            EmployeeColumn::Id => a.id.cmp(&b.id),
            EmployeeColumn::FirstName => a.first_name.cmp(&b.first_name),
            EmployeeColumn::LastName => a.last_name.cmp(&b.last_name),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.first_name.to_lowercase().contains(needle) || self.last_name.to_lowercase().contains(needle)
    }
}

/// View state for one table: free-text filter, sort column, and page window.
///
/// `view` recomputes the derived slice from the current state on every call;
/// the input collection is cloned and never mutated in place.
pub struct TableState<T: TableRecord> {
    pub filter: String,
    pub sort: Option<(T::Column, SortDirection)>,
    pub page_index: usize,
    pub page_size: usize,
}

impl<T: TableRecord> Default for TableState<T> {
    fn default() -> Self {
        Self {
            filter: String::new(),
            sort: None,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl<T: TableRecord> TableState<T> {
    /// Create the default view state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the derived rows: filter, then sort, then paginate.
    pub fn view(&self, records: &[T]) -> Vec<T> {
        let mut rows: Vec<T> = records.to_vec();

        let needle = self.filter.trim().to_lowercase();
        if !needle.is_empty() {
            rows.retain(|record| record.matches(&needle));
        }

        if let Some((column, direction)) = self.sort {
            // sort_by is stable, so equal keys keep their input order.
            rows.sort_by(|a, b| {
                let ordering = T::compare(a, b, column);
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let start = self.page_index.saturating_mul(self.page_size);
        if start >= rows.len() {
            return Vec::new();
        }
        let end = (start + self.page_size).min(rows.len());
        rows[start..end].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed::initial_departments;

    fn departments() -> Vec<Department> {
        initial_departments()
    }

    fn employees() -> Vec<Employee> {
        departments().into_iter().flat_map(|d| d.employees).collect()
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let records = departments();
        let state = TableState::<Department>::new();
        let view = state.view(&records);
        assert_eq!(view, records);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let records = departments();
        let state = TableState::<Department> {
            filter: "bAcK".to_string(),
            ..Default::default()
        };
        let view = state.view(&records);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "Back Office");
    }

    #[test]
    fn test_filter_matches_only_designated_fields() {
        let records = employees();
        let state = TableState::<Employee> {
            filter: "ferg".to_string(),
            ..Default::default()
        };
        let view = state.view(&records);
        assert!(view.iter().all(|e| e.last_name.to_lowercase().contains("ferg")));
        assert_eq!(view.len(), 1);

        // Mail is not a designated filter field.
        let state = TableState::<Employee> {
            filter: "example.com".to_string(),
            ..Default::default()
        };
        assert!(state.view(&records).is_empty());
    }

    #[test]
    fn test_sort_by_name_descending() {
        let records = departments();
        let state = TableState::<Department> {
            sort: Some((DepartmentColumn::Name, SortDirection::Descending)),
            ..Default::default()
        };
        let names: Vec<String> = state.view(&records).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Main Office".to_string(), "Back Office".to_string()]);
    }

    #[test]
    fn test_unset_sort_keeps_input_order() {
        let mut records = employees();
        records.reverse();
        let state = TableState::<Employee>::new();
        assert_eq!(state.view(&records), records);
    }

    #[test]
    fn test_pagination_window() {
        let records = employees();
        let state = TableState::<Employee> {
            sort: Some((EmployeeColumn::Id, SortDirection::Ascending)),
            page_index: 1,
            page_size: 3,
            ..Default::default()
        };
        let view = state.view(&records);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, 4);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let records = employees();
        let state = TableState::<Employee> {
            page_index: 9,
            page_size: 10,
            ..Default::default()
        };
        assert!(state.view(&records).is_empty());
    }

    #[test]
    fn test_view_does_not_mutate_input() {
        let records = departments();
        let before = records.clone();
        let state = TableState::<Department> {
            sort: Some((DepartmentColumn::Name, SortDirection::Descending)),
            ..Default::default()
        };
        let _ = state.view(&records);
        assert_eq!(records, before);
    }

    #[test]
    fn test_state_change_recomputes_view() {
        let records = departments();
        let mut state = TableState::<Department>::new();
        assert_eq!(state.view(&records).len(), 2);

        state.filter = "main".to_string();
        assert_eq!(state.view(&records).len(), 1);

        state.filter.clear();
        state.page_size = 1;
        state.page_index = 1;
        let view = state.view(&records);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "Back Office");
    }

    #[test]
    fn test_column_parsing() {
        assert!(matches!("name".parse::<DepartmentColumn>(), Ok(DepartmentColumn::Name)));
        assert!(matches!("LAST".parse::<EmployeeColumn>(), Ok(EmployeeColumn::LastName)));
        assert!("salary".parse::<EmployeeColumn>().is_err());
    }
}
