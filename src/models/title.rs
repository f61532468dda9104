//! Employee job titles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Job title of an employee.
///
/// Serialized by variant name, matching the wire values the backend stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Title {
    Manager,
    Analyst,
    Developer,
}

impl Title {
    /// All titles in their display priority order.
    pub const ALL: [Title; 3] = [Title::Manager, Title::Analyst, Title::Developer];

    /// Display label, identical to the wire value.
    pub fn label(&self) -> &'static str {
        match self {
            Title::Manager => "Manager",
            Title::Analyst => "Analyst",
            Title::Developer => "Developer",
        }
    }

    /// Position of a title label in the priority ordering, if recognized.
    pub fn rank_of(label: &str) -> Option<usize> {
        Title::ALL.iter().position(|t| t.label() == label)
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Title {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manager" => Ok(Title::Manager),
            "analyst" => Ok(Title::Analyst),
            "developer" => Ok(Title::Developer),
            other => Err(AppError::parse(format!("unknown title '{other}'"))),
        }
    }
}
