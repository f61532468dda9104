//! Hierarchical locator tree for name-based employee lookup.
//!
//! The tree goes department -> title group -> employee -> contact leaves, with
//! title groups in a fixed priority order. Search is an exact full-name match
//! that expands every node on the path; autocomplete is a case-insensitive
//! substring match gated at two characters.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::warn;

use crate::models::{Department, Employee, Title};

/// Node kind in the company tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Department,
    TitleGroup,
    Employee,
    Phone,
    Mail,
}

/// Node for company structure.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyNode {
    pub name: String,
    pub kind: NodeKind,
    pub children: Vec<CompanyNode>,
    pub expanded: bool,
}

impl CompanyNode {
    fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            children: Vec::new(),
            expanded: false,
        }
    }

    fn with_children(name: impl Into<String>, kind: NodeKind, children: Vec<CompanyNode>) -> Self {
        Self {
            name: name.into(),
            kind,
            children,
            expanded: false,
        }
    }

    /// Whether the node has children to expand.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Build the company tree: one root node per department.
pub fn build_tree(departments: &[Department]) -> Vec<CompanyNode> {
    departments.iter().map(department_node).collect()
}

fn department_node(department: &Department) -> CompanyNode {
    let mut grouped: BTreeMap<&str, Vec<&Employee>> = BTreeMap::new();
    for employee in &department.employees {
        grouped.entry(employee.title.label()).or_default().push(employee);
    }

    let mut entries: Vec<(&str, Vec<&Employee>)> = grouped.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| group_order(a, b));

    let groups = entries
        .into_iter()
        .map(|(label, employees)| {
            let children = employees.into_iter().map(employee_node).collect();
            CompanyNode::with_children(format!("{label}s"), NodeKind::TitleGroup, children)
        })
        .collect();

    CompanyNode::with_children(department.name.clone(), NodeKind::Department, groups)
}

fn employee_node(employee: &Employee) -> CompanyNode {
    CompanyNode::with_children(
        employee.full_name(),
        NodeKind::Employee,
        vec![
            CompanyNode::new(employee.phone.clone(), NodeKind::Phone),
            CompanyNode::new(employee.mail.clone(), NodeKind::Mail),
        ],
    )
}

/// Ordering of title group labels: recognized titles in their priority order,
/// anything else after them alphabetically.
pub fn group_order(a: &str, b: &str) -> Ordering {
    match (Title::rank_of(a), Title::rank_of(b)) {
        (Some(rank_a), Some(rank_b)) => rank_a.cmp(&rank_b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Find the path from a root down to the node with the given name.
/// The match is exact and case-sensitive.
pub fn find_path<'a>(nodes: &'a [CompanyNode], name: &str) -> Option<Vec<&'a CompanyNode>> {
    for node in nodes {
        if node.name == name {
            return Some(vec![node]);
        }
        if let Some(mut path) = find_path(&node.children, name) {
            path.insert(0, node);
            return Some(path);
        }
    }
    None
}

/// Mark every node on the path to the named node as expanded and return the
/// path names. A miss logs a warning and leaves the tree untouched.
pub fn expand_path(nodes: &mut [CompanyNode], name: &str) -> Option<Vec<String>> {
    fn walk(nodes: &mut [CompanyNode], name: &str, trail: &mut Vec<String>) -> bool {
        for node in nodes {
            trail.push(node.name.clone());
            if node.name == name {
                node.expanded = true;
                return true;
            }
            if walk(&mut node.children, name, trail) {
                node.expanded = true;
                return true;
            }
            trail.pop();
        }
        false
    }

    let mut trail = Vec::new();
    if walk(nodes, name, &mut trail) {
        Some(trail)
    } else {
        warn!("Employee with name [{name}] not found");
        None
    }
}

/// Collect the names of all employee nodes, in tree order.
pub fn collect_employee_names(nodes: &[CompanyNode]) -> Vec<String> {
    let mut names = Vec::new();
    collect_into(nodes, &mut names);
    names
}

fn collect_into(nodes: &[CompanyNode], names: &mut Vec<String>) {
    for node in nodes {
        if node.kind == NodeKind::Employee {
            names.push(node.name.clone());
        }
        collect_into(&node.children, names);
    }
}

/// Autocomplete suggestions: case-insensitive substring match, only once the
/// query has at least two characters.
pub fn autocomplete(names: &[String], query: &str) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.len() < 2 {
        return Vec::new();
    }
    names
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
