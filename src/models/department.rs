//! Organization structure snapshot used by `department` columns

use super::enums::OrgNodeKind;
use serde::{Deserialize, Serialize};

/// Position inside a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInfo {
    pub id: String,
    pub name: String,
}

/// One department as returned by the organization collaborator (flat list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub positions: Vec<PositionInfo>,
}

/// Separator between department and position names in display labels.
pub const POSITION_SEPARATOR: &str = " - ";

/// Read-only department snapshot taken for one conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepartmentDirectory {
    departments: Vec<DepartmentInfo>,
}

impl DepartmentDirectory {
    pub fn new(departments: Vec<DepartmentInfo>) -> Self {
        Self { departments }
    }

    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
    }

    pub fn departments(&self) -> &[DepartmentInfo] {
        &self.departments
    }

    /// Display label for a department or position id.
    ///
    /// Departments render as `"<name>"`, positions as `"<department> - <position>"`.
    pub fn label_for(&self, id: &str) -> Option<String> {
        for department in &self.departments {
            if department.id == id {
                return Some(department.name.clone());
            }
            if let Some(position) = department.positions.iter().find(|p| p.id == id) {
                return Some(format!(
                    "{}{}{}",
                    department.name, POSITION_SEPARATOR, position.name
                ));
            }
        }
        None
    }

    /// Id referenced by a display label produced by [`label_for`](Self::label_for).
    ///
    /// A label matching a department name exactly resolves to that department. Otherwise
    /// the label is split on the first `-` into department and position names.
    pub fn resolve(&self, label: &str) -> Option<String> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }

        if let Some(department) = self.find_department(label) {
            return Some(department.id.clone());
        }

        let (department_name, position_name) = label.split_once('-')?;
        let department = self.find_department(department_name.trim())?;
        let position_name = position_name.trim();
        department
            .positions
            .iter()
            .find(|p| p.name == position_name)
            .map(|p| p.id.clone())
    }

    fn find_department(&self, name: &str) -> Option<&DepartmentInfo> {
        self.departments.iter().find(|d| d.name == name)
    }
}

/// Node of a department picker tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgTreeNode {
    pub kind: OrgNodeKind,
    /// `department.<id>` or `position.<id>`
    pub key: String,
    pub value: String,
    pub title: String,
    pub selectable: bool,
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OrgTreeNode>,
}

/// Build the picker tree rooted at departments without a parent.
///
/// Each department lists its sub-departments first, then its positions. Nodes of a kind
/// missing from `allow` are neither selectable nor enabled; ids in `banned` are disabled.
pub fn department_tree(
    departments: &[DepartmentInfo],
    allow: &[OrgNodeKind],
    banned: &[String],
) -> Vec<OrgTreeNode> {
    subtree(departments, None, allow, banned)
}

fn subtree(
    departments: &[DepartmentInfo],
    parent: Option<&str>,
    allow: &[OrgNodeKind],
    banned: &[String],
) -> Vec<OrgTreeNode> {
    let allow_departments = allow.contains(&OrgNodeKind::Department);
    let allow_positions = allow.contains(&OrgNodeKind::Position);

    departments
        .iter()
        .filter(|d| d.parent.as_deref().filter(|p| !p.is_empty()) == parent)
        .map(|department| {
            let mut children = subtree(departments, Some(&department.id), allow, banned);
            children.extend(department.positions.iter().map(|position| OrgTreeNode {
                kind: OrgNodeKind::Position,
                key: format!("position.{}", position.id),
                value: position.id.clone(),
                title: position.name.clone(),
                selectable: allow_positions,
                disabled: banned.contains(&position.id) || !allow_positions,
                children: Vec::new(),
            }));

            OrgTreeNode {
                kind: OrgNodeKind::Department,
                key: format!("department.{}", department.id),
                value: department.id.clone(),
                title: department.name.clone(),
                selectable: allow_departments,
                disabled: banned.contains(&department.id) || !allow_departments,
                children,
            }
        })
        .collect()
}
