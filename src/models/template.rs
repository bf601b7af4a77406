//! Export template identifiers

use serde::{Deserialize, Serialize};

/// Document type whose export templates are registered on the rendering service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateIdentifier {
    #[serde(rename = "core.employee.document")]
    EmployeeDocument,
    #[serde(rename = "core.vehicle")]
    Vehicle,
}

impl TemplateIdentifier {
    pub const ALL: [TemplateIdentifier; 2] =
        [TemplateIdentifier::EmployeeDocument, TemplateIdentifier::Vehicle];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateIdentifier::EmployeeDocument => "core.employee.document",
            TemplateIdentifier::Vehicle => "core.vehicle",
        }
    }

    /// Built-in display label
    pub fn label(&self) -> &'static str {
        match self {
            TemplateIdentifier::EmployeeDocument => "人员档案",
            TemplateIdentifier::Vehicle => "车辆档案",
        }
    }
}

impl std::str::FromStr for TemplateIdentifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("Unknown template identifier: {}", s))
    }
}

impl std::fmt::Display for TemplateIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry() {
        let id: TemplateIdentifier = "core.vehicle".parse().unwrap();
        assert_eq!(id, TemplateIdentifier::Vehicle);
        assert_eq!(id.label(), "车辆档案");
        assert_eq!(
            serde_json::to_string(&TemplateIdentifier::EmployeeDocument).unwrap(),
            "\"core.employee.document\""
        );
        assert!("core.unknown".parse::<TemplateIdentifier>().is_err());
    }
}
