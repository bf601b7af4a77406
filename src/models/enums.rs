//! Enums for column schemas
//!
//! # Serde Casing Conventions
//!
//! `ValueType` keeps the exact tag strings used by the schema documents, including the
//! `#` prefix of marker fields (`#assets`, `#ai`) and the `$` prefix of the structural
//! tab group tag. Layout enums use `lowercase`.

use serde::{Deserialize, Serialize};

/// Reserved end-date marker of an open-ended validity range.
pub const LONG_TERM_SENTINEL: &str = "#LONG";

/// Human-readable label of [`LONG_TERM_SENTINEL`] in spreadsheets and exports.
pub const LONG_TERM_LABEL: &str = "长期";

/// Semantic value-type tag of a column.
///
/// Selects both the form widget and the codec behaviour of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValueType {
    #[default]
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "textarea")]
    Textarea,
    #[serde(rename = "digit")]
    Digit,
    #[serde(rename = "money")]
    Money,
    #[serde(rename = "switch")]
    Switch,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "dateTime")]
    DateTime,
    #[serde(rename = "dateTimeRange")]
    DateTimeRange,
    #[serde(rename = "select")]
    Select,
    /// Row action column (tables only)
    #[serde(rename = "option")]
    Option,
    /// Two endpoints, the second may be [`LONG_TERM_SENTINEL`]
    #[serde(rename = "validDateRange")]
    ValidDateRange,
    /// Department or position id
    #[serde(rename = "department")]
    Department,
    #[serde(rename = "employee")]
    Employee,
    /// Asset (file) reference
    #[serde(rename = "#assets")]
    Assets,
    /// AI-assisted extraction trigger
    #[serde(rename = "#ai")]
    Ai,
    /// Repeating sub-form list
    #[serde(rename = "formList")]
    FormList,
    /// Structural tab group without a value of its own
    #[serde(rename = "$tabGroup")]
    TabGroup,
}

impl ValueType {
    /// Tag string as written in schema documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Textarea => "textarea",
            ValueType::Digit => "digit",
            ValueType::Money => "money",
            ValueType::Switch => "switch",
            ValueType::Date => "date",
            ValueType::DateTime => "dateTime",
            ValueType::DateTimeRange => "dateTimeRange",
            ValueType::Select => "select",
            ValueType::Option => "option",
            ValueType::ValidDateRange => "validDateRange",
            ValueType::Department => "department",
            ValueType::Employee => "employee",
            ValueType::Assets => "#assets",
            ValueType::Ai => "#ai",
            ValueType::FormList => "formList",
            ValueType::TabGroup => "$tabGroup",
        }
    }

    /// Marker fields (`#`-prefixed) hold no exportable value of their own.
    pub fn is_marker(&self) -> bool {
        matches!(self, ValueType::Assets | ValueType::Ai)
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ValueType::TabGroup)
    }

    /// Whether the type can occupy a spreadsheet column.
    ///
    /// File references, AI triggers and repeating sub-forms have no cell representation.
    pub fn is_spreadsheet_cell(&self) -> bool {
        !matches!(
            self,
            ValueType::Assets | ValueType::Ai | ValueType::FormList | ValueType::TabGroup
        )
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| format!("Unknown value type: {}", s))
    }
}

/// Tab strip placement of a grouped form level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabPlacement {
    #[default]
    Top,
    Start,
}

impl TabPlacement {
    /// Placement used one nesting level deeper.
    pub fn alternate(self) -> Self {
        match self {
            TabPlacement::Top => TabPlacement::Start,
            TabPlacement::Start => TabPlacement::Top,
        }
    }
}

/// Kind of node in a department picker tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgNodeKind {
    Department,
    Position,
}
