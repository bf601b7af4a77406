//! Column schema model for the SDK

use super::enums::ValueType;
use super::record::{PathSegment, parse_path};
use super::value_enum::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::Arc;

/// Stable identifier of the record slot a column is bound to.
///
/// A single key follows dot/bracket path semantics; an explicit key list addresses
/// nested storage one literal key per level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataIndex {
    Key(String),
    Path(Vec<String>),
}

impl DataIndex {
    pub fn segments(&self) -> Vec<PathSegment> {
        match self {
            DataIndex::Key(key) => parse_path(key),
            DataIndex::Path(keys) => keys.iter().map(|k| PathSegment::from_key(k)).collect(),
        }
    }

    /// Normalized identifier used for deduplication and parameter listings.
    pub fn id(&self) -> String {
        match self {
            DataIndex::Key(key) => key.clone(),
            DataIndex::Path(keys) => keys.join("."),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            DataIndex::Key(key) => key.is_empty(),
            DataIndex::Path(keys) => keys.is_empty(),
        }
    }
}

impl std::fmt::Display for DataIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id())
    }
}

impl From<&str> for DataIndex {
    fn from(key: &str) -> Self {
        DataIndex::Key(key.to_string())
    }
}

impl From<String> for DataIndex {
    fn from(key: String) -> Self {
        DataIndex::Key(key)
    }
}

impl From<Vec<&str>> for DataIndex {
    fn from(keys: Vec<&str>) -> Self {
        DataIndex::Path(keys.into_iter().map(String::from).collect())
    }
}

/// Display and group key of a tab group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabGroup {
    pub id: String,
    pub title: String,
}

/// Function form of child columns whose shape depends on the current record.
pub type ColumnsFn = Arc<dyn Fn(&Value) -> Vec<ColumnSchema> + Send + Sync>;

/// Child columns of a group, fixed or derived from the record.
///
/// Computed children must tolerate records with missing fields, since headers are
/// generated against an empty record.
#[derive(Clone)]
pub enum Children {
    Static(Vec<ColumnSchema>),
    Computed(ColumnsFn),
}

impl Children {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Vec<ColumnSchema> + Send + Sync + 'static,
    {
        Children::Computed(Arc::new(f))
    }

    pub fn resolve(&self, record: &Value) -> Cow<'_, [ColumnSchema]> {
        match self {
            Children::Static(columns) => Cow::Borrowed(columns.as_slice()),
            Children::Computed(f) => Cow::Owned(f(record)),
        }
    }
}

impl std::fmt::Debug for Children {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Children::Static(columns) => f.debug_tuple("Static").field(columns).finish(),
            Children::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

impl PartialEq for Children {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Children::Static(a), Children::Static(b)) => a == b,
            (Children::Computed(a), Children::Computed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for Children {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.resolve(&Value::Object(Map::new()))
            .as_ref()
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Children {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<ColumnSchema>::deserialize(deserializer).map(Children::Static)
    }
}

/// Column schema describing one form field or a named group of fields
///
/// The same description drives form rendering, spreadsheet headers and value
/// conversion. Group nodes (`$tabGroup`) carry `group` and `columns`; `formList` nodes
/// carry the item sub-form in `columns`.
///
/// # Example
///
/// ```rust
/// use compliance_forms_sdk::models::{ColumnSchema, ValueType};
///
/// let plate = ColumnSchema::leaf("车牌号", "plateNumber", ValueType::Text);
/// let group = ColumnSchema::group("basic", "基础信息", vec![plate]);
/// assert!(group.has_children());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    /// Display label, spreadsheet header text and parameter name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Bound record slot; absent on purely structural nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_index: Option<DataIndex>,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Children>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<TabGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_enum: Option<ValueEnum>,
    /// UI props (`fieldProps`, `colProps`, `formItemProps`, ...) carried through untouched
    #[serde(flatten)]
    pub props: Map<String, Value>,
}

impl ColumnSchema {
    /// Create a bound leaf column.
    pub fn leaf(title: &str, data_index: impl Into<DataIndex>, value_type: ValueType) -> Self {
        Self {
            title: Some(title.to_string()),
            data_index: Some(data_index.into()),
            value_type,
            ..Default::default()
        }
    }

    /// Create a tab group with static children.
    pub fn group(id: &str, title: &str, columns: Vec<ColumnSchema>) -> Self {
        Self::group_with(id, title, Children::Static(columns))
    }

    pub fn group_with(id: &str, title: &str, columns: Children) -> Self {
        Self {
            value_type: ValueType::TabGroup,
            group: Some(TabGroup {
                id: id.to_string(),
                title: title.to_string(),
            }),
            columns: Some(columns),
            ..Default::default()
        }
    }

    pub fn with_value_enum(mut self, value_enum: ValueEnum) -> Self {
        self.value_enum = Some(value_enum);
        self
    }

    pub fn with_prop(mut self, key: &str, value: Value) -> Self {
        self.props.insert(key.to_string(), value);
        self
    }

    /// Whether flattening expands this node.
    ///
    /// `formList` children describe list items and never surface as record leaves.
    pub fn has_children(&self) -> bool {
        self.columns.is_some() && self.value_type != ValueType::FormList
    }

    /// Child columns in effect for `record` (empty for leaves).
    pub fn children(&self, record: &Value) -> Cow<'_, [ColumnSchema]> {
        match &self.columns {
            Some(children) => children.resolve(record),
            None => Cow::Borrowed(&[]),
        }
    }

    /// Normalized `dataIndex`, if bound to a non-empty slot.
    pub fn data_index_id(&self) -> Option<String> {
        self.data_index
            .as_ref()
            .filter(|index| !index.is_empty())
            .map(DataIndex::id)
    }

    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// `fieldProps` entry, if any.
    pub fn field_prop(&self, key: &str) -> Option<&Value> {
        self.props.get("fieldProps").and_then(|props| props.get(key))
    }
}

/// Build a stable column identifier: `<path>__<version>__<name>`, parts joined by `_`.
pub fn column_id(path: &[&str], version: &str, name: &[&str]) -> String {
    format!("{}__{}__{}", path.join("_"), version, name.join("_"))
}

/// Column identifier builder bound to one page path (e.g. `["core", "vehicle"]`).
#[derive(Debug, Clone)]
pub struct ColumnIdFactory {
    path: Vec<String>,
}

impl ColumnIdFactory {
    pub fn new(path: &[&str]) -> Self {
        Self {
            path: path.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn id(&self, version: &str, name: &[&str]) -> String {
        let path: Vec<&str> = self.path.iter().map(String::as_str).collect();
        column_id(&path, version, name)
    }
}
