//! Enumeration label maps for `select` columns

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Label of one enumeration entry: either a bare string or an object with `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumLabel {
    Text(String),
    Entry {
        text: String,
        /// Display props such as `status` or `color`
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl EnumLabel {
    pub fn text(&self) -> &str {
        match self {
            EnumLabel::Text(text) => text,
            EnumLabel::Entry { text, .. } => text,
        }
    }
}

impl From<&str> for EnumLabel {
    fn from(text: &str) -> Self {
        EnumLabel::Text(text.to_string())
    }
}

/// Ordered canonical value → label map.
pub type EnumMap = IndexMap<String, EnumLabel>;

/// Function form of an enumeration whose entries depend on the current record.
pub type EnumFn = Arc<dyn Fn(&Value) -> EnumMap + Send + Sync>;

/// Label map of a `select` column, fixed or derived from the record.
#[derive(Clone)]
pub enum ValueEnum {
    Static(EnumMap),
    Computed(EnumFn),
}

impl ValueEnum {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Value) -> EnumMap + Send + Sync + 'static,
    {
        ValueEnum::Computed(Arc::new(f))
    }

    /// Entries in effect for `record`.
    pub fn resolve(&self, record: &Value) -> std::borrow::Cow<'_, EnumMap> {
        match self {
            ValueEnum::Static(map) => std::borrow::Cow::Borrowed(map),
            ValueEnum::Computed(f) => std::borrow::Cow::Owned(f(record)),
        }
    }

    /// Human label of a stored key.
    pub fn label_of(&self, record: &Value, key: &str) -> Option<String> {
        self.resolve(record).get(key).map(|label| label.text().to_string())
    }

    /// Canonical key whose label matches `label`; when labels repeat, the last entry wins.
    pub fn key_of(&self, record: &Value, label: &str) -> Option<String> {
        self.resolve(record)
            .iter()
            .rev()
            .find(|(_, entry)| entry.text() == label)
            .map(|(key, _)| key.clone())
    }
}

impl<K: Into<String>, L: Into<EnumLabel>> FromIterator<(K, L)> for ValueEnum {
    fn from_iter<T: IntoIterator<Item = (K, L)>>(iter: T) -> Self {
        ValueEnum::Static(iter.into_iter().map(|(k, l)| (k.into(), l.into())).collect())
    }
}

impl std::fmt::Debug for ValueEnum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueEnum::Static(map) => f.debug_tuple("Static").field(map).finish(),
            ValueEnum::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

impl PartialEq for ValueEnum {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueEnum::Static(a), ValueEnum::Static(b)) => a == b,
            (ValueEnum::Computed(a), ValueEnum::Computed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for ValueEnum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.resolve(&Value::Object(Map::new()))
            .as_ref()
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValueEnum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        EnumMap::deserialize(deserializer).map(ValueEnum::Static)
    }
}
