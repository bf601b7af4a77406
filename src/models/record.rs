//! Path accessors over form records
//!
//! Records are plain `serde_json::Value` trees. Schemas address slots inside them with
//! dot/bracket paths (`basic.licence[0].number`) or explicit key lists; everything in
//! the engine reads and writes records through [`get_path`] and [`set_path`].

use serde_json::{Map, Value};

/// One step of a record path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    /// Segment from a literal key; all-digit keys address list positions.
    pub fn from_key(key: &str) -> Self {
        if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = key.parse() {
                return PathSegment::Index(index);
            }
        }
        PathSegment::Key(key.to_string())
    }

    fn object_key(&self) -> String {
        match self {
            PathSegment::Key(key) => key.clone(),
            PathSegment::Index(index) => index.to_string(),
        }
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Parse a dotted path with optional bracket indexes (`a.b[0].c`).
pub fn parse_path(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    for piece in path.split('.') {
        let mut rest = piece;
        if let Some(open) = rest.find('[') {
            let (name, brackets) = rest.split_at(open);
            if !name.is_empty() {
                segments.push(PathSegment::from_key(name));
            }
            rest = brackets;
            while let Some(stripped) = rest.strip_prefix('[') {
                match stripped.find(']') {
                    Some(close) => {
                        let inner = stripped[..close].trim_matches(|c| c == '"' || c == '\'');
                        segments.push(PathSegment::from_key(inner));
                        rest = &stripped[close + 1..];
                    }
                    None => {
                        segments.push(PathSegment::Key(rest.to_string()));
                        rest = "";
                    }
                }
            }
            if !rest.is_empty() {
                segments.push(PathSegment::Key(rest.to_string()));
            }
        } else if !rest.is_empty() {
            segments.push(PathSegment::from_key(rest));
        }
    }
    segments
}

/// Read the value at `path`, if every step exists.
pub fn get_path<'a>(record: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    path.iter().try_fold(record, |current, segment| match (current, segment) {
        (Value::Array(items), PathSegment::Index(index)) => items.get(*index),
        (Value::Object(map), segment) => map.get(&segment.object_key()),
        _ => None,
    })
}

/// Write `value` at `path`, creating intermediate objects and lists as needed.
///
/// Non-container values standing in the way are replaced.
pub fn set_path(record: &mut Value, path: &[PathSegment], value: Value) {
    let Some((head, rest)) = path.split_first() else {
        *record = value;
        return;
    };

    let slot = child_slot(record, head);
    match rest.first() {
        None => *slot = value,
        Some(next) => {
            if !fits(slot, next) {
                *slot = empty_container(next);
            }
            set_path(slot, rest, value);
        }
    }
}

fn child_slot<'a>(target: &'a mut Value, segment: &PathSegment) -> &'a mut Value {
    if let PathSegment::Index(index) = segment
        && target.is_array()
    {
        let Value::Array(items) = target else {
            unreachable!("target was checked to be a list");
        };
        if items.len() <= *index {
            items.resize(*index + 1, Value::Null);
        }
        return &mut items[*index];
    }

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Value::Object(map) = target else {
        unreachable!("target was replaced with an object above");
    };
    map.entry(segment.object_key()).or_insert(Value::Null)
}

fn fits(value: &Value, next: &PathSegment) -> bool {
    match next {
        PathSegment::Index(_) => value.is_array() || value.is_object(),
        PathSegment::Key(_) => value.is_object(),
    }
}

fn empty_container(next: &PathSegment) -> Value {
    match next {
        PathSegment::Index(_) => Value::Array(Vec::new()),
        PathSegment::Key(_) => Value::Object(Map::new()),
    }
}

/// Whether a value counts as absent (missing or null).
pub fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Text form of a value as it appears in a spreadsheet cell.
///
/// Integral floats lose their fraction, lists are comma joined and objects fall back to
/// compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(f) = n.as_f64()
                && n.is_f64()
                && f.fract() == 0.0
                && f.abs() < 9.007_199_254_740_992e15
            {
                return format!("{}", f as i64);
            }
            n.to_string()
        }
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Shallow merge where keys of `over` win over keys of `base`.
pub fn merge_shallow(base: Option<&Value>, over: Value) -> Value {
    match (base, over) {
        (Some(Value::Object(base)), Value::Object(over)) => {
            let mut merged = base.clone();
            merged.extend(over);
            Value::Object(merged)
        }
        (_, over) => over,
    }
}
