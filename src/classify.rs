use crate::value::Value;

/// Why a value counts as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyKind {
    Null,
    Blank,
    EmptyContainer,
    EmptyMapping,
    EmptyDocument,
}

/// Terminal values are never walked for sub-properties. Containers are not
/// base, but they are expanded by index rather than by property.
pub fn is_base_type(value: &Value) -> bool {
    match value {
        Value::Null
        | Value::Scalar(_)
        | Value::String(_)
        | Value::Mapping { .. }
        | Value::StructuredNode { .. } => true,
        Value::Container(_) | Value::Composite { .. } => false,
    }
}

pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Container(_))
}

/// Inspects only the immediate shape; never recurses.
pub fn emptiness(value: &Value) -> Option<EmptyKind> {
    match value {
        Value::Null => Some(EmptyKind::Null),
        Value::String(s) if s.trim().is_empty() => Some(EmptyKind::Blank),
        Value::Container(xs) if xs.is_empty() => Some(EmptyKind::EmptyContainer),
        Value::Mapping { len: 0 } => Some(EmptyKind::EmptyMapping),
        Value::StructuredNode { len: 0 } => Some(EmptyKind::EmptyDocument),
        _ => None,
    }
}

pub fn is_empty(value: &Value) -> bool {
    emptiness(value).is_some()
}
