// Closed value model the walker operates on. Every runtime value is captured
// into exactly one of these arms before any checking happens.

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,                        // None, (), or an absent value
    Scalar(Scalar),
    String(String),
    Mapping { len: usize },      // entries are counted, never walked
    Container(Vec<Value>),       // seq / tuple / bytes, iteration order
    StructuredNode { len: usize }, // an embedded JSON document
    Composite {
        type_name: String,
        fields: Vec<Field>,      // declaration order
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i128),
    UInt(u128),
    Float(f64),
    Char(char),
    /// Unit structs and unit enum variants.
    Unit(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

/// Type name given to JSON objects captured in document mode.
pub const DOCUMENT_OBJECT_TYPE: &str = "object";

/// Type name given to structs serialized through `#[serde(flatten)]`; serde
/// does not pass the struct's own name in that case.
pub const FLATTENED_RECORD_TYPE: &str = "flattened";

impl Value {
    /// Runtime type identifier used for stop-recursion lookups.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Value::Composite { type_name, .. } => Some(type_name),
            _ => None,
        }
    }

    /// Capture a JSON document in document mode: objects are walked like
    /// records, arrays like containers.
    pub fn from_json_document(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Scalar(Scalar::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Scalar(Scalar::Int(i as i128))
                } else if let Some(u) = n.as_u64() {
                    Value::Scalar(Scalar::UInt(u as u128))
                } else {
                    Value::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(xs) => {
                Value::Container(xs.iter().map(Value::from_json_document).collect())
            }
            serde_json::Value::Object(map) => Value::Composite {
                type_name: DOCUMENT_OBJECT_TYPE.to_string(),
                fields: map
                    .iter()
                    .map(|(k, v)| Field { name: k.clone(), value: Value::from_json_document(v) })
                    .collect(),
            },
        }
    }
}
