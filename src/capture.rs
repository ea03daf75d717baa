//! Capture any `T: Serialize` into the closed [`Value`] model.
//!
//! Serde is the introspection mechanism: struct fields come out as named
//! entries in declaration order, sequences as indexed elements. A field whose
//! `Serialize` impl fails aborts the capture with [`Error::PropertyRead`]
//! naming that field.
use serde::de::{Deserialize, Deserializer};
use serde::ser::{self, Serialize};

use crate::error::{Error, Result};
use crate::value::{Field, Scalar, Value, FLATTENED_RECORD_TYPE};

/// Marker name recognised by the capturing serializer. Every other serializer
/// treats the newtype as transparent, so a `JsonDocument` still round-trips
/// through serde_json as plain JSON.
const DOCUMENT_TOKEN: &str = "$blankscan::private::JsonDocument";

/// A parsed JSON document embedded in a typed value. It is checked as a unit:
/// empty when it has no entries/elements, never walked into.
///
/// A bare `serde_json::Value` field is captured by its serialized shape
/// instead: an object is an opaque mapping, but an array is a container whose
/// elements are walked (`[null]` reports `.field[0]`). Wrap the field in
/// `JsonDocument` to check both shapes as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonDocument(pub serde_json::Value);

impl From<serde_json::Value> for JsonDocument {
    fn from(value: serde_json::Value) -> Self {
        JsonDocument(value)
    }
}

impl Serialize for JsonDocument {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(DOCUMENT_TOKEN, &self.0)
    }
}

impl<'de> Deserialize<'de> for JsonDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(JsonDocument)
    }
}

pub fn capture<T: Serialize + ?Sized>(value: &T, max_depth: usize) -> Result<Value> {
    value.serialize(Capture { depth: 0, max_depth })
}

// ————————————————————————————————————————————————————————————————————————————
// SERIALIZER
// ————————————————————————————————————————————————————————————————————————————

#[derive(Clone, Copy)]
struct Capture {
    depth: usize,
    max_depth: usize,
}

impl Capture {
    fn nested(self) -> Result<Capture> {
        let depth = self.depth + 1;
        if depth > self.max_depth {
            return Err(Error::DepthLimitExceeded { limit: self.max_depth });
        }
        Ok(Capture { depth, ..self })
    }
}

fn scalar(s: Scalar) -> Result<Value> {
    Ok(Value::Scalar(s))
}

impl ser::Serializer for Capture {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SeqCapture;
    type SerializeTuple = SeqCapture;
    type SerializeTupleStruct = SeqCapture;
    type SerializeTupleVariant = SeqCapture;
    type SerializeMap = MapCapture;
    type SerializeStruct = StructCapture;
    type SerializeStructVariant = StructCapture;

    fn serialize_bool(self, v: bool) -> Result<Value> { scalar(Scalar::Bool(v)) }
    fn serialize_i8(self, v: i8) -> Result<Value> { scalar(Scalar::Int(v.into())) }
    fn serialize_i16(self, v: i16) -> Result<Value> { scalar(Scalar::Int(v.into())) }
    fn serialize_i32(self, v: i32) -> Result<Value> { scalar(Scalar::Int(v.into())) }
    fn serialize_i64(self, v: i64) -> Result<Value> { scalar(Scalar::Int(v.into())) }
    fn serialize_i128(self, v: i128) -> Result<Value> { scalar(Scalar::Int(v)) }
    fn serialize_u8(self, v: u8) -> Result<Value> { scalar(Scalar::UInt(v.into())) }
    fn serialize_u16(self, v: u16) -> Result<Value> { scalar(Scalar::UInt(v.into())) }
    fn serialize_u32(self, v: u32) -> Result<Value> { scalar(Scalar::UInt(v.into())) }
    fn serialize_u64(self, v: u64) -> Result<Value> { scalar(Scalar::UInt(v.into())) }
    fn serialize_u128(self, v: u128) -> Result<Value> { scalar(Scalar::UInt(v)) }
    fn serialize_f32(self, v: f32) -> Result<Value> { scalar(Scalar::Float(v.into())) }
    fn serialize_f64(self, v: f64) -> Result<Value> { scalar(Scalar::Float(v)) }
    fn serialize_char(self, v: char) -> Result<Value> { scalar(Scalar::Char(v)) }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Container(
            v.iter().map(|b| Value::Scalar(Scalar::UInt((*b).into()))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Value> {
        value.serialize(self.nested()?)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value> {
        scalar(Scalar::Unit(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        scalar(Scalar::Unit(variant))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Value> {
        let inner = value.serialize(self.nested()?)?;
        if name != DOCUMENT_TOKEN {
            return Ok(inner);
        }
        let len = match inner {
            Value::Mapping { len } => len,
            Value::Container(xs) => xs.len(),
            _ => 0,
        };
        Ok(Value::StructuredNode { len })
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<Value> {
        value.serialize(self.nested()?)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqCapture> {
        SeqCapture::new(self, len)
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqCapture> {
        SeqCapture::new(self, Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqCapture> {
        SeqCapture::new(self, Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        len: usize,
    ) -> Result<SeqCapture> {
        SeqCapture::new(self, Some(len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapCapture> {
        match len {
            Some(_) => Ok(MapCapture::Counted { len: 0 }),
            None => Ok(MapCapture::Record {
                inner: self.nested()?,
                pending_key: None,
                fields: Vec::new(),
            }),
        }
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<StructCapture> {
        StructCapture::new(self, name, len)
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        len: usize,
    ) -> Result<StructCapture> {
        StructCapture::new(self, name, len)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// COMPOUND STATES
// ————————————————————————————————————————————————————————————————————————————

struct SeqCapture {
    inner: Capture,
    elems: Vec<Value>,
}

impl SeqCapture {
    fn new(outer: Capture, len: Option<usize>) -> Result<Self> {
        Ok(SeqCapture {
            inner: outer.nested()?,
            elems: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.elems.push(value.serialize(self.inner)?);
        Ok(())
    }
}

impl ser::SerializeSeq for SeqCapture {
    type Ok = Value;
    type Error = Error;
    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }
    fn end(self) -> Result<Value> {
        Ok(Value::Container(self.elems))
    }
}

impl ser::SerializeTuple for SeqCapture {
    type Ok = Value;
    type Error = Error;
    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }
    fn end(self) -> Result<Value> {
        Ok(Value::Container(self.elems))
    }
}

impl ser::SerializeTupleStruct for SeqCapture {
    type Ok = Value;
    type Error = Error;
    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }
    fn end(self) -> Result<Value> {
        Ok(Value::Container(self.elems))
    }
}

impl ser::SerializeTupleVariant for SeqCapture {
    type Ok = Value;
    type Error = Error;
    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }
    fn end(self) -> Result<Value> {
        Ok(Value::Container(self.elems))
    }
}

/// Maps of known length are opaque: only the entry count matters.
///
/// serde_derive writes a struct holding a `#[serde(flatten)]` field as a map
/// of unknown length. Those entries are captured as the fields of a record,
/// so a hand-written `collect_map` over an inexact iterator is walked too.
enum MapCapture {
    Counted { len: usize },
    Record { inner: Capture, pending_key: Option<String>, fields: Vec<Field> },
}

impl ser::SerializeMap for MapCapture {
    type Ok = Value;
    type Error = Error;
    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        match self {
            MapCapture::Counted { len } => *len += 1,
            MapCapture::Record { inner, pending_key, .. } => {
                *pending_key = Some(key_name(key.serialize(*inner)?));
            }
        }
        Ok(())
    }
    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        if let MapCapture::Record { inner, pending_key, fields } = self {
            let name = pending_key.take().unwrap_or_default();
            let value = read_field(*inner, &name, value)?;
            fields.push(Field { name, value });
        }
        Ok(())
    }
    fn end(self) -> Result<Value> {
        Ok(match self {
            MapCapture::Counted { len } => Value::Mapping { len },
            MapCapture::Record { fields, .. } => Value::Composite {
                type_name: FLATTENED_RECORD_TYPE.to_string(),
                fields,
            },
        })
    }
}

fn key_name(key: Value) -> String {
    match key {
        Value::String(s) => s,
        Value::Scalar(Scalar::Unit(name)) => name.to_string(),
        Value::Scalar(Scalar::Int(i)) => i.to_string(),
        Value::Scalar(Scalar::UInt(u)) => u.to_string(),
        Value::Scalar(Scalar::Char(c)) => c.to_string(),
        Value::Scalar(Scalar::Bool(b)) => b.to_string(),
        other => format!("{other:?}"),
    }
}

/// A failing field names itself; errors from deeper fields pass through.
fn read_field<T: Serialize + ?Sized>(inner: Capture, key: &str, value: &T) -> Result<Value> {
    value.serialize(inner).map_err(|e| match e {
        Error::Capture(message) => Error::PropertyRead { property: key.to_string(), message },
        other => other,
    })
}

struct StructCapture {
    inner: Capture,
    type_name: &'static str,
    fields: Vec<Field>,
}

impl StructCapture {
    fn new(outer: Capture, type_name: &'static str, len: usize) -> Result<Self> {
        Ok(StructCapture {
            inner: outer.nested()?,
            type_name,
            fields: Vec::with_capacity(len),
        })
    }

    fn read<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        let value = read_field(self.inner, key, value)?;
        self.fields.push(Field { name: key.to_string(), value });
        Ok(())
    }

    // `skip_serializing_if` hides the field; absent counts as null.
    fn absent(&mut self, key: &'static str) -> Result<()> {
        self.fields.push(Field { name: key.to_string(), value: Value::Null });
        Ok(())
    }

    fn finish(self) -> Value {
        Value::Composite { type_name: self.type_name.to_string(), fields: self.fields }
    }
}

impl ser::SerializeStruct for StructCapture {
    type Ok = Value;
    type Error = Error;
    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.read(key, value)
    }
    fn skip_field(&mut self, key: &'static str) -> Result<()> {
        self.absent(key)
    }
    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for StructCapture {
    type Ok = Value;
    type Error = Error;
    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.read(key, value)
    }
    fn skip_field(&mut self, key: &'static str) -> Result<()> {
        self.absent(key)
    }
    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;
    use std::collections::BTreeMap;

    const DEPTH: usize = 128;

    #[derive(Serialize)]
    struct Address {
        city: String,
        zip: Option<u32>,
    }

    #[derive(Serialize)]
    struct Person {
        name: String,
        address: Address,
        tags: Vec<String>,
        attrs: BTreeMap<String, String>,
        doc: JsonDocument,
    }

    #[derive(Serialize)]
    enum Shape {
        Dot,
        Circle { radius: f64 },
        Pair(i32, i32),
    }

    #[derive(Serialize)]
    struct UserId(u64);

    struct Exploding;

    impl Serialize for Exploding {
        fn serialize<S: ser::Serializer>(&self, _s: S) -> std::result::Result<S::Ok, S::Error> {
            Err(ser::Error::custom("boom"))
        }
    }

    #[derive(Serialize)]
    struct Outer {
        ok: u8,
        inner: Inner,
    }

    #[derive(Serialize)]
    struct Inner {
        broken: Exploding,
    }

    #[test]
    fn structs_become_composites_in_declaration_order() {
        let person = Person {
            name: "Ada".into(),
            address: Address { city: "X".into(), zip: None },
            tags: vec!["a".into()],
            attrs: BTreeMap::from([("k".into(), "v".into())]),
            doc: json!({"a": 1, "b": 2}).into(),
        };
        let Value::Composite { type_name, fields } = capture(&person, DEPTH).unwrap() else {
            panic!("expected composite");
        };
        assert_eq!(type_name, "Person");
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["name", "address", "tags", "attrs", "doc"]);
        assert_eq!(fields[0].value, Value::String("Ada".into()));
        assert_eq!(fields[2].value, Value::Container(vec![Value::String("a".into())]));
        assert_eq!(fields[3].value, Value::Mapping { len: 1 });
        assert_eq!(fields[4].value, Value::StructuredNode { len: 2 });
        let Value::Composite { type_name, fields } = &fields[1].value else {
            panic!("expected nested composite");
        };
        assert_eq!(type_name, "Address");
        assert_eq!(fields[1].value, Value::Null);
    }

    #[test]
    fn enums_and_newtypes() {
        assert_eq!(capture(&Shape::Dot, DEPTH).unwrap(), Value::Scalar(Scalar::Unit("Dot")));
        assert_eq!(
            capture(&Shape::Pair(1, 2), DEPTH).unwrap(),
            Value::Container(vec![Value::Scalar(Scalar::Int(1)), Value::Scalar(Scalar::Int(2))])
        );
        let circle = capture(&Shape::Circle { radius: 1.5 }, DEPTH).unwrap();
        assert_eq!(circle.type_name(), Some("Shape"));
        assert_eq!(capture(&UserId(7), DEPTH).unwrap(), Value::Scalar(Scalar::UInt(7)));
        assert_eq!(capture(&Some(()), DEPTH).unwrap(), Value::Null);
    }

    #[test]
    fn scalar_json_document_has_no_entries() {
        let doc = JsonDocument(json!("text"));
        assert_eq!(capture(&doc, DEPTH).unwrap(), Value::StructuredNode { len: 0 });
    }

    #[test]
    fn json_document_serializes_transparently_elsewhere() {
        let doc = JsonDocument(json!({"a": [1]}));
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({"a": [1]}));
        let back: JsonDocument = serde_json::from_str(r#"{"a":[1]}"#).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn failing_field_is_named_in_the_error() {
        let outer = Outer { ok: 1, inner: Inner { broken: Exploding } };
        match capture(&outer, DEPTH) {
            Err(Error::PropertyRead { property, message }) => {
                assert_eq!(property, "broken");
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[derive(Serialize)]
    struct Meta {
        etag: String,
    }

    #[derive(Serialize)]
    struct Flattened {
        name: String,
        #[serde(flatten)]
        meta: Meta,
    }

    #[derive(Serialize)]
    struct Sparse {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<u32>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
        label: String,
    }

    #[test]
    fn flattened_struct_becomes_a_record() {
        let value = Flattened { name: "n".into(), meta: Meta { etag: "e".into() } };
        assert_eq!(
            capture(&value, DEPTH).unwrap(),
            Value::Composite {
                type_name: FLATTENED_RECORD_TYPE.into(),
                fields: vec![
                    Field { name: "name".into(), value: Value::String("n".into()) },
                    Field { name: "etag".into(), value: Value::String("e".into()) },
                ],
            }
        );
    }

    #[test]
    fn flattened_field_errors_name_the_entry() {
        #[derive(Serialize)]
        struct WithBroken {
            ok: u8,
            #[serde(flatten)]
            inner: Inner,
        }
        let value = WithBroken { ok: 1, inner: Inner { broken: Exploding } };
        assert!(matches!(
            capture(&value, DEPTH),
            Err(Error::PropertyRead { ref property, .. }) if property == "broken"
        ));
    }

    #[test]
    fn known_length_maps_stay_opaque() {
        let map = BTreeMap::from([("k".to_string(), "".to_string())]);
        assert_eq!(capture(&map, DEPTH).unwrap(), Value::Mapping { len: 1 });
    }

    #[test]
    fn skipped_fields_are_captured_as_null() {
        let value = Sparse { id: None, tags: vec![], label: "l".into() };
        let Value::Composite { fields, .. } = capture(&value, DEPTH).unwrap() else {
            panic!("expected composite");
        };
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "tags", "label"]);
        assert_eq!(fields[0].value, Value::Null);
        assert_eq!(fields[1].value, Value::Null);
    }

    #[test]
    fn failing_root_is_a_capture_error() {
        assert!(matches!(capture(&Exploding, DEPTH), Err(Error::Capture(_))));
    }

    #[test]
    fn nesting_beyond_the_limit_fails_fast() {
        let nested = vec![vec![vec![1u8]]];
        assert!(capture(&nested, 3).is_ok());
        assert!(matches!(
            capture(&nested, 2),
            Err(Error::DepthLimitExceeded { limit: 2 })
        ));
    }
}
