// Single-level variant: only the root's own fields are checked, nothing is
// walked into. Embedded JSON documents are not inspected here, and read
// failures carry the single-level prefix (`Error::FieldRead`).
use serde::Serialize;

use crate::assert::{Matcher, SelfDescribing};
use crate::capture::capture;
use crate::classify::{emptiness, EmptyKind};
use crate::config::{MatcherConfig, DEFAULT_MAX_DEPTH};
use crate::error::{Error, Result};
use crate::property::PropertyNode;
use crate::value::Value;

pub const FLAT_FIELD_DELIMITER: &str = ",";
pub const FLAT_MISMATCH_PREAMBLE: &str = "The following fields were found empty:";
pub const FLAT_DESCRIPTION: &str = "All fields to be non empty";

#[derive(Debug, Clone, Default)]
pub struct DoesNotHaveNullOrEmptyFields {
    empty_fields: Vec<String>,
}

impl DoesNotHaveNullOrEmptyFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty_fields(&self) -> &[String] {
        &self.empty_fields
    }
}

/// Names (not paths) of the root's empty fields. Container roots report
/// their empty elements by index.
pub fn empty_top_level_fields(value: &Value) -> Vec<String> {
    let config = MatcherConfig::new();
    PropertyNode::root(value)
        .children(&config)
        .into_iter()
        .filter(|child| is_flat_empty(child.value()))
        .map(|child| match child.name() {
            Some(name) => name.to_string(),
            None => child.path().to_string(),
        })
        .collect()
}

// Null, blank strings, empty collections and maps.
fn is_flat_empty(value: &Value) -> bool {
    !matches!(emptiness(value), None | Some(EmptyKind::EmptyDocument))
}

impl<T: Serialize + ?Sized> Matcher<T> for DoesNotHaveNullOrEmptyFields {
    fn matches(&mut self, actual: &T) -> Result<bool> {
        self.empty_fields.clear();
        let captured = capture(actual, DEFAULT_MAX_DEPTH).map_err(|e| match e {
            Error::PropertyRead { property, message } => Error::FieldRead { property, message },
            other => other,
        })?;
        self.empty_fields = empty_top_level_fields(&captured);
        Ok(self.empty_fields.is_empty())
    }
}

impl SelfDescribing for DoesNotHaveNullOrEmptyFields {
    fn describe_expectation(&self) -> String {
        FLAT_DESCRIPTION.to_string()
    }

    fn describe_mismatch(&self) -> String {
        format!("{FLAT_MISMATCH_PREAMBLE}{}", self.empty_fields.join(FLAT_FIELD_DELIMITER))
    }
}

pub fn does_not_have_null_or_empty_fields() -> DoesNotHaveNullOrEmptyFields {
    DoesNotHaveNullOrEmptyFields::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::JsonDocument;
    use crate::error::PROPERTY_READ_ERROR;
    use serde_json::json;
    use std::collections::HashMap;

    struct Failing;

    impl Serialize for Failing {
        fn serialize<S: serde::Serializer>(&self, _s: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("no value"))
        }
    }

    #[derive(Serialize)]
    struct WithFailing {
        name: String,
        broken: Failing,
    }

    #[derive(Serialize)]
    struct WithDocument {
        name: String,
        document: JsonDocument,
    }

    #[derive(Serialize)]
    struct Nested {
        inner: String,
    }

    #[derive(Serialize)]
    struct TestClass {
        boxed_field: Option<i32>,
        string_field: Option<String>,
        collection_field: Option<Vec<String>>,
        map_field: HashMap<String, String>,
        class_object: Option<Nested>,
    }

    fn populated() -> TestClass {
        TestClass {
            boxed_field: Some(5),
            string_field: Some("someStringValue".into()),
            collection_field: Some(vec!["someStringValue".into()]),
            map_field: HashMap::from([("k".into(), "v".into())]),
            class_object: Some(Nested { inner: "".into() }),
        }
    }

    #[test]
    fn populated_fields_match_without_descending() {
        let mut matcher = does_not_have_null_or_empty_fields();
        assert!(matcher.matches(&populated()).unwrap());
    }

    #[test]
    fn null_and_empty_fields_are_named() {
        let mut value = populated();
        value.boxed_field = None;
        value.string_field = Some("  ".into());
        value.collection_field = Some(vec![]);
        value.map_field.clear();
        value.class_object = None;
        let mut matcher = does_not_have_null_or_empty_fields();
        assert!(!matcher.matches(&value).unwrap());
        assert_eq!(
            matcher.describe_mismatch(),
            "The following fields were found empty:\
             boxed_field,string_field,collection_field,map_field,class_object"
        );
        assert_eq!(matcher.describe_expectation(), FLAT_DESCRIPTION);
    }

    #[test]
    fn previous_results_do_not_leak() {
        let mut value = populated();
        value.string_field = None;
        let mut matcher = does_not_have_null_or_empty_fields();
        assert!(!matcher.matches(&value).unwrap());
        assert!(matcher.matches(&populated()).unwrap());
        assert!(matcher.empty_fields().is_empty());
    }

    #[test]
    fn empty_json_document_is_not_inspected() {
        let value = WithDocument { name: "n".into(), document: JsonDocument(json!({})) };
        let mut matcher = does_not_have_null_or_empty_fields();
        assert!(matcher.matches(&value).unwrap());
    }

    #[test]
    fn read_failure_uses_the_property_prefix() {
        let value = WithFailing { name: "n".into(), broken: Failing };
        let mut matcher = does_not_have_null_or_empty_fields();
        let err = matcher.matches(&value).unwrap_err();
        assert!(matches!(err, Error::FieldRead { ref property, .. } if property == "broken"));
        assert!(err.to_string().starts_with(PROPERTY_READ_ERROR));
    }
}
