use serde::de::DeserializeOwned;

use crate::config::Rules;
use crate::error::{Error, Result};

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| Error::InvalidRules {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

pub fn rules_from_str(src: &str) -> Result<Rules> {
    from_str_with_path(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_the_offending_location() {
        let err = rules_from_str(r#"{"ignored_paths": [".a", 3]}"#).unwrap_err();
        match err {
            Error::InvalidRules { path, .. } => assert_eq!(path, "ignored_paths[1]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parses_valid_rules() {
        let rules = rules_from_str(r#"{"stop_recursion_types": ["Money"]}"#).unwrap();
        assert_eq!(rules.stop_recursion_types, ["Money"]);
        assert!(rules.ignored_paths.is_empty());
    }
}
