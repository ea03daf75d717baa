//! Recursive "nothing is empty" checks for arbitrary serde values.
//!
//! A value is captured through its `Serialize` impl into a closed value model,
//! then every reachable field is tested for null, blank strings and empty
//! collections. Violations are reported by path (`.name`, `.address.city`,
//! `.tags[0]`).
//!
//! ```
//! use blankscan::{check, MatcherConfig};
//!
//! #[derive(serde::Serialize)]
//! struct Profile { name: String, tags: Vec<String> }
//!
//! let report = check(&Profile { name: "".into(), tags: vec![] }, &MatcherConfig::new()).unwrap();
//! assert_eq!(report.describe(), "Empty field found: .name,.tags");
//! ```
pub mod assert;
pub mod capture;
pub mod classify;
pub mod config;
pub mod error;
pub mod flat;
pub mod matcher;
pub mod path;
pub mod path_de;
pub mod property;
pub mod value;

pub use assert::{assert_that, Matcher, SelfDescribing};
pub use capture::JsonDocument;
pub use classify::EmptyKind;
pub use config::{MatcherConfig, Rules};
pub use error::{Error, Result};
pub use flat::{does_not_have_null_or_empty_fields, DoesNotHaveNullOrEmptyFields};
pub use matcher::{
    check, check_value, does_not_have_empty_values, does_not_have_empty_values_ignoring_fields,
    does_not_have_empty_values_ignoring_types, DoesNotHaveEmptyValues, Report, Violation,
};
pub use value::Value;
