//! Recursive emptiness check over a captured value graph.
//!
//! Every field reachable from the root is tested with [`emptiness`]; composites
//! are descended into unless their type is in the stop set, containers are
//! always expanded element by element. Violations are accumulated bottom-up:
//! a node's descendants are reported before its own direct children.
use serde::Serialize;
use tracing::{debug, trace};

use crate::assert::{Matcher, SelfDescribing};
use crate::capture::capture;
use crate::classify::{emptiness, is_base_type, is_container, EmptyKind};
use crate::config::MatcherConfig;
use crate::error::Result;
use crate::property::PropertyNode;
use crate::value::Value;

pub const EMPTY_FIELD_ERROR: &str = "Empty field found: ";
pub const FIELD_DELIMITER: &str = ",";
pub const TEST_DESCRIPTION: &str = "All fields of all included objects need to be non empty";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub kind: EmptyKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub violations: Vec<Violation>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.path.as_str())
    }

    /// `Empty field found: .name,.tags`
    pub fn describe(&self) -> String {
        let joined = self.paths().collect::<Vec<_>>().join(FIELD_DELIMITER);
        format!("{EMPTY_FIELD_ERROR}{joined}")
    }
}

/// Capture `value` through serde and check it.
pub fn check<T: Serialize + ?Sized>(value: &T, config: &MatcherConfig) -> Result<Report> {
    let captured = capture(value, config.max_depth())?;
    Ok(check_value(&captured, config))
}

/// Check an already captured value. The root itself is never reported.
pub fn check_value(value: &Value, config: &MatcherConfig) -> Report {
    let mut violations = Vec::new();
    walk(&PropertyNode::root(value), config, &mut violations);
    Report { violations }
}

fn walk(node: &PropertyNode<'_>, config: &MatcherConfig, out: &mut Vec<Violation>) {
    let children = node.children(config);
    for child in &children {
        if should_descend(child.value(), config) {
            trace!(path = child.path(), "descending");
            walk(child, config, out);
        }
    }
    for child in children {
        if let Some(kind) = emptiness(child.value()) {
            debug!(path = child.path(), ?kind, "empty value");
            out.push(Violation { path: child.path().to_string(), kind });
        }
    }
}

// Containers are expanded regardless of the stop set; the stop set is tested
// again on each element.
fn should_descend(value: &Value, config: &MatcherConfig) -> bool {
    if is_container(value) {
        return true;
    }
    !is_base_type(value) && !value.type_name().is_some_and(|t| config.stops_at(t))
}

// ————————————————————————————————————————————————————————————————————————————
// MATCHER
// ————————————————————————————————————————————————————————————————————————————

/// Matcher asserting that no reachable field is null, blank, or empty.
#[derive(Debug, Clone, Default)]
pub struct DoesNotHaveEmptyValues {
    config: MatcherConfig,
    last: Report,
}

impl DoesNotHaveEmptyValues {
    pub fn new(config: MatcherConfig) -> Self {
        DoesNotHaveEmptyValues { config, last: Report::default() }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Violations recorded by the most recent `matches` call.
    pub fn report(&self) -> &Report {
        &self.last
    }
}

impl<T: Serialize + ?Sized> Matcher<T> for DoesNotHaveEmptyValues {
    fn matches(&mut self, actual: &T) -> Result<bool> {
        self.last = Report::default();
        self.last = check(actual, &self.config)?;
        Ok(self.last.is_clean())
    }
}

impl SelfDescribing for DoesNotHaveEmptyValues {
    fn describe_expectation(&self) -> String {
        TEST_DESCRIPTION.to_string()
    }

    fn describe_mismatch(&self) -> String {
        self.last.describe()
    }
}

pub fn does_not_have_empty_values() -> DoesNotHaveEmptyValues {
    DoesNotHaveEmptyValues::new(MatcherConfig::new())
}

/// Fields of these types are checked for presence but not walked into.
pub fn does_not_have_empty_values_ignoring_types<I>(types: I) -> DoesNotHaveEmptyValues
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    DoesNotHaveEmptyValues::new(MatcherConfig::new().with_stop_types(types))
}

/// These paths are neither checked nor walked into.
pub fn does_not_have_empty_values_ignoring_fields<I>(paths: I) -> DoesNotHaveEmptyValues
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    DoesNotHaveEmptyValues::new(MatcherConfig::new().with_ignored_paths(paths))
}
