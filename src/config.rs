use std::collections::BTreeSet;

use serde::Deserialize;

use crate::path::normalize_path;

/// Types whose internals carry no meaningful field structure. Their presence
/// is checked, their fields are not.
///
/// Matching is on the bare serde type name, so any struct of your own called
/// `Duration`, `Uri`, `Url` or `SystemTime` is also never walked. Start from
/// [`MatcherConfig::without_default_stop_types`] (or set
/// `skip_default_stop_types` in a rules file) to walk such types.
pub const DEFAULT_STOP_RECURSION_TYPES: &[&str] = &["Url", "Uri", "Duration", "SystemTime"];

pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Immutable per-matcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherConfig {
    stop_recursion_types: BTreeSet<String>,
    ignored_paths: BTreeSet<String>,
    max_depth: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            stop_recursion_types: DEFAULT_STOP_RECURSION_TYPES.iter().map(|s| s.to_string()).collect(),
            ignored_paths: BTreeSet::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl MatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the built-in stop set, so same-named types of your own are walked.
    pub fn without_default_stop_types(mut self) -> Self {
        for name in DEFAULT_STOP_RECURSION_TYPES {
            self.stop_recursion_types.remove(*name);
        }
        self
    }

    /// Adds to the current stop set.
    pub fn with_stop_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.stop_recursion_types.extend(types.into_iter().map(|t| t.as_ref().to_string()));
        self
    }

    pub fn with_ignored_paths<I>(mut self, paths: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.ignored_paths.extend(paths.into_iter().map(|p| normalize_path(p.as_ref())));
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn stops_at(&self, type_name: &str) -> bool {
        self.stop_recursion_types.contains(type_name)
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignored_paths.contains(path)
    }

    pub fn stop_recursion_types(&self) -> &BTreeSet<String> {
        &self.stop_recursion_types
    }

    pub fn ignored_paths(&self) -> &BTreeSet<String> {
        &self.ignored_paths
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// On-disk rules, merged over the defaults.
///
/// ```json
/// { "stop_recursion_types": ["Money"], "ignored_paths": [".meta.etag"], "max_depth": 64 }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    pub skip_default_stop_types: bool,
    pub stop_recursion_types: Vec<String>,
    pub ignored_paths: Vec<String>,
    pub max_depth: Option<usize>,
}

impl Rules {
    pub fn apply(&self, mut config: MatcherConfig) -> MatcherConfig {
        if self.skip_default_stop_types {
            config = config.without_default_stop_types();
        }
        let config = config
            .with_stop_types(&self.stop_recursion_types)
            .with_ignored_paths(&self.ignored_paths);
        match self.max_depth {
            Some(depth) => config.with_max_depth(depth),
            None => config,
        }
    }
}
