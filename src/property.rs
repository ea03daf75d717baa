use crate::config::MatcherConfig;
use crate::path::{format_index_path, format_object_path, ROOT_PATH};
use crate::value::Value;

/// A borrowed value together with its position in the traversal.
#[derive(Debug, Clone)]
pub struct PropertyNode<'a> {
    name: Option<&'a str>,
    value: &'a Value,
    path: String,
}

impl<'a> PropertyNode<'a> {
    pub fn root(value: &'a Value) -> Self {
        PropertyNode { name: None, value, path: ROOT_PATH.to_string() }
    }

    fn field(parent: &str, name: &'a str, value: &'a Value) -> Self {
        PropertyNode { name: Some(name), value, path: format_object_path(parent, name) }
    }

    fn element(parent: &str, index: usize, value: &'a Value) -> Self {
        PropertyNode { name: None, value, path: format_index_path(parent, index) }
    }

    pub fn name(&self) -> Option<&'a str> {
        self.name
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Immediate children: fields of a composite, elements of a container.
    /// Ignored paths are dropped here, so the node itself is never filtered.
    pub fn children(&self, config: &MatcherConfig) -> Vec<PropertyNode<'a>> {
        let children: Vec<PropertyNode<'a>> = match self.value {
            Value::Composite { fields, .. } => fields
                .iter()
                .map(|f| PropertyNode::field(&self.path, &f.name, &f.value))
                .collect(),
            Value::Container(elems) => elems
                .iter()
                .enumerate()
                .map(|(i, v)| PropertyNode::element(&self.path, i, v))
                .collect(),
            _ => Vec::new(),
        };
        children.into_iter().filter(|c| !config.is_ignored(&c.path)).collect()
    }
}
