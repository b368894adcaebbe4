use std::collections::BTreeMap;
use std::mem;

use serde::{Deserialize, Serialize};

/// Nested mapping produced by serializing a directory: child name to value.
pub type Mapping = BTreeMap<String, NodeValue>;

/// Serialized form of a single node.
///
/// Files become their content string, directories become a nested mapping.
/// Serializes untagged, so a snapshot renders as plain JSON objects and strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeValue {
    Content(String),
    Directory(Mapping),
}

impl NodeValue {
    pub fn as_content(&self) -> Option<&str> {
        match self {
            NodeValue::Content(content) => Some(content),
            NodeValue::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&Mapping> {
        match self {
            NodeValue::Directory(mapping) => Some(mapping),
            NodeValue::Content(_) => None,
        }
    }
}

impl Drop for NodeValue {
    // Nested directories are released level by level, so depth is bounded by the heap only.
    fn drop(&mut self) {
        let NodeValue::Directory(children) = self else {
            return;
        };
        let mut pending = vec![mem::take(children)];
        while let Some(mut mapping) = pending.pop() {
            while let Some((_, mut value)) = mapping.pop_first() {
                if let NodeValue::Directory(inner) = &mut value {
                    pending.push(mem::take(inner));
                }
            }
        }
    }
}
