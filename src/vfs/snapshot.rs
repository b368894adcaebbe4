//! Conversion of a subtree into a nested [`Mapping`].

use std::collections::btree_map;

use crate::core::{Mapping, NodeValue};
use crate::vfs::node::{Arena, NodeId, NodeKind};

/// A directory whose mapping is still being filled.
struct Frame<'a> {
    name: &'a str,
    entries: btree_map::Iter<'a, String, NodeId>,
    mapping: Mapping,
}

/// Serializes the children of directory `dir`.
///
/// Each subdirectory becomes a nested mapping and each file its content string.
/// A subdirectory is attached to its parent once all of its own entries are in.
pub fn to_mapping(arena: &Arena, dir: NodeId) -> Mapping {
    let node = arena.get(dir);
    let Some(children) = node.children() else {
        return Mapping::new();
    };

    let mut frames = vec![Frame {
        name: node.name(),
        entries: children.iter(),
        mapping: Mapping::new(),
    }];
    while let Some(frame) = frames.last_mut() {
        if let Some((name, &child)) = frame.entries.next() {
            match arena.get(child).kind() {
                NodeKind::File { content } => {
                    frame
                        .mapping
                        .insert(name.clone(), NodeValue::Content(content.clone()));
                }
                NodeKind::Directory { children } => frames.push(Frame {
                    name: name.as_str(),
                    entries: children.iter(),
                    mapping: Mapping::new(),
                }),
            }
            continue;
        }

        let Some(done) = frames.pop() else { break };
        match frames.last_mut() {
            Some(parent) => {
                parent
                    .mapping
                    .insert(done.name.to_string(), NodeValue::Directory(done.mapping));
            }
            None => return done.mapping,
        }
    }
    Mapping::new()
}
