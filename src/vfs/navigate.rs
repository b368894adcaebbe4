//! Walking the tree along a path.

use tracing::trace;

use crate::core::path::{self, Anchor, PathPrefix};
use crate::core::{FsError, Result};
use crate::vfs::node::{Arena, NodeId};

/// What a path points at when it may name either kind of node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// A file, identified by its directory and its name there.
    File { parent: NodeId, name: String },
    Directory(NodeId),
}

/// Resolves `path` to a directory, starting at `start` for relative paths.
///
/// Fails with `DirectoryNotFound` when a segment is absent and with
/// `NotADirectory` when a segment names a file.
pub fn resolve_directory(arena: &Arena, path: &str, start: NodeId) -> Result<NodeId> {
    let prefix = path::resolve(path)?;
    let mut node = anchor_node(arena, &prefix, start);

    for segment in prefix.segments() {
        node = match step(arena, node, segment) {
            Some(child) if arena.get(child).is_dir() => child,
            Some(_) => return Err(FsError::not_a_directory(segment)),
            None => return Err(FsError::dir_not_found(segment)),
        };
    }

    trace!(path, dir = %arena.full_path(node), "resolved directory");
    Ok(node)
}

/// Resolves `path` to either a file or a directory.
///
/// Only the last segment may name a file. A missing last segment is reported
/// as `NotFound`, a missing intermediate one as `DirectoryNotFound`.
pub fn locate(arena: &Arena, path: &str, start: NodeId) -> Result<Located> {
    let prefix = path::resolve(path)?;
    let mut node = anchor_node(arena, &prefix, start);

    let segments = prefix.segments();
    let last = segments.len().saturating_sub(1);
    for (i, segment) in segments.iter().copied().enumerate() {
        match step(arena, node, segment) {
            Some(child) if arena.get(child).is_dir() => node = child,
            Some(_) if i == last => {
                trace!(path, "located file");
                return Ok(Located::File {
                    parent: node,
                    name: segment.to_string(),
                });
            }
            Some(_) => return Err(FsError::not_a_directory(segment)),
            None if i == last => return Err(FsError::NotFound(path.to_string())),
            None => return Err(FsError::dir_not_found(segment)),
        }
    }

    trace!(path, "located directory");
    Ok(Located::Directory(node))
}

/// Node a path starts from: root or `start`, lifted by the leading `..` hops.
/// Climbing stops at the root.
fn anchor_node(arena: &Arena, prefix: &PathPrefix<'_>, start: NodeId) -> NodeId {
    let mut node = match prefix.anchor {
        Anchor::Root => arena.root(),
        Anchor::Current => start,
    };
    for _ in 0..prefix.ups {
        match arena.get(node).parent() {
            Some(parent) => node = parent,
            None => break,
        }
    }
    node
}

/// One segment down (or up, for `..`) from directory `node`.
fn step(arena: &Arena, node: NodeId, segment: &str) -> Option<NodeId> {
    match segment {
        "." => Some(node),
        ".." => Some(arena.get(node).parent().unwrap_or(node)),
        name => arena.child(node, name),
    }
}
