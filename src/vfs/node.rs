//! Node model: directories and files stored in an index-addressed arena.
//!
//! Ownership runs strictly parent to child through each directory's child map.
//! The `parent` index is only an observation used to walk upwards (full paths,
//! `..`); it never keeps a node alive.

use std::collections::BTreeMap;

use crate::core::{FsError, Result, Violation};

/// Handle of a node inside an [`Arena`].
///
/// Handles are plain indices. Using a handle after its node was released is a
/// bug in the caller and panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Directory { children: BTreeMap<String, NodeId> },
    File { content: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl Node {
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            kind: NodeKind::Directory {
                children: BTreeMap::new(),
            },
        }
    }

    pub fn file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            kind: NodeKind::File {
                content: content.into(),
            },
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    pub fn children(&self) -> Option<&BTreeMap<String, NodeId>> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut BTreeMap<String, NodeId>> {
        match &mut self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }
}

/// Storage for every node of one tree.
///
/// Released slots are recycled by later allocations.
#[derive(Debug, Clone)]
pub struct Arena {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeId,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    /// Creates an arena holding only the root directory (named `""`).
    pub fn new() -> Self {
        Self {
            slots: vec![Some(Node::directory(""))],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> &Node {
        self.slots[id.0]
            .as_ref()
            .unwrap_or_else(|| panic!("stale node handle {}", id.0))
    }

    fn get_mut(&mut self, id: NodeId) -> &mut Node {
        self.slots[id.0]
            .as_mut()
            .unwrap_or_else(|| panic!("stale node handle {}", id.0))
    }

    /// Looks up the child `name` of directory `dir`.
    pub fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.get(dir).children()?.get(name).copied()
    }

    /// Stores `node` as a child of `parent`.
    ///
    /// Fails with `DestinationOccupied` if `parent` already has a child of
    /// that name; the arena is unchanged in that case.
    pub fn insert(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        self.ensure_vacant(parent, node.name())?;
        let id = self.alloc(node);
        self.link(parent, id);
        Ok(id)
    }

    /// Removes `id` and its whole subtree, releasing their slots.
    pub fn remove(&mut self, id: NodeId) {
        self.unlink(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.slots[current.0].take() {
                if let Some(children) = node.children() {
                    stack.extend(children.values().copied());
                }
                self.free.push(current.0);
            }
        }
    }

    /// Moves `id` (with its subtree, untouched) under directory `new_parent`.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> Result<()> {
        self.ensure_vacant(new_parent, self.get(id).name())?;
        self.unlink(id);
        self.link(new_parent, id);
        Ok(())
    }

    /// Duplicates the subtree at `src` under directory `dst`.
    /// Returns the handle of the new top node.
    pub fn deep_copy(&mut self, src: NodeId, dst: NodeId) -> Result<NodeId> {
        self.ensure_vacant(dst, self.get(src).name())?;

        let node = self.detached_clone(src);
        let top = self.alloc(node);
        self.link(dst, top);

        let mut pending = vec![(src, top)];
        while let Some((from, to)) = pending.pop() {
            let children: Vec<NodeId> = self
                .get(from)
                .children()
                .map(|c| c.values().copied().collect())
                .unwrap_or_default();
            for child in children {
                let node = self.detached_clone(child);
                let copy = self.alloc(node);
                self.link(to, copy);
                if self.get(child).is_dir() {
                    pending.push((child, copy));
                }
            }
        }

        Ok(top)
    }

    /// Replaces or extends the content of file `id`.
    pub fn write_content(&mut self, id: NodeId, text: &str, append: bool) {
        if let NodeKind::File { content } = &mut self.get_mut(id).kind {
            if !append {
                content.clear();
            }
            content.push_str(text);
        }
    }

    /// Descendant count for directories, content length for files.
    pub fn size(&self, id: NodeId) -> usize {
        if let Some(content) = self.get(id).content() {
            return content.len();
        }

        let mut count = 0;
        let mut pending = vec![id];
        while let Some(dir) = pending.pop() {
            let Some(children) = self.get(dir).children() else {
                continue;
            };
            for &child in children.values() {
                count += 1;
                if self.get(child).is_dir() {
                    pending.push(child);
                }
            }
        }
        count
    }

    /// `/`-joined names from the root down to `id`; the root is `/`.
    pub fn full_path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id);
            if node.parent().is_some() {
                segments.push(node.name());
            }
            current = node.parent();
        }
        segments.reverse();
        format!("/{}", segments.join("/"))
    }

    /// True when `node` is `ancestor` or lies anywhere below it.
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).parent();
        }
        false
    }

    fn ensure_vacant(&self, dir: NodeId, name: &str) -> Result<()> {
        match self.get(dir).children() {
            Some(children) if children.contains_key(name) => {
                Err(Violation::DestinationOccupied.into())
            }
            Some(_) => Ok(()),
            None => Err(FsError::not_a_directory(self.get(dir).name())),
        }
    }

    fn detached_clone(&self, id: NodeId) -> Node {
        let node = self.get(id);
        match node.kind() {
            NodeKind::Directory { .. } => Node::directory(node.name()),
            NodeKind::File { content } => Node::file(node.name(), content.as_str()),
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    fn link(&mut self, parent: NodeId, id: NodeId) {
        let name = self.get(id).name().to_string();
        if let Some(children) = self.get_mut(parent).children_mut() {
            children.insert(name, id);
        }
        self.get_mut(id).parent = Some(parent);
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.get(id).parent() else {
            return;
        };
        let name = self.get(id).name().to_string();
        if let Some(children) = self.get_mut(parent).children_mut() {
            children.remove(&name);
        }
        self.get_mut(id).parent = None;
    }
}
