//! This module provides an in-memory virtual filesystem (VFS) built as a tree of directory and
//! file nodes.

use tracing::debug;

use crate::core::path::validate_name;
use crate::core::{FsBackend, FsError, Mapping, Result, Violation};
use crate::vfs::navigate::{Located, locate, resolve_directory};
use crate::vfs::node::{Arena, Node, NodeId};
use crate::vfs::search::{Kmp, search_flat, search_recursive};
use crate::vfs::snapshot;

/// A virtual file system (VFS) implementation that keeps a tree of directories and files in
/// memory.
///
/// `TreeFS` offers a shell-like interface (`cd`, `ls`, `mkdir`, `cp`, `mv`, ...) over a tree that
/// never touches the host filesystem.
///
/// ### Internal state
///
/// * `arena`: Storage for every node. Directories own their children through a name→handle
///   map; each node also records its parent handle, used only to walk upwards.
///
/// * `cwd`: Handle of the current working directory.
///   - Determines how relative paths and bare names are resolved.
///   - Default value: the root directory.
///   - Changed via `cd()`.
///
/// ### Invariants
///
/// 1. **Root**: exactly one root directory exists; it has no parent, its name is empty and it can
///    be neither removed, copied nor moved.
/// 2. **Unique names**: the children of one directory have distinct names, whatever their kind.
/// 3. **Acyclic**: a directory is never placed inside its own subtree.
/// 4. **Valid cwd**: `cwd` always refers to a live directory reachable from the root.
///
/// ### Failures
///
/// Every operation validates before it mutates: an `Err` leaves the tree exactly as it was.
///
/// ### Thread Safety
///
/// This struct is **not thread‑safe by default**. If concurrent access is required, wrap it in
/// a synchronization primitive (e.g., `Arc<Mutex<TreeFS>>`) and hold the lock for the whole call.
///
/// ### Example
///
/// ```
/// use vfs_tree::{FsBackend, TreeFS};
///
/// let mut fs = TreeFS::new();
///
/// fs.mkdir("docs").unwrap();
/// fs.cd("docs").unwrap();
/// fs.write("note.txt", "Hello", false).unwrap();
///
/// assert_eq!(fs.read("note.txt").unwrap(), "Hello\n");
/// assert_eq!(fs.pwd(), "/docs");
/// ```
#[derive(Debug, Clone)]
pub struct TreeFS {
    arena: Arena,
    cwd: NodeId,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Transfer {
    Copy,
    Move,
}

impl Default for TreeFS {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeFS {
    /// Creates new TreeFS instance holding only the root directory, which is also the cwd.
    pub fn new() -> Self {
        let arena = Arena::new();
        let cwd = arena.root();
        Self { arena, cwd }
    }

    /// Removes the empty directory `name` from the cwd.
    pub fn rmdir_empty(&mut self, name: &str) -> Result<()> {
        let dir = self.child_dir(name)?;
        if self.arena.get(dir).children().is_some_and(|c| !c.is_empty()) {
            return Err(FsError::DirectoryNotEmpty(name.to_string()));
        }
        self.arena.remove(dir);
        debug!(name, "removed empty directory");
        Ok(())
    }

    /// Removes the directory `name` from the cwd together with everything inside it.
    pub fn rmdir_recursive(&mut self, name: &str) -> Result<()> {
        let dir = self.child_dir(name)?;
        self.arena.remove(dir);
        debug!(name, "removed directory tree");
        Ok(())
    }

    fn child_dir(&self, name: &str) -> Result<NodeId> {
        match self.arena.child(self.cwd, name) {
            Some(id) if self.arena.get(id).is_dir() => Ok(id),
            Some(_) => Err(FsError::not_a_directory(name)),
            None => Err(FsError::dir_not_found(name)),
        }
    }

    fn child_file(&self, name: &str) -> Result<NodeId> {
        match self.arena.child(self.cwd, name) {
            Some(id) if self.arena.get(id).is_file() => Ok(id),
            Some(_) => Err(FsError::not_a_file(name)),
            None => Err(FsError::file_not_found(name)),
        }
    }

    /// Node behind `src`, checked against the `recursive` flag: recursion is required for
    /// directories and forbidden for files.
    fn transfer_source(&self, src: &str, recursive: bool) -> Result<NodeId> {
        match locate(&self.arena, src, self.cwd)? {
            Located::File { .. } if recursive => Err(Violation::RecursiveFile.into()),
            Located::Directory(_) if !recursive => Err(Violation::NonRecursiveDirectory.into()),
            Located::File { parent, name } => self
                .arena
                .child(parent, &name)
                .ok_or_else(|| FsError::file_not_found(name)),
            Located::Directory(dir) => Ok(dir),
        }
    }

    /// Structural checks for placing directory `src` inside directory `dst`.
    fn check_directory_transfer(&self, src: NodeId, dst: NodeId) -> Result<()> {
        if src == dst {
            return Err(Violation::CopyIntoSelf.into());
        }
        if src == self.arena.root() {
            return Err(Violation::RootProtected.into());
        }
        if self.arena.is_within(dst, src) {
            return Err(Violation::IntoOwnSubtree.into());
        }
        if self.arena.child(dst, self.arena.get(src).name()).is_some() {
            return Err(Violation::DestinationOccupied.into());
        }
        Ok(())
    }

    fn transfer(&mut self, src: &str, dst: &str, recursive: bool, mode: Transfer) -> Result<()> {
        let source = self.transfer_source(src, recursive)?;
        let target = resolve_directory(&self.arena, dst, self.cwd)?;

        if self.arena.get(source).is_dir() {
            self.check_directory_transfer(source, target)?;
        }

        match mode {
            Transfer::Copy => {
                self.arena.deep_copy(source, target)?;
            }
            Transfer::Move => self.arena.reparent(source, target)?,
        }

        debug!(src, dst, ?mode, "transferred");
        Ok(())
    }
}

impl FsBackend for TreeFS {
    /// Returns the absolute path of the current working directory.
    fn pwd(&self) -> String {
        self.arena.full_path(self.cwd)
    }

    fn cwd_name(&self) -> &str {
        self.arena.get(self.cwd).name()
    }

    /// Changes the current working directory.
    /// * `path` can be in relative or absolute form, but in both cases it must be an existing
    ///   directory. On error the cwd is left unchanged.
    fn cd(&mut self, path: &str) -> Result<()> {
        self.cwd = resolve_directory(&self.arena, path, self.cwd)?;
        debug!(cwd = %self.pwd(), "changed directory");
        Ok(())
    }

    /// Returns the names of the immediate children of a directory, sorted.
    ///
    /// # Arguments
    /// * `path` - directory to list; `None` lists the cwd.
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - names of files and directories one level below `path`.
    /// * `Err(FsError)` - `DirectoryNotFound` / `NotADirectory` from path resolution.
    fn ls(&self, path: Option<&str>) -> Result<Vec<String>> {
        let dir = match path {
            Some(path) => resolve_directory(&self.arena, path, self.cwd)?,
            None => self.cwd,
        };
        Ok(self
            .arena
            .get(dir)
            .children()
            .map(|children| children.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn exists(&self, path: &str) -> bool {
        locate(&self.arena, path, self.cwd).is_ok()
    }

    fn is_dir(&self, path: &str) -> Result<bool> {
        Ok(matches!(
            locate(&self.arena, path, self.cwd)?,
            Located::Directory(_)
        ))
    }

    fn is_file(&self, path: &str) -> Result<bool> {
        Ok(matches!(
            locate(&self.arena, path, self.cwd)?,
            Located::File { .. }
        ))
    }

    /// Returns the size of the node at `path`.
    ///
    /// A directory's size is the number of all its descendants (not only direct children);
    /// a file's size is the length of its content in bytes.
    fn size(&self, path: &str) -> Result<usize> {
        let id = match locate(&self.arena, path, self.cwd)? {
            Located::Directory(dir) => dir,
            Located::File { parent, name } => self
                .arena
                .child(parent, &name)
                .ok_or_else(|| FsError::file_not_found(name))?,
        };
        Ok(self.arena.size(id))
    }

    /// Creates a new empty directory in the cwd.
    ///
    /// # Errors
    /// * `InvalidName` - `name` is empty, starts with `.` or contains `/`.
    /// * `DirectoryAlreadyExists` - the cwd already has a child (of any kind) called `name`.
    fn mkdir(&mut self, name: &str) -> Result<()> {
        validate_name(name)?;
        if self.arena.child(self.cwd, name).is_some() {
            return Err(FsError::DirectoryAlreadyExists(name.to_string()));
        }
        self.arena.insert(self.cwd, Node::directory(name))?;
        debug!(name, "created directory");
        Ok(())
    }

    fn rmdir(&mut self, name: &str, recursive: bool) -> Result<()> {
        if recursive {
            self.rmdir_recursive(name)
        } else {
            self.rmdir_empty(name)
        }
    }

    fn rm(&mut self, name: &str) -> Result<()> {
        let file = self.child_file(name)?;
        self.arena.remove(file);
        debug!(name, "removed file");
        Ok(())
    }

    /// Creates every missing file among `names` in the cwd.
    ///
    /// Existing files are kept as they are. All names are checked first: if any of them is
    /// invalid (`InvalidName`) or belongs to a directory (`NameConflict`), nothing is created.
    fn touch<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = names.into_iter().collect();
        for name in &names {
            let name = name.as_ref();
            match self.arena.child(self.cwd, name) {
                Some(id) if self.arena.get(id).is_dir() => {
                    return Err(FsError::NameConflict(name.to_string()));
                }
                Some(_) => {}
                None => validate_name(name)?,
            }
        }

        for name in &names {
            let name = name.as_ref();
            if self.arena.child(self.cwd, name).is_none() {
                self.arena.insert(self.cwd, Node::file(name, ""))?;
                debug!(name, "created file");
            }
        }
        Ok(())
    }

    /// Writes `text` followed by a newline to file `name` in the cwd.
    ///
    /// # Behavior
    /// - **Creates** the file when it is missing (same rules as `touch`).
    /// - **Overwrites** the content when `append` is false, otherwise **appends** to it.
    ///
    /// # Errors
    /// * `NotAFile` - `name` is a directory.
    /// * `InvalidName` - the file has to be created and `name` is not a valid name.
    fn write(&mut self, name: &str, text: &str, append: bool) -> Result<()> {
        let file = match self.arena.child(self.cwd, name) {
            Some(id) if self.arena.get(id).is_dir() => return Err(FsError::not_a_file(name)),
            Some(id) => id,
            None => {
                validate_name(name)?;
                self.arena.insert(self.cwd, Node::file(name, ""))?
            }
        };

        let line = format!("{text}\n");
        self.arena.write_content(file, &line, append);
        debug!(name, append, bytes = line.len(), "wrote file");
        Ok(())
    }

    /// Returns the content of file `name` in the cwd.
    fn read(&self, name: &str) -> Result<String> {
        let file = self.child_file(name)?;
        Ok(self.arena.get(file).content().unwrap_or_default().to_string())
    }

    /// Searches files under the directory `path` for `pattern` (exact substring).
    ///
    /// # Returns
    /// * Non-recursive: names of matching files directly inside `path`.
    /// * Recursive: `/`-joined paths, starting with the name of `path` itself, of every matching
    ///   file in the subtree.
    /// * `None` when nothing matches. An empty `pattern` matches every file.
    fn search(&self, path: &str, pattern: &str, recursive: bool) -> Result<Option<Vec<String>>> {
        let dir = resolve_directory(&self.arena, path, self.cwd)?;
        let matcher = Kmp::new(pattern);
        let found = if recursive {
            search_recursive(&self.arena, dir, &matcher)
        } else {
            search_flat(&self.arena, dir, &matcher)
        };
        Ok((!found.is_empty()).then_some(found))
    }

    /// Copies the file or directory at `src` into the existing directory `dst`.
    ///
    /// # Arguments
    /// * `recursive` - must be `true` for a directory and `false` for a file.
    ///
    /// # Errors
    /// * `NotFound` / `DirectoryNotFound` / `NotADirectory` - path resolution failed.
    /// * `InvalidOperation` - wrong `recursive` flag, copying a directory into itself or its own
    ///   subtree, copying the root, or `dst` already has an entry with the same name.
    ///
    /// # Notes
    /// The copy is deep: later changes to either side do not affect the other.
    fn cp(&mut self, src: &str, dst: &str, recursive: bool) -> Result<()> {
        self.transfer(src, dst, recursive, Transfer::Copy)
    }

    /// Moves the file or directory at `src` into the existing directory `dst`.
    ///
    /// Same rules and errors as `cp()`, but the node itself is relinked: its contents and
    /// identity are preserved and nothing is duplicated.
    fn mv(&mut self, src: &str, dst: &str, recursive: bool) -> Result<()> {
        self.transfer(src, dst, recursive, Transfer::Move)
    }

    fn to_mapping(&self, path: &str) -> Result<Mapping> {
        let dir = resolve_directory(&self.arena, path, self.cwd)?;
        Ok(snapshot::to_mapping(&self.arena, dir))
    }
}
