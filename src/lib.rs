//! An in-memory hierarchical virtual file system (VFS) for Rust.
//! Keeps a tree of directories and files entirely in memory and manipulates it through
//! shell-like, path-based operations. Ideal for shells, test harnesses and sandboxes that need
//! file-system behaviour without touching the disk.
//!
//! ### Overview
//!
//! `vfs-tree` defines the `FsBackend` trait (the surface a host layer talks to) and provides
//! `TreeFS`, an arena-backed tree implementing it. A small interactive shell is included in the
//! `shell` module and the `vfs-shell` binary.
//!
//! **Key ideas**:
//! - **Safety**: Structural invariants (unique names, no cycles, untouchable root) are checked
//!   before anything is mutated; a failed operation leaves the tree unchanged.
//! - **Shell semantics**: Absolute and relative paths, `.` and `..`, and a current working
//!   directory behave as in a Unix shell.
//! - **Testability**: Deterministic, in-process, and free of side effects.
//! - **Clarity**: Each failure is a distinct `FsError` kind with a readable message.
//!
//! ### Example
//!
//! ```
//! use vfs_tree::{FsBackend, TreeFS};
//!
//! let mut fs = TreeFS::new();
//! fs.mkdir("docs").unwrap();
//! fs.mkdir("backup").unwrap();
//! fs.cd("docs").unwrap();
//! fs.write("todo.txt", "buy milk", false).unwrap();
//!
//! fs.cp("todo.txt", "/backup", false).unwrap();
//! assert_eq!(fs.search("/", "milk", true).unwrap().unwrap().len(), 2);
//! ```

mod core;
pub mod logging;
pub mod shell;
mod vfs;

pub use crate::core::path;
pub use crate::core::{FsBackend, FsError, Mapping, NodeValue, Result, Violation};
pub use vfs::{Kmp, TreeFS};
