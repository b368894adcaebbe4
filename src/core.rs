pub mod error;
pub mod path;
pub mod value;

pub use error::{FsError, Result, Violation};
pub use value::{Mapping, NodeValue};

/// Operations a virtual file system offers to its host (a shell, a test, an API).
///
/// Names passed to `mkdir`, `rmdir`, `rm`, `touch`, `write` and `read` are
/// looked up in the current working directory; everything else takes a path,
/// absolute (`/a/b`) or relative to the current working directory (`../b`).
pub trait FsBackend {
    /// Returns the full path of the current working directory (`/` for root).
    fn pwd(&self) -> String;

    /// Returns the name of the current working directory (empty for root).
    fn cwd_name(&self) -> &str;

    /// Changes the current working directory.
    fn cd(&mut self, path: &str) -> Result<()>;

    /// Lists the names of the children of `path` (or of the cwd when `None`).
    fn ls(&self, path: Option<&str>) -> Result<Vec<String>>;

    /// Checks if `path` names an existing node.
    fn exists(&self, path: &str) -> bool;

    /// Checks if `path` is a directory.
    fn is_dir(&self, path: &str) -> Result<bool>;

    /// Checks if `path` is a regular file.
    fn is_file(&self, path: &str) -> Result<bool>;

    /// Descendant count of a directory, or content length of a file.
    fn size(&self, path: &str) -> Result<usize>;

    /// Creates an empty directory `name` in the cwd.
    fn mkdir(&mut self, name: &str) -> Result<()>;

    /// Removes directory `name` from the cwd. Without `recursive` it must be empty.
    fn rmdir(&mut self, name: &str, recursive: bool) -> Result<()>;

    /// Removes file `name` from the cwd.
    fn rm(&mut self, name: &str) -> Result<()>;

    /// Creates each missing file in the cwd; existing files are left untouched.
    fn touch<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>;

    /// Writes a line of `text` to file `name`, creating it if needed.
    fn write(&mut self, name: &str, text: &str, append: bool) -> Result<()>;

    /// Returns the content of file `name`.
    fn read(&self, name: &str) -> Result<String>;

    /// Finds files under `path` whose content contains `pattern`.
    /// `None` means nothing matched.
    fn search(&self, path: &str, pattern: &str, recursive: bool) -> Result<Option<Vec<String>>>;

    /// Copies the file or directory at `src` into the directory `dst`.
    fn cp(&mut self, src: &str, dst: &str, recursive: bool) -> Result<()>;

    /// Moves the file or directory at `src` into the directory `dst`.
    fn mv(&mut self, src: &str, dst: &str, recursive: bool) -> Result<()>;

    /// Serializes the directory at `path` into a nested mapping.
    fn to_mapping(&self, path: &str) -> Result<Mapping>;
}
