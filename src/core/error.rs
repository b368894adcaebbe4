//! Error kinds reported by the virtual file system.

use thiserror::Error;

/// Failure of a single file system operation.
///
/// Every operation either succeeds or returns exactly one of these kinds;
/// nothing in the tree is changed when an error is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    /// Malformed or empty path string.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Entity name is empty, starts with `.` or contains `/`.
    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("directory '{0}' already exists")]
    DirectoryAlreadyExists(String),

    /// A file is requested where a directory of the same name lives.
    #[error("name conflict: directory '{0}' already exists")]
    NameConflict(String),

    #[error("directory '{0}' does not exist")]
    DirectoryNotFound(String),

    #[error("file '{0}' does not exist")]
    FileNotFound(String),

    /// The last segment of a path is absent and its kind cannot be told.
    #[error("no such file or directory: {0}")]
    NotFound(String),

    #[error("{0} is not a directory")]
    NotADirectory(String),

    #[error("{0} is not a file")]
    NotAFile(String),

    #[error("directory '{0}' is not empty")]
    DirectoryNotEmpty(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(#[from] Violation),

    /// Unknown command option given to the shell.
    #[error("invalid option: {0}")]
    InvalidOption(String),
}

/// Members of the `InvalidOperation` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("cannot recursively copy/move a file")]
    RecursiveFile,

    #[error("cannot non-recursively copy/move a directory")]
    NonRecursiveDirectory,

    #[error("cannot copy/move a directory into itself")]
    CopyIntoSelf,

    #[error("the root directory cannot be copied or moved")]
    RootProtected,

    #[error("cannot copy/move a directory into its own subdirectory")]
    IntoOwnSubtree,

    #[error("destination already contains an entry with the same name")]
    DestinationOccupied,

    #[error("no file specified for redirection")]
    MissingRedirectTarget,
}

impl FsError {
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }

    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName(name.into())
    }

    pub fn dir_not_found(name: impl Into<String>) -> Self {
        Self::DirectoryNotFound(name.into())
    }

    pub fn file_not_found(name: impl Into<String>) -> Self {
        Self::FileNotFound(name.into())
    }

    pub fn not_a_directory(name: impl Into<String>) -> Self {
        Self::NotADirectory(name.into())
    }

    pub fn not_a_file(name: impl Into<String>) -> Self {
        Self::NotAFile(name.into())
    }

    /// True for the "absent" kinds (`DirectoryNotFound`, `FileNotFound`, `NotFound`).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DirectoryNotFound(_) | Self::FileNotFound(_) | Self::NotFound(_)
        )
    }
}

/// Result of a file system operation.
pub type Result<T> = std::result::Result<T, FsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_converts_into_invalid_operation() {
        let err: FsError = Violation::IntoOwnSubtree.into();
        assert_eq!(err, FsError::InvalidOperation(Violation::IntoOwnSubtree));
        assert!(err.to_string().contains("own subdirectory"));
    }

    #[test]
    fn test_messages_name_the_entity() {
        assert_eq!(
            FsError::dir_not_found("docs").to_string(),
            "directory 'docs' does not exist"
        );
        assert_eq!(FsError::not_a_file("docs").to_string(), "docs is not a file");
    }

    #[test]
    fn test_is_not_found() {
        assert!(FsError::file_not_found("a").is_not_found());
        assert!(FsError::NotFound("a".into()).is_not_found());
        assert!(!FsError::not_a_directory("a").is_not_found());
    }
}
