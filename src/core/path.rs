//! Path parsing for the virtual tree.
//!
//! Paths here address nodes of an in-memory tree, so `std::path` is not used:
//! the separator is always `/`, and `.`/`..` follow shell conventions.

use crate::core::error::{FsError, Result};

pub const SEPARATOR: char = '/';

/// Where path resolution begins.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// The path starts with `/`.
    Root,
    /// The path is relative to the current working directory.
    Current,
}

/// Normalized leading part of a path.
///
/// `ups` counts the leading `..` hops; `rest` is whatever follows the leading
/// run of `.`, `./`, `..` and `../` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefix<'a> {
    pub anchor: Anchor,
    pub ups: usize,
    pub rest: &'a str,
}

impl<'a> PathPrefix<'a> {
    /// Names of `rest`, in order.
    pub fn segments(&self) -> Vec<&'a str> {
        split(self.rest)
    }
}

/// Parses `path` into its anchor, parent hops and remainder.
///
/// Fails with `InvalidPath` if `path` is empty.
pub fn resolve(path: &str) -> Result<PathPrefix<'_>> {
    if path.is_empty() {
        return Err(FsError::invalid_path("path cannot be empty"));
    }

    let (anchor, mut rest) = match path.strip_prefix(SEPARATOR) {
        Some(rest) => (Anchor::Root, rest),
        None => (Anchor::Current, path),
    };

    let mut ups = 0;
    loop {
        if let Some(tail) = rest.strip_prefix("./") {
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("../") {
            ups += 1;
            rest = tail;
        } else if rest == ".." {
            ups += 1;
            rest = "";
        } else if rest == "." {
            rest = "";
        } else {
            break;
        }
    }

    Ok(PathPrefix { anchor, ups, rest })
}

/// Splits `path` on `/`, dropping empty segments.
pub fn split(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
}

/// Checks that `name` may be used for a new directory or file.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with('.') || name.contains(SEPARATOR) {
        return Err(FsError::invalid_name(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod resolve {
        use super::*;

        #[test]
        fn test_empty_path_is_rejected() {
            assert_eq!(
                resolve(""),
                Err(FsError::invalid_path("path cannot be empty"))
            );
        }

        #[test]
        fn test_root_anchor() -> Result<()> {
            let prefix = resolve("/home/user")?;
            assert_eq!(prefix.anchor, Anchor::Root);
            assert_eq!(prefix.ups, 0);
            assert_eq!(prefix.rest, "home/user");

            let prefix = resolve("/")?;
            assert_eq!(prefix.anchor, Anchor::Root);
            assert_eq!(prefix.rest, "");
            Ok(())
        }

        #[test]
        fn test_relative_forms() -> Result<()> {
            let prefix = resolve("docs")?;
            assert_eq!(prefix.anchor, Anchor::Current);
            assert_eq!(prefix.rest, "docs");

            let prefix = resolve("./docs")?;
            assert_eq!(prefix.anchor, Anchor::Current);
            assert_eq!(prefix.ups, 0);
            assert_eq!(prefix.rest, "docs");
            Ok(())
        }

        #[test]
        fn test_parent_hops() -> Result<()> {
            let prefix = resolve(".././../../file.txt")?;
            assert_eq!(prefix.anchor, Anchor::Current);
            assert_eq!(prefix.ups, 3);
            assert_eq!(prefix.rest, "file.txt");

            let prefix = resolve("..")?;
            assert_eq!(prefix.ups, 1);
            assert_eq!(prefix.rest, "");

            let prefix = resolve("/../../.")?;
            assert_eq!(prefix.anchor, Anchor::Root);
            assert_eq!(prefix.ups, 2);
            assert_eq!(prefix.rest, "");
            Ok(())
        }

        #[test]
        fn test_scan_stops_at_first_name() -> Result<()> {
            let prefix = resolve("../a/../b")?;
            assert_eq!(prefix.ups, 1);
            assert_eq!(prefix.rest, "a/../b");
            assert_eq!(prefix.segments(), vec!["a", "..", "b"]);
            Ok(())
        }

        #[test]
        fn test_dot_prefixed_name_is_not_a_token() -> Result<()> {
            let prefix = resolve("..hidden")?;
            assert_eq!(prefix.ups, 0);
            assert_eq!(prefix.rest, "..hidden");
            Ok(())
        }
    }

    mod split {
        use super::*;

        #[test]
        fn test_split_collapses_separators() {
            assert_eq!(split("a//b/"), vec!["a", "b"]);
            assert_eq!(split("/a"), vec!["a"]);
            assert!(split("").is_empty());
            assert!(split("///").is_empty());
        }
    }

    mod names {
        use super::*;

        #[test]
        fn test_invalid_names() {
            for name in ["", ".", "..", ".hidden", "a/b", "/"] {
                assert_eq!(validate_name(name), Err(FsError::invalid_name(name)));
            }
        }

        #[test]
        fn test_valid_names() {
            for name in ["docs", "a.txt", "with space", "x..y"] {
                assert!(validate_name(name).is_ok());
            }
        }
    }
}
