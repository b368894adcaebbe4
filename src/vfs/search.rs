//! Content search over the files of a directory.

use crate::vfs::node::{Arena, NodeId, NodeKind};

/// Exact substring matcher (Knuth-Morris-Pratt) over raw bytes.
///
/// An empty pattern matches every text.
#[derive(Debug, Clone)]
pub struct Kmp<'p> {
    pattern: &'p [u8],
    // lps[i]: length of the longest proper prefix of pattern[..=i]
    // that is also its suffix
    lps: Vec<usize>,
}

impl<'p> Kmp<'p> {
    pub fn new(pattern: &'p str) -> Self {
        let pattern = pattern.as_bytes();
        let mut lps = vec![0; pattern.len()];
        let (mut i, mut len) = (1, 0);
        while i < pattern.len() {
            if pattern[i] == pattern[len] {
                len += 1;
                lps[i] = len;
                i += 1;
            } else if len == 0 {
                i += 1;
            } else {
                len = lps[len - 1];
            }
        }
        Self { pattern, lps }
    }

    /// True if the pattern occurs anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        let m = self.pattern.len();
        if m == 0 {
            return true;
        }

        let text = text.as_bytes();
        let (mut i, mut j) = (0, 0);
        while i < text.len() {
            if text[i] == self.pattern[j] {
                i += 1;
                j += 1;
                if j == m {
                    return true;
                }
            } else if j == 0 {
                i += 1;
            } else {
                j = self.lps[j - 1];
            }
        }
        false
    }
}

/// Names of the files directly inside `dir` whose content matches.
pub fn search_flat(arena: &Arena, dir: NodeId, matcher: &Kmp<'_>) -> Vec<String> {
    let Some(children) = arena.get(dir).children() else {
        return Vec::new();
    };
    children
        .iter()
        .filter(|&(_, &child)| {
            arena
                .get(child)
                .content()
                .is_some_and(|content| matcher.is_match(content))
        })
        .map(|(name, _)| name.clone())
        .collect()
}

/// Depth-first search of the subtree at `dir`.
///
/// Each match is reported as the names from `dir` itself down to the file,
/// joined by `/`. Siblings are visited in name order.
pub fn search_recursive(arena: &Arena, dir: NodeId, matcher: &Kmp<'_>) -> Vec<String> {
    let mut found = Vec::new();
    let node = arena.get(dir);
    let Some(children) = node.children() else {
        return found;
    };

    // trail[i] is the name of the directory whose children frames[i] walks
    let mut trail = vec![node.name()];
    let mut frames = vec![children.iter()];
    while let Some(frame) = frames.last_mut() {
        let Some((name, &child)) = frame.next() else {
            frames.pop();
            trail.pop();
            continue;
        };
        match arena.get(child).kind() {
            NodeKind::File { content } => {
                if matcher.is_match(content) {
                    found.push(format!("{}/{}", trail.join("/"), name));
                }
            }
            NodeKind::Directory { children } => {
                trail.push(name.as_str());
                frames.push(children.iter());
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::node::Node;

    mod kmp {
        use super::*;

        #[test]
        fn test_failure_table() {
            assert_eq!(Kmp::new("aabaaab").lps, vec![0, 1, 0, 1, 2, 2, 3]);
            assert_eq!(Kmp::new("abcd").lps, vec![0, 0, 0, 0]);
        }

        #[test]
        fn test_matches() {
            let kmp = Kmp::new("needle");
            assert!(kmp.is_match("needle in haystack"));
            assert!(kmp.is_match("hay needle"));
            assert!(!kmp.is_match("needl"));
            assert!(!kmp.is_match(""));
        }

        #[test]
        fn test_fallback_on_partial_match() {
            assert!(Kmp::new("aab").is_match("aaab"));
            assert!(Kmp::new("abab").is_match("abaabab"));
            assert!(!Kmp::new("abab").is_match("abaaba"));
        }

        #[test]
        fn test_case_sensitive() {
            assert!(!Kmp::new("Needle").is_match("needle"));
        }

        #[test]
        fn test_empty_pattern_matches_everything() {
            let kmp = Kmp::new("");
            assert!(kmp.is_match(""));
            assert!(kmp.is_match("anything"));
        }

        #[test]
        fn test_non_ascii() {
            assert!(Kmp::new("ё").is_match("всё хорошо"));
        }
    }

    mod traversal {
        use super::*;

        /// /x/a.txt = "needle in haystack", /x/y/b.txt = "needle", /x/c.txt = "hay"
        fn fixture() -> (Arena, NodeId) {
            let mut arena = Arena::new();
            let x = arena.insert(arena.root(), Node::directory("x")).unwrap();
            arena
                .insert(x, Node::file("a.txt", "needle in haystack"))
                .unwrap();
            arena.insert(x, Node::file("c.txt", "hay")).unwrap();
            let y = arena.insert(x, Node::directory("y")).unwrap();
            arena.insert(y, Node::file("b.txt", "needle")).unwrap();
            (arena, x)
        }

        #[test]
        fn test_flat_search_sees_only_direct_files() {
            let (arena, x) = fixture();
            let kmp = Kmp::new("needle");
            assert_eq!(search_flat(&arena, x, &kmp), vec!["a.txt"]);
        }

        #[test]
        fn test_recursive_search_reports_paths() {
            let (arena, x) = fixture();
            let kmp = Kmp::new("needle");
            assert_eq!(
                search_recursive(&arena, x, &kmp),
                vec!["x/a.txt", "x/y/b.txt"]
            );
        }

        #[test]
        fn test_recursive_search_from_root() {
            let (arena, _) = fixture();
            let kmp = Kmp::new("hay");
            assert_eq!(
                search_recursive(&arena, arena.root(), &kmp),
                vec!["/x/a.txt", "/x/c.txt"]
            );
        }

        #[test]
        fn test_no_match() {
            let (arena, x) = fixture();
            let kmp = Kmp::new("absent");
            assert!(search_recursive(&arena, x, &kmp).is_empty());
            assert!(search_flat(&arena, x, &kmp).is_empty());
        }
    }
}
