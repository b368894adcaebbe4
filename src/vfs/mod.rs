mod navigate;
mod node;
mod search;
mod snapshot;
mod tree_fs;

pub use search::Kmp;
pub use tree_fs::TreeFS;
