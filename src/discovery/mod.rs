//! Discovery layer for scan target enumeration.
//!
//! Handles directory traversal, excluded-directory pruning and extension
//! allow-listing. Content is read by the scanner layer, not here.

pub mod walker;

pub use walker::{DirectoryWalker, WalkConfig};
