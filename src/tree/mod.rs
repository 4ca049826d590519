// src/tree/mod.rs
// =============================================================================
// This module checks whether two binary trees hold the same values.
//
// Submodules:
// - node: The immutable Tree type and a few ways to build one
// - walk: Concurrent in-order walks and the pairwise comparison
//
// Two trees are "the same" when their in-order sequences are equal.
// Their shapes may differ: (1 (2)) and ((1) 2) both walk as [1, 2].
// =============================================================================

mod node;
mod walk;

pub use node::Tree;
pub use walk::{same, walk};
