// src/tree/node.rs
// =============================================================================
// An immutable binary tree of integers.
//
// Once built, a Tree is never mutated. Walkers only read it, which is why
// it can be shared between tasks behind an Arc without any locking.
//
// Rust concepts:
// - Box<T>: Heap allocation so a struct can contain itself
// - Option<Box<T>>: "maybe a child" without null pointers
// - Display: Custom formatting with {}
// =============================================================================

use rand::seq::SliceRandom;
use std::fmt;

/// A binary tree node holding an `i64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    left: Option<Box<Tree>>,
    value: i64,
    right: Option<Box<Tree>>,
}

impl Tree {
    /// A node with no children.
    pub fn leaf(value: i64) -> Self {
        Tree {
            left: None,
            value,
            right: None,
        }
    }

    /// A node with the given children. Any shape is allowed, the
    /// children do not have to be ordered.
    pub fn node(left: Option<Tree>, value: i64, right: Option<Tree>) -> Self {
        Tree {
            left: left.map(Box::new),
            value,
            right: right.map(Box::new),
        }
    }

    /// Builds a binary search tree by inserting `values` in order.
    ///
    /// Returns `None` for an empty iterator, since a Tree always has a root.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut root: Option<Box<Tree>> = None;
        for value in values {
            insert(&mut root, value);
        }
        root.map(|boxed| *boxed)
    }

    /// A randomly shaped search tree holding `k, 2k, ..., 10k`.
    ///
    /// Two calls with the same `k` almost always produce different shapes
    /// but always walk to the same sequence. Returns `None` when `10k`
    /// does not fit in an `i64`.
    pub fn new(k: i64) -> Option<Self> {
        let mut values = (1..=10)
            .map(|i| k.checked_mul(i))
            .collect::<Option<Vec<i64>>>()?;
        values.shuffle(&mut rand::thread_rng());
        Tree::from_values(values)
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn left(&self) -> Option<&Tree> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Tree> {
        self.right.as_deref()
    }

    /// Collects the in-order sequence without any concurrency.
    ///
    /// Handy as an oracle when testing the concurrent walk.
    pub fn in_order(&self) -> Vec<i64> {
        let mut out = Vec::new();
        let mut stack: Vec<&Tree> = Vec::new();
        let mut current = Some(self);

        while current.is_some() || !stack.is_empty() {
            while let Some(node) = current {
                stack.push(node);
                current = node.left();
            }
            if let Some(node) = stack.pop() {
                out.push(node.value);
                current = node.right();
            }
        }
        out
    }

    // Only used while building, a Tree is never mutated after that.
    fn insert(&mut self, value: i64) {
        let slot = if value < self.value {
            &mut self.left
        } else {
            &mut self.right
        };
        insert(slot, value);
    }
}

fn insert(slot: &mut Option<Box<Tree>>, value: i64) {
    match slot {
        Some(node) => node.insert(value),
        None => *slot = Some(Box::new(Tree::leaf(value))),
    }
}

// Renders as "((1) 2 (3))": each node in parentheses, left subtree first
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        if let Some(left) = self.left() {
            write!(f, "{} ", left)?;
        }
        write!(f, "{}", self.value)?;
        if let Some(right) = self.right() {
            write!(f, " {}", right)?;
        }
        write!(f, ")")
    }
}
