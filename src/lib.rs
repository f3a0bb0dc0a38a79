//! An ordered multiset implemented as an arena-backed red-black tree.
//!
//! The tree keeps its nodes in a free-list arena and links them by index, so
//! parent back-references carry no ownership and removed slots are recycled on
//! later insertions. Insertion, removal, and lookup all run in O(log n) time;
//! the element count is tracked incrementally and read in O(1).

pub mod arena;
mod node;
mod tree;

pub use self::tree::RubyTree;
