//! Domain model for topics, passages and scripture references.
//!
//! # Responsibility
//! - Define the value types held by the topic tree.
//! - Keep reference parsing separate from tree bookkeeping.
//!
//! # Invariants
//! - Every topic and passage is identified by a stable `Uuid` handle.
//! - Parent links are non-owning ids; the tree arena owns all nodes.

pub mod passage;
pub mod reference;
pub mod topic;
