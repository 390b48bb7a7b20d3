//! Topic use-case services.
//!
//! # Responsibility
//! - Translate user-level commands into topic tree mutations.
//! - Keep UI selection state and clipboard staging out of the tree itself.

pub mod clipboard;
pub mod selection;
pub mod topic_operations;
