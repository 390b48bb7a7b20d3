//! Passage domain model.
//!
//! # Responsibility
//! - Define the passage value stored under topics (`PassageEntry`).
//! - Define the arena record that tracks one passage's current parent.
//!
//! # Invariants
//! - The scripture reference of an entry never changes after creation.
//! - Cloning an entry yields an independent value with no parent.

use crate::model::reference::{ReferenceError, VerseRef};
use crate::model::topic::TopicId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one passage in a topic tree.
pub type PassageId = Uuid;

/// Scripture reference plus free-text comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageEntry {
    reference: VerseRef,
    comment: String,
}

impl PassageEntry {
    /// Creates an entry from user-typed reference text.
    ///
    /// # Errors
    /// - Returns `ReferenceError` when `reference` does not parse.
    pub fn new(reference: &str, comment: impl Into<String>) -> Result<Self, ReferenceError> {
        Ok(Self::from_reference(VerseRef::parse(reference)?, comment))
    }

    pub fn from_reference(reference: VerseRef, comment: impl Into<String>) -> Self {
        Self {
            reference,
            comment: comment.into(),
        }
    }

    pub fn reference(&self) -> &VerseRef {
        &self.reference
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }
}

impl Display for PassageEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.comment.is_empty() {
            write!(f, "{}", self.reference)
        } else {
            write!(f, "{} ({})", self.reference, self.comment)
        }
    }
}

/// Arena record for one passage.
///
/// Owned by `TopicTree`; the parent link is non-owning and maintained only by
/// tree mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassageRecord {
    pub(crate) id: PassageId,
    pub(crate) entry: PassageEntry,
    pub(crate) parent: Option<TopicId>,
}

impl PassageRecord {
    pub(crate) fn detached(entry: PassageEntry) -> Self {
        Self {
            id: Uuid::new_v4(),
            entry,
            parent: None,
        }
    }

    pub fn id(&self) -> PassageId {
        self.id
    }

    pub fn entry(&self) -> &PassageEntry {
        &self.entry
    }

    /// Topic currently holding this passage. `None` means detached.
    pub fn parent(&self) -> Option<TopicId> {
        self.parent
    }
}
