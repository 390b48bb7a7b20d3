//! Topic domain model.
//!
//! # Responsibility
//! - Define one named folder of the topic hierarchy.
//!
//! # Invariants
//! - A topic has at most one parent at a time.
//! - Child order is insertion order and is preserved across moves.
//! - Child and parent links are ids into the owning `TopicTree`.

use crate::model::passage::PassageId;
use uuid::Uuid;

/// Stable identifier for one topic in a topic tree.
pub type TopicId = Uuid;

/// Named node holding ordered subtopics and passages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicNode {
    pub(crate) id: TopicId,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) parent: Option<TopicId>,
    pub(crate) subtopics: Vec<TopicId>,
    pub(crate) passages: Vec<PassageId>,
}

impl TopicNode {
    pub(crate) fn detached(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            parent: None,
            subtopics: Vec::new(),
            passages: Vec::new(),
        }
    }

    pub fn id(&self) -> TopicId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parent topic id. `None` for the root and for detached topics.
    pub fn parent(&self) -> Option<TopicId> {
        self.parent
    }

    pub fn subtopics(&self) -> &[TopicId] {
        &self.subtopics
    }

    pub fn passages(&self) -> &[PassageId] {
        &self.passages
    }
}
