//! Serializable topic subtree snapshots.
//!
//! # Responsibility
//! - Export a topic subtree as plain nested values for persistence layers.
//! - Rebuild an exported subtree inside a tree as a detached topic.
//!
//! # Invariants
//! - Snapshots carry no ids; import always allocates fresh ones.
//! - Import fires no notifications because the result is detached.

use crate::model::passage::{PassageEntry, PassageRecord};
use crate::model::topic::{TopicId, TopicNode};
use crate::tree::{TopicTree, TreeResult};
use serde::{Deserialize, Serialize};

/// Owned copy of one topic subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSnapshot {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub passages: Vec<PassageEntry>,
    #[serde(default)]
    pub subtopics: Vec<TopicSnapshot>,
}

impl TopicTree {
    /// Exports `topic` and everything below it.
    pub fn snapshot(&self, topic: TopicId) -> TreeResult<TopicSnapshot> {
        let node = self.require_topic(topic)?;
        let passages = self
            .passage_entries(topic)?
            .into_iter()
            .cloned()
            .collect();
        let subtopics = node
            .subtopics
            .iter()
            .map(|child| self.snapshot(*child))
            .collect::<TreeResult<Vec<_>>>()?;

        Ok(TopicSnapshot {
            name: node.name.clone(),
            description: node.description.clone(),
            passages,
            subtopics,
        })
    }

    /// Rebuilds `snapshot` as a detached subtree and returns its top topic.
    pub fn import_snapshot(&mut self, snapshot: &TopicSnapshot) -> TopicId {
        let mut node = TopicNode::detached(snapshot.name.as_str(), snapshot.description.as_str());
        let id = node.id;

        for entry in &snapshot.passages {
            let mut record = PassageRecord::detached(entry.clone());
            record.parent = Some(id);
            node.passages.push(record.id);
            self.passages.insert(record.id, record);
        }
        for child in &snapshot.subtopics {
            let child_id = self.import_snapshot(child);
            if let Some(child_node) = self.topics.get_mut(&child_id) {
                child_node.parent = Some(id);
            }
            node.subtopics.push(child_id);
        }

        self.topics.insert(id, node);
        id
    }
}
