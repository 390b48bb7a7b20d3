//! Topic tree arena and structural mutations.
//!
//! # Responsibility
//! - Own every topic and passage; hand out id handles.
//! - Apply validated structural mutations and fire change notifications.
//!
//! # Invariants
//! - A node has at most one parent; `parent` and the parent's child list agree.
//! - The root topic is never attached, removed, moved or discarded.
//! - Every precondition is checked before the first write, so a failed call
//!   leaves the tree untouched.
//! - Observers run after the mutation is complete and see the final state.

pub mod observer;
pub mod snapshot;

use crate::model::passage::{PassageEntry, PassageId, PassageRecord};
use crate::model::topic::{TopicId, TopicNode};
use log::debug;
use observer::{ObserverId, ObserverRegistry, TopicEvent, TopicEventKind, TopicObserver};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by topic tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors from topic tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Topic id is unknown to this tree.
    TopicNotFound(TopicId),
    /// Passage id is unknown to this tree.
    PassageNotFound(PassageId),
    /// Topic already has a parent.
    TopicAlreadyAttached { topic: TopicId, parent: TopicId },
    /// Passage already belongs to a topic.
    PassageAlreadyAttached { passage: PassageId, parent: TopicId },
    /// `child` is not a direct subtopic of `parent`.
    NotASubtopic { parent: TopicId, child: TopicId },
    /// `passage` is not held by `topic`.
    PassageNotInTopic { topic: TopicId, passage: PassageId },
    /// Attaching `topic` under `parent` would make it its own ancestor.
    CycleDetected { topic: TopicId, parent: TopicId },
    /// Root topic cannot change position.
    RootImmovable,
    /// Only detached topics can be discarded.
    TopicStillAttached(TopicId),
    /// Only detached passages can be discarded.
    PassageStillAttached(PassageId),
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TopicNotFound(id) => write!(f, "topic not found: {id}"),
            Self::PassageNotFound(id) => write!(f, "passage not found: {id}"),
            Self::TopicAlreadyAttached { topic, parent } => {
                write!(f, "topic {topic} already attached under {parent}")
            }
            Self::PassageAlreadyAttached { passage, parent } => {
                write!(f, "passage {passage} already attached under {parent}")
            }
            Self::NotASubtopic { parent, child } => {
                write!(f, "topic {child} is not a subtopic of {parent}")
            }
            Self::PassageNotInTopic { topic, passage } => {
                write!(f, "passage {passage} is not in topic {topic}")
            }
            Self::CycleDetected { topic, parent } => write!(
                f,
                "attach would create cycle: topic {topic} under parent {parent}"
            ),
            Self::RootImmovable => write!(f, "root topic cannot be moved or removed"),
            Self::TopicStillAttached(id) => write!(f, "topic is still attached: {id}"),
            Self::PassageStillAttached(id) => write!(f, "passage is still attached: {id}"),
        }
    }
}

impl Error for TreeError {}

/// In-memory topic hierarchy with per-topic observers.
#[derive(Debug)]
pub struct TopicTree {
    root: TopicId,
    topics: HashMap<TopicId, TopicNode>,
    passages: HashMap<PassageId, PassageRecord>,
    observers: HashMap<TopicId, ObserverRegistry>,
    next_observer_id: u64,
}

impl Default for TopicTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicTree {
    /// Creates a tree holding only an unnamed root topic.
    pub fn new() -> Self {
        let root = TopicNode::detached("", "");
        let root_id = root.id;
        let mut topics = HashMap::new();
        topics.insert(root_id, root);
        Self {
            root: root_id,
            topics,
            passages: HashMap::new(),
            observers: HashMap::new(),
            next_observer_id: 1,
        }
    }

    pub fn root(&self) -> TopicId {
        self.root
    }

    pub fn topic(&self, id: TopicId) -> Option<&TopicNode> {
        self.topics.get(&id)
    }

    pub fn passage(&self, id: PassageId) -> Option<&PassageRecord> {
        self.passages.get(&id)
    }

    pub fn contains_topic(&self, id: TopicId) -> bool {
        self.topics.contains_key(&id)
    }

    /// Number of topics in the arena, detached ones included.
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Number of passages in the arena, detached ones included.
    pub fn passage_count(&self) -> usize {
        self.passages.len()
    }

    /// Allocates a detached topic.
    pub fn create_topic(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> TopicId {
        let topic = TopicNode::detached(name, description);
        let id = topic.id;
        self.topics.insert(id, topic);
        id
    }

    /// Allocates a detached passage.
    pub fn create_passage(&mut self, entry: PassageEntry) -> PassageId {
        let record = PassageRecord::detached(entry);
        let id = record.id;
        self.passages.insert(id, record);
        id
    }

    /// Appends detached `child` to `parent`'s subtopics.
    pub fn add_subtopic(&mut self, parent: TopicId, child: TopicId) -> TreeResult<()> {
        self.require_topic(parent)?;
        let child_node = self.require_topic(child)?;
        if child == self.root {
            return Err(TreeError::RootImmovable);
        }
        if let Some(current) = child_node.parent {
            return Err(TreeError::TopicAlreadyAttached {
                topic: child,
                parent: current,
            });
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(TreeError::CycleDetected {
                topic: child,
                parent,
            });
        }

        self.attach_topic(parent, child);
        self.notify(TopicEvent::SubtopicAdded {
            topic: parent,
            subtopic: child,
        });
        Ok(())
    }

    /// Detaches `child` from `parent`. The child keeps its identity.
    pub fn remove_subtopic(&mut self, parent: TopicId, child: TopicId) -> TreeResult<()> {
        self.require_topic(parent)?;
        let child_node = self.require_topic(child)?;
        if child_node.parent != Some(parent) {
            return Err(TreeError::NotASubtopic { parent, child });
        }

        self.detach_topic(parent, child);
        self.notify(TopicEvent::SubtopicRemoved {
            topic: parent,
            subtopic: child,
        });
        Ok(())
    }

    /// Moves `child` (attached or detached) to the end of `to`'s subtopics.
    ///
    /// Fires `SubtopicRemoved` on the old parent, if any, then `SubtopicAdded`
    /// on `to`; both after the move is complete.
    pub fn move_subtopic(&mut self, child: TopicId, to: TopicId) -> TreeResult<()> {
        self.require_topic(to)?;
        let from = self.require_topic(child)?.parent;
        if child == self.root {
            return Err(TreeError::RootImmovable);
        }
        if self.is_ancestor_or_self(child, to) {
            return Err(TreeError::CycleDetected {
                topic: child,
                parent: to,
            });
        }

        if let Some(from) = from {
            self.detach_topic(from, child);
        }
        self.attach_topic(to, child);

        if let Some(from) = from {
            self.notify(TopicEvent::SubtopicRemoved {
                topic: from,
                subtopic: child,
            });
        }
        self.notify(TopicEvent::SubtopicAdded {
            topic: to,
            subtopic: child,
        });
        Ok(())
    }

    /// Appends detached `passage` to `topic`.
    pub fn add_passage(&mut self, topic: TopicId, passage: PassageId) -> TreeResult<()> {
        self.require_topic(topic)?;
        if let Some(current) = self.require_passage(passage)?.parent {
            return Err(TreeError::PassageAlreadyAttached {
                passage,
                parent: current,
            });
        }

        self.attach_passage(topic, passage);
        self.notify(TopicEvent::PassageAdded { topic, passage });
        Ok(())
    }

    /// Detaches `passage` from `topic`. The passage keeps its identity.
    pub fn remove_passage(&mut self, topic: TopicId, passage: PassageId) -> TreeResult<()> {
        self.require_topic(topic)?;
        if self.require_passage(passage)?.parent != Some(topic) {
            return Err(TreeError::PassageNotInTopic { topic, passage });
        }

        self.detach_passage(topic, passage);
        self.notify(TopicEvent::PassageRemoved { topic, passage });
        Ok(())
    }

    /// Moves `passage` from `from` to the end of `to`.
    pub fn move_passage(
        &mut self,
        from: TopicId,
        passage: PassageId,
        to: TopicId,
    ) -> TreeResult<()> {
        self.require_topic(from)?;
        self.require_topic(to)?;
        if self.require_passage(passage)?.parent != Some(from) {
            return Err(TreeError::PassageNotInTopic {
                topic: from,
                passage,
            });
        }

        self.detach_passage(from, passage);
        self.attach_passage(to, passage);
        self.notify(TopicEvent::PassageRemoved {
            topic: from,
            passage,
        });
        self.notify(TopicEvent::PassageAdded { topic: to, passage });
        Ok(())
    }

    /// Renames `topic` and fires exactly one `NameChanged`.
    pub fn set_topic_name(&mut self, topic: TopicId, name: impl Into<String>) -> TreeResult<()> {
        let name = name.into();
        self.require_topic_mut(topic)?.name = name.clone();
        self.notify(TopicEvent::NameChanged { topic, name });
        Ok(())
    }

    pub fn set_topic_description(
        &mut self,
        topic: TopicId,
        description: impl Into<String>,
    ) -> TreeResult<()> {
        self.require_topic_mut(topic)?.description = description.into();
        Ok(())
    }

    pub fn set_passage_comment(
        &mut self,
        passage: PassageId,
        comment: impl Into<String>,
    ) -> TreeResult<()> {
        self.passages
            .get_mut(&passage)
            .ok_or(TreeError::PassageNotFound(passage))?
            .entry
            .set_comment(comment);
        Ok(())
    }

    /// Creates a detached copy of `passage` with the same reference and comment.
    pub fn clone_passage(&mut self, passage: PassageId) -> TreeResult<PassageId> {
        let entry = self.require_passage(passage)?.entry.clone();
        Ok(self.create_passage(entry))
    }

    /// Creates a detached deep copy of `topic` with fresh ids throughout.
    ///
    /// Observers are not copied.
    pub fn clone_topic(&mut self, topic: TopicId) -> TreeResult<TopicId> {
        let source = self.require_topic(topic)?.clone();
        let mut copy = TopicNode::detached(source.name, source.description);
        let copy_id = copy.id;

        for passage in &source.passages {
            let mut record = PassageRecord::detached(self.require_passage(*passage)?.entry.clone());
            record.parent = Some(copy_id);
            copy.passages.push(record.id);
            self.passages.insert(record.id, record);
        }
        for subtopic in &source.subtopics {
            let sub_copy = self.clone_topic(*subtopic)?;
            self.require_topic_mut(sub_copy)?.parent = Some(copy_id);
            copy.subtopics.push(sub_copy);
        }

        self.topics.insert(copy_id, copy);
        Ok(copy_id)
    }

    /// Frees a detached topic together with its whole subtree and observers.
    pub fn discard_topic(&mut self, topic: TopicId) -> TreeResult<()> {
        if topic == self.root {
            return Err(TreeError::RootImmovable);
        }
        if self.require_topic(topic)?.parent.is_some() {
            return Err(TreeError::TopicStillAttached(topic));
        }

        let mut pending = vec![topic];
        let mut discarded = 0usize;
        while let Some(current) = pending.pop() {
            if let Some(node) = self.topics.remove(&current) {
                for passage in &node.passages {
                    self.passages.remove(passage);
                }
                pending.extend(node.subtopics);
                self.observers.remove(&current);
                discarded += 1;
            }
        }
        debug!("event=topic_discard module=tree status=ok topics={discarded}");
        Ok(())
    }

    /// Frees a detached passage.
    pub fn discard_passage(&mut self, passage: PassageId) -> TreeResult<()> {
        if self.require_passage(passage)?.parent.is_some() {
            return Err(TreeError::PassageStillAttached(passage));
        }
        self.passages.remove(&passage);
        Ok(())
    }

    /// Returns passage entries of `topic` in child order.
    pub fn passage_entries(&self, topic: TopicId) -> TreeResult<Vec<&PassageEntry>> {
        self.require_topic(topic)?
            .passages
            .iter()
            .map(|id| self.require_passage(*id).map(|record| &record.entry))
            .collect()
    }

    /// Returns ancestors of `topic`, nearest first.
    pub fn ancestors(&self, topic: TopicId) -> TreeResult<Vec<TopicId>> {
        let mut result = Vec::new();
        let mut cursor = self.require_topic(topic)?.parent;
        while let Some(current) = cursor {
            result.push(current);
            cursor = self.require_topic(current)?.parent;
        }
        Ok(result)
    }

    /// Returns the display path of `topic`, e.g. `topic1 > topic2`.
    ///
    /// The root segment is omitted, so the root itself renders as empty.
    pub fn full_name(&self, topic: TopicId) -> TreeResult<String> {
        let mut chain = self.ancestors(topic)?;
        chain.reverse();
        chain.push(topic);
        let segments = chain
            .into_iter()
            .filter(|id| *id != self.root)
            .map(|id| self.require_topic(id).map(|node| node.name.as_str()))
            .collect::<TreeResult<Vec<_>>>()?;
        Ok(segments.join(" > "))
    }

    /// Registers `observer` for `kind` events fired on `topic`.
    pub fn add_observer(
        &mut self,
        topic: TopicId,
        kind: TopicEventKind,
        observer: TopicObserver,
    ) -> TreeResult<ObserverId> {
        self.require_topic(topic)?;
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers
            .entry(topic)
            .or_default()
            .add(kind, id, observer);
        Ok(id)
    }

    /// Unregisters one observer. Returns whether it was registered.
    pub fn remove_observer(&mut self, topic: TopicId, kind: TopicEventKind, id: ObserverId) -> bool {
        self.observers
            .get_mut(&topic)
            .is_some_and(|registry| registry.remove(kind, id))
    }

    pub fn observer_count(&self, topic: TopicId, kind: TopicEventKind) -> usize {
        self.observers
            .get(&topic)
            .map_or(0, |registry| registry.len(kind))
    }

    fn require_topic(&self, id: TopicId) -> TreeResult<&TopicNode> {
        self.topics.get(&id).ok_or(TreeError::TopicNotFound(id))
    }

    fn require_topic_mut(&mut self, id: TopicId) -> TreeResult<&mut TopicNode> {
        self.topics.get_mut(&id).ok_or(TreeError::TopicNotFound(id))
    }

    fn require_passage(&self, id: PassageId) -> TreeResult<&PassageRecord> {
        self.passages.get(&id).ok_or(TreeError::PassageNotFound(id))
    }

    fn is_ancestor_or_self(&self, candidate: TopicId, topic: TopicId) -> bool {
        let mut cursor = Some(topic);
        while let Some(current) = cursor {
            if current == candidate {
                return true;
            }
            cursor = self.topics.get(&current).and_then(|node| node.parent);
        }
        false
    }

    // Link helpers below assume the caller already validated both ends.

    fn attach_topic(&mut self, parent: TopicId, child: TopicId) {
        if let Some(node) = self.topics.get_mut(&parent) {
            node.subtopics.push(child);
        }
        if let Some(node) = self.topics.get_mut(&child) {
            node.parent = Some(parent);
        }
    }

    fn detach_topic(&mut self, parent: TopicId, child: TopicId) {
        if let Some(node) = self.topics.get_mut(&parent) {
            node.subtopics.retain(|id| *id != child);
        }
        if let Some(node) = self.topics.get_mut(&child) {
            node.parent = None;
        }
    }

    fn attach_passage(&mut self, topic: TopicId, passage: PassageId) {
        if let Some(node) = self.topics.get_mut(&topic) {
            node.passages.push(passage);
        }
        if let Some(record) = self.passages.get_mut(&passage) {
            record.parent = Some(topic);
        }
    }

    fn detach_passage(&mut self, topic: TopicId, passage: PassageId) {
        if let Some(node) = self.topics.get_mut(&topic) {
            node.passages.retain(|id| *id != passage);
        }
        if let Some(record) = self.passages.get_mut(&passage) {
            record.parent = None;
        }
    }

    fn notify(&mut self, event: TopicEvent) {
        let topic = event.topic();
        let kind = event.kind();
        let Some(registry) = self.observers.get_mut(&topic) else {
            return;
        };
        let mut observers = registry.take(kind);
        if observers.is_empty() {
            return;
        }

        debug!(
            "event=topic_notify module=tree status=start kind={} observers={}",
            kind.as_str(),
            observers.len()
        );
        for (_, observer) in observers.iter_mut() {
            observer(&*self, &event);
        }
        if let Some(registry) = self.observers.get_mut(&topic) {
            registry.restore(kind, observers);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TopicTree, TreeError};
    use crate::model::passage::PassageEntry;

    #[test]
    fn root_cannot_be_attached_or_discarded() {
        let mut tree = TopicTree::new();
        let topic = tree.create_topic("a", "");
        let root = tree.root();

        assert_eq!(tree.add_subtopic(topic, root), Err(TreeError::RootImmovable));
        assert_eq!(tree.move_subtopic(root, topic), Err(TreeError::RootImmovable));
        assert_eq!(tree.discard_topic(root), Err(TreeError::RootImmovable));
    }

    #[test]
    fn attach_rejects_cycles_through_detached_subtree() {
        let mut tree = TopicTree::new();
        let outer = tree.create_topic("outer", "");
        let inner = tree.create_topic("inner", "");
        tree.add_subtopic(outer, inner).unwrap();

        let err = tree.add_subtopic(inner, outer).unwrap_err();
        assert_eq!(
            err,
            TreeError::CycleDetected {
                topic: outer,
                parent: inner
            }
        );
        assert!(tree.topic(inner).unwrap().subtopics().is_empty());
    }

    #[test]
    fn failed_move_leaves_tree_untouched() {
        let mut tree = TopicTree::new();
        let root = tree.root();
        let a = tree.create_topic("a", "");
        let b = tree.create_topic("b", "");
        let passage = tree.create_passage(PassageEntry::new("gen 1:1", "").unwrap());
        tree.add_subtopic(root, a).unwrap();
        tree.add_passage(a, passage).unwrap();

        let err = tree.move_passage(b, passage, root).unwrap_err();
        assert!(matches!(err, TreeError::PassageNotInTopic { .. }));
        assert_eq!(tree.topic(a).unwrap().passages(), &[passage]);
        assert_eq!(tree.passage(passage).unwrap().parent(), Some(a));
    }

    #[test]
    fn discard_drops_whole_detached_subtree() {
        let mut tree = TopicTree::new();
        let a = tree.create_topic("a", "");
        let b = tree.create_topic("b", "");
        let passage = tree.create_passage(PassageEntry::new("ps 23", "").unwrap());
        tree.add_subtopic(a, b).unwrap();
        tree.add_passage(b, passage).unwrap();

        assert_eq!(tree.discard_topic(b), Err(TreeError::TopicStillAttached(b)));
        tree.discard_topic(a).unwrap();
        assert_eq!(tree.topic_count(), 1);
        assert_eq!(tree.passage_count(), 0);
    }

    #[test]
    fn full_name_skips_root_segment() {
        let mut tree = TopicTree::new();
        let root = tree.root();
        let a = tree.create_topic("topic1", "");
        let b = tree.create_topic("topic2", "");
        tree.add_subtopic(root, a).unwrap();
        tree.add_subtopic(a, b).unwrap();

        assert_eq!(tree.full_name(b).unwrap(), "topic1 > topic2");
        assert_eq!(tree.full_name(root).unwrap(), "");
        assert_eq!(tree.ancestors(b).unwrap(), vec![a, root]);
    }

    #[test]
    fn set_topic_description_updates_known_topic_only() {
        let mut tree = TopicTree::new();
        let topic = tree.create_topic("Grace", "");

        tree.set_topic_description(topic, "Unmerited favour").unwrap();
        assert_eq!(tree.topic(topic).unwrap().description(), "Unmerited favour");

        let unknown = uuid::Uuid::new_v4();
        assert_eq!(
            tree.set_topic_description(unknown, "lost"),
            Err(TreeError::TopicNotFound(unknown))
        );
    }
}
