//! Per-topic change observers.
//!
//! # Responsibility
//! - Map each event kind to an ordered list of observer callbacks.
//! - Hand out stable handles so observers can be removed individually.
//!
//! # Invariants
//! - Observers run in registration order.
//! - Observers only ever see the tree after a mutation has completed.

use crate::model::passage::PassageId;
use crate::model::topic::TopicId;
use crate::tree::TopicTree;
use std::collections::BTreeMap;

/// Handle returned by observer registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(pub(crate) u64);

/// Kinds of structural change a topic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TopicEventKind {
    PassageAdded,
    PassageRemoved,
    SubtopicAdded,
    SubtopicRemoved,
    NameChanged,
}

impl TopicEventKind {
    /// Stable name used in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PassageAdded => "passage_added",
            Self::PassageRemoved => "passage_removed",
            Self::SubtopicAdded => "subtopic_added",
            Self::SubtopicRemoved => "subtopic_removed",
            Self::NameChanged => "name_changed",
        }
    }
}

/// One change notification, fired on `topic`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicEvent {
    PassageAdded { topic: TopicId, passage: PassageId },
    PassageRemoved { topic: TopicId, passage: PassageId },
    SubtopicAdded { topic: TopicId, subtopic: TopicId },
    SubtopicRemoved { topic: TopicId, subtopic: TopicId },
    NameChanged { topic: TopicId, name: String },
}

impl TopicEvent {
    pub fn kind(&self) -> TopicEventKind {
        match self {
            Self::PassageAdded { .. } => TopicEventKind::PassageAdded,
            Self::PassageRemoved { .. } => TopicEventKind::PassageRemoved,
            Self::SubtopicAdded { .. } => TopicEventKind::SubtopicAdded,
            Self::SubtopicRemoved { .. } => TopicEventKind::SubtopicRemoved,
            Self::NameChanged { .. } => TopicEventKind::NameChanged,
        }
    }

    /// Topic on which the event fired.
    pub fn topic(&self) -> TopicId {
        match self {
            Self::PassageAdded { topic, .. }
            | Self::PassageRemoved { topic, .. }
            | Self::SubtopicAdded { topic, .. }
            | Self::SubtopicRemoved { topic, .. }
            | Self::NameChanged { topic, .. } => *topic,
        }
    }
}

/// Observer callback. Receives the post-mutation tree and the event.
pub type TopicObserver = Box<dyn FnMut(&TopicTree, &TopicEvent) + Send>;

type ObserverList = Vec<(ObserverId, TopicObserver)>;

/// Observers registered on one topic.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    by_kind: BTreeMap<TopicEventKind, ObserverList>,
}

impl ObserverRegistry {
    pub(crate) fn add(&mut self, kind: TopicEventKind, id: ObserverId, observer: TopicObserver) {
        self.by_kind.entry(kind).or_default().push((id, observer));
    }

    pub(crate) fn remove(&mut self, kind: TopicEventKind, id: ObserverId) -> bool {
        let Some(list) = self.by_kind.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(candidate, _)| *candidate != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.by_kind.remove(&kind);
        }
        removed
    }

    pub(crate) fn len(&self, kind: TopicEventKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }

    /// Detaches the list for `kind` so it can run against a shared tree borrow.
    pub(crate) fn take(&mut self, kind: TopicEventKind) -> ObserverList {
        self.by_kind.remove(&kind).unwrap_or_default()
    }

    /// Puts a list detached by `take` back in front of anything added since.
    pub(crate) fn restore(&mut self, kind: TopicEventKind, mut list: ObserverList) {
        if list.is_empty() {
            return;
        }
        if let Some(added) = self.by_kind.remove(&kind) {
            list.extend(added);
        }
        self.by_kind.insert(kind, list);
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts = self
            .by_kind
            .iter()
            .map(|(kind, list)| (kind.as_str(), list.len()))
            .collect::<BTreeMap<_, _>>();
        f.debug_struct("ObserverRegistry")
            .field("observers", &counts)
            .finish()
    }
}
