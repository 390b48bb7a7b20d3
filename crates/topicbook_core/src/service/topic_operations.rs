//! Topic management use-case service.
//!
//! # Responsibility
//! - Resolve operands from the selection context and apply tree mutations.
//! - Stage cut/copy payloads and apply them on paste.
//!
//! # Invariants
//! - Paste into the topic the item already lives in is a silent no-op.
//! - Copy payloads insert a fresh clone on every paste.
//! - Cut payloads are single-use: a successful paste clears the clipboard.
//! - Selection problems are recoverable errors, never panics.

use crate::model::passage::PassageId;
use crate::model::topic::TopicId;
use crate::service::clipboard::ClipboardPayload;
use crate::service::selection::{SelectedItem, SelectionContext};
use crate::tree::{TopicTree, TreeError};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by topic operations.
pub type OpsResult<T> = Result<T, TopicOpsError>;

/// Errors from topic operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicOpsError {
    /// Operation needs a selected item of this kind (`topic`/`passage`).
    InvalidSelection(&'static str),
    /// Operation is not allowed on the selected item.
    InvalidOperation(&'static str),
    /// Topic name is blank after trim.
    InvalidName,
    /// Tree-level failure.
    Tree(TreeError),
}

impl Display for TopicOpsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSelection(kind) => write!(f, "no {kind} selected"),
            Self::InvalidOperation(reason) => write!(f, "invalid operation: {reason}"),
            Self::InvalidName => write!(f, "topic name must not be blank"),
            Self::Tree(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TopicOpsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TreeError> for TopicOpsError {
    fn from(value: TreeError) -> Self {
        match value {
            TreeError::RootImmovable => {
                Self::InvalidOperation("root topic cannot be moved or removed")
            }
            other => Self::Tree(other),
        }
    }
}

/// Result of one paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteOutcome {
    /// Clipboard was empty.
    NothingToPaste,
    /// Target is the item's current parent; nothing changed.
    SameParent,
    /// Cut item now lives under the target.
    Moved(SelectedItem),
    /// A new copy (carried id) was inserted under the target.
    Copied(SelectedItem),
}

/// Operations manager over one topic tree and one selection context.
pub struct TopicOperations<C: SelectionContext> {
    tree: TopicTree,
    context: C,
    clipboard: Option<ClipboardPayload>,
}

impl<C: SelectionContext> TopicOperations<C> {
    pub fn new(tree: TopicTree, context: C) -> Self {
        Self {
            tree,
            context,
            clipboard: None,
        }
    }

    pub fn tree(&self) -> &TopicTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut TopicTree {
        &mut self.tree
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn clipboard(&self) -> Option<&ClipboardPayload> {
        self.clipboard.as_ref()
    }

    pub fn clear_clipboard(&mut self) {
        self.clipboard = None;
    }

    pub fn into_parts(self) -> (TopicTree, C) {
        (self.tree, self.context)
    }

    /// Appends detached `topic` under the selected topic.
    pub fn add_subtopic(&mut self, topic: TopicId) -> OpsResult<()> {
        let parent = self.selected_topic()?;
        self.tree.add_subtopic(parent, topic)?;
        debug!("event=subtopic_add module=topic_ops status=ok");
        Ok(())
    }

    /// Detaches the selected topic from its parent and returns it.
    ///
    /// # Errors
    /// - `InvalidSelection` when no topic is selected.
    /// - `InvalidOperation` for the root or an already detached topic.
    pub fn remove_subtopic(&mut self) -> OpsResult<TopicId> {
        let topic = self.selected_topic()?;
        if topic == self.tree.root() {
            return Err(TopicOpsError::InvalidOperation(
                "root topic cannot be moved or removed",
            ));
        }
        let parent = self
            .tree
            .topic(topic)
            .ok_or(TreeError::TopicNotFound(topic))?
            .parent()
            .ok_or(TopicOpsError::InvalidOperation("topic has no parent"))?;
        self.tree.remove_subtopic(parent, topic)?;
        debug!("event=subtopic_remove module=topic_ops status=ok");
        Ok(topic)
    }

    /// Appends detached `passage` to the selected topic.
    pub fn add_passage(&mut self, passage: PassageId) -> OpsResult<()> {
        let topic = self.selected_topic()?;
        self.tree.add_passage(topic, passage)?;
        debug!("event=passage_add module=topic_ops status=ok");
        Ok(())
    }

    /// Detaches the selected passage from the selected topic and returns it.
    pub fn remove_passage(&mut self) -> OpsResult<PassageId> {
        let topic = self.selected_topic()?;
        let passage = self
            .context
            .selected_passage()
            .ok_or(TopicOpsError::InvalidSelection("passage"))?;
        self.tree.remove_passage(topic, passage)?;
        debug!("event=passage_remove module=topic_ops status=ok");
        Ok(passage)
    }

    /// Stages the focused item for a move. Returns `false` when nothing is selected.
    pub fn cut(&mut self) -> bool {
        self.stage(false)
    }

    /// Stages the focused item for copying. Returns `false` when nothing is selected.
    pub fn copy(&mut self) -> bool {
        self.stage(true)
    }

    /// Applies the staged payload to the selected topic.
    ///
    /// # Errors
    /// - `InvalidSelection` when no target topic is selected.
    /// - `Tree` when the staged item no longer exists (the clipboard is
    ///   cleared) or a topic would be moved into its own subtree.
    pub fn paste(&mut self) -> OpsResult<PasteOutcome> {
        let Some(payload) = self.clipboard else {
            debug!("event=paste module=topic_ops status=skip reason=empty_clipboard");
            return Ok(PasteOutcome::NothingToPaste);
        };
        let target = self.selected_topic()?;
        if !self.tree.contains_topic(target) {
            return Err(TreeError::TopicNotFound(target).into());
        }

        let source_parent = match self.source_parent(payload.item()) {
            Ok(parent) => parent,
            Err(err) => {
                self.clipboard = None;
                return Err(err.into());
            }
        };
        if source_parent == Some(target) {
            debug!(
                "event=paste module=topic_ops status=skip reason=same_parent mode={}",
                payload.mode()
            );
            return Ok(PasteOutcome::SameParent);
        }

        let outcome = match (payload.item(), payload.keep_original()) {
            (SelectedItem::Passage(passage), true) => {
                let copy = self.tree.clone_passage(passage)?;
                self.tree.add_passage(target, copy)?;
                PasteOutcome::Copied(SelectedItem::Passage(copy))
            }
            (SelectedItem::Passage(passage), false) => {
                match source_parent {
                    Some(from) => self.tree.move_passage(from, passage, target)?,
                    None => self.tree.add_passage(target, passage)?,
                }
                PasteOutcome::Moved(SelectedItem::Passage(passage))
            }
            (SelectedItem::Topic(topic), true) => {
                let copy = self.tree.clone_topic(topic)?;
                self.tree.add_subtopic(target, copy)?;
                PasteOutcome::Copied(SelectedItem::Topic(copy))
            }
            (SelectedItem::Topic(topic), false) => {
                self.tree.move_subtopic(topic, target)?;
                PasteOutcome::Moved(SelectedItem::Topic(topic))
            }
        };

        if !payload.keep_original() {
            self.clipboard = None;
        }
        info!(
            "event=paste module=topic_ops status=ok mode={}",
            payload.mode()
        );
        Ok(outcome)
    }

    /// Moves `passage` from `from` to `to` without touching the clipboard.
    pub fn move_passage(
        &mut self,
        from: TopicId,
        passage: PassageId,
        to: TopicId,
    ) -> OpsResult<()> {
        self.tree.move_passage(from, passage, to)?;
        debug!("event=passage_move module=topic_ops status=ok");
        Ok(())
    }

    /// Inserts an independent copy of `passage` (held by `from`) into `to`.
    pub fn copy_passage(
        &mut self,
        from: TopicId,
        passage: PassageId,
        to: TopicId,
    ) -> OpsResult<PassageId> {
        let parent = self
            .tree
            .passage(passage)
            .ok_or(TreeError::PassageNotFound(passage))?
            .parent();
        if parent != Some(from) {
            return Err(TreeError::PassageNotInTopic {
                topic: from,
                passage,
            }
            .into());
        }
        if !self.tree.contains_topic(to) {
            return Err(TreeError::TopicNotFound(to).into());
        }

        let copy = self.tree.clone_passage(passage)?;
        self.tree.add_passage(to, copy)?;
        debug!("event=passage_copy module=topic_ops status=ok");
        Ok(copy)
    }

    /// Renames the selected topic.
    ///
    /// The stored name, and the one carried by `NameChanged`, is `name` with
    /// surrounding whitespace trimmed.
    ///
    /// # Errors
    /// - `InvalidSelection` when no topic is selected.
    /// - `InvalidName` when `name` is blank after trimming; the tree is untouched.
    pub fn set_topic_name(&mut self, name: impl Into<String>) -> OpsResult<()> {
        let topic = self.selected_topic()?;
        let normalized = normalize_topic_name(name.into())?;
        self.tree.set_topic_name(topic, normalized)?;
        debug!("event=topic_rename module=topic_ops status=ok");
        Ok(())
    }

    fn selected_topic(&self) -> OpsResult<TopicId> {
        self.context
            .selected_topic()
            .ok_or(TopicOpsError::InvalidSelection("topic"))
    }

    fn stage(&mut self, keep_original: bool) -> bool {
        let Some(item) = self.context.selected_item() else {
            debug!("event=clipboard_stage module=topic_ops status=skip reason=no_selection");
            return false;
        };
        let payload = ClipboardPayload::new(item, keep_original);
        debug!(
            "event=clipboard_stage module=topic_ops status=ok mode={}",
            payload.mode()
        );
        self.clipboard = Some(payload);
        true
    }

    fn source_parent(&self, item: SelectedItem) -> Result<Option<TopicId>, TreeError> {
        match item {
            SelectedItem::Topic(topic) => self
                .tree
                .topic(topic)
                .map(|node| node.parent())
                .ok_or(TreeError::TopicNotFound(topic)),
            SelectedItem::Passage(passage) => self
                .tree
                .passage(passage)
                .map(|record| record.parent())
                .ok_or(TreeError::PassageNotFound(passage)),
        }
    }
}

fn normalize_topic_name(value: String) -> OpsResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TopicOpsError::InvalidName);
    }
    Ok(trimmed.to_string())
}
