//! Selection context consumed by topic operations.
//!
//! # Responsibility
//! - Describe which topic and passage the user currently has selected.
//! - Report which of the two is in focus for cut/copy.

use crate::model::passage::PassageId;
use crate::model::topic::TopicId;

/// Item a cut/copy acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectedItem {
    Topic(TopicId),
    Passage(PassageId),
}

/// Which selection kind is in focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionFocus {
    #[default]
    Topic,
    Passage,
}

/// Read-only view of the user's current selection.
pub trait SelectionContext {
    fn selected_topic(&self) -> Option<TopicId>;
    fn selected_passage(&self) -> Option<PassageId>;
    /// Focused item, or `None` when the focused kind has no selection.
    fn selected_item(&self) -> Option<SelectedItem>;
}

/// Plain selection state, as kept by a view or a test harness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    topic: Option<TopicId>,
    passage: Option<PassageId>,
    focus: SelectionFocus,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `topic` and moves focus to the topic pane.
    pub fn select_topic(&mut self, topic: Option<TopicId>) {
        self.topic = topic;
        self.focus = SelectionFocus::Topic;
    }

    /// Selects `passage` and moves focus to the passage pane.
    pub fn select_passage(&mut self, passage: Option<PassageId>) {
        self.passage = passage;
        self.focus = SelectionFocus::Passage;
    }

    pub fn set_focus(&mut self, focus: SelectionFocus) {
        self.focus = focus;
    }

    pub fn focus(&self) -> SelectionFocus {
        self.focus
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl SelectionContext for SelectionState {
    fn selected_topic(&self) -> Option<TopicId> {
        self.topic
    }

    fn selected_passage(&self) -> Option<PassageId> {
        self.passage
    }

    fn selected_item(&self) -> Option<SelectedItem> {
        match self.focus {
            SelectionFocus::Topic => self.topic.map(SelectedItem::Topic),
            SelectionFocus::Passage => self.passage.map(SelectedItem::Passage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectedItem, SelectionContext, SelectionFocus, SelectionState};
    use uuid::Uuid;

    #[test]
    fn focus_decides_selected_item() {
        let topic = Uuid::new_v4();
        let passage = Uuid::new_v4();
        let mut state = SelectionState::new();
        assert_eq!(state.selected_item(), None);

        state.select_topic(Some(topic));
        assert_eq!(state.selected_item(), Some(SelectedItem::Topic(topic)));

        state.select_passage(Some(passage));
        assert_eq!(state.selected_item(), Some(SelectedItem::Passage(passage)));
        assert_eq!(state.selected_topic(), Some(topic));

        state.set_focus(SelectionFocus::Topic);
        assert_eq!(state.selected_item(), Some(SelectedItem::Topic(topic)));
    }

    #[test]
    fn focused_kind_without_selection_yields_none() {
        let mut state = SelectionState::new();
        state.select_topic(Some(Uuid::new_v4()));
        state.set_focus(SelectionFocus::Passage);
        assert_eq!(state.selected_item(), None);
    }
}
