//! Clipboard payload staged by cut/copy.

use crate::model::passage::PassageId;
use crate::model::topic::TopicId;
use crate::service::selection::SelectedItem;

/// Item staged for paste.
///
/// `keep_original` is `true` for copy and `false` for cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardPayload {
    Topic { topic: TopicId, keep_original: bool },
    Passage { passage: PassageId, keep_original: bool },
}

impl ClipboardPayload {
    pub fn new(item: SelectedItem, keep_original: bool) -> Self {
        match item {
            SelectedItem::Topic(topic) => Self::Topic {
                topic,
                keep_original,
            },
            SelectedItem::Passage(passage) => Self::Passage {
                passage,
                keep_original,
            },
        }
    }

    pub fn item(&self) -> SelectedItem {
        match *self {
            Self::Topic { topic, .. } => SelectedItem::Topic(topic),
            Self::Passage { passage, .. } => SelectedItem::Passage(passage),
        }
    }

    pub fn keep_original(&self) -> bool {
        match *self {
            Self::Topic { keep_original, .. } | Self::Passage { keep_original, .. } => {
                keep_original
            }
        }
    }

    /// Stable mode name used in log lines.
    pub(crate) fn mode(&self) -> &'static str {
        if self.keep_original() {
            "copy"
        } else {
            "cut"
        }
    }
}
