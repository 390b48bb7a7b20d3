//! Core domain logic for topic-organized Bible study notes.
//! This crate owns the topic tree, its change notifications and the
//! clipboard-style operations applied to it.

pub mod logging;
pub mod model;
pub mod service;
pub mod tree;

pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::passage::{PassageEntry, PassageId, PassageRecord};
pub use model::reference::{RangeEnd, ReferenceError, VerseRef};
pub use model::topic::{TopicId, TopicNode};
pub use service::clipboard::ClipboardPayload;
pub use service::selection::{SelectedItem, SelectionContext, SelectionFocus, SelectionState};
pub use service::topic_operations::{OpsResult, PasteOutcome, TopicOperations, TopicOpsError};
pub use tree::observer::{ObserverId, TopicEvent, TopicEventKind, TopicObserver};
pub use tree::snapshot::TopicSnapshot;
pub use tree::{TopicTree, TreeError, TreeResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
