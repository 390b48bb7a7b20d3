//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `topicbook_core` linkage outside any GUI host.
//! - Drive one cut/copy/paste round through the operations service and print
//!   the resulting outline.
//!
//! Set `TOPICBOOK_LOG_DIR` to an absolute path to also write rolling logs.

use log::warn;
use topicbook_core::{
    init_logging, LogConfig, PassageEntry, SelectionState, TopicId, TopicOperations, TopicTree,
};

fn main() {
    if let Some(log_dir) = std::env::var_os("TOPICBOOK_LOG_DIR") {
        if let Err(err) = init_logging(&LogConfig::new(log_dir)) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("topicbook_core version={}", topicbook_core::core_version());
    match build_sample() {
        Ok(tree) => print_outline(&tree, tree.root(), 0),
        Err(err) => {
            warn!("event=cli_sample module=cli status=error error={err}");
            eprintln!("sample failed: {err}");
            std::process::exit(1);
        }
    }
}

fn build_sample() -> Result<TopicTree, Box<dyn std::error::Error>> {
    let mut tree = TopicTree::new();
    let root = tree.root();
    let covenant = tree.create_topic("Covenant", "Promises to the patriarchs");
    let fall = tree.create_topic("Fall", "");
    let passage = tree.create_passage(PassageEntry::new("gen 3:15", "First gospel")?);

    let mut ops = TopicOperations::new(tree, SelectionState::new());
    ops.context_mut().select_topic(Some(root));
    ops.add_subtopic(covenant)?;
    ops.add_subtopic(fall)?;
    ops.context_mut().select_topic(Some(fall));
    ops.add_passage(passage)?;

    ops.context_mut().select_passage(Some(passage));
    ops.copy();
    ops.context_mut().select_topic(Some(covenant));
    ops.paste()?;

    let (tree, _) = ops.into_parts();
    Ok(tree)
}

fn print_outline(tree: &TopicTree, topic: TopicId, depth: usize) {
    let Some(node) = tree.topic(topic) else {
        return;
    };
    let indent = "  ".repeat(depth);
    if topic != tree.root() {
        println!("{indent}- {}", node.name());
    }
    for passage in node.passages() {
        if let Some(record) = tree.passage(*passage) {
            let entry = record.entry();
            println!("{indent}  * {entry}");
        }
    }
    let child_depth = if topic == tree.root() { depth } else { depth + 1 };
    for child in node.subtopics() {
        print_outline(tree, *child, child_depth);
    }
}
