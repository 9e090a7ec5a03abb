//! twentyq Tree Builder - tree construction and deserialization
//!
//! This crate turns external inputs into a `DecisionTree` for the engine:
//! either a persisted tree file (one colon-delimited node per line) or the
//! minimal 3-node tree bootstrapped from the user's first question.
//!
//! File format, one node per line:
//!
//! ```text
//! id:kind:value:parent:left:right
//! ```
//!
//! `kind` is `question` or `answer` (exact match); `parent`/`left`/`right`
//! are decimal ids or the literal `None`; `value` may not contain `:`.
//!
//! The loader is tolerant of malformed rows (they are skipped silently) but
//! intolerant of unreadable files and of structural damage: an I/O failure,
//! a dangling reference, or an ambiguous root fails the whole load, and the
//! caller falls back to the interactive bootstrap.

use std::fs;
use std::io;
use std::path::Path;

use twentyq_engine::node::{DecisionTree, Node, NodeId, NodeKind, NodeStore};

/// Item label of the fallback leaf in a bootstrapped tree.
pub const UNKNOWN_ITEM: &str = "Not known yet";

/// Errors that fail a tree load. Every variant is recovered by the caller
/// via the interactive bootstrap; none is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("error reading tree file: {0}")]
    Io(#[from] io::Error),

    #[error("node {node} references missing node {target} via {field}")]
    DanglingReference {
        node: NodeId,
        field: &'static str,
        target: NodeId,
    },

    #[error("no root node found")]
    NoRoot,

    #[error("multiple root nodes: {0} and {1}")]
    MultipleRoots(NodeId, NodeId),
}

/// Load a decision tree from a file.
///
/// An unreadable file is `LoadError::Io`; everything else is delegated to
/// `parse_tree`.
pub fn load_tree(path: impl AsRef<Path>) -> Result<DecisionTree, LoadError> {
    let text = fs::read_to_string(path)?;
    parse_tree(text.lines())
}

/// Parse a decision tree from node rows.
///
/// Two passes: the first sizes the store to the largest parseable leading id
/// and populates slots row by row (malformed rows skipped); the second
/// validates that every `parent`/`left`/`right` reference resolves to a
/// populated slot and that exactly one populated node is rootless.
pub fn parse_tree<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<DecisionTree, LoadError> {
    let lines: Vec<&str> = lines.into_iter().collect();

    let max_id = lines
        .iter()
        .filter_map(|line| leading_id(line))
        .max()
        .ok_or(LoadError::NoRoot)?;

    let mut store = NodeStore::with_slots(max_id as usize + 1);
    for line in &lines {
        if let Some(node) = parse_row(line) {
            store.set(node);
        }
    }

    for node in store.iter() {
        let refs = [
            ("parent", node.parent()),
            ("left", node.left()),
            ("right", node.right()),
        ];
        for (field, target) in refs {
            if let Some(target) = target {
                if store.get(target).is_none() {
                    return Err(LoadError::DanglingReference {
                        node: node.id(),
                        field,
                        target,
                    });
                }
            }
        }
    }

    let mut root = None;
    for node in store.iter() {
        if node.parent().is_none() {
            match root {
                None => root = Some(node.id()),
                Some(first) => return Err(LoadError::MultipleRoots(first, node.id())),
            }
        }
    }
    let root = root.ok_or(LoadError::NoRoot)?;

    Ok(DecisionTree::new(store, root))
}

/// Build the minimal starter tree from the user's first question and a
/// "yes" example: root Question, example on the yes branch, the
/// `UNKNOWN_ITEM` fallback on the no branch.
pub fn bootstrap_tree(
    question: impl Into<String>,
    yes_example: impl Into<String>,
) -> DecisionTree {
    let mut store = NodeStore::new();
    let root = store.append(Node::question(0, question, None, Some(1), Some(2)));
    store.append(Node::answer(1, yes_example, Some(0)));
    store.append(Node::answer(2, UNKNOWN_ITEM, Some(0)));
    DecisionTree::new(store, root)
}

/// Leading id field of a row, if it parses.
fn leading_id(line: &str) -> Option<NodeId> {
    line.split(':').next()?.trim().parse().ok()
}

/// Parse one row into a node. Any malformed row — fewer than six fields, or
/// an id/kind/reference field that does not parse — yields `None` and is
/// skipped by the caller. Child fields on `answer` rows are ignored: Answer
/// nodes are structurally leaves and the traversal never reads them.
fn parse_row(line: &str) -> Option<Node> {
    let parts: Vec<&str> = line.trim().split(':').collect();
    if parts.len() < 6 {
        return None;
    }

    let id: NodeId = parts[0].trim().parse().ok()?;
    let kind = NodeKind::parse(parts[1])?;
    let value = parts[2];
    let parent = parse_ref(parts[3])?;
    let left = parse_ref(parts[4])?;
    let right = parse_ref(parts[5])?;

    match kind {
        NodeKind::Question => Some(Node::question(id, value, parent, left, right)),
        NodeKind::Answer => Some(Node::answer(id, value, parent)),
    }
}

/// A reference field: the literal `None`, or a decimal id. Outer `None`
/// means the field is malformed and the row must be skipped.
fn parse_ref(field: &str) -> Option<Option<NodeId>> {
    let field = field.trim();
    if field == "None" {
        Some(None)
    } else {
        field.parse().ok().map(Some)
    }
}
