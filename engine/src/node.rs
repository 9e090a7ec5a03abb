//! Node definitions for the decision tree
//!
//! This module defines the core Node types that make up the 20 Questions
//! decision tree: internal Question nodes and leaf Answer nodes, stored in a
//! flat append-only arena addressed by integer id. Tree growth (the learning
//! step after a rejected guess) happens in place via `DecisionTree::learn`.

use std::fmt;

/// Node ID type (index into flat array storage)
pub type NodeId = u32;

/// Node classification as it appears in the persisted tree format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Internal node holding a yes/no question
    Question,
    /// Leaf node holding a guessable item label
    Answer,
}

impl NodeKind {
    /// Wire name used in the tree file format (case-sensitive).
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Question => "question",
            NodeKind::Answer => "answer",
        }
    }

    /// Parse a wire name. Anything other than an exact match is `None`.
    pub fn parse(s: &str) -> Option<NodeKind> {
        match s {
            "question" => Some(NodeKind::Question),
            "answer" => Some(NodeKind::Answer),
            _ => None,
        }
    }
}

/// Represents a node in the decision tree
///
/// Question nodes branch on a yes/no response (`left` = yes, `right` = no).
/// Answer nodes are structurally leaves: they carry no child references, so
/// the traversal contract ("answers are leaves") holds by construction.
/// `parent` is a non-owning back-reference used for upward lookup during
/// learning and for root detection; ownership of subtrees flows only through
/// `left`/`right`.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Internal yes/no question
    Question {
        /// Unique identifier (index in the store)
        id: NodeId,
        /// Question text
        value: String,
        /// Parent node ID (None for the root)
        parent: Option<NodeId>,
        /// Child taken on a "yes" response
        left: Option<NodeId>,
        /// Child taken on a "no" response
        right: Option<NodeId>,
    },
    /// Leaf guess
    Answer {
        /// Unique identifier (index in the store)
        id: NodeId,
        /// Item label presented as the guess
        value: String,
        /// Parent node ID (None only if a lone answer is the root)
        parent: Option<NodeId>,
    },
}

impl Node {
    /// Construct a Question node.
    pub fn question(
        id: NodeId,
        value: impl Into<String>,
        parent: Option<NodeId>,
        left: Option<NodeId>,
        right: Option<NodeId>,
    ) -> Self {
        Node::Question { id, value: value.into(), parent, left, right }
    }

    /// Construct an Answer node.
    pub fn answer(id: NodeId, value: impl Into<String>, parent: Option<NodeId>) -> Self {
        Node::Answer { id, value: value.into(), parent }
    }

    /// Get the node ID
    pub fn id(&self) -> NodeId {
        match self {
            Node::Question { id, .. } => *id,
            Node::Answer { id, .. } => *id,
        }
    }

    pub(crate) fn set_id(&mut self, new_id: NodeId) {
        match self {
            Node::Question { id, .. } => *id = new_id,
            Node::Answer { id, .. } => *id = new_id,
        }
    }

    /// Get the node kind
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Question { .. } => NodeKind::Question,
            Node::Answer { .. } => NodeKind::Answer,
        }
    }

    /// Get the question text or item label
    pub fn value(&self) -> &str {
        match self {
            Node::Question { value, .. } => value,
            Node::Answer { value, .. } => value,
        }
    }

    /// Get the parent node ID
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Question { parent, .. } => *parent,
            Node::Answer { parent, .. } => *parent,
        }
    }

    /// Re-point the parent back-reference.
    pub fn set_parent(&mut self, new_parent: Option<NodeId>) {
        match self {
            Node::Question { parent, .. } => *parent = new_parent,
            Node::Answer { parent, .. } => *parent = new_parent,
        }
    }

    /// Child taken on a "yes" response (None for Answer nodes)
    pub fn left(&self) -> Option<NodeId> {
        match self {
            Node::Question { left, .. } => *left,
            Node::Answer { .. } => None,
        }
    }

    /// Child taken on a "no" response (None for Answer nodes)
    pub fn right(&self) -> Option<NodeId> {
        match self {
            Node::Question { right, .. } => *right,
            Node::Answer { .. } => None,
        }
    }

    /// Child for a yes/no response: `left` for yes, `right` for no.
    pub fn child(&self, yes: bool) -> Option<NodeId> {
        if yes {
            self.left()
        } else {
            self.right()
        }
    }

    /// Check if this is an Answer (leaf) node
    pub fn is_answer(&self) -> bool {
        matches!(self, Node::Answer { .. })
    }

    /// Check if this is a Question node
    pub fn is_question(&self) -> bool {
        matches!(self, Node::Question { .. })
    }

    /// Replace whichever child edge currently points at `old` with `new`.
    /// Returns true if an edge was rewired. No-op on Answer nodes.
    pub fn replace_child(&mut self, old: NodeId, new: NodeId) -> bool {
        if let Node::Question { left, right, .. } = self {
            if *left == Some(old) {
                *left = Some(new);
                return true;
            }
            if *right == Some(old) {
                *right = Some(new);
                return true;
            }
        }
        false
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Node(ID: {}, Value: {})", self.kind().as_str(), self.id(), self.value())
    }
}

/// Errors from tree-level operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("node {0} is not present in the store")]
    MissingNode(NodeId),
}

/// Append-only node arena addressed by `NodeId`.
///
/// Slots may be holes: the file format permits sparse ids, so the store is a
/// `Vec<Option<Node>>` sized to the largest observed id. Ids are never reused
/// and nodes are never removed; `append` is the only steady-state mutator and
/// never invalidates a previously issued id.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    slots: Vec<Option<Node>>,
}

impl NodeStore {
    /// Create a new empty store
    pub fn new() -> Self {
        NodeStore { slots: Vec::new() }
    }

    /// Create a store of `len` empty slots, ready for sparse population.
    pub fn with_slots(len: usize) -> Self {
        NodeStore { slots: vec![None; len] }
    }

    /// Number of slots, holes included (the next id to be assigned).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the store has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The id `append` would assign next.
    pub fn next_id(&self) -> NodeId {
        self.slots.len() as NodeId
    }

    /// Get a node by ID (None for holes and out-of-range ids)
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id as usize)?.as_ref()
    }

    /// Get a mutable reference to a node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id as usize)?.as_mut()
    }

    /// Append a node, assigning it the next sequential id. Returns that id.
    pub fn append(&mut self, mut node: Node) -> NodeId {
        let id = self.next_id();
        node.set_id(id);
        self.slots.push(Some(node));
        id
    }

    /// Place a node at the slot matching its id, extending with holes if the
    /// slot does not exist yet. Overwrites any previous occupant. Used only
    /// while deserializing; steady-state growth goes through `append`.
    pub fn set(&mut self, node: Node) {
        let idx = node.id() as usize;
        if idx >= self.slots.len() {
            self.slots.resize(idx + 1, None);
        }
        self.slots[idx] = Some(node);
    }

    /// Iterate over populated nodes in id order, skipping holes.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    /// Number of populated slots.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Decision tree: a node store plus the id of its root.
///
/// The root id is redirected only by `learn`, and only when the rejected
/// guess was itself the root. The root node's identity otherwise never
/// changes for the life of the process.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    store: NodeStore,
    root: NodeId,
}

impl DecisionTree {
    /// Wrap a populated store with its root id.
    pub fn new(store: NodeStore, root: NodeId) -> Self {
        DecisionTree { store, root }
    }

    /// Id of the current root.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// The current root node.
    pub fn root(&self) -> Option<&Node> {
        self.store.get(self.root)
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.store.get(id)
    }

    /// Access the underlying store.
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Number of slots in the underlying store.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the underlying store is empty
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Grow the tree after a rejected guess.
    ///
    /// Splices a new Question node into the spot occupied by `failing`,
    /// demoting `failing` one level and adding a new Answer for `item`. The
    /// new answer sits on the branch the user declared (`item_answers_yes`:
    /// left/yes, otherwise right/no) and the failing node on the opposite
    /// branch. Exactly two nodes are appended (question first, then answer,
    /// taking the next two sequential ids); the only pre-existing fields
    /// touched are the grandparent's child edge and `failing`'s parent.
    /// If `failing` was the root, the new question becomes the root.
    ///
    /// Returns `(question_id, answer_id)`.
    pub fn learn(
        &mut self,
        failing: NodeId,
        question: impl Into<String>,
        item: impl Into<String>,
        item_answers_yes: bool,
    ) -> Result<(NodeId, NodeId), TreeError> {
        let old_parent = self
            .store
            .get(failing)
            .ok_or(TreeError::MissingNode(failing))?
            .parent();
        if let Some(parent_id) = old_parent {
            if self.store.get(parent_id).is_none() {
                return Err(TreeError::MissingNode(parent_id));
            }
        }

        let question_id = self.store.next_id();
        let answer_id = question_id + 1;
        let (left, right) = if item_answers_yes {
            (answer_id, failing)
        } else {
            (failing, answer_id)
        };
        self.store.append(Node::question(
            question_id,
            question,
            old_parent,
            Some(left),
            Some(right),
        ));
        self.store.append(Node::answer(answer_id, item, Some(question_id)));

        match old_parent {
            Some(parent_id) => {
                // Populated, checked at entry.
                if let Some(parent) = self.store.get_mut(parent_id) {
                    parent.replace_child(failing, question_id);
                }
            }
            None => self.root = question_id,
        }
        if let Some(node) = self.store.get_mut(failing) {
            node.set_parent(Some(question_id));
        }

        Ok((question_id, answer_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3-node starter tree: "Is it alive?" with Dog on yes, fallback on no.
    fn starter_tree() -> DecisionTree {
        let mut store = NodeStore::new();
        let root = store.append(Node::question(0, "Is it alive?", None, Some(1), Some(2)));
        store.append(Node::answer(1, "Dog", Some(0)));
        store.append(Node::answer(2, "Not known yet", Some(0)));
        DecisionTree::new(store, root)
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let mut store = NodeStore::new();
        let a = store.append(Node::answer(99, "Cat", None));
        let b = store.append(Node::answer(99, "Dog", None));
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(store.get(0).unwrap().value(), "Cat");
        assert_eq!(store.get(1).unwrap().value(), "Dog");
    }

    #[test]
    fn test_get_out_of_range_is_none() {
        let store = NodeStore::new();
        assert!(store.get(0).is_none());
        assert!(store.get(42).is_none());
    }

    #[test]
    fn test_store_tolerates_holes() {
        let mut store = NodeStore::with_slots(4);
        store.set(Node::answer(3, "Rock", None));
        assert_eq!(store.len(), 4);
        assert_eq!(store.count(), 1);
        assert!(store.get(0).is_none());
        assert_eq!(store.get(3).unwrap().value(), "Rock");
        // Appends continue past the holes, never reusing them.
        assert_eq!(store.append(Node::answer(0, "Paper", None)), 4);
    }

    #[test]
    fn test_answer_nodes_have_no_children() {
        let node = Node::answer(7, "Dog", Some(0));
        assert!(node.is_answer());
        assert!(node.left().is_none());
        assert!(node.right().is_none());
        assert!(node.child(true).is_none());
        assert!(node.child(false).is_none());
    }

    #[test]
    fn test_child_follows_yes_left_no_right() {
        let node = Node::question(0, "Is it alive?", None, Some(1), Some(2));
        assert_eq!(node.child(true), Some(1));
        assert_eq!(node.child(false), Some(2));
    }

    #[test]
    fn test_display_matches_store_fields() {
        let node = Node::question(3, "Is it alive?", None, Some(1), Some(2));
        assert_eq!(node.to_string(), "question Node(ID: 3, Value: Is it alive?)");
        let node = Node::answer(4, "Dog", Some(3));
        assert_eq!(node.to_string(), "answer Node(ID: 4, Value: Dog)");
    }

    #[test]
    fn test_learn_grows_store_by_two() {
        let mut tree = starter_tree();
        let before = tree.len();
        let (q, a) = tree.learn(2, "Is it heavier than a brick?", "Rock", false).unwrap();
        assert_eq!(tree.len(), before + 2);
        assert_eq!(q, 3);
        assert_eq!(a, 4);
    }

    #[test]
    fn test_learn_places_new_item_on_declared_branch() {
        // "Rock" answers no: new answer on the right, old leaf demoted left.
        let mut tree = starter_tree();
        let (q, a) = tree.learn(2, "Is it heavier than a brick?", "Rock", false).unwrap();
        let new_question = tree.get(q).unwrap();
        assert_eq!(new_question.left(), Some(2));
        assert_eq!(new_question.right(), Some(a));

        // "Bird" answers yes: mirrored wiring.
        let mut tree = starter_tree();
        let (q, a) = tree.learn(1, "Can it fly?", "Bird", true).unwrap();
        let new_question = tree.get(q).unwrap();
        assert_eq!(new_question.left(), Some(a));
        assert_eq!(new_question.right(), Some(1));
    }

    #[test]
    fn test_learn_rewires_grandparent_edge() {
        let mut tree = starter_tree();
        let (q, _) = tree.learn(2, "Is it heavier than a brick?", "Rock", false).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(root.left(), Some(1), "yes branch untouched");
        assert_eq!(root.right(), Some(q), "no branch re-pointed at new question");
        assert_eq!(tree.get(q).unwrap().parent(), Some(0));
        assert_eq!(tree.get(2).unwrap().parent(), Some(q), "failing node demoted");
    }

    #[test]
    fn test_learn_only_touches_failing_edge() {
        let mut tree = starter_tree();
        let untouched = tree.get(1).unwrap().clone();
        tree.learn(2, "Is it heavier than a brick?", "Rock", false).unwrap();
        assert_eq!(tree.get(1).unwrap(), &untouched);
        assert_eq!(tree.get(2).unwrap().value(), "Not known yet", "value kept");
    }

    #[test]
    fn test_learn_on_root_answer_redirects_root() {
        let mut store = NodeStore::new();
        let root = store.append(Node::answer(0, "Dog", None));
        let mut tree = DecisionTree::new(store, root);

        let (q, a) = tree.learn(root, "Does it bark?", "Cat", false).unwrap();
        assert_eq!(tree.root_id(), q);
        let new_root = tree.root().unwrap();
        assert_eq!(new_root.parent(), None);
        assert_eq!(new_root.left(), Some(root));
        assert_eq!(new_root.right(), Some(a));
        assert_eq!(tree.get(root).unwrap().parent(), Some(q));

        // Exactly one rootless node remains.
        let rootless = tree.store().iter().filter(|n| n.parent().is_none()).count();
        assert_eq!(rootless, 1);
    }

    #[test]
    fn test_learn_ids_monotonic_across_events() {
        let mut tree = starter_tree();
        let mut last = tree.len() as NodeId;
        let mut failing = 2;
        for i in 0..5 {
            let (q, a) = tree
                .learn(failing, format!("Question {i}?"), format!("Item {i}"), false)
                .unwrap();
            assert_eq!(q, last);
            assert_eq!(a, last + 1);
            last += 2;
            failing = a;
        }
        assert_eq!(tree.len(), 13);
    }

    #[test]
    fn test_learn_missing_node_is_reported() {
        let mut tree = starter_tree();
        let err = tree.learn(42, "Is it real?", "Ghost", true).unwrap_err();
        assert_eq!(err, TreeError::MissingNode(42));
        assert_eq!(tree.len(), 3, "failed learn must not grow the store");
    }
}
