//! Move-sequence nodes and the arena that owns them.
//!
//! A node records the full list of moves taken from the root. Nodes live in a
//! [`MoveTree`] and refer to each other by [`NodeId`]; a parent keeps the ids
//! of its children so the same extension is never inserted twice.

use crate::puzzle::Move;

/// Index of a node inside its [`MoveTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct Node {
    moves: Vec<Move>,
    depth: usize,
    children: Vec<NodeId>,
}

impl Node {
    fn root() -> Self {
        Self {
            moves: Vec::new(),
            depth: 0,
            children: Vec::new(),
        }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn last_move(&self) -> Option<Move> {
        self.moves.last().copied()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// True if this node's sequence is `prefix` followed by `movement`.
    fn extends(&self, prefix: &[Move], movement: Move) -> bool {
        match self.moves.split_last() {
            Some((&last, head)) => last == movement && head == prefix,
            None => false,
        }
    }
}

/// Arena holding every node created during one search.
#[derive(Debug, Clone)]
pub struct MoveTree {
    nodes: Vec<Node>,
}

impl Default for MoveTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveTree {
    /// Creates a tree holding only the root (empty move sequence).
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::root()],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Total nodes ever created, detached ones included. Never zero: the
    /// root is always present.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Existing child of `parent` whose sequence is the parent's plus `movement`.
    pub fn child_for(&self, parent: NodeId, movement: Move) -> Option<NodeId> {
        let prefix = &self.nodes[parent.0].moves;
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c.0].extends(prefix, movement))
    }

    /// Returns the child for `movement`, creating it if it does not exist yet.
    pub fn insert(&mut self, parent: NodeId, movement: Move) -> NodeId {
        if let Some(existing) = self.child_for(parent, movement) {
            return existing;
        }

        let parent_node = &self.nodes[parent.0];
        let mut moves = Vec::with_capacity(parent_node.moves.len() + 1);
        moves.extend_from_slice(&parent_node.moves);
        moves.push(movement);
        let depth = parent_node.depth + 1;

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            moves,
            depth,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Detaches the child for `movement`, if any. The node stays in the arena
    /// but is no longer reachable from `parent`.
    pub fn remove(&mut self, parent: NodeId, movement: Move) -> Option<NodeId> {
        let child = self.child_for(parent, movement)?;
        self.nodes[parent.0].children.retain(|&c| c != child);
        Some(child)
    }
}
