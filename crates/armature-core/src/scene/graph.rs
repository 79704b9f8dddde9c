// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! An arena-backed scene tree.
//!
//! Nodes live in a flat `Vec` and refer to each other through [`NodeId`] indices.
//! Nodes are never removed from the arena; detaching a node only unlinks it.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

use super::SceneNode;

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one [`SceneGraph`] for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphId(u64);

impl GraphId {
    fn next() -> Self {
        Self(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Index of a node inside its [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node addressed from outside its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    /// The graph the node lives in.
    pub graph: GraphId,
    /// The node inside that graph.
    pub node: NodeId,
}

/// A tree (or forest) of [`SceneNode`]s.
#[derive(Debug)]
pub struct SceneGraph {
    id: GraphId,
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    /// Creates an empty graph with a fresh [`GraphId`].
    pub fn new() -> Self {
        Self {
            id: GraphId::next(),
            nodes: Vec::new(),
        }
    }

    /// The identifier of this graph.
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a detached node and returns its id.
    pub fn add(&mut self, mut node: SceneNode) -> NodeId {
        node.parent = None;
        node.children.clear();
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Adds a node as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, node: SceneNode) -> NodeId {
        let id = self.add(node);
        self.attach(parent, id);
        id
    }

    /// Returns the node, or `None` if the id is not from this graph.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.index())
    }

    /// Returns the node mutably, or `None` if the id is not from this graph.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.index())
    }

    /// Returns a reference usable outside this graph.
    pub fn node_ref(&self, id: NodeId) -> NodeRef {
        NodeRef {
            graph: self.id,
            node: id,
        }
    }

    /// Returns `true` if `node_ref` points into this graph at an existing node.
    pub fn contains(&self, node_ref: NodeRef) -> bool {
        node_ref.graph == self.id && node_ref.node.index() < self.nodes.len()
    }

    /// Makes `child` the last child of `parent`, unlinking it from any previous parent.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.is_ancestor(child, parent) {
            log::warn!("Refusing to attach node {child} under its own descendant {parent}.");
            return;
        }
        self.detach(child);
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    /// Unlinks `child` from its parent. The node stays in the arena.
    pub fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|c| *c != child);
        }
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes[node.index()].parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.index()].parent;
        }
        false
    }

    /// Returns the subtree rooted at `root` in depth-first pre-order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.index()].children.iter().rev().copied());
        }
        out
    }

    /// Copies the subtree rooted at `root` into this arena and returns the detached copy.
    ///
    /// Node data is cloned as is, so skeletons keep pointing at the original bones.
    pub fn copy_subtree(&mut self, root: NodeId) -> NodeId {
        let mut copies: Vec<(NodeId, NodeId)> = Vec::new();
        for id in self.descendants(root) {
            let node = self.nodes[id.index()].clone();
            let parent = node
                .parent
                .and_then(|p| copies.iter().find(|(source, _)| *source == p))
                .map(|(_, copy)| *copy);
            let copy = match parent {
                Some(parent) if id != root => self.add_child(parent, node),
                _ => self.add(node),
            };
            copies.push((id, copy));
        }
        copies.first().map(|(_, copy)| *copy).unwrap_or(root)
    }

    /// Finds the first node named `name` in the subtree rooted at `root`.
    pub fn find_by_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|id| self.nodes[id.index()].name == name)
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for SceneGraph {
    type Output = SceneNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for SceneGraph {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodeKind;

    fn sample() -> (SceneGraph, NodeId, NodeId, NodeId) {
        let mut graph = SceneGraph::new();
        let root = graph.add(SceneNode::new("Root", NodeKind::Group));
        let hips = graph.add_child(root, SceneNode::new("Hips", NodeKind::Bone));
        let spine = graph.add_child(hips, SceneNode::new("Spine", NodeKind::Bone));
        (graph, root, hips, spine)
    }

    #[test]
    fn test_preorder_descendants() {
        let (mut graph, root, hips, spine) = sample();
        let body = graph.add_child(root, SceneNode::new("Body", NodeKind::Mesh));
        assert_eq!(graph.descendants(root), vec![root, hips, spine, body]);
        assert_eq!(graph.find_by_name(root, "Spine"), Some(spine));
        assert_eq!(graph.find_by_name(hips, "Body"), None);
    }

    #[test]
    fn test_attach_moves_between_parents() {
        let (mut graph, root, hips, spine) = sample();
        graph.attach(root, spine);
        assert_eq!(graph[spine].parent(), Some(root));
        assert_eq!(graph[root].children(), &[hips, spine]);
        assert!(graph[hips].children().is_empty());

        graph.detach(spine);
        assert_eq!(graph[spine].parent(), None);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_copy_subtree_leaves_source_in_place() {
        let (mut graph, root, hips, spine) = sample();
        let copy = graph.copy_subtree(hips);

        assert_ne!(copy, hips);
        assert_eq!(graph[copy].parent(), None);
        assert_eq!(graph[hips].parent(), Some(root));
        assert_eq!(graph[hips].children(), &[spine]);

        let copied: Vec<&str> = graph
            .descendants(copy)
            .into_iter()
            .map(|id| graph[id].name.as_str())
            .collect();
        assert_eq!(copied, vec!["Hips", "Spine"]);
        assert_ne!(graph[copy].children(), &[spine]);
    }

    #[test]
    fn test_attach_rejects_cycles() {
        let (mut graph, root, _hips, spine) = sample();
        graph.attach(spine, root);
        assert_eq!(graph[root].parent(), None);
    }

    #[test]
    fn test_graph_ids_are_unique() {
        let a = SceneGraph::new();
        let b = SceneGraph::new();
        assert_ne!(a.id(), b.id());

        let (graph, root, ..) = sample();
        assert!(graph.contains(graph.node_ref(root)));
        assert!(!a.contains(graph.node_ref(root)));
    }
}
