//! Presentation stage
//!
//! The stage is the registry of presentation nodes (the page's title blocks,
//! cards, buttons, slides). Each node carries layout bounds and the
//! [`VisualProps`] that animations write to. Nothing on the stage is content
//! data; removing a node only removes its presentation state.
//!
//! The stage is a cheap, cloneable handle. Lookups on nodes that are gone
//! return `None` rather than failing, so animations targeting an unmounted
//! node simply skip it.

use crate::geometry::Rect;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::sync::{Arc, Mutex};

new_key_type! {
    /// Handle to a node on the stage
    pub struct NodeId;
}

/// Animatable presentation state of a node
///
/// Translation is in logical pixels, rotations in degrees, `shadow` is the
/// elevation strength in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualProps {
    pub opacity: f32,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub rotate_x: f32,
    pub rotate_y: f32,
    pub shadow: f32,
}

impl VisualProps {
    /// Fully visible, untransformed
    pub const REST: VisualProps = VisualProps {
        opacity: 1.0,
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        rotate_x: 0.0,
        rotate_y: 0.0,
        shadow: 0.0,
    };

    /// Check if two prop sets are approximately equal
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.opacity - other.opacity).abs() < epsilon
            && (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.scale - other.scale).abs() < epsilon
            && (self.rotate_x - other.rotate_x).abs() < epsilon
            && (self.rotate_y - other.rotate_y).abs() < epsilon
            && (self.shadow - other.shadow).abs() < epsilon
    }
}

impl Default for VisualProps {
    fn default() -> Self {
        Self::REST
    }
}

/// A node on the stage
#[derive(Clone, Debug)]
pub struct StageNode {
    /// Human readable label (class-name equivalent), not required to be unique
    pub label: String,
    /// Layout bounds in page coordinates
    pub bounds: Rect,
    /// Current presentation state
    pub props: VisualProps,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

struct StageInner {
    nodes: SlotMap<NodeId, StageNode>,
}

/// Shared handle to the presentation stage
#[derive(Clone)]
pub struct Stage {
    inner: Arc<Mutex<StageInner>>,
}

impl Stage {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StageInner {
                nodes: SlotMap::with_key(),
            })),
        }
    }

    /// Insert a root node
    pub fn insert(&self, label: impl Into<String>, bounds: Rect) -> NodeId {
        self.inner.lock().unwrap().nodes.insert(StageNode {
            label: label.into(),
            bounds,
            props: VisualProps::REST,
            parent: None,
            children: SmallVec::new(),
        })
    }

    /// Insert a node under `parent`
    ///
    /// Returns `None` if the parent is not on the stage.
    pub fn insert_child(
        &self,
        parent: NodeId,
        label: impl Into<String>,
        bounds: Rect,
    ) -> Option<NodeId> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.nodes.contains_key(parent) {
            return None;
        }
        let id = inner.nodes.insert(StageNode {
            label: label.into(),
            bounds,
            props: VisualProps::REST,
            parent: Some(parent),
            children: SmallVec::new(),
        });
        if let Some(node) = inner.nodes.get_mut(parent) {
            node.children.push(id);
        }
        Some(id)
    }

    /// Remove a node and its whole subtree
    ///
    /// Returns the number of nodes removed.
    pub fn remove(&self, id: NodeId) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let parent = match inner.nodes.get(id) {
            Some(node) => node.parent,
            None => return 0,
        };
        if let Some(parent) = parent.and_then(|p| inner.nodes.get_mut(p)) {
            parent.children.retain(|c| *c != id);
        }

        let mut removed = 0;
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = inner.nodes.remove(next) {
                pending.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.inner.lock().unwrap().nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn props(&self, id: NodeId) -> Option<VisualProps> {
        self.inner.lock().unwrap().nodes.get(id).map(|n| n.props)
    }

    /// Replace a node's props. Returns false if the node is gone.
    pub fn set_props(&self, id: NodeId, props: VisualProps) -> bool {
        self.update_props(id, |p| *p = props)
    }

    /// Mutate a node's props in place. Returns false if the node is gone.
    pub fn update_props<F>(&self, id: NodeId, f: F) -> bool
    where
        F: FnOnce(&mut VisualProps),
    {
        match self.inner.lock().unwrap().nodes.get_mut(id) {
            Some(node) => {
                f(&mut node.props);
                true
            }
            None => false,
        }
    }

    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.inner.lock().unwrap().nodes.get(id).map(|n| n.bounds)
    }

    pub fn set_bounds(&self, id: NodeId, bounds: Rect) -> bool {
        match self.inner.lock().unwrap().nodes.get_mut(id) {
            Some(node) => {
                node.bounds = bounds;
                true
            }
            None => false,
        }
    }

    pub fn label(&self, id: NodeId) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(id)
            .map(|n| n.label.clone())
    }

    /// Direct children of a node, in insertion order (empty if the node is gone)
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(id)
            .map(|n| n.children.to_vec())
            .unwrap_or_default()
    }

    /// Descendants of `root` carrying `label`, depth-first in document order
    pub fn query(&self, root: NodeId, label: &str) -> Vec<NodeId> {
        let inner = self.inner.lock().unwrap();
        let mut found = Vec::new();
        let mut pending: Vec<NodeId> = match inner.nodes.get(root) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return found,
        };
        while let Some(id) = pending.pop() {
            if let Some(node) = inner.nodes.get(id) {
                if node.label == label {
                    found.push(id);
                }
                pending.extend(node.children.iter().rev().copied());
            }
        }
        found
    }

    /// First node anywhere on the stage carrying `label`
    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .iter()
            .find(|(_, n)| n.label == label)
            .map(|(id, _)| id)
    }

    /// Run a closure with the node, if present
    pub fn with_node<F, R>(&self, id: NodeId, f: F) -> Option<R>
    where
        F: FnOnce(&StageNode) -> R,
    {
        self.inner.lock().unwrap().nodes.get(id).map(f)
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_children_order() {
        let stage = Stage::new();
        let root = stage.insert("grid", Rect::new(0.0, 0.0, 100.0, 100.0));
        let a = stage.insert_child(root, "card", Rect::ZERO).unwrap();
        let b = stage.insert_child(root, "card", Rect::ZERO).unwrap();

        assert_eq!(stage.children(root), vec![a, b]);
        assert_eq!(stage.props(a), Some(VisualProps::REST));
    }

    #[test]
    fn test_remove_subtree() {
        let stage = Stage::new();
        let root = stage.insert("section", Rect::ZERO);
        let grid = stage.insert_child(root, "grid", Rect::ZERO).unwrap();
        let card = stage.insert_child(grid, "card", Rect::ZERO).unwrap();

        assert_eq!(stage.remove(grid), 2);
        assert!(!stage.contains(card));
        assert!(stage.children(root).is_empty());
        assert!(!stage.set_props(card, VisualProps::REST));
    }

    #[test]
    fn test_query_document_order() {
        let stage = Stage::new();
        let root = stage.insert("card", Rect::ZERO);
        let t1 = stage.insert_child(root, "tag", Rect::ZERO).unwrap();
        let inner = stage.insert_child(root, "body", Rect::ZERO).unwrap();
        let t2 = stage.insert_child(inner, "tag", Rect::ZERO).unwrap();
        let t3 = stage.insert_child(root, "tag", Rect::ZERO).unwrap();

        assert_eq!(stage.query(root, "tag"), vec![t1, t2, t3]);
    }

    #[test]
    fn test_missing_node_lookups() {
        let stage = Stage::new();
        let node = stage.insert("x", Rect::ZERO);
        stage.remove(node);
        assert!(stage.props(node).is_none());
        assert!(stage.bounds(node).is_none());
        assert!(stage.children(node).is_empty());
        assert!(stage.insert_child(node, "child", Rect::ZERO).is_none());
    }
}
