use crate::{Mesh, Node};
use donutfield_common::NodeId;
use glam::Mat4;
use std::collections::BTreeMap;

/// A record of every change to the set of registered nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    Added {
        id: NodeId,
        kind: &'static str,
        instances: usize,
    },
    Removed {
        id: NodeId,
        kind: &'static str,
        instances: usize,
    },
}

/// The set of nodes a viewport renders.
///
/// Registration does not transfer lifecycle responsibility: the caller keeps
/// the returned [`NodeId`] and decides when to remove the node again.
/// Nodes iterate in registration order (ids are sequential).
#[derive(Debug, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u64,
    event_log: Vec<SceneEvent>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Returns its id.
    pub fn add(&mut self, node: impl Into<Node>) -> NodeId {
        let node = node.into();
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.event_log.push(SceneEvent::Added {
            id,
            kind: node.kind(),
            instances: node.instance_count(),
        });
        tracing::debug!(%id, kind = node.kind(), "node added");
        self.nodes.insert(id, node);
        id
    }

    /// Unregister a node. Returns it if it was registered.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.remove(&id);
        if let Some(ref n) = node {
            tracing::debug!(%id, kind = n.kind(), "node removed");
            self.event_log.push(SceneEvent::Removed {
                id,
                kind: n.kind(),
                instances: n.instance_count(),
            });
        }
        node
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, n)| (*id, n))
    }

    /// Total meshes across all nodes.
    pub fn instance_count(&self) -> usize {
        self.nodes.values().map(Node::instance_count).sum()
    }

    /// Visit every mesh in the scene with its world matrix.
    pub fn for_each_mesh(&self, mut f: impl FnMut(Mat4, &Mesh)) {
        for node in self.nodes.values() {
            node.for_each_mesh(&mut f);
        }
    }

    pub fn events(&self) -> &[SceneEvent] {
        &self.event_log
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.event_log)
    }
}
