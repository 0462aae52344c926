use donutfield_common::NodeId;
use donutfield_scene::{Node, Scene};

/// Scene inspector for developer tooling.
///
/// Read-only queries against the scene for the debug panel and CLI.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary(scene: &Scene) -> SceneSummary {
        let mut triangles = 0;
        let mut hidden = 0;
        scene.for_each_mesh(|_, mesh| {
            triangles += mesh.geometry.triangle_count();
            if !mesh.material.get().visible {
                hidden += 1;
            }
        });
        SceneSummary {
            nodes: scene.len(),
            instances: scene.instance_count(),
            hidden_instances: hidden,
            triangles,
            events: scene.events().len(),
        }
    }

    pub fn inspect_node(scene: &Scene, id: NodeId) -> Option<NodeInfo> {
        scene.get(id).map(|node| NodeInfo::new(id, node))
    }

    pub fn list_nodes(scene: &Scene) -> Vec<NodeInfo> {
        scene
            .nodes()
            .map(|(id, node)| NodeInfo::new(id, node))
            .collect()
    }
}

/// Summary of scene contents for the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSummary {
    pub nodes: usize,
    pub instances: usize,
    pub hidden_instances: usize,
    pub triangles: usize,
    pub events: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: nodes={} instances={} hidden={} triangles={} events={}",
            self.nodes, self.instances, self.hidden_instances, self.triangles, self.events
        )
    }
}

/// Details of a single top-level node.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: NodeId,
    pub kind: &'static str,
    pub instances: usize,
    pub position: [f32; 3],
    pub scale: [f32; 3],
}

impl NodeInfo {
    fn new(id: NodeId, node: &Node) -> Self {
        let t = node.transform();
        Self {
            id,
            kind: node.kind(),
            instances: node.instance_count(),
            position: t.position.to_array(),
            scale: t.scale.to_array(),
        }
    }
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node [{}] {} x{} pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2})",
            self.id,
            self.kind,
            self.instances,
            self.position[0],
            self.position[1],
            self.position[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
        )
    }
}
