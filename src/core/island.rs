use crate::core::{BodyHandle, JointHandle};
use std::collections::HashMap;

/// An island of bodies and joints that are connected through constraints.
///
/// Islands only exist for the duration of one solve pass; the island
/// indices written onto the bodies are invalid afterwards.
#[derive(Debug, Default, Clone)]
pub struct Island {
    /// The bodies in the island
    pub bodies: Vec<BodyHandle>,

    /// The joints in the island
    pub joints: Vec<JointHandle>,
}

impl Island {
    /// Returns the number of bodies in the island
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Returns the number of joints in the island
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Returns whether the island contains a specific body
    pub fn contains_body(&self, body: BodyHandle) -> bool {
        self.bodies.contains(&body)
    }
}

/// Builds islands from bodies and the joints connecting them.
///
/// Connectivity is tracked with a union-find over body handles; every
/// joint unions its endpoint bodies, and bodies without joints form
/// singleton islands.
pub struct IslandBuilder {
    parent: HashMap<BodyHandle, BodyHandle>,
    joints: Vec<(JointHandle, BodyHandle)>,
}

impl IslandBuilder {
    /// Creates a new empty island builder
    pub fn new() -> Self {
        Self {
            parent: HashMap::new(),
            joints: Vec::new(),
        }
    }

    /// Adds a connection between two bodies through a joint
    pub fn add_connection(&mut self, body_a: BodyHandle, body_b: BodyHandle, joint: JointHandle) {
        self.ensure(body_a);
        self.ensure(body_b);

        let root_a = self.find(body_a);
        let root_b = self.find(body_b);
        if root_a != root_b {
            self.parent.insert(root_b, root_a);
        }

        self.joints.push((joint, body_a));
    }

    /// Adds a world-anchored joint hanging off a single body
    pub fn add_anchored_joint(&mut self, body: BodyHandle, joint: JointHandle) {
        self.ensure(body);
        self.joints.push((joint, body));
    }

    /// Adds a single body with no joints
    pub fn add_single_body(&mut self, body: BodyHandle) {
        self.ensure(body);
    }

    fn ensure(&mut self, body: BodyHandle) {
        self.parent.entry(body).or_insert(body);
    }

    fn find(&mut self, body: BodyHandle) -> BodyHandle {
        let mut root = body;
        while self.parent[&root] != root {
            root = self.parent[&root];
        }

        // Path compression
        let mut current = body;
        while self.parent[&current] != root {
            let next = self.parent[&current];
            self.parent.insert(current, root);
            current = next;
        }

        root
    }

    /// Builds the islands and returns them together with the island index
    /// of every body
    pub fn build(mut self) -> (Vec<Island>, HashMap<BodyHandle, u32>) {
        let bodies: Vec<BodyHandle> = self.parent.keys().copied().collect();

        let mut islands: Vec<Island> = Vec::new();
        let mut root_to_island: HashMap<BodyHandle, u32> = HashMap::new();
        let mut body_to_island: HashMap<BodyHandle, u32> = HashMap::new();

        for body in bodies {
            let root = self.find(body);
            let index = *root_to_island.entry(root).or_insert_with(|| {
                islands.push(Island::default());
                (islands.len() - 1) as u32
            });

            islands[index as usize].bodies.push(body);
            body_to_island.insert(body, index);
        }

        for (joint, body) in std::mem::take(&mut self.joints) {
            let root = self.find(body);
            if let Some(&index) = root_to_island.get(&root) {
                islands[index as usize].joints.push(joint);
            }
        }

        (islands, body_to_island)
    }
}

impl Default for IslandBuilder {
    fn default() -> Self {
        Self::new()
    }
}
