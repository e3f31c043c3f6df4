use crate::core::BodyHandle;
use crate::math::Aabb;

/// A candidate pair of potentially colliding bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    /// The first body of the pair
    pub body_a: BodyHandle,

    /// The second body of the pair
    pub body_b: BodyHandle,
}

impl CollisionPair {
    /// Creates a new collision pair with a canonical body order
    pub fn new(body_a: BodyHandle, body_b: BodyHandle) -> Self {
        if body_a <= body_b {
            Self { body_a, body_b }
        } else {
            Self {
                body_a: body_b,
                body_b: body_a,
            }
        }
    }
}

/// Trait for broad-phase collision detection algorithms
pub trait BroadPhase {
    /// Updates the broad phase with the current body bounds
    fn update(&mut self, bodies: &[(BodyHandle, Aabb)]);

    /// Returns all candidate collision pairs
    fn collision_pairs(&self) -> Vec<CollisionPair>;
}

/// Simple brute-force broad-phase algorithm
pub struct BruteForceBroadPhase {
    /// The bodies in the broad phase
    bodies: Vec<(BodyHandle, Aabb)>,
}

impl BruteForceBroadPhase {
    /// Creates a new brute-force broad phase
    pub fn new() -> Self {
        Self { bodies: Vec::new() }
    }
}

impl Default for BruteForceBroadPhase {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadPhase for BruteForceBroadPhase {
    fn update(&mut self, bodies: &[(BodyHandle, Aabb)]) {
        self.bodies.clear();
        self.bodies.extend_from_slice(bodies);
    }

    fn collision_pairs(&self) -> Vec<CollisionPair> {
        let mut pairs = Vec::new();

        for i in 0..self.bodies.len() {
            let (handle_a, aabb_a) = self.bodies[i];

            for j in (i + 1)..self.bodies.len() {
                let (handle_b, aabb_b) = self.bodies[j];

                if aabb_a.intersects(&aabb_b) {
                    pairs.push(CollisionPair::new(handle_a, handle_b));
                }
            }
        }

        pairs
    }
}
