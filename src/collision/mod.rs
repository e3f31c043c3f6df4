mod broad_phase;
mod filter;

pub use self::broad_phase::{BroadPhase, BruteForceBroadPhase, CollisionPair};
pub use self::filter::{categories_allow, CollisionCategory};

use crate::bodies::{RigidBody, RigidBodyType};
use crate::core::events::{CollisionEvent, CollisionEventType};
use crate::core::{BodyHandle, BodyStorage, ContactPoint, EventQueue, StepContext, Storage};
use crate::ignorers::{self, IgnorerMap};
use std::collections::HashSet;

/// Detects overlapping body pairs and emits collision events.
///
/// Candidate pairs come from the broad phase and are gated through the
/// ignorer chain before any event is generated. The previous step's
/// active pairs are used to distinguish begin, persist and end events.
pub fn detect_collisions(
    bodies: &BodyStorage<RigidBody>,
    ignorers: &mut IgnorerMap,
    ctx: &StepContext,
    active_pairs: &mut HashSet<(BodyHandle, BodyHandle)>,
    events: &mut EventQueue,
) {
    let bounds: Vec<_> = bodies
        .iter()
        .map(|(handle, body)| (handle, body.world_bounds()))
        .collect();

    let mut broad_phase = BruteForceBroadPhase::new();
    broad_phase.update(&bounds);

    let mut current: HashSet<(BodyHandle, BodyHandle)> = HashSet::new();

    for pair in broad_phase.collision_pairs() {
        let (body_a, body_b) = match (bodies.get(pair.body_a), bodies.get(pair.body_b)) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };

        // Two immovable bodies never produce a meaningful contact
        if body_a.get_body_type() != RigidBodyType::Dynamic
            && body_b.get_body_type() != RigidBodyType::Dynamic
        {
            continue;
        }

        if !body_a.generates_collision_events() || !body_b.generates_collision_events() {
            continue;
        }

        if !categories_allow(
            body_a.get_collision_category(),
            body_a.get_collision_mask(),
            body_b.get_collision_category(),
            body_b.get_collision_mask(),
        ) {
            continue;
        }

        if !ignorers::can_collide(bodies, ignorers, pair.body_a, pair.body_b, ctx) {
            continue;
        }

        let key = (pair.body_a, pair.body_b);
        current.insert(key);

        let event_type = if active_pairs.contains(&key) {
            CollisionEventType::Persist
        } else {
            CollisionEventType::Begin
        };

        events.add_collision_event(CollisionEvent {
            event_type,
            body_a: pair.body_a,
            body_b: pair.body_b,
            contacts: vec![contact_from_overlap(body_a, body_b)],
        });
    }

    for &(a, b) in active_pairs.iter() {
        if !current.contains(&(a, b)) {
            events.add_collision_event(CollisionEvent {
                event_type: CollisionEventType::End,
                body_a: a,
                body_b: b,
                contacts: Vec::new(),
            });
        }
    }

    *active_pairs = current;
}

/// Builds an approximate contact point from the AABB overlap of two bodies
fn contact_from_overlap(body_a: &RigidBody, body_b: &RigidBody) -> ContactPoint {
    let bounds_a = body_a.world_bounds();
    let bounds_b = body_b.world_bounds();

    let overlap_min = bounds_a.min.max(&bounds_b.min);
    let overlap_max = bounds_a.max.min(&bounds_b.max);
    let overlap_extents = overlap_max - overlap_min;

    let normal = (body_b.get_position() - body_a.get_position()).normalize();

    ContactPoint {
        position: (overlap_min + overlap_max) * 0.5,
        normal,
        penetration: overlap_extents.x.min(overlap_extents.y).max(0.0),
    }
}
