use crate::bodies::RigidBody;
use crate::core::{BodyHandle, BodyStorage, StepContext};
use std::any::Any;
use std::collections::HashMap;

/// The collision ignorers attached to bodies, keyed by body handle
pub type IgnorerMap = HashMap<BodyHandle, Box<dyn Ignorer>>;

/// Base trait for collision ignorers.
///
/// An ignorer is a predicate attached to a body that decides whether the
/// body may collide with another. The verdicts of both bodies' ignorers
/// are combined by [`can_collide`]; an ignorer never needs to consider
/// the chain itself.
pub trait Ignorer: Send + Sync + 'static {
    /// Returns the type name of the ignorer
    fn ignorer_type(&self) -> &'static str;

    /// Whether a veto only counts when the predicate vetoes from both
    /// bodies' perspectives.
    ///
    /// Order-dependent filters (e.g. a platform passable from one side)
    /// return false here so their veto is honored unilaterally.
    fn both_needed(&self) -> bool;

    /// Whether the predicate's verdict is inverted
    fn is_inverted(&self) -> bool {
        false
    }

    /// The raw predicate, evaluated from `this` body's perspective.
    ///
    /// `other_ignorer` is the ignorer attached to the other body, when it
    /// has one. Inversion is applied by the caller, not here. Both bodies
    /// are required to be alive; a dead handle is a caller contract
    /// violation guarded by the world.
    fn can_collide(
        &mut self,
        bodies: &BodyStorage<RigidBody>,
        this: BodyHandle,
        other: BodyHandle,
        other_ignorer: Option<&dyn Ignorer>,
        ctx: &StepContext,
    ) -> bool;

    /// Returns a dynamic reference to any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Returns a dynamic mutable reference to any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Evaluates an ignorer's predicate with its inversion applied
fn evaluate(
    ignorer: &mut dyn Ignorer,
    bodies: &BodyStorage<RigidBody>,
    this: BodyHandle,
    other: BodyHandle,
    other_ignorer: Option<&dyn Ignorer>,
    ctx: &StepContext,
) -> bool {
    ignorer.is_inverted() ^ ignorer.can_collide(bodies, this, other, other_ignorer, ctx)
}

/// Verdict of one body's ignorer for the pair.
///
/// A both-needed ignorer is evaluated from both bodies' perspectives and
/// the verdicts are combined symmetrically; a one-sided ignorer is
/// evaluated from its own body's perspective only.
fn side_allows(
    ignorer: &mut dyn Ignorer,
    bodies: &BodyStorage<RigidBody>,
    this: BodyHandle,
    other: BodyHandle,
    other_ignorer: Option<&dyn Ignorer>,
    ctx: &StepContext,
) -> bool {
    let forward = evaluate(ignorer, bodies, this, other, other_ignorer, ctx);

    if ignorer.both_needed() {
        forward && evaluate(ignorer, bodies, other, this, other_ignorer, ctx)
    } else {
        forward
    }
}

/// Decides whether two bodies may collide.
///
/// The pair is allowed to collide unless an ignorer attached to either
/// body vetoes it. The result does not depend on the argument order.
pub fn can_collide(
    bodies: &BodyStorage<RigidBody>,
    ignorers: &mut IgnorerMap,
    a: BodyHandle,
    b: BodyHandle,
    ctx: &StepContext,
) -> bool {
    if a == b {
        return false;
    }

    let [mut left, mut right] = ignorers.get_disjoint_mut([&a, &b]);

    if let Some(l) = left.as_deref_mut() {
        let other = right.as_ref().map(|r| &***r as &dyn Ignorer);
        if !side_allows(&mut **l, bodies, a, b, other, ctx) {
            return false;
        }
    }

    if let Some(r) = right.as_deref_mut() {
        let other = left.as_ref().map(|l| &***l as &dyn Ignorer);
        if !side_allows(&mut **r, bodies, b, a, other, ctx) {
            return false;
        }
    }

    true
}
