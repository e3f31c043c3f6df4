use crate::bodies::RigidBody;
use crate::core::{BodyHandle, BodyStorage, StepContext};
use crate::ignorers::Ignorer;
use std::any::Any;
use std::collections::HashMap;

/// The shared verdict cache of one body group
#[derive(Debug, Clone)]
struct GroupSlot {
    /// The bodies making up the group
    bodies: Vec<BodyHandle>,

    /// Cached verdict of the last evaluation
    can_collide: bool,

    /// Update count the cached verdict belongs to
    last_update: Option<u64>,
}

/// A collision ignorer that evaluates an inner ignorer against whole
/// body groups and caches the verdict for the duration of one step.
///
/// When the other body belongs to a registered group, the inner
/// predicate is evaluated against every body of the group and the
/// conjunction is cached on the group, stamped with the step context's
/// update counter. Repeated queries against the same group within one
/// step hit the cache; advancing the counter invalidates it. Bodies
/// outside any group fall through to the inner predicate directly.
pub struct GroupedIgnorer {
    /// The ungrouped predicate
    inner: Box<dyn Ignorer>,

    /// The registered groups
    groups: Vec<GroupSlot>,

    /// Group index of each tracked body
    membership: HashMap<BodyHandle, usize>,
}

impl GroupedIgnorer {
    /// Creates a new grouped ignorer over an inner ignorer
    pub fn new(inner: Box<dyn Ignorer>) -> Self {
        Self {
            inner,
            groups: Vec::new(),
            membership: HashMap::new(),
        }
    }

    /// Registers a group of bodies sharing one cached verdict
    pub fn add_group(&mut self, bodies: &[BodyHandle]) {
        let index = self.groups.len();
        self.groups.push(GroupSlot {
            bodies: bodies.to_vec(),
            can_collide: true,
            last_update: None,
        });

        for &body in bodies {
            self.membership.insert(body, index);
        }
    }

    /// Returns the number of registered groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns a reference to the inner ignorer
    pub fn get_inner(&self) -> &dyn Ignorer {
        &*self.inner
    }

    /// Returns a mutable reference to the inner ignorer
    pub fn get_inner_mut(&mut self) -> &mut dyn Ignorer {
        &mut *self.inner
    }
}

impl Ignorer for GroupedIgnorer {
    fn ignorer_type(&self) -> &'static str {
        "Grouped"
    }

    fn both_needed(&self) -> bool {
        self.inner.both_needed()
    }

    fn is_inverted(&self) -> bool {
        self.inner.is_inverted()
    }

    fn can_collide(
        &mut self,
        bodies: &BodyStorage<RigidBody>,
        this: BodyHandle,
        other: BodyHandle,
        other_ignorer: Option<&dyn Ignorer>,
        ctx: &StepContext,
    ) -> bool {
        let slot_index = match self.membership.get(&other) {
            Some(&index) => index,
            None => {
                return self
                    .inner
                    .can_collide(bodies, this, other, other_ignorer, ctx)
            }
        };

        if self.groups[slot_index].last_update == Some(ctx.update_count) {
            return self.groups[slot_index].can_collide;
        }

        // Every body of the group must independently pass
        let mut verdict = true;
        for i in 0..self.groups[slot_index].bodies.len() {
            let member = self.groups[slot_index].bodies[i];
            if !self.inner.can_collide(bodies, this, member, other_ignorer, ctx) {
                verdict = false;
                break;
            }
        }

        let slot = &mut self.groups[slot_index];
        slot.can_collide = verdict;
        slot.last_update = Some(ctx.update_count);

        verdict
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
