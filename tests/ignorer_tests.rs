use impulse2d::bodies::RigidBody;
use impulse2d::core::{BodyHandle, BodyStorage, StepContext, Storage};
use impulse2d::ignorers::{
    can_collide, GroupIgnorer, GroupedIgnorer, Ignorer, IgnorerMap, OneWayPlatformIgnorer,
};
use impulse2d::shapes::{Circle, ConvexPolygon};
use impulse2d::{PhysicsWorld, Vector2};
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn dynamic_ball(position: Vector2) -> RigidBody {
    RigidBody::new_dynamic(Arc::new(Circle::new(0.5)), position)
}

fn static_platform(position: Vector2) -> RigidBody {
    RigidBody::new_static(
        Arc::new(ConvexPolygon::rectangle(20.0, 1.0).unwrap()),
        position,
    )
}

/// Test double counting how often its predicate runs
struct CountingIgnorer {
    allow: bool,
    calls: Arc<AtomicUsize>,
}

impl Ignorer for CountingIgnorer {
    fn ignorer_type(&self) -> &'static str {
        "Counting"
    }

    fn both_needed(&self) -> bool {
        false
    }

    fn can_collide(
        &mut self,
        _bodies: &BodyStorage<RigidBody>,
        _this: BodyHandle,
        _other: BodyHandle,
        _other_ignorer: Option<&dyn Ignorer>,
        _ctx: &StepContext,
    ) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.allow
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Test double vetoing only when evaluated from one specific body
struct OneSidedVeto {
    veto_when_this: BodyHandle,
}

impl Ignorer for OneSidedVeto {
    fn ignorer_type(&self) -> &'static str {
        "OneSidedVeto"
    }

    fn both_needed(&self) -> bool {
        true
    }

    fn can_collide(
        &mut self,
        _bodies: &BodyStorage<RigidBody>,
        this: BodyHandle,
        _other: BodyHandle,
        _other_ignorer: Option<&dyn Ignorer>,
        _ctx: &StepContext,
    ) -> bool {
        this != self.veto_when_this
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn group_ignorer_vetoes_shared_groups_symmetrically() {
    let mut world = PhysicsWorld::new();

    let a = world.add_body(dynamic_ball(Vector2::zero()));
    let b = world.add_body(dynamic_ball(Vector2::new(3.0, 0.0)));
    let c = world.add_body(dynamic_ball(Vector2::new(6.0, 0.0)));

    world
        .set_ignorer(a, Box::new(GroupIgnorer::with_groups(&[3]).unwrap()))
        .unwrap();
    world
        .set_ignorer(b, Box::new(GroupIgnorer::with_groups(&[3]).unwrap()))
        .unwrap();
    world
        .set_ignorer(c, Box::new(GroupIgnorer::with_groups(&[4]).unwrap()))
        .unwrap();

    // Shared group: vetoed in both argument orders
    assert!(!world.can_collide(a, b));
    assert!(!world.can_collide(b, a));

    // Disjoint groups: allowed in both argument orders
    assert!(world.can_collide(a, c));
    assert!(world.can_collide(c, a));

    // A peer without a group ignorer always passes
    let d = world.add_body(dynamic_ball(Vector2::new(9.0, 0.0)));
    assert!(world.can_collide(a, d));
}

#[test]
fn both_needed_verdict_is_the_and_of_both_perspectives() {
    let mut bodies: BodyStorage<RigidBody> = BodyStorage::new();
    let a = bodies.add(dynamic_ball(Vector2::zero()));
    let b = bodies.add(dynamic_ball(Vector2::new(3.0, 0.0)));

    let mut ignorers = IgnorerMap::new();
    ignorers.insert(a, Box::new(OneSidedVeto { veto_when_this: a }));

    let ctx = StepContext { update_count: 1 };

    // The predicate vetoes as (a relative to b) but not as (b relative
    // to a); the combined verdict is the AND of both
    assert!(!can_collide(&bodies, &mut ignorers, a, b, &ctx));
    assert!(!can_collide(&bodies, &mut ignorers, b, a, &ctx));
}

#[test]
fn one_way_platform_depth_tolerance() {
    let mut world = PhysicsWorld::new();

    // Platform top at y = 0, passage allowed along +y, depth 5
    let platform = world.add_body(static_platform(Vector2::new(0.0, -0.5)));
    world
        .set_ignorer(
            platform,
            Box::new(OneWayPlatformIgnorer::new(Vector2::unit_y(), 5.0)),
        )
        .unwrap();

    // A falling body far past the platform's near edge is filtered out
    let high = world.add_body(dynamic_ball(Vector2::new(0.0, 10.0)));
    assert!(!world.can_collide(platform, high));
    assert!(!world.can_collide(high, platform));

    // Within the allowed depth the pair may collide again
    let near = world.add_body(dynamic_ball(Vector2::new(0.0, 2.0)));
    assert!(world.can_collide(platform, near));

    // A body fully below the platform may collide
    let below = world.add_body(dynamic_ball(Vector2::new(0.0, -3.0)));
    assert!(world.can_collide(platform, below));
}

#[test]
fn one_way_platform_ignores_logic_exempt_bodies() {
    let mut world = PhysicsWorld::new();

    let platform = world.add_body(static_platform(Vector2::new(0.0, -0.5)));
    world
        .set_ignorer(
            platform,
            Box::new(OneWayPlatformIgnorer::new(Vector2::unit_y(), 5.0)),
        )
        .unwrap();

    let mut exempt_body = dynamic_ball(Vector2::new(0.0, 10.0));
    exempt_body.set_ignores_physics_logics(true);
    let exempt = world.add_body(exempt_body);

    assert!(world.can_collide(platform, exempt));

    let mut broad_only_body = dynamic_ball(Vector2::new(0.0, 10.0));
    broad_only_body.set_broad_phase_only(true);
    let broad_only = world.add_body(broad_only_body);

    assert!(world.can_collide(platform, broad_only));
}

#[test]
fn inverted_ignorer_flips_the_verdict() {
    let mut world = PhysicsWorld::new();

    let platform = world.add_body(static_platform(Vector2::new(0.0, -0.5)));
    let mut ignorer = OneWayPlatformIgnorer::new(Vector2::unit_y(), 5.0);
    ignorer.set_inverted(true);
    world.set_ignorer(platform, Box::new(ignorer)).unwrap();

    let high = world.add_body(dynamic_ball(Vector2::new(0.0, 10.0)));
    assert!(world.can_collide(platform, high));

    let near = world.add_body(dynamic_ball(Vector2::new(0.0, 2.0)));
    assert!(!world.can_collide(platform, near));
}

#[test]
fn grouped_ignorer_caches_the_group_verdict_within_a_step() {
    let mut bodies: BodyStorage<RigidBody> = BodyStorage::new();
    let tracked = bodies.add(dynamic_ball(Vector2::zero()));
    let member_a = bodies.add(dynamic_ball(Vector2::new(3.0, 0.0)));
    let member_b = bodies.add(dynamic_ball(Vector2::new(6.0, 0.0)));

    let calls = Arc::new(AtomicUsize::new(0));
    let mut grouped = GroupedIgnorer::new(Box::new(CountingIgnorer {
        allow: true,
        calls: calls.clone(),
    }));
    grouped.add_group(&[member_a, member_b]);

    let mut ignorers = IgnorerMap::new();
    ignorers.insert(tracked, Box::new(grouped));

    let ctx = StepContext { update_count: 1 };

    // First query evaluates the ungrouped predicate once per group member
    assert!(can_collide(&bodies, &mut ignorers, tracked, member_a, &ctx));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // A second query within the same step hits the cache
    assert!(can_collide(&bodies, &mut ignorers, tracked, member_b, &ctx));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // Advancing the step counter forces re-evaluation
    let next_ctx = StepContext { update_count: 2 };
    assert!(can_collide(&bodies, &mut ignorers, tracked, member_a, &next_ctx));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn grouped_ignorer_conjunction_requires_every_member_to_pass() {
    let mut bodies: BodyStorage<RigidBody> = BodyStorage::new();
    let tracked = bodies.add(dynamic_ball(Vector2::zero()));
    let member_a = bodies.add(dynamic_ball(Vector2::new(3.0, 0.0)));
    let member_b = bodies.add(dynamic_ball(Vector2::new(6.0, 0.0)));

    let calls = Arc::new(AtomicUsize::new(0));
    let mut grouped = GroupedIgnorer::new(Box::new(CountingIgnorer {
        allow: false,
        calls: calls.clone(),
    }));
    grouped.add_group(&[member_a, member_b]);

    let mut ignorers = IgnorerMap::new();
    ignorers.insert(tracked, Box::new(grouped));

    let ctx = StepContext { update_count: 1 };

    assert!(!can_collide(&bodies, &mut ignorers, tracked, member_a, &ctx));

    // The vetoing first member short-circuits the conjunction
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // A body outside any group falls through to the inner predicate
    let outsider = bodies.add(dynamic_ball(Vector2::new(9.0, 0.0)));
    assert!(!can_collide(&bodies, &mut ignorers, tracked, outsider, &ctx));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
