use crate::bodies::RigidBody;
use bitflags::bitflags;
use std::any::Any;

bitflags! {
    /// A bit mask identifying categories of physics logics.
    ///
    /// Bodies carry a mask of categories they ignore; a logic whose
    /// category is in a body's mask is not applied to that body.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LogicCategory: u32 {
        /// Category 1 (default)
        const CAT01 = 0x00000001;

        /// Category 2
        const CAT02 = 0x00000002;

        /// Category 3
        const CAT03 = 0x00000004;

        /// Category 4
        const CAT04 = 0x00000008;

        /// Category 5
        const CAT05 = 0x00000010;

        /// Category 6
        const CAT06 = 0x00000020;

        /// Category 7
        const CAT07 = 0x00000040;

        /// Category 8
        const CAT08 = 0x00000080;

        /// Category 9
        const CAT09 = 0x00000100;

        /// Category 10
        const CAT10 = 0x00000200;

        /// Category 11
        const CAT11 = 0x00000400;

        /// Category 12
        const CAT12 = 0x00000800;

        /// Category 13
        const CAT13 = 0x00001000;

        /// Category 14
        const CAT14 = 0x00002000;

        /// Category 15
        const CAT15 = 0x00004000;

        /// Category 16
        const CAT16 = 0x00008000;

        /// Category 17
        const CAT17 = 0x00010000;

        /// Category 18
        const CAT18 = 0x00020000;

        /// Category 19
        const CAT19 = 0x00040000;

        /// Category 20
        const CAT20 = 0x00080000;

        /// Category 21
        const CAT21 = 0x00100000;

        /// Category 22
        const CAT22 = 0x00200000;

        /// Category 23
        const CAT23 = 0x00400000;

        /// Category 24
        const CAT24 = 0x00800000;

        /// Category 25
        const CAT25 = 0x01000000;

        /// Category 26
        const CAT26 = 0x02000000;

        /// Category 27
        const CAT27 = 0x04000000;

        /// Category 28
        const CAT28 = 0x08000000;

        /// Category 29
        const CAT29 = 0x10000000;

        /// Category 30
        const CAT30 = 0x20000000;

        /// Category 31
        const CAT31 = 0x40000000;

        /// Category 32
        const CAT32 = 0x80000000;

        /// All categories
        const ALL = 0xFFFFFFFF;
    }
}

/// Base trait for per-step world-wide effects applied to bodies.
///
/// The world invokes [`PhysicsLogic::update`] once per step for every
/// enabled logic and then offers each registered body through
/// [`PhysicsLogic::apply`], gated by [`is_active_on`]. Logics hold no
/// body lists of their own.
pub trait PhysicsLogic: Send + Sync + 'static {
    /// Returns the type name of the logic
    fn logic_type(&self) -> &'static str;

    /// Returns the category this logic belongs to
    fn category(&self) -> LogicCategory {
        LogicCategory::CAT01
    }

    /// Returns whether the logic is enabled
    fn is_enabled(&self) -> bool;

    /// Sets whether the logic is enabled.
    ///
    /// A disabled logic stays registered; the world skips it entirely, so
    /// re-enabling is cheap.
    fn set_enabled(&mut self, enabled: bool);

    /// Additional activity predicate consulted after the category check.
    ///
    /// Concrete logic kinds override this instead of the category gate.
    fn extra_check(&self, body: &RigidBody) -> bool {
        let _ = body;
        true
    }

    /// Updates the logic's internal state once per step
    fn update(&mut self, dt: f32) {
        let _ = dt;
    }

    /// Applies the logic's effect to a single active body
    fn apply(&mut self, body: &mut RigidBody, dt: f32);

    /// Returns a dynamic reference to any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Returns a dynamic mutable reference to any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Returns whether a logic applies to the given body.
///
/// A body is inactive for a logic when it ignores physics logics
/// altogether, when the logic's category is in the body's ignore mask,
/// or when the logic's own extra predicate rejects it.
pub fn is_active_on(logic: &dyn PhysicsLogic, body: &RigidBody) -> bool {
    if body.ignores_physics_logics() {
        return false;
    }

    if body.get_logic_ignore_mask().intersects(logic.category()) {
        return false;
    }

    logic.extra_check(body)
}
