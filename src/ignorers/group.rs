use crate::bodies::RigidBody;
use crate::core::{BodyHandle, BodyStorage, StepContext};
use crate::error::PhysicsError;
use crate::ignorers::Ignorer;
use crate::Result;
use std::any::Any;

/// A collision ignorer based on group membership masks.
///
/// Two bodies with group ignorers may not collide when their ignore
/// masks share a group, or when both carry the same non-zero legacy
/// group number. A body whose peer carries no group ignorer always
/// passes.
#[derive(Debug, Default, Clone)]
pub struct GroupIgnorer {
    /// Legacy single-group number (0 means unset)
    legacy_group: i32,

    /// Bit mask of ignored groups
    ignore_mask: u32,

    /// Whether the verdict is inverted
    inverted: bool,
}

impl GroupIgnorer {
    /// Creates a new group ignorer belonging to no groups
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new group ignorer belonging to the given groups
    pub fn with_groups(groups: &[u32]) -> Result<Self> {
        let mut ignorer = Self::new();
        for &group in groups {
            ignorer.add_group(group)?;
        }
        Ok(ignorer)
    }

    /// Returns the legacy group number
    pub fn get_legacy_group(&self) -> i32 {
        self.legacy_group
    }

    /// Sets the legacy group number
    pub fn set_legacy_group(&mut self, group: i32) {
        self.legacy_group = group;
    }

    /// Returns whether the verdict is inverted
    pub fn get_inverted(&self) -> bool {
        self.inverted
    }

    /// Sets whether the verdict is inverted
    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    fn check_group_index(group: u32) -> Result<()> {
        if group == 0 {
            return Err(PhysicsError::InvalidParameter(
                "Collision group indexes start from 1".to_string(),
            ));
        }
        if group > 32 {
            return Err(PhysicsError::InvalidParameter(
                "A maximum of 32 groups is supported".to_string(),
            ));
        }
        Ok(())
    }

    /// Adds a group (1 to 32) to the ignore mask
    pub fn add_group(&mut self, group: u32) -> Result<()> {
        Self::check_group_index(group)?;
        self.ignore_mask |= 1 << (group - 1);
        Ok(())
    }

    /// Removes a group (1 to 32) from the ignore mask
    pub fn remove_group(&mut self, group: u32) -> Result<()> {
        Self::check_group_index(group)?;
        self.ignore_mask &= !(1 << (group - 1));
        Ok(())
    }

    /// Returns whether the given group (1 to 32) is in the ignore mask
    /// or matches the legacy group
    pub fn tests_group_ignore(&self, group: u32) -> Result<bool> {
        if self.legacy_group != 0 && self.legacy_group == group as i32 {
            return Ok(true);
        }

        Self::check_group_index(group)?;
        Ok(self.ignore_mask & (1 << (group - 1)) != 0)
    }
}

impl Ignorer for GroupIgnorer {
    fn ignorer_type(&self) -> &'static str {
        "Group"
    }

    fn both_needed(&self) -> bool {
        true
    }

    fn is_inverted(&self) -> bool {
        self.inverted
    }

    fn can_collide(
        &mut self,
        _bodies: &BodyStorage<RigidBody>,
        _this: BodyHandle,
        _other: BodyHandle,
        other_ignorer: Option<&dyn Ignorer>,
        _ctx: &StepContext,
    ) -> bool {
        let other = match other_ignorer.and_then(|o| o.as_any().downcast_ref::<GroupIgnorer>()) {
            Some(other) => other,
            None => return true,
        };

        let legacy_ok = self.legacy_group == 0
            || other.legacy_group == 0
            || self.legacy_group != other.legacy_group;

        legacy_ok && (self.ignore_mask & other.ignore_mask) == 0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
