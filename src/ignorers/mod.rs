mod ignorer;
mod group;
mod one_way;
mod grouped;

pub use self::ignorer::{can_collide, Ignorer, IgnorerMap};
pub use self::group::GroupIgnorer;
pub use self::one_way::OneWayPlatformIgnorer;
pub use self::grouped::GroupedIgnorer;
