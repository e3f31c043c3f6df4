mod logic;
mod gravity;

pub use self::logic::{is_active_on, LogicCategory, PhysicsLogic};
pub use self::gravity::{GravityLogic, PointGravityLogic};
