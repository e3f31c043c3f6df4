mod joint;
mod angle;
mod axle;

pub use self::joint::{Joint, DEFAULT_BIAS_FACTOR};
pub use self::angle::AngleJoint;
pub use self::axle::AxleJoint;
