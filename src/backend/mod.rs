mod client;
mod impulse;
mod minimal;
mod registry;

pub use self::client::{BodyShape, PhysicsClient};
pub use self::impulse::ImpulseClient;
pub use self::minimal::MinimalClient;
pub use self::registry::{BackendRegistry, ClientFactory};
