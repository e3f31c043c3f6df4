/// Material properties for physics objects
#[derive(Debug, Clone, Copy)]
pub struct Material {
    /// Coefficient of restitution (bounciness), 0-1
    pub restitution: f32,

    /// Coefficient of friction, 0-1
    pub friction: f32,

    /// Density of the material (kg/m^2)
    pub density: f32,
}

impl Material {
    /// Creates a new material with the specified properties
    pub fn new(density: f32, friction: f32, restitution: f32) -> Self {
        Self {
            density,
            friction,
            restitution,
        }
    }

    /// Creates a rubber-like material (high restitution)
    pub fn rubber() -> Self {
        Self::new(1.1, 0.8, 0.9)
    }

    /// Creates a metal-like material (dense, low restitution)
    pub fn metal() -> Self {
        Self::new(7.8, 0.4, 0.2)
    }

    /// Creates a wood-like material
    pub fn wood() -> Self {
        Self::new(0.7, 0.5, 0.3)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: 0.2,
            friction: 0.5,
            density: 1.0,
        }
    }
}
