//! Rigid body dynamics
//!
//! Linear point-mass dynamics: force and impulse accumulators drained by a
//! semi-implicit Euler step. Inverse mass is stored directly so immovable
//! bodies are simply `inverse_mass == 0` with no special casing in the
//! resolver.

use crate::foundation::math::{Transform, Vec3};

/// A linear rigid body attached to a game object
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    /// Reciprocal of mass; 0 for immovable bodies
    pub inverse_mass: f32,

    /// Elasticity in collisions, 0 (fully inelastic) to 1 (fully elastic)
    pub restitution: f32,

    /// Current linear velocity
    pub velocity: Vec3,

    /// Whether integration applies to this body this tick
    pub physics_enabled: bool,

    net_force: Vec3,
    net_impulse: Vec3,
}

impl RigidBody {
    /// Create a dynamic body of the given mass
    ///
    /// Zero or negative mass is a precondition violation.
    pub fn new(mass: f32) -> Self {
        debug_assert!(mass > 0.0, "dynamic bodies need positive mass");
        Self {
            inverse_mass: 1.0 / mass,
            restitution: 0.5,
            velocity: Vec3::zeros(),
            physics_enabled: true,
            net_force: Vec3::zeros(),
            net_impulse: Vec3::zeros(),
        }
    }

    /// Create an immovable body (infinite mass, ignores gravity and impulses)
    pub fn fixed() -> Self {
        Self {
            inverse_mass: 0.0,
            restitution: 0.5,
            velocity: Vec3::zeros(),
            physics_enabled: true,
            net_force: Vec3::zeros(),
            net_impulse: Vec3::zeros(),
        }
    }

    /// Set the coefficient of restitution
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    /// Set an initial velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Accumulate a force for the next integration step
    pub fn apply_force(&mut self, force: Vec3) {
        self.net_force += force;
    }

    /// Accumulate an instantaneous impulse for the next integration step
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.net_impulse += impulse;
    }

    /// Advance the body one step (semi-implicit Euler)
    ///
    /// Velocity is updated from accumulated forces, impulses, and gravity
    /// before the position moves, then the accumulators drain. Immovable and
    /// disabled bodies only drain their accumulators.
    pub fn integrate(&mut self, transform: &mut Transform, gravity: Vec3, dt: f32) {
        if self.physics_enabled && self.inverse_mass > 0.0 {
            let acceleration = self.net_force * self.inverse_mass + gravity;
            self.velocity += acceleration * dt + self.net_impulse * self.inverse_mass;
            transform.position += self.velocity * dt;
        }
        self.net_force = Vec3::zeros();
        self.net_impulse = Vec3::zeros();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gravity() -> Vec3 {
        Vec3::new(0.0, -10.0, 0.0)
    }

    #[test]
    fn gravity_accelerates_downward() {
        let mut body = RigidBody::new(2.0);
        let mut transform = Transform::identity();

        body.integrate(&mut transform, gravity(), 0.5);
        assert_relative_eq!(body.velocity.y, -5.0, epsilon = 1e-5);
        assert_relative_eq!(transform.position.y, -2.5, epsilon = 1e-5);
    }

    #[test]
    fn impulse_changes_velocity_by_inverse_mass() {
        let mut body = RigidBody::new(2.0);
        let mut transform = Transform::identity();

        body.apply_impulse(Vec3::new(4.0, 0.0, 0.0));
        body.integrate(&mut transform, Vec3::zeros(), 1.0);
        assert_relative_eq!(body.velocity.x, 2.0, epsilon = 1e-5);

        // Accumulator drained; a second step coasts
        body.integrate(&mut transform, Vec3::zeros(), 1.0);
        assert_relative_eq!(body.velocity.x, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn fixed_body_never_moves() {
        let mut body = RigidBody::fixed();
        let mut transform = Transform::identity();

        body.apply_force(Vec3::new(100.0, 100.0, 100.0));
        body.apply_impulse(Vec3::new(100.0, 0.0, 0.0));
        body.integrate(&mut transform, gravity(), 1.0);
        assert_eq!(transform.position, Vec3::zeros());
        assert_eq!(body.velocity, Vec3::zeros());
    }

    #[test]
    fn disabled_body_holds_still_but_drains_accumulators() {
        let mut body = RigidBody::new(1.0);
        body.physics_enabled = false;
        let mut transform = Transform::identity();

        body.apply_force(Vec3::new(10.0, 0.0, 0.0));
        body.integrate(&mut transform, gravity(), 1.0);
        assert_eq!(transform.position, Vec3::zeros());

        body.physics_enabled = true;
        body.integrate(&mut transform, Vec3::zeros(), 1.0);
        assert_eq!(body.velocity, Vec3::zeros());
    }
}
