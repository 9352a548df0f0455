//! Tunable parameters for both simulation systems.
//!
//! Every field is read at the start of each `step()`, so changing a value
//! between steps takes effect on the next one.

use crate::error::PhysicsError;
use crate::float::Float;

/// Time-integration scheme for the mass-spring system.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Integrator {
    /// Positions advance with the pre-update velocity, then velocities with
    /// the forces computed at the start of the step.
    #[default]
    SymplecticEuler,
    /// Two force evaluations: one at t, one at the half-step trial state.
    Midpoint,
    /// Velocity Verlet, carrying each particle's acceleration between steps.
    VelocityVerlet,
}

/// How particles are kept inside the box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollisionMode {
    /// Walls are ignored.
    None,
    /// Stiff repulsive force proportional to penetration depth.
    #[default]
    Penalty,
    /// Velocity reflection after integration.
    Impulse,
}

/// Parameters of a [`MassSpringSystem`](crate::MassSpringSystem).
///
/// # Builder Pattern
/// ```
/// use jostle::config::{MassSpringConfig, Integrator};
///
/// let config: MassSpringConfig<f32> = MassSpringConfig::new()
///     .with_integrator(Integrator::VelocityVerlet)
///     .with_gravity(false)
///     .with_time_step(0.001);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MassSpringConfig<F: Float> {
    /// Seconds advanced by one `step()`. Default: 0.0005.
    pub time_step: F,
    pub integrator: Integrator,
    pub collisions: CollisionMode,
    /// Mass given to particles added without an explicit mass. Default: 0.1.
    pub particle_mass: F,
    /// Collision radius of every particle. Default: 0.03.
    pub particle_radius: F,
    pub use_gravity: bool,
    /// Gravitational acceleration magnitude, acting along -y. Default: 9.81.
    pub gravity: F,
    /// Linear velocity damping (gamma). Default: 0.1.
    pub damping: F,
    /// Penalty wall stiffness. Default: 1000.
    pub collision_stiffness: F,
    /// Wall dissipation, used by both collision modes. Default: 0.1.
    pub collision_damping: F,
    pub spring_stiffness: F,
    pub spring_damping: F,
    /// Strength of triangle area preservation. Default: 100000.
    pub area_stiffness: F,
    /// Default: a quarter of the spring stiffness.
    pub mouse_stiffness: F,
    pub mouse_damping: F,
    /// Walls sit at +/- this distance from the origin. Default: 1.
    pub box_half_extent: F,
}

impl<F: Float> MassSpringConfig<F> {
    /// Create a new config with the interactive defaults.
    pub fn new() -> Self {
        let spring_stiffness = F::from_f64(1000.0);
        let spring_damping = F::one();
        MassSpringConfig {
            time_step: F::from_f64(0.0005),
            integrator: Integrator::SymplecticEuler,
            collisions: CollisionMode::Penalty,
            particle_mass: F::from_f64(0.1),
            particle_radius: F::from_f64(0.03),
            use_gravity: true,
            gravity: F::from_f64(9.81),
            damping: F::from_f64(0.1),
            collision_stiffness: F::from_f64(1000.0),
            collision_damping: F::from_f64(0.1),
            spring_stiffness,
            spring_damping,
            area_stiffness: F::from_f64(100000.0),
            mouse_stiffness: spring_stiffness * F::from_f64(0.25),
            mouse_damping: spring_damping,
            box_half_extent: F::one(),
        }
    }

    pub fn with_time_step(mut self, dt: F) -> Self {
        self.time_step = dt;
        self
    }

    pub fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_collisions(mut self, mode: CollisionMode) -> Self {
        self.collisions = mode;
        self
    }

    pub fn with_gravity(mut self, enabled: bool) -> Self {
        self.use_gravity = enabled;
        self
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_particle_mass(mut self, mass: F) -> Self {
        self.particle_mass = mass;
        self
    }

    pub fn with_particle_radius(mut self, radius: F) -> Self {
        self.particle_radius = radius;
        self
    }

    /// Set penalty stiffness and wall damping together.
    pub fn with_collision(mut self, stiffness: F, damping: F) -> Self {
        self.collision_stiffness = stiffness;
        self.collision_damping = damping;
        self
    }

    /// Set spring stiffness and damping together.
    pub fn with_springs(mut self, stiffness: F, damping: F) -> Self {
        self.spring_stiffness = stiffness;
        self.spring_damping = damping;
        self
    }

    pub fn with_area_stiffness(mut self, stiffness: F) -> Self {
        self.area_stiffness = stiffness;
        self
    }

    pub fn with_mouse_spring(mut self, stiffness: F, damping: F) -> Self {
        self.mouse_stiffness = stiffness;
        self.mouse_damping = damping;
        self
    }

    pub fn with_box_half_extent(mut self, half_extent: F) -> Self {
        self.box_half_extent = half_extent;
        self
    }

    /// Check that the step size and every coefficient are usable.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        check_time_step(self.time_step)?;
        if !(self.particle_mass > F::zero() && self.particle_mass.is_finite()) {
            return Err(PhysicsError::InvalidMass);
        }
        check_non_negative("particle_radius", self.particle_radius)?;
        check_non_negative("gravity", self.gravity)?;
        check_non_negative("damping", self.damping)?;
        check_non_negative("collision_stiffness", self.collision_stiffness)?;
        check_non_negative("collision_damping", self.collision_damping)?;
        check_non_negative("spring_stiffness", self.spring_stiffness)?;
        check_non_negative("spring_damping", self.spring_damping)?;
        check_non_negative("area_stiffness", self.area_stiffness)?;
        check_non_negative("mouse_stiffness", self.mouse_stiffness)?;
        check_non_negative("mouse_damping", self.mouse_damping)?;
        if !(self.box_half_extent > F::zero() && self.box_half_extent.is_finite()) {
            return Err(PhysicsError::InvalidParameter { name: "box_half_extent" });
        }
        Ok(())
    }
}

impl<F: Float> Default for MassSpringConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters of a [`RigidBodySystem`](crate::RigidBodySystem).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RigidBodyConfig<F: Float> {
    /// Seconds advanced by one `step()`. Default: 0.001.
    pub time_step: F,
    /// Total mass given to bodies added without an explicit mass. Default: 0.5.
    pub body_mass: F,
    /// Body-air friction on both linear and angular velocity. Default: 0.01.
    pub damping: F,
    /// Mouse spring stiffness. Default: 100.
    pub spring_stiffness: F,
    /// Mouse spring damping. Default: 5.
    pub spring_damping: F,
    /// Render radius of body points. Default: 0.03.
    pub particle_radius: F,
    pub use_gravity: bool,
    pub gravity: F,
    pub use_linear_dynamics: bool,
    pub use_angular_dynamics: bool,
    /// Coefficient of restitution for wall and body impulses. Default: 0.5.
    pub collision_elasticity: F,
    /// Post-impulse velocity bleed rate. After each impulse both velocity
    /// channels are scaled by `1 - collision_damping * time_step`, clamped to
    /// [0, 1]; the time step keeps the default of 2 from reversing velocities,
    /// which an unscaled `1 - collision_damping` would do. Default: 2.
    pub collision_damping: F,
    pub box_half_extent: F,
}

impl<F: Float> RigidBodyConfig<F> {
    /// Create a new config with the interactive defaults.
    pub fn new() -> Self {
        RigidBodyConfig {
            time_step: F::from_f64(0.001),
            body_mass: F::half(),
            damping: F::from_f64(0.01),
            spring_stiffness: F::from_f64(100.0),
            spring_damping: F::from_f64(5.0),
            particle_radius: F::from_f64(0.03),
            use_gravity: true,
            gravity: F::from_f64(9.81),
            use_linear_dynamics: true,
            use_angular_dynamics: true,
            collision_elasticity: F::half(),
            collision_damping: F::two(),
            box_half_extent: F::one(),
        }
    }

    pub fn with_time_step(mut self, dt: F) -> Self {
        self.time_step = dt;
        self
    }

    pub fn with_body_mass(mut self, mass: F) -> Self {
        self.body_mass = mass;
        self
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_gravity(mut self, enabled: bool) -> Self {
        self.use_gravity = enabled;
        self
    }

    /// Toggle the linear and angular integration channels independently.
    pub fn with_dynamics(mut self, linear: bool, angular: bool) -> Self {
        self.use_linear_dynamics = linear;
        self.use_angular_dynamics = angular;
        self
    }

    pub fn with_collision(mut self, elasticity: F, damping: F) -> Self {
        self.collision_elasticity = elasticity;
        self.collision_damping = damping;
        self
    }

    pub fn with_mouse_spring(mut self, stiffness: F, damping: F) -> Self {
        self.spring_stiffness = stiffness;
        self.spring_damping = damping;
        self
    }

    pub fn with_box_half_extent(mut self, half_extent: F) -> Self {
        self.box_half_extent = half_extent;
        self
    }

    /// Velocity scale applied after a collision impulse, in [0, 1].
    pub fn collision_damping_scale(&self) -> F {
        (F::one() - self.collision_damping * self.time_step).clamp(F::zero(), F::one())
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        check_time_step(self.time_step)?;
        if !(self.body_mass > F::zero() && self.body_mass.is_finite()) {
            return Err(PhysicsError::InvalidMass);
        }
        check_non_negative("damping", self.damping)?;
        check_non_negative("gravity", self.gravity)?;
        check_non_negative("spring_stiffness", self.spring_stiffness)?;
        check_non_negative("spring_damping", self.spring_damping)?;
        check_non_negative("particle_radius", self.particle_radius)?;
        check_non_negative("collision_elasticity", self.collision_elasticity)?;
        check_non_negative("collision_damping", self.collision_damping)?;
        if !(self.box_half_extent > F::zero() && self.box_half_extent.is_finite()) {
            return Err(PhysicsError::InvalidParameter { name: "box_half_extent" });
        }
        Ok(())
    }
}

impl<F: Float> Default for RigidBodyConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_time_step<F: Float>(dt: F) -> Result<(), PhysicsError> {
    if dt > F::zero() && dt.is_finite() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidTimeStep)
    }
}

fn check_non_negative<F: Float>(name: &'static str, value: F) -> Result<(), PhysicsError> {
    if value >= F::zero() && value.is_finite() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidParameter { name })
    }
}
