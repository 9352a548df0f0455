//! 2D mass-spring networks and rigid polygons in a box.
//!
//! `jostle` simulates deformable bodies built from particles, damped springs
//! and area-preserving triangles, alongside convex rigid bodies with linear
//! and angular dynamics. Rendering and input live outside the crate: callers
//! add entities, move an interactive mouse spring, call `step()` once per
//! tick and read positions back.
//!
//! # Features
//!
//! - **Integrators**: Symplectic Euler, midpoint (RK2) and velocity Verlet
//! - **Wall collisions**: Penalty forces or velocity-reflection impulses
//! - **Rigid bodies**: Averaged wall contacts, convex narrow phase and
//!   impulse response with angular coupling
//! - **Observable**: Monitor steps and contacts via the `StepObserver` trait
//! - **`no_std` compatible**: Works in embedded and WASM environments
//!
//! # Example
//! ```
//! use jostle::{MassSpringConfig, MassSpringSystem, Vec2};
//!
//! let mut system = MassSpringSystem::new(MassSpringConfig::<f32>::new());
//! let a = system.add_particle(Vec2::new(0.0, 0.5), Vec2::zero(), true);
//! let b = system.add_particle(Vec2::new(0.1, 0.5), Vec2::zero(), false);
//! system.add_spring(a, b);
//! for _ in 0..100 {
//!     system.step();
//! }
//! assert!(system.particle(b).position.y < 0.5);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod spring;
pub mod constraint;
pub mod wall;
pub mod forces;
pub mod integrator;
pub mod collision;
pub mod rigid_body;
pub mod mass_spring;
pub mod rigid_body_system;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec2;
pub use particle::Particle;
pub use spring::{MouseSpring, Spring};
pub use constraint::AreaConstraint;
pub use wall::Wall;
pub use collision::Contact;
pub use rigid_body::RigidBody;
pub use mass_spring::MassSpringSystem;
pub use rigid_body_system::{BodyContact, RigidBodySystem};
pub use config::{CollisionMode, Integrator, MassSpringConfig, RigidBodyConfig};
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::PhysicsError;
