//! Error types for entity construction and parameter validation.

use thiserror::Error;

/// Errors reported at construction and validation seams.
///
/// Stepping never returns an error: degenerate geometry contributes zero
/// force, and out-of-range indices on the hot path are precondition
/// violations that panic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Mass must be positive and finite.
    #[error("mass must be positive and finite")]
    InvalidMass,
    /// Time step must be positive and finite.
    #[error("time step must be positive and finite")]
    InvalidTimeStep,
    /// A coefficient was negative, NaN or infinite.
    #[error("parameter `{name}` must be finite and non-negative")]
    InvalidParameter { name: &'static str },
    /// Particle index is out of bounds.
    #[error("particle index {index} out of bounds (count: {count})")]
    ParticleOutOfBounds { index: usize, count: usize },
    /// Particle is still referenced by a spring, triangle or the mouse spring.
    #[error("particle {index} is referenced by a live constraint")]
    ParticleInUse { index: usize },
    /// Rigid body index is out of bounds.
    #[error("body index {index} out of bounds (count: {count})")]
    BodyOutOfBounds { index: usize, count: usize },
    /// Polygon has fewer than three points or no rotational inertia.
    #[error("polygon with {points} points is degenerate")]
    DegeneratePolygon { points: usize },
}
