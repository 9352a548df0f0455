//! Rigid polygons described by a centroid, an angle and frozen body-local offsets.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// A rigid polygon.
///
/// Mass is spread equally over the input points, so the moment of inertia is
/// the discrete sum `sum(m_i * |r_i|^2)` about the centroid rather than the
/// continuum inertia of the filled polygon. World points are always
/// `position + rotate(orientation) * r[i]`; call [`update_points`](Self::update_points)
/// after changing `position` or `orientation` directly.
#[derive(Clone, Debug)]
pub struct RigidBody<F: Float> {
    pub position: Vec2<F>,
    pub orientation: F,
    pub linear_velocity: Vec2<F>,
    pub angular_velocity: F,
    pub force: Vec2<F>,
    pub torque: F,
    mass: F,
    inertia: F,
    radius: F,
    winding: F,
    points: AllocVec<Vec2<F>>,
    r: AllocVec<Vec2<F>>,
}

impl<F: Float> RigidBody<F> {
    /// Build a body from a convex polygon in world space.
    ///
    /// Fails when there are fewer than three points, the mass is not positive,
    /// or all points coincide (no rotational inertia).
    pub fn new(points: &[Vec2<F>], mass: F, linear_velocity: Vec2<F>) -> Result<Self, PhysicsError> {
        if points.len() < 3 {
            return Err(PhysicsError::DegeneratePolygon { points: points.len() });
        }
        if !(mass > F::zero() && mass.is_finite()) {
            return Err(PhysicsError::InvalidMass);
        }

        let count = F::from_usize(points.len());
        let centroid = points.iter().fold(Vec2::zero(), |acc, &p| acc + p) / count;

        let r: AllocVec<Vec2<F>> = points.iter().map(|&p| p - centroid).collect();
        let radius = r.iter().fold(F::zero(), |acc, ri| acc.max(ri.length()));

        let point_mass = mass / count;
        let inertia = r.iter().fold(F::zero(), |acc, ri| acc + point_mass * ri.length_sq());
        if inertia.is_near_zero(F::epsilon()) {
            return Err(PhysicsError::DegeneratePolygon { points: points.len() });
        }

        // Shoelace sum; clockwise input polygons flip every edge normal.
        let n = r.len();
        let twice_area = (0..n).fold(F::zero(), |acc, i| acc + r[i].cross(r[(i + 1) % n]));
        let winding = if twice_area < F::zero() { -F::one() } else { F::one() };

        Ok(RigidBody {
            position: centroid,
            orientation: F::zero(),
            linear_velocity,
            angular_velocity: F::zero(),
            force: Vec2::zero(),
            torque: F::zero(),
            mass,
            inertia,
            radius,
            winding,
            points: points.to_vec(),
            r,
        })
    }

    pub fn mass(&self) -> F {
        self.mass
    }

    pub fn inertia(&self) -> F {
        self.inertia
    }

    /// Bounding-circle radius about the centroid.
    pub fn radius(&self) -> F {
        self.radius
    }

    /// Current world-space polygon.
    pub fn points(&self) -> &[Vec2<F>] {
        &self.points
    }

    /// Body-local offsets of each point from the centroid, fixed at construction.
    pub fn local_offsets(&self) -> &[Vec2<F>] {
        &self.r
    }

    pub fn inv_mass(&self) -> F {
        F::one() / self.mass
    }

    pub fn inv_inertia(&self) -> F {
        F::one() / self.inertia
    }

    /// Recompute every world point from the centroid, the angle and `r[i]`.
    pub fn update_points(&mut self) {
        let (s, c) = self.orientation.sin_cos();
        for (point, r) in self.points.iter_mut().zip(self.r.iter()) {
            *point = self.position + r.rotate_sin_cos(s, c);
        }
    }

    /// Velocity of the material point currently at `point`.
    pub fn velocity_at(&self, point: Vec2<F>) -> Vec2<F> {
        self.linear_velocity + Vec2::cross_scalar(self.angular_velocity, point - self.position)
    }

    /// Apply an instantaneous impulse at a world-space point.
    pub fn apply_impulse_at(&mut self, impulse: Vec2<F>, point: Vec2<F>) {
        let r = point - self.position;
        self.linear_velocity += impulse * self.inv_mass();
        self.angular_velocity = self.angular_velocity + r.cross(impulse) * self.inv_inertia();
    }

    /// Multiply both linear and angular velocity by `scale`.
    pub fn scale_velocity(&mut self, scale: F) {
        self.linear_velocity = self.linear_velocity * scale;
        self.angular_velocity = self.angular_velocity * scale;
    }

    pub fn kinetic_energy(&self) -> F {
        F::half() * (self.mass * self.linear_velocity.length_sq()
            + self.inertia * self.angular_velocity * self.angular_velocity)
    }

    /// Vertices followed by the midpoint of every edge.
    pub fn samples(&self) -> impl Iterator<Item = Vec2<F>> + '_ {
        let pts = &self.points;
        let n = pts.len();
        pts.iter()
            .copied()
            .chain((0..n).map(move |i| pts[i].midpoint(pts[(i + 1) % n])))
    }

    /// Outward unit normal of the edge from point `i` to point `i + 1`.
    pub fn edge_normal(&self, i: usize) -> Vec2<F> {
        let n = self.points.len();
        let p1 = self.points[i];
        let p2 = self.points[(i + 1) % n];
        ((p1 - p2).perp() * self.winding).normalize()
    }

    /// Containment test for a convex body, inclusive of the boundary.
    ///
    /// Returns the outward normal of the edge nearest to `point` when the
    /// point's signed distance to every edge line is non-positive.
    pub fn contains(&self, point: Vec2<F>) -> Option<Vec2<F>> {
        let mut nearest: Option<(F, Vec2<F>)> = None;
        for i in 0..self.points.len() {
            let normal = self.edge_normal(i);
            if normal == Vec2::zero() {
                continue;
            }
            let distance = (point - self.points[i]).dot(normal);
            if distance > F::zero() {
                return None;
            }
            match nearest {
                Some((best, _)) if best >= distance => {}
                _ => nearest = Some((distance, normal)),
            }
        }
        nearest.map(|(_, normal)| normal)
    }
}
