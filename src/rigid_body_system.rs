//! Rigid polygons in a box: forces, wall impulses, pairwise contact and Euler integration.

use crate::collision::{detect_collision, resolve_collision, resolve_static_contact, wall_contact, Contact};
use crate::config::RigidBodyConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::rigid_body::RigidBody;
use crate::spring::MouseSpring;
use crate::vec::Vec2;
use crate::wall::{box_corners, Wall};
use alloc::vec::Vec as AllocVec;
use tracing::{debug, trace, warn};

/// A body-body contact found during the last step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BodyContact<F: Float> {
    pub first: usize,
    pub second: usize,
    pub contact: Contact<F>,
}

/// Owns the bodies and the mouse spring. The box walls follow
/// `config.box_half_extent`.
///
/// The mouse spring anchor is a `(body, point)` pair.
pub struct RigidBodySystem<F: Float> {
    pub config: RigidBodyConfig<F>,
    bodies: AllocVec<RigidBody<F>>,
    mouse: Option<MouseSpring<F, (usize, usize)>>,
    contacts: AllocVec<BodyContact<F>>,
}

impl<F: Float> RigidBodySystem<F> {
    pub fn new(config: RigidBodyConfig<F>) -> Self {
        RigidBodySystem {
            config,
            bodies: AllocVec::new(),
            mouse: None,
            contacts: AllocVec::new(),
        }
    }

    pub fn reset_parameters(&mut self) {
        let half_extent = self.config.box_half_extent;
        self.config = RigidBodyConfig::new().with_box_half_extent(half_extent);
    }

    /// Replace the configuration after validating it.
    pub fn set_config(&mut self, config: RigidBodyConfig<F>) -> Result<(), PhysicsError> {
        if let Err(err) = config.validate() {
            warn!(%err, "rejected rigid-body config");
            return Err(err);
        }
        self.config = config;
        Ok(())
    }

    /// Add a body of the configured mass from a convex world-space polygon.
    pub fn add_body(&mut self, points: &[Vec2<F>], velocity: Vec2<F>) -> Result<usize, PhysicsError> {
        self.add_body_with_mass(points, self.config.body_mass, velocity)
    }

    pub fn add_body_with_mass(
        &mut self,
        points: &[Vec2<F>],
        mass: F,
        velocity: Vec2<F>,
    ) -> Result<usize, PhysicsError> {
        let body = RigidBody::new(points, mass, velocity)?;
        let idx = self.bodies.len();
        debug!(index = idx, points = points.len(), "added rigid body");
        self.bodies.push(body);
        Ok(idx)
    }

    /// Remove a body. Releases the mouse spring if it held this body and
    /// shifts a held later body's index down.
    pub fn remove_body(&mut self, index: usize) -> Result<RigidBody<F>, PhysicsError> {
        let count = self.bodies.len();
        if index >= count {
            return Err(PhysicsError::BodyOutOfBounds { index, count });
        }
        let held = self.mouse.map(|m| m.anchor.0);
        if held == Some(index) {
            self.mouse = None;
        } else if let (Some(b), Some(m)) = (held, self.mouse.as_mut()) {
            if b > index {
                m.anchor.0 -= 1;
            }
        }
        self.contacts.clear();
        debug!(index, "removed rigid body");
        Ok(self.bodies.remove(index))
    }

    pub fn clear_bodies(&mut self) {
        debug!(bodies = self.bodies.len(), "clearing rigid bodies");
        self.bodies.clear();
        self.contacts.clear();
        self.mouse = None;
    }

    /// The body point closest to `point`, as `(body, point)` indices.
    pub fn nearest_point(&self, point: Vec2<F>) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), F)> = None;
        for (b, body) in self.bodies.iter().enumerate() {
            for (i, p) in body.points().iter().enumerate() {
                let d = p.distance_sq(point);
                match best {
                    Some((_, best_d)) if best_d <= d => {}
                    _ => best = Some(((b, i), d)),
                }
            }
        }
        best.map(|(anchor, _)| anchor)
    }

    pub fn begin_drag(&mut self, point: Vec2<F>) {
        self.mouse = self.nearest_point(point).map(|anchor| MouseSpring::new(point, anchor));
        if let Some(m) = &self.mouse {
            debug!(body = m.anchor.0, point = m.anchor.1, "mouse spring attached");
        }
    }

    pub fn update_drag(&mut self, point: Vec2<F>) {
        if let Some(m) = self.mouse.as_mut() {
            m.target = point;
        }
    }

    pub fn end_drag(&mut self) {
        if self.mouse.take().is_some() {
            debug!("mouse spring released");
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.mouse.is_some()
    }

    pub fn drag_target(&self) -> Option<Vec2<F>> {
        self.mouse.map(|m| m.target)
    }

    pub fn mouse_spring(&self) -> Option<&MouseSpring<F, (usize, usize)>> {
        self.mouse.as_ref()
    }

    /// Reset and accumulate force and torque on every body.
    pub fn compute_forces(&mut self) {
        let config = &self.config;
        let down = Vec2::new(F::zero(), -config.gravity);

        for body in self.bodies.iter_mut() {
            body.force = Vec2::zero();
            body.torque = F::zero();
            if config.use_gravity {
                body.force += down * body.mass();
            }
            body.force -= body.linear_velocity * config.damping;
            body.torque = body.torque - body.angular_velocity * config.damping;
        }

        if let Some(mouse) = &self.mouse {
            let (b, i) = mouse.anchor;
            let body = &mut self.bodies[b];
            let contact = body.points()[i];
            let f = mouse.force(
                contact,
                body.velocity_at(contact),
                config.spring_stiffness,
                config.spring_damping,
            );
            body.force += f;
            body.torque = body.torque + (contact - body.position).cross(f);
        }
    }

    /// One averaged impulse per body per wall it penetrates.
    pub fn handle_wall_collisions(&mut self) {
        self.wall_collisions(&mut NoOpStepObserver);
    }

    /// Detect and resolve every overlapping pair, recording the contacts.
    pub fn handle_body_collisions(&mut self) {
        self.body_collisions(&mut NoOpStepObserver);
    }

    /// Explicit Euler, gated by the linear and angular dynamics switches.
    pub fn integrate(&mut self) {
        let dt = self.config.time_step;
        let (linear, angular) = (self.config.use_linear_dynamics, self.config.use_angular_dynamics);
        for body in self.bodies.iter_mut() {
            if linear {
                body.position += body.linear_velocity * dt;
                body.linear_velocity += body.force * (dt * body.inv_mass());
            }
            if angular {
                body.orientation = body.orientation + body.angular_velocity * dt;
                body.angular_velocity = body.angular_velocity + body.torque * (dt * body.inv_inertia());
            }
            body.update_points();
        }
    }

    pub fn step(&mut self) {
        self.step_with(&mut NoOpStepObserver);
    }

    /// Forces, wall impulses, body impulses, then integration.
    pub fn step_with<O: StepObserver<F>>(&mut self, observer: &mut O) {
        self.compute_forces();
        observer.on_forces_computed();
        self.wall_collisions(observer);
        self.body_collisions(observer);
        self.integrate();
        observer.on_integrate();
        trace!(bodies = self.bodies.len(), contacts = self.contacts.len(), "rigid-body step");
        observer.on_step_complete();
    }

    fn wall_collisions<O: StepObserver<F>>(&mut self, observer: &mut O) {
        let elasticity = self.config.collision_elasticity;
        let scale = self.config.collision_damping_scale();
        let walls = self.walls();
        for (b, body) in self.bodies.iter_mut().enumerate() {
            for (w, wall) in walls.iter().enumerate() {
                let Some(contact) = wall_contact(body, wall) else {
                    continue;
                };
                if resolve_static_contact(body, &contact, elasticity, scale) {
                    trace!(body = b, wall = w, "body-wall impulse");
                    observer.on_body_wall_contact(b, w, &contact);
                }
            }
        }
    }

    fn body_collisions<O: StepObserver<F>>(&mut self, observer: &mut O) {
        let elasticity = self.config.collision_elasticity;
        let scale = self.config.collision_damping_scale();
        self.contacts.clear();

        let n = self.bodies.len();
        for i in 0..n {
            let (head, tail) = self.bodies.split_at_mut(i + 1);
            let b1 = &mut head[i];
            for (offset, b2) in tail.iter_mut().enumerate() {
                let j = i + 1 + offset;
                let Some(contact) = detect_collision(b1, b2) else {
                    continue;
                };
                trace!(first = i, second = j, "body contact");
                observer.on_body_contact(i, j, &contact);
                resolve_collision(b1, b2, &contact, elasticity, scale);
                self.contacts.push(BodyContact { first: i, second: j, contact });
            }
        }
    }

    pub fn bodies(&self) -> &[RigidBody<F>] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> &RigidBody<F> {
        &self.bodies[index]
    }

    pub fn body_mut(&mut self, index: usize) -> &mut RigidBody<F> {
        &mut self.bodies[index]
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// The four box walls at the configured half extent.
    pub fn walls(&self) -> [Wall<F>; 4] {
        Wall::box_walls(self.config.box_half_extent)
    }

    pub fn wall_corners(&self) -> AllocVec<Vec2<F>> {
        box_corners(&self.walls())
    }

    /// Body-body contacts detected during the most recent step.
    pub fn contacts(&self) -> &[BodyContact<F>] {
        &self.contacts
    }

    pub fn kinetic_energy(&self) -> F {
        self.bodies.iter().fold(F::zero(), |acc, b| acc + b.kinetic_energy())
    }
}

impl<F: Float> Default for RigidBodySystem<F> {
    fn default() -> Self {
        Self::new(RigidBodyConfig::new())
    }
}
