use jostle::collision::detect_collision;
use jostle::{RigidBody, RigidBodyConfig, RigidBodySystem, StepObserver, Contact, Vec2};

fn square(center: Vec2<f64>, half: f64) -> Vec<Vec2<f64>> {
    vec![
        center + Vec2::new(-half, -half),
        center + Vec2::new(half, -half),
        center + Vec2::new(half, half),
        center + Vec2::new(-half, half),
    ]
}

fn frictionless() -> RigidBodyConfig<f64> {
    RigidBodyConfig::new()
        .with_gravity(false)
        .with_damping(0.0)
        .with_collision(1.0, 0.0)
}

#[test]
fn unit_square_inertia_is_point_mass_sum() {
    let mass = 3.0;
    let body = RigidBody::new(&square(Vec2::zero(), 0.5), mass, Vec2::zero()).unwrap();
    assert_eq!(body.position, Vec2::zero());
    // Each corner sits at |r|^2 = 0.5, so the average is 0.5.
    assert!((body.inertia() - mass * 0.5).abs() < 1e-12);
    assert_eq!(body.mass(), mass);
    for (r, p) in body.local_offsets().iter().zip(body.points()) {
        assert_eq!(*r, *p - body.position);
    }
}

#[test]
fn separated_bodies_never_collide() {
    let a = RigidBody::new(&square(Vec2::new(-0.6, 0.0), 0.2), 1.0, Vec2::zero()).unwrap();
    let b = RigidBody::new(&square(Vec2::new(0.6, 0.1), 0.2), 1.0, Vec2::zero()).unwrap();
    assert!(detect_collision(&a, &b).is_none());
    assert!(detect_collision(&b, &a).is_none());
}

#[test]
fn overlapping_unit_squares_collide() {
    let offsets = [
        Vec2::new(0.5, 0.0),
        Vec2::new(0.0, -0.5),
        Vec2::new(0.3, 0.4),
        Vec2::new(-0.7, 0.2),
    ];
    for offset in offsets {
        let a = RigidBody::new(&square(Vec2::zero(), 0.5), 1.0, Vec2::zero()).unwrap();
        let b = RigidBody::new(&square(offset, 0.5), 1.0, Vec2::zero()).unwrap();
        let contact = detect_collision(&a, &b).expect("overlapping squares must collide");
        assert!((contact.normal.length() - 1.0).abs() < 1e-9, "normal {:?}", contact.normal);
    }
}

#[test]
fn contact_normal_pushes_first_body_away() {
    let offset = Vec2::new(0.7, 0.05);
    let a = RigidBody::new(&square(Vec2::zero(), 0.5), 1.0, Vec2::zero()).unwrap();
    let b = RigidBody::new(&square(offset, 0.5), 1.0, Vec2::zero()).unwrap();
    let contact = detect_collision(&a, &b).unwrap();
    assert!(contact.normal.dot(offset) < 0.0, "normal {:?}", contact.normal);
    // The contact sits inside the overlap region.
    assert!(contact.point.x > 0.19 && contact.point.x < 0.51);
}

#[test]
fn flat_square_bounces_off_floor() {
    let mut system = RigidBodySystem::new(frictionless().with_time_step(0.001));
    system.add_body(&square(Vec2::new(0.0, -0.85), 0.1), Vec2::new(0.0, -1.0)).unwrap();

    let mut lowest = f64::MAX;
    for _ in 0..200 {
        system.step();
        lowest = lowest.min(system.body(0).points()[0].y);
    }
    let body = system.body(0);
    assert!((body.linear_velocity.y - 1.0).abs() < 1e-12);
    assert_eq!(body.angular_velocity, 0.0);
    assert!(lowest > -1.01);
}

#[test]
fn tilted_square_spins_on_impact() {
    let mut system = RigidBodySystem::new(frictionless().with_collision(0.5, 2.0));
    system.add_body(&square(Vec2::new(0.0, -0.8), 0.1), Vec2::new(0.0, -1.0)).unwrap();
    system.body_mut(0).orientation = 0.3;
    system.body_mut(0).update_points();

    for _ in 0..400 {
        system.step();
    }
    let body = system.body(0);
    assert!(body.angular_velocity.abs() > 0.0);
    assert!(body.linear_velocity.y > -1.0);
}

#[test]
fn linear_toggle_freezes_translation() {
    let mut system = RigidBodySystem::new(RigidBodyConfig::<f64>::new().with_dynamics(false, true));
    system.add_body(&square(Vec2::new(0.2, 0.3), 0.1), Vec2::new(1.0, 0.0)).unwrap();
    system.body_mut(0).angular_velocity = 2.0;
    let start = system.body(0).position;

    for _ in 0..50 {
        system.step();
    }
    let body = system.body(0);
    assert_eq!(body.position, start);
    assert_eq!(body.linear_velocity, Vec2::new(1.0, 0.0));
    assert!(body.orientation > 0.0);
    // Points still follow the rotation about the fixed centroid.
    let r = body.points()[0] - body.position;
    assert!((r.length() - body.local_offsets()[0].length()).abs() < 1e-12);
}

#[test]
fn angular_toggle_freezes_rotation() {
    let mut system = RigidBodySystem::new(RigidBodyConfig::<f64>::new().with_dynamics(true, false));
    system.add_body(&square(Vec2::zero(), 0.1), Vec2::zero()).unwrap();
    system.body_mut(0).angular_velocity = 2.0;
    for _ in 0..50 {
        system.step();
    }
    let body = system.body(0);
    assert_eq!(body.orientation, 0.0);
    assert_eq!(body.angular_velocity, 2.0);
    assert!(body.position.y < 0.0);
}

#[test]
fn mouse_spring_drags_and_twists() {
    let mut system = RigidBodySystem::new(RigidBodyConfig::<f64>::new().with_gravity(false));
    system.add_body(&square(Vec2::zero(), 0.1), Vec2::zero()).unwrap();
    system.begin_drag(Vec2::new(0.12, 0.11));
    assert_eq!(system.mouse_spring().map(|m| m.anchor), Some((0, 2)));
    system.update_drag(Vec2::new(0.6, 0.1));

    for _ in 0..5 {
        system.step();
    }
    let body = system.body(0);
    assert!(body.position.x > 0.0);
    // Pulling the upper-right corner to the right turns the body clockwise.
    assert!(body.angular_velocity < 0.0);

    system.end_drag();
    assert!(!system.is_dragging());
    assert_eq!(system.drag_target(), None);
}

#[test]
fn impulse_at_point_matches_velocity_field() {
    let mut body = RigidBody::new(&square(Vec2::zero(), 0.5), 1.0, Vec2::zero()).unwrap();
    body.apply_impulse_at(Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.5));
    assert!((body.linear_velocity.x - 1.0).abs() < 1e-12);
    // r x J = (0, 0.5) x (1, 0) = -0.5, over inertia 0.5.
    assert!((body.angular_velocity + 1.0).abs() < 1e-12);
    let top = body.velocity_at(Vec2::new(0.0, 0.5));
    assert!((top.x - 1.5).abs() < 1e-12);
    let energy = body.kinetic_energy();
    assert!((energy - (0.5 + 0.25)).abs() < 1e-12);
}

#[test]
fn clockwise_bodies_still_collide() {
    let mut cw = square(Vec2::new(0.15, 0.0), 0.1);
    cw.reverse();
    let a = RigidBody::new(&square(Vec2::zero(), 0.1), 1.0, Vec2::zero()).unwrap();
    let b = RigidBody::new(&cw, 1.0, Vec2::zero()).unwrap();
    let contact = detect_collision(&a, &b).unwrap();
    assert!(contact.normal.x < 0.0);
}

#[derive(Default)]
struct ContactLog {
    pairs: Vec<(usize, usize)>,
    wall_hits: usize,
}

impl StepObserver<f64> for ContactLog {
    fn on_body_wall_contact(&mut self, _body: usize, _wall: usize, _contact: &Contact<f64>) {
        self.wall_hits += 1;
    }

    fn on_body_contact(&mut self, first: usize, second: usize, _contact: &Contact<f64>) {
        self.pairs.push((first, second));
    }
}

#[test]
fn observer_and_contacts_agree() {
    let mut system = RigidBodySystem::new(frictionless());
    system.add_body(&square(Vec2::new(-0.3, 0.0), 0.1), Vec2::new(1.0, 0.0)).unwrap();
    system.add_body(&square(Vec2::new(0.3, 0.0), 0.1), Vec2::new(-1.0, 0.0)).unwrap();

    let mut log = ContactLog::default();
    let mut seen = 0;
    for _ in 0..600 {
        system.step_with(&mut log);
        seen += system.contacts().len();
    }
    assert!(!log.pairs.is_empty());
    assert_eq!(log.pairs.len(), seen);
    assert!(log.pairs.iter().all(|&pair| pair == (0, 1)));
    // Elastic and symmetric: the pair has flown apart.
    assert!(system.body(0).linear_velocity.x < 0.0);
    assert!(system.body(1).linear_velocity.x > 0.0);
    assert_eq!(log.wall_hits, 0);
}

#[test]
fn clear_and_remove_bodies() {
    let mut system = RigidBodySystem::new(RigidBodyConfig::<f64>::new());
    system.add_body(&square(Vec2::new(-0.5, 0.0), 0.1), Vec2::zero()).unwrap();
    system.add_body(&square(Vec2::new(0.5, 0.0), 0.1), Vec2::zero()).unwrap();
    let removed = system.remove_body(0).unwrap();
    assert!((removed.position.x + 0.5).abs() < 1e-12);
    assert_eq!(system.body_count(), 1);
    assert!((system.bodies()[0].position.x - 0.5).abs() < 1e-12);
    system.clear_bodies();
    assert!(system.bodies().is_empty());
    assert_eq!(system.wall_corners().len(), 5);
}
