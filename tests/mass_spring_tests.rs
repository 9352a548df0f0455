use jostle::{CollisionMode, Integrator, MassSpringConfig, MassSpringSystem, StepObserver, Vec2};

fn quiet_config() -> MassSpringConfig<f64> {
    MassSpringConfig::new()
        .with_gravity(false)
        .with_damping(0.0)
        .with_collisions(CollisionMode::None)
}

/// Eight particles on a circle around a ninth, with rim and spoke springs
/// and one triangle per wedge.
fn circle(system: &mut MassSpringSystem<f64>, center: Vec2<f64>, velocity: Vec2<f64>) {
    let n = 8;
    let first = system.particle_count();
    for i in 0..n {
        let angle = i as f64 * core::f64::consts::TAU / n as f64;
        let p = center + Vec2::new(angle.cos(), angle.sin()) * 0.2;
        system.add_particle(p, velocity, false);
    }
    let hub = system.add_particle(center, velocity, false);
    for i in 0..n {
        let a = first + i;
        let b = first + (i + 1) % n;
        system.add_spring(a, b);
        system.add_spring(a, hub);
        system.add_triangle(a, b, hub);
    }
}

#[test]
fn single_particle_euler_step() {
    let mut system = MassSpringSystem::new(
        quiet_config()
            .with_integrator(Integrator::SymplecticEuler)
            .with_time_step(0.01),
    );
    let p = system.add_particle(Vec2::new(0.0, 0.0), Vec2::new(5.0, 5.0), false);
    system.step();

    let particle = system.particle(p);
    assert!((particle.position.x - 0.05).abs() < 1e-12, "x = {}", particle.position.x);
    assert!((particle.position.y - 0.05).abs() < 1e-12, "y = {}", particle.position.y);
    assert_eq!(particle.velocity, Vec2::new(5.0, 5.0));
}

#[test]
fn constraints_start_at_rest() {
    let mut system = MassSpringSystem::new(quiet_config());
    circle(&mut system, Vec2::new(-0.5, -0.5), Vec2::zero());

    for spring in system.springs() {
        let length = spring.length(system.particles());
        assert!((length - spring.rest_length()).abs() < 1e-12);
    }
    for triangle in system.triangles() {
        assert!((triangle.area(system.particles()) - triangle.rest_area()).abs() < 1e-12);
        assert!(triangle.rest_area() > 0.0);
    }

    system.compute_forces();
    for p in system.particles() {
        assert!(p.force.length() < 1e-9, "force at rest = {:?}", p.force);
    }
}

#[test]
fn squashed_triangle_pushes_back_out() {
    let mut system = MassSpringSystem::new(quiet_config());
    let a = system.add_particle(Vec2::new(0.0, 0.0), Vec2::zero(), false);
    let b = system.add_particle(Vec2::new(0.1, 0.0), Vec2::zero(), false);
    let c = system.add_particle(Vec2::new(0.0, 0.1), Vec2::zero(), false);
    system.add_triangle(a, b, c);

    system.particle_mut(c).position = Vec2::new(0.0, 0.05);
    system.compute_forces();
    assert!(system.particle(c).force.y > 0.0);

    let before = system.triangles()[0].area(system.particles());
    for _ in 0..20 {
        system.step();
    }
    let after = system.triangles()[0].area(system.particles());
    assert!(after > before, "area {} -> {}", before, after);
}

#[test]
fn locked_particles_hold_under_every_integrator() {
    for integrator in [Integrator::SymplecticEuler, Integrator::Midpoint, Integrator::VelocityVerlet] {
        for collisions in [CollisionMode::Penalty, CollisionMode::Impulse] {
            let mut system = MassSpringSystem::new(
                MassSpringConfig::new()
                    .with_integrator(integrator)
                    .with_collisions(collisions),
            );
            // Hanging chain with its first link locked.
            for i in 0..10 {
                let locked = i == 0;
                system.add_particle(Vec2::new(i as f64 * 0.1, 0.8), Vec2::zero(), locked);
                if i > 0 {
                    system.add_spring(i - 1, i);
                }
            }
            // A locked particle touching the floor with a stored velocity.
            let floor = system.add_particle(Vec2::new(0.5, -0.99), Vec2::new(0.0, -1.0), true);

            for _ in 0..500 {
                system.step();
                assert_eq!(system.particle(0).position, Vec2::new(0.0, 0.8));
                assert_eq!(system.particle(0).velocity, Vec2::zero());
                assert_eq!(system.particle(floor).position, Vec2::new(0.5, -0.99));
                assert_eq!(system.particle(floor).velocity, Vec2::new(0.0, -1.0));
            }
            // The free end has fallen.
            assert!(system.particle(9).position.y < 0.8);
        }
    }
}

#[test]
fn set_locked_freezes_a_moving_particle() {
    let mut system = MassSpringSystem::new(MassSpringConfig::<f64>::new());
    let p = system.add_particle(Vec2::new(0.0, 0.5), Vec2::new(1.0, 0.0), false);
    system.step();
    system.set_locked(p, true);
    let frozen = system.particle(p).position;
    for _ in 0..10 {
        system.step();
    }
    assert_eq!(system.particle(p).position, frozen);
}

#[test]
fn drag_pulls_particle_toward_target() {
    let mut system = MassSpringSystem::new(quiet_config());
    let p = system.add_particle(Vec2::new(0.0, 0.0), Vec2::zero(), false);
    system.begin_drag(Vec2::new(0.01, 0.0));
    system.update_drag(Vec2::new(0.5, 0.0));
    assert_eq!(system.drag_target(), Some(Vec2::new(0.5, 0.0)));

    for _ in 0..200 {
        system.step();
    }
    assert!(system.particle(p).position.x > 0.0);

    system.end_drag();
    assert_eq!(system.drag_target(), None);
}

#[test]
fn geometry_accessors_match_entities() {
    let mut system = MassSpringSystem::new(quiet_config());
    circle(&mut system, Vec2::zero(), Vec2::zero());
    assert_eq!(system.positions().len(), 9);
    assert_eq!(system.spring_indices().len(), 16);
    assert_eq!(system.spring_indices()[1], [0, 8]);
    assert_eq!(system.triangle_indices()[7], [7, 0, 8]);
    let corners = system.wall_corners();
    assert_eq!(corners.len(), 5);
    assert_eq!(corners[2], Vec2::new(1.0, 1.0));
}

#[test]
fn gravity_energy_counts_height() {
    let mut system = MassSpringSystem::new(MassSpringConfig::<f64>::new().with_damping(0.0));
    system.add_particle_with_mass(Vec2::new(0.0, 0.5), Vec2::new(2.0, 0.0), 1.0, false);
    let g = system.config.gravity;
    // 0.5 * 1 * 4 + 1 * g * 0.5
    assert!((system.total_energy() - (2.0 + g * 0.5)).abs() < 1e-12);
    system.config.use_gravity = false;
    assert!((system.total_energy() - 2.0).abs() < 1e-12);
}

#[derive(Default)]
struct CountingObserver {
    forces: usize,
    wall_hits: usize,
    steps: usize,
}

impl StepObserver<f64> for CountingObserver {
    fn on_forces_computed(&mut self) {
        self.forces += 1;
    }

    fn on_particle_wall_contact(&mut self, _particle: usize, wall: usize) {
        assert_eq!(wall, 0);
        self.wall_hits += 1;
    }

    fn on_step_complete(&mut self) {
        self.steps += 1;
    }
}

#[test]
fn observer_sees_each_step_once() {
    let mut system = MassSpringSystem::new(
        quiet_config()
            .with_integrator(Integrator::Midpoint)
            .with_collisions(CollisionMode::Impulse)
            .with_collision(1000.0, 0.0),
    );
    system.add_particle(Vec2::new(0.0, -0.99), Vec2::new(0.0, -1.0), false);
    let mut observer = CountingObserver::default();
    for _ in 0..5 {
        system.step_with(&mut observer);
    }
    assert_eq!(observer.steps, 5);
    assert_eq!(observer.forces, 5);
    assert_eq!(observer.wall_hits, 1);
}
