use jostle::{
    CollisionMode, Contact, Integrator, MassSpringSystem, PhysicsError, RigidBodySystem,
    StepObserver, Vec2,
};
use wasm_bindgen::prelude::*;

fn flatten(points: &[Vec2<f32>]) -> Vec<f32> {
    let mut out = Vec::with_capacity(points.len() * 2);
    for p in points {
        out.push(p.x);
        out.push(p.y);
    }
    out
}

fn to_js(err: PhysicsError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ---- Mass-Spring Demo ----

#[wasm_bindgen]
pub struct MassSpringDemo {
    system: MassSpringSystem<f32>,
}

#[wasm_bindgen]
impl MassSpringDemo {
    /// Scenes: 0 single particle, 1 triangle, 2 circle body, 3 hanging chain.
    #[wasm_bindgen(constructor)]
    pub fn new(scene: u32) -> Self {
        let mut demo = MassSpringDemo { system: MassSpringSystem::default() };
        demo.load_scene(scene);
        demo
    }

    pub fn load_scene(&mut self, scene: u32) {
        let system = &mut self.system;
        system.clear();
        match scene {
            0 => {
                system.add_particle(Vec2::new(-0.8, -0.8), Vec2::new(5.0, 5.0), false);
            }
            1 => {
                let a = system.add_particle(Vec2::new(-0.1, 0.7), Vec2::zero(), false);
                let b = system.add_particle(Vec2::new(0.0, 0.6), Vec2::zero(), false);
                let c = system.add_particle(Vec2::new(0.1, 0.7), Vec2::zero(), false);
                system.add_spring(a, b);
                system.add_spring(b, c);
                system.add_spring(c, a);
                system.add_triangle(a, b, c);
            }
            2 => {
                let n = 8;
                let center = Vec2::new(-0.5, -0.5);
                let velocity = Vec2::new(5.0, 5.0);
                for i in 0..n {
                    let angle = i as f32 * core::f32::consts::TAU / n as f32;
                    let p = center + Vec2::new(angle.cos(), angle.sin()) * 0.2;
                    system.add_particle(p, velocity, false);
                }
                let hub = system.add_particle(center, velocity, false);
                for i in 0..n {
                    system.add_spring(i, (i + 1) % n);
                    system.add_spring(i, hub);
                    system.add_triangle(i, (i + 1) % n, hub);
                }
            }
            _ => {
                for i in 0..10 {
                    system.add_particle(Vec2::new(i as f32 * 0.1, 0.8), Vec2::zero(), i == 0);
                    if i > 0 {
                        system.add_spring(i - 1, i);
                    }
                }
            }
        }
    }

    /// Advance by `steps` fixed time steps.
    pub fn update(&mut self, steps: u32) {
        for _ in 0..steps {
            self.system.step();
        }
    }

    /// 0 symplectic Euler, 1 midpoint, 2 velocity Verlet.
    pub fn set_integrator(&mut self, scheme: u32) {
        self.system.config.integrator = match scheme {
            1 => Integrator::Midpoint,
            2 => Integrator::VelocityVerlet,
            _ => Integrator::SymplecticEuler,
        };
    }

    /// 0 none, 1 penalty forces, 2 impulses.
    pub fn set_collisions(&mut self, mode: u32) {
        self.system.config.collisions = match mode {
            0 => CollisionMode::None,
            2 => CollisionMode::Impulse,
            _ => CollisionMode::Penalty,
        };
    }

    pub fn set_gravity(&mut self, enabled: bool) {
        self.system.config.use_gravity = enabled;
    }

    pub fn set_time_step(&mut self, dt: f32) -> Result<(), JsValue> {
        let config = self.system.config.clone().with_time_step(dt);
        self.system.set_config(config).map_err(to_js)
    }

    pub fn set_damping(&mut self, damping: f32) -> Result<(), JsValue> {
        let config = self.system.config.clone().with_damping(damping);
        self.system.set_config(config).map_err(to_js)
    }

    pub fn set_springs(&mut self, stiffness: f32, damping: f32) -> Result<(), JsValue> {
        let config = self.system.config.clone().with_springs(stiffness, damping);
        self.system.set_config(config).map_err(to_js)
    }

    pub fn set_area_stiffness(&mut self, stiffness: f32) -> Result<(), JsValue> {
        let config = self.system.config.clone().with_area_stiffness(stiffness);
        self.system.set_config(config).map_err(to_js)
    }

    pub fn reset_parameters(&mut self) {
        self.system.reset_parameters();
    }

    pub fn begin_drag(&mut self, x: f32, y: f32) {
        self.system.begin_drag(Vec2::new(x, y));
    }

    pub fn update_drag(&mut self, x: f32, y: f32) {
        self.system.update_drag(Vec2::new(x, y));
    }

    pub fn end_drag(&mut self) {
        self.system.end_drag();
    }

    /// Returns [particle_x, particle_y, target_x, target_y] while dragging, else empty.
    pub fn drag_line(&self) -> Vec<f32> {
        match (self.system.mouse_spring(), self.system.drag_target()) {
            (Some(m), Some(t)) => {
                let p = self.system.particle(m.anchor).position;
                vec![p.x, p.y, t.x, t.y]
            }
            _ => Vec::new(),
        }
    }

    /// Returns flat [x0, y0, x1, y1, ...] positions
    pub fn positions(&self) -> Vec<f32> {
        flatten(&self.system.positions())
    }

    /// Returns flat [a0, b0, a1, b1, ...] particle indices
    pub fn spring_indices(&self) -> Vec<u32> {
        self.system
            .spring_indices()
            .iter()
            .flat_map(|[a, b]| [*a as u32, *b as u32])
            .collect()
    }

    pub fn triangle_indices(&self) -> Vec<u32> {
        self.system
            .triangle_indices()
            .iter()
            .flat_map(|t| t.map(|i| i as u32))
            .collect()
    }

    pub fn wall_corners(&self) -> Vec<f32> {
        flatten(&self.system.wall_corners())
    }

    pub fn particle_radius(&self) -> f32 {
        self.system.config.particle_radius
    }

    pub fn energy(&self) -> f32 {
        self.system.total_energy()
    }
}

// ---- Rigid Body Demo ----

fn random_color() -> [f32; 3] {
    [
        js_sys::Math::random() as f32,
        js_sys::Math::random() as f32,
        js_sys::Math::random() as f32,
    ]
}

/// Recolours both bodies of every detected contact pair.
struct Highlighter<'a> {
    colors: &'a mut Vec<[f32; 3]>,
}

impl StepObserver<f32> for Highlighter<'_> {
    fn on_body_contact(&mut self, first: usize, second: usize, _contact: &Contact<f32>) {
        self.colors[first] = random_color();
        self.colors[second] = random_color();
    }
}

#[wasm_bindgen]
pub struct RigidBodyDemo {
    system: RigidBodySystem<f32>,
    colors: Vec<[f32; 3]>,
}

#[wasm_bindgen]
impl RigidBodyDemo {
    /// Scenes: 0 square, 1 bar, 2 T-shape, 3 three bodies.
    #[wasm_bindgen(constructor)]
    pub fn new(scene: u32) -> Result<RigidBodyDemo, JsValue> {
        let mut demo = RigidBodyDemo { system: RigidBodySystem::default(), colors: Vec::new() };
        demo.load_scene(scene)?;
        Ok(demo)
    }

    pub fn load_scene(&mut self, scene: u32) -> Result<(), JsValue> {
        self.system.clear_bodies();
        self.colors.clear();
        let v = Vec2::<f32>::new;
        let bodies: Vec<(Vec<Vec2<f32>>, Vec2<f32>)> = match scene {
            0 => vec![(
                vec![v(-0.6, -0.6), v(-0.4, -0.6), v(-0.4, -0.4), v(-0.6, -0.4)],
                Vec2::zero(),
            )],
            1 => vec![(
                vec![
                    v(-0.3, -0.1), v(-0.1, -0.1), v(0.1, -0.1), v(0.3, -0.1),
                    v(0.3, 0.1), v(0.1, 0.1), v(-0.1, 0.1), v(-0.3, 0.1),
                ],
                Vec2::zero(),
            )],
            2 => vec![(
                vec![
                    v(-0.5, 0.1), v(-0.5, 0.0), v(0.0, 0.0), v(0.0, -0.3),
                    v(0.1, -0.3), v(0.1, 0.0), v(0.3, 0.0), v(0.3, 0.1),
                ],
                Vec2::zero(),
            )],
            _ => vec![
                (vec![v(-0.6, -0.6), v(-0.4, -0.6), v(-0.4, -0.4)], v(0.2, 0.5)),
                (vec![v(0.6, 0.6), v(0.4, 0.6), v(0.4, 0.4), v(0.6, 0.4)], v(0.4, 0.3)),
                (
                    vec![v(0.7, -0.4), v(0.5, -0.25), v(0.3, -0.4), v(0.4, -0.6), v(0.6, -0.6)],
                    v(-0.4, 0.3),
                ),
            ],
        };
        for (points, velocity) in bodies {
            self.system.add_body(&points, velocity).map_err(to_js)?;
            self.colors.push([0.6, 0.6, 0.6]);
        }
        Ok(())
    }

    pub fn update(&mut self, steps: u32) {
        let mut highlighter = Highlighter { colors: &mut self.colors };
        for _ in 0..steps {
            self.system.step_with(&mut highlighter);
        }
    }

    pub fn set_gravity(&mut self, enabled: bool) {
        self.system.config.use_gravity = enabled;
    }

    pub fn set_dynamics(&mut self, linear: bool, angular: bool) {
        self.system.config.use_linear_dynamics = linear;
        self.system.config.use_angular_dynamics = angular;
    }

    pub fn set_collision(&mut self, elasticity: f32, damping: f32) -> Result<(), JsValue> {
        let config = self.system.config.clone().with_collision(elasticity, damping);
        self.system.set_config(config).map_err(to_js)
    }

    pub fn set_damping(&mut self, damping: f32) -> Result<(), JsValue> {
        let config = self.system.config.clone().with_damping(damping);
        self.system.set_config(config).map_err(to_js)
    }

    pub fn reset_parameters(&mut self) {
        self.system.reset_parameters();
    }

    pub fn begin_drag(&mut self, x: f32, y: f32) {
        self.system.begin_drag(Vec2::new(x, y));
    }

    pub fn update_drag(&mut self, x: f32, y: f32) {
        self.system.update_drag(Vec2::new(x, y));
    }

    pub fn end_drag(&mut self) {
        self.system.end_drag();
    }

    /// Returns [point_x, point_y, target_x, target_y] while dragging, else empty.
    pub fn drag_line(&self) -> Vec<f32> {
        match (self.system.mouse_spring(), self.system.drag_target()) {
            (Some(m), Some(t)) => {
                let (b, i) = m.anchor;
                let p = self.system.body(b).points()[i];
                vec![p.x, p.y, t.x, t.y]
            }
            _ => Vec::new(),
        }
    }

    pub fn body_count(&self) -> usize {
        self.system.body_count()
    }

    /// Returns world points for body at index as flat [x0, y0, x1, y1, ...]
    pub fn body_points(&self, index: usize) -> Vec<f32> {
        flatten(self.system.body(index).points())
    }

    /// Returns [r, g, b] in 0..1 for body at index
    pub fn body_color(&self, index: usize) -> Vec<f32> {
        self.colors[index].to_vec()
    }

    pub fn point_radius(&self) -> f32 {
        self.system.config.particle_radius
    }

    pub fn wall_corners(&self) -> Vec<f32> {
        flatten(&self.system.wall_corners())
    }

    pub fn energy(&self) -> f32 {
        self.system.kinetic_energy()
    }
}
