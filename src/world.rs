use rapier2d::parry::bounding_volume::{Aabb, BoundingVolume};
use rapier2d::{geometry::DefaultBroadPhase, prelude::*};

use crate::config::SceneConfig;
use crate::particles::{EmissionRect, ParticleSystem, ParticleSystemDef};
use crate::physics::{
    px_to_m, BodySnapshot, BALL_DENSITY, BALL_FRICTION, BALL_RESTITUTION, FIXED_TIME_STEP,
    GRAVITY, GROUP_BALL, GROUP_PARTICLE, GROUP_WALL, POINTER_DAMPING, POINTER_FORCE_PER_MASS,
    POINTER_PROBE_HALF_EXTENT, POINTER_STIFFNESS, SIZE_DRAGGABLE, SIZE_PARTICLE, WALL_THICKNESS,
};

/// Handles of a live pointer-follow constraint.
#[derive(Debug, Clone)]
pub struct PointerJoint {
    pub anchor_body_handle: RigidBodyHandle,
    pub joint_handle: ImpulseJointHandle,
    pub body_handle: RigidBodyHandle,
}

pub struct SimulationWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pub(crate) island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) rigid_body_set: RigidBodySet,
    pub(crate) collider_set: ColliderSet,
    pub(crate) impulse_joint_set: ImpulseJointSet,
    pub(crate) multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    particles: ParticleSystem,
    wall_body: RigidBodyHandle,
    ball: RigidBodyHandle,
    ball_radius: Real,
    time: Real,
}

impl SimulationWorld {
    pub fn new(config: &SceneConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = FIXED_TIME_STEP;

        let mut rigid_body_set = RigidBodySet::new();
        let mut collider_set = ColliderSet::new();

        let [width, height] = config.viewport.world_size();

        let wall_body = Self::spawn_walls(width, height, &mut rigid_body_set, &mut collider_set);

        let mut particles = ParticleSystem::new(ParticleSystemDef {
            radius: px_to_m(SIZE_PARTICLE),
        });
        let emission = EmissionRect {
            center: point![width / 2.0, -height / 2.0],
            half_extents: vector![
                px_to_m(config.particle_half_extents[0]),
                px_to_m(config.particle_half_extents[1])
            ],
        };
        let particle_count = particles.create_group(&emission, &mut rigid_body_set, &mut collider_set);

        let ball_radius = px_to_m(SIZE_DRAGGABLE);
        let ball_origin = vector![width / 2.0, config.ball_spawn_height_factor as Real * height];
        let ball = Self::spawn_ball(ball_origin, ball_radius, &mut rigid_body_set, &mut collider_set);

        tracing::info!(
            particles = particle_count,
            width_m = width,
            height_m = height,
            "scene created"
        );

        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![GRAVITY[0], GRAVITY[1]],
            integration_parameters,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set,
            collider_set,
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            particles,
            wall_body,
            ball,
            ball_radius,
            time: 0.0,
        }
    }

    /// Ground plus left and right walls on a single fixed body. No ceiling.
    fn spawn_walls(
        width: Real,
        height: Real,
        rigid_body_set: &mut RigidBodySet,
        collider_set: &mut ColliderSet,
    ) -> RigidBodyHandle {
        let handle = rigid_body_set.insert(RigidBodyBuilder::fixed().build());
        let thickness = px_to_m(WALL_THICKNESS);
        let offset = 0.05;

        let walls = [
            // (half extents, center)
            ([width / 2.0, thickness], [width / 2.0, height + offset]),
            ([thickness, height / 2.0], [-offset, height / 2.0]),
            ([thickness, height / 2.0], [width + offset, height / 2.0]),
        ];
        for (half, center) in walls {
            let collider = ColliderBuilder::cuboid(half[0], half[1])
                .translation(vector![center[0], center[1]])
                .collision_groups(InteractionGroups::new(
                    Group::from_bits_truncate(GROUP_WALL),
                    Group::from_bits_truncate(GROUP_BALL | GROUP_PARTICLE),
                ))
                .build();
            collider_set.insert_with_parent(collider, handle, rigid_body_set);
        }
        handle
    }

    fn spawn_ball(
        origin: Vector<Real>,
        radius: Real,
        rigid_body_set: &mut RigidBodySet,
        collider_set: &mut ColliderSet,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic().translation(origin).build();
        let handle = rigid_body_set.insert(body);
        let collider = ColliderBuilder::ball(radius)
            .density(BALL_DENSITY)
            .friction(BALL_FRICTION)
            .restitution(BALL_RESTITUTION)
            .collision_groups(InteractionGroups::new(
                Group::from_bits_truncate(GROUP_BALL),
                Group::from_bits_truncate(GROUP_WALL | GROUP_PARTICLE),
            ))
            .build();
        collider_set.insert_with_parent(collider, handle, rigid_body_set);
        handle
    }

    pub fn step(&mut self) {
        let physics_hooks = ();
        let event_handler = ();
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &physics_hooks,
            &event_handler,
        );
        self.time += self.integration_parameters.dt;
        self.particles.sync_positions(&self.rigid_body_set);
    }

    pub fn time(&self) -> Real {
        self.time
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn ball(&self) -> RigidBodyHandle {
        self.ball
    }

    pub fn ball_radius(&self) -> Real {
        self.ball_radius
    }

    pub fn wall_body(&self) -> RigidBodyHandle {
        self.wall_body
    }

    pub fn body_snapshot(&self, handle: RigidBodyHandle) -> Option<BodySnapshot> {
        self.rigid_body_set
            .get(handle)
            .map(|body| BodySnapshot {
                position: [body.translation().x as f32, body.translation().y as f32],
                velocity: [body.linvel().x as f32, body.linvel().y as f32],
                rotation: body.rotation().angle() as f32,
            })
    }

    pub fn ball_state(&self) -> Option<BodySnapshot> {
        self.body_snapshot(self.ball)
    }

    /// Find the dynamic, non-particle body whose shape contains `world_point`.
    pub fn query_dynamic_body_at(&self, world_point: Point<Real>) -> Option<RigidBodyHandle> {
        let half = vector![POINTER_PROBE_HALF_EXTENT, POINTER_PROBE_HALF_EXTENT];
        let probe = Aabb::new(world_point - half, world_point + half);
        let particle_group = Group::from_bits_truncate(GROUP_PARTICLE);

        for (_collider_handle, collider) in self.collider_set.iter() {
            if collider.collision_groups().memberships.intersects(particle_group) {
                continue;
            }
            if !collider.compute_aabb().intersects(&probe) {
                continue;
            }
            let Some(body_handle) = collider.parent() else {
                continue;
            };
            let is_dynamic = self
                .rigid_body_set
                .get(body_handle)
                .is_some_and(|body| body.is_dynamic());
            if is_dynamic && collider.shape().contains_point(collider.position(), &world_point) {
                return Some(body_handle);
            }
        }
        None
    }

    /// Attach `body_handle` to a kinematic anchor at `target` with a force-limited spring.
    pub fn create_pointer_joint(
        &mut self,
        body_handle: RigidBodyHandle,
        target: Point<Real>,
    ) -> Option<PointerJoint> {
        let mass: Real = self
            .rigid_body_set
            .get(body_handle)?
            .colliders()
            .iter()
            .filter_map(|handle| self.collider_set.get(*handle))
            .map(|collider| collider.mass())
            .sum();
        let max_force = POINTER_FORCE_PER_MASS * mass;

        let body = self.rigid_body_set.get_mut(body_handle)?;
        let local_anchor = body.position().inverse() * target;
        body.wake_up(true);

        let anchor_body = RigidBodyBuilder::kinematic_position_based()
            .translation(target.coords)
            .build();
        let anchor_body_handle = self.rigid_body_set.insert(anchor_body);

        let joint = GenericJointBuilder::new(JointAxesMask::empty())
            .local_anchor1(Point::origin())
            .local_anchor2(local_anchor)
            .motor_position(JointAxis::LinX, 0.0, POINTER_STIFFNESS, POINTER_DAMPING)
            .motor_position(JointAxis::LinY, 0.0, POINTER_STIFFNESS, POINTER_DAMPING)
            .motor_max_force(JointAxis::LinX, max_force)
            .motor_max_force(JointAxis::LinY, max_force)
            .build();
        let joint_handle =
            self.impulse_joint_set
                .insert(anchor_body_handle, body_handle, joint, true);

        tracing::debug!(?body_handle, max_force, "pointer joint created");
        Some(PointerJoint {
            anchor_body_handle,
            joint_handle,
            body_handle,
        })
    }

    /// Move the joint's anchor; the grabbed body is pulled there over the next steps.
    pub fn set_pointer_target(&mut self, joint: &PointerJoint, target: Point<Real>) {
        if let Some(anchor) = self.rigid_body_set.get_mut(joint.anchor_body_handle) {
            anchor.set_next_kinematic_translation(target.coords);
        }
        if let Some(body) = self.rigid_body_set.get_mut(joint.body_handle) {
            body.wake_up(true);
        }
    }

    pub fn destroy_pointer_joint(&mut self, joint: PointerJoint) {
        self.impulse_joint_set.remove(joint.joint_handle, true);
        self.rigid_body_set.remove(
            joint.anchor_body_handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        tracing::debug!(body_handle = ?joint.body_handle, "pointer joint destroyed");
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joint_set.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PerformanceLevel, Preset, Viewport};

    fn empty_scene(ball_spawn_height_factor: f32) -> SceneConfig {
        SceneConfig {
            viewport: Viewport::new(800.0, 600.0, 1.0),
            particle_half_extents: [0.0, 0.0],
            ball_spawn_height_factor,
        }
    }

    #[test]
    fn test_scene_layout() {
        let world = SimulationWorld::new(&empty_scene(-1.5));
        let ball = world.ball_state().unwrap();
        assert!((ball.position[0] - 4.0).abs() < 1e-5);
        assert!((ball.position[1] + 9.0).abs() < 1e-5);
        assert!((world.ball_radius() - 0.5).abs() < 1e-6);

        let walls = world.rigid_body_set.get(world.wall_body()).unwrap();
        assert!(walls.is_fixed());
        assert_eq!(walls.colliders().len(), 3);
        assert_eq!(world.particles().particle_count(), 0);
    }

    #[test]
    fn test_preset_scene_spawns_particles() {
        let config = SceneConfig::preset(
            Preset::Trails,
            PerformanceLevel::Low,
            Viewport::new(800.0, 600.0, 1.0),
        );
        let world = SimulationWorld::new(&config);
        // 128 x 256 px box at 8 px stride
        assert_eq!(world.particles().particle_count(), 16 * 32);
        for xy in world.particles().position_buffer().chunks(2) {
            assert!(xy[1] < 0.0, "particles start above the screen");
        }
    }

    #[test]
    fn test_ball_falls_and_lands_on_ground() {
        let mut world = SimulationWorld::new(&empty_scene(0.5));
        let start = world.ball_state().unwrap().position[1];
        world.step();
        assert!(world.ball_state().unwrap().position[1] > start);
        assert!((world.time() - FIXED_TIME_STEP).abs() < 1e-6);

        for _ in 0..300 {
            world.step();
        }
        let rest = world.ball_state().unwrap();
        // Ground top sits at 6.0 m, ball radius 0.5 m.
        assert!((rest.position[1] - 5.5).abs() < 0.05, "rest y = {}", rest.position[1]);
    }

    #[test]
    fn test_particle_buffer_follows_simulation() {
        let mut config = empty_scene(-1.5);
        config.particle_half_extents = [16.0, 16.0];
        let mut world = SimulationWorld::new(&config);
        let before = world.particles().position_buffer().to_vec();
        for _ in 0..10 {
            world.step();
        }
        let after = world.particles().position_buffer();
        assert_eq!(before.len(), after.len());
        assert!(after[1] > before[1], "particles fall with gravity");
    }

    #[test]
    fn test_query_hits_ball_only() {
        let mut config = empty_scene(0.5);
        config.particle_half_extents = [16.0, 16.0];
        let world = SimulationWorld::new(&config);

        assert_eq!(world.query_dynamic_body_at(point![4.0, 3.0]), Some(world.ball()));
        assert_eq!(world.query_dynamic_body_at(point![4.3, 3.3]), Some(world.ball()));
        // Inside the ball's bounding box but outside the circle.
        assert_eq!(world.query_dynamic_body_at(point![4.45, 3.45]), None);
        // Walls are not dynamic.
        assert_eq!(world.query_dynamic_body_at(point![4.0, 6.05]), None);
        // Particles are never pick targets.
        let xy = world.particles().position_buffer();
        assert_eq!(world.query_dynamic_body_at(point![xy[0], xy[1]]), None);
        assert_eq!(world.query_dynamic_body_at(point![1.0, 1.0]), None);
    }

    #[test]
    fn test_pointer_joint_lifecycle() {
        let mut world = SimulationWorld::new(&empty_scene(0.5));
        let bodies_before = world.rigid_body_set.len();

        let joint = world
            .create_pointer_joint(world.ball(), point![4.0, 3.0])
            .unwrap();
        assert_eq!(world.joint_count(), 1);
        assert_eq!(world.rigid_body_set.len(), bodies_before + 1);
        assert!(world
            .rigid_body_set
            .get(joint.anchor_body_handle)
            .unwrap()
            .is_kinematic());

        world.destroy_pointer_joint(joint);
        assert_eq!(world.joint_count(), 0);
        assert_eq!(world.rigid_body_set.len(), bodies_before);
    }

    #[test]
    fn test_pointer_joint_pulls_ball_to_target() {
        let mut world = SimulationWorld::new(&empty_scene(0.5));
        let joint = world
            .create_pointer_joint(world.ball(), point![4.0, 3.0])
            .unwrap();
        let target = point![2.5, 2.0];
        world.set_pointer_target(&joint, target);

        for _ in 0..180 {
            world.step();
        }
        let ball = world.ball_state().unwrap();
        let dx = ball.position[0] - target.x;
        let dy = ball.position[1] - target.y;
        assert!((dx * dx + dy * dy).sqrt() < 0.25, "ball at {:?}", ball.position);
    }

    #[test]
    fn test_pointer_joint_force_scales_with_mass() {
        let mut world = SimulationWorld::new(&empty_scene(0.5));
        let joint = world
            .create_pointer_joint(world.ball(), point![4.0, 3.0])
            .unwrap();

        let expected = POINTER_FORCE_PER_MASS * std::f32::consts::PI * 0.5 * 0.5 * BALL_DENSITY;
        let data = &world.impulse_joint_set.get(joint.joint_handle).unwrap().data;
        for axis in [JointAxis::LinX, JointAxis::LinY] {
            let max_force = data.motor(axis).unwrap().max_force;
            assert!((max_force - expected).abs() < 1.0, "max force {}", max_force);
        }
    }

    #[test]
    fn test_grab_wakes_resting_ball() {
        let mut world = SimulationWorld::new(&empty_scene(0.5));
        for _ in 0..600 {
            world.step();
        }
        let ball = world.ball();
        assert!(world.rigid_body_set.get(ball).unwrap().is_sleeping());
        let rest = world.ball_state().unwrap();

        let grab = point![rest.position[0], rest.position[1]];
        let joint = world.create_pointer_joint(ball, grab).unwrap();
        assert!(!world.rigid_body_set.get(ball).unwrap().is_sleeping());

        world.set_pointer_target(&joint, point![grab.x, grab.y - 2.0]);
        for _ in 0..120 {
            world.step();
        }
        let lifted = world.ball_state().unwrap();
        assert!(
            (lifted.position[1] - (rest.position[1] - 2.0)).abs() < 0.1,
            "ball at {:?}",
            lifted.position
        );
    }
}
