use rapier2d::prelude::*;

use crate::config::SceneConfig;
use crate::particles::ParticleSystem;
use crate::physics::BodySnapshot;
use crate::world::{PointerJoint, SimulationWorld};

/// Where the single pointer is in its press/drag cycle.
#[derive(Debug, Clone, Default)]
pub enum DragState {
    /// No pointer is down.
    #[default]
    Idle,
    /// Pointer is down but nothing draggable was under it.
    Probing,
    /// Pointer is down and holds a body through a joint.
    Dragging(PointerJoint),
}

/// A wrapper around SimulationWorld that adds pointer dragging
pub struct DraggableWorld {
    world: SimulationWorld,
    drag_state: DragState,
}

impl DraggableWorld {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            world: SimulationWorld::new(config),
            drag_state: DragState::Idle,
        }
    }

    /// Press at `world_point`. Returns true if a body was grabbed.
    pub fn pointer_down(&mut self, world_point: Point<Real>) -> bool {
        // Only one joint may exist at a time.
        self.release_joint();

        let grabbed = self
            .world
            .query_dynamic_body_at(world_point)
            .and_then(|body| self.world.create_pointer_joint(body, world_point));

        self.drag_state = match grabbed {
            Some(joint) => DragState::Dragging(joint),
            None => DragState::Probing,
        };
        self.is_dragging()
    }

    /// Move the pointer. Only has an effect while dragging.
    pub fn pointer_move(&mut self, world_point: Point<Real>) {
        if let DragState::Dragging(ref joint) = self.drag_state {
            self.world.set_pointer_target(joint, world_point);
        }
    }

    /// Release the pointer and drop the joint, if any.
    pub fn pointer_up(&mut self) {
        self.release_joint();
        self.drag_state = DragState::Idle;
    }

    fn release_joint(&mut self) {
        if let DragState::Dragging(joint) = std::mem::take(&mut self.drag_state) {
            self.world.destroy_pointer_joint(joint);
        }
    }

    pub fn state(&self) -> &DragState {
        &self.drag_state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag_state, DragState::Dragging(_))
    }

    pub fn is_pointer_down(&self) -> bool {
        !matches!(self.drag_state, DragState::Idle)
    }

    // Delegate SimulationWorld methods
    pub fn step(&mut self) {
        self.world.step();
    }

    pub fn time(&self) -> Real {
        self.world.time()
    }

    pub fn ball_state(&self) -> Option<BodySnapshot> {
        self.world.ball_state()
    }

    pub fn ball_radius(&self) -> Real {
        self.world.ball_radius()
    }

    pub fn particles(&self) -> &ParticleSystem {
        self.world.particles()
    }

    pub fn joint_count(&self) -> usize {
        self.world.joint_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Viewport;

    fn resting_ball_scene() -> DraggableWorld {
        let config = SceneConfig {
            viewport: Viewport::new(800.0, 600.0, 1.0),
            particle_half_extents: [0.0, 0.0],
            ball_spawn_height_factor: 0.5,
        };
        DraggableWorld::new(&config)
    }

    #[test]
    fn test_press_on_empty_space_probes() {
        let mut world = resting_ball_scene();
        assert!(!world.pointer_down(point![1.0, 1.0]));
        assert!(matches!(world.state(), DragState::Probing));
        assert!(world.is_pointer_down());
        assert_eq!(world.joint_count(), 0);

        // Moving while probing does not grab anything.
        world.pointer_move(point![4.0, 3.0]);
        assert!(matches!(world.state(), DragState::Probing));

        world.pointer_up();
        assert!(matches!(world.state(), DragState::Idle));
        assert!(!world.is_pointer_down());
    }

    #[test]
    fn test_press_on_ball_drags() {
        let mut world = resting_ball_scene();
        assert!(world.pointer_down(point![4.1, 3.1]));
        assert!(world.is_dragging());
        assert_eq!(world.joint_count(), 1);

        world.pointer_up();
        assert!(!world.is_dragging());
        assert_eq!(world.joint_count(), 0);
    }

    #[test]
    fn test_at_most_one_joint() {
        let mut world = resting_ball_scene();
        assert!(world.pointer_down(point![4.0, 3.0]));
        assert!(world.pointer_down(point![4.2, 3.0]));
        assert_eq!(world.joint_count(), 1);

        // A missed press drops the old joint too.
        assert!(!world.pointer_down(point![0.5, 0.5]));
        assert_eq!(world.joint_count(), 0);
    }

    #[test]
    fn test_release_without_press_is_harmless() {
        let mut world = resting_ball_scene();
        world.pointer_up();
        world.pointer_move(point![2.0, 2.0]);
        assert!(matches!(world.state(), DragState::Idle));
        assert_eq!(world.joint_count(), 0);
    }

    #[test]
    fn test_drag_moves_ball_and_release_lets_it_fall() {
        let mut world = resting_ball_scene();
        assert!(world.pointer_down(point![4.0, 3.0]));
        for i in 1..=60 {
            let t = i as Real / 60.0;
            world.pointer_move(point![4.0 - 2.0 * t, 3.0 - 1.0 * t]);
            world.step();
        }
        for _ in 0..60 {
            world.step();
        }
        let held = world.ball_state().unwrap();
        assert!((held.position[0] - 2.0).abs() < 0.25, "ball at {:?}", held.position);
        assert!((held.position[1] - 2.0).abs() < 0.25, "ball at {:?}", held.position);

        world.pointer_up();
        for _ in 0..30 {
            world.step();
        }
        assert!(world.ball_state().unwrap().position[1] > held.position[1] + 0.5);
    }
}
