use crate::draggable_world::DraggableWorld;
use crate::physics::{METER, SIZE_DRAGGABLE, SIZE_PARTICLE};

/// Everything a renderer needs for one frame, in screen pixels.
#[derive(Debug, Clone)]
pub struct FrameState {
    pub particles: Vec<[f32; 2]>,
    pub ball: Option<[f32; 2]>,
    pub ball_radius: f32,
    pub particle_radius: f32,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            ball: None,
            ball_radius: SIZE_DRAGGABLE,
            particle_radius: SIZE_PARTICLE,
        }
    }
}

/// Scale a flat `[x0, y0, x1, y1, ...]` buffer in meters into pixel positions.
pub fn buffer_to_screen(buffer: &[f32], out: &mut Vec<[f32; 2]>) {
    out.clear();
    out.extend(buffer.chunks_exact(2).map(|xy| [xy[0] * METER, xy[1] * METER]));
}

impl DraggableWorld {
    /// Copy the current physics state into `frame`, reusing its allocation.
    pub fn write_frame(&self, frame: &mut FrameState) {
        buffer_to_screen(self.particles().position_buffer(), &mut frame.particles);
        frame.ball = self
            .ball_state()
            .map(|ball| [ball.position[0] * METER, ball.position[1] * METER]);
        frame.ball_radius = self.ball_radius() * METER;
        frame.particle_radius = self.particles().radius() * METER;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SceneConfig, Viewport};

    #[test]
    fn test_buffer_scaling() {
        let mut out = vec![[9.0, 9.0]; 5];
        buffer_to_screen(&[0.5, 1.0, 2.0, -0.25], &mut out);
        assert_eq!(out, vec![[50.0, 100.0], [200.0, -25.0]]);
    }

    #[test]
    fn test_write_frame_matches_world() {
        let config = SceneConfig {
            viewport: Viewport::new(800.0, 600.0, 1.0),
            particle_half_extents: [16.0, 16.0],
            ball_spawn_height_factor: 0.5,
        };
        let mut world = DraggableWorld::new(&config);
        world.step();

        let mut frame = FrameState::default();
        world.write_frame(&mut frame);

        let buffer = world.particles().position_buffer();
        assert_eq!(frame.particles.len(), buffer.len() / 2);
        assert_eq!(frame.particles.len(), 16);
        for (pixel, xy) in frame.particles.iter().zip(buffer.chunks(2)) {
            assert_eq!(pixel[0], xy[0] * METER);
            assert_eq!(pixel[1], xy[1] * METER);
        }

        let ball = world.ball_state().unwrap();
        assert_eq!(frame.ball, Some([ball.position[0] * METER, ball.position[1] * METER]));
        assert!((frame.ball_radius - SIZE_DRAGGABLE).abs() < 1e-3);
        assert!((frame.particle_radius - SIZE_PARTICLE).abs() < 1e-3);
    }
}
