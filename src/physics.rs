use rapier2d::prelude::*;

// Simulation constants
pub const FIXED_TIME_STEP: Real = 1.0 / 60.0;
/// Pixels per physics meter.
pub const METER: f32 = 100.0;
pub const GRAVITY: [Real; 2] = [0.0, 10.0];

// Sizes in pixels
pub const SIZE_PARTICLE: f32 = 4.0;
pub const SIZE_DRAGGABLE: f32 = 50.0;
pub const WALL_THICKNESS: f32 = 5.0;

// Drag ball material (steel-ish density, low friction and bounce)
pub const BALL_DENSITY: Real = 8.0;
pub const BALL_FRICTION: Real = 0.1;
pub const BALL_RESTITUTION: Real = 0.1;

// Pointer joint tuning: 5 Hz with 0.7 damping ratio
pub const POINTER_STIFFNESS: Real = 986.96;
pub const POINTER_DAMPING: Real = 43.98;
pub const POINTER_FORCE_PER_MASS: Real = 1000.0;
/// Half size of the box used to probe for bodies under the pointer.
pub const POINTER_PROBE_HALF_EXTENT: Real = 0.001;

// Collision groups
pub const GROUP_WALL: u32 = 0b0001;
pub const GROUP_BALL: u32 = 0b0010;
pub const GROUP_PARTICLE: u32 = 0b0100;

#[derive(Debug, Clone)]
pub struct BodySnapshot {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub rotation: f32,
}

/// Convert a length in pixels to meters.
pub fn px_to_m(px: f32) -> Real {
    (px / METER) as Real
}
