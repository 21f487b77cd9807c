mod physics;
mod config;
mod error;
mod particles;
mod world;
mod draggable_world;
mod frame;
mod pointer;
pub mod logging;

// Re-export public items
pub use physics::{
    px_to_m, BodySnapshot, FIXED_TIME_STEP, GRAVITY, METER, SIZE_DRAGGABLE, SIZE_PARTICLE,
};
pub use config::{DemoOptions, PerformanceLevel, Preset, SceneConfig, Viewport, DEFAULT_VIEWPORT};
pub use error::ConfigError;
pub use particles::{EmissionRect, ParticleSystem, ParticleSystemDef};
pub use world::{PointerJoint, SimulationWorld};
pub use draggable_world::{DragState, DraggableWorld};
pub use frame::{buffer_to_screen, FrameState};
pub use pointer::{poll_pointer, PointerEvent};
