use std::fs;
use std::path::Path;

use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::physics::METER;

pub const DEFAULT_VIEWPORT: Viewport = Viewport {
    width: 1280.0,
    height: 720.0,
    dpi: 1.0,
};

/// How much work the device can take; picks the particle count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceLevel {
    High,
    Low,
}

impl PerformanceLevel {
    /// Desktop platforms get the dense particle field, everything else the light one.
    pub fn detect() -> Self {
        Self::for_platform(std::env::consts::OS)
    }

    pub fn for_platform(os: &str) -> Self {
        match os {
            "windows" | "macos" => PerformanceLevel::High,
            _ => PerformanceLevel::Low,
        }
    }
}

/// Which of the two demo scenes to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Sprites,
    Trails,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Sprites, Preset::Trails];

    /// Half extents of the particle emission box, in pixels.
    pub fn particle_half_extents(self, level: PerformanceLevel) -> [f32; 2] {
        match (self, level) {
            (Preset::Sprites, PerformanceLevel::High) => [256.0, 384.0],
            (Preset::Sprites, PerformanceLevel::Low) => [128.0, 128.0],
            (Preset::Trails, PerformanceLevel::High) => [128.0, 128.0],
            (Preset::Trails, PerformanceLevel::Low) => [64.0, 128.0],
        }
    }

    /// Ball spawn height as a multiple of the viewport height (negative is above the screen).
    pub fn ball_spawn_height_factor(self) -> f32 {
        match self {
            Preset::Sprites => -1.5,
            Preset::Trails => -1.0,
        }
    }
}

/// Logical screen size in pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_dpi")]
    pub dpi: f32,
}

fn default_dpi() -> f32 {
    1.0
}

impl Viewport {
    pub fn new(width: f32, height: f32, dpi: f32) -> Self {
        Self { width, height, dpi }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) && ok(self.dpi) {
            Ok(())
        } else {
            Err(ConfigError::InvalidViewport {
                width: self.width,
                height: self.height,
                dpi: self.dpi,
            })
        }
    }

    /// Convert pointer coordinates given in logical pixels to world meters. Dpi does not apply.
    pub fn logical_to_world(&self, x: f32, y: f32) -> Point<Real> {
        point![(x / METER) as Real, (y / METER) as Real]
    }

    /// Size in meters.
    pub fn world_size(&self) -> [Real; 2] {
        [(self.width / METER) as Real, (self.height / METER) as Real]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub viewport: Viewport,
    /// Half extents of the particle emission box, in pixels. Zero means no particles.
    pub particle_half_extents: [f32; 2],
    pub ball_spawn_height_factor: f32,
}

/// On-disk form: everything optional, missing values come from a preset.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneConfigFile {
    preset: Option<Preset>,
    performance: Option<PerformanceLevel>,
    viewport: Option<Viewport>,
    particle_half_extents: Option<[f32; 2]>,
    ball_spawn_height_factor: Option<f32>,
}

impl SceneConfig {
    pub fn preset(preset: Preset, level: PerformanceLevel, viewport: Viewport) -> Self {
        Self {
            viewport,
            particle_half_extents: preset.particle_half_extents(level),
            ball_spawn_height_factor: preset.ball_spawn_height_factor(),
        }
    }

    /// Parse a JSON config, filling gaps from `fallback` at the detected performance level.
    pub fn from_json_str(text: &str, fallback: Preset) -> Result<Self, ConfigError> {
        let file: SceneConfigFile = serde_json::from_str(text)?;
        let preset = file.preset.unwrap_or(fallback);
        let level = file.performance.unwrap_or_else(PerformanceLevel::detect);
        let base = Self::preset(preset, level, file.viewport.unwrap_or(DEFAULT_VIEWPORT));

        let config = Self {
            particle_half_extents: file
                .particle_half_extents
                .unwrap_or(base.particle_half_extents),
            ball_spawn_height_factor: file
                .ball_spawn_height_factor
                .unwrap_or(base.ball_spawn_height_factor),
            ..base
        };
        config.viewport.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>, fallback: Preset) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text, fallback)
    }
}

/// Command line for the demo binaries: `[steps] [config.json]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoOptions {
    pub step_limit: Option<usize>,
    pub config_path: Option<String>,
}

impl DemoOptions {
    pub fn from_args(args: &[String]) -> Self {
        let mut options = Self::default();
        for arg in args.iter().skip(1) {
            match arg.parse::<usize>() {
                Ok(steps) => {
                    if options.step_limit.is_none() {
                        options.step_limit = Some(steps);
                    }
                }
                Err(_) => options.config_path = Some(arg.clone()),
            }
        }
        options
    }

    /// Load the configured scene, or fall back to `preset` if there is none or it is broken.
    pub fn load_scene(&self, preset: Preset, viewport: Viewport) -> SceneConfig {
        let defaults = || SceneConfig::preset(preset, PerformanceLevel::detect(), viewport);
        match &self.config_path {
            Some(path) => match SceneConfig::from_json_file(path, preset) {
                Ok(config) => {
                    tracing::info!(path = %path, "loaded scene config");
                    config
                }
                Err(err) => {
                    tracing::error!(path = %path, error = %err, "falling back to preset scene");
                    defaults()
                }
            },
            None => defaults(),
        }
    }
}
