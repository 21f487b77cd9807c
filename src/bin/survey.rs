use liquid_drag::{
    logging, PerformanceLevel, Preset, SceneConfig, SimulationWorld, DEFAULT_VIEWPORT, METER,
};
use rayon::prelude::*;
use std::time::Instant;

const DEFAULT_STEPS: usize = 600;

struct SurveyResult {
    preset: Preset,
    level: PerformanceLevel,
    particles: usize,
    on_screen: usize,
    ball_y_px: f32,
    steps_per_second: f64,
}

/// Run one scene headless and see where things end up.
fn survey(preset: Preset, level: PerformanceLevel, steps: usize) -> SurveyResult {
    let config = SceneConfig::preset(preset, level, DEFAULT_VIEWPORT);
    let mut world = SimulationWorld::new(&config);

    let start_time = Instant::now();
    for _ in 0..steps {
        world.step();
    }
    let elapsed = start_time.elapsed().as_secs_f64();

    let (width, height) = (config.viewport.width, config.viewport.height);
    let on_screen = world
        .particles()
        .position_buffer()
        .chunks_exact(2)
        .filter(|xy| {
            let (x, y) = (xy[0] * METER, xy[1] * METER);
            (0.0..=width).contains(&x) && (0.0..=height).contains(&y)
        })
        .count();

    SurveyResult {
        preset,
        level,
        particles: world.particles().particle_count(),
        on_screen,
        ball_y_px: world.ball_state().map(|b| b.position[1] * METER).unwrap_or(f32::NAN),
        steps_per_second: steps as f64 / elapsed.max(f64::EPSILON),
    }
}

fn main() {
    logging::init();

    let steps = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<usize>().ok())
        .unwrap_or(DEFAULT_STEPS);

    let scenes: Vec<(Preset, PerformanceLevel)> = Preset::ALL
        .iter()
        .flat_map(|&preset| {
            [PerformanceLevel::High, PerformanceLevel::Low]
                .into_iter()
                .map(move |level| (preset, level))
        })
        .collect();

    println!("Surveying {} scenes for {steps} steps each...", scenes.len());

    let results: Vec<SurveyResult> = scenes
        .par_iter()
        .map(|&(preset, level)| survey(preset, level, steps))
        .collect();

    for r in &results {
        println!(
            "{:?}/{:?}: particles={} on_screen={} ball_y={:.0}px steps/s={:.1}",
            r.preset, r.level, r.particles, r.on_screen, r.ball_y_px, r.steps_per_second,
        );
    }
}
