use liquid_drag::{logging, DemoOptions, DraggableWorld, Preset, DEFAULT_VIEWPORT};
use rapier2d::prelude::*;
use std::time::Instant;

const DEFAULT_STEPS: usize = 240;
const PRINT_INTERVAL: usize = 30;
// Scripted drag: grab the ball, swing it in a circle, let go.
const DRAG_START: usize = 60;
const DRAG_STEPS: usize = 120;
const DRAG_RADIUS: Real = 1.0;

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let options = DemoOptions::from_args(&args);
    let steps = options.step_limit.unwrap_or(DEFAULT_STEPS);
    let config = options.load_scene(Preset::Sprites, DEFAULT_VIEWPORT);

    println!("Running offline particle simulation for {steps} steps...");

    let start_time = Instant::now();
    let mut world = DraggableWorld::new(&config);
    let mut drag_center = point![0.0, 0.0];

    for step in 0..steps {
        if step == DRAG_START {
            if let Some(ball) = world.ball_state() {
                drag_center = point![ball.position[0] as Real, ball.position[1] as Real];
                if world.pointer_down(drag_center) {
                    println!("step {:>4}: grabbed ball", step + 1);
                }
            }
        } else if step > DRAG_START && step < DRAG_START + DRAG_STEPS {
            let angle = (step - DRAG_START) as Real / DRAG_STEPS as Real * std::f32::consts::TAU;
            let target = point![
                drag_center.x + DRAG_RADIUS * angle.sin(),
                drag_center.y - DRAG_RADIUS * (1.0 - angle.cos())
            ];
            world.pointer_move(target);
        } else if step == DRAG_START + DRAG_STEPS && world.is_pointer_down() {
            world.pointer_up();
            println!("step {:>4}: released ball", step + 1);
        }

        world.step();

        if step % PRINT_INTERVAL == 0 || step == steps - 1 {
            if let Some(ball) = world.ball_state() {
                println!(
                    "step {:>4}: ball=({:+.2}, {:+.2}) vel=({:+.2}, {:+.2})",
                    step + 1,
                    ball.position[0],
                    ball.position[1],
                    ball.velocity[0],
                    ball.velocity[1],
                );
            }
        }
    }

    let duration = start_time.elapsed();
    let steps_per_second = steps as f64 / duration.as_secs_f64();

    println!("Simulation complete.");
    println!("Particles: {}", world.particles().particle_count());
    println!("Total time: {:.2} seconds", duration.as_secs_f64());
    println!("Steps per second: {:.2}", steps_per_second);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_drag_fits_default_run() {
        assert!(DRAG_START > 0);
        assert!(DRAG_START + DRAG_STEPS < DEFAULT_STEPS);
    }
}
