use liquid_drag::{logging, poll_pointer, DemoOptions, DraggableWorld, FrameState, Preset, Viewport};
use ::rand::Rng;
use macroquad::color::hsl_to_rgb;
use macroquad::prelude::*;

/// Alpha of the black wash laid over the previous frame; lower means longer trails.
const FADE_ALPHA: f32 = 0.1;
const BALL_OUTLINE: f32 = 3.0;
const MAX_PARTICLE_RADIUS: f32 = 12.0;

/// Per-particle look, rolled once at startup.
struct ParticleStyle {
    color: Color,
    radius: f32,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Liquid drag (trails)".to_owned(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let options = DemoOptions::from_args(&args);
    let viewport = Viewport::new(screen_width(), screen_height(), screen_dpi_scale());
    let config = options.load_scene(Preset::Trails, viewport);
    if config.viewport != viewport {
        request_new_screen_size(config.viewport.width, config.viewport.height);
    }
    let viewport = config.viewport;

    let mut world = DraggableWorld::new(&config);
    let styles = particle_styles(world.particles().particle_count());

    // The canvas is never cleared; it is sized in device pixels and scaled by dpi.
    let canvas_w = (viewport.width * viewport.dpi).round() as u32;
    let canvas_h = (viewport.height * viewport.dpi).round() as u32;
    let canvas = render_target(canvas_w, canvas_h);
    canvas.texture.set_filter(FilterMode::Linear);
    let canvas_camera = Camera2D {
        zoom: vec2(2.0 / viewport.width, 2.0 / viewport.height),
        target: vec2(viewport.width / 2.0, viewport.height / 2.0),
        render_target: Some(canvas.clone()),
        ..Default::default()
    };

    let mut frame = FrameState::default();
    let mut pointer_was_down = false;
    let mut steps = 0usize;

    loop {
        if let Some(limit) = options.step_limit {
            if steps >= limit {
                break;
            }
        }

        let is_down = is_mouse_button_down(MouseButton::Left);
        let (mx, my) = mouse_position();
        let point = viewport.logical_to_world(mx, my);
        if let Some(event) = poll_pointer(pointer_was_down, is_down, point) {
            world.handle_pointer(event);
        }
        pointer_was_down = is_down;

        world.step();
        steps += 1;
        world.write_frame(&mut frame);

        set_camera(&canvas_camera);
        draw_rectangle(
            0.0,
            0.0,
            viewport.width,
            viewport.height,
            Color::new(0.0, 0.0, 0.0, FADE_ALPHA),
        );
        draw_frame(&frame, &styles);

        set_default_camera();
        clear_background(BLACK);
        draw_texture_ex(
            &canvas.texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                ..Default::default()
            },
        );
        draw_text(&format!("fps {}", get_fps()), 20.0, 32.0, 24.0, LIGHTGRAY);

        next_frame().await;
    }
}

/// Hue sweeps 180..280 degrees across the particle index, with random saturation and size.
/// Half the particles are "lighter": brighter and more opaque to fake additive blending.
fn particle_styles(count: usize) -> Vec<ParticleStyle> {
    let mut rng = ::rand::thread_rng();
    (0..count)
        .map(|i| {
            let hue = (i as f32 / count as f32 * 100.0 + 180.0) / 360.0;
            let saturation = (40.0 * rng.gen::<f32>() + 60.0) / 100.0;
            let lighter = rng.gen_bool(0.5);
            let (lightness, alpha) = if lighter { (0.85, 0.7) } else { (0.7, 0.5) };
            let mut color = hsl_to_rgb(hue, saturation, lightness);
            color.a = alpha;
            ParticleStyle {
                color,
                radius: MAX_PARTICLE_RADIUS * rng.gen::<f32>() * rng.gen::<f32>(),
            }
        })
        .collect()
}

fn draw_frame(frame: &FrameState, styles: &[ParticleStyle]) {
    for (&[x, y], style) in frame.particles.iter().zip(styles) {
        draw_circle(x, y, style.radius, style.color);
    }

    if let Some([x, y]) = frame.ball {
        draw_circle(x, y, frame.ball_radius, BLACK);
        draw_circle_lines(x, y, frame.ball_radius, BALL_OUTLINE, WHITE);
    }
}
