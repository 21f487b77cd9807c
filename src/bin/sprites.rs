use liquid_drag::{
    logging, poll_pointer, DemoOptions, DraggableWorld, FrameState, Preset, Viewport,
    SIZE_PARTICLE,
};
use macroquad::prelude::*;

const BALL_COLOR: Color = Color::new(0.6, 0.0, 0.0, 1.0);

fn window_conf() -> Conf {
    Conf {
        window_title: "Liquid drag (sprites)".to_owned(),
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
    let config = options.load_scene(Preset::Sprites, viewport);
    if config.viewport != viewport {
        request_new_screen_size(config.viewport.width, config.viewport.height);
    }

    let particle_texture = particle_texture(config.viewport.dpi);
    let mut world = DraggableWorld::new(&config);
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
        let point = config.viewport.logical_to_world(mx, my);
        if let Some(event) = poll_pointer(pointer_was_down, is_down, point) {
            world.handle_pointer(event);
        }
        pointer_was_down = is_down;

        world.step();
        steps += 1;

        world.write_frame(&mut frame);
        draw_frame(&frame, &particle_texture);

        next_frame().await;
    }
}

/// One white dot, drawn once and shared by every particle sprite.
fn particle_texture(dpi: f32) -> Texture2D {
    let size = (SIZE_PARTICLE * 2.0 * dpi).ceil() as u16;
    let center = SIZE_PARTICLE * dpi;
    let radius = SIZE_PARTICLE * dpi / 2.0;

    let mut image = Image::gen_image_color(size, size, BLANK);
    for y in 0..size as u32 {
        for x in 0..size as u32 {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            if dx * dx + dy * dy <= radius * radius {
                image.set_pixel(x, y, WHITE);
            }
        }
    }
    let texture = Texture2D::from_image(&image);
    texture.set_filter(FilterMode::Linear);
    texture
}

fn draw_frame(frame: &FrameState, texture: &Texture2D) {
    clear_background(BLACK);

    // The texture spans one particle diameter; the pivot sits at its center.
    let size = frame.particle_radius * 2.0;
    let pivot = frame.particle_radius;
    let params = DrawTextureParams {
        dest_size: Some(vec2(size, size)),
        ..Default::default()
    };
    for &[x, y] in &frame.particles {
        draw_texture_ex(texture, x - pivot, y - pivot, WHITE, params.clone());
    }

    if let Some([x, y]) = frame.ball {
        draw_circle(x, y, frame.ball_radius, BALL_COLOR);
    }

    draw_text(&format!("fps {}", get_fps()), 20.0, 32.0, 24.0, LIGHTGRAY);
    draw_text(
        "drag the ball, press Ctrl+C to exit",
        20.0,
        screen_height() - 20.0,
        20.0,
        GRAY,
    );
}
