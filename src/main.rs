//! Castle Map: 3D viewer for a castle room map
//!
//! Every room of the map becomes a cube textured from a per-room atlas
//! that shows its exits. The cubes are drawn by a small software
//! rasterizer and the result is scaled up into the window.
//!
//! Controls:
//! - Left/Right: orbit around the map (hold Shift for 10 degree steps)
//! - Down: snap to the nearest 45 degrees
//! - Escape: quit

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod input;
mod orbit;
mod rasterizer;
mod scene;
mod tiles;
mod world;

use macroquad::prelude::*;
use config::{ViewerConfig, CONFIG_PATH};
use input::{poll_keys, OrbitInput};
use orbit::OrbitCamera;
use rasterizer::{Camera, Framebuffer};
use scene::MapScene;
use tiles::TileSet;
use world::load_rooms;

fn window_conf() -> Conf {
    // Errors are reported once logging is up in main()
    let config = ViewerConfig::load_or_default(CONFIG_PATH).unwrap_or_default();
    Conf {
        window_title: format!("{} v{}", config.window_title, VERSION),
        window_width: config.window_width,
        window_height: config.window_height,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Largest rect with the framebuffer's aspect that fits the window, centred
fn letterbox(fb_w: f32, fb_h: f32, screen_w: f32, screen_h: f32) -> (f32, f32, f32, f32) {
    let scale = (screen_w / fb_w).min(screen_h / fb_h);
    let w = fb_w * scale;
    let h = fb_h * scale;
    ((screen_w - w) / 2.0, (screen_h - h) / 2.0, w, h)
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match ViewerConfig::load_or_default(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let map = match load_rooms(&config.rooms_path) {
        Ok(map) => map,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    if map.is_empty() {
        log::warn!("{} contains no rooms", config.rooms_path.display());
    }
    log::info!(
        "Loaded {} rooms in {} cells from {}",
        map.len(),
        map.occupied_count(),
        config.rooms_path.display()
    );
    if map.duplicate_count() > 0 {
        log::warn!("{} rooms share a grid cell with an earlier room", map.duplicate_count());
    }
    let dangling = map.doors_to_nowhere();
    if dangling > 0 {
        log::warn!("{} doors lead to cells without a room", dangling);
    }
    if let Some((lo, hi)) = map.bounds() {
        log::debug!("Map spans {:?} to {:?}", lo, hi);
    }

    let mut tileset = if config.tiles_dir.is_dir() {
        TileSet::from_directory(&config.tiles_dir, config.face_size)
    } else {
        log::info!("No tile directory at {}, drawing every tile", config.tiles_dir.display());
        TileSet::procedural(config.face_size)
    };
    let scene = MapScene::build(&map, config.room_size, config.face_size, &mut tileset);

    let mut fb = Framebuffer::new(config.render_width, config.render_height);
    let mut camera = Camera::new(config.fov_deg.to_radians(), config.near_clip, config.far_clip);
    let mut orbit = OrbitCamera::new(config.orbit.clone());
    let mut orbit_input = OrbitInput::new(&config.input);

    let bg = config.background;
    let letterbox_color = Color::from_rgba(bg.r, bg.g, bg.b, 255);

    'frames: loop {
        for command in orbit_input.commands(poll_keys(), get_frame_time()) {
            if !command.apply(&mut orbit) {
                break 'frames;
            }
        }

        orbit.apply(&mut camera);
        fb.clear(bg);
        scene.render(&mut fb, &camera, &config.raster);

        clear_background(letterbox_color);

        let fb_texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        fb_texture.set_filter(FilterMode::Nearest);

        let (x, y, w, h) = letterbox(fb.width as f32, fb.height as f32, screen_width(), screen_height());
        draw_texture_ex(
            &fb_texture,
            x,
            y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(w, h)),
                ..Default::default()
            },
        );

        if config.show_hud {
            let hud = format!(
                "{} rooms  {} tris  angle {:.2} rad ({:.1} deg)",
                scene.mesh_count(),
                scene.triangle_count(),
                orbit.angle(),
                orbit.angle_degrees()
            );
            draw_text(&hud, 10.0, 20.0, 20.0, BLACK);
        }

        next_frame().await;
    }

    log::info!("Bye");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letterbox_fits_wider_window() {
        let (x, y, w, h) = letterbox(500.0, 400.0, 1500.0, 800.0);
        assert_eq!((w, h), (1000.0, 800.0));
        assert_eq!((x, y), (250.0, 0.0));
    }

    #[test]
    fn test_letterbox_fits_taller_window() {
        let (x, y, w, h) = letterbox(500.0, 400.0, 1000.0, 1000.0);
        assert_eq!((w, h), (1000.0, 800.0));
        assert_eq!((x, y), (0.0, 100.0));
    }
}
