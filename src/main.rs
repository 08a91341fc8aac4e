//! ASCII Orbit - animated spheres rendered to the terminal
//!
//! Controls:
//! - C: Toggle camera orbit
//! - L: Toggle light orbit
//! - [ / ]: Zoom out / in
//! - R: Reset animation
//! - Space: Pause
//! - Q or Escape: Quit
//!
//! Usage:
//!   ascii-orbit                  - Run interactive mode
//!   ascii-orbit --debug          - Render frames to ./debug/frame_XXX.txt

use ascii_orbit::camera::Animator;
use ascii_orbit::renderer::Renderer;
use ascii_orbit::scene::Scene;
use ascii_orbit::terminal::{parse_key_event, Action, TerminalDisplay};
use ascii_orbit::{DEFAULT_ANGLE_STEP, DEFAULT_CAMERA_DISTANCE, DEFAULT_FRAME_MS};
use clap::Parser;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "ascii-orbit")]
#[command(about = "Animated sphere scene raytraced to the terminal")]
struct Cli {
    /// Render frames to ./debug/ instead of running interactively
    #[arg(short, long)]
    debug: bool,

    /// Number of frames to render in debug mode
    #[arg(long, default_value_t = 10)]
    debug_frames: u32,

    /// Grid width used when the terminal size is unavailable
    #[arg(long, default_value_t = 80)]
    width: usize,

    /// Grid height used when the terminal size is unavailable
    #[arg(long, default_value_t = 40)]
    height: usize,

    /// Distance of the camera from the origin
    #[arg(long, default_value_t = DEFAULT_CAMERA_DISTANCE)]
    camera_distance: f32,

    /// Rotation step per frame, in radians
    #[arg(long, default_value_t = DEFAULT_ANGLE_STEP)]
    angle_step: f32,

    /// Target frame period in milliseconds
    #[arg(long, default_value_t = DEFAULT_FRAME_MS)]
    frame_ms: u64,

    /// Keep the camera fixed instead of orbiting the scene
    #[arg(long)]
    fixed_camera: bool,

    /// Orbit the light around the scene (independent of the camera orbit)
    #[arg(long)]
    orbit_light: bool,
}

impl Cli {
    fn animator(&self) -> Animator {
        Animator {
            angle_step: self.angle_step,
            orbit_camera: !self.fixed_camera,
            orbit_light: self.orbit_light,
            camera_distance: self.camera_distance,
            ..Animator::default()
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cli.debug {
        run_debug_mode(&cli);
        return;
    }

    let mut terminal = match TerminalDisplay::new() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to initialize terminal: {}", e);
            std::process::exit(1);
        }
    };

    let (width, height) = terminal.get_size();
    log::info!("terminal grid {}x{}", width, height);

    let mut renderer = Renderer::new(width.max(10), height.max(10));
    let mut scene = Scene::three_spheres();
    let mut rig = cli.animator();

    let frame_time = Duration::from_millis(cli.frame_ms);
    let mut last_frame = Instant::now();
    let mut paused = false;

    'main_loop: loop {
        if terminal.check_resize() {
            let (width, height) = terminal.get_size();
            renderer.resize(width.max(10), height.max(10));
        }

        match terminal.poll_input(Duration::from_millis(16)) {
            Ok(Some(key_event)) => match parse_key_event(key_event) {
                Action::Quit => break 'main_loop,
                Action::Pause => paused = !paused,
                Action::Reset => {
                    rig = cli.animator();
                    scene = Scene::three_spheres();
                }
                Action::ToggleCameraOrbit => rig.orbit_camera = !rig.orbit_camera,
                Action::ToggleLightOrbit => rig.orbit_light = !rig.orbit_light,
                Action::ZoomIn => rig.adjust_distance(-0.2),
                Action::ZoomOut => rig.adjust_distance(0.2),
                Action::None => {}
            },
            Ok(None) => {}
            Err(e) => log::warn!("input error: {}", e),
        }

        // Skip rendering when paused (allows text selection)
        if paused {
            continue;
        }

        if last_frame.elapsed() < frame_time {
            continue;
        }
        last_frame = Instant::now();

        rig.advance();
        scene.light_position = rig.light_position();

        let frame = renderer.render_frame(&scene, &rig);

        let status = format!(
            "angle: {:5.2} | camera orbit: {} | light orbit: {} | [C/L] orbit  [[]] zoom  [R]eset  [SPACE] pause  [Q]uit",
            rig.angle,
            if rig.orbit_camera { "on" } else { "off" },
            if rig.orbit_light { "on" } else { "off" },
        );

        if let Err(e) = terminal.render(&frame, &status) {
            if e.kind() == std::io::ErrorKind::BrokenPipe {
                break;
            }
            log::error!("render error: {}", e);
        }
    }
}

/// Debug mode: render a handful of frames to files in ./debug/
fn run_debug_mode(cli: &Cli) {
    println!("ASCII Orbit - Debug Mode");
    println!("Rendering {} frames to ./debug/ ...\n", cli.debug_frames);

    let debug_dir = Path::new("debug");
    if let Err(e) = fs::create_dir_all(debug_dir) {
        eprintln!("Failed to create debug directory: {}", e);
        std::process::exit(1);
    }

    let (width, height) = match crossterm::terminal::size() {
        Ok((w, h)) => ((w as usize).max(10), (h.saturating_sub(2) as usize).max(10)),
        Err(e) => {
            log::info!("no terminal size ({}), using {}x{}", e, cli.width, cli.height);
            (cli.width, cli.height)
        }
    };

    let mut renderer = Renderer::new(width, height);
    let mut scene = Scene::three_spheres();
    let mut rig = cli.animator();

    for frame_index in 0..cli.debug_frames {
        rig.advance();
        scene.light_position = rig.light_position();
        let frame = renderer.render_frame(&scene, &rig);

        let filename = format!("debug/frame_{:03}.txt", frame_index);
        match fs::write(&filename, &frame) {
            Ok(_) => println!("Wrote {}", filename),
            Err(e) => eprintln!("Failed to write {}: {}", filename, e),
        }
    }

    println!("\nView with: cat debug/frame_000.txt");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["ascii-orbit"]);
        let rig = cli.animator();
        assert!(rig.orbit_camera);
        assert!(!rig.orbit_light);
        assert!((rig.angle_step - 0.1).abs() < 1e-6);
        assert!((rig.camera_distance - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_cli_orbit_flags() {
        let cli = Cli::parse_from(["ascii-orbit", "--fixed-camera", "--orbit-light"]);
        let rig = cli.animator();
        assert!(!rig.orbit_camera);
        assert!(rig.orbit_light);
    }

    #[test]
    fn test_renderer_creation() {
        let mut renderer = Renderer::new(80, 40);
        let frame = renderer.render_frame(&Scene::three_spheres(), &Animator::default());
        assert_eq!(frame.lines().count(), 40);
    }
}
