//! Orrery demo
//!
//! Drives the orrery view headlessly at a fixed 60 fps with a scripted
//! session of user requests, logging frame summaries through a logging
//! render backend.
//!
//! Usage: `orrery_demo [roster.toml|roster.ron]`

use orrery::config::Config;
use orrery::core::config::OrreryConfig;
use orrery::input::KeyCode;
use orrery::render::{FrameSubmission, HighlightFlags, RenderBackend};
use orrery::view::OrreryView;

const FPS: u32 = 60;
const SESSION_SECONDS: u32 = 12;

/// Backend that logs what it would draw
#[derive(Default)]
struct LogBackend {
    frames: u64,
    instances: usize,
}

impl RenderBackend for LogBackend {
    fn submit_frame(&mut self, frame: &FrameSubmission) {
        self.frames += 1;
        self.instances = frame.instances.len();

        if frame.frame % u64::from(FPS) == 0 {
            let highlighted = frame
                .instances
                .iter()
                .filter(|instance| !instance.highlight.is_empty())
                .count();
            log::info!(
                "frame {:>4}: {} bodies ({} highlighted), {} orbit guides, camera at ({:.1}, {:.1}, {:.1})",
                frame.frame,
                frame.instances.len(),
                highlighted,
                frame.orbit_guides.len(),
                frame.camera.position.x,
                frame.camera.position.y,
                frame.camera.position.z,
            );
        }

        for instance in &frame.instances {
            if instance.highlight.contains(HighlightFlags::FOCUSED) {
                log::trace!("focused instance {:?}: {:?}", instance.entity, instance.gpu_data());
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        log::info!("Viewport resized to {}x{}", width, height);
    }
}

fn load_config() -> Result<OrreryConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            Ok(OrreryConfig::load_from_file(&path)?)
        }
        None => {
            log::info!("No configuration given, using the built-in solar system");
            Ok(OrreryConfig::default())
        }
    }
}

/// Scripted requests keyed by frame number
fn run_script(view: &mut OrreryView<LogBackend>, frame: u32) -> Result<(), Box<dyn std::error::Error>> {
    let second = |s: f32| (s * FPS as f32) as u32;

    match frame {
        f if f == second(0.5) => {
            view.focus_by_name("earth")?;
        }
        f if f == second(1.5) => {
            log::info!("Retargeting mid-transition");
            view.focus_by_name("jupiter")?;
        }
        f if f == second(4.0) => {
            view.on_pointer_move(0.0, 0.0);
            view.on_pointer_click(0.0, 0.0);
        }
        f if f == second(5.0) => {
            view.on_key(KeyCode::ArrowUp);
            view.on_key(KeyCode::ArrowUp);
            view.set_speed(3.0);
        }
        f if f == second(6.0) => view.on_key(KeyCode::Digit(4)),
        f if f == second(7.0) => view.toggle_play(),
        f if f == second(8.0) => view.on_resize(1920, 1080)?,
        f if f == second(9.0) => {
            view.toggle_play();
            view.reset_view();
        }
        _ => {}
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let mut view = OrreryView::new(config, LogBackend::default())?;

    let wall_delta = 1.0 / FPS as f32;
    for frame in 0..SESSION_SECONDS * FPS {
        run_script(&mut view, frame)?;
        view.tick(wall_delta);

        if frame % (2 * FPS) == 0 {
            let stats = view.stats();
            let name = |id| view.hierarchy().get(id).map_or("-", |e| e.name());
            log::info!(
                "t={:>5.1}s speed {:.2}x {} | selected {} | hovered {} | {:?} view",
                stats.simulation_time,
                stats.speed,
                if stats.playing { "playing" } else { "paused" },
                stats.selected.map_or("-", name),
                stats.hovered.map_or("-", name),
                stats.view_mode,
            );
        }
    }

    let stats = view.stats();
    log::info!(
        "Session finished: {} frames ticked, {} submitted, {:.1}s simulated, {} bodies per frame",
        stats.frame_count,
        view.backend().frames,
        stats.simulation_time,
        view.backend().instances
    );
    Ok(())
}

fn main() {
    orrery::foundation::logging::init();

    log::info!("Starting orrery demo");
    if let Err(e) = run() {
        log::error!("Orrery demo failed: {}", e);
        std::process::exit(1);
    }
}
