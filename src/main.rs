// What you SEE:
// • A window with the live camera feed and a frame-rate line in the top-left corner.
// • N: raw frame. C: Canny edge map (edges keep their colour, the rest goes black).
// • S: Sobel gradient map (grayscale). Esc (or closing the window) quits.
// • Every switch closes the window, opens a fresh one and restarts the frame counter.

mod app;
mod camera;
mod config;
mod controls;
mod display;
mod error;
mod gradient;
mod hud;
mod mode;
mod pipeline;
mod rate;
mod types;

#[cfg(test)]
mod testing;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use app::App;
use camera::{CameraCapture, CaptureSource};
use config::Config;
use display::MinifbDisplay;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let cfg = Config::parse();

    // The only startup check: no camera, no demo.
    let mut cam = match CameraCapture::open(cfg.camera, cfg.width, cfg.height) {
        Ok(cam) if cam.is_opened() => cam,
        Ok(_) => {
            error!(camera = cfg.camera, "camera stream did not open");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            error!(error = %e, "cannot open camera");
            return ExitCode::FAILURE;
        }
    };

    let (w, h) = cam.resolution();
    let mut app = App::new(w, h);
    let mut display = MinifbDisplay::new();

    match app.run(cfg.mode, &mut cam, &mut display) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "viewer stopped");
            ExitCode::FAILURE
        }
    }
}
