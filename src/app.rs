// The whole demo's mutable state in one place, and the loop that drives it:
//   control events -> capture -> mode pipeline -> rate stamp -> show -> key poll.

use std::time::Duration;

use image::RgbImage;
use tracing::{debug, info, warn};

use crate::camera::CaptureSource;
use crate::controls::{CannyParams, SobelParams};
use crate::display::DisplaySink;
use crate::error::Result;
use crate::hud::{self, STATUS_COLOR, STATUS_GRAY};
use crate::mode::{Command, Mode, command_for};
use crate::pipeline::Pipeline;
use crate::rate::RateMonitor;
use crate::types::FrameBuffer;

/// How long each iteration waits for a key after showing a frame.
pub const KEY_POLL: Duration = Duration::from_millis(1);

/// Whether the loop should keep going after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct App {
    mode: Mode,
    canny: CannyParams,
    sobel: SobelParams,
    rate: RateMonitor,
    pipeline: Pipeline,
    frame: RgbImage,
    screen: FrameBuffer,
    last_fps_log: f64,
}

impl App {
    /// Buffers start at the capture size; they follow the stream if it changes.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            mode: Mode::Normal,
            canny: CannyParams::default(),
            sobel: SobelParams::default(),
            rate: RateMonitor::new(),
            pipeline: Pipeline::new(),
            frame: RgbImage::new(width, height),
            screen: FrameBuffer::new(width as usize, height as usize),
            last_fps_log: 0.0,
        }
    }

    #[cfg(test)]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[cfg(test)]
    pub fn canny(&self) -> &CannyParams {
        &self.canny
    }

    #[cfg(test)]
    pub fn sobel(&self) -> &SobelParams {
        &self.sobel
    }

    #[cfg(test)]
    pub fn rate(&self) -> &RateMonitor {
        &self.rate
    }

    /// Tear down every surface, build the one for `mode` (with its controls) and reset the counters.
    pub fn enter<D: DisplaySink>(&mut self, mode: Mode, display: &mut D) -> Result<()> {
        display.destroy_all();

        let (w, h) = self.frame.dimensions();
        let name = mode.surface_name();
        display.create_surface(name, w as usize, h as usize)?;

        let controls = match mode {
            Mode::Normal => Vec::new(),
            Mode::Canny => {
                self.canny = CannyParams::default();
                self.canny.controls()
            }
            Mode::Sobel => {
                self.sobel = SobelParams::default();
                self.sobel.controls()
            }
        };
        for c in &controls {
            display.create_control(name, c)?;
        }

        self.mode = mode;
        self.rate.reset();
        self.last_fps_log = self.rate.start_time();
        info!(?mode, surface = name, "mode entered");
        Ok(())
    }

    /// Fold pending control changes into the active parameter set.
    fn apply_control_events<D: DisplaySink>(&mut self, display: &mut D) {
        for ev in display.drain_control_events() {
            let applied = match self.mode {
                Mode::Canny => self.canny.apply(ev),
                Mode::Sobel => self.sobel.apply(ev),
                Mode::Normal => false,
            };
            if applied {
                debug!(control = ?ev.id, value = ev.value, "control changed");
            }
        }
    }

    /// Run the active mode's pipeline on the current frame, then stamp the rate line.
    fn process(&mut self) {
        let color = match self.mode {
            Mode::Normal => {
                self.pipeline.normal(&self.frame, &mut self.screen);
                STATUS_COLOR
            }
            Mode::Canny => {
                self.pipeline.canny(&self.frame, &self.canny, &mut self.screen);
                STATUS_COLOR
            }
            Mode::Sobel => {
                self.pipeline.sobel(&self.frame, &self.sobel, &mut self.screen);
                STATUS_GRAY
            }
        };

        self.rate.tick();
        hud::stamp_status(&mut self.screen, &self.rate.status_text(), color);

        let now = self.rate.current_time();
        if now - self.last_fps_log >= 1.0 {
            debug!(mode = ?self.mode, fps = self.rate.rate(), frames = self.rate.frame_count(), "fps");
            self.last_fps_log = now;
        }
    }

    /// One loop iteration.
    pub fn step<C, D>(&mut self, capture: &mut C, display: &mut D) -> Result<Flow>
    where
        C: CaptureSource,
        D: DisplaySink,
    {
        self.apply_control_events(display);

        match capture.read(&mut self.frame) {
            Ok(()) => {
                self.process();
                display.show(self.mode.surface_name(), &self.screen)?;
            }
            // Keep polling keys so Escape still works while the camera hiccups.
            Err(e) => warn!(error = %e, "frame skipped"),
        }

        match display.poll_key(KEY_POLL).and_then(command_for) {
            Some(Command::Quit) => {
                display.destroy_all();
                info!(frames = self.rate.frame_count(), "shutting down");
                Ok(Flow::Exit)
            }
            Some(Command::Enter(mode)) => {
                self.enter(mode, display)?;
                Ok(Flow::Continue)
            }
            None => Ok(Flow::Continue),
        }
    }

    /// Enter `initial` and loop until Escape.
    pub fn run<C, D>(&mut self, initial: Mode, capture: &mut C, display: &mut D) -> Result<()>
    where
        C: CaptureSource,
        D: DisplaySink,
    {
        self.enter(initial, display)?;
        while self.step(capture, display)? == Flow::Continue {}
        Ok(())
    }
}
