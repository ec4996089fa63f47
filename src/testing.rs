// In-memory stand-ins for the camera and the window, used by the loop tests.

use std::collections::VecDeque;
use std::time::Duration;

use image::{Rgb, RgbImage};

use crate::camera::CaptureSource;
use crate::controls::{Control, ControlEvent};
use crate::display::DisplaySink;
use crate::error::{Error, Result};
use crate::mode::KeyPress;
use crate::types::FrameBuffer;

/// Hands out the same synthetic frame on every read.
pub struct FakeCapture {
    pub frame: RgbImage,
    pub reads: usize,
    pub fail_next: usize,
}

impl FakeCapture {
    /// Colour ramp with a hard vertical edge in the middle.
    pub fn gradient(width: u32, height: u32) -> Self {
        let frame = RgbImage::from_fn(width, height, |x, y| {
            let base = if x < width / 2 { 30 } else { 200 };
            Rgb([base, (y * 4 % 256) as u8, (x * 3 % 256) as u8])
        });
        Self { frame, reads: 0, fail_next: 0 }
    }
}

impl CaptureSource for FakeCapture {
    fn is_opened(&self) -> bool {
        true
    }

    fn read(&mut self, frame: &mut RgbImage) -> Result<()> {
        self.reads += 1;
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(Error::CameraFrame("fake read failure".into()));
        }
        frame.clone_from(&self.frame);
        Ok(())
    }

    fn resolution(&self) -> (u32, u32) {
        self.frame.dimensions()
    }
}

/// Surface lifecycle operations, in the order they happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    DestroyAll,
    Create(String),
    Control(String, &'static str),
}

/// Records everything the app asks of the display; keys and control events are scripted.
#[derive(Default)]
pub struct FakeDisplay {
    pub ops: Vec<Op>,
    pub surfaces: Vec<String>,
    pub controls: Vec<Control>,
    pub shown: Vec<(String, FrameBuffer)>,
    pub keys: VecDeque<Option<KeyPress>>,
    pub events: Vec<ControlEvent>,
    pub polls: usize,
}

impl FakeDisplay {
    pub fn live_surfaces(&self) -> Vec<String> {
        self.surfaces.clone()
    }
}

impl DisplaySink for FakeDisplay {
    fn create_surface(&mut self, name: &str, _width: usize, _height: usize) -> Result<()> {
        self.ops.push(Op::Create(name.to_string()));
        self.surfaces.push(name.to_string());
        Ok(())
    }

    fn create_control(&mut self, surface: &str, control: &Control) -> Result<()> {
        if !self.surfaces.iter().any(|s| s == surface) {
            return Err(Error::NoSurface(surface.to_string()));
        }
        self.ops.push(Op::Control(surface.to_string(), control.label));
        self.controls.push(control.clone());
        Ok(())
    }

    fn destroy_all(&mut self) {
        self.ops.push(Op::DestroyAll);
        self.surfaces.clear();
        self.controls.clear();
        self.events.clear();
    }

    fn show(&mut self, surface: &str, frame: &FrameBuffer) -> Result<()> {
        if !self.surfaces.iter().any(|s| s == surface) {
            return Err(Error::NoSurface(surface.to_string()));
        }
        self.shown.push((surface.to_string(), frame.clone()));
        Ok(())
    }

    fn poll_key(&mut self, _wait: Duration) -> Option<KeyPress> {
        self.polls += 1;
        self.keys.pop_front().flatten()
    }

    fn drain_control_events(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }
}
