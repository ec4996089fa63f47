// Window management: named surfaces, adjustable controls and the key poll.
// minifb has no slider widgets, so each control is driven by a key pair and
// its live value is shown in the window title.

use std::thread;
use std::time::Duration;

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use tracing::debug;

use crate::controls::{Control, ControlEvent, ControlId};
use crate::error::{Error, Result};
use crate::mode::KeyPress;
use crate::types::FrameBuffer;

/// Where processed frames go and where key/control input comes from.
pub trait DisplaySink {
    /// Open a new surface. The caller destroys previous ones first.
    fn create_surface(&mut self, name: &str, width: usize, height: usize) -> Result<()>;

    /// Attach an adjustable control to an existing surface.
    fn create_control(&mut self, surface: &str, control: &Control) -> Result<()>;

    /// Close every surface and drop every control.
    fn destroy_all(&mut self);

    /// Present `frame` on the named surface.
    fn show(&mut self, surface: &str, frame: &FrameBuffer) -> Result<()>;

    /// Wait at most `wait` for a key. Also pumps the window's events.
    fn poll_key(&mut self, wait: Duration) -> Option<KeyPress>;

    /// Control changes since the last call, oldest first.
    fn drain_control_events(&mut self) -> Vec<ControlEvent>;
}

/// Decrement / increment keys and the step each applies.
struct Binding {
    dec: Key,
    inc: Key,
    step: i32,
}

const THRESHOLD_KEYS: &[Binding] = &[
    Binding { dec: Key::Down, inc: Key::Up, step: 1 },
    Binding { dec: Key::PageDown, inc: Key::PageUp, step: 10 },
];
const KSIZE_KEYS: &[Binding] = &[Binding { dec: Key::LeftBracket, inc: Key::RightBracket, step: 1 }];
const SCALE_KEYS: &[Binding] = &[Binding { dec: Key::Minus, inc: Key::Equal, step: 1 }];
const DELTA_KEYS: &[Binding] = &[Binding { dec: Key::Comma, inc: Key::Period, step: 1 }];

fn bindings_for(id: ControlId) -> &'static [Binding] {
    match id {
        ControlId::LowThreshold => THRESHOLD_KEYS,
        ControlId::KernelSize => KSIZE_KEYS,
        ControlId::Scale => SCALE_KEYS,
        ControlId::Delta => DELTA_KEYS,
    }
}

/// Keys already pumped by this iteration's `show`, if they can be used as-is.
/// Without a fresh pump the pressed list is stale and the window must be
/// updated before it is read again.
fn fresh_keys(pumped: bool, pending: Vec<Key>) -> Option<Vec<Key>> {
    (pumped && !pending.is_empty()).then_some(pending)
}

fn key_to_press(key: Key, shift: bool) -> Option<KeyPress> {
    let ch = match key {
        Key::Escape => return Some(KeyPress::Escape),
        Key::C => 'c',
        Key::S => 's',
        Key::N => 'n',
        _ => return None,
    };
    Some(KeyPress::Char(if shift { ch.to_ascii_uppercase() } else { ch }))
}

struct Surface {
    name: String,
    window: Window,
    controls: Vec<Control>,
}

impl Surface {
    fn refresh_title(&mut self) {
        let mut title = self.name.clone();
        for c in &self.controls {
            title.push_str(" | ");
            title.push_str(&c.to_string());
        }
        self.window.set_title(&title);
    }
}

/// A single minifb window standing in for the current mode's surface.
pub struct MinifbDisplay {
    surface: Option<Surface>,
    events: Vec<ControlEvent>,
    // Set by a successful `show`, consumed by the next `poll_key`.
    pumped: bool,
}

impl MinifbDisplay {
    pub fn new() -> Self {
        Self { surface: None, events: Vec::new(), pumped: false }
    }

    // Turn control-key presses into clamped value changes + queued events.
    fn handle_control_keys(&mut self, pressed: &[Key]) {
        let Some(surface) = self.surface.as_mut() else { return };
        let mut changed = false;
        for control in &mut surface.controls {
            for b in bindings_for(control.id) {
                for key in pressed {
                    let step = if *key == b.inc {
                        b.step
                    } else if *key == b.dec {
                        -b.step
                    } else {
                        continue;
                    };
                    let before = control.value;
                    let after = control.nudge(step);
                    if after != before {
                        self.events.push(ControlEvent { id: control.id, value: after });
                        changed = true;
                    }
                }
            }
        }
        if changed {
            surface.refresh_title();
        }
    }

    fn take_key(&mut self, pressed: &[Key]) -> Option<KeyPress> {
        let surface = self.surface.as_ref()?;
        let shift =
            surface.window.is_key_down(Key::LeftShift) || surface.window.is_key_down(Key::RightShift);
        pressed.iter().find_map(|&k| key_to_press(k, shift))
    }
}

impl Default for MinifbDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for MinifbDisplay {
    fn create_surface(&mut self, name: &str, width: usize, height: usize) -> Result<()> {
        let mut window = Window::new(name, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        // The loop paces itself on the camera; don't let minifb sleep on top of that.
        window.set_target_fps(0);
        debug!(surface = name, width, height, "surface created");
        self.surface = Some(Surface { name: name.to_string(), window, controls: Vec::new() });
        Ok(())
    }

    fn create_control(&mut self, surface: &str, control: &Control) -> Result<()> {
        let s = self
            .surface
            .as_mut()
            .filter(|s| s.name == surface)
            .ok_or_else(|| Error::NoSurface(surface.to_string()))?;
        s.controls.push(control.clone());
        s.refresh_title();
        Ok(())
    }

    fn destroy_all(&mut self) {
        // Dropping the Window closes it.
        if let Some(s) = self.surface.take() {
            debug!(surface = %s.name, "surface destroyed");
        }
        self.events.clear();
        self.pumped = false;
    }

    fn show(&mut self, surface: &str, frame: &FrameBuffer) -> Result<()> {
        let s = self
            .surface
            .as_mut()
            .filter(|s| s.name == surface)
            .ok_or_else(|| Error::NoSurface(surface.to_string()))?;
        s.window
            .update_with_buffer(&frame.pixels, frame.width, frame.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        self.pumped = true;
        Ok(())
    }

    fn poll_key(&mut self, wait: Duration) -> Option<KeyPress> {
        let pumped = std::mem::take(&mut self.pumped);
        let Some(s) = self.surface.as_mut() else {
            thread::sleep(wait);
            return None;
        };
        // Keys pumped by this iteration's `show` come first. Otherwise (no
        // frame shown, or nothing pressed) wait and pump the window ourselves.
        let pressed = match fresh_keys(pumped, s.window.get_keys_pressed(KeyRepeat::No)) {
            Some(keys) => keys,
            None => {
                thread::sleep(wait);
                s.window.update();
                s.window.get_keys_pressed(KeyRepeat::No)
            }
        };
        // Closing the window counts as Escape.
        if !s.window.is_open() {
            return Some(KeyPress::Escape);
        }
        self.handle_control_keys(&pressed);
        self.take_key(&pressed)
    }

    fn drain_control_events(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }
}
