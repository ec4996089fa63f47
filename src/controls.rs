// Adjustable integer controls ("trackbars") and the per-mode parameter sets built on them.

use std::fmt;

/// Identifies one live parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlId {
    LowThreshold,
    KernelSize,
    Scale,
    Delta,
}

/// A slider-like integer bound to a fixed inclusive range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Control {
    pub id: ControlId,
    pub label: &'static str,
    pub min: i32,
    pub max: i32,
    pub value: i32,
}

impl Control {
    pub fn new(id: ControlId, label: &'static str, min: i32, max: i32, default: i32) -> Self {
        Self { id, label, min, max, value: default.clamp(min, max) }
    }

    /// Store `value` clamped into range; returns the stored value.
    pub fn set(&mut self, value: i32) -> i32 {
        self.value = value.clamp(self.min, self.max);
        self.value
    }

    /// Move by `step` (may be negative), clamped.
    pub fn nudge(&mut self, step: i32) -> i32 {
        self.set(self.value.saturating_add(step))
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label, self.value)
    }
}

/// A control changed on the display side; consumed at the top of the next loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlEvent {
    pub id: ControlId,
    pub value: i32,
}

pub const MAX_LOW_THRESHOLD: i32 = 100;
pub const THRESHOLD_RATIO: i32 = 3;

/// Canny parameters: one low threshold; the high threshold is always 3x low.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CannyParams {
    pub low: Control,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            low: Control::new(ControlId::LowThreshold, "Min Threshold:", 0, MAX_LOW_THRESHOLD, 0),
        }
    }
}

impl CannyParams {
    pub fn low_threshold(&self) -> i32 {
        self.low.value
    }

    pub fn high_threshold(&self) -> i32 {
        self.low.value * THRESHOLD_RATIO
    }

    pub fn controls(&self) -> Vec<Control> {
        vec![self.low.clone()]
    }

    /// Returns true when the event addressed one of our controls.
    pub fn apply(&mut self, ev: ControlEvent) -> bool {
        match ev.id {
            ControlId::LowThreshold => {
                self.low.set(ev.value);
                true
            }
            _ => false,
        }
    }
}

/// Sobel parameters: kernel-size selector, scale and delta.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SobelParams {
    pub ksize: Control,
    pub scale: Control,
    pub delta: Control,
}

impl Default for SobelParams {
    fn default() -> Self {
        Self {
            ksize: Control::new(ControlId::KernelSize, "ksize", -1, 15, 0),
            scale: Control::new(ControlId::Scale, "scale", 1, 30, 1),
            delta: Control::new(ControlId::Delta, "delta", 0, 30, 0),
        }
    }
}

impl SobelParams {
    /// Odd aperture derived from the selector: -1 -> -1 (Scharr), 0 -> 1, 1 -> 3, ... 15 -> 31.
    pub fn kernel_size(&self) -> i32 {
        2 * self.ksize.value + 1
    }

    pub fn scale(&self) -> i32 {
        self.scale.value
    }

    pub fn delta(&self) -> i32 {
        self.delta.value
    }

    pub fn controls(&self) -> Vec<Control> {
        vec![self.ksize.clone(), self.scale.clone(), self.delta.clone()]
    }

    pub fn apply(&mut self, ev: ControlEvent) -> bool {
        let target = match ev.id {
            ControlId::KernelSize => &mut self.ksize,
            ControlId::Scale => &mut self.scale,
            ControlId::Delta => &mut self.delta,
            ControlId::LowThreshold => return false,
        };
        target.set(ev.value);
        true
    }
}
