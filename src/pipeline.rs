// Per-mode frame processing. Each call turns the current camera frame into the
// buffer that will be shown, reusing the intermediate buffers owned here.

use image::{GrayImage, RgbImage};
use imageproc::edges::canny;
use imageproc::filter::{box_filter, separable_filter_equal};

use crate::controls::{CannyParams, SobelParams};
use crate::gradient::GradientWorkspace;
use crate::types::{FrameBuffer, pack_rgb};

/// 3-tap Gaussian for sigma derived from a 3x3 aperture, applied on both axes.
const GAUSSIAN_3: [f32; 3] = [0.25, 0.5, 0.25];

pub struct Pipeline {
    gray: GrayImage,
    grad: GrayImage,
    gradient: GradientWorkspace,
}

/// BT.601 luma (0.299 R + 0.587 G + 0.114 B), rounded to nearest.
#[inline]
fn luma601(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
}

/// Luma of `src` into `dst`, resizing `dst` only when dimensions changed.
pub fn to_gray(src: &RgbImage, dst: &mut GrayImage) {
    if dst.dimensions() != src.dimensions() {
        *dst = GrayImage::new(src.width(), src.height());
    }
    for (d, s) in dst.pixels_mut().zip(src.pixels()) {
        d[0] = luma601(s[0], s[1], s[2]);
    }
}

/// Smallest f32 strictly above `t` (t >= 0).
///
/// imageproc's hysteresis keeps pixels with `magnitude >= threshold`; the
/// thresholds here mean "strictly above", and at 0 the inclusive test would
/// let the flood fill reach the image border.
#[inline]
fn strictly_above(t: i32) -> f32 {
    let t = t.max(0) as f32;
    f32::from_bits(t.to_bits() + 1)
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            gray: GrayImage::new(0, 0),
            grad: GrayImage::new(0, 0),
            gradient: GradientWorkspace::new(),
        }
    }

    /// Raw frame, untouched.
    pub fn normal(&mut self, frame: &RgbImage, out: &mut FrameBuffer) {
        out.copy_from_rgb(frame);
    }

    /// Original colours wherever an edge was found, black everywhere else.
    pub fn canny(&mut self, frame: &RgbImage, params: &CannyParams, out: &mut FrameBuffer) {
        to_gray(frame, &mut self.gray);
        // box_filter and canny return fresh images; only `gray` is reused here.
        let smoothed = box_filter(&self.gray, 1, 1);
        let edges = canny(
            &smoothed,
            strictly_above(params.low_threshold()),
            strictly_above(params.high_threshold()),
        );

        out.resize(frame.width() as usize, frame.height() as usize);
        for ((dst, src), e) in out.pixels.iter_mut().zip(frame.pixels()).zip(edges.pixels()) {
            *dst = if e[0] != 0 { pack_rgb(src[0], src[1], src[2]) } else { 0 };
        }
    }

    /// Grayscale gradient magnitude with the live aperture/scale/delta.
    pub fn sobel(&mut self, frame: &RgbImage, params: &SobelParams, out: &mut FrameBuffer) {
        // Allocated per call: imageproc has no in-place separable filter.
        let blurred: RgbImage = separable_filter_equal(frame, &GAUSSIAN_3[..]);
        to_gray(&blurred, &mut self.gray);
        self.gradient.magnitude(
            &self.gray,
            params.kernel_size(),
            params.scale(),
            params.delta(),
            &mut self.grad,
        );
        out.copy_from_gray(&self.grad);
    }
}
