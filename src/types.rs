// Core types shared by the capture, pipeline and display stages.

use image::{GrayImage, RgbImage};

/// What the window shows: one u32 per pixel, packed 0x00RRGGBB for minifb.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,     // how wide the frame is on screen (pixels)
    pub height: usize,    // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB
}

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[cfg(test)]
#[inline]
pub fn unpack_rgb(px: u32) -> [u8; 3] {
    [((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8]
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0; width * height] }
    }

    /// Match the given size, reallocating only when it actually changed.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels.clear();
            self.pixels.resize(width * height, 0);
        }
    }

    /// Overwrite with an RGB image (the raw camera frame).
    pub fn copy_from_rgb(&mut self, img: &RgbImage) {
        self.resize(img.width() as usize, img.height() as usize);
        for (dst, px) in self.pixels.iter_mut().zip(img.pixels()) {
            *dst = pack_rgb(px[0], px[1], px[2]);
        }
    }

    /// Overwrite with a grayscale image; each luma value lands on all three channels.
    pub fn copy_from_gray(&mut self, img: &GrayImage) {
        self.resize(img.width() as usize, img.height() as usize);
        for (dst, px) in self.pixels.iter_mut().zip(img.pixels()) {
            *dst = pack_rgb(px[0], px[0], px[0]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn rgb_copy_packs_channels() {
        let img = RgbImage::from_pixel(3, 2, Rgb([0x12, 0x34, 0x56]));
        let mut fb = FrameBuffer::new(1, 1);
        fb.copy_from_rgb(&img);
        assert_eq!((fb.width, fb.height), (3, 2));
        assert!(fb.pixels.iter().all(|&p| p == 0x0012_3456));
        assert_eq!(unpack_rgb(fb.pixels[0]), [0x12, 0x34, 0x56]);
    }

    #[test]
    fn gray_copy_replicates_luma() {
        let img = GrayImage::from_pixel(2, 2, Luma([200]));
        let mut fb = FrameBuffer::new(2, 2);
        fb.copy_from_gray(&img);
        assert!(fb.pixels.iter().all(|&p| p == 0x00C8_C8C8));
    }
}
