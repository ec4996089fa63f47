// Directional derivatives with a selectable odd aperture, plus the |gx|/|gy| blend
// that turns them into one displayable gradient-magnitude image.
//
// Kernels are separable: a binomial smoothing row along one axis and a binomial
// difference along the other. Responses are kept at 16-bit signed depth so the
// sign survives until the absolute-value step. Borders reflect without repeating
// the edge pixel (…2 1 | 0 1 2 …).

use image::GrayImage;

/// Which derivative kernel family to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aperture {
    /// 3x3 Scharr: difference [-1 0 1], smoothing [3 10 3].
    Scharr,
    /// Odd-sized Sobel. Size 1 means no smoothing across the derivative.
    Sobel(usize),
}

impl Aperture {
    /// Map the kernel size derived from the slider (2*sel+1) to an aperture.
    /// Anything that is not a positive odd size falls back to Scharr, which is
    /// what -1 asks for.
    pub fn from_ksize(ksize: i32) -> Self {
        if ksize > 0 && ksize % 2 == 1 {
            Aperture::Sobel(ksize as usize)
        } else {
            Aperture::Scharr
        }
    }

    /// (horizontal, vertical) kernels for d/dx.
    /// d/dy uses the same pair with the axes swapped.
    pub fn kernels(self) -> (Vec<f64>, Vec<f64>) {
        match self {
            Aperture::Scharr => (vec![-1.0, 0.0, 1.0], vec![3.0, 10.0, 3.0]),
            Aperture::Sobel(1) => (derivative_row(3), smoothing_row(1)),
            Aperture::Sobel(n) => (derivative_row(n), smoothing_row(n)),
        }
    }
}

/// Binomial coefficients C(n-1, k), k = 0..n.
pub fn smoothing_row(n: usize) -> Vec<f64> {
    let mut row = vec![1.0f64];
    for _ in 1..n {
        let mut next = Vec::with_capacity(row.len() + 1);
        next.push(1.0);
        for pair in row.windows(2) {
            next.push(pair[0] + pair[1]);
        }
        next.push(1.0);
        row = next;
    }
    row
}

/// First difference of the (n-1)-tap binomial row: [-1 0 1], [-1 -2 0 2 1], …
pub fn derivative_row(n: usize) -> Vec<f64> {
    let base = smoothing_row(n.max(2) - 1);
    let n = base.len() + 1;
    (0..n)
        .map(|i| {
            let left = if i >= 1 { base[i - 1] } else { 0.0 };
            let right = if i < base.len() { base[i] } else { 0.0 };
            left - right
        })
        .collect()
}

#[inline]
fn reflect101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let last = n as isize - 1;
    let mut i = i;
    // Large apertures on tiny images may need more than one bounce.
    loop {
        if i < 0 {
            i = -i;
        } else if i > last {
            i = 2 * last - i;
        } else {
            return i as usize;
        }
    }
}

#[inline]
fn saturate_i16(v: f64) -> i16 {
    v.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

#[inline]
fn abs_u8(v: i16) -> u8 {
    v.unsigned_abs().min(255) as u8
}

/// 0.5*|gx| + 0.5*|gy|, halves rounded to even.
#[inline]
fn blend_half(gx: i16, gy: i16) -> u8 {
    let sum = 0.5 * abs_u8(gx) as f32 + 0.5 * abs_u8(gy) as f32;
    sum.round_ties_even().min(255.0) as u8
}

/// Separable correlation of `src` with `h` along x then `v` along y,
/// written as `scale * response + delta` saturated to i16.
pub fn filter_separable(
    src: &GrayImage,
    h: &[f64],
    v: &[f64],
    scale: f64,
    delta: f64,
    tmp: &mut Vec<f64>,
    dst: &mut Vec<i16>,
) {
    let (w, ht) = (src.width() as usize, src.height() as usize);
    let raw = src.as_raw();
    tmp.clear();
    tmp.resize(w * ht, 0.0);
    dst.clear();
    dst.resize(w * ht, 0);

    let rh = (h.len() / 2) as isize;
    for y in 0..ht {
        let row = &raw[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0.0;
            for (i, k) in h.iter().enumerate() {
                let sx = reflect101(x as isize + i as isize - rh, w);
                acc += k * row[sx] as f64;
            }
            tmp[y * w + x] = acc;
        }
    }

    let rv = (v.len() / 2) as isize;
    for y in 0..ht {
        for x in 0..w {
            let mut acc = 0.0;
            for (j, k) in v.iter().enumerate() {
                let sy = reflect101(y as isize + j as isize - rv, ht);
                acc += k * tmp[sy * w + x];
            }
            dst[y * w + x] = saturate_i16(acc * scale + delta);
        }
    }
}

/// Reusable buffers for the gradient-magnitude pass.
#[derive(Default)]
pub struct GradientWorkspace {
    tmp: Vec<f64>,
    grad_x: Vec<i16>,
    grad_y: Vec<i16>,
}

impl GradientWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// 0.5*|d/dx| + 0.5*|d/dy| into `out` (resized to match `gray`).
    pub fn magnitude(
        &mut self,
        gray: &GrayImage,
        ksize: i32,
        scale: i32,
        delta: i32,
        out: &mut GrayImage,
    ) {
        let (deriv, smooth) = Aperture::from_ksize(ksize).kernels();
        let (scale, delta) = (scale as f64, delta as f64);

        filter_separable(gray, &deriv, &smooth, scale, delta, &mut self.tmp, &mut self.grad_x);
        filter_separable(gray, &smooth, &deriv, scale, delta, &mut self.tmp, &mut self.grad_y);

        if out.dimensions() != gray.dimensions() {
            *out = GrayImage::new(gray.width(), gray.height());
        }
        for ((o, &gx), &gy) in out.iter_mut().zip(&self.grad_x).zip(&self.grad_y) {
            *o = blend_half(gx, gy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn binomial_rows() {
        assert_eq!(smoothing_row(1), vec![1.0]);
        assert_eq!(smoothing_row(3), vec![1.0, 2.0, 1.0]);
        assert_eq!(smoothing_row(5), vec![1.0, 4.0, 6.0, 4.0, 1.0]);
        assert_eq!(derivative_row(3), vec![-1.0, 0.0, 1.0]);
        assert_eq!(derivative_row(5), vec![-1.0, -2.0, 0.0, 2.0, 1.0]);
    }

    #[test]
    fn aperture_from_ksize() {
        assert_eq!(Aperture::from_ksize(-1), Aperture::Scharr);
        assert_eq!(Aperture::from_ksize(1), Aperture::Sobel(1));
        assert_eq!(Aperture::from_ksize(31), Aperture::Sobel(31));

        let (d, s) = Aperture::Sobel(1).kernels();
        assert_eq!(d, vec![-1.0, 0.0, 1.0]);
        assert_eq!(s, vec![1.0]);

        let (d, s) = Aperture::Scharr.kernels();
        assert_eq!(d, vec![-1.0, 0.0, 1.0]);
        assert_eq!(s, vec![3.0, 10.0, 3.0]);
    }

    #[test]
    fn every_selector_gives_matching_kernel_lengths() {
        for sel in -1..=15 {
            let (d, s) = Aperture::from_ksize(2 * sel + 1).kernels();
            assert_eq!(d.len() % 2, 1);
            assert_eq!(s.len() % 2, 1);
            assert!(d.iter().sum::<f64>().abs() < 1e-6, "derivative must sum to zero");
        }
    }

    #[test]
    fn reflect_without_repeating_edge() {
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(-2, 5), 2);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(6, 5), 2);
        assert_eq!(reflect101(-20, 3), 0);
        assert_eq!(reflect101(7, 1), 0);
    }

    #[test]
    fn flat_image_gives_only_delta() {
        let gray = GrayImage::from_pixel(8, 6, Luma([90]));
        let mut ws = GradientWorkspace::new();
        let mut out = GrayImage::new(1, 1);

        ws.magnitude(&gray, 3, 1, 0, &mut out);
        assert_eq!(out.dimensions(), (8, 6));
        assert!(out.pixels().all(|p| p[0] == 0));

        ws.magnitude(&gray, 3, 1, 10, &mut out);
        assert!(out.pixels().all(|p| p[0] == 10));
    }

    #[test]
    fn vertical_step_lights_boundary_columns() {
        let gray = GrayImage::from_fn(10, 6, |x, _| if x < 5 { Luma([0]) } else { Luma([100]) });
        let mut ws = GradientWorkspace::new();
        let mut out = GrayImage::new(10, 6);
        ws.magnitude(&gray, 3, 1, 0, &mut out);

        // |gx| = 4*100 saturates at 255, gy = 0 -> half of 255.
        assert_eq!(out.get_pixel(4, 3)[0], 128);
        assert_eq!(out.get_pixel(5, 3)[0], 128);
        assert_eq!(out.get_pixel(1, 3)[0], 0);
        assert_eq!(out.get_pixel(8, 3)[0], 0);
    }

    #[test]
    fn blend_rounds_halves_to_even() {
        assert_eq!(blend_half(1, 0), 0);
        assert_eq!(blend_half(3, 0), 2);
        assert_eq!(blend_half(-5, 0), 2);
        assert_eq!(blend_half(0, 7), 4);
        assert_eq!(blend_half(2, 4), 3);
        assert_eq!(blend_half(1000, 0), 128);
        assert_eq!(blend_half(i16::MIN, i16::MAX), 255);
    }

    #[test]
    fn large_aperture_on_small_image() {
        let gray = GrayImage::from_fn(4, 3, |x, y| Luma([(x * 40 + y * 10) as u8]));
        let mut ws = GradientWorkspace::new();
        let mut out = GrayImage::new(4, 3);
        ws.magnitude(&gray, 31, 30, 30, &mut out);
        assert_eq!(out.dimensions(), (4, 3));
    }
}
