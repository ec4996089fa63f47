// Opens the camera and decodes frames straight into a caller-owned RGB buffer.
// The main loop keeps one `RgbImage` alive and we overwrite it every iteration.

use crate::error::{Error, Result};

use image::RgbImage;
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};
use tracing::info;

/// Anything that can hand us successive RGB frames.
pub trait CaptureSource {
    /// True while the underlying stream is open and delivering frames.
    fn is_opened(&self) -> bool;

    /// Block until the next frame is ready and decode it into `frame`.
    /// `frame` is resized only when the stream's resolution differs from it.
    fn read(&mut self, frame: &mut RgbImage) -> Result<()>;

    /// Resolution the source is actually delivering.
    fn resolution(&self) -> (u32, u32);
}

// A small wrapper around nokhwa::Camera so the main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` at (or near) the requested resolution and start streaming.
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self> {
        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(CameraIndex::Index(index), req)
            .map_err(|e| Error::CameraInit(format!("create camera {index}: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("open stream: {e}")))?;

        // The driver may pick a slightly different resolution than we asked for.
        let actual = cam.resolution();
        info!(
            index,
            requested = %format!("{width}x{height}"),
            actual = %format!("{}x{}", actual.width(), actual.height()),
            "camera opened"
        );

        Ok(Self { cam, width: actual.width(), height: actual.height() })
    }
}

impl CaptureSource for CameraCapture {
    fn is_opened(&self) -> bool {
        self.cam.is_stream_open()
    }

    fn read(&mut self, frame: &mut RgbImage) -> Result<()> {
        let buffer = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("fetch frame: {e}")))?;

        let res = buffer.resolution();
        if frame.dimensions() != (res.width(), res.height()) {
            *frame = RgbImage::new(res.width(), res.height());
        }
        self.width = res.width();
        self.height = res.height();

        buffer
            .decode_image_to_buffer::<RgbFormat>(&mut **frame)
            .map_err(|e| Error::CameraFrame(format!("decode RGB: {e}")))?;
        Ok(())
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
