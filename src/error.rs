// One error type for the whole app. Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("window update error: {0}")]
    WindowUpdate(String), // Pushing a buffer to the window failed
    #[error("camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed
    #[error("no display surface named {0:?}")]
    NoSurface(String), // Showing on a surface that was never created (or already destroyed)
}

pub type Result<T> = std::result::Result<T, Error>;
