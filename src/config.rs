// Command-line configuration.

use clap::Parser;

use crate::mode::Mode;

/// Live camera viewer: raw frame, Canny edge map or Sobel gradient map.
///
/// Keys: N normal, C canny, S sobel, Esc quit.
/// Canny threshold: Up/Down (PageUp/PageDown by 10).
/// Sobel: [ ] ksize, - = scale, , . delta.
#[derive(Debug, Parser)]
#[command(name = "edge-viewer", version, about, long_about)]
pub struct Config {
    /// Camera device index.
    #[arg(long, default_value_t = 0)]
    pub camera: u32,

    /// Requested frame width in pixels.
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Requested frame height in pixels.
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Mode to start in.
    #[arg(long, value_enum, default_value_t = Mode::Normal)]
    pub mode: Mode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn defaults() {
        let cfg = Config::parse_from(["edge-viewer"]);
        assert_eq!((cfg.camera, cfg.width, cfg.height), (0, 640, 480));
        assert_eq!(cfg.mode, Mode::Normal);
    }

    #[test]
    fn overrides() {
        let cfg = Config::parse_from([
            "edge-viewer", "--camera", "2", "--width", "320", "--height", "240", "--mode", "sobel",
        ]);
        assert_eq!((cfg.camera, cfg.width, cfg.height), (2, 320, 240));
        assert_eq!(cfg.mode, Mode::Sobel);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Config::try_parse_from(["edge-viewer", "--mode", "laplace"]).is_err());
    }

    #[test]
    fn command_is_well_formed() {
        Config::command().debug_assert();
    }
}
