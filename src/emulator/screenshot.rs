// Screenshot functionality
//
// Encodes the last presented frame as a PNG under
// screenshots/<rom-stem>/ with a timestamped filename.

use crate::display::{FRAME_BYTES, SCREEN_HEIGHT, SCREEN_WIDTH};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while saving a screenshot
#[derive(Debug)]
pub enum ScreenshotError {
    /// Underlying file I/O failed
    Io(io::Error),
    /// PNG encoding failed
    PngEncoding(png::EncodingError),
}

impl std::fmt::Display for ScreenshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenshotError::Io(e) => write!(f, "I/O error: {}", e),
            ScreenshotError::PngEncoding(e) => write!(f, "PNG encoding error: {}", e),
        }
    }
}

impl std::error::Error for ScreenshotError {}

impl From<io::Error> for ScreenshotError {
    fn from(e: io::Error) -> Self {
        ScreenshotError::Io(e)
    }
}

impl From<png::EncodingError> for ScreenshotError {
    fn from(e: png::EncodingError) -> Self {
        ScreenshotError::PngEncoding(e)
    }
}

/// Save an RGBA frame as a PNG screenshot
///
/// Returns the path of the written file. The directory structure is
/// screenshots/<rom-stem>/ or screenshots/default/ when no ROM is loaded.
pub fn save_screenshot(
    frame: &[u8],
    rom_path: Option<&Path>,
) -> Result<PathBuf, ScreenshotError> {
    debug_assert_eq!(frame.len(), FRAME_BYTES);

    let directory = screenshot_directory(rom_path);
    fs::create_dir_all(&directory)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let file_path = directory.join(format!("screenshot_{}.png", timestamp));

    let file = fs::File::create(&file_path)?;
    let writer = io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(frame)?;

    log::info!("screenshot saved to {}", file_path.display());
    Ok(file_path)
}

/// Screenshot directory for the loaded ROM
fn screenshot_directory(rom_path: Option<&Path>) -> PathBuf {
    let base = PathBuf::from("screenshots");
    match rom_path.and_then(|p| p.file_stem()) {
        Some(stem) => base.join(stem),
        None => base.join("default"),
    }
}
