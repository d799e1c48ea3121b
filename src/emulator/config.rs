// Configuration management
//
// User-facing settings persisted as TOML next to the executable. A missing
// or unreadable file silently yields defaults; saving is explicit.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Default configuration file name
const CONFIG_FILE: &str = "famicore.toml";

/// Emulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmulatorConfig {
    /// Video settings
    pub video: VideoConfig,

    /// Optional palette file (192-byte .pal); built-in palette when absent
    pub palette_file: Option<PathBuf>,
}

/// Video configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Integer window scale (1-8)
    pub scale: u32,

    /// Wait between frames instead of spinning
    pub vsync: bool,

    /// Target frame rate (60 for NTSC)
    pub fps: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        VideoConfig {
            scale: 3,
            vsync: true,
            fps: 60,
        }
    }
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            video: VideoConfig::default(),
            palette_file: None,
        }
    }
}

impl EmulatorConfig {
    /// Load the configuration file, falling back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from(CONFIG_FILE).unwrap_or_else(|_| {
            log::info!("no {} found, using default configuration", CONFIG_FILE);
            Self::default()
        })
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &str) -> Result<Self, io::Error> {
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Persist the configuration to its default location
    pub fn save(&self) -> Result<(), io::Error> {
        let text = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(CONFIG_FILE, text)
    }
}
