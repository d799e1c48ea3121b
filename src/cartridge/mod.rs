// Cartridge module - iNES ingestion and mapper access
//
// A cartridge arrives as a raw byte image in the iNES format:
//
// ```text
// bytes 0-3   magic "NES\x1A"
// byte  4     number of 16KB PRG-ROM banks
// byte  5     number of 8KB CHR-ROM banks (0 means the board carries CHR-RAM)
// byte  6     flags: mirroring (bit 0), battery (bit 1), trainer (bit 2),
//             four-screen (bit 3), low nibble of mapper number (bits 4-7)
// byte  7     high nibble of mapper number (bits 4-7)
// bytes 8-15  padding / extensions (ignored here)
// ```
//
// After the 16-byte header comes an optional 512-byte trainer, then PRG-ROM,
// then CHR-ROM. The PPU never sees the cartridge directly; it goes through
// the `Mapper` trait, which also reports the board's nametable mirroring.

pub mod mappers;

pub use mappers::{Mapper, Mapper0};

use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;

/// Size of the iNES header in bytes
const INES_HEADER_SIZE: usize = 16;

/// Size of the optional trainer block in bytes
const TRAINER_SIZE: usize = 512;

/// Size of one PRG-ROM bank in bytes (16KB)
const PRG_BANK_SIZE: usize = 16 * 1024;

/// Size of one CHR bank in bytes (8KB)
const CHR_BANK_SIZE: usize = 8 * 1024;

/// Nametable mirroring arrangement selected by the cartridge board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    /// Logical tables (0,1) collapse onto physical table 0, (2,3) onto 1
    Horizontal,
    /// Logical tables (0,2) collapse onto physical table 0, (1,3) onto 1
    Vertical,
    /// All four logical tables share one physical table
    SingleScreen,
    /// Four independent tables (needs cartridge VRAM; treated as horizontal)
    FourScreen,
}

/// Errors raised while ingesting an iNES image
#[derive(Debug)]
pub enum INesError {
    /// Underlying file I/O failed
    Io(io::Error),
    /// The image does not start with the "NES\x1A" magic
    InvalidMagic,
    /// The image is shorter than its header claims
    Truncated { expected: usize, actual: usize },
    /// The image requires a mapper this emulator does not implement
    UnsupportedMapper(u8),
}

impl fmt::Display for INesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            INesError::Io(e) => write!(f, "I/O error: {}", e),
            INesError::InvalidMagic => write!(f, "not an iNES image (bad magic)"),
            INesError::Truncated { expected, actual } => {
                write!(f, "truncated image: need {} bytes, got {}", expected, actual)
            }
            INesError::UnsupportedMapper(n) => write!(f, "unsupported mapper {}", n),
        }
    }
}

impl std::error::Error for INesError {}

impl From<io::Error> for INesError {
    fn from(e: io::Error) -> Self {
        INesError::Io(e)
    }
}

/// Parsed iNES header fields
#[derive(Debug, Clone, Copy)]
pub struct INesHeader {
    /// Number of 16KB PRG-ROM banks
    pub prg_rom_banks: u8,
    /// Number of 8KB CHR-ROM banks; 0 means 8KB of CHR-RAM
    pub chr_rom_banks: u8,
    /// Mapper number assembled from both flag nibbles
    pub mapper: u8,
    /// Nametable mirroring requested by the board
    pub mirroring: Mirroring,
    /// Whether a 512-byte trainer precedes PRG-ROM
    pub has_trainer: bool,
    /// Whether the board carries battery-backed PRG-RAM
    pub has_battery: bool,
}

impl INesHeader {
    /// Parse the first 16 bytes of an iNES image
    pub fn parse(data: &[u8]) -> Result<Self, INesError> {
        if data.len() < INES_HEADER_SIZE {
            return Err(INesError::Truncated {
                expected: INES_HEADER_SIZE,
                actual: data.len(),
            });
        }
        if &data[0..4] != b"NES\x1A" {
            return Err(INesError::InvalidMagic);
        }

        let flags6 = data[6];
        let flags7 = data[7];

        let mirroring = if flags6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        Ok(INesHeader {
            prg_rom_banks: data[4],
            chr_rom_banks: data[5],
            mapper: (flags7 & 0xF0) | (flags6 >> 4),
            mirroring,
            has_trainer: flags6 & 0x04 != 0,
            has_battery: flags6 & 0x02 != 0,
        })
    }
}

/// A loaded cartridge: raw PRG/CHR images plus board metadata
pub struct Cartridge {
    /// PRG-ROM image (multiple of 16KB)
    pub prg_rom: Vec<u8>,
    /// CHR-ROM image, or zero-filled CHR-RAM when the header had no CHR banks
    pub chr_rom: Vec<u8>,
    /// Optional 512-byte trainer block
    pub trainer: Option<Vec<u8>>,
    /// Mapper number from the header
    pub mapper: u8,
    /// Nametable mirroring from the header
    pub mirroring: Mirroring,
    /// Battery-backed PRG-RAM flag from the header
    pub has_battery: bool,
}

impl Cartridge {
    /// Create an empty cartridge (useful for tests and benches)
    pub fn new() -> Self {
        Cartridge {
            prg_rom: Vec::new(),
            chr_rom: Vec::new(),
            trainer: None,
            mapper: 0,
            mirroring: Mirroring::Horizontal,
            has_battery: false,
        }
    }

    /// Ingest a raw iNES image
    ///
    /// The 16-byte header is parsed and skipped, the optional trainer is
    /// captured, and the PRG/CHR images are copied out. A header advertising
    /// zero CHR banks gets 8KB of zero-filled CHR-RAM instead.
    pub fn from_ines_bytes(data: &[u8]) -> Result<Self, INesError> {
        let header = INesHeader::parse(data)?;

        let mut offset = INES_HEADER_SIZE;

        let trainer = if header.has_trainer {
            if data.len() < offset + TRAINER_SIZE {
                return Err(INesError::Truncated {
                    expected: offset + TRAINER_SIZE,
                    actual: data.len(),
                });
            }
            let block = data[offset..offset + TRAINER_SIZE].to_vec();
            offset += TRAINER_SIZE;
            Some(block)
        } else {
            None
        };

        let prg_size = header.prg_rom_banks as usize * PRG_BANK_SIZE;
        if data.len() < offset + prg_size {
            return Err(INesError::Truncated {
                expected: offset + prg_size,
                actual: data.len(),
            });
        }
        let prg_rom = data[offset..offset + prg_size].to_vec();
        offset += prg_size;

        let chr_size = header.chr_rom_banks as usize * CHR_BANK_SIZE;
        let chr_rom = if chr_size == 0 {
            // CHR-RAM board
            vec![0; CHR_BANK_SIZE]
        } else {
            if data.len() < offset + chr_size {
                return Err(INesError::Truncated {
                    expected: offset + chr_size,
                    actual: data.len(),
                });
            }
            data[offset..offset + chr_size].to_vec()
        };

        log::info!(
            "loaded cartridge: mapper {}, {}KB PRG, {}KB CHR{}, {:?} mirroring",
            header.mapper,
            prg_rom.len() / 1024,
            chr_rom.len() / 1024,
            if header.chr_rom_banks == 0 { " (RAM)" } else { "" },
            header.mirroring
        );

        Ok(Cartridge {
            prg_rom,
            chr_rom,
            trainer,
            mapper: header.mapper,
            mirroring: header.mirroring,
            has_battery: header.has_battery,
        })
    }

    /// Load an iNES image from disk
    pub fn from_ines_file<P: AsRef<Path>>(path: P) -> Result<Self, INesError> {
        let data = fs::read(path)?;
        Self::from_ines_bytes(&data)
    }

    /// Consume the cartridge and wrap it in its mapper
    ///
    /// The shared handle is cloned into both the CPU bus and the PPU, which
    /// is the only place in the system where two components view the same
    /// mutable device.
    pub fn into_mapper(self) -> Result<Rc<RefCell<Box<dyn Mapper>>>, INesError> {
        match self.mapper {
            0 => Ok(Rc::new(RefCell::new(Box::new(Mapper0::new(self)) as Box<dyn Mapper>))),
            n => Err(INesError::UnsupportedMapper(n)),
        }
    }
}

impl Default for Cartridge {
    fn default() -> Self {
        Self::new()
    }
}
