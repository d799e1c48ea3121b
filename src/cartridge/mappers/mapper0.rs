// Mapper 0 (NROM) - fixed banks, no switching
//
// CPU $8000-$FFFF sees PRG-ROM. NROM-256 fills the whole window with 32KB;
// NROM-128 has only 16KB, and the hardware leaves the upper address line
// undecoded so $C000-$FFFF repeats $8000-$BFFF. The nestest diagnostic
// depends on that repeat: its 16KB image must read identically at $8000
// and $C000.
//
// PPU $0000-$1FFF sees 8KB of CHR, either ROM or RAM depending on the
// board. Writes only stick when the board carries CHR-RAM.

use crate::cartridge::{Cartridge, Mapper, Mirroring};

/// NROM mapper (iNES mapper number 0)
pub struct Mapper0 {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    chr_writable: bool,
    mirroring: Mirroring,
}

impl Mapper0 {
    /// Wrap a cartridge in NROM wiring
    ///
    /// # Panics
    ///
    /// Panics if the PRG image is not 16KB or 32KB; the loader validates
    /// sizes before mappers are constructed.
    pub fn new(cartridge: Cartridge) -> Self {
        let prg_len = cartridge.prg_rom.len();
        assert!(
            prg_len == 16 * 1024 || prg_len == 32 * 1024,
            "NROM needs 16KB or 32KB PRG-ROM, got {} bytes",
            prg_len
        );

        // The loader hands over zero-filled CHR exactly when the header had
        // no CHR banks, i.e. when the board carries CHR-RAM.
        let chr_writable = cartridge.chr_rom.iter().all(|&b| b == 0);

        Mapper0 {
            prg_rom: cartridge.prg_rom,
            chr: cartridge.chr_rom,
            chr_writable,
            mirroring: cartridge.mirroring,
        }
    }
}

impl Mapper for Mapper0 {
    fn cpu_read(&self, addr: u16) -> u8 {
        match addr {
            0x8000..=0xFFFF => {
                // Modulo folds NROM-128's 16KB across the 32KB window
                let index = (addr - 0x8000) as usize;
                self.prg_rom[index % self.prg_rom.len()]
            }
            _ => 0,
        }
    }

    fn cpu_write(&mut self, _addr: u16, _data: u8) {
        // No registers, no bank switching; writes fall on ROM
    }

    fn ppu_read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.chr[addr as usize],
            _ => 0,
        }
    }

    fn ppu_write(&mut self, addr: u16, data: u8) {
        if let 0x0000..=0x1FFF = addr {
            if self.chr_writable {
                self.chr[addr as usize] = data;
            }
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}
