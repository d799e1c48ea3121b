// PPU memory access - routing over the 14-bit PPU bus
//
// ```text
// $0000-$1FFF  pattern tables, serviced by the cartridge mapper
// $2000-$3EFF  nametables, 2KB mirrored per the cartridge's mode
// $3F00-$3FFF  palette RAM, 32 bytes mirrored every 32
// ```

use super::constants::{NAMETABLE_SIZE, PPU_ADDR_MASK};
use super::Ppu;
use crate::cartridge::Mirroring;

impl Ppu {
    /// Fold a nametable address onto the 2KB of physical VRAM
    ///
    /// Horizontal mirroring stacks the two physical tables vertically
    /// (logical 0,1 -> 0 and 2,3 -> 1); vertical mirroring stacks them
    /// side by side (0,2 -> 0 and 1,3 -> 1).
    pub(super) fn mirror_nametable_addr(&self, addr: u16) -> usize {
        let addr = (addr & 0x0FFF) as usize;
        let table = addr / NAMETABLE_SIZE;
        let offset = addr % NAMETABLE_SIZE;

        let physical = match self.mirroring {
            Mirroring::Horizontal => table >> 1,
            Mirroring::Vertical => table & 0x01,
            Mirroring::SingleScreen => 0,
            // Proper four-screen needs cartridge VRAM; fall back to horizontal
            Mirroring::FourScreen => table >> 1,
        };

        physical * NAMETABLE_SIZE + offset
    }

    /// Fold a palette address onto the 32 bytes of palette RAM
    ///
    /// Entry 0 of each sprite palette is physically the corresponding
    /// background entry: $10/$14/$18/$1C redirect to $00/$04/$08/$0C on
    /// both the read and the write path.
    pub(super) fn mirror_palette_addr(&self, addr: u16) -> usize {
        let addr = (addr & 0x001F) as usize;
        match addr {
            0x10 | 0x14 | 0x18 | 0x1C => addr - 0x10,
            _ => addr,
        }
    }

    /// Read a byte over the PPU bus
    pub fn ppu_read(&self, addr: u16) -> u8 {
        let addr = addr & PPU_ADDR_MASK;

        match addr {
            0x0000..=0x1FFF => match &self.mapper {
                Some(mapper) => mapper.borrow().ppu_read(addr),
                None => 0,
            },
            0x2000..=0x3EFF => self.nametables[self.mirror_nametable_addr(addr)],
            0x3F00..=0x3FFF => self.palette_ram[self.mirror_palette_addr(addr)],
            _ => unreachable!("address masked to 14 bits"),
        }
    }

    /// Write a byte over the PPU bus
    pub fn ppu_write(&mut self, addr: u16, data: u8) {
        let addr = addr & PPU_ADDR_MASK;

        match addr {
            0x0000..=0x1FFF => {
                if let Some(mapper) = &self.mapper {
                    mapper.borrow_mut().ppu_write(addr, data);
                }
            }
            0x2000..=0x3EFF => {
                let index = self.mirror_nametable_addr(addr);
                self.nametables[index] = data;
            }
            0x3F00..=0x3FFF => {
                let index = self.mirror_palette_addr(addr);
                self.palette_ram[index] = data;
            }
            _ => unreachable!("address masked to 14 bits"),
        }
    }
}
