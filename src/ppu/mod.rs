// PPU module - Picture Processing Unit (2C02)
//
// A dot-accurate PPU: every `tick()` advances exactly one dot and may emit
// one pixel to the display. A frame is 262 scanlines of 341 dots each.
// Scanlines are numbered -1..=260; line -1 is the pre-render line that
// primes the pipelines for line 0.
//
// ```text
// scanline -1       pre-render: clear flags, vertical t->v transfer
// scanlines 0-239   visible: pixels out, both pipelines running
// scanline 240      post-render: idle
// scanline 241      vblank begins at dot 1 (flag + optional NMI)
// scanlines 242-260 vblank
// ```
//
// Per-dot data flow: scroll registers -> fetch addresses -> pattern and
// attribute bytes -> shift registers -> pixel + palette index -> palette
// RAM -> RGBA out.

mod constants;
mod memory;
mod registers;
mod rendering;

pub use registers::{ControlFlags, MaskFlags, StatusFlags, VramAddr};

use crate::cartridge::{Mapper, Mirroring};
use crate::display::{FrameBuffer, Palette};
use constants::*;
use rendering::SpriteEntry;
use std::cell::RefCell;
use std::rc::Rc;

/// The Picture Processing Unit
pub struct Ppu {
    // CPU-visible registers
    pub(crate) control: ControlFlags,
    pub(crate) mask: MaskFlags,
    pub(crate) status: StatusFlags,
    pub(crate) oam_addr: u8,

    // Internal scroll state: current address v, temporary t, fine X, and
    // the write latch shared by $2005/$2006 (reset by reading $2002)
    pub(crate) vram_addr: VramAddr,
    pub(crate) temp_addr: VramAddr,
    pub(crate) fine_x: u8,
    pub(crate) write_latch: bool,

    /// $2007 read buffer; non-palette reads lag one access behind
    pub(crate) read_buffer: u8,

    // PPU-side memory
    nametables: [u8; NAMETABLE_SIZE * 2],
    palette_ram: [u8; PALETTE_SIZE],
    mirroring: Mirroring,
    mapper: Option<Rc<RefCell<Box<dyn Mapper>>>>,

    /// Primary OAM: 64 sprites, 4 bytes each
    pub(crate) oam: [u8; OAM_SIZE],

    // Frame position
    scanline: i16,
    cycle: i16,
    odd_frame: bool,
    frame: u64,
    frame_complete: bool,
    nmi_pending: bool,

    // Background fetch latches (next tile)
    next_tile_id: u8,
    next_tile_attr: u8,
    next_tile_lo: u8,
    next_tile_hi: u8,

    // Background shifters: 16 bits so the next tile streams in behind the
    // current one; fine X indexes from the top
    bg_pattern_lo: u16,
    bg_pattern_hi: u16,
    bg_attrib_lo: u16,
    bg_attrib_hi: u16,

    // Sprite pipeline state for the scanline in progress
    secondary_oam: [SpriteEntry; MAX_SPRITES_PER_LINE],
    sprite_count: usize,
    sprite_shifter_lo: [u8; MAX_SPRITES_PER_LINE],
    sprite_shifter_hi: [u8; MAX_SPRITES_PER_LINE],
    sprite_zero_selected: bool,

    // Display sink
    screen: FrameBuffer,
    palette: Palette,
}

impl Ppu {
    /// Create a PPU in its power-on state
    pub fn new() -> Self {
        Ppu {
            control: ControlFlags::empty(),
            mask: MaskFlags::empty(),
            status: StatusFlags::empty(),
            oam_addr: 0,

            vram_addr: VramAddr::new(),
            temp_addr: VramAddr::new(),
            fine_x: 0,
            write_latch: false,
            read_buffer: 0,

            nametables: [0; NAMETABLE_SIZE * 2],
            palette_ram: [0; PALETTE_SIZE],
            mirroring: Mirroring::Horizontal,
            mapper: None,

            oam: [0; OAM_SIZE],

            scanline: PRERENDER_SCANLINE,
            cycle: 0,
            odd_frame: false,
            frame: 0,
            frame_complete: false,
            nmi_pending: false,

            next_tile_id: 0,
            next_tile_attr: 0,
            next_tile_lo: 0,
            next_tile_hi: 0,

            bg_pattern_lo: 0,
            bg_pattern_hi: 0,
            bg_attrib_lo: 0,
            bg_attrib_hi: 0,

            secondary_oam: [SpriteEntry::EMPTY; MAX_SPRITES_PER_LINE],
            sprite_count: 0,
            sprite_shifter_lo: [0; MAX_SPRITES_PER_LINE],
            sprite_shifter_hi: [0; MAX_SPRITES_PER_LINE],
            sprite_zero_selected: false,

            screen: FrameBuffer::new(),
            palette: Palette::default(),
        }
    }

    /// Return the PPU to its power-on state
    ///
    /// Mirroring and the mapper handle are cartridge properties and stay.
    pub fn reset(&mut self) {
        self.control = ControlFlags::empty();
        self.mask = MaskFlags::empty();
        self.status = StatusFlags::empty();
        self.oam_addr = 0;
        self.vram_addr = VramAddr::new();
        self.temp_addr = VramAddr::new();
        self.fine_x = 0;
        self.write_latch = false;
        self.read_buffer = 0;
        self.nametables = [0; NAMETABLE_SIZE * 2];
        self.palette_ram = [0; PALETTE_SIZE];
        self.oam = [0; OAM_SIZE];
        self.scanline = PRERENDER_SCANLINE;
        self.cycle = 0;
        self.odd_frame = false;
        self.frame = 0;
        self.frame_complete = false;
        self.nmi_pending = false;
        self.next_tile_id = 0;
        self.next_tile_attr = 0;
        self.next_tile_lo = 0;
        self.next_tile_hi = 0;
        self.bg_pattern_lo = 0;
        self.bg_pattern_hi = 0;
        self.bg_attrib_lo = 0;
        self.bg_attrib_hi = 0;
        self.secondary_oam = [SpriteEntry::EMPTY; MAX_SPRITES_PER_LINE];
        self.sprite_count = 0;
        self.sprite_shifter_lo = [0; MAX_SPRITES_PER_LINE];
        self.sprite_shifter_hi = [0; MAX_SPRITES_PER_LINE];
        self.sprite_zero_selected = false;
    }

    /// Attach the cartridge mapper and adopt its mirroring
    pub fn attach_mapper(&mut self, mapper: Rc<RefCell<Box<dyn Mapper>>>) {
        self.mirroring = mapper.borrow().mirroring();
        self.mapper = Some(mapper);
    }

    /// Override the nametable mirroring mode
    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        self.mirroring = mirroring;
    }

    /// Replace the output palette
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Direct OAM write (bypasses the $2003/$2004 ports)
    pub fn write_oam(&mut self, addr: u8, data: u8) {
        self.oam[addr as usize] = data;
    }

    /// Direct OAM read
    pub fn read_oam(&self, addr: u8) -> u8 {
        self.oam[addr as usize]
    }

    // ========================================
    // The dot clock
    // ========================================

    /// Advance one dot
    ///
    /// This is the whole state machine: background fetch cadence, scroll
    /// increments and transfers, sprite evaluation and fetch, pixel
    /// composition, vblank and NMI, and the frame wrap.
    pub fn tick(&mut self) {
        if self.scanline >= PRERENDER_SCANLINE && self.scanline <= LAST_VISIBLE_SCANLINE {
            // Odd frames drop dot 0 of scanline 0 while rendering
            if self.scanline == 0
                && self.cycle == 0
                && self.odd_frame
                && self.rendering_enabled()
            {
                self.cycle = 1;
            }

            if self.scanline == PRERENDER_SCANLINE && self.cycle == 1 {
                // New frame: vblank and both sprite flags drop, and the
                // sprite shifters start empty
                self.status.remove(
                    StatusFlags::VBLANK
                        | StatusFlags::SPRITE_ZERO_HIT
                        | StatusFlags::SPRITE_OVERFLOW,
                );
                self.sprite_shifter_lo = [0; MAX_SPRITES_PER_LINE];
                self.sprite_shifter_hi = [0; MAX_SPRITES_PER_LINE];
            }

            if (self.cycle >= 2 && self.cycle <= 257) || (self.cycle >= 321 && self.cycle <= 337) {
                self.update_shifters();

                // Five memory phases repeating every 8 dots
                match (self.cycle - 1) % 8 {
                    0 => {
                        self.load_background_shifters();
                        self.fetch_nametable_byte();
                    }
                    2 => self.fetch_attribute_byte(),
                    4 => self.fetch_pattern_low(),
                    6 => self.fetch_pattern_high(),
                    7 => {
                        if self.rendering_enabled() {
                            self.vram_addr.increment_coarse_x();
                        }
                    }
                    _ => {}
                }
            }

            if self.cycle == 256 && self.rendering_enabled() {
                self.vram_addr.increment_fine_y();
            }

            if self.cycle == 257 {
                self.load_background_shifters();
                if self.rendering_enabled() {
                    let t = self.temp_addr;
                    self.vram_addr.copy_horizontal_from(t);
                }
            }

            // Redundant nametable fetch closing out the line
            if self.cycle == 339 {
                self.fetch_nametable_byte();
            }

            if self.scanline == PRERENDER_SCANLINE
                && self.cycle >= 280
                && self.cycle <= 304
                && self.rendering_enabled()
            {
                let t = self.temp_addr;
                self.vram_addr.copy_vertical_from(t);
            }

            // Foreground: evaluate the next line's sprites after the
            // visible dots, fetch their patterns at the end of the line
            if self.scanline >= 0 {
                if self.cycle == 257 {
                    self.evaluate_sprites();
                }
                if self.cycle == 340 {
                    self.fetch_sprites();
                }
            }
        }

        if self.scanline == VBLANK_SCANLINE && self.cycle == 1 {
            self.status.insert(StatusFlags::VBLANK);
            if self.control.contains(ControlFlags::NMI_ENABLE) {
                self.nmi_pending = true;
            }
        }

        // One candidate pixel per visible dot
        if self.scanline >= 0
            && self.scanline <= LAST_VISIBLE_SCANLINE
            && self.cycle >= 1
            && self.cycle <= 256
        {
            self.compose_pixel();
        }

        self.cycle += 1;
        if self.cycle >= DOTS_PER_SCANLINE {
            self.cycle = 0;
            self.scanline += 1;
            if self.scanline > LAST_SCANLINE {
                self.scanline = PRERENDER_SCANLINE;
                self.frame += 1;
                self.odd_frame = !self.odd_frame;
                self.frame_complete = true;
            }
        }
    }

    /// Whether either layer is enabled in the mask register
    #[inline]
    pub(crate) fn rendering_enabled(&self) -> bool {
        self.mask
            .intersects(MaskFlags::SHOW_BACKGROUND | MaskFlags::SHOW_SPRITES)
    }

    // ========================================
    // Driver-facing state
    // ========================================

    /// True once the last dot of the frame has been emitted; the clock
    /// driver clears this after handing the frame to the display
    pub fn frame_complete(&self) -> bool {
        self.frame_complete
    }

    pub fn clear_frame_complete(&mut self) {
        self.frame_complete = false;
    }

    /// Edge-triggered NMI line toward the CPU; the clock driver clears the
    /// latch when it forwards the interrupt
    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    pub fn clear_nmi(&mut self) {
        self.nmi_pending = false;
    }

    /// Current scanline (-1 through 260)
    pub fn scanline(&self) -> i16 {
        self.scanline
    }

    /// Current dot within the scanline (0 through 340)
    pub fn cycle(&self) -> i16 {
        self.cycle
    }

    /// Frames completed since power-on
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Status flags without the read side effects of $2002
    pub fn status(&self) -> StatusFlags {
        self.status
    }

    /// The display sink the PPU draws into
    pub fn screen(&self) -> &FrameBuffer {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut FrameBuffer {
        &mut self.screen
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
