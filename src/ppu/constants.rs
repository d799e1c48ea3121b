// PPU constants

/// PPU address space mask (14-bit bus)
pub(super) const PPU_ADDR_MASK: u16 = 0x3FFF;

/// Size of one nametable in bytes (1KB)
pub(super) const NAMETABLE_SIZE: usize = 1024;

/// Size of palette RAM in bytes
pub(super) const PALETTE_SIZE: usize = 32;

/// Size of primary OAM in bytes (64 sprites x 4 bytes)
pub(super) const OAM_SIZE: usize = 256;

/// Maximum sprites evaluated onto one scanline
pub(super) const MAX_SPRITES_PER_LINE: usize = 8;

// ========================================
// Frame timing (NTSC)
// ========================================

/// Dots per scanline (0-340)
pub(super) const DOTS_PER_SCANLINE: i16 = 341;

/// Pre-render scanline; sets up state for line 0, emits no pixels
pub(super) const PRERENDER_SCANLINE: i16 = -1;

/// Last visible scanline
pub(super) const LAST_VISIBLE_SCANLINE: i16 = 239;

/// Scanline on which the vblank flag is raised (at dot 1)
pub(super) const VBLANK_SCANLINE: i16 = 241;

/// Last scanline of the frame; after its dot 340 the frame wraps
pub(super) const LAST_SCANLINE: i16 = 260;

/// Total dots in one full frame (341 x 262)
#[allow(dead_code)]
pub(super) const DOTS_PER_FRAME: u32 = 341 * 262;
