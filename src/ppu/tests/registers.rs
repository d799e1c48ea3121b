//! Register interface tests: the $2000-$2007 ports and the internal
//! scroll state they drive

use super::*;

// ========================================
// Scroll and address latching
// ========================================

#[test]
fn test_scroll_writes_fill_t_and_fine_x() {
    let mut ppu = Ppu::new();

    // First write: X ($7D = coarse 15, fine 5)
    ppu.write_register(SCROLL, 0x7D);
    assert_eq!(ppu.temp_addr.coarse_x(), 0x0F);
    assert_eq!(ppu.fine_x, 0x05);
    assert!(ppu.write_latch);

    // Second write: Y ($5E = coarse 11, fine 6)
    ppu.write_register(SCROLL, 0x5E);
    assert_eq!(ppu.temp_addr.coarse_y(), 0x0B);
    assert_eq!(ppu.temp_addr.fine_y(), 0x06);
    assert!(!ppu.write_latch);
}

#[test]
fn test_scroll_then_addr_sequence() {
    // The $2005/$2006 sequence from the wiki's scrolling example:
    // $2005=$7D, $2005=$5E, $2006=$3D, $2006=$F0
    let mut ppu = Ppu::new();

    ppu.write_register(SCROLL, 0x7D);
    ppu.write_register(SCROLL, 0x5E);
    assert_eq!(ppu.temp_addr.raw(), 0x616F);

    ppu.write_register(ADDR, 0x3D);
    assert_eq!(ppu.temp_addr.raw(), 0x3D6F);

    ppu.write_register(ADDR, 0xF0);
    assert_eq!(ppu.temp_addr.raw(), 0x3DF0);
    assert_eq!(
        ppu.vram_addr, ppu.temp_addr,
        "second $2006 write copies t into v"
    );
}

#[test]
fn test_addr_first_write_clears_bit_14() {
    let mut ppu = Ppu::new();
    ppu.temp_addr.set_raw(0x7FFF);

    ppu.write_register(ADDR, 0xFF); // only the low 6 bits land
    assert_eq!(ppu.temp_addr.raw() & 0x7F00, 0x3F00);
}

#[test]
fn test_status_read_resets_latch_and_vblank() {
    let mut ppu = Ppu::new();
    ppu.status.insert(StatusFlags::VBLANK);
    ppu.write_register(SCROLL, 0x10); // latch now waiting for second write

    let value = ppu.read_register(STATUS);
    assert_ne!(value & 0x80, 0, "first read reports vblank");
    assert!(!ppu.write_latch, "status read resets the shared latch");

    let value = ppu.read_register(STATUS);
    assert_eq!(value & 0x80, 0, "vblank cleared by the first read");
}

#[test]
fn test_ctrl_write_sets_t_nametable() {
    let mut ppu = Ppu::new();
    ppu.write_register(CTRL, 0x03);
    assert_eq!(ppu.temp_addr.nametable(), 0x03);

    ppu.write_register(CTRL, 0x01);
    assert_eq!(ppu.temp_addr.nametable(), 0x01);
}

#[test]
fn test_write_only_registers_read_zero() {
    let mut ppu = Ppu::new();
    ppu.write_register(CTRL, 0xFF);
    ppu.write_register(MASK, 0xFF);
    assert_eq!(ppu.read_register(CTRL), 0);
    assert_eq!(ppu.read_register(MASK), 0);
    assert_eq!(ppu.read_register(OAMADDR), 0);
    assert_eq!(ppu.read_register(SCROLL), 0);
    assert_eq!(ppu.read_register(ADDR), 0);
}

// ========================================
// OAM ports
// ========================================

#[test]
fn test_oam_write_increments_address() {
    let mut ppu = Ppu::new();
    ppu.write_register(OAMADDR, 0x10);
    ppu.write_register(OAMDATA, 0xAA);
    ppu.write_register(OAMDATA, 0xBB);

    assert_eq!(ppu.oam[0x10], 0xAA);
    assert_eq!(ppu.oam[0x11], 0xBB);
    assert_eq!(ppu.oam_addr, 0x12);
}

#[test]
fn test_oam_read_round_trip() {
    let mut ppu = Ppu::new();
    ppu.write_register(OAMADDR, 0x42);
    ppu.write_register(OAMDATA, 0x99);

    // Reads do not advance the address
    ppu.write_register(OAMADDR, 0x42);
    assert_eq!(ppu.read_register(OAMDATA), 0x99);
    assert_eq!(ppu.read_register(OAMDATA), 0x99);
}

#[test]
fn test_oam_address_wraps() {
    let mut ppu = Ppu::new();
    ppu.write_register(OAMADDR, 0xFF);
    ppu.write_register(OAMDATA, 0x01);
    assert_eq!(ppu.oam_addr, 0x00);
}

// ========================================
// The $2007 data port
// ========================================

#[test]
fn test_data_read_is_buffered() {
    let mut ppu = ppu_with_chr_ram(Mirroring::Horizontal);

    set_vram_addr(&mut ppu, 0x2100);
    ppu.write_register(DATA, 0x55);

    set_vram_addr(&mut ppu, 0x2100);
    let stale = ppu.read_register(DATA);
    let fresh = ppu.read_register(DATA);
    assert_ne!(stale, 0x55, "first read returns the old buffer");
    assert_eq!(fresh, 0x55, "second read returns the byte behind it");
}

#[test]
fn test_data_round_trip_through_nametable() {
    let mut ppu = ppu_with_chr_ram(Mirroring::Horizontal);

    set_vram_addr(&mut ppu, 0x2400);
    ppu.write_register(DATA, 0xC3);

    set_vram_addr(&mut ppu, 0x2400);
    ppu.read_register(DATA); // discard per the buffered-read rule
    assert_eq!(ppu.read_register(DATA), 0xC3);
}

#[test]
fn test_palette_read_bypasses_buffer() {
    let mut ppu = ppu_with_chr_ram(Mirroring::Horizontal);

    // Park a marker in the nametable "underneath" the palette address
    set_vram_addr(&mut ppu, 0x2F00);
    ppu.write_register(DATA, 0x6E);

    set_vram_addr(&mut ppu, 0x3F00);
    ppu.write_register(DATA, 0x2A);

    set_vram_addr(&mut ppu, 0x3F00);
    assert_eq!(
        ppu.read_register(DATA),
        0x2A,
        "palette read returns the fresh byte"
    );
    assert_eq!(
        ppu.read_buffer, 0x6E,
        "buffer refills from the nametable mirror underneath"
    );
}

#[test]
fn test_data_increment_stride() {
    let mut ppu = ppu_with_chr_ram(Mirroring::Horizontal);

    set_vram_addr(&mut ppu, 0x2000);
    ppu.write_register(DATA, 0x01);
    assert_eq!(ppu.vram_addr.raw(), 0x2001);

    ppu.write_register(CTRL, 0x04); // +32 stride
    set_vram_addr(&mut ppu, 0x2000);
    ppu.write_register(DATA, 0x02);
    assert_eq!(ppu.vram_addr.raw(), 0x2020);
}

#[test]
fn test_data_address_wraps_at_14_bits() {
    let mut ppu = ppu_with_chr_ram(Mirroring::Horizontal);
    set_vram_addr(&mut ppu, 0x3FFF);
    ppu.read_register(DATA);
    assert_eq!(ppu.vram_addr.raw(), 0x0000);
}

// ========================================
// VramAddr unit behavior
// ========================================

#[test]
fn test_coarse_x_increment_wraps_nametable() {
    let mut addr = VramAddr::new();
    addr.set_coarse_x(31);
    addr.increment_coarse_x();
    assert_eq!(addr.coarse_x(), 0);
    assert_eq!(addr.nametable(), 0x01, "horizontal nametable toggled");

    addr.increment_coarse_x();
    assert_eq!(addr.coarse_x(), 1);
    assert_eq!(addr.nametable(), 0x01);
}

#[test]
fn test_fine_y_increment_carries_into_coarse_y() {
    let mut addr = VramAddr::new();
    addr.set_fine_y(7);
    addr.set_coarse_y(10);
    addr.increment_fine_y();
    assert_eq!(addr.fine_y(), 0);
    assert_eq!(addr.coarse_y(), 11);
}

#[test]
fn test_coarse_y_wraps_at_29_toggling_nametable() {
    let mut addr = VramAddr::new();
    addr.set_fine_y(7);
    addr.set_coarse_y(29);
    addr.increment_fine_y();
    assert_eq!(addr.coarse_y(), 0);
    assert_eq!(addr.nametable(), 0x02, "vertical nametable toggled");
}

#[test]
fn test_coarse_y_31_wraps_without_toggle() {
    let mut addr = VramAddr::new();
    addr.set_fine_y(7);
    addr.set_coarse_y(31);
    addr.increment_fine_y();
    assert_eq!(addr.coarse_y(), 0);
    assert_eq!(addr.nametable(), 0x00);
}

#[test]
fn test_tile_and_attribute_addresses() {
    let mut addr = VramAddr::new();
    addr.set_coarse_x(5);
    addr.set_coarse_y(6);
    addr.set_nametable(1);
    addr.set_fine_y(3);

    // Tile address ignores fine Y
    assert_eq!(addr.tile_address(), 0x2000 | (addr.raw() & 0x0FFF));
    assert_eq!(
        addr.attribute_address(),
        0x23C0 | 0x0400 | ((6 >> 2) << 3) | (5 >> 2)
    );
}

#[test]
fn test_horizontal_and_vertical_transfer_masks() {
    let mut v = VramAddr::new();
    let mut t = VramAddr::new();
    t.set_coarse_x(12);
    t.set_coarse_y(20);
    t.set_nametable(3);
    t.set_fine_y(5);

    v.copy_horizontal_from(t);
    assert_eq!(v.coarse_x(), 12);
    assert_eq!(v.nametable(), 0x01, "only the horizontal bit copies");
    assert_eq!(v.coarse_y(), 0);

    v.copy_vertical_from(t);
    assert_eq!(v.coarse_y(), 20);
    assert_eq!(v.fine_y(), 5);
    assert_eq!(v.nametable(), 0x03);
}
