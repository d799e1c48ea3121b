// Shared helpers for integration tests
#![allow(dead_code)]

/// Wrap a 16KB PRG image in an iNES container with CHR-RAM
pub fn ines_image(prg: Vec<u8>) -> Vec<u8> {
    assert_eq!(prg.len(), 16 * 1024);

    let mut image = vec![0u8; 16];
    image[0..4].copy_from_slice(b"NES\x1A");
    image[4] = 1; // one 16KB PRG bank
    image[5] = 0; // CHR-RAM
    image.extend(prg);
    image
}

/// A program that parks in a tight loop, with an NMI handler that counts
/// into $0010
///
/// ```text
/// $8000: JMP $8000        ; 4C 00 80
/// $8005: INC $10          ; E6 10
/// $8007: RTI              ; 40
/// ```
pub fn idle_rom_with_nmi_counter() -> Vec<u8> {
    let mut prg = vec![0xEA; 16 * 1024];

    prg[0x0000] = 0x4C; // JMP $8000
    prg[0x0001] = 0x00;
    prg[0x0002] = 0x80;

    prg[0x0005] = 0xE6; // INC $10
    prg[0x0006] = 0x10;
    prg[0x0007] = 0x40; // RTI

    // Vectors (visible at $FFFA-$FFFF through NROM-128 folding)
    prg[0x3FFA] = 0x05; // NMI -> $8005
    prg[0x3FFB] = 0x80;
    prg[0x3FFC] = 0x00; // RESET -> $8000
    prg[0x3FFD] = 0x80;

    ines_image(prg)
}
