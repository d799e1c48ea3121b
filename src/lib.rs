// famicore - a cycle-accurate NES PPU core with the bus, CPU, and display
// plumbing needed to run it as a whole console

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod display;
pub mod emulator;
pub mod ppu;
pub mod ram;

pub use bus::Bus;
pub use cartridge::{Cartridge, INesError, INesHeader, Mapper, Mirroring};
pub use cpu::Cpu;
pub use display::{FrameBuffer, Palette, PaletteError, WindowConfig};
pub use emulator::{Emulator, EmulatorConfig};
pub use ppu::{ControlFlags, MaskFlags, Ppu, StatusFlags, VramAddr};
pub use ram::Ram;
