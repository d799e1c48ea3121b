// Emulator module - the system clock driver
//
// Owns the CPU and the bus (which owns the PPU) and advances them in
// lockstep: the PPU runs on every system tick, the CPU on every third.
// Within one tick the PPU always advances first, so an NMI it raises is on
// the CPU's doorstep by the CPU's next cycle, as on hardware.

mod config;
mod screenshot;

pub use config::{EmulatorConfig, VideoConfig};
pub use screenshot::{save_screenshot, ScreenshotError};

use crate::bus::Bus;
use crate::cartridge::{Cartridge, INesError};
use crate::cpu::Cpu;
use std::path::{Path, PathBuf};

/// The whole console: CPU, bus, and the master clock
pub struct Emulator {
    cpu: Cpu,
    bus: Bus,
    clock_count: u64,
    config: EmulatorConfig,
    rom_path: Option<PathBuf>,
}

impl Emulator {
    /// Create a console with nothing in the cartridge slot
    pub fn new() -> Self {
        Emulator {
            cpu: Cpu::new(),
            bus: Bus::new(),
            clock_count: 0,
            config: EmulatorConfig::load_or_default(),
            rom_path: None,
        }
    }

    /// Load an iNES image from disk and reset the console
    pub fn load_rom<P: AsRef<Path>>(&mut self, path: P) -> Result<(), INesError> {
        let path = path.as_ref();
        let cartridge = Cartridge::from_ines_file(path)?;
        self.insert_cartridge(cartridge)?;
        self.rom_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Load an iNES image from memory and reset the console
    pub fn load_rom_bytes(&mut self, data: &[u8]) -> Result<(), INesError> {
        let cartridge = Cartridge::from_ines_bytes(data)?;
        self.insert_cartridge(cartridge)
    }

    fn insert_cartridge(&mut self, cartridge: Cartridge) -> Result<(), INesError> {
        let mapper = cartridge.into_mapper()?;
        self.bus.attach_cartridge(mapper);
        self.reset();
        Ok(())
    }

    /// Press the reset button
    ///
    /// CPU state and work RAM reinitialize and the clock returns to zero;
    /// PPU memory and the cartridge keep their contents, matching the
    /// console's user-visible reset behavior.
    pub fn reset(&mut self) {
        self.bus.clear_ram();
        self.cpu.reset(&mut self.bus);
        self.clock_count = 0;
    }

    /// Advance the system by one master tick
    ///
    /// Every tick moves the PPU one dot; every third tick also moves the
    /// CPU one cycle. A pending NMI is latched off the PPU and delivered
    /// before the CPU's next cycle runs.
    pub fn tick(&mut self) {
        self.bus.ppu_mut().tick();

        if self.bus.ppu().nmi_pending() {
            self.bus.ppu_mut().clear_nmi();
            self.cpu.nmi(&mut self.bus);
        }

        if self.clock_count % 3 == 0 {
            self.cpu.tick(&mut self.bus);
        }

        self.clock_count += 1;
    }

    /// Run until the PPU finishes the current frame, then present it
    pub fn step_frame(&mut self) {
        while !self.bus.ppu().frame_complete() {
            self.tick();
        }
        self.bus.ppu_mut().clear_frame_complete();
        self.bus.ppu_mut().screen_mut().present();
    }

    /// Force the program counter (the nestest diagnostic entry point)
    pub fn force_pc(&mut self, addr: u16) {
        self.cpu.pc = addr;
    }

    /// Save the last presented frame as a PNG screenshot
    pub fn screenshot(&self) -> Result<PathBuf, ScreenshotError> {
        save_screenshot(self.bus.ppu().screen().frame(), self.rom_path.as_deref())
    }

    /// Master ticks since the last reset
    pub fn clock_count(&self) -> u64 {
        self.clock_count
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn rom_path(&self) -> Option<&Path> {
        self.rom_path.as_deref()
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
