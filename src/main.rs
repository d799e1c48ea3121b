// famicore - entry point
//
// Usage: famicore <rom.nes>
//
// Loads the ROM, applies the optional palette file from famicore.toml, and
// runs the console in a window.

use famicore::display::{run_display, Palette, WindowConfig};
use famicore::emulator::Emulator;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let rom_path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: famicore <rom.nes>");
            return ExitCode::FAILURE;
        }
    };

    match run(&rom_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(rom_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut emulator = Emulator::new();
    emulator.load_rom(rom_path)?;
    log::info!("running {}", rom_path);

    // Palette file is fatal at boot when configured but unreadable
    if let Some(pal_path) = emulator.config().palette_file.clone() {
        let palette = Palette::from_pal_file(&pal_path)?;
        emulator.bus_mut().ppu_mut().set_palette(palette);
        log::info!("palette loaded from {}", pal_path.display());
    }

    let video = emulator.config().video.clone();
    let config = WindowConfig::new()
        .with_scale(video.scale)
        .with_fps(video.fps)
        .with_vsync(video.vsync);

    run_display(emulator, config)
}
