// Display module - frame buffer, master palette, and the window shell

mod framebuffer;
mod palette;
mod window;

pub use framebuffer::{FrameBuffer, FRAME_BYTES, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use palette::{Palette, PaletteError, PALETTE_ENTRIES, PAL_FILE_LEN};
pub use window::{run_display, DisplayWindow, WindowConfig};
