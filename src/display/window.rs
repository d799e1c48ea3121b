// Window module - winit/pixels shell around the emulator
//
// Drives the console one frame at a time from the redraw loop and copies
// each presented frame into the pixel surface. Frame pacing is a simple
// monotonic budget: a redraw earlier than the per-frame duration is a
// no-op, so emulation never outruns the configured rate.

use super::framebuffer::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::emulator::Emulator;
use pixels::{Pixels, SurfaceTexture};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Window configuration
#[derive(Debug, Clone, Copy)]
pub struct WindowConfig {
    /// Integer scale factor applied to the 256x240 image
    pub scale: u32,
    /// Target frame rate in Hz
    pub target_fps: u32,
    /// Whether the event loop waits between frames
    pub vsync: bool,
}

impl WindowConfig {
    pub fn new() -> Self {
        Self {
            scale: 3,
            target_fps: 60,
            vsync: true,
        }
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.clamp(1, 8);
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps.max(1);
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn window_width(&self) -> u32 {
        SCREEN_WIDTH as u32 * self.scale
    }

    pub fn window_height(&self) -> u32 {
        SCREEN_HEIGHT as u32 * self.scale
    }

    /// Time budget of one frame at the target rate
    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.target_fps as u64)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Display window hosting a running emulator
pub struct DisplayWindow {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    config: WindowConfig,
    emulator: Emulator,
    last_frame_time: Instant,
}

impl DisplayWindow {
    pub fn new(emulator: Emulator, config: WindowConfig) -> Self {
        Self {
            window: None,
            pixels: None,
            config,
            emulator,
            last_frame_time: Instant::now(),
        }
    }

    /// Run one console frame and push it to the surface
    fn render(&mut self) -> Result<(), pixels::Error> {
        self.emulator.step_frame();

        if let Some(pixels) = &mut self.pixels {
            pixels
                .frame_mut()
                .copy_from_slice(self.emulator.bus().ppu().screen().frame());
            pixels.render()?;
        }
        Ok(())
    }

    /// Whether the per-frame time budget has elapsed
    fn frame_due(&mut self) -> bool {
        if self.last_frame_time.elapsed() >= self.config.frame_duration() {
            self.last_frame_time = Instant::now();
            true
        } else {
            false
        }
    }
}

impl ApplicationHandler for DisplayWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("famicore")
            .with_inner_size(LogicalSize::new(
                self.config.window_width(),
                self.config.window_height(),
            ))
            .with_resizable(false);

        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .expect("Failed to create window"),
        );
        let size = window.inner_size();

        let surface = SurfaceTexture::new(size.width, size.height, window.clone());
        let pixels = Pixels::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, surface)
            .expect("Failed to create pixel surface");

        self.window = Some(window);
        self.pixels = Some(pixels);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if self.frame_due() {
                    if let Err(err) = self.render() {
                        log::error!("render error: {}", err);
                        event_loop.exit();
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Create a window and run the emulator inside it until closed
pub fn run_display(
    emulator: Emulator,
    config: WindowConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(if config.vsync {
        ControlFlow::Wait
    } else {
        ControlFlow::Poll
    });

    log::info!(
        "opening {}x{} window ({}x scale, {} fps)",
        config.window_width(),
        config.window_height(),
        config.scale,
        config.target_fps
    );

    let mut display = DisplayWindow::new(emulator, config);
    event_loop.run_app(&mut display)?;

    Ok(())
}
