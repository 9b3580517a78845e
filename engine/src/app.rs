use std::time::{Duration, Instant};

use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{
    ElementState, Event, KeyboardInput, MouseButton, MouseScrollDelta, VirtualKeyCode,
    WindowEvent,
};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::graphics::Renderer2d;
use crate::surface::{Surface, SurfaceSize};

/// Pixels per wheel "line" when the platform reports line deltas.
pub const WHEEL_LINE_PX: f32 = 40.0;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("pixels surface error: {0}")]
    Pixels(#[from] pixels::Error),
}

pub struct AppConfig {
    pub title: String,
    pub desired_size: PhysicalSize<u32>,
    pub clamp_to_monitor: bool,
    pub vsync: Option<bool>,
}

/// Window-backed RGBA surface presented through `pixels`.
pub struct PixelsSurface {
    pixels: Pixels,
    size: SurfaceSize,
}

impl PixelsSurface {
    pub fn new(window: &Window, vsync: Option<bool>) -> Result<Self, pixels::Error> {
        let inner = window.inner_size();
        let size = SurfaceSize::new(inner.width.max(1), inner.height.max(1));
        let texture = SurfaceTexture::new(size.width, size.height, window);
        let mut builder = PixelsBuilder::new(size.width, size.height, texture);
        if let Some(vsync) = vsync {
            builder = builder.enable_vsync(vsync);
        }
        Ok(Self {
            pixels: builder.build()?,
            size,
        })
    }
}

impl Surface for PixelsSurface {
    type Error = pixels::Error;

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn frame_mut(&mut self) -> &mut [u8] {
        self.pixels.frame_mut()
    }

    fn resize(&mut self, size: SurfaceSize) -> Result<(), Self::Error> {
        if size.is_empty() {
            // Minimized windows report 0x0; keep the last buffer.
            return Ok(());
        }
        self.pixels.resize_surface(size.width, size.height)?;
        self.pixels.resize_buffer(size.width, size.height)?;
        self.size = size;
        Ok(())
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.pixels.render()
    }
}

pub struct AppContext {
    pub window: Window,
    pub surface: PixelsSurface,
}

/// Raw window input, in arrival order. Coordinates are physical pixels relative to the
/// window's client area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    CursorMoved { x: f32, y: f32 },
    CursorLeft,
    /// Left button, at the cursor position when it happened.
    ButtonPressed { x: f32, y: f32 },
    ButtonReleased { x: f32, y: f32 },
    /// Browser convention: positive `delta_y` scrolls down / away from the content.
    Wheel { x: f32, y: f32, delta_y: f32 },
    Resized(SurfaceSize),
    KeyPressed(VirtualKeyCode),
}

#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    pub events: Vec<InputEvent>,
    pub cursor: Option<(f32, f32)>,
}

impl InputFrame {
    fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::CursorMoved { x, y } => self.cursor = Some((x, y)),
            InputEvent::CursorLeft => self.cursor = None,
            _ => {}
        }
        self.events.push(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppControl {
    Continue,
    Exit,
}

pub trait App {
    fn init(&mut self, _ctx: &mut AppContext) {}

    fn update(&mut self, input: &InputFrame, dt: Duration, ctx: &mut AppContext) -> AppControl;

    fn render(&mut self, gfx: &mut dyn Renderer2d);
}

pub fn wheel_delta_y(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * WHEEL_LINE_PX,
        MouseScrollDelta::PixelDelta(p) => -(p.y as f32),
    }
}

pub fn run_app<A: App + 'static>(config: AppConfig, mut app: A) -> Result<(), AppError> {
    let event_loop = EventLoop::new();
    let monitor_size = if config.clamp_to_monitor {
        event_loop.primary_monitor().map(|m| m.size())
    } else {
        None
    };
    let initial_size = match monitor_size {
        Some(monitor) => PhysicalSize::new(
            config.desired_size.width.min(monitor.width),
            config.desired_size.height.min(monitor.height),
        ),
        None => config.desired_size,
    };
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(initial_size)
        .build(&event_loop)?;
    let surface = PixelsSurface::new(&window, config.vsync)?;

    let mut ctx = AppContext { window, surface };
    app.init(&mut ctx);
    tracing::info!(size = ?ctx.surface.size(), "window ready");

    let mut input = InputFrame::default();
    let mut last_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    let size = SurfaceSize::new(size.width, size.height);
                    if let Err(err) = ctx.surface.resize(size) {
                        tracing::warn!(%err, "resize failed");
                    }
                    input.push(InputEvent::Resized(size));
                    ctx.window.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input.push(InputEvent::CursorMoved {
                        x: position.x as f32,
                        y: position.y as f32,
                    });
                    ctx.window.request_redraw();
                }
                WindowEvent::CursorLeft { .. } => {
                    input.push(InputEvent::CursorLeft);
                    ctx.window.request_redraw();
                }
                WindowEvent::MouseInput {
                    state, button: MouseButton::Left, ..
                } => {
                    // Presses without a known cursor position are dropped.
                    if let Some((x, y)) = input.cursor {
                        input.push(match state {
                            ElementState::Pressed => InputEvent::ButtonPressed { x, y },
                            ElementState::Released => InputEvent::ButtonReleased { x, y },
                        });
                        ctx.window.request_redraw();
                    }
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    if let Some((x, y)) = input.cursor {
                        input.push(InputEvent::Wheel {
                            x,
                            y,
                            delta_y: wheel_delta_y(delta),
                        });
                        ctx.window.request_redraw();
                    }
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => {
                    input.push(InputEvent::KeyPressed(key));
                    ctx.window.request_redraw();
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                let frame_input = std::mem::take(&mut input);
                input.cursor = frame_input.cursor;
                if app.update(&frame_input, dt, &mut ctx) == AppControl::Exit {
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                ctx.surface.draw_with(|gfx| app.render(gfx));
                if let Err(err) = ctx.surface.present() {
                    tracing::error!(%err, "present failed");
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    });
}
