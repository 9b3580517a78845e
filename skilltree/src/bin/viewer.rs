use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use engine::app::{App, AppConfig, AppContext, AppControl, InputEvent, InputFrame, run_app};
use engine::graphics::Renderer2d;
use skilltree::logging::init_logging;
use skilltree::raster::draw_scene;
use skilltree::settings::{SettingsStore, ViewerSettings};
use skilltree::source::{JsonFileSource, SkillTreeSource};
use skilltree::{
    PointerEvent, ScreenRect, SkillTreeSnapshot, SkillTreeView, SurfaceOutcome, ViewOptions,
    ViewportEvent,
};
use winit::dpi::PhysicalSize;
use winit::event::VirtualKeyCode;

#[derive(Debug, Parser)]
#[command(name = "skilltree-viewer")]
#[command(about = "Interactive pan/zoom viewer for a skill tree snapshot")]
struct Cli {
    /// Snapshot JSON; the bundled sample if omitted.
    input: Option<PathBuf>,
    /// Settings file; defaults to `SKILLTREE_SETTINGS_PATH` or the XDG config dir.
    #[arg(long)]
    settings: Option<PathBuf>,
}

struct ViewerApp {
    view: SkillTreeView,
    shown_at: Instant,
}

impl ViewerApp {
    fn new(view: SkillTreeView) -> Self {
        Self {
            view,
            shown_at: Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.shown_at.elapsed()
    }

    fn pointer(&mut self, event: PointerEvent) {
        if let SurfaceOutcome::NodeActivated(id) = self.view.handle(event) {
            let name = self.view.node(&id).map(|n| n.display_name().to_string());
            tracing::info!(%id, name = name.as_deref().unwrap_or(""), "node selected");
        }
    }
}

impl App for ViewerApp {
    fn init(&mut self, ctx: &mut AppContext) {
        let size = ctx.window.inner_size();
        self.view
            .measure(ScreenRect::from_size(size.width as f32, size.height as f32));
        self.shown_at = Instant::now();
    }

    fn update(&mut self, input: &InputFrame, _dt: Duration, ctx: &mut AppContext) -> AppControl {
        self.view.tick(self.elapsed());
        for event in &input.events {
            match *event {
                InputEvent::CursorMoved { x, y } => self.pointer(PointerEvent::Move { x, y }),
                InputEvent::CursorLeft => self.pointer(PointerEvent::Leave),
                InputEvent::ButtonPressed { x, y } => self.pointer(PointerEvent::Down { x, y }),
                InputEvent::ButtonReleased { x, y } => self.pointer(PointerEvent::Up { x, y }),
                InputEvent::Wheel { x, y, delta_y } => {
                    self.pointer(PointerEvent::Wheel { x, y, delta_y })
                }
                InputEvent::Resized(size) => {
                    if !size.is_empty() {
                        self.view.measure(ScreenRect::from_size(
                            size.width as f32,
                            size.height as f32,
                        ));
                    }
                }
                InputEvent::KeyPressed(key) => match key {
                    VirtualKeyCode::Escape => return AppControl::Exit,
                    VirtualKeyCode::R | VirtualKeyCode::Key0 => {
                        self.view.apply(ViewportEvent::Reset);
                    }
                    VirtualKeyCode::Equals | VirtualKeyCode::Plus | VirtualKeyCode::NumpadAdd => {
                        self.view.apply(ViewportEvent::ZoomIn);
                    }
                    VirtualKeyCode::Minus | VirtualKeyCode::NumpadSubtract => {
                        self.view.apply(ViewportEvent::ZoomOut);
                    }
                    VirtualKeyCode::Z => {
                        self.view.undo();
                    }
                    VirtualKeyCode::Y => {
                        self.view.redo();
                    }
                    _ => {}
                },
            }
        }

        let max_tier = self
            .view
            .snapshot()
            .nodes
            .iter()
            .map(|n| n.tier)
            .max()
            .unwrap_or(0);
        if !self.view.reveal().is_settled(max_tier, self.elapsed()) {
            ctx.window.request_redraw();
        }
        AppControl::Continue
    }

    fn render(&mut self, gfx: &mut dyn Renderer2d) {
        let scene = self.view.scene(self.elapsed());
        draw_scene(&scene, gfx);
    }
}

fn load_snapshot(input: Option<&PathBuf>) -> Result<SkillTreeSnapshot> {
    match input {
        Some(path) => JsonFileSource::new(path)
            .fetch()
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(SkillTreeSnapshot::sample()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let store = match &cli.settings {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::from_env(),
    };
    let settings: ViewerSettings = store.load();
    init_logging(&settings.logging.filter);
    tracing::debug!(path = %store.path().display(), ?settings, "settings loaded");

    let snapshot = load_snapshot(cli.input.as_ref())?;
    let options = ViewOptions {
        reduce_motion: settings.accessibility.reduce_motion,
        high_contrast: settings.accessibility.high_contrast,
    };
    let view = SkillTreeView::with_snapshot(options, snapshot);

    let config = AppConfig {
        title: "Skill Tree".to_string(),
        desired_size: PhysicalSize::new(settings.window.width, settings.window.height),
        clamp_to_monitor: true,
        vsync: Some(settings.window.vsync),
    };
    run_app(config, ViewerApp::new(view)).context("viewer window failed")?;
    Ok(())
}
