//! Game entry point: a window driving the scene, editor and camera rig

use engine::ui::ITEM_HEIGHT;
use game::{AppConfig, GameApp, HostServices};
use glam::Vec2;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, trace};
use winit::{
    event::{DeviceEvent, ElementState, Event, MouseScrollDelta, WindowEvent},
    event_loop::EventLoop,
    keyboard::PhysicalKey,
    window::{Window, WindowAttributes},
};

const CONFIG_FILE: &str = "game.json";

/// Host services backed by the winit window
struct WindowHost {
    window: Arc<Window>,
    exit_requested: bool,
}

impl HostServices for WindowHost {
    fn take_screenshot(&mut self, path: &Path) -> std::io::Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            format!("no renderer attached, cannot capture {}", path.display()),
        ))
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.window.set_cursor_visible(visible);
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    engine::init_logging();
    info!("Starting game");

    let config = AppConfig::load_or_default(CONFIG_FILE);
    let mut app = GameApp::new(config)?;

    let event_loop = EventLoop::builder().build()?;
    let viewport = app.config().viewport;
    let window_attributes = WindowAttributes::default()
        .with_title("Scene Editor")
        .with_inner_size(winit::dpi::LogicalSize::new(viewport.x as f64, viewport.y as f64));

    #[allow(deprecated)] // Using create_window on EventLoop for simplicity
    let window = Arc::new(event_loop.create_window(window_attributes)?);
    window.set_cursor_visible(app.editor().is_visible());
    let size = window.inner_size();
    app.resize(Vec2::new(size.width as f32, size.height as f32));

    let mut host = WindowHost {
        window: window.clone(),
        exit_requested: false,
    };
    let mut last_time = std::time::Instant::now();

    #[allow(deprecated)] // Using the simpler closure-based API for now
    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("Window close requested");
                    elwt.exit();
                }
                WindowEvent::Resized(size) => {
                    app.resize(Vec2::new(size.width as f32, size.height as f32));
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    // Held keys only repeat into line edits
                    if event.repeat && !app.editor().has_text_focus() {
                        return;
                    }
                    if let PhysicalKey::Code(code) = event.physical_key {
                        app.handle_key(code, event.state, &mut host);
                    }
                    if event.state == ElementState::Pressed {
                        if let Some(text) = &event.text {
                            app.handle_text(text);
                        }
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    app.handle_cursor_moved(Vec2::new(position.x as f32, position.y as f32));
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    app.handle_mouse_button(button, state);
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let amount = match delta {
                        MouseScrollDelta::LineDelta(_, y) => -y * ITEM_HEIGHT,
                        MouseScrollDelta::PixelDelta(position) => -position.y as f32,
                    };
                    app.handle_scroll(amount);
                }
                WindowEvent::RedrawRequested => {
                    let current_time = std::time::Instant::now();
                    let delta_time = (current_time - last_time).as_secs_f32();
                    last_time = current_time;

                    app.frame(delta_time);
                    trace!(lines = app.debug_lines().len(), "Frame done");
                }
                _ => {}
            },
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => {
                app.handle_mouse_delta(Vec2::new(delta.0 as f32, delta.1 as f32));
            }
            Event::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        }

        if host.exit_requested {
            info!("Exit requested");
            elwt.exit();
        }
    })?;

    Ok(())
}
