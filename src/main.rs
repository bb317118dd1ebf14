//! Entry point for the tessellated patch viewer.

use anyhow::Result;
use std::sync::Arc;
use tessellation_viewer::app::App;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

#[derive(Default)]
struct Viewer {
    window: Option<Arc<Window>>,
    app: Option<App>,
    init_error: Option<anyhow::Error>,
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);

        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            WindowAttributes::default()
                .with_title("Tessellated Patch Viewer")
                .with_inner_size(LogicalSize::new(1280, 720)),
        ) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.init_error = Some(err.into());
                event_loop.exit();
                return;
            }
        };

        // Initialise the application (async -> sync).
        match pollster::block_on(App::new(window.clone())) {
            Ok(app) => {
                window.request_redraw();
                self.window = Some(window);
                self.app = Some(app);
            }
            Err(err) => {
                self.init_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(app)) = (self.window.as_ref(), self.app.as_mut()) else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        // Forward events to the app; handle unconsumed window events.
        if app.handle_event(window, &event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => match app.render(window) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    app.resize(app.renderer.gfx.size);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("WGPU out of memory - exiting.");
                    event_loop.exit();
                }
                // No drawable this refresh; the frame is dropped, not retried.
                Err(e) => log::debug!("Frame skipped: {:?}", e),
            },
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Request a redraw each frame.
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging; default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new()?;
    let mut viewer = Viewer::default();
    event_loop.run_app(&mut viewer)?;

    // Surface initialization failures as a descriptive startup error.
    if let Some(err) = viewer.init_error {
        return Err(err);
    }

    Ok(())
}
