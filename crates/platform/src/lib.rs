//! Platform layer: windowing & event loop.
//!
//! - Window and GPU state are created on `resumed`.
//! - winit events are translated into `corelib::InputEvent` and dispatched
//!   synchronously into the `Scene`; nothing here mutates view state directly.
//! - One `Scene::update` + redraw per frame.

use std::sync::Arc;

use anyhow::Result;
use asset::MeshData;
use corelib::{InputEvent, Key, MouseButton, Scene, ViewerConfig};
use renderer::GpuState;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
    window::{Window, WindowId},
};

/// Everything the viewer needs to start. `config` must already have passed
/// `ViewerConfig::validate`.
pub struct ViewerOptions {
    pub title: String,
    pub config: ViewerConfig,
    pub mesh: MeshData,
    pub backends: wgpu::Backends,
}

/// Open a window showing `options.mesh` and run until closed.
pub fn run_viewer(options: ViewerOptions) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(options);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct ViewerApp {
    title: String,
    backends: wgpu::Backends,
    mesh: MeshData,
    scene: Scene,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    modifiers: ModifiersState,
    cursor: (f32, f32),
    fatal: Option<anyhow::Error>,
}

impl ViewerApp {
    fn new(options: ViewerOptions) -> Self {
        Self {
            title: options.title,
            backends: options.backends,
            mesh: options.mesh,
            scene: Scene::new(options.config),
            window: None,
            gpu: None,
            modifiers: ModifiersState::empty(),
            cursor: (0.0, 0.0),
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: InputEvent) {
        let response = self.scene.handle(event);
        if response.quit {
            log::info!("Quit requested. Exiting event loop.");
            event_loop.exit();
        } else if response.redraw {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.scene.update();
        let frame = self.scene.frame_matrices();
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        match gpu.render(&frame) {
            Ok(()) => {}
            Err(err) if GpuState::is_surface_lost(&err) => {
                log::warn!("Surface lost ({err:?}); reconfiguring");
                gpu.recreate_surface();
            }
            Err(wgpu::SurfaceError::Timeout) => log::warn!("Surface timeout; skipping frame"),
            Err(err) => {
                self.fail(event_loop, anyhow::anyhow!("Surface error: {err:?}"));
            }
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let config = self.scene.config();
        let attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, anyhow::anyhow!("Failed to create window: {err}")),
        };

        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        match pollster::block_on(GpuState::new(window.clone(), &self.mesh, self.backends)) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(err) => return self.fail(event_loop, err),
        }
        self.scene.handle(InputEvent::Resized {
            width: size.width,
            height: size.height,
        });
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                log::debug!("Resized: {}x{}", new_size.width, new_size.height);
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size.width, new_size.height);
                }
                self.dispatch(
                    event_loop,
                    InputEvent::Resized {
                        width: new_size.width,
                        height: new_size.height,
                    },
                );
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                let (x, y) = self.cursor;
                self.dispatch(event_loop, InputEvent::CursorMoved { x, y });
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_button(button);
                let (x, y) = self.cursor;
                let event = match state {
                    ElementState::Pressed => InputEvent::MousePressed { button, x, y },
                    ElementState::Released => InputEvent::MouseReleased { button, x, y },
                };
                self.dispatch(event_loop, event);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                self.dispatch(event_loop, InputEvent::Scroll { delta_y });
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let key = map_key(code);
                let shift = self.modifiers.shift_key();
                self.dispatch(event_loop, InputEvent::KeyPressed { key, shift });
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Continuous redraw keeps the animation running.
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn map_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Primary,
        winit::event::MouseButton::Right => MouseButton::Secondary,
        _ => MouseButton::Other,
    }
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::KeyR => Key::R,
        KeyCode::Digit1 | KeyCode::Numpad1 => Key::Digit1,
        KeyCode::Digit2 | KeyCode::Numpad2 => Key::Digit2,
        _ => Key::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_map_to_roles() {
        assert_eq!(map_button(winit::event::MouseButton::Left), MouseButton::Primary);
        assert_eq!(map_button(winit::event::MouseButton::Right), MouseButton::Secondary);
        assert_eq!(map_button(winit::event::MouseButton::Middle), MouseButton::Other);
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(map_key(KeyCode::KeyP), Key::P);
        assert_eq!(map_key(KeyCode::Numpad2), Key::Digit2);
        assert_eq!(map_key(KeyCode::KeyS), Key::Other);
    }
}
