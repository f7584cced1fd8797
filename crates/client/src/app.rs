//! Application state and event loop handler.

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{CursorGrabMode, Window, WindowId},
};

use deskscene_core::{AppConfig, CommandOutcome, FlyCamera, Lens, SceneDescription, ViewControls};

use crate::input;
use crate::renderer::{FrameParams, Renderer};

/// Longest frame step applied to the camera and lights, in seconds.
const MAX_FRAME_TIME: f32 = 0.25;

/// Main application state.
pub struct App {
    config: AppConfig,
    scene: SceneDescription,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    camera: FlyCamera,
    controls: ViewControls,
    lens: Lens,
    last_frame_time: Option<Instant>,
    /// Mouse look comes from raw device motion while the cursor is locked.
    relative_mouse: bool,
    fatal: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: AppConfig, scene: SceneDescription) -> Self {
        let mut camera = FlyCamera::new(config.camera_position);
        camera.set_base_speed(config.movement_speed);
        camera.set_mouse_sensitivity(config.mouse_sensitivity);

        Self {
            controls: ViewControls::new(config.projection),
            lens: config.lens(),
            camera,
            scene,
            config,
            window: None,
            renderer: None,
            last_frame_time: None,
            relative_mouse: false,
            fatal: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.fatal.take()
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        self.relative_mouse = grab_cursor(&window);

        let renderer = pollster::block_on(Renderer::new(
            window.clone(),
            &self.scene,
            &self.config.texture_dir,
        ))?;

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.last_frame_time = Some(Instant::now());

        tracing::info!("Window and renderer initialized");
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.fatal = Some(error);
        event_loop.exit();
    }

    /// Advance the camera and lights and render a single frame.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let delta_time = self
            .last_frame_time
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0)
            .min(MAX_FRAME_TIME);
        self.last_frame_time = Some(now);

        self.controls.apply_frame(&mut self.camera, delta_time);
        self.scene.lights.update(delta_time);

        let Some(renderer) = &mut self.renderer else {
            return;
        };
        let frame = FrameParams {
            camera: &self.camera,
            projection: self.controls.projection(),
            lens: &self.lens,
            lights: &self.scene.lights,
            phong: &self.config.phong,
        };

        match renderer.render(&frame) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = renderer.size();
                renderer.resize(size);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("Surface timeout, skipping frame");
            }
            Err(e) => {
                self.fail(event_loop, anyhow::anyhow!("Render error: {e:?}"));
                return;
            }
        }

        // Request another frame
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Hide and capture the cursor. Returns true when it is locked in place, in
/// which case motion arrives as relative device events.
fn grab_cursor(window: &Window) -> bool {
    window.set_cursor_visible(false);
    if window.set_cursor_grab(CursorGrabMode::Locked).is_ok() {
        return true;
    }
    if let Err(e) = window.set_cursor_grab(CursorGrabMode::Confined) {
        tracing::warn!("Cursor grab unavailable: {e}");
    }
    false
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting");
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            WindowEvent::KeyboardInput { event, .. } => {
                tracing::trace!("Key event: {:?}", event);
                let outcome = input::process_key(
                    &mut self.controls,
                    &mut self.scene.lights,
                    event.physical_key,
                    event.state,
                    event.repeat,
                );
                if outcome == CommandOutcome::Exit {
                    tracing::info!("Escape pressed, exiting");
                    event_loop.exit();
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.controls.set_shift(modifiers.state().shift_key());
            }

            WindowEvent::CursorMoved { position, .. } if !self.relative_mouse => {
                self.controls
                    .cursor_moved(&mut self.camera, position.x as f32, position.y as f32);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.controls.scroll(&mut self.camera, input::scroll_lines(delta));
            }

            WindowEvent::MouseInput { state, button, .. } => {
                input::process_button(&mut self.controls, &mut self.camera, button, state);
            }

            WindowEvent::Focused(false) => {
                self.controls.release_all();
            }

            WindowEvent::Focused(true) => {
                if let Some(window) = &self.window {
                    self.relative_mouse = grab_cursor(window);
                }
            }

            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.relative_mouse {
                self.controls.mouse_motion(&mut self.camera, dx as f32, dy as f32);
            }
        }
    }
}
