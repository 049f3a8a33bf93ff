//! Window, event loop and frame loop
//!
//! [`GladeApp::run`] opens the window, brings up the GPU and then, on every
//! redraw: drains queued input into the [`SceneState`], runs the fixed
//! simulation steps due since the last frame, composes the frame, submits it
//! to the [`RenderEngine`] and draws the lighting panel on top.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::AppConfig;
use crate::error::GladeError;
use crate::gfx::{
    camera::camera_utils::{key_event, pointer_button_event, wheel_event},
    rendering::{submit, MeshAssets, RenderEngine},
    resources::texture_resource::{load_rgba_image, SkyImage},
    scene::{FrameClock, SceneComposer, SceneState},
};
use crate::input::{InputEvent, InputQueue};
use crate::ui::{lighting_panel, LightingControls, UiManager};

/// Events delivered to the loop from other threads
pub enum AppEvent {
    SkyTextureLoaded(SkyImage),
}

/// Shared flag that ends the event loop once raised
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub struct GladeApp {
    config: AppConfig,
    stop: StopSignal,
}

impl GladeApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            stop: StopSignal::new(),
        }
    }

    /// A handle that stops [`Self::run`] from any thread.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Runs until the window is closed, Escape is pressed or the stop
    /// signal is raised. Startup failures end the loop and are returned.
    pub fn run(self) -> Result<(), GladeError> {
        let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = AppState::new(self.config, self.stop, event_loop.create_proxy());
        event_loop.run_app(&mut state)?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct GpuContext {
    window: Arc<Window>,
    engine: RenderEngine,
    meshes: MeshAssets,
    ui: UiManager,
}

struct AppState {
    config: AppConfig,
    stop: StopSignal,
    proxy: EventLoopProxy<AppEvent>,
    scene: SceneState,
    composer: SceneComposer,
    input: InputQueue,
    clock: FrameClock,
    cursor: (f32, f32),
    last_frame: Instant,
    gpu: Option<GpuContext>,
    fatal: Option<GladeError>,
}

impl AppState {
    fn new(config: AppConfig, stop: StopSignal, proxy: EventLoopProxy<AppEvent>) -> Self {
        Self {
            scene: SceneState::new(&config),
            composer: SceneComposer::default(),
            input: InputQueue::new(),
            clock: FrameClock::from_config(&config.animation),
            cursor: (0.0, 0.0),
            last_frame: Instant::now(),
            gpu: None,
            fatal: None,
            config,
            stop,
            proxy,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<(), GladeError> {
        let window_config = &self.config.window;
        let attributes = WindowAttributes::default()
            .with_title(window_config.title.clone())
            .with_inner_size(LogicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let PhysicalSize { width, height } = window.inner_size();
        let mut engine = pollster::block_on(RenderEngine::new(window.clone(), width, height))?;
        let meshes = MeshAssets::upload(&mut engine);
        let ui = UiManager::new(
            engine.device(),
            engine.queue(),
            engine.surface_format(),
            &window,
        );

        self.input.push(InputEvent::Resize { width, height });
        self.gpu = Some(GpuContext {
            window,
            engine,
            meshes,
            ui,
        });
        info!("scene ready at {}x{}", width, height);
        Ok(())
    }

    fn spawn_sky_loader(&self, path: PathBuf) {
        let proxy = self.proxy.clone();
        let spawned = std::thread::Builder::new()
            .name("sky-texture-loader".to_string())
            .spawn(move || match load_rgba_image(&path) {
                Ok(image) => {
                    if proxy.send_event(AppEvent::SkyTextureLoaded(image)).is_err() {
                        debug!("event loop closed before the sky texture arrived");
                    }
                }
                Err(err) => warn!("{}; the sky stays untextured", err),
            });

        if let Err(err) = spawned {
            warn!("could not start the sky texture loader: {}", err);
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: GladeError) {
        error!("{}", err);
        self.fatal = Some(err);
        self.stop.raise();
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let frame_time = now - self.last_frame;
        self.last_frame = now;

        self.scene.drain_input(&mut self.input);
        let steps = self.clock.advance(frame_time);
        self.scene.step(steps);
        let frame = self.composer.compose(&self.scene);

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let GpuContext {
            window,
            engine,
            meshes,
            ui,
        } = gpu;

        submit(&frame, meshes, engine);

        let window: &Window = window;
        let controls = LightingControls::from_state(&self.scene);
        let input = &mut self.input;
        let result = engine.render_frame(Some(
            |device: &wgpu::Device,
             queue: &wgpu::Queue,
             encoder: &mut wgpu::CommandEncoder,
             view: &wgpu::TextureView| {
                ui.draw(device, queue, encoder, window, view, |frame_ui| {
                    lighting_panel(frame_ui, &controls, input);
                });
            },
        ));

        if let Err(err) = result {
            self.fail(event_loop, err);
        }
    }
}

impl ApplicationHandler<AppEvent> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() || self.fatal.is_some() {
            return;
        }

        if let Err(err) = self.init_gpu(event_loop) {
            self.fail(event_loop, err);
            return;
        }

        match self.config.sky_texture.clone() {
            Some(path) => self.spawn_sky_loader(path),
            None => info!("no sky texture configured"),
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::SkyTextureLoaded(image) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    if gpu.engine.set_sky_texture(&image) {
                        self.scene.sky_textured = true;
                    }
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        if gpu.ui.handle_window_event(&gpu.window, window_id, &event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.stop.raise(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape && state == ElementState::Pressed {
                    self.stop.raise();
                } else if let Some(input) = key_event(code, state) {
                    self.input.push(input);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                self.input.push(InputEvent::PointerMove {
                    x: self.cursor.0,
                    y: self.cursor.1,
                });
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(input) = pointer_button_event(button, state, self.cursor) {
                    self.input.push(input);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => self.input.push(wheel_event(delta)),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                gpu.engine.resize(width, height);
                gpu.ui.resize(width, height);
                self.input.push(InputEvent::Resize { width, height });
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }

        if self.stop.is_raised() {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.stop.is_raised() {
            event_loop.exit();
            return;
        }
        if let Some(gpu) = self.gpu.as_ref() {
            gpu.window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_signal_is_shared_between_clones() {
        let signal = StopSignal::new();
        let remote = signal.clone();
        assert!(!signal.is_raised());

        std::thread::spawn(move || remote.raise()).join().unwrap();
        assert!(signal.is_raised());
    }
}
