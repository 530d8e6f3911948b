use std::sync::Arc;

use log::{debug, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::ViewerConfig,
    controls::{command_for_key, Command},
    error::{ViewerError, ViewerResult},
    gfx::{
        rendering::RenderEngine,
        resources::TextureResource,
        scene::Scene,
    },
    simulation::FrameClock,
    state::{StateResponse, ViewerState},
};

/// The viewer application: owns the event loop until [`SkywardApp::run`]
pub struct SkywardApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Option<Scene>,
    state: ViewerState,
    clock: FrameClock,
    fatal: Option<ViewerError>,
}

impl SkywardApp {
    pub fn new(config: ViewerConfig) -> ViewerResult<Self> {
        let event_loop = EventLoop::new()?;
        let state = ViewerState::new(&config);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                scene: None,
                state,
                clock: FrameClock::new(),
                fatal: None,
            },
        })
    }

    /// Runs until the window closes
    ///
    /// Startup failures inside the event loop (no adapter, missing assets)
    /// end the loop and are returned here.
    pub fn run(mut self) -> ViewerResult<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Blocks on events while the clock is paused so a minimized window idles
fn control_flow_for(clock: &FrameClock) -> ControlFlow {
    if clock.is_paused() {
        ControlFlow::Wait
    } else {
        ControlFlow::Poll
    }
}

/// Cursor parking spot used by mouse-look
fn window_center(size: PhysicalSize<u32>) -> (f64, f64) {
    (size.width as f64 / 2.0, size.height as f64 / 2.0)
}

impl AppState {
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> ViewerResult<()> {
        let window_config = &self.config.window;
        let window = Arc::new(
            event_loop.create_window(
                WindowAttributes::default()
                    .with_title(window_config.title.clone())
                    .with_inner_size(LogicalSize::new(window_config.width, window_config.height)),
            )?,
        );

        let (width, height) = window.inner_size().into();
        let window_clone = window.clone();
        let mut renderer = pollster::block_on(RenderEngine::new(
            window_clone,
            width,
            height,
            window_config,
            &self.config.lighting,
        ))?;

        let scene = Scene::load(renderer.device(), &self.config)?;
        let terrain_texture = TextureResource::from_image_file(
            renderer.device(),
            renderer.queue(),
            self.config.assets.terrain_texture_path(),
        )?;
        renderer.set_scene_texture(&terrain_texture);

        self.state.camera.resize(width, height);
        info!("Viewer ready at {}x{}", width, height);

        self.window = Some(window);
        self.scene = Some(scene);
        self.render_engine = Some(renderer);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, command: Command) {
        match self.state.apply(command) {
            StateResponse::None => {}
            StateResponse::Quit => event_loop.exit(),
            StateResponse::RecenterCursor(x, y) => self.warp_cursor(x, y),
            StateResponse::MouseLook(enabled) => {
                let Some(window) = self.window.as_ref() else {
                    return;
                };
                window.set_cursor_visible(!enabled);
                if enabled {
                    let (x, y) = window_center(window.inner_size());
                    self.warp_cursor(x, y);
                }
            }
        }
    }

    fn warp_cursor(&self, x: f64, y: f64) {
        if let Some(window) = self.window.as_ref() {
            if let Err(err) = window.set_cursor_position(PhysicalPosition::new(x, y)) {
                debug!("Cursor warp unsupported: {}", err);
            }
        }
    }

    fn center(&self) -> (f64, f64) {
        self.window
            .as_ref()
            .map(|window| window_center(window.inner_size()))
            .unwrap_or_default()
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.clock.tick();
        if self.clock.is_paused() {
            return;
        }
        self.state.update(dt);

        let (Some(render_engine), Some(scene)) = (self.render_engine.as_mut(), self.scene.as_ref())
        else {
            return;
        };

        let draws = scene.frame_draws(&self.state.camera, &self.state.rocket_pose());
        if let Err(err) = render_engine.render_frame(scene, &draws, self.state.camera.front_face())
        {
            self.fail(event_loop, err);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init_graphics(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.render_engine.is_none() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if width == 0 || height == 0 {
                    if !self.clock.is_paused() {
                        info!("Window minimized, pausing");
                    }
                    self.clock.pause();
                    return;
                }
                if self.clock.is_paused() {
                    info!("Window restored, resuming");
                    self.clock.resume();
                    event_loop.set_control_flow(control_flow_for(&self.clock));
                }

                self.state.camera.resize(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::Focused(false) => self.state.release_all(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(command) = command_for_key(key_code, state.is_pressed()) {
                    self.dispatch(event_loop, command);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Right,
                ..
            } => {
                let center = self.center();
                self.dispatch(event_loop, Command::ToggleMouseLook { center });
            }
            WindowEvent::CursorMoved { position, .. } => {
                let center = self.center();
                self.dispatch(
                    event_loop,
                    Command::CursorMoved {
                        position: (position.x, position.y),
                        center,
                    },
                );
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let control_flow = control_flow_for(&self.clock);
        event_loop.set_control_flow(control_flow);
        if control_flow == ControlFlow::Wait {
            return;
        }

        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.fatal.is_some() {
            warn!("Event loop exiting after a fatal error");
        } else {
            info!("Viewer closed");
        }
    }
}
