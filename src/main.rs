//! Night Street
//!
//! Opens a window on the procedural night street scene.

use glam::Vec3;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use nightstreet::config::AppConfig;
use nightstreet::input::{DoubleClickDetector, InputAction, InputMapper};
use nightstreet::scene::{DebugPanel, NightStreet};
use nightstreet::systems::{AnimationSystem, RenderError, RenderSystem, WindowSystem};
use nightstreet_core::AssetTextureLoader;
use nightstreet_input::OrbitController;
use nightstreet_render::PerspectiveCamera;

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    scene: NightStreet,
    panel: DebugPanel,
    camera: PerspectiveCamera,
    controller: OrbitController,
    animation: AnimationSystem,
    double_click: DoubleClickDetector,
    shift_held: bool,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let loader = AssetTextureLoader::new(&config.assets.textures);
        let scene = NightStreet::build(&loader, config.scene.clone());

        let mut panel = DebugPanel::for_scene(config.debug.legacy_light_handlers);
        panel.set_visible(config.debug.show_panel);

        let cam = &config.camera;
        let aspect = config.window.width as f32 / config.window.height.max(1) as f32;
        let camera = PerspectiveCamera::new(cam.fov, aspect, cam.near, cam.far)
            .looking_at(Vec3::from(cam.position), Vec3::from(cam.target));

        let controller = OrbitController::new()
            .with_rotate_speed(config.input.rotate_speed)
            .with_zoom_speed(config.input.zoom_speed)
            .with_pan_speed(config.input.pan_speed)
            .with_damping(config.input.damping, config.input.damping_factor);

        let double_click = DoubleClickDetector::new(std::time::Duration::from_millis(config.input.double_click_ms));

        Self {
            config,
            window: None,
            render: None,
            scene,
            panel,
            camera,
            controller,
            animation: AnimationSystem::new(),
            double_click,
            shift_held: false,
        }
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            InputAction::TogglePanel => {
                if self.panel.toggle_visible() {
                    log::info!("Scene panel:\n{}", self.panel.summary(&self.scene.params));
                }
            }
            InputAction::ResetCamera => {
                self.controller.stop();
                self.camera.reset();
                log::info!("Camera reset to starting position");
            }
            InputAction::PanelPrev => self.panel.select_prev(),
            InputAction::PanelNext => self.panel.select_next(),
            InputAction::PanelAdjust { direction, coarse } => {
                self.panel.nudge(&mut self.scene, direction as f32, coarse);
            }
        }
        self.refresh_title();
    }

    fn refresh_title(&self) {
        if let Some(window) = &self.window {
            let selection = if self.panel.is_visible() {
                self.panel.selection_label(&self.scene.params)
            } else {
                None
            };
            window.update_title(selection.as_deref());
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(render) = &mut self.render {
            render.resize(width, height);
        }
        self.camera.set_viewport(width, height);
        self.controller.set_viewport_height(height);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let render = match RenderSystem::new(window.window().clone(), self.config.rendering.vsync) {
            Ok(render) => render,
            Err(e) => {
                log::error!("Failed to initialize rendering: {}", e);
                event_loop.exit();
                return;
            }
        };

        let (width, height) = render.size();
        self.window = Some(window);
        self.render = Some(render);
        self.resize(width, height);
        self.refresh_title();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                self.resize(physical_size.width, physical_size.height);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if InputMapper::is_shift(key) {
                        self.shift_held = event.state == ElementState::Pressed;
                    }
                    if let Some(action) =
                        InputMapper::map_keyboard(key, event.state, self.panel.is_visible(), self.shift_held)
                    {
                        self.handle_action(action, event_loop);
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(action) = self.double_click.map_mouse_button(button, state, std::time::Instant::now()) {
                    self.handle_action(action, event_loop);
                }
                self.controller.process_mouse_button(button, state);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.controller.process_scroll(lines);
            }

            WindowEvent::RedrawRequested => {
                self.animation.update(&mut self.scene);
                self.controller.update(&mut self.camera);

                let Some(render) = &mut self.render else {
                    return;
                };
                match render.render_frame(&mut self.scene.graph, &self.camera) {
                    Ok(_) => {}
                    Err(RenderError::SurfaceLost) => render.recover_surface(),
                    Err(RenderError::OutOfMemory) => {
                        log::error!("GPU out of memory");
                        event_loop.exit();
                        return;
                    }
                    Err(e) => log::warn!("{}", e),
                }

                // Request next frame
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.controller.process_mouse_motion(delta.0, delta.1);
        }
    }
}

fn main() {
    let config = AppConfig::load();

    let log_level = config
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
    log::info!("Starting Night Street");

    let config = config.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
