//! Meadow - interactive grass field viewer

use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::KeyCode,
    window::{Window, WindowId},
};

use meadow::core::{
    camera::Camera,
    camera_controller::LookCameraController,
    input::{InputAction, InputState},
    logging,
    time::{FrameTimer, SimulationTime},
    Error, Result,
};
use meadow::interaction::InteractionController;
use meadow::render::{GpuContext, Renderer};
use meadow::scene::{Scene, SceneConfig};

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<Renderer>,
    scene: Scene,
    camera: Camera,
    controller: LookCameraController,
    interaction: InteractionController,
    input: InputState,
    timer: FrameTimer,
    time: SimulationTime,
}

impl App {
    fn new(scene: Scene) -> Self {
        let camera = Camera::default();
        let controller = LookCameraController::from_camera(&camera);
        let interaction = InteractionController::new(scene.config().interaction.clone());
        Self {
            window: None,
            gpu: None,
            renderer: None,
            scene,
            camera,
            controller,
            interaction,
            input: InputState::new(),
            timer: FrameTimer::new(),
            time: SimulationTime::new(),
        }
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Look { dx, dy } => self.controller.look(&mut self.camera, dx, dy),
            InputAction::Pick { x, y } => self.pick(x, y),
            InputAction::ResizeCollision { delta } => {
                let (_, fields) = self.scene.split_mut();
                self.interaction.resize(delta, fields);
            }
            InputAction::Zoom { delta } => self.controller.zoom(&mut self.camera, delta),
            InputAction::Key(KeyCode::Escape) => event_loop.exit(),
            InputAction::Key(key) => {
                self.controller.handle_key(&mut self.camera, key);
            }
        }
    }

    fn pick(&mut self, x: f32, y: f32) {
        let Some(gpu) = &self.gpu else { return };
        let (width, height) = gpu.size();
        let (terrain, fields) = self.scene.split_mut();
        self.interaction.pointer_pick(
            &self.camera,
            (x, y),
            (width as f32, height as f32),
            terrain,
            fields,
        );
    }

    fn render(&mut self) {
        let Some(gpu) = &mut self.gpu else { return };
        let Some(renderer) = &mut self.renderer else { return };

        if let Err(e) = renderer.render(gpu, &mut self.scene, &self.camera, &self.time) {
            // Lost or outdated surfaces recover after a reconfigure
            log::warn!("Frame skipped: {}", e);
            let (width, height) = gpu.size();
            gpu.resize(width, height);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let config = self.scene.config();
        let window = match create_window(event_loop, config.window_width, config.window_height) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let gpu = match pollster::block_on(GpuContext::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("Failed to create GPU context: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.camera.set_aspect(size.width as f32, size.height as f32);
        log::info!("Window created: {}x{}", size.width, size.height);

        let renderer = match Renderer::new(&gpu, &self.scene, &self.camera) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Failed to create renderer: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.gpu = Some(gpu);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(action) = self.input.process_event(&event) {
            self.handle_action(action, event_loop);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(gpu) = &mut self.gpu {
                        gpu.resize(size.width, size.height);
                        self.camera.set_aspect(size.width as f32, size.height as f32);
                        if let Some(renderer) = &mut self.renderer {
                            renderer.resize(&gpu.device, size.width, size.height);
                        }
                    }
                }
            }
            WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Right, .. } => {
                let (x, y) = self.input.mouse_position();
                self.pick(x, y);
            }
            WindowEvent::RedrawRequested => {
                let fps_updated = self.timer.tick();
                self.time.advance(self.timer.delta_secs());

                self.render();

                if fps_updated {
                    if let Some(renderer) = &mut self.renderer {
                        log::info!(
                            "{:.1} FPS | frame {} | {}/{} blades drawn | collision r={:.2}",
                            self.timer.fps(),
                            self.timer.frame_count(),
                            renderer.survivors().unwrap_or(0),
                            renderer.simulated_blades(),
                            self.interaction.radius()
                        );
                        renderer.request_survivor_count();
                    }
                    if let Some(window) = &self.window {
                        window.set_title(&format!("Meadow - {:.1} FPS", self.timer.fps()));
                    }
                }

                if let Some(w) = &self.window {
                    w.request_redraw();
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

fn main() {
    logging::init();
    log::info!("Meadow starting...");

    let args: Vec<String> = std::env::args().collect();
    let config = match parse_config_arg(&args) {
        Some(path) => {
            log::info!("Loading scene config from: {}", path.display());
            match SceneConfig::load(&path) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("Invalid scene config {}: {}", path.display(), e);
                    std::process::exit(1);
                }
            }
        }
        None => SceneConfig::default(),
    };

    let scene = Scene::build(config);

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    let mut app = App::new(scene);

    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        std::process::exit(1);
    }
}

fn create_window(event_loop: &ActiveEventLoop, width: u32, height: u32) -> Result<Arc<Window>> {
    let window_attrs = Window::default_attributes()
        .with_title("Meadow")
        .with_inner_size(PhysicalSize::new(width, height));
    event_loop
        .create_window(window_attrs)
        .map(Arc::new)
        .map_err(|e| Error::Window(e.to_string()))
}

/// Parse --config argument from command line
fn parse_config_arg(args: &[String]) -> Option<PathBuf> {
    args.iter()
        .position(|a| a == "--config" || a == "-c")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}
