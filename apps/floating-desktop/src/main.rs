use anyhow::{Context, Result, anyhow};
use clap::Parser;
use floating_core::{CameraConfig, FlyCamera, Mat4, MathError};
use floating_input::{Action, InputState, MoveKey};
use floating_render_wgpu::TriangleRenderer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "floating-desktop", about = "First-person camera demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON camera config; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Application state outside the GPU.
struct AppState {
    camera: FlyCamera,
    input: InputState,
    last_frame: Instant,
    frames: u64,
}

impl AppState {
    fn new(config: CameraConfig) -> Self {
        Self {
            camera: FlyCamera::new(config),
            input: InputState::new(),
            last_frame: Instant::now(),
            frames: 0,
        }
    }

    /// Advances the camera by one frame and returns the column-major MVP.
    fn update(&mut self) -> Result<Mat4, MathError> {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        let frame = self.input.frame(dt);
        let output = self.camera.advance(&frame)?;

        self.frames += 1;
        if self.frames % 600 == 0 {
            tracing::debug!(
                frames = self.frames,
                pos = ?output.camera.pos,
                yaw = self.camera.yaw,
                pitch = self.camera.pitch,
                "camera"
            );
        }
        Ok(output.mvp)
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        let action = match key {
            KeyCode::KeyW => Action::Move {
                key: MoveKey::Forward,
                pressed,
            },
            KeyCode::KeyS => Action::Move {
                key: MoveKey::Back,
                pressed,
            },
            KeyCode::KeyA => Action::Move {
                key: MoveKey::Left,
                pressed,
            },
            KeyCode::KeyD => Action::Move {
                key: MoveKey::Right,
                pressed,
            },
            // First Escape releases the cursor, the second one quits.
            KeyCode::Escape if pressed && self.input.is_captured() => Action::CaptureCursor(false),
            KeyCode::Escape if pressed => Action::Quit,
            _ => Action::Noop,
        };
        self.input.apply(action);
    }
}

/// GPU objects that live as long as the window.
struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: TriangleRenderer,
}

impl Gpu {
    fn new(window: Arc<Window>) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("floating_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("surface reports no texture formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = TriangleRenderer::new(&device, surface_format);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    fn draw(&self, mvp: &Mat4) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.renderer.render(&self.device, &self.queue, &view, mvp);
        output.present();
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(config: CameraConfig) -> Self {
        Self {
            state: AppState::new(config),
            window: None,
            gpu: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("floating")
            .with_inner_size(PhysicalSize::new(640u32, 480));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let gpu = Gpu::new(window.clone())?;
        let size = window.inner_size();
        self.state.camera.set_aspect(size.width, size.height);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.set_capture(true);
        Ok(())
    }

    fn set_capture(&mut self, captured: bool) {
        self.state.input.apply(Action::CaptureCursor(captured));
        let Some(window) = &self.window else {
            return;
        };
        let grab = if captured {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = grab {
            tracing::warn!("cursor grab not available: {e}");
        }
        window.set_cursor_visible(!captured);
    }

    /// Stops the event loop; `main` returns the error afterwards.
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                }
                self.state
                    .camera
                    .set_aspect(new_size.width, new_size.height);
            }
            WindowEvent::Focused(false) => {
                self.set_capture(false);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                let was_captured = self.state.input.is_captured();
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
                if was_captured && !self.state.input.is_captured() {
                    self.set_capture(false);
                }
                if self.state.input.quit_requested() {
                    event_loop.exit();
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                if !self.state.input.is_captured() {
                    self.set_capture(true);
                }
            }
            WindowEvent::RedrawRequested => {
                let mvp = match self.state.update() {
                    Ok(mvp) => mvp,
                    Err(e) => {
                        self.fail(event_loop, anyhow::Error::new(e).context("camera update"));
                        return;
                    }
                };

                if let Some(gpu) = &self.gpu {
                    gpu.draw(&mvp);
                }
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
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.state.input.apply(Action::Look {
                dx: delta.0 as f32,
                dy: delta.1 as f32,
            });
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => CameraConfig::load(path)
            .with_context(|| format!("loading camera config {}", path.display()))?,
        None => CameraConfig::default(),
    };
    config.validate().context("camera config")?;

    tracing::info!("floating-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
