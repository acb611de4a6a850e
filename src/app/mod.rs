// src/app/mod.rs
//
// Application loop + per-frame orchestration.
//
// Per frame: camera -> CPU path tracer -> upload -> blit -> present. Every
// parameter or scene change goes through the renderer so history is dropped.

pub mod camera;
pub mod input;
pub mod profiler;

use std::sync::Arc;
use std::time::Instant;

use winit::{
    dpi::PhysicalSize,
    event::*,
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::Window,
};

use crate::app::camera::Camera;
use crate::app::input::{Action, InputState};
use crate::app::profiler::FrameProf;
use crate::config::{self, RenderParams};
use crate::error::{RenderError, Result};
use crate::render::present::{choose_present_mode, choose_surface_format};
use crate::render::{FrameInput, Presenter, Renderer};
use crate::world::{hash::hash_u32, Scene};

pub async fn run(event_loop: EventLoop<()>, window: Arc<Window>) -> Result<()> {
    let mut app = App::new(window).await?;
    let mut fatal: Option<RenderError> = None;

    event_loop.run(|event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        let step = match &event {
            Event::AboutToWait => {
                app.window.request_redraw();
                Ok(())
            }
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => app.render_frame(),
            _ => app.handle_event(event, elwt),
        };

        if let Err(e) = step {
            fatal = Some(e);
            elwt.exit();
        }
    })?;

    match fatal {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Internal render size for a window size.
pub fn internal_size(width: u32, height: u32) -> (u32, u32) {
    let scale = |v: u32| ((v as f32 * config::RENDER_SCALE).round() as u32).max(1);
    (scale(width), scale(height))
}

pub struct App {
    window: Arc<Window>,

    // Keep handles alive for the app lifetime.
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    _adapter: wgpu::Adapter,
    surface_config: wgpu::SurfaceConfiguration,

    presenter: Presenter,
    renderer: Renderer,
    world_seed: u32,

    input: InputState,
    camera: Camera,

    frame_index: u32,

    profiler: FrameProf,
    last_frame_time: Instant,
}

impl App {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let initial_size = window.inner_size();

        // --- GPU/Surface bootstrap -----------------------------------------------------------
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = choose_surface_format(&surface_caps).ok_or(RenderError::NoSurfaceFormat)?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: initial_size.width.max(1),
            height: initial_size.height.max(1),
            present_mode: choose_present_mode(&surface_caps),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let (iw, ih) = internal_size(surface_config.width, surface_config.height);
        let presenter = Presenter::new(&adapter, surface_format, iw, ih).await?;
        surface.configure(presenter.device(), &surface_config);

        log::info!(
            "adapter: {:?}, surface {:?} {}x{}, internal {}x{}",
            adapter.get_info().name,
            surface_format,
            surface_config.width,
            surface_config.height,
            iw,
            ih
        );

        // --- World / renderer / camera -------------------------------------------------------
        let world_seed = config::WORLD_SEED;
        let scene = Scene::generated(world_seed, config::GRID_SIZE, config::VOXEL_SIZE);
        let renderer = Renderer::new(scene, RenderParams::default(), iw, ih)?;

        Ok(Self {
            window,
            _instance: instance,
            surface,
            _adapter: adapter,
            surface_config,
            presenter,
            renderer,
            world_seed,
            input: InputState::default(),
            camera: Camera::new(),
            frame_index: 0,
            profiler: FrameProf::new(),
            last_frame_time: Instant::now(),
        })
    }

    pub fn handle_event(&mut self, event: Event<()>, elwt: &EventLoopWindowTarget<()>) -> Result<()> {
        match event {
            Event::DeviceEvent { event, .. } => {
                self.input.on_device_event(&event);
            }
            Event::WindowEvent { event, .. } => {
                let _ = self.input.on_window_event(&event, &self.window);

                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(new_size) => self.handle_resize(new_size)?,
                    _ => {}
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) -> Result<()> {
        // WGPU requires non-zero surface size.
        self.surface_config.width = new_size.width.max(1);
        self.surface_config.height = new_size.height.max(1);
        self.surface.configure(self.presenter.device(), &self.surface_config);

        let (iw, ih) = internal_size(self.surface_config.width, self.surface_config.height);
        self.renderer.resize(iw, ih)?;
        self.presenter.resize_frame(self.renderer.width(), self.renderer.height());
        Ok(())
    }

    fn apply_actions(&mut self) -> Result<()> {
        let actions = self.input.take_actions();
        if actions.is_empty() {
            return Ok(());
        }

        let mut params = self.renderer.params();
        let mut regenerate = false;
        for action in actions {
            match action {
                Action::ToggleFilter => params.enable_filter = !params.enable_filter,
                Action::DepthDown => params = params.with_depth_step(-1),
                Action::DepthUp => params = params.with_depth_step(1),
                Action::SamplesDown => params = params.with_samples_step(-1),
                Action::SamplesUp => params = params.with_samples_step(1),
                Action::CycleDebugView => params.debug_view = params.debug_view.next(),
                Action::RegenerateWorld => regenerate = true,
            }
        }

        if params != self.renderer.params() {
            self.renderer.rebuild(params)?;
        }

        if regenerate {
            self.world_seed = hash_u32(self.world_seed);
            let t0 = Instant::now();
            let scene = Scene::generated(self.world_seed, config::GRID_SIZE, config::VOXEL_SIZE);
            log::info!(
                "world regenerated (seed {}) in {:.1}ms",
                self.world_seed,
                FrameProf::mark_ms(t0)
            );
            self.renderer.set_scene(scene);
        }
        Ok(())
    }

    fn render_frame(&mut self) -> Result<()> {
        let frame_start = Instant::now();

        let now = Instant::now();
        // Clamp prevents giant dt spikes from causing unstable camera integration.
        let dt = (now - self.last_frame_time).as_secs_f32().clamp(0.0, 0.05);
        self.last_frame_time = now;

        let t0 = Instant::now();
        self.camera.integrate_input(&mut self.input, dt);
        self.frame_index = self.frame_index.wrapping_add(1);
        self.profiler.cam(FrameProf::mark_ms(t0));

        self.apply_actions()?;

        // CPU path tracing at internal resolution
        let aspect = self.renderer.width() as f32 / self.renderer.height() as f32;
        let stats = self.renderer.render_frame(&FrameInput {
            camera: self.camera.snapshot(aspect),
            seed: hash_u32(self.frame_index),
        });
        self.profiler.add_render(&stats);

        let t0 = Instant::now();
        self.presenter.upload(self.renderer.display());
        self.profiler.upload(FrameProf::mark_ms(t0));

        // Acquire swapchain as late as possible
        let t0 = Instant::now();
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            // Recoverable: reconfigure and try next frame.
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("surface {e}, reconfiguring");
                self.surface.configure(self.presenter.device(), &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => return Ok(()),
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::SurfaceOutOfMemory),
        };
        self.profiler.acquire(FrameProf::mark_ms(t0));

        let frame_view = frame.texture.create_view(&Default::default());

        let t0 = Instant::now();
        let mut encoder = self
            .presenter
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        self.presenter.encode_blit(&mut encoder, &frame_view);
        self.profiler.enc_blit(FrameProf::mark_ms(t0));

        let t0 = Instant::now();
        self.presenter.queue().submit(Some(encoder.finish()));
        self.profiler.submit(FrameProf::mark_ms(t0));

        let t0 = Instant::now();
        frame.present();
        self.profiler.present(FrameProf::mark_ms(t0));

        self.profiler.end_frame(FrameProf::mark_ms(frame_start));
        Ok(())
    }
}
