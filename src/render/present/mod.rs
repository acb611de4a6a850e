// src/render/present/mod.rs
// -------------------------
//
// Uploads the CPU-rendered RGBA8 frame and blits it onto the swapchain.

mod bindgroups;
mod layout;
mod pipelines;
pub mod textures;

use bindgroups::{create_bind_groups, BindGroups};
use layout::{create_layouts, Layouts};
use pipelines::{create_pipelines, Pipelines};
use textures::{create_frame_texture, pad_rows, FrameTex};

use crate::error::Result;
use crate::render::shaders;

pub struct Presenter {
    device: wgpu::Device,
    queue: wgpu::Queue,

    sampler: wgpu::Sampler,

    layouts: Layouts,
    pipelines: Pipelines,
    frame: FrameTex,
    bind_groups: BindGroups,

    upload_scratch: Vec<u8>,
}

impl Presenter {
    pub async fn new(
        adapter: &wgpu::Adapter,
        surface_format: wgpu::TextureFormat,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Self> {
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                },
                None,
            )
            .await?;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit"),
            source: wgpu::ShaderSource::Wgsl(shaders::blit_wgsl().into()),
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_clamp_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let layouts = create_layouts(&device);
        let pipelines = create_pipelines(&device, &layouts, &module, surface_format);
        let frame = create_frame_texture(&device, frame_width, frame_height);
        let bind_groups = create_bind_groups(&device, &layouts, &frame, &sampler);

        Ok(Self {
            device,
            queue,
            sampler,
            layouts,
            pipelines,
            frame,
            bind_groups,
            upload_scratch: Vec::new(),
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reallocates the frame texture when the render resolution changes.
    pub fn resize_frame(&mut self, width: u32, height: u32) {
        if width.max(1) == self.frame.width && height.max(1) == self.frame.height {
            return;
        }
        self.frame = create_frame_texture(&self.device, width, height);
        self.bind_groups = create_bind_groups(&self.device, &self.layouts, &self.frame, &self.sampler);
    }

    /// Writes a tightly packed RGBA8 image of the current frame size.
    pub fn upload(&mut self, rgba: &[u8]) {
        let (w, h) = (self.frame.width, self.frame.height);
        let padded = pad_rows(rgba, w, h, &mut self.upload_scratch);

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.frame.tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &self.upload_scratch,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded as u32),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );
    }

    pub fn encode_blit(&self, encoder: &mut wgpu::CommandEncoder, frame_view: &wgpu::TextureView) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("blit_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: frame_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        rpass.set_pipeline(&self.pipelines.blit);
        rpass.set_bind_group(0, &self.bind_groups.blit, &[]);
        rpass.draw(0..3, 0..1);
    }
}

/// The CPU image is already gamma encoded; an sRGB target would encode it twice.
pub fn choose_surface_format(caps: &wgpu::SurfaceCapabilities) -> Option<wgpu::TextureFormat> {
    caps.formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| caps.formats.first().copied())
}

pub fn choose_present_mode(caps: &wgpu::SurfaceCapabilities) -> wgpu::PresentMode {
    // Mailbox: low latency without tearing. Fifo: always supported.
    [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Fifo, wgpu::PresentMode::Immediate]
        .into_iter()
        .find(|m| caps.present_modes.contains(m))
        .unwrap_or(wgpu::PresentMode::Fifo)
}
