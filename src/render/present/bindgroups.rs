// src/render/present/bindgroups.rs
//
// Bind group creation. Rebuilt whenever the frame texture is reallocated.

use super::{layout::Layouts, textures::FrameTex};

pub struct BindGroups {
    pub blit: wgpu::BindGroup,
}

fn make_blit_bg(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    frame_view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("blit_bg"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(frame_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

pub fn create_bind_groups(
    device: &wgpu::Device,
    layouts: &Layouts,
    frame: &FrameTex,
    sampler: &wgpu::Sampler,
) -> BindGroups {
    let blit = make_blit_bg(device, &layouts.blit, &frame.view, sampler);
    BindGroups { blit }
}
