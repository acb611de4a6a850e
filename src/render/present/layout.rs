// src/render/present/layout.rs
//
// Bind group layout for the blit pass. Binding indices must match
// `shaders/blit.wgsl`.

pub struct Layouts {
    /// group(0): frame texture + sampler.
    pub blit: wgpu::BindGroupLayout,
}

fn bgl_tex_sample(
    binding: u32,
    visibility: wgpu::ShaderStages,
    sample_type: wgpu::TextureSampleType,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Texture {
            sample_type,
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn bgl_sampler(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

pub fn create_layouts(device: &wgpu::Device) -> Layouts {
    let fs_vis = wgpu::ShaderStages::FRAGMENT;

    let blit = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("blit_bgl"),
        entries: &[
            // binding(0): RGBA8 frame, upsampled to the swapchain
            bgl_tex_sample(0, fs_vis, wgpu::TextureSampleType::Float { filterable: true }),
            // binding(1)
            bgl_sampler(1, fs_vis),
        ],
    });

    Layouts { blit }
}
