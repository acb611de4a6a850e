// src/render/present/textures.rs
// ------------------------------

/// Frame texture the CPU image is uploaded into each frame.
pub struct FrameTex {
    pub tex: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

/// Already gamma encoded on the CPU, so the texture itself is linear.
pub const FRAME_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

pub fn create_frame_texture(device: &wgpu::Device, w: u32, h: u32) -> FrameTex {
    // wgpu forbids zero-sized textures (minimized window)
    let w = w.max(1);
    let h = h.max(1);

    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("frame_tex"),
        size: wgpu::Extent3d {
            width: w,
            height: h,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FRAME_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    let view = tex.create_view(&Default::default());

    FrameTex {
        tex,
        view,
        width: w,
        height: h,
    }
}

/// Rounds `v` up to a multiple of the power of two `a`.
pub fn align_up(v: usize, a: usize) -> usize {
    (v + (a - 1)) & !(a - 1)
}

/// Copies tightly packed RGBA8 rows into `scratch` with each row padded to
/// `COPY_BYTES_PER_ROW_ALIGNMENT`. Returns the padded row pitch.
pub fn pad_rows(src: &[u8], width: u32, height: u32, scratch: &mut Vec<u8>) -> usize {
    let row_bytes = width as usize * 4;
    let padded = align_up(row_bytes, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as usize);

    scratch.clear();
    scratch.resize(padded * height as usize, 0);

    for (dst, src) in scratch.chunks_exact_mut(padded).zip(src.chunks_exact(row_bytes)) {
        dst[..row_bytes].copy_from_slice(src);
    }
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_to_copy_alignment() {
        assert_eq!(align_up(4, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(257, 256), 512);

        let src: Vec<u8> = (0..3 * 2 * 4).map(|i| i as u8).collect();
        let mut scratch = Vec::new();
        let pitch = pad_rows(&src, 3, 2, &mut scratch);
        assert_eq!(pitch, 256);
        assert_eq!(scratch.len(), 512);
        assert_eq!(&scratch[..12], &src[..12]);
        assert_eq!(&scratch[256..268], &src[12..24]);
        assert!(scratch[12..256].iter().all(|&b| b == 0));
    }
}
