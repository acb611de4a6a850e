// src/render/denoise.rs
//
// Edge-aware separable Gaussian. Taps on a different surface drop out of both
// the weighted sum and the normalization.

use glam::Vec3;
use rayon::prelude::*;

use crate::render::gbuffer::GBuffer;

/// One side of the symmetric 9-tap kernel, centre first. Sums to 1 over all taps.
pub const KERNEL: [f32; 5] = [
    0.227_027_03,
    0.194_594_6,
    0.121_621_62,
    0.054_054_055,
    0.016_216_217,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    #[inline]
    fn step(self) -> (i64, i64) {
        match self {
            Axis::Horizontal => (1, 0),
            Axis::Vertical => (0, 1),
        }
    }
}

/// One 1-D pass over `input`, edge tests taken from `gbuffer`. Background
/// pixels are copied through untouched.
pub fn blur_pass(input: &[Vec3], gbuffer: &GBuffer, axis: Axis, normal_epsilon: f32, output: &mut [Vec3]) {
    let width = gbuffer.width() as usize;
    let (dx, dy) = axis.step();

    output
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let i = y * width + x;
                let centre = gbuffer.texels()[i];
                if centre.material_id == crate::world::AIR {
                    *out = input[i];
                    continue;
                }

                let mut sum = input[i] * KERNEL[0];
                let mut weight = KERNEL[0];

                for (k, &w) in KERNEL.iter().enumerate().skip(1) {
                    for sign in [-1i64, 1] {
                        let tx = x as i64 + sign * dx * k as i64;
                        let ty = y as i64 + sign * dy * k as i64;
                        let tap = gbuffer.get_clamped(tx, ty);
                        if !tap.same_surface(centre.material_id, centre.offset_id, centre.normal, normal_epsilon) {
                            continue;
                        }
                        let cx = tx.clamp(0, gbuffer.width() as i64 - 1) as usize;
                        let cy = ty.clamp(0, gbuffer.height() as i64 - 1) as usize;
                        sum += input[cy * width + cx] * w;
                        weight += w;
                    }
                }

                *out = sum / weight;
            }
        });
}

/// Final color: `lerp(blended, filtered, cache_tail)`; background keeps its raw color.
pub fn composite(gbuffer: &GBuffer, filtered: &[Vec3], output: &mut [Vec3]) {
    output
        .par_iter_mut()
        .zip(gbuffer.texels().par_iter())
        .zip(filtered.par_iter())
        .for_each(|((out, t), &f)| {
            *out = if t.material_id == crate::world::AIR {
                t.color
            } else {
                t.color.lerp(f, t.cache_tail)
            };
        });
}
