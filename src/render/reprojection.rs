// src/render/reprojection.rs
//
// Temporal reverse reprojection. Each first-hit point is projected through the
// previous camera; if the previous frame saw the same surface there, the raw
// sample is folded into that pixel's running average.

use glam::{Vec2, Vec3, Vec4Swizzles};
use rayon::prelude::*;

use crate::config::{REPROJECTION_NORMAL_EPSILON, TEMPORAL_ALPHA};
use crate::render::camera::CameraMatrices;
use crate::render::gbuffer::{GBuffer, GBufferTexel, TracedTexel};
use crate::render::history::HistorySlot;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReprojectionParams {
    /// Weight of the current frame in the moving average.
    pub alpha: f32,
    pub normal_epsilon: f32,
}

impl Default for ReprojectionParams {
    fn default() -> Self {
        Self {
            alpha: TEMPORAL_ALPHA,
            normal_epsilon: REPROJECTION_NORMAL_EPSILON,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReprojectionStats {
    pub geometry_pixels: usize,
    pub accepted: usize,
}

/// Screen uv of `position` in the previous frame, `None` if it falls outside
/// the open square (0,1)² or behind that camera.
pub fn project_to_previous(position: Vec3, camera: &CameraMatrices) -> Option<Vec2> {
    let clip = camera.projection * camera.view * position.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.xy() / clip.w;
    let uv = ndc * 0.5 + Vec2::splat(0.5);

    let inside = uv.x > 0.0 && uv.x < 1.0 && uv.y > 0.0 && uv.y < 1.0;
    inside.then_some(uv)
}

/// Nearest texel at `uv` (v grows upwards, rows grow downwards).
pub fn texel_at_uv(uv: Vec2, gbuffer: &GBuffer) -> &GBufferTexel {
    let w = gbuffer.width();
    let h = gbuffer.height();
    let x = ((uv.x * w as f32) as u32).min(w - 1);
    let y = (((1.0 - uv.y) * h as f32) as u32).min(h - 1);
    gbuffer.get(x, y)
}

/// Blends one pixel against its reprojected history texel. Returns the new
/// G-buffer entry and whether history was accepted.
pub fn resolve_texel(
    current: &TracedTexel,
    previous: Option<&GBufferTexel>,
    params: &ReprojectionParams,
) -> (GBufferTexel, bool) {
    let mut out = GBufferTexel {
        color: current.color,
        normal: current.normal,
        material_id: current.material_id,
        offset_id: current.offset_id,
        cache_tail: 0.0,
    };

    if current.is_background() {
        return (out, false);
    }

    match previous {
        Some(prev)
            if prev.same_surface(
                current.material_id,
                current.offset_id,
                current.normal,
                params.normal_epsilon,
            ) =>
        {
            let a = params.alpha;
            out.color = a * current.color + (1.0 - a) * prev.color;
            out.cache_tail = (1.0 - a) * prev.cache_tail;
            (out, true)
        }
        _ => {
            out.cache_tail = 1.0;
            (out, false)
        }
    }
}

/// Writes this frame's blended G-buffer into `target`, reading `previous` (if any).
pub fn reproject(
    traced: &[TracedTexel],
    target: &mut GBuffer,
    previous: Option<&HistorySlot>,
    params: &ReprojectionParams,
) -> ReprojectionStats {
    let width = target.width() as usize;
    let history = previous.and_then(|slot| slot.camera.as_ref().map(|cam| (&slot.gbuffer, cam)));

    target
        .texels_mut()
        .par_chunks_mut(width)
        .zip(traced.par_chunks(width))
        .map(|(dst, src)| {
            let mut stats = ReprojectionStats::default();
            for (out, cur) in dst.iter_mut().zip(src) {
                let prev = match history {
                    Some((gbuffer, cam)) if !cur.is_background() => {
                        project_to_previous(cur.position, cam).map(|uv| texel_at_uv(uv, gbuffer))
                    }
                    _ => None,
                };

                let (texel, accepted) = resolve_texel(cur, prev, params);
                *out = texel;

                if !cur.is_background() {
                    stats.geometry_pixels += 1;
                    stats.accepted += accepted as usize;
                }
            }
            stats
        })
        .reduce(ReprojectionStats::default, |a, b| ReprojectionStats {
            geometry_pixels: a.geometry_pixels + b.geometry_pixels,
            accepted: a.accepted + b.accepted,
        })
}
