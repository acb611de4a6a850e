// src/render/renderer.rs
//
// CPU frame pipeline: trace -> reproject -> horizontal blur -> vertical blur ->
// composite. Each pass is a rayon data-parallel loop over pixel rows and fully
// finishes before the next one starts.

use std::time::{Duration, Instant};

use glam::Vec3;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::{self, DebugView, RenderParams};
use crate::error::Result;
use crate::render::camera::{CameraMatrices, CameraSnapshot};
use crate::render::denoise::{blur_pass, composite, Axis};
use crate::render::gbuffer::{pixel_count, GBuffer, TracedTexel};
use crate::render::history::FrameHistory;
use crate::render::reprojection::{reproject, ReprojectionParams, ReprojectionStats};
use crate::trace::{integrate_samples, PixelRng};
use crate::world::Scene;

/// Per-frame input from the camera collaborator.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    pub camera: CameraSnapshot,
    /// Decorrelates the random streams between frames.
    pub seed: u32,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    pub trace: Duration,
    pub reproject: Duration,
    pub denoise_h: Duration,
    pub denoise_v: Duration,
    pub composite: Duration,
    pub history: ReprojectionStats,
    /// Whether a previous frame was available to reproject from.
    pub history_valid: bool,
    pub total_samples: u64,
}

/// Linear [0,1] color to RGBA8 with a gamma of 2.
#[inline]
pub fn to_rgba8(c: Vec3) -> [u8; 4] {
    let c = c.clamp(Vec3::ZERO, Vec3::ONE);
    let g = Vec3::new(c.x.sqrt(), c.y.sqrt(), c.z.sqrt()) * 255.0;
    [g.x.round() as u8, g.y.round() as u8, g.z.round() as u8, 255]
}

/// Per-resolution buffers, replaced as a unit on resize.
struct Buffers {
    width: u32,
    height: u32,
    traced: Vec<TracedTexel>,
    history: FrameHistory,
    // horizontal pass output
    scratch_h: Vec<Vec3>,
    // vertical pass output
    scratch_v: Vec<Vec3>,
    // blended colors going in, final colors coming out
    output: Vec<Vec3>,
    display: Vec<[u8; 4]>,
}

impl Buffers {
    fn new(width: u32, height: u32) -> Result<Self> {
        let n = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            traced: vec![TracedTexel::default(); n],
            history: FrameHistory::new(width, height)?,
            scratch_h: vec![Vec3::ZERO; n],
            scratch_v: vec![Vec3::ZERO; n],
            output: vec![Vec3::ZERO; n],
            display: vec![[0, 0, 0, 255]; n],
        })
    }
}

pub struct Renderer {
    scene: Scene,
    params: RenderParams,
    buffers: Buffers,
    pool: ThreadPool,
    total_samples: u64,
    frame_index: u64,
}

impl Renderer {
    pub fn new(scene: Scene, params: RenderParams, width: u32, height: u32) -> Result<Self> {
        params.validate()?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(config::WORKER_THREADS)
            .thread_name(|i| format!("pixel-{}", i))
            .build()?;

        log::info!(
            "renderer: {}x{} px, {} worker threads, depth {}, {} spp",
            width.max(1),
            height.max(1),
            pool.current_num_threads(),
            params.maximum_depth,
            params.number_of_samples
        );

        Ok(Self {
            scene,
            params,
            buffers: Buffers::new(width.max(1), height.max(1))?,
            pool,
            total_samples: 0,
            frame_index: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.buffers.width
    }

    pub fn height(&self) -> u32 {
        self.buffers.height
    }

    pub fn params(&self) -> RenderParams {
        self.params
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    /// Reallocates every per-pixel buffer and drops history. Zero sizes clamp to 1.
    /// If allocation fails the renderer keeps its previous buffers.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let (width, height) = (width.max(1), height.max(1));
        if width == self.buffers.width && height == self.buffers.height {
            self.buffers.history.reset();
            return Ok(());
        }
        self.buffers = Buffers::new(width, height)?;
        log::info!("renderer resized to {}x{}", width, height);
        Ok(())
    }

    /// Applies new parameters. Always discards temporal history.
    pub fn rebuild(&mut self, params: RenderParams) -> Result<()> {
        params.validate()?;
        self.params = params;
        self.buffers.history.invalidate();
        log::info!(
            "rebuild: depth {}, {} spp, filter {}, view {:?}",
            params.maximum_depth,
            params.number_of_samples,
            if params.enable_filter { "on" } else { "off" },
            params.debug_view
        );
        Ok(())
    }

    /// Swaps in a new scene; history from the old one is discarded.
    pub fn set_scene(&mut self, scene: Scene) {
        self.scene = scene;
        self.buffers.history.invalidate();
    }

    /// Final linear colors of the last frame.
    pub fn output(&self) -> &[Vec3] {
        &self.buffers.output
    }

    /// RGBA8 image of the last frame, rows top to bottom.
    pub fn display(&self) -> &[u8] {
        bytemuck::cast_slice(&self.buffers.display)
    }

    /// G-buffer written by the last frame.
    pub fn gbuffer(&self) -> &GBuffer {
        &self.buffers.history.latest().gbuffer
    }

    pub fn render_frame(&mut self, input: &FrameInput) -> FrameStats {
        let Self {
            scene,
            params,
            buffers,
            pool,
            ..
        } = self;
        let Buffers {
            width,
            height,
            traced,
            history,
            scratch_h,
            scratch_v,
            output,
            display,
        } = buffers;
        let (width, height) = (*width, *height);
        let params = *params;
        let scene: &Scene = scene;
        let pool: &ThreadPool = pool;
        let camera = input.camera;

        let mut stats = FrameStats {
            history_valid: history.is_valid(),
            ..FrameStats::default()
        };

        // 1. primary trace
        let t0 = Instant::now();
        pool.install(|| {
            traced
                .par_chunks_mut(width as usize)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, texel) in row.iter_mut().enumerate() {
                        let (x, y) = (x as u32, y as u32);
                        let ray = camera.primary_ray(x, y, width, height);
                        let mut rng = PixelRng::new(x, y, input.seed);
                        let sample = integrate_samples(
                            ray,
                            scene,
                            params.maximum_depth,
                            params.number_of_samples,
                            &mut rng,
                        );
                        *texel = TracedTexel::from_sample(&sample);
                    }
                });
        });
        stats.trace = t0.elapsed();

        // 2. temporal blend into the current slot
        let t0 = Instant::now();
        let (slot, previous) = history.split_mut();
        stats.history = pool.install(|| reproject(&traced[..], &mut slot.gbuffer, previous, &ReprojectionParams::default()));
        stats.reproject = t0.elapsed();
        let gbuffer = &slot.gbuffer;

        // 3/4. separable filter
        pool.install(|| {
            output
                .par_iter_mut()
                .zip(gbuffer.texels().par_iter())
                .for_each(|(o, t)| *o = t.color);
        });

        if params.enable_filter {
            let t0 = Instant::now();
            pool.install(|| blur_pass(&output[..], gbuffer, Axis::Horizontal, config::FILTER_NORMAL_EPSILON, &mut scratch_h[..]));
            stats.denoise_h = t0.elapsed();

            let t0 = Instant::now();
            pool.install(|| blur_pass(&scratch_h[..], gbuffer, Axis::Vertical, config::FILTER_NORMAL_EPSILON, &mut scratch_v[..]));
            stats.denoise_v = t0.elapsed();

            let t0 = Instant::now();
            pool.install(|| composite(gbuffer, &scratch_v[..], &mut output[..]));
            stats.composite = t0.elapsed();
        }

        // 5. display buffer; debug channels are pre-squared so the gamma step leaves them linear
        let (output, traced) = (&output[..], &traced[..]);
        pool.install(|| {
            display
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, px)| {
                    let t = &gbuffer.texels()[i];
                    *px = match params.debug_view {
                        DebugView::Final => to_rgba8(output[i]),
                        DebugView::Raw => to_rgba8(traced[i].color),
                        DebugView::CacheTail => to_rgba8(Vec3::splat(t.cache_tail * t.cache_tail)),
                        DebugView::Normals => to_rgba8(t.normal * t.normal),
                    };
                });
        });

        history.commit(CameraMatrices::from(&camera));

        self.frame_index += 1;
        self.total_samples += u64::from(width) * u64::from(height) * u64::from(params.number_of_samples);
        stats.total_samples = self.total_samples;
        stats
    }
}
