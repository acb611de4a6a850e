// src/app/profiler.rs
//
// Windowed per-pass CPU timings, logged at debug level every `print_every`.

use std::time::{Duration, Instant};

use crate::render::FrameStats;

pub struct FrameProf {
    pub frame: u64,
    pub last_print: Instant,
    pub print_every: Duration,

    pub n_frames: u64,
    pub t_cam: f64,
    pub t_trace: f64,
    pub t_reproject: f64,
    pub t_denoise_h: f64,
    pub t_denoise_v: f64,
    pub t_composite: f64,
    pub t_upload: f64,
    pub t_acquire: f64,
    pub t_encode_blit: f64,
    pub t_submit: f64,
    pub t_present: f64,

    pub geometry_pixels: u64,
    pub history_accepted: u64,
    pub total_samples: u64,

    pub max_frame_ms: f64,
}

#[inline]
fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

impl FrameProf {
    pub fn new() -> Self {
        Self {
            frame: 0,
            last_print: Instant::now(),
            print_every: Duration::from_millis(500),

            n_frames: 0,
            t_cam: 0.0,
            t_trace: 0.0,
            t_reproject: 0.0,
            t_denoise_h: 0.0,
            t_denoise_v: 0.0,
            t_composite: 0.0,
            t_upload: 0.0,
            t_acquire: 0.0,
            t_encode_blit: 0.0,
            t_submit: 0.0,
            t_present: 0.0,

            geometry_pixels: 0,
            history_accepted: 0,
            total_samples: 0,

            max_frame_ms: 0.0,
        }
    }

    #[inline]
    pub fn mark_ms(t0: Instant) -> f64 {
        t0.elapsed().as_secs_f64() * 1000.0
    }

    #[inline] pub fn cam(&mut self, ms: f64) { self.t_cam += ms; }
    #[inline] pub fn upload(&mut self, ms: f64) { self.t_upload += ms; }
    #[inline] pub fn acquire(&mut self, ms: f64) { self.t_acquire += ms; }
    #[inline] pub fn enc_blit(&mut self, ms: f64) { self.t_encode_blit += ms; }
    #[inline] pub fn submit(&mut self, ms: f64) { self.t_submit += ms; }
    #[inline] pub fn present(&mut self, ms: f64) { self.t_present += ms; }

    /// Folds in the renderer's own pass timings.
    pub fn add_render(&mut self, stats: &FrameStats) {
        self.t_trace += ms(stats.trace);
        self.t_reproject += ms(stats.reproject);
        self.t_denoise_h += ms(stats.denoise_h);
        self.t_denoise_v += ms(stats.denoise_v);
        self.t_composite += ms(stats.composite);
        self.geometry_pixels += stats.history.geometry_pixels as u64;
        self.history_accepted += stats.history.accepted as u64;
        self.total_samples = stats.total_samples;
    }

    /// Share of geometry pixels in the current window that reused history.
    pub fn acceptance(&self) -> f64 {
        if self.geometry_pixels == 0 {
            return 0.0;
        }
        self.history_accepted as f64 / self.geometry_pixels as f64
    }

    pub fn end_frame(&mut self, frame_ms: f64) {
        self.frame += 1;
        self.n_frames += 1;
        self.max_frame_ms = self.max_frame_ms.max(frame_ms);

        if self.last_print.elapsed() < self.print_every {
            return;
        }

        let nf = self.n_frames.max(1) as f64;
        let avg = |x: f64| x / nf;

        let avg_frame = avg(
            self.t_cam + self.t_trace + self.t_reproject + self.t_denoise_h + self.t_denoise_v
                + self.t_composite + self.t_upload + self.t_acquire + self.t_encode_blit
                + self.t_submit + self.t_present,
        );

        log::debug!(
            concat!(
                "[prof] frames={} avg_frame={:.2}ms max_frame={:.2}ms | ",
                "cam={:.2} trace={:.2} reproject={:.2} denoise_h={:.2} denoise_v={:.2} composite={:.2} | ",
                "upload={:.2} acquire={:.2} enc_blit={:.2} submit={:.2} present={:.2} | ",
                "history={:.1}% samples={}"
            ),
            self.frame,
            avg_frame,
            self.max_frame_ms,
            avg(self.t_cam),
            avg(self.t_trace),
            avg(self.t_reproject),
            avg(self.t_denoise_h),
            avg(self.t_denoise_v),
            avg(self.t_composite),
            avg(self.t_upload),
            avg(self.t_acquire),
            avg(self.t_encode_blit),
            avg(self.t_submit),
            avg(self.t_present),
            self.acceptance() * 100.0,
            self.total_samples,
        );

        // reset window counters, keep frame + print_every + total_samples
        self.last_print = Instant::now();
        self.n_frames = 0;
        self.t_cam = 0.0;
        self.t_trace = 0.0;
        self.t_reproject = 0.0;
        self.t_denoise_h = 0.0;
        self.t_denoise_v = 0.0;
        self.t_composite = 0.0;
        self.t_upload = 0.0;
        self.t_acquire = 0.0;
        self.t_encode_blit = 0.0;
        self.t_submit = 0.0;
        self.t_present = 0.0;
        self.geometry_pixels = 0;
        self.history_accepted = 0;
        self.max_frame_ms = 0.0;
    }
}

impl Default for FrameProf {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ReprojectionStats;

    #[test]
    fn acceptance_is_windowed_over_frames() {
        let mut p = FrameProf::new();
        p.print_every = Duration::from_secs(3600);
        for accepted in [0, 50, 100] {
            p.add_render(&FrameStats {
                history: ReprojectionStats {
                    geometry_pixels: 100,
                    accepted,
                },
                total_samples: 42,
                ..FrameStats::default()
            });
            p.end_frame(1.0);
        }
        assert!((p.acceptance() - 0.5).abs() < 1e-9);
        assert_eq!(p.total_samples, 42);
        assert_eq!(p.n_frames, 3);
    }

    #[test]
    fn window_resets_after_print() {
        let mut p = FrameProf::new();
        p.print_every = Duration::ZERO;
        p.add_render(&FrameStats {
            trace: Duration::from_millis(4),
            ..FrameStats::default()
        });
        p.end_frame(5.0);
        assert_eq!(p.n_frames, 0);
        assert_eq!(p.t_trace, 0.0);
        assert_eq!(p.frame, 1);
    }
}
