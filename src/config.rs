// src/config.rs
// -------------
// Global knobs for the path tracer core and the viewer.

use crate::error::{RenderError, Result};

/// Edge length of one grid cell in world units.
pub const VOXEL_SIZE: f32 = 1.0;

/// Upper bound on DDA steps per traversal. Exhaustion is a miss.
pub const MAXIMUM_TRAVERSAL_DISTANCE: u32 = 128;

/// Capacity of the material table (entry 0 is air and never sampled).
pub const NUMBER_OF_MATERIALS: usize = 16;

/// Edge length of the generated world, in cells.
pub const GRID_SIZE: usize = 64;

pub const WORLD_SEED: u32 = 12345;

// Keep this explicit so a hit point lands inside the cell that was entered.
pub const HIT_EPSILON: f32 = 1.0e-4;

/// Exponential moving average weight of the current frame (1/9).
pub const TEMPORAL_ALPHA: f32 = 1.0 / 9.0;

/// Max distance between encoded normals for history to be reused.
pub const REPROJECTION_NORMAL_EPSILON: f32 = 0.01;

/// Max distance between encoded normals for a filter tap to be admitted.
pub const FILTER_NORMAL_EPSILON: f32 = 0.01;

/// Internal render resolution relative to the window.
pub const RENDER_SCALE: f32 = 0.5;

/// 0 lets rayon pick one thread per core.
pub const WORKER_THREADS: usize = 0;

pub const DEFAULT_MAXIMUM_DEPTH: u32 = 8;
pub const MAX_MAXIMUM_DEPTH: u32 = 64;
pub const MAX_NUMBER_OF_SAMPLES: u32 = 16;

/// What the display buffer shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DebugView {
    #[default]
    Final,
    CacheTail,
    Normals,
    Raw,
}

impl DebugView {
    pub fn next(self) -> Self {
        match self {
            DebugView::Final => DebugView::CacheTail,
            DebugView::CacheTail => DebugView::Normals,
            DebugView::Normals => DebugView::Raw,
            DebugView::Raw => DebugView::Final,
        }
    }
}

/// Rebuild configuration. Any change discards temporal history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderParams {
    pub maximum_depth: u32,
    pub number_of_samples: u32,
    pub enable_filter: bool,
    pub debug_view: DebugView,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            maximum_depth: DEFAULT_MAXIMUM_DEPTH,
            number_of_samples: 1,
            enable_filter: true,
            debug_view: DebugView::Final,
        }
    }
}

impl RenderParams {
    pub fn validate(&self) -> Result<()> {
        if self.maximum_depth < 1 {
            return Err(RenderError::InvalidParams(format!(
                "maximum_depth must be >= 1 (got {})",
                self.maximum_depth
            )));
        }
        if self.number_of_samples < 1 {
            return Err(RenderError::InvalidParams(format!(
                "number_of_samples must be >= 1 (got {})",
                self.number_of_samples
            )));
        }
        Ok(())
    }

    pub fn with_depth_step(self, delta: i32) -> Self {
        let depth = (self.maximum_depth as i32 + delta).clamp(1, MAX_MAXIMUM_DEPTH as i32);
        Self { maximum_depth: depth as u32, ..self }
    }

    pub fn with_samples_step(self, delta: i32) -> Self {
        let n = (self.number_of_samples as i32 + delta).clamp(1, MAX_NUMBER_OF_SAMPLES as i32);
        Self { number_of_samples: n as u32, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(RenderParams::default().validate().is_ok());
    }

    #[test]
    fn zero_depth_is_rejected() {
        let p = RenderParams { maximum_depth: 0, ..RenderParams::default() };
        assert!(matches!(p.validate(), Err(RenderError::InvalidParams(_))));
    }

    #[test]
    fn zero_samples_is_rejected() {
        let p = RenderParams { number_of_samples: 0, ..RenderParams::default() };
        assert!(p.validate().is_err());
    }

    #[test]
    fn steps_clamp_to_valid_range() {
        let p = RenderParams { maximum_depth: 1, ..RenderParams::default() };
        assert_eq!(p.with_depth_step(-1).maximum_depth, 1);
        assert_eq!(p.with_depth_step(3).maximum_depth, 4);
        assert_eq!(p.with_samples_step(100).number_of_samples, MAX_NUMBER_OF_SAMPLES);
    }

    #[test]
    fn debug_view_cycles_back_to_final() {
        let mut v = DebugView::Final;
        for _ in 0..4 {
            v = v.next();
        }
        assert_eq!(v, DebugView::Final);
    }
}
