//! Real-time voxel path tracer.
//!
//! One stochastic path per pixel per frame through a dense voxel grid, a
//! temporal reprojection cache that reuses last frame's estimate wherever the
//! same surface is still visible, and an edge-aware separable filter for pixels
//! whose history was just reset.

pub mod app;
pub mod config;
pub mod error;
pub mod render;
pub mod trace;
pub mod world;

pub use error::{RenderError, Result};
