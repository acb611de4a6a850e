//! Error types for the renderer.
//!
//! Every variant is fatal: there is no recoverable per-frame error. Traversal
//! and bounce exhaustion are results, not failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    /// No adapter can drive the window surface.
    #[error("No suitable rendering adapter found")]
    NoAdapter,

    #[error("Failed to create window surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("Failed to request rendering device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("Surface reports no supported formats")]
    NoSurfaceFormat,

    /// Rebuild configuration the kernels cannot be built with.
    #[error("Invalid render parameters: {0}")]
    InvalidParams(String),

    #[error("Frame buffer of {width}x{height} pixels cannot be allocated")]
    Allocation { width: u32, height: u32 },

    #[error("Voxel grid expects {expected} cells, got {actual}")]
    GridShape { expected: usize, actual: usize },

    #[error("Material table holds at most {capacity} entries, got {actual}")]
    MaterialTableFull { capacity: usize, actual: usize },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Surface is out of memory")]
    SurfaceOutOfMemory,
}

pub type Result<T> = std::result::Result<T, RenderError>;
