pub mod camera;
pub mod denoise;
pub mod gbuffer;
pub mod history;
pub mod present;
pub mod renderer;
pub mod reprojection;
pub mod shaders;

pub use camera::{CameraMatrices, CameraSnapshot};
pub use gbuffer::{GBuffer, GBufferTexel, TracedTexel};
pub use history::{FrameHistory, HistorySlot, Slot};
pub use present::Presenter;
pub use renderer::{FrameInput, FrameStats, Renderer};
pub use reprojection::ReprojectionStats;
