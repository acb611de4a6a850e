// src/render/shaders.rs
//
// Shader sources embedded at compile time.

pub const BLIT_WGSL: &str = include_str!("../shaders/blit.wgsl");

#[inline]
pub fn blit_wgsl() -> &'static str {
    BLIT_WGSL
}
