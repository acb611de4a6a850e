// src/world/hash.rs
//
// Integer hashes shared by the world generator and the per-pixel sampler.
// Deterministic and cheap; not meant to be statistically strong.

#[inline]
pub fn hash_u32(mut v: u32) -> u32 {
    v ^= v >> 16;
    v = v.wrapping_mul(0x7feb_352d);
    v ^= v >> 15;
    v = v.wrapping_mul(0x846c_a68b);
    v ^= v >> 16;
    v
}

#[inline]
pub fn hash3(seed: u32, x: i32, y: i32, z: i32) -> u32 {
    let a = (x as u32).wrapping_mul(0x9e37_79b1);
    let b = (y as u32).wrapping_mul(0x85eb_ca6b);
    let c = (z as u32).wrapping_mul(0xc2b2_ae35);
    hash_u32(seed ^ a ^ b ^ c)
}

/// Maps a hash to [0, 1). Uses the top 24 bits so the result never rounds up to 1.0.
#[inline]
pub fn u01(v: u32) -> f32 {
    ((v >> 8) as f32) * (1.0 / 16_777_216.0)
}
