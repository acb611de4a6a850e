pub mod integrator;
pub mod ray;
pub mod rng;
pub mod scatter;
pub mod traversal;

pub use integrator::{background, integrate, integrate_samples, PathSample};
pub use ray::Ray;
pub use rng::PixelRng;
pub use scatter::{scatter, Scatter};
pub use traversal::{traverse, traverse_with_limit, HitRecord};
