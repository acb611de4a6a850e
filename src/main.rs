use std::sync::Arc;

use voxel_pathtracer::{app, Result};
use winit::{dpi::PhysicalSize, event_loop::EventLoop, window::WindowBuilder};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let event_loop = EventLoop::new()?;

    let window = Arc::new(
        WindowBuilder::new()
            .with_title("voxel path tracer")
            .with_inner_size(PhysicalSize::new(1280, 720))
            .build(&event_loop)?,
    );

    pollster::block_on(app::run(event_loop, window))
}
