/// Render-buffer capability and scoped state guards.
pub mod buffer;
/// Software render buffer.
pub mod cpu;
/// Off-screen buffer pool.
pub mod pool;
pub(crate) mod raster;
/// Scene traversal and compositing.
pub mod renderer;
