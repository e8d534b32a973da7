//! OpenGL implementation of [`GraphicsDevice`](crate::GraphicsDevice).

mod device;
mod mapping;

pub use device::GlDevice;
