//! The graphics device the resource layer drives.
//!
//! [`GraphicsDevice`] is the seam between GPU resource bookkeeping and the
//! driver. Two implementations live here:
//!
//! - [`opengl::GlDevice`] issues real OpenGL calls through the `gl` crate.
//! - [`headless::HeadlessDevice`] records every call and simulates driver
//!   objects, for tests and tooling without a GL context.
//!
//! Driver constants never leak out of this crate; callers speak in the
//! abstract enums from [`types`].

pub mod device;
pub mod headless;
pub mod opengl;
pub mod types;

pub use device::{DeviceError, GraphicsDevice, ObjectId, ObjectKind, SharedDevice, UniformLocation};
pub use types::*;
