//! GPU resource lifecycles over a [`GraphicsDevice`](gdt_device::GraphicsDevice).
//!
//! Every resource owns at most one driver object and walks the same state
//! machine: create, configure, finalize, use, destroy.
//!
//! - [`Shader`] compiles one pipeline stage.
//! - [`ShaderProgram`] owns its shaders until link and caches uniform
//!   locations.
//! - [`Texture2D`] holds texel storage and sampler state.
//! - [`Framebuffer`] records color and depth attachments.
//!
//! Destruction is idempotent and also runs on drop, so a failed build or an
//! early return never leaks driver objects.

pub mod error;
pub mod file;
pub mod framebuffer;
pub mod program;
pub mod shader;
pub mod texture;

pub use error::{GpuError, Result};
pub use file::load_file;
pub use framebuffer::{Framebuffer, MAX_COLOR_ATTACHMENTS};
pub use program::ShaderProgram;
pub use shader::Shader;
pub use texture::{sampling_filters, Sampling, Texture2D};
