//! Core value types and host-facing seams shared by the other `gdt` crates.
//!
//! - [`math`] is the linear algebra kernel: [`Vector2f`], [`Vector3f`],
//!   [`Vector4f`] and the column-major [`Matrix4f`].
//! - [`inputs`] fans window-system input out to registered listeners.
//! - [`window`] describes the window system the renderer runs inside.
//! - [`log`] installs the `tracing` subscriber.

pub mod inputs;
pub mod log;
pub mod math;
pub mod window;

pub use math::{Matrix4f, Vector2f, Vector3f, Vector4f};
