//! The [`GraphicsDevice`] trait and driver handle types.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::types::{
    Attachment, FramebufferStatus, FramebufferTarget, ShaderStage, TextureDescriptor,
    TextureFilter, UniformValue, Wrapping,
};

/// Opaque identifier the driver uses for a GPU-side object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Driver location of a uniform in a linked program. Names the program does
/// not use resolve to [`UniformLocation::INVALID`]; writes to it are ignored
/// by the driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

impl UniformLocation {
    pub const INVALID: UniformLocation = UniformLocation(-1);

    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Shader,
    Program,
    Texture,
    Framebuffer,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shader => "shader",
            Self::Program => "program",
            Self::Texture => "texture",
            Self::Framebuffer => "framebuffer",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Driver failed to create a {0} object")]
    ObjectCreation(ObjectKind),

    #[error("Failed to load OpenGL function pointers: {0}")]
    Loader(String),
}

/// Calls the resource layer makes into the graphics driver.
///
/// Every method must be issued from the thread that owns the current
/// graphics context. Methods take `&self` so one device can be shared by all
/// resources of that context through a [`SharedDevice`].
///
/// Status queries return plain values; turning a failed status into an error
/// is the caller's decision.
pub trait GraphicsDevice {
    // Shaders
    fn create_shader(&self, stage: ShaderStage) -> Result<ObjectId, DeviceError>;
    fn shader_source(&self, shader: ObjectId, source: &str);
    /// Compile and return the compile status.
    fn compile_shader(&self, shader: ObjectId) -> bool;
    fn shader_info_log(&self, shader: ObjectId) -> String;
    fn delete_shader(&self, shader: ObjectId);

    // Programs
    fn create_program(&self) -> Result<ObjectId, DeviceError>;
    fn attach_shader(&self, program: ObjectId, shader: ObjectId);
    fn detach_shader(&self, program: ObjectId, shader: ObjectId);
    /// Link and return the link status.
    fn link_program(&self, program: ObjectId) -> bool;
    /// Validate and return the validate status.
    fn validate_program(&self, program: ObjectId) -> bool;
    fn program_info_log(&self, program: ObjectId) -> String;
    /// Make `program` current, or none.
    fn use_program(&self, program: Option<ObjectId>);
    fn delete_program(&self, program: ObjectId);
    fn uniform_location(&self, program: ObjectId, name: &str) -> UniformLocation;
    fn set_uniform(&self, program: ObjectId, location: UniformLocation, value: &UniformValue);

    // Textures
    fn create_texture(&self) -> Result<ObjectId, DeviceError>;
    /// Activate texture `unit` (when given) and bind `texture` to it, or
    /// unbind with `None`.
    fn bind_texture(&self, unit: Option<u32>, texture: Option<ObjectId>);
    /// Allocate storage for `desc` and fill it from `data`. Implementations
    /// must not read past `data`; a slice shorter than
    /// [`TextureDescriptor::byte_len`] is not uploaded.
    fn upload_texture_2d(&self, texture: ObjectId, desc: &TextureDescriptor, data: Option<&[u8]>);
    fn set_texture_filters(&self, texture: ObjectId, min: TextureFilter, mag: TextureFilter);
    fn set_texture_wrapping(&self, texture: ObjectId, s: Wrapping, t: Wrapping);
    fn delete_texture(&self, texture: ObjectId);

    // Framebuffers
    fn create_framebuffer(&self) -> Result<ObjectId, DeviceError>;
    fn bind_framebuffer(&self, target: FramebufferTarget, framebuffer: Option<ObjectId>);
    /// Attach `texture` at `attachment`, or detach with `None`.
    fn attach_framebuffer_texture(
        &self,
        framebuffer: ObjectId,
        attachment: Attachment,
        texture: Option<ObjectId>,
    );
    /// Route fragment outputs to the listed color attachment indices.
    fn set_draw_buffers(&self, framebuffer: ObjectId, color_indices: &[u32]);
    fn check_framebuffer_status(&self, framebuffer: ObjectId) -> FramebufferStatus;
    fn delete_framebuffer(&self, framebuffer: ObjectId);
}

/// A device shared by every resource created on one graphics context.
pub type SharedDevice = Rc<dyn GraphicsDevice>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_location_is_negative() {
        assert!(!UniformLocation::INVALID.is_valid());
        assert!(UniformLocation(0).is_valid());
    }

    #[test]
    fn creation_error_names_the_object() {
        let err = DeviceError::ObjectCreation(ObjectKind::Framebuffer);
        assert_eq!(err.to_string(), "Driver failed to create a framebuffer object");
    }
}
