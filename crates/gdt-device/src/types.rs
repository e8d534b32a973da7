//! Driver-independent descriptions of stages, formats, filters and
//! attachment points.

use std::fmt;

use gdt_core::{Matrix4f, Vector2f, Vector3f, Vector4f};

/// Programmable pipeline stage a shader object is compiled for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
    Compute,
}

impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "Vertex",
            Self::Fragment => "Fragment",
            Self::Geometry => "Geometry",
            Self::Compute => "Compute",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The six sampler filters a driver understands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Wrapping {
    Clamp,
    Repeat,
    Border,
}

/// Storage format of texels on the GPU.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum InternalFormat {
    R8,
    Rg8,
    Rgb8,
    Rgba8,
    Srgb8Alpha8,
    R16F,
    Rg16F,
    Rgba16F,
    R32F,
    Rgb32F,
    Rgba32F,
    Depth24,
    Depth32F,
    Depth24Stencil8,
}

/// Channel layout of uploaded pixel data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Red,
    Rg,
    Rgb,
    Rgba,
    Depth,
    DepthStencil,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Red | PixelFormat::Depth => 1,
            PixelFormat::Rg | PixelFormat::DepthStencil => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// Component type of uploaded pixel data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PixelType {
    UnsignedByte,
    HalfFloat,
    Float,
    UnsignedInt,
    /// Packed depth-stencil: one 4-byte word per texel.
    UnsignedInt24_8,
}

impl PixelType {
    pub fn is_packed(self) -> bool {
        matches!(self, PixelType::UnsignedInt24_8)
    }

    /// Bytes per component, or per texel for packed types.
    pub fn size(self) -> usize {
        match self {
            PixelType::UnsignedByte => 1,
            PixelType::HalfFloat => 2,
            PixelType::Float | PixelType::UnsignedInt | PixelType::UnsignedInt24_8 => 4,
        }
    }
}

/// Everything a 2D upload needs besides the bytes. Nothing is inferred: the
/// caller must pick a combination the driver accepts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureDescriptor {
    pub width: u32,
    pub height: u32,
    pub internal_format: InternalFormat,
    pub format: PixelFormat,
    pub pixel_type: PixelType,
}

impl TextureDescriptor {
    pub fn new(
        width: u32,
        height: u32,
        internal_format: InternalFormat,
        format: PixelFormat,
        pixel_type: PixelType,
    ) -> Self {
        Self {
            width,
            height,
            internal_format,
            format,
            pixel_type,
        }
    }

    pub fn bytes_per_texel(&self) -> usize {
        if self.pixel_type.is_packed() {
            self.pixel_type.size()
        } else {
            self.format.channels() * self.pixel_type.size()
        }
    }

    /// Size of tightly packed pixel data for the whole level.
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * self.bytes_per_texel()
    }

    /// 8-bit RGBA, the common case for color targets and images.
    pub fn rgba8(width: u32, height: u32) -> Self {
        Self::new(
            width,
            height,
            InternalFormat::Rgba8,
            PixelFormat::Rgba,
            PixelType::UnsignedByte,
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Attachment {
    Color(u32),
    Depth,
    Stencil,
    DepthStencil,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum FramebufferTarget {
    /// Both draw and read.
    #[default]
    Both,
    Draw,
    Read,
}

/// Completeness report for a framebuffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FramebufferStatus {
    Complete,
    Undefined,
    IncompleteAttachment,
    MissingAttachment,
    IncompleteDrawBuffer,
    IncompleteReadBuffer,
    Unsupported,
    IncompleteMultisample,
    /// A status code this crate does not know about.
    Unknown(u32),
}

impl FramebufferStatus {
    pub fn is_complete(self) -> bool {
        self == Self::Complete
    }

    pub fn diagnostic(self) -> &'static str {
        match self {
            Self::Complete => "The framebuffer is complete",
            Self::Undefined => {
                "Target is the default framebuffer, but the default framebuffer does not exist"
            }
            Self::IncompleteAttachment => {
                "Any of the framebuffer attachment points are framebuffer incomplete"
            }
            Self::MissingAttachment => "The framebuffer does not have any texture attached to it",
            Self::IncompleteDrawBuffer => {
                "A color attachment point named by the draw buffers has no attached image"
            }
            Self::IncompleteReadBuffer => {
                "The color attachment point named by the read buffer has no attached image"
            }
            Self::Unsupported => {
                "The combination of internal formats of the attached textures violates an implementation-dependent set of restrictions"
            }
            Self::IncompleteMultisample => {
                "The number of samples is not the same for all attached images"
            }
            Self::Unknown(_) => "There is a problem with the framebuffer",
        }
    }
}

impl fmt::Display for FramebufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "{} (status {code:#x})", self.diagnostic()),
            _ => f.write_str(self.diagnostic()),
        }
    }
}

/// A value for a shader uniform, uploaded as a contiguous float or int block.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Column-major.
    Mat4([f32; 16]),
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<Vector2f> for UniformValue {
    fn from(v: Vector2f) -> Self {
        Self::Vec2(v.to_array())
    }
}

impl From<Vector3f> for UniformValue {
    fn from(v: Vector3f) -> Self {
        Self::Vec3(v.to_array())
    }
}

impl From<Vector4f> for UniformValue {
    fn from(v: Vector4f) -> Self {
        Self::Vec4(v.to_array())
    }
}

impl From<Matrix4f> for UniformValue {
    fn from(m: Matrix4f) -> Self {
        Self::Mat4(m.to_array())
    }
}

impl From<&Matrix4f> for UniformValue {
    fn from(m: &Matrix4f) -> Self {
        Self::Mat4(m.to_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_len_covers_every_texel() {
        assert_eq!(TextureDescriptor::rgba8(4, 4).byte_len(), 64);
        assert_eq!(TextureDescriptor::rgba8(0, 16).byte_len(), 0);

        let hdr = TextureDescriptor::new(
            3,
            2,
            InternalFormat::Rgb32F,
            PixelFormat::Rgb,
            PixelType::Float,
        );
        assert_eq!(hdr.byte_len(), 3 * 2 * 12);

        let half = TextureDescriptor::new(
            5,
            1,
            InternalFormat::Rg16F,
            PixelFormat::Rg,
            PixelType::HalfFloat,
        );
        assert_eq!(half.bytes_per_texel(), 4);

        let depth_stencil = TextureDescriptor::new(
            8,
            8,
            InternalFormat::Depth24Stencil8,
            PixelFormat::DepthStencil,
            PixelType::UnsignedInt24_8,
        );
        assert_eq!(depth_stencil.bytes_per_texel(), 4);
        assert_eq!(depth_stencil.byte_len(), 256);
    }

    #[test]
    fn matrix_uniforms_stay_column_major() {
        let mut m = Matrix4f::IDENTITY;
        m.translate(Vector3f::new(1.0, 2.0, 3.0));
        let UniformValue::Mat4(a) = UniformValue::from(&m) else {
            panic!("expected a matrix uniform");
        };
        assert_eq!(&a[12..15], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn unknown_status_keeps_its_code() {
        let status = FramebufferStatus::Unknown(0x8DA8);
        assert!(!status.is_complete());
        assert!(status.to_string().contains("0x8da8"));
        assert!(FramebufferStatus::Complete.is_complete());
    }
}
