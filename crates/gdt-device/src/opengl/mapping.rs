//! Translation between the abstract enums and OpenGL constants.

use gl::types::GLenum;

use crate::types::{
    Attachment, FramebufferStatus, FramebufferTarget, InternalFormat, PixelFormat, PixelType,
    ShaderStage, TextureFilter, Wrapping,
};

pub(crate) fn stage_enum(stage: ShaderStage) -> GLenum {
    match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        ShaderStage::Geometry => gl::GEOMETRY_SHADER,
        ShaderStage::Compute => gl::COMPUTE_SHADER,
    }
}

pub(crate) fn filter_enum(filter: TextureFilter) -> GLenum {
    match filter {
        TextureFilter::Nearest => gl::NEAREST,
        TextureFilter::Linear => gl::LINEAR,
        TextureFilter::NearestMipmapNearest => gl::NEAREST_MIPMAP_NEAREST,
        TextureFilter::LinearMipmapNearest => gl::LINEAR_MIPMAP_NEAREST,
        TextureFilter::NearestMipmapLinear => gl::NEAREST_MIPMAP_LINEAR,
        TextureFilter::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
    }
}

pub(crate) fn wrap_enum(wrapping: Wrapping) -> GLenum {
    match wrapping {
        Wrapping::Clamp => gl::CLAMP_TO_EDGE,
        Wrapping::Repeat => gl::REPEAT,
        Wrapping::Border => gl::CLAMP_TO_BORDER,
    }
}

pub(crate) fn internal_format_enum(format: InternalFormat) -> GLenum {
    match format {
        InternalFormat::R8 => gl::R8,
        InternalFormat::Rg8 => gl::RG8,
        InternalFormat::Rgb8 => gl::RGB8,
        InternalFormat::Rgba8 => gl::RGBA8,
        InternalFormat::Srgb8Alpha8 => gl::SRGB8_ALPHA8,
        InternalFormat::R16F => gl::R16F,
        InternalFormat::Rg16F => gl::RG16F,
        InternalFormat::Rgba16F => gl::RGBA16F,
        InternalFormat::R32F => gl::R32F,
        InternalFormat::Rgb32F => gl::RGB32F,
        InternalFormat::Rgba32F => gl::RGBA32F,
        InternalFormat::Depth24 => gl::DEPTH_COMPONENT24,
        InternalFormat::Depth32F => gl::DEPTH_COMPONENT32F,
        InternalFormat::Depth24Stencil8 => gl::DEPTH24_STENCIL8,
    }
}

pub(crate) fn pixel_format_enum(format: PixelFormat) -> GLenum {
    match format {
        PixelFormat::Red => gl::RED,
        PixelFormat::Rg => gl::RG,
        PixelFormat::Rgb => gl::RGB,
        PixelFormat::Rgba => gl::RGBA,
        PixelFormat::Depth => gl::DEPTH_COMPONENT,
        PixelFormat::DepthStencil => gl::DEPTH_STENCIL,
    }
}

pub(crate) fn pixel_type_enum(ty: PixelType) -> GLenum {
    match ty {
        PixelType::UnsignedByte => gl::UNSIGNED_BYTE,
        PixelType::HalfFloat => gl::HALF_FLOAT,
        PixelType::Float => gl::FLOAT,
        PixelType::UnsignedInt => gl::UNSIGNED_INT,
        PixelType::UnsignedInt24_8 => gl::UNSIGNED_INT_24_8,
    }
}

pub(crate) fn attachment_enum(attachment: Attachment) -> GLenum {
    match attachment {
        Attachment::Color(index) => gl::COLOR_ATTACHMENT0 + index,
        Attachment::Depth => gl::DEPTH_ATTACHMENT,
        Attachment::Stencil => gl::STENCIL_ATTACHMENT,
        Attachment::DepthStencil => gl::DEPTH_STENCIL_ATTACHMENT,
    }
}

pub(crate) fn framebuffer_target_enum(target: FramebufferTarget) -> GLenum {
    match target {
        FramebufferTarget::Both => gl::FRAMEBUFFER,
        FramebufferTarget::Draw => gl::DRAW_FRAMEBUFFER,
        FramebufferTarget::Read => gl::READ_FRAMEBUFFER,
    }
}

pub(crate) fn status_from_enum(status: GLenum) -> FramebufferStatus {
    match status {
        gl::FRAMEBUFFER_COMPLETE => FramebufferStatus::Complete,
        gl::FRAMEBUFFER_UNDEFINED => FramebufferStatus::Undefined,
        gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferStatus::IncompleteAttachment,
        gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => FramebufferStatus::MissingAttachment,
        gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => FramebufferStatus::IncompleteDrawBuffer,
        gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => FramebufferStatus::IncompleteReadBuffer,
        gl::FRAMEBUFFER_UNSUPPORTED => FramebufferStatus::Unsupported,
        gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => FramebufferStatus::IncompleteMultisample,
        other => FramebufferStatus::Unknown(other),
    }
}
