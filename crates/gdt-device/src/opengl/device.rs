use std::ffi::{c_void, CString};
use std::marker::PhantomData;
use std::ptr;
use std::sync::Once;

use gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint};
use tracing::{debug, warn};

use super::mapping;
use crate::device::{DeviceError, GraphicsDevice, ObjectId, ObjectKind, UniformLocation};
use crate::types::{
    Attachment, FramebufferStatus, FramebufferTarget, ShaderStage, TextureDescriptor,
    TextureFilter, UniformValue, Wrapping,
};

static GL_INIT_ONCE: Once = Once::new();

/// Issues OpenGL calls against whatever context is current on this thread.
///
/// Not `Send`: GL objects belong to the context of the thread that created
/// them.
#[derive(Debug)]
pub struct GlDevice {
    _not_send: PhantomData<*const ()>,
}

impl GlDevice {
    /// Load GL function pointers through `gl_loader` and wrap the current
    /// context. Pointers are loaded exactly once per process.
    pub fn load() -> anyhow::Result<Self> {
        GL_INIT_ONCE.call_once(|| {
            gl_loader::init_gl();
            gl::load_with(|s| gl_loader::get_proc_address(s).cast());
        });
        Self::checked()
    }

    /// Load GL function pointers from a context-provided lookup, as given by
    /// a windowing library.
    pub fn load_with<F>(loader: F) -> anyhow::Result<Self>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        Self::checked()
    }

    fn checked() -> anyhow::Result<Self> {
        anyhow::ensure!(
            gl::CreateShader::is_loaded() && gl::GenFramebuffers::is_loaded(),
            DeviceError::Loader("core entry points are missing".to_string())
        );
        debug!("OpenGL function pointers loaded");
        Ok(Self {
            _not_send: PhantomData,
        })
    }

    fn gen_object(
        kind: ObjectKind,
        gen: unsafe fn(GLsizei, *mut GLuint),
    ) -> Result<ObjectId, DeviceError> {
        let mut id: GLuint = 0;
        unsafe { gen(1, &mut id) };
        if id == 0 {
            return Err(DeviceError::ObjectCreation(kind));
        }
        Ok(ObjectId(id))
    }

    fn read_log(
        id: GLuint,
        get_iv: unsafe fn(GLuint, GLenum, *mut GLint),
        get_log: unsafe fn(GLuint, GLsizei, *mut GLsizei, *mut GLchar),
    ) -> String {
        let mut len: GLint = 0;
        unsafe { get_iv(id, gl::INFO_LOG_LENGTH, &mut len) };
        if len <= 0 {
            return String::new();
        }

        let mut buf = vec![0u8; len as usize];
        let mut written: GLsizei = 0;
        unsafe { get_log(id, len, &mut written, buf.as_mut_ptr().cast()) };
        buf.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn status(id: GLuint, pname: GLenum, get_iv: unsafe fn(GLuint, GLenum, *mut GLint)) -> bool {
        let mut ok: GLint = 0;
        unsafe { get_iv(id, pname, &mut ok) };
        ok != 0
    }
}

impl GraphicsDevice for GlDevice {
    fn create_shader(&self, stage: ShaderStage) -> Result<ObjectId, DeviceError> {
        let id = unsafe { gl::CreateShader(mapping::stage_enum(stage)) };
        if id == 0 {
            return Err(DeviceError::ObjectCreation(ObjectKind::Shader));
        }
        Ok(ObjectId(id))
    }

    fn shader_source(&self, shader: ObjectId, source: &str) {
        let ptr = source.as_ptr() as *const GLchar;
        let len = source.len() as GLint;
        unsafe { gl::ShaderSource(shader.0, 1, &ptr, &len) };
    }

    fn compile_shader(&self, shader: ObjectId) -> bool {
        unsafe { gl::CompileShader(shader.0) };
        Self::status(shader.0, gl::COMPILE_STATUS, gl::GetShaderiv)
    }

    fn shader_info_log(&self, shader: ObjectId) -> String {
        Self::read_log(shader.0, gl::GetShaderiv, gl::GetShaderInfoLog)
    }

    fn delete_shader(&self, shader: ObjectId) {
        unsafe { gl::DeleteShader(shader.0) };
    }

    fn create_program(&self) -> Result<ObjectId, DeviceError> {
        let id = unsafe { gl::CreateProgram() };
        if id == 0 {
            return Err(DeviceError::ObjectCreation(ObjectKind::Program));
        }
        Ok(ObjectId(id))
    }

    fn attach_shader(&self, program: ObjectId, shader: ObjectId) {
        unsafe { gl::AttachShader(program.0, shader.0) };
    }

    fn detach_shader(&self, program: ObjectId, shader: ObjectId) {
        unsafe { gl::DetachShader(program.0, shader.0) };
    }

    fn link_program(&self, program: ObjectId) -> bool {
        unsafe { gl::LinkProgram(program.0) };
        Self::status(program.0, gl::LINK_STATUS, gl::GetProgramiv)
    }

    fn validate_program(&self, program: ObjectId) -> bool {
        unsafe { gl::ValidateProgram(program.0) };
        Self::status(program.0, gl::VALIDATE_STATUS, gl::GetProgramiv)
    }

    fn program_info_log(&self, program: ObjectId) -> String {
        Self::read_log(program.0, gl::GetProgramiv, gl::GetProgramInfoLog)
    }

    fn use_program(&self, program: Option<ObjectId>) {
        unsafe { gl::UseProgram(program.map_or(0, |p| p.0)) };
    }

    fn delete_program(&self, program: ObjectId) {
        unsafe { gl::DeleteProgram(program.0) };
    }

    fn uniform_location(&self, program: ObjectId, name: &str) -> UniformLocation {
        let Ok(c_name) = CString::new(name) else {
            warn!(name, "uniform name contains a NUL byte");
            return UniformLocation::INVALID;
        };
        UniformLocation(unsafe { gl::GetUniformLocation(program.0, c_name.as_ptr()) })
    }

    fn set_uniform(&self, program: ObjectId, location: UniformLocation, value: &UniformValue) {
        if !location.is_valid() {
            return;
        }

        // Uniform writes target the current program; restore the caller's.
        let mut previous: GLint = 0;
        unsafe {
            gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut previous);
            if previous as GLuint != program.0 {
                gl::UseProgram(program.0);
            }

            let loc = location.0;
            match value {
                UniformValue::Int(v) => gl::Uniform1i(loc, *v),
                UniformValue::Float(v) => gl::Uniform1f(loc, *v),
                UniformValue::Vec2(v) => gl::Uniform2fv(loc, 1, v.as_ptr()),
                UniformValue::Vec3(v) => gl::Uniform3fv(loc, 1, v.as_ptr()),
                UniformValue::Vec4(v) => gl::Uniform4fv(loc, 1, v.as_ptr()),
                UniformValue::Mat4(m) => gl::UniformMatrix4fv(loc, 1, gl::FALSE, m.as_ptr()),
            }

            if previous as GLuint != program.0 {
                gl::UseProgram(previous as GLuint);
            }
        }
    }

    fn create_texture(&self) -> Result<ObjectId, DeviceError> {
        Self::gen_object(ObjectKind::Texture, gl::GenTextures)
    }

    fn bind_texture(&self, unit: Option<u32>, texture: Option<ObjectId>) {
        unsafe {
            if let Some(unit) = unit {
                gl::ActiveTexture(gl::TEXTURE0 + unit);
            }
            gl::BindTexture(gl::TEXTURE_2D, texture.map_or(0, |t| t.0));
        }
    }

    fn upload_texture_2d(&self, texture: ObjectId, desc: &TextureDescriptor, data: Option<&[u8]>) {
        if let Some(d) = data {
            if d.len() < desc.byte_len() {
                warn!(
                    %texture,
                    expected = desc.byte_len(),
                    actual = d.len(),
                    "texture data too short, upload skipped"
                );
                return;
            }
        }
        let pixels = data.map_or(ptr::null(), |d| d.as_ptr() as *const c_void);
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, texture.0);
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                mapping::internal_format_enum(desc.internal_format) as GLint,
                desc.width as GLsizei,
                desc.height as GLsizei,
                0,
                mapping::pixel_format_enum(desc.format),
                mapping::pixel_type_enum(desc.pixel_type),
                pixels,
            );
        }
    }

    fn set_texture_filters(&self, texture: ObjectId, min: TextureFilter, mag: TextureFilter) {
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, texture.0);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                mapping::filter_enum(min) as GLint,
            );
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MAG_FILTER,
                mapping::filter_enum(mag) as GLint,
            );
        }
    }

    fn set_texture_wrapping(&self, texture: ObjectId, s: Wrapping, t: Wrapping) {
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, texture.0);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, mapping::wrap_enum(s) as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, mapping::wrap_enum(t) as GLint);
        }
    }

    fn delete_texture(&self, texture: ObjectId) {
        unsafe { gl::DeleteTextures(1, &texture.0) };
    }

    fn create_framebuffer(&self) -> Result<ObjectId, DeviceError> {
        Self::gen_object(ObjectKind::Framebuffer, gl::GenFramebuffers)
    }

    fn bind_framebuffer(&self, target: FramebufferTarget, framebuffer: Option<ObjectId>) {
        unsafe {
            gl::BindFramebuffer(
                mapping::framebuffer_target_enum(target),
                framebuffer.map_or(0, |f| f.0),
            )
        };
    }

    fn attach_framebuffer_texture(
        &self,
        framebuffer: ObjectId,
        attachment: Attachment,
        texture: Option<ObjectId>,
    ) {
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, framebuffer.0);
            gl::FramebufferTexture2D(
                gl::FRAMEBUFFER,
                mapping::attachment_enum(attachment),
                gl::TEXTURE_2D,
                texture.map_or(0, |t| t.0),
                0,
            );
        }
    }

    fn set_draw_buffers(&self, framebuffer: ObjectId, color_indices: &[u32]) {
        let buffers: Vec<GLenum> = color_indices
            .iter()
            .map(|&i| mapping::attachment_enum(Attachment::Color(i)))
            .collect();
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, framebuffer.0);
            if buffers.is_empty() {
                gl::DrawBuffer(gl::NONE);
            } else {
                gl::DrawBuffers(buffers.len() as GLsizei, buffers.as_ptr());
            }
        }
    }

    fn check_framebuffer_status(&self, framebuffer: ObjectId) -> FramebufferStatus {
        let status = unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, framebuffer.0);
            gl::CheckFramebufferStatus(gl::FRAMEBUFFER)
        };
        mapping::status_from_enum(status)
    }

    fn delete_framebuffer(&self, framebuffer: ObjectId) {
        unsafe { gl::DeleteFramebuffers(1, &framebuffer.0) };
    }
}
