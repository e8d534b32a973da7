//! Linked shader programs and their uniforms.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use gdt_core::{Matrix4f, Vector2f, Vector3f, Vector4f};
use gdt_device::{ObjectId, ShaderStage, SharedDevice, UniformLocation, UniformValue};
use tracing::{debug, trace, warn};

use crate::error::{GpuError, Result};
use crate::shader::Shader;

/// A program assembled from attached [`Shader`]s.
///
/// The program owns its shaders until [`build`](ShaderProgram::build) links
/// it, after which the shader objects are detached and released. Any
/// failure while loading or building tears the whole program down before
/// the error is returned.
pub struct ShaderProgram {
    device: SharedDevice,
    handle: Option<ObjectId>,
    shaders: Vec<Shader>,
    linked: bool,
    validated: bool,
    error_log: Vec<String>,
    uniforms: RefCell<HashMap<String, UniformLocation>>,
}

impl ShaderProgram {
    pub fn new(device: SharedDevice) -> Self {
        Self {
            device,
            handle: None,
            shaders: Vec::new(),
            linked: false,
            validated: false,
            error_log: Vec::new(),
            uniforms: RefCell::new(HashMap::new()),
        }
    }

    /// Start over with a fresh driver program.
    pub fn create(&mut self) -> Result<()> {
        self.destroy();
        self.error_log.clear();
        let id = self.device.create_program()?;
        debug!(%id, "created shader program");
        self.handle = Some(id);
        Ok(())
    }

    /// Compile-ready vertex and fragment sources in one go.
    pub fn load_from_sources(&mut self, vertex: &str, fragment: &str) -> Result<()> {
        self.create().map_err(|e| self.fail(e))?;
        self.add_shader_from_source(ShaderStage::Vertex, vertex)?;
        self.add_shader_from_source(ShaderStage::Fragment, fragment)?;
        self.build()
    }

    pub fn load_from_files(
        &mut self,
        vertex: impl AsRef<Path>,
        fragment: impl AsRef<Path>,
    ) -> Result<()> {
        self.create().map_err(|e| self.fail(e))?;
        self.add_shader_from_file(ShaderStage::Vertex, vertex)?;
        self.add_shader_from_file(ShaderStage::Fragment, fragment)?;
        self.build()
    }

    pub fn add_shader_from_source(&mut self, stage: ShaderStage, source: &str) -> Result<()> {
        self.attach_new(stage, |shader| shader.load_from_source(source))
            .map_err(|e| self.fail(e))
    }

    pub fn add_shader_from_file(
        &mut self,
        stage: ShaderStage,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        self.attach_new(stage, |shader| shader.load_from_file(path))
            .map_err(|e| self.fail(e))
    }

    fn attach_new(
        &mut self,
        stage: ShaderStage,
        load: impl FnOnce(&mut Shader) -> Result<()>,
    ) -> Result<()> {
        let program = match self.handle {
            Some(id) => id,
            None => {
                self.create()?;
                self.handle.ok_or(GpuError::NotCreated("ShaderProgram"))?
            }
        };

        let mut shader = Shader::new(self.device.clone(), stage);
        load(&mut shader)?;
        let id = shader.handle().ok_or(GpuError::NotCreated("Shader"))?;
        self.device.attach_shader(program, id);
        trace!(%program, shader = %id, %stage, "attached shader");
        self.shaders.push(shader);
        Ok(())
    }

    /// Compile every attached shader, link, validate, then release the
    /// shader objects.
    pub fn build(&mut self) -> Result<()> {
        self.compile_and_link().map_err(|e| self.fail(e))?;
        self.validate();
        self.release_shaders();
        Ok(())
    }

    fn compile_and_link(&mut self) -> Result<()> {
        if self.handle.is_none() {
            return Err(GpuError::NotCreated("ShaderProgram"));
        }
        for shader in &mut self.shaders {
            shader.compile()?;
        }
        self.link()
    }

    /// Link the attached shaders. A failed link destroys the program.
    pub fn link(&mut self) -> Result<()> {
        let id = self.handle.ok_or(GpuError::NotCreated("ShaderProgram"))?;
        self.uniforms.borrow_mut().clear();
        if self.device.link_program(id) {
            debug!(%id, "linked shader program");
            self.linked = true;
            return Ok(());
        }

        let log = self.device.program_info_log(id);
        self.destroy();
        Err(GpuError::ShaderLinkFailed { log })
    }

    /// Ask the driver whether the program can run in the current state.
    /// Advisory: a failure is logged and recorded but never an error.
    pub fn validate(&mut self) -> bool {
        let Some(id) = self.handle else {
            return false;
        };
        self.validated = self.device.validate_program(id);
        if !self.validated {
            let log = self.device.program_info_log(id);
            warn!(%id, %log, "shader program failed validation");
            self.error_log.push(log);
        }
        self.validated
    }

    fn release_shaders(&mut self) {
        let Some(program) = self.handle else {
            return;
        };
        for shader in self.shaders.drain(..) {
            if let Some(id) = shader.handle() {
                self.device.detach_shader(program, id);
            }
        }
    }

    fn fail(&mut self, err: GpuError) -> GpuError {
        debug!(error = %err, "tearing down shader program");
        if let Some(log) = err.driver_log() {
            self.error_log.push(log.to_string());
        }
        self.destroy();
        match err {
            GpuError::ShaderLoadingFailed(_) => err,
            other => GpuError::ShaderLoadingFailed(Box::new(other)),
        }
    }

    /// Every diagnostic collected since the last `create`, one per line.
    pub fn error_report(&self) -> String {
        self.error_log.join("\n")
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn handle(&self) -> Option<ObjectId> {
        self.handle
    }

    /// Shaders still attached, i.e. not yet built.
    pub fn attached_shaders(&self) -> &[Shader] {
        &self.shaders
    }

    /// Make this program current.
    pub fn bind(&self) {
        debug_assert!(self.linked, "binding a shader program that is not linked");
        match self.handle {
            Some(id) => self.device.use_program(Some(id)),
            None => warn!("bind on a shader program that was never created"),
        }
    }

    pub fn release(&self) {
        self.device.use_program(None);
    }

    fn location(&self, name: &str) -> Option<(ObjectId, UniformLocation)> {
        let id = self.handle?;
        let cached = self.uniforms.borrow().get(name).copied();
        if let Some(loc) = cached {
            return Some((id, loc));
        }

        let loc = self.device.uniform_location(id, name);
        if !loc.is_valid() {
            trace!(uniform = name, "uniform is not active in the program");
        }
        self.uniforms.borrow_mut().insert(name.to_string(), loc);
        Some((id, loc))
    }

    /// Set a uniform by name. Names the program does not use are forwarded
    /// with an invalid location, which the driver ignores.
    pub fn set_uniform(&self, name: &str, value: impl Into<UniformValue>) {
        match self.location(name) {
            Some((id, loc)) => self.device.set_uniform(id, loc, &value.into()),
            None => warn!(uniform = name, "uniform set on a shader program that was never created"),
        }
    }

    pub fn uniform_1i(&self, name: &str, value: i32) {
        self.set_uniform(name, value);
    }

    pub fn uniform_1f(&self, name: &str, value: f32) {
        self.set_uniform(name, value);
    }

    pub fn uniform_2f(&self, name: &str, x: f32, y: f32) {
        self.set_uniform(name, Vector2f::new(x, y));
    }

    pub fn uniform_3f(&self, name: &str, x: f32, y: f32, z: f32) {
        self.set_uniform(name, Vector3f::new(x, y, z));
    }

    pub fn uniform_4f(&self, name: &str, x: f32, y: f32, z: f32, w: f32) {
        self.set_uniform(name, Vector4f::new(x, y, z, w));
    }

    pub fn uniform_matrix_4f(&self, name: &str, value: &Matrix4f) {
        self.set_uniform(name, value);
    }

    /// Release the program and any shaders still attached. Safe to call
    /// repeatedly.
    pub fn destroy(&mut self) {
        self.release_shaders();
        if let Some(id) = self.handle.take() {
            self.device.delete_program(id);
            trace!(%id, "destroyed shader program");
        }
        self.linked = false;
        self.validated = false;
        self.uniforms.borrow_mut().clear();
    }
}

impl fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("handle", &self.handle)
            .field("shaders", &self.shaders)
            .field("linked", &self.linked)
            .field("validated", &self.validated)
            .finish()
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.destroy();
    }
}
