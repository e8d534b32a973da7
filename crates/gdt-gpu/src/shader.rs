//! A single shader stage.

use std::fmt;
use std::path::Path;

use gdt_device::{ObjectId, ShaderStage, SharedDevice};
use tracing::{debug, trace};

use crate::error::{GpuError, Result};
use crate::file::load_file;

/// One compiled pipeline stage.
///
/// `Uncreated -> Created -> Compiled`. A failed compile destroys the driver
/// object, so the shader is back to `Uncreated` with its log kept in
/// [`info_log`](Shader::info_log).
pub struct Shader {
    device: SharedDevice,
    stage: ShaderStage,
    handle: Option<ObjectId>,
    compiled: bool,
    info_log: String,
}

impl Shader {
    pub fn new(device: SharedDevice, stage: ShaderStage) -> Self {
        Self {
            device,
            stage,
            handle: None,
            compiled: false,
            info_log: String::new(),
        }
    }

    /// Allocate the driver object, releasing any previous one.
    pub fn create(&mut self) -> Result<()> {
        self.destroy();
        let id = self.device.create_shader(self.stage)?;
        debug!(stage = %self.stage, %id, "created shader");
        self.handle = Some(id);
        self.info_log.clear();
        Ok(())
    }

    pub fn load_from_source(&mut self, source: &str) -> Result<()> {
        let id = match self.handle {
            Some(id) => id,
            None => {
                self.create()?;
                self.handle.ok_or(GpuError::NotCreated("Shader"))?
            }
        };
        self.device.shader_source(id, source);
        self.compiled = false;
        Ok(())
    }

    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let source = load_file(path)?;
        self.load_from_source(&source)
    }

    /// Compile the loaded source. On failure the driver object is released
    /// and the compiler log is returned in the error.
    pub fn compile(&mut self) -> Result<()> {
        let id = self.handle.ok_or(GpuError::NotCreated("Shader"))?;
        if self.device.compile_shader(id) {
            trace!(stage = %self.stage, %id, "compiled shader");
            self.compiled = true;
            self.info_log.clear();
            return Ok(());
        }

        let log = self.device.shader_info_log(id);
        self.destroy();
        self.info_log = log.clone();
        Err(GpuError::ShaderCompilationFailed {
            stage: self.stage,
            log,
        })
    }

    /// Release the driver object. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if let Some(id) = self.handle.take() {
            self.device.delete_shader(id);
            trace!(stage = %self.stage, %id, "destroyed shader");
        }
        self.compiled = false;
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn handle(&self) -> Option<ObjectId> {
        self.handle
    }

    pub fn is_created(&self) -> bool {
        self.handle.is_some()
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Compiler output from the last failed compile, empty otherwise.
    pub fn info_log(&self) -> &str {
        &self.info_log
    }
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("stage", &self.stage)
            .field("handle", &self.handle)
            .field("compiled", &self.compiled)
            .finish()
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        self.destroy();
    }
}
