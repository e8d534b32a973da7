//! Error taxonomy for resource lifecycles.

use std::io;
use std::path::PathBuf;

use gdt_device::{DeviceError, ShaderStage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpuError {
    #[error("File not found: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The driver rejected a shader. `log` is the compiler output verbatim.
    #[error("{stage} shader compilation failed:\n{log}")]
    ShaderCompilationFailed { stage: ShaderStage, log: String },

    #[error("Shader program link failed:\n{log}")]
    ShaderLinkFailed { log: String },

    /// A program could not be assembled; the program was torn down first.
    #[error("Shader loading failed: {0}")]
    ShaderLoadingFailed(#[source] Box<GpuError>),

    #[error("{0} used before create()")]
    NotCreated(&'static str),

    #[error("Texture data is {actual} bytes, the upload needs {expected}")]
    TextureDataTooShort { expected: usize, actual: usize },

    #[error("Color attachment {index} is out of range, only [0-{max}] are available")]
    ColorAttachmentOutOfRange { index: u32, max: u32 },

    #[error(transparent)]
    Device(#[from] DeviceError),
}

impl GpuError {
    /// Driver diagnostic text carried by this error or the one it wraps.
    pub fn driver_log(&self) -> Option<&str> {
        match self {
            Self::ShaderCompilationFailed { log, .. } | Self::ShaderLinkFailed { log } => {
                Some(log.as_str())
            }
            Self::ShaderLoadingFailed(inner) => inner.driver_log(),
            _ => None,
        }
    }

    /// The innermost error behind any `ShaderLoadingFailed` wrapping.
    pub fn root(&self) -> &GpuError {
        match self {
            Self::ShaderLoadingFailed(inner) => inner.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, GpuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_failure_exposes_the_inner_log() {
        let err = GpuError::ShaderLoadingFailed(Box::new(GpuError::ShaderCompilationFailed {
            stage: ShaderStage::Fragment,
            log: "0(3) : error".to_string(),
        }));
        assert_eq!(err.driver_log(), Some("0(3) : error"));
        assert!(matches!(
            err.root(),
            GpuError::ShaderCompilationFailed {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
        assert!(err.to_string().contains("Fragment shader compilation failed"));
    }

    #[test]
    fn device_errors_convert() {
        let err: GpuError = DeviceError::Loader("missing".to_string()).into();
        assert!(err.driver_log().is_none());
        assert_eq!(
            err.to_string(),
            "Failed to load OpenGL function pointers: missing"
        );
    }
}
