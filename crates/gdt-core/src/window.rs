//! The window system the renderer runs inside.
//!
//! Window creation and the event loop belong to the windowing library. This
//! module fixes the contract the rest of the workspace relies on: how a
//! window is configured, how creation fails, and where input goes.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use thiserror::Error;

use crate::inputs::InputListeners;

/// OpenGL context version requested from the windowing library.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GlContextVersion {
    pub major: u32,
    pub minor: u32,
    pub core_profile: bool,
}

impl Default for GlContextVersion {
    fn default() -> Self {
        Self {
            major: 3,
            minor: 3,
            core_profile: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub gl: GlContextVersion,
    pub resizable: bool,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "gdt".to_string(),
            width: 1280,
            height: 720,
            gl: GlContextVersion::default(),
            resizable: true,
            vsync: true,
        }
    }
}

impl WindowSettings {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_gl_version(mut self, major: u32, minor: u32, core_profile: bool) -> Self {
        self.gl = GlContextVersion {
            major,
            minor,
            core_profile,
        };
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }
}

/// Window creation failures. There is no retry; callers treat these as
/// fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("Failed to initialize the windowing library: {0}")]
    InitFailed(String),

    #[error("Failed to create window: {0}")]
    CreationFailed(String),
}

/// A window plus its GL context, driven by the application's frame loop.
pub trait WindowSystem {
    /// Create the window and make its GL context current.
    fn create(&mut self, settings: &WindowSettings) -> Result<(), WindowError>;

    /// Swap buffers and poll events; polled events go to
    /// [`listeners_mut`](WindowSystem::listeners_mut).
    fn update(&mut self);

    fn should_close(&self) -> bool;

    fn close(&mut self);

    fn destroy(&mut self);

    /// Hide and capture the cursor (`true`) or restore it.
    fn lock_cursor(&mut self, lock: bool);

    /// Current framebuffer size in pixels.
    fn size(&self) -> (u32, u32);

    fn listeners_mut(&mut self) -> &mut InputListeners;
}

/// Error codes the windowing library reports through its error callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum WindowErrorCode {
    NotInitialized = 0x0001_0001,
    NoCurrentContext = 0x0001_0002,
    InvalidEnum = 0x0001_0003,
    InvalidValue = 0x0001_0004,
    OutOfMemory = 0x0001_0005,
    ApiUnavailable = 0x0001_0006,
    VersionUnavailable = 0x0001_0007,
    PlatformError = 0x0001_0008,
    FormatUnavailable = 0x0001_0009,
}

impl WindowErrorCode {
    pub fn description(self) -> &'static str {
        match self {
            Self::NotInitialized => {
                "A window function was called while the window was not initialized"
            }
            Self::NoCurrentContext => {
                "A window function was called that depends on OpenGL, but no GL context is set"
            }
            Self::InvalidEnum => "A window function was called with an invalid argument enum",
            Self::InvalidValue => "A window function was called with an invalid argument value",
            Self::OutOfMemory => "A window function caused a failed memory allocation",
            Self::ApiUnavailable => "The window could not find support for the requested API",
            Self::VersionUnavailable => {
                "The requested OpenGL version is not available on this machine"
            }
            Self::PlatformError => "A window function caused a platform error",
            Self::FormatUnavailable => {
                "The requested pixel format is not supported or the clipboard contents could not be converted"
            }
        }
    }
}

/// A decoded error callback, handed back to the application instead of
/// being printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDiagnostic {
    pub code: Option<WindowErrorCode>,
    pub raw_code: i32,
    pub message: String,
}

impl WindowDiagnostic {
    pub fn from_callback(raw_code: i32, message: &str) -> Self {
        Self {
            code: WindowErrorCode::from_i32(raw_code),
            raw_code,
            message: message.to_string(),
        }
    }

    pub fn description(&self) -> &'static str {
        self.code
            .map(WindowErrorCode::description)
            .unwrap_or("Unknown window system error")
    }
}

impl std::fmt::Display for WindowDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:#x}): {}", self.description(), self.raw_code, self.message)
    }
}
