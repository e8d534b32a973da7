//! A [`GraphicsDevice`] with no driver behind it.
//!
//! [`HeadlessDevice`] hands out object ids, records every call it receives
//! and simulates enough driver behavior for resource code to be exercised
//! without a GL context: a brace-level GLSL syntax check, link rules,
//! uniform discovery and framebuffer completeness.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::{trace, warn};

use crate::device::{DeviceError, GraphicsDevice, ObjectId, ObjectKind, UniformLocation};
use crate::types::{
    Attachment, FramebufferStatus, FramebufferTarget, ShaderStage, TextureDescriptor,
    TextureFilter, UniformValue, Wrapping,
};

/// One call received by a [`HeadlessDevice`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    CreateShader(ObjectId, ShaderStage),
    ShaderSource(ObjectId),
    CompileShader(ObjectId),
    DeleteShader(ObjectId),
    CreateProgram(ObjectId),
    AttachShader {
        program: ObjectId,
        shader: ObjectId,
    },
    DetachShader {
        program: ObjectId,
        shader: ObjectId,
    },
    LinkProgram(ObjectId),
    ValidateProgram(ObjectId),
    UseProgram(Option<ObjectId>),
    DeleteProgram(ObjectId),
    SetUniform {
        program: ObjectId,
        location: UniformLocation,
        value: UniformValue,
    },
    CreateTexture(ObjectId),
    BindTexture {
        unit: Option<u32>,
        texture: Option<ObjectId>,
    },
    UploadTexture {
        texture: ObjectId,
        desc: TextureDescriptor,
        /// Length of the supplied pixel data, if any.
        bytes: Option<usize>,
    },
    SetTextureFilters {
        texture: ObjectId,
        min: TextureFilter,
        mag: TextureFilter,
    },
    SetTextureWrapping {
        texture: ObjectId,
        s: Wrapping,
        t: Wrapping,
    },
    DeleteTexture(ObjectId),
    CreateFramebuffer(ObjectId),
    BindFramebuffer {
        target: FramebufferTarget,
        framebuffer: Option<ObjectId>,
    },
    AttachTexture {
        framebuffer: ObjectId,
        attachment: Attachment,
        texture: Option<ObjectId>,
    },
    SetDrawBuffers {
        framebuffer: ObjectId,
        indices: Vec<u32>,
    },
    CheckFramebufferStatus(ObjectId),
    DeleteFramebuffer(ObjectId),
}

#[derive(Debug)]
struct ShaderObject {
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct ProgramObject {
    attached: Vec<ObjectId>,
    linked: bool,
    log: String,
    uniforms: Vec<String>,
}

#[derive(Debug, Default)]
struct FramebufferObject {
    attachments: HashMap<Attachment, ObjectId>,
    draw_buffers: Vec<u32>,
}

#[derive(Debug)]
struct State {
    next_id: u32,
    calls: Vec<DeviceCall>,
    shaders: HashMap<ObjectId, ShaderObject>,
    programs: HashMap<ObjectId, ProgramObject>,
    /// Texture id to its storage, once uploaded.
    textures: HashMap<ObjectId, Option<TextureDescriptor>>,
    framebuffers: HashMap<ObjectId, FramebufferObject>,
    current_program: Option<ObjectId>,
    created: usize,
    deleted: usize,
    forced_link_failure: Option<String>,
    forced_validation_failure: Option<String>,
    forced_creation_failure: Option<ObjectKind>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            next_id: 1,
            calls: Vec::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            textures: HashMap::new(),
            framebuffers: HashMap::new(),
            current_program: None,
            created: 0,
            deleted: 0,
            forced_link_failure: None,
            forced_validation_failure: None,
            forced_creation_failure: None,
        }
    }
}

impl State {
    fn allocate(&mut self, kind: ObjectKind) -> Result<ObjectId, DeviceError> {
        if self.forced_creation_failure == Some(kind) {
            self.forced_creation_failure = None;
            return Err(DeviceError::ObjectCreation(kind));
        }
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.created += 1;
        trace!(%kind, %id, "created");
        Ok(id)
    }

    fn released<T>(&mut self, kind: ObjectKind, id: ObjectId, removed: Option<T>) {
        if removed.is_some() {
            self.deleted += 1;
            trace!(%kind, %id, "deleted");
        } else {
            warn!(%kind, %id, "delete of unknown object ignored");
        }
    }
}

/// Records calls and simulates driver objects. See the module docs.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    state: RefCell<State>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&DeviceCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|&c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Objects handed out over the device's lifetime.
    pub fn created_objects(&self) -> usize {
        self.state.borrow().created
    }

    /// Objects actually released. Deletes of unknown ids are not counted.
    pub fn deleted_objects(&self) -> usize {
        self.state.borrow().deleted
    }

    pub fn live_objects(&self) -> usize {
        let s = self.state.borrow();
        s.shaders.len() + s.programs.len() + s.textures.len() + s.framebuffers.len()
    }

    /// Make the next link fail with `log`, whatever the shaders say.
    pub fn fail_next_link(&self, log: impl Into<String>) {
        self.state.borrow_mut().forced_link_failure = Some(log.into());
    }

    /// Make the next validation fail with `log`. Link state is untouched.
    pub fn fail_next_validate(&self, log: impl Into<String>) {
        self.state.borrow_mut().forced_validation_failure = Some(log.into());
    }

    /// Make the next creation of a `kind` object fail.
    pub fn fail_next_create(&self, kind: ObjectKind) {
        self.state.borrow_mut().forced_creation_failure = Some(kind);
    }

    pub fn current_program(&self) -> Option<ObjectId> {
        self.state.borrow().current_program
    }

    pub fn texture_storage(&self, texture: ObjectId) -> Option<TextureDescriptor> {
        self.state.borrow().textures.get(&texture).copied().flatten()
    }

    pub fn attachment(&self, framebuffer: ObjectId, attachment: Attachment) -> Option<ObjectId> {
        self.state
            .borrow()
            .framebuffers
            .get(&framebuffer)
            .and_then(|f| f.attachments.get(&attachment).copied())
    }

    pub fn draw_buffers(&self, framebuffer: ObjectId) -> Vec<u32> {
        self.state
            .borrow()
            .framebuffers
            .get(&framebuffer)
            .map(|f| f.draw_buffers.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: DeviceCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

/// Brace-level syntax check in the shape of a driver compile log.
///
/// Preprocessor lines and line comments are skipped. A closing brace must
/// follow a statement end or another brace, and braces must balance.
fn check_glsl(source: &str) -> Result<(), String> {
    if source.trim().is_empty() {
        return Err("0(0) : error C0000: syntax error, unexpected end of file".to_string());
    }

    let mut depth = 0i32;
    let mut last = None;
    let mut line_no = 0;
    for (n, line) in source.lines().enumerate() {
        line_no = n + 1;
        let code = line.split("//").next().unwrap_or_default();
        if code.trim_start().starts_with('#') {
            continue;
        }
        for c in code.chars().filter(|c| !c.is_whitespace()) {
            match c {
                '{' => depth += 1,
                '}' => {
                    if !matches!(last, Some(';' | '{' | '}')) {
                        return Err(format!(
                            "0({line_no}) : error C0000: syntax error, unexpected '}}', expecting ',' or ';' at token \"}}\""
                        ));
                    }
                    depth -= 1;
                    if depth < 0 {
                        return Err(format!(
                            "0({line_no}) : error C0000: syntax error, unexpected '}}' at token \"}}\""
                        ));
                    }
                }
                _ => {}
            }
            last = Some(c);
        }
    }

    if depth != 0 {
        return Err(format!(
            "0({line_no}) : error C0000: syntax error, unexpected end of file"
        ));
    }
    Ok(())
}

/// Names declared with the `uniform` qualifier, in declaration order.
fn declared_uniforms(source: &str, names: &mut Vec<String>) {
    for statement in source.split(';') {
        let mut tokens = statement
            .split_whitespace()
            .skip_while(|t| *t != "uniform");
        if tokens.next().is_none() {
            continue;
        }
        let rest: Vec<&str> = tokens
            .filter(|t| !matches!(*t, "lowp" | "mediump" | "highp"))
            .collect();
        let Some(raw) = rest.get(1) else { continue };
        let name = raw
            .split(|c| matches!(c, '[' | '=' | ','))
            .next()
            .unwrap_or_default();
        if name.is_empty() || name.contains('{') {
            continue;
        }
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn create_shader(&self, stage: ShaderStage) -> Result<ObjectId, DeviceError> {
        let mut s = self.state.borrow_mut();
        let id = s.allocate(ObjectKind::Shader)?;
        s.shaders.insert(
            id,
            ShaderObject {
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        s.calls.push(DeviceCall::CreateShader(id, stage));
        Ok(id)
    }

    fn shader_source(&self, shader: ObjectId, source: &str) {
        let mut s = self.state.borrow_mut();
        s.calls.push(DeviceCall::ShaderSource(shader));
        if let Some(obj) = s.shaders.get_mut(&shader) {
            obj.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: ObjectId) -> bool {
        let mut s = self.state.borrow_mut();
        s.calls.push(DeviceCall::CompileShader(shader));
        let Some(obj) = s.shaders.get_mut(&shader) else {
            return false;
        };
        match check_glsl(&obj.source) {
            Ok(()) => {
                obj.compiled = true;
                obj.log.clear();
            }
            Err(log) => {
                obj.compiled = false;
                obj.log = log;
            }
        }
        obj.compiled
    }

    fn shader_info_log(&self, shader: ObjectId) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ObjectId) {
        let mut s = self.state.borrow_mut();
        s.calls.push(DeviceCall::DeleteShader(shader));
        let removed = s.shaders.remove(&shader);
        s.released(ObjectKind::Shader, shader, removed);
    }

    fn create_program(&self) -> Result<ObjectId, DeviceError> {
        let mut s = self.state.borrow_mut();
        let id = s.allocate(ObjectKind::Program)?;
        s.programs.insert(id, ProgramObject::default());
        s.calls.push(DeviceCall::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: ObjectId, shader: ObjectId) {
        let mut s = self.state.borrow_mut();
        s.calls.push(DeviceCall::AttachShader { program, shader });
        if let Some(p) = s.programs.get_mut(&program) {
            if !p.attached.contains(&shader) {
                p.attached.push(shader);
            }
        }
    }

    fn detach_shader(&self, program: ObjectId, shader: ObjectId) {
        let mut s = self.state.borrow_mut();
        s.calls.push(DeviceCall::DetachShader { program, shader });
        if let Some(p) = s.programs.get_mut(&program) {
            p.attached.retain(|&a| a != shader);
        }
    }

    fn link_program(&self, program: ObjectId) -> bool {
        let mut s = self.state.borrow_mut();
        s.calls.push(DeviceCall::LinkProgram(program));
        let forced = s.forced_link_failure.take();

        let Some(p) = s.programs.get(&program) else {
            return false;
        };
        let mut uniforms = Vec::new();
        let outcome = if let Some(log) = forced {
            Err(log)
        } else if p.attached.is_empty() {
            Err("error: no shaders attached to the program".to_string())
        } else {
            p.attached.iter().try_for_each(|id| match s.shaders.get(id) {
                Some(sh) if sh.compiled => {
                    declared_uniforms(&sh.source, &mut uniforms);
                    Ok(())
                }
                _ => Err(format!("error: attached shader {id} is not compiled")),
            })
        };

        let Some(p) = s.programs.get_mut(&program) else {
            return false;
        };
        match outcome {
            Ok(()) => {
                p.linked = true;
                p.log.clear();
                p.uniforms = uniforms;
            }
            Err(log) => {
                p.linked = false;
                p.log = log;
                p.uniforms.clear();
            }
        }
        p.linked
    }

    fn validate_program(&self, program: ObjectId) -> bool {
        let mut s = self.state.borrow_mut();
        s.calls.push(DeviceCall::ValidateProgram(program));
        let forced = s.forced_validation_failure.take();
        let Some(p) = s.programs.get_mut(&program) else {
            return false;
        };
        if let Some(log) = forced {
            p.log = log;
            return false;
        }
        if !p.linked {
            p.log = "Validation failed: program is not successfully linked".to_string();
        }
        p.linked
    }

    fn program_info_log(&self, program: ObjectId) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: Option<ObjectId>) {
        let mut s = self.state.borrow_mut();
        s.calls.push(DeviceCall::UseProgram(program));
        s.current_program = program;
    }

    fn delete_program(&self, program: ObjectId) {
        let mut s = self.state.borrow_mut();
        s.calls.push(DeviceCall::DeleteProgram(program));
        if s.current_program == Some(program) {
            s.current_program = None;
        }
        let removed = s.programs.remove(&program);
        s.released(ObjectKind::Program, program, removed);
    }

    fn uniform_location(&self, program: ObjectId, name: &str) -> UniformLocation {
        let s = self.state.borrow();
        s.programs
            .get(&program)
            .filter(|p| p.linked)
            .and_then(|p| p.uniforms.iter().position(|u| u == name))
            .map_or(UniformLocation::INVALID, |i| UniformLocation(i as i32))
    }

    fn set_uniform(&self, program: ObjectId, location: UniformLocation, value: &UniformValue) {
        self.record(DeviceCall::SetUniform {
            program,
            location,
            value: *value,
        });
    }

    fn create_texture(&self) -> Result<ObjectId, DeviceError> {
        let mut s = self.state.borrow_mut();
        let id = s.allocate(ObjectKind::Texture)?;
        s.textures.insert(id, None);
        s.calls.push(DeviceCall::CreateTexture(id));
        Ok(id)
    }

    fn bind_texture(&self, unit: Option<u32>, texture: Option<ObjectId>) {
        self.record(DeviceCall::BindTexture { unit, texture });
    }

    fn upload_texture_2d(&self, texture: ObjectId, desc: &TextureDescriptor, data: Option<&[u8]>) {
        let mut s = self.state.borrow_mut();
        s.calls.push(DeviceCall::UploadTexture {
            texture,
            desc: *desc,
            bytes: data.map(<[u8]>::len),
        });
        if data.is_some_and(|d| d.len() < desc.byte_len()) {
            warn!(%texture, "texture data too short, upload skipped");
            return;
        }
        if let Some(storage) = s.textures.get_mut(&texture) {
            *storage = Some(*desc);
        }
    }

    fn set_texture_filters(&self, texture: ObjectId, min: TextureFilter, mag: TextureFilter) {
        self.record(DeviceCall::SetTextureFilters { texture, min, mag });
    }

    fn set_texture_wrapping(&self, texture: ObjectId, s: Wrapping, t: Wrapping) {
        self.record(DeviceCall::SetTextureWrapping { texture, s, t });
    }

    fn delete_texture(&self, texture: ObjectId) {
        let mut s = self.state.borrow_mut();
        s.calls.push(DeviceCall::DeleteTexture(texture));
        let removed = s.textures.remove(&texture);
        s.released(ObjectKind::Texture, texture, removed);
    }

    fn create_framebuffer(&self) -> Result<ObjectId, DeviceError> {
        let mut s = self.state.borrow_mut();
        let id = s.allocate(ObjectKind::Framebuffer)?;
        s.framebuffers.insert(id, FramebufferObject::default());
        s.calls.push(DeviceCall::CreateFramebuffer(id));
        Ok(id)
    }

    fn bind_framebuffer(&self, target: FramebufferTarget, framebuffer: Option<ObjectId>) {
        self.record(DeviceCall::BindFramebuffer {
            target,
            framebuffer,
        });
    }

    fn attach_framebuffer_texture(
        &self,
        framebuffer: ObjectId,
        attachment: Attachment,
        texture: Option<ObjectId>,
    ) {
        let mut s = self.state.borrow_mut();
        s.calls.push(DeviceCall::AttachTexture {
            framebuffer,
            attachment,
            texture,
        });
        if let Some(fb) = s.framebuffers.get_mut(&framebuffer) {
            match texture {
                Some(t) => fb.attachments.insert(attachment, t),
                None => fb.attachments.remove(&attachment),
            };
        }
    }

    fn set_draw_buffers(&self, framebuffer: ObjectId, color_indices: &[u32]) {
        let mut s = self.state.borrow_mut();
        s.calls.push(DeviceCall::SetDrawBuffers {
            framebuffer,
            indices: color_indices.to_vec(),
        });
        if let Some(fb) = s.framebuffers.get_mut(&framebuffer) {
            fb.draw_buffers = color_indices.to_vec();
        }
    }

    fn check_framebuffer_status(&self, framebuffer: ObjectId) -> FramebufferStatus {
        let mut s = self.state.borrow_mut();
        s.calls.push(DeviceCall::CheckFramebufferStatus(framebuffer));
        let Some(fb) = s.framebuffers.get(&framebuffer) else {
            return FramebufferStatus::Undefined;
        };

        if fb.attachments.is_empty() {
            return FramebufferStatus::MissingAttachment;
        }
        let has_storage = |t: &ObjectId| matches!(s.textures.get(t), Some(Some(_)));
        if !fb.attachments.values().all(has_storage) {
            return FramebufferStatus::IncompleteAttachment;
        }
        if fb
            .draw_buffers
            .iter()
            .any(|&i| !fb.attachments.contains_key(&Attachment::Color(i)))
        {
            return FramebufferStatus::IncompleteDrawBuffer;
        }
        FramebufferStatus::Complete
    }

    fn delete_framebuffer(&self, framebuffer: ObjectId) {
        let mut s = self.state.borrow_mut();
        s.calls.push(DeviceCall::DeleteFramebuffer(framebuffer));
        let removed = s.framebuffers.remove(&framebuffer);
        s.released(ObjectKind::Framebuffer, framebuffer, removed);
    }
}
