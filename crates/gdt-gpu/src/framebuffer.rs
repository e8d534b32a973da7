//! Framebuffer objects and their attachment records.

use std::fmt;

use gdt_device::{Attachment, FramebufferStatus, FramebufferTarget, ObjectId, SharedDevice};
use tracing::{debug, trace, warn};

use crate::error::{GpuError, Result};
use crate::texture::Texture2D;

pub const MAX_COLOR_ATTACHMENTS: u32 = 8;

/// A framebuffer with up to [`MAX_COLOR_ATTACHMENTS`] color textures and a
/// single depth or depth-stencil texture.
///
/// Attachments are recorded by texture handle only; the textures stay owned
/// by whoever created them and must outlive their use here.
pub struct Framebuffer {
    device: SharedDevice,
    handle: Option<ObjectId>,
    color: [Option<ObjectId>; MAX_COLOR_ATTACHMENTS as usize],
    /// `Attachment::Depth` or `Attachment::DepthStencil`.
    depth: Option<(Attachment, ObjectId)>,
}

impl Framebuffer {
    pub fn new(device: SharedDevice) -> Self {
        Self {
            device,
            handle: None,
            color: [None; MAX_COLOR_ATTACHMENTS as usize],
            depth: None,
        }
    }

    pub fn create(&mut self) -> Result<()> {
        self.destroy();
        let id = self.device.create_framebuffer()?;
        debug!(%id, "created framebuffer");
        self.handle = Some(id);
        Ok(())
    }

    fn require(&self, op: &'static str) -> Result<ObjectId> {
        self.handle.ok_or_else(|| {
            warn!(op, "framebuffer used before create()");
            GpuError::NotCreated("Framebuffer")
        })
    }

    fn texture_handle(texture: &Texture2D) -> Result<ObjectId> {
        texture.handle().ok_or_else(|| {
            warn!("attaching a texture that was never created");
            GpuError::NotCreated("Texture2D")
        })
    }

    pub fn bind(&self, target: FramebufferTarget) -> Result<()> {
        let id = self.require("bind")?;
        self.device.bind_framebuffer(target, Some(id));
        Ok(())
    }

    /// Return to the default framebuffer.
    pub fn release(&self) {
        self.device.bind_framebuffer(FramebufferTarget::Both, None);
    }

    /// Attach `texture` at color slot `index` and draw into every attached
    /// color slot. Indices past the last slot are refused without touching
    /// the driver or the record.
    pub fn add_color_texture(&mut self, index: u32, texture: &Texture2D) -> Result<()> {
        if index >= MAX_COLOR_ATTACHMENTS {
            warn!(index, max = MAX_COLOR_ATTACHMENTS - 1, "color attachment index out of range");
            return Err(GpuError::ColorAttachmentOutOfRange {
                index,
                max: MAX_COLOR_ATTACHMENTS - 1,
            });
        }
        let id = self.require("add_color_texture")?;
        let tex = Self::texture_handle(texture)?;

        self.device
            .attach_framebuffer_texture(id, Attachment::Color(index), Some(tex));
        self.color[index as usize] = Some(tex);
        trace!(%id, index, texture = %tex, "attached color texture");

        let active: Vec<u32> = (0..MAX_COLOR_ATTACHMENTS)
            .filter(|&i| self.color[i as usize].is_some())
            .collect();
        self.device.set_draw_buffers(id, &active);
        Ok(())
    }

    pub fn add_depth_texture(&mut self, texture: &Texture2D) -> Result<()> {
        self.set_depth(Attachment::Depth, texture)
    }

    pub fn add_depth_stencil_texture(&mut self, texture: &Texture2D) -> Result<()> {
        self.set_depth(Attachment::DepthStencil, texture)
    }

    /// The depth slot holds one texture; the latest call wins and clears the
    /// other attachment point.
    fn set_depth(&mut self, point: Attachment, texture: &Texture2D) -> Result<()> {
        let id = self.require("add_depth_texture")?;
        let tex = Self::texture_handle(texture)?;

        if let Some((previous, _)) = self.depth {
            if previous != point {
                self.device.attach_framebuffer_texture(id, previous, None);
            }
        }
        self.device.attach_framebuffer_texture(id, point, Some(tex));
        self.depth = Some((point, tex));
        trace!(%id, ?point, texture = %tex, "attached depth texture");
        Ok(())
    }

    /// Draw into the first `count` color slots.
    pub fn set_draw_buffer_count(&mut self, count: u32) -> Result<()> {
        if count > MAX_COLOR_ATTACHMENTS {
            warn!(count, "more draw buffers than color attachments");
            return Err(GpuError::ColorAttachmentOutOfRange {
                index: count - 1,
                max: MAX_COLOR_ATTACHMENTS - 1,
            });
        }
        let id = self.require("set_draw_buffer_count")?;
        let buffers: Vec<u32> = (0..count).collect();
        self.device.set_draw_buffers(id, &buffers);
        Ok(())
    }

    /// Ask the driver whether the framebuffer is complete. An incomplete
    /// status is returned, not raised; [`FramebufferStatus::diagnostic`]
    /// explains it.
    pub fn validate(&self) -> Result<FramebufferStatus> {
        let id = self.require("validate")?;
        let status = self.device.check_framebuffer_status(id);
        if !status.is_complete() {
            debug!(%id, %status, "framebuffer incomplete");
        }
        Ok(status)
    }

    pub fn color_attachment(&self, index: u32) -> Option<ObjectId> {
        self.color.get(index as usize).copied().flatten()
    }

    /// The depth texture and the point it is attached at.
    pub fn depth_attachment(&self) -> Option<(Attachment, ObjectId)> {
        self.depth
    }

    pub fn handle(&self) -> Option<ObjectId> {
        self.handle
    }

    pub fn destroy(&mut self) {
        if let Some(id) = self.handle.take() {
            self.device.delete_framebuffer(id);
            trace!(%id, "destroyed framebuffer");
        }
        self.color = [None; MAX_COLOR_ATTACHMENTS as usize];
        self.depth = None;
    }
}

impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Framebuffer")
            .field("handle", &self.handle)
            .field("color", &self.color)
            .field("depth", &self.depth)
            .finish()
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use gdt_device::headless::{DeviceCall, HeadlessDevice};
    use gdt_device::TextureDescriptor;

    use super::*;

    fn setup() -> (Rc<HeadlessDevice>, Framebuffer, Texture2D) {
        let headless = Rc::new(HeadlessDevice::new());
        let mut fb = Framebuffer::new(headless.clone());
        fb.create().unwrap();
        let mut tex = Texture2D::new(headless.clone());
        tex.create().unwrap();
        tex.set_data(TextureDescriptor::rgba8(4, 4), None).unwrap();
        (headless, fb, tex)
    }

    #[test]
    fn color_slots_drive_draw_buffers() {
        let (headless, mut fb, tex) = setup();
        let fb_id = fb.handle().unwrap();

        fb.add_color_texture(0, &tex).unwrap();
        fb.add_color_texture(2, &tex).unwrap();

        assert_eq!(headless.draw_buffers(fb_id), vec![0, 2]);
        assert_eq!(fb.color_attachment(2), tex.handle());
        assert_eq!(fb.color_attachment(1), None);
        assert_eq!(fb.color_attachment(40), None);
        assert!(fb.validate().unwrap().is_complete());

        // Slot 1 has no texture behind it.
        fb.set_draw_buffer_count(2).unwrap();
        assert_eq!(
            fb.validate().unwrap(),
            FramebufferStatus::IncompleteDrawBuffer
        );

        fb.set_draw_buffer_count(1).unwrap();
        assert!(fb.validate().unwrap().is_complete());
    }

    #[test]
    fn last_slot_is_seven() {
        let (headless, mut fb, tex) = setup();
        fb.add_color_texture(7, &tex).unwrap();

        headless.clear_calls();
        let err = fb.add_color_texture(8, &tex).unwrap_err();
        assert!(matches!(
            err,
            GpuError::ColorAttachmentOutOfRange { index: 8, max: 7 }
        ));
        assert!(headless.calls().is_empty());
    }

    #[test]
    fn depth_slot_is_last_write_wins() {
        let (headless, mut fb, tex) = setup();
        let fb_id = fb.handle().unwrap();

        fb.add_depth_stencil_texture(&tex).unwrap();
        fb.add_depth_texture(&tex).unwrap();

        assert_eq!(
            fb.depth_attachment(),
            Some((Attachment::Depth, tex.handle().unwrap()))
        );
        assert_eq!(headless.attachment(fb_id, Attachment::DepthStencil), None);
        assert_eq!(headless.attachment(fb_id, Attachment::Depth), tex.handle());
        assert!(headless.calls().contains(&DeviceCall::AttachTexture {
            framebuffer: fb_id,
            attachment: Attachment::DepthStencil,
            texture: None,
        }));
    }

    #[test]
    fn empty_framebuffer_reports_missing_attachment() {
        let (_headless, fb, _tex) = setup();
        let status = fb.validate().unwrap();
        assert_eq!(status, FramebufferStatus::MissingAttachment);
        assert!(status.diagnostic().contains("does not have any texture"));
    }

    #[test]
    fn uncreated_texture_is_refused() {
        let (headless, mut fb, _tex) = setup();
        let blank = Texture2D::new(headless.clone());
        assert!(matches!(
            fb.add_depth_texture(&blank),
            Err(GpuError::NotCreated("Texture2D"))
        ));
        assert_eq!(fb.depth_attachment(), None);
    }

    #[test]
    fn too_many_draw_buffers() {
        let (_headless, mut fb, _tex) = setup();
        assert!(fb.set_draw_buffer_count(9).is_err());
        assert!(fb.set_draw_buffer_count(8).is_ok());
    }
}
