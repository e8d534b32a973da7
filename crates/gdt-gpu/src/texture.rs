//! 2D textures.

use std::fmt;

use gdt_device::{ObjectId, SharedDevice, TextureDescriptor, TextureFilter, Wrapping};
use tracing::{debug, trace, warn};

use crate::error::{GpuError, Result};

/// Per-axis sampling choice. For the mip axis `None` disables mipmapping;
/// for min and mag anything but `Nearest` samples linearly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Sampling {
    #[default]
    None,
    Nearest,
    Linear,
}

/// Collapse a (min, mag, mip) sampling choice into the driver's
/// `(min_filter, mag_filter)` pair.
pub fn sampling_filters(
    min: Sampling,
    mag: Sampling,
    mip: Sampling,
) -> (TextureFilter, TextureFilter) {
    use TextureFilter::*;

    let nearest = min == Sampling::Nearest;
    let min_filter = match (mip, nearest) {
        (Sampling::None, true) => Nearest,
        (Sampling::None, false) => Linear,
        (Sampling::Nearest, true) => NearestMipmapNearest,
        (Sampling::Nearest, false) => LinearMipmapNearest,
        (Sampling::Linear, true) => NearestMipmapLinear,
        (Sampling::Linear, false) => LinearMipmapLinear,
    };
    let mag_filter = if mag == Sampling::Nearest { Nearest } else { Linear };
    (min_filter, mag_filter)
}

/// A 2D texture. Storage is allocated by [`set_data`](Texture2D::set_data);
/// every operation before [`create`](Texture2D::create) is refused with
/// [`GpuError::NotCreated`] and never reaches the driver.
pub struct Texture2D {
    device: SharedDevice,
    handle: Option<ObjectId>,
    descriptor: Option<TextureDescriptor>,
}

impl Texture2D {
    pub fn new(device: SharedDevice) -> Self {
        Self {
            device,
            handle: None,
            descriptor: None,
        }
    }

    pub fn create(&mut self) -> Result<()> {
        self.destroy();
        let id = self.device.create_texture()?;
        debug!(%id, "created texture");
        self.handle = Some(id);
        Ok(())
    }

    fn require(&self, op: &'static str) -> Result<ObjectId> {
        self.handle.ok_or_else(|| {
            warn!(op, "texture used before create()");
            GpuError::NotCreated("Texture2D")
        })
    }

    /// Allocate storage and upload `data` (or leave it undefined with
    /// `None`). The descriptor is passed through as is; `data` must hold at
    /// least [`TextureDescriptor::byte_len`] bytes.
    pub fn set_data(&mut self, desc: TextureDescriptor, data: Option<&[u8]>) -> Result<()> {
        let id = self.require("set_data")?;
        if let Some(data) = data {
            let expected = desc.byte_len();
            if data.len() < expected {
                warn!(%id, expected, actual = data.len(), "texture data too short");
                return Err(GpuError::TextureDataTooShort {
                    expected,
                    actual: data.len(),
                });
            }
        }
        self.device.upload_texture_2d(id, &desc, data);
        trace!(%id, width = desc.width, height = desc.height, "uploaded texture");
        self.descriptor = Some(desc);
        Ok(())
    }

    pub fn set_sampling(&self, min: Sampling, mag: Sampling, mip: Sampling) -> Result<()> {
        let id = self.require("set_sampling")?;
        let (min_filter, mag_filter) = sampling_filters(min, mag, mip);
        self.device.set_texture_filters(id, min_filter, mag_filter);
        Ok(())
    }

    pub fn set_wrapping(&self, s: Wrapping, t: Wrapping) -> Result<()> {
        let id = self.require("set_wrapping")?;
        self.device.set_texture_wrapping(id, s, t);
        Ok(())
    }

    /// Bind to texture unit `unit`.
    pub fn bind(&self, unit: u32) -> Result<()> {
        let id = self.require("bind")?;
        self.device.bind_texture(Some(unit), Some(id));
        Ok(())
    }

    pub fn release(&self) {
        self.device.bind_texture(None, None);
    }

    pub fn handle(&self) -> Option<ObjectId> {
        self.handle
    }

    pub fn is_created(&self) -> bool {
        self.handle.is_some()
    }

    pub fn descriptor(&self) -> Option<&TextureDescriptor> {
        self.descriptor.as_ref()
    }

    /// Width of the current storage, 0 before any upload.
    pub fn width(&self) -> u32 {
        self.descriptor.map_or(0, |d| d.width)
    }

    pub fn height(&self) -> u32 {
        self.descriptor.map_or(0, |d| d.height)
    }

    pub fn destroy(&mut self) {
        if let Some(id) = self.handle.take() {
            self.device.delete_texture(id);
            trace!(%id, "destroyed texture");
        }
        self.descriptor = None;
    }
}

impl fmt::Debug for Texture2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture2D")
            .field("handle", &self.handle)
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use gdt_device::headless::{DeviceCall, HeadlessDevice};

    use super::*;

    #[test]
    fn sampling_table_is_exhaustive() {
        use Sampling as S;
        use TextureFilter as F;

        let cases = [
            (S::None, S::None, F::Linear),
            (S::Nearest, S::None, F::Nearest),
            (S::Linear, S::None, F::Linear),
            (S::None, S::Nearest, F::LinearMipmapNearest),
            (S::Nearest, S::Nearest, F::NearestMipmapNearest),
            (S::Linear, S::Nearest, F::LinearMipmapNearest),
            (S::None, S::Linear, F::LinearMipmapLinear),
            (S::Nearest, S::Linear, F::NearestMipmapLinear),
            (S::Linear, S::Linear, F::LinearMipmapLinear),
        ];
        for (min, mip, expected) in cases {
            assert_eq!(
                sampling_filters(min, S::Linear, mip).0,
                expected,
                "min {min:?} mip {mip:?}"
            );
        }

        assert_eq!(sampling_filters(S::None, S::Nearest, S::None).1, F::Nearest);
        assert_eq!(sampling_filters(S::None, S::None, S::None).1, F::Linear);
        assert_eq!(sampling_filters(S::None, S::Linear, S::None).1, F::Linear);
    }

    #[test]
    fn operations_before_create_are_refused() {
        let headless = Rc::new(HeadlessDevice::new());
        let mut texture = Texture2D::new(headless.clone());

        assert!(matches!(
            texture.set_sampling(Sampling::Linear, Sampling::Linear, Sampling::None),
            Err(GpuError::NotCreated("Texture2D"))
        ));
        assert!(texture.set_wrapping(Wrapping::Repeat, Wrapping::Clamp).is_err());
        assert!(texture.bind(0).is_err());
        assert!(texture.set_data(TextureDescriptor::rgba8(2, 2), None).is_err());
        assert!(headless.calls().is_empty());
        assert_eq!(texture.width(), 0);
    }

    #[test]
    fn configure_and_bind() {
        let headless = Rc::new(HeadlessDevice::new());
        let mut texture = Texture2D::new(headless.clone());
        texture.create().unwrap();
        let id = texture.handle().unwrap();

        texture
            .set_sampling(Sampling::Linear, Sampling::Nearest, Sampling::Linear)
            .unwrap();
        texture.set_wrapping(Wrapping::Repeat, Wrapping::Border).unwrap();
        texture.bind(3).unwrap();
        texture.release();

        assert_eq!(
            &headless.calls()[1..],
            &[
                DeviceCall::SetTextureFilters {
                    texture: id,
                    min: TextureFilter::LinearMipmapLinear,
                    mag: TextureFilter::Nearest,
                },
                DeviceCall::SetTextureWrapping {
                    texture: id,
                    s: Wrapping::Repeat,
                    t: Wrapping::Border,
                },
                DeviceCall::BindTexture {
                    unit: Some(3),
                    texture: Some(id),
                },
                DeviceCall::BindTexture {
                    unit: None,
                    texture: None,
                },
            ]
        );
    }

    #[test]
    fn short_pixel_data_is_refused() {
        let headless = Rc::new(HeadlessDevice::new());
        let mut texture = Texture2D::new(headless.clone());
        texture.create().unwrap();

        let err = texture
            .set_data(TextureDescriptor::rgba8(4, 4), Some(&[0u8; 1]))
            .unwrap_err();
        assert!(matches!(
            err,
            GpuError::TextureDataTooShort {
                expected: 64,
                actual: 1
            }
        ));
        assert_eq!(
            headless.count(|c| matches!(c, DeviceCall::UploadTexture { .. })),
            0
        );
        assert_eq!(texture.descriptor(), None);

        texture
            .set_data(TextureDescriptor::rgba8(4, 4), Some(&[0u8; 64]))
            .unwrap();
        assert_eq!(texture.width(), 4);
    }

    #[test]
    fn recreate_drops_storage() {
        let headless = Rc::new(HeadlessDevice::new());
        let mut texture = Texture2D::new(headless.clone());
        texture.create().unwrap();
        texture
            .set_data(TextureDescriptor::rgba8(8, 2), Some(&[0u8; 64]))
            .unwrap();
        assert_eq!((texture.width(), texture.height()), (8, 2));

        texture.create().unwrap();
        assert_eq!(texture.width(), 0);
        assert_eq!(headless.live_objects(), 1);
    }
}
