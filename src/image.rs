use crate::refs::{ObjectReferences, RefType};
use image::RgbaImage;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};

/// A raster image ready to be embedded as an image XObject.
///
/// Pixels are compressed with Flate (lossless) as soon as the image is created, so
/// the decoded bitmap does not have to be kept around until the document is
/// written. A soft mask is only generated when the raster has any pixel that
/// isn't fully opaque.
pub struct Image {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    rgb: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    /// Encode a raster, consuming it
    pub fn from_raster(raster: RgbaImage) -> Image {
        let level = CompressionLevel::DefaultLevel as u8;
        let (width, height) = raster.dimensions();

        let opaque = raster.pixels().all(|p| p.0[3] == u8::MAX);
        let mask = (!opaque).then(|| {
            let alphas: Vec<u8> = raster.pixels().map(|p| p.0[3]).collect();
            compress_to_vec_zlib(&alphas, level)
        });

        let rgb: Vec<u8> = raster
            .pixels()
            .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
            .collect();
        drop(raster);
        let rgb = compress_to_vec_zlib(&rgb, level);

        Image {
            width,
            height,
            rgb,
            mask,
        }
    }

    /// Whether a transparency mask will be written alongside the image
    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let mask_id = self
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));

        let mut image = writer.image_xobject(id, self.rgb.as_slice());
        image.filter(Filter::FlateDecode);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        if let (Some(mask_id), Some(mask)) = (mask_id, &self.mask) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}
