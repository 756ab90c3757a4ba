//! Turning source pages into bitmaps.
//!
//! A source is first opened into a [`PageSource`], which knows how many pages it
//! has and renders them one at a time, so only one page's bitmap is alive at once.
//! Images are handled here with the `image` crate; PDFs go through a
//! [`PdfBackend`], by default [`PdfiumBackend`] when the `pdfium` feature is on.

use crate::config::NATIVE_DPI;
use crate::units::*;
use crate::SourceError;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};

#[cfg(feature = "pdfium")]
mod pdfium;
#[cfg(feature = "pdfium")]
pub use self::pdfium::PdfiumBackend;

/// An opened document whose pages can be rasterized
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Render page `index` at `scale` times its native resolution
    fn render_page(&mut self, index: usize, scale: f32) -> Result<RgbaImage, SourceError>;
}

/// Something that can open PDF bytes for rasterization
pub trait PdfBackend {
    /// Parse `bytes` as a PDF. Failing to parse is a [SourceError::Decode].
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn PageSource + 'a>, SourceError>;
}

/// Pixel size of something `size` big at 1x, which is [`NATIVE_DPI`]
pub fn native_size(size: (Pt, Pt)) -> (u32, u32) {
    let axis = |length: Pt| (length.to_pixels(NATIVE_DPI).round() as u32).max(1);
    (axis(size.0), axis(size.1))
}

/// Scale a native pixel size, never collapsing to zero. Scaling the rounded 1x
/// size, rather than the physical size, keeps integer scales in exact ratios.
pub fn scaled(native: (u32, u32), scale: f32) -> (u32, u32) {
    let axis = |n: u32| ((n as f32 * scale).round() as u32).max(1);
    (axis(native.0), axis(native.1))
}

/// A JPEG or PNG treated as a single-page document.
///
/// A bitmap has no physical size of its own, so its native (1x) resolution is
/// taken to be the card cell at [`NATIVE_DPI`]; rendering resamples to that size
/// times the scale.
pub struct ImagePage {
    image: DynamicImage,
    native: (u32, u32),
}

impl ImagePage {
    /// Decode `bytes` as `format`, to be placed into a `cell`-sized card
    pub fn decode(bytes: &[u8], format: ImageFormat, cell: (Pt, Pt)) -> Result<ImagePage, SourceError> {
        let image = image::load_from_memory_with_format(bytes, format)?;
        Ok(ImagePage {
            image,
            native: native_size(cell),
        })
    }

    /// Dimensions of the decoded image before any resampling
    pub fn source_dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

impl PageSource for ImagePage {
    fn page_count(&self) -> usize {
        1
    }

    fn render_page(&mut self, index: usize, scale: f32) -> Result<RgbaImage, SourceError> {
        if index != 0 {
            return Err(SourceError::Render(format!(
                "an image has a single page, asked for page {index}"
            )));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(SourceError::Render(format!("invalid scale {scale}")));
        }
        let (width, height) = scaled(self.native, scale);
        if (width, height) == self.source_dimensions() {
            return Ok(self.image.to_rgba8());
        }
        Ok(self
            .image
            .resize_exact(width, height, FilterType::Lanczos3)
            .into_rgba8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).expect("png encodes");
        out.into_inner()
    }

    fn card() -> (Pt, Pt) {
        (Cm(5.5).into(), Cm(8.5).into())
    }

    fn assert_quarter_size(pages: &mut dyn PageSource) {
        for index in 0..pages.page_count() {
            let high = pages.render_page(index, 8.0).expect("renders");
            let low = pages.render_page(index, 2.0).expect("renders");
            assert_eq!(high.width(), low.width() * 4, "page {index}");
            assert_eq!(high.height(), low.height() * 4, "page {index}");
        }
    }

    #[test]
    fn native_size_is_the_card_at_75_dpi() {
        // 5.5cm ≈ 2.165in ≈ 162px, 8.5cm ≈ 3.346in ≈ 251px
        assert_eq!(native_size(card()), (162, 251));
    }

    #[test]
    fn page_sized_targets_keep_exact_ratios() {
        // scaling an A4 page's physical width directly would give 4762 vs 1191 x 4
        for size in [crate::pagesize::A4, card(), (Pt(612.3), Pt(791.7))] {
            let native = native_size(size);
            let (high_w, high_h) = scaled(native, 8.0);
            let (low_w, low_h) = scaled(native, 2.0);
            assert_eq!((high_w, high_h), (low_w * 4, low_h * 4), "{size:?}");
        }
        assert_eq!(native_size(crate::pagesize::A4), (620, 877));
    }

    #[test]
    fn images_are_a_single_page() {
        let mut page = ImagePage::decode(&png_bytes(20, 30), ImageFormat::Png, card())
            .expect("decodes");
        assert_eq!(page.page_count(), 1);
        assert_eq!(page.source_dimensions(), (20, 30));
        assert!(page.render_page(1, 2.0).is_err());
    }

    #[test]
    fn scale_ratio_is_exact() {
        let mut page = ImagePage::decode(&png_bytes(64, 64), ImageFormat::Png, card())
            .expect("decodes");
        assert_quarter_size(&mut page);
        let low = page.render_page(0, 2.0).expect("renders");
        assert_eq!(low.dimensions(), (324, 502));
    }

    #[test]
    fn wrong_format_is_a_decode_error() {
        let result = ImagePage::decode(&png_bytes(4, 4), ImageFormat::Jpeg, card());
        assert!(matches!(result, Err(SourceError::Decode(_))));

        let result = ImagePage::decode(b"definitely not a png", ImageFormat::Png, card());
        assert!(matches!(result, Err(SourceError::Decode(_))));
    }

    #[test]
    fn scaling_never_reaches_zero() {
        assert_eq!(scaled((3, 5), 0.01), (1, 1));
        assert_eq!(scaled((162, 251), 4.0), (648, 1004));
    }
}
