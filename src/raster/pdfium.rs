use super::{native_size, scaled, PageSource, PdfBackend};
use crate::units::Pt;
use crate::SourceError;
use image::RgbaImage;
use pdfium_render::prelude::*;

/// Rasterizes PDFs through a PDFium library, either one sitting next to the
/// executable or one installed on the system.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    pub fn bind() -> Result<PdfiumBackend, SourceError> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| SourceError::Render(format!("PDF engine unavailable: {e}")))?;
        log::debug!("bound to pdfium");
        Ok(PdfiumBackend {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PdfBackend for PdfiumBackend {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn PageSource + 'a>, SourceError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| SourceError::Decode(e.to_string()))?;
        Ok(Box::new(PdfiumPages { document }))
    }
}

struct PdfiumPages<'a> {
    document: PdfDocument<'a>,
}

impl PageSource for PdfiumPages<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&mut self, index: usize, scale: f32) -> Result<RgbaImage, SourceError> {
        if index >= self.page_count() {
            return Err(SourceError::Render(format!("no page {index}")));
        }
        let page = self
            .document
            .pages()
            .get(index as PdfPageIndex)
            .map_err(|e| SourceError::Render(e.to_string()))?;

        // size from the rounded 1x size, as images are, so every scale shares one base
        let native = native_size((Pt(page.width().value), Pt(page.height().value)));
        let (width, height) = scaled(native, scale);
        let config = PdfRenderConfig::new().set_target_size(width as i32, height as i32);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| SourceError::Render(e.to_string()))?;

        let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
        log::debug!("rendered page {index} at {width}x{height}");
        RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes()).ok_or_else(|| {
            SourceError::Render(format!("bitmap buffer doesn't match {width}x{height}"))
        })
    }
}
