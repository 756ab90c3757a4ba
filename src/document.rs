use crate::{
    font::Font,
    image::Image,
    info::Info,
    page::Page,
    refs::{ObjectReferences, RefType},
    SheetError, StandardFont,
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};
use std::io::Write;

#[derive(Default)]
/// A document is the main object that stores all the contents of the PDF
/// then renders it out with a call to [Document::write]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub fonts: Arena<Font>,
    pub images: Arena<Image>,
}

impl Document {
    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document, returning its ID
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    /// Number of pages that will be written
    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    /// Add a font to the document structure. Fonts are stored "globally" within the
    /// document, so any page can refer to them by their ID.
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    /// Get the ID of a standard font, registering it first if no page has used it yet
    pub fn standard_font(&mut self, standard: StandardFont) -> Id<Font> {
        let existing = self
            .fonts
            .iter()
            .find(|(_, font)| font.standard == standard)
            .map(|(id, _)| id);
        match existing {
            Some(id) => id,
            None => self.add_font(Font::standard(standard)),
        }
    }

    /// Add an image to the document structure, returning its ID for use in
    /// [ImageLayout](crate::ImageLayout)s
    pub fn add_image(&mut self, image: Image) -> Id<Image> {
        self.images.alloc(image)
    }

    /// Write the entire document to the writer. The document is rendered in memory
    /// first (a limitation of pdf-writer), then written out in one go.
    ///
    /// Until `write` is called, object references are unresolved; calling it assigns
    /// every page, font and image its PDF object.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), SheetError> {
        let Document {
            info,
            pages,
            page_order,
            fonts,
            images,
        } = self;

        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        // page refs are keyed by position in the document, not by arena index
        let page_refs: Vec<Ref> = (0..page_order.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (id, font) in fonts.iter() {
            font.write(&mut refs, id.index(), &mut writer);
        }

        for (id, image) in images.iter() {
            image.write(&mut refs, id.index(), &mut writer);
        }

        for (page_index, id) in page_order.iter().enumerate() {
            let page = pages.get(*id).ok_or(SheetError::PageMissing)?;
            page.write(&mut refs, page_index, &fonts, &mut writer)?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }

    /// Write the document into a fresh buffer
    pub fn to_bytes(self) -> Result<Vec<u8>, SheetError> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagesize::A4;

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn standard_fonts_are_registered_once() {
        let mut doc = Document::default();
        let a = doc.standard_font(StandardFont::ZapfDingbats);
        let b = doc.standard_font(StandardFont::Helvetica);
        let c = doc.standard_font(StandardFont::ZapfDingbats);
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(doc.fonts.len(), 2);
    }

    #[test]
    fn writes_every_page() {
        let mut doc = Document::default();
        doc.set_info(Info::new().title("test").clone());
        doc.add_page(Page::new(A4));
        doc.add_page(Page::new(A4));
        assert_eq!(doc.page_count(), 2);

        let bytes = doc.to_bytes().expect("document writes");
        assert!(bytes.starts_with(b"%PDF-"));
        let pages = count(&bytes, b"/Type /Page") - count(&bytes, b"/Type /Pages");
        assert_eq!(pages, 2);
        assert_eq!(count(&bytes, b"/Count 2"), 1);
    }
}
