use crate::colour::Colour;
use crate::content::render_contents;
use crate::font::Font;
use crate::image::Image;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::*;
use crate::SheetError;
use id_arena::{Arena, Id};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Name, Pdf};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A dash pattern: `on` units drawn, then `off` units skipped
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dash {
    pub on: Pt,
    pub off: Pt,
}

/// How the outline of a rectangle is stroked
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub colour: Colour,
    pub width: Pt,
    /// [None] for a solid line
    pub dash: Option<Dash>,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<Font>,
    pub size: Pt,
}

/// A single glyph, drawn with its baseline starting at `coords`
#[derive(Clone, PartialEq, Debug)]
pub struct GlyphLayout {
    /// The glyph's code in the font's encoding
    pub code: u8,
    pub font: SpanFont,
    pub colour: Colour,
    pub coords: (Pt, Pt),
}

/// An image stretched to fill `position` exactly
#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image_id: Id<Image>,
    pub position: Rect,
}

#[derive(Clone, PartialEq, Debug)]
pub struct RectLayout {
    pub rect: Rect,
    pub stroke: StrokeStyle,
}

/// Everything that can be drawn on a page, in painting order
#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Image(ImageLayout),
    Rectangle(RectLayout),
    Glyph(GlyphLayout),
}

/// One output page. Contents are painted in the order they were added, so later
/// contents cover earlier ones.
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new(size: PageSize) -> Page {
        Page {
            media_box: Rect::from_origin(Pt(0.0), Pt(0.0), size.0, size.1),
            contents: Vec::default(),
        }
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(PageContents::Image(image));
    }

    pub fn add_rect(&mut self, rect: RectLayout) {
        self.contents.push(PageContents::Rectangle(rect));
    }

    pub fn add_glyph(&mut self, glyph: GlyphLayout) {
        self.contents.push(PageContents::Glyph(glyph));
    }

    fn used_images(&self) -> BTreeSet<usize> {
        self.contents
            .iter()
            .filter_map(|c| match c {
                PageContents::Image(image) => Some(image.image_id.index()),
                _ => None,
            })
            .collect()
    }

    fn used_fonts(&self) -> BTreeSet<usize> {
        self.contents
            .iter()
            .filter_map(|c| match c {
                PageContents::Glyph(glyph) => Some(glyph.font.id.index()),
                _ => None,
            })
            .collect()
    }

    /// Write the page object and its content stream. Fonts and images must already
    /// have been written, as the page's resources refer to them.
    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &Arena<Font>,
        writer: &mut Pdf,
    ) -> Result<(), SheetError> {
        let id = refs
            .get(RefType::Page(page_index))
            .ok_or(SheetError::PageMissing)?;
        let page_tree = refs.get(RefType::PageTree).ok_or(SheetError::PageMissing)?;
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.parent(page_tree);
        page.contents(content_id);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for i in self.used_fonts() {
            let font_ref = refs
                .get(RefType::Font(i))
                .ok_or_else(|| SheetError::MissingObject(format!("font {i}")))?;
            resource_fonts.pair(Name(format!("F{i}").as_bytes()), font_ref);
        }
        resource_fonts.finish();
        let mut resource_xobjects = resources.x_objects();
        for i in self.used_images() {
            let image_ref = refs
                .get(RefType::Image(i))
                .ok_or_else(|| SheetError::MissingObject(format!("image {i}")))?;
            resource_xobjects.pair(Name(format!("I{i}").as_bytes()), image_ref);
        }
        resource_xobjects.finish();
        resources.finish();
        page.finish();

        let rendered = render_contents(&self.contents, fonts);
        let compressed =
            compress_to_vec_zlib(&rendered, CompressionLevel::DefaultLevel as u8);
        writer
            .stream(content_id, compressed.as_slice())
            .filter(Filter::FlateDecode);

        Ok(())
    }
}
