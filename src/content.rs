//! Turns high-level page contents into PDF content stream operators.

use crate::font::Font;
use crate::page::{GlyphLayout, ImageLayout, PageContents, RectLayout};
use id_arena::Arena;
use pdf_writer::{Content, Name, Str};

/// Renders page contents to an (uncompressed) PDF content stream.
///
/// Every item is wrapped in its own `q`/`Q` pair so that colours, line widths and
/// dash patterns never leak from one item into the next.
pub(crate) fn render_contents(contents: &[PageContents], fonts: &Arena<Font>) -> Vec<u8> {
    let mut content = Content::new();

    for page_content in contents.iter() {
        content.save_state();
        match page_content {
            PageContents::Image(image) => render_image(&mut content, image),
            PageContents::Rectangle(rect) => render_rect(&mut content, rect),
            PageContents::Glyph(glyph) => render_glyph(&mut content, glyph, fonts),
        }
        content.restore_state();
    }

    content.finish()
}

fn render_image(content: &mut Content, image: &ImageLayout) {
    // image XObjects occupy the unit square; stretch it over the whole position
    let position = &image.position;
    content.transform([
        *position.width(),
        0.0,
        0.0,
        *position.height(),
        *position.x1,
        *position.y1,
    ]);
    content.x_object(Name(format!("I{}", image.image_id.index()).as_bytes()));
}

fn render_rect(content: &mut Content, layout: &RectLayout) {
    let stroke = &layout.stroke;
    stroke.colour.stroke(content);
    content.set_line_width(*stroke.width);
    match stroke.dash {
        Some(dash) => content.set_dash_pattern([*dash.on, *dash.off], 0.0),
        None => content.set_dash_pattern([], 0.0),
    };
    content.rect(
        *layout.rect.x1,
        *layout.rect.y1,
        *layout.rect.width(),
        *layout.rect.height(),
    );
    content.stroke();
}

fn render_glyph(content: &mut Content, glyph: &GlyphLayout, fonts: &Arena<Font>) {
    // a glyph whose font isn't in the document would reference a missing resource
    if fonts.get(glyph.font.id).is_none() {
        log::warn!("dropping glyph {} with an unregistered font", glyph.code);
        return;
    }
    glyph.colour.fill(content);
    content.begin_text();
    content.set_font(
        Name(format!("F{}", glyph.font.id.index()).as_bytes()),
        *glyph.font.size,
    );
    content.next_line(*glyph.coords.0, *glyph.coords.1);
    content.show(Str(&[glyph.code]));
    content.end_text();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::colours;
    use crate::page::{Dash, SpanFont, StrokeStyle};
    use crate::rect::Rect;
    use crate::units::Pt;
    use crate::{Font, Image, StandardFont};
    use image::RgbaImage;

    #[test]
    fn empty_contents_render_nothing() {
        assert!(render_contents(&[], &Arena::new()).is_empty());
    }

    #[test]
    fn dashed_rectangles_set_and_isolate_their_pattern() {
        let contents = vec![PageContents::Rectangle(RectLayout {
            rect: Rect::from_origin(Pt(8.0), Pt(18.0), Pt(104.0), Pt(54.0)),
            stroke: StrokeStyle {
                colour: colours::GREY,
                width: Pt(1.5),
                dash: Some(Dash {
                    on: Pt(4.0),
                    off: Pt(4.0),
                }),
            },
        })];
        let rendered = render_contents(&contents, &Arena::new());
        let text = String::from_utf8(rendered).expect("content is ascii");
        assert!(text.starts_with("q\n"));
        assert!(text.contains("1.5 w"));
        assert!(text.contains("[4 4] 0 d"));
        assert!(text.contains("8 18 104 54 re"));
        assert!(text.trim_end().ends_with('Q'));
    }

    #[test]
    fn images_are_stretched_over_their_position() {
        let mut images: Arena<Image> = Arena::new();
        let image_id = images.alloc(Image::from_raster(RgbaImage::new(2, 2)));
        let contents = vec![PageContents::Image(ImageLayout {
            image_id,
            position: Rect::from_origin(Pt(10.0), Pt(20.0), Pt(30.0), Pt(40.0)),
        })];
        let text = String::from_utf8_lossy(&render_contents(&contents, &Arena::new())).into_owned();
        assert!(text.contains("30 0 0 40 10 20 cm"));
        assert!(text.contains("/I0 Do"));
    }

    #[test]
    fn glyphs_reference_their_font_resource() {
        let mut fonts: Arena<Font> = Arena::new();
        let id = fonts.alloc(Font::standard(StandardFont::ZapfDingbats));
        let contents = vec![PageContents::Glyph(GlyphLayout {
            code: 34,
            font: SpanFont { id, size: Pt(10.0) },
            colour: colours::GREY,
            coords: (Pt(5.0), Pt(6.0)),
        })];
        let text = String::from_utf8_lossy(&render_contents(&contents, &fonts)).into_owned();
        assert!(text.contains("/F0 10 Tf"));
        assert!(text.contains("5 6 Td"));
        assert!(text.contains("(\") Tj"));
    }
}
