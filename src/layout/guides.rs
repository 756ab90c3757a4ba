use crate::colour::{colours, Colour};
use crate::document::Document;
use crate::font::StandardFont;
use crate::page::{Dash, GlyphLayout, Page, RectLayout, SpanFont, StrokeStyle};
use crate::rect::Rect;
use crate::units::*;
use crate::SheetError;
use serde::{Deserialize, Serialize};

/// A glyph drawn at the corners of an outset cutting guide
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub font: StandardFont,
    pub glyph: char,
    pub size: Pt,
}

impl Marker {
    /// ZapfDingbats' scissors (code 34)
    pub fn scissors() -> Marker {
        Marker {
            font: StandardFont::ZapfDingbats,
            glyph: '"',
            size: Pt(10.0),
        }
    }

    /// Drawn instead of a marker whose font can't show its glyph
    pub fn fallback() -> Marker {
        Marker {
            font: StandardFont::Helvetica,
            glyph: 'x',
            size: Pt(8.0),
        }
    }
}

/// How the cut line around each card is drawn
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "style")]
pub enum CutGuideStyle {
    /// A single dashed rectangle along the card's edge
    Flush { stroke: StrokeStyle },
    /// A dashed rectangle `offset` outside the card, corner markers, and a solid
    /// border on the card's edge itself
    Outset {
        offset: Pt,
        stroke: StrokeStyle,
        border: StrokeStyle,
        marker: Option<Marker>,
    },
}

impl Default for CutGuideStyle {
    fn default() -> Self {
        CutGuideStyle::Outset {
            offset: Pt(2.0),
            stroke: dashed_guide(),
            border: StrokeStyle {
                colour: colours::BLACK,
                width: Pt(0.5),
                dash: None,
            },
            marker: Some(Marker::scissors()),
        }
    }
}

fn dashed_guide() -> StrokeStyle {
    StrokeStyle {
        colour: colours::GREY,
        width: Pt(1.5),
        dash: Some(Dash {
            on: Pt(4.0),
            off: Pt(4.0),
        }),
    }
}

impl CutGuideStyle {
    /// A flush dashed guide in the default guide stroke
    pub fn flush() -> CutGuideStyle {
        CutGuideStyle::Flush {
            stroke: dashed_guide(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), SheetError> {
        let strokes: Vec<&StrokeStyle> = match self {
            CutGuideStyle::Flush { stroke } => vec![stroke],
            CutGuideStyle::Outset {
                offset,
                stroke,
                border,
                marker,
            } => {
                if *offset < Pt(0.0) {
                    return Err(SheetError::InvalidLayout(format!(
                        "cut guide offset {offset} is negative"
                    )));
                }
                if marker.is_some_and(|m| m.size <= Pt(0.0)) {
                    return Err(SheetError::InvalidLayout(
                        "marker size must be positive".to_string(),
                    ));
                }
                vec![stroke, border]
            }
        };
        for stroke in strokes {
            let dash_ok = stroke
                .dash
                .map_or(true, |d| d.on > Pt(0.0) && d.off >= Pt(0.0));
            if stroke.width <= Pt(0.0) || !dash_ok {
                return Err(SheetError::InvalidLayout(format!(
                    "invalid cut guide stroke {stroke:?}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ResolvedMarker {
    font: SpanFont,
    code: u8,
    colour: Colour,
    /// Whether this is the stand-in for an unavailable marker font
    fallback: bool,
}

/// A [CutGuideStyle] bound to a document: marker fonts are registered and
/// marker glyphs encoded once, up front, rather than for every card.
#[derive(Debug, Clone)]
pub struct CutGuides {
    style: CutGuideStyle,
    marker: Option<ResolvedMarker>,
}

impl CutGuides {
    pub fn resolve(style: CutGuideStyle, doc: &mut Document) -> CutGuides {
        let marker = match style {
            CutGuideStyle::Outset {
                marker: Some(marker),
                stroke,
                ..
            } => Some(resolve_marker(marker, stroke.colour, doc)),
            _ => None,
        };
        CutGuides { style, marker }
    }

    /// True when the configured marker can't be drawn and the plain-text
    /// fallback is used instead
    pub fn uses_fallback_marker(&self) -> bool {
        self.marker.as_ref().is_some_and(|m| m.fallback)
    }

    /// Draw everything that goes underneath the card image
    pub fn draw_guide(&self, page: &mut Page, card: &Rect) {
        match &self.style {
            CutGuideStyle::Flush { stroke } => page.add_rect(RectLayout {
                rect: *card,
                stroke: *stroke,
            }),
            CutGuideStyle::Outset { offset, stroke, .. } => {
                let cut = card.outset(*offset);
                page.add_rect(RectLayout {
                    rect: cut,
                    stroke: *stroke,
                });
                if let Some(marker) = &self.marker {
                    draw_markers(page, marker, &cut);
                }
            }
        }
    }

    /// Draw everything that goes on top of the card image
    pub fn draw_border(&self, page: &mut Page, card: &Rect) {
        if let CutGuideStyle::Outset { border, .. } = &self.style {
            page.add_rect(RectLayout {
                rect: *card,
                stroke: *border,
            });
        }
    }
}

fn resolve_marker(marker: Marker, colour: Colour, doc: &mut Document) -> ResolvedMarker {
    let (marker, code, fallback) = match marker.font.encode(marker.glyph) {
        Some(code) => (marker, code, false),
        None => {
            log::warn!(
                "{} cannot draw marker {:?}, falling back to a plain 'x'",
                marker.font.base_font(),
                marker.glyph
            );
            let fallback = Marker::fallback();
            // the fallback glyph is printable ascii, which Helvetica always encodes
            let code = fallback.font.encode(fallback.glyph).unwrap_or(b'x');
            (fallback, code, true)
        }
    };
    ResolvedMarker {
        font: SpanFont {
            id: doc.standard_font(marker.font),
            size: marker.size,
        },
        code,
        colour,
        fallback,
    }
}

fn draw_markers(page: &mut Page, marker: &ResolvedMarker, cut: &Rect) {
    let corners = if marker.fallback {
        vec![(cut.x1 - Pt(5.0), cut.y2)]
    } else {
        // top-left and bottom-right, just outside the cut line
        vec![
            (cut.x1 - Pt(8.0), cut.y2 - Pt(5.0)),
            (cut.x2 + Pt(2.0), cut.y1 + Pt(2.0)),
        ]
    };
    for coords in corners {
        page.add_glyph(GlyphLayout {
            code: marker.code,
            font: marker.font,
            colour: marker.colour,
            coords,
        });
    }
}
