use crate::refs::{ObjectReferences, RefType};
use pdf_writer::{Name, Pdf};
use serde::{Deserialize, Serialize};

/// The fonts every conforming PDF reader ships with. They are referenced by name
/// and never embedded, so using one costs a few bytes in the output.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    Courier,
    TimesRoman,
    Symbol,
    ZapfDingbats,
}

impl StandardFont {
    /// The PostScript name PDF readers look the font up by
    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::Courier => "Courier",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::Symbol => "Symbol",
            StandardFont::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Symbolic fonts use their own built-in encoding instead of WinAnsi
    fn is_symbolic(self) -> bool {
        matches!(self, StandardFont::Symbol | StandardFont::ZapfDingbats)
    }

    /// Map `ch` to the single-byte code that draws it in this font, or [None] if
    /// the font has no glyph at that position.
    ///
    /// For the symbolic fonts the character is interpreted as a raw code in the
    /// font's built-in encoding (e.g. `'"'`, code 34, is the scissors glyph in
    /// ZapfDingbats).
    pub fn encode(self, ch: char) -> Option<u8> {
        let code = u32::from(ch);
        let code = u8::try_from(code).ok()?;
        let printable = if self.is_symbolic() {
            (0x21..=0x7e).contains(&code) || (0xa1..=0xfe).contains(&code)
        } else {
            (0x20..=0x7e).contains(&code)
        };
        printable.then_some(code)
    }
}

/// A font registered with a [Document](crate::Document)
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub standard: StandardFont,
}

impl Font {
    pub fn standard(standard: StandardFont) -> Font {
        Font { standard }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Font(font_index));
        let mut font = writer.type1_font(id);
        font.base_font(Name(self.standard.base_font().as_bytes()));
        if !self.standard.is_symbolic() {
            font.encoding_predefined(Name(b"WinAnsiEncoding"));
        }
    }
}
