use pdf_writer::Content;
use serde::{Deserialize, Serialize};

/// A colour, expressed in grey, RGB or CMYK colour spaces
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Set this colour as the stroking colour of `content`
    pub fn stroke(&self, content: &mut Content) {
        match *self {
            Colour::RGB { r, g, b } => content.set_stroke_rgb(r, g, b),
            Colour::CMYK { c, m, y, k } => content.set_stroke_cmyk(c, m, y, k),
            Colour::Grey { g } => content.set_stroke_gray(g),
        };
    }

    /// Set this colour as the non-stroking (fill) colour of `content`
    pub fn fill(&self, content: &mut Content) {
        match *self {
            Colour::RGB { r, g, b } => content.set_fill_rgb(r, g, b),
            Colour::CMYK { c, m, y, k } => content.set_fill_cmyk(c, m, y, k),
            Colour::Grey { g } => content.set_fill_gray(g),
        };
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    /// Mid grey, dark enough for cut lines to survive a cheap printer
    pub const GREY: Colour = Colour::Grey { g: 0.5 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_stroke_and_fill_operators() {
        let mut content = Content::new();
        colours::GREY.stroke(&mut content);
        Colour::RGB { r: 1.0, g: 0.0, b: 0.0 }.fill(&mut content);
        let bytes = content.finish();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("0.5 G"));
        assert!(text.contains("1 0 0 rg"));
    }
}
