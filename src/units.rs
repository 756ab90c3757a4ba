//! Physical length units.
//!
//! Everything on a page is ultimately measured in PDF points ([`Pt`], 1/72 of an
//! inch). The other units exist so layouts can be written the way they are
//! measured on paper, e.g. an ID card is `Cm(5.5)` wide, and convert into points
//! with `.into()`.

use derive_more::{Add, AddAssign, Deref, DerefMut, Display, Div, From, Into, Mul, MulAssign, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};

const POINTS_PER_INCH: f32 = 72.0;
const MM_PER_INCH: f32 = 25.4;

/// PDF points, 1/72 of an inch
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Mul,
    MulAssign,
    Div,
    Sum,
    Deref,
    DerefMut,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[display("{_0}pt")]
#[serde(transparent)]
pub struct Pt(pub f32);

/// Millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[display("{_0}mm")]
#[serde(transparent)]
pub struct Mm(pub f32);

/// Centimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[display("{_0}cm")]
#[serde(transparent)]
pub struct Cm(pub f32);

/// Inches
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[display("{_0}in")]
#[serde(transparent)]
pub struct In(pub f32);

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Self {
        Pt(mm.0 * POINTS_PER_INCH / MM_PER_INCH)
    }
}

impl From<Cm> for Pt {
    fn from(cm: Cm) -> Self {
        Pt(cm.0 * 10.0 * POINTS_PER_INCH / MM_PER_INCH)
    }
}

impl From<In> for Pt {
    fn from(inches: In) -> Self {
        Pt(inches.0 * POINTS_PER_INCH)
    }
}

impl From<Pt> for Cm {
    fn from(pt: Pt) -> Self {
        Cm(pt.0 * MM_PER_INCH / (10.0 * POINTS_PER_INCH))
    }
}

impl Pt {
    /// The larger of two lengths
    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }

    /// Number of device pixels this length covers at the given resolution
    pub fn to_pixels(self, dpi: f32) -> f32 {
        self.0 / POINTS_PER_INCH * dpi
    }
}
