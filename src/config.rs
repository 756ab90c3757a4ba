//! Layout parameters for one generation run.

use crate::layout::{CutGuideStyle, GridGeometry};
use crate::pagesize::{self, Orientation, PageSize};
use crate::units::*;
use crate::SheetError;
use serde::{Deserialize, Serialize};

/// Default ceiling on the number of cards placed in one run
pub const DEFAULT_MAX_CARDS: usize = 200;

/// Largest left margin the sheet accepts
pub const MAX_LEFT_MARGIN: Cm = Cm(2.2);

/// Largest gap accepted between rows or columns
pub const MAX_GAP: Cm = Cm(2.0);

/// Rendering resolution, in DPI, that a scale of 1.0 corresponds to. PDF pages and
/// images both use it as their 1x base.
pub const NATIVE_DPI: f32 = 75.0;

/// Highest accepted rasterization scale, the [DpiPreset::UltraHd] one
pub const MAX_DPI_SCALE: f32 = 8.0;

/// The rasterization quality presets offered to users. Each is a multiple of
/// [NATIVE_DPI], for PDF pages and images alike.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DpiPreset {
    /// ≈150 DPI
    Fast,
    /// ≈300 DPI
    Standard,
    /// ≈600 DPI
    UltraHd,
}

impl DpiPreset {
    pub fn scale(self) -> f32 {
        match self {
            DpiPreset::Fast => 2.0,
            DpiPreset::Standard => 4.0,
            DpiPreset::UltraHd => MAX_DPI_SCALE,
        }
    }

    pub fn approx_dpi(self) -> f32 {
        self.scale() * NATIVE_DPI
    }
}

/// Everything that controls how cards are laid out on the sheet.
///
/// A config is built once by the caller and never changes during a run. Build one
/// from a preset and adjust it with the chained setters:
///
/// ```
/// use id_card_grid::{Cm, DpiPreset, LayoutConfig};
///
/// let config = LayoutConfig::portrait()
///     .left_margin(Some(Cm(1.0).into()))
///     .dpi(DpiPreset::Standard)
///     .clone();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.cards_per_page(), 9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Paper size; rotated according to `orientation`
    pub paper: PageSize,
    pub orientation: Orientation,
    pub card_width: Pt,
    pub card_height: Pt,
    pub columns: usize,
    pub rows: usize,
    pub column_gap: Pt,
    pub row_gap: Pt,
    /// Distance from the left edge of the page to the first column; [None]
    /// centres the grid horizontally
    pub left_margin: Option<Pt>,
    /// Printer safe zone: the grid never starts lower than this
    pub bottom_margin: Pt,
    /// Rasterization scale relative to a 1x rendering
    pub dpi_scale: f32,
    pub max_cards: usize,
    pub cut_guide: CutGuideStyle,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig::portrait()
    }
}

impl LayoutConfig {
    /// A4 portrait, 3 × 3 cards of 5.5 × 8.5 cm
    pub fn portrait() -> LayoutConfig {
        LayoutConfig {
            paper: pagesize::A4,
            orientation: Orientation::Portrait,
            card_width: Cm(5.5).into(),
            card_height: Cm(8.5).into(),
            columns: 3,
            rows: 3,
            column_gap: Cm(0.5).into(),
            row_gap: Cm(0.5).into(),
            left_margin: None,
            bottom_margin: Cm(2.0).into(),
            dpi_scale: DpiPreset::UltraHd.scale(),
            max_cards: DEFAULT_MAX_CARDS,
            cut_guide: CutGuideStyle::default(),
        }
    }

    /// A4 landscape, 5 × 2 cards of 5.5 × 8.5 cm
    pub fn landscape() -> LayoutConfig {
        LayoutConfig {
            orientation: Orientation::Landscape,
            columns: 5,
            rows: 2,
            column_gap: Cm(0.3).into(),
            ..LayoutConfig::portrait()
        }
    }

    /// Parse a config from JSON, filling missing fields from the portrait preset
    pub fn from_json(json: &str) -> Result<LayoutConfig, SheetError> {
        let config: LayoutConfig = serde_json::from_str(json)
            .map_err(|e| SheetError::InvalidLayout(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn orientation(&mut self, orientation: Orientation) -> &mut Self {
        self.orientation = orientation;
        self
    }

    pub fn card_size(&mut self, width: Pt, height: Pt) -> &mut Self {
        self.card_width = width;
        self.card_height = height;
        self
    }

    pub fn grid(&mut self, columns: usize, rows: usize) -> &mut Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    pub fn gaps(&mut self, column_gap: Pt, row_gap: Pt) -> &mut Self {
        self.column_gap = column_gap;
        self.row_gap = row_gap;
        self
    }

    pub fn left_margin(&mut self, left_margin: Option<Pt>) -> &mut Self {
        self.left_margin = left_margin;
        self
    }

    pub fn bottom_margin(&mut self, bottom_margin: Pt) -> &mut Self {
        self.bottom_margin = bottom_margin;
        self
    }

    pub fn dpi(&mut self, preset: DpiPreset) -> &mut Self {
        self.dpi_scale = preset.scale();
        self
    }

    pub fn dpi_scale(&mut self, scale: f32) -> &mut Self {
        self.dpi_scale = scale;
        self
    }

    pub fn max_cards(&mut self, max_cards: usize) -> &mut Self {
        self.max_cards = max_cards;
        self
    }

    pub fn cut_guide(&mut self, style: CutGuideStyle) -> &mut Self {
        self.cut_guide = style;
        self
    }

    /// The page size with orientation applied
    pub fn page_size(&self) -> PageSize {
        self.orientation.apply(self.paper)
    }

    pub fn cards_per_page(&self) -> usize {
        self.columns * self.rows
    }

    /// Check that this config describes a grid that can actually be printed.
    /// Every card of the grid must fit on the page.
    pub fn validate(&self) -> Result<(), SheetError> {
        let invalid = |msg: String| Err(SheetError::InvalidLayout(msg));

        if self.columns == 0 || self.rows == 0 {
            return invalid(format!(
                "grid must have at least one column and one row, got {} x {}",
                self.columns, self.rows
            ));
        }
        if self.card_width <= Pt(0.0) || self.card_height <= Pt(0.0) {
            return invalid(format!(
                "card size must be positive, got {} x {}",
                self.card_width, self.card_height
            ));
        }
        if !(self.dpi_scale > 0.0 && self.dpi_scale <= MAX_DPI_SCALE) {
            return invalid(format!(
                "dpi scale must be in (0, {MAX_DPI_SCALE}], got {}",
                self.dpi_scale
            ));
        }
        if self.max_cards == 0 {
            return invalid("card limit must be at least 1".to_string());
        }

        let max_gap: Pt = MAX_GAP.into();
        for (name, gap) in [("column", self.column_gap), ("row", self.row_gap)] {
            if gap < Pt(0.0) || gap > max_gap {
                return invalid(format!("{name} gap {gap} is outside 0pt..={max_gap}"));
            }
        }
        if let Some(margin) = self.left_margin {
            let max_margin: Pt = MAX_LEFT_MARGIN.into();
            if margin < Pt(0.0) || margin > max_margin {
                return invalid(format!("left margin {margin} is outside 0pt..={max_margin}"));
            }
        }
        if self.bottom_margin < Pt(0.0) {
            return invalid(format!("bottom margin {} is negative", self.bottom_margin));
        }
        self.cut_guide.validate()?;

        let geometry = GridGeometry::new(self);
        if !geometry.fits_page() {
            let (width, height) = self.page_size();
            return invalid(format!(
                "a {} x {} grid of {} x {} cards does not fit on a {} x {} page",
                self.columns, self.rows, self.card_width, self.card_height, width, height
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert!(LayoutConfig::portrait().validate().is_ok());
        assert!(LayoutConfig::landscape().validate().is_ok());
        assert_eq!(LayoutConfig::portrait().cards_per_page(), 9);
        assert_eq!(LayoutConfig::landscape().cards_per_page(), 10);
        assert_eq!(LayoutConfig::default(), LayoutConfig::portrait());
    }

    #[test]
    fn landscape_swaps_page_dimensions() {
        let (w, h) = LayoutConfig::landscape().page_size();
        assert!(w > h);
        assert_eq!((h, w), pagesize::A4);
    }

    #[test]
    fn dpi_presets() {
        assert_eq!(DpiPreset::Fast.scale(), 2.0);
        assert_eq!(DpiPreset::Standard.scale(), 4.0);
        assert_eq!(DpiPreset::UltraHd.scale(), 8.0);
        assert_eq!(DpiPreset::UltraHd.approx_dpi(), 600.0);
    }

    #[test]
    fn rejects_empty_grids() {
        let config = LayoutConfig::portrait().grid(0, 3).clone();
        assert!(matches!(config.validate(), Err(SheetError::InvalidLayout(_))));
    }

    #[test]
    fn rejects_out_of_range_margins_and_gaps() {
        let config = LayoutConfig::portrait()
            .left_margin(Some(Cm(2.5).into()))
            .clone();
        assert!(config.validate().is_err());

        let config = LayoutConfig::portrait().gaps(Pt(-1.0), Pt(0.0)).clone();
        assert!(config.validate().is_err());

        let config = LayoutConfig::portrait().left_margin(Some(Pt(0.0))).clone();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_grids_larger_than_the_page() {
        let config = LayoutConfig::portrait().grid(4, 3).clone();
        assert!(config.validate().is_err());

        let config = LayoutConfig::portrait().grid(3, 4).clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_scales_beyond_ultra_hd() {
        assert!(LayoutConfig::portrait().dpi_scale(8.5).validate().is_err());
        assert!(LayoutConfig::portrait().dpi_scale(1.0e8).validate().is_err());
        assert!(LayoutConfig::from_json(r#"{ "dpi_scale": 1e8 }"#).is_err());
        for preset in [DpiPreset::Fast, DpiPreset::Standard, DpiPreset::UltraHd] {
            assert!(LayoutConfig::portrait().dpi(preset).validate().is_ok());
        }
        assert!(LayoutConfig::portrait().dpi_scale(0.5).validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_scale_and_limit() {
        assert!(LayoutConfig::portrait().dpi_scale(0.0).validate().is_err());
        assert!(LayoutConfig::portrait().dpi_scale(f32::NAN).validate().is_err());
        assert!(LayoutConfig::portrait().dpi_scale(f32::INFINITY).validate().is_err());
        assert!(LayoutConfig::portrait().max_cards(0).validate().is_err());
    }

    #[test]
    fn parses_partial_json() {
        let config = LayoutConfig::from_json(
            r#"{ "orientation": "landscape", "columns": 5, "rows": 2, "column_gap": 8.5, "dpi_scale": 2.0 }"#,
        )
        .expect("valid config");
        assert_eq!(config.orientation, Orientation::Landscape);
        assert_eq!(config.cards_per_page(), 10);
        assert_eq!(config.dpi_scale, 2.0);
        assert_eq!(config.max_cards, DEFAULT_MAX_CARDS);
    }

    #[test]
    fn json_round_trip() {
        let config = LayoutConfig::landscape();
        let json = serde_json::to_string(&config).expect("serializes");
        assert_eq!(LayoutConfig::from_json(&json).expect("parses"), config);
    }

    #[test]
    fn invalid_json_is_an_invalid_layout() {
        assert!(matches!(
            LayoutConfig::from_json("{ \"columns\": -1 }"),
            Err(SheetError::InvalidLayout(_))
        ));
    }
}
