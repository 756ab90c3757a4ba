use crate::config::LayoutConfig;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::*;

/// Where every cell of the card grid sits on a page.
///
/// PDF puts the origin at the bottom-left of the page, so row `0` is the bottom
/// row and row `rows - 1` the top one. Cards are read (and filled) from the top
/// row down.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    page: PageSize,
    card_width: Pt,
    card_height: Pt,
    columns: usize,
    rows: usize,
    column_gap: Pt,
    row_gap: Pt,
    start_x: Pt,
    start_y: Pt,
}

impl GridGeometry {
    pub fn new(config: &LayoutConfig) -> GridGeometry {
        let page = config.page_size();
        let mut geometry = GridGeometry {
            page,
            card_width: config.card_width,
            card_height: config.card_height,
            columns: config.columns,
            rows: config.rows,
            column_gap: config.column_gap,
            row_gap: config.row_gap,
            start_x: Pt(0.0),
            start_y: Pt(0.0),
        };

        geometry.start_x = config
            .left_margin
            .unwrap_or_else(|| (page.0 - geometry.grid_width()) / 2.0);
        geometry.start_y = config
            .bottom_margin
            .max((page.1 - geometry.grid_height()) / 2.0);
        geometry
    }

    pub fn page_size(&self) -> PageSize {
        self.page
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cards_per_page(&self) -> usize {
        self.columns * self.rows
    }

    /// `columns` cards wide, with a gap between each pair
    pub fn grid_width(&self) -> Pt {
        self.card_width * self.columns as f32
            + self.column_gap * self.columns.saturating_sub(1) as f32
    }

    /// `rows` cards high, with a gap between each pair
    pub fn grid_height(&self) -> Pt {
        self.card_height * self.rows as f32 + self.row_gap * self.rows.saturating_sub(1) as f32
    }

    /// Lower-left corner of the bottom-left cell
    pub fn origin(&self) -> (Pt, Pt) {
        (self.start_x, self.start_y)
    }

    /// The card rectangle for a cell
    pub fn cell(&self, column: usize, row: usize) -> Rect {
        let x = self.start_x + (self.card_width + self.column_gap) * column as f32;
        let y = self.start_y + (self.card_height + self.row_gap) * row as f32;
        Rect::from_origin(x, y, self.card_width, self.card_height)
    }

    /// The smallest rectangle enclosing every cell
    pub fn bounds(&self) -> Rect {
        Rect::from_origin(
            self.start_x,
            self.start_y,
            self.grid_width(),
            self.grid_height(),
        )
    }

    /// Whether every card lands entirely on the page. A hair of tolerance absorbs
    /// rounding when the grid is exactly as wide as the page.
    pub fn fits_page(&self) -> bool {
        let page = Rect::from_origin(Pt(0.0), Pt(0.0), self.page.0, self.page.1);
        page.outset(Pt(0.01)).contains(&self.bounds())
    }
}

/// Whether placing a card filled up the current sheet
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Advance {
    SameSheet,
    SheetFull,
}

/// Tracks which cell the next card goes into.
///
/// The column counts up from the left; the row counts down from the top
/// (`rows - 1`) to the bottom (`0`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCursor {
    columns: usize,
    rows: usize,
    column: usize,
    row: usize,
    placed: usize,
}

impl GridCursor {
    pub fn new(columns: usize, rows: usize) -> GridCursor {
        assert!(columns > 0 && rows > 0, "grid must have at least one cell");
        GridCursor {
            columns,
            rows,
            column: 0,
            row: rows - 1,
            placed: 0,
        }
    }

    /// The `(column, row)` the next card goes into
    pub fn position(&self) -> (usize, usize) {
        (self.column, self.row)
    }

    /// Cards placed so far, across all sheets
    pub fn placed(&self) -> usize {
        self.placed
    }

    /// Where the `k`th card (0-indexed) of a run lands
    pub fn position_of(k: usize, columns: usize, rows: usize) -> (usize, usize) {
        let on_page = k % (columns * rows);
        (on_page % columns, rows - 1 - on_page / columns)
    }

    /// Move past the cell that just received a card. Once the sheet is full the
    /// cursor returns to the top-left cell, ready for the next sheet.
    pub fn advance(&mut self) -> Advance {
        self.placed += 1;
        self.column += 1;

        if self.placed % (self.columns * self.rows) == 0 {
            self.column = 0;
            self.row = self.rows - 1;
            return Advance::SheetFull;
        }

        if self.column == self.columns {
            self.column = 0;
            self.row -= 1;
        }
        Advance::SameSheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagesize::A4;

    fn close(a: Pt, b: Pt) -> bool {
        (a.0 - b.0).abs() < 1e-3
    }

    #[test]
    fn portrait_grid_is_centred_above_the_safe_zone() {
        let config = LayoutConfig::portrait();
        let geometry = GridGeometry::new(&config);

        let expected_width = config.card_width * 3.0 + config.column_gap * 2.0;
        assert!(close(geometry.grid_width(), expected_width));

        let (x, y) = geometry.origin();
        assert!(close(x, (A4.0 - expected_width) / 2.0));
        // centring would put the grid at ~1.6cm, below the 2cm safe zone
        assert!(close(y, config.bottom_margin));
        assert!(geometry.fits_page());
    }

    #[test]
    fn grid_is_vertically_centred_when_there_is_room() {
        let config = LayoutConfig::portrait().grid(3, 2).bottom_margin(Pt(0.0)).clone();
        let geometry = GridGeometry::new(&config);
        let (_, y) = geometry.origin();
        assert!(close(y, (A4.1 - geometry.grid_height()) / 2.0));
    }

    #[test]
    fn explicit_left_margin_wins_over_centring() {
        let config = LayoutConfig::portrait().left_margin(Some(Pt(20.0))).clone();
        let geometry = GridGeometry::new(&config);
        assert_eq!(geometry.origin().0, Pt(20.0));
        assert_eq!(geometry.cell(0, 0).x1, Pt(20.0));
    }

    #[test]
    fn cells_step_by_card_plus_gap() {
        let config = LayoutConfig::portrait();
        let geometry = GridGeometry::new(&config);
        let a = geometry.cell(0, 0);
        let b = geometry.cell(1, 2);
        assert!(close(b.x1 - a.x1, config.card_width + config.column_gap));
        assert!(close(b.y1 - a.y1, (config.card_height + config.row_gap) * 2.0));
        assert!(close(b.width(), config.card_width));
        assert!(close(b.height(), config.card_height));
    }

    #[test]
    fn every_cell_lies_on_the_page() {
        for config in [LayoutConfig::portrait(), LayoutConfig::landscape()] {
            let geometry = GridGeometry::new(&config);
            let (w, h) = geometry.page_size();
            for column in 0..geometry.columns() {
                for row in 0..geometry.rows() {
                    let cell = geometry.cell(column, row);
                    assert!(cell.x1 >= Pt(0.0) && cell.x2 <= w, "{cell:?}");
                    assert!(cell.y1 >= Pt(0.0) && cell.y2 <= h, "{cell:?}");
                }
            }
        }
    }

    #[test]
    fn cursor_fills_rows_top_down() {
        let mut cursor = GridCursor::new(3, 3);
        let mut seen = vec![cursor.position()];
        for _ in 0..8 {
            assert_eq!(cursor.advance(), Advance::SameSheet);
            seen.push(cursor.position());
        }
        assert_eq!(
            seen,
            vec![(0, 2), (1, 2), (2, 2), (0, 1), (1, 1), (2, 1), (0, 0), (1, 0), (2, 0)]
        );
        assert_eq!(cursor.advance(), Advance::SheetFull);
        assert_eq!(cursor.position(), (0, 2));
        assert_eq!(cursor.placed(), 9);
    }

    #[test]
    fn cursor_matches_closed_form_position() {
        for (columns, rows) in [(3, 3), (5, 2), (1, 1), (2, 4)] {
            let mut cursor = GridCursor::new(columns, rows);
            for k in 0..(columns * rows * 3 + 1) {
                assert_eq!(
                    cursor.position(),
                    GridCursor::position_of(k, columns, rows),
                    "card {k} on a {columns}x{rows} grid"
                );
                let advance = cursor.advance();
                assert_eq!(
                    advance == Advance::SheetFull,
                    (k + 1) % (columns * rows) == 0
                );
            }
        }
    }
}
