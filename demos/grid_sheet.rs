//! Lay the files named on the command line out on grid sheets:
//!
//! ```sh
//! RUST_LOG=debug cargo run --example grid_sheet -- [--landscape] [--fast] card1.pdf card2.png ...
//! ```

use id_card_grid::pagesize::Orientation;
use id_card_grid::{DpiPreset, Generator, LayoutConfig, SourceDocument, OUTPUT_FILENAME};

fn main() {
    env_logger::init();

    let mut config = LayoutConfig::portrait();
    let mut quality = DpiPreset::UltraHd;
    let mut sources = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--landscape" => {
                let preset = LayoutConfig::landscape();
                config.orientation(Orientation::Landscape);
                config.grid(preset.columns, preset.rows);
                config.gaps(preset.column_gap, preset.row_gap);
            }
            "--fast" => quality = DpiPreset::Fast,
            path => sources.push(SourceDocument::from_path(path).expect("can read source file")),
        }
    }

    config.dpi(quality);
    println!("rendering cards at about {} DPI", quality.approx_dpi());

    let generator = Generator::new(config).expect("layout is valid");
    let sheet = generator.generate(&sources).expect("can generate sheet");

    for skipped in &sheet.report.skipped {
        match skipped.page {
            Some(page) => println!("skipped {} page {}: {}", skipped.filename, page + 1, skipped.reason),
            None => println!("skipped {}: {}", skipped.filename, skipped.reason),
        }
    }
    if sheet.report.truncated {
        println!("card limit reached, some input was left out");
    }
    println!(
        "{} cards on {} pages",
        sheet.report.cards_placed, sheet.report.pages
    );

    std::fs::write(OUTPUT_FILENAME, &sheet.pdf).expect("can write output");
}
