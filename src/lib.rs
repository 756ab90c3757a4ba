//! Lays ID card scans out on print-ready grid sheets.
//!
//! Each page of every source document (a PDF, JPEG or PNG) is rasterized and
//! placed as one card into a grid on A4 sheets, with dashed cutting guides around
//! every card. Cards fill each sheet left to right, top row first, and a new
//! sheet is started whenever one fills up.
//!
//! ```no_run
//! use id_card_grid::{generate, LayoutConfig, SourceDocument, OUTPUT_FILENAME};
//!
//! let sources = vec![
//!     SourceDocument::from_path("alice.pdf")?,
//!     SourceDocument::from_path("bob.png")?,
//! ];
//! let sheet = generate(&sources, &LayoutConfig::portrait())?;
//! for skipped in &sheet.report.skipped {
//!     eprintln!("{}: {}", skipped.filename, skipped.reason);
//! }
//! std::fs::write(OUTPUT_FILENAME, &sheet.pdf)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod colour;
pub use colour::*;

mod config;
pub use config::*;

mod content;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod generator;
pub use generator::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

/// Grid geometry, the placement cursor and cutting guides
pub mod layout;

mod page;
pub use page::*;

pub mod pagesize;

pub mod raster;
pub use raster::{PageSource, PdfBackend};

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod source;
pub use source::*;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality, mostly for inspecting generated content
pub use pdf_writer;
