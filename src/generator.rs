//! The generation run: sources in, a finished grid sheet and its report out.

use crate::config::LayoutConfig;
use crate::document::Document;
use crate::image::Image;
use crate::info::Info;
use crate::layout::{Advance, CutGuides, GridCursor, GridGeometry};
use crate::page::{ImageLayout, Page};
use crate::raster::{ImagePage, PageSource, PdfBackend};
use crate::rect::Rect;
use crate::source::{SourceDocument, SourceKind};
use crate::{SheetError, SourceError};
use image::RgbaImage;
use serde::Serialize;
use std::cell::OnceCell;

/// The name a finished sheet is offered for download under
pub const OUTPUT_FILENAME: &str = "processed_id_cards.pdf";

/// A finished, serialized sheet together with what happened while making it
#[derive(Debug, Clone)]
pub struct GridSheet {
    pub pdf: Vec<u8>,
    pub report: RunReport,
}

/// A source file, or one page of it, that was left out of the sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSource {
    pub filename: String,
    /// [None] when the whole file was skipped
    pub page: Option<usize>,
    #[serde(serialize_with = "as_display")]
    pub reason: SourceError,
}

/// What became of one source
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOutcome {
    /// Every page that rendered was placed; this many cards
    Placed(usize),
    /// Nothing from the file could be used
    Skipped(#[serde(serialize_with = "as_display")] SourceError),
    /// The card ceiling was reached after placing this many cards from the file
    Truncated(usize),
}

/// Where one card ended up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardPlacement {
    /// Filename of the source the card came from
    pub source: String,
    /// Page of the source, always `0` for images
    pub source_page: usize,
    /// Output page, starting at `0`
    pub sheet: usize,
    pub column: usize,
    pub row: usize,
    pub rect: Rect,
}

/// The side-channel status of a run, serializable for whatever presents it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub cards_placed: usize,
    /// Number of pages in the output
    pub pages: usize,
    /// Whether the card ceiling stopped the run before every source was used
    pub truncated: bool,
    pub skipped: Vec<SkippedSource>,
    /// One entry per source visited, in input order
    pub outcomes: Vec<(String, SourceOutcome)>,
    pub placements: Vec<CardPlacement>,
}

impl RunReport {
    /// True when nothing was skipped. A truncated run can still be a success.
    pub fn is_success(&self) -> bool {
        self.skipped.is_empty()
    }
}

fn as_display<S: serde::Serializer>(err: &SourceError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(err)
}

/// Lays sources out on grid sheets according to a [LayoutConfig].
///
/// A generator holds no state between runs, so the same one can be used for any
/// number of [generate](Generator::generate) calls.
///
/// ```no_run
/// use id_card_grid::{Generator, LayoutConfig, SourceDocument};
///
/// let generator = Generator::new(LayoutConfig::portrait())?;
/// let sources = vec![SourceDocument::from_path("front.pdf")?];
/// let sheet = generator.generate(&sources)?;
/// std::fs::write(id_card_grid::OUTPUT_FILENAME, &sheet.pdf)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Generator {
    config: LayoutConfig,
    geometry: GridGeometry,
    pdf: OnceCell<Option<Box<dyn PdfBackend>>>,
    info: Info,
}

impl Generator {
    /// Validate `config` and build a generator for it. The default PDF backend is
    /// bound the first time a PDF source is seen.
    pub fn new(config: LayoutConfig) -> Result<Generator, SheetError> {
        config.validate()?;
        Ok(Generator {
            geometry: GridGeometry::new(&config),
            config,
            pdf: OnceCell::new(),
            info: Info::card_sheet(),
        })
    }

    /// Rasterize PDFs with `backend` instead of the default one
    pub fn with_pdf_backend<B: PdfBackend + 'static>(mut self, backend: B) -> Generator {
        self.pdf = OnceCell::from(Some(Box::new(backend) as Box<dyn PdfBackend>));
        self
    }

    /// Skip every PDF source, only placing images
    pub fn without_pdf_backend(mut self) -> Generator {
        self.pdf = OnceCell::from(None);
        self
    }

    /// Metadata for the output's info dictionary
    pub fn with_info(mut self, info: Info) -> Generator {
        self.info = info;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    fn pdf_backend(&self) -> Option<&dyn PdfBackend> {
        self.pdf.get_or_init(default_pdf_backend).as_deref()
    }

    /// Lay every source out in order, one card per page, until the sources run out
    /// or the card ceiling is reached.
    ///
    /// Problems with individual files or pages are recorded in the report and
    /// skipped. Only failing to produce the document at all is an error.
    pub fn generate(&self, sources: &[SourceDocument]) -> Result<GridSheet, SheetError> {
        let mut run = Run::new(self);

        for source in sources {
            if run.at_capacity() {
                run.truncate();
                break;
            }
            let outcome = run.process(source);
            if let SourceOutcome::Skipped(reason) = &outcome {
                log::warn!("skipping {}: {reason}", source.filename);
                run.report.skipped.push(SkippedSource {
                    filename: source.filename.clone(),
                    page: None,
                    reason: reason.clone(),
                });
            }
            let stop = matches!(outcome, SourceOutcome::Truncated(_));
            run.report.outcomes.push((source.filename.clone(), outcome));
            if stop {
                break;
            }
        }

        run.finish(self.info.clone())
    }
}

/// Lay `sources` out with a freshly validated generator for `config`
pub fn generate(sources: &[SourceDocument], config: &LayoutConfig) -> Result<GridSheet, SheetError> {
    Generator::new(config.clone())?.generate(sources)
}

#[cfg(feature = "pdfium")]
fn default_pdf_backend() -> Option<Box<dyn PdfBackend>> {
    match crate::raster::PdfiumBackend::bind() {
        Ok(backend) => Some(Box::new(backend)),
        Err(e) => {
            log::warn!("PDF sources will be skipped: {e}");
            None
        }
    }
}

#[cfg(not(feature = "pdfium"))]
fn default_pdf_backend() -> Option<Box<dyn PdfBackend>> {
    log::warn!("built without a PDF engine, PDF sources will be skipped");
    None
}

/// Everything that lives for exactly one [Generator::generate] call
struct Run<'g> {
    generator: &'g Generator,
    doc: Document,
    guides: CutGuides,
    cursor: GridCursor,
    /// The sheet being filled, created when its first card arrives
    page: Option<Page>,
    report: RunReport,
}

impl<'g> Run<'g> {
    fn new(generator: &'g Generator) -> Run<'g> {
        let mut doc = Document::default();
        let guides = CutGuides::resolve(generator.config.cut_guide, &mut doc);
        let geometry = &generator.geometry;
        Run {
            generator,
            doc,
            guides,
            cursor: GridCursor::new(geometry.columns(), geometry.rows()),
            page: None,
            report: RunReport::default(),
        }
    }

    fn at_capacity(&self) -> bool {
        self.cursor.placed() >= self.generator.config.max_cards
    }

    fn truncate(&mut self) {
        if !self.report.truncated {
            log::warn!(
                "card limit of {} reached, remaining input ignored",
                self.generator.config.max_cards
            );
        }
        self.report.truncated = true;
    }

    fn process(&mut self, source: &SourceDocument) -> SourceOutcome {
        let kind = match source.kind() {
            Ok(kind) => kind,
            Err(e) => return SourceOutcome::Skipped(e),
        };

        let generator = self.generator;
        let cell_size = (generator.config.card_width, generator.config.card_height);
        let mut pages: Box<dyn PageSource + '_> = match kind.image_format() {
            Some(format) => match ImagePage::decode(&source.bytes, format, cell_size) {
                Ok(page) => Box::new(page),
                Err(e) => return SourceOutcome::Skipped(e),
            },
            None => {
                debug_assert_eq!(kind, SourceKind::Pdf);
                let Some(backend) = generator.pdf_backend() else {
                    return SourceOutcome::Skipped(SourceError::Render(
                        "PDF engine unavailable".to_string(),
                    ));
                };
                match backend.open(&source.bytes) {
                    Ok(pages) => pages,
                    Err(e) => return SourceOutcome::Skipped(e),
                }
            }
        };

        let mut placed = 0;
        for index in 0..pages.page_count() {
            if self.at_capacity() {
                self.truncate();
                return SourceOutcome::Truncated(placed);
            }
            match pages.render_page(index, generator.config.dpi_scale) {
                Ok(raster) => {
                    self.place(raster, &source.filename, index);
                    placed += 1;
                }
                Err(reason) => {
                    log::warn!("skipping page {index} of {}: {reason}", source.filename);
                    self.report.skipped.push(SkippedSource {
                        filename: source.filename.clone(),
                        page: Some(index),
                        reason,
                    });
                }
            }
        }
        SourceOutcome::Placed(placed)
    }

    fn place(&mut self, raster: RgbaImage, source: &str, source_page: usize) {
        let generator = self.generator;
        let geometry = &generator.geometry;
        // the raster is consumed here, only its compressed form is kept
        let image_id = self.doc.add_image(Image::from_raster(raster));

        let (column, row) = self.cursor.position();
        let rect = geometry.cell(column, row);
        let sheet = self.doc.page_count();
        let page = self
            .page
            .get_or_insert_with(|| Page::new(geometry.page_size()));

        self.guides.draw_guide(page, &rect);
        page.add_image(ImageLayout {
            image_id,
            position: rect,
        });
        self.guides.draw_border(page, &rect);

        log::debug!("placed {source} page {source_page} on sheet {sheet} at ({column}, {row})");
        self.report.placements.push(CardPlacement {
            source: source.to_string(),
            source_page,
            sheet,
            column,
            row,
            rect,
        });

        if self.cursor.advance() == Advance::SheetFull {
            self.finish_page();
        }
    }

    fn finish_page(&mut self) {
        if let Some(page) = self.page.take() {
            let id = self.doc.add_page(page);
            log::debug!("sheet {} finished", id.index());
        }
    }

    fn finish(mut self, info: Info) -> Result<GridSheet, SheetError> {
        self.finish_page();
        self.doc.set_info(info);

        let mut report = self.report;
        report.cards_placed = self.cursor.placed();
        report.pages = self.doc.page_count();
        let pdf = self.doc.to_bytes()?;

        log::info!(
            "placed {} cards on {} pages ({} skipped{})",
            report.cards_placed,
            report.pages,
            report.skipped.len(),
            if report.truncated { ", truncated" } else { "" }
        );
        Ok(GridSheet { pdf, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_success_ignores_truncation() {
        let mut report = RunReport {
            truncated: true,
            ..RunReport::default()
        };
        assert!(report.is_success());

        report.skipped.push(SkippedSource {
            filename: "photo.gif".into(),
            page: None,
            reason: SourceError::UnsupportedFormat("gif".into()),
        });
        assert!(!report.is_success());
    }

    #[test]
    fn skipped_sources_serialize_their_reason_as_text() {
        let skipped = SkippedSource {
            filename: "photo.gif".into(),
            page: None,
            reason: SourceError::UnsupportedFormat("gif".into()),
        };
        let json = serde_json::to_value(&skipped).expect("serializes");
        assert_eq!(json["reason"], "unsupported file format: \"gif\"");
        assert!(json["page"].is_null());
    }

    #[test]
    fn whole_report_serializes() {
        let report = RunReport {
            cards_placed: 1,
            pages: 1,
            truncated: false,
            skipped: vec![],
            outcomes: vec![
                ("a.png".into(), SourceOutcome::Placed(1)),
                (
                    "b.txt".into(),
                    SourceOutcome::Skipped(SourceError::UnsupportedFormat("txt".into())),
                ),
            ],
            placements: vec![],
        };
        let json = serde_json::to_value(&report).expect("serializes");
        assert_eq!(json["cards_placed"], 1);
        assert_eq!(json["outcomes"][0][0], "a.png");
        assert_eq!(json["outcomes"][0][1]["placed"], 1);
        assert_eq!(
            json["outcomes"][1][1]["skipped"],
            "unsupported file format: \"txt\""
        );
    }

    #[test]
    fn invalid_configs_are_rejected_up_front() {
        let config = LayoutConfig::portrait().grid(0, 3).clone();
        assert!(matches!(
            Generator::new(config),
            Err(SheetError::InvalidLayout(_))
        ));

        // an unbounded scale would try to allocate a gigantic bitmap
        let config = LayoutConfig::portrait().dpi_scale(1.0e8).clone();
        assert!(matches!(
            Generator::new(config),
            Err(SheetError::InvalidLayout(_))
        ));
    }

    #[test]
    fn no_sources_means_no_pages() {
        let sheet = Generator::new(LayoutConfig::portrait())
            .expect("valid")
            .without_pdf_backend()
            .generate(&[])
            .expect("generates");
        assert_eq!(sheet.report.pages, 0);
        assert_eq!(sheet.report.cards_placed, 0);
        assert!(sheet.pdf.starts_with(b"%PDF-"));
    }
}
