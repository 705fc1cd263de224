//! Per-page orchestration of the reconstruction stages.

use image::DynamicImage;

use crate::assemble::{TableGrid, assemble_table};
use crate::discovery::{CellStrategy, RegionContext, discover_cells};
use crate::error::{ExtractResult, ExtractWarning, ExtractWarningCode, GridError};
use crate::geometry::{PixelBox, ScaleFactor};
use crate::mapping::tokens_to_image_space;
use crate::mask::build_line_masks_gray;
use crate::region::detect_regions;
use crate::settings::{DiscoveryMode, GridSettings};
use crate::token::Token;

/// One rendered page and its text, ready for table extraction.
#[derive(Debug, Clone)]
pub struct PageInput {
    /// 1-based page number.
    pub page_number: usize,
    /// Rendered page.
    pub image: DynamicImage,
    /// Page width in document units.
    pub page_width: f64,
    /// Page height in document units.
    pub page_height: f64,
    /// Tokens in document units.
    pub tokens: Vec<Token>,
}

/// One reconstructed table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableRecord {
    /// 1-based page number.
    pub page_number: usize,
    /// 1-based table number within the page, in region order.
    pub table_number: usize,
    /// Table region in page pixels.
    pub region: PixelBox,
    /// Strategy that produced the cells.
    pub strategy: CellStrategy,
    pub grid: TableGrid,
}

/// Extracts tables from pages with a fixed set of [`GridSettings`].
#[derive(Debug, Clone, Default)]
pub struct TableExtractor {
    settings: GridSettings,
}

impl TableExtractor {
    pub fn new(settings: GridSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// Extract every table of one page.
    ///
    /// Tables whose region yields no cells are skipped with an
    /// [`ExtractWarningCode::EmptyTable`] warning. Table numbers follow region
    /// order, so a skipped table leaves a gap.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSettings`] for out-of-range settings,
    /// [`GridError::InvalidPageSize`] when the page has no usable size, and
    /// [`GridError::Strict`] when strict mode is on and a warning was raised.
    pub fn extract_page(
        &self,
        page: &PageInput,
    ) -> Result<ExtractResult<Vec<TableRecord>>, GridError> {
        self.settings.validate()?;
        self.extract_page_lenient(page)?
            .into_strict(self.settings.strict)
    }

    fn extract_page_lenient(
        &self,
        page: &PageInput,
    ) -> Result<ExtractResult<Vec<TableRecord>>, GridError> {
        let page_number = page.page_number;
        let gray = page.image.to_luma8();
        let scale = ScaleFactor::from_dimensions(
            page.page_width,
            page.page_height,
            gray.width(),
            gray.height(),
        )?;
        let tokens = tokens_to_image_space(&page.tokens, &scale);
        if tokens.is_empty() {
            tracing::warn!(page = page_number, "no text found");
        }

        let regions: Vec<PixelBox> = match self.settings.mode {
            DiscoveryMode::Borderless => PixelBox::new(0, 0, gray.width(), gray.height())
                .into_iter()
                .collect(),
            DiscoveryMode::Auto | DiscoveryMode::Ruled => {
                let masks = build_line_masks_gray(&gray, &self.settings.page_mask);
                detect_regions(&masks.combined())
            }
        };
        tracing::info!(page = page_number, tables = regions.len(), "detected tables");

        let mut records = Vec::new();
        let mut warnings = Vec::new();
        for (index, region) in regions.into_iter().enumerate() {
            let table_number = index + 1;
            let ctx = RegionContext {
                page: &gray,
                region,
                tokens: &tokens,
                settings: &self.settings,
            };
            let (strategy, cells) = discover_cells(self.settings.mode, &ctx);

            if cells.is_empty() {
                if self.settings.mode == DiscoveryMode::Borderless {
                    tracing::info!(page = page_number, "no tokens to cluster");
                    continue;
                }
                tracing::warn!(page = page_number, table = table_number, "no cells detected");
                warnings.push(
                    ExtractWarning::with_code(ExtractWarningCode::EmptyTable, "no cells detected")
                        .on_page(page_number)
                        .on_table(table_number),
                );
                continue;
            }

            let grid = assemble_table(&cells, &self.settings.assembly);
            tracing::info!(
                page = page_number,
                table = table_number,
                strategy = strategy.as_str(),
                rows = grid.row_count(),
                columns = grid.column_count(),
                "reconstructed table"
            );
            records.push(TableRecord {
                page_number,
                table_number,
                region,
                strategy,
                grid,
            });
        }
        Ok(ExtractResult::with_warnings(records, warnings))
    }

    /// Extract the tables of several pages in order.
    ///
    /// # Errors
    ///
    /// Stops at the first page that fails with a [`GridError`].
    pub fn extract_pages(
        &self,
        pages: &[PageInput],
    ) -> Result<ExtractResult<Vec<TableRecord>>, GridError> {
        let results = pages
            .iter()
            .map(|p| self.extract_page(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(merge(results))
    }

    /// Extract the tables of several pages concurrently using rayon.
    ///
    /// Output is ordered by input page regardless of which worker finished
    /// first. Each worker owns its page's buffers.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing page in input order.
    #[cfg(feature = "parallel")]
    pub fn extract_pages_parallel(
        &self,
        pages: &[PageInput],
    ) -> Result<ExtractResult<Vec<TableRecord>>, GridError> {
        use rayon::prelude::*;

        let results = pages
            .par_iter()
            .map(|p| self.extract_page(p))
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(merge(results))
    }
}

fn merge(results: Vec<ExtractResult<Vec<TableRecord>>>) -> ExtractResult<Vec<TableRecord>> {
    let mut merged = ExtractResult::ok(Vec::new());
    for result in results {
        merged.value.extend(result.value);
        merged.warnings.extend(result.warnings);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BBox;
    use crate::mask::tests::{blank, draw_hline, ruled_grid};

    fn tok(text: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> Token {
        Token::new(text, BBox::new(x0, top, x1, bottom), 1)
    }

    /// 400×300 page image with a 2×2 ruled table, page size half the
    /// image size (scale 2).
    fn ruled_page(tokens: Vec<Token>) -> PageInput {
        let mut img = blank(400, 300);
        ruled_grid(&mut img, &[50, 150, 250], &[50, 110, 170]);
        PageInput {
            page_number: 1,
            image: DynamicImage::ImageLuma8(img),
            page_width: 200.0,
            page_height: 150.0,
            tokens,
        }
    }

    #[test]
    fn ruled_table_end_to_end() {
        let page = ruled_page(vec![
            tok("Item", 30.0, 30.0, 50.0, 40.0),
            tok("Qty", 80.0, 30.0, 95.0, 40.0),
            tok("Bolt", 30.0, 60.0, 50.0, 70.0),
            tok("4", 80.0, 60.0, 85.0, 70.0),
        ]);
        let result = TableExtractor::default().extract_page(&page).unwrap();
        assert!(result.is_clean());
        assert_eq!(result.value.len(), 1);
        let record = &result.value[0];
        assert_eq!(record.page_number, 1);
        assert_eq!(record.table_number, 1);
        assert_eq!(record.strategy, CellStrategy::Ruled);
        assert_eq!(record.region, PixelBox::new(50, 50, 201, 121).unwrap());
        assert_eq!(record.grid.rows()[0], vec!["Item", "Qty"]);
        assert_eq!(record.grid.rows()[1], vec!["Bolt", "4"]);
    }

    #[test]
    fn four_cells_without_tokens_are_empty() {
        let result = TableExtractor::default().extract_page(&ruled_page(Vec::new())).unwrap();
        let grid = &result.value[0].grid;
        assert_eq!((grid.row_count(), grid.column_count()), (2, 2));
        assert!(grid.rows().iter().flatten().all(String::is_empty));
    }

    #[test]
    fn strict_edge_token_leaves_cell_empty() {
        // Token maps to x 60..310 which overflows the first cell.
        let page = ruled_page(vec![tok("Total", 30.0, 30.0, 155.0, 40.0)]);
        let result = TableExtractor::default().extract_page(&page).unwrap();
        assert!(result.value[0].grid.rows().iter().flatten().all(String::is_empty));
    }

    #[test]
    fn blank_page_has_no_tables() {
        let page = PageInput {
            page_number: 3,
            image: DynamicImage::ImageLuma8(blank(200, 200)),
            page_width: 200.0,
            page_height: 200.0,
            tokens: vec![tok("hello", 10.0, 10.0, 40.0, 20.0)],
        };
        let result = TableExtractor::default().extract_page(&page).unwrap();
        assert!(result.value.is_empty());
        assert!(result.is_clean());
    }

    fn page_with_line_and_table() -> PageInput {
        // Table 1: a lone rule with no cells. Table 2: a 2×2 grid.
        let mut img = blank(400, 400);
        draw_hline(&mut img, 50, 350, 20);
        ruled_grid(&mut img, &[50, 150, 250], &[100, 160, 220]);
        PageInput {
            page_number: 2,
            image: DynamicImage::ImageLuma8(img),
            page_width: 400.0,
            page_height: 400.0,
            tokens: Vec::new(),
        }
    }

    #[test]
    fn empty_table_skipped_with_warning() {
        let settings = GridSettings {
            mode: DiscoveryMode::Ruled,
            ..GridSettings::default()
        };
        let result = TableExtractor::new(settings)
            .extract_page(&page_with_line_and_table())
            .unwrap();
        assert_eq!(result.value.len(), 1);
        assert_eq!(result.value[0].table_number, 2);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, ExtractWarningCode::EmptyTable);
        assert_eq!(result.warnings[0].page, Some(2));
        assert_eq!(result.warnings[0].table, Some(1));
    }

    #[test]
    fn strict_mode_fails_on_empty_table() {
        let settings = GridSettings {
            mode: DiscoveryMode::Ruled,
            strict: true,
            ..GridSettings::default()
        };
        let err = TableExtractor::new(settings)
            .extract_page(&page_with_line_and_table())
            .unwrap_err();
        assert!(matches!(err, GridError::Strict(_)));
    }

    #[test]
    fn borderless_mode_clusters_whole_page() {
        let page = PageInput {
            page_number: 1,
            image: DynamicImage::ImageLuma8(blank(400, 400)),
            page_width: 400.0,
            page_height: 400.0,
            tokens: vec![
                tok("a", 90.0, 95.0, 110.0, 105.0),
                tok("b", 190.0, 98.0, 210.0, 108.0),
                tok("c", 290.0, 92.0, 310.0, 102.0),
                tok("d", 90.0, 295.0, 110.0, 305.0),
            ],
        };
        let settings = GridSettings {
            mode: DiscoveryMode::Borderless,
            ..GridSettings::default()
        };
        let result = TableExtractor::new(settings).extract_page(&page).unwrap();
        assert_eq!(result.value.len(), 1);
        let record = &result.value[0];
        assert_eq!(record.strategy, CellStrategy::Borderless);
        assert_eq!(record.grid.row_count(), 2);
        assert_eq!(record.grid.rows()[0], vec!["a", "b", "c"]);
        assert_eq!(record.grid.rows()[1], vec!["d", "", ""]);
    }

    #[test]
    fn borderless_rows_survive_assembly() {
        // "Unit" and "price" merge into one tall cell whose center lies
        // within the row threshold of "Bolt" on the next token row.
        let page = PageInput {
            page_number: 1,
            image: DynamicImage::ImageLuma8(blank(400, 400)),
            page_width: 400.0,
            page_height: 400.0,
            tokens: vec![
                tok("Unit", 90.0, 95.0, 110.0, 105.0),
                tok("price", 90.0, 107.0, 110.0, 117.0),
                tok("Bolt", 90.0, 113.0, 110.0, 123.0),
            ],
        };
        let settings = GridSettings {
            mode: DiscoveryMode::Borderless,
            ..GridSettings::default()
        };
        let result = TableExtractor::new(settings).extract_page(&page).unwrap();
        let grid = &result.value[0].grid;
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.rows()[0], vec!["Unit price"]);
        assert_eq!(grid.rows()[1], vec!["Bolt"]);
    }

    #[test]
    fn borderless_mode_without_tokens_has_no_tables() {
        let page = PageInput {
            page_number: 1,
            image: DynamicImage::ImageLuma8(blank(100, 100)),
            page_width: 100.0,
            page_height: 100.0,
            tokens: Vec::new(),
        };
        let settings = GridSettings {
            mode: DiscoveryMode::Borderless,
            ..GridSettings::default()
        };
        let result = TableExtractor::new(settings).extract_page(&page).unwrap();
        assert!(result.value.is_empty());
        assert!(result.is_clean());
    }

    #[test]
    fn invalid_page_size_is_fatal() {
        let mut page = ruled_page(Vec::new());
        page.page_height = 0.0;
        let err = TableExtractor::default().extract_page(&page).unwrap_err();
        assert!(matches!(err, GridError::InvalidPageSize { .. }));
    }

    #[test]
    fn invalid_settings_are_fatal() {
        let mut settings = GridSettings::default();
        settings.page_mask.block_size = 4;
        let err = TableExtractor::new(settings)
            .extract_page(&ruled_page(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, GridError::InvalidSettings(_)));
    }

    #[test]
    fn pages_processed_in_order_and_deterministic() {
        let mut second = ruled_page(Vec::new());
        second.page_number = 2;
        let pages = vec![ruled_page(Vec::new()), second];
        let extractor = TableExtractor::default();
        let first_run = extractor.extract_pages(&pages).unwrap();
        let second_run = extractor.extract_pages(&pages).unwrap();
        let numbers: Vec<usize> = first_run.value.iter().map(|r| r.page_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(first_run.value, second_run.value);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_sequential() {
        let pages: Vec<PageInput> = (1..=4)
            .map(|n| {
                let mut p = ruled_page(vec![tok("x", 30.0, 30.0, 40.0, 40.0)]);
                p.page_number = n;
                p
            })
            .collect();
        let extractor = TableExtractor::default();
        let seq = extractor.extract_pages(&pages).unwrap();
        let par = extractor.extract_pages_parallel(&pages).unwrap();
        assert_eq!(seq.value, par.value);
    }
}
