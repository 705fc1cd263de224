//! Assembly of text-bearing cells into a rectangular grid.

use std::collections::BTreeMap;

use crate::cell::Cell;
use crate::settings::AssemblySettings;

/// A rectangular table of cell strings (rows × columns).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct TableGrid {
    rows: Vec<Vec<String>>,
}

impl TableGrid {
    /// Build a grid, padding short rows with empty strings.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text at `(row, col)`, if inside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

/// Row tolerance used when none is configured: half the median cell
/// height, never below one pixel.
pub fn default_row_tolerance(cells: &[Cell]) -> f64 {
    let mut heights: Vec<f64> = cells.iter().map(|c| f64::from(c.bbox.h)).collect();
    if heights.is_empty() {
        return 1.0;
    }
    heights.sort_by(f64::total_cmp);
    let mid = heights.len() / 2;
    let median = if heights.len() % 2 == 0 {
        (heights[mid - 1] + heights[mid]) / 2.0
    } else {
        heights[mid]
    };
    (median / 2.0).max(1.0)
}

/// Group cells into rows, top to bottom, each row ordered left to right.
///
/// When every cell is pinned to a row (see [`Cell::row`]) those rows are
/// used as given. Otherwise cells are visited by vertical center, then `x`,
/// and a cell joins the current row while its vertical center is within
/// `tolerance` of the center of the row's first cell.
pub fn group_rows<'a>(cells: &'a [Cell], tolerance: f64) -> Vec<Vec<&'a Cell>> {
    if !cells.is_empty() && cells.iter().all(|c| c.row.is_some()) {
        return pinned_rows(cells);
    }

    let mut sorted: Vec<&Cell> = cells.iter().collect();
    sorted.sort_by(|a, b| {
        a.bbox
            .center_y()
            .total_cmp(&b.bbox.center_y())
            .then(a.bbox.x.cmp(&b.bbox.x))
    });

    let mut rows: Vec<Vec<&Cell>> = Vec::new();
    for cell in sorted {
        let cy = cell.bbox.center_y();
        match rows.last_mut() {
            Some(row) if (cy - row[0].bbox.center_y()).abs() <= tolerance => row.push(cell),
            _ => rows.push(vec![cell]),
        }
    }
    for row in &mut rows {
        row.sort_by_key(|c| (c.bbox.x, c.bbox.y));
    }
    rows
}

fn pinned_rows(cells: &[Cell]) -> Vec<Vec<&Cell>> {
    let mut rows: BTreeMap<usize, Vec<&Cell>> = BTreeMap::new();
    for cell in cells {
        if let Some(row) = cell.row {
            rows.entry(row).or_default().push(cell);
        }
    }
    rows.into_values()
        .map(|mut row| {
            row.sort_by_key(|c| (c.bbox.x, c.bbox.y));
            row
        })
        .collect()
}

/// Assemble cells into a rectangular grid.
///
/// The grid is as wide as the widest row. The horizontal centers of the
/// first widest row act as column anchors: each cell of a shorter row goes
/// to the slot of its nearest anchor, moved right as needed so slots stay
/// strictly increasing, and moved left as needed so the rest of the row
/// still fits. Unfilled slots are empty strings.
pub fn assemble_table(cells: &[Cell], settings: &AssemblySettings) -> TableGrid {
    if cells.is_empty() {
        return TableGrid::default();
    }
    let tolerance = settings
        .row_tolerance
        .unwrap_or_else(|| default_row_tolerance(cells));
    let rows = group_rows(cells, tolerance);

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let anchors: Vec<f64> = rows
        .iter()
        .find(|r| r.len() == width)
        .map(|r| r.iter().map(|c| c.bbox.center_x()).collect())
        .unwrap_or_default();

    let grid: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut out = vec![String::new(); width];
            let mut next_free = 0;
            for (i, cell) in row.iter().enumerate() {
                let latest = width - (row.len() - i);
                let slot = nearest_anchor(&anchors, cell.bbox.center_x())
                    .max(next_free)
                    .min(latest);
                out[slot] = cell.text.clone();
                next_free = slot + 1;
            }
            out
        })
        .collect();

    tracing::debug!(
        cells = cells.len(),
        rows = grid.len(),
        columns = width,
        tolerance,
        "assembled table"
    );
    TableGrid { rows: grid }
}

fn nearest_anchor(anchors: &[f64], x: f64) -> usize {
    anchors
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - x).abs().total_cmp(&(*b - x).abs()))
        .map_or(0, |(i, _)| i)
}
