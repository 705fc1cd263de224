//! Cell inference for tables without ruling lines.
//!
//! Tokens are clustered greedily into rows by vertical center and, within a
//! row, into columns by horizontal center. Each cluster starts at its first
//! token and a token joins it while it stays within the threshold of that
//! first token (there is no running mean, so long runs of slightly
//! drifting tokens split where the distance to the anchor exceeds the
//! threshold).

use crate::cell::Cell;
use crate::geometry::{BBox, PixelBox};
use crate::settings::BorderlessSettings;
use crate::token::Token;

/// Group image-space tokens into rows, each row sorted by horizontal center.
pub fn cluster_rows<'a>(
    tokens: &'a [Token],
    settings: &BorderlessSettings,
) -> Vec<Vec<&'a Token>> {
    let mut sorted: Vec<&Token> = tokens.iter().collect();
    sorted.sort_by(|a, b| {
        let (ax, ay) = a.center();
        let (bx, by) = b.center();
        ay.total_cmp(&by).then(ax.total_cmp(&bx))
    });

    let mut rows: Vec<Vec<&Token>> = Vec::new();
    for token in sorted {
        let (_, cy) = token.center();
        match rows.last_mut() {
            Some(row) if (cy - row[0].center().1).abs() <= settings.row_threshold => {
                row.push(token)
            }
            _ => rows.push(vec![token]),
        }
    }
    for row in &mut rows {
        row.sort_by(|a, b| a.center().0.total_cmp(&b.center().0));
    }
    rows
}

/// Split one row (sorted by horizontal center) into column clusters.
fn cluster_columns<'a>(row: &[&'a Token], col_threshold: f64) -> Vec<Vec<&'a Token>> {
    let mut columns: Vec<Vec<&Token>> = Vec::new();
    for &token in row {
        let (cx, _) = token.center();
        match columns.last_mut() {
            Some(col) if cx - col[0].center().0 <= col_threshold => col.push(token),
            _ => columns.push(vec![token]),
        }
    }
    columns
}

/// Infer cells from image-space tokens, in row-major order.
///
/// A cell's box is the union of its tokens' boxes rounded outward to whole
/// pixels, and its text is their texts joined by single spaces. Each cell is
/// pinned to the token row it came from.
pub fn infer_cells(tokens: &[Token], settings: &BorderlessSettings) -> Vec<Cell> {
    let rows = cluster_rows(tokens, settings);
    let cells: Vec<Cell> = rows
        .iter()
        .enumerate()
        .flat_map(|(index, row)| {
            cluster_columns(row, settings.col_threshold)
                .into_iter()
                .filter_map(move |cluster| cluster_cell(&cluster).map(|c| c.in_row(index)))
        })
        .collect();
    tracing::debug!(
        tokens = tokens.len(),
        rows = rows.len(),
        cells = cells.len(),
        "inferred borderless cells"
    );
    cells
}

fn cluster_cell(cluster: &[&Token]) -> Option<Cell> {
    let bbox = cluster
        .iter()
        .map(|t| t.bbox)
        .reduce(|a: BBox, b| a.union(&b))?;
    let text = cluster
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    Some(Cell::new(PixelBox::covering(&bbox), text.trim()))
}
