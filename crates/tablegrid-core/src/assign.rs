//! Text-to-cell assignment by strict geometric containment.

use crate::cell::Cell;
use crate::geometry::PixelBox;
use crate::token::Token;

/// Whether an image-space token box lies entirely inside a cell box.
///
/// There is no tolerance: touching an edge counts as inside, crossing it
/// by any amount does not.
pub fn token_in_cell(token: &Token, cell: &PixelBox) -> bool {
    let (cx, cy) = (f64::from(cell.x), f64::from(cell.y));
    let (cr, cb) = (f64::from(cell.right()), f64::from(cell.bottom()));
    token.bbox.x0 >= cx && token.bbox.x1 <= cr && token.bbox.top >= cy && token.bbox.bottom <= cb
}

/// Text of one cell: contained tokens in input order, space-joined and trimmed.
pub fn cell_text(cell: &PixelBox, tokens: &[Token]) -> String {
    let joined = tokens
        .iter()
        .filter(|t| token_in_cell(t, cell))
        .fold(String::new(), |mut acc, t| {
            if !acc.is_empty() {
                acc.push(' ');
            }
            acc.push_str(&t.text);
            acc
        });
    joined.trim().to_string()
}

/// Build cells from boxes and image-space tokens.
///
/// Cells are independent: overlapping boxes may receive the same token, and
/// a token straddling two boxes lands in neither.
pub fn assign_text(boxes: &[PixelBox], tokens: &[Token]) -> Vec<Cell> {
    boxes
        .iter()
        .map(|b| Cell::new(*b, cell_text(b, tokens)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BBox;

    fn tok(text: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> Token {
        Token::new(text, BBox::new(x0, top, x1, bottom), 1)
    }

    fn pb(x: u32, y: u32, w: u32, h: u32) -> PixelBox {
        PixelBox::new(x, y, w, h).unwrap()
    }

    #[test]
    fn contained_tokens_joined_in_order() {
        let cell = pb(10, 10, 100, 30);
        let tokens = vec![
            tok("Ann", 15.0, 15.0, 40.0, 30.0),
            tok("outside", 200.0, 15.0, 240.0, 30.0),
            tok("Lee", 45.0, 15.0, 70.0, 30.0),
        ];
        assert_eq!(cell_text(&cell, &tokens), "Ann Lee");
    }

    #[test]
    fn edges_are_inclusive() {
        let cell = pb(10, 10, 100, 30);
        assert!(token_in_cell(&tok("x", 10.0, 10.0, 110.0, 40.0), &cell));
        assert!(!token_in_cell(&tok("x", 9.9, 10.0, 50.0, 40.0), &cell));
        assert!(!token_in_cell(&tok("x", 10.0, 10.0, 110.1, 40.0), &cell));
    }

    #[test]
    fn straddling_token_assigned_to_neither_cell() {
        let boxes = vec![pb(0, 0, 100, 40), pb(100, 0, 100, 40)];
        let tokens = vec![tok("wide", 80.0, 5.0, 130.0, 30.0)];
        let cells = assign_text(&boxes, &tokens);
        assert_eq!(cells[0].text, "");
        assert_eq!(cells[1].text, "");
    }

    #[test]
    fn overlapping_cells_share_tokens() {
        let boxes = vec![pb(0, 0, 100, 40), pb(0, 0, 200, 40)];
        let tokens = vec![tok("both", 10.0, 5.0, 50.0, 30.0)];
        let cells = assign_text(&boxes, &tokens);
        assert_eq!(cells[0].text, "both");
        assert_eq!(cells[1].text, "both");
    }

    #[test]
    fn growing_a_cell_never_loses_text() {
        let tokens = vec![
            tok("a", 12.0, 12.0, 20.0, 20.0),
            tok("b", 30.0, 12.0, 45.0, 20.0),
            tok("c", 60.0, 50.0, 70.0, 58.0),
        ];
        let small = pb(10, 10, 40, 15);
        let large = pb(5, 5, 80, 60);
        let small_set: Vec<&Token> = tokens.iter().filter(|t| token_in_cell(t, &small)).collect();
        for t in small_set {
            assert!(token_in_cell(t, &large));
        }
        assert_eq!(cell_text(&large, &tokens), "a b c");
    }

    #[test]
    fn mapped_token_overflowing_right_edge_is_not_assigned() {
        use crate::geometry::ScaleFactor;
        use crate::mapping::tokens_to_image_space;

        let tokens = vec![tok("Total", 10.0, 5.0, 50.0, 15.0)];
        let mapped = tokens_to_image_space(&tokens, &ScaleFactor::new(2.0, 2.0));
        assert_eq!(mapped[0].bbox, BBox::new(20.0, 10.0, 100.0, 30.0));
        let cells = assign_text(&[pb(20, 10, 60, 20)], &mapped);
        assert_eq!(cells[0].text, "");
    }

    #[test]
    fn empty_cell_and_whitespace_trimmed() {
        let cell = pb(0, 0, 50, 50);
        assert_eq!(cell_text(&cell, &[]), "");
        let tokens = vec![tok(" x ", 1.0, 1.0, 10.0, 10.0)];
        assert_eq!(cell_text(&cell, &tokens), "x");
    }
}
