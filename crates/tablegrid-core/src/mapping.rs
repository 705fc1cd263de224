//! Document-unit to image-pixel coordinate mapping.

use crate::geometry::{BBox, ScaleFactor};
use crate::token::Token;

/// Map a document-space box into image space. No rounding is applied.
pub fn to_image_space(bbox: &BBox, scale: &ScaleFactor) -> BBox {
    BBox::new(
        bbox.x0 * scale.sx,
        bbox.top * scale.sy,
        bbox.x1 * scale.sx,
        bbox.bottom * scale.sy,
    )
}

/// Map every token of a page into image space, keeping their order.
pub fn tokens_to_image_space(tokens: &[Token], scale: &ScaleFactor) -> Vec<Token> {
    tokens
        .iter()
        .map(|t| Token {
            text: t.text.clone(),
            bbox: to_image_space(&t.bbox, scale),
            page: t.page,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_each_axis() {
        let scale = ScaleFactor::new(2.0, 3.0);
        let mapped = to_image_space(&BBox::new(10.0, 10.0, 20.0, 20.0), &scale);
        assert_eq!(mapped, BBox::new(20.0, 30.0, 40.0, 60.0));
    }

    #[test]
    fn identity_is_a_no_op() {
        let bbox = BBox::new(1.5, 2.5, 3.5, 4.5);
        assert_eq!(to_image_space(&bbox, &ScaleFactor::identity()), bbox);
    }

    #[test]
    fn letter_page_at_300_dpi() {
        let scale = ScaleFactor::from_dimensions(612.0, 792.0, 2550, 3300).unwrap();
        let mapped = to_image_space(&BBox::new(72.0, 72.0, 144.0, 90.0), &scale);
        assert!((mapped.x0 - 300.0).abs() < 1e-9);
        assert!((mapped.top - 300.0).abs() < 1e-9);
        assert!((mapped.x1 - 600.0).abs() < 1e-9);
        assert!((mapped.bottom - 375.0).abs() < 1e-9);
    }

    #[test]
    fn tokens_keep_text_and_order() {
        let tokens = vec![
            Token::new("b", BBox::new(5.0, 0.0, 6.0, 1.0), 2),
            Token::new("a", BBox::new(0.0, 0.0, 1.0, 1.0), 2),
        ];
        let mapped = tokens_to_image_space(&tokens, &ScaleFactor::new(10.0, 10.0));
        assert_eq!(mapped[0].text, "b");
        assert_eq!(mapped[0].bbox, BBox::new(50.0, 0.0, 60.0, 10.0));
        assert_eq!(mapped[1].page, 2);
    }
}
