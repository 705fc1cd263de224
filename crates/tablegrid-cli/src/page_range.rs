/// Parse a 1-based page selection like "1,3-5" into sorted, deduplicated
/// 0-based page indices, validated against `page_count`.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, String> {
    let mut pages = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((a, b)) => (parse_page(a, page_count)?, parse_page(b, page_count)?),
            None => {
                let page = parse_page(part, page_count)?;
                (page, page)
            }
        };
        if start > end {
            return Err(format!("descending page range: '{part}'"));
        }
        pages.extend((start..=end).map(|p| p - 1));
    }
    if pages.is_empty() {
        return Err(format!("empty page selection: '{input}'"));
    }
    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn parse_page(text: &str, page_count: usize) -> Result<usize, String> {
    let text = text.trim();
    let page: usize = text
        .parse()
        .map_err(|_| format!("invalid page number: '{text}'"))?;
    if page == 0 {
        return Err("page 0 is invalid (pages start at 1)".to_string());
    }
    if page > page_count {
        return Err(format!(
            "page {page} exceeds document page count ({page_count})"
        ));
    }
    Ok(page)
}
