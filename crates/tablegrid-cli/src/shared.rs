use std::io::{self, IsTerminal, Write};

use tablegrid::PageSource;

use crate::page_range::parse_page_range;

/// Resolve an optional page selection into 0-based page indices.
///
/// `None` selects every page.
pub fn resolve_pages<S>(pages: Option<&str>, source: &S) -> Result<Option<Vec<usize>>, i32>
where
    S: PageSource + ?Sized,
{
    pages
        .map(|range| {
            parse_page_range(range, source.page_count()).map_err(|e| {
                eprintln!("Error: {e}");
                1
            })
        })
        .transpose()
}

/// Prints "Processing page N/M..." to stderr, only when stderr is a TTY.
pub struct ProgressReporter {
    is_tty: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            is_tty: io::stderr().is_terminal(),
        }
    }

    pub fn report(&self, current: usize, total: usize) {
        if self.is_tty {
            eprint!("\rProcessing page {current}/{total}...");
            let _ = io::stderr().flush();
        }
    }

    /// Clear the progress line.
    pub fn finish(&self) {
        if self.is_tty {
            eprint!("\r{}\r", " ".repeat(40));
            let _ = io::stderr().flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablegrid::ImagePageSource;

    fn one_page() -> ImagePageSource {
        ImagePageSource::new(image::DynamicImage::new_luma8(10, 10), Vec::new(), None)
    }

    #[test]
    fn all_pages_when_unset() {
        assert_eq!(resolve_pages(None, &one_page()).unwrap(), None);
    }

    #[test]
    fn selected_pages() {
        assert_eq!(resolve_pages(Some("1"), &one_page()).unwrap(), Some(vec![0]));
    }

    #[test]
    fn bad_selection_exits_with_one() {
        assert_eq!(resolve_pages(Some("2"), &one_page()).unwrap_err(), 1);
    }
}
