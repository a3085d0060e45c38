//! Result selection: snippet filter plus truncation.

use searchrelay_shared::PageResult;

/// Maximum number of results carried into the final context.
pub const MAX_OUTPUT_RESULTS: usize = 5;

/// Keep results with a non-empty snippet, truncated to
/// [`MAX_OUTPUT_RESULTS`], preserving the provider's ranking order.
pub fn select_pages(pages: Vec<PageResult>) -> Vec<PageResult> {
    pages
        .into_iter()
        .filter(|p| !p.snippet.is_empty())
        .take(MAX_OUTPUT_RESULTS)
        .collect()
}
