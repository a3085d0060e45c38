//! Source construction for selected results.

use searchrelay_markdown::snippet_tree;
use searchrelay_shared::{PageResult, ScrapedPage, UsedSource};

/// Build the used-source record for one selected page.
///
/// Title, link, and snippet are copied verbatim; the snippet becomes both
/// the `context` string and the sole paragraph of the document tree. No page
/// metadata beyond the title exists at this stage, so the optional fields
/// stay absent.
pub fn build_source(page: &PageResult) -> UsedSource {
    UsedSource {
        title: page.title.clone(),
        link: page.link.clone(),
        page: ScrapedPage {
            title: page.title.clone(),
            markdown_tree: snippet_tree(&page.title, &page.link, &page.snippet),
            site_name: None,
            author: None,
            description: None,
            created_at: None,
            modified_at: None,
        },
        context: page.snippet.clone(),
    }
}
