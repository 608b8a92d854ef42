//! Generic fallback over social-preview meta tags and the document title.

use super::free_text::parse_generic;
use crate::constants::{META_OG_DESCRIPTION, META_OG_TITLE};
use crate::merge::merge_fill_missing;
use crate::page::PageSnapshot;
use crate::types::EventContext;

/// Parse `og:title`, `og:description` and the document title independently,
/// then let earlier sources win field by field.
pub fn extract(page: &PageSnapshot) -> Option<EventContext> {
    let heading = page.first_heading.as_deref();
    [page.meta(META_OG_TITLE), page.meta(META_OG_DESCRIPTION), page.title.as_deref()]
        .into_iter()
        .flatten()
        .filter_map(|text| parse_generic(text, heading))
        .reduce(|acc, next| merge_fill_missing(&acc, &next))
}
