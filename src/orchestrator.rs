//! Fixed-priority extraction waterfall.
//!
//! Strategies are plain descriptors in a static table; one loop walks them in
//! order and stops at the first that yields a context. The terminal fallback
//! sits outside the table and cannot fail.

use crate::constants::{
    META_OG_TITLE, STUBHUB_HOST_MARKER, TICKETMASTER_HOST_MARKER, TICKETMASTER_TITLE_MARKER,
    VIAGOGO_HOST_MARKER,
};
use crate::extractors::{embedded_json, free_text, jsonld, meta, slug, title};
use crate::merge::merge_overwrite;
use crate::metrics::ExtractionMetrics;
use crate::page::PageSnapshot;
use crate::text::{clean, clean_opt, contains_ignore_case};
use crate::types::{ContextSource, EventContext, ExtractionResult};
use std::time::Instant;
use tracing::debug;

/// Marketplace families a page belongs to, decided from host and title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostProfile {
    pub ticketmaster: bool,
    pub viagogo: bool,
    pub stubhub: bool,
}

impl HostProfile {
    pub fn detect(host: &str, title: &str) -> Self {
        let host = host.to_lowercase();
        Self {
            ticketmaster: host.contains(TICKETMASTER_HOST_MARKER)
                || contains_ignore_case(title, TICKETMASTER_TITLE_MARKER),
            viagogo: host.contains(VIAGOGO_HOST_MARKER),
            stubhub: host.contains(STUBHUB_HOST_MARKER),
        }
    }

    pub fn for_page(page: &PageSnapshot) -> Self {
        Self::detect(&page.host, page.title_text())
    }
}

/// One row of the waterfall.
pub struct Strategy {
    pub source: ContextSource,
    pub applies: fn(&HostProfile) -> bool,
    pub extract: fn(&PageSnapshot) -> Option<EventContext>,
}

fn always(_: &HostProfile) -> bool {
    true
}

fn on_ticketmaster(profile: &HostProfile) -> bool {
    profile.ticketmaster
}

fn on_viagogo(profile: &HostProfile) -> bool {
    profile.viagogo
}

fn on_stubhub(profile: &HostProfile) -> bool {
    profile.stubhub
}

fn ticketmaster_title(page: &PageSnapshot) -> Option<EventContext> {
    title::parse_title(page.title_text())
}

/// Meta fields overwritten by the URL slug, then by the scanned time.
fn stubhub_merge(page: &PageSnapshot) -> Option<EventContext> {
    let from_meta = meta::extract(page).unwrap_or_default();
    let from_slug = slug::extract(page).unwrap_or_default();
    let from_time = slug::time_fallback(page).unwrap_or_default();

    let merged = merge_overwrite(&merge_overwrite(&from_meta, &from_slug), &from_time);
    merged.has_any().then_some(merged)
}

pub static STRATEGIES: &[Strategy] = &[
    Strategy {
        source: ContextSource::TicketmasterJsonld,
        applies: on_ticketmaster,
        extract: jsonld::extract,
    },
    Strategy {
        source: ContextSource::TicketmasterTitle,
        applies: on_ticketmaster,
        extract: ticketmaster_title,
    },
    Strategy {
        source: ContextSource::JsonldEvent,
        applies: always,
        extract: jsonld::extract,
    },
    Strategy {
        source: ContextSource::NextdataEventlike,
        applies: always,
        extract: embedded_json::extract,
    },
    Strategy {
        source: ContextSource::ViagogoSmart,
        applies: on_viagogo,
        extract: free_text::extract_viagogo,
    },
    Strategy {
        source: ContextSource::StubhubMerge,
        applies: on_stubhub,
        extract: stubhub_merge,
    },
    Strategy {
        source: ContextSource::MetaSmart,
        applies: always,
        extract: meta::extract,
    },
];

/// Title-only context from the first heading, `og:title` or document title.
pub fn fallback_context(page: &PageSnapshot) -> EventContext {
    let raw_title = clean_opt(page.first_heading.as_deref())
        .or_else(|| clean_opt(page.meta(META_OG_TITLE)))
        .or_else(|| clean(page.title_text()));
    EventContext::titled(raw_title)
}

fn run_waterfall(page: &PageSnapshot) -> ExtractionResult {
    let profile = HostProfile::for_page(page);
    for strategy in STRATEGIES.iter().filter(|s| (s.applies)(&profile)) {
        if let Some(context) = (strategy.extract)(page) {
            return ExtractionResult::new(strategy.source, context);
        }
        debug!(host = %page.host, "{}: no context", strategy.source);
    }
    ExtractionResult::new(ContextSource::Fallback, fallback_context(page))
}

/// Run the waterfall for one page. Never fails: the last resort is a
/// title-only `fallback` result.
pub fn extract_context(page: &PageSnapshot) -> ExtractionResult {
    let start = Instant::now();
    let result = run_waterfall(page);
    ExtractionMetrics::record_extraction(result.source, start.elapsed().as_secs_f64());
    debug!(host = %page.host, source = %result.source, "extract_context: done");
    result
}
