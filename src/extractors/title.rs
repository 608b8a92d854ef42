//! Ticketmaster-style document titles, e.g.
//! `"Foo Fighters Tickets Nov 02, 2025 Austin, TX | Ticketmaster"`.

use crate::text::{
    clean, find_month_date, normalize_space, strip_trailing_city, DateMatch, MONTH_NAME_PATTERN,
};
use crate::types::EventContext;
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_THEN_LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b{}\b\s+\d{{1,2}},\s+\d{{4}}\s+(.+?),\s+([A-Z]{{2}})\b",
        MONTH_NAME_PATTERN
    ))
    .expect("Invalid date/location regex pattern")
});

static TRAILING_LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(.+?),\s+([A-Z]{2})\s*$").expect("Invalid trailing location regex pattern")
});

static TICKETS_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i) tickets ").expect("Invalid tickets token regex pattern"));

fn find_location(segment: &str) -> Option<(Option<String>, Option<String>)> {
    if let Some(caps) = DATE_THEN_LOCATION_RE.captures(segment) {
        return Some((
            caps.get(1).and_then(|m| clean(m.as_str())),
            caps.get(2).and_then(|m| clean(m.as_str())),
        ));
    }
    TRAILING_LOCATION_RE.captures(segment).map(|caps| {
        (
            caps.get(1).and_then(|m| clean(m.as_str())),
            caps.get(2).and_then(|m| clean(m.as_str())),
        )
    })
}

/// Parse a `|`-separated page title.
///
/// The left segment is searched first; later segments only fill in a
/// location or date the left one lacks. Returns `None` for an empty title.
pub fn parse_title(title: &str) -> Option<EventContext> {
    let full = normalize_space(title);
    if full.is_empty() {
        return None;
    }

    let segments: Vec<String> = full.split('|').map(normalize_space).collect();
    let (primary, rest) = segments.split_first()?;

    let (city, state) = find_location(primary)
        .or_else(|| rest.iter().find_map(|s| find_location(s)))
        .unwrap_or((None, None));

    let primary_date: Option<DateMatch> = find_month_date(primary);
    let later_date = if primary_date.is_none() {
        rest.iter().find_map(|s| find_month_date(s))
    } else {
        None
    };
    let date_day = primary_date
        .as_ref()
        .or(later_date.as_ref())
        .map(|m| m.date_day.clone());

    let performer = if let Some(idx) = TICKETS_TOKEN_RE.find(primary).map(|m| m.start()).filter(|i| *i > 0) {
        clean(&primary[..idx])
    } else if let Some(m) = primary_date.as_ref().filter(|m| m.start > 0) {
        clean(&primary[..m.start])
    } else if later_date.is_some() {
        clean(primary)
    } else {
        None
    };

    let performer_query = match (performer, city.as_deref()) {
        (Some(p), Some(c)) => Some(strip_trailing_city(&p, c)),
        (p, _) => p,
    };

    Some(EventContext {
        raw_title: Some(full),
        performer_query,
        city,
        state,
        date_day,
        time_24: None,
        venue_name: None,
    })
}
