//! Heuristics over unstructured text: meta descriptions, titles and body copy.

use super::append_venue;
use crate::constants::{
    META_DESCRIPTION, META_OG_DESCRIPTION, META_OG_TITLE, META_TWITTER_DESCRIPTION,
    TEXT_SOURCE_SEPARATOR, VIAGOGO_BODY_CHARS,
};
use crate::page::PageSnapshot;
use crate::text::{
    clean, clean_opt, normalize_space, parse_month_date, parse_numeric_date, parse_time_12h,
    strip_tickets_word, strip_trailing_city, truncate_chars, CityState,
};
use crate::types::EventContext;
use once_cell::sync::Lazy;
use regex::Regex;

static IN_CITY_STATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bin\s+([A-Za-z .'-]+?),\s*([A-Z]{2})\b").expect("Invalid in-city regex pattern")
});

static IN_CITY_STOP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bin\s+([A-Za-z .'-]+?)(?:\s+tickets\b|,|\s+on\b|\s+at\b|\s+-|\s+\||$)")
        .expect("Invalid in-city stop regex pattern")
});

static ANY_CITY_STATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([^,]+?),\s+([A-Z]{2})\b").expect("Invalid city/state regex pattern")
});

static AT_VENUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bat\s+(.+?)\s+\bin\s+[A-Za-z .'-]+?,\s*[A-Z]{2}\b")
        .expect("Invalid venue regex pattern")
});

static TICKETS_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i) tickets").expect("Invalid tickets regex pattern"));

fn in_city_state(text: &str) -> Option<CityState> {
    IN_CITY_STATE_RE.captures(text).map(|caps| CityState {
        city: caps.get(1).and_then(|m| clean(m.as_str())),
        state: caps.get(2).and_then(|m| clean(m.as_str())),
    })
}

/// City/state from free text: `in <city>, <ST>`, then `in <city>` up to a
/// stop word, then the last `<text>, <ST>` anywhere.
fn find_city_state(text: &str) -> CityState {
    if let Some(cs) = in_city_state(text) {
        return cs;
    }
    if let Some(caps) = IN_CITY_STOP_RE.captures(text) {
        return CityState {
            city: caps.get(1).and_then(|m| clean(m.as_str())),
            state: None,
        };
    }
    ANY_CITY_STATE_RE
        .captures_iter(text)
        .last()
        .map(|caps| CityState {
            city: caps.get(1).and_then(|m| clean(m.as_str())),
            state: caps.get(2).and_then(|m| clean(m.as_str())),
        })
        .unwrap_or_default()
}

/// Parse arbitrary page text. `heading` stands in for the performer when
/// the text has no "... tickets" prefix. Returns `None` only for blank text.
pub fn parse_generic(text: &str, heading: Option<&str>) -> Option<EventContext> {
    let t = clean(text)?;

    let date_day = parse_month_date(&t).or_else(|| parse_numeric_date(&t));
    let time_24 = parse_time_12h(&t);
    let CityState { city, state } = find_city_state(&t);

    let performer = match TICKETS_SUFFIX_RE.find(&t).map(|m| m.start()).filter(|i| *i > 0) {
        Some(idx) => clean(&t[..idx]),
        None => clean_opt(heading),
    };
    let performer_query = match (performer, city.as_deref()) {
        (Some(p), Some(c)) => clean(&strip_trailing_city(&p, c)),
        (p, _) => p,
    };

    Some(EventContext {
        raw_title: Some(t),
        performer_query,
        city,
        state,
        date_day,
        time_24,
        venue_name: None,
    })
}

/// Viagogo pages describe the event in prose:
/// `"... on Apr 18, 2026 8:00 PM at Orpheum Theatre in Minneapolis, MN"`.
pub fn extract_viagogo(page: &PageSnapshot) -> Option<EventContext> {
    let og_title = page.meta(META_OG_TITLE);
    let sources = [
        page.meta(META_OG_DESCRIPTION),
        page.meta(META_DESCRIPTION),
        page.meta(META_TWITTER_DESCRIPTION),
        og_title,
        page.title.as_deref(),
        Some(truncate_chars(&page.body_text, VIAGOGO_BODY_CHARS)),
    ];
    let text = normalize_space(
        &sources
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(TEXT_SOURCE_SEPARATOR),
    );
    if text.is_empty() {
        return None;
    }

    let date_day = parse_month_date(&text);
    let time_24 = parse_time_12h(&text);
    let CityState { city, state } = in_city_state(&text).unwrap_or_default();
    let venue = AT_VENUE_RE
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| clean(m.as_str()));

    if city.is_none() && date_day.is_none() && time_24.is_none() && venue.is_none() {
        return None;
    }

    let performer = [page.first_heading.as_deref(), og_title, page.title.as_deref()]
        .into_iter()
        .flatten()
        .find_map(|candidate| clean(&strip_tickets_word(candidate)));
    let performer_query = performer.map(|p| {
        let p = match city.as_deref() {
            Some(c) => strip_trailing_city(&p, c),
            None => p,
        };
        append_venue(p, venue.as_deref())
    });

    let raw_title = clean_opt(og_title)
        .or_else(|| clean(page.title_text()))
        .or_else(|| performer_query.clone());

    Some(EventContext {
        raw_title,
        performer_query,
        city,
        state,
        date_day,
        time_24,
        venue_name: venue,
    })
}
