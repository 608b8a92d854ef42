//! Event URLs that encode performer, city and date in the path, e.g.
//! `/foo-fighters-austin-tickets-11-2-2025/event/123`.

use crate::constants::{
    CITY_FIRST_WORDS, CITY_SECOND_WORDS, META_DESCRIPTION, META_OG_DESCRIPTION, META_OG_TITLE,
    MULTI_CITY_STARTERS, TEXT_SOURCE_SEPARATOR, TIME_FALLBACK_BODY_CHARS,
};
use crate::page::PageSnapshot;
use crate::text::{calendar_date, clean, parse_time_12h, title_case_slug, truncate_chars};
use crate::types::EventContext;
use once_cell::sync::Lazy;
use regex::Regex;

static EVENT_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)-tickets-(\d{1,2})-(\d{1,2})-(\d{4})/event/\d+")
        .expect("Invalid event path regex pattern")
});

/// Performer and city halves of a slug, title-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlugSplit {
    pub performer: Option<String>,
    pub city: Option<String>,
}

fn is_starter(word: &str) -> bool {
    MULTI_CITY_STARTERS.contains(&word)
}

fn is_directional(word: &str) -> bool {
    CITY_FIRST_WORDS.contains(&word)
}

/// How many trailing tokens of the slug name the city.
fn city_token_count(lower: &[String]) -> usize {
    let n = lower.len();
    let last = lower[n - 1].as_str();
    let second_last = lower[n - 2].as_str();

    if n >= 3 && lower[n - 3] == "salt" && second_last == "lake" && last == "city" {
        return 3;
    }
    if second_last == "salt" && last == "lake" {
        return 2;
    }
    if n >= 3 && last == "city" && (is_starter(&lower[n - 3]) || is_directional(&lower[n - 3])) {
        return 3;
    }
    if is_starter(second_last) || is_directional(second_last) || CITY_SECOND_WORDS.contains(&last) {
        return 2;
    }
    1
}

/// Split hyphen-separated slug tokens into a performer and a trailing city.
///
/// Fewer than two tokens cannot be split and yield an empty result. When the
/// whole slug reads as a city the performer is `None`.
pub fn split_slug(parts: &[&str]) -> SlugSplit {
    let parts: Vec<&str> = parts.iter().copied().filter(|p| !p.is_empty()).collect();
    if parts.len() < 2 {
        return SlugSplit::default();
    }

    let lower: Vec<String> = parts.iter().map(|p| p.to_lowercase()).collect();
    let city_len = city_token_count(&lower);
    let (performer, city) = parts.split_at(parts.len() - city_len);

    SlugSplit {
        performer: clean(&title_case_slug(&performer.join("-"))),
        city: clean(&title_case_slug(&city.join("-"))),
    }
}

/// Context from an event path, or `None` when the path does not encode one.
pub fn decompose_path(path: &str, title: Option<&str>) -> Option<EventContext> {
    let caps = EVENT_PATH_RE.captures(path)?;
    let whole = caps.get(0)?;

    let month: u32 = caps.get(1)?.as_str().parse().ok()?;
    let day: u32 = caps.get(2)?.as_str().parse().ok()?;
    let year: i32 = caps.get(3)?.as_str().parse().ok()?;
    let date_day = calendar_date(year, month, day);

    let before = &path[..whole.start()];
    let slug = before.rsplit('/').next().unwrap_or_default();
    let tokens: Vec<&str> = slug.split('-').collect();
    let SlugSplit { performer, city } = split_slug(&tokens);

    Some(EventContext {
        raw_title: title.and_then(clean),
        performer_query: performer,
        city,
        state: None,
        date_day,
        time_24: None,
        venue_name: None,
    })
}

pub fn extract(page: &PageSnapshot) -> Option<EventContext> {
    decompose_path(&page.path, page.title.as_deref())
}

/// Time of day scanned from meta tags, the title and the start of the body.
pub fn time_fallback(page: &PageSnapshot) -> Option<EventContext> {
    let sources = [
        page.meta(META_OG_TITLE),
        page.meta(META_OG_DESCRIPTION),
        page.meta(META_DESCRIPTION),
        page.title.as_deref(),
        Some(truncate_chars(&page.body_text, TIME_FALLBACK_BODY_CHARS)),
    ];
    let text = sources
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(TEXT_SOURCE_SEPARATOR);

    parse_time_12h(&text).map(|time| EventContext {
        time_24: Some(time),
        ..EventContext::default()
    })
}
