//! Schema.org `Event` objects from `application/ld+json` scripts.

use super::{first_truthy, lookup, truthy, value_text};
use crate::constants::META_OG_TITLE;
use crate::page::PageSnapshot;
use crate::text::{clean, clean_opt, contains_ignore_case, parse_city_state, parse_iso_datetime, strip_trailing_city, CityState, IsoParts};
use crate::types::EventContext;
use serde_json::Value;
use tracing::debug;

const PERFORMER_KEYS: &[&str] = &["performer", "performers", "artist"];
const START_KEYS: &[&str] = &["startDate", "start_date", "dateTime", "datetime"];
const LOCALITY_KEYS: &[&str] = &["addressLocality", "addressCity"];

/// Context from the first JSON-LD event that yields anything usable.
pub fn extract(page: &PageSnapshot) -> Option<EventContext> {
    let candidates = collect_objects(&page.ld_json_scripts);
    candidates
        .iter()
        .filter_map(find_event)
        .find_map(|event| context_from_event(event, page))
}

/// Parse every payload, skipping broken ones, and flatten top-level arrays.
pub fn collect_objects(scripts: &[String]) -> Vec<Value> {
    let mut out = Vec::new();
    for script in scripts {
        let text = script.trim();
        if text.is_empty() {
            continue;
        }
        let parsed: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                debug!("jsonld: skipping unparsable payload: {}", e);
                continue;
            }
        };
        if !truthy(&parsed) {
            continue;
        }
        match parsed {
            Value::Array(items) => out.extend(items),
            other => out.push(other),
        }
    }
    out
}

fn is_event(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => contains_ignore_case(t, "event"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(value_text)
            .any(|t| contains_ignore_case(&t, "event")),
        _ => false,
    }
}

/// The object itself when it is an event, else the first event in `@graph`.
pub fn find_event(value: &Value) -> Option<&Value> {
    if is_event(value) {
        return Some(value);
    }
    value
        .get("@graph")
        .and_then(Value::as_array)
        .and_then(|graph| graph.iter().find(|node| is_event(node)))
}

fn performer_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => clean(s),
        Value::Array(items) => items.iter().find_map(performer_name),
        Value::Object(_) => value.get("name").and_then(value_text).and_then(|n| clean(&n)),
        _ => None,
    }
}

/// City/state of one location entry: structured address, address string, or
/// the location itself as a string.
fn location_city_state(location: &Value) -> Option<CityState> {
    if !truthy(location) {
        return None;
    }

    match location.get("address") {
        Some(Value::String(address)) => {
            let cs = parse_city_state(address);
            if cs.city.is_some() {
                return Some(cs);
            }
        }
        Some(address @ Value::Object(_)) => {
            let city = first_truthy(address, LOCALITY_KEYS)
                .and_then(value_text)
                .and_then(|c| clean(&c));
            if city.is_some() {
                let state = address
                    .get("addressRegion")
                    .and_then(value_text)
                    .and_then(|s| clean(&s));
                return Some(CityState { city, state });
            }
        }
        _ => {}
    }

    if let Value::String(text) = location {
        let cs = parse_city_state(text);
        if cs.city.is_some() {
            return Some(cs);
        }
    }
    None
}

fn location_venue(location: &Value) -> Option<String> {
    let first = match location {
        Value::Array(items) => items.first()?,
        other => other,
    };
    lookup(first, "name").and_then(value_text).and_then(|n| clean(&n))
}

/// Build a context out of a located JSON-LD event.
pub fn context_from_event(event: &Value, page: &PageSnapshot) -> Option<EventContext> {
    if !event.is_object() {
        return None;
    }

    let raw_title = event
        .get("name")
        .and_then(value_text)
        .and_then(|n| clean(&n))
        .or_else(|| clean_opt(page.meta(META_OG_TITLE)))
        .or_else(|| clean(page.title_text()));

    let mut performer_query = first_truthy(event, PERFORMER_KEYS).and_then(performer_name);

    let IsoParts { date_day, time_24 } = first_truthy(event, START_KEYS)
        .and_then(value_text)
        .map(|start| parse_iso_datetime(&start))
        .unwrap_or_default();

    let location = event.get("location").filter(|l| truthy(l));
    let CityState { city, state } = match location {
        Some(Value::Array(entries)) => entries.iter().find_map(location_city_state),
        Some(single) => location_city_state(single),
        None => None,
    }
    .unwrap_or_default();

    if performer_query.is_none() {
        if let (Some(title), Some(city)) = (&raw_title, &city) {
            performer_query = clean(&strip_trailing_city(title, city));
        }
    }

    if raw_title.is_none()
        && performer_query.is_none()
        && city.is_none()
        && date_day.is_none()
        && time_24.is_none()
    {
        return None;
    }

    Some(EventContext {
        raw_title,
        performer_query,
        city,
        state,
        date_day,
        time_24,
        venue_name: location.and_then(location_venue),
    })
}
