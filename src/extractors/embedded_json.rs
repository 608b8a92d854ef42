//! Deep search through embedded JSON blobs (`__NEXT_DATA__` and other
//! `application/json` hydration payloads) for an event-shaped object.
//!
//! Marketplaces built on page frameworks bury event data under arbitrary
//! keys, so instead of following known paths we walk the whole tree and take
//! the first object exposing both a name-like and a date-like key.

use super::{append_venue, first_truthy, non_empty_str, value_text};
use crate::constants::{MAX_JSON_WALK_DEPTH, META_OG_TITLE, MIN_EMBEDDED_JSON_LEN};
use crate::page::PageSnapshot;
use crate::text::{
    clean, clean_opt, parse_city_state, parse_iso_datetime, parse_month_date, parse_numeric_date,
    parse_time_12h, strip_tickets_word, strip_trailing_city,
};
use crate::types::EventContext;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

const PREDICATE_NAME_KEYS: &[&str] = &["name", "title", "eventName", "event_name"];
const PREDICATE_DATE_KEYS: &[&str] = &[
    "startDate",
    "dateTime",
    "datetime",
    "eventDateTime",
    "eventDate",
    "event_date",
];

const NAME_KEYS: &[&str] = &["name", "title", "eventName", "event_name", "performanceName"];
const VENUE_KEYS: &[&str] = &["venueName", "venue_name", "venue.name", "location.name", "place.name"];
const START_KEYS: &[&str] = &[
    "startDate",
    "start_date",
    "dateTime",
    "datetime",
    "eventDateTime",
    "event_date_time",
    "eventDate",
    "event_date",
];
const CITY_KEYS: &[&str] = &[
    "city",
    "venueCity",
    "venue_city",
    "locationCity",
    "location_city",
    "address.city",
    "address.addressLocality",
    "location.address.addressLocality",
    "location.address.addressCity",
    "venue.address.addressLocality",
];
const STATE_KEYS: &[&str] = &[
    "state",
    "region",
    "venueState",
    "venue_state",
    "address.state",
    "address.addressRegion",
    "location.address.addressRegion",
    "venue.address.addressRegion",
];
const LOCATION_STRING_KEYS: &[&str] = &["location", "venue"];
const ADDRESS_STRING_KEYS: &[&str] = &["address", "formattedAddress", "venueAddress"];

/// Depth-first, pre-order search for the first container matching
/// `predicate`.
///
/// Nodes are tracked by address so a node is never visited twice, and the
/// walk stops descending past [`MAX_JSON_WALK_DEPTH`].
pub fn find_first<'a, P>(root: &'a Value, predicate: P) -> Option<&'a Value>
where
    P: Fn(&Value) -> bool,
{
    let mut visited: HashSet<*const Value> = HashSet::new();
    let mut stack: Vec<(&'a Value, usize)> = vec![(root, 0)];

    while let Some((node, depth)) = stack.pop() {
        let children: Vec<&'a Value> = match node {
            Value::Array(items) => items.iter().collect(),
            Value::Object(map) => map.values().collect(),
            _ => continue,
        };
        if !visited.insert(node as *const Value) {
            continue;
        }
        if predicate(node) {
            return Some(node);
        }
        if depth >= MAX_JSON_WALK_DEPTH {
            continue;
        }
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }
    None
}

/// Name-like and date-like string keys on the same object.
pub fn is_event_like(value: &Value) -> bool {
    value.is_object()
        && first_truthy(value, PREDICATE_NAME_KEYS).map_or(false, Value::is_string)
        && first_truthy(value, PREDICATE_DATE_KEYS).map_or(false, Value::is_string)
}

fn string_at(value: &Value, keys: &[&str]) -> Option<String> {
    first_truthy(value, keys)
        .and_then(Value::as_str)
        .and_then(clean)
}

fn first_non_empty_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| non_empty_str(value.get(*key)))
}

/// Raw fields of an event-shaped object, before performer post-processing.
pub fn fields_from_object(event: &Value, page: &PageSnapshot) -> Option<EventContext> {
    if !event.is_object() {
        return None;
    }

    let name = first_truthy(event, NAME_KEYS)
        .and_then(value_text)
        .and_then(|n| clean(&n));
    let venue_name = first_truthy(event, VENUE_KEYS)
        .and_then(value_text)
        .and_then(|v| clean(&v));
    let start = first_truthy(event, START_KEYS);

    let mut city = string_at(event, CITY_KEYS);
    let mut state = string_at(event, STATE_KEYS);

    // "El Paso, TX" style single strings, then formatted addresses
    for keys in [LOCATION_STRING_KEYS, ADDRESS_STRING_KEYS] {
        if city.is_some() {
            break;
        }
        if let Some(text) = first_non_empty_str(event, keys) {
            let cs = parse_city_state(text);
            if cs.city.is_some() {
                city = cs.city;
                state = cs.state.or(state);
            }
        }
    }

    let iso = start
        .and_then(value_text)
        .map(|s| parse_iso_datetime(&s))
        .unwrap_or_default();
    let start_str = start.and_then(Value::as_str);
    let date_day = iso.date_day.or_else(|| {
        start_str.and_then(|s| parse_month_date(s).or_else(|| parse_numeric_date(s)))
    });
    let time_24 = iso.time_24.or_else(|| start_str.and_then(parse_time_12h));

    let ctx = EventContext {
        raw_title: name
            .clone()
            .or_else(|| clean_opt(page.meta(META_OG_TITLE)))
            .or_else(|| clean(page.title_text())),
        performer_query: name,
        city,
        state,
        date_day,
        time_24,
        venue_name,
    };

    let has_any = ctx.performer_query.is_some()
        || ctx.city.is_some()
        || ctx.date_day.is_some()
        || ctx.time_24.is_some()
        || ctx.venue_name.is_some();
    has_any.then_some(ctx)
}

/// Performer query cleanup: no "Tickets", venue appended, no trailing city.
fn refine_performer(ctx: &EventContext) -> Option<String> {
    let performer = clean(&strip_tickets_word(ctx.performer_query.as_deref()?))?;
    let performer = append_venue(performer, ctx.venue_name.as_deref());
    match ctx.city.as_deref() {
        Some(city) => Some(strip_trailing_city(&performer, city)),
        None => Some(performer),
    }
}

/// Context from the first embedded JSON payload holding an event-like object.
pub fn extract(page: &PageSnapshot) -> Option<EventContext> {
    for script in &page.json_scripts {
        let text = script.text.trim();
        if text.chars().count() < MIN_EMBEDDED_JSON_LEN {
            continue;
        }

        let parsed: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                debug!(id = ?script.id, "embedded_json: skipping unparsable payload: {}", e);
                continue;
            }
        };
        if !(parsed.is_object() || parsed.is_array()) {
            continue;
        }

        let Some(found) = find_first(&parsed, is_event_like) else {
            continue;
        };
        let Some(mut ctx) = fields_from_object(found, page) else {
            continue;
        };

        debug!(id = ?script.id, "embedded_json: found event-like object");
        ctx.performer_query = refine_performer(&ctx);
        return Some(ctx);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::JsonScript;
    use serde_json::json;

    fn page_with(payloads: &[Value]) -> PageSnapshot {
        PageSnapshot {
            json_scripts: payloads
                .iter()
                .map(|p| JsonScript {
                    id: None,
                    text: p.to_string(),
                })
                .collect(),
            ..PageSnapshot::default()
        }
    }

    #[test]
    fn test_find_first_is_preorder_in_document_order() {
        let tree = json!({
            "a": {"hit": 1, "inner": {"hit": 2}},
            "b": [{"hit": 3}]
        });
        let found = find_first(&tree, |v| v.get("hit").is_some()).unwrap();
        assert_eq!(found["hit"], 1);

        let nested = find_first(&tree, |v| v.get("hit") == Some(&json!(3))).unwrap();
        assert_eq!(nested, &json!({"hit": 3}));
        assert_eq!(find_first(&json!("scalar"), |_| true), None);
    }

    #[test]
    fn test_find_first_terminates_on_deep_nesting() {
        let mut deep = json!({"leaf": true});
        for _ in 0..(MAX_JSON_WALK_DEPTH + 10) {
            deep = json!({ "next": deep });
        }
        assert_eq!(find_first(&deep, |v| v.get("leaf").is_some()), None);
        assert!(find_first(&deep, |v| v.get("next").is_some()).is_some());
    }

    #[test]
    fn test_event_predicate_requires_name_and_date_strings() {
        assert!(is_event_like(&json!({"name": "X", "eventDate": "2025-01-01"})));
        assert!(is_event_like(&json!({"name": "", "title": "X", "datetime": "soon"})));
        assert!(!is_event_like(&json!({"name": "X"})));
        assert!(!is_event_like(&json!({"name": 5, "startDate": "2025-01-01"})));
        assert!(!is_event_like(&json!({"name": "X", "start_date": "2025-01-01"})));
        assert!(!is_event_like(&json!([{"name": "X", "eventDate": "2025-01-01"}])));
    }

    #[test]
    fn test_hydration_payload_with_venue_and_location_string() {
        let payload = json!({
            "props": {
                "pageProps": {
                    "seo": {"canonical": "https://www.viagogo.com/x"},
                    "event": {
                        "eventName": "Hamilton Tickets",
                        "eventDateTime": "2026-04-18T20:00:00",
                        "venue": {"name": "Orpheum Theatre"},
                        "location": "Minneapolis, MN",
                        "padding": "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx"
                    }
                }
            }
        });
        let ctx = extract(&page_with(&[payload])).unwrap();
        assert_eq!(ctx.raw_title.as_deref(), Some("Hamilton Tickets"));
        assert_eq!(ctx.performer_query.as_deref(), Some("Hamilton Orpheum Theatre"));
        assert_eq!(ctx.city.as_deref(), Some("Minneapolis"));
        assert_eq!(ctx.state.as_deref(), Some("MN"));
        assert_eq!(ctx.date_day.as_deref(), Some("2026-04-18"));
        assert_eq!(ctx.time_24.as_deref(), Some("20:00"));
        assert_eq!(ctx.venue_name.as_deref(), Some("Orpheum Theatre"));
    }

    #[test]
    fn test_human_date_and_address_fallbacks() {
        let payload = json!({
            "data": [{
                "title": "Morgan Wallen Nashville",
                "eventDate": "Saturday, June 6, 2026 7:30 PM",
                "formattedAddress": "Nashville, TN",
                "notes": "......................................................"
            }]
        });
        let ctx = extract(&page_with(&[payload])).unwrap();
        assert_eq!(ctx.date_day.as_deref(), Some("2026-06-06"));
        assert_eq!(ctx.time_24.as_deref(), Some("19:30"));
        assert_eq!(ctx.city.as_deref(), Some("Nashville"));
        assert_eq!(ctx.state.as_deref(), Some("TN"));
        assert_eq!(ctx.performer_query.as_deref(), Some("Morgan Wallen"));
    }

    #[test]
    fn test_short_and_broken_payloads_are_skipped() {
        let mut page = page_with(&[json!({"name": "X", "eventDate": "2025-01-01"})]);
        assert_eq!(extract(&page), None);

        page.json_scripts.push(JsonScript {
            id: Some("broken".to_string()),
            text: format!("{{\"name\": \"X\", \"eventDate\": \"2025-01-01\", {}", "x".repeat(100)),
        });
        assert_eq!(extract(&page), None);
    }
}
