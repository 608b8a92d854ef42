//! Field-level combination of partial contexts.
//!
//! Both policies only look at [`MergeField::ALL`]; `venue_name` always comes
//! from the left operand.

use crate::text::is_present;
use crate::types::{EventContext, MergeField};

/// Copy of `base` where every present field of `incoming` wins.
pub fn merge_overwrite(base: &EventContext, incoming: &EventContext) -> EventContext {
    let mut out = base.clone();
    for field in MergeField::ALL {
        if let Some(value) = incoming.get(field).filter(|v| !v.trim().is_empty()) {
            *out.slot_mut(field) = Some(value.to_string());
        }
    }
    out
}

/// Copy of `base` where `incoming` only fills fields that are still blank.
pub fn merge_fill_missing(base: &EventContext, incoming: &EventContext) -> EventContext {
    let mut out = base.clone();
    for field in MergeField::ALL {
        if is_present(out.get(field)) {
            continue;
        }
        if let Some(value) = incoming.get(field).filter(|v| !v.trim().is_empty()) {
            *out.slot_mut(field) = Some(value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(fields: [Option<&str>; 6]) -> EventContext {
        let [raw_title, performer_query, city, state, date_day, time_24] = fields;
        EventContext {
            raw_title: raw_title.map(str::to_string),
            performer_query: performer_query.map(str::to_string),
            city: city.map(str::to_string),
            state: state.map(str::to_string),
            date_day: date_day.map(str::to_string),
            time_24: time_24.map(str::to_string),
            venue_name: None,
        }
    }

    fn samples() -> Vec<EventContext> {
        vec![
            EventContext::default(),
            ctx([Some("Title"), None, Some("Austin"), Some("TX"), None, None]),
            ctx([None, Some("Foo Fighters"), Some("  "), None, Some("2025-11-02"), Some("19:30")]),
            ctx([Some(""), Some("Adele"), Some("Los Angeles"), Some("CA"), Some("2026-03-05"), None]),
            ctx([Some("T2"), Some(" "), None, Some("NV"), None, Some("20:00")]),
        ]
    }

    #[test]
    fn test_overwrite_prefers_present_incoming_fields() {
        let a = ctx([Some("Meta title"), Some("Meta guess"), Some("Houston"), None, Some("2025-01-01"), None]);
        let b = ctx([None, Some("Foo Fighters"), Some("  "), None, Some("2025-11-02"), None]);
        let out = merge_overwrite(&a, &b);
        assert_eq!(out.raw_title.as_deref(), Some("Meta title"));
        assert_eq!(out.performer_query.as_deref(), Some("Foo Fighters"));
        assert_eq!(out.city.as_deref(), Some("Houston"));
        assert_eq!(out.date_day.as_deref(), Some("2025-11-02"));
    }

    #[test]
    fn test_overwrite_is_idempotent() {
        for a in samples() {
            for b in samples() {
                let once = merge_overwrite(&a, &b);
                let twice = merge_overwrite(&once, &b);
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_fill_missing_never_replaces_present_fields() {
        for a in samples() {
            for b in samples() {
                let out = merge_fill_missing(&a, &b);
                for field in MergeField::ALL {
                    if is_present(a.get(field)) {
                        assert_eq!(out.get(field), a.get(field));
                    } else if is_present(b.get(field)) {
                        assert_eq!(out.get(field), b.get(field));
                    }
                }
            }
        }
    }

    #[test]
    fn test_merge_keeps_left_venue() {
        let a = EventContext {
            venue_name: Some("Acme Arena".to_string()),
            ..EventContext::default()
        };
        let b = EventContext {
            venue_name: Some("Other Hall".to_string()),
            city: Some("Austin".to_string()),
            ..EventContext::default()
        };
        assert_eq!(merge_overwrite(&a, &b).venue_name.as_deref(), Some("Acme Arena"));
        assert_eq!(merge_fill_missing(&a, &b).venue_name.as_deref(), Some("Acme Arena"));
    }
}
