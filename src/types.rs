use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized event details pulled from a single page.
///
/// Every field is optional on its own. `date_day` is always `YYYY-MM-DD` and
/// `time_24` is always `HH:MM` when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    pub raw_title: Option<String>,
    pub performer_query: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub date_day: Option<String>,
    pub time_24: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_name: Option<String>,
}

impl EventContext {
    /// Context carrying only a title, as produced by the terminal fallback.
    pub fn titled(raw_title: Option<String>) -> Self {
        Self {
            raw_title,
            ..Self::default()
        }
    }

    /// True when at least one merge field holds a non-blank value.
    pub fn has_any(&self) -> bool {
        MergeField::ALL
            .iter()
            .any(|field| crate::text::is_present(self.get(*field)))
    }

    pub fn get(&self, field: MergeField) -> Option<&str> {
        match field {
            MergeField::RawTitle => self.raw_title.as_deref(),
            MergeField::PerformerQuery => self.performer_query.as_deref(),
            MergeField::City => self.city.as_deref(),
            MergeField::State => self.state.as_deref(),
            MergeField::DateDay => self.date_day.as_deref(),
            MergeField::Time24 => self.time_24.as_deref(),
        }
    }

    pub fn slot_mut(&mut self, field: MergeField) -> &mut Option<String> {
        match field {
            MergeField::RawTitle => &mut self.raw_title,
            MergeField::PerformerQuery => &mut self.performer_query,
            MergeField::City => &mut self.city,
            MergeField::State => &mut self.state,
            MergeField::DateDay => &mut self.date_day,
            MergeField::Time24 => &mut self.time_24,
        }
    }
}

/// The fields merge policies operate on. `venue_name` is never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeField {
    RawTitle,
    PerformerQuery,
    City,
    State,
    DateDay,
    Time24,
}

impl MergeField {
    pub const ALL: [MergeField; 6] = [
        MergeField::RawTitle,
        MergeField::PerformerQuery,
        MergeField::City,
        MergeField::State,
        MergeField::DateDay,
        MergeField::Time24,
    ];
}

/// Which strategy produced a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSource {
    TicketmasterJsonld,
    TicketmasterTitle,
    JsonldEvent,
    NextdataEventlike,
    ViagogoSmart,
    StubhubMerge,
    MetaSmart,
    Fallback,
}

impl ContextSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextSource::TicketmasterJsonld => "ticketmaster_jsonld",
            ContextSource::TicketmasterTitle => "ticketmaster_title",
            ContextSource::JsonldEvent => "jsonld_event",
            ContextSource::NextdataEventlike => "nextdata_eventlike",
            ContextSource::ViagogoSmart => "viagogo_smart",
            ContextSource::StubhubMerge => "stubhub_merge",
            ContextSource::MetaSmart => "meta_smart",
            ContextSource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ContextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one extraction call; also the wire shape of the
/// `GET_PAGE_CONTEXT` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub ok: bool,
    pub source: ContextSource,
    pub context: EventContext,
}

impl ExtractionResult {
    pub fn new(source: ContextSource, context: EventContext) -> Self {
        Self {
            ok: true,
            source,
            context,
        }
    }
}
