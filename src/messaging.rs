//! The request/response boundary a host process uses to ask for a page's
//! context: `{"type": "GET_PAGE_CONTEXT"}` in, an [`ExtractionResult`] out.

use crate::orchestrator::extract_context;
use crate::page::PageSnapshot;
use crate::types::ExtractionResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PageMessage {
    #[serde(rename = "GET_PAGE_CONTEXT")]
    GetPageContext,
}

pub fn respond(message: &PageMessage, page: &PageSnapshot) -> ExtractionResult {
    match message {
        PageMessage::GetPageContext => extract_context(page),
    }
}

/// Answer a raw message. Non-objects and unknown message types get no reply.
pub fn handle_message(raw: &Value, page: &PageSnapshot) -> Option<ExtractionResult> {
    if !raw.is_object() {
        return None;
    }
    match PageMessage::deserialize(raw) {
        Ok(message) => Some(respond(&message, page)),
        Err(e) => {
            debug!("handle_message: ignoring message: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_page_context_round_trip() {
        let page = PageSnapshot::from_html("<html><body><h1>Some Show</h1></body></html>", None);
        let response = handle_message(&json!({"type": "GET_PAGE_CONTEXT"}), &page).unwrap();
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(
            wire,
            json!({
                "ok": true,
                "source": "fallback",
                "context": {
                    "raw_title": "Some Show",
                    "performer_query": null,
                    "city": null,
                    "state": null,
                    "date_day": null,
                    "time_24": null
                }
            })
        );
    }

    #[test]
    fn test_other_messages_are_ignored() {
        let page = PageSnapshot::default();
        assert_eq!(handle_message(&json!({"type": "PING"}), &page), None);
        assert_eq!(handle_message(&json!({}), &page), None);
        assert_eq!(handle_message(&json!("GET_PAGE_CONTEXT"), &page), None);
        assert_eq!(handle_message(&Value::Null, &page), None);
    }

    #[test]
    fn test_message_serializes_with_type_tag() {
        assert_eq!(
            serde_json::to_value(PageMessage::GetPageContext).unwrap(),
            json!({"type": "GET_PAGE_CONTEXT"})
        );
    }
}
