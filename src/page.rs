//! Read-only snapshot of everything the extractors are allowed to look at.
//!
//! The HTML is parsed once with `scraper`; afterwards the snapshot is plain
//! owned data, so it can be cloned, shared across threads and built by hand
//! in tests.

use crate::constants::{JSON_SCRIPT_TYPE, LD_JSON_SCRIPT_TYPE, NEXT_DATA_SCRIPT_ID};
use crate::text::normalize_space;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Elements whose text never shows up in rendered body text.
const HIDDEN_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// An embedded JSON `<script>` candidate for the deep search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonScript {
    pub id: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    /// Lowercased hostname, empty when the URL is missing or unparsable.
    pub host: String,
    /// URL path, empty when unknown.
    pub path: String,
    /// Original page URL as given by the caller.
    pub url: Option<String>,
    /// Raw `<title>` text.
    pub title: Option<String>,
    /// `meta[property]` content by property (first occurrence wins).
    pub meta_properties: HashMap<String, String>,
    /// `meta[name]` content by name (first occurrence wins).
    pub meta_names: HashMap<String, String>,
    /// Text of the first `<h1>`.
    pub first_heading: Option<String>,
    /// Bodies of `application/ld+json` scripts, in document order.
    pub ld_json_scripts: Vec<String>,
    /// `__NEXT_DATA__` first, then every other `application/json` script.
    pub json_scripts: Vec<JsonScript>,
    /// Normalized visible body text.
    pub body_text: String,
}

impl PageSnapshot {
    /// Parse `html` and record the location it was loaded from.
    pub fn from_html(html: &str, page_url: Option<&str>) -> Self {
        let document = Html::parse_document(html);
        let mut snapshot = Self::default();
        snapshot.set_url(page_url);

        snapshot.title = select_first(&document, "title").map(|el| el.text().collect::<String>());
        snapshot.first_heading = select_first(&document, "h1").map(|el| el.text().collect::<String>());

        if let Ok(meta_sel) = Selector::parse("meta") {
            for meta in document.select(&meta_sel) {
                let Some(content) = meta.value().attr("content") else {
                    continue;
                };
                if let Some(property) = meta.value().attr("property") {
                    snapshot
                        .meta_properties
                        .entry(property.to_string())
                        .or_insert_with(|| content.to_string());
                }
                if let Some(name) = meta.value().attr("name") {
                    snapshot
                        .meta_names
                        .entry(name.to_string())
                        .or_insert_with(|| content.to_string());
                }
            }
        }

        if let Ok(script_sel) = Selector::parse("script") {
            let mut next_data: Option<JsonScript> = None;
            let mut others = Vec::new();
            for script in document.select(&script_sel) {
                let script_type = script
                    .value()
                    .attr("type")
                    .map(|t| t.trim().to_ascii_lowercase())
                    .unwrap_or_default();
                let id = script.value().attr("id").map(str::to_string);
                let text = script.text().collect::<String>();

                if script_type == LD_JSON_SCRIPT_TYPE {
                    snapshot.ld_json_scripts.push(text);
                    continue;
                }
                if id.as_deref() == Some(NEXT_DATA_SCRIPT_ID) {
                    if next_data.is_none() {
                        next_data = Some(JsonScript { id, text });
                    }
                    continue;
                }
                if script_type == JSON_SCRIPT_TYPE {
                    others.push(JsonScript { id, text });
                }
            }
            snapshot.json_scripts = next_data.into_iter().chain(others).collect();
        }

        snapshot.body_text = select_first(&document, "body")
            .map(visible_text)
            .unwrap_or_default();

        debug!(
            host = %snapshot.host,
            ld_json = snapshot.ld_json_scripts.len(),
            json = snapshot.json_scripts.len(),
            body_len = snapshot.body_text.len(),
            "PageSnapshot: parsed document"
        );
        snapshot
    }

    /// Record host and path from a page URL; anything unparsable leaves both empty.
    pub fn set_url(&mut self, page_url: Option<&str>) {
        self.url = page_url.map(str::to_string);
        match page_url.map(Url::parse) {
            Some(Ok(parsed)) => {
                self.host = parsed.host_str().unwrap_or_default().to_lowercase();
                self.path = parsed.path().to_string();
            }
            Some(Err(e)) => {
                debug!("PageSnapshot: ignoring unparsable url: {}", e);
                self.host.clear();
                self.path.clear();
            }
            None => {
                self.host.clear();
                self.path.clear();
            }
        }
    }

    /// Content of `meta[property=key]`, else `meta[name=key]`, trimmed.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta_properties
            .get(key)
            .or_else(|| self.meta_names.get(key))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Document title, or "" when the page has none.
    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(selector).ok()?;
    document.select(&sel).next()
}

/// Text of `root` without script/style contents, whitespace normalized.
fn visible_text(root: ElementRef<'_>) -> String {
    let mut pieces: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |el| HIDDEN_TEXT_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            pieces.push(&**text);
        }
    }
    normalize_space(&pieces.join(" "))
}
