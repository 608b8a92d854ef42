//! Text, date and time primitives shared by every extraction strategy.
//!
//! All functions here are pure and total: they return `None` (or an empty
//! string) instead of failing, and never hand back partially parsed values.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex pattern"));

/// Month names and abbreviations accepted by the month-name date parser.
pub const MONTH_NAME_PATTERN: &str = r"(?i:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";

static MONTH_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b({})\b\s+(\d{{1,2}}),\s+(\d{{4}})", MONTH_NAME_PATTERN))
        .expect("Invalid month date regex pattern")
});

static NUMERIC_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("Invalid numeric date regex pattern")
});

static TIME_12H_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").expect("Invalid 12h time regex pattern")
});

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})").expect("Invalid ISO date regex pattern"));

static ISO_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"T(\d{2}):(\d{2})").expect("Invalid ISO time regex pattern"));

static CITY_COMMA_STATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^,]+?),\s*([A-Z]{2})\b").expect("Invalid city/state regex pattern")
});

static CITY_SPACE_STATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?)\s+([A-Z]{2})\b").expect("Invalid city/state regex pattern")
});

static TICKETS_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bTickets?\b").expect("Invalid tickets regex pattern"));

static TRAILING_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[-–|•,:]\s*$").expect("Invalid separator regex pattern"));

/// Collapse whitespace runs into single spaces and trim both ends.
pub fn normalize_space(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Normalized text, or `None` when nothing is left.
pub fn clean(text: &str) -> Option<String> {
    let normalized = normalize_space(text);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Same as [`clean`] for an optional input.
pub fn clean_opt(text: Option<&str>) -> Option<String> {
    text.and_then(clean)
}

/// A value counts as present when it is non-null and non-blank.
pub fn is_present(value: Option<&str>) -> bool {
    value.map_or(false, |v| !v.trim().is_empty())
}

/// The first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Case-insensitive substring test.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn month_number(token: &str) -> Option<u32> {
    let key: String = token.chars().take(3).collect::<String>().to_lowercase();
    let month = match key.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// `YYYY-MM-DD` for a real calendar date, `None` otherwise.
pub fn calendar_date(year: i32, month: u32, day: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format("%Y-%m-%d").to_string())
}

fn format_date(year: &str, month: u32, day: &str) -> Option<String> {
    calendar_date(year.parse().ok()?, month, day.parse().ok()?)
}

/// A month-name date found inside a larger string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    /// Byte offset of the match in the searched text.
    pub start: usize,
    pub date_day: String,
}

/// Locate the first valid `<Month> <D>, <YYYY>` date in `text`.
///
/// Offsets refer to `text` as given; callers normalize beforehand when they
/// need to slice around the match.
pub fn find_month_date(text: &str) -> Option<DateMatch> {
    MONTH_DATE_RE.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        let month = month_number(caps.get(1)?.as_str())?;
        let date_day = format_date(caps.get(3)?.as_str(), month, caps.get(2)?.as_str())?;
        Some(DateMatch {
            start: whole.start(),
            date_day,
        })
    })
}

/// Parse `<Month> <D|DD>, <YYYY>` (full or abbreviated month, "Sept" too).
pub fn parse_month_date(text: &str) -> Option<String> {
    find_month_date(&normalize_space(text)).map(|m| m.date_day)
}

/// Parse `M/D/YYYY`.
pub fn parse_numeric_date(text: &str) -> Option<String> {
    let normalized = normalize_space(text);
    NUMERIC_DATE_RE.captures_iter(&normalized).find_map(|caps| {
        let month: u32 = caps.get(1)?.as_str().parse().ok()?;
        format_date(caps.get(3)?.as_str(), month, caps.get(2)?.as_str())
    })
}

/// Parse `H[:MM] am|pm` into 24-hour `HH:MM`.
///
/// Candidates with an hour above 12 or minutes above 59 are skipped.
pub fn parse_time_12h(text: &str) -> Option<String> {
    let normalized = normalize_space(text);
    TIME_12H_RE.captures_iter(&normalized).find_map(|caps| {
        let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        if hour > 12 || minute > 59 {
            return None;
        }
        let is_pm = caps.get(3)?.as_str().eq_ignore_ascii_case("pm");
        if is_pm && hour != 12 {
            hour += 12;
        }
        if !is_pm && hour == 12 {
            hour = 0;
        }
        Some(format!("{:02}:{:02}", hour, minute))
    })
}

/// Date and time parts of an ISO-like datetime string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IsoParts {
    pub date_day: Option<String>,
    pub time_24: Option<String>,
}

/// Split `2025-11-02T19:30:00` style values into `date_day` and `time_24`.
pub fn parse_iso_datetime(value: &str) -> IsoParts {
    let value = value.trim();
    if value.is_empty() {
        return IsoParts::default();
    }

    let date_day = ISO_DATE_RE.captures(value).and_then(|caps| {
        let month: u32 = caps.get(2)?.as_str().parse().ok()?;
        format_date(caps.get(1)?.as_str(), month, caps.get(3)?.as_str())
    });

    let time_24 = ISO_TIME_RE.captures(value).and_then(|caps| {
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
        NaiveTime::from_hms_opt(hour, minute, 0).map(|t| t.format("%H:%M").to_string())
    });

    IsoParts { date_day, time_24 }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityState {
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Read `"<city>, <ST>"` or `"<city> <ST>"` from the start of `text`.
pub fn parse_city_state(text: &str) -> CityState {
    let normalized = normalize_space(text);
    if normalized.is_empty() {
        return CityState::default();
    }

    let caps = CITY_COMMA_STATE_RE
        .captures(&normalized)
        .or_else(|| CITY_SPACE_STATE_RE.captures(&normalized));

    match caps {
        Some(caps) => CityState {
            city: caps.get(1).and_then(|m| clean(m.as_str())),
            state: caps.get(2).and_then(|m| clean(m.as_str())),
        },
        None => CityState::default(),
    }
}

/// Remove a trailing city name (optionally preceded by a separator such as
/// `-`, `|` or `,`) from a performer string.
///
/// Returns the input unchanged when the city is not at the end or when
/// stripping would leave nothing.
pub fn strip_trailing_city(performer: &str, city: &str) -> String {
    let p = normalize_space(performer);
    let c = normalize_space(city);
    if p.is_empty() || c.is_empty() {
        return performer.to_string();
    }

    let pattern = format!(r"(?i)\s*(?:[-–|•,:]+\s*)?{}\s*$", regex::escape(&c));
    let Ok(re) = Regex::new(&pattern) else {
        return performer.to_string();
    };

    if re.is_match(&p) {
        let stripped = normalize_space(&re.replace(&p, ""));
        if !stripped.is_empty() {
            return stripped;
        }
    }
    performer.to_string()
}

/// Drop "Ticket"/"Tickets" words and a dangling trailing separator.
pub fn strip_tickets_word(text: &str) -> String {
    let without = TICKETS_WORD_RE.replace_all(text, "");
    let without = TRAILING_SEPARATOR_RE.replace(&without, "");
    normalize_space(&without)
}

/// `"foo-fighters"` -> `"Foo Fighters"`.
pub fn title_case_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
