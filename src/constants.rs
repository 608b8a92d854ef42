//! Host and content markers used to pick site-specific strategies, plus the
//! fixed vocabularies the heuristics rely on.

// Marketplace host markers (matched against the lowercased hostname)
pub const TICKETMASTER_HOST_MARKER: &str = "ticketmaster.";
pub const TICKETMASTER_TITLE_MARKER: &str = "ticketmaster";
pub const VIAGOGO_HOST_MARKER: &str = "viagogo.";
pub const STUBHUB_HOST_MARKER: &str = "stubhub.";

// Script tag types and ids
pub const LD_JSON_SCRIPT_TYPE: &str = "application/ld+json";
pub const JSON_SCRIPT_TYPE: &str = "application/json";
pub const NEXT_DATA_SCRIPT_ID: &str = "__NEXT_DATA__";

/// Embedded JSON payloads shorter than this are not worth parsing.
pub const MIN_EMBEDDED_JSON_LEN: usize = 80;

/// Nesting bound for the embedded JSON walk.
pub const MAX_JSON_WALK_DEPTH: usize = 256;

/// How much body text the StubHub time fallback scans.
pub const TIME_FALLBACK_BODY_CHARS: usize = 8000;

/// How much body text the Viagogo text parser scans.
pub const VIAGOGO_BODY_CHARS: usize = 12000;

/// Separator placed between text sources before free-text parsing.
pub const TEXT_SOURCE_SEPARATOR: &str = " | ";

// Meta tag keys
pub const META_OG_TITLE: &str = "og:title";
pub const META_OG_DESCRIPTION: &str = "og:description";
pub const META_DESCRIPTION: &str = "description";
pub const META_TWITTER_DESCRIPTION: &str = "twitter:description";

/// Default base URL of the match API.
pub const DEFAULT_API_BASE: &str = "https://api.geturtix.com";

/// Default file name the CLI looks for when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "ticket_context.toml";

/// Environment variable overriding the match API base URL.
pub const API_BASE_ENV: &str = "TICKET_CONTEXT_API_BASE";

// Slug heuristics: first words of two-word US cities (las-vegas, san-diego, ...)
pub const MULTI_CITY_STARTERS: &[&str] = &[
    "las", "el", "los", "san", "santa", "new", "fort", "ft", "st", "saint", "port", "palm",
    "glen", "grand", "little", "cedar", "rapid", "salt", "sioux",
];

// Directional first words (east-rutherford, north-charleston, ...)
pub const CITY_FIRST_WORDS: &[&str] = &[
    "east", "west", "north", "south", "upper", "lower", "old", "new",
];

// Second words of two-word cities (ann-arbor, palm-springs, vero-beach, ...)
pub const CITY_SECOND_WORDS: &[&str] = &[
    "arbor", "rutherford", "beach", "springs", "heights", "falls", "rapids", "lake", "valley",
    "park", "grove", "hills", "harbor", "harbour", "mesa", "vista", "mont", "mount", "junction",
    "station", "center", "centre", "bay", "point", "island", "ridge", "town", "city",
];
