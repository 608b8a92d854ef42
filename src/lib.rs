pub mod config;
pub mod constants;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod match_api;
pub mod merge;
pub mod messaging;
pub mod metrics;
pub mod orchestrator;
pub mod page;
pub mod text;
pub mod types;

pub use orchestrator::extract_context;
pub use page::PageSnapshot;
pub use types::{ContextSource, EventContext, ExtractionResult};
