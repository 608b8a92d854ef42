//! Extraction and match-request metrics.
//!
//! Everything goes through the `metrics` facade; without an installed
//! recorder the calls are no-ops, so the library never installs an exporter
//! itself.

use crate::types::ContextSource;

pub const EXTRACTIONS_TOTAL: &str = "context_extractions_total";
pub const EXTRACTION_DURATION_SECONDS: &str = "context_extraction_duration_seconds";
pub const MATCH_REQUESTS_TOTAL: &str = "context_match_requests_total";

/// Outcome labels for [`MATCH_REQUESTS_TOTAL`].
pub const MATCH_OUTCOME_OK: &str = "ok";
pub const MATCH_OUTCOME_API_ERROR: &str = "api_error";
pub const MATCH_OUTCOME_TRANSPORT_ERROR: &str = "transport_error";
pub const MATCH_OUTCOME_SKIPPED: &str = "skipped";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
}

/// Name, kind and help text for one metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub unit: Option<::metrics::Unit>,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

pub fn metrics_documentation() -> Vec<MetricDoc> {
    vec![
        MetricDoc {
            name: EXTRACTIONS_TOTAL,
            metric_type: MetricType::Counter,
            unit: None,
            help: "Context extractions by winning strategy",
            labels: &["source"],
        },
        MetricDoc {
            name: EXTRACTION_DURATION_SECONDS,
            metric_type: MetricType::Histogram,
            unit: Some(::metrics::Unit::Seconds),
            help: "Time spent running the extraction waterfall",
            labels: &[],
        },
        MetricDoc {
            name: MATCH_REQUESTS_TOTAL,
            metric_type: MetricType::Counter,
            unit: None,
            help: "Match API requests by outcome",
            labels: &["outcome"],
        },
    ]
}

/// Attach descriptions to every documented metric on the installed recorder.
pub fn register_metrics() {
    for doc in metrics_documentation() {
        match (doc.metric_type, doc.unit) {
            (MetricType::Counter, Some(unit)) => ::metrics::describe_counter!(doc.name, unit, doc.help),
            (MetricType::Counter, None) => ::metrics::describe_counter!(doc.name, doc.help),
            (MetricType::Histogram, Some(unit)) => ::metrics::describe_histogram!(doc.name, unit, doc.help),
            (MetricType::Histogram, None) => ::metrics::describe_histogram!(doc.name, doc.help),
        }
    }
}

pub struct ExtractionMetrics;

impl ExtractionMetrics {
    pub fn record_extraction(source: ContextSource, duration_secs: f64) {
        ::metrics::counter!(EXTRACTIONS_TOTAL, "source" => source.as_str()).increment(1);
        ::metrics::histogram!(EXTRACTION_DURATION_SECONDS).record(duration_secs);
    }

    pub fn record_match_request(outcome: &'static str) {
        ::metrics::counter!(MATCH_REQUESTS_TOTAL, "outcome" => outcome).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
    use std::sync::Mutex;

    #[derive(Default)]
    struct DescribedNames(Mutex<Vec<(String, Option<Unit>)>>);

    impl DescribedNames {
        fn push(&self, key: KeyName, unit: Option<Unit>) {
            self.0.lock().unwrap().push((key.as_str().to_string(), unit));
        }
    }

    impl Recorder for DescribedNames {
        fn describe_counter(&self, key: KeyName, unit: Option<Unit>, _: SharedString) {
            self.push(key, unit);
        }
        fn describe_gauge(&self, key: KeyName, unit: Option<Unit>, _: SharedString) {
            self.push(key, unit);
        }
        fn describe_histogram(&self, key: KeyName, unit: Option<Unit>, _: SharedString) {
            self.push(key, unit);
        }
        fn register_counter(&self, _: &Key, _: &Metadata<'_>) -> Counter {
            Counter::noop()
        }
        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }
        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    #[test]
    fn test_register_describes_every_documented_metric() {
        let recorder = DescribedNames::default();
        ::metrics::with_local_recorder(&recorder, register_metrics);
        let described = recorder.0.into_inner().unwrap();
        assert_eq!(
            described,
            vec![
                (EXTRACTIONS_TOTAL.to_string(), None),
                (EXTRACTION_DURATION_SECONDS.to_string(), Some(Unit::Seconds)),
                (MATCH_REQUESTS_TOTAL.to_string(), None),
            ]
        );
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        register_metrics();
        ExtractionMetrics::record_extraction(ContextSource::Fallback, 0.001);
        ExtractionMetrics::record_match_request(MATCH_OUTCOME_OK);
    }

    #[test]
    fn test_documentation_covers_all_metrics() {
        let docs = metrics_documentation();
        let names: Vec<&str> = docs.iter().map(|d| d.name).collect();
        assert_eq!(names, vec![EXTRACTIONS_TOTAL, EXTRACTION_DURATION_SECONDS, MATCH_REQUESTS_TOTAL]);
        assert!(docs.iter().all(|d| d.name.starts_with("context_")));
        let duration = &docs[1];
        assert_eq!(duration.metric_type, MetricType::Histogram);
        assert_eq!(duration.unit, Some(::metrics::Unit::Seconds));
        assert!(docs
            .iter()
            .filter(|d| d.metric_type == MetricType::Counter)
            .all(|d| d.name.ends_with("_total") && d.labels.len() == 1));
    }
}
