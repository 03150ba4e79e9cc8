//! Prometheus metrics for the responder.
//!
//! All metrics follow the naming convention: `responder_<metric>_<unit>`
//!
//! Labels are drawn from closed sets (response type names, rejection kinds,
//! outcomes). Nothing recipient-controlled becomes a label value.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // INGESTION
    // =========================================================================

    /// Responses received, by declared type
    pub static ref RESPONSES_RECEIVED: CounterVec = CounterVec::new(
        Opts::new("responder_responses_received_total", "Responses received by type"),
        &["type"]
    ).expect("metric creation failed");

    /// Responses that ended in the generic failure, by internal reason
    pub static ref RESPONSES_REJECTED: CounterVec = CounterVec::new(
        Opts::new("responder_responses_rejected_total", "Rejected responses by reason"),
        &["reason"]  // validation/denied/crypto/config/dependency
    ).expect("metric creation failed");

    /// Encrypted response records written
    pub static ref RECORDS_WRITTEN: CounterVec = CounterVec::new(
        Opts::new("responder_records_written_total", "Response records written by type"),
        &["type"]
    ).expect("metric creation failed");

    /// Copies deleted after reaching their read limit
    pub static ref COPIES_EXPIRED: Counter = Counter::new(
        "responder_copies_expired_total",
        "Copies deleted on reaching max reads"
    ).expect("metric creation failed");

    /// End-to-end handling time of one response request
    pub static ref REQUEST_DURATION: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "responder_request_duration_seconds",
            "Time spent handling a response request"
        ).buckets(exponential_buckets(0.001, 2.0, 14).unwrap_or_default())
    ).expect("metric creation failed");

    // =========================================================================
    // NOTIFICATIONS
    // =========================================================================

    /// Notification decisions and deliveries
    pub static ref NOTIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("responder_notifications_total", "Notification outcomes"),
        &["outcome"]  // sent/suppressed/skipped/failed
    ).expect("metric creation failed");

    // =========================================================================
    // INVITE IMAGES
    // =========================================================================

    /// Invite images served
    pub static ref INVITE_IMAGES_SERVED: CounterVec = CounterVec::new(
        Opts::new("responder_invite_images_served_total", "Invite images served"),
        &["outcome"]  // decrypted/placeholder
    ).expect("metric creation failed");
}

/// Handle for the registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; metrics already registered are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(RESPONSES_RECEIVED.clone()),
        Box::new(RESPONSES_REJECTED.clone()),
        Box::new(RECORDS_WRITTEN.clone()),
        Box::new(COPIES_EXPIRED.clone()),
        Box::new(REQUEST_DURATION.clone()),
        Box::new(NOTIFICATIONS.clone()),
        Box::new(INVITE_IMAGES_SERVED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::HistogramTimer::new(&$histogram)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_twice() {
        assert!(register_metrics().is_ok());
        assert!(register_metrics().is_ok());
    }

    #[test]
    fn test_counter_increment() {
        RECORDS_WRITTEN.with_label_values(&["reply"]).inc();
        assert!(RECORDS_WRITTEN.with_label_values(&["reply"]).get() >= 1.0);
    }

    #[test]
    fn test_gather_contains_metric() {
        register_metrics().unwrap();
        COPIES_EXPIRED.inc();
        let text = gather_metrics().unwrap();
        assert!(text.contains("responder_copies_expired_total"));
    }

    #[test]
    fn test_histogram_timer() {
        let before = REQUEST_DURATION.get_sample_count();
        {
            let _timer = HistogramTimer::new(&REQUEST_DURATION);
        }
        assert!(REQUEST_DURATION.get_sample_count() > before);
    }
}
