use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::CounterMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for counter metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be scraped
/// directly or forwarded to an OpenTelemetry collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send + Sync> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send + Sync> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and hands back the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_metric(&self, kind: &str, name: &str, value: u64) {
        // The writer carries no invariants, so a poisoned lock is still usable.
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", &self.metric_name(suffix), value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        self.write_metric("gauge", &self.metric_name(suffix), value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send + Sync> MetricsExporter<CounterMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &CounterMetricsSnapshot) {
        self.write_counter("increment_calls_total", snapshot.increment_calls);
        self.write_counter("keys_created_total", snapshot.keys_created);
        self.write_counter("decrement_calls_total", snapshot.decrement_calls);
        self.write_counter("decrement_misses_total", snapshot.decrement_misses);
        self.write_counter("keys_evicted_total", snapshot.keys_evicted);
        self.write_counter("buckets_created_total", snapshot.buckets_created);
        self.write_counter("buckets_retired_total", snapshot.buckets_retired);
        self.write_counter("remove_calls_total", snapshot.remove_calls);
        self.write_counter("remove_found_total", snapshot.remove_found);
        self.write_counter("pop_min_calls_total", snapshot.pop_min_calls);
        self.write_counter("pop_min_found_total", snapshot.pop_min_found);
        self.write_counter("clear_calls_total", snapshot.clear_calls);
        self.write_counter("count_calls_total", snapshot.count_calls);
        self.write_counter("count_hits_total", snapshot.count_hits);
        self.write_counter("max_calls_total", snapshot.max_calls);
        self.write_counter("min_calls_total", snapshot.min_calls);
        self.write_gauge("keys", snapshot.len as u64);
        self.write_gauge("buckets", snapshot.bucket_count as u64);
    }
}
