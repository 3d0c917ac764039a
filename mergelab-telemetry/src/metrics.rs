//! Prometheus metrics for simulation runs.

use prometheus::{Counter, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: prometheus::Registry,
    pub inserted_parts: prometheus::Counter,
    pub inserted_bytes: prometheus::Counter,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let inserted_parts =
            Counter::new("mergelab_inserted_parts_total", "Total parts inserted").unwrap();
        let inserted_bytes =
            Counter::new("mergelab_inserted_bytes_total", "Total bytes inserted").unwrap();

        registry.register(Box::new(inserted_parts.clone())).unwrap();
        registry.register(Box::new(inserted_bytes.clone())).unwrap();

        Self {
            registry,
            inserted_parts,
            inserted_bytes,
        }
    }

    /// Records the totals of one finished run.
    pub fn record_run(&self, parts: u64, bytes: u64) {
        self.inserted_parts.inc_by(parts as f64);
        self.inserted_bytes.inc_by(bytes as f64);
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap())
    }
}
