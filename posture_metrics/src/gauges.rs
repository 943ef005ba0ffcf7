use prometheus::{Gauge, Registry, TextEncoder};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("metrics registry error: {0}")]
    Registry(#[from] prometheus::Error),
}

/// In-memory mapping from gauge name to its current value, thread-safe for
/// concurrent scrape reads while one writer updates values.
///
/// Gauges are registered once at startup and live for the process lifetime.
/// Each value is an atomic f64, so a scrape never observes a torn write.
pub struct GaugeBoard {
    registry: Registry,
    gauges: RwLock<HashMap<String, Gauge>>,
}

impl GaugeBoard {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            gauges: RwLock::new(HashMap::new()),
        }
    }

    /// Create and register a gauge with an initial value of 0. Registering
    /// the same name again is a no-op.
    pub fn register(&self, name: &str, help: &str) -> Result<(), MetricsError> {
        let mut gauges = self.gauges.write().expect("gauge map lock poisoned");
        if gauges.contains_key(name) {
            return Ok(());
        }

        let gauge = Gauge::new(name.to_string(), help.to_string())?;
        self.registry.register(Box::new(gauge.clone()))?;
        gauges.insert(name.to_string(), gauge);
        Ok(())
    }

    /// Atomically overwrite the current value of a gauge.
    ///
    /// Panics on an unregistered name: that is a programming-contract
    /// violation, not a runtime condition.
    pub fn set(&self, name: &str, value: f64) {
        let gauges = self.gauges.read().expect("gauge map lock poisoned");
        let gauge = gauges
            .get(name)
            .unwrap_or_else(|| panic!("gauge '{name}' was never registered"));
        gauge.set(value);
    }

    /// Current name -> value mapping.
    pub fn snapshot(&self) -> HashMap<String, f64> {
        let gauges = self.gauges.read().expect("gauge map lock poisoned");
        gauges
            .iter()
            .map(|(name, gauge)| (name.clone(), gauge.get()))
            .collect()
    }

    /// Render all gauges in the text exposition format, HELP/TYPE included.
    pub fn encode(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = String::new();
        encoder
            .encode_utf8(&metric_families, &mut buffer)
            .expect("text exposition encoding failed");
        buffer
    }
}

impl Default for GaugeBoard {
    fn default() -> Self {
        Self::new()
    }
}
