use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type SharedMetrics = Arc<Mutex<ForgeMetrics>>;

/// Counters accumulated by the runtime and the panel controllers.
#[derive(Debug, Default, Clone)]
pub struct ForgeMetrics {
    events: u64,
    renders: u64,
    zone_updates: u64,
    generations_started: u64,
    generations_settled: u64,
    generations_cancelled: u64,
    refusals: u64,
    copies: u64,
}

impl ForgeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedMetrics {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn record_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    pub fn record_render(&mut self) {
        self.renders = self.renders.saturating_add(1);
    }

    pub fn record_zone_updates(&mut self, count: usize) {
        self.zone_updates = self.zone_updates.saturating_add(count as u64);
    }

    pub fn record_generation_started(&mut self) {
        self.generations_started = self.generations_started.saturating_add(1);
    }

    pub fn record_generation_settled(&mut self) {
        self.generations_settled = self.generations_settled.saturating_add(1);
    }

    pub fn record_generation_cancelled(&mut self) {
        self.generations_cancelled = self.generations_cancelled.saturating_add(1);
    }

    pub fn record_refusal(&mut self) {
        self.refusals = self.refusals.saturating_add(1);
    }

    pub fn record_copy(&mut self) {
        self.copies = self.copies.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            events: self.events,
            renders: self.renders,
            zone_updates: self.zone_updates,
            generations_started: self.generations_started,
            generations_settled: self.generations_settled,
            generations_cancelled: self.generations_cancelled,
            refusals: self.refusals,
            copies: self.copies,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub events: u64,
    pub renders: u64,
    pub zone_updates: u64,
    pub generations_started: u64,
    pub generations_settled: u64,
    pub generations_cancelled: u64,
    pub refusals: u64,
    pub copies: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("events".to_string(), json!(self.events));
        map.insert("renders".to_string(), json!(self.renders));
        map.insert("zone_updates".to_string(), json!(self.zone_updates));
        map.insert(
            "generations_started".to_string(),
            json!(self.generations_started),
        );
        map.insert(
            "generations_settled".to_string(),
            json!(self.generations_settled),
        );
        map.insert(
            "generations_cancelled".to_string(),
            json!(self.generations_cancelled),
        );
        map.insert("refusals".to_string(), json!(self.refusals));
        map.insert("copies".to_string(), json!(self.copies));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "forge_metrics", self.as_fields())
    }
}

/// Apply `f` to the shared counters if a handle is configured. Poisoned
/// locks are skipped; metrics never fail an operation.
pub(crate) fn with_metrics(metrics: Option<&SharedMetrics>, f: impl FnOnce(&mut ForgeMetrics)) {
    if let Some(metrics) = metrics {
        if let Ok(mut guard) = metrics.lock() {
            f(&mut guard);
        }
    }
}
