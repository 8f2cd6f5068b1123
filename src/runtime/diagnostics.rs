use std::time::{Duration, Instant};

use serde_json::json;

use crate::error::Result;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::SharedMetrics;

use super::{EventFlow, RuntimeContext, RuntimeEvent, WorkbenchPlugin};

pub const LIFECYCLE_TARGET: &str = "forge::runtime.lifecycle";
pub const METRICS_TARGET: &str = "forge::metrics";

/// Logs high-level runtime lifecycle events for observability/debugging.
pub struct LifecycleLoggerPlugin {
    logger: Logger,
    level: LogLevel,
    log_keys: bool,
    log_paste: bool,
    log_ticks: bool,
}

impl LifecycleLoggerPlugin {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            level: LogLevel::Debug,
            log_keys: true,
            log_paste: true,
            log_ticks: false,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn log_keys(mut self, enabled: bool) -> Self {
        self.log_keys = enabled;
        self
    }

    pub fn log_paste(mut self, enabled: bool) -> Self {
        self.log_paste = enabled;
        self
    }

    pub fn log_ticks(mut self, enabled: bool) -> Self {
        self.log_ticks = enabled;
        self
    }

    fn emit(&self, message: &str, fields: impl IntoIterator<Item = (String, serde_json::Value)>) {
        let event = event_with_fields(self.level, LIFECYCLE_TARGET, message, fields);
        let _ = self.logger.log_event(event);
    }
}

impl WorkbenchPlugin for LifecycleLoggerPlugin {
    fn name(&self) -> &str {
        "diagnostics.lifecycle_logger"
    }

    fn init(&mut self, _ctx: &mut RuntimeContext<'_>) -> Result<()> {
        self.emit(
            "plugin_initialized",
            [json_kv("logger_level", json!(format!("{:?}", self.level)))],
        );
        Ok(())
    }

    fn on_event(
        &mut self,
        _ctx: &mut RuntimeContext<'_>,
        event: &RuntimeEvent,
    ) -> Result<EventFlow> {
        match event {
            RuntimeEvent::Key(key) if self.log_keys => {
                self.emit(
                    "event.key",
                    [
                        json_kv("code", json!(format!("{:?}", key.code))),
                        json_kv("modifiers", json!(format!("{:?}", key.modifiers))),
                    ],
                );
            }
            // Pasted text can be a prompt; only its size is logged.
            RuntimeEvent::Paste(data) if self.log_paste => {
                self.emit(
                    "event.paste",
                    [json_kv("chars", json!(data.chars().count()))],
                );
            }
            RuntimeEvent::Tick { elapsed } if self.log_ticks => {
                self.emit(
                    "event.tick",
                    [json_kv("elapsed_ms", json!(elapsed.as_millis() as u64))],
                );
            }
            RuntimeEvent::FocusGained => self.emit("event.focus_gained", std::iter::empty()),
            RuntimeEvent::FocusLost => self.emit("event.focus_lost", std::iter::empty()),
            RuntimeEvent::Resize(size) => {
                self.emit(
                    "event.resize",
                    [
                        json_kv("width", json!(size.width)),
                        json_kv("height", json!(size.height)),
                    ],
                );
            }
            _ => {}
        }

        Ok(EventFlow::Continue)
    }

    fn shutdown(&mut self, _ctx: &mut RuntimeContext<'_>) -> Result<()> {
        self.emit("plugin_stopped", std::iter::empty());
        Ok(())
    }
}

/// Periodically emits metrics snapshots through the provided logger, plus a
/// final one when the runtime stops.
pub struct MetricsSnapshotPlugin {
    logger: Logger,
    metrics: SharedMetrics,
    target: String,
    interval: Duration,
    last_emit: Option<Instant>,
    started_at: Option<Instant>,
}

impl MetricsSnapshotPlugin {
    pub fn new(logger: Logger, metrics: SharedMetrics) -> Self {
        Self {
            logger,
            metrics,
            target: METRICS_TARGET.to_string(),
            interval: Duration::from_secs(5),
            last_emit: None,
            started_at: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    fn maybe_emit(&mut self, now: Instant) {
        if self.interval.is_zero() {
            return;
        }
        let last = self.last_emit.or(self.started_at).unwrap_or(now);
        if now.saturating_duration_since(last) < self.interval {
            return;
        }
        self.emit(now);
    }

    fn emit(&mut self, now: Instant) {
        self.last_emit = Some(now);
        let uptime = self
            .started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default();

        if let Ok(guard) = self.metrics.lock() {
            let event = guard.snapshot(uptime).to_log_event(&self.target);
            let _ = self.logger.log_event(event);
        }
    }
}

impl WorkbenchPlugin for MetricsSnapshotPlugin {
    fn name(&self) -> &str {
        "diagnostics.metrics_snapshot"
    }

    fn init(&mut self, ctx: &mut RuntimeContext<'_>) -> Result<()> {
        self.started_at = Some(ctx.now());
        self.last_emit = None;
        Ok(())
    }

    fn on_event(
        &mut self,
        ctx: &mut RuntimeContext<'_>,
        event: &RuntimeEvent,
    ) -> Result<EventFlow> {
        if matches!(event, RuntimeEvent::Tick { .. }) {
            self.maybe_emit(ctx.now());
        }
        Ok(EventFlow::Continue)
    }

    fn shutdown(&mut self, ctx: &mut RuntimeContext<'_>) -> Result<()> {
        self.emit(ctx.now());
        Ok(())
    }
}
