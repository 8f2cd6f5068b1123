use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use serde_json::json;

use crate::error::Result;
use crate::geometry::{Rect, Size};
use crate::latency::{Clock, ManualClock, SystemClock};
use crate::layout::LayoutTree;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::{SharedMetrics, with_metrics};
use crate::registry::ZoneRegistry;
use crate::render::AnsiRenderer;

pub mod bundles;
pub mod diagnostics;
pub mod driver;
pub mod input;
pub mod tabs;
pub mod workbench;

const RUNTIME_TARGET: &str = "forge::runtime";

/// Configuration knobs for the runtime loop.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Interval between synthetic tick events.
    pub tick_interval: Duration,
    pub logger: Option<Logger>,
    pub metrics: Option<SharedMetrics>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            logger: None,
            metrics: None,
        }
    }
}

/// High-level events delivered to plugins.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    Tick { elapsed: Duration },
    Key(KeyEvent),
    Paste(String),
    FocusGained,
    FocusLost,
    Resize(Size),
}

impl RuntimeEvent {
    pub fn describe(&self) -> &'static str {
        match self {
            RuntimeEvent::Tick { .. } => "tick",
            RuntimeEvent::Key(_) => "key",
            RuntimeEvent::Paste(_) => "paste",
            RuntimeEvent::FocusGained => "focus_gained",
            RuntimeEvent::FocusLost => "focus_lost",
            RuntimeEvent::Resize(_) => "resize",
        }
    }
}

/// Control the propagation of an event across plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    Continue,
    Consumed,
}

/// Context passed to plugins so they can interact with the runtime safely.
pub struct RuntimeContext<'a> {
    rects: &'a HashMap<String, Rect>,
    now: Instant,
    zone_updates: Vec<(String, String)>,
    redraw_requested: bool,
    exit_requested: bool,
    cursor_hint: Option<(u16, u16)>,
}

impl<'a> RuntimeContext<'a> {
    fn new(rects: &'a HashMap<String, Rect>, now: Instant) -> Self {
        Self {
            rects,
            now,
            zone_updates: Vec::new(),
            redraw_requested: false,
            exit_requested: false,
            cursor_hint: None,
        }
    }

    /// Queue new content for a zone. The update is applied after the plugin completes.
    pub fn set_zone(&mut self, zone_id: impl Into<String>, content: impl Into<String>) {
        self.zone_updates.push((zone_id.into(), content.into()));
        self.redraw_requested = true;
    }

    /// Request that the renderer runs even if no zones changed.
    pub fn request_render(&mut self) {
        self.redraw_requested = true;
    }

    /// Signal to the runtime that execution should terminate at the end of the frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn set_cursor_hint(&mut self, row: u16, col: u16) {
        self.cursor_hint = Some((row, col));
    }

    /// Current time according to the runtime clock.
    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn rect(&self, zone_id: &str) -> Option<&Rect> {
        self.rects.get(zone_id)
    }

    fn into_outcome(self) -> ContextOutcome {
        ContextOutcome {
            zone_updates: self.zone_updates,
            redraw_requested: self.redraw_requested,
            exit_requested: self.exit_requested,
            cursor_hint: self.cursor_hint,
        }
    }
}

struct ContextOutcome {
    zone_updates: Vec<(String, String)>,
    redraw_requested: bool,
    exit_requested: bool,
    cursor_hint: Option<(u16, u16)>,
}

/// Behaviour injection point for the runtime.
pub trait WorkbenchPlugin: Send {
    fn name(&self) -> &str {
        "workbench_plugin"
    }

    fn init(&mut self, _ctx: &mut RuntimeContext<'_>) -> Result<()> {
        Ok(())
    }

    fn on_event(
        &mut self,
        _ctx: &mut RuntimeContext<'_>,
        _event: &RuntimeEvent,
    ) -> Result<EventFlow> {
        Ok(EventFlow::Continue)
    }

    fn before_render(&mut self, _ctx: &mut RuntimeContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called when the loop stops on an exit request.
    fn shutdown(&mut self, _ctx: &mut RuntimeContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Plugins grouped with a priority. Lower priorities see events first.
#[derive(Default)]
pub struct PluginBundle {
    entries: Vec<(i32, Box<dyn WorkbenchPlugin>)>,
}

impl PluginBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plugin<P>(mut self, plugin: P, priority: i32) -> Self
    where
        P: WorkbenchPlugin + 'static,
    {
        self.entries.push((priority, Box::new(plugin)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn into_sorted(mut self) -> Vec<Box<dyn WorkbenchPlugin>> {
        self.entries.sort_by_key(|(priority, _)| *priority);
        self.entries.into_iter().map(|(_, plugin)| plugin).collect()
    }
}

pub struct WorkbenchRuntime {
    layout: LayoutTree,
    leaves: Vec<String>,
    rects: HashMap<String, Rect>,
    registry: ZoneRegistry,
    renderer: AnsiRenderer,
    plugins: Vec<Box<dyn WorkbenchPlugin>>,
    config: RuntimeConfig,
    clock: Arc<dyn Clock>,
    scripted_clock: Option<ManualClock>,
    should_exit: bool,
    redraw_requested: bool,
    start_instant: Option<Instant>,
}

impl WorkbenchRuntime {
    pub fn new(layout: LayoutTree, renderer: AnsiRenderer, initial_size: Size) -> Result<Self> {
        let leaves = layout.leaves();
        let rects = layout.solve(initial_size)?;
        let mut registry = ZoneRegistry::new();
        registry.sync_layout(&rects, &leaves);

        Ok(Self {
            layout,
            leaves,
            rects,
            registry,
            renderer,
            plugins: Vec::new(),
            config: RuntimeConfig::default(),
            clock: Arc::new(SystemClock),
            scripted_clock: None,
            should_exit: false,
            redraw_requested: true,
            start_instant: None,
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn register_plugin<P>(&mut self, plugin: P)
    where
        P: WorkbenchPlugin + 'static,
    {
        self.plugins.push(Box::new(plugin));
    }

    /// Append a bundle after any plugins already registered.
    pub fn register_bundle(&mut self, bundle: PluginBundle) {
        self.plugins.extend(bundle.into_sorted());
    }

    pub fn zone_content(&self, zone_id: &str) -> Option<&str> {
        self.registry.content(zone_id)
    }

    pub fn rect(&self, zone_id: &str) -> Option<&Rect> {
        self.rects.get(zone_id)
    }

    pub fn resize(&mut self, size: Size) -> Result<()> {
        self.handle_resize(size)
    }

    pub fn run(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.bootstrap(stdout)?;
        let mut last_tick = Instant::now();

        while !self.should_exit {
            let timeout = self
                .config
                .tick_interval
                .checked_sub(last_tick.elapsed())
                .unwrap_or_default();

            if event::poll(timeout)? {
                let crossterm_event = event::read()?;
                if let Some(runtime_event) = self.map_event(crossterm_event)? {
                    self.dispatch_event(runtime_event)?;
                    self.render_if_needed(stdout)?;
                    if self.should_exit {
                        break;
                    }
                }
            }

            if last_tick.elapsed() >= self.config.tick_interval {
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick);
                last_tick = now;
                self.dispatch_event(RuntimeEvent::Tick { elapsed })?;
                self.render_if_needed(stdout)?;
            }
        }

        self.finalize()
    }

    /// Replay `events` against a manual clock. Each `Tick` advances the clock
    /// by its `elapsed` before plugins see it. Later scripted runs continue
    /// from where the previous one left the clock.
    pub fn run_scripted<I>(&mut self, stdout: &mut impl Write, events: I) -> Result<()>
    where
        I: IntoIterator<Item = RuntimeEvent>,
    {
        let clock = match self.scripted_clock.as_ref() {
            Some(clock) => clock.clone(),
            None => {
                let clock = ManualClock::new(self.clock.now());
                self.scripted_clock = Some(clock.clone());
                clock
            }
        };
        let previous = std::mem::replace(&mut self.clock, Arc::new(clock.clone()));
        let result = self.run_scripted_inner(stdout, events, &clock);
        self.clock = previous;
        result
    }

    fn run_scripted_inner<I>(
        &mut self,
        stdout: &mut impl Write,
        events: I,
        clock: &ManualClock,
    ) -> Result<()>
    where
        I: IntoIterator<Item = RuntimeEvent>,
    {
        self.bootstrap(stdout)?;
        for event in events {
            match &event {
                RuntimeEvent::Resize(size) => self.handle_resize(*size)?,
                RuntimeEvent::Tick { elapsed } => clock.advance(*elapsed),
                _ => {}
            }
            self.dispatch_event(event)?;
            self.render_if_needed(stdout)?;
            if self.should_exit {
                break;
            }
        }
        self.finalize()
    }

    fn dispatch_event(&mut self, event: RuntimeEvent) -> Result<()> {
        let now = self.clock.now();
        let mut consumed = false;
        for idx in 0..self.plugins.len() {
            let (flow, outcome) = {
                let plugin = &mut self.plugins[idx];
                let mut ctx = RuntimeContext::new(&self.rects, now);
                let flow = plugin.on_event(&mut ctx, &event)?;
                (flow, ctx.into_outcome())
            };
            self.apply_outcome(outcome)?;
            if flow == EventFlow::Consumed {
                consumed = true;
                break;
            }
        }
        with_metrics(self.config.metrics.as_ref(), |metrics| metrics.record_event());
        if !matches!(event, RuntimeEvent::Tick { .. }) {
            self.log_runtime_event(
                LogLevel::Debug,
                "event_dispatched",
                [
                    json_kv("event", json!(event.describe())),
                    json_kv("consumed", json!(consumed)),
                ],
            );
        }
        Ok(())
    }

    fn render_if_needed(&mut self, stdout: &mut impl Write) -> Result<()> {
        if !self.redraw_requested {
            return Ok(());
        }
        self.redraw_requested = false;

        let now = self.clock.now();
        for idx in 0..self.plugins.len() {
            let outcome = {
                let plugin = &mut self.plugins[idx];
                let mut ctx = RuntimeContext::new(&self.rects, now);
                plugin.before_render(&mut ctx)?;
                ctx.into_outcome()
            };
            self.apply_outcome(outcome)?;
        }

        let dirty = self.registry.take_dirty();
        if !dirty.is_empty() {
            self.renderer.render(stdout, &dirty)?;
            with_metrics(self.config.metrics.as_ref(), |metrics| metrics.record_render());
            self.log_runtime_event(
                LogLevel::Trace,
                "render_completed",
                [json_kv("dirty_zones", json!(dirty.len()))],
            );
        }

        // before_render updates are folded into this frame, not the next one.
        self.redraw_requested = self.registry.has_dirty();
        Ok(())
    }

    fn apply_outcome(&mut self, outcome: ContextOutcome) -> Result<()> {
        let ContextOutcome {
            zone_updates,
            redraw_requested,
            exit_requested,
            cursor_hint,
        } = outcome;

        let update_count = zone_updates.len();
        if update_count > 0 {
            for (zone, content) in zone_updates {
                self.registry.apply_content(&zone, content)?;
            }
            with_metrics(self.config.metrics.as_ref(), |metrics| {
                metrics.record_zone_updates(update_count)
            });
            self.redraw_requested = true;
        }

        if redraw_requested {
            self.redraw_requested = true;
        }

        if let Some(cursor) = cursor_hint {
            self.renderer.settings_mut().restore_cursor = Some(cursor);
        }

        if exit_requested && !self.should_exit {
            self.should_exit = true;
            self.log_runtime_event(LogLevel::Info, "exit_requested", std::iter::empty());
        }

        Ok(())
    }

    fn map_event(&mut self, event: CrosstermEvent) -> Result<Option<RuntimeEvent>> {
        let mapped = match event {
            CrosstermEvent::Key(key) => Some(RuntimeEvent::Key(key)),
            CrosstermEvent::Paste(data) => Some(RuntimeEvent::Paste(data)),
            CrosstermEvent::FocusGained => Some(RuntimeEvent::FocusGained),
            CrosstermEvent::FocusLost => Some(RuntimeEvent::FocusLost),
            CrosstermEvent::Resize(width, height) => {
                let size = Size::new(width, height);
                self.handle_resize(size)?;
                Some(RuntimeEvent::Resize(size))
            }
            CrosstermEvent::Mouse(_) => None,
        };
        Ok(mapped)
    }

    fn handle_resize(&mut self, size: Size) -> Result<()> {
        self.rects = self.layout.solve(size)?;
        self.registry.sync_layout(&self.rects, &self.leaves);
        self.registry.mark_all_dirty();
        self.redraw_requested = true;
        self.log_runtime_event(
            LogLevel::Info,
            "resized",
            [
                json_kv("width", json!(size.width)),
                json_kv("height", json!(size.height)),
            ],
        );
        Ok(())
    }

    fn bootstrap(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.should_exit = false;
        self.redraw_requested = true;
        let now = self.clock.now();
        self.start_instant = Some(now);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_started",
            [
                json_kv("plugins", json!(self.plugins.len())),
                json_kv("zones", json!(self.leaves.len())),
            ],
        );

        for idx in 0..self.plugins.len() {
            let (name, outcome) = {
                let plugin = &mut self.plugins[idx];
                let mut ctx = RuntimeContext::new(&self.rects, now);
                plugin.init(&mut ctx)?;
                (plugin.name().to_string(), ctx.into_outcome())
            };
            self.log_runtime_event(
                LogLevel::Debug,
                "plugin_initialized",
                [json_kv("plugin", json!(name))],
            );
            self.apply_outcome(outcome)?;
        }

        self.render_if_needed(stdout)
    }

    /// Plugins are shut down only once exit was requested; a scripted run
    /// that simply runs out of events leaves them live for the next one.
    fn finalize(&mut self) -> Result<()> {
        let now = self.clock.now();
        if self.should_exit {
            for idx in 0..self.plugins.len() {
                let outcome = {
                    let plugin = &mut self.plugins[idx];
                    let mut ctx = RuntimeContext::new(&self.rects, now);
                    plugin.shutdown(&mut ctx)?;
                    ctx.into_outcome()
                };
                self.apply_outcome(outcome)?;
            }
        }

        let uptime_ms = self
            .start_instant
            .map(|start| now.saturating_duration_since(start).as_millis())
            .unwrap_or(0);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_stopped",
            [json_kv("uptime_ms", json!(uptime_ms))],
        );
        Ok(())
    }

    fn log_runtime_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, RUNTIME_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }
}
