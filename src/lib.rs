//! Generator workbench: idea, research and code panels that pick canned
//! content, reveal it after a simulated delay and keep a per-panel session log.
//!
//! The panel logic (`catalog`, `selection`, `latency`, `session`, `panel`) is
//! independent of the terminal. `runtime` wires it into a zone-based terminal
//! loop rendered through `layout`, `registry` and `render`.

pub mod catalog;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod geometry;
pub mod latency;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod panel;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod selection;
pub mod session;
pub mod width;

pub use catalog::{ContentItem, ResearchEntry, Snippet, TemplateStore, TemplateStoreBuilder};
pub use clipboard::{ClipboardSink, MemoryClipboard};
pub use config::{ForgeConfig, PanelSettings, SampleRange};
pub use error::{ForgeError, Result};
pub use geometry::{Rect, Size};
pub use latency::{Clock, LatencyRange, ManualClock, SystemClock};
pub use layout::{Constraint, Direction, LayoutNode, LayoutTree};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use metrics::{ForgeMetrics, MetricSnapshot, SharedMetrics};
pub use panel::{
    Panel, PanelController, PanelIntent, PanelKind, PanelState, PanelView, TriggerOutcome,
};
pub use registry::{ZoneContent, ZoneId, ZoneRegistry};
pub use render::{AnsiRenderer, RendererSettings};
pub use runtime::bundles::{
    DiagnosticsConfig, DiagnosticsMetricsConfig, WorkbenchBuilder, build_workbench,
    workbench_bundle, workbench_layout, workbench_tabs,
};
pub use runtime::diagnostics::{LifecycleLoggerPlugin, MetricsSnapshotPlugin};
pub use runtime::driver::{CliDriver, CliDriverError, DriverResult, MIN_TERMINAL};
pub use runtime::tabs::{PanelFactory, TabDefinition, TabLifecycleEvent, TabManager};
pub use runtime::workbench::PanelTabsPlugin;
pub use runtime::{
    EventFlow, PluginBundle, RuntimeConfig, RuntimeContext, RuntimeEvent, WorkbenchPlugin,
    WorkbenchRuntime,
};
pub use selection::Selector;
pub use session::{GeneratedResult, Payload, ResultFlag, ResultId, SessionLog};
pub use width::display_width;
