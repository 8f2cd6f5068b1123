use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{TemplateStore, code_store, idea_store, research_store};
use crate::clipboard::ClipboardSink;
use crate::config::{ForgeConfig, PanelSettings};
use crate::error::Result;
use crate::geometry::Size;
use crate::layout::{Constraint, Direction, LayoutNode, LayoutTree};
use crate::logging::{FileSink, LogLevel, Logger};
use crate::metrics::{ForgeMetrics, SharedMetrics};
use crate::panel::{
    Generator, Panel, PanelController, PanelKind, code_panel, idea_panel, research_panel,
};
use crate::render::AnsiRenderer;

use super::diagnostics::{LifecycleLoggerPlugin, MetricsSnapshotPlugin};
use super::tabs::{PanelFactory, TabDefinition, TabManager};
use super::workbench::{BODY_ZONE, CONTROLS_ZONE, PanelTabsPlugin, STATUS_ZONE, TABS_ZONE};
use super::{PluginBundle, RuntimeConfig, WorkbenchRuntime};

const ROOT_ZONE: &str = "forge:root";

/// Tabs on top, the panel's inputs below them, results filling the middle
/// and a two-line status bar at the bottom.
pub fn workbench_layout() -> LayoutTree {
    LayoutTree::new(
        LayoutNode::container(
            ROOT_ZONE,
            Direction::Column,
            vec![
                Constraint::Fixed(1),
                Constraint::Fixed(1),
                Constraint::Flex(1),
                Constraint::Fixed(2),
            ],
            vec![
                LayoutNode::leaf(TABS_ZONE),
                LayoutNode::leaf(CONTROLS_ZONE),
                LayoutNode::leaf(BODY_ZONE),
                LayoutNode::leaf(STATUS_ZONE),
            ],
        )
        .with_gap(1),
    )
}

/// `FileSink` logger when the config names a log file.
pub fn logger_from_config(config: &ForgeConfig) -> Result<Option<Logger>> {
    let Some(path) = config.log_path.as_ref() else {
        return Ok(None);
    };
    let sink = FileSink::new(path, config.log_max_bytes)?;
    Ok(Some(Logger::new(sink)))
}

/// Register the idea, research and code tabs. Stores are built once and
/// shared by every panel instance the factories create.
pub fn workbench_tabs(
    config: &ForgeConfig,
    logger: Option<Logger>,
    metrics: Option<SharedMetrics>,
) -> Result<TabManager> {
    config.validate()?;
    let mut tabs = TabManager::new();
    if let Some(logger) = logger.as_ref() {
        tabs = tabs.with_logger(logger.clone());
    }

    for kind in PanelKind::ALL {
        let store = Arc::new(match kind {
            PanelKind::Idea => idea_store()?,
            PanelKind::Research => research_store()?,
            PanelKind::Code => code_store()?,
        });
        let factory = panel_factory(
            kind,
            store,
            config.panel_settings(kind),
            logger.clone(),
            metrics.clone(),
        );
        tabs.register_tab(TabDefinition::new(kind, factory));
    }
    Ok(tabs)
}

fn panel_factory(
    kind: PanelKind,
    store: Arc<TemplateStore>,
    settings: PanelSettings,
    logger: Option<Logger>,
    metrics: Option<SharedMetrics>,
) -> PanelFactory {
    Arc::new(move || -> Result<Box<dyn Panel>> {
        let store = Arc::clone(&store);
        let panel = match kind {
            PanelKind::Idea => instrument(idea_panel(store, settings)?, &logger, &metrics),
            PanelKind::Research => {
                instrument(research_panel(store, settings)?, &logger, &metrics)
            }
            PanelKind::Code => instrument(code_panel(store, settings)?, &logger, &metrics),
        };
        Ok(panel)
    })
}

fn instrument<G>(
    mut panel: PanelController<G>,
    logger: &Option<Logger>,
    metrics: &Option<SharedMetrics>,
) -> Box<dyn Panel>
where
    G: Generator + 'static,
{
    if let Some(logger) = logger.clone() {
        panel = panel.with_logger(logger);
    }
    if let Some(metrics) = metrics.clone() {
        panel = panel.with_metrics(metrics);
    }
    Box::new(panel)
}

#[derive(Clone)]
pub struct DiagnosticsConfig {
    pub logger: Logger,
    pub lifecycle_priority: i32,
    pub level: LogLevel,
    pub log_keys: bool,
    pub log_ticks: bool,
    pub metrics: Option<DiagnosticsMetricsConfig>,
}

impl DiagnosticsConfig {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            lifecycle_priority: -100,
            level: LogLevel::Debug,
            log_keys: true,
            log_ticks: false,
            metrics: None,
        }
    }

    fn build_logger_plugin(&self) -> LifecycleLoggerPlugin {
        LifecycleLoggerPlugin::new(self.logger.clone())
            .with_level(self.level)
            .log_keys(self.log_keys)
            .log_ticks(self.log_ticks)
    }
}

#[derive(Clone)]
pub struct DiagnosticsMetricsConfig {
    pub metrics: SharedMetrics,
    pub interval: Duration,
    pub priority: i32,
}

/// The panel plugin plus, when configured, the diagnostics plugins around it.
pub fn workbench_bundle(
    panels: PanelTabsPlugin,
    diagnostics: Option<DiagnosticsConfig>,
) -> PluginBundle {
    let mut bundle = PluginBundle::new().with_plugin(panels, 0);

    if let Some(diag) = diagnostics {
        bundle = bundle.with_plugin(diag.build_logger_plugin(), diag.lifecycle_priority);
        if let Some(metrics_cfg) = diag.metrics {
            let plugin = MetricsSnapshotPlugin::new(diag.logger.clone(), metrics_cfg.metrics)
                .with_interval(metrics_cfg.interval);
            bundle = bundle.with_plugin(plugin, metrics_cfg.priority);
        }
    }

    bundle
}

/// Assembles a ready-to-run workbench from a [`ForgeConfig`].
pub struct WorkbenchBuilder {
    config: ForgeConfig,
    size: Size,
    logger: Option<Logger>,
    clipboard: Option<Box<dyn ClipboardSink>>,
    initial: PanelKind,
}

impl WorkbenchBuilder {
    pub fn new(config: ForgeConfig) -> Self {
        Self {
            config,
            size: Size::new(100, 30),
            logger: None,
            clipboard: None,
            initial: PanelKind::Idea,
        }
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Use `logger` instead of the one described by `log_path`.
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn clipboard<C>(mut self, clipboard: C) -> Self
    where
        C: ClipboardSink + 'static,
    {
        self.clipboard = Some(Box::new(clipboard));
        self
    }

    pub fn initial(mut self, kind: PanelKind) -> Self {
        self.initial = kind;
        self
    }

    pub fn build(self) -> Result<WorkbenchRuntime> {
        self.config.validate()?;
        let logger = match self.logger {
            Some(logger) => Some(logger),
            None => logger_from_config(&self.config)?,
        };
        let metrics = ForgeMetrics::shared();

        let tabs = workbench_tabs(&self.config, logger.clone(), Some(Arc::clone(&metrics)))?;
        let mut panels = PanelTabsPlugin::new(tabs).with_initial(self.initial);
        if let Some(clipboard) = self.clipboard {
            panels = panels.with_clipboard(clipboard);
        }

        let diagnostics = logger.as_ref().map(|logger| {
            let mut diag = DiagnosticsConfig::new(logger.clone());
            if self.config.metrics_interval_ms > 0 {
                diag.metrics = Some(DiagnosticsMetricsConfig {
                    metrics: Arc::clone(&metrics),
                    interval: self.config.metrics_interval(),
                    priority: 100,
                });
            }
            diag
        });

        let renderer = AnsiRenderer::with_default();
        let mut runtime = WorkbenchRuntime::new(workbench_layout(), renderer, self.size)?
            .with_config(RuntimeConfig {
                tick_interval: self.config.tick_interval(),
                logger,
                metrics: Some(metrics),
            });
        runtime.register_bundle(workbench_bundle(panels, diagnostics));
        Ok(runtime)
    }
}

pub fn build_workbench(config: &ForgeConfig) -> Result<WorkbenchRuntime> {
    WorkbenchBuilder::new(config.clone()).build()
}
