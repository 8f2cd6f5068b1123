use std::sync::Arc;

use serde_json::json;

use crate::error::{ForgeError, Result};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::panel::{Panel, PanelKind};

const LIFECYCLE_TARGET: &str = "forge::runtime.lifecycle";

/// Builds a fresh panel each time its tab is shown.
pub type PanelFactory = Arc<dyn Fn() -> Result<Box<dyn Panel>> + Send + Sync>;

pub struct TabDefinition {
    pub kind: PanelKind,
    pub title: String,
    pub factory: PanelFactory,
}

impl TabDefinition {
    pub fn new(kind: PanelKind, factory: PanelFactory) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            factory,
        }
    }
}

/// Lifecycle events emitted around tab activation/deactivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabLifecycleEvent {
    WillAppear,
    DidAppear,
    WillDisappear,
    DidDisappear,
}

impl TabLifecycleEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TabLifecycleEvent::WillAppear => "will_appear",
            TabLifecycleEvent::DidAppear => "did_appear",
            TabLifecycleEvent::WillDisappear => "will_disappear",
            TabLifecycleEvent::DidDisappear => "did_disappear",
        }
    }
}

struct ActiveTab {
    kind: PanelKind,
    panel: Box<dyn Panel>,
}

/// Owns the registered tabs and the single live panel.
///
/// Only the active tab has a panel instance. Switching away tears the panel
/// down, so a pending generation never lands in a panel nobody is looking at,
/// and coming back starts from an empty session.
#[derive(Default)]
pub struct TabManager {
    tabs: Vec<TabDefinition>,
    active: Option<ActiveTab>,
    logger: Option<Logger>,
}

impl TabManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Registers a tab; a second definition for the same kind replaces the first.
    pub fn register_tab(&mut self, definition: TabDefinition) {
        match self.tabs.iter_mut().find(|tab| tab.kind == definition.kind) {
            Some(existing) => *existing = definition,
            None => self.tabs.push(definition),
        }
    }

    pub fn kinds(&self) -> Vec<PanelKind> {
        self.tabs.iter().map(|tab| tab.kind).collect()
    }

    pub fn active_kind(&self) -> Option<PanelKind> {
        self.active.as_ref().map(|tab| tab.kind)
    }

    pub fn active(&self) -> Option<&dyn Panel> {
        match self.active.as_ref() {
            Some(tab) => Some(tab.panel.as_ref()),
            None => None,
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut dyn Panel> {
        match self.active.as_mut() {
            Some(tab) => Some(tab.panel.as_mut()),
            None => None,
        }
    }

    /// Show `kind`. Returns `false` when it was already showing.
    pub fn activate(&mut self, kind: PanelKind) -> Result<bool> {
        if self.active_kind() == Some(kind) {
            return Ok(false);
        }

        let definition = self
            .tabs
            .iter()
            .find(|tab| tab.kind == kind)
            .ok_or_else(|| ForgeError::Configuration(format!("tab '{kind}' not registered")))?;
        let panel = (definition.factory)()?;

        let previous = self.active.take();
        if let Some(previous) = previous.as_ref() {
            self.emit(previous.kind, TabLifecycleEvent::WillDisappear);
        }
        self.emit(kind, TabLifecycleEvent::WillAppear);
        self.active = Some(ActiveTab { kind, panel });
        self.emit(kind, TabLifecycleEvent::DidAppear);

        if let Some(mut previous) = previous {
            previous.panel.teardown();
            self.emit(previous.kind, TabLifecycleEvent::DidDisappear);
        }
        Ok(true)
    }

    /// Move `step` tabs along the registration order, wrapping at the ends.
    pub fn cycle(&mut self, step: isize) -> Result<PanelKind> {
        if self.tabs.is_empty() {
            return Err(ForgeError::Configuration("no tabs registered".to_string()));
        }
        let len = self.tabs.len() as isize;
        let current = self
            .active_kind()
            .and_then(|kind| self.tabs.iter().position(|tab| tab.kind == kind))
            .unwrap_or(0) as isize;
        let next = self.tabs[(current + step).rem_euclid(len) as usize].kind;
        self.activate(next)?;
        Ok(next)
    }

    /// Tear down the live panel, leaving no tab active.
    pub fn deactivate(&mut self) {
        if let Some(mut active) = self.active.take() {
            self.emit(active.kind, TabLifecycleEvent::WillDisappear);
            active.panel.teardown();
            self.emit(active.kind, TabLifecycleEvent::DidDisappear);
        }
    }

    fn emit(&self, kind: PanelKind, event: TabLifecycleEvent) {
        if let Some(logger) = self.logger.as_ref() {
            let event = event_with_fields(
                LogLevel::Debug,
                LIFECYCLE_TARGET,
                "tab_lifecycle",
                [
                    json_kv("tab", json!(kind.id())),
                    json_kv("event", json!(event.as_str())),
                ],
            );
            let _ = logger.log_event(event);
        }
    }
}
