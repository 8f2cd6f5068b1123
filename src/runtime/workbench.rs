use std::time::Instant;

use crate::clipboard::{ClipboardSink, MemoryClipboard};
use crate::error::{ForgeError, Result};
use crate::panel::{IntentOutcome, PanelIntent, PanelKind, PanelState};
use crate::render::project_frame;
use crate::session::ResultId;

use super::input::{Command, map_key};
use super::tabs::TabManager;
use super::{EventFlow, RuntimeContext, RuntimeEvent, WorkbenchPlugin};

pub const TABS_ZONE: &str = "forge:tabs";
pub const CONTROLS_ZONE: &str = "forge:controls";
pub const BODY_ZONE: &str = "forge:body";
pub const STATUS_ZONE: &str = "forge:status";

/// Routes keys to the active panel, drives its timers on ticks and projects
/// its read model into the four workbench zones.
pub struct PanelTabsPlugin {
    tabs: TabManager,
    clipboard: Box<dyn ClipboardSink>,
    initial: PanelKind,
    cursor: usize,
    notice: Option<String>,
}

impl PanelTabsPlugin {
    pub fn new(tabs: TabManager) -> Self {
        Self {
            tabs,
            clipboard: Box::new(MemoryClipboard::new()),
            initial: PanelKind::Idea,
            cursor: 0,
            notice: None,
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_initial(mut self, kind: PanelKind) -> Self {
        self.initial = kind;
        self
    }

    fn handle(
        &mut self,
        command: Command,
        now: Instant,
        ctx: &mut RuntimeContext<'_>,
    ) -> Result<()> {
        match command {
            Command::Exit => ctx.request_exit(),
            Command::NextTab => self.switch_tab(1)?,
            Command::PrevTab => self.switch_tab(-1)?,
            Command::CursorUp => self.cursor = self.cursor.saturating_sub(1),
            Command::CursorDown => self.cursor = self.cursor.saturating_add(1),
            Command::ToggleSelected(flag) => {
                if let Some(id) = self.selected_id(now) {
                    self.apply(PanelIntent::ToggleFlag(id, flag), now)?;
                }
            }
            Command::RemoveSelected => {
                if let Some(id) = self.selected_id(now) {
                    self.apply(PanelIntent::Remove(id), now)?;
                }
            }
            Command::Panel(intent) => self.apply(intent, now)?,
        }
        self.clamp_cursor(now);
        ctx.request_render();
        Ok(())
    }

    fn switch_tab(&mut self, step: isize) -> Result<()> {
        self.tabs.cycle(step)?;
        self.cursor = 0;
        self.notice = None;
        Ok(())
    }

    fn apply(&mut self, intent: PanelIntent, now: Instant) -> Result<()> {
        let Some(panel) = self.tabs.active_mut() else {
            return Ok(());
        };
        match panel.apply(intent, now, self.clipboard.as_mut()) {
            Ok(IntentOutcome::Started { .. }) => {
                self.cursor = 0;
                self.notice = None;
            }
            Ok(IntentOutcome::AlreadyGenerating) => {
                self.notice = Some("still generating".to_string());
            }
            Ok(IntentOutcome::Applied) | Ok(IntentOutcome::Ignored) => self.notice = None,
            // Refusals are part of normal use; show them instead of failing the loop.
            Err(err @ ForgeError::EmptyInput { .. }) => self.notice = Some(err.to_string()),
            Err(err) => return Err(err),
        }
        Ok(())
    }

    fn selected_id(&self, now: Instant) -> Option<ResultId> {
        let view = self.tabs.active()?.view(now);
        view.entries.get(self.cursor).map(|entry| entry.id)
    }

    fn clamp_cursor(&mut self, now: Instant) {
        let len = self
            .tabs
            .active()
            .map(|panel| panel.view(now).entries.len())
            .unwrap_or(0);
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

impl WorkbenchPlugin for PanelTabsPlugin {
    fn name(&self) -> &str {
        "workbench.panel_tabs"
    }

    fn init(&mut self, ctx: &mut RuntimeContext<'_>) -> Result<()> {
        self.tabs.activate(self.initial)?;
        ctx.request_render();
        Ok(())
    }

    fn on_event(
        &mut self,
        ctx: &mut RuntimeContext<'_>,
        event: &RuntimeEvent,
    ) -> Result<EventFlow> {
        let now = ctx.now();
        match event {
            RuntimeEvent::Tick { .. } => {
                let Some(panel) = self.tabs.active_mut() else {
                    return Ok(EventFlow::Continue);
                };
                let changed = panel.poll(now);
                let generating = panel.view(now).state == PanelState::Generating;
                if changed {
                    self.clamp_cursor(now);
                }
                // The countdown in the status line moves on every tick.
                if changed || generating {
                    ctx.request_render();
                }
                Ok(EventFlow::Continue)
            }
            RuntimeEvent::Key(key) => match map_key(key) {
                Some(command) => {
                    self.handle(command, now, ctx)?;
                    Ok(EventFlow::Consumed)
                }
                None => Ok(EventFlow::Continue),
            },
            RuntimeEvent::Paste(text) => {
                for ch in text.chars().filter(|ch| !ch.is_control()) {
                    self.apply(PanelIntent::InsertChar(ch), now)?;
                }
                ctx.request_render();
                Ok(EventFlow::Consumed)
            }
            RuntimeEvent::Resize(_) => {
                ctx.request_render();
                Ok(EventFlow::Continue)
            }
            RuntimeEvent::FocusGained | RuntimeEvent::FocusLost => Ok(EventFlow::Continue),
        }
    }

    fn before_render(&mut self, ctx: &mut RuntimeContext<'_>) -> Result<()> {
        let (Some(kind), Some(panel)) = (self.tabs.active_kind(), self.tabs.active()) else {
            return Ok(());
        };
        let view = panel.view(ctx.now());
        let frame = project_frame(&view, kind, self.cursor, self.notice.as_deref());
        ctx.set_zone(TABS_ZONE, frame.tabs);
        ctx.set_zone(CONTROLS_ZONE, frame.controls);
        ctx.set_zone(BODY_ZONE, frame.body);
        ctx.set_zone(STATUS_ZONE, frame.status);
        Ok(())
    }

    fn shutdown(&mut self, _ctx: &mut RuntimeContext<'_>) -> Result<()> {
        self.tabs.deactivate();
        Ok(())
    }
}
