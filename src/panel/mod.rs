//! Panel controllers: the `Idle → Generating → Settled` state machine shared by
//! the idea, research and code panels.
//!
//! A [`PanelController`] owns its session log, input fields and RNG. What a
//! panel produces and how results accumulate is decided by its [`Generator`].

mod controller;
mod generators;

use std::fmt;
use std::time::{Duration, Instant};

use crate::catalog::TemplateStore;
use crate::clipboard::ClipboardSink;
use crate::error::Result;
use crate::selection::Selector;
use crate::session::{GeneratedResult, Payload, ResultFlag, ResultId, Retention};

pub use controller::{PanelController, TriggerOutcome};
pub use generators::{
    CodeGenerator, IdeaGenerator, ResearchGenerator, code_panel, idea_panel, research_panel,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Idea,
    Research,
    Code,
}

impl PanelKind {
    pub const ALL: [PanelKind; 3] = [PanelKind::Idea, PanelKind::Research, PanelKind::Code];

    pub fn id(&self) -> &'static str {
        match self {
            PanelKind::Idea => "idea",
            PanelKind::Research => "research",
            PanelKind::Code => "code",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::Idea => "Idea Generator",
            PanelKind::Research => "Research Lookup",
            PanelKind::Code => "Code Snippets",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            PanelKind::Idea => 0,
            PanelKind::Research => 1,
            PanelKind::Code => 2,
        }
    }

    pub fn log_target(&self) -> String {
        format!("forge::panel.{}", self.id())
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Idle,
    Generating,
    Settled,
}

impl PanelState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelState::Idle => "idle",
            PanelState::Generating => "generating",
            PanelState::Settled => "settled",
        }
    }
}

/// The free-text field a panel exposes next to its category selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextField {
    /// Name reported by `ForgeError::EmptyInput`.
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelInput {
    pub category: String,
    pub text: String,
}

impl PanelInput {
    pub fn text_is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Produces one generation's payloads. Implementations must not keep state
/// between calls beyond what they were constructed with.
pub trait Generator: Send {
    fn kind(&self) -> PanelKind;

    fn retention(&self) -> Retention;

    fn text_field(&self) -> TextField;

    /// Whether the category selector is meaningful for this panel.
    fn shows_categories(&self) -> bool {
        true
    }

    fn produce(
        &self,
        store: &TemplateStore,
        selector: &mut Selector,
        input: &PanelInput,
    ) -> Result<Vec<(String, Payload)>>;
}

/// User intents forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelIntent {
    SelectCategory(String),
    CycleCategory(isize),
    InsertChar(char),
    DeleteChar,
    SetText(String),
    Generate,
    ToggleFlag(ResultId, ResultFlag),
    Remove(ResultId),
    Clear,
    Copy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
    Applied,
    Started { delay: Duration },
    AlreadyGenerating,
    /// The intent referred to something that no longer exists.
    Ignored,
}

/// Read model consumed by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub kind: PanelKind,
    pub state: PanelState,
    pub categories: Vec<String>,
    pub category: String,
    pub shows_categories: bool,
    pub text_field: TextField,
    pub text: String,
    pub entries: Vec<GeneratedResult>,
    pub can_generate: bool,
    pub copied: bool,
    pub remaining: Option<Duration>,
}

/// Object-safe face of a controller, used by the tab manager.
pub trait Panel: Send {
    fn kind(&self) -> PanelKind;

    fn apply(
        &mut self,
        intent: PanelIntent,
        now: Instant,
        clipboard: &mut dyn ClipboardSink,
    ) -> Result<IntentOutcome>;

    /// Advance timers. Returns `true` when the read model changed.
    fn poll(&mut self, now: Instant) -> bool;

    fn view(&self, now: Instant) -> PanelView;

    /// Cancel in-flight work before the panel is dropped.
    fn teardown(&mut self);
}
