use std::sync::Arc;

use crate::catalog::{ContentItem, RESEARCH_POOL, TemplateStore};
use crate::config::{PanelSettings, SampleRange};
use crate::error::Result;
use crate::selection::{Selector, annotate};
use crate::session::{Payload, Retention};

use super::{Generator, PanelController, PanelInput, PanelKind, TextField};

/// One annotated idea per generation, newest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdeaGenerator;

impl Generator for IdeaGenerator {
    fn kind(&self) -> PanelKind {
        PanelKind::Idea
    }

    fn retention(&self) -> Retention {
        Retention::Prepend
    }

    fn text_field(&self) -> TextField {
        TextField {
            name: "context",
            label: "Context",
            required: false,
        }
    }

    fn produce(
        &self,
        store: &TemplateStore,
        selector: &mut Selector,
        input: &PanelInput,
    ) -> Result<Vec<(String, Payload)>> {
        let text = selector.select_annotated(store, &input.category, &input.text)?;
        Ok(vec![(input.category.clone(), Payload::Idea(text))])
    }
}

/// A fresh random subset of the research pool per search. The query only
/// gates the search; it never influences which entries come back.
#[derive(Debug, Clone, Copy)]
pub struct ResearchGenerator {
    sample: SampleRange,
}

impl ResearchGenerator {
    pub fn new(sample: SampleRange) -> Self {
        Self { sample }
    }
}

impl Generator for ResearchGenerator {
    fn kind(&self) -> PanelKind {
        PanelKind::Research
    }

    fn retention(&self) -> Retention {
        Retention::Replace
    }

    fn text_field(&self) -> TextField {
        TextField {
            name: "query",
            label: "Query",
            required: true,
        }
    }

    fn shows_categories(&self) -> bool {
        false
    }

    fn produce(
        &self,
        store: &TemplateStore,
        selector: &mut Selector,
        _input: &PanelInput,
    ) -> Result<Vec<(String, Payload)>> {
        let picked = selector.sample_distinct(store, RESEARCH_POOL, self.sample.min, self.sample.max)?;
        Ok(picked
            .into_iter()
            .map(|item| (RESEARCH_POOL.to_string(), Payload::from_item(item)))
            .collect())
    }
}

/// One snippet for the selected language; regenerating replaces it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeGenerator;

impl Generator for CodeGenerator {
    fn kind(&self) -> PanelKind {
        PanelKind::Code
    }

    fn retention(&self) -> Retention {
        Retention::Single
    }

    fn text_field(&self) -> TextField {
        TextField {
            name: "prompt",
            label: "Describe it",
            required: false,
        }
    }

    fn produce(
        &self,
        store: &TemplateStore,
        selector: &mut Selector,
        input: &PanelInput,
    ) -> Result<Vec<(String, Payload)>> {
        let payload = match selector.select(store, &input.category)? {
            // The body stays byte-for-byte so copies match the catalog.
            ContentItem::Snippet(snippet) => {
                let mut snippet = snippet.clone();
                snippet.description = annotate(&snippet.description, &input.text);
                Payload::Snippet(snippet)
            }
            other => Payload::from_item(other),
        };
        Ok(vec![(input.category.clone(), payload)])
    }
}

pub fn idea_panel(
    store: Arc<TemplateStore>,
    settings: PanelSettings,
) -> Result<PanelController<IdeaGenerator>> {
    PanelController::new(IdeaGenerator, store, settings)
}

pub fn research_panel(
    store: Arc<TemplateStore>,
    settings: PanelSettings,
) -> Result<PanelController<ResearchGenerator>> {
    PanelController::new(ResearchGenerator::new(settings.sample), store, settings)
}

pub fn code_panel(
    store: Arc<TemplateStore>,
    settings: PanelSettings,
) -> Result<PanelController<CodeGenerator>> {
    PanelController::new(CodeGenerator, store, settings)
}
