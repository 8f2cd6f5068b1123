//! Template store: the fixed catalog of canned content each panel draws from.
//!
//! Stores are built once at startup and shared read-only behind an `Arc`.

mod builtin;
mod core;

pub use builtin::{
    CODE_LANGUAGES, IDEA_CATEGORIES, RESEARCH_POOL, code_store, idea_store, research_store,
};
pub use core::{
    CategoryKey, ContentItem, ResearchEntry, Snippet, TemplateCategory, TemplateStore,
    TemplateStoreBuilder,
};
