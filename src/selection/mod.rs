//! Uniform random selection over a template store.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use crate::catalog::{ContentItem, TemplateStore};
use crate::error::{ForgeError, Result};

/// Append the user's context to selected content. Blank context leaves the
/// content untouched.
pub fn annotate(content: &str, context: &str) -> String {
    let context = context.trim();
    if context.is_empty() {
        return content.to_string();
    }
    format!("{content} — customized for: \"{context}\"")
}

/// Draws items from a [`TemplateStore`]. Only the RNG state changes between calls.
#[derive(Debug, Clone)]
pub struct Selector<R = StdRng> {
    rng: R,
}

impl Selector<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Selector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// One item from `key`, each with equal probability, repeats allowed.
    pub fn select<'s>(&mut self, store: &'s TemplateStore, key: &str) -> Result<&'s ContentItem> {
        let items = store.category(key)?.items();
        let idx = self.rng.gen_range(0..items.len());
        Ok(&items[idx])
    }

    /// Like [`Selector::select`] for text categories, with the context annotation applied.
    pub fn select_annotated(
        &mut self,
        store: &TemplateStore,
        key: &str,
        context: &str,
    ) -> Result<String> {
        let item = self.select(store, key)?;
        Ok(annotate(item.headline(), context))
    }

    /// Between `min` and `max` distinct items from `key`, in random order.
    /// Both bounds are clamped to the category size.
    pub fn sample_distinct<'s>(
        &mut self,
        store: &'s TemplateStore,
        key: &str,
        min: usize,
        max: usize,
    ) -> Result<Vec<&'s ContentItem>> {
        if min > max {
            return Err(ForgeError::Configuration(format!(
                "sample size range {min}..={max} is inverted"
            )));
        }
        let items = store.category(key)?.items();
        let upper = max.min(items.len());
        let lower = min.min(upper);
        let amount = self.rng.gen_range(lower..=upper);
        Ok(index::sample(&mut self.rng, items.len(), amount)
            .into_iter()
            .map(|idx| &items[idx])
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RESEARCH_POOL, idea_store, research_store};
    use std::collections::{HashMap, HashSet};

    #[test]
    fn tech_selection_only_returns_catalog_entries() {
        let store = idea_store().unwrap();
        let tech = store.category("tech").unwrap();
        assert_eq!(tech.len(), 8);
        let mut selector = Selector::seeded(7);
        for _ in 0..1000 {
            let item = selector.select(&store, "tech").unwrap();
            assert!(tech.contains(item));
        }
    }

    #[test]
    fn every_category_member_is_eventually_selected() {
        let store = idea_store().unwrap();
        let mut selector = Selector::seeded(42);
        for key in store.keys() {
            let category = store.category(key).unwrap();
            let mut counts: HashMap<&str, usize> = HashMap::new();
            let trials = 4000;
            for _ in 0..trials {
                let item = selector.select(&store, key).unwrap();
                *counts.entry(item.headline()).or_default() += 1;
            }
            assert_eq!(counts.len(), category.len(), "category {key}");
            // 500 expected per item; a uniform draw stays well inside these bounds.
            let expected = trials / category.len();
            for (item, count) in counts {
                assert!(
                    count > expected / 2 && count < expected * 2,
                    "{item} drawn {count} times"
                );
            }
        }
    }

    #[test]
    fn unknown_category_fails_with_configuration_error() {
        let store = idea_store().unwrap();
        let err = Selector::seeded(1).select(&store, "astrology").unwrap_err();
        assert!(matches!(err, ForgeError::Configuration(_)));
    }

    #[test]
    fn annotate_appends_quoted_context() {
        assert_eq!(
            annotate("A tool that X", "for students"),
            "A tool that X — customized for: \"for students\""
        );
    }

    #[test]
    fn annotate_ignores_blank_context() {
        assert_eq!(annotate("A tool that X", "   "), "A tool that X");
        assert_eq!(annotate("A tool that X", ""), "A tool that X");
    }

    #[test]
    fn select_annotated_keeps_catalog_prefix() {
        let store = idea_store().unwrap();
        let text = Selector::seeded(3)
            .select_annotated(&store, "health", "night shift nurses")
            .unwrap();
        assert!(text.ends_with(" — customized for: \"night shift nurses\""));
        let prefix = text.split(" — customized for:").next().unwrap();
        assert!(
            store
                .category("health")
                .unwrap()
                .contains(&ContentItem::Text(prefix.to_string()))
        );
    }

    #[test]
    fn distinct_sample_sizes_stay_in_range() {
        let store = research_store().unwrap();
        let mut selector = Selector::seeded(99);
        let mut sizes = HashSet::new();
        for _ in 0..300 {
            let picked = selector.sample_distinct(&store, RESEARCH_POOL, 3, 5).unwrap();
            assert!((3..=5).contains(&picked.len()));
            let unique: HashSet<&str> = picked.iter().map(|item| item.headline()).collect();
            assert_eq!(unique.len(), picked.len());
            sizes.insert(picked.len());
        }
        assert_eq!(sizes.len(), 3);
    }

    #[test]
    fn distinct_sample_clamps_to_category_size() {
        let store = TemplateStore::builder()
            .text_category("tiny", ["a", "b"])
            .build()
            .unwrap();
        let picked = Selector::seeded(5)
            .sample_distinct(&store, "tiny", 3, 5)
            .unwrap();
        assert_eq!(picked.len(), 2);
    }
}
