use std::collections::HashMap;

use crate::error::{ForgeError, Result};

pub type CategoryKey = String;

/// Canned code snippet with display metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub title: String,
    pub language: String,
    pub description: String,
    pub body: String,
}

/// Mock research record. `id` is unique within its pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchEntry {
    pub id: u32,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub year: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    Text(String),
    Research(ResearchEntry),
    Snippet(Snippet),
}

impl ContentItem {
    /// Short single-line label used by logs and list views.
    pub fn headline(&self) -> &str {
        match self {
            ContentItem::Text(text) => text,
            ContentItem::Research(entry) => &entry.title,
            ContentItem::Snippet(snippet) => &snippet.title,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TemplateCategory {
    key: CategoryKey,
    items: Vec<ContentItem>,
}

impl TemplateCategory {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &ContentItem) -> bool {
        self.items.contains(item)
    }
}

/// Immutable mapping from category key to an ordered, non-empty item list.
/// Category order follows insertion order.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    categories: Vec<TemplateCategory>,
    index: HashMap<CategoryKey, usize>,
}

impl TemplateStore {
    pub fn builder() -> TemplateStoreBuilder {
        TemplateStoreBuilder::default()
    }

    pub fn category(&self, key: &str) -> Result<&TemplateCategory> {
        self.index
            .get(key)
            .map(|&idx| &self.categories[idx])
            .ok_or_else(|| ForgeError::unknown_category(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|category| category.key.as_str())
    }

    pub fn first_key(&self) -> Option<&str> {
        self.categories.first().map(|category| category.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct TemplateStoreBuilder {
    categories: Vec<TemplateCategory>,
}

impl TemplateStoreBuilder {
    pub fn category<I>(mut self, key: impl Into<CategoryKey>, items: I) -> Self
    where
        I: IntoIterator<Item = ContentItem>,
    {
        self.categories.push(TemplateCategory {
            key: key.into(),
            items: items.into_iter().collect(),
        });
        self
    }

    pub fn text_category<I, S>(self, key: impl Into<CategoryKey>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category(key, items.into_iter().map(|s| ContentItem::Text(s.into())))
    }

    /// Rejects empty categories and duplicate keys.
    pub fn build(self) -> Result<TemplateStore> {
        let mut index = HashMap::new();
        for (idx, category) in self.categories.iter().enumerate() {
            if category.items.is_empty() {
                return Err(ForgeError::Configuration(format!(
                    "category `{}` has no items",
                    category.key
                )));
            }
            if index.insert(category.key.clone(), idx).is_some() {
                return Err(ForgeError::Configuration(format!(
                    "category `{}` declared twice",
                    category.key
                )));
            }
        }
        Ok(TemplateStore {
            categories: self.categories,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_preserves_order() {
        let store = TemplateStore::builder()
            .text_category("b", ["one", "two"])
            .text_category("a", ["three"])
            .build()
            .unwrap();
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(store.first_key(), Some("b"));
        assert_eq!(store.category("b").unwrap().len(), 2);
    }

    #[test]
    fn unknown_key_is_configuration_error() {
        let store = TemplateStore::builder()
            .text_category("tech", ["x"])
            .build()
            .unwrap();
        assert!(store.category("nope").unwrap_err().is_configuration());
    }

    #[test]
    fn empty_and_duplicate_categories_are_rejected() {
        let empty = TemplateStore::builder()
            .text_category("empty", Vec::<String>::new())
            .build();
        assert!(matches!(empty, Err(ForgeError::Configuration(_))));

        let dup = TemplateStore::builder()
            .text_category("x", ["a"])
            .text_category("x", ["b"])
            .build();
        assert!(matches!(dup, Err(ForgeError::Configuration(_))));
    }
}
