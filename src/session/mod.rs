//! Per-panel, in-memory record of generated results.

use std::collections::BTreeSet;
use std::fmt;
use std::time::SystemTime;

use crate::catalog::{ContentItem, ResearchEntry, Snippet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResultId(pub u64);

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// User-settable markers on a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResultFlag {
    Saved,
    Bookmarked,
}

impl ResultFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultFlag::Saved => "saved",
            ResultFlag::Bookmarked => "bookmarked",
        }
    }
}

/// What a panel produced. Idea text is already annotated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Idea(String),
    Research(ResearchEntry),
    Snippet(Snippet),
}

impl Payload {
    pub fn from_item(item: &ContentItem) -> Self {
        match item {
            ContentItem::Text(text) => Payload::Idea(text.clone()),
            ContentItem::Research(entry) => Payload::Research(entry.clone()),
            ContentItem::Snippet(snippet) => Payload::Snippet(snippet.clone()),
        }
    }

    /// Exact text handed to the clipboard. Snippets copy their body untouched.
    pub fn copy_text(&self) -> String {
        match self {
            Payload::Idea(text) => text.clone(),
            Payload::Research(entry) => format!("{} ({}, {})", entry.title, entry.source, entry.year),
            Payload::Snippet(snippet) => snippet.body.clone(),
        }
    }

    pub fn headline(&self) -> &str {
        match self {
            Payload::Idea(text) => text,
            Payload::Research(entry) => &entry.title,
            Payload::Snippet(snippet) => &snippet.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedResult {
    pub id: ResultId,
    pub category: String,
    pub payload: Payload,
    pub created_at: SystemTime,
    flags: BTreeSet<ResultFlag>,
}

impl GeneratedResult {
    pub fn new(id: ResultId, category: impl Into<String>, payload: Payload) -> Self {
        Self {
            id,
            category: category.into(),
            payload,
            created_at: SystemTime::now(),
            flags: BTreeSet::new(),
        }
    }

    pub fn has_flag(&self, flag: ResultFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn flags(&self) -> impl Iterator<Item = ResultFlag> + '_ {
        self.flags.iter().copied()
    }

    fn toggle(&mut self, flag: ResultFlag) -> bool {
        if !self.flags.remove(&flag) {
            self.flags.insert(flag);
        }
        self.has_flag(flag)
    }
}

/// How a commit of fresh results combines with what the log already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Newest first, grows until cleared.
    Prepend,
    /// Each commit replaces the whole set.
    Replace,
    /// At most one entry.
    Single,
}

#[derive(Debug, Clone)]
pub struct SessionLog {
    retention: Retention,
    entries: Vec<GeneratedResult>,
}

impl SessionLog {
    pub fn new(retention: Retention) -> Self {
        Self {
            retention,
            entries: Vec::new(),
        }
    }

    pub fn retention(&self) -> Retention {
        self.retention
    }

    pub fn append(&mut self, item: GeneratedResult) {
        match self.retention {
            Retention::Prepend => self.entries.insert(0, item),
            Retention::Replace => self.entries.push(item),
            Retention::Single => {
                self.entries.clear();
                self.entries.push(item);
            }
        }
    }

    /// Apply one generation's results according to the retention policy.
    pub fn commit(&mut self, items: Vec<GeneratedResult>) {
        match self.retention {
            Retention::Prepend => {
                for item in items {
                    self.entries.insert(0, item);
                }
            }
            Retention::Replace => self.entries = items,
            Retention::Single => {
                self.entries.clear();
                self.entries.extend(items.into_iter().last());
            }
        }
    }

    pub fn remove(&mut self, id: ResultId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Flip `flag` on `id`, returning the new value, or `None` for unknown ids.
    pub fn toggle_flag(&mut self, id: ResultId, flag: ResultFlag) -> Option<bool> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(|entry| entry.toggle(flag))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, id: ResultId) -> Option<&GeneratedResult> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: ResultId) -> bool {
        self.get(id).is_some()
    }

    pub fn entries(&self) -> &[GeneratedResult] {
        &self.entries
    }

    pub fn first(&self) -> Option<&GeneratedResult> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idea(id: u64, text: &str) -> GeneratedResult {
        GeneratedResult::new(ResultId(id), "tech", Payload::Idea(text.to_string()))
    }

    #[test]
    fn prepend_keeps_newest_first() {
        let mut log = SessionLog::new(Retention::Prepend);
        log.append(idea(1, "first"));
        log.append(idea(2, "second"));
        let ids: Vec<_> = log.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![ResultId(2), ResultId(1)]);
    }

    #[test]
    fn append_then_remove_drops_the_entry() {
        let mut log = SessionLog::new(Retention::Prepend);
        log.append(idea(1, "keep"));
        log.append(idea(2, "drop"));
        assert!(log.remove(ResultId(2)));
        assert!(!log.contains(ResultId(2)));
        assert!(log.contains(ResultId(1)));
        assert!(!log.remove(ResultId(2)));
    }

    #[test]
    fn clear_empties_unconditionally() {
        let mut log = SessionLog::new(Retention::Prepend);
        log.clear();
        assert!(log.is_empty());
        log.append(idea(1, "a"));
        log.append(idea(2, "b"));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn toggling_twice_restores_flag() {
        let mut log = SessionLog::new(Retention::Prepend);
        log.append(idea(1, "a"));
        for flag in [ResultFlag::Saved, ResultFlag::Bookmarked] {
            let original = log.get(ResultId(1)).unwrap().has_flag(flag);
            assert_eq!(log.toggle_flag(ResultId(1), flag), Some(!original));
            assert_eq!(log.toggle_flag(ResultId(1), flag), Some(original));
            assert_eq!(log.get(ResultId(1)).unwrap().has_flag(flag), original);
        }
    }

    #[test]
    fn flags_are_independent() {
        let mut log = SessionLog::new(Retention::Prepend);
        log.append(idea(1, "a"));
        log.toggle_flag(ResultId(1), ResultFlag::Saved);
        let entry = log.get(ResultId(1)).unwrap();
        assert!(entry.has_flag(ResultFlag::Saved));
        assert!(!entry.has_flag(ResultFlag::Bookmarked));
    }

    #[test]
    fn toggle_unknown_id_is_none() {
        let mut log = SessionLog::new(Retention::Replace);
        assert_eq!(log.toggle_flag(ResultId(9), ResultFlag::Saved), None);
    }

    #[test]
    fn replace_commit_discards_previous_set() {
        let mut log = SessionLog::new(Retention::Replace);
        log.commit(vec![idea(1, "a"), idea(2, "b"), idea(3, "c")]);
        log.commit(vec![idea(4, "d"), idea(5, "e"), idea(6, "f")]);
        let ids: Vec<_> = log.entries().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![4, 5, 6]);
    }

    #[test]
    fn single_retention_holds_one_entry() {
        let mut log = SessionLog::new(Retention::Single);
        log.commit(vec![idea(1, "a")]);
        log.append(idea(2, "b"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.first().unwrap().id, ResultId(2));
    }

    #[test]
    fn snippet_copy_text_is_the_raw_body() {
        let snippet = Snippet {
            title: "t".into(),
            language: "rust".into(),
            description: "d".into(),
            body: "fn main() {}\n".into(),
        };
        assert_eq!(Payload::Snippet(snippet).copy_text(), "fn main() {}\n");
    }
}
