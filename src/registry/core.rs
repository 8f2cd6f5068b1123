use std::collections::{BTreeSet, HashMap};

use blake3::Hash;

use crate::error::{ForgeError, Result};
use crate::geometry::Rect;

pub type ZoneId = String;

pub type ZoneContent = String;

#[derive(Debug, Clone)]
pub struct ZoneState {
    pub rect: Rect,
    pub content: ZoneContent,
    hash: Option<Hash>,
}

impl ZoneState {
    fn new(rect: Rect) -> Self {
        Self {
            rect,
            content: ZoneContent::new(),
            hash: None,
        }
    }

    /// Returns `true` when the content actually changed.
    fn update_content(&mut self, content: ZoneContent) -> bool {
        let new_hash = blake3::hash(content.as_bytes());
        if self.hash == Some(new_hash) {
            return false;
        }
        self.content = content;
        self.hash = Some(new_hash);
        true
    }
}

/// Last known state of each zone plus the set that needs repainting.
#[derive(Debug, Default)]
pub struct ZoneRegistry {
    entries: HashMap<ZoneId, ZoneState>,
    dirty: BTreeSet<ZoneId>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt freshly solved rects. Moved or new zones become dirty, vanished
    /// zones are dropped.
    pub fn sync_layout(&mut self, solved: &HashMap<ZoneId, Rect>, leaves: &[ZoneId]) {
        self.entries.retain(|id, _| leaves.contains(id));
        self.dirty.retain(|id| leaves.contains(id));

        for id in leaves {
            let Some(rect) = solved.get(id).copied() else {
                continue;
            };
            match self.entries.get_mut(id) {
                Some(state) if state.rect == rect => {}
                Some(state) => {
                    state.rect = rect;
                    self.dirty.insert(id.clone());
                }
                None => {
                    self.entries.insert(id.clone(), ZoneState::new(rect));
                    self.dirty.insert(id.clone());
                }
            }
        }
    }

    pub fn apply_content(&mut self, zone_id: &str, content: ZoneContent) -> Result<()> {
        let entry = self
            .entries
            .get_mut(zone_id)
            .ok_or_else(|| ForgeError::ZoneNotFound(zone_id.to_string()))?;
        if entry.update_content(content) {
            self.dirty.insert(zone_id.to_string());
        }
        Ok(())
    }

    /// Drain dirty zones in id order.
    pub fn take_dirty(&mut self) -> Vec<(ZoneId, ZoneState)> {
        let ids = std::mem::take(&mut self.dirty);
        ids.into_iter()
            .filter_map(|id| self.entries.get(&id).cloned().map(|state| (id, state)))
            .collect()
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty.extend(self.entries.keys().cloned());
    }

    pub fn content(&self, zone_id: &str) -> Option<&str> {
        self.entries.get(zone_id).map(|state| state.content.as_str())
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(rect: Rect) -> (HashMap<ZoneId, Rect>, Vec<ZoneId>) {
        let mut solved = HashMap::new();
        solved.insert("root".to_string(), Rect::new(0, 0, 40, 10));
        solved.insert("zone".to_string(), rect);
        (solved, vec!["zone".to_string()])
    }

    #[test]
    fn new_leaves_start_dirty_containers_are_ignored() {
        let mut registry = ZoneRegistry::new();
        let (solved, leaves) = layout(Rect::new(0, 0, 10, 5));
        registry.sync_layout(&solved, &leaves);
        let dirty = registry.take_dirty();
        assert_eq!(dirty.len(), 1);
        assert_eq!(dirty[0].0, "zone");
        assert!(registry.content("root").is_none());
    }

    #[test]
    fn identical_content_is_not_dirty() {
        let mut registry = ZoneRegistry::new();
        let (solved, leaves) = layout(Rect::new(0, 0, 10, 5));
        registry.sync_layout(&solved, &leaves);
        registry.take_dirty();

        registry.apply_content("zone", "hello".to_string()).unwrap();
        assert_eq!(registry.take_dirty().len(), 1);
        registry.apply_content("zone", "hello".to_string()).unwrap();
        assert!(registry.take_dirty().is_empty());
    }

    #[test]
    fn moved_zone_becomes_dirty() {
        let mut registry = ZoneRegistry::new();
        let (solved, leaves) = layout(Rect::new(0, 0, 10, 5));
        registry.sync_layout(&solved, &leaves);
        registry.take_dirty();
        let (solved, leaves) = layout(Rect::new(0, 1, 10, 5));
        registry.sync_layout(&solved, &leaves);
        assert!(registry.has_dirty());
    }

    #[test]
    fn unknown_zone_is_an_error() {
        let mut registry = ZoneRegistry::new();
        let err = registry.apply_content("ghost", String::new()).unwrap_err();
        assert!(matches!(err, ForgeError::ZoneNotFound(id) if id == "ghost"));
    }
}
