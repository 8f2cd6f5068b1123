use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::{ForgeError, Result};

pub const DEFAULT_COPY_ACK: Duration = Duration::from_secs(2);

/// External "copy to system clipboard" collaborator.
pub trait ClipboardSink: Send {
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// In-process clipboard; clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|guard| guard.clone())
    }
}

impl ClipboardSink for MemoryClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|_| ForgeError::Backend("clipboard poisoned".to_string()))?;
        *guard = Some(text.to_string());
        Ok(())
    }
}

/// Transient "copied" flag that expires on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyAck {
    copied_at: Instant,
    ttl: Duration,
}

impl CopyAck {
    pub fn new(copied_at: Instant, ttl: Duration) -> Self {
        Self { copied_at, ttl }
    }

    pub fn is_active(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.copied_at) < self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_expires_after_ttl() {
        let start = Instant::now();
        let ack = CopyAck::new(start, DEFAULT_COPY_ACK);
        assert!(ack.is_active(start));
        assert!(ack.is_active(start + Duration::from_millis(1999)));
        assert!(!ack.is_active(start + Duration::from_secs(2)));
    }

    #[test]
    fn memory_clipboard_shares_contents() {
        let clipboard = MemoryClipboard::new();
        let mut writer = clipboard.clone();
        writer.copy("fn main() {}").unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("fn main() {}"));
    }
}
