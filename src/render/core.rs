use std::io::Write;

use crate::display_width;
use crate::error::Result;
use crate::geometry::Rect;
use crate::registry::{ZoneId, ZoneState};
use crate::width::truncate_to_width;

#[derive(Debug, Clone, Default)]
pub struct RendererSettings {
    /// Where to park the cursor after a frame, as (row, col).
    pub restore_cursor: Option<(u16, u16)>,
}

/// Writes dirty zones to a terminal handle with absolute cursor moves.
pub struct AnsiRenderer {
    settings: RendererSettings,
}

impl AnsiRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    pub fn render(&mut self, writer: &mut impl Write, dirty: &[(ZoneId, ZoneState)]) -> Result<()> {
        for (_id, state) in dirty {
            render_zone(writer, state)?;
        }

        if let Some((row, col)) = self.settings.restore_cursor {
            write!(writer, "\x1b[{};{}H", row + 1, col + 1)?;
        }

        writer.flush()?;
        Ok(())
    }
}

fn render_zone(writer: &mut impl Write, state: &ZoneState) -> Result<()> {
    let Rect {
        x,
        y,
        width,
        height,
    } = state.rect;

    if state.rect.is_empty() {
        return Ok(());
    }

    let mut lines = wrap_to_width(&state.content, width);
    lines.truncate(height as usize);
    lines.resize(height as usize, String::new());

    for (offset, line) in lines.iter_mut().enumerate() {
        pad_line(line, width);
        write!(writer, "\x1b[{};{}H{}", y + offset as u16 + 1, x + 1, line)?;
    }

    Ok(())
}

/// Word-wrap `content` to `width` display cells. Words longer than a line are
/// hard-split; explicit newlines are kept.
pub fn wrap_to_width(content: &str, width: u16) -> Vec<String> {
    let width = width as usize;
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for raw in content.split('\n') {
        let mut current = String::new();
        for word in raw.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if display_width(&candidate) <= width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut rest = word.to_string();
            while display_width(&rest) > width {
                let head = truncate_to_width(&rest, width);
                if head.is_empty() {
                    // A single glyph wider than the zone.
                    rest.clear();
                    break;
                }
                rest = rest[head.len()..].to_string();
                lines.push(head);
            }
            current = rest;
        }
        lines.push(current);
    }
    lines
}

fn pad_line(line: &mut String, width: u16) {
    let width = width as usize;
    if display_width(line) > width {
        *line = truncate_to_width(line, width);
    }
    let pad = width.saturating_sub(display_width(line));
    line.extend(std::iter::repeat_n(' ', pad));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ZoneRegistry;
    use std::collections::HashMap;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(wrap_to_width("hello world", 5), vec!["hello", "world"]);
        assert_eq!(wrap_to_width("a bc def", 4), vec!["a bc", "def"]);
    }

    #[test]
    fn hard_splits_long_words_and_keeps_newlines() {
        assert_eq!(wrap_to_width("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(wrap_to_width("one\n\ntwo", 10), vec!["one", "", "two"]);
    }

    #[test]
    fn renderer_writes_cursor_sequences() {
        let mut registry = ZoneRegistry::new();
        let mut solved = HashMap::new();
        solved.insert("zone".to_string(), Rect::new(2, 3, 5, 2));
        registry.sync_layout(&solved, &["zone".to_string()]);
        registry.take_dirty();
        registry.apply_content("zone", "hi".to_string()).unwrap();
        let dirty = registry.take_dirty();

        let mut output = Vec::new();
        let mut renderer = AnsiRenderer::with_default();
        renderer.render(&mut output, &dirty).unwrap();

        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("\u{1b}[4;3Hhi   "));
        assert!(rendered.contains("\u{1b}[5;3H     "));
    }
}
