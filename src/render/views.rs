use crate::panel::{PanelKind, PanelState, PanelView};
use crate::session::{GeneratedResult, Payload, ResultFlag};

const HINTS: &str = "Tab panels · ←/→ category · Enter generate · ↑/↓ select · ^S save · ^B bookmark · Del remove · ^L clear · ^Y copy · Esc quit";

/// Text for each workbench zone, ready for the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbenchFrame {
    pub tabs: String,
    pub controls: String,
    pub body: String,
    pub status: String,
}

pub fn project_frame(
    view: &PanelView,
    active: PanelKind,
    cursor: usize,
    notice: Option<&str>,
) -> WorkbenchFrame {
    WorkbenchFrame {
        tabs: project_tabs(active),
        controls: project_controls(view),
        body: project_body(view, cursor),
        status: project_status(view, notice),
    }
}

fn project_tabs(active: PanelKind) -> String {
    PanelKind::ALL
        .iter()
        .map(|kind| {
            if *kind == active {
                format!("[ {} ]", kind.title())
            } else {
                format!("  {}  ", kind.title())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn project_controls(view: &PanelView) -> String {
    let mut line = String::new();
    if view.shows_categories {
        let label = match view.kind {
            PanelKind::Code => "Language",
            _ => "Category",
        };
        line.push_str(&format!("{label}: ◀ {} ▶   ", view.category));
    }
    line.push_str(&format!("{}: {}█", view.text_field.label, view.text));
    if view.text_field.required {
        line.push_str("  (required)");
    }
    line
}

fn project_body(view: &PanelView, cursor: usize) -> String {
    if view.entries.is_empty() {
        return match view.state {
            PanelState::Generating => "Working on it…".to_string(),
            _ => match view.kind {
                PanelKind::Idea => "Pick a category and press Enter for an idea.".to_string(),
                PanelKind::Research => "Type a query and press Enter to search.".to_string(),
                PanelKind::Code => "Pick a language and press Enter for a snippet.".to_string(),
            },
        };
    }

    view.entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| project_entry(entry, idx == cursor))
        .collect::<Vec<_>>()
        .join("\n")
}

fn project_entry(entry: &GeneratedResult, selected: bool) -> String {
    let marker = if selected { "›" } else { " " };
    let mut badges = String::new();
    if entry.has_flag(ResultFlag::Saved) {
        badges.push('★');
    }
    if entry.has_flag(ResultFlag::Bookmarked) {
        badges.push('⚑');
    }
    let badges = if badges.is_empty() {
        String::new()
    } else {
        format!(" {badges}")
    };

    match &entry.payload {
        Payload::Idea(text) => format!("{marker} {}{badges} {text}", entry.id),
        Payload::Research(research) => format!(
            "{marker} {}{badges} {} ({}, {})\n    {}",
            entry.id, research.title, research.source, research.year, research.summary
        ),
        Payload::Snippet(snippet) => format!(
            "{marker} {}{badges} {} [{}]\n  {}\n\n{}",
            entry.id, snippet.title, snippet.language, snippet.description, snippet.body
        ),
    }
}

fn project_status(view: &PanelView, notice: Option<&str>) -> String {
    let mut status = match (view.state, view.remaining) {
        (PanelState::Generating, Some(remaining)) => {
            format!("generating… {:.1}s", remaining.as_secs_f32())
        }
        (state, _) => state.as_str().to_string(),
    };
    if view.copied {
        status.push_str(" · copied!");
    }
    if let Some(notice) = notice {
        status.push_str(" · ");
        status.push_str(notice);
    }
    status.push_str("  |  ");
    status.push_str(HINTS);
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Snippet;
    use crate::panel::TextField;
    use crate::session::ResultId;
    use std::time::Duration;

    fn view(kind: PanelKind, entries: Vec<GeneratedResult>) -> PanelView {
        PanelView {
            kind,
            state: if entries.is_empty() {
                PanelState::Idle
            } else {
                PanelState::Settled
            },
            categories: vec!["rust".into(), "go".into()],
            category: "rust".into(),
            shows_categories: true,
            text_field: TextField {
                name: "prompt",
                label: "Describe it",
                required: false,
            },
            text: "cli".into(),
            entries,
            can_generate: true,
            copied: false,
            remaining: None,
        }
    }

    #[test]
    fn tabs_bracket_the_active_panel() {
        let tabs = project_tabs(PanelKind::Research);
        assert!(tabs.contains("[ Research Lookup ]"));
        assert!(tabs.contains("  Idea Generator  "));
    }

    #[test]
    fn snippet_body_is_rendered_verbatim() {
        let body = "fn main() {\n    println!(\"hi\");\n}";
        let entry = GeneratedResult::new(
            ResultId(4),
            "rust",
            Payload::Snippet(Snippet {
                title: "Hello".into(),
                language: "rust".into(),
                description: "Prints hi.".into(),
                body: body.into(),
            }),
        );
        let frame = project_frame(&view(PanelKind::Code, vec![entry]), PanelKind::Code, 0, None);
        assert!(frame.body.ends_with(body));
        assert!(frame.body.starts_with("› #4 Hello [rust]"));
        assert!(frame.controls.starts_with("Language: ◀ rust ▶"));
    }

    #[test]
    fn status_reports_generation_and_copy() {
        let mut v = view(PanelKind::Idea, Vec::new());
        v.state = PanelState::Generating;
        v.remaining = Some(Duration::from_millis(1300));
        v.copied = true;
        let frame = project_frame(&v, PanelKind::Idea, 0, Some("query must not be blank"));
        assert!(frame.status.starts_with("generating… 1.3s · copied! · query must not be blank"));
        assert_eq!(frame.body, "Working on it…");
    }

    #[test]
    fn flags_show_as_badges() {
        let mut log = crate::session::SessionLog::new(crate::session::Retention::Prepend);
        log.append(GeneratedResult::new(ResultId(1), "tech", Payload::Idea("An idea".into())));
        log.toggle_flag(ResultId(1), ResultFlag::Saved);
        let frame = project_frame(
            &view(PanelKind::Idea, log.entries().to_vec()),
            PanelKind::Idea,
            5,
            None,
        );
        assert_eq!(frame.body, "  #1 ★ An idea");
    }
}
