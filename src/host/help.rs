//! Help dialog: the embedded help page followed by the live key bindings.

use pulldown_cmark::{Event as MdEvent, Options, Parser, Tag};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::shortcuts::ShortcutSettings;

static HELP_MD: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/help.md"));

#[derive(Debug, Clone, Copy)]
enum TagKind {
    Strong,
    Emphasis,
    Heading,
    List,
    Item,
    Paragraph,
    Other,
}

/// Flatten markdown into styled lines. Headings and strong text are bold,
/// inline code is highlighted, list items get a bullet.
pub fn markdown_lines(raw: &str) -> Vec<Line<'static>> {
    let mut lines: Vec<Vec<Span<'static>>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut tag_stack: Vec<TagKind> = Vec::new();
    let mut depth = 0usize;
    let mut bold = false;
    let mut italic = false;

    for ev in Parser::new_ext(raw, Options::empty()) {
        match ev {
            MdEvent::Start(tag) => {
                let kind = match tag {
                    Tag::Strong => {
                        bold = true;
                        TagKind::Strong
                    }
                    Tag::Emphasis => {
                        italic = true;
                        TagKind::Emphasis
                    }
                    Tag::Heading { .. } => {
                        bold = true;
                        TagKind::Heading
                    }
                    Tag::List(_) => {
                        depth += 1;
                        TagKind::List
                    }
                    Tag::Item => {
                        let indent = "  ".repeat(depth.saturating_sub(1));
                        current.push(Span::raw(format!("{indent}- ")));
                        TagKind::Item
                    }
                    Tag::Paragraph => TagKind::Paragraph,
                    _ => TagKind::Other,
                };
                tag_stack.push(kind);
            }
            MdEvent::End(_) => match tag_stack.pop() {
                Some(TagKind::Strong) => bold = false,
                Some(TagKind::Emphasis) => italic = false,
                Some(TagKind::Heading) => {
                    bold = false;
                    lines.push(std::mem::take(&mut current));
                    lines.push(Vec::new());
                }
                Some(TagKind::Item) => {
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                }
                Some(TagKind::List) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        lines.push(Vec::new());
                    }
                }
                Some(TagKind::Paragraph) => {
                    lines.push(std::mem::take(&mut current));
                    if !tag_stack.iter().any(|k| matches!(k, TagKind::Item)) {
                        lines.push(Vec::new());
                    }
                }
                Some(TagKind::Other) | None => {}
            },
            MdEvent::Text(text) => {
                let mut style = Style::default();
                if bold {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if italic {
                    style = style.add_modifier(Modifier::ITALIC);
                }
                current.push(Span::styled(text.to_string(), style));
            }
            MdEvent::Code(text) => {
                current.push(Span::styled(
                    text.to_string(),
                    Style::default().fg(Color::Yellow),
                ));
            }
            MdEvent::SoftBreak => current.push(Span::raw(" ")),
            MdEvent::HardBreak => lines.push(std::mem::take(&mut current)),
            _ => {}
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    while lines.last().is_some_and(Vec::is_empty) {
        lines.pop();
    }
    lines.into_iter().map(Line::from).collect()
}

#[derive(Debug)]
pub struct HelpPage {
    lines: Vec<Line<'static>>,
    offset: usize,
}

impl HelpPage {
    pub fn new(shortcuts: &ShortcutSettings) -> Self {
        let raw = HELP_MD
            .replace("%PACKAGE%", env!("CARGO_PKG_NAME"))
            .replace("%VERSION%", env!("CARGO_PKG_VERSION"));
        let mut lines = markdown_lines(&raw);
        lines.push(Line::from(""));
        lines.push(Line::styled(
            "Key bindings",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        for (action, combos) in shortcuts.help_entries() {
            lines.push(Line::from(format!("  {:<14} {action}", combos.join(", "))));
        }
        Self { lines, offset: 0 }
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn scroll(&mut self, delta: isize) {
        let max = self.lines.len().saturating_sub(1);
        self.offset = self.offset.saturating_add_signed(delta).min(max);
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }
}
