//! Paints the panel and its secondary windows onto a [`UiFrame`].

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::EditField;
use super::app::App;
use crate::constants::{TOOL_CLOSE, TOOL_MIN, TOOL_PANEL_FRONT};
use crate::geometry::PanelGeometry;
use crate::overlay::HoverOverlay;
use crate::settings::SettingsStore;
use crate::state::Focus;
use crate::theme;
use crate::toolbar::ToolSlot;
use crate::ui::{UiFrame, truncate_to_width};
use crate::window::{PanelWindow, SecondaryWindow};

pub fn draw<S: SettingsStore>(frame: &mut UiFrame<'_>, app: &App<S>) {
    if app.panel().window().is_minimized() {
        draw_minimized(frame, app);
    } else {
        draw_panel(frame, app);
        draw_chats(frame, app);
        draw_edit(frame, app);
        draw_overlays(frame, app);
    }
    if app.state().help_visible() {
        draw_help(frame, app);
    }
}

/// Write text at signed cell coordinates, clipped to `bounds`.
fn put(frame: &mut UiFrame<'_>, bounds: Rect, x: i32, y: i32, text: &str, style: Style) {
    let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
        return;
    };
    frame.set_string(bounds, x, y, text, style);
}

fn offset(base: PanelGeometry, rel: PanelGeometry) -> PanelGeometry {
    PanelGeometry::new(base.x + rel.x, base.y + rel.y, rel.width, rel.height)
}

fn border_style(focused: bool) -> Style {
    let color = if focused {
        theme::window_border_focused()
    } else {
        theme::window_border()
    };
    Style::default().fg(color)
}

fn draw_minimized<S: SettingsStore>(frame: &mut UiFrame<'_>, app: &App<S>) {
    let area = frame.area();
    if area.height == 0 {
        return;
    }
    let line = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
    let style = Style::default()
        .bg(theme::toolbar_bg())
        .fg(theme::toolbar_fg());
    frame.fill(line, style);
    let icon = app
        .panel()
        .toolbar()
        .window_icon()
        .map(|icon| icon.source.as_str())
        .unwrap_or("");
    let text = format!(" {icon} {} (minimized, r to restore)", env!("CARGO_PKG_NAME"));
    frame.set_string(line, line.x, line.y, &text, style);
}

fn draw_panel<S: SettingsStore>(frame: &mut UiFrame<'_>, app: &App<S>) {
    let panel = app.panel();
    let window = panel.window().geometry();
    let rect = frame.resolve(window);
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(app.state().focus() == Focus::Panel)),
        rect,
    );

    let layout = panel.layout();
    draw_toolbar(frame, app, rect, offset(window, panel.toolbar().geometry()));

    let top = offset(window, layout.top_bar);
    let top_rect = frame.resolve(top);
    let top_style = Style::default()
        .bg(theme::top_bar_bg())
        .fg(theme::top_bar_fg());
    frame.fill(top_rect, top_style);
    let profile = panel.host().profile();
    let online = panel.contacts().items().iter().filter(|c| c.online).count();
    let rows = [
        (profile.name.clone(), top_style.add_modifier(Modifier::BOLD)),
        (profile.signature.clone(), top_style),
        (
            format!("{online} online / {} contacts", panel.contacts().len()),
            top_style.add_modifier(Modifier::DIM),
        ),
    ];
    for (i, (text, style)) in rows.iter().enumerate() {
        put(frame, top_rect, top.x, top.y + i as i32, text, *style);
    }

    let content = offset(window, layout.content);
    let content_rect = frame.resolve(content);
    frame.fill(content_rect, Style::default().bg(theme::content_bg()));
    let row_height = panel.metrics().row_height.max(1);
    let visible = (content.height / row_height).max(0) as usize;
    let contacts = panel.contacts();
    let first = contacts.scroll_offset();
    for (row, item) in contacts.items().iter().enumerate().skip(first).take(visible) {
        let y = content.y + (row - first) as i32 * row_height;
        let fg = if item.online {
            theme::online_fg()
        } else {
            theme::offline_fg()
        };
        let mut style = Style::default().bg(theme::content_bg()).fg(fg);
        if row == contacts.selected() {
            style = style.bg(theme::selected_bg()).fg(theme::selected_fg());
            let line = frame.resolve(PanelGeometry::new(content.x, y, content.width, 1));
            frame.fill(line, style);
        }
        let marker = if item.online { '●' } else { '○' };
        let text = format!("{marker} {}", item.name);
        put(frame, content_rect, content.x + 1, y, &text, style);
    }

    let bottom = offset(window, layout.bottom_bar);
    let bottom_rect = frame.resolve(bottom);
    let bottom_style = Style::default()
        .bg(theme::bottom_bar_bg())
        .fg(theme::bottom_bar_fg());
    frame.fill(bottom_rect, bottom_style);
    let hint = app
        .state()
        .status()
        .unwrap_or("Enter chat  Space card  e edit  ? help");
    put(frame, bottom_rect, bottom.x, bottom.y, hint, bottom_style);
}

fn tool_label<S: SettingsStore>(app: &App<S>, id: &str) -> &'static str {
    match id {
        TOOL_PANEL_FRONT => {
            let pinned = app
                .panel()
                .actions()
                .tool_button(id)
                .is_some_and(|b| b.is_checked());
            if pinned { "[*]" } else { "[ ]" }
        }
        TOOL_MIN => "[_]",
        TOOL_CLOSE => "[x]",
        _ => "[?]",
    }
}

fn draw_toolbar<S: SettingsStore>(
    frame: &mut UiFrame<'_>,
    app: &App<S>,
    window: Rect,
    toolbar: PanelGeometry,
) {
    // The toolbar geometry arrives on the first timer pass.
    if toolbar.width <= 0 || toolbar.height <= 0 {
        return;
    }
    let bounds = frame.resolve(toolbar).intersection(window);
    let style = Style::default()
        .bg(theme::toolbar_bg())
        .fg(theme::toolbar_fg());
    frame.fill(bounds, style);

    let mut left = String::new();
    let mut buttons = Vec::new();
    for slot in app.panel().toolbar().slots() {
        match slot {
            ToolSlot::Icon => {
                if let Some(icon) = app.panel().toolbar().window_icon() {
                    left.push_str(&icon.source);
                    left.push(' ');
                }
                left.push_str(env!("CARGO_PKG_NAME"));
            }
            ToolSlot::Spacer => {}
            ToolSlot::Button(id) => buttons.push(tool_label(app, id.as_str())),
        }
    }
    put(frame, bounds, toolbar.x, toolbar.y, &left, style);

    let right = buttons.join("");
    let right_width = right.chars().count() as i32;
    let x = toolbar.x + toolbar.width - right_width;
    let pinned_style = if app.panel().is_pinned() {
        style.fg(theme::pinned_fg())
    } else {
        style
    };
    put(frame, bounds, x.max(toolbar.x), toolbar.y, &right, pinned_style);
}

fn draw_chats<S: SettingsStore>(frame: &mut UiFrame<'_>, app: &App<S>) {
    for (item, chat) in app.panel().chat_windows().iter() {
        if !chat.is_visible() {
            continue;
        }
        let rect = frame.resolve(chat.geometry());
        if rect.width < 3 || rect.height < 3 {
            continue;
        }
        let focused = app.state().focus() == Focus::Chat(*item);
        let block = Block::default()
            .title(format!(" Chat with {} ", chat.contact().name))
            .borders(Borders::ALL)
            .border_style(border_style(focused));
        let inner = block.inner(rect);
        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);
        if inner.height == 0 {
            continue;
        }

        let history = inner.height.saturating_sub(1) as usize;
        let skip = chat.messages().len().saturating_sub(history);
        for (i, message) in chat.messages().iter().skip(skip).enumerate() {
            frame.set_string(
                inner,
                inner.x,
                inner.y + i as u16,
                message,
                Style::default(),
            );
        }
        let prompt = format!("> {}", chat.input());
        let mut style = Style::default();
        if focused {
            style = style.add_modifier(Modifier::BOLD);
        }
        let y = inner.y + inner.height - 1;
        frame.set_string(inner, inner.x, y, &prompt, style);
    }
}

fn draw_edit<S: SettingsStore>(frame: &mut UiFrame<'_>, app: &App<S>) {
    let Some(edit) = app.edit_window() else {
        return;
    };
    let rect = frame.resolve(edit.geometry());
    if rect.width < 3 || rect.height < 3 {
        return;
    }
    let focused = app.state().focus() == Focus::Edit;
    let block = Block::default()
        .title(" Personal info ")
        .borders(Borders::ALL)
        .border_style(border_style(focused));
    let inner = block.inner(rect);
    frame.render_widget(Clear, rect);
    frame.render_widget(block, rect);

    let draft = edit.draft();
    let fields = [
        (EditField::Name, "Name", draft.name.as_str()),
        (EditField::Signature, "Signature", draft.signature.as_str()),
    ];
    for (i, (field, label, value)) in fields.iter().enumerate() {
        let mut style = Style::default();
        if focused && edit.field() == *field {
            style = style.fg(theme::accent()).add_modifier(Modifier::BOLD);
        }
        let y = inner.y + (i as u16) * 2;
        frame.set_string(inner, inner.x, y, &format!("{label}: {value}"), style);
    }
    if inner.height > 0 {
        frame.set_string(
            inner,
            inner.x,
            inner.y + inner.height - 1,
            "Enter save  Esc cancel  Tab field",
            Style::default().add_modifier(Modifier::DIM),
        );
    }
}

/// Overlay rectangle: left of the anchor, or right of the panel when that
/// would leave the screen.
fn overlay_geometry(overlay: &HoverOverlay, panel: PanelGeometry) -> PanelGeometry {
    let content = overlay.content();
    let text_width = content
        .lines
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(content.title.chars().count()))
        .max()
        .unwrap_or(0) as i32;
    let width = text_width + 4;
    let height = content.lines.len() as i32 + 3;
    let anchor = overlay.anchor();
    let x = if anchor.x - width >= 0 {
        anchor.x - width
    } else {
        panel.x + panel.width
    };
    PanelGeometry::new(x, anchor.y, width, height)
}

fn draw_overlays<S: SettingsStore>(frame: &mut UiFrame<'_>, app: &App<S>) {
    let panel = app.panel().window().geometry();
    for (_, overlay) in app.panel().hover().iter() {
        let rect = frame.resolve(overlay_geometry(overlay, panel));
        if rect.width < 3 || rect.height < 3 {
            continue;
        }
        let style = theme::overlay_style(overlay.opacity());
        let block = Block::default()
            .borders(Borders::ALL)
            .style(style)
            .border_style(style);
        let inner = block.inner(rect);
        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);
        let content = overlay.content();
        frame.set_string(
            inner,
            inner.x + 1,
            inner.y,
            &content.title,
            style.add_modifier(Modifier::BOLD),
        );
        for (i, line) in content.lines.iter().enumerate() {
            frame.set_string(inner, inner.x + 1, inner.y + 1 + i as u16, line, style);
        }
    }
}

fn centered(area: Rect, width_pct: u16, height_pct: u16) -> Rect {
    let scale = |len: u16, pct: u16| (u32::from(len) * u32::from(pct) / 100) as u16;
    let width = scale(area.width, width_pct).max(20).min(area.width);
    let height = scale(area.height, height_pct).max(6).min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_help<S: SettingsStore>(frame: &mut UiFrame<'_>, app: &App<S>) {
    let rect = centered(frame.area(), 70, 80);
    if rect.width < 3 || rect.height < 3 {
        return;
    }
    let title = truncate_to_width(" Help (Esc to close) ", rect.width as usize);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::accent()));
    let help = app.help();
    let scroll = u16::try_from(help.offset()).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(help.lines().to_vec())
        .block(block)
        .scroll((scroll, 0));
    frame.render_widget(Clear, rect);
    frame.render_widget(paragraph, rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::overlay::{FadeAnimation, OverlayContent};

    #[test]
    fn overlay_sits_left_of_anchor_when_room() {
        let mut overlay = HoverOverlay::new(
            OverlayContent::new("Alice").with_line("online"),
            FadeAnimation::default(),
        );
        overlay.fade_in(Point::new(60, 5));
        let panel = PanelGeometry::new(59, 1, 36, 30);
        assert_eq!(
            overlay_geometry(&overlay, panel),
            PanelGeometry::new(50, 5, 10, 4)
        );
    }

    #[test]
    fn overlay_flips_right_at_screen_edge() {
        let mut overlay = HoverOverlay::new(OverlayContent::new("Bob"), FadeAnimation::default());
        overlay.fade_in(Point::new(2, 3));
        let panel = PanelGeometry::new(1, 1, 36, 30);
        assert_eq!(overlay_geometry(&overlay, panel).x, 37);
    }

    #[test]
    fn centered_rect_fits_area() {
        let rect = centered(Rect::new(0, 0, 100, 40), 70, 80);
        assert_eq!(rect, Rect::new(15, 4, 70, 32));
    }
}
