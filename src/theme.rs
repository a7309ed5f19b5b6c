use ratatui::style::{Color, Modifier, Style};

// Centralized theme colors for the terminal host.

pub const ACCENT_RGB: (u8, u8, u8) = (30, 120, 200);

pub fn accent() -> Color {
    Color::Rgb(ACCENT_RGB.0, ACCENT_RGB.1, ACCENT_RGB.2)
}

// Panel regions
pub fn toolbar_bg() -> Color {
    accent()
}
pub fn toolbar_fg() -> Color {
    Color::White
}
pub fn top_bar_bg() -> Color {
    Color::Blue
}
pub fn top_bar_fg() -> Color {
    Color::White
}
pub fn content_bg() -> Color {
    Color::Reset
}
pub fn bottom_bar_bg() -> Color {
    Color::DarkGray
}
pub fn bottom_bar_fg() -> Color {
    Color::White
}

// Contact rows
pub fn online_fg() -> Color {
    Color::Green
}
pub fn offline_fg() -> Color {
    Color::DarkGray
}
pub fn selected_bg() -> Color {
    Color::Gray
}
pub fn selected_fg() -> Color {
    Color::Black
}

// Toolbar buttons
pub fn pinned_fg() -> Color {
    Color::Yellow
}

// Secondary windows
pub fn window_border() -> Color {
    Color::DarkGray
}
pub fn window_border_focused() -> Color {
    Color::Cyan
}
pub fn overlay_bg() -> Color {
    Color::Black
}
pub fn overlay_fg() -> Color {
    Color::White
}

/// Overlay style for a fade opacity in `0.0..=1.0`.
pub fn overlay_style(opacity: f64) -> Style {
    let style = Style::default().bg(overlay_bg()).fg(overlay_fg());
    if opacity < 0.5 {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faint_overlay_is_dimmed() {
        assert!(overlay_style(0.2).add_modifier.contains(Modifier::DIM));
        assert!(!overlay_style(1.0).add_modifier.contains(Modifier::DIM));
    }
}
