//! Themed icon lookup.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconColor {
    White,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSize {
    System16,
    System24,
    System32,
}

impl IconSize {
    pub fn pixels(self) -> u32 {
        match self {
            IconSize::System16 => 16,
            IconSize::System24 => 24,
            IconSize::System32 => 32,
        }
    }
}

/// Handle to an icon as understood by the host: a resource path for a
/// desktop toolkit, a glyph for the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowIcon {
    pub source: String,
    pub size: IconSize,
}

pub trait ImageProvider {
    fn window_icon(&self, color: IconColor, size: IconSize) -> WindowIcon;
}
