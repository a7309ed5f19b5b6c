use std::collections::BTreeMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::constants::SETTINGS_SHORTCUT_PREFIX;
use crate::settings::{SettingsError, SettingsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Quit,
    ClosePanel,
    MinimizePanel,
    ShowPanel,
    TogglePin,
    // Contact list navigation
    SelectNext,
    SelectPrev,
    OpenChat,
    ToggleHover,
    EditProfile,
    // Secondary windows
    CloseWindow,
    ToggleHelp,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::Quit,
        Action::ClosePanel,
        Action::MinimizePanel,
        Action::ShowPanel,
        Action::TogglePin,
        Action::SelectNext,
        Action::SelectPrev,
        Action::OpenChat,
        Action::ToggleHover,
        Action::EditProfile,
        Action::CloseWindow,
        Action::ToggleHelp,
    ];

    /// Stable name used as the settings key suffix.
    pub fn name(self) -> &'static str {
        match self {
            Action::Quit => "Quit",
            Action::ClosePanel => "ClosePanel",
            Action::MinimizePanel => "MinimizePanel",
            Action::ShowPanel => "ShowPanel",
            Action::TogglePin => "TogglePin",
            Action::SelectNext => "SelectNext",
            Action::SelectPrev => "SelectPrev",
            Action::OpenChat => "OpenChat",
            Action::ToggleHover => "ToggleHover",
            Action::EditProfile => "EditProfile",
            Action::CloseWindow => "CloseWindow",
            Action::ToggleHelp => "ToggleHelp",
        }
    }

    fn settings_key(self) -> String {
        format!("{SETTINGS_SHORTCUT_PREFIX}{}", self.name())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit (tray)",
            Action::ClosePanel => "Close panel",
            Action::MinimizePanel => "Minimize panel",
            Action::ShowPanel => "Show panel (tray)",
            Action::TogglePin => "Stick / unstick panel",
            Action::SelectNext => "Next contact",
            Action::SelectPrev => "Previous contact",
            Action::OpenChat => "Open chat window",
            Action::ToggleHover => "Toggle contact info",
            Action::EditProfile => "Edit personal info",
            Action::CloseWindow => "Close focused window",
            Action::ToggleHelp => "Toggle help",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Insert => "Insert".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }

    /// Parse the format produced by [`KeyCombo::display`].
    ///
    /// Single letters are read back lower-case unless `Shift` is present.
    pub fn parse(text: &str) -> Option<Self> {
        let mut mods = KeyModifiers::NONE;
        let mut parts: Vec<&str> = text.trim().split('+').map(str::trim).collect();
        let key = parts.pop().filter(|k| !k.is_empty())?;
        for part in parts {
            match part {
                "Ctrl" => mods.insert(KeyModifiers::CONTROL),
                "Shift" => mods.insert(KeyModifiers::SHIFT),
                "Alt" => mods.insert(KeyModifiers::ALT),
                _ => return None,
            }
        }
        let code = match key {
            "Space" => KeyCode::Char(' '),
            "Esc" => KeyCode::Esc,
            "Enter" => KeyCode::Enter,
            "Tab" => KeyCode::Tab,
            "Backspace" => KeyCode::Backspace,
            "Left" => KeyCode::Left,
            "Right" => KeyCode::Right,
            "Up" => KeyCode::Up,
            "Down" => KeyCode::Down,
            "Home" => KeyCode::Home,
            "End" => KeyCode::End,
            "PageUp" => KeyCode::PageUp,
            "PageDown" => KeyCode::PageDown,
            "Delete" => KeyCode::Delete,
            "Insert" => KeyCode::Insert,
            f if f.len() > 1 && f.starts_with('F') => KeyCode::F(f[1..].parse().ok()?),
            c => {
                let mut chars = c.chars();
                let ch = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                if mods.contains(KeyModifiers::SHIFT) {
                    KeyCode::Char(ch)
                } else {
                    KeyCode::Char(ch.to_ascii_lowercase())
                }
            }
        };
        Some(Self { code, mods })
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Key bindings for panel actions, persisted alongside the window settings.
#[derive(Debug, Clone)]
pub struct ShortcutSettings {
    map: BTreeMap<Action, Vec<KeyCombo>>,
}

impl ShortcutSettings {
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    pub fn defaults() -> Self {
        use Action::*;
        let mut kb = Self::empty();
        kb.add(
            Quit,
            KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        kb.add(ClosePanel, KeyCombo::new(KeyCode::Char('q'), KeyModifiers::NONE));
        kb.add(
            MinimizePanel,
            KeyCombo::new(KeyCode::Char('m'), KeyModifiers::NONE),
        );
        kb.add(ShowPanel, KeyCombo::new(KeyCode::Char('r'), KeyModifiers::NONE));
        kb.add(TogglePin, KeyCombo::new(KeyCode::Char('p'), KeyModifiers::NONE));
        // Contact list
        kb.add(SelectNext, KeyCombo::new(KeyCode::Down, KeyModifiers::NONE));
        kb.add(SelectNext, KeyCombo::new(KeyCode::Char('j'), KeyModifiers::NONE));
        kb.add(SelectPrev, KeyCombo::new(KeyCode::Up, KeyModifiers::NONE));
        kb.add(SelectPrev, KeyCombo::new(KeyCode::Char('k'), KeyModifiers::NONE));
        kb.add(OpenChat, KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE));
        kb.add(ToggleHover, KeyCombo::new(KeyCode::Char(' '), KeyModifiers::NONE));
        kb.add(EditProfile, KeyCombo::new(KeyCode::Char('e'), KeyModifiers::NONE));
        kb.add(CloseWindow, KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE));
        kb.add(ToggleHelp, KeyCombo::new(KeyCode::Char('?'), KeyModifiers::NONE));
        kb.add(ToggleHelp, KeyCombo::new(KeyCode::F(1), KeyModifiers::NONE));
        kb
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn set(&mut self, action: Action, combos: Vec<KeyCombo>) {
        self.map.insert(action, combos);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        for (act, list) in &self.map {
            if list.iter().any(|c| c.matches(key)) {
                return Some(*act);
            }
        }
        None
    }

    pub fn help_entries(&self) -> Vec<(Action, Vec<String>)> {
        let mut v = Vec::new();
        for (act, list) in &self.map {
            v.push((*act, list.iter().map(|c| c.display()).collect()));
        }
        v
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }

    /// Defaults overridden by whatever valid bindings `settings` holds.
    ///
    /// An entry that fails to parse leaves that action on its default.
    pub fn load(settings: &dyn SettingsStore) -> Self {
        let mut kb = Self::defaults();
        for action in Action::ALL {
            let Some(value) = settings.value(&action.settings_key()) else {
                continue;
            };
            let Some(text) = value.as_text() else {
                tracing::warn!(action = action.name(), "ignoring non-text shortcut");
                continue;
            };
            let combos: Option<Vec<KeyCombo>> = text
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(KeyCombo::parse)
                .collect();
            match combos {
                Some(combos) => kb.set(action, combos),
                None => tracing::warn!(action = action.name(), text, "ignoring bad shortcut"),
            }
        }
        kb
    }

    /// Write every binding and flush the store.
    pub fn save(&self, settings: &mut dyn SettingsStore) -> Result<(), SettingsError> {
        for action in Action::ALL {
            let text = self.combos_for(action).join(", ");
            settings.set_text(&action.settings_key(), &text);
        }
        settings.sync()
    }
}

impl Default for ShortcutSettings {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettings;

    #[test]
    fn defaults_match_quit() {
        let kb = ShortcutSettings::defaults();
        let ev = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(kb.matches(Action::Quit, &ev));
        assert_eq!(kb.action_for_key(&ev), Some(Action::Quit));
    }

    #[test]
    fn display_parses_back() {
        for combo in [
            KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
            KeyCombo::new(KeyCode::Char(' '), KeyModifiers::NONE),
            KeyCombo::new(KeyCode::F(12), KeyModifiers::ALT),
            KeyCombo::new(KeyCode::PageDown, KeyModifiers::NONE),
        ] {
            assert_eq!(KeyCombo::parse(&combo.display()), Some(combo));
        }
        assert_eq!(KeyCombo::parse("Hyper+X"), None);
        assert_eq!(KeyCombo::parse(""), None);
    }

    #[test]
    fn saved_bindings_load_back() {
        let mut settings = MemorySettings::new();
        let mut kb = ShortcutSettings::defaults();
        kb.set(
            Action::TogglePin,
            vec![KeyCombo::new(KeyCode::Char('t'), KeyModifiers::CONTROL)],
        );
        kb.save(&mut settings).unwrap();
        assert_eq!(
            settings
                .value("Shortcut/TogglePin")
                .and_then(|v| v.as_text().map(str::to_owned)),
            Some("Ctrl+T".to_string())
        );

        let loaded = ShortcutSettings::load(&settings);
        let ctrl_t = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert!(loaded.matches(Action::TogglePin, &ctrl_t));
        let p = KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE);
        assert!(!loaded.matches(Action::TogglePin, &p));
    }

    #[test]
    fn bad_entry_keeps_default() {
        let mut settings = MemorySettings::new();
        settings.set_text("Shortcut/OpenChat", "Ctrl+NotAKey");
        let loaded = ShortcutSettings::load(&settings);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert!(loaded.matches(Action::OpenChat, &enter));
    }
}
