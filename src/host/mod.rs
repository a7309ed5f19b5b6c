//! Terminal implementation of the panel's window services.
//!
//! Windows are plain structs with signed cell geometry. The panel, chat
//! windows and the personal-info editor are painted by [`render`] on each
//! frame from whatever state [`app::App`] left them in.

pub mod app;
pub mod help;
pub mod render;

use crate::contacts::ContactItem;
use crate::geometry::{Margins, PanelGeometry, ScreenInfo, SizeConstraints};
use crate::images::{IconColor, IconSize, ImageProvider, WindowIcon};
use crate::panel::PanelHost;
use crate::window::{PanelWindow, SecondaryWindow, WindowLifecycle};

const CHAT_WIDTH: i32 = 44;
const CHAT_HEIGHT: i32 = 12;
const EDIT_WIDTH: i32 = 40;
const EDIT_HEIGHT: i32 = 8;
/// Chat windows cascade through this many positions before wrapping.
const CASCADE_STEPS: usize = 6;

/// The user's own profile, shown in the top bar and changed by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub signature: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Me".to_string(),
            signature: "Edit me with 'e'".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct TerminalHost {
    screen: ScreenInfo,
    profile: Profile,
    chats_built: usize,
}

impl TerminalHost {
    pub fn new(screen: ScreenInfo) -> Self {
        Self {
            screen,
            profile: Profile::default(),
            chats_built: 0,
        }
    }

    pub fn set_screen(&mut self, screen: ScreenInfo) {
        self.screen = screen;
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = profile;
    }
}

impl ImageProvider for TerminalHost {
    fn window_icon(&self, color: IconColor, size: IconSize) -> WindowIcon {
        let glyph = match color {
            IconColor::White => "◇",
            IconColor::Black => "◆",
        };
        WindowIcon {
            source: glyph.to_string(),
            size,
        }
    }
}

impl PanelHost for TerminalHost {
    type Window = TerminalWindow;
    type ChatWindow = ChatView;
    type EditWindow = EditView;

    fn screen(&self) -> ScreenInfo {
        self.screen
    }

    fn create_panel_window(&mut self) -> TerminalWindow {
        TerminalWindow::new()
    }

    fn create_chat_window(&mut self, contact: &ContactItem) -> ChatView {
        let step = (self.chats_built % CASCADE_STEPS) as i32;
        self.chats_built += 1;
        let geometry = PanelGeometry::new(2 + step * 3, 1 + step, CHAT_WIDTH, CHAT_HEIGHT);
        ChatView::new(contact.clone(), geometry)
    }

    fn create_edit_window(&mut self) -> EditView {
        let geometry = PanelGeometry::new(
            (self.screen.width - EDIT_WIDTH) / 2,
            (self.screen.height - EDIT_HEIGHT) / 2,
            EDIT_WIDTH,
            EDIT_HEIGHT,
        );
        EditView::new(self.profile.clone(), geometry)
    }
}

/// Main panel window. Geometry is clamped to the size constraints.
#[derive(Debug)]
pub struct TerminalWindow {
    geometry: PanelGeometry,
    constraints: Option<SizeConstraints>,
    margins: Margins,
    on_top: bool,
    visible: bool,
    minimized: bool,
}

impl TerminalWindow {
    pub fn new() -> Self {
        Self {
            geometry: PanelGeometry::default(),
            constraints: None,
            // One cell for the border.
            margins: Margins::uniform(1),
            on_top: false,
            visible: false,
            minimized: false,
        }
    }
}

impl Default for TerminalWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelWindow for TerminalWindow {
    fn geometry(&self) -> PanelGeometry {
        self.geometry
    }

    fn set_geometry(&mut self, geometry: PanelGeometry) {
        self.geometry = match &self.constraints {
            Some(c) => c.clamp(geometry),
            None => geometry,
        };
    }

    fn set_size_constraints(&mut self, constraints: SizeConstraints) {
        self.constraints = Some(constraints);
        self.geometry = constraints.clamp(self.geometry);
    }

    fn layout_margins(&self) -> Margins {
        self.margins
    }

    fn stays_on_top(&self) -> bool {
        self.on_top
    }

    fn set_stays_on_top(&mut self, on_top: bool) {
        self.on_top = on_top;
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn show_normal(&mut self) {
        self.visible = true;
        self.minimized = false;
    }

    fn show_minimized(&mut self) {
        self.visible = true;
        self.minimized = true;
    }

    fn is_minimized(&self) -> bool {
        self.minimized
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

#[derive(Debug)]
pub struct ChatView {
    lifecycle: WindowLifecycle,
    contact: ContactItem,
    geometry: PanelGeometry,
    messages: Vec<String>,
    input: String,
}

impl ChatView {
    pub fn new(contact: ContactItem, geometry: PanelGeometry) -> Self {
        Self {
            lifecycle: WindowLifecycle::new(),
            contact,
            geometry,
            messages: Vec::new(),
            input: String::new(),
        }
    }

    pub fn contact(&self) -> &ContactItem {
        &self.contact
    }

    pub fn geometry(&self) -> PanelGeometry {
        self.geometry
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Move the input line into the message log.
    pub fn send(&mut self) -> bool {
        let text = self.input.trim();
        if text.is_empty() {
            return false;
        }
        self.messages.push(format!("me: {text}"));
        self.input.clear();
        true
    }
}

impl SecondaryWindow for ChatView {
    fn lifecycle(&self) -> &WindowLifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut WindowLifecycle {
        &mut self.lifecycle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditField {
    #[default]
    Name,
    Signature,
}

#[derive(Debug)]
pub struct EditView {
    lifecycle: WindowLifecycle,
    geometry: PanelGeometry,
    draft: Profile,
    field: EditField,
}

impl EditView {
    pub fn new(profile: Profile, geometry: PanelGeometry) -> Self {
        Self {
            lifecycle: WindowLifecycle::new(),
            geometry,
            draft: profile,
            field: EditField::default(),
        }
    }

    pub fn geometry(&self) -> PanelGeometry {
        self.geometry
    }

    pub fn draft(&self) -> &Profile {
        &self.draft
    }

    pub fn field(&self) -> EditField {
        self.field
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            EditField::Name => EditField::Signature,
            EditField::Signature => EditField::Name,
        };
    }

    fn current_mut(&mut self) -> &mut String {
        match self.field {
            EditField::Name => &mut self.draft.name,
            EditField::Signature => &mut self.draft.signature,
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.current_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.current_mut().pop();
    }
}

impl SecondaryWindow for EditView {
    fn lifecycle(&self) -> &WindowLifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut WindowLifecycle {
        &mut self.lifecycle
    }
}
