//! The main panel controller.
//!
//! [`MainPanel`] owns the main window, the chat-window registry, the hover
//! overlays and the personal-info editor slot. It restores geometry and the
//! pin flag on startup and writes them back on close. Toolbar buttons and
//! tray actions reach it as [`PanelCommand`]s through an mpsc channel so
//! collaborators never hold a reference to the panel itself.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::actions::{ActionManager, Id};
use crate::constants::{
    CLOSE_QUIT_DELAY, PanelMetrics, SETTINGS_TOP_HINT, TOOL_CLOSE, TOOL_MIN, TOOL_PANEL_FRONT,
};
use crate::contacts::{ContactItem, ContactList, ItemId};
use crate::edit_slot::EditWindowSlot;
use crate::event_loop::ControlFlow;
use crate::geometry::{Margins, PanelGeometry, Point, ScreenInfo, SizeConstraints};
use crate::images::{IconColor, IconSize, ImageProvider};
use crate::overlay::HoverOverlayController;
use crate::registry::WidgetRegistry;
use crate::settings::{SettingsError, SettingsStore};
use crate::shortcuts::ShortcutSettings;
use crate::timer::TimerQueue;
use crate::toolbar::{ToolBar, ToolFlags};
use crate::window::{PanelWindow, SecondaryWindow};

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("failed to persist panel settings: {0}")]
    Settings(#[from] SettingsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Initializing,
    Restored,
    Minimized,
    Closing,
    Destroyed,
}

/// Requests from collaborators (tray icon, toolbar buttons).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    /// Tray quit. Handled as a close.
    Quit,
    ShowMainPanel,
    Minimize,
    Close,
    SetPinned(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTimer {
    UpdateToolbarGeometry,
    Quit,
}

/// Regions of the main window, relative to its origin.
///
/// Top bar, content and bottom toolbar are stacked vertically inside the
/// layout margins with no spacing. The window-chrome toolbar overlays the top
/// edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelLayout {
    pub toolbar: PanelGeometry,
    pub top_bar: PanelGeometry,
    pub content: PanelGeometry,
    pub bottom_bar: PanelGeometry,
}

impl PanelLayout {
    pub fn split(width: i32, height: i32, margins: Margins, metrics: &PanelMetrics) -> Self {
        let inner_width = (width - margins.left - margins.right).max(0);
        let inner_height = (height - margins.top - margins.bottom).max(0);
        let top_h = metrics.top_bar_height.min(inner_height);
        let bottom_h = metrics
            .bottom_bar_height
            .min(inner_height.saturating_sub(top_h));
        let content_h = (inner_height - top_h - bottom_h).max(0);

        let top_bar = PanelGeometry::new(margins.left, margins.top, inner_width, top_h);
        let content = PanelGeometry::new(margins.left, margins.top + top_h, inner_width, content_h);
        let bottom_bar = PanelGeometry::new(
            margins.left,
            margins.top + top_h + content_h,
            inner_width,
            bottom_h,
        );
        Self {
            toolbar: Self::toolbar_geometry(width, margins, metrics),
            top_bar,
            content,
            bottom_bar,
        }
    }

    /// Toolbar spans the window width minus an inset of three right margins.
    pub fn toolbar_geometry(width: i32, margins: Margins, metrics: &PanelMetrics) -> PanelGeometry {
        PanelGeometry::new(
            margins.left,
            0,
            (width - margins.right * 3).max(0),
            metrics.tool_height,
        )
    }
}

/// Platform services the panel needs. Also creates the windows it shows.
pub trait PanelHost: ImageProvider {
    type Window: PanelWindow;
    type ChatWindow: SecondaryWindow;
    type EditWindow: SecondaryWindow;

    fn screen(&self) -> ScreenInfo;
    fn create_panel_window(&mut self) -> Self::Window;
    fn create_chat_window(&mut self, contact: &ContactItem) -> Self::ChatWindow;
    fn create_edit_window(&mut self) -> Self::EditWindow;
}

pub struct MainPanel<H: PanelHost, S: SettingsStore> {
    host: H,
    window: H::Window,
    settings: S,
    metrics: PanelMetrics,
    state: PanelState,
    toolbar: ToolBar,
    actions: ActionManager,
    shortcuts: ShortcutSettings,
    contacts: ContactList,
    chat_windows: WidgetRegistry<ItemId, H::ChatWindow>,
    hover: HoverOverlayController<ItemId>,
    edit_window: EditWindowSlot<H::EditWindow>,
    timers: TimerQueue<PanelTimer>,
    commands_tx: Sender<PanelCommand>,
    commands_rx: Receiver<PanelCommand>,
}

impl<H: PanelHost, S: SettingsStore> MainPanel<H, S> {
    pub fn new(mut host: H, settings: S, metrics: PanelMetrics) -> Self {
        let window = host.create_panel_window();
        let (commands_tx, commands_rx) = mpsc::channel();
        let shortcuts = ShortcutSettings::load(&settings);
        let mut panel = Self {
            host,
            window,
            settings,
            metrics,
            state: PanelState::Initializing,
            toolbar: ToolBar::new(),
            actions: ActionManager::new(),
            shortcuts,
            contacts: ContactList::new(),
            chat_windows: WidgetRegistry::new(),
            hover: HoverOverlayController::new(),
            edit_window: EditWindowSlot::new(),
            timers: TimerQueue::new(),
            commands_tx,
            commands_rx,
        };
        panel.initialize();
        panel
    }

    fn initialize(&mut self) {
        let screen = self.host.screen();
        self.window
            .set_size_constraints(SizeConstraints::for_panel(&self.metrics, screen));
        self.read_settings(screen);

        self.toolbar.set_tool_flags(
            ToolFlags::ICON | ToolFlags::MIN | ToolFlags::CLOSE | ToolFlags::SPACER,
            &mut self.actions,
        );
        self.toolbar.set_window_icon(
            self.host
                .window_icon(IconColor::White, IconSize::System16),
        );
        self.connect_command(TOOL_MIN, |_| PanelCommand::Minimize);
        self.connect_command(TOOL_CLOSE, |_| PanelCommand::Close);

        let tx = self.commands_tx.clone();
        self.actions
            .create_tool_button(TOOL_PANEL_FRONT, true, move |checked| {
                send_command(&tx, PanelCommand::SetPinned(*checked));
            });
        self.toolbar
            .insert_tool_button(Id::new(TOOL_PANEL_FRONT), TOOL_MIN);

        let pinned = self.settings.bool(SETTINGS_TOP_HINT).unwrap_or(false);
        self.set_pinned(pinned);

        self.timers.schedule(
            Instant::now(),
            Duration::ZERO,
            PanelTimer::UpdateToolbarGeometry,
        );
        self.state = PanelState::Restored;
        tracing::info!(geometry = ?self.window.geometry(), pinned, "main panel ready");
    }

    fn connect_command<F>(&mut self, id: &str, command: F)
    where
        F: Fn(bool) -> PanelCommand + 'static,
    {
        let tx = self.commands_tx.clone();
        if let Some(button) = self.actions.tool_button_mut(id) {
            button
                .clicked()
                .connect(move |checked| send_command(&tx, command(*checked)));
        }
    }

    /// Apply persisted geometry, or compute and persist defaults when any of
    /// the four keys is missing.
    fn read_settings(&mut self, screen: ScreenInfo) {
        let geometry = match PanelGeometry::read(&self.settings) {
            Some(geometry) => geometry,
            None => {
                let geometry = PanelGeometry::default_for_screen(screen, &self.metrics);
                tracing::debug!(?geometry, "no stored panel geometry, using defaults");
                geometry.write(&mut self.settings);
                if let Err(err) = self.settings.sync() {
                    tracing::warn!(error = %err, "failed to persist default geometry");
                }
                geometry
            }
        };
        self.window.set_geometry(geometry);
    }

    fn write_settings(&mut self) -> Result<(), SettingsError> {
        let geometry = self.window.geometry();
        geometry.write(&mut self.settings);
        self.settings.sync()
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        if self.state == PanelState::Destroyed {
            return;
        }
        self.window.set_stays_on_top(pinned);
        if let Some(button) = self.actions.tool_button_mut(TOOL_PANEL_FRONT) {
            button.set_tooltip(if pinned { "Unstick" } else { "Stick" });
            button.set_checked(pinned);
        }
        self.settings.set_bool(SETTINGS_TOP_HINT, pinned);
        if let Err(err) = self.settings.sync() {
            tracing::warn!(error = %err, "failed to persist pin state");
        }
        self.window.show();
        tracing::debug!(pinned, "pin state changed");
    }

    pub fn is_pinned(&self) -> bool {
        self.window.stays_on_top()
    }

    pub fn minimize(&mut self) {
        if self.is_shutting_down() {
            return;
        }
        self.window.show_minimized();
        self.state = PanelState::Minimized;
    }

    pub fn show_normal(&mut self) {
        if self.is_shutting_down() {
            return;
        }
        self.window.show_normal();
        self.state = PanelState::Restored;
    }

    fn is_shutting_down(&self) -> bool {
        matches!(self.state, PanelState::Closing | PanelState::Destroyed)
    }

    /// Recompute the toolbar geometry from the live window size and margins.
    pub fn handle_resize(&mut self) {
        let geometry = self.window.geometry();
        let toolbar = PanelLayout::toolbar_geometry(
            geometry.width,
            self.window.layout_margins(),
            &self.metrics,
        );
        self.toolbar.set_geometry(toolbar);
    }

    pub fn resize_window(&mut self, width: i32, height: i32) {
        let mut geometry = self.window.geometry();
        geometry.width = width;
        geometry.height = height;
        self.window.set_geometry(geometry);
        self.handle_resize();
    }

    pub fn move_window(&mut self, x: i32, y: i32) {
        let mut geometry = self.window.geometry();
        geometry.x = x;
        geometry.y = y;
        self.window.set_geometry(geometry);
    }

    pub fn layout(&self) -> PanelLayout {
        let geometry = self.window.geometry();
        PanelLayout::split(
            geometry.width,
            geometry.height,
            self.window.layout_margins(),
            &self.metrics,
        )
    }

    /// Persist the geometry now and quit once [`CLOSE_QUIT_DELAY`] has passed.
    ///
    /// Returns `false` when a close is already under way.
    pub fn request_close(&mut self, now: Instant) -> bool {
        if self.is_shutting_down() {
            return false;
        }
        if let Err(err) = self.write_settings() {
            tracing::warn!(error = %err, "failed to persist geometry on close");
        }
        self.state = PanelState::Closing;
        self.timers.schedule(now, CLOSE_QUIT_DELAY, PanelTimer::Quit);
        tracing::info!("main panel closing");
        true
    }

    /// Run due timers. Yields [`ControlFlow::Quit`] once the close delay ran out.
    pub fn poll_timers(&mut self, now: Instant) -> ControlFlow {
        let mut flow = ControlFlow::Continue;
        for timer in self.timers.take_due(now) {
            match timer {
                PanelTimer::UpdateToolbarGeometry => self.handle_resize(),
                PanelTimer::Quit => flow = ControlFlow::Quit,
            }
        }
        flow
    }

    /// Time until the next timer fires.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        self.timers.time_until_next(now)
    }

    /// Sender for collaborators that request panel actions.
    pub fn commands(&self) -> Sender<PanelCommand> {
        self.commands_tx.clone()
    }

    /// Handle every queued command. Returns how many were handled.
    pub fn process_commands(&mut self, now: Instant) -> usize {
        let mut handled = 0;
        while let Ok(command) = self.commands_rx.try_recv() {
            self.handle_command(command, now);
            handled += 1;
        }
        handled
    }

    pub fn handle_command(&mut self, command: PanelCommand, now: Instant) {
        tracing::debug!(?command, "panel command");
        match command {
            PanelCommand::Quit | PanelCommand::Close => {
                self.request_close(now);
            }
            PanelCommand::ShowMainPanel => self.show_normal(),
            PanelCommand::Minimize => self.minimize(),
            PanelCommand::SetPinned(pinned) => self.set_pinned(pinned),
        }
    }

    /// Click a toolbar button and handle whatever it requested.
    pub fn trigger_tool(&mut self, id: &str, now: Instant) -> bool {
        if !self.actions.trigger(id) {
            return false;
        }
        self.process_commands(now);
        true
    }

    /// Show the chat window for `item`, creating it on first use.
    pub fn show_chat_window(&mut self, item: ItemId) -> bool {
        let Some(contact) = self.contacts.get(item).cloned() else {
            tracing::warn!(%item, "chat requested for unknown contact");
            return false;
        };
        let host = &mut self.host;
        let window = self
            .chat_windows
            .get_or_create(item, || host.create_chat_window(&contact));
        window.show();
        true
    }

    /// Start showing (`true`) or hiding (`false`) the hover overlay of `item`.
    pub fn show_hover_item(&mut self, flag: bool, item: ItemId) -> bool {
        if !flag {
            return self.hover.hide(item);
        }
        let Some(index) = self.contacts.index_of(item) else {
            tracing::warn!(%item, "hover requested for unknown contact");
            return false;
        };
        let anchor = self.item_anchor(index);
        let content = self.contacts.items()[index].hover_content();
        self.hover.show(item, anchor, content)
    }

    /// Screen position of the top-left corner of row `index`.
    pub fn item_anchor(&self, index: usize) -> Point {
        let origin = self.window.geometry().origin();
        let content = self.layout().content;
        let row = to_i32(index).saturating_sub(to_i32(self.contacts.scroll_offset()));
        Point::new(
            origin.x.saturating_add(content.x),
            origin
                .y
                .saturating_add(content.y)
                .saturating_add(row.saturating_mul(self.metrics.row_height)),
        )
    }

    pub fn show_personal_edit_window(&mut self) {
        let host = &mut self.host;
        self.edit_window.open(|| host.create_edit_window());
    }

    pub fn close_personal_edit_window(&mut self) -> bool {
        self.edit_window.close()
    }

    /// Advance overlay animations.
    pub fn tick(&mut self, elapsed: Duration) {
        self.hover.tick(elapsed);
    }

    /// Release every secondary window and persist shortcut bindings.
    ///
    /// Safe to call more than once; only the first call does anything.
    pub fn teardown(&mut self) -> Result<(), PanelError> {
        if self.state == PanelState::Destroyed {
            return Ok(());
        }
        self.edit_window.destroy();
        let chats = self.chat_windows.remove_all();
        self.hover.clear();
        self.state = PanelState::Destroyed;
        tracing::info!(chats, "main panel torn down");
        self.shortcuts.save(&mut self.settings)?;
        Ok(())
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn metrics(&self) -> &PanelMetrics {
        &self.metrics
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn window(&self) -> &H::Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut H::Window {
        &mut self.window
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn toolbar(&self) -> &ToolBar {
        &self.toolbar
    }

    pub fn actions(&self) -> &ActionManager {
        &self.actions
    }

    pub fn shortcuts(&self) -> &ShortcutSettings {
        &self.shortcuts
    }

    pub fn contacts(&self) -> &ContactList {
        &self.contacts
    }

    pub fn contacts_mut(&mut self) -> &mut ContactList {
        &mut self.contacts
    }

    pub fn chat_windows(&self) -> &WidgetRegistry<ItemId, H::ChatWindow> {
        &self.chat_windows
    }

    pub fn chat_windows_mut(&mut self) -> &mut WidgetRegistry<ItemId, H::ChatWindow> {
        &mut self.chat_windows
    }

    pub fn hover(&self) -> &HoverOverlayController<ItemId> {
        &self.hover
    }

    pub fn edit_window(&self) -> Option<&H::EditWindow> {
        self.edit_window.get()
    }

    pub fn edit_window_mut(&mut self) -> Option<&mut H::EditWindow> {
        self.edit_window.get_mut()
    }
}

impl<H: PanelHost, S: SettingsStore> Drop for MainPanel<H, S> {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            tracing::warn!(error = %err, "panel teardown failed");
        }
    }
}

fn to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn send_command(tx: &Sender<PanelCommand>, command: PanelCommand) {
    if tx.send(command).is_err() {
        tracing::debug!(?command, "panel gone, dropping command");
    }
}
