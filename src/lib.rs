//! Main-panel shell of a desktop chat client.
//!
//! [`panel::MainPanel`] is the controller. It is generic over a
//! [`panel::PanelHost`] that builds the actual windows, and over a
//! [`settings::SettingsStore`]. The [`host`] module provides a terminal
//! implementation drawn with ratatui.

pub mod actions;
pub mod constants;
pub mod contacts;
pub mod drivers;
pub mod edit_slot;
pub mod event_loop;
pub mod geometry;
pub mod host;
pub mod images;
pub mod overlay;
pub mod panel;
pub mod registry;
pub mod settings;
pub mod shortcuts;
pub mod signal;
pub mod state;
pub mod theme;
pub mod timer;
pub mod toolbar;
pub mod tracing_sub;
pub mod ui;
pub mod window;
