use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;

use rim_panel::constants::{
    PanelMetrics, SETTINGS_HEIGHT, SETTINGS_WIDTH, SETTINGS_X, SETTINGS_Y,
};
use rim_panel::contacts::ContactList;
use rim_panel::drivers::OutputDriver;
use rim_panel::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use rim_panel::event_loop::{ControlFlow, EventLoop};
use rim_panel::geometry::ScreenInfo;
use rim_panel::host::TerminalHost;
use rim_panel::host::app::App;
use rim_panel::panel::MainPanel;
use rim_panel::settings::{JsonSettings, MemorySettings, SettingsStore};
use rim_panel::tracing_sub;

const POLL_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(
    name = "rim-panel",
    version = env!("CARGO_PKG_VERSION"),
    about = "Chat client main panel in the terminal"
)]
struct Cli {
    /// Settings file. Defaults to the per-user config directory.
    #[arg(short = 's', long = "settings", value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Keep settings in memory only.
    #[arg(long, conflicts_with = "settings")]
    ephemeral: bool,

    /// Write logs here instead of stderr, which shares the screen with the UI.
    #[arg(short = 'l', long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Forget the stored panel position and size before starting.
    #[arg(long)]
    reset_geometry: bool,

    /// Number of generated contacts in the list.
    #[arg(short = 'c', long, value_name = "N", default_value_t = 12)]
    contacts: usize,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    tracing_sub::init_default(cli.log_file.as_deref())?;

    if cli.ephemeral {
        return run(MemorySettings::new(), &cli);
    }
    let path = cli
        .settings
        .clone()
        .unwrap_or_else(JsonSettings::default_path);
    match JsonSettings::open(path) {
        Ok(settings) => run(settings, &cli),
        Err(err) => {
            tracing::warn!(error = %err, "settings unavailable, keeping them in memory");
            run(MemorySettings::new(), &cli)
        }
    }
}

fn run<S: SettingsStore>(mut settings: S, cli: &Cli) -> io::Result<()> {
    if cli.reset_geometry {
        for key in [SETTINGS_X, SETTINGS_Y, SETTINGS_WIDTH, SETTINGS_HEIGHT] {
            settings.remove(key);
        }
    }

    let mut output = ConsoleOutputDriver::new()?;
    let (cols, rows) = output.size()?;
    let host = TerminalHost::new(ScreenInfo {
        width: i32::from(cols),
        height: i32::from(rows),
    });
    let mut panel = MainPanel::new(host, settings, PanelMetrics::terminal());
    *panel.contacts_mut() = ContactList::sample(cli.contacts);
    let mut app = App::new(panel, Instant::now());

    output.enter()?;
    let mut event_loop = EventLoop::new(ConsoleInputDriver::new(), POLL_INTERVAL);
    let result = event_loop.run(|event| {
        let now = Instant::now();
        match event {
            None => {
                let flow = app.on_idle(now);
                if flow == ControlFlow::Continue {
                    output.draw(|mut frame| app.render(&mut frame))?;
                }
                Ok(flow)
            }
            Some(event) => Ok(app.handle_event(&event, now)),
        }
    });
    output.exit()?;

    app.shutdown().map_err(io::Error::other)?;
    result
}
