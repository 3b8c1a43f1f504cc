//! Terminal User Interface Module
//!
//! Terminal front end for the analysis workflow, built with Ratatui.
//!
//! # Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  DataLens                        sales.csv · 120 rows · 6 cols  │
//! ├──────────────────────┬──────────────────────────────────────────┤
//! │ Columns              │ Result                                   │
//! │ ▶ Stats      amount  │  [table, statistics or chart]            │
//! │   Sort by    amount  │                                          │
//! │   Group by   region  │                                          │
//! │   ...                │                                          │
//! ├──────────────────────┴──────────────────────────────────────────┤
//! │ Notices                                                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ [o] Open [c] Clean [s] Stats [r] Sort [g] Group [h] Chart ...   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod event;
pub mod surface;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::{App, AppEvent, InputMode, View};
pub use event::{AppAction, EventHandler};
pub use surface::{TerminalSurface, TerminalSurfaceFactory};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use tracing::{error, info};

use crate::config::Config;
use crate::workflow::Workflow;

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI application, optionally uploading `initial_file` first
pub async fn run(
    config: Config,
    workflow: Workflow,
    initial_file: Option<PathBuf>,
) -> anyhow::Result<()> {
    info!("Starting TUI");

    let mut terminal = init_terminal()?;
    let size = terminal.size()?;

    let mut app = App::new(config, workflow, (size.width, size.height)).await;
    if let Some(path) = initial_file {
        app.start_upload(path).await;
    }

    let mut events = EventHandler::new(std::time::Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    if let Err(e) = restore_terminal(&mut terminal) {
        error!("Failed to restore terminal: {}", e);
    }

    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // Background uploads and operations
        if app.poll_events() {
            app.refresh().await;
        }

        if let Some(action) = events.try_next().await {
            app.handle_action(action).await;
        }

        if app.should_quit {
            break;
        }

        // Small yield to prevent busy loop
        tokio::task::yield_now().await;
    }

    info!("TUI exited normally");
    Ok(())
}
