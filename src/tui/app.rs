//! Application State
//!
//! Contains the main application state and logic for the TUI.

use crate::chart::ChartHost;
use crate::config::Config;
use crate::dispatcher::Operation;
use crate::models::DatasetDescriptor;
use crate::selection::SelectionField;
use crate::tui::event::AppAction;
use crate::tui::surface::TerminalSurfaceFactory;
use crate::tui::theme::Theme;
use crate::types::AppResult;
use crate::workflow::{Notice, NoticeLevel, Settlement, Workflow, WorkflowPhase, WorkflowSnapshot};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tui_textarea::{CursorMove, TextArea};

/// Notices kept for display
const NOTICE_HISTORY: usize = 100;

const PATH_PLACEHOLDER: &str = "Path to a .csv, .xlsx, .xls, .json or .txt file";

/// Current view/screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    Main,
    Help,
}

/// What plain key presses mean right now
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputMode {
    /// Single-key shortcuts trigger operations
    #[default]
    Command,
    /// Keys go to the file path input
    EditingPath,
}

/// Completions from background tasks
#[derive(Debug)]
pub enum AppEvent {
    Settled(Settlement),
    Uploaded(AppResult<DatasetDescriptor>),
}

/// Shortcut key for each operation
pub fn operation_for_key(c: char) -> Option<Operation> {
    match c {
        'c' => Some(Operation::Clean),
        's' => Some(Operation::Stats),
        'r' => Some(Operation::Sort),
        'g' => Some(Operation::Group),
        'h' => Some(Operation::Chart),
        'x' => Some(Operation::Correlation),
        _ => None,
    }
}

/// The operation a selection field feeds, run with Enter
pub fn operation_for_field(field: SelectionField) -> Operation {
    match field {
        SelectionField::Stats => Operation::Stats,
        SelectionField::Sort => Operation::Sort,
        SelectionField::Group | SelectionField::Agg => Operation::Group,
        SelectionField::ChartLabel | SelectionField::ChartValue => Operation::Chart,
    }
}

/// Main application state
pub struct App {
    pub config: Config,
    pub workflow: Workflow,

    // UI State
    pub view: View,
    pub mode: InputMode,
    pub should_quit: bool,
    pub focus: usize,
    pub scroll_offset: usize,
    pub path_input: TextArea<'static>,

    // Workflow state as last observed
    pub snapshot: WorkflowSnapshot,
    pub notices: Vec<Notice>,
    pub uploading: bool,

    // Chart container
    pub chart_host: ChartHost<TerminalSurfaceFactory>,
    rendered_version: u64,

    // Async communication
    event_rx: mpsc::Receiver<AppEvent>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl App {
    /// Create a new application instance
    pub async fn new(config: Config, workflow: Workflow, viewport: (u16, u16)) -> Self {
        let (event_tx, event_rx) = mpsc::channel(32);
        let snapshot = workflow.snapshot().await;

        Self {
            config,
            view: View::Main,
            mode: InputMode::Command,
            should_quit: false,
            focus: 0,
            scroll_offset: 0,
            path_input: Self::empty_path_input(),
            rendered_version: snapshot.result_version,
            snapshot,
            notices: Vec::new(),
            uploading: false,
            chart_host: ChartHost::new(TerminalSurfaceFactory::new(viewport.0, viewport.1)),
            workflow,
            event_rx,
            event_tx,
        }
    }

    fn empty_path_input() -> TextArea<'static> {
        let mut input = TextArea::default();
        input.set_cursor_line_style(ratatui::style::Style::default());
        input.set_placeholder_text(PATH_PLACEHOLDER);
        input.set_placeholder_style(Theme::placeholder());
        input
    }

    pub fn focused_field(&self) -> SelectionField {
        SelectionField::ALL[self.focus % SelectionField::ALL.len()]
    }

    /// Operations and uploads are disabled while anything is in flight
    pub fn triggers_enabled(&self) -> bool {
        !self.uploading && !self.workflow.is_busy()
    }

    pub fn has_dataset(&self) -> bool {
        self.snapshot.phase != WorkflowPhase::NoDataset
    }

    fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
        if self.notices.len() > NOTICE_HISTORY {
            let excess = self.notices.len() - NOTICE_HISTORY;
            self.notices.drain(..excess);
        }
    }

    /// Drain background completions. Returns true if any arrived.
    pub fn poll_events(&mut self) -> bool {
        let mut arrived = false;
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
            arrived = true;
        }
        arrived
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Settled(settlement) => {
                debug!(?settlement, "Operation settled");
            }
            AppEvent::Uploaded(result) => {
                self.uploading = false;
                if result.is_ok() {
                    self.focus = 0;
                }
            }
        }
    }

    /// Pull the latest workflow state and notices; redraw the chart
    /// container when the active result changed.
    pub async fn refresh(&mut self) {
        self.snapshot = self.workflow.snapshot().await;
        for notice in self.workflow.take_notices().await {
            self.push_notice(notice);
        }

        if self.snapshot.result_version != self.rendered_version {
            self.rendered_version = self.snapshot.result_version;
            self.scroll_offset = 0;
            match self.snapshot.result.chart() {
                Some(view) => self.chart_host.render(&view.option),
                None => self.chart_host.clear(),
            }
        }
    }

    /// Handle a user action
    pub async fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::Quit | AppAction::ForceQuit => {
                self.should_quit = true;
            }
            AppAction::ToggleHelp => {
                self.view = if self.view == View::Help {
                    View::Main
                } else {
                    View::Help
                };
            }
            AppAction::Escape => {
                if self.view != View::Main {
                    self.view = View::Main;
                } else if self.mode == InputMode::EditingPath {
                    self.mode = InputMode::Command;
                    self.path_input = Self::empty_path_input();
                }
            }
            AppAction::Resize(width, height) => {
                self.chart_host.factory_mut().set_viewport(width, height);
                self.chart_host.resize(width, height);
            }
            AppAction::Tick => {
                self.refresh().await;
            }
            action if self.mode == InputMode::EditingPath => self.handle_path_action(action).await,
            AppAction::Submit => {
                if self.has_dataset() {
                    self.trigger(operation_for_field(self.focused_field())).await;
                }
            }
            AppAction::NextField => {
                self.focus = (self.focus + 1) % SelectionField::ALL.len();
            }
            AppAction::PrevField => {
                self.focus = (self.focus + SelectionField::ALL.len() - 1) % SelectionField::ALL.len();
            }
            AppAction::ColumnPrev => self.cycle_focused(false).await,
            AppAction::ColumnNext => self.cycle_focused(true).await,
            AppAction::ScrollUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            AppAction::ScrollDown => {
                let rows = match self.snapshot.result.clean() {
                    Some(report) => report.preview().len(),
                    None => self.snapshot.result.table().len(),
                };
                if self.scroll_offset + 1 < rows {
                    self.scroll_offset += 1;
                }
            }
            AppAction::DeleteKey => {}
            AppAction::Input(key) => self.handle_command_key(key).await,
        }
    }

    async fn cycle_focused(&mut self, forward: bool) {
        if self.workflow.cycle_selection(self.focused_field(), forward).await.is_ok() {
            self.refresh().await;
        }
    }

    async fn handle_path_action(&mut self, action: AppAction) {
        match action {
            AppAction::Submit => {
                let path = self.path_input.lines().join("").trim().to_string();
                if !path.is_empty() {
                    self.start_upload(PathBuf::from(path)).await;
                }
            }
            AppAction::DeleteKey => {
                self.path_input.delete_char();
            }
            AppAction::ColumnPrev => self.path_input.move_cursor(CursorMove::Back),
            AppAction::ColumnNext => self.path_input.move_cursor(CursorMove::Forward),
            AppAction::Input(key) => {
                self.path_input.input(key);
            }
            _ => {}
        }
    }

    async fn handle_command_key(&mut self, key: KeyEvent) {
        if key.modifiers != KeyModifiers::NONE && key.modifiers != KeyModifiers::SHIFT {
            return;
        }
        let KeyCode::Char(c) = key.code else {
            return;
        };

        match c {
            'q' => self.should_quit = true,
            '?' => self.view = View::Help,
            'o' => {
                if self.triggers_enabled() {
                    self.mode = InputMode::EditingPath;
                }
            }
            't' => {
                let next = self.snapshot.chart_type.next();
                self.workflow.set_chart_type(next).await;
                self.refresh().await;
            }
            c => {
                if let Some(operation) = operation_for_key(c) {
                    self.trigger(operation).await;
                }
            }
        }
    }

    /// Dispatch `operation` and settle it in the background
    async fn trigger(&mut self, operation: Operation) {
        if !self.triggers_enabled() {
            debug!(%operation, "Ignoring trigger while busy");
            return;
        }

        match self.workflow.begin(operation).await {
            Ok(pending) => {
                let workflow = self.workflow.clone();
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let settlement = workflow.finish(pending).await;
                    tx.send(AppEvent::Settled(settlement)).await.ok();
                });
            }
            Err(err) => {
                self.push_notice(Notice::new(
                    NoticeLevel::Warning,
                    operation.failure_message(&err),
                ));
            }
        }
        self.refresh().await;
    }

    /// Reserve the workflow for an upload, then read and send `path` in
    /// the background. Triggers are disabled before this returns.
    pub async fn start_upload(&mut self, path: PathBuf) {
        if !self.triggers_enabled() {
            self.push_notice(Notice::new(
                NoticeLevel::Warning,
                "Upload unavailable while a request is in flight",
            ));
            return;
        }

        let pending = match self.workflow.begin_upload().await {
            Ok(pending) => pending,
            Err(_) => {
                self.refresh().await;
                return;
            }
        };

        info!(path = %path.display(), "Starting upload");
        self.mode = InputMode::Command;
        self.path_input = Self::empty_path_input();
        self.uploading = true;

        let workflow = self.workflow.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = workflow.finish_upload_path(pending, &path).await;
            tx.send(AppEvent::Uploaded(result)).await.ok();
        });
        self.refresh().await;
    }
}
