//! Analysis workflow
//!
//! Owns the dataset registry, the selection, the active result and the
//! notices, and sequences uploads and analysis operations against the
//! service.
//!
//! # States
//!
//! ```text
//!  NoDataset --upload ok--> DatasetLoaded --begin--> Busy --settle--> DatasetLoaded
//!                               ^                                         |
//!                               +------------- upload ok -----------------+
//! ```
//!
//! A dispatch is split in two: [`Workflow::begin`] validates the selection,
//! applies pre-dispatch side effects, marks the workflow busy and captures a
//! generation in one critical section; [`Workflow::finish`] awaits the
//! service and applies the output only if no later dispatch was issued.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::data_registry::DatasetRegistry;
use crate::dispatcher::{
    build_call, execute, route, ActiveResult, AnalysisCall, Generation, GenerationCounter,
    Operation,
};
use crate::models::DatasetDescriptor;
use crate::selection::{ChartType, SelectionField, SelectionState};
use crate::service::AnalysisService;
use crate::types::{AppError, AppResult};
use crate::upload::{self, UploadFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    NoDataset,
    DatasetLoaded,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A user-facing notification
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// How a dispatch ended
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    /// The output is now the active result
    Applied(Operation),
    /// A later dispatch was issued; the output was dropped
    Superseded {
        operation: Operation,
        generation: Generation,
    },
    Failed {
        operation: Operation,
        message: String,
    },
    /// Never sent (no dataset, stale selection, busy uploading)
    Rejected(AppError),
}

/// Counts calls in flight; shared with the guards that release them
#[derive(Debug, Default)]
struct BusyTracker {
    in_flight: AtomicUsize,
    uploading: AtomicBool,
}

/// Releases its slot in [`BusyTracker`] when dropped, whichever way the
/// call ended (including the future being dropped mid-flight).
#[derive(Debug)]
struct BusyGuard {
    tracker: Arc<BusyTracker>,
    upload: bool,
}

impl BusyGuard {
    fn acquire(tracker: &Arc<BusyTracker>, upload: bool) -> Self {
        tracker.in_flight.fetch_add(1, Ordering::SeqCst);
        if upload {
            tracker.uploading.store(true, Ordering::SeqCst);
        }
        Self {
            tracker: tracker.clone(),
            upload,
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if self.upload {
            self.tracker.uploading.store(false, Ordering::SeqCst);
        }
        self.tracker.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A dispatched operation awaiting [`Workflow::finish`]
#[derive(Debug)]
pub struct PendingCall {
    pub operation: Operation,
    pub generation: Generation,
    pub call: AnalysisCall,
    _busy: BusyGuard,
}

/// An upload holding the busy slot, awaiting [`Workflow::finish_upload`]
#[derive(Debug)]
pub struct PendingUpload {
    _busy: BusyGuard,
}

#[derive(Debug, Default)]
struct WorkflowState {
    registry: DatasetRegistry,
    selection: Option<SelectionState>,
    chart_type: ChartType,
    result: ActiveResult,
    /// Bumped whenever `result` changes
    result_version: u64,
    generations: GenerationCounter,
    notices: Vec<Notice>,
}

impl WorkflowState {
    fn set_result(&mut self, result: ActiveResult) {
        self.result = result;
        self.result_version += 1;
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let notice = Notice::new(level, message);
        match level {
            NoticeLevel::Info => info!(message = %notice.message, "Notice"),
            NoticeLevel::Warning => warn!(message = %notice.message, "Notice"),
            NoticeLevel::Error => error!(message = %notice.message, "Notice"),
        }
        self.notices.push(notice);
    }
}

/// Point-in-time copy of the workflow for display
#[derive(Debug, Clone)]
pub struct WorkflowSnapshot {
    pub phase: WorkflowPhase,
    pub dataset: Option<DatasetDescriptor>,
    pub selection: Option<SelectionState>,
    pub chart_type: ChartType,
    pub result: ActiveResult,
    pub result_version: u64,
}

#[derive(Clone)]
pub struct Workflow {
    service: Arc<dyn AnalysisService>,
    state: Arc<RwLock<WorkflowState>>,
    busy: Arc<BusyTracker>,
}

impl Workflow {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        Self {
            service,
            state: Arc::new(RwLock::new(WorkflowState::default())),
            busy: Arc::new(BusyTracker::default()),
        }
    }

    /// True while any upload or analysis call is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn phase(&self) -> WorkflowPhase {
        let state = self.state.read().await;
        self.phase_of(&state)
    }

    fn phase_of(&self, state: &WorkflowState) -> WorkflowPhase {
        if !state.registry.is_loaded() {
            WorkflowPhase::NoDataset
        } else if self.is_busy() {
            WorkflowPhase::Busy
        } else {
            WorkflowPhase::DatasetLoaded
        }
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        let state = self.state.read().await;
        WorkflowSnapshot {
            phase: self.phase_of(&state),
            dataset: state.registry.current().cloned(),
            selection: state.selection.clone(),
            chart_type: state.chart_type,
            result: state.result.clone(),
            result_version: state.result_version,
        }
    }

    /// Drain accumulated notices, oldest first
    pub async fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.write().await.notices)
    }

    // Uploads

    /// Reserve the workflow for an upload. The busy slot is held from here
    /// until the returned [`PendingUpload`] is finished or dropped, so no
    /// operation can be dispatched while the file is still being read.
    pub async fn begin_upload(&self) -> AppResult<PendingUpload> {
        let mut state = self.state.write().await;
        if self.is_busy() {
            state.notify(NoticeLevel::Warning, "Upload refused: a request is still in flight");
            return Err(AppError::Busy);
        }
        Ok(PendingUpload {
            _busy: BusyGuard::acquire(&self.busy, true),
        })
    }

    /// Read `path` and upload it.
    pub async fn upload_path(&self, path: impl AsRef<Path>) -> AppResult<DatasetDescriptor> {
        let pending = self.begin_upload().await?;
        self.finish_upload_path(pending, path).await
    }

    /// Read `path` under an already reserved upload slot and submit it.
    pub async fn finish_upload_path(
        &self,
        pending: PendingUpload,
        path: impl AsRef<Path>,
    ) -> AppResult<DatasetDescriptor> {
        match UploadFile::from_path(path).await {
            Ok(file) => self.finish_upload(pending, file).await,
            Err(err) => {
                self.state
                    .write()
                    .await
                    .notify(NoticeLevel::Error, format!("Upload failed: {}", err.user_message()));
                Err(err)
            }
        }
    }

    /// Upload a file. On success the dataset and the selection are replaced
    /// together; on failure neither is touched. Requires an idle workflow.
    pub async fn upload(&self, file: UploadFile) -> AppResult<DatasetDescriptor> {
        let pending = self.begin_upload().await?;
        self.finish_upload(pending, file).await
    }

    /// Submit `file` and apply the reply. The upload slot is released on
    /// every path.
    pub async fn finish_upload(
        &self,
        pending: PendingUpload,
        file: UploadFile,
    ) -> AppResult<DatasetDescriptor> {
        info!(file = %file.name, "Uploading dataset");
        let outcome = upload::submit(self.service.as_ref(), &file)
            .await
            .and_then(|dataset| SelectionState::derive(&dataset).map(|selection| (dataset, selection)));

        let mut state = self.state.write().await;
        let result = match outcome {
            Ok((dataset, selection)) => {
                state.selection = Some(selection);
                state.registry.replace(dataset.clone());
                // responses addressed to the previous dataset must not land
                state.generations.issue();
                state.notify(
                    NoticeLevel::Info,
                    format!(
                        "Loaded {} ({} rows, {} columns)",
                        dataset.original_filename,
                        dataset.row_count,
                        dataset.columns.len()
                    ),
                );
                Ok(dataset)
            }
            Err(err) => {
                state.notify(NoticeLevel::Error, format!("Upload failed: {}", err.user_message()));
                Err(err)
            }
        };
        drop(state);
        drop(pending);
        result
    }

    // Selection

    pub async fn select(&self, field: SelectionField, column: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        let WorkflowState {
            registry, selection, ..
        } = &mut *state;
        let dataset = registry.require()?;
        let selection = selection.as_mut().ok_or(AppError::NoDataset)?;
        selection.set(field, column, dataset)
    }

    pub async fn cycle_selection(&self, field: SelectionField, forward: bool) -> AppResult<()> {
        let mut state = self.state.write().await;
        let WorkflowState {
            registry, selection, ..
        } = &mut *state;
        let dataset = registry.require()?;
        let selection = selection.as_mut().ok_or(AppError::NoDataset)?;
        selection.cycle(field, dataset, forward);
        Ok(())
    }

    pub async fn set_chart_type(&self, chart_type: ChartType) {
        self.state.write().await.chart_type = chart_type;
    }

    // Dispatch

    /// Validate and dispatch `operation`. Charts clear the displayed
    /// table/stats here, before any request is made.
    pub async fn begin(&self, operation: Operation) -> AppResult<PendingCall> {
        let mut state = self.state.write().await;

        if self.busy.uploading.load(Ordering::SeqCst) {
            return Err(AppError::Busy);
        }

        let dataset = state.registry.require()?;
        let selection = state.selection.as_ref().ok_or(AppError::NoDataset)?;
        let call = build_call(operation, dataset, selection, state.chart_type)?;

        if operation.is_chart() {
            state.set_result(ActiveResult::Idle);
        }

        let generation = state.generations.issue();
        let busy = BusyGuard::acquire(&self.busy, false);
        info!(%operation, generation = generation.0, "Dispatching");

        Ok(PendingCall {
            operation,
            generation,
            call,
            _busy: busy,
        })
    }

    /// Send the call and settle it. The busy slot is released on every path.
    pub async fn finish(&self, pending: PendingCall) -> Settlement {
        let outcome = execute(self.service.as_ref(), &pending.call).await;

        let mut state = self.state.write().await;
        let operation = pending.operation;

        let settlement = if !state.generations.is_latest(pending.generation) {
            warn!(
                %operation,
                generation = pending.generation.0,
                latest = state.generations.latest().0,
                "Discarding response from superseded request"
            );
            Settlement::Superseded {
                operation,
                generation: pending.generation,
            }
        } else {
            match outcome.map(|output| route(operation, output)) {
                Ok(Ok(result)) => {
                    info!(%operation, generation = pending.generation.0, "Result applied");
                    if operation == Operation::Clean {
                        state.notify(NoticeLevel::Info, "Cleaning complete");
                    }
                    state.set_result(result);
                    Settlement::Applied(operation)
                }
                Ok(Err(unhandled)) => {
                    let message = unhandled.to_string();
                    state.notify(NoticeLevel::Warning, message.clone());
                    state.set_result(ActiveResult::Failed {
                        operation,
                        message: message.clone(),
                    });
                    Settlement::Failed { operation, message }
                }
                Err(err) => {
                    let message = operation.failure_message(&err);
                    state.notify(NoticeLevel::Error, message.clone());
                    // non-chart failures keep whatever was on display
                    if operation.is_chart() {
                        state.set_result(ActiveResult::Failed {
                            operation,
                            message: message.clone(),
                        });
                    }
                    Settlement::Failed { operation, message }
                }
            }
        };

        drop(state);
        drop(pending);
        settlement
    }

    /// `begin` then `finish`. Rejections are recorded as notices too.
    pub async fn run(&self, operation: Operation) -> Settlement {
        match self.begin(operation).await {
            Ok(pending) => self.finish(pending).await,
            Err(err) => {
                self.state
                    .write()
                    .await
                    .notify(NoticeLevel::Warning, operation.failure_message(&err));
                Settlement::Rejected(err)
            }
        }
    }
}
