//! Request Dispatcher
//!
//! Builds the request for each operation from the current dataset and
//! selection, runs it against the service, and routes the output into the
//! single [`ActiveResult`]. Each dispatch carries a [`Generation`]; only the
//! most recently issued one may write the result.

use tracing::debug;

use crate::chart::{adapt, ChartOption, ChartSpec, UnhandledChart};
use crate::models::{
    AggMethod, ChartRequest, CleanReport, CleanRequest, DatasetDescriptor, GroupRequest, Row,
    SortOrder, SortRequest, StatsRequest, StatsTable,
};
use crate::selection::{ChartConfig, ChartType, SelectionField, SelectionState};
use crate::service::AnalysisService;
use crate::types::{AppError, AppResult};

/// Sort requests always ask for descending order
pub const SORT_ORDER: SortOrder = SortOrder::Desc;
/// Group requests always sum
pub const AGG_METHOD: AggMethod = AggMethod::Sum;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Clean,
    Stats,
    Sort,
    Group,
    /// Chart of the configured type
    Chart,
    /// Correlation heatmap, whatever chart type is configured
    Correlation,
}

impl Operation {
    pub fn is_chart(self) -> bool {
        matches!(self, Operation::Chart | Operation::Correlation)
    }

    /// Message used when the operation fails
    fn failure_prefix(self) -> &'static str {
        match self {
            Operation::Clean => "Cleaning failed",
            Operation::Stats => "Statistics failed",
            Operation::Sort => "Sorting failed",
            Operation::Group => "Grouping failed, check the column types",
            Operation::Chart => "Chart generation failed",
            Operation::Correlation => "Correlation failed",
        }
    }

    pub fn failure_message(self, err: &AppError) -> String {
        format!("{}: {}", self.failure_prefix(), err.user_message())
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Clean => write!(f, "clean"),
            Operation::Stats => write!(f, "stats"),
            Operation::Sort => write!(f, "sort"),
            Operation::Group => write!(f, "group"),
            Operation::Chart => write!(f, "chart"),
            Operation::Correlation => write!(f, "correlation"),
        }
    }
}

/// A request ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisCall {
    Clean(CleanRequest),
    Stats(StatsRequest),
    Sort(SortRequest),
    Group(GroupRequest),
    Chart(ChartRequest),
}

/// Build the request for `operation`. Every selection field used is checked
/// against the dataset's columns first.
pub fn build_call(
    operation: Operation,
    dataset: &DatasetDescriptor,
    selection: &SelectionState,
    chart_type: ChartType,
) -> AppResult<AnalysisCall> {
    let filename = dataset.filename.clone();

    let call = match operation {
        Operation::Clean => AnalysisCall::Clean(CleanRequest { filename }),
        Operation::Stats => AnalysisCall::Stats(StatsRequest {
            filename,
            column: selection.checked(SelectionField::Stats, dataset)?,
        }),
        Operation::Sort => AnalysisCall::Sort(SortRequest {
            filename,
            column: selection.checked(SelectionField::Sort, dataset)?,
            order: SORT_ORDER,
        }),
        Operation::Group => AnalysisCall::Group(GroupRequest {
            filename,
            group_col: selection.checked(SelectionField::Group, dataset)?,
            agg_col: selection.checked(SelectionField::Agg, dataset)?,
            method: AGG_METHOD,
        }),
        Operation::Chart | Operation::Correlation => {
            let chart_type = if operation == Operation::Correlation {
                ChartType::Heatmap
            } else {
                chart_type
            };
            let config = ChartConfig::resolve(chart_type, selection, dataset)?;
            AnalysisCall::Chart(ChartRequest {
                filename,
                chart_type: config.chart_type,
                label_col: config.label_column,
                value_col: config.value_column,
            })
        }
    };
    Ok(call)
}

/// Output of a completed call, before routing
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutput {
    Clean(CleanReport),
    Stats(StatsTable),
    Table(Vec<Row>),
    Chart(ChartSpec),
}

pub async fn execute(service: &dyn AnalysisService, call: &AnalysisCall) -> AppResult<CallOutput> {
    debug!(?call, "Executing analysis call");
    match call {
        AnalysisCall::Clean(request) => service.clean(request).await.map(CallOutput::Clean),
        AnalysisCall::Stats(request) => service.stats(request).await.map(CallOutput::Stats),
        AnalysisCall::Sort(request) => service.sort(request).await.map(CallOutput::Table),
        AnalysisCall::Group(request) => service.group(request).await.map(CallOutput::Table),
        AnalysisCall::Chart(request) => service.chart(request).await.map(CallOutput::Chart),
    }
}

/// A chart ready to draw: the server spec and its adapted option
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub spec: ChartSpec,
    pub option: ChartOption,
}

/// The one result currently on display
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActiveResult {
    #[default]
    Idle,
    Clean(CleanReport),
    Stats(StatsTable),
    Table { source: Operation, rows: Vec<Row> },
    Chart(ChartView),
    Failed { operation: Operation, message: String },
}

impl ActiveResult {
    /// Table rows on display; empty unless the active result is a table.
    pub fn table(&self) -> &[Row] {
        match self {
            ActiveResult::Table { rows, .. } => rows,
            _ => &[],
        }
    }

    pub fn stats(&self) -> Option<&StatsTable> {
        match self {
            ActiveResult::Stats(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn chart(&self) -> Option<&ChartView> {
        match self {
            ActiveResult::Chart(view) => Some(view),
            _ => None,
        }
    }

    pub fn clean(&self) -> Option<&CleanReport> {
        match self {
            ActiveResult::Clean(report) => Some(report),
            _ => None,
        }
    }
}

/// Route a call's output to the result it displays as. Charts go through
/// the adapter; an unhandled chart type is returned as an error so the
/// caller can render nothing.
pub fn route(operation: Operation, output: CallOutput) -> Result<ActiveResult, UnhandledChart> {
    let result = match output {
        CallOutput::Clean(report) => ActiveResult::Clean(report),
        CallOutput::Stats(stats) => ActiveResult::Stats(stats),
        CallOutput::Table(rows) => ActiveResult::Table {
            source: operation,
            rows,
        },
        CallOutput::Chart(spec) => {
            let option = adapt(&spec)?;
            ActiveResult::Chart(ChartView { spec, option })
        }
    };
    Ok(result)
}

/// Identifies one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(pub u64);

/// Monotonic source of [`Generation`]s
#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: u64,
}

impl GenerationCounter {
    pub fn issue(&mut self) -> Generation {
        self.latest += 1;
        Generation(self.latest)
    }

    pub fn latest(&self) -> Generation {
        Generation(self.latest)
    }

    pub fn is_latest(&self, generation: Generation) -> bool {
        generation.0 == self.latest
    }
}
