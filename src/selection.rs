//! Selection State
//!
//! Column choices that drive each analysis operation. The only bulk
//! transition is [`SelectionState::derive`], run whenever the dataset is
//! replaced; everything else edits one field at a time.

use serde::{Deserialize, Serialize};

use crate::models::DatasetDescriptor;
use crate::types::{AppError, AppResult};

/// Identifies one column choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionField {
    Stats,
    Sort,
    Group,
    Agg,
    ChartLabel,
    ChartValue,
}

impl SelectionField {
    pub const ALL: [SelectionField; 6] = [
        SelectionField::Stats,
        SelectionField::Sort,
        SelectionField::Group,
        SelectionField::Agg,
        SelectionField::ChartLabel,
        SelectionField::ChartValue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SelectionField::Stats => "Stats",
            SelectionField::Sort => "Sort by",
            SelectionField::Group => "Group by",
            SelectionField::Agg => "Aggregate",
            SelectionField::ChartLabel => "Chart label",
            SelectionField::ChartValue => "Chart value",
        }
    }
}

impl std::fmt::Display for SelectionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionField::Stats => write!(f, "stats column"),
            SelectionField::Sort => write!(f, "sort column"),
            SelectionField::Group => write!(f, "group column"),
            SelectionField::Agg => write!(f, "aggregate column"),
            SelectionField::ChartLabel => write!(f, "chart label column"),
            SelectionField::ChartValue => write!(f, "chart value column"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub stats_column: String,
    pub sort_column: String,
    pub group_column: String,
    pub agg_column: String,
    pub chart_label_column: String,
    pub chart_value_column: String,
}

impl SelectionState {
    /// Default choices for a freshly loaded dataset: the first column for
    /// stats, sort, group and chart labels; the second column (or the first
    /// when there is only one) for aggregation and chart values.
    pub fn derive(dataset: &DatasetDescriptor) -> AppResult<Self> {
        let first = dataset.columns.first().cloned().ok_or(AppError::EmptyDataset)?;
        let second = dataset
            .columns
            .get(1)
            .cloned()
            .unwrap_or_else(|| first.clone());

        Ok(Self {
            stats_column: first.clone(),
            sort_column: first.clone(),
            group_column: first.clone(),
            agg_column: second.clone(),
            chart_label_column: first,
            chart_value_column: second,
        })
    }

    pub fn get(&self, field: SelectionField) -> &str {
        match field {
            SelectionField::Stats => &self.stats_column,
            SelectionField::Sort => &self.sort_column,
            SelectionField::Group => &self.group_column,
            SelectionField::Agg => &self.agg_column,
            SelectionField::ChartLabel => &self.chart_label_column,
            SelectionField::ChartValue => &self.chart_value_column,
        }
    }

    fn slot_mut(&mut self, field: SelectionField) -> &mut String {
        match field {
            SelectionField::Stats => &mut self.stats_column,
            SelectionField::Sort => &mut self.sort_column,
            SelectionField::Group => &mut self.group_column,
            SelectionField::Agg => &mut self.agg_column,
            SelectionField::ChartLabel => &mut self.chart_label_column,
            SelectionField::ChartValue => &mut self.chart_value_column,
        }
    }

    /// Set a single field. The column must belong to `dataset`.
    pub fn set(
        &mut self,
        field: SelectionField,
        column: &str,
        dataset: &DatasetDescriptor,
    ) -> AppResult<()> {
        if !dataset.has_column(column) {
            return Err(AppError::UnknownColumn {
                field,
                column: column.to_string(),
            });
        }
        *self.slot_mut(field) = column.to_string();
        Ok(())
    }

    /// Read a field, checking it still names a column of `dataset`.
    pub fn checked(&self, field: SelectionField, dataset: &DatasetDescriptor) -> AppResult<String> {
        let column = self.get(field);
        if dataset.has_column(column) {
            Ok(column.to_string())
        } else {
            Err(AppError::UnknownColumn {
                field,
                column: column.to_string(),
            })
        }
    }

    /// Move a field to the next (or previous) column of `dataset`, wrapping.
    pub fn cycle(&mut self, field: SelectionField, dataset: &DatasetDescriptor, forward: bool) {
        let len = dataset.columns.len();
        if len == 0 {
            return;
        }
        let current = dataset
            .columns
            .iter()
            .position(|c| c == self.get(field));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, _) => 0,
        };
        *self.slot_mut(field) = dataset.columns[next].clone();
    }
}

/// Chart kinds the user can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
    Heatmap,
}

impl ChartType {
    pub fn next(self) -> Self {
        match self {
            ChartType::Bar => ChartType::Line,
            ChartType::Line => ChartType::Pie,
            ChartType::Pie => ChartType::Heatmap,
            ChartType::Heatmap => ChartType::Bar,
        }
    }

    /// Heatmaps plot every numeric column against every other, so no
    /// label/value columns apply.
    pub fn uses_columns(self) -> bool {
        !matches!(self, ChartType::Heatmap)
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartType::Bar => write!(f, "bar"),
            ChartType::Line => write!(f, "line"),
            ChartType::Pie => write!(f, "pie"),
            ChartType::Heatmap => write!(f, "heatmap"),
        }
    }
}

/// What the user asked to chart, resolved against the current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartConfig {
    pub chart_type: ChartType,
    /// Empty for heatmaps
    pub label_column: String,
    /// Empty for heatmaps
    pub value_column: String,
}

impl ChartConfig {
    pub fn resolve(
        chart_type: ChartType,
        selection: &SelectionState,
        dataset: &DatasetDescriptor,
    ) -> AppResult<Self> {
        if !chart_type.uses_columns() {
            return Ok(Self {
                chart_type,
                label_column: String::new(),
                value_column: String::new(),
            });
        }

        Ok(Self {
            chart_type,
            label_column: selection.checked(SelectionField::ChartLabel, dataset)?,
            value_column: selection.checked(SelectionField::ChartValue, dataset)?,
        })
    }
}
