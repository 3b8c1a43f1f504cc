// Wire models for the analysis service and the dataset descriptor

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use crate::selection::ChartType;
use crate::types::{AppError, AppResult};

/// One row of a tabular result, keyed by column name.
pub type Row = serde_json::Map<String, Value>;

/// Metric name -> value, as returned by `/analyze/stats`.
pub type StatsTable = BTreeMap<String, Value>;

/// Metadata of the uploaded table. Replaced wholesale on every upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    /// Server-side name used to address the dataset in later requests
    pub filename: String,
    /// Name of the file the user picked
    pub original_filename: String,
    pub row_count: u64,
    /// Ordered, unique column names (never empty)
    pub columns: Vec<String>,
}

impl DatasetDescriptor {
    /// Build a descriptor, dropping repeated column names and rejecting
    /// column-less datasets.
    pub fn new(
        filename: impl Into<String>,
        original_filename: impl Into<String>,
        row_count: u64,
        columns: Vec<String>,
    ) -> AppResult<Self> {
        let mut unique: Vec<String> = Vec::with_capacity(columns.len());
        for column in columns {
            if unique.contains(&column) {
                warn!(column = %column, "Duplicate column name in upload response, ignoring");
                continue;
            }
            unique.push(column);
        }

        if unique.is_empty() {
            return Err(AppError::EmptyDataset);
        }

        Ok(Self {
            filename: filename.into(),
            original_filename: original_filename.into(),
            row_count,
            columns: unique,
        })
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Sort direction understood by `/analyze/sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Aggregation understood by `/analyze/group`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggMethod {
    #[default]
    Sum,
    Mean,
    Count,
    Max,
    Min,
}

// Request bodies

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanRequest {
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRequest {
    pub filename: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortRequest {
    pub filename: String,
    pub column: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRequest {
    pub filename: String,
    pub group_col: String,
    pub agg_col: String,
    pub method: AggMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRequest {
    pub filename: String,
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    /// Blank for heatmaps
    pub label_col: String,
    /// Blank for heatmaps
    pub value_col: String,
}

// Response bodies

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub filename: String,
    #[serde(default)]
    pub original_filename: Option<String>,
    pub rows: u64,
    pub columns: Vec<String>,
}

impl UploadResponse {
    /// Convert into a descriptor. `picked_name` stands in when the service
    /// does not echo the original name back.
    pub fn into_descriptor(self, picked_name: &str) -> AppResult<DatasetDescriptor> {
        let original = self
            .original_filename
            .unwrap_or_else(|| picked_name.to_string());
        DatasetDescriptor::new(self.filename, original, self.rows, self.columns)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    pub stats: StatsTable,
}

impl StatsResponse {
    /// The service reports "no numeric values" as `{"error": "..."}` inside `stats`.
    pub fn into_stats(self) -> AppResult<StatsTable> {
        if let Some(Value::String(message)) = self.stats.get("error") {
            return Err(AppError::Validation(message.clone()));
        }
        Ok(self.stats)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableResponse {
    pub data: Vec<Row>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart_config: Value,
}

/// Result of `/analyze/clean`. Displayed, never interpreted by the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleanReport(pub Value);

impl CleanReport {
    fn count(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    pub fn original_rows(&self) -> Option<u64> {
        self.count("original_rows")
    }

    pub fn cleaned_rows(&self) -> Option<u64> {
        self.count("cleaned_rows")
    }

    pub fn removed_rows(&self) -> Option<u64> {
        self.count("removed_rows")
    }

    /// Preview rows, when the report carries any
    pub fn preview(&self) -> Vec<Row> {
        self.0
            .get("preview")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .filter_map(|r| r.as_object().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        match (self.original_rows(), self.cleaned_rows(), self.removed_rows()) {
            (Some(original), Some(cleaned), Some(removed)) => format!(
                "{} rows before, {} rows after, {} removed",
                original, cleaned, removed
            ),
            _ => self.0.to_string(),
        }
    }
}

/// Render a JSON scalar the way a table cell shows it.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_rejects_empty_columns() {
        let err = DatasetDescriptor::new("a.csv", "a.csv", 0, vec![]).unwrap_err();
        assert_eq!(err, AppError::EmptyDataset);
    }

    #[test]
    fn test_descriptor_drops_duplicate_columns() {
        let d = DatasetDescriptor::new(
            "a.csv",
            "a.csv",
            3,
            vec!["A".into(), "B".into(), "A".into()],
        )
        .unwrap();
        assert_eq!(d.columns, vec!["A".to_string(), "B".to_string()]);
        assert!(d.has_column("B"));
        assert!(!d.has_column("C"));
    }

    #[test]
    fn test_upload_response_falls_back_to_picked_name() {
        let resp: UploadResponse = serde_json::from_value(json!({
            "status": "success",
            "filename": "4f2a.csv",
            "columns": ["city", "sales"],
            "rows": 12
        }))
        .unwrap();
        let d = resp.into_descriptor("sales.csv").unwrap();
        assert_eq!(d.filename, "4f2a.csv");
        assert_eq!(d.original_filename, "sales.csv");
        assert_eq!(d.row_count, 12);
    }

    #[test]
    fn test_request_serialization_matches_service_contract() {
        let sort = SortRequest {
            filename: "f.csv".into(),
            column: "price".into(),
            order: SortOrder::Desc,
        };
        assert_eq!(
            serde_json::to_value(&sort).unwrap(),
            json!({"filename": "f.csv", "column": "price", "order": "desc"})
        );

        let group = GroupRequest {
            filename: "f.csv".into(),
            group_col: "city".into(),
            agg_col: "sales".into(),
            method: AggMethod::Sum,
        };
        assert_eq!(
            serde_json::to_value(&group).unwrap(),
            json!({"filename": "f.csv", "group_col": "city", "agg_col": "sales", "method": "sum"})
        );

        let chart = ChartRequest {
            filename: "f.csv".into(),
            chart_type: ChartType::Heatmap,
            label_col: String::new(),
            value_col: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&chart).unwrap(),
            json!({"filename": "f.csv", "type": "heatmap", "label_col": "", "value_col": ""})
        );
    }

    #[test]
    fn test_stats_error_payload_is_validation() {
        let resp: StatsResponse = serde_json::from_value(json!({
            "status": "success",
            "stats": {"error": "column has no numeric values"}
        }))
        .unwrap();
        assert_eq!(
            resp.into_stats().unwrap_err(),
            AppError::Validation("column has no numeric values".into())
        );
    }

    #[test]
    fn test_clean_report_summary() {
        let report = CleanReport(json!({
            "status": "success",
            "original_rows": 10,
            "cleaned_rows": 8,
            "removed_rows": 2,
            "preview": [{"a": 1}, {"a": 2}]
        }));
        assert_eq!(report.summary(), "10 rows before, 8 rows after, 2 removed");
        assert_eq!(report.preview().len(), 2);

        let opaque = CleanReport(json!({"note": "ok"}));
        assert_eq!(opaque.summary(), r#"{"note":"ok"}"#);
        assert!(opaque.preview().is_empty());
    }
}
