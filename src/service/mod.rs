// Remote analysis service abstraction

pub mod http;

use async_trait::async_trait;

use crate::chart::ChartSpec;
use crate::models::{
    ChartRequest, CleanReport, CleanRequest, GroupRequest, Row, SortRequest, StatsRequest,
    StatsTable, UploadResponse,
};
use crate::types::AppResult;
use crate::upload::UploadFile;

pub use http::HttpAnalysisService;

/// The operations the analysis service exposes. Every method is one request.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn upload(&self, file: &UploadFile) -> AppResult<UploadResponse>;

    async fn clean(&self, request: &CleanRequest) -> AppResult<CleanReport>;

    async fn stats(&self, request: &StatsRequest) -> AppResult<StatsTable>;

    async fn sort(&self, request: &SortRequest) -> AppResult<Vec<Row>>;

    async fn group(&self, request: &GroupRequest) -> AppResult<Vec<Row>>;

    async fn chart(&self, request: &ChartRequest) -> AppResult<ChartSpec>;
}
