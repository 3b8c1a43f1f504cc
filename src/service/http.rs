// HTTP implementation of the analysis service (JSON over POST, multipart upload)

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::AnalysisService;
use crate::chart::ChartSpec;
use crate::models::{
    ChartRequest, ChartResponse, CleanReport, CleanRequest, GroupRequest, Row, SortRequest,
    StatsRequest, StatsResponse, StatsTable, TableResponse, UploadResponse,
};
use crate::types::{AppError, AppResult};
use crate::upload::UploadFile;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// Error body shape of the service (`HTTPException(detail=...)`)
#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

pub struct HttpAnalysisService {
    client: Client,
    base_url: String,
}

impl HttpAnalysisService {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, "POST");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = service_detail(&text);
            warn!(status = status.as_u16(), detail = %detail, "Analysis service returned an error");
            return Err(AppError::Service {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Decode(format!("Failed to parse service response: {}", e)))
    }
}

/// Pull the human-readable message out of an error body.
fn service_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => "Request failed".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn upload(&self, file: &UploadFile) -> AppResult<UploadResponse> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)?;
        let form = Form::new().part("file", part);

        debug!(file = %file.name, size = file.bytes.len(), "POST /upload");
        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn clean(&self, request: &CleanRequest) -> AppResult<CleanReport> {
        self.post_json("/analyze/clean", request).await
    }

    async fn stats(&self, request: &StatsRequest) -> AppResult<StatsTable> {
        let response: StatsResponse = self.post_json("/analyze/stats", request).await?;
        response.into_stats()
    }

    async fn sort(&self, request: &SortRequest) -> AppResult<Vec<Row>> {
        let response: TableResponse = self.post_json("/analyze/sort", request).await?;
        Ok(response.data)
    }

    async fn group(&self, request: &GroupRequest) -> AppResult<Vec<Row>> {
        let response: TableResponse = self.post_json("/analyze/group", request).await?;
        Ok(response.data)
    }

    async fn chart(&self, request: &ChartRequest) -> AppResult<ChartSpec> {
        let response: ChartResponse = self.post_json("/analyze/chart", request).await?;
        ChartSpec::from_value(response.chart_config)
    }
}
