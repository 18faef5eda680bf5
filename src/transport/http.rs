//! reqwest-backed [`ChartService`].
//!
//! Every call posts a multipart form and maps any network, status, or body
//! failure into a [`TransportError`] tagged with the operation.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use tracing::{debug, warn};

use crate::core::{ChartConfig, SourceFile};
use crate::error::{PipelineError, PipelineResult};

use super::wire::{self, COLUMNS_PATH, GENERATE_PATH, UPLOAD_PATH};
use super::{ChartService, GeneratedChart, Operation, ServiceConfig, TransportError};

/// HTTP client for the chart service (async, no retries).
#[derive(Debug, Clone)]
pub struct HttpChartService {
    http: reqwest::Client,
    config: ServiceConfig,
}

impl HttpChartService {
    pub fn new(config: ServiceConfig) -> PipelineResult<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| PipelineError::InvalidConfig(format!("failed to build http client: {e}")))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    async fn post_form(
        &self,
        operation: Operation,
        path: &str,
        form: Form,
    ) -> Result<reqwest::Response, TransportError> {
        let url = self.config.endpoint(path);
        debug!(operation = operation.as_str(), url = %url, "posting form");

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::new(operation, format!("network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                operation = operation.as_str(),
                status = status.as_u16(),
                "service returned an error status"
            );
            return Err(TransportError::new(
                operation,
                format!("HTTP {}: {}", status.as_u16(), body),
            ));
        }

        Ok(response)
    }

    async fn read_body(
        operation: Operation,
        response: reqwest::Response,
    ) -> Result<Vec<u8>, TransportError> {
        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| TransportError::new(operation, format!("failed to read body: {e}")))
    }
}

#[async_trait]
impl ChartService for HttpChartService {
    async fn discover_sheets(&self, file: &SourceFile) -> Result<Vec<String>, TransportError> {
        let operation = Operation::DiscoverSheets;
        let form = wire::build_form(operation, file, Vec::new())?;
        let response = self.post_form(operation, UPLOAD_PATH, form).await?;
        let body = Self::read_body(operation, response).await?;
        wire::decode_name_list(operation, &body)
    }

    async fn discover_columns(
        &self,
        file: &SourceFile,
        sheet: &str,
    ) -> Result<Vec<String>, TransportError> {
        let operation = Operation::DiscoverColumns;
        let fields = vec![("sheet_name", sheet.to_owned())];
        let form = wire::build_form(operation, file, fields)?;
        let response = self.post_form(operation, COLUMNS_PATH, form).await?;
        let body = Self::read_body(operation, response).await?;
        wire::decode_name_list(operation, &body)
    }

    async fn generate_chart(
        &self,
        file: &SourceFile,
        sheet: &str,
        config: &ChartConfig,
    ) -> Result<GeneratedChart, TransportError> {
        let operation = Operation::GenerateChart;
        let form = wire::build_form(operation, file, wire::generate_fields(sheet, config))?;
        let response = self.post_form(operation, GENERATE_PATH, form).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        // Raw bytes for every format; preview bodies are parsed afterwards.
        let body = Self::read_body(operation, response).await?;
        debug!(
            operation = operation.as_str(),
            format = config.format.code(),
            len = body.len(),
            "generation response received"
        );
        wire::decode_generate_body(config.format, body, content_type)
    }
}
