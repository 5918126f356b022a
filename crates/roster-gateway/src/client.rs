//! reqwest implementation of the backend gateway.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::multipart::{Form, Part};
use roster_model::{
    ColumnMapping, FileIntrospection, MergeResult, MultiUpload, ProcessResponse,
    ProcessingResult, SampleFormat, SessionId, UploadResponse, UploadedFile,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::detail::error_message;
use crate::error::{GatewayError, Result};

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("roster-ingest/", env!("CARGO_PKG_VERSION"));

/// Calls the upload flow makes against the backend.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Upload a file and receive its columns, suggestions, and sample rows.
    async fn upload_file(&self, file: &UploadedFile) -> Result<FileIntrospection>;

    /// Ingest a previously uploaded file under `mapping`.
    async fn process_data(
        &self,
        mapping: &ColumnMapping,
        session_id: &SessionId,
        file: &UploadedFile,
    ) -> Result<ProcessingResult>;

    /// Reference layout for new uploads.
    async fn sample_format(&self) -> Result<SampleFormat>;

    /// Upload per-source files to be merged by `student_id` and stored.
    async fn multi_upload(
        &self,
        upload: &MultiUpload,
        session_id: &SessionId,
    ) -> Result<MergeResult>;
}

/// Gateway over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGateway {
    /// Creates a client with the configured timeout.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|e| GatewayError::Config(format!("{}: {e}", config.base_url)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Multipart part holding the file's bytes.
    async fn file_part(file: &UploadedFile) -> Result<Part> {
        let bytes = tokio::fs::read(&file.path).await.map_err(|e| {
            GatewayError::Io(format!("{}: {e}", file.path.display()))
        })?;
        let part = Part::bytes(bytes).file_name(file.name.clone());
        match file.format() {
            Some(format) => Ok(part.mime_str(format.mime_type())?),
            None => Ok(part),
        }
    }

    /// Checks the status and decodes a 2xx body into `T`.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown Status");
            let message = error_message(status.as_u16(), reason, &body);
            warn!(status = status.as_u16(), error = %message, "request failed");
            return Err(GatewayError::Http {
                status: status.as_u16(),
                message,
            });
        }

        debug!(status = status.as_u16(), bytes = body.len(), "response received");
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn upload_file(&self, file: &UploadedFile) -> Result<FileIntrospection> {
        let url = self.config.endpoint("upload-file");
        debug!(%url, file = %file.name, size = file.size, "uploading file");

        let form = Form::new().part("file", Self::file_part(file).await?);
        let response = self.client.post(&url).multipart(form).send().await?;
        let body: UploadResponse = Self::handle_response(response).await?;

        Ok(FileIntrospection::try_from(body)?)
    }

    async fn process_data(
        &self,
        mapping: &ColumnMapping,
        session_id: &SessionId,
        file: &UploadedFile,
    ) -> Result<ProcessingResult> {
        let url = self.config.endpoint("process-data");
        debug!(%url, session = %session_id, mapped = mapping.len(), "submitting for processing");

        let form = Form::new()
            .part("file", Self::file_part(file).await?)
            .text("mappings", serde_json::to_string(mapping)?)
            .text("session_id", session_id.as_str().to_string());
        let response = self.client.post(&url).multipart(form).send().await?;
        let body: ProcessResponse = Self::handle_response(response).await?;

        Ok(ProcessingResult::from(body))
    }

    async fn sample_format(&self) -> Result<SampleFormat> {
        let url = self.config.endpoint("sample-format");
        debug!(%url, "fetching sample format");

        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    async fn multi_upload(
        &self,
        upload: &MultiUpload,
        session_id: &SessionId,
    ) -> Result<MergeResult> {
        let url = self.config.endpoint("multi-upload");
        debug!(%url, session = %session_id, files = upload.len(), "uploading sources");

        let mut form = Form::new();
        for (kind, file) in upload.iter() {
            form = form.part(kind.form_field(), Self::file_part(file).await?);
        }
        let form = form.text("session_id", session_id.as_str().to_string());
        let response = self.client.post(&url).multipart(form).send().await?;
        Self::handle_response(response).await
    }
}
