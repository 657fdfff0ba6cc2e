//! [`FileBackend`] talking JSON to a remote file service.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use shared::{
    domain::{FileId, StorageRef},
    error::{ApiError, ApiException},
    protocol::{DeleteRequest, MutationAck, RenameRequest, UpdateGranteesRequest},
};
use tracing::warn;
use url::Url;

use crate::{config::ClientSettings, gateway::FileBackend};

pub struct HttpFileBackend {
    http: Client,
    server_url: String,
    storage_base: Url,
    bucket: String,
    project: String,
}

impl HttpFileBackend {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;

        Ok(Self {
            http,
            server_url: settings.server_base(),
            storage_base: settings.storage_base()?,
            bucket: settings.storage_bucket.clone(),
            project: settings.storage_project.clone(),
        })
    }

    async fn send(&self, file_id: &FileId, request: RequestBuilder) -> Result<()> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return match serde_json::from_str::<ApiError>(&body) {
                Ok(api_error) => Err(ApiException::from(api_error).into()),
                Err(_) => Err(anyhow!("file service answered {status} for {file_id}")),
            };
        }

        // Older deployments answer with an empty body.
        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(());
        }
        let ack: MutationAck =
            serde_json::from_slice(&body).context("invalid acknowledgement from file service")?;
        if &ack.file_id != file_id {
            warn!(expected = %file_id, acknowledged = %ack.file_id, "file service acknowledged a different file");
        }
        Ok(())
    }
}

#[async_trait]
impl FileBackend for HttpFileBackend {
    async fn rename(&self, request: RenameRequest) -> Result<()> {
        let file_id = request.file_id.clone();
        let builder = self
            .http
            .post(format!("{}/files/{file_id}/rename", self.server_url))
            .json(&request);
        self.send(&file_id, builder).await
    }

    async fn update_grantees(&self, request: UpdateGranteesRequest) -> Result<()> {
        let file_id = request.file_id.clone();
        let builder = self
            .http
            .put(format!("{}/files/{file_id}/grantees", self.server_url))
            .json(&request);
        self.send(&file_id, builder).await
    }

    async fn delete(&self, request: DeleteRequest) -> Result<()> {
        let file_id = request.file_id.clone();
        let builder = self
            .http
            .delete(format!("{}/files/{file_id}", self.server_url))
            .json(&request);
        self.send(&file_id, builder).await
    }

    fn download_link(&self, storage_ref: &StorageRef) -> Url {
        let mut url = self.storage_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "storage",
                "buckets",
                self.bucket.as_str(),
                "files",
                storage_ref.as_str(),
                "download",
            ]);
        }
        url.query_pairs_mut().append_pair("project", &self.project);
        url
    }
}

#[cfg(test)]
#[path = "tests/http_backend_tests.rs"]
mod tests;
