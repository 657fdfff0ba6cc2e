//! File backend that keeps everything in process. Backs `--offline` runs of
//! the `file_actions` CLI and the tests.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{FileId, FileTarget, StorageRef},
    protocol::{DeleteRequest, FileMutation, RenameRequest, UpdateGranteesRequest},
};
use tokio::sync::Mutex;
use url::Url;

use crate::gateway::FileBackend;

#[derive(Default)]
struct InMemoryState {
    files: HashMap<FileId, FileTarget>,
    calls: Vec<FileMutation>,
    reject_all: bool,
}

pub struct InMemoryFileBackend {
    inner: Mutex<InMemoryState>,
    download_base: Url,
}

impl InMemoryFileBackend {
    pub fn new(download_base: Url) -> Result<Self> {
        if download_base.cannot_be_a_base() {
            return Err(anyhow!("download base '{download_base}' cannot carry a path"));
        }
        Ok(Self {
            inner: Mutex::new(InMemoryState::default()),
            download_base,
        })
    }

    pub async fn insert(&self, file: FileTarget) {
        self.inner.lock().await.files.insert(file.id.clone(), file);
    }

    pub async fn file(&self, file_id: &FileId) -> Option<FileTarget> {
        self.inner.lock().await.files.get(file_id).cloned()
    }

    /// Every mutation received so far, accepted or not.
    pub async fn calls(&self) -> Vec<FileMutation> {
        self.inner.lock().await.calls.clone()
    }

    pub async fn set_rejecting(&self, reject_all: bool) {
        self.inner.lock().await.reject_all = reject_all;
    }
}

#[async_trait]
impl FileBackend for InMemoryFileBackend {
    async fn rename(&self, request: RenameRequest) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(FileMutation::Rename(request.clone()));
        if inner.reject_all {
            return Err(anyhow!("rename rejected for {}", request.file_id));
        }
        if request.name.trim().is_empty() {
            return Err(anyhow!("file name must not be empty"));
        }
        let file = inner
            .files
            .get_mut(&request.file_id)
            .ok_or_else(|| anyhow!("file {} not found", request.file_id))?;
        file.display_name = request.name;
        Ok(())
    }

    async fn update_grantees(&self, request: UpdateGranteesRequest) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(FileMutation::UpdateGrantees(request.clone()));
        if inner.reject_all {
            return Err(anyhow!("grantee update rejected for {}", request.file_id));
        }
        let file = inner
            .files
            .get_mut(&request.file_id)
            .ok_or_else(|| anyhow!("file {} not found", request.file_id))?;
        file.grantees = request.identities;
        Ok(())
    }

    async fn delete(&self, request: DeleteRequest) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(FileMutation::Delete(request.clone()));
        if inner.reject_all {
            return Err(anyhow!("delete rejected for {}", request.file_id));
        }
        match inner.files.get(&request.file_id) {
            Some(file) if file.storage_ref != request.storage_ref => {
                return Err(anyhow!(
                    "storage reference {} does not belong to file {}",
                    request.storage_ref,
                    request.file_id
                ));
            }
            Some(_) => {}
            None => return Err(anyhow!("file {} not found", request.file_id)),
        }
        inner.files.remove(&request.file_id);
        Ok(())
    }

    fn download_link(&self, storage_ref: &StorageRef) -> Url {
        let mut url = self.download_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["files", storage_ref.as_str(), "download"]);
        }
        url
    }
}
