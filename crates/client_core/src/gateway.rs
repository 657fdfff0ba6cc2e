//! Boundary between the action controller and whatever stores the files.

use std::sync::{Arc, RwLock};

use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{FileId, Location, StorageRef},
    protocol::{DeleteRequest, FileMutation, RenameRequest, UpdateGranteesRequest},
};
use tracing::{debug, warn};
use url::Url;

#[async_trait]
pub trait FileBackend: Send + Sync {
    async fn rename(&self, request: RenameRequest) -> Result<()>;
    async fn update_grantees(&self, request: UpdateGranteesRequest) -> Result<()>;
    async fn delete(&self, request: DeleteRequest) -> Result<()>;
    fn download_link(&self, storage_ref: &StorageRef) -> Url;
}

pub trait LocationProvider: Send + Sync {
    fn current_location(&self) -> Location;
}

impl LocationProvider for Location {
    fn current_location(&self) -> Location {
        self.clone()
    }
}

/// Location that the navigation layer updates as the user moves around.
#[derive(Clone, Default)]
pub struct NavigationContext {
    current: Arc<RwLock<Location>>,
}

impl NavigationContext {
    pub fn new(location: Location) -> Self {
        Self {
            current: Arc::new(RwLock::new(location)),
        }
    }

    pub fn navigate(&self, location: Location) {
        let mut current = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *current = location;
    }
}

impl LocationProvider for NavigationContext {
    fn current_location(&self) -> Location {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Wraps a [`FileBackend`] so that every failure reaches the controller as a
/// plain `false`.
#[derive(Clone)]
pub struct BackendGateway {
    backend: Arc<dyn FileBackend>,
    location: Arc<dyn LocationProvider>,
}

impl BackendGateway {
    pub fn new(backend: Arc<dyn FileBackend>, location: Arc<dyn LocationProvider>) -> Self {
        Self { backend, location }
    }

    pub fn current_location(&self) -> Location {
        self.location.current_location()
    }

    pub async fn rename(&self, request: RenameRequest) -> bool {
        let file_id = request.file_id.clone();
        let result = self.backend.rename(request).await;
        settle(&file_id, "rename", result)
    }

    pub async fn update_grantees(&self, request: UpdateGranteesRequest) -> bool {
        let file_id = request.file_id.clone();
        let result = self.backend.update_grantees(request).await;
        settle(&file_id, "update_grantees", result)
    }

    pub async fn delete(&self, request: DeleteRequest) -> bool {
        let file_id = request.file_id.clone();
        let result = self.backend.delete(request).await;
        settle(&file_id, "delete", result)
    }

    /// Routes a prepared mutation to the matching backend operation.
    pub async fn execute(&self, mutation: FileMutation) -> bool {
        match mutation {
            FileMutation::Rename(request) => self.rename(request).await,
            FileMutation::UpdateGrantees(request) => self.update_grantees(request).await,
            FileMutation::Delete(request) => self.delete(request).await,
        }
    }

    pub fn download_link(&self, storage_ref: &StorageRef) -> Url {
        self.backend.download_link(storage_ref)
    }
}

fn settle(file_id: &FileId, operation: &'static str, result: Result<()>) -> bool {
    match result {
        Ok(()) => {
            debug!(%file_id, operation, "file mutation accepted");
            true
        }
        Err(error) => {
            warn!(%file_id, operation, error = %format!("{error:#}"), "file mutation failed");
            false
        }
    }
}
