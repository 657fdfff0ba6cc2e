use serde::{Deserialize, Serialize};

use crate::domain::{FileId, Location, StorageRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRequest {
    pub file_id: FileId,
    pub name: String,
    pub extension: String,
    pub location: Location,
}

/// Replaces the full grantee set of a file; this is not a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateGranteesRequest {
    pub file_id: FileId,
    pub identities: Vec<String>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub file_id: FileId,
    pub storage_ref: StorageRef,
    pub location: Location,
}

/// One mutation the action surface can ask the backend for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum FileMutation {
    Rename(RenameRequest),
    UpdateGrantees(UpdateGranteesRequest),
    Delete(DeleteRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationAck {
    pub file_id: FileId,
}
