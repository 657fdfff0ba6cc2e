use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(FileId);
id_newtype!(StorageRef);
id_newtype!(OwnerId);

/// Opaque "where the user currently is" token. Passed through to the backend
/// so it can revalidate whatever view produced the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(pub String);

impl Location {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The file a row of actions operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTarget {
    pub id: FileId,
    pub display_name: String,
    pub extension: String,
    pub storage_ref: StorageRef,
    pub owner: OwnerId,
    #[serde(default)]
    pub grantees: Vec<String>,
}

impl FileTarget {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        extension: impl Into<String>,
        storage_ref: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            id: FileId::new(id),
            display_name: display_name.into(),
            extension: extension.into(),
            storage_ref: StorageRef::new(storage_ref),
            owner: OwnerId::new(owner),
            grantees: Vec::new(),
        }
    }

    pub fn with_grantees<I, S>(mut self, grantees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grantees = grantees.into_iter().map(Into::into).collect();
        self
    }
}
