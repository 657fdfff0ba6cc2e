//! Static table of the per-file actions offered in the action menu.

use std::{fmt, str::FromStr};

use crate::error::ActionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKey {
    Rename,
    Share,
    Delete,
    Details,
    Download,
}

impl ActionKey {
    pub const ALL: [ActionKey; 5] = [
        ActionKey::Rename,
        ActionKey::Share,
        ActionKey::Delete,
        ActionKey::Details,
        ActionKey::Download,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKey::Rename => "rename",
            ActionKey::Share => "share",
            ActionKey::Delete => "delete",
            ActionKey::Details => "details",
            ActionKey::Download => "download",
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKey {
    type Err = ActionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key = raw.trim().to_ascii_lowercase();
        ActionKey::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == key)
            .ok_or_else(|| ActionError::InvalidAction(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDefinition {
    pub key: ActionKey,
    pub label: &'static str,
    pub icon: &'static str,
    pub requires_modal: bool,
}

impl ActionDefinition {
    /// Whether the modal for this action ends in a Cancel/Submit footer.
    /// Details opens a read-only modal; download never opens one.
    pub fn has_confirmation(&self) -> bool {
        matches!(
            self.key,
            ActionKey::Rename | ActionKey::Share | ActionKey::Delete
        )
    }
}

const CATALOG: [ActionDefinition; 5] = [
    ActionDefinition {
        key: ActionKey::Rename,
        label: "Rename",
        icon: "/assets/icons/edit.svg",
        requires_modal: true,
    },
    ActionDefinition {
        key: ActionKey::Share,
        label: "Share",
        icon: "/assets/icons/share.svg",
        requires_modal: true,
    },
    ActionDefinition {
        key: ActionKey::Delete,
        label: "Delete",
        icon: "/assets/icons/delete.svg",
        requires_modal: true,
    },
    ActionDefinition {
        key: ActionKey::Details,
        label: "Details",
        icon: "/assets/icons/info.svg",
        requires_modal: true,
    },
    ActionDefinition {
        key: ActionKey::Download,
        label: "Download",
        icon: "/assets/icons/download.svg",
        requires_modal: false,
    },
];

pub struct ActionCatalog;

impl ActionCatalog {
    pub fn list() -> &'static [ActionDefinition] {
        &CATALOG
    }

    pub fn get(key: ActionKey) -> &'static ActionDefinition {
        let index = match key {
            ActionKey::Rename => 0,
            ActionKey::Share => 1,
            ActionKey::Delete => 2,
            ActionKey::Details => 3,
            ActionKey::Download => 4,
        };
        &CATALOG[index]
    }

    pub fn lookup(raw_key: &str) -> Result<&'static ActionDefinition, ActionError> {
        raw_key.parse::<ActionKey>().map(Self::get)
    }
}
