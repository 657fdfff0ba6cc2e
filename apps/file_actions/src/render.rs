//! Plain-text rendering of the action menu and modal projections.

use std::fmt::Write as _;

use client_core::{
    presenter::{ModalBody, ModalView},
    ActionMenuView,
};
use shared::domain::FileTarget;

pub fn menu(view: &ActionMenuView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.header);
    let _ = writeln!(out, "{}", "-".repeat(view.header.chars().count().max(3)));
    for entry in &view.entries {
        match &entry.download {
            Some(link) => {
                let _ = writeln!(out, "  {:<10} {}", entry.label, link.url);
            }
            None => {
                let _ = writeln!(out, "  {}", entry.label);
            }
        }
    }
    out
}

pub fn modal(view: &ModalView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}]", view.title);
    match &view.body {
        ModalBody::RenameInput { value } => {
            let _ = writeln!(out, "  name: {value}");
        }
        ModalBody::Details(details) => {
            let _ = writeln!(out, "  name:   {}", details.name);
            let _ = writeln!(out, "  format: {}", details.extension);
            let _ = writeln!(out, "  owner:  {}", details.owner);
            let _ = writeln!(out, "  shared with {} people", details.shared_with);
        }
        ModalBody::ShareEditor { grantees } => {
            if grantees.is_empty() {
                let _ = writeln!(out, "  not shared");
            }
            for grantee in grantees {
                let _ = writeln!(out, "  - {grantee}");
            }
        }
        ModalBody::DeleteConfirmation { message } => {
            let _ = writeln!(out, "  {message}");
        }
    }
    if let Some(footer) = &view.footer {
        let loading = if footer.loading { " ..." } else { "" };
        let _ = writeln!(
            out,
            "  ({}) ({}{loading})",
            footer.cancel_label, footer.submit_label
        );
    }
    out
}

pub fn target(file: &FileTarget) -> String {
    if file.grantees.is_empty() {
        format!("{} [{}]", file.display_name, file.id)
    } else {
        format!(
            "{} [{}] shared with {}",
            file.display_name,
            file.id,
            file.grantees.join(", ")
        )
    }
}
