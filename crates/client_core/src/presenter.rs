//! Read-only projection of a controller into what the action menu and its
//! modal should show, and the mapping from user intents to controller
//! operations.

use shared::domain::OwnerId;
use url::Url;

use crate::{
    catalog::{ActionCatalog, ActionKey},
    controller::{ActionController, PendingSubmission, Selection, SubmitOutcome, SubmitStart},
    error::ActionError,
    gateway::BackendGateway,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub url: Url,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub key: ActionKey,
    pub label: &'static str,
    pub icon: &'static str,
    /// Set only for the download entry, which is a plain link.
    pub download: Option<DownloadLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMenuView {
    pub open: bool,
    pub header: String,
    /// Inert while a submission is in flight.
    pub trigger_enabled: bool,
    pub entries: Vec<MenuEntry>,
}

impl ActionMenuView {
    pub fn project(controller: &ActionController, gateway: &BackendGateway) -> Self {
        let target = controller.target();
        let state = controller.state();
        let entries = ActionCatalog::list()
            .iter()
            .map(|def| MenuEntry {
                key: def.key,
                label: def.label,
                icon: def.icon,
                download: (def.key == ActionKey::Download).then(|| DownloadLink {
                    url: gateway.download_link(&target.storage_ref),
                    file_name: target.display_name.clone(),
                }),
            })
            .collect();

        Self {
            open: state.menu_open,
            header: target.display_name.clone(),
            trigger_enabled: !state.submitting,
            entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDetails {
    pub name: String,
    pub extension: String,
    pub owner: OwnerId,
    pub shared_with: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalBody {
    RenameInput { value: String },
    Details(FileDetails),
    ShareEditor { grantees: Vec<String> },
    DeleteConfirmation { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalFooter {
    pub cancel_label: &'static str,
    pub submit_label: &'static str,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub title: &'static str,
    pub body: ModalBody,
    pub footer: Option<ModalFooter>,
}

impl ModalView {
    pub fn project(controller: &ActionController) -> Option<Self> {
        let state = controller.state();
        if !state.modal_open {
            return None;
        }
        let definition = state.selected_action?;
        let target = controller.target();

        let body = match definition.key {
            ActionKey::Rename => ModalBody::RenameInput {
                value: state.working_name.clone(),
            },
            ActionKey::Details => ModalBody::Details(FileDetails {
                name: target.display_name.clone(),
                extension: target.extension.clone(),
                owner: target.owner.clone(),
                shared_with: target.grantees.len(),
            }),
            ActionKey::Share => ModalBody::ShareEditor {
                grantees: state.grantee_list.to_submit(),
            },
            ActionKey::Delete => ModalBody::DeleteConfirmation {
                message: format!("Are you sure you want to delete {}?", target.display_name),
            },
            ActionKey::Download => return None,
        };

        let footer = definition.has_confirmation().then(|| ModalFooter {
            cancel_label: "Cancel",
            submit_label: definition.key.as_str(),
            loading: state.submitting,
        });

        Some(Self {
            title: definition.label,
            body,
            footer,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent {
    OpenMenu,
    CloseMenu,
    Select(ActionKey),
    EditName(String),
    EditGrantees(String),
    AddGrantee(String),
    Confirm,
    Cancel,
    DismissModal,
    RemoveGrantee(String),
}

impl UserIntent {
    pub fn name(&self) -> &'static str {
        match self {
            UserIntent::OpenMenu => "open_menu",
            UserIntent::CloseMenu => "close_menu",
            UserIntent::Select(_) => "select",
            UserIntent::EditName(_) => "edit_name",
            UserIntent::EditGrantees(_) => "edit_grantees",
            UserIntent::AddGrantee(_) => "add_grantee",
            UserIntent::Confirm => "confirm",
            UserIntent::Cancel => "cancel",
            UserIntent::DismissModal => "dismiss_modal",
            UserIntent::RemoveGrantee(_) => "remove_grantee",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    Applied,
    Ignored,
    Download(DownloadLink),
    Submitted(SubmitOutcome),
    Refused(ActionError),
}

/// Either the intent was fully handled locally, or a backend call has to be
/// made and its answer handed back to the controller.
#[derive(Debug)]
pub enum IntentPlan {
    Done(IntentOutcome),
    Dispatch(PendingSubmission),
}

fn applied(changed: bool) -> IntentOutcome {
    if changed {
        IntentOutcome::Applied
    } else {
        IntentOutcome::Ignored
    }
}

pub fn plan_intent(
    controller: &mut ActionController,
    gateway: &BackendGateway,
    intent: UserIntent,
) -> IntentPlan {
    tracing::debug!(
        file_id = %controller.target().id,
        intent = intent.name(),
        "handling user intent"
    );

    let outcome = match intent {
        UserIntent::OpenMenu => applied(controller.open_menu()),
        UserIntent::CloseMenu => {
            controller.close_menu();
            IntentOutcome::Applied
        }
        UserIntent::Select(key) => match controller.select_action(key) {
            Ok(Selection::Modal(_)) => IntentOutcome::Applied,
            Ok(Selection::Download {
                storage_ref,
                file_name,
            }) => IntentOutcome::Download(DownloadLink {
                url: gateway.download_link(&storage_ref),
                file_name,
            }),
            Err(error) => IntentOutcome::Refused(error),
        },
        UserIntent::EditName(name) => applied(controller.edit_working_name(name)),
        UserIntent::EditGrantees(raw) => applied(controller.edit_grantees(&raw)),
        UserIntent::AddGrantee(identity) => applied(controller.add_grantee(identity)),
        UserIntent::Cancel => {
            controller.close_all();
            IntentOutcome::Applied
        }
        UserIntent::DismissModal => applied(controller.close_modal()),
        UserIntent::Confirm => {
            return submission_plan(controller.begin_submit(gateway.current_location()));
        }
        UserIntent::RemoveGrantee(identity) => {
            return submission_plan(
                controller.begin_remove_grantee(&identity, gateway.current_location()),
            );
        }
    };

    IntentPlan::Done(outcome)
}

fn submission_plan(start: SubmitStart) -> IntentPlan {
    match start {
        SubmitStart::Dispatch(pending) => IntentPlan::Dispatch(pending),
        SubmitStart::Skipped(outcome) => IntentPlan::Done(IntentOutcome::Submitted(outcome)),
    }
}

pub async fn dispatch_intent(
    controller: &mut ActionController,
    gateway: &BackendGateway,
    intent: UserIntent,
) -> IntentOutcome {
    match plan_intent(controller, gateway, intent) {
        IntentPlan::Done(outcome) => outcome,
        IntentPlan::Dispatch(pending) => {
            let success = gateway.execute(pending.mutation().clone()).await;
            IntentOutcome::Submitted(controller.complete_submission(pending, success))
        }
    }
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
