//! Per-file action state machine: which action is selected, which surfaces
//! are visible, and what happens when a backend call comes back.

use shared::{
    domain::{FileTarget, Location, StorageRef},
    protocol::{DeleteRequest, FileMutation, RenameRequest, UpdateGranteesRequest},
};
use tracing::{debug, info, warn};

use crate::{
    catalog::{ActionCatalog, ActionDefinition, ActionKey},
    error::ActionError,
    gateway::BackendGateway,
    grantees::GranteeListEditor,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    pub selected_action: Option<ActionDefinition>,
    pub menu_open: bool,
    pub modal_open: bool,
    pub working_name: String,
    pub grantee_list: GranteeListEditor,
    pub submitting: bool,
}

impl ControllerState {
    fn idle(target: &FileTarget) -> Self {
        Self {
            selected_action: None,
            menu_open: false,
            modal_open: false,
            working_name: target.display_name.clone(),
            grantee_list: GranteeListEditor::default(),
            submitting: false,
        }
    }

    pub fn selected_key(&self) -> Option<ActionKey> {
        self.selected_action.map(|def| def.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    MenuOpen,
    ActionSelected,
    Submitting,
}

/// What picking an entry in the menu resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Modal(ActionKey),
    Download {
        storage_ref: StorageRef,
        file_name: String,
    },
}

/// A backend call issued under a particular selection generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    generation: u64,
    key: ActionKey,
    mutation: FileMutation,
}

impl PendingSubmission {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> ActionKey {
        self.key
    }

    pub fn mutation(&self) -> &FileMutation {
        &self.mutation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStart {
    Dispatch(PendingSubmission),
    Skipped(SubmitOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was selected; state is unchanged.
    NoSelection,
    /// Another call for this file has not come back yet.
    AlreadySubmitting,
    /// The selected action has no backend mutation (details, download).
    NothingToSubmit(ActionKey),
    Completed(ActionKey),
    Rejected(ActionKey),
    Stale { issued: u64, current: u64 },
}

impl SubmitOutcome {
    /// Collapses the outcome into the action error taxonomy. `Ok(Some(key))`
    /// means the backend confirmed a mutation.
    pub fn into_result(self) -> Result<Option<ActionKey>, ActionError> {
        match self {
            SubmitOutcome::Completed(key) => Ok(Some(key)),
            SubmitOutcome::NoSelection | SubmitOutcome::NothingToSubmit(_) => Ok(None),
            SubmitOutcome::AlreadySubmitting => Err(ActionError::SubmissionInFlight),
            SubmitOutcome::Rejected(key) => Err(ActionError::BackendRejected(key)),
            SubmitOutcome::Stale { issued, current } => {
                Err(ActionError::StaleResult { issued, current })
            }
        }
    }
}

pub struct ActionController {
    target: FileTarget,
    state: ControllerState,
    generation: u64,
}

impl ActionController {
    pub fn new(target: FileTarget) -> Self {
        let state = ControllerState::idle(&target);
        Self {
            target,
            state,
            generation: 0,
        }
    }

    pub fn target(&self) -> &FileTarget {
        &self.target
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Coarse phase of the selection lifecycle. The menu is tracked on its
    /// own: reopening it over a selected action still reports
    /// `ActionSelected`, so read `state().menu_open` for menu visibility.
    pub fn phase(&self) -> ControllerPhase {
        if self.state.submitting {
            ControllerPhase::Submitting
        } else if self.state.selected_action.is_some() {
            ControllerPhase::ActionSelected
        } else if self.state.menu_open {
            ControllerPhase::MenuOpen
        } else {
            ControllerPhase::Idle
        }
    }

    /// Takes a fresh copy of the file from its owner. Only the baseline is
    /// replaced while an action is in progress; an idle row is reset to it.
    pub fn sync_target(&mut self, target: FileTarget) {
        self.target = target;
        if self.phase() == ControllerPhase::Idle {
            self.state.working_name = self.target.display_name.clone();
        }
    }

    /// The menu trigger is inert while a submission is in flight.
    pub fn open_menu(&mut self) -> bool {
        if self.state.submitting {
            return false;
        }
        self.state.menu_open = true;
        true
    }

    pub fn close_menu(&mut self) {
        self.state.menu_open = false;
    }

    /// Dismisses the modal but keeps the selection. Refused while submitting.
    pub fn close_modal(&mut self) -> bool {
        if self.state.submitting {
            return false;
        }
        self.state.modal_open = false;
        true
    }

    pub fn select_action(&mut self, key: ActionKey) -> Result<Selection, ActionError> {
        if self.state.submitting {
            warn!(file_id = %self.target.id, action = %key, "action selected while submitting");
            return Err(ActionError::SubmissionInFlight);
        }

        let definition = ActionCatalog::get(key);
        self.state.menu_open = false;

        if !definition.requires_modal {
            if self.state.selected_action.is_some() {
                self.reset();
            }
            debug!(file_id = %self.target.id, action = %key, "resolved action without modal");
            return Ok(Selection::Download {
                storage_ref: self.target.storage_ref.clone(),
                file_name: self.target.display_name.clone(),
            });
        }

        self.generation += 1;
        self.state.selected_action = Some(*definition);
        self.state.modal_open = true;
        self.state.working_name = self.target.display_name.clone();
        self.state.grantee_list = if key == ActionKey::Share {
            GranteeListEditor::new(self.target.grantees.iter().cloned())
        } else {
            GranteeListEditor::default()
        };

        debug!(
            file_id = %self.target.id,
            action = %key,
            generation = self.generation,
            "action selected"
        );
        Ok(Selection::Modal(key))
    }

    pub fn edit_working_name(&mut self, name: impl Into<String>) -> bool {
        if !self.accepts_input_for(ActionKey::Rename) {
            return false;
        }
        self.state.working_name = name.into();
        true
    }

    pub fn edit_grantees(&mut self, raw: &str) -> bool {
        if !self.accepts_input_for(ActionKey::Share) {
            return false;
        }
        self.state.grantee_list.set_from_input(raw);
        true
    }

    pub fn add_grantee(&mut self, identity: impl Into<String>) -> bool {
        if !self.accepts_input_for(ActionKey::Share) {
            return false;
        }
        self.state.grantee_list.add(identity)
    }

    fn accepts_input_for(&self, key: ActionKey) -> bool {
        !self.state.submitting && self.state.selected_key() == Some(key)
    }

    /// Marks the controller as submitting and builds the backend call for the
    /// selected action. A selection whose modal was dismissed is not
    /// submittable.
    pub fn begin_submit(&mut self, location: Location) -> SubmitStart {
        let Some(definition) = self.state.selected_action.filter(|_| self.state.modal_open) else {
            return SubmitStart::Skipped(SubmitOutcome::NoSelection);
        };
        if self.state.submitting {
            return SubmitStart::Skipped(SubmitOutcome::AlreadySubmitting);
        }

        let file_id = self.target.id.clone();
        let mutation = match definition.key {
            ActionKey::Rename => FileMutation::Rename(RenameRequest {
                file_id,
                name: self.state.working_name.clone(),
                extension: self.target.extension.clone(),
                location,
            }),
            ActionKey::Share => FileMutation::UpdateGrantees(UpdateGranteesRequest {
                file_id,
                identities: self.state.grantee_list.to_submit(),
                location,
            }),
            ActionKey::Delete => FileMutation::Delete(DeleteRequest {
                file_id,
                storage_ref: self.target.storage_ref.clone(),
                location,
            }),
            ActionKey::Details | ActionKey::Download => {
                return SubmitStart::Skipped(SubmitOutcome::NothingToSubmit(definition.key));
            }
        };

        SubmitStart::Dispatch(self.dispatch(definition.key, mutation))
    }

    /// Removing a grantee is not staged with other edits: it goes to the
    /// backend straight away with the reduced list.
    pub fn begin_remove_grantee(&mut self, identity: &str, location: Location) -> SubmitStart {
        if !self.state.modal_open || self.state.selected_key() != Some(ActionKey::Share) {
            return SubmitStart::Skipped(SubmitOutcome::NoSelection);
        }
        if self.state.submitting {
            return SubmitStart::Skipped(SubmitOutcome::AlreadySubmitting);
        }

        let mutation = FileMutation::UpdateGrantees(UpdateGranteesRequest {
            file_id: self.target.id.clone(),
            identities: self.state.grantee_list.without(identity),
            location,
        });
        SubmitStart::Dispatch(self.dispatch(ActionKey::Share, mutation))
    }

    fn dispatch(&mut self, key: ActionKey, mutation: FileMutation) -> PendingSubmission {
        self.state.submitting = true;
        info!(
            file_id = %self.target.id,
            action = %key,
            generation = self.generation,
            "submitting file action"
        );
        PendingSubmission {
            generation: self.generation,
            key,
            mutation,
        }
    }

    /// Applies the backend's answer for `pending`. Answers for a selection
    /// that is no longer current are discarded.
    pub fn complete_submission(
        &mut self,
        pending: PendingSubmission,
        success: bool,
    ) -> SubmitOutcome {
        if pending.generation != self.generation {
            debug!(
                file_id = %self.target.id,
                action = %pending.key,
                issued = pending.generation,
                current = self.generation,
                "discarding stale action result"
            );
            return SubmitOutcome::Stale {
                issued: pending.generation,
                current: self.generation,
            };
        }

        if !success {
            self.state.submitting = false;
            return SubmitOutcome::Rejected(pending.key);
        }

        match pending.mutation {
            FileMutation::Rename(request) => self.target.display_name = request.name,
            FileMutation::UpdateGrantees(request) => self.target.grantees = request.identities,
            FileMutation::Delete(_) => {}
        }
        self.reset();
        SubmitOutcome::Completed(pending.key)
    }

    pub async fn submit(&mut self, gateway: &BackendGateway) -> SubmitOutcome {
        let pending = match self.begin_submit(gateway.current_location()) {
            SubmitStart::Dispatch(pending) => pending,
            SubmitStart::Skipped(outcome) => return outcome,
        };
        let success = gateway.execute(pending.mutation.clone()).await;
        self.complete_submission(pending, success)
    }

    pub async fn remove_grantee(&mut self, identity: &str, gateway: &BackendGateway) -> SubmitOutcome {
        let pending = match self.begin_remove_grantee(identity, gateway.current_location()) {
            SubmitStart::Dispatch(pending) => pending,
            SubmitStart::Skipped(outcome) => return outcome,
        };
        let success = gateway.execute(pending.mutation.clone()).await;
        self.complete_submission(pending, success)
    }

    /// Explicit cancel. Does not cancel a call that is already in flight; its
    /// answer will be treated as stale.
    pub fn close_all(&mut self) {
        if self.state.submitting {
            debug!(file_id = %self.target.id, "closing while a submission is in flight");
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.state = ControllerState::idle(&self.target);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
