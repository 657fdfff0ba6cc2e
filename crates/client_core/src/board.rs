//! Owns one action controller per visible file. Rows are independent: a
//! slow backend call on one file never blocks another.

use std::sync::Arc;

use shared::domain::{FileId, FileTarget};
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::{
    catalog::ActionKey,
    controller::{ActionController, SubmitOutcome},
    gateway::BackendGateway,
    presenter::{plan_intent, ActionMenuView, IntentOutcome, IntentPlan, ModalView, UserIntent},
};

pub type SharedController = Arc<Mutex<ActionController>>;

pub struct FileBoard {
    gateway: BackendGateway,
    rows: RwLock<Vec<(FileId, SharedController)>>,
}

impl FileBoard {
    pub fn new(gateway: BackendGateway) -> Self {
        Self {
            gateway,
            rows: RwLock::new(Vec::new()),
        }
    }

    pub fn gateway(&self) -> &BackendGateway {
        &self.gateway
    }

    /// Adds a row for `target`, or hands the fresh copy to the existing row
    /// for the same file.
    pub async fn upsert(&self, target: FileTarget) -> SharedController {
        let mut rows = self.rows.write().await;
        if let Some((_, controller)) = rows.iter().find(|(id, _)| *id == target.id) {
            let controller = controller.clone();
            controller.lock().await.sync_target(target);
            return controller;
        }

        let id = target.id.clone();
        let controller = Arc::new(Mutex::new(ActionController::new(target)));
        rows.push((id, controller.clone()));
        controller
    }

    pub async fn controller(&self, file_id: &FileId) -> Option<SharedController> {
        self.rows
            .read()
            .await
            .iter()
            .find(|(id, _)| id == file_id)
            .map(|(_, controller)| controller.clone())
    }

    pub async fn file_ids(&self) -> Vec<FileId> {
        self.rows
            .read()
            .await
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    pub async fn remove(&self, file_id: &FileId) -> bool {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|(id, _)| id != file_id);
        rows.len() != before
    }

    /// Routes a user intent to the row for `file_id`. The row's lock is not
    /// held while the backend call is in flight, so the row can still be
    /// cancelled in the meantime. Returns `None` for an unknown file.
    pub async fn handle(&self, file_id: &FileId, intent: UserIntent) -> Option<IntentOutcome> {
        let controller = self.controller(file_id).await?;

        let plan = {
            let mut guard = controller.lock().await;
            plan_intent(&mut guard, &self.gateway, intent)
        };

        let outcome = match plan {
            IntentPlan::Done(outcome) => outcome,
            IntentPlan::Dispatch(pending) => {
                let success = self.gateway.execute(pending.mutation().clone()).await;
                let outcome = controller.lock().await.complete_submission(pending, success);
                IntentOutcome::Submitted(outcome)
            }
        };

        if outcome == IntentOutcome::Submitted(SubmitOutcome::Completed(ActionKey::Delete)) {
            info!(%file_id, "file deleted; dropping its row");
            self.remove(file_id).await;
        }

        Some(outcome)
    }

    pub async fn menu(&self, file_id: &FileId) -> Option<ActionMenuView> {
        let controller = self.controller(file_id).await?;
        let guard = controller.lock().await;
        Some(ActionMenuView::project(&guard, &self.gateway))
    }

    pub async fn modal(&self, file_id: &FileId) -> Option<ModalView> {
        let controller = self.controller(file_id).await?;
        let guard = controller.lock().await;
        ModalView::project(&guard)
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
