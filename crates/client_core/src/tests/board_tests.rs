use super::*;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{Location, StorageRef},
    protocol::{DeleteRequest, RenameRequest, UpdateGranteesRequest},
};
use tokio::sync::{oneshot, Mutex as AsyncMutex};
use url::Url;

use crate::{controller::ControllerPhase, gateway::FileBackend, memory::InMemoryFileBackend};

fn file(id: &str) -> FileTarget {
    FileTarget::new(id, format!("{id}.txt"), "txt", format!("bucket-{id}"), "owner-1")
}

async fn memory_board(files: &[&str]) -> (FileBoard, Arc<InMemoryFileBackend>) {
    let backend = Arc::new(
        InMemoryFileBackend::new(Url::parse("http://files.local/").expect("url")).expect("backend"),
    );
    let board = FileBoard::new(BackendGateway::new(
        backend.clone(),
        Arc::new(Location::new("/")),
    ));
    for id in files {
        backend.insert(file(id)).await;
        board.upsert(file(id)).await;
    }
    (board, backend)
}

/// Backend whose renames wait until the test releases them.
struct GatedBackend {
    started: AsyncMutex<Option<oneshot::Sender<()>>>,
    release: AsyncMutex<Option<oneshot::Receiver<bool>>>,
}

#[async_trait]
impl FileBackend for GatedBackend {
    async fn rename(&self, _request: RenameRequest) -> Result<()> {
        if let Some(started) = self.started.lock().await.take() {
            let _ = started.send(());
        }
        let release = self.release.lock().await.take();
        let accepted = match release {
            Some(rx) => rx.await.unwrap_or(false),
            None => true,
        };
        if accepted {
            Ok(())
        } else {
            Err(anyhow!("rename rejected"))
        }
    }

    async fn update_grantees(&self, _request: UpdateGranteesRequest) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _request: DeleteRequest) -> Result<()> {
        Ok(())
    }

    fn download_link(&self, storage_ref: &StorageRef) -> Url {
        Url::parse(&format!("http://files.local/{storage_ref}")).expect("url")
    }
}

#[tokio::test]
async fn upsert_keeps_one_row_per_file() {
    let (board, _backend) = memory_board(&["a", "b"]).await;

    let mut renamed = file("a");
    renamed.display_name = "renamed.txt".into();
    board.upsert(renamed).await;

    assert_eq!(board.len().await, 2);
    assert_eq!(
        board.file_ids().await,
        [FileId::new("a"), FileId::new("b")]
    );
    let controller = board.controller(&FileId::new("a")).await.expect("row");
    assert_eq!(controller.lock().await.state().working_name, "renamed.txt");
}

#[tokio::test]
async fn confirmed_delete_drops_the_row() {
    let (board, backend) = memory_board(&["a", "b"]).await;
    let id = FileId::new("a");

    board
        .handle(&id, UserIntent::Select(ActionKey::Delete))
        .await
        .expect("row");
    let outcome = board.handle(&id, UserIntent::Confirm).await.expect("row");

    assert_eq!(
        outcome,
        IntentOutcome::Submitted(SubmitOutcome::Completed(ActionKey::Delete))
    );
    assert_eq!(board.file_ids().await, [FileId::new("b")]);
    assert!(backend.file(&id).await.is_none());
    assert!(board.handle(&id, UserIntent::OpenMenu).await.is_none());
}

#[tokio::test]
async fn rejected_delete_keeps_the_row() {
    let (board, backend) = memory_board(&["a"]).await;
    backend.set_rejecting(true).await;
    let id = FileId::new("a");

    board.handle(&id, UserIntent::Select(ActionKey::Delete)).await;
    let outcome = board.handle(&id, UserIntent::Confirm).await.expect("row");

    assert_eq!(
        outcome,
        IntentOutcome::Submitted(SubmitOutcome::Rejected(ActionKey::Delete))
    );
    assert_eq!(board.len().await, 1);
    assert!(board.modal(&id).await.is_some());
}

#[tokio::test]
async fn rows_submit_independently() {
    let (board, backend) = memory_board(&["a", "b"]).await;
    let a = FileId::new("a");
    let b = FileId::new("b");

    board.handle(&a, UserIntent::Select(ActionKey::Rename)).await;
    board.handle(&a, UserIntent::EditName("a2.txt".into())).await;
    board.handle(&b, UserIntent::Select(ActionKey::Share)).await;
    board
        .handle(&b, UserIntent::EditGrantees("c@x.com".into()))
        .await;

    let (first, second) = futures::join!(
        board.handle(&a, UserIntent::Confirm),
        board.handle(&b, UserIntent::Confirm)
    );

    assert_eq!(
        first,
        Some(IntentOutcome::Submitted(SubmitOutcome::Completed(
            ActionKey::Rename
        )))
    );
    assert_eq!(
        second,
        Some(IntentOutcome::Submitted(SubmitOutcome::Completed(
            ActionKey::Share
        )))
    );
    assert_eq!(
        backend.file(&a).await.expect("a").display_name,
        "a2.txt"
    );
    assert_eq!(backend.file(&b).await.expect("b").grantees, ["c@x.com"]);
}

#[tokio::test]
async fn cancel_during_flight_discards_late_result() {
    let (started_tx, started_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel();
    let backend = Arc::new(GatedBackend {
        started: AsyncMutex::new(Some(started_tx)),
        release: AsyncMutex::new(Some(release_rx)),
    });
    let board = Arc::new(FileBoard::new(BackendGateway::new(
        backend,
        Arc::new(Location::new("/")),
    )));
    let id = FileId::new("a");
    board.upsert(file("a")).await;

    board.handle(&id, UserIntent::Select(ActionKey::Rename)).await;
    board.handle(&id, UserIntent::EditName("late.txt".into())).await;

    let submit = tokio::spawn({
        let board = board.clone();
        let id = id.clone();
        async move { board.handle(&id, UserIntent::Confirm).await }
    });

    started_rx.await.expect("backend call started");
    {
        let controller = board.controller(&id).await.expect("row");
        assert_eq!(controller.lock().await.phase(), ControllerPhase::Submitting);
    }
    assert_eq!(
        board.handle(&id, UserIntent::Cancel).await,
        Some(IntentOutcome::Applied)
    );

    release_tx.send(true).expect("release");
    let outcome = submit.await.expect("join").expect("row");

    assert!(matches!(
        outcome,
        IntentOutcome::Submitted(SubmitOutcome::Stale { .. })
    ));
    let controller = board.controller(&id).await.expect("row");
    let guard = controller.lock().await;
    assert_eq!(guard.phase(), ControllerPhase::Idle);
    assert_eq!(guard.target().display_name, "a.txt");
}
