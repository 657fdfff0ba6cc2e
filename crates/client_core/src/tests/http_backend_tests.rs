use super::*;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post, put},
    Json, Router,
};
use shared::{domain::Location, error::ErrorCode};
use tokio::{net::TcpListener, sync::mpsc};

#[derive(Debug)]
enum Received {
    Rename(String, RenameRequest),
    Grantees(String, UpdateGranteesRequest),
    Delete(String, DeleteRequest),
}

#[derive(Clone)]
struct ServerState {
    tx: mpsc::UnboundedSender<Received>,
}

async fn handle_rename(
    State(state): State<ServerState>,
    Path(file_id): Path<String>,
    Json(request): Json<RenameRequest>,
) -> impl IntoResponse {
    let ack = MutationAck {
        file_id: request.file_id.clone(),
    };
    let _ = state.tx.send(Received::Rename(file_id, request));
    Json(ack)
}

async fn handle_grantees(
    State(state): State<ServerState>,
    Path(file_id): Path<String>,
    Json(request): Json<UpdateGranteesRequest>,
) -> impl IntoResponse {
    if request.identities.iter().any(|identity| !identity.contains('@')) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiError::new(ErrorCode::Validation, "grantees must be emails")),
        )
            .into_response();
    }
    let _ = state.tx.send(Received::Grantees(file_id, request));
    StatusCode::NO_CONTENT.into_response()
}

async fn handle_delete(
    State(state): State<ServerState>,
    Path(file_id): Path<String>,
    Json(request): Json<DeleteRequest>,
) -> impl IntoResponse {
    if file_id == "locked" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let _ = state.tx.send(Received::Delete(file_id, request));
    StatusCode::OK.into_response()
}

async fn spawn_file_server() -> anyhow::Result<(String, mpsc::UnboundedReceiver<Received>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .route("/files/:id/rename", post(handle_rename))
        .route("/files/:id/grantees", put(handle_grantees))
        .route("/files/:id", delete(handle_delete))
        .with_state(ServerState { tx });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), rx))
}

fn backend_for(server_url: &str) -> HttpFileBackend {
    let settings = ClientSettings {
        server_url: format!("{server_url}/"),
        storage_endpoint: "https://cloud.example.com/v1".into(),
        storage_bucket: "bucket-7".into(),
        storage_project: "proj-3".into(),
        ..ClientSettings::default()
    };
    HttpFileBackend::new(&settings).expect("backend")
}

#[tokio::test]
async fn rename_posts_request_to_file_route() {
    let (server_url, mut rx) = spawn_file_server().await.expect("spawn server");
    let backend = backend_for(&server_url);

    backend
        .rename(RenameRequest {
            file_id: FileId::new("f1"),
            name: "report2.pdf".into(),
            extension: "pdf".into(),
            location: Location::new("/documents"),
        })
        .await
        .expect("rename");

    match rx.recv().await.expect("request") {
        Received::Rename(path_id, request) => {
            assert_eq!(path_id, "f1");
            assert_eq!(request.name, "report2.pdf");
            assert_eq!(request.location, Location::new("/documents"));
        }
        other => panic!("unexpected request: {other:?}"),
    }
}

#[tokio::test]
async fn grantee_update_accepts_empty_body() {
    let (server_url, mut rx) = spawn_file_server().await.expect("spawn server");
    let backend = backend_for(&server_url);

    backend
        .update_grantees(UpdateGranteesRequest {
            file_id: FileId::new("f2"),
            identities: vec!["b@x.com".into()],
            location: Location::new("/"),
        })
        .await
        .expect("update grantees");

    match rx.recv().await.expect("request") {
        Received::Grantees(path_id, request) => {
            assert_eq!(path_id, "f2");
            assert_eq!(request.identities, ["b@x.com"]);
        }
        other => panic!("unexpected request: {other:?}"),
    }
}

#[tokio::test]
async fn rejected_update_surfaces_api_error() {
    let (server_url, _rx) = spawn_file_server().await.expect("spawn server");
    let backend = backend_for(&server_url);

    let error = backend
        .update_grantees(UpdateGranteesRequest {
            file_id: FileId::new("f2"),
            identities: vec!["not-an-email".into()],
            location: Location::new("/"),
        })
        .await
        .expect_err("validation failure");

    let api = error.downcast_ref::<ApiException>().expect("api exception");
    assert!(matches!(api.code, ErrorCode::Validation));
}

#[tokio::test]
async fn delete_failure_without_body_is_an_error() {
    let (server_url, mut rx) = spawn_file_server().await.expect("spawn server");
    let backend = backend_for(&server_url);

    let request = |id: &str| DeleteRequest {
        file_id: FileId::new(id),
        storage_ref: StorageRef::new("b1"),
        location: Location::new("/"),
    };

    assert!(backend.delete(request("locked")).await.is_err());
    backend.delete(request("f3")).await.expect("delete");

    match rx.recv().await.expect("request") {
        Received::Delete(path_id, request) => {
            assert_eq!(path_id, "f3");
            assert_eq!(request.storage_ref, StorageRef::new("b1"));
        }
        other => panic!("unexpected request: {other:?}"),
    }
}

#[test]
fn download_link_targets_storage_bucket() {
    let backend = backend_for("http://127.0.0.1:1");
    let link = backend.download_link(&StorageRef::new("abc"));
    assert_eq!(
        link.as_str(),
        "https://cloud.example.com/v1/storage/buckets/bucket-7/files/abc/download?project=proj-3"
    );
}
