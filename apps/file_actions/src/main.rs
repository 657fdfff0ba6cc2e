use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    config::{load_settings_from, DEFAULT_SETTINGS_FILE},
    ActionKey, BackendGateway, ClientSettings, FileBackend, FileBoard, HttpFileBackend,
    InMemoryFileBackend, IntentOutcome, UserIntent,
};
use shared::domain::{FileId, FileTarget, Location};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "file-actions", about = "Run per-file actions against a file service")]
struct Cli {
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    location: Option<String>,
    /// Keep files in process instead of calling the file service.
    #[arg(long)]
    offline: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct FileArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    extension: String,
    #[arg(long)]
    storage_ref: String,
    #[arg(long, default_value = "")]
    owner: String,
    #[arg(long = "grantee")]
    grantees: Vec<String>,
}

impl FileArgs {
    fn target(&self) -> FileTarget {
        FileTarget::new(
            &self.id,
            &self.name,
            &self.extension,
            &self.storage_ref,
            &self.owner,
        )
        .with_grantees(self.grantees.iter().cloned())
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the action menu for a file.
    Menu {
        #[command(flatten)]
        file: FileArgs,
    },
    Details {
        #[command(flatten)]
        file: FileArgs,
    },
    Rename {
        #[command(flatten)]
        file: FileArgs,
        #[arg(long)]
        new_name: String,
    },
    /// Replace the grantees with a comma separated list of identities.
    Share {
        #[command(flatten)]
        file: FileArgs,
        #[arg(long)]
        identities: String,
    },
    Unshare {
        #[command(flatten)]
        file: FileArgs,
        #[arg(long)]
        identity: String,
    },
    Delete {
        #[command(flatten)]
        file: FileArgs,
        #[arg(long)]
        yes: bool,
    },
    Link {
        #[command(flatten)]
        file: FileArgs,
    },
}

impl Command {
    fn file(&self) -> &FileArgs {
        match self {
            Command::Menu { file }
            | Command::Details { file }
            | Command::Rename { file, .. }
            | Command::Share { file, .. }
            | Command::Unshare { file, .. }
            | Command::Delete { file, .. }
            | Command::Link { file } => file,
        }
    }
}

fn settings_for(cli: &Cli) -> Result<ClientSettings> {
    let mut settings = load_settings_from(&cli.config, |key| std::env::var(key).ok())?;
    if let Some(server_url) = &cli.server_url {
        settings.server_url = server_url.clone();
    }
    if let Some(location) = &cli.location {
        settings.location = location.clone();
    }
    Ok(settings)
}

async fn build_board(cli: &Cli, settings: &ClientSettings, target: &FileTarget) -> Result<FileBoard> {
    let backend: Arc<dyn FileBackend> = if cli.offline {
        let backend = InMemoryFileBackend::new(settings.storage_base()?)?;
        backend.insert(target.clone()).await;
        Arc::new(backend)
    } else {
        Arc::new(HttpFileBackend::new(settings)?)
    };

    let location = Arc::new(Location::new(settings.location.clone()));
    let board = FileBoard::new(BackendGateway::new(backend, location));
    board.upsert(target.clone()).await;
    Ok(board)
}

async fn run(board: &FileBoard, file_id: &FileId, command: Command) -> Result<()> {
    let step = |intent: UserIntent| async move {
        board
            .handle(file_id, intent)
            .await
            .ok_or_else(|| anyhow!("no row for file {file_id}"))
    };

    match command {
        Command::Menu { .. } => {
            step(UserIntent::OpenMenu).await?;
            if let Some(menu) = board.menu(file_id).await {
                print!("{}", render::menu(&menu));
            }
        }
        Command::Details { .. } => {
            step(UserIntent::Select(ActionKey::Details)).await?;
            if let Some(modal) = board.modal(file_id).await {
                print!("{}", render::modal(&modal));
            }
            step(UserIntent::Cancel).await?;
        }
        Command::Rename { new_name, .. } => {
            step(UserIntent::Select(ActionKey::Rename)).await?;
            step(UserIntent::EditName(new_name)).await?;
            confirm(board, file_id, step(UserIntent::Confirm).await?).await?;
        }
        Command::Share { identities, .. } => {
            step(UserIntent::Select(ActionKey::Share)).await?;
            step(UserIntent::EditGrantees(identities)).await?;
            confirm(board, file_id, step(UserIntent::Confirm).await?).await?;
        }
        Command::Unshare { identity, .. } => {
            step(UserIntent::Select(ActionKey::Share)).await?;
            let outcome = step(UserIntent::RemoveGrantee(identity)).await?;
            confirm(board, file_id, outcome).await?;
        }
        Command::Delete { yes, .. } => {
            step(UserIntent::Select(ActionKey::Delete)).await?;
            if let Some(modal) = board.modal(file_id).await {
                print!("{}", render::modal(&modal));
            }
            if !yes {
                step(UserIntent::Cancel).await?;
                println!("Not deleted; pass --yes to confirm.");
                return Ok(());
            }
            confirm(board, file_id, step(UserIntent::Confirm).await?).await?;
        }
        Command::Link { .. } => match step(UserIntent::Select(ActionKey::Download)).await? {
            IntentOutcome::Download(link) => println!("{} ({})", link.url, link.file_name),
            other => return Err(anyhow!("unexpected download outcome: {other:?}")),
        },
    }

    Ok(())
}

async fn confirm(board: &FileBoard, file_id: &FileId, outcome: IntentOutcome) -> Result<()> {
    let submitted = match outcome {
        IntentOutcome::Submitted(submitted) => submitted,
        IntentOutcome::Refused(error) => return Err(error.into()),
        other => return Err(anyhow!("unexpected confirmation outcome: {other:?}")),
    };

    match submitted.into_result()? {
        Some(key) => {
            println!("{key} confirmed for {file_id}");
            if let Some(controller) = board.controller(file_id).await {
                let controller = controller.lock().await;
                println!("{}", render::target(controller.target()));
            }
        }
        None => println!("Nothing to submit for {file_id}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = settings_for(&cli)?;
    let target = cli.command.file().target();
    info!(
        file_id = %target.id,
        offline = cli.offline,
        server_url = %settings.server_url,
        "running file action"
    );

    let board = build_board(&cli, &settings, &target).await?;
    run(&board, &target.id, cli.command).await
}
