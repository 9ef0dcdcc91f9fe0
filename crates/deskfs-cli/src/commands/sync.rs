//! Sync inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::output::{self, OutputFormat};
use deskfs_core::error::AppError;
use deskfs_core::events::SyncPhase;
use deskfs_service::SessionContext;

/// Arguments for sync commands
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Sync subcommand
    #[command(subcommand)]
    pub command: SyncCommand,
}

/// Sync subcommands
#[derive(Debug, Subcommand)]
pub enum SyncCommand {
    /// Show bootstrap ids and channel state
    Status,
    /// Re-read both remote documents
    Reload,
    /// Write both documents now
    Flush,
}

#[derive(Debug, Serialize)]
struct SyncStatus {
    system_folder_id: String,
    db_document_id: String,
    comment_document_id: String,
    known_folders: usize,
    tree_phase: SyncPhase,
    tree_dirty: bool,
    comments_phase: SyncPhase,
    comments_dirty: bool,
}

/// Execute sync commands
pub async fn execute(
    args: &SyncArgs,
    session: &SessionContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        SyncCommand::Status => {}
        SyncCommand::Reload => {
            session.reload().await?;
            output::print_success("Documents reloaded");
        }
        SyncCommand::Flush => {
            session.flush().await?;
            output::print_success("Documents flushed");
        }
    }
    print_status(session, format).await;
    Ok(())
}

async fn print_status(session: &SessionContext, format: OutputFormat) {
    let bootstrap = session.bootstrap();
    let (tree_phase, comments_phase) = session.sync_status();
    let status = SyncStatus {
        system_folder_id: bootstrap.system_folder_id.to_string(),
        db_document_id: bootstrap.db_document_id.to_string(),
        comment_document_id: bootstrap.comment_document_id.to_string(),
        known_folders: session.tree().len().await,
        tree_phase,
        tree_dirty: session.tree().sync().is_dirty(),
        comments_phase,
        comments_dirty: session.comments().sync().is_dirty(),
    };

    match format {
        OutputFormat::Table => {
            output::print_kv("System folder", &status.system_folder_id);
            output::print_kv("Tree document", &status.db_document_id);
            output::print_kv("Comment document", &status.comment_document_id);
            output::print_kv("Known folders", &status.known_folders.to_string());
            output::print_kv("Tree", &describe(status.tree_phase, status.tree_dirty));
            output::print_kv(
                "Comments",
                &describe(status.comments_phase, status.comments_dirty),
            );
        }
        OutputFormat::Json => output::print_json(&status),
    }
}

fn describe(phase: SyncPhase, dirty: bool) -> String {
    match (phase, dirty) {
        (SyncPhase::Flushing, _) => "Syncing...".to_string(),
        (SyncPhase::Armed, _) => "Pending".to_string(),
        (SyncPhase::Idle, true) => "Unsaved changes".to_string(),
        (SyncPhase::Idle, false) => "Saved".to_string(),
    }
}
