//! Upload and note commands.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use deskfs_core::error::AppError;
use deskfs_service::SessionContext;

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Upload a local file
    Upload {
        /// Local file path
        path: PathBuf,
        /// Destination folder ID (root when omitted)
        #[arg(long)]
        folder: Option<String>,
        /// Name in the drive (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
        /// MIME type (guessed from the extension when omitted)
        #[arg(short, long)]
        mime: Option<String>,
    },
    /// Save a text note
    Note {
        /// Note name
        name: String,
        /// Note text
        #[arg(short, long)]
        text: String,
        /// Destination folder ID (root when omitted)
        #[arg(long)]
        folder: Option<String>,
    },
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    session: &SessionContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let descriptor = match &args.command {
        FileCommand::Upload {
            path,
            folder,
            name,
            mime,
        } => {
            let data = tokio::fs::read(path).await.map_err(|e| {
                AppError::storage(format!("Failed to read '{}': {e}", path.display()))
            })?;
            let name = match name {
                Some(name) => name.clone(),
                None => file_name(path)?,
            };
            let mime = mime.clone().unwrap_or_else(|| guess_mime(path).to_string());

            super::open_folder(session, folder.as_deref()).await?;
            session
                .coordinator()
                .upload_file(Bytes::from(data), &name, &mime)
                .await?
        }
        FileCommand::Note { name, text, folder } => {
            super::open_folder(session, folder.as_deref()).await?;
            session.coordinator().save_note(name, text).await?
        }
    };

    match format {
        OutputFormat::Table => output::print_success(&format!(
            "Saved '{}' (id: {}, {})",
            descriptor.name, descriptor.id, descriptor.mime_type
        )),
        OutputFormat::Json => output::print_json(&descriptor),
    }
    Ok(())
}

fn file_name(path: &Path) -> Result<String, AppError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::validation(format!("'{}' has no file name", path.display())))
}

/// MIME type by extension. Anything not an image is uploaded as a note.
fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "md" => "text/markdown",
        _ => "text/plain",
    }
}
