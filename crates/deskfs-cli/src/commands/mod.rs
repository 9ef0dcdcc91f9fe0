//! CLI command definitions and dispatch.

pub mod comment;
pub mod config;
pub mod file;
pub mod folder;
pub mod sync;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::{self, OutputFormat};
use deskfs_cache::CacheManager;
use deskfs_core::config::AppConfig;
use deskfs_core::error::AppError;
use deskfs_entity::id::ItemId;
use deskfs_service::{ListingOutcome, SessionContext};

/// deskfs: browse and manage a cloud desktop drive
#[derive(Debug, Parser)]
#[command(name = "deskfs", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file (defaults to config/default + config/$DESKFS_ENV)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Password that unlocks the system folder for this run
    #[arg(long, global = true)]
    pub unlock: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Browse and reorganise folders
    Folder(folder::FolderArgs),
    /// Upload files and save notes
    File(file::FileArgs),
    /// Read and write item comments
    Comment(comment::CommentArgs),
    /// Inspect and drive document sync
    Sync(sync::SyncArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        if let Commands::Config(args) = &self.command {
            return config::execute(args, self.config.as_deref(), self.format).await;
        }

        let session = self.open_session().await?;
        let result = match &self.command {
            Commands::Folder(args) => folder::execute(args, &session, self.format).await,
            Commands::File(args) => file::execute(args, &session, self.format).await,
            Commands::Comment(args) => comment::execute(args, &session, self.format).await,
            Commands::Sync(args) => sync::execute(args, &session, self.format).await,
            Commands::Config(_) => Ok(()),
        };
        let closed = session.close().await;
        result.and(closed)
    }

    async fn open_session(&self) -> Result<SessionContext, AppError> {
        let config = load_config(self.config.as_deref())?;
        let remote = deskfs_remote::connect(&config.remote)?;
        let cache = CacheManager::new(&config.cache).await?;
        let session = SessionContext::open(config, remote, Arc::new(cache)).await?;
        if let Some(password) = &self.unlock {
            session.unlock_system(password)?;
        }
        Ok(session)
    }
}

/// Helper: load configuration from an explicit file or the layered defaults
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, AppError> {
    match config_path {
        Some(path) => AppConfig::load_file(path),
        None => {
            let env = std::env::var("DESKFS_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Helper: navigate to a folder (root when `None`), warning when the view
/// comes from the cache only
pub async fn open_folder(
    session: &SessionContext,
    folder: Option<&str>,
) -> Result<ItemId, AppError> {
    let folder_id = folder.map(ItemId::from).unwrap_or_else(ItemId::root);
    if let ListingOutcome::KeptStale { message } = session.navigate(&folder_id).await? {
        output::print_warning(&format!("Showing cached contents: {message}"));
    }
    Ok(folder_id)
}

/// Helper: turn command-line ids into item ids
pub fn item_ids(raw: &[String]) -> Vec<ItemId> {
    raw.iter().map(|id| ItemId::from(id.as_str())).collect()
}

/// Helper: ask before an irreversible action unless `yes` was given
pub fn confirm(prompt: &str, yes: bool) -> Result<bool, AppError> {
    if yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_move_command() {
        let cli = Cli::try_parse_from([
            "deskfs", "--format", "json", "folder", "mv", "a", "b", "--to", "c",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Folder(args) => match args.command {
                folder::FolderCommand::Mv { items, to } => {
                    assert_eq!(items, vec!["a", "b"]);
                    assert_eq!(to, "c");
                }
                other => panic!("unexpected command: {other:?}"),
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unlock_is_global() {
        let cli = Cli::try_parse_from(["deskfs", "folder", "ls", "sys", "--unlock", "pw"]).unwrap();
        assert_eq!(cli.unlock.as_deref(), Some("pw"));
    }

    #[test]
    fn test_move_requires_items() {
        assert!(Cli::try_parse_from(["deskfs", "folder", "mv", "--to", "c"]).is_err());
    }

    #[test]
    fn test_item_ids() {
        let ids = item_ids(&["a".to_string(), "b".to_string()]);
        assert_eq!(ids, vec![ItemId::from("a"), ItemId::from("b")]);
    }
}
