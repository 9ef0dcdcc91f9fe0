//! Folder browsing and bulk operation commands.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use deskfs_core::error::AppError;
use deskfs_entity::id::ItemId;
use deskfs_entity::item::Item;
use deskfs_service::SessionContext;

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List a folder (root when omitted)
    Ls {
        /// Folder ID
        folder: Option<String>,
    },
    /// Show the folder tree known to the tree index
    Tree {
        /// Folder to start from (root when omitted)
        folder: Option<String>,
        /// Max depth
        #[arg(short, long)]
        depth: Option<usize>,
    },
    /// Show the path from root to a folder
    Path {
        /// Folder ID
        folder: String,
    },
    /// Create a folder
    Mkdir {
        /// Folder name
        name: String,
        /// Parent folder ID (root when omitted)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Move items into a folder
    Mv {
        /// Item IDs
        #[arg(required = true)]
        items: Vec<String>,
        /// Target folder ID
        #[arg(short, long)]
        to: String,
    },
    /// Move items to the recycle bin
    Rm {
        /// Item IDs
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Duplicate items next to the originals
    Cp {
        /// Item IDs
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Rename an item
    Rename {
        /// Item ID
        item: String,
        /// New name
        name: String,
    },
    /// Permanently delete items from the recycle bin
    Purge {
        /// Item IDs
        #[arg(required = true)]
        items: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Permanently delete everything in the recycle bin
    EmptyBin {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Folder listing row
#[derive(Debug, Serialize, Tabled)]
struct ItemRow {
    /// Item ID
    id: String,
    /// Kind
    kind: String,
    /// Name
    name: String,
    /// Last updated
    updated: String,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.to_string(),
            kind: item.kind.to_string(),
            name: item.name.clone(),
            updated: item
                .last_updated
                .as_ref()
                .map(format_time)
                .unwrap_or_default(),
        }
    }
}

fn format_time(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    session: &SessionContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let coordinator = session.coordinator();

    match &args.command {
        FolderCommand::Ls { folder } => {
            super::open_folder(session, folder.as_deref()).await?;
            let items = session.explorer().items().await;
            let rows: Vec<ItemRow> = items.iter().map(ItemRow::from).collect();
            output::print_list(&rows, format, "Folder is empty.");
        }
        FolderCommand::Tree { folder, depth } => {
            super::open_folder(session, None).await?;
            let start = folder.as_deref().map(ItemId::from).unwrap_or_else(ItemId::root);
            let tree = session.tree().build_tree(&start, *depth).await?;
            output::print_tree(&tree, format);
        }
        FolderCommand::Path { folder } => {
            let folder_id = ItemId::from(folder.as_str());
            let path = session.tree().path_to(&folder_id).await;
            if path.is_empty() {
                return Err(AppError::not_found(format!(
                    "Folder {folder_id} is not in the tree index"
                )));
            }
            match format {
                OutputFormat::Table => {
                    let names: Vec<&str> = path.iter().map(|entry| entry.name.as_str()).collect();
                    println!("/{}", names.join("/"));
                }
                OutputFormat::Json => output::print_json(&path),
            }
        }
        FolderCommand::Mkdir { name, parent } => {
            super::open_folder(session, parent.as_deref()).await?;
            let id = coordinator.create_folder(name).await?;
            output::print_success(&format!("Folder '{}' created (id: {id})", name.trim()));
        }
        FolderCommand::Mv { items, to } => {
            super::open_folder(session, None).await?;
            let ids = super::item_ids(items);
            coordinator.move_items(&ids, &ItemId::from(to.as_str())).await?;
            output::print_success(&format!("Moved {} item(s) into {to}", ids.len()));
        }
        FolderCommand::Rm { items } => {
            super::open_folder(session, None).await?;
            let ids = super::item_ids(items);
            coordinator.delete_items(&ids).await?;
            output::print_success(&format!("Moved {} item(s) to the recycle bin", ids.len()));
        }
        FolderCommand::Cp { items } => {
            let ids = super::item_ids(items);
            coordinator.duplicate_items(&ids).await?;
            output::print_success(&format!("Duplicated {} item(s)", ids.len()));
        }
        FolderCommand::Rename { item, name } => {
            coordinator
                .rename_item(&ItemId::from(item.as_str()), name)
                .await?;
            output::print_success(&format!("Renamed {item} to '{}'", name.trim()));
        }
        FolderCommand::Purge { items, yes } => {
            let bin = open_recycle_bin(session).await?;
            let ids = super::item_ids(items);
            let prompt = format!("Permanently delete {} item(s)?", ids.len());
            if !super::confirm(&prompt, *yes)? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            session.navigate(&bin).await?;
            coordinator.purge(&ids).await?;
            output::print_success(&format!("Permanently deleted {} item(s)", ids.len()));
        }
        FolderCommand::EmptyBin { yes } => {
            open_recycle_bin(session).await?;
            if !super::confirm("Permanently delete everything in the recycle bin?", *yes)? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            let removed = coordinator.empty_recycle_bin().await?;
            output::print_success(&format!("Recycle bin emptied ({removed} item(s))"));
        }
    }

    Ok(())
}

/// Load root so the recycle bin is discovered, and return its id.
async fn open_recycle_bin(session: &SessionContext) -> Result<ItemId, AppError> {
    super::open_folder(session, None).await?;
    session
        .explorer()
        .recycle_bin_id()
        .await
        .ok_or_else(|| AppError::not_found("There is no recycle bin yet"))
}
