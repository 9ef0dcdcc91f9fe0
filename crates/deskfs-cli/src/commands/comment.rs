//! Comment commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use deskfs_core::error::AppError;
use deskfs_entity::comment::{Comment, NewComment};
use deskfs_entity::id::ItemId;
use deskfs_service::SessionContext;

/// Arguments for comment commands
#[derive(Debug, Args)]
pub struct CommentArgs {
    /// Comment subcommand
    #[command(subcommand)]
    pub command: CommentCommand,
}

/// Comment subcommands
#[derive(Debug, Subcommand)]
pub enum CommentCommand {
    /// Add a comment to an item and save it immediately
    Add {
        /// Item ID
        item: String,
        /// Author name
        #[arg(short, long)]
        author: String,
        /// Comment text
        #[arg(short, long)]
        text: String,
    },
    /// List comments on an item, oldest first
    List {
        /// Item ID
        item: String,
    },
}

/// Comment display row
#[derive(Debug, Serialize, Tabled)]
struct CommentRow {
    /// Author
    author: String,
    /// Text
    text: String,
    /// Written at
    written: String,
}

impl From<&Comment> for CommentRow {
    fn from(comment: &Comment) -> Self {
        Self {
            author: comment.author.clone(),
            text: comment.text.clone(),
            written: comment.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute comment commands
pub async fn execute(
    args: &CommentArgs,
    session: &SessionContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        CommentCommand::Add { item, author, text } => {
            let comment = session
                .comments()
                .add_comment_now(
                    &ItemId::from(item.as_str()),
                    NewComment {
                        author: author.clone(),
                        text: text.clone(),
                    },
                )
                .await?;
            match format {
                OutputFormat::Table => {
                    output::print_success(&format!("Comment {} added to {item}", comment.id))
                }
                OutputFormat::Json => output::print_json(&comment),
            }
        }
        CommentCommand::List { item } => {
            let comments = session
                .comments()
                .comments_for(&ItemId::from(item.as_str()))
                .await;
            match format {
                OutputFormat::Table => {
                    let rows: Vec<CommentRow> = comments.iter().map(CommentRow::from).collect();
                    output::print_list(&rows, format, "No comments.");
                }
                OutputFormat::Json => output::print_json(&comments),
            }
        }
    }

    Ok(())
}
