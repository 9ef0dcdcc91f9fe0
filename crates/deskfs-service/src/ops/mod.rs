//! User-triggered mutations and their optimistic commands.

pub mod command;
pub mod coordinator;

pub use command::{Command, MoveCommand, UploadCommand, run_optimistic};
pub use coordinator::BulkCoordinator;
