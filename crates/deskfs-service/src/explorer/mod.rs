//! Explorer window state shared by loader, coordinator, and drag input.

pub mod state;

pub use state::{ExplorerState, ExplorerView, NavigationToken, ViewSnapshot};
