//! Wire types exchanged with the remote directory backend.

pub mod listing;

pub use listing::{CreatedFolder, DriveFileDescriptor, FolderListing};
