//! # deskfs-core
//!
//! Core crate for deskfs, the virtual filesystem engine behind the cloud
//! desktop explorer. Contains the collaborator traits (remote directory and
//! local cache store), configuration schemas, explorer events,
//! and the unified error system.
//!
//! The only internal dependency is `deskfs-entity`, whose data model the
//! collaborator traits speak in.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
