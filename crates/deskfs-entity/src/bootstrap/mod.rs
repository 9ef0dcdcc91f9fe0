//! Process-wide ids located once at boot.

pub mod model;

pub use model::{BootstrapProbe, BootstrapState};
