//! Password gate in front of the system folder.
//!
//! The check happens on this client only. It keeps casual users out of the
//! metadata documents and is not a security boundary.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use deskfs_core::error::AppError;
use deskfs_core::result::AppResult;
use deskfs_entity::id::ItemId;

/// Lock state of the system folder.
#[derive(Debug)]
pub struct SystemGate {
    system_folder_id: ItemId,
    password: Option<String>,
    unlocked: AtomicBool,
}

impl SystemGate {
    /// Create a gate. Without a password the folder starts unlocked.
    pub fn new(system_folder_id: ItemId, password: Option<String>) -> Self {
        let unlocked = password.is_none();
        Self {
            system_folder_id,
            password,
            unlocked: AtomicBool::new(unlocked),
        }
    }

    /// The protected folder.
    pub fn system_folder_id(&self) -> &ItemId {
        &self.system_folder_id
    }

    /// Whether `id` is the protected folder.
    pub fn is_system(&self, id: &ItemId) -> bool {
        &self.system_folder_id == id
    }

    /// Whether navigation into the folder is refused.
    pub fn is_locked(&self) -> bool {
        !self.unlocked.load(Ordering::SeqCst)
    }

    /// Unlock with the configured password.
    pub fn unlock(&self, password: &str) -> AppResult<()> {
        match &self.password {
            Some(expected) if expected != password => {
                warn!("System folder unlock rejected");
                Err(AppError::permission_denied("Incorrect system folder password"))
            }
            _ => {
                self.unlocked.store(true, Ordering::SeqCst);
                info!("System folder unlocked");
                Ok(())
            }
        }
    }

    /// Lock again. No-op without a password.
    pub fn lock(&self) {
        if self.password.is_some() {
            self.unlocked.store(false, Ordering::SeqCst);
        }
    }

    /// Refuse navigation into the folder while locked.
    pub fn check_navigation(&self, folder_id: &ItemId) -> AppResult<()> {
        if self.is_system(folder_id) && self.is_locked() {
            return Err(AppError::permission_denied("System folder is locked"));
        }
        Ok(())
    }

    /// Refuse any item being moved into the folder.
    pub fn check_move_target(&self, target_id: &ItemId) -> AppResult<()> {
        if self.is_system(target_id) {
            return Err(AppError::permission_denied(
                "Items cannot be moved into the system folder",
            ));
        }
        Ok(())
    }
}
