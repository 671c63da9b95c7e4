//! Session log repository trait.
//!
//! Defines the interface for persisting the session log.

use super::log::SessionLog;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract store for the session log.
///
/// Decouples the session use case from the concrete file format and
/// location.
#[async_trait]
pub trait SessionLogRepository: Send + Sync {
    /// Writes the entire log, replacing whatever was stored before.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Log written
    /// - `Err(_)`: The write failed; nothing is retried
    async fn save(&self, log: &SessionLog) -> Result<()>;

    /// Reads the stored log.
    ///
    /// # Returns
    ///
    /// - `Ok(SessionLog)`: The stored records, or an empty log if nothing
    ///   has been saved yet
    /// - `Err(_)`: The store exists but could not be read or parsed
    async fn load(&self) -> Result<SessionLog>;
}
