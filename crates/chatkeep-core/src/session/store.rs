//! SessionStore trait definition.
//!
//! Maps a sanitized [`SessionKey`] to a [`Transcript`]. The backing medium is
//! an implementation detail; the orchestrator never touches paths or files.

use chatkeep_types::error::StoreError;
use chatkeep_types::message::Transcript;
use chatkeep_types::session::SessionKey;

/// Durable key -> transcript mapping, one entry per session.
///
/// Implementations live in chatkeep-infra (e.g., `JsonFileSessionStore`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
///
/// Every call reads the backing store fresh; implementations must not cache.
/// "Not found" is a result shape (`None` / `false`), never an error.
pub trait SessionStore: Send + Sync {
    /// Replace the stored transcript for `key`, creating the entry if needed.
    ///
    /// On error the caller must not assume anything was written.
    fn save(
        &self,
        key: &SessionKey,
        transcript: &Transcript,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Load the transcript for `key`, or `None` if no entry exists.
    ///
    /// An entry that exists but cannot be decoded is a `StoreError::Read`.
    fn load(
        &self,
        key: &SessionKey,
    ) -> impl std::future::Future<Output = Result<Option<Transcript>, StoreError>> + Send;

    /// Remove the entry for `key`. Returns `true` if something was removed.
    fn delete(
        &self,
        key: &SessionKey,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;

    /// All stored session keys in lexicographic order.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<String>, StoreError>> + Send;
}
