//! JSON-file session store.
//!
//! Implements the `SessionStore` trait from `chatkeep-core` with one file per
//! session in a flat directory:
//!
//! ```text
//! {root}/
//!   alice-1.json
//!   bob_2.json
//! ```
//!
//! Each file is a pretty-printed JSON array of `{role, content}` objects.
//! Writes go to a hidden temp file in the same directory and are renamed into
//! place, so a reader sees either the old transcript or the new one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chatkeep_core::session::store::SessionStore;
use chatkeep_types::error::StoreError;
use chatkeep_types::message::Transcript;
use chatkeep_types::session::{sanitize, SessionKey};
use tracing::{debug, info};
use uuid::Uuid;

const EXTENSION: &str = "json";

/// Local filesystem session store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct JsonFileSessionStore {
    root: PathBuf,
}

impl JsonFileSessionStore {
    /// Create a store rooted at `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sanitize a raw session ID and map it to its file.
    pub fn resolve_path(&self, session_id: &str) -> Result<PathBuf, StoreError> {
        let key = SessionKey::parse(session_id)?;
        Ok(self.path_for(&key))
    }

    /// File path for an already sanitized key.
    pub fn path_for(&self, key: &SessionKey) -> PathBuf {
        self.root.join(format!("{}.{EXTENSION}", key.as_str()))
    }

    /// Hidden temp file in the store root. The name does not embed the key,
    /// so any key whose final file name is legal can be saved.
    fn temp_path(&self) -> PathBuf {
        self.root.join(format!(".{}.tmp", Uuid::now_v7().simple()))
    }
}

/// Write `body` to `temp_path`, then rename it over `path`.
///
/// The temp file is removed on any failure, including a partial write.
async fn write_atomic(temp_path: &Path, path: &Path, body: &[u8]) -> std::io::Result<()> {
    let result = match tokio::fs::write(temp_path, body).await {
        Ok(()) => tokio::fs::rename(temp_path, path).await,
        Err(e) => Err(e),
    };
    if result.is_err() {
        let _ = tokio::fs::remove_file(temp_path).await;
    }
    result
}

impl SessionStore for JsonFileSessionStore {
    async fn save(&self, key: &SessionKey, transcript: &Transcript) -> Result<(), StoreError> {
        let write_err = |message: String| StoreError::Write {
            key: key.to_string(),
            message,
        };

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| write_err(format!("failed to create {}: {e}", self.root.display())))?;

        let body = serde_json::to_vec_pretty(transcript)
            .map_err(|e| write_err(format!("failed to serialize transcript: {e}")))?;

        let path = self.path_for(key);
        write_atomic(&self.temp_path(), &path, &body)
            .await
            .map_err(|e| write_err(e.to_string()))?;

        info!(
            session_id = %key,
            path = %path.display(),
            messages = transcript.len(),
            "Saved conversation"
        );
        Ok(())
    }

    async fn load(&self, key: &SessionKey) -> Result<Option<Transcript>, StoreError> {
        let path = self.path_for(key);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(session_id = %key, "No saved conversation found");
                return Ok(None);
            }
            Err(e) => {
                return Err(StoreError::Read {
                    key: key.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let transcript: Transcript =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Read {
                key: key.to_string(),
                message: format!("corrupted transcript: {e}"),
            })?;

        info!(
            session_id = %key,
            messages = transcript.len(),
            "Loaded conversation"
        );
        Ok(Some(transcript))
    }

    async fn delete(&self, key: &SessionKey) -> Result<bool, StoreError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => {
                info!(session_id = %key, "Deleted conversation");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(session_id = %key, "No conversation found to delete");
                Ok(false)
            }
            Err(e) => Err(StoreError::Write {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let read_err = |e: std::io::Error| StoreError::Read {
            key: String::new(),
            message: format!("failed to list {}: {e}", self.root.display()),
        };

        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(read_err(e)),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            // Only names this store could have produced.
            if stem.is_empty() || sanitize(stem) != stem {
                continue;
            }
            keys.push(stem.to_string());
        }

        keys.sort();
        Ok(keys)
    }
}
