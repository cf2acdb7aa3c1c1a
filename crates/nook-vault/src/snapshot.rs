use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cipher;
use crate::error::VaultError;

/// Save/load of serializable values as single snapshot files inside a
/// dedicated cache directory, encrypted under the process key.
///
/// File layout is `nonce || ciphertext+tag` for encrypted stores and
/// raw serialized bytes for plaintext ones. One file per logical store,
/// no version header.
#[derive(Clone)]
pub struct Vault {
    key: [u8; 32],
    cache_dir: PathBuf,
}

impl Vault {
    pub fn new(key: [u8; 32], cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            key,
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Serialize and encrypt `value`, then atomically replace `file`.
    pub fn save<T: Serialize>(&self, value: &T, file: &str) -> Result<(), VaultError> {
        let data = serde_json::to_vec(value)?;
        let sealed = cipher::encrypt(&data, &self.key)?;
        self.write_atomic(file, &sealed)?;
        debug!(file, bytes = sealed.len(), "snapshot saved");
        Ok(())
    }

    /// Load and decrypt a snapshot.
    ///
    /// A missing file is not an error: it reads as "no state yet" and
    /// returns `None`. An empty file reads as the zero value. A failed
    /// authentication or deserialization is a hard error; callers must
    /// never proceed with unauthenticated data.
    pub fn load<T: DeserializeOwned + Default>(&self, file: &str) -> Result<Option<T>, VaultError> {
        let Some(data) = self.read(file)? else {
            return Ok(None);
        };
        if data.is_empty() {
            return Ok(Some(T::default()));
        }
        let plaintext = cipher::decrypt(&data, &self.key)?;
        Ok(Some(serde_json::from_slice(&plaintext)?))
    }

    /// Serialize `value` without encryption, for non-sensitive stores.
    pub fn save_plain<T: Serialize>(&self, value: &T, file: &str) -> Result<(), VaultError> {
        let data = serde_json::to_vec(value)?;
        self.write_atomic(file, &data)
    }

    /// Load a plaintext store. Same missing/empty semantics as `load`.
    pub fn load_plain<T: DeserializeOwned + Default>(
        &self,
        file: &str,
    ) -> Result<Option<T>, VaultError> {
        let Some(data) = self.read(file)? else {
            return Ok(None);
        };
        if data.is_empty() {
            return Ok(Some(T::default()));
        }
        Ok(Some(serde_json::from_slice(&data)?))
    }

    fn read(&self, file: &str) -> Result<Option<Vec<u8>>, VaultError> {
        let path = self.cache_dir.join(file);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read(&path)?))
    }

    /// Write to a sibling temp file, then rename over the target so a
    /// crash mid-write never leaves a half-written snapshot behind.
    fn write_atomic(&self, file: &str, data: &[u8]) -> Result<(), VaultError> {
        std::fs::create_dir_all(&self.cache_dir)?;
        let path = self.cache_dir.join(file);
        let tmp = self.cache_dir.join(format!("{file}.tmp"));
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}
