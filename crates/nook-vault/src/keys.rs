use std::path::Path;

use tracing::info;

use crate::cipher;
use crate::error::VaultError;

/// Load or create the process key file.
///
/// First run: generate a random 256-bit key, write it base64-encoded
/// with owner-only permissions, return it. Later runs: decode and
/// return the existing file. An existing key is never regenerated;
/// losing it permanently invalidates every encrypted snapshot.
///
/// Called once at startup; any error here is fatal to the process.
pub fn load_or_create_key(path: &Path) -> Result<[u8; 32], VaultError> {
    if path.exists() {
        let encoded = std::fs::read_to_string(path)?;
        let bytes = base64::Engine::decode(
            &base64::engine::general_purpose::STANDARD,
            encoded.trim(),
        )
        .map_err(|_| VaultError::KeyEncoding)?;
        if bytes.len() != 32 {
            return Err(VaultError::KeyLength);
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        info!(path = %path.display(), "loaded key");
        Ok(key)
    } else {
        let key = cipher::generate_key();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let encoded = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, key);
        std::fs::write(path, &encoded)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        info!(path = %path.display(), "generated new key");
        Ok(key)
    }
}
