#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("encryption failed")]
    Encrypt,

    #[error("decryption failed")]
    Decrypt,

    #[error("malformed snapshot file")]
    Malformed,

    #[error("invalid key encoding")]
    KeyEncoding,

    #[error("invalid key length")]
    KeyLength,

    #[error("serialization error: {0}")]
    Serde(String),
}

impl From<std::io::Error> for VaultError {
    fn from(e: std::io::Error) -> Self {
        VaultError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(e: serde_json::Error) -> Self {
        VaultError::Serde(e.to_string())
    }
}
