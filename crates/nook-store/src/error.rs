#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    #[error("persist error: {0}")]
    Persist(String),
}

impl From<nook_vault::VaultError> for StoreError {
    fn from(e: nook_vault::VaultError) -> Self {
        StoreError::Persist(e.to_string())
    }
}
