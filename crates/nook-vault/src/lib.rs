pub mod cipher;
pub mod error;
pub mod keys;
pub mod snapshot;

pub use error::VaultError;
pub use keys::load_or_create_key;
pub use snapshot::Vault;
