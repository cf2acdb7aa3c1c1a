pub mod channel;
pub mod error;
pub mod flush;
pub mod registry;

pub use channel::Channel;
pub use error::StoreError;
pub use flush::{run_flush_loop, FlushSignal, SnapshotSink, VaultSink};
pub use registry::ChannelRegistry;
