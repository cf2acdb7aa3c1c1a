pub mod routes;
pub mod server;
pub mod service;
pub mod template;

pub use server::{build_router, start, AppState, ServerConfig, ServerHandle};
pub use service::{ChatService, PromptReply, DEFAULT_CHANNEL, DEFAULT_CHANNELS};
