pub mod completer;
pub mod errors;
pub mod messages;

pub use completer::{Completer, CompletionRequest};
pub use errors::CompleterError;
pub use messages::{ChatMessage, Role};
