pub mod mock;
pub mod openai;
pub mod window;

pub use mock::{MockCompleter, MockReply};
pub use openai::OpenAiCompleter;
pub use window::{build_window, DEFAULT_WINDOW_BUDGET};
