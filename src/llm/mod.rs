//! Model-invocation substrate: prompt model, backend clients, and the
//! prioritized failover chain every feature dispatches through.

pub mod failover;
pub mod openrouter;
pub mod prompt;

pub use failover::{AttemptRecord, DispatchError, FailoverChain};
pub use openrouter::{BackendError, ChatModel, MockChatModel, OpenRouterClient};
pub use prompt::{ImageAttachment, Prompt, Role, Turn};
