//! Data models for the Chat Completions API.
//!
//! Only the subset needed to ask for a single completion and read back the
//! first choice is modelled. The outbound call itself lives in `crate::joke`.

pub mod chat;

pub use chat::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatResponseMessage,
    ChatUsage, Role,
};
