//! Model provider adapters.

pub mod openai;
pub mod scripted;

pub use openai::OpenAiCompatibleProvider;
pub use scripted::ScriptedModelProvider;
