// Public modules
pub mod chat_chunk;
pub mod chat_request;
pub mod chat_response;
pub mod message;
pub mod model;

// Re-exports
pub use chat_chunk::{ChatCompletionChunk, ChunkChoice, Delta};
pub use chat_request::{ChatCompletionRequest, CompletionOptions};
pub use chat_response::{ApiErrorDetail, ChatCompletionResponse, Choice, ErrorResponse, ResponseMessage};
pub use message::{Message, Role};
pub use model::{KnownModel, Model};
