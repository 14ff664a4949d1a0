pub mod gemini_client;
pub mod openai_client;

pub use gemini_client::GeminiClient;
pub use openai_client::OpenAiCompatClient;
