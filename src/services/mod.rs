pub mod question_provider;

pub use question_provider::{ProviderOutcome, QuestionProvider, QuestionSource};
