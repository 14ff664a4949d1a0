pub mod question;
pub mod topic;

pub use question::{Question, QuestionFlaw};
pub use topic::{Difficulty, Topic};
