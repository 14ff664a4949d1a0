pub mod controller;
pub mod state;

pub use controller::SessionController;
pub use state::{
    AnswerFeedback, GameOutcome, GameSession, Phase, SessionSnapshot, STARTING_LIVES,
};
