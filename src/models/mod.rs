pub mod deck;
pub mod quiz_card;
pub mod study_session;

pub use deck::Deck;
pub use quiz_card::QuizCard;
pub use study_session::{Outcome, SessionState, SessionSummary, StartRefused, StudySession};
