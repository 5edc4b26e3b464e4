pub mod app;
pub mod error;
pub mod export;
pub mod models;
pub mod storage;

pub use app::{BeginOutcome, QuizApp, SaveOutcome, SessionEvent};
pub use error::{DeckError, Result};
pub use models::{Deck, Outcome, QuizCard, SessionState, SessionSummary, StudySession};
