//! Study session over a single deck.
//! Walks the cards front to back, revealing each answer and recording whether
//! the user got it right, then reports a summary.

use super::Deck;
use crate::error::{DeckError, Result};
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::fmt;

/// How the user judged their recall of the current card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Wrong,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// The question of card `n` is shown.
    AwaitingReveal(usize),
    /// The answer of card `n` is shown and waits for a judgment.
    AwaitingJudgment(usize),
    /// Every card was judged; results are shown.
    Finished,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::AwaitingReveal(i) => write!(f, "awaiting reveal of card {}", i + 1),
            SessionState::AwaitingJudgment(i) => write!(f, "awaiting judgment of card {}", i + 1),
            SessionState::Finished => write!(f, "finished"),
            SessionState::Closed => write!(f, "closed"),
        }
    }
}

/// Results of a session, captured before the deck counters are reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub total: usize,
    pub correct: u32,
    pub wrong: u32,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl SessionSummary {
    pub fn answered(&self) -> usize {
        (self.correct + self.wrong) as usize
    }

    /// True when every card of the deck was judged.
    pub fn is_complete(&self) -> bool {
        self.answered() == self.total
    }

    pub fn message(&self) -> String {
        if self.is_complete() {
            format!(
                "There are no more questions: {} correct, {} wrong",
                self.correct, self.wrong
            )
        } else {
            format!(
                "Stopped after {} of {} cards: {} correct, {} wrong",
                self.answered(),
                self.total,
                self.correct,
                self.wrong
            )
        }
    }
}

/// Returned when a session cannot start. The deck is handed back untouched.
#[derive(Debug)]
pub struct StartRefused {
    pub deck: Deck,
    pub error: DeckError,
}

/// Owns the deck for as long as the session runs.
#[derive(Debug)]
pub struct StudySession {
    deck: Deck,
    state: SessionState,
    started_at: DateTime<Local>,
    finished_at: Option<DateTime<Local>>,
}

impl StudySession {
    /// Starts at the first card. The deck must have cards and must not
    /// already be under test.
    pub fn start(mut deck: Deck) -> std::result::Result<Self, StartRefused> {
        let refusal = if deck.is_empty() {
            Some("the deck has no cards")
        } else if deck.is_test_running() {
            Some("a study session is already running over this deck")
        } else {
            None
        };
        if let Some(reason) = refusal {
            warn!("Refusing to start study session: {reason}");
            return Err(StartRefused {
                deck,
                error: DeckError::state("start a study session", reason),
            });
        }

        deck.set_test_running(true);
        info!(
            "Study session started on '{}' with {} cards",
            deck.display_name(),
            deck.len()
        );
        Ok(Self {
            deck,
            state: SessionState::AwaitingReveal(0),
            started_at: Local::now(),
            finished_at: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Index of the card being studied; the card count once finished and
    /// one past it once closed.
    pub fn cursor(&self) -> usize {
        match self.state {
            SessionState::AwaitingReveal(i) | SessionState::AwaitingJudgment(i) => i,
            SessionState::Finished => self.deck.len(),
            SessionState::Closed => self.deck.len() + 1,
        }
    }

    pub fn current_question(&self) -> Option<&str> {
        match self.state {
            SessionState::AwaitingReveal(i) | SessionState::AwaitingJudgment(i) => {
                self.deck.cards().get(i).map(|card| card.question())
            }
            _ => None,
        }
    }

    /// The answer of the current card, only once it has been revealed.
    pub fn current_answer(&self) -> Option<&str> {
        match self.state {
            SessionState::AwaitingJudgment(i) => self.deck.cards().get(i).map(|card| card.answer()),
            _ => None,
        }
    }

    pub fn is_answer_shown(&self) -> bool {
        matches!(self.state, SessionState::AwaitingJudgment(_))
    }

    /// (1-based position of the current card, total cards)
    pub fn progress(&self) -> (usize, usize) {
        let total = self.deck.len();
        (self.cursor().saturating_add(1).min(total), total)
    }

    pub fn progress_message(&self) -> String {
        match self.state {
            SessionState::Finished => "Results:".to_string(),
            SessionState::Closed => "Session closed".to_string(),
            _ => {
                let (position, total) = self.progress();
                format!("Card {position} of {total}")
            }
        }
    }

    /// Shows the answer of the current card.
    pub fn reveal(&mut self) -> Result<&str> {
        match self.state {
            SessionState::AwaitingReveal(i) => {
                self.state = SessionState::AwaitingJudgment(i);
                debug!("Revealed answer of card {}", i + 1);
                Ok(self.deck.cards()[i].answer())
            }
            other => Err(self.refuse("reveal the answer", other)),
        }
    }

    /// Records the judgment on the revealed card and moves to the next one.
    pub fn judge(&mut self, outcome: Outcome) -> Result<SessionState> {
        match self.state {
            SessionState::AwaitingJudgment(i) => {
                self.deck.record(outcome);
                debug!("Card {} judged {:?}", i + 1, outcome);
                self.state = if i + 1 < self.deck.len() {
                    SessionState::AwaitingReveal(i + 1)
                } else {
                    self.finished_at = Some(Local::now());
                    info!(
                        "Study session finished: {} correct, {} wrong",
                        self.deck.num_correct(),
                        self.deck.num_wrong()
                    );
                    SessionState::Finished
                };
                Ok(self.state)
            }
            other => Err(self.refuse("judge a card", other)),
        }
    }

    /// Results of a finished session, before they are acknowledged.
    pub fn summary(&self) -> Option<SessionSummary> {
        match self.state {
            SessionState::Finished => Some(self.snapshot()),
            _ => None,
        }
    }

    /// Dismisses the results and closes the session.
    pub fn acknowledge_results(&mut self) -> Result<SessionSummary> {
        match self.state {
            SessionState::Finished => {
                let summary = self.snapshot();
                self.shut();
                Ok(summary)
            }
            other => Err(self.refuse("acknowledge results", other)),
        }
    }

    /// Ends the session from any state and resets the deck's running flag and
    /// counters. Returns the results gathered so far, or `None` if the session
    /// was already closed, in which case nothing is touched.
    pub fn close(&mut self) -> Option<SessionSummary> {
        if self.state == SessionState::Closed {
            return None;
        }
        let summary = self.snapshot();
        self.shut();
        Some(summary)
    }

    /// Gives the deck back, closing the session first if needed.
    pub fn into_deck(mut self) -> Deck {
        self.close();
        self.deck
    }

    fn snapshot(&self) -> SessionSummary {
        SessionSummary {
            total: self.deck.len(),
            correct: self.deck.num_correct(),
            wrong: self.deck.num_wrong(),
            started_at: self.started_at,
            finished_at: self.finished_at.unwrap_or_else(Local::now),
        }
    }

    fn shut(&mut self) {
        self.state = SessionState::Closed;
        self.deck.reset_session();
        info!("Study session on '{}' closed", self.deck.display_name());
    }

    fn refuse(&self, action: &'static str, state: SessionState) -> DeckError {
        warn!("Cannot {action} while the session is {state}");
        DeckError::state(action, format!("the study session is {state}"))
    }
}
