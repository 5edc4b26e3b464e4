//! Application state behind the quiz card builder and player.
//! Owns the deck being edited, the pending card typed into the editor and the
//! study session running over the deck. Views learn about sessions starting
//! and ending through `SessionEvent` messages instead of holding references
//! to each other.

use crate::error::{DeckError, Result};
use crate::models::{Deck, Outcome, SessionState, SessionSummary, StudySession};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};

/// Session lifecycle notifications for subscribed views.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Started { deck_name: String, cards: usize },
    /// A second session was requested while one runs; bring it to the front.
    FocusRequested,
    Closed { summary: SessionSummary },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The deck was never saved; ask for a path and call `save_as`.
    NeedsPath,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeginOutcome {
    Started,
    AlreadyRunning,
    /// Nothing to study; the caller should offer to open a deck first.
    NoCards,
}

/// Which context currently owns the deck.
#[derive(Debug)]
enum AppScreen {
    Builder(Deck),
    Player(StudySession),
}

impl Default for AppScreen {
    fn default() -> Self {
        AppScreen::Builder(Deck::default())
    }
}

/// Main application state
#[derive(Default)]
pub struct QuizApp {
    screen: AppScreen,
    pending_question: String,
    pending_answer: String,
    subscribers: Vec<Sender<SessionEvent>>,
}

fn session_running(action: &'static str) -> DeckError {
    warn!("Cannot {action} while a study session is running");
    DeckError::state(action, "a study session is running")
}

fn no_session(action: &'static str) -> DeckError {
    DeckError::state(action, "no study session is running")
}

impl QuizApp {
    /// Creates the application with a new, untitled deck
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deck(deck: Deck) -> Self {
        Self {
            screen: AppScreen::Builder(deck),
            ..Self::default()
        }
    }

    pub fn deck(&self) -> &Deck {
        match &self.screen {
            AppScreen::Builder(deck) => deck,
            AppScreen::Player(session) => session.deck(),
        }
    }

    pub fn session(&self) -> Option<&StudySession> {
        match &self.screen {
            AppScreen::Builder(_) => None,
            AppScreen::Player(session) => Some(session),
        }
    }

    pub fn is_studying(&self) -> bool {
        matches!(self.screen, AppScreen::Player(_))
    }

    /// The editor is read-only while a study session runs.
    pub fn is_editable(&self) -> bool {
        !self.is_studying()
    }

    /// Registers a view for session lifecycle events.
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: SessionEvent) {
        debug!("Emitting {event:?}");
        // Drop subscribers whose receiver is gone
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn deck_mut(&mut self, action: &'static str) -> Result<&mut Deck> {
        match &mut self.screen {
            AppScreen::Builder(deck) => Ok(deck),
            AppScreen::Player(_) => Err(session_running(action)),
        }
    }

    fn session_mut(&mut self, action: &'static str) -> Result<&mut StudySession> {
        match &mut self.screen {
            AppScreen::Player(session) => Ok(session),
            AppScreen::Builder(_) => Err(no_session(action)),
        }
    }

    pub fn pending_question(&self) -> &str {
        &self.pending_question
    }

    pub fn pending_answer(&self) -> &str {
        &self.pending_answer
    }

    /// Replaces the question being typed. Editing marks the deck modified.
    pub fn set_pending_question(&mut self, text: impl Into<String>) -> Result<()> {
        self.deck_mut("edit the question")?.set_modified(true);
        self.pending_question = text.into();
        Ok(())
    }

    pub fn set_pending_answer(&mut self, text: impl Into<String>) -> Result<()> {
        self.deck_mut("edit the answer")?.set_modified(true);
        self.pending_answer = text.into();
        Ok(())
    }

    /// Appends the pending question and answer to the deck and clears them.
    pub fn add_pending_card(&mut self) -> Result<()> {
        let AppScreen::Builder(deck) = &mut self.screen else {
            return Err(session_running("add a card"));
        };
        deck.add_card(
            std::mem::take(&mut self.pending_question),
            std::mem::take(&mut self.pending_answer),
        );
        debug!("Added card {} to '{}'", deck.len(), deck.display_name());
        Ok(())
    }

    /// Saves to the deck's own file, if it has one.
    pub fn save(&mut self) -> Result<SaveOutcome> {
        let Some(path) = self.deck().source_path().map(Path::to_path_buf) else {
            return Ok(SaveOutcome::NeedsPath);
        };
        self.save_as(path)?;
        Ok(SaveOutcome::Saved)
    }

    /// Saves to `path` and makes it the deck's file. A typed but not yet added
    /// question is added first.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let AppScreen::Builder(deck) = &mut self.screen else {
            return Err(session_running("save the deck"));
        };
        if !self.pending_question.is_empty() {
            deck.add_card(
                std::mem::take(&mut self.pending_question),
                std::mem::take(&mut self.pending_answer),
            );
        }
        deck.save(path)?;
        deck.set_modified(false);
        info!("Deck '{}' saved", deck.display_name());
        Ok(())
    }

    /// Replaces the current deck with the one stored at `path`.
    ///
    /// The current deck is only discarded once the new one loaded completely.
    /// Callers wanting to keep unsaved work check `needs_save_prompt` first.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.deck_mut("open another deck")?;
        let deck = Deck::open(path)?;
        info!("Opened '{}' with {} cards", deck.display_name(), deck.len());

        self.screen = AppScreen::Builder(deck);
        self.pending_question.clear();
        self.pending_answer.clear();
        Ok(())
    }

    /// Whether discarding the deck now would lose work.
    ///
    /// Used both before quitting and before opening another deck. A modified
    /// deck with no cards and no typed text needs no prompt in either case.
    pub fn needs_save_prompt(&self) -> bool {
        let deck = self.deck();
        let nothing_to_save = deck.is_empty()
            && self.pending_question.is_empty()
            && self.pending_answer.is_empty();
        deck.is_modified() && !nothing_to_save
    }

    /// Shuffles the deck. The new order is saved with the deck, so this marks
    /// it modified.
    pub fn shuffle(&mut self) -> Result<()> {
        let deck = self.deck_mut("shuffle the deck")?;
        deck.shuffle();
        deck.set_modified(true);
        Ok(())
    }

    /// Starts studying the deck, unless there is nothing to study or a session
    /// is already running.
    pub fn begin_test(&mut self) -> Result<BeginOutcome> {
        match std::mem::take(&mut self.screen) {
            AppScreen::Player(session) => {
                self.screen = AppScreen::Player(session);
                self.emit(SessionEvent::FocusRequested);
                Ok(BeginOutcome::AlreadyRunning)
            }
            AppScreen::Builder(deck) if deck.is_empty() => {
                self.screen = AppScreen::Builder(deck);
                Ok(BeginOutcome::NoCards)
            }
            AppScreen::Builder(deck) => match StudySession::start(deck) {
                Ok(session) => {
                    let event = SessionEvent::Started {
                        deck_name: session.deck().display_name().to_string(),
                        cards: session.deck().len(),
                    };
                    self.screen = AppScreen::Player(session);
                    self.emit(event);
                    Ok(BeginOutcome::Started)
                }
                Err(refused) => {
                    self.screen = AppScreen::Builder(refused.deck);
                    Err(refused.error)
                }
            },
        }
    }

    pub fn reveal(&mut self) -> Result<&str> {
        self.session_mut("reveal the answer")?.reveal()
    }

    pub fn judge(&mut self, outcome: Outcome) -> Result<SessionState> {
        self.session_mut("judge a card")?.judge(outcome)
    }

    /// Dismisses the results of a finished session and returns to editing.
    pub fn acknowledge_results(&mut self) -> Result<SessionSummary> {
        let summary = self
            .session_mut("acknowledge results")?
            .acknowledge_results()?;
        self.return_to_builder(summary.clone());
        Ok(summary)
    }

    /// Ends the running session early. Returns `None` if none was running.
    pub fn close_session(&mut self) -> Option<SessionSummary> {
        let AppScreen::Player(session) = &mut self.screen else {
            return None;
        };
        let summary = session.close()?;
        self.return_to_builder(summary.clone());
        Some(summary)
    }

    fn return_to_builder(&mut self, summary: SessionSummary) {
        if let AppScreen::Player(session) = std::mem::take(&mut self.screen) {
            self.screen = AppScreen::Builder(session.into_deck());
        }
        self.emit(SessionEvent::Closed { summary });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeckError;
    use std::fs;
    use tempfile::tempdir;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn app_with_cards() -> QuizApp {
        let mut deck = Deck::new();
        deck.add_card("cześć", "hello");
        deck.add_card("dziękuję", "thank you");
        deck.add_card("proszę", "please");
        QuizApp::with_deck(deck)
    }

    #[test]
    fn test_new_app_has_untitled_deck() {
        let app = QuizApp::new();
        assert_eq!(app.deck().display_name(), "Untitled");
        assert!(app.is_editable());
        assert!(app.session().is_none());
        assert!(!app.needs_save_prompt());
    }

    #[test]
    fn test_typing_and_adding_card() {
        let mut app = QuizApp::new();
        app.set_pending_question("capital of France").unwrap();
        app.set_pending_answer("Paris").unwrap();
        assert!(app.deck().is_modified());
        assert!(app.needs_save_prompt());

        app.add_pending_card().unwrap();
        assert_eq!(app.deck().len(), 1);
        assert_eq!(app.deck().cards()[0].answer(), "Paris");
        assert!(app.pending_question().is_empty());
        assert!(app.pending_answer().is_empty());
    }

    #[test]
    fn test_modified_but_empty_needs_no_prompt() {
        let mut app = QuizApp::new();
        app.set_pending_question("typo").unwrap();
        app.set_pending_question("").unwrap();
        assert!(app.deck().is_modified());
        assert!(!app.needs_save_prompt());
    }

    #[test]
    fn test_save_untitled_needs_path() {
        let mut app = app_with_cards();
        assert_eq!(app.save().unwrap(), SaveOutcome::NeedsPath);
    }

    #[test]
    fn test_save_as_commits_pending_question() {
        init_logger();
        let dir = tempdir().unwrap();
        let path = dir.path().join("polish.deck");
        let mut app = app_with_cards();
        app.set_pending_question("do widzenia").unwrap();

        app.save_as(&path).unwrap();

        assert_eq!(app.deck().len(), 4);
        assert_eq!(app.deck().cards()[3].answer(), " ");
        assert_eq!(app.deck().display_name(), "polish");
        assert!(!app.deck().is_modified());
        assert_eq!(Deck::open(&path).unwrap().len(), 4);
    }

    #[test]
    fn test_save_uses_existing_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("polish.deck");
        let mut app = app_with_cards();
        app.save_as(&path).unwrap();

        app.set_pending_question("tak").unwrap();
        app.set_pending_answer("yes").unwrap();
        assert_eq!(app.save().unwrap(), SaveOutcome::Saved);

        let reloaded = Deck::open(&path).unwrap();
        assert_eq!(reloaded.len(), 4);
        assert_eq!(reloaded.cards()[3].question(), "tak");
    }

    #[test]
    fn test_open_replaces_deck() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("french.deck");
        let mut other = Deck::new();
        other.add_card("bonjour", "hello");
        other.save(&path).unwrap();

        let mut app = app_with_cards();
        app.set_pending_question("unsaved").unwrap();
        app.open(&path).unwrap();

        assert_eq!(app.deck().display_name(), "french");
        assert_eq!(app.deck().len(), 1);
        assert!(!app.deck().is_modified());
        assert!(app.pending_question().is_empty());
    }

    #[test]
    fn test_failed_open_keeps_current_deck() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.deck");
        fs::write(&path, "no separator at all").unwrap();

        let mut app = app_with_cards();
        assert!(matches!(app.open(&path), Err(DeckError::Format { .. })));
        assert!(matches!(
            app.open(dir.path().join("missing.deck")),
            Err(DeckError::Storage { .. })
        ));
        assert_eq!(app.deck().len(), 3);
        assert_eq!(app.deck().display_name(), "Untitled");
    }

    #[test]
    fn test_shuffle_marks_modified() {
        let mut app = app_with_cards();
        app.shuffle().unwrap();
        assert!(app.deck().is_modified());
        assert_eq!(app.deck().len(), 3);
    }

    #[test]
    fn test_begin_test_without_cards() {
        let mut app = QuizApp::new();
        let events = app.subscribe();
        assert_eq!(app.begin_test().unwrap(), BeginOutcome::NoCards);
        assert!(!app.is_studying());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_full_session_emits_events() {
        init_logger();
        let mut app = app_with_cards();
        let events = app.subscribe();

        assert_eq!(app.begin_test().unwrap(), BeginOutcome::Started);
        assert!(app.deck().is_test_running());
        assert!(!app.is_editable());
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::Started {
                deck_name: "Untitled".to_string(),
                cards: 3
            }
        );

        for outcome in [Outcome::Correct, Outcome::Wrong, Outcome::Correct] {
            app.reveal().unwrap();
            app.judge(outcome).unwrap();
        }
        assert_eq!(app.deck().num_correct(), 2);
        assert_eq!(app.deck().num_wrong(), 1);

        let summary = app.acknowledge_results().unwrap();
        assert_eq!((summary.correct, summary.wrong), (2, 1));
        assert!(app.is_editable());
        assert!(!app.deck().is_test_running());
        assert_eq!(app.deck().num_correct(), 0);

        match events.try_recv().unwrap() {
            SessionEvent::Closed { summary } => assert!(summary.is_complete()),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_second_begin_requests_focus() {
        let mut app = app_with_cards();
        let events = app.subscribe();
        app.begin_test().unwrap();
        app.reveal().unwrap();

        assert_eq!(app.begin_test().unwrap(), BeginOutcome::AlreadyRunning);
        assert_eq!(app.session().unwrap().state(), SessionState::AwaitingJudgment(0));

        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert_eq!(received[1], SessionEvent::FocusRequested);
    }

    #[test]
    fn test_editing_locked_during_session() {
        let mut app = app_with_cards();
        app.begin_test().unwrap();

        assert!(matches!(
            app.set_pending_question("x"),
            Err(DeckError::State { .. })
        ));
        assert!(app.add_pending_card().is_err());
        assert!(app.shuffle().is_err());
        assert!(app.save_as("ignored.deck").is_err());
        assert!(app.open("ignored.deck").is_err());
        assert_eq!(app.deck().len(), 3);
    }

    #[test]
    fn test_close_session_early() {
        let mut app = app_with_cards();
        let events = app.subscribe();
        app.begin_test().unwrap();
        app.reveal().unwrap();
        app.judge(Outcome::Wrong).unwrap();

        let summary = app.close_session().unwrap();
        assert_eq!(summary.wrong, 1);
        assert!(!summary.is_complete());
        assert!(!app.is_studying());
        assert_eq!(app.deck().num_wrong(), 0);
        assert!(app.close_session().is_none());

        assert_eq!(events.try_iter().count(), 2);
    }

    #[test]
    fn test_session_operations_without_session() {
        let mut app = app_with_cards();
        assert!(app.reveal().is_err());
        assert!(app.judge(Outcome::Correct).is_err());
        assert!(app.acknowledge_results().is_err());
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut app = app_with_cards();
        drop(app.subscribe());
        let kept = app.subscribe();

        app.begin_test().unwrap();
        assert_eq!(app.subscribers.len(), 1);
        assert!(kept.try_recv().is_ok());
    }
}
