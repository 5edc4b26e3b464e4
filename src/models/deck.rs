//! Deck is an ordered set of quiz cards plus the file it came from and the
//! counters of the study session running over it.
use super::{Outcome, QuizCard};
use crate::error::Result;
use crate::storage::deck_file::{self, DeckFormat};
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};

/// Display name of a deck that has never been saved or opened.
pub const UNTITLED: &str = "Untitled";

#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<QuizCard>,
    source_path: Option<PathBuf>,
    display_name: String,
    is_modified: bool,
    is_test_running: bool,
    num_correct: u32,
    num_wrong: u32,
}

impl Default for Deck {
    fn default() -> Self {
        Self {
            cards: Vec::new(),
            source_path: None,
            display_name: UNTITLED.to_string(),
            is_modified: false,
            is_test_running: false,
            num_correct: 0,
            num_wrong: 0,
        }
    }
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a deck file into a fresh deck.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut deck = Self::default();
        deck.load(path)?;
        Ok(deck)
    }

    /// Builds an unsaved deck from existing cards, e.g. after a JSON import.
    pub fn with_cards(display_name: impl Into<String>, cards: Vec<QuizCard>) -> Self {
        Self {
            cards,
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    /// Appends a card. Empty text is stored as a single space.
    pub fn add_card(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.cards.push(QuizCard::new(question, answer));
    }

    /// Appends every card of the deck file at `path` and adopts it as the source.
    ///
    /// The file is parsed completely before anything is added, so a storage or
    /// format error leaves the deck untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = deck_file::read_deck_file(path)?;
        let records = deck_file::parse(&content, &DeckFormat::default())?;
        debug!("Parsed {} cards from '{}'", records.len(), path.display());

        for (question, answer) in records {
            self.add_card(question, answer);
        }
        self.adopt_path(path);
        Ok(())
    }

    /// Writes every card to `path`, replacing the file, and adopts it as the source.
    ///
    /// The modified flag is left alone; callers clear it once the save is
    /// known to have succeeded.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = deck_file::serialize(
            self.cards.iter().map(|card| (card.question(), card.answer())),
            &DeckFormat::default(),
        );
        deck_file::write_deck_file(path, &content)?;
        debug!("Saved {} cards to '{}'", self.cards.len(), path.display());
        self.adopt_path(path);
        Ok(())
    }

    /// Uniformly permutes the cards in place.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        debug!("Shuffled {} cards", self.cards.len());
    }

    fn adopt_path(&mut self, path: &Path) {
        if let Some(name) = deck_file::display_name_for(path) {
            self.display_name = name;
        }
        self.source_path = Some(path.to_path_buf());
    }

    pub fn cards(&self) -> &[QuizCard] {
        &self.cards
    }

    /// Editable access to one card; the card's position is its identity.
    pub fn card_mut(&mut self, index: usize) -> Option<&mut QuizCard> {
        self.cards.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.is_modified = modified;
    }

    pub fn is_test_running(&self) -> bool {
        self.is_test_running
    }

    pub fn num_correct(&self) -> u32 {
        self.num_correct
    }

    pub fn num_wrong(&self) -> u32 {
        self.num_wrong
    }

    pub(crate) fn set_test_running(&mut self, running: bool) {
        self.is_test_running = running;
    }

    pub(crate) fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Correct => self.num_correct += 1,
            Outcome::Wrong => self.num_wrong += 1,
        }
    }

    /// Clears the running flag and both counters when a session ends.
    pub(crate) fn reset_session(&mut self) {
        self.is_test_running = false;
        self.num_correct = 0;
        self.num_wrong = 0;
    }
}
