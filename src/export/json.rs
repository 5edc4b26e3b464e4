//! JSON import/export module for quiz card decks.
//! Unlike the plain deck file, JSON escapes its content, so cards may contain
//! any text including the deck file delimiters.

use crate::error::{DeckError, Result};
use crate::models::{Deck, QuizCard};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk JSON document for a deck.
#[derive(Serialize, Deserialize)]
struct DeckDocument {
    name: String,
    cards: Vec<QuizCard>,
}

/// Exports a deck to a JSON file at the specified path.
/// Returns an error if file creation or writing fails.
pub fn export_json_to_path(deck: &Deck, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let document = DeckDocument {
        name: deck.display_name().to_string(),
        cards: deck.cards().to_vec(),
    };
    let json_string = serde_json::to_string_pretty(&document)?;
    fs::write(path, json_string).map_err(|e| DeckError::storage(path, e))?;

    info!("Deck '{}' exported to '{}'", document.name, path.display());
    Ok(())
}

/// Imports a deck from a JSON file as a new, unsaved deck.
/// Empty questions or answers in the file are normalized like any added card.
pub fn import_json(path: impl AsRef<Path>) -> Result<Deck> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| DeckError::storage(path, e))?;

    let document: DeckDocument = serde_json::from_str(&contents)?;
    let mut deck = Deck::with_cards(document.name, Vec::new());
    for card in document.cards {
        deck.add_card(card.question(), card.answer());
    }

    info!("Deck '{}' imported from '{}'", deck.display_name(), path.display());
    Ok(deck)
}
