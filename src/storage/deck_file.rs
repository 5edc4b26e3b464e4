//! Plain-text deck file format
//!
//! A deck file is every card written as `question FIELD_SEPARATOR answer RECORD_TERMINATOR`,
//! concatenated, with no header, version tag or escaping.
//!
//! Known limitation: a literal separator or terminator inside card text is
//! indistinguishable from the delimiter and corrupts the file on the next load.
//! Escaping would change the format, so it is not done here; use the JSON
//! interchange in `export::json` for such decks.

use crate::error::{DeckError, Result};
use log::debug;
use std::fs;
use std::path::Path;

pub const FIELD_SEPARATOR: &str = "\te23bf0hj\t";
pub const RECORD_TERMINATOR: &str = "\n29rje2r9\n";

/// Delimiters used to frame cards in a deck file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckFormat {
    pub field_separator: String,
    pub record_terminator: String,
}

impl Default for DeckFormat {
    fn default() -> Self {
        Self {
            field_separator: FIELD_SEPARATOR.to_string(),
            record_terminator: RECORD_TERMINATOR.to_string(),
        }
    }
}

/// Splits file content into (question, answer) pairs.
///
/// Trailing empty records are dropped, so the terminator after the last card
/// and an empty file are both accepted. Any other record must contain exactly
/// one field separator.
pub fn parse(content: &str, format: &DeckFormat) -> Result<Vec<(String, String)>> {
    let mut records: Vec<&str> = content.split(format.record_terminator.as_str()).collect();
    while records.last().is_some_and(|record| record.is_empty()) {
        records.pop();
    }

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let fields: Vec<&str> = record.split(format.field_separator.as_str()).collect();
            match fields.as_slice() {
                [question, answer] => Ok((question.to_string(), answer.to_string())),
                _ => Err(DeckError::Format {
                    record: i + 1,
                    reason: format!("has {} fields, expected 2", fields.len()),
                }),
            }
        })
        .collect()
}

/// Renders (question, answer) pairs as file content.
pub fn serialize<'a, I>(cards: I, format: &DeckFormat) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (question, answer) in cards {
        out.push_str(question);
        out.push_str(&format.field_separator);
        out.push_str(answer);
        out.push_str(&format.record_terminator);
    }
    out
}

/// Reads the whole deck file as text.
///
/// I/O failures are `Storage` errors. Content that is not UTF-8 is a `Format`
/// error naming the record, counted with the default terminator, that holds
/// the first invalid byte.
pub fn read_deck_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| DeckError::storage(path, e))?;
    debug!("Read {} bytes from '{}'", bytes.len(), path.display());
    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        // The prefix is valid UTF-8 by construction
        let prefix = String::from_utf8_lossy(valid);
        DeckError::Format {
            record: prefix.matches(RECORD_TERMINATOR).count() + 1,
            reason: "is not valid UTF-8".to_string(),
        }
    })
}

/// Replaces the deck file's content, creating the file if needed.
pub fn write_deck_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| DeckError::storage(path, e))?;
    debug!("Wrote {} bytes to '{}'", content.len(), path.display());
    Ok(())
}

/// Base name of `path` without the text after its last `.`.
///
/// A dot-prefixed name such as `.hidden` has nothing before its only dot and
/// yields an empty name.
pub fn display_name_for(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let stem = match name.rsplit_once('.') {
        Some((stem, _extension)) => stem,
        None => &*name,
    };
    Some(stem.to_string())
}
