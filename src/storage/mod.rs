pub mod deck_file;

pub use deck_file::{DeckFormat, FIELD_SEPARATOR, RECORD_TERMINATOR};
