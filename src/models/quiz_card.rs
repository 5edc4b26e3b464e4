//! QuizCard is a pair <question, answer>. Neither side is ever stored empty.
use serde::{Deserialize, Serialize};

/// Stored in place of an empty question or answer.
pub const BLANK: &str = " ";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuizCard {
    question: String,
    answer: String,
}

impl QuizCard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: normalize(question.into()),
            answer: normalize(answer.into()),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn set_question(&mut self, text: impl Into<String>) {
        self.question = normalize(text.into());
    }

    pub fn set_answer(&mut self, text: impl Into<String>) {
        self.answer = normalize(text.into());
    }
}

fn normalize(text: String) -> String {
    if text.is_empty() {
        BLANK.to_string()
    } else {
        text
    }
}
