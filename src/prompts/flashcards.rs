use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single question/answer card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

// "1.", "2)", "-", "*", "•", "Card 3:" in front of the actual content
static LIST_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\d+\s*[.)]\s*|[-*•]\s+|card\s*\d+\s*[:.)-]?\s*)").expect("valid regex")
});

static QUESTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:q|question)\s*\d*\s*[:.)]\s*(.*)$").expect("valid regex"));

static ANSWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:a|answer)\s*[:.)]\s*(.*)$").expect("valid regex"));

// Answer marker in the middle of a question line; needs the colon
static INLINE_ANSWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s(?:a|answer)\s*:\s*").expect("valid regex"));

#[derive(Default)]
struct Pending {
    question: Option<String>,
    answer: Option<String>,
}

impl Pending {
    fn flush(&mut self, cards: &mut Vec<Flashcard>) {
        if let (Some(question), Some(answer)) = (self.question.take(), self.answer.take()) {
            let question = question.trim().to_string();
            let answer = answer.trim().to_string();
            if !question.is_empty() && !answer.is_empty() {
                cards.push(Flashcard { question, answer });
            }
        }
    }
}

fn ends_sentence(text: &str) -> bool {
    text.trim_end().ends_with(['.', '!', '?'])
}

fn strip_marker(line: &str) -> &str {
    match LIST_MARKER.find(line) {
        Some(m) => line[m.end()..].trim_start(),
        None => line,
    }
}

/// Parse generated text into at most `limit` flashcards.
///
/// Best effort: backends do not reliably follow the `Q: ... A: ...` format.
/// Lines that fit no card are skipped, questions without an answer are
/// dropped, and lines after an `A:` are folded into an unfinished answer
/// until a blank line or the next question. Once the answer ends a
/// sentence, further unmarked lines are not part of the card.
pub fn parse_flashcards(text: &str, limit: usize) -> Vec<Flashcard> {
    let mut cards = Vec::new();
    let mut pending = Pending::default();

    for raw in text.lines() {
        let cleaned = raw.replace("**", "");
        let line = cleaned.trim();
        if line.is_empty() {
            pending.flush(&mut cards);
            continue;
        }

        let line = strip_marker(line);

        if let Some(caps) = QUESTION.captures(line) {
            pending.flush(&mut cards);
            let rest = caps.get(1).map_or("", |m| m.as_str());
            match INLINE_ANSWER.find(rest) {
                Some(m) => {
                    pending.question = Some(rest[..m.start()].to_string());
                    pending.answer = Some(rest[m.end()..].to_string());
                }
                None => pending.question = Some(rest.to_string()),
            }
        } else if let Some(caps) = ANSWER.captures(line) {
            let rest = caps.get(1).map_or("", |m| m.as_str());
            if pending.question.is_some() {
                match pending.answer.as_mut() {
                    Some(answer) => {
                        answer.push(' ');
                        answer.push_str(rest);
                    }
                    None => pending.answer = Some(rest.to_string()),
                }
            }
        } else if pending.question.is_some() {
            if pending.answer.as_deref().is_some_and(ends_sentence) {
                // Closing remarks after a finished answer
                pending.flush(&mut cards);
            } else if let Some(answer) = pending.answer.as_mut() {
                answer.push(' ');
                answer.push_str(line);
            } else if let Some(question) = pending.question.as_mut() {
                question.push(' ');
                question.push_str(line);
            }
        }
    }
    pending.flush(&mut cards);

    cards.truncate(limit);
    cards
}

/// Non-empty trimmed lines, used when nothing parses as a card
pub fn raw_card_lines(text: &str, limit: usize) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}
