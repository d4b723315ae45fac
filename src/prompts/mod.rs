// Gateway module for prompts - follows the Train Station Pattern
// All external access must go through this gateway

mod builder;
mod flashcards;
mod quiz;

pub use builder::{Level, StudyTask, SummaryLength, Tone};
pub use flashcards::{parse_flashcards, raw_card_lines, Flashcard};
pub use quiz::{parse_quiz, QuizOption, QuizQuestion};
