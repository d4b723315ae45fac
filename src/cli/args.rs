use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::constants::{FLASHCARD_COUNT_DEFAULT, QUIZ_QUESTIONS_DEFAULT};
use crate::models::BackendKind;
use crate::prompts::{Level, SummaryLength, Tone};
use crate::timer::FocusMode;

#[derive(Parser, Debug)]
#[command(name = "turbo-study")]
#[command(version)]
#[command(about = "Study assistant: summaries, explanations, flashcards and quizzes from your notes", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Generation backend (overrides config)
    #[arg(long, value_enum, global = true)]
    pub backend: Option<BackendKind>,

    /// API key for the remote backend
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Send instructions without the Hermes prefix
    #[arg(long, global = true)]
    pub plain: bool,

    /// Notes file (.txt, .md, .pdf, ...)
    #[arg(short, long, global = true, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Notes given inline
    #[arg(short, long, global = true)]
    pub text: Option<String>,

    /// Output format for generated artifacts
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Check status of backends and configuration
    Status,
    /// Summarize the notes
    Summarize {
        #[arg(long, value_enum, default_value_t = SummaryLength::Short)]
        length: SummaryLength,
        #[arg(long, value_enum, default_value_t = Tone::Neutral)]
        tone: Tone,
    },
    /// Explain a concept or answer a question
    Explain {
        /// Concept or question, e.g. "What is a Fourier transform?"
        topic: Vec<String>,
        #[arg(long, value_enum, default_value_t = Level::HighSchool)]
        level: Level,
    },
    /// Generate flashcards from the notes
    Flashcards {
        #[arg(long, default_value_t = FLASHCARD_COUNT_DEFAULT, value_parser = clap::value_parser!(u32).range(3..=30))]
        count: u32,
    },
    /// Generate a multiple-choice quiz from the notes
    Quiz {
        #[arg(long, default_value_t = QUIZ_QUESTIONS_DEFAULT, value_parser = clap::value_parser!(u32).range(3..=15))]
        questions: u32,
    },
    /// Run a focus timer
    Pomodoro {
        #[arg(long, value_enum)]
        mode: Option<FocusMode>,
        /// Minutes per Pomodoro (5-90)
        #[arg(long)]
        minutes: Option<u32>,
        /// Short break minutes (1-30)
        #[arg(long)]
        short_break: Option<u32>,
        /// Long break minutes (5-60)
        #[arg(long)]
        long_break: Option<u32>,
        /// Also count down the following break
        #[arg(long)]
        with_break: bool,
    },
    /// Interactive study session (default)
    Study,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
    /// Markdown formatted output
    Markdown,
}
