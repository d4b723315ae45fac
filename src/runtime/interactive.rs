use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use super::focus::run_phase;
use super::non_interactive::format_artifact;
use crate::{
    app::StudySession,
    cli::{show_version, OutputFormat},
    constants::{FLASHCARD_COUNT_DEFAULT, QUIZ_QUESTIONS_DEFAULT},
    models::{BackendKind, Gateway, PromptStyle},
    prompts::{Level, StudyTask, SummaryLength, Tone},
    timer::{Phase, PomodoroPlan},
};

const HELP: &str = "\
Commands:
  load <path>                      load notes from a .txt/.md/.pdf file
  paste                            paste notes, end with a line containing only '.'
  notes                            show the saved notes
  summarize [short|medium|long] [neutral|motivational|exam]
  explain <eli5|high-school|college|expert> <topic...>
  flashcards [count]               3-30, default 8
  quiz [questions]                 3-15, default 5
  backend <local|remote>           switch generation backend
  key <api-key>                    set the remote API key for this session
  style <plain|prefixed>           toggle the Hermes prefix
  history                          list artifacts produced this session
  pomodoro [minutes]               start a focus timer
  help                             show this help
  quit                             leave the session";

/// One parsed line of the interactive session
#[derive(Debug, PartialEq)]
enum Input {
    Task(StudyTask),
    Load(String),
    Paste,
    Notes,
    Backend(BackendKind),
    Key(String),
    Style(PromptStyle),
    History,
    Pomodoro(Option<u32>),
    Help,
    Quit,
    Empty,
}

fn parse_value<T: ValueEnum>(word: &str, what: &str) -> Result<T, String> {
    T::from_str(word, true).map_err(|_| format!("Unknown {}: {}", what, word))
}

fn parse_count(word: Option<&str>, default: u32) -> Result<u32, String> {
    match word {
        Some(w) => w.parse().map_err(|_| format!("Not a number: {}", w)),
        None => Ok(default),
    }
}

fn parse_input(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Input::Empty);
    };
    let rest: Vec<&str> = words.collect();

    match command.to_ascii_lowercase().as_str() {
        "summarize" | "summary" => {
            let length = match rest.first() {
                Some(w) => parse_value::<SummaryLength>(w, "length")?,
                None => SummaryLength::Short,
            };
            let tone = match rest.get(1) {
                Some(w) => parse_value::<Tone>(w, "tone")?,
                None => Tone::Neutral,
            };
            Ok(Input::Task(StudyTask::Summarize { length, tone }))
        }
        "explain" => {
            let (level, topic) = match rest.split_first() {
                Some((first, topic)) => match Level::from_str(first, true) {
                    Ok(level) => (level, topic.join(" ")),
                    Err(_) => (Level::HighSchool, rest.join(" ")),
                },
                None => (Level::HighSchool, String::new()),
            };
            Ok(Input::Task(StudyTask::Explain { topic, level }))
        }
        "flashcards" | "cards" => Ok(Input::Task(StudyTask::flashcards(parse_count(
            rest.first().copied(),
            FLASHCARD_COUNT_DEFAULT,
        )?))),
        "quiz" => Ok(Input::Task(StudyTask::quiz(parse_count(
            rest.first().copied(),
            QUIZ_QUESTIONS_DEFAULT,
        )?))),
        "load" => {
            if rest.is_empty() {
                Err("Usage: load <path>".to_string())
            } else {
                Ok(Input::Load(rest.join(" ")))
            }
        }
        "paste" => Ok(Input::Paste),
        "notes" => Ok(Input::Notes),
        "backend" => match rest.first() {
            Some(w) => Ok(Input::Backend(parse_value::<BackendKind>(w, "backend")?)),
            None => Err("Usage: backend <local|remote>".to_string()),
        },
        "key" => match rest.first() {
            Some(key) => Ok(Input::Key(key.to_string())),
            None => Err("Usage: key <api-key>".to_string()),
        },
        "style" => match rest.first().map(|w| w.to_ascii_lowercase()).as_deref() {
            Some("plain") => Ok(Input::Style(PromptStyle::Plain)),
            Some("prefixed") | Some("mythic") => Ok(Input::Style(PromptStyle::Prefixed)),
            _ => Err("Usage: style <plain|prefixed>".to_string()),
        },
        "history" => Ok(Input::History),
        "pomodoro" | "timer" => Ok(Input::Pomodoro(match rest.first() {
            Some(w) => Some(w.parse().map_err(|_| format!("Not a number: {}", w))?),
            None => None,
        })),
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" | "q" => Ok(Input::Quit),
        other => Err(format!("Unknown command: {} (type 'help')", other)),
    }
}

/// Line-oriented study session over stdin
pub struct StudyShell<'a> {
    gateway: &'a Gateway,
    session: StudySession,
    plan: PomodoroPlan,
    format: OutputFormat,
    completed_pomodoros: u32,
}

impl<'a> StudyShell<'a> {
    pub fn new(
        gateway: &'a Gateway,
        session: StudySession,
        plan: PomodoroPlan,
        format: OutputFormat,
    ) -> Self {
        Self {
            gateway,
            session,
            plan,
            format,
            completed_pomodoros: 0,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        show_version();
        let backend = self.session.config().backend;
        println!(
            "Backend: {}, {}. Type 'help' for commands.",
            backend,
            self.gateway.describe(backend)
        );
        if let Some(notes) = self.session.notes() {
            println!("Notes loaded ({} characters).", notes.chars().count());
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("{} ", "study>".cyan());
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match parse_input(&line) {
                Ok(Input::Quit) => break,
                Ok(input) => self.dispatch(input, &mut lines).await?,
                Err(message) => warn(&message),
            }
        }

        println!("Hermes says: Learn like a hero.");
        Ok(())
    }

    async fn dispatch(&mut self, input: Input, lines: &mut Lines<BufReader<Stdin>>) -> Result<()> {
        match input {
            Input::Task(task) => {
                if task.needs_notes() && self.session.notes().is_none() {
                    warn("No notes saved. Use 'load' or 'paste' first.");
                    return Ok(());
                }
                println!("{}", spinner_text(&task).dimmed());
                match self.session.run(self.gateway, task).await {
                    Ok(artifact) => println!("\n{}\n", format_artifact(&artifact, self.format)),
                    Err(e) => warn(&e.to_string()),
                }
            }
            Input::Load(path) => match self.session.load_document(Path::new(&path)) {
                Ok(chars) => println!("{} ({} characters)", "Saved to session!".green(), chars),
                Err(e) => warn(&format!("Could not load {}: {}", path, e)),
            },
            Input::Paste => {
                println!("Paste your notes; finish with a line containing only '.'");
                let mut text = String::new();
                while let Some(line) = lines.next_line().await? {
                    if line.trim() == "." {
                        break;
                    }
                    text.push_str(&line);
                    text.push('\n');
                }
                match self.session.save_notes(text) {
                    Ok(()) => println!("{}", "Saved to session!".green()),
                    Err(e) => warn(&e.to_string()),
                }
            }
            Input::Notes => match self.session.notes() {
                Some(notes) => println!("{}", notes),
                None => warn("No notes saved. Use 'load' or 'paste'."),
            },
            Input::Backend(kind) => {
                self.session.set_backend(kind);
                if kind == BackendKind::Remote && self.session.config().credential().is_none() {
                    warn("Remote selected but no API key set; requests use the local model until you run 'key'.");
                }
                println!("Backend: {} ({})", kind, self.gateway.model_name(kind));
            }
            Input::Key(key) => {
                self.session.set_api_key(Some(key));
                println!("API key set for this session.");
            }
            Input::Style(style) => {
                self.session.set_style(style);
                println!("Prompt style: {:?}", style);
            }
            Input::History => {
                if self.session.artifacts().is_empty() {
                    println!("No artifacts yet.");
                }
                for (i, artifact) in self.session.artifacts().iter().enumerate() {
                    println!(
                        "{:>2}. {} [{}] {}",
                        i + 1,
                        artifact.created_at.format("%H:%M:%S"),
                        artifact.backend,
                        artifact.label
                    );
                }
            }
            Input::Pomodoro(minutes) => {
                let plan = match minutes {
                    Some(m) => PomodoroPlan::new(
                        m,
                        self.plan.short_break_minutes,
                        self.plan.long_break_minutes,
                    ),
                    None => Ok(self.plan.clone()),
                };
                match plan {
                    Ok(plan) => {
                        if run_phase(Phase::Focus, plan.focus_minutes).await? {
                            self.completed_pomodoros += 1;
                            let (phase, minutes) = plan.break_after(self.completed_pomodoros);
                            println!("Next up: {} ({} min).", phase.label(), minutes);
                        }
                    }
                    Err(e) => warn(&e.to_string()),
                }
            }
            Input::Help => println!("{}", HELP),
            Input::Empty | Input::Quit => {}
        }
        Ok(())
    }
}

fn spinner_text(task: &StudyTask) -> &'static str {
    match task {
        StudyTask::Summarize { .. } => "Summarizing...",
        StudyTask::Explain { .. } => "Thinking like Athena...",
        StudyTask::Flashcards { .. } => "Forging tablets...",
        StudyTask::Quiz { .. } => "Summoning riddles...",
    }
}

fn warn(message: &str) {
    eprintln!("{} {}", "[WARNING]".yellow(), message);
}
