use anyhow::{Context, Result};
use colored::Colorize;
use std::io::IsTerminal;
use tokio::io::AsyncReadExt;

use super::focus::run_phase;
use super::interactive::StudyShell;
use super::non_interactive::NonInteractiveRunner;
use crate::{
    app::{load_config, load_config_file, Config, StudySession},
    cli::{handle_command, Cli, Commands},
    models::{Gateway, ModelFactory, PromptStyle},
    prompts::StudyTask,
    timer::{Phase, PomodoroPlan},
    utils::{log_info, log_warn},
};

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let config = if let Some(config_path) = &cli.config {
            load_config_file(config_path)?
        } else {
            match load_config() {
                Ok(cfg) => cfg,
                Err(e) => {
                    log_warn("[CONFIG]", format!("{:#}. Using defaults.", e));
                    Config::default()
                }
            }
        };

        Ok(Self { cli, config })
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        if let Some(command) = &self.cli.command {
            if handle_command(command, &self.config).await? {
                return Ok(());
            }
        }

        match &self.cli.command {
            Some(Commands::Pomodoro {
                mode,
                minutes,
                short_break,
                long_break,
                with_break,
            }) => {
                let plan = PomodoroPlan::new(
                    minutes.unwrap_or(self.config.study.pomodoro_minutes),
                    short_break.unwrap_or(self.config.study.short_break_minutes),
                    long_break.unwrap_or(self.config.study.long_break_minutes),
                )?;
                let mode = mode.unwrap_or(self.config.study.focus_mode);
                let focus = mode.focus_minutes(&plan);
                log_info("[TIMER]", format!("{} for {} minutes", mode.label(), focus));

                if run_phase(Phase::Focus, focus).await? && *with_break {
                    let (phase, minutes) = plan.break_after(1);
                    run_phase(phase, minutes).await?;
                }
                Ok(())
            }
            Some(command) => match study_task(command) {
                Some(task) => self.run_task(task).await,
                None => self.run_shell().await,
            },
            None => self.run_shell().await,
        }
    }

    /// Session seeded from config, then CLI overrides
    fn session(&self) -> StudySession {
        let mut session = StudySession::new(self.config.session_config());
        if let Some(backend) = self.cli.backend {
            session.set_backend(backend);
        }
        if let Some(key) = &self.cli.api_key {
            session.set_api_key(Some(key.clone()));
        }
        if self.cli.plain {
            session.set_style(PromptStyle::Plain);
        }
        session
    }

    /// Notes from --file, --text, or piped stdin
    async fn load_notes(&self, session: &mut StudySession) -> Result<()> {
        if let Some(path) = &self.cli.file {
            let chars = session
                .load_document(path)
                .with_context(|| format!("Could not load notes from {}", path.display()))?;
            log_info("[NOTES]", format!("Loaded {} characters from {}", chars, path.display()));
        } else if let Some(text) = &self.cli.text {
            session.save_notes(text.clone())?;
        } else if !std::io::stdin().is_terminal() && self.cli.command.is_some() {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            if !text.trim().is_empty() {
                session.save_notes(text)?;
            }
        }
        Ok(())
    }

    fn plan(&self) -> PomodoroPlan {
        let study = &self.config.study;
        PomodoroPlan::new(
            study.pomodoro_minutes,
            study.short_break_minutes,
            study.long_break_minutes,
        )
        .unwrap_or_else(|e| {
            log_warn("[CONFIG]", format!("{}. Using default timer lengths.", e));
            PomodoroPlan::default()
        })
    }

    fn gateway(&self) -> Result<Gateway> {
        Ok(ModelFactory::gateway(&self.config)?)
    }

    async fn run_task(&self, task: StudyTask) -> Result<()> {
        let mut session = self.session();
        self.load_notes(&mut session).await?;

        let gateway = self.gateway()?;
        let mut runner = NonInteractiveRunner::new(&gateway, session, self.cli.format);
        match runner.execute(task).await {
            Ok(output) => {
                println!("{}", output);
                Ok(())
            }
            Err(e) => {
                eprintln!("{} {}", "[ERROR]".red(), e);
                std::process::exit(1);
            }
        }
    }

    async fn run_shell(&self) -> Result<()> {
        let mut session = self.session();
        if self.cli.file.is_some() || self.cli.text.is_some() {
            self.load_notes(&mut session).await?;
        }

        let gateway = self.gateway()?;
        StudyShell::new(&gateway, session, self.plan(), self.cli.format)
            .run()
            .await
    }
}

/// Map a study subcommand to its task
fn study_task(command: &Commands) -> Option<StudyTask> {
    match command {
        Commands::Summarize { length, tone } => Some(StudyTask::Summarize {
            length: *length,
            tone: *tone,
        }),
        Commands::Explain { topic, level } => Some(StudyTask::Explain {
            topic: topic.join(" "),
            level: *level,
        }),
        Commands::Flashcards { count } => Some(StudyTask::flashcards(*count)),
        Commands::Quiz { questions } => Some(StudyTask::quiz(*questions)),
        Commands::Init | Commands::Status | Commands::Pomodoro { .. } | Commands::Study => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BackendKind;
    use crate::prompts::{Level, SummaryLength, Tone};
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn orchestrator(args: &[&str]) -> Orchestrator {
        Orchestrator {
            cli: Cli::try_parse_from(args).unwrap(),
            config: Config::default(),
        }
    }

    #[test]
    fn test_study_task_mapping() {
        assert_eq!(
            study_task(&Commands::Explain {
                topic: vec!["black".to_string(), "holes".to_string()],
                level: Level::Expert,
            }),
            Some(StudyTask::Explain {
                topic: "black holes".to_string(),
                level: Level::Expert,
            })
        );
        assert_eq!(
            study_task(&Commands::Summarize {
                length: SummaryLength::Medium,
                tone: Tone::Motivational,
            }),
            Some(StudyTask::Summarize {
                length: SummaryLength::Medium,
                tone: Tone::Motivational,
            })
        );
        assert_eq!(study_task(&Commands::Study), None);
    }

    #[test]
    fn test_cli_overrides_session_config() {
        let o = orchestrator(&[
            "turbo-study",
            "quiz",
            "--backend",
            "remote",
            "--api-key",
            "sk-test",
            "--plain",
        ]);
        let session = o.session();

        assert_eq!(session.config().backend, BackendKind::Remote);
        assert_eq!(session.config().api_key.as_deref(), Some("sk-test"));
        assert_eq!(session.config().style, PromptStyle::Plain);
    }

    #[tokio::test]
    async fn test_inline_text_becomes_notes() {
        let o = orchestrator(&["turbo-study", "summarize", "--text", "Mitochondria make ATP."]);
        let mut session = o.session();
        o.load_notes(&mut session).await.unwrap();

        assert_eq!(session.notes(), Some("Mitochondria make ATP."));
    }

    #[test]
    fn test_invalid_timer_config_falls_back_to_defaults() {
        let mut o = orchestrator(&["turbo-study"]);
        o.config.study.pomodoro_minutes = 500;

        assert_eq!(o.plan(), PomodoroPlan::default());
    }
}
