use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_LOCAL_MODEL, DEFAULT_OLLAMA_HOST, DEFAULT_OLLAMA_PORT, DEFAULT_REMOTE_API_KEY_ENV,
    DEFAULT_REMOTE_BASE_URL, DEFAULT_REMOTE_MODEL, HTTP_REQUEST_TIMEOUT_SECS, LONG_BREAK_DEFAULT,
    POMODORO_MINUTES_DEFAULT, SHORT_BREAK_DEFAULT,
};
use crate::models::{BackendKind, PromptStyle, SessionConfig};
use crate::timer::FocusMode;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Which backend new sessions start on
    #[serde(default)]
    pub backend: BackendSettings,

    /// Local (Ollama) backend configuration
    #[serde(default)]
    pub local: LocalConfig,

    /// Remote completion API configuration
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Study tools configuration
    #[serde(default)]
    pub study: StudyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    pub kind: BackendKind,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            kind: BackendKind::Local,
        }
    }
}

/// Local model served by an Ollama daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
    /// Pull the model on first use when it is not installed yet
    pub auto_pull: bool,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OLLAMA_HOST.to_string(),
            port: DEFAULT_OLLAMA_PORT,
            model: DEFAULT_LOCAL_MODEL.to_string(),
            auto_pull: true,
        }
    }
}

impl LocalConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// OpenAI-compatible completion API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub model: String,
    /// Environment variable containing the API key
    pub api_key_env: String,
    /// Inline API key; takes priority over `api_key_env`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
            model: DEFAULT_REMOTE_MODEL.to_string(),
            api_key_env: DEFAULT_REMOTE_API_KEY_ENV.to_string(),
            api_key: None,
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl RemoteConfig {
    /// Resolve the credential: inline key first, then the configured env var
    pub fn resolve_api_key(&self) -> Option<String> {
        let non_blank = |key: &String| !key.trim().is_empty();
        self.api_key
            .clone()
            .filter(non_blank)
            .or_else(|| std::env::var(&self.api_key_env).ok().filter(non_blank))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Prefix instructions with the Hermes phrase
    pub mythic_prompts: bool,
    pub focus_mode: FocusMode,
    pub pomodoro_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            mythic_prompts: true,
            focus_mode: FocusMode::Pomodoro,
            pomodoro_minutes: POMODORO_MINUTES_DEFAULT,
            short_break_minutes: SHORT_BREAK_DEFAULT,
            long_break_minutes: LONG_BREAK_DEFAULT,
        }
    }
}

impl Config {
    /// Starting session configuration derived from this config
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            backend: self.backend.kind,
            api_key: self.remote.resolve_api_key(),
            style: if self.study.mythic_prompts {
                PromptStyle::Prefixed
            } else {
                PromptStyle::Plain
            },
        }
    }
}

/// Layer defaults, global file, local file and `TURBO_STUDY_` env vars
fn layered(global_config: &Path, local_config: &Path) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if global_config.exists() {
        figment = figment.merge(Toml::file(global_config));
    }

    if local_config.exists() {
        figment = figment.merge(Toml::file(local_config));
    }

    // TURBO_STUDY_LOCAL__MODEL=llama3 -> local.model
    figment.merge(Env::prefixed("TURBO_STUDY_").split("__"))
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(".turbo-study/config.toml");

    layered(&global_config, &local_config)
        .extract()
        .context("Failed to load configuration")
}

/// Load configuration from an explicit file, still honoring env overrides
pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TURBO_STUDY_").split("__"))
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "turbo-study") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("turbo-study");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<PathBuf> {
    let config_file = get_config_dir()?.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
        tracing::info!("Created default configuration at {}", config_file.display());
    }

    Ok(config_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.local.model, DEFAULT_LOCAL_MODEL);
        assert_eq!(parsed.backend.kind, BackendKind::Local);
        assert!(parsed.study.mythic_prompts);
    }

    #[test]
    fn test_layering_local_file_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "global.toml",
                r#"
                [local]
                model = "llama3"
                port = 9999
                "#,
            )?;
            jail.create_file(
                "local.toml",
                r#"
                [backend]
                kind = "remote"
                "#,
            )?;
            jail.set_env("TURBO_STUDY_LOCAL__MODEL", "mistral");

            let config: Config =
                layered(Path::new("global.toml"), Path::new("local.toml")).extract()?;

            assert_eq!(config.local.model, "mistral");
            assert_eq!(config.local.port, 9999);
            assert_eq!(config.backend.kind, BackendKind::Remote);
            assert_eq!(config.remote.base_url, DEFAULT_REMOTE_BASE_URL);
            Ok(())
        });
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        Jail::expect_with(|_jail| {
            let config: Config =
                layered(Path::new("nope.toml"), Path::new("nope-either.toml")).extract()?;
            assert_eq!(config.local.port, DEFAULT_OLLAMA_PORT);
            Ok(())
        });
    }

    #[test]
    fn test_session_config_reads_key_and_style() {
        let mut config = Config::default();
        config.backend.kind = BackendKind::Remote;
        config.remote.api_key = Some("sk-test".to_string());
        config.study.mythic_prompts = false;

        let session = config.session_config();
        assert_eq!(session.backend, BackendKind::Remote);
        assert_eq!(session.api_key.as_deref(), Some("sk-test"));
        assert_eq!(session.style, PromptStyle::Plain);
    }

    #[test]
    fn test_blank_inline_key_is_no_key() {
        let mut remote = RemoteConfig::default();
        remote.api_key = Some("   ".to_string());
        remote.api_key_env = "TURBO_STUDY_TEST_UNSET_KEY_VAR".to_string();
        assert_eq!(remote.resolve_api_key(), None);
    }

    #[test]
    fn test_blank_inline_key_defers_to_env() {
        Jail::expect_with(|jail| {
            jail.set_env("TURBO_STUDY_TEST_REMOTE_KEY", "sk-from-env");

            let mut remote = RemoteConfig::default();
            remote.api_key = Some("  ".to_string());
            remote.api_key_env = "TURBO_STUDY_TEST_REMOTE_KEY".to_string();

            assert_eq!(remote.resolve_api_key().as_deref(), Some("sk-from-env"));
            Ok(())
        });
    }
}
