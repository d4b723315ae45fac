/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_OLLAMA_HOST: &str = "localhost";
pub const DEFAULT_OLLAMA_PORT: u16 = 11434;
pub const DEFAULT_REMOTE_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_REMOTE_API_KEY_ENV: &str = "OPENAI_API_KEY";

// Models
pub const DEFAULT_LOCAL_MODEL: &str = "tinyllama";
pub const DEFAULT_REMOTE_MODEL: &str = "gpt-3.5-turbo-instruct";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const MODEL_PULL_TIMEOUT_SECS: u64 = 1800; // First pull can be a multi-GB download
pub const HEALTH_CHECK_TIMEOUT_MS: u64 = 500;

// Prompting
pub const MYTHIC_PREFIX: &str = "Ancient scholar Hermes whispers: ";

// Length budgets per task (advisory output caps)
pub const SUMMARY_LENGTH_BUDGET: usize = 300;
pub const EXPLAIN_LENGTH_BUDGET: usize = 300;
pub const FLASHCARD_LENGTH_BUDGET: usize = 700;
pub const QUIZ_LENGTH_BUDGET: usize = 800;

// Task parameter ranges
pub const FLASHCARD_COUNT_MIN: u32 = 3;
pub const FLASHCARD_COUNT_MAX: u32 = 30;
pub const FLASHCARD_COUNT_DEFAULT: u32 = 8;
pub const QUIZ_QUESTIONS_MIN: u32 = 3;
pub const QUIZ_QUESTIONS_MAX: u32 = 15;
pub const QUIZ_QUESTIONS_DEFAULT: u32 = 5;

// Pomodoro
pub const POMODORO_MINUTES_DEFAULT: u32 = 25;
pub const POMODORO_MINUTES_RANGE: (u32, u32) = (5, 90);
pub const SHORT_BREAK_DEFAULT: u32 = 5;
pub const SHORT_BREAK_RANGE: (u32, u32) = (1, 30);
pub const LONG_BREAK_DEFAULT: u32 = 20;
pub const LONG_BREAK_RANGE: (u32, u32) = (5, 60);
pub const LONG_BREAK_EVERY: u32 = 4;
pub const DEEP_WORK_MINUTES: u32 = 90;
pub const QUICK_REVIEW_MINUTES: u32 = 15;
