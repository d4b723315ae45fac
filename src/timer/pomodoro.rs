use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    DEEP_WORK_MINUTES, LONG_BREAK_DEFAULT, LONG_BREAK_EVERY, LONG_BREAK_RANGE,
    POMODORO_MINUTES_DEFAULT, POMODORO_MINUTES_RANGE, QUICK_REVIEW_MINUTES, SHORT_BREAK_DEFAULT,
    SHORT_BREAK_RANGE,
};
use crate::utils::{StudyError, StudyResult};

/// Preset focus lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FocusMode {
    /// Configurable focus block, 25 minutes by default
    #[default]
    Pomodoro,
    /// 90 minute block
    DeepWork,
    /// 15 minute block
    QuickReview,
}

impl FocusMode {
    pub fn label(self) -> &'static str {
        match self {
            FocusMode::Pomodoro => "Pomodoro",
            FocusMode::DeepWork => "Deep Work (90m)",
            FocusMode::QuickReview => "Quick Review (15m)",
        }
    }

    /// Focus minutes for this mode; Pomodoro uses the plan's own length
    pub fn focus_minutes(self, plan: &PomodoroPlan) -> u32 {
        match self {
            FocusMode::Pomodoro => plan.focus_minutes,
            FocusMode::DeepWork => DEEP_WORK_MINUTES,
            FocusMode::QuickReview => QUICK_REVIEW_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::ShortBreak => "Short break",
            Phase::LongBreak => "Long break",
        }
    }
}

/// Focus/break lengths in minutes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomodoroPlan {
    pub focus_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
}

fn check_range(name: &str, value: u32, (min, max): (u32, u32)) -> StudyResult<u32> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(StudyError::ConfigError(format!(
            "{} must be between {} and {} minutes, got {}",
            name, min, max, value
        )))
    }
}

impl Default for PomodoroPlan {
    fn default() -> Self {
        Self {
            focus_minutes: POMODORO_MINUTES_DEFAULT,
            short_break_minutes: SHORT_BREAK_DEFAULT,
            long_break_minutes: LONG_BREAK_DEFAULT,
        }
    }
}

impl PomodoroPlan {
    pub fn new(focus: u32, short_break: u32, long_break: u32) -> StudyResult<Self> {
        Ok(Self {
            focus_minutes: check_range("Minutes per Pomodoro", focus, POMODORO_MINUTES_RANGE)?,
            short_break_minutes: check_range("Short break", short_break, SHORT_BREAK_RANGE)?,
            long_break_minutes: check_range("Long break", long_break, LONG_BREAK_RANGE)?,
        })
    }

    /// Break that follows the `completed`-th focus block (1-based)
    pub fn break_after(&self, completed: u32) -> (Phase, u32) {
        if completed > 0 && completed % LONG_BREAK_EVERY == 0 {
            (Phase::LongBreak, self.long_break_minutes)
        } else {
            (Phase::ShortBreak, self.short_break_minutes)
        }
    }
}

/// Non-blocking countdown ticking once per `tick`
#[derive(Debug, Clone)]
pub struct Countdown {
    total_ticks: u64,
    tick: Duration,
}

impl Countdown {
    pub fn minutes(minutes: u32) -> Self {
        Self::seconds(u64::from(minutes) * 60)
    }

    pub fn seconds(seconds: u64) -> Self {
        Self {
            total_ticks: seconds,
            tick: Duration::from_secs(1),
        }
    }

    /// Report remaining seconds from the full length down to zero.
    ///
    /// Awaits a tokio interval between ticks, so it never blocks a thread.
    /// Drop the future to cancel.
    pub async fn run<F>(&self, mut on_tick: F)
    where
        F: FnMut(u64),
    {
        let mut interval = tokio::time::interval(self.tick);
        for remaining in (0..=self.total_ticks).rev() {
            interval.tick().await;
            on_tick(remaining);
        }
    }
}

/// `MM:SS`
pub fn format_remaining(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(59), "00:59");
        assert_eq!(format_remaining(25 * 60), "25:00");
        assert_eq!(format_remaining(90 * 60 + 5), "90:05");
    }

    #[test]
    fn test_plan_validates_ranges() {
        assert!(PomodoroPlan::new(25, 5, 20).is_ok());
        assert!(PomodoroPlan::new(4, 5, 20).is_err());
        assert!(PomodoroPlan::new(25, 31, 20).is_err());
        assert!(matches!(
            PomodoroPlan::new(25, 5, 61),
            Err(StudyError::ConfigError(_))
        ));
    }

    #[test]
    fn test_long_break_every_fourth_block() {
        let plan = PomodoroPlan::new(25, 5, 20).unwrap();
        assert_eq!(plan.break_after(1), (Phase::ShortBreak, 5));
        assert_eq!(plan.break_after(3), (Phase::ShortBreak, 5));
        assert_eq!(plan.break_after(4), (Phase::LongBreak, 20));
        assert_eq!(plan.break_after(8), (Phase::LongBreak, 20));
    }

    #[test]
    fn test_focus_mode_minutes() {
        let plan = PomodoroPlan::new(30, 5, 20).unwrap();
        assert_eq!(FocusMode::Pomodoro.focus_minutes(&plan), 30);
        assert_eq!(FocusMode::DeepWork.focus_minutes(&plan), 90);
        assert_eq!(FocusMode::QuickReview.focus_minutes(&plan), 15);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_ticks_down_to_zero() {
        let start = tokio::time::Instant::now();
        let mut seen = Vec::new();

        Countdown::seconds(3)
            .run(|remaining| seen.push(format_remaining(remaining)))
            .await;

        assert_eq!(seen, vec!["00:03", "00:02", "00:01", "00:00"]);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_can_be_cancelled() {
        let mut ticks = 0;
        let cancelled = tokio::time::timeout(
            Duration::from_millis(1500),
            Countdown::minutes(5).run(|_| ticks += 1),
        )
        .await;

        assert!(cancelled.is_err());
        assert_eq!(ticks, 2);
    }
}
