/// Focus timer - Gateway
mod pomodoro;

pub use pomodoro::{format_remaining, Countdown, FocusMode, Phase, PomodoroPlan};
