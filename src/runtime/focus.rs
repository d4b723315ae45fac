use anyhow::Result;
use colored::Colorize;
use std::io::Write;

use crate::timer::{format_remaining, Countdown, Phase};

/// Count down one phase on the terminal, stopping early on Ctrl-C.
/// Returns true when the phase ran to completion.
pub async fn run_phase(phase: Phase, minutes: u32) -> Result<bool> {
    println!("Starting {} ({} min). Ctrl-C to stop.", phase.label(), minutes);

    let countdown = Countdown::minutes(minutes);
    let ticking = countdown.run(|remaining| {
        print!("\r{} {} ", format!("{}:", phase.label()).bold(), format_remaining(remaining));
        let _ = std::io::stdout().flush();
    });

    let completed = tokio::select! {
        _ = ticking => true,
        _ = tokio::signal::ctrl_c() => false,
    };
    println!();

    if completed {
        let message = match phase {
            Phase::Focus => "Pomodoro complete! Take a break.",
            Phase::ShortBreak | Phase::LongBreak => "Break over. Back to it!",
        };
        println!("{}", message.green());
    } else {
        println!("{}", "Timer stopped.".yellow());
    }

    Ok(completed)
}
