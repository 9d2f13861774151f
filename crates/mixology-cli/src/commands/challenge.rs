use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use clap::{Subcommand, ValueEnum};
use mixology_core::{
    format_clock, ChallengeMode, ChallengeRunner, ChallengeSession, ChallengeState, Config,
};
use tokio::sync::mpsc;

use crate::context::{open_library, print_json, resolve_drink};

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    CountUp,
    CountDown,
}

impl From<ModeArg> for ChallengeMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::CountUp => ChallengeMode::CountUp,
            ModeArg::CountDown => ChallengeMode::CountDown,
        }
    }
}

#[derive(Subcommand)]
pub enum ChallengeAction {
    /// Time yourself making a drink
    Run {
        /// Drink ID
        id: String,
        /// Timer mode (defaults to challenge.default_mode)
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Countdown length in seconds (defaults to challenge.default_countdown_secs)
        #[arg(long)]
        seconds: Option<String>,
        /// Stop automatically after this many seconds instead of waiting for Enter
        #[arg(long)]
        stop_after: Option<u64>,
        /// Answer yes to "did you make it?"
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(action: ChallengeAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let library = open_library(&config)?;

    match action {
        ChallengeAction::Run {
            id,
            mode,
            seconds,
            stop_after,
            yes,
        } => {
            let drink = resolve_drink(&config, &library, &id).await?;
            let mode: ChallengeMode = mode.map_or(config.challenge.default_mode, Into::into);

            let mut runner = ChallengeRunner::new(ChallengeSession::new(
                drink.id.clone(),
                config.challenge.default_countdown_secs,
            ));
            runner.set_mode(mode);
            if let Some(input) = seconds {
                if !runner.set_countdown_input(&input) {
                    return Err(format!("invalid countdown: {input} (1-99999 seconds)").into());
                }
            }

            let mut snapshots = runner.subscribe();
            if let Some(event) = runner.start() {
                print_json(&event)?;
            }
            eprintln!("{} started, press Enter to stop", drink.name);

            let mut lines = stdin_lines();
            {
                let stop_signal = async {
                    match stop_after {
                        Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
                        // Closed stdin never stops the timer.
                        None => {
                            if lines.recv().await.is_none() {
                                std::future::pending::<()>().await;
                            }
                        }
                    }
                };
                tokio::pin!(stop_signal);

                loop {
                    tokio::select! {
                        changed = snapshots.changed() => {
                            if changed.is_err() {
                                break;
                            }
                            let snap = snapshots.borrow_and_update().clone();
                            eprint!("\r{}", format_clock(snap.display_secs));
                            let _ = io::stderr().flush();
                            if snap.state == ChallengeState::Completed {
                                break;
                            }
                        }
                        _ = &mut stop_signal => {
                            if let Some(event) = runner.stop() {
                                print_json(&event)?;
                            }
                            break;
                        }
                    }
                }
            }
            eprintln!();

            let made_it = match runner.snapshot().state {
                ChallengeState::Completed => {
                    eprintln!("Time's up!");
                    true
                }
                ChallengeState::AwaitingConfirmation => {
                    yes || confirm(&mut lines, "Did you make it? [y/N] ").await
                }
                _ => false,
            };

            for event in runner.finish(library.prefs(), made_it)? {
                print_json(&event)?;
            }
            print_json(&runner.dismiss())?;
        }
    }
    Ok(())
}

/// Stdin lines from a detached thread, so a pending read never holds the
/// runtime open at exit.
fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn confirm(lines: &mut mpsc::UnboundedReceiver<String>, prompt: &str) -> bool {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    lines
        .recv()
        .await
        .is_some_and(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
