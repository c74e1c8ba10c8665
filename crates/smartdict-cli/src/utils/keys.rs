//! Operator controls typed while a session plays.

use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;

/// Volume change per `+`/`-`.
pub const VOLUME_STEP: f32 = 0.1;
/// Rate change per `>`/`<`.
pub const RATE_STEP: f32 = 0.1;

/// A control command read from one line of stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Pause,
    Resume,
    /// Pause when playing, resume when paused.
    Toggle,
    Stop,
    VolumeUp,
    VolumeDown,
    RateUp,
    RateDown,
    Help,
}

impl Control {
    /// Parse a typed line. Unknown input yields `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let control = match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Self::Pause,
            "r" | "resume" => Self::Resume,
            "" => Self::Toggle,
            "s" | "q" | "stop" | "quit" => Self::Stop,
            "+" | "=" => Self::VolumeUp,
            "-" | "_" => Self::VolumeDown,
            ">" | "." => Self::RateUp,
            "<" | "," => Self::RateDown,
            "?" | "h" | "help" => Self::Help,
            _ => return None,
        };
        Some(control)
    }
}

/// Help text listing every control.
pub const CONTROLS_HELP: &str =
    "Controls: p pause | r resume | Enter toggle | s stop | +/- volume | >/< rate | ? help";

/// Read stdin lines on a dedicated thread.
///
/// Blocking stdin reads would hold up runtime shutdown, so they stay off the
/// tokio blocking pool. The thread ends at EOF or once the receiver is gone.
pub fn spawn_line_reader() -> io::Result<mpsc::UnboundedReceiver<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::Builder::new()
        .name("smartdict-keys".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}
