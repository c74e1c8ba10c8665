//! Run command handler: plays one session in the terminal.

use std::sync::Arc;

use anyhow::Result;
use smartdict_core::{
    AudioCuePlayer, MAX_RATE, MIN_RATE, NoopCuePlayer, SessionConfig, UserProfile,
};
use smartdict_voice::{
    EspeakSpeechProvider, PlaybackSequencer, SequencerConfig, SequencerDeps, SequencerEvent,
    SequencerStatus, SessionSummary,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use super::session::{load_session, resolve_user};
use crate::bootstrap::CliContext;
use crate::commands::RunArgs;
use crate::error::CliError;
use crate::presentation::{format_progress, format_summary};
use crate::utils::keys::{CONTROLS_HELP, Control, RATE_STEP, VOLUME_STEP, spawn_line_reader};

/// Execute the run command.
pub async fn execute(ctx: &CliContext, args: RunArgs) -> Result<()> {
    validate_overrides(&args)?;

    let settings = ctx.settings.get().await?;
    let user = resolve_user(ctx, args.user.as_deref()).await?;
    let session = resolve_session(ctx, &args, user.as_ref()).await?;

    let mut playback = settings.playback_for(session.mode);
    if let Some(volume) = args.volume {
        playback.set_volume(volume);
    }
    if let Some(rate) = args.rate {
        playback.set_rate(rate);
    }

    let speech = Arc::new(EspeakSpeechProvider::new(settings.effective_speech_binary()));
    let (cue, end_cue) = build_cue(settings.end_cue.as_deref());
    let mut deps = SequencerDeps::new(speech).with_cue(cue);
    let recorder = user
        .as_ref()
        .map(|user| Arc::new(ctx.history.recorder_for(&user.id)));
    if let Some(recorder) = &recorder {
        deps = deps.with_recorder(recorder.clone());
    } else {
        info!("No user selected; this session will not be recorded");
    }

    let mut config = SequencerConfig::default();
    if let Some(cue) = end_cue {
        config = config.with_end_cue(cue);
    }

    let profile = session.profile();
    println!(
        "{} | {} | {} items | volume {:.0}% | rate {:.1}",
        profile.label,
        session.mode,
        session.items.len(),
        playback.volume() * 100.0,
        playback.rate()
    );
    println!("{CONTROLS_HELP}");

    let (sequencer, mut events) = PlaybackSequencer::new(session.clone(), playback, config, deps);
    sequencer.start().map_err(CliError::from)?;

    let summary = drive(&sequencer, &mut events, &session).await?;
    println!("{}", format_summary(&summary));

    if let Some(recorder) = recorder {
        recorder.flush().await;
    }
    Ok(())
}

fn validate_overrides(args: &RunArgs) -> Result<(), CliError> {
    if let Some(volume) = args.volume {
        if !(0.0..=1.0).contains(&volume) {
            return Err(CliError::Arguments(format!(
                "--volume must be between 0.0 and 1.0, got {volume}"
            )));
        }
    }
    if let Some(rate) = args.rate {
        if !(MIN_RATE..=MAX_RATE).contains(&rate) {
            return Err(CliError::Arguments(format!(
                "--rate must be between {MIN_RATE} and {MAX_RATE}, got {rate}"
            )));
        }
    }
    Ok(())
}

async fn resolve_session(
    ctx: &CliContext,
    args: &RunArgs,
    user: Option<&UserProfile>,
) -> Result<SessionConfig> {
    let Some(id) = args.library_id else {
        return load_session(&args.session);
    };
    let user = user.ok_or_else(|| CliError::Arguments("--library-id needs a user".into()))?;
    let saved = ctx.library.get(&user.id, id).await?;
    println!("Loaded \"{}\" for {}", saved.title, user.name);

    let mut session = saved.to_session();
    if let Some(language) = args.session.language {
        session.language = language;
    }
    if let Some(mode) = args.session.mode {
        session.mode = mode;
    }
    Ok(session)
}

#[cfg(feature = "rodio")]
fn build_cue(end_cue: Option<&str>) -> (Arc<dyn AudioCuePlayer>, Option<String>) {
    let Some(raw) = end_cue else {
        return (Arc::new(NoopCuePlayer), None);
    };
    let path = match smartdict_core::resolve_user_path(raw) {
        Ok(path) => path,
        Err(e) => {
            warn!(error = %e, "Invalid end_cue path; end cue disabled");
            return (Arc::new(NoopCuePlayer), None);
        }
    };
    match smartdict_voice::RodioCuePlayer::spawn() {
        Ok(player) => (
            Arc::new(player),
            Some(path.to_string_lossy().into_owned()),
        ),
        Err(e) => {
            warn!(error = %e, "No audio output; end cue disabled");
            (Arc::new(NoopCuePlayer), None)
        }
    }
}

/// Without audio output the end cue is silent; the sequencer still holds
/// the session for the cue's duration.
#[cfg(not(feature = "rodio"))]
fn build_cue(end_cue: Option<&str>) -> (Arc<dyn AudioCuePlayer>, Option<String>) {
    if end_cue.is_some() {
        warn!("end_cue is set but this build has no audio output (feature 'rodio')");
    }
    (Arc::new(NoopCuePlayer), None)
}

/// Print progress and apply operator keys until the session finishes.
async fn drive(
    sequencer: &PlaybackSequencer,
    events: &mut UnboundedReceiver<SequencerEvent>,
    session: &SessionConfig,
) -> Result<SessionSummary> {
    let mut keys = spawn_line_reader()?;
    let mut keys_open = true;
    let mut last_line = String::new();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(SequencerEvent::StateChanged(snapshot)) => {
                    let line = format_progress(&snapshot, session);
                    if line != last_line {
                        println!("{line}");
                        last_line = line;
                    }
                }
                Some(SequencerEvent::Finished(summary)) => return Ok(summary),
                None => {
                    return Err(CliError::Core("session ended without finishing".into()).into());
                }
            },
            line = keys.recv(), if keys_open => match line {
                Some(line) => apply_control(sequencer, &line),
                None => keys_open = false,
            },
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for Ctrl-C");
                }
                println!("Stopping...");
                sequencer.stop();
            }
        }
    }
}

fn apply_control(sequencer: &PlaybackSequencer, line: &str) {
    let Some(control) = Control::parse(line) else {
        println!("Unknown key '{}'. {CONTROLS_HELP}", line.trim());
        return;
    };

    match control {
        Control::Pause => sequencer.pause(),
        Control::Resume => sequencer.resume(),
        Control::Toggle => match sequencer.snapshot().status {
            SequencerStatus::Playing => sequencer.pause(),
            SequencerStatus::Paused => sequencer.resume(),
            SequencerStatus::Idle | SequencerStatus::Finished => {}
        },
        Control::Stop => sequencer.stop(),
        Control::VolumeUp | Control::VolumeDown => {
            let step = if control == Control::VolumeUp {
                VOLUME_STEP
            } else {
                -VOLUME_STEP
            };
            sequencer.set_volume(sequencer.settings().volume() + step);
            println!("Volume {:.0}%", sequencer.settings().volume() * 100.0);
        }
        Control::RateUp | Control::RateDown => {
            let step = if control == Control::RateUp {
                RATE_STEP
            } else {
                -RATE_STEP
            };
            sequencer.set_rate(sequencer.settings().rate() + step);
            println!("Rate {:.1}", sequencer.settings().rate());
        }
        Control::Help => println!("{CONTROLS_HELP}"),
    }
}
