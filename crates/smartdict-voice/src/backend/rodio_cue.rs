//! End-of-session cue playback through the default audio device.
//!
//! `rodio::OutputStream` is `!Send` on some platforms, so the stream and the
//! active [`Sink`] live on a dedicated thread. [`RodioCuePlayer`] is the
//! `Send + Sync` handle; every call is a fire-and-forget command.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use smartdict_core::AudioCuePlayer;
use tracing::{debug, warn};

use crate::error::VoiceError;

enum CueCommand {
    Play { source: String, volume: f32 },
    SetVolume(f32),
    Pause,
    Resume,
    Stop,
    Shutdown,
}

/// `Send + Sync` handle to the cue thread.
pub struct RodioCuePlayer {
    cmd_tx: mpsc::Sender<CueCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl RodioCuePlayer {
    /// Open the default output device on a new thread.
    ///
    /// Fails when no audio device is available.
    pub fn spawn() -> Result<Self, VoiceError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<CueCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), VoiceError>>();

        let thread = thread::Builder::new()
            .name("smartdict-cue".into())
            .spawn(move || Self::run(&cmd_rx, &init_tx))
            .map_err(|e| {
                VoiceError::OutputStreamError(format!("failed to spawn audio thread: {e}"))
            })?;

        init_rx.recv().map_err(|_| VoiceError::AudioThreadDied)??;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    fn send(&self, cmd: CueCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("{}", VoiceError::AudioThreadDied);
        }
    }

    fn run(cmd_rx: &mpsc::Receiver<CueCommand>, init_tx: &mpsc::Sender<Result<(), VoiceError>>) {
        let (_stream, handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                let _ = init_tx.send(Err(VoiceError::OutputStreamError(e.to_string())));
                return;
            }
        };
        if init_tx.send(Ok(())).is_err() {
            return;
        }

        let mut sink: Option<Sink> = None;

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                CueCommand::Play { source, volume } => {
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                    match open_clip(&handle, Path::new(&source), volume) {
                        Ok(new_sink) => sink = Some(new_sink),
                        Err(e) => warn!(error = %e, source, "Audio cue not played"),
                    }
                }
                CueCommand::SetVolume(volume) => {
                    if let Some(sink) = &sink {
                        sink.set_volume(volume.clamp(0.0, 1.0));
                    }
                }
                CueCommand::Pause => {
                    if let Some(sink) = &sink {
                        sink.pause();
                    }
                }
                CueCommand::Resume => {
                    if let Some(sink) = &sink {
                        sink.play();
                    }
                }
                CueCommand::Stop => {
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                }
                CueCommand::Shutdown => break,
            }
        }

        debug!("Cue thread shutting down");
    }
}

fn open_clip(handle: &OutputStreamHandle, path: &Path, volume: f32) -> Result<Sink, VoiceError> {
    if !path.is_file() {
        return Err(VoiceError::CueNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let decoder =
        Decoder::new(BufReader::new(file)).map_err(|e| VoiceError::CueDecode(e.to_string()))?;

    let sink = Sink::try_new(handle).map_err(|e| VoiceError::OutputStreamError(e.to_string()))?;
    sink.set_volume(volume.clamp(0.0, 1.0));
    sink.append(decoder);
    Ok(sink)
}

impl AudioCuePlayer for RodioCuePlayer {
    fn play_clip(&self, source: &str, volume: f32) {
        self.send(CueCommand::Play {
            source: source.to_string(),
            volume,
        });
    }

    fn set_volume(&self, volume: f32) {
        self.send(CueCommand::SetVolume(volume));
    }

    fn pause(&self) {
        self.send(CueCommand::Pause);
    }

    fn resume(&self) {
        self.send(CueCommand::Resume);
    }

    fn stop(&self) {
        self.send(CueCommand::Stop);
    }
}

impl Drop for RodioCuePlayer {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(CueCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}
