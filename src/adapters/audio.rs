//! Alert clip playback.
//!
//! With the `audio` feature the clip is decoded and played in-process through
//! rodio. Otherwise the platform's command-line player is used.

use crate::domain::model::ClipResource;
use crate::domain::ports::ClipPlayer;
use crate::utils::error::{NotifyError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// The alert compiled into the binary, so packaged builds need no data files.
pub static BUNDLED_ALERT: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/alert.wav"));

/// Raw bytes of a clip resource.
pub fn load_clip(resource: &ClipResource) -> Result<Vec<u8>> {
    match resource {
        ClipResource::Bundled => Ok(BUNDLED_ALERT.to_vec()),
        ClipResource::File(path) => std::fs::read(path).map_err(|e| {
            NotifyError::playback(format!("cannot read clip {}: {}", path.display(), e))
        }),
    }
}

/// A path an external player can open; the bundled clip is written to the temp dir once.
pub fn clip_path(resource: &ClipResource) -> Result<PathBuf> {
    match resource {
        ClipResource::File(path) => {
            if path.is_file() {
                Ok(path.clone())
            } else {
                Err(NotifyError::playback(format!(
                    "clip {} not found",
                    path.display()
                )))
            }
        }
        ClipResource::Bundled => {
            let path = std::env::temp_dir().join("scriptime-alert.wav");
            let up_to_date = std::fs::metadata(&path)
                .map(|m| m.len() == BUNDLED_ALERT.len() as u64)
                .unwrap_or(false);
            if !up_to_date {
                // Write then rename so a concurrent reader never sees a partial file.
                let staging = path.with_extension(format!(
                    "{}.{:?}.tmp",
                    std::process::id(),
                    std::thread::current().id()
                ));
                std::fs::write(&staging, BUNDLED_ALERT)
                    .and_then(|_| std::fs::rename(&staging, &path))
                    .map_err(|e| {
                        NotifyError::playback(format!("cannot stage bundled clip: {}", e))
                    })?;
            }
            Ok(path)
        }
    }
}

/// Single-quoted PowerShell literal; embedded `'` are doubled.
fn powershell_quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', "''"))
}

/// Plays clips through `afplay`, `aplay` or PowerShell's `SoundPlayer`.
#[derive(Debug, Clone, Default)]
pub struct CommandPlayer {
    program: Option<String>,
}

impl CommandPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the player binary; it receives the clip path as its only argument.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }

    fn command_for(&self, path: &Path) -> Command {
        if let Some(program) = &self.program {
            let mut command = Command::new(program);
            command.arg(path);
            return command;
        }

        if cfg!(target_os = "macos") {
            let mut command = Command::new("afplay");
            command.arg(path);
            command
        } else if cfg!(windows) {
            let script = format!(
                "(New-Object Media.SoundPlayer {}).PlaySync()",
                powershell_quote(path)
            );
            let mut command = Command::new("powershell");
            command.args(["-NoProfile", "-Command", script.as_str()]);
            command
        } else {
            let mut command = Command::new("aplay");
            command.arg("-q").arg(path);
            command
        }
    }
}

impl ClipPlayer for CommandPlayer {
    fn play(&self, resource: &ClipResource) -> Result<()> {
        let path = clip_path(resource)?;
        let mut command = self.command_for(&path);

        let status = command.status().map_err(|e| {
            NotifyError::playback(format!(
                "cannot start {:?}: {}",
                command.get_program(),
                e
            ))
        })?;

        if !status.success() {
            return Err(NotifyError::playback(format!(
                "{:?} failed with {}",
                command.get_program(),
                status
            )));
        }

        Ok(())
    }
}

/// In-process playback on the default output device.
#[cfg(feature = "audio")]
#[derive(Debug, Clone, Default)]
pub struct RodioPlayer;

#[cfg(feature = "audio")]
impl ClipPlayer for RodioPlayer {
    fn play(&self, resource: &ClipResource) -> Result<()> {
        use rodio::{Decoder, OutputStream, Sink};
        use std::io::Cursor;

        let bytes = load_clip(resource)?;

        let (_stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| NotifyError::playback(format!("no audio output device: {}", e)))?;
        let source = Decoder::new(Cursor::new(bytes))
            .map_err(|e| NotifyError::playback(format!("cannot decode {}: {}", resource, e)))?;
        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| NotifyError::playback(format!("cannot open audio sink: {}", e)))?;

        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}

#[cfg(feature = "audio")]
pub type DefaultClipPlayer = RodioPlayer;

#[cfg(not(feature = "audio"))]
pub type DefaultClipPlayer = CommandPlayer;
