use crate::config::credentials::{CredentialMethod, CredentialStrategy, PartialCredentials};
use crate::config::TimerConfig;
use crate::domain::model::ClipResource;
use crate::utils::error::{NotifyError, Result};
use crate::utils::validation::{validate_path, validate_recipients, Validate};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "scriptime")]
#[command(about = "Run a command and get an email (and a sound) when it finishes")]
pub struct CliConfig {
    /// Where credentials come from: file, environment or explicit
    #[arg(long, default_value = "file")]
    pub method: CredentialMethod,

    /// Credential file (JSON, or TOML with a .toml extension)
    #[arg(long, default_value = "scriptime.json")]
    pub config: PathBuf,

    /// Sender address (explicit method)
    #[arg(long)]
    pub email: Option<String>,

    /// Sender password (explicit method)
    #[arg(long)]
    pub password: Option<String>,

    /// Relay host (explicit method)
    #[arg(long)]
    pub server: Option<String>,

    /// Relay port (explicit method)
    #[arg(long)]
    pub port: Option<u16>,

    /// Recipient addresses
    #[arg(long = "to", value_delimiter = ',', required = true)]
    pub targets: Vec<String>,

    /// Play the alert sound after notifying
    #[arg(long)]
    pub sound: bool,

    /// Play this WAV file instead of the bundled clip
    #[arg(long)]
    pub sound_file: Option<PathBuf>,

    /// Print the report to stdout
    #[arg(long)]
    pub print_body: bool,

    /// Name used in the subject line (defaults to the command name)
    #[arg(long)]
    pub label: Option<String>,

    /// Cargo.lock to list dependencies from (defaults to ./Cargo.lock if present)
    #[arg(long)]
    pub lockfile: Option<PathBuf>,

    /// Command whose first output line is reported as the runtime version
    #[arg(long, default_value = "rustc --version")]
    pub version_command: String,

    /// Relay connection timeout in seconds
    #[arg(long, default_value = "60")]
    pub relay_timeout: u64,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// The command to run
    #[arg(trailing_var_arg = true, required = true, num_args = 1..)]
    pub command: Vec<String>,
}

impl CliConfig {
    pub fn credential_strategy(&self) -> CredentialStrategy {
        match self.method {
            CredentialMethod::File => CredentialStrategy::file(&self.config),
            CredentialMethod::Environment => CredentialStrategy::Environment,
            CredentialMethod::Explicit => CredentialStrategy::Explicit(PartialCredentials {
                sender_address: self.email.clone(),
                sender_secret: self.password.clone(),
                relay_host: self.server.clone(),
                relay_port: self.port.map(|p| p.to_string()),
            }),
        }
    }

    pub fn timer_config(&self) -> TimerConfig {
        let label = self.label.clone().unwrap_or_else(|| self.command_label());
        let clip = self
            .sound_file
            .clone()
            .map(ClipResource::File)
            .unwrap_or_default();

        TimerConfig::new(self.credential_strategy())
            .with_label(label)
            .with_alert_clip(clip)
            .with_relay_timeout(Duration::from_secs(self.relay_timeout))
    }

    /// File name of the wrapped program, e.g. `train.py` for `python train.py`.
    fn command_label(&self) -> String {
        let script = self
            .command
            .iter()
            .skip(1)
            .find(|arg| !arg.starts_with('-'))
            .filter(|arg| arg.contains('.'))
            .or_else(|| self.command.first());

        script
            .map(|s| {
                PathBuf::from(s)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| s.clone())
            })
            .unwrap_or_else(|| "script".to_string())
    }

    /// Splits `--version-command` into program and arguments.
    pub fn version_command(&self) -> Option<(String, Vec<String>)> {
        let mut parts = self.version_command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some((program, parts.collect()))
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_recipients(&self.targets)?;

        if self.command.is_empty() {
            return Err(NotifyError::validation("no command given to run"));
        }

        if let Some(path) = &self.sound_file {
            validate_path("sound_file", path)?;
        }

        if let Some(path) = &self.lockfile {
            validate_path("lockfile", path)?;
        }

        if self.relay_timeout == 0 {
            return Err(NotifyError::validation("relay_timeout must be at least 1 second"));
        }

        Ok(())
    }
}
