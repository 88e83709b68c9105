#[cfg(feature = "cli")]
pub mod cli;
pub mod credential_file;
pub mod credentials;

use crate::domain::model::ClipResource;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use credentials::CredentialStrategy;
use std::time::Duration;

pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything `NotifyTimer` needs at construction.
#[derive(Debug, Clone)]
pub struct TimerConfig {
    pub credentials: CredentialStrategy,
    /// Name shown in the subject; defaults to the running executable's file name.
    pub label: Option<String>,
    pub alert_clip: ClipResource,
    pub relay_timeout: Duration,
}

impl TimerConfig {
    pub fn new(credentials: CredentialStrategy) -> Self {
        Self {
            credentials,
            label: None,
            alert_clip: ClipResource::Bundled,
            relay_timeout: DEFAULT_RELAY_TIMEOUT,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_alert_clip(mut self, clip: ClipResource) -> Self {
        self.alert_clip = clip;
        self
    }

    pub fn with_relay_timeout(mut self, timeout: Duration) -> Self {
        self.relay_timeout = timeout;
        self
    }

    pub fn resolved_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
                .unwrap_or_else(|| "script".to_string())
        })
    }
}

impl Validate for TimerConfig {
    fn validate(&self) -> Result<()> {
        if let Some(label) = &self.label {
            validate_non_empty_string("label", label)?;
        }

        if let ClipResource::File(path) = &self.alert_clip {
            validate_path("alert_clip", path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TimerConfig::new(CredentialStrategy::Environment);
        assert_eq!(config.alert_clip, ClipResource::Bundled);
        assert_eq!(config.relay_timeout, DEFAULT_RELAY_TIMEOUT);
        assert!(!config.resolved_label().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_label_wins() {
        let config = TimerConfig::new(CredentialStrategy::Environment).with_label("train.py");
        assert_eq!(config.resolved_label(), "train.py");
    }

    #[test]
    fn test_missing_clip_file_fails_validation() {
        let config = TimerConfig::new(CredentialStrategy::Environment)
            .with_alert_clip(ClipResource::File("/no/such/clip.wav".into()));
        assert!(config.validate().is_err());
    }
}
