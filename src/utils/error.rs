use std::fmt;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Where in the relay conversation a delivery failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStage {
    /// Connecting, upgrading to TLS or authenticating.
    Connect,
    /// Building or submitting an individual message.
    Send,
}

impl fmt::Display for DeliveryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStage::Connect => write!(f, "connect"),
            DeliveryStage::Send => write!(f, "send"),
        }
    }
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing credential field(s): {fields}")]
    MissingConfigError { fields: String },

    #[error("Timer has not been started, call start() first")]
    NotStartedError,

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Delivery failed during {stage}: {source}")]
    DeliveryError {
        stage: DeliveryStage,
        #[source]
        source: BoxError,
    },

    #[error("Playback error: {message}")]
    PlaybackError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Usage,
    Delivery,
    Playback,
    Io,
}

impl NotifyError {
    pub fn config(message: impl Into<String>) -> Self {
        NotifyError::ConfigError {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        NotifyError::ValidationError {
            message: message.into(),
        }
    }

    pub fn delivery(stage: DeliveryStage, source: impl Into<BoxError>) -> Self {
        NotifyError::DeliveryError {
            stage,
            source: source.into(),
        }
    }

    pub fn playback(message: impl Into<String>) -> Self {
        NotifyError::PlaybackError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            NotifyError::ConfigError { .. } | NotifyError::MissingConfigError { .. } => {
                ErrorCategory::Configuration
            }
            NotifyError::NotStartedError | NotifyError::ValidationError { .. } => {
                ErrorCategory::Usage
            }
            NotifyError::DeliveryError { .. } => ErrorCategory::Delivery,
            NotifyError::PlaybackError { .. } => ErrorCategory::Playback,
            NotifyError::IoError(_) => ErrorCategory::Io,
        }
    }

    /// One-line message that names the stage which failed.
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Credential resolution failed: {}", self),
            ErrorCategory::Usage => format!("Invalid call: {}", self),
            ErrorCategory::Delivery => format!("Email delivery failed: {}", self),
            ErrorCategory::Playback => format!("Alert playback failed: {}", self),
            ErrorCategory::Io => format!("I/O failure: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            NotifyError::ConfigError { .. } => {
                "Check that the credential file exists and is valid JSON or TOML"
            }
            NotifyError::MissingConfigError { .. } => {
                "Set SCRIPTIME_EMAIL, SCRIPTIME_PASSWORD, SCRIPTIME_SERVER and SCRIPTIME_PORT, or provide them in the credential file"
            }
            NotifyError::NotStartedError => "Call start() before notify()",
            NotifyError::ValidationError { .. } => "Pass at least one non-empty recipient address",
            NotifyError::DeliveryError {
                stage: DeliveryStage::Connect,
                ..
            } => "Verify the relay host, port and that the sender password (or app password) is accepted",
            NotifyError::DeliveryError { .. } => "Verify the recipient addresses and the relay's sending limits",
            NotifyError::PlaybackError { .. } => {
                "Check that an audio output device is available and the clip file is readable"
            }
            NotifyError::IoError(_) => "Check file permissions and paths",
        }
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;
