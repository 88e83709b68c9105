use crate::config::credential_file::CredentialFile;
use crate::domain::model::Credentials;
use crate::domain::ports::CredentialSource;
use crate::utils::error::{NotifyError, Result};
use crate::utils::validation::parse_port;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_EMAIL: &str = "SCRIPTIME_EMAIL";
pub const ENV_PASSWORD: &str = "SCRIPTIME_PASSWORD";
pub const ENV_SERVER: &str = "SCRIPTIME_SERVER";
pub const ENV_PORT: &str = "SCRIPTIME_PORT";

/// Credential fields as read from any source, before the presence check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialCredentials {
    pub sender_address: Option<String>,
    pub sender_secret: Option<String>,
    pub relay_host: Option<String>,
    pub relay_port: Option<String>,
}

impl PartialCredentials {
    /// Reads the four `SCRIPTIME_*` variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            sender_address: lookup(ENV_EMAIL),
            sender_secret: lookup(ENV_PASSWORD),
            relay_host: lookup(ENV_SERVER),
            relay_port: lookup(ENV_PORT),
        }
    }

    /// Checks that all four fields are present, reporting every missing one at once.
    pub fn into_credentials(self) -> Result<Credentials> {
        let mut missing = Vec::new();
        let mut take = |field: &'static str, value: Option<String>| match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                missing.push(field);
                String::new()
            }
        };

        let sender_address = take("sender_address", self.sender_address);
        let sender_secret = take("sender_secret", self.sender_secret);
        let relay_host = take("relay_host", self.relay_host);
        let relay_port = take("relay_port", self.relay_port);

        if !missing.is_empty() {
            return Err(NotifyError::MissingConfigError {
                fields: missing.join(", "),
            });
        }

        Ok(Credentials {
            sender_address: sender_address.trim().to_string(),
            sender_secret,
            relay_host: relay_host.trim().to_string(),
            relay_port: parse_port("relay_port", &relay_port)?,
        })
    }
}

/// How credentials are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMethod {
    File,
    Environment,
    Explicit,
}

impl FromStr for CredentialMethod {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(CredentialMethod::File),
            "environment" | "env" => Ok(CredentialMethod::Environment),
            "explicit" | "hardcode" => Ok(CredentialMethod::Explicit),
            other => Err(NotifyError::config(format!(
                "{} is not a valid method, use \"file\", \"environment\" or \"explicit\"",
                other
            ))),
        }
    }
}

impl fmt::Display for CredentialMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialMethod::File => write!(f, "file"),
            CredentialMethod::Environment => write!(f, "environment"),
            CredentialMethod::Explicit => write!(f, "explicit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialStrategy {
    File { path: PathBuf },
    Environment,
    Explicit(PartialCredentials),
}

impl CredentialStrategy {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        CredentialStrategy::File { path: path.into() }
    }

    pub fn explicit(
        sender_address: impl Into<String>,
        sender_secret: impl Into<String>,
        relay_host: impl Into<String>,
        relay_port: u16,
    ) -> Self {
        CredentialStrategy::Explicit(PartialCredentials {
            sender_address: Some(sender_address.into()),
            sender_secret: Some(sender_secret.into()),
            relay_host: Some(relay_host.into()),
            relay_port: Some(relay_port.to_string()),
        })
    }

    pub fn method(&self) -> CredentialMethod {
        match self {
            CredentialStrategy::File { .. } => CredentialMethod::File,
            CredentialStrategy::Environment => CredentialMethod::Environment,
            CredentialStrategy::Explicit(_) => CredentialMethod::Explicit,
        }
    }
}

impl CredentialSource for CredentialStrategy {
    fn resolve(&self) -> Result<Credentials> {
        let partial = match self {
            CredentialStrategy::File { path } => CredentialFile::from_file(path)?.into_partial(),
            CredentialStrategy::Environment => {
                PartialCredentials::from_lookup(|name| std::env::var(name).ok())
            }
            CredentialStrategy::Explicit(partial) => partial.clone(),
        };

        let credentials = partial.into_credentials()?;
        tracing::debug!(
            "Resolved credentials for {} via {} ({}:{})",
            credentials.sender_address,
            self.method(),
            credentials.relay_host,
            credentials.relay_port
        );
        Ok(credentials)
    }
}
