use crate::domain::model::{ClipResource, Credentials, RenderedReport, SystemStats};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

pub trait CredentialSource {
    fn resolve(&self) -> Result<Credentials>;
}

/// Never fails; hosts that cannot be queried report zeroed values.
pub trait SystemStatsProvider {
    fn snapshot(&self) -> SystemStats;
}

pub trait MailRelay {
    type Session: RelaySession;

    /// Connects and authenticates once for a whole batch of sends.
    fn open(&self, credentials: &Credentials) -> Result<Self::Session>;
}

pub trait RelaySession {
    fn send(&mut self, recipient: &str, report: &RenderedReport) -> Result<()>;
}

/// Blocks until the clip has finished playing.
pub trait ClipPlayer {
    fn play(&self, resource: &ClipResource) -> Result<()>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}
