pub mod report;
pub mod timer;

pub use crate::domain::model::{Credentials, Recipients, RenderedReport, Report, SystemStats};
pub use crate::domain::ports::{
    ClipPlayer, Clock, CredentialSource, MailRelay, RelaySession, SystemStatsProvider,
};
pub use crate::utils::error::Result;
