pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{audio::DefaultClipPlayer, clock::SystemClock, smtp::SmtpRelay, stats::HostStats};
pub use config::credentials::{CredentialMethod, CredentialStrategy};
pub use config::TimerConfig;
pub use crate::core::timer::NotifyTimer;
pub use domain::model::{ClipResource, Credentials, Dependency, Recipients, SystemStats};
pub use utils::error::{NotifyError, Result};
