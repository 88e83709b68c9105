use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Resolved relay credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub sender_address: String,
    pub sender_secret: String,
    pub relay_host: String,
    pub relay_port: u16,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("sender_address", &self.sender_address)
            .field("sender_secret", &"<redacted>")
            .field("relay_host", &self.relay_host)
            .field("relay_port", &self.relay_port)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemStats {
    pub cpu_percent: f64,
    pub ram_percent: f64,
    pub ram_available_gb: f64,
    pub os_name: String,
    pub processor: String,
    pub runtime_version: String,
    pub dependencies: Vec<Dependency>,
}

impl SystemStats {
    /// Placeholder values used when the host cannot be queried.
    pub fn zeroed() -> Self {
        Self {
            cpu_percent: 0.0,
            ram_percent: 0.0,
            ram_available_gb: 0.0,
            os_name: std::env::consts::OS.to_string(),
            processor: std::env::consts::ARCH.to_string(),
            runtime_version: "unknown".to_string(),
            dependencies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub subject: String,
    pub elapsed: Duration,
    pub stats: SystemStats,
}

/// A report rendered to text, ready to be mailed or echoed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub subject: String,
    pub body: String,
}

impl fmt::Display for RenderedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subject: {}\n\n{}", self.subject, self.body)
    }
}

/// Audio clip played by `alert()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClipResource {
    /// The clip compiled into the binary.
    #[default]
    Bundled,
    File(PathBuf),
}

impl fmt::Display for ClipResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipResource::Bundled => write!(f, "bundled:alert.wav"),
            ClipResource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One address or an ordered list of addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipients(pub Vec<String>);

impl Recipients {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for Recipients {
    fn from(address: &str) -> Self {
        Recipients(vec![address.to_string()])
    }
}

impl From<String> for Recipients {
    fn from(address: String) -> Self {
        Recipients(vec![address])
    }
}

impl From<Vec<String>> for Recipients {
    fn from(addresses: Vec<String>) -> Self {
        Recipients(addresses)
    }
}

impl From<&[String]> for Recipients {
    fn from(addresses: &[String]) -> Self {
        Recipients(addresses.to_vec())
    }
}

impl From<Vec<&str>> for Recipients {
    fn from(addresses: Vec<&str>) -> Self {
        Recipients(addresses.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Recipients {
    fn from(addresses: [&str; N]) -> Self {
        Recipients(addresses.iter().map(|a| a.to_string()).collect())
    }
}
