use crate::domain::model::{Dependency, SystemStats};
use crate::domain::ports::SystemStatsProvider;
use crate::utils::error::{NotifyError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Host metrics, runtime version and dependency listing for the report.
#[derive(Debug, Clone)]
pub struct HostStats {
    lockfile: Option<PathBuf>,
    version_command: Option<(String, Vec<String>)>,
}

impl Default for HostStats {
    fn default() -> Self {
        Self::new()
    }
}

impl HostStats {
    pub fn new() -> Self {
        Self {
            lockfile: None,
            version_command: Some(("rustc".to_string(), vec!["--version".to_string()])),
        }
    }

    pub fn with_lockfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.lockfile = Some(path.into());
        self
    }

    pub fn with_version_command(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
        self.version_command = Some((program.into(), args));
        self
    }

    pub fn without_version_command(mut self) -> Self {
        self.version_command = None;
        self
    }

    fn runtime_version(&self) -> String {
        let Some((program, args)) = &self.version_command else {
            return "unknown".to_string();
        };

        match Command::new(program).args(args).output() {
            Ok(output) if output.status.success() => {
                // Some interpreters print their version on stderr.
                let text = if output.stdout.is_empty() {
                    output.stderr
                } else {
                    output.stdout
                };
                String::from_utf8_lossy(&text)
                    .lines()
                    .next()
                    .map(|line| line.trim().to_string())
                    .filter(|line| !line.is_empty())
                    .unwrap_or_else(|| "unknown".to_string())
            }
            Ok(output) => {
                tracing::debug!("Version command {} exited with {}", program, output.status);
                "unknown".to_string()
            }
            Err(e) => {
                tracing::debug!("Version command {} failed: {}", program, e);
                "unknown".to_string()
            }
        }
    }

    fn dependencies(&self) -> Vec<Dependency> {
        let path = match &self.lockfile {
            Some(path) => path.clone(),
            None => {
                let default = PathBuf::from("Cargo.lock");
                if !default.exists() {
                    return Vec::new();
                }
                default
            }
        };

        match read_lockfile(&path) {
            Ok(dependencies) => dependencies,
            Err(e) => {
                tracing::warn!("Could not read dependencies from {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct Lockfile {
    #[serde(default)]
    package: Vec<LockedPackage>,
}

#[derive(Debug, Deserialize)]
struct LockedPackage {
    name: String,
    version: String,
}

/// Packages in lockfile order.
pub fn read_lockfile(path: &Path) -> Result<Vec<Dependency>> {
    let content = std::fs::read_to_string(path)?;
    parse_lockfile(&content)
}

pub fn parse_lockfile(content: &str) -> Result<Vec<Dependency>> {
    let lockfile: Lockfile = toml::from_str(content)
        .map_err(|e| NotifyError::config(format!("invalid lockfile: {}", e)))?;
    Ok(lockfile
        .package
        .into_iter()
        .map(|p| Dependency {
            name: p.name,
            version: p.version,
        })
        .collect())
}

struct HostMetrics {
    cpu_percent: f64,
    ram_percent: f64,
    ram_available_gb: f64,
    os_name: Option<String>,
    processor: Option<String>,
}

#[cfg(feature = "cli")]
fn host_metrics() -> Option<HostMetrics> {
    use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

    const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

    if !sysinfo::IS_SUPPORTED_SYSTEM {
        return None;
    }

    let mut system = System::new_with_specifics(
        RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything()),
    );

    // CPU usage is a delta between two refreshes.
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    system.refresh_cpu_usage();

    let total_memory = system.total_memory();
    let ram_percent = if total_memory > 0 {
        system.used_memory() as f64 / total_memory as f64 * 100.0
    } else {
        0.0
    };

    let processor = system
        .cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|brand| !brand.is_empty());

    Some(HostMetrics {
        cpu_percent: system.global_cpu_usage() as f64,
        ram_percent,
        ram_available_gb: system.available_memory() as f64 / BYTES_PER_GB,
        os_name: System::name(),
        processor,
    })
}

// Without sysinfo only the static parts of the report are available.
#[cfg(not(feature = "cli"))]
fn host_metrics() -> Option<HostMetrics> {
    None
}

impl SystemStatsProvider for HostStats {
    fn snapshot(&self) -> SystemStats {
        let mut stats = SystemStats::zeroed();

        match host_metrics() {
            Some(metrics) => {
                stats.cpu_percent = metrics.cpu_percent;
                stats.ram_percent = metrics.ram_percent;
                stats.ram_available_gb = metrics.ram_available_gb;
                if let Some(os_name) = metrics.os_name {
                    stats.os_name = os_name;
                }
                if let Some(processor) = metrics.processor {
                    stats.processor = processor;
                }
            }
            None => tracing::debug!("Host metrics unavailable, reporting zeroes"),
        }

        stats.runtime_version = self.runtime_version();
        stats.dependencies = self.dependencies();

        tracing::debug!(
            "📊 CPU: {:.1}%, RAM: {:.1}%, available: {:.2} GB, {} dependencies",
            stats.cpu_percent,
            stats.ram_percent,
            stats.ram_available_gb,
            stats.dependencies.len()
        );

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LOCKFILE: &str = r#"
version = 4

[[package]]
name = "anyhow"
version = "1.0.98"
source = "registry+https://github.com/rust-lang/crates.io-index"

[[package]]
name = "scriptime"
version = "0.2.0"
dependencies = ["anyhow"]
"#;

    #[test]
    fn test_parse_lockfile_keeps_order() {
        let deps = parse_lockfile(LOCKFILE).unwrap();
        assert_eq!(
            deps,
            vec![
                Dependency {
                    name: "anyhow".to_string(),
                    version: "1.0.98".to_string()
                },
                Dependency {
                    name: "scriptime".to_string(),
                    version: "0.2.0".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_snapshot_never_fails() {
        let mut bad_lockfile = NamedTempFile::new().unwrap();
        bad_lockfile.write_all(b"[[package]]\nname = 3").unwrap();

        let stats = HostStats::new()
            .with_lockfile(bad_lockfile.path())
            .with_version_command("definitely-not-a-real-binary-42", vec![])
            .snapshot();

        assert!(stats.dependencies.is_empty());
        assert_eq!(stats.runtime_version, "unknown");
        assert!(stats.cpu_percent >= 0.0);
        assert!((0.0..=100.0).contains(&stats.ram_percent));
        assert!(!stats.os_name.is_empty());
    }

    #[test]
    fn test_snapshot_reads_lockfile() {
        let mut lockfile = NamedTempFile::new().unwrap();
        lockfile.write_all(LOCKFILE.as_bytes()).unwrap();

        let stats = HostStats::new()
            .with_lockfile(lockfile.path())
            .without_version_command()
            .snapshot();

        assert_eq!(stats.dependencies.len(), 2);
        assert_eq!(stats.dependencies[0].name, "anyhow");
    }
}
