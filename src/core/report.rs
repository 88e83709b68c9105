use crate::domain::model::{RenderedReport, Report};
use std::fmt::Write;
use std::time::Duration;

/// `HH:MM:SS`; hours keep counting past 23.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

impl Report {
    pub fn render(&self) -> RenderedReport {
        let stats = &self.stats;
        let mut body = String::new();

        // Writing into a String cannot fail.
        let _ = write!(
            body,
            "Your script has finished.\n\n\
             Elapsed Time: {}\n\n\
             CPU Usage: {:.2}%\n\
             RAM Usage: {:.2}%\n\
             Remaining RAM Available: {:.2} GB\n\n\
             System information: {}\n\
             Processor: {}\n\
             Runtime Version: {}\n\n\
             Packages Used:\n",
            format_elapsed(self.elapsed),
            stats.cpu_percent,
            stats.ram_percent,
            stats.ram_available_gb,
            stats.os_name,
            stats.processor,
            stats.runtime_version,
        );

        let packages = stats
            .dependencies
            .iter()
            .map(|dep| format!("Package: {}, Version: {}", dep.name, dep.version))
            .collect::<Vec<_>>()
            .join("\n");
        body.push_str(&packages);

        RenderedReport {
            subject: self.subject.clone(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Dependency, SystemStats};

    fn report(elapsed_secs: u64, dependencies: Vec<Dependency>) -> Report {
        Report {
            subject: "[01-02-2024 03:04:05] train.py Finished".to_string(),
            elapsed: Duration::from_secs(elapsed_secs),
            stats: SystemStats {
                cpu_percent: 12.5,
                ram_percent: 50.0,
                ram_available_gb: 7.891,
                os_name: "Linux".to_string(),
                processor: "x86_64".to_string(),
                runtime_version: "rustc 1.80.0".to_string(),
                dependencies,
            },
        }
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_elapsed(Duration::from_secs(3725)), "01:02:05");
        assert_eq!(format_elapsed(Duration::from_millis(59_999)), "00:00:59");
        assert_eq!(format_elapsed(Duration::from_secs(90_000)), "25:00:00");
    }

    #[test]
    fn test_render_field_order() {
        let rendered = report(3725, vec![]).render();
        let text = rendered.to_string();

        let order = [
            "Subject: [01-02-2024 03:04:05] train.py Finished",
            "Your script has finished.",
            "Elapsed Time: 01:02:05",
            "CPU Usage: 12.50%",
            "RAM Usage: 50.00%",
            "Remaining RAM Available: 7.89 GB",
            "System information: Linux",
            "Processor: x86_64",
            "Runtime Version: rustc 1.80.0",
            "Packages Used:",
        ];

        let mut last = 0;
        for field in order {
            let at = text[last..]
                .find(field)
                .unwrap_or_else(|| panic!("{} missing or out of order", field));
            last += at + field.len();
        }
        assert!(!rendered.body.contains("Subject:"));
    }

    #[test]
    fn test_one_line_per_dependency_in_order() {
        let deps = vec![
            Dependency {
                name: "zeta".to_string(),
                version: "0.1.0".to_string(),
            },
            Dependency {
                name: "alpha".to_string(),
                version: "2.0.0".to_string(),
            },
        ];
        let body = report(1, deps).render().body;

        let lines: Vec<&str> = body
            .lines()
            .filter(|line| line.starts_with("Package: "))
            .collect();
        assert_eq!(
            lines,
            vec![
                "Package: zeta, Version: 0.1.0",
                "Package: alpha, Version: 2.0.0"
            ]
        );
    }
}
