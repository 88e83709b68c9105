use crate::utils::error::{NotifyError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(NotifyError::validation(format!(
            "{}: path cannot be empty",
            field_name
        )));
    }

    if !path.exists() {
        return Err(NotifyError::validation(format!(
            "{}: {} does not exist",
            field_name,
            path.display()
        )));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NotifyError::validation(format!(
            "{}: value cannot be empty or whitespace-only",
            field_name
        )));
    }
    Ok(())
}

/// Parses a relay port, rejecting zero and anything outside `u16`.
pub fn parse_port(field_name: &str, value: &str) -> Result<u16> {
    match value.trim().parse::<u16>() {
        Ok(0) => Err(NotifyError::config(format!(
            "{}: port must be between 1 and 65535",
            field_name
        ))),
        Ok(port) => Ok(port),
        Err(e) => Err(NotifyError::config(format!(
            "{}: '{}' is not a valid port ({})",
            field_name, value, e
        ))),
    }
}

/// Every recipient must be non-blank and there must be at least one.
pub fn validate_recipients(recipients: &[String]) -> Result<()> {
    if recipients.is_empty() {
        return Err(NotifyError::validation(
            "at least one recipient address is required",
        ));
    }

    for (index, recipient) in recipients.iter().enumerate() {
        validate_non_empty_string(&format!("recipients[{}]", index), recipient)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("relay_port", "587").unwrap(), 587);
        assert_eq!(parse_port("relay_port", " 25 ").unwrap(), 25);
        assert!(parse_port("relay_port", "0").is_err());
        assert!(parse_port("relay_port", "70000").is_err());
        assert!(parse_port("relay_port", "smtp").is_err());
    }

    #[test]
    fn test_validate_recipients() {
        assert!(validate_recipients(&["a@x.com".to_string()]).is_ok());
        assert!(validate_recipients(&[]).is_err());
        assert!(validate_recipients(&["a@x.com".to_string(), "  ".to_string()]).is_err());
    }

    #[test]
    fn test_validate_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_path("sound_file", dir.path()).is_ok());
        assert!(validate_path("sound_file", &dir.path().join("missing.wav")).is_err());
        assert!(validate_path("sound_file", Path::new("")).is_err());
    }
}
