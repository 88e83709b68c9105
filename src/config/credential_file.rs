use crate::config::credentials::PartialCredentials;
use crate::utils::error::{NotifyError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk credential document, JSON or TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialFile {
    pub scriptime_email: Option<String>,
    pub scriptime_password: Option<String>,
    pub scriptime_server: Option<String>,
    pub scriptime_port: Option<PortValue>,
}

/// Ports are accepted both as `587` and `"587"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(i64),
    Text(String),
}

impl PortValue {
    fn into_text(self) -> String {
        match self {
            PortValue::Number(n) => n.to_string(),
            PortValue::Text(s) => s,
        }
    }
}

impl CredentialFile {
    /// Loads a credential file; `.toml` is parsed as TOML, everything else as JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(NotifyError::config(format!(
                "credential file {} not found",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            NotifyError::config(format!("cannot read {}: {}", path.display(), e))
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: Self = serde_json::from_str(content)
            .map_err(|e| NotifyError::config(format!("error decoding JSON credentials: {}", e)))?;
        Ok(file.with_env_vars())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: Self = toml::from_str(content)
            .map_err(|e| NotifyError::config(format!("error decoding TOML credentials: {}", e)))?;
        Ok(file.with_env_vars())
    }

    /// Expands `${VAR}` in the decoded values, so variable contents are never
    /// reinterpreted as JSON or TOML syntax.
    fn with_env_vars(self) -> Self {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex");
        let expand = |value: String| substitute_env_vars(&re, &value);

        Self {
            scriptime_email: self.scriptime_email.map(expand),
            scriptime_password: self.scriptime_password.map(expand),
            scriptime_server: self.scriptime_server.map(expand),
            scriptime_port: self.scriptime_port.map(|port| match port {
                PortValue::Text(text) => PortValue::Text(expand(text)),
                number => number,
            }),
        }
    }

    pub fn into_partial(self) -> PartialCredentials {
        PartialCredentials {
            sender_address: self.scriptime_email,
            sender_secret: self.scriptime_password,
            relay_host: self.scriptime_server,
            relay_port: self.scriptime_port.map(PortValue::into_text),
        }
    }
}

/// Replaces `${VAR}` with the variable's value; unknown variables are left as is.
fn substitute_env_vars(re: &Regex, value: &str) -> String {
    re.replace_all(value, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_json_with_numeric_port() {
        let file = CredentialFile::from_json_str(
            r#"{
                "scriptime_email": "me@example.com",
                "scriptime_password": "secret",
                "scriptime_server": "smtp.example.com",
                "scriptime_port": 587
            }"#,
        )
        .unwrap();

        assert_eq!(file.scriptime_port, Some(PortValue::Number(587)));
        assert_eq!(file.into_partial().relay_port.as_deref(), Some("587"));
    }

    #[test]
    fn test_parse_toml_with_string_port() {
        let file = CredentialFile::from_toml_str(
            r#"
scriptime_email = "me@example.com"
scriptime_password = "secret"
scriptime_server = "smtp.example.com"
scriptime_port = "2525"
"#,
        )
        .unwrap();

        assert_eq!(file.scriptime_port, Some(PortValue::Text("2525".to_string())));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SCRIPTIME_TEST_FILE_SECRET", "from-env");

        let file = CredentialFile::from_json_str(
            r#"{"scriptime_password": "${SCRIPTIME_TEST_FILE_SECRET}", "scriptime_server": "${SCRIPTIME_TEST_UNSET_VAR}"}"#,
        )
        .unwrap();

        assert_eq!(file.scriptime_password.as_deref(), Some("from-env"));
        assert_eq!(
            file.scriptime_server.as_deref(),
            Some("${SCRIPTIME_TEST_UNSET_VAR}")
        );

        std::env::remove_var("SCRIPTIME_TEST_FILE_SECRET");
    }

    #[test]
    fn test_env_values_with_quotes_and_backslashes_stay_verbatim() {
        std::env::set_var("SCRIPTIME_TEST_QUOTED_SECRET", r#"pa"ss"#);
        std::env::set_var("SCRIPTIME_TEST_ESCAPED_SECRET", r"a\nb");

        let json = CredentialFile::from_json_str(
            r#"{"scriptime_password": "${SCRIPTIME_TEST_QUOTED_SECRET}", "scriptime_email": "${SCRIPTIME_TEST_ESCAPED_SECRET}"}"#,
        )
        .unwrap();
        assert_eq!(json.scriptime_password.as_deref(), Some(r#"pa"ss"#));
        assert_eq!(json.scriptime_email.as_deref(), Some(r"a\nb"));

        let toml = CredentialFile::from_toml_str(
            "scriptime_password = \"${SCRIPTIME_TEST_QUOTED_SECRET}\"\nscriptime_server = \"${SCRIPTIME_TEST_ESCAPED_SECRET}\"\n",
        )
        .unwrap();
        assert_eq!(toml.scriptime_password.as_deref(), Some(r#"pa"ss"#));
        assert_eq!(toml.scriptime_server.as_deref(), Some(r"a\nb"));

        std::env::remove_var("SCRIPTIME_TEST_QUOTED_SECRET");
        std::env::remove_var("SCRIPTIME_TEST_ESCAPED_SECRET");
    }

    #[test]
    fn test_port_from_env_var() {
        std::env::set_var("SCRIPTIME_TEST_FILE_PORT", "2525");
        let file =
            CredentialFile::from_json_str(r#"{"scriptime_port": "${SCRIPTIME_TEST_FILE_PORT}"}"#)
                .unwrap();
        assert_eq!(file.into_partial().relay_port.as_deref(), Some("2525"));
        std::env::remove_var("SCRIPTIME_TEST_FILE_PORT");
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = CredentialFile::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, NotifyError::ConfigError { .. }));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = CredentialFile::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, NotifyError::ConfigError { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_from_file_picks_format_by_extension() {
        let mut temp_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        temp_file
            .write_all(b"scriptime_email = \"me@example.com\"\n")
            .unwrap();
        let file = CredentialFile::from_file(temp_file.path()).unwrap();
        assert_eq!(file.scriptime_email.as_deref(), Some("me@example.com"));

        let mut json_file = NamedTempFile::new().unwrap();
        json_file
            .write_all(br#"{"scriptime_email": "you@example.com"}"#)
            .unwrap();
        let file = CredentialFile::from_file(json_file.path()).unwrap();
        assert_eq!(file.scriptime_email.as_deref(), Some("you@example.com"));
    }
}
