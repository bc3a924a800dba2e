//! Evaluator configuration
//!
//! ```toml
//! send_headers = true
//!
//! [rule]
//! allow = true
//! users = ["@"]
//! ips = ["10.0.0.0/8"]
//! ```

use crate::access::{PredicateRegistry, Rule, RuleDocument};
use crate::error::{AccessError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

fn default_send_headers() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Send 403 through the responder when a condition fails
    #[serde(default = "default_send_headers")]
    pub send_headers: bool,

    /// Rule to enforce; none means no restriction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleDocument>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        AccessConfig {
            send_headers: default_send_headers(),
            rule: None,
        }
    }
}

impl AccessConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load from a `.toml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        debug!("Loading access config from {:?}", path);

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&source),
            Some("json") => Self::from_json_str(&source),
            other => Err(AccessError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Resolve the configured rule against `registry`
    pub fn rule(&self, registry: &PredicateRegistry) -> Result<Option<Rule>> {
        self.rule
            .clone()
            .map(|doc| registry.resolve(doc))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AccessConfig::from_toml_str("").unwrap();
        assert!(config.send_headers);
        assert!(config.rule.is_none());
        assert_eq!(config, AccessConfig::default());
    }

    #[test]
    fn test_toml_with_rule() {
        let config = AccessConfig::from_toml_str(
            r#"
send_headers = false

[rule]
allow = true
users = ["@"]
roles = "editor"
"#,
        )
        .unwrap();

        assert!(!config.send_headers);
        let rule = config.rule(&PredicateRegistry::new()).unwrap().unwrap();
        assert_eq!(rule.allow, Some(true));
        assert_eq!(rule.roles, Some(vec!["editor".to_string()]));
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"rule": {{"allow": false, "ips": ["10.0.0.0/8"]}}}}"#).unwrap();

        let config = AccessConfig::load(file.path()).unwrap();
        assert!(config.send_headers);
        assert_eq!(config.rule.unwrap().ips, Some(vec!["10.0.0.0/8".to_string()]));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let file = NamedTempFile::new().unwrap();
        let err = AccessConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, AccessError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let err = AccessConfig::from_toml_str("send_headers = \"maybe\"").unwrap_err();
        assert!(matches!(err, AccessError::Toml(_)));
    }
}
