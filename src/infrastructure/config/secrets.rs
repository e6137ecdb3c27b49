//! Deployment secrets: a JSON file overlaid by environment variables

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use crate::application::errors::{BotError, ConfigError};

/// Environment variable holding the gateway token
pub const TOKEN_VAR: &str = "TOKEN";
/// Prefix for any other secret taken from the environment
pub const SECRET_VAR_PREFIX: &str = "SECRET_";

#[derive(Clone, Default, Deserialize, Serialize)]
pub struct Secrets {
    pub token: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, String>,
}

impl Secrets {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse secrets: {}", e)))
    }

    /// File secrets if readable, otherwise empty, then overlaid by the environment
    pub fn resolve(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut secrets = Self::load(path).unwrap_or_else(|e| {
            tracing::info!("Failed to read {}: {}", path.display(), e);
            Self::default()
        });
        secrets.overlay(std::env::vars());
        secrets
    }

    /// Apply `TOKEN` and `SECRET_<NAME>` variables; other variables are ignored
    pub fn overlay<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if value.is_empty() {
                continue;
            }
            if key == TOKEN_VAR {
                self.token = Some(value);
            } else if let Some(name) = key.strip_prefix(SECRET_VAR_PREFIX) {
                if !name.is_empty() {
                    self.extra.insert(name.to_lowercase(), value);
                }
            }
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.extra.get(name).map(String::as_str)
    }
}

/// Gateway token to connect with: the CLI override if set, else the resolved
/// secret. Blank values count as absent.
pub fn resolve_token(secrets: &Secrets, override_token: Option<&str>) -> Result<String, BotError> {
    override_token
        .filter(|t| !t.trim().is_empty())
        .or_else(|| secrets.token())
        .map(str::to_string)
        .ok_or_else(|| BotError::Auth("No Discord token provided.".to_string()))
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.extra.keys().collect();
        keys.sort();
        f.debug_struct("Secrets")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("extra", &keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"token": "abc", "minecraft_code": "xyz"}}"#).unwrap();

        let secrets = Secrets::load(file.path()).unwrap();
        assert_eq!(secrets.token(), Some("abc"));
        assert_eq!(secrets.get("minecraft_code"), Some("xyz"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut secrets = Secrets::default().with_token("from-file");
        secrets.overlay(vars(&[
            ("TOKEN", "from-env"),
            ("SECRET_API_KEY", "k"),
            ("PATH", "/usr/bin"),
        ]));

        assert_eq!(secrets.token(), Some("from-env"));
        assert_eq!(secrets.get("api_key"), Some("k"));
        assert!(secrets.get("path").is_none());
    }

    #[test]
    fn test_empty_env_value_does_not_clear() {
        let mut secrets = Secrets::default().with_token("keep");
        secrets.overlay(vars(&[("TOKEN", "")]));
        assert_eq!(secrets.token(), Some("keep"));
    }

    #[test]
    fn test_blank_token_is_absent() {
        let secrets = Secrets::default().with_token("  ");
        assert!(secrets.token().is_none());
    }

    #[test]
    fn test_resolve_token_prefers_override() {
        let secrets = Secrets::default().with_token("from-secrets");
        assert_eq!(resolve_token(&secrets, Some("from-cli")).unwrap(), "from-cli");
        assert_eq!(resolve_token(&secrets, None).unwrap(), "from-secrets");
        assert_eq!(resolve_token(&secrets, Some(" ")).unwrap(), "from-secrets");
    }

    #[test]
    fn test_resolve_token_missing() {
        let result = resolve_token(&Secrets::default(), None);
        assert!(matches!(result, Err(BotError::Auth(_))));
    }

    #[test]
    fn test_resolve_token_blank() {
        let secrets = Secrets::default().with_token("   ");
        assert!(matches!(resolve_token(&secrets, Some("")), Err(BotError::Auth(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let secrets = Secrets::default().with_token("super-secret");
        assert!(!format!("{:?}", secrets).contains("super-secret"));
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        assert!(matches!(Secrets::load("/nonexistent/secrets.json"), Err(ConfigError::Io(_))));
    }
}
