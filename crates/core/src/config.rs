//! Development proxy configuration.
//!
//! During development the frontend build tool forwards every request under a path prefix to a
//! separately run backend. This module holds that setting as a typed, validated record so it can
//! be resolved once at startup and handed to tooling as JSON. Nothing here forwards traffic.
//!
//! Values are passed in as already-read `Option<String>`s; this module never reads environment
//! variables itself.

use serde::Serialize;

use crate::constants::{DEFAULT_PROXY_PATH_PREFIX, DEFAULT_PROXY_TARGET};
use crate::validation::{validate_proxy_path_prefix, validate_proxy_target};
use crate::{RegistryError, RegistryResult};

/// Dev-server proxy rule resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevProxyConfig {
    path_prefix: String,
    target: String,
    change_origin: bool,
    rewrite_path: bool,
}

impl Default for DevProxyConfig {
    fn default() -> Self {
        Self {
            path_prefix: DEFAULT_PROXY_PATH_PREFIX.to_owned(),
            target: DEFAULT_PROXY_TARGET.to_owned(),
            change_origin: true,
            rewrite_path: false,
        }
    }
}

impl DevProxyConfig {
    /// Create a new `DevProxyConfig`. Paths are always forwarded unchanged.
    pub fn new(
        path_prefix: impl Into<String>,
        target: impl Into<String>,
        change_origin: bool,
    ) -> RegistryResult<Self> {
        let path_prefix = path_prefix.into();
        let target = target.into();
        validate_proxy_path_prefix(&path_prefix)?;
        validate_proxy_target(&target)?;

        Ok(Self {
            path_prefix,
            target,
            change_origin,
            rewrite_path: false,
        })
    }

    /// Builds the config from optional raw values, applying defaults for missing or blank ones.
    pub fn from_env_values(
        path_prefix: Option<String>,
        target: Option<String>,
        change_origin: Option<String>,
    ) -> RegistryResult<Self> {
        let defaults = Self::default();
        let path_prefix = non_blank(path_prefix).unwrap_or(defaults.path_prefix);
        let target = non_blank(target).unwrap_or(defaults.target);
        let change_origin = non_blank(change_origin)
            .map(|v| parse_flag(&v))
            .transpose()?
            .unwrap_or(defaults.change_origin);

        Self::new(path_prefix, target, change_origin)
    }

    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether the `Origin`/`Host` headers are rewritten to the target.
    pub fn change_origin(&self) -> bool {
        self.change_origin
    }

    pub fn rewrite_path(&self) -> bool {
        self.rewrite_path
    }

    /// Whether a request path is covered by this rule (exact prefix or prefix followed by `/`).
    pub fn matches(&self, path: &str) -> bool {
        if self.path_prefix == "/" {
            return path.starts_with('/');
        }
        match path.strip_prefix(self.path_prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> RegistryResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(RegistryError::InvalidInput(format!(
            "invalid boolean flag '{other}' (expected true/false, 1/0 or yes/no)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dev_server_setup() {
        let config = DevProxyConfig::from_env_values(None, None, None).expect("defaults");
        assert_eq!(config, DevProxyConfig::default());
        assert_eq!(config.path_prefix(), "/api");
        assert_eq!(config.target(), "http://127.0.0.1:8000");
        assert!(config.change_origin());
        assert!(!config.rewrite_path());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = DevProxyConfig::from_env_values(
            Some("  ".into()),
            Some(String::new()),
            Some(" ".into()),
        )
        .expect("defaults");
        assert_eq!(config, DevProxyConfig::default());
    }

    #[test]
    fn overrides_are_trimmed_and_validated() {
        let config = DevProxyConfig::from_env_values(
            Some(" /backend ".into()),
            Some("https://derm.internal:8443".into()),
            Some("No".into()),
        )
        .expect("overrides");
        assert_eq!(config.path_prefix(), "/backend");
        assert_eq!(config.target(), "https://derm.internal:8443");
        assert!(!config.change_origin());
    }

    #[test]
    fn rejects_invalid_values() {
        let err = DevProxyConfig::from_env_values(Some("api".into()), None, None)
            .expect_err("prefix without slash");
        assert!(matches!(err, RegistryError::InvalidInput(msg) if msg.contains("start with '/'")));

        let err = DevProxyConfig::from_env_values(None, Some("127.0.0.1:8000".into()), None)
            .expect_err("target without scheme");
        assert!(matches!(err, RegistryError::InvalidInput(msg) if msg.contains("http://")));

        let err = DevProxyConfig::from_env_values(None, None, Some("maybe".into()))
            .expect_err("bad flag");
        assert!(matches!(err, RegistryError::InvalidInput(msg) if msg.contains("maybe")));
    }

    #[test]
    fn matches_prefix_on_segment_boundary() {
        let config = DevProxyConfig::default();
        assert!(config.matches("/api"));
        assert!(config.matches("/api/"));
        assert!(config.matches("/api/examinations/12"));
        assert!(!config.matches("/apiary"));
        assert!(!config.matches("/static/app.js"));
        assert!(!config.matches("api/examinations"));
    }

    #[test]
    fn root_prefix_matches_every_path() {
        let config = DevProxyConfig::new("/", "http://localhost:8000", true).expect("root");
        assert!(config.matches("/"));
        assert!(config.matches("/anything"));
        assert!(!config.matches("relative"));
    }

    #[test]
    fn serialises_for_build_tooling() {
        let json = serde_json::to_value(DevProxyConfig::default()).expect("json");
        assert_eq!(
            json,
            serde_json::json!({
                "pathPrefix": "/api",
                "target": "http://127.0.0.1:8000",
                "changeOrigin": true,
                "rewritePath": false
            })
        );
    }
}
