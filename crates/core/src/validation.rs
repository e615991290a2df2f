//! Input validation utilities.
//!
//! This module checks codes arriving from outside (form input, stored results) against the
//! registry and the storage widths the backend uses, and validates dev-proxy settings.

use derm_types::Code;

use crate::constants::{
    DEFAULT_EXAMINATION_LOCATION, MAX_DIAGNOSIS_RESULT_LEN, MAX_LOCATION_CODE_LEN,
};
use crate::{CodeLabelRegistry, RegistryError, RegistryResult};

/// Resolves the location code recorded for an examination.
///
/// `None` or blank input yields the default location (`CH`). Otherwise the input is trimmed and
/// uppercased, must fit the 2-character location column and must be a known location code.
///
/// # Errors
///
/// Returns `RegistryError::InvalidInput` for over-long or unknown codes and
/// `RegistryError::Code` for malformed ones.
pub fn resolve_examination_location(
    registry: &CodeLabelRegistry,
    input: Option<&str>,
) -> RegistryResult<Code> {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Code::parse(DEFAULT_EXAMINATION_LOCATION)?);
    };

    if raw.chars().count() > MAX_LOCATION_CODE_LEN {
        return Err(RegistryError::InvalidInput(format!(
            "examination location exceeds maximum length of {} characters",
            MAX_LOCATION_CODE_LEN
        )));
    }

    let code = Code::normalise(raw)?;
    registry
        .locations()
        .canonical(code.as_str())
        .cloned()
        .ok_or_else(|| RegistryError::InvalidInput(format!("unknown examination location '{code}'")))
}

/// Validates a diagnosis result code and returns its canonical form.
///
/// Legacy aliases are accepted and resolved to their successor.
///
/// # Errors
///
/// Returns `RegistryError::InvalidInput` for over-long or unknown codes and
/// `RegistryError::Code` for malformed ones.
pub fn validate_diagnosis_code(registry: &CodeLabelRegistry, input: &str) -> RegistryResult<Code> {
    let raw = input.trim();

    if raw.chars().count() > MAX_DIAGNOSIS_RESULT_LEN {
        return Err(RegistryError::InvalidInput(format!(
            "diagnosis result exceeds maximum length of {} characters",
            MAX_DIAGNOSIS_RESULT_LEN
        )));
    }

    let code = Code::normalise(raw)?;
    registry
        .diseases()
        .canonical(code.as_str())
        .cloned()
        .ok_or_else(|| RegistryError::InvalidInput(format!("unknown diagnosis code '{code}'")))
}

/// Validates a dev-proxy path prefix such as `/api`.
///
/// The prefix must start with `/`, contain no whitespace, and must not end with `/` unless it is
/// the root prefix itself.
pub fn validate_proxy_path_prefix(prefix: &str) -> RegistryResult<()> {
    if !prefix.starts_with('/') {
        return Err(RegistryError::InvalidInput(format!(
            "proxy path prefix '{prefix}' must start with '/'"
        )));
    }

    if prefix.chars().any(char::is_whitespace) {
        return Err(RegistryError::InvalidInput(
            "proxy path prefix must not contain whitespace".into(),
        ));
    }

    if prefix.len() > 1 && prefix.ends_with('/') {
        return Err(RegistryError::InvalidInput(format!(
            "proxy path prefix '{prefix}' must not end with '/'"
        )));
    }

    Ok(())
}

/// Validates a dev-proxy target such as `http://127.0.0.1:8000`.
///
/// Only `http` and `https` targets are accepted. The authority must be non-empty, contain no
/// whitespace, and carry a numeric port when one is given.
pub fn validate_proxy_target(target: &str) -> RegistryResult<()> {
    let Some(rest) = target
        .strip_prefix("http://")
        .or_else(|| target.strip_prefix("https://"))
    else {
        return Err(RegistryError::InvalidInput(format!(
            "proxy target '{target}' must start with http:// or https://"
        )));
    };

    let authority = rest.split('/').next().unwrap_or_default();
    if authority.is_empty() {
        return Err(RegistryError::InvalidInput(format!(
            "proxy target '{target}' has no host"
        )));
    }

    if authority.chars().any(char::is_whitespace) {
        return Err(RegistryError::InvalidInput(
            "proxy target must not contain whitespace".into(),
        ));
    }

    // Bracketed IPv6 hosts without a port end in ']'.
    if !authority.ends_with(']') {
        if let Some((host, port)) = authority.rsplit_once(':') {
            if host.is_empty() {
                return Err(RegistryError::InvalidInput(format!(
                    "proxy target '{target}' has no host"
                )));
            }
            if port.parse::<u16>().is_err() {
                return Err(RegistryError::InvalidInput(format!(
                    "proxy target '{target}' has an invalid port"
                )));
            }
        }
    }

    Ok(())
}
