//! Constants used throughout the derm core crate.
//!
//! Storage widths mirror the columns the backend persists codes into, and the proxy defaults
//! mirror the development server setup.

/// Location code used when an examination is recorded without one.
pub const DEFAULT_EXAMINATION_LOCATION: &str = "CH";

/// Width of the examination location column.
pub const MAX_LOCATION_CODE_LEN: usize = 2;

/// Width of the diagnosis result column.
pub const MAX_DIAGNOSIS_RESULT_LEN: usize = 50;

/// Request path prefix forwarded to the backend during development.
pub const DEFAULT_PROXY_PATH_PREFIX: &str = "/api";

/// Backend address requests are forwarded to during development.
pub const DEFAULT_PROXY_TARGET: &str = "http://127.0.0.1:8000";
