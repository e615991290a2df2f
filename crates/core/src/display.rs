//! `"<label> (<CODE>)"` display strings.
//!
//! The backend stores model results in this form, so labels shown to clinicians always carry
//! the code they were derived from.

use derm_types::Code;

/// Formats a label followed by its code in parentheses.
pub fn format_with_code(label: &str, code: &str) -> String {
    format!("{label} ({code})")
}

/// Extracts the trailing parenthesised code from a display string.
///
/// Returns `None` when the text does not end with `(...)` or the bracketed text is not a valid
/// [`Code`].
pub fn parse_code_suffix(text: &str) -> Option<Code> {
    let inner = text.trim_end().strip_suffix(')')?;
    let (_, code) = inner.rsplit_once('(')?;
    Code::parse(code.trim()).ok()
}
