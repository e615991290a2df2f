//! Validated primitive types shared across the derm crates.
//!
//! - [`Code`]: a short uppercase mnemonic exchanged with the classification backend.
//! - [`Label`]: a non-empty, trimmed display string for a code.

use std::borrow::Borrow;

/// Maximum length of a [`Code`], in characters.
pub const MAX_CODE_LEN: usize = 8;

/// Errors that can occur when creating validated code and label types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodeError {
    /// The input code was empty
    #[error("code cannot be empty")]
    EmptyCode,
    /// The input code was longer than [`MAX_CODE_LEN`]
    #[error("code '{0}' exceeds maximum length of {max} characters", max = MAX_CODE_LEN)]
    CodeTooLong(String),
    /// The input code did not start with an uppercase ASCII letter
    #[error("code '{0}' must start with an uppercase ASCII letter")]
    InvalidCodeStart(String),
    /// The input code contained characters outside `A-Z`, `0-9` and `_`
    #[error("code '{0}' contains invalid characters (only A-Z, 0-9, '_' allowed)")]
    InvalidCodeCharacters(String),
    /// The input label was empty or contained only whitespace
    #[error("label cannot be empty")]
    EmptyLabel,
}

/// A short uppercase mnemonic identifying a disease class or anatomical location.
///
/// Codes are the wire vocabulary shared with the classification backend, so they are
/// validated strictly and never altered during construction via [`Code::parse`]:
/// - 1 to [`MAX_CODE_LEN`] characters
/// - first character `A-Z`
/// - remaining characters `A-Z`, `0-9` or `_`
///
/// Use [`Code::normalise`] for user input that may carry whitespace or lowercase letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(String);

impl Code {
    /// Parses a code that must already be in canonical form.
    ///
    /// # Errors
    ///
    /// Returns a [`CodeError`] describing the first rule the input breaks.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, CodeError> {
        let input = input.as_ref();

        let Some(first) = input.chars().next() else {
            return Err(CodeError::EmptyCode);
        };

        if !first.is_ascii_uppercase() {
            return Err(CodeError::InvalidCodeStart(input.to_owned()));
        }

        let ok = input
            .bytes()
            .all(|b| matches!(b, b'A'..=b'Z' | b'0'..=b'9' | b'_'));
        if !ok {
            return Err(CodeError::InvalidCodeCharacters(input.to_owned()));
        }

        // ASCII only from here, so bytes and characters agree.
        if input.len() > MAX_CODE_LEN {
            return Err(CodeError::CodeTooLong(input.to_owned()));
        }

        Ok(Self(input.to_owned()))
    }

    /// Trims and uppercases the input before parsing it.
    pub fn normalise(input: impl AsRef<str>) -> Result<Self, CodeError> {
        Self::parse(input.as_ref().trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters in the code.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a constructed code is never empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets `HashMap<Code, _>` be queried with a plain `&str`.
impl Borrow<str> for Code {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Code {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for Code {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Code {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Code::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A localised, human-readable display string for a [`Code`].
///
/// The input is trimmed of leading and trailing whitespace during construction and must
/// contain at least one non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    /// Creates a new `Label` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `Err(CodeError::EmptyLabel)` if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, CodeError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CodeError::EmptyLabel);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for Label {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Label {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Label::new(&s).map_err(serde::de::Error::custom)
    }
}
