//! Topic module - the validated name of the algorithm a page is generated for
//!
//! Topics arrive from HTTP callers and end up inside a filename, so they are
//! treated as tainted input. Only ASCII letters, digits, `_` and `-` survive.

use std::fmt;

/// Maximum length of a topic, in characters
pub const MAX_TOPIC_LEN: usize = 64;

/// Reasons a topic name cannot be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicError {
    /// Nothing left after trimming (or sanitizing)
    Empty,

    /// Longer than [`MAX_TOPIC_LEN`]
    TooLong(usize),

    /// Contains a character outside `[A-Za-z0-9_-]`
    InvalidChar(char),
}

impl fmt::Display for TopicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicError::Empty => write!(f, "topic name is empty"),
            TopicError::TooLong(len) => write!(
                f,
                "topic name is {} characters long (max: {})",
                len, MAX_TOPIC_LEN
            ),
            TopicError::InvalidChar(c) => {
                write!(f, "topic name contains disallowed character {:?}", c)
            }
        }
    }
}

impl std::error::Error for TopicError {}

/// A filename-safe topic name
///
/// Construct with [`Topic::parse`] (strict) or [`Topic::sanitize`] (lenient).
///
/// # Examples
///
/// ```
/// use algoverse_domain::Topic;
///
/// let topic = Topic::parse("BinarySearch").unwrap();
/// assert_eq!(topic.as_str(), "BinarySearch");
///
/// assert!(Topic::parse("../etc").is_err());
/// assert_eq!(Topic::sanitize("../etc").unwrap().as_str(), "etc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    /// Validate a topic name, rejecting anything that is not already safe
    ///
    /// Surrounding whitespace is trimmed first.
    ///
    /// # Errors
    /// Returns error if the name is empty, too long, or contains a
    /// disallowed character
    pub fn parse(value: &str) -> Result<Self, TopicError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(TopicError::Empty);
        }

        if let Some(c) = value.chars().find(|c| !is_allowed(*c)) {
            return Err(TopicError::InvalidChar(c));
        }

        let len = value.chars().count();
        if len > MAX_TOPIC_LEN {
            return Err(TopicError::TooLong(len));
        }

        Ok(Self(value.to_string()))
    }

    /// Coerce an arbitrary name into a safe topic
    ///
    /// Every disallowed character becomes `_`, runs of `_` collapse to one,
    /// leading and trailing `_` are dropped and the result is cut to
    /// [`MAX_TOPIC_LEN`] characters.
    ///
    /// # Errors
    /// Returns [`TopicError::Empty`] if nothing usable remains
    pub fn sanitize(value: &str) -> Result<Self, TopicError> {
        let mut out = String::with_capacity(value.len());
        for c in value.trim().chars() {
            let c = if is_allowed(c) { c } else { '_' };
            if c == '_' && out.ends_with('_') {
                continue;
            }
            out.push(c);
        }

        let trimmed: String = out
            .trim_matches('_')
            .chars()
            .take(MAX_TOPIC_LEN)
            .collect();
        let trimmed = trimmed.trim_end_matches('_');

        if trimmed.is_empty() {
            return Err(TopicError::Empty);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Get topic as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the artifact filename: `<topic>.<extension>`
    ///
    /// A leading dot on `extension` is ignored, an empty extension yields the
    /// bare topic.
    pub fn filename(&self, extension: &str) -> String {
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() {
            self.0.clone()
        } else {
            format!("{}.{}", self.0, extension)
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}
