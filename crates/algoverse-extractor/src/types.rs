//! Result and span types for extraction

use algoverse_domain::Artifact;
use std::fmt;
use std::ops::Range;

/// The three tag families a model response may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// `<explanation>`: prose about the generated page
    Explanation,
    /// `<dependencies>` or `<dependencies-file>`: npm packages to install
    Dependencies,
    /// `<code-file>`: the generated source file
    CodeFile,
}

impl TagKind {
    /// All families, in the order the scanner tries them
    pub const ALL: [TagKind; 3] = [TagKind::CodeFile, TagKind::Explanation, TagKind::Dependencies];

    /// Canonical (lowercase) tag name
    pub fn name(&self) -> &'static str {
        match self {
            TagKind::Explanation => "explanation",
            TagKind::Dependencies => "dependencies",
            TagKind::CodeFile => "code-file",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            TagKind::Explanation => 0,
            TagKind::Dependencies => 1,
            TagKind::CodeFile => 2,
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A matched `<tag ...>...</tag>` region, as byte ranges into the scanned text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpan {
    /// Tag family
    pub kind: TagKind,

    /// Whole span, opening tag through closing tag
    pub outer: Range<usize>,

    /// Content between the tags
    pub inner: Range<usize>,

    /// Attribute text of the opening tag (between the name and `>`)
    pub attrs: Range<usize>,
}

impl TagSpan {
    /// Content between the tags
    pub fn inner_text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.inner.clone()]
    }

    /// Look up an attribute of the opening tag (case-insensitive key)
    pub fn attribute<'a>(&self, text: &'a str, key: &str) -> Option<&'a str> {
        find_attribute(&text[self.attrs.clone()], key)
    }
}

/// Non-fatal anomalies noticed while extracting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionWarning {
    /// Raw response exceeded the configured size and was cut
    ResponseTruncated {
        /// Configured limit in bytes
        limit: usize,
    },

    /// No `code-file` section was found
    MissingCodeFile,

    /// The `code-file` section exists but holds only whitespace
    EmptyCodeFile,

    /// An opening tag has no matching closing tag
    UnterminatedTag {
        /// Tag family
        tag: TagKind,
        /// Byte offset of the opening tag
        offset: usize,
    },

    /// Additional `code-file` sections after the first were ignored
    ExtraCodeFiles {
        /// Number of ignored sections
        ignored: usize,
    },

    /// The cleaned response was used as the artifact
    FellBackToCleanedResponse,
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::ResponseTruncated { limit } => {
                write!(f, "response truncated to {} bytes", limit)
            }
            ExtractionWarning::MissingCodeFile => write!(f, "no <code-file> section found"),
            ExtractionWarning::EmptyCodeFile => write!(f, "<code-file> section is empty"),
            ExtractionWarning::UnterminatedTag { tag, offset } => {
                write!(f, "unterminated <{}> tag at byte {}", tag, offset)
            }
            ExtractionWarning::ExtraCodeFiles { ignored } => {
                write!(f, "ignored {} additional <code-file> section(s)", ignored)
            }
            ExtractionWarning::FellBackToCleanedResponse => {
                write!(f, "using cleaned response as artifact")
            }
        }
    }
}

/// Result of extracting an artifact from a model response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Sanitized source text (may be empty)
    pub artifact_text: String,

    /// `<topic>.<extension>`
    pub filename: String,

    /// `name` attribute of the `code-file` tag, if the model supplied one
    pub declared_name: Option<String>,

    /// Trimmed content of the first `explanation` section
    pub explanation: Option<String>,

    /// Packages listed in the first dependencies section
    pub dependencies: Vec<String>,

    /// Anomalies absorbed during extraction
    pub warnings: Vec<ExtractionWarning>,
}

impl ExtractionResult {
    /// Package the text and filename for a sink
    pub fn artifact(&self) -> Artifact {
        Artifact::new(self.filename.clone(), self.artifact_text.clone())
    }

    /// Whether extraction produced no source text
    pub fn is_empty(&self) -> bool {
        self.artifact_text.is_empty()
    }

    /// Warnings rendered as strings
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

/// Parse `key="value"`, `key='value'` or `key=value` pairs and return the
/// first value for `key`
fn find_attribute<'a>(attrs: &'a str, key: &str) -> Option<&'a str> {
    let bytes = attrs.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let name_start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'=' {
            i += 1;
        }
        let name = &attrs[name_start..i];
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'=' {
            // valueless attribute
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = match bytes.get(i) {
            Some(&q) if q == b'"' || q == b'\'' => {
                let start = i + 1;
                let end = attrs[start..]
                    .find(q as char)
                    .map(|rel| start + rel)
                    .unwrap_or(bytes.len());
                i = (end + 1).min(bytes.len());
                &attrs[start..end]
            }
            _ => {
                let start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                &attrs[start..i]
            }
        };

        if name.eq_ignore_ascii_case(key) {
            return Some(value);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_attribute_quoted() {
        assert_eq!(find_attribute(r#" name="x.jsx""#, "name"), Some("x.jsx"));
        assert_eq!(find_attribute(" name='y.jsx'", "NAME"), Some("y.jsx"));
        assert_eq!(find_attribute(r#" lang="js" name = "z.jsx" "#, "name"), Some("z.jsx"));
    }

    #[test]
    fn test_find_attribute_bare_and_missing() {
        assert_eq!(find_attribute(" name=a.jsx lang=js", "name"), Some("a.jsx"));
        assert_eq!(find_attribute(" hidden name=a.jsx", "name"), Some("a.jsx"));
        assert_eq!(find_attribute(" lang=js", "name"), None);
        assert_eq!(find_attribute("", "name"), None);
    }

    #[test]
    fn test_find_attribute_unclosed_quote() {
        assert_eq!(find_attribute(r#" name="x.jsx"#, "name"), Some("x.jsx"));
    }

    #[test]
    fn test_warning_messages() {
        let warning = ExtractionWarning::UnterminatedTag {
            tag: TagKind::CodeFile,
            offset: 12,
        };
        assert_eq!(warning.to_string(), "unterminated <code-file> tag at byte 12");
        assert_eq!(
            ExtractionWarning::ExtraCodeFiles { ignored: 2 }.to_string(),
            "ignored 2 additional <code-file> section(s)"
        );
    }

    #[test]
    fn test_result_artifact() {
        let result = ExtractionResult {
            artifact_text: "export default 1;".to_string(),
            filename: "One.jsx".to_string(),
            declared_name: None,
            explanation: None,
            dependencies: Vec::new(),
            warnings: vec![ExtractionWarning::MissingCodeFile],
        };

        let artifact = result.artifact();
        assert_eq!(artifact.filename, "One.jsx");
        assert_eq!(artifact.text, "export default 1;");
        assert!(!result.is_empty());
        assert_eq!(result.warning_messages(), vec!["no <code-file> section found"]);
    }
}
