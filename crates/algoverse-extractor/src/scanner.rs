//! Linear-time scanner for tagged model responses
//!
//! Recognizes `<explanation>`, `<dependencies>` / `<dependencies-file>` and
//! `<code-file>` sections. Tag names match ASCII case-insensitively, opening
//! tags may carry attributes, and sections do not nest: inside a section only
//! that section's closing tag is significant.

use crate::types::{TagKind, TagSpan};
use std::ops::Range;

/// Longest opening tag (name plus attributes) the scanner will consider
const MAX_OPEN_TAG_LEN: usize = 1024;

/// Suffix accepted after `dependencies` in both opening and closing tags
const DEPENDENCIES_FILE_SUFFIX: &[u8] = b"-file";

/// Output of a scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    /// Completed spans in document order
    pub spans: Vec<TagSpan>,

    /// First unterminated opening tag per family, as `(kind, byte offset)`
    pub unterminated: Vec<(TagKind, usize)>,
}

impl ScanOutput {
    /// First span of the given family
    pub fn first(&self, kind: TagKind) -> Option<&TagSpan> {
        self.spans.iter().find(|span| span.kind == kind)
    }

    /// Number of spans of the given family
    pub fn count(&self, kind: TagKind) -> usize {
        self.spans.iter().filter(|span| span.kind == kind).count()
    }
}

#[derive(Debug, Clone)]
struct OpenTag {
    start: usize,
    end: usize,
    attrs: Range<usize>,
}

#[derive(Debug)]
enum State {
    SeekingTag,
    InExplanation(OpenTag),
    InDependencies(OpenTag),
    InCode(OpenTag),
}

impl State {
    fn entering(kind: TagKind, open: OpenTag) -> Self {
        match kind {
            TagKind::Explanation => State::InExplanation(open),
            TagKind::Dependencies => State::InDependencies(open),
            TagKind::CodeFile => State::InCode(open),
        }
    }
}

/// Scans a response for tag spans
pub struct TagScanner<'a> {
    text: &'a str,
    folded: Vec<u8>,
}

impl<'a> TagScanner<'a> {
    /// Prepare a scanner over `text`
    pub fn new(text: &'a str) -> Self {
        // ASCII folding keeps byte offsets identical to `text`
        Self {
            text,
            folded: text.as_bytes().to_ascii_lowercase(),
        }
    }

    /// The text being scanned
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Run the state machine over the whole text
    pub fn scan(&self) -> ScanOutput {
        let mut output = ScanOutput::default();
        // A family whose closing tag was searched for and not found has no
        // closing tag anywhere later either
        let mut exhausted = [false; 3];
        let mut state = State::SeekingTag;
        let mut pos = 0;

        loop {
            state = match state {
                State::SeekingTag => {
                    let Some(at) = find_byte(&self.folded, b'<', pos) else {
                        break;
                    };
                    match self.parse_open(at) {
                        Some((kind, open)) if !exhausted[kind.index()] => {
                            pos = open.end;
                            State::entering(kind, open)
                        }
                        _ => {
                            pos = at + 1;
                            State::SeekingTag
                        }
                    }
                }
                State::InExplanation(open) => {
                    self.close_span(TagKind::Explanation, open, &mut pos, &mut exhausted, &mut output)
                }
                State::InDependencies(open) => {
                    self.close_span(TagKind::Dependencies, open, &mut pos, &mut exhausted, &mut output)
                }
                State::InCode(open) => {
                    self.close_span(TagKind::CodeFile, open, &mut pos, &mut exhausted, &mut output)
                }
            };
        }

        output
    }

    fn close_span(
        &self,
        kind: TagKind,
        open: OpenTag,
        pos: &mut usize,
        exhausted: &mut [bool; 3],
        output: &mut ScanOutput,
    ) -> State {
        match self.find_close(kind, *pos) {
            Some(close) => {
                output.spans.push(TagSpan {
                    kind,
                    outer: open.start..close.end,
                    inner: open.end..close.start,
                    attrs: open.attrs,
                });
                *pos = close.end;
            }
            None => {
                exhausted[kind.index()] = true;
                output.unterminated.push((kind, open.start));
                // the opening tag becomes plain text
                *pos = open.end;
            }
        }
        State::SeekingTag
    }

    /// Try to read an opening tag starting at the `<` at `at`
    fn parse_open(&self, at: usize) -> Option<(TagKind, OpenTag)> {
        let bytes = &self.folded;
        let name_start = at + 1;

        for kind in TagKind::ALL {
            let name = kind.name().as_bytes();
            if !bytes[name_start..].starts_with(name) {
                continue;
            }
            let mut i = name_start + name.len();
            if kind == TagKind::Dependencies && bytes[i..].starts_with(DEPENDENCIES_FILE_SUFFIX) {
                i += DEPENDENCIES_FILE_SUFFIX.len();
            }

            match bytes.get(i) {
                Some(b'>') => {
                    return Some((
                        kind,
                        OpenTag {
                            start: at,
                            end: i + 1,
                            attrs: i..i,
                        },
                    ));
                }
                Some(b) if b.is_ascii_whitespace() => {
                    let gt = find_tag_end(bytes, i, at + MAX_OPEN_TAG_LEN)?;
                    return Some((
                        kind,
                        OpenTag {
                            start: at,
                            end: gt + 1,
                            attrs: i..gt,
                        },
                    ));
                }
                // `<code-filex>`, `<explanation/>` and friends are not tags
                _ => return None,
            }
        }

        None
    }

    /// Find the closing tag for `kind` at or after `from`
    fn find_close(&self, kind: TagKind, from: usize) -> Option<Range<usize>> {
        let bytes = &self.folded;
        let name = kind.name().as_bytes();
        let mut pos = from;

        while let Some(at) = find_byte(bytes, b'<', pos) {
            pos = at + 1;
            if bytes.get(at + 1) != Some(&b'/') || !bytes[at + 2..].starts_with(name) {
                continue;
            }
            let mut i = at + 2 + name.len();
            if kind == TagKind::Dependencies && bytes[i..].starts_with(DEPENDENCIES_FILE_SUFFIX) {
                i += DEPENDENCIES_FILE_SUFFIX.len();
            }
            while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
                i += 1;
            }
            if bytes.get(i) == Some(&b'>') {
                return Some(at..i + 1);
            }
        }

        None
    }
}

/// Scan `text` for tag spans
pub fn scan(text: &str) -> ScanOutput {
    TagScanner::new(text).scan()
}

fn find_byte(bytes: &[u8], needle: u8, from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|rel| from + rel)
}

/// Index of the `>` closing an opening tag, skipping quoted attribute values.
/// Gives up at a bare `<` or at `limit`.
fn find_tag_end(bytes: &[u8], from: usize, limit: usize) -> Option<usize> {
    let end = limit.min(bytes.len());
    let mut quote: Option<u8> = None;

    for (i, &b) in bytes.iter().enumerate().take(end).skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None if b == b'<' => return None,
            None => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inner<'a>(text: &'a str, output: &ScanOutput, kind: TagKind) -> Option<&'a str> {
        output.first(kind).map(|span| span.inner_text(text))
    }

    #[test]
    fn test_scan_all_families() {
        let text = "<explanation>why</explanation>\n<dependencies>none</dependencies>\n<code-file>code</code-file>";
        let output = scan(text);

        assert_eq!(output.spans.len(), 3);
        assert_eq!(inner(text, &output, TagKind::Explanation), Some("why"));
        assert_eq!(inner(text, &output, TagKind::Dependencies), Some("none"));
        assert_eq!(inner(text, &output, TagKind::CodeFile), Some("code"));
        assert!(output.unterminated.is_empty());
    }

    #[test]
    fn test_outer_range_covers_tags() {
        let text = "a<explanation>b</explanation>c";
        let output = scan(text);
        let span = output.first(TagKind::Explanation).unwrap();
        assert_eq!(&text[span.outer.clone()], "<explanation>b</explanation>");
    }

    #[test]
    fn test_case_insensitive() {
        for text in [
            "<CODE-FILE>x</CODE-FILE>",
            "<Code-File>x</code-file>",
            "<code-file>x</Code-FILE>",
        ] {
            let output = scan(text);
            assert_eq!(inner(text, &output, TagKind::CodeFile), Some("x"), "{}", text);
        }
    }

    #[test]
    fn test_attributes_ignored_and_readable() {
        let text = r#"<code-file name="BinarySearch.jsx" lang='jsx'>body</code-file>"#;
        let output = scan(text);
        let span = output.first(TagKind::CodeFile).unwrap();

        assert_eq!(span.inner_text(text), "body");
        assert_eq!(span.attribute(text, "name"), Some("BinarySearch.jsx"));
        assert_eq!(span.attribute(text, "lang"), Some("jsx"));
    }

    #[test]
    fn test_gt_inside_quoted_attribute() {
        let text = r#"<code-file name="a>b.jsx">body</code-file>"#;
        let output = scan(text);
        let span = output.first(TagKind::CodeFile).unwrap();
        assert_eq!(span.inner_text(text), "body");
        assert_eq!(span.attribute(text, "name"), Some("a>b.jsx"));
    }

    #[test]
    fn test_dependencies_file_variant() {
        let text = "<dependencies-file>\nlucide-react\n</dependencies-file>";
        let output = scan(text);
        assert_eq!(inner(text, &output, TagKind::Dependencies), Some("\nlucide-react\n"));

        let mixed = "<dependencies>x</dependencies-file>";
        assert_eq!(inner(mixed, &scan(mixed), TagKind::Dependencies), Some("x"));
    }

    #[test]
    fn test_similar_names_are_not_tags() {
        let text = "<code-filex>a</code-filex><explanations>b</explanations><explanation/>";
        let output = scan(text);
        assert!(output.spans.is_empty());
        assert!(output.unterminated.is_empty());
    }

    #[test]
    fn test_closing_tag_with_whitespace() {
        let text = "<code-file>x</code-file  >";
        assert_eq!(inner(text, &scan(text), TagKind::CodeFile), Some("x"));
    }

    #[test]
    fn test_multiline_content() {
        let text = "<code-file>\nline one\n\nline two\n</code-file>";
        assert_eq!(
            inner(text, &scan(text), TagKind::CodeFile),
            Some("\nline one\n\nline two\n")
        );
    }

    #[test]
    fn test_no_nesting() {
        // markup inside a section is content
        let text = "<code-file>a <explanation>b</explanation> c</code-file>";
        let output = scan(text);
        assert_eq!(output.spans.len(), 1);
        assert_eq!(
            inner(text, &output, TagKind::CodeFile),
            Some("a <explanation>b</explanation> c")
        );

        // the first closing tag ends the section
        let text = "<code-file>a<code-file>b</code-file>c</code-file>";
        let output = scan(text);
        assert_eq!(inner(text, &output, TagKind::CodeFile), Some("a<code-file>b"));
    }

    #[test]
    fn test_multiple_code_files() {
        let text = "<code-file>first</code-file><code-file>second</code-file>";
        let output = scan(text);
        assert_eq!(output.count(TagKind::CodeFile), 2);
        assert_eq!(inner(text, &output, TagKind::CodeFile), Some("first"));
    }

    #[test]
    fn test_unterminated_reported_once() {
        let text = "<code-file>a <code-file>b <explanation>c</explanation>";
        let output = scan(text);

        assert_eq!(output.unterminated, vec![(TagKind::CodeFile, 0)]);
        assert!(output.first(TagKind::CodeFile).is_none());
        assert_eq!(inner(text, &output, TagKind::Explanation), Some("c"));
    }

    #[test]
    fn test_unterminated_then_later_sections() {
        let text = "<explanation>oops <code-file>x</code-file>";
        let output = scan(text);
        assert_eq!(output.unterminated, vec![(TagKind::Explanation, 0)]);
        assert_eq!(inner(text, &output, TagKind::CodeFile), Some("x"));
    }

    #[test]
    fn test_unclosed_opening_tag() {
        let text = "<code-file name=\"x.jsx\" <code-file>y</code-file>";
        let output = scan(text);
        assert_eq!(output.count(TagKind::CodeFile), 1);
        assert_eq!(inner(text, &output, TagKind::CodeFile), Some("y"));
    }

    #[test]
    fn test_multibyte_text() {
        let text = "héllo → <code-file>ça marche ✓</code-file> fin «<»";
        let output = scan(text);
        assert_eq!(inner(text, &output, TagKind::CodeFile), Some("ça marche ✓"));
    }

    #[test]
    fn test_trailing_lt() {
        for text in ["<", "abc<", "<code-file", "<code-file ", "</", "<code-file>x</code-file"] {
            let _ = scan(text);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(scan(""), ScanOutput::default());
    }
}
