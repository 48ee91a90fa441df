//! Section-level text operations

use crate::scanner::scan;
use crate::types::TagKind;
use algoverse_domain::Topic;

/// Remove the first `kind` section, tags included
///
/// Text without such a section comes back unchanged.
pub fn remove_section(text: &str, kind: TagKind) -> String {
    match scan(text).first(kind) {
        Some(span) => {
            let mut out = String::with_capacity(text.len() - span.outer.len());
            out.push_str(&text[..span.outer.start]);
            out.push_str(&text[span.outer.end..]);
            out
        }
        None => text.to_string(),
    }
}

/// Trimmed content of the first `code-file` section, or `None` if there is none
pub fn extract_code(text: &str) -> Option<String> {
    scan(text)
        .first(TagKind::CodeFile)
        .map(|span| span.inner_text(text).trim().to_string())
}

/// `<topic>.<extension>`; a leading dot on `extension` is ignored
pub fn derive_filename(topic: &Topic, extension: &str) -> String {
    topic.filename(extension)
}

/// Collapse every run of three or more `\n` into exactly two
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0usize;

    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(c);
            }
        } else {
            newlines = 0;
            out.push(c);
        }
    }

    out
}

/// Turn the body of a dependencies section into package names
///
/// Accepts one package per line or comma-separated lists, with optional list
/// bullets, backticks and `npm install` prefixes. `none` and `n/a` mean no
/// packages.
pub fn parse_dependencies(body: &str) -> Vec<String> {
    let mut packages = Vec::new();

    for item in body.split(['\n', ',']) {
        let mut item = item.trim();
        item = item.trim_start_matches(['-', '*', '•']).trim_start();
        item = strip_numbering(item);
        for prefix in ["npm install ", "npm i ", "yarn add "] {
            if item.get(..prefix.len()).is_some_and(|head| head.eq_ignore_ascii_case(prefix)) {
                item = &item[prefix.len()..];
            }
        }
        let item = item.trim_matches('`').trim().trim_end_matches('.');

        if item.is_empty() || is_none_marker(item) {
            continue;
        }

        // `npm install a b` lists several packages on one line
        for package in item.split_whitespace() {
            if !packages.iter().any(|p| p == package) {
                packages.push(package.to_string());
            }
        }
    }

    packages
}

fn strip_numbering(item: &str) -> &str {
    let digits = item.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && matches!(item.as_bytes().get(digits), Some(b'.') | Some(b')')) {
        item[digits + 1..].trim_start()
    } else {
        item
    }
}

fn is_none_marker(item: &str) -> bool {
    let lowered = item.to_ascii_lowercase();
    matches!(lowered.as_str(), "none" | "n/a" | "no dependencies" | "no additional dependencies")
        || lowered.starts_with("none ")
        || lowered.starts_with("none (")
}
