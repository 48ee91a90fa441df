//! Core Extractor implementation

use crate::config::{ExtractorConfig, MissingCodePolicy, TopicPolicy};
use crate::error::ExtractorError;
use crate::scanner::TagScanner;
use crate::sections::{collapse_blank_lines, derive_filename, parse_dependencies};
use crate::types::{ExtractionResult, ExtractionWarning, TagKind};
use algoverse_domain::Topic;
use std::ops::Range;
use tracing::{debug, warn};

/// Turns raw model responses into sanitized artifacts
///
/// Holds only immutable configuration, so one instance can be shared across
/// any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    /// Create a new Extractor
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Create a new Extractor, validating the configuration first
    pub fn try_new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self::new(config))
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Turn an untrusted topic name into a [`Topic`] according to the
    /// configured [`TopicPolicy`]
    pub fn resolve_topic(&self, topic_name: &str) -> Result<Topic, ExtractorError> {
        let topic = match self.config.topic_policy {
            TopicPolicy::Reject => Topic::parse(topic_name)?,
            TopicPolicy::Sanitize => Topic::sanitize(topic_name)?,
        };
        if topic.as_str() != topic_name {
            debug!("Topic {:?} resolved to '{}'", topic_name, topic);
        }
        Ok(topic)
    }

    /// `<topic>.<extension>`
    pub fn derive_filename(&self, topic: &Topic) -> String {
        derive_filename(topic, &self.config.extension)
    }

    /// Resolve the topic name, then extract
    ///
    /// Fails only when the topic name is unusable.
    pub fn extract_named(
        &self,
        raw_response: &str,
        topic_name: &str,
    ) -> Result<ExtractionResult, ExtractorError> {
        let topic = self.resolve_topic(topic_name)?;
        Ok(self.extract(raw_response, &topic))
    }

    /// Extract the artifact from a raw model response
    ///
    /// Never fails: missing or malformed sections produce an empty (or
    /// fallback) artifact plus warnings.
    pub fn extract(&self, raw_response: &str, topic: &Topic) -> ExtractionResult {
        let mut warnings = Vec::new();

        let bounded = truncate_to_boundary(raw_response, self.config.max_response_bytes);
        if bounded.len() < raw_response.len() {
            warnings.push(ExtractionWarning::ResponseTruncated {
                limit: self.config.max_response_bytes,
            });
        }

        let text = bounded.trim();
        let scanner = TagScanner::new(text);
        let scanned = scanner.scan();

        for (tag, offset) in &scanned.unterminated {
            warnings.push(ExtractionWarning::UnterminatedTag {
                tag: *tag,
                offset: *offset,
            });
        }

        let explanation_span = scanned.first(TagKind::Explanation);
        let dependencies_span = scanned.first(TagKind::Dependencies);
        let code_span = scanned.first(TagKind::CodeFile);

        let explanation = explanation_span
            .map(|span| span.inner_text(text).trim().to_string())
            .filter(|s| !s.is_empty());
        let dependencies = dependencies_span
            .map(|span| parse_dependencies(span.inner_text(text)))
            .unwrap_or_default();

        let extra_code_files = scanned.count(TagKind::CodeFile).saturating_sub(1);
        if extra_code_files > 0 {
            warnings.push(ExtractionWarning::ExtraCodeFiles {
                ignored: extra_code_files,
            });
        }

        let (code, declared_name) = match code_span {
            Some(span) => {
                let code = span.inner_text(text).trim();
                if code.is_empty() {
                    warnings.push(ExtractionWarning::EmptyCodeFile);
                }
                let declared = span
                    .attribute(text, "name")
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string);
                (code.to_string(), declared)
            }
            None => {
                warnings.push(ExtractionWarning::MissingCodeFile);
                let fallback = match self.config.missing_code {
                    MissingCodePolicy::Empty => String::new(),
                    MissingCodePolicy::CleanedResponse => {
                        warnings.push(ExtractionWarning::FellBackToCleanedResponse);
                        let removed: Vec<Range<usize>> = [explanation_span, dependencies_span]
                            .into_iter()
                            .flatten()
                            .map(|span| span.outer.clone())
                            .collect();
                        remove_ranges(text, removed).trim().to_string()
                    }
                };
                (fallback, None)
            }
        };

        let artifact_text = collapse_blank_lines(&code);
        let filename = self.derive_filename(topic);

        if let Some(declared) = &declared_name {
            if declared != &filename {
                debug!("Model named the file '{}', writing '{}'", declared, filename);
            }
        }

        for warning in &warnings {
            warn!("Extraction for '{}': {}", topic, warning);
        }

        debug!(
            "Extracted {} bytes for '{}' from a {} byte response ({} sections)",
            artifact_text.len(),
            topic,
            raw_response.len(),
            scanned.spans.len()
        );

        ExtractionResult {
            artifact_text,
            filename,
            declared_name,
            explanation,
            dependencies,
            warnings,
        }
    }
}

/// Longest prefix of `text` that fits in `limit` bytes without splitting a
/// character
fn truncate_to_boundary(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Copy `text` without the given non-overlapping ranges
fn remove_ranges(text: &str, mut ranges: Vec<Range<usize>>) -> String {
    ranges.sort_by_key(|range| range.start);
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for range in ranges {
        out.push_str(&text[pos..range.start]);
        pos = range.end;
    }
    out.push_str(&text[pos..]);
    out
}
