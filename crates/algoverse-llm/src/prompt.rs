//! Prompt template for teaching-page generation
//!
//! The template asks for three tagged sections, which is the contract the
//! extractor parses:
//!
//! - `<code-file name="{algorithm}.jsx">` the React component
//! - `<explanation>` a short summary of the page
//! - `<dependencies>` npm packages, ideally none

use crate::LlmError;
use algoverse_domain::Topic;
use std::path::Path;

/// Placeholder substituted with the topic name
pub const PLACEHOLDER: &str = "{algorithm}";

/// Renders the generation prompt for a topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Use a custom template; it must mention [`PLACEHOLDER`]
    pub fn new(template: impl Into<String>) -> Result<Self, LlmError> {
        let template = template.into();
        if !template.contains(PLACEHOLDER) {
            return Err(LlmError::Config(format!(
                "prompt template does not contain {}",
                PLACEHOLDER
            )));
        }
        Ok(Self { template })
    }

    /// Load a custom template from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LlmError> {
        let path = path.as_ref();
        let template = std::fs::read_to_string(path).map_err(|e| {
            LlmError::Config(format!("Failed to read prompt {}: {}", path.display(), e))
        })?;
        Self::new(template)
    }

    /// Build the prompt for `topic`
    pub fn render(&self, topic: &Topic) -> String {
        self.template.replace(PLACEHOLDER, topic.as_str())
    }

    /// The raw template text
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: TEACHING_PAGE_TEMPLATE.to_string(),
        }
    }
}

const TEACHING_PAGE_TEMPLATE: &str = r#"You are AlgoVerse, an educator who builds single-page React applications that teach data structures and algorithms.

Build a complete learning page for: {algorithm}.

## What the page must contain
- A header titled "Learn {algorithm}" with a one-paragraph overview that fades in.
- Narrated, step-by-step explanation sections that reveal one at a time, like a video walkthrough: theory, the steps, time and space complexity, and real-world uses.
- Pseudocode in a <pre> block whose lines highlight in sync with the animation.
- Interactive visualizations of the algorithm's mechanics driven by CSS transitions (Tailwind classes such as transition-all duration-300, or inline transition styles). Green marks success or matches, red marks failure or mismatches.
- Controls: play/pause, step forward, step back, reset, and a speed slider built from <input type="range">.
- Inputs so the learner can run the algorithm on their own data, validated with inline error messages or alert().
- A footer with tips and common pitfalls, as static text.

## Code rules
- Plain JavaScript with JSX in one file; no TypeScript.
- React hooks for state (useState, useReducer, useMemo where useful).
- Tailwind classes applied directly to native elements. Do not import UI kits, shadcn/ui or anything under '@/components'.
- No external libraries except lucide-react for icons, and only if it clearly helps.
- ARIA labels on every control and keyboard support for stepping.
- No comments anywhere in the code.
- Fully functional: every import present, no placeholders, edge cases handled.
- The component is the default export and runs unchanged in a Create React App project.

## Response format
Reply with exactly these tagged sections and nothing else:

<code-file name="{algorithm}.jsx">
the complete component source
</code-file>

<explanation>
a short, non-code summary of the page and how to run it
</explanation>

<dependencies>
one npm package per line, or "none"
</dependencies>

Generate only one code file."#;
