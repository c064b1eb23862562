//! Directive block extraction.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::directive::Directive;
use crate::domain::errors::DirectiveError;

/// Default opening marker.
pub const DEFAULT_START_MARKER: &str = "UPDATE_START";
/// Default closing marker.
pub const DEFAULT_END_MARKER: &str = "UPDATE_END";

static STANDARD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    block_pattern(DEFAULT_START_MARKER, DEFAULT_END_MARKER).expect("directive block regex")
});

fn block_pattern(start: &str, end: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?s){}\s*(\{{.*?\}})\s*{}",
        regex::escape(start),
        regex::escape(end)
    ))
}

/// What the extractor found in one text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Input with every block removed, trimmed.
    pub cleaned_text: String,
    /// Blocks that parsed to objects, in order.
    pub directives: Vec<Directive>,
    /// One entry per block that failed to parse.
    pub errors: Vec<DirectiveError>,
}

/// Finds `START {...} END` blocks in narrator text.
#[derive(Debug, Clone)]
pub struct DirectiveExtractor {
    pattern: Regex,
}

impl Default for DirectiveExtractor {
    fn default() -> Self {
        Self::standard()
    }
}

impl DirectiveExtractor {
    /// Extractor for the `UPDATE_START` / `UPDATE_END` markers.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            pattern: STANDARD_PATTERN.clone(),
        }
    }

    /// Extractor for custom markers. Markers are matched literally.
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if the resulting pattern exceeds the regex
    /// size limits.
    pub fn with_markers(start: &str, end: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: block_pattern(start, end)?,
        })
    }

    /// Splits `text` into cleaned prose and parsed directives.
    ///
    /// Each block is parsed on its own; a bad block adds one error and the
    /// rest still parse.
    #[must_use]
    pub fn extract(&self, text: &str) -> Extraction {
        let mut directives = Vec::new();
        let mut errors = Vec::new();

        for captures in self.pattern.captures_iter(text) {
            let Some(payload) = captures.get(1) else {
                continue;
            };
            match parse_payload(payload.as_str()) {
                Ok(directive) => directives.push(directive),
                Err(error) => errors.push(error),
            }
        }

        let cleaned_text = self.pattern.replace_all(text, "").trim().to_owned();

        Extraction {
            cleaned_text,
            directives,
            errors,
        }
    }
}

/// Parses one block payload.
///
/// The block pattern only captures brace-delimited text, so payloads from
/// `extract` are objects or syntax errors. `NotAnObject` covers well-formed
/// JSON of another shape.
fn parse_payload(payload: &str) -> Result<Directive, DirectiveError> {
    serde_json::from_str::<Directive>(payload).map_err(|e| {
        if e.is_data() {
            DirectiveError::NotAnObject(e.to_string())
        } else {
            DirectiveError::MalformedBlock(e.to_string())
        }
    })
}
