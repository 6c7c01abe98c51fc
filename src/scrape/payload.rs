//! Extraction of the JSON payload embedded in the listings page.
//!
//! The listings site renders its state into a script element, one
//! `window.X = {...};` assignment per line. Where exactly the listings object
//! sits is a property of the site's template, so the lookup lives behind
//! [`PayloadExtractor`] and can be swapped without touching the pipeline.

use super::error::ScrapeError;
use super::listing::ListingsEnvelope;
use serde::Deserialize;

pub trait PayloadExtractor: Send + Sync {
    /// Returns the JSON document holding the listings, as a slice of the
    /// server-state element text.
    fn extract<'a>(&self, server_state: &'a str) -> Result<&'a str, ScrapeError>;
}

/// Takes the third line of the server state, from its first `{` up to (but not
/// including) its last character, which is the trailing `;` of the assignment.
///
/// This matches the site's current template byte for byte.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineIndexExtractor;

const PAYLOAD_LINE_INDEX: usize = 2;

impl PayloadExtractor for LineIndexExtractor {
    fn extract<'a>(&self, server_state: &'a str) -> Result<&'a str, ScrapeError> {
        let line = server_state.split('\n').nth(PAYLOAD_LINE_INDEX).ok_or_else(|| {
            ScrapeError::MissingPayload(format!(
                "server state has fewer than {} lines",
                PAYLOAD_LINE_INDEX + 1
            ))
        })?;

        let start = line.find('{').ok_or_else(|| {
            ScrapeError::MissingPayload("payload line has no JSON object".to_string())
        })?;
        let end = line.char_indices().last().map(|(i, _)| i).unwrap_or(0);
        if end <= start {
            return Err(ScrapeError::MissingPayload(
                "payload line ends before its JSON object".to_string(),
            ));
        }

        Ok(&line[start..end])
    }
}

/// Scans every balanced top-level `{...}` in the server state and returns the
/// first one that holds listings. Independent of line layout and trailing
/// characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoundaryScanExtractor;

/// Returns the end (exclusive) of the object starting at `start`, or None if
/// the braces never balance. String literals and escapes are honoured.
fn matching_brace_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

impl PayloadExtractor for BoundaryScanExtractor {
    fn extract<'a>(&self, server_state: &'a str) -> Result<&'a str, ScrapeError> {
        let mut cursor = 0;
        let mut first_error = None;

        while let Some(relative) = server_state[cursor..].find('{') {
            let start = cursor + relative;
            let end = match matching_brace_end(server_state, start) {
                Some(end) => end,
                None => break,
            };
            let candidate = &server_state[start..end];
            match serde_json::from_str::<ListingsEnvelope>(candidate) {
                Ok(_) => return Ok(candidate),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
            cursor = end;
        }

        Err(match first_error {
            Some(err) => ScrapeError::InvalidPayload(err),
            None => ScrapeError::MissingPayload(
                "no balanced JSON object in server state".to_string(),
            ),
        })
    }
}

/// Selects the extraction strategy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PayloadExtraction {
    #[default]
    LineIndex,
    BoundaryScan,
}

impl PayloadExtraction {
    pub fn extractor(self) -> Box<dyn PayloadExtractor> {
        match self {
            PayloadExtraction::LineIndex => Box::new(LineIndexExtractor),
            PayloadExtraction::BoundaryScan => Box::new(BoundaryScanExtractor),
        }
    }
}

impl std::fmt::Display for PayloadExtraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadExtraction::LineIndex => write!(f, "line-index"),
            PayloadExtraction::BoundaryScan => write!(f, "boundary-scan"),
        }
    }
}
