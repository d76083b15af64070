//! JSON Lines decoding for card dumps and the request log.
//!
//! Dumps are decoded line by line and bad lines are set aside rather than
//! failing the whole file. Only the first few rejections keep their reason.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{CardexError, Result};

pub const REJECTED_SAMPLE_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedLine {
    /// 1-based.
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct DecodedLines<T> {
    pub items: Vec<T>,
    pub skipped_lines: usize,
    /// The first [`REJECTED_SAMPLE_LIMIT`] rejected lines.
    pub rejected: Vec<RejectedLine>,
}

impl<T> Default for DecodedLines<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped_lines: 0,
            rejected: Vec::new(),
        }
    }
}

/// Decodes each non-blank line as one `T`. Surrounding whitespace (including a
/// CRLF carriage return) is ignored.
pub fn decode_lines<T: DeserializeOwned>(raw: &str) -> DecodedLines<T> {
    raw.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .fold(DecodedLines::default(), |mut decoded, (line, text)| {
            match serde_json::from_str::<T>(text) {
                Ok(item) => decoded.items.push(item),
                Err(err) => {
                    decoded.skipped_lines += 1;
                    if decoded.rejected.len() < REJECTED_SAMPLE_LIMIT {
                        decoded.rejected.push(RejectedLine {
                            line,
                            reason: err.to_string(),
                        });
                    }
                }
            }
            decoded
        })
}

impl<T> DecodedLines<T> {
    /// A source with lines but no decodable item is rejected as a whole.
    pub fn ensure_any_decoded(self, source: &str) -> Result<Self> {
        if !self.items.is_empty() || self.skipped_lines == 0 {
            return Ok(self);
        }
        let first = self
            .rejected
            .first()
            .map(|rejected| format!(" (line {}: {})", rejected.line, rejected.reason))
            .unwrap_or_default();
        Err(CardexError::Validation(format!(
            "nothing decoded from {source}: {} invalid lines{first}",
            self.skipped_lines
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CardRecord;

    #[test]
    fn bad_lines_are_counted_with_their_line_numbers() {
        let raw = "{\"id\":\"1\",\"name\":\"Opt\"}\r\n\nnot json\n{\"id\":\"2\"}\n";
        let decoded = decode_lines::<CardRecord>(raw);
        assert_eq!(decoded.items.len(), 1);
        assert_eq!(decoded.skipped_lines, 2);
        let lines = decoded.rejected.iter().map(|r| r.line).collect::<Vec<_>>();
        assert_eq!(lines, vec![3, 4]);
        assert!(decoded.ensure_any_decoded("cards.jsonl").is_ok());
    }

    #[test]
    fn rejection_sample_is_capped() {
        let raw = "x\n".repeat(REJECTED_SAMPLE_LIMIT + 3);
        let decoded = decode_lines::<CardRecord>(&raw);
        assert_eq!(decoded.skipped_lines, REJECTED_SAMPLE_LIMIT + 3);
        assert_eq!(decoded.rejected.len(), REJECTED_SAMPLE_LIMIT);
    }

    #[test]
    fn source_without_any_card_is_an_error() {
        let err = decode_lines::<CardRecord>("x\ny\n")
            .ensure_any_decoded("cards.jsonl")
            .expect_err("all invalid");
        let message = err.to_string();
        assert!(message.contains("cards.jsonl"));
        assert!(message.contains("2 invalid lines (line 1:"));
    }

    #[test]
    fn blank_source_is_not_an_error() {
        let decoded = decode_lines::<CardRecord>("\n  \n")
            .ensure_any_decoded("cards.jsonl")
            .expect("blank ok");
        assert!(decoded.items.is_empty());
        assert_eq!(decoded.skipped_lines, 0);
    }
}
