//! Suggestion text segmentation.
//!
//! Remediation suggestions interleave prose with fenced code blocks. The
//! view renders each segment with its own styling.

use serde::Serialize;

/// Fence marker delimiting code blocks.
pub const FENCE: &str = "```";

/// A run of suggestion text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Segment {
    /// Plain text.
    Prose(String),
    /// A fenced code block, fence markers included.
    Code(String),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Prose(text) | Segment::Code(text) => text,
        }
    }

    /// Language tag and body of a code segment, with fences stripped.
    ///
    /// A block opening with ```` ```html\n ```` yields `Some("html")`.
    /// Returns `None` for prose.
    pub fn code_parts(&self) -> Option<(Option<&str>, &str)> {
        let Segment::Code(text) = self else {
            return None;
        };

        let inner = text
            .strip_prefix(FENCE)
            .and_then(|t| t.strip_suffix(FENCE))
            .unwrap_or(text);

        let tag_len = inner
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(inner.len());

        if tag_len > 0 {
            if let Some(body) = inner[tag_len..].strip_prefix('\n') {
                return Some((Some(&inner[..tag_len]), body));
            }
        }

        Some((None, inner))
    }
}

/// Split suggestion text into alternating prose and code segments.
///
/// Code segments keep their surrounding fences. Empty prose between
/// fences is omitted. With an odd number of fences, the tail after the
/// last opening fence is unterminated and is returned as prose, fence
/// included.
pub fn split_suggestion(text: &str) -> Vec<Segment> {
    let parts: Vec<&str> = text.split(FENCE).collect();
    let unterminated = parts.len() % 2 == 0;
    let last = parts.len() - 1;

    let mut segments = Vec::with_capacity(parts.len());
    for (index, part) in parts.iter().enumerate() {
        if index % 2 == 0 {
            if !part.is_empty() {
                segments.push(Segment::Prose(part.to_string()));
            }
        } else if unterminated && index == last {
            segments.push(Segment::Prose(format!("{FENCE}{part}")));
        } else {
            segments.push(Segment::Code(format!("{FENCE}{part}{FENCE}")));
        }
    }

    segments
}
