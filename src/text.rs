//! Text normalization with email/URL preservation

use crate::error::{Result, ResumeScorerError};
use regex::Regex;

/// Canonicalized resume text.
///
/// Constructed only by [`TextNormalizer::normalize`]: lowercased except for
/// email addresses and URLs (kept verbatim), whitespace runs collapsed to
/// single spaces, trimmed, and at least the configured minimum length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Truncate to a character-boundary-safe prefix of at most `max_chars`.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub struct TextNormalizer {
    email_regex: Regex,
    url_regex: Regex,
    whitespace_regex: Regex,
    min_length: usize,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(crate::config::TextConfig::default().min_length)
    }
}

impl TextNormalizer {
    pub fn new(min_length: usize) -> Self {
        let email_regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
            .expect("invalid email regex");
        let url_regex = Regex::new(r"https?://[^\s]+").expect("invalid URL regex");
        let whitespace_regex = Regex::new(r"\s+").expect("invalid whitespace regex");

        Self {
            email_regex,
            url_regex,
            whitespace_regex,
            min_length,
        }
    }

    /// Normalize raw resume text.
    ///
    /// Emails and URLs are substituted with reserved placeholder tokens
    /// (left to right, one per occurrence), the remainder is lowercased and
    /// whitespace-collapsed, then the original substrings are restored
    /// verbatim. Fails with `TextTooShort` when the result is under the
    /// minimum viable length.
    pub fn normalize(&self, raw: &str) -> Result<NormalizedText> {
        let preserved = self.find_preserved_spans(raw);

        // Substitute each preserved span with "\0<index>\0". NUL never occurs
        // in extracted document text, and the token contains no uppercase or
        // whitespace, so it survives the normalization passes untouched.
        let mut substituted = String::with_capacity(raw.len());
        let mut cursor = 0;
        for (i, span) in preserved.iter().enumerate() {
            substituted.push_str(&raw[cursor..span.start]);
            substituted.push('\0');
            substituted.push_str(&i.to_string());
            substituted.push('\0');
            cursor = span.end;
        }
        substituted.push_str(&raw[cursor..]);

        let lowered = substituted.to_lowercase();
        let collapsed = self.whitespace_regex.replace_all(&lowered, " ");

        let mut restored = collapsed.into_owned();
        for (i, span) in preserved.iter().enumerate() {
            let token = format!("\0{}\0", i);
            if let Some(pos) = restored.find(&token) {
                restored.replace_range(pos..pos + token.len(), &raw[span.start..span.end]);
            }
        }

        let trimmed = restored.trim().to_string();
        let length = trimmed.chars().count();
        if length < self.min_length {
            return Err(ResumeScorerError::TextTooShort {
                got: length,
                minimum: self.min_length,
            });
        }

        Ok(NormalizedText(trimmed))
    }

    /// All email/URL spans in order of occurrence, overlaps resolved in
    /// favor of the earlier (then longer) match.
    fn find_preserved_spans(&self, text: &str) -> Vec<std::ops::Range<usize>> {
        let mut spans: Vec<std::ops::Range<usize>> = self
            .email_regex
            .find_iter(text)
            .chain(self.url_regex.find_iter(text))
            .map(|m| m.range())
            .collect();
        spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut kept: Vec<std::ops::Range<usize>> = Vec::with_capacity(spans.len());
        for span in spans {
            if kept.last().map_or(true, |prev| span.start >= prev.end) {
                kept.push(span);
            }
        }
        kept
    }
}
