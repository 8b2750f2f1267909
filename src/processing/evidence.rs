//! Evidence snippets: short windows of source text around a matched term

use serde::{Deserialize, Serialize};

/// Character window taken around the first occurrence of a term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnippetWindow {
    pub before: usize,
    pub after: usize,
    /// Snippets must be strictly longer than this many characters.
    pub min_chars: usize,
}

impl SnippetWindow {
    pub const fn new(before: usize, after: usize, min_chars: usize) -> Self {
        Self {
            before,
            after,
            min_chars,
        }
    }

    /// Cut the window around the first occurrence of `needle` out of the
    /// folded text. `needle` is expected lower-cased; offsets are counted
    /// in characters of the original source.
    pub fn extract(&self, text: &FoldedText<'_>, needle: &str) -> Option<String> {
        if needle.is_empty() {
            return None;
        }

        let idx = text.find(needle)?;
        let start = idx.saturating_sub(self.before);
        let end = text.source_len.min(idx + self.after);
        if end <= start {
            return None;
        }

        let window: String = text.source.chars().skip(start).take(end - start).collect();
        let snippet = window.trim();

        if snippet.chars().count() > self.min_chars {
            Some(wrap_ellipsis(snippet))
        } else {
            None
        }
    }
}

/// Lower-cased view of a source text that remembers where each lower-cased
/// character came from, so hits map back to source character offsets even
/// when lower-casing changes the length (`İ` lower-cases to two chars).
pub struct FoldedText<'a> {
    source: &'a str,
    source_len: usize,
    lowered: String,
    /// `(byte offset in lowered, char index in source)`, ascending
    origins: Vec<(usize, usize)>,
}

impl<'a> FoldedText<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut lowered = String::with_capacity(source.len());
        let mut origins = Vec::with_capacity(source.len());
        let mut source_len = 0;

        for (char_idx, c) in source.chars().enumerate() {
            for lower in c.to_lowercase() {
                origins.push((lowered.len(), char_idx));
                lowered.push(lower);
            }
            source_len = char_idx + 1;
        }

        Self {
            source,
            source_len,
            lowered,
            origins,
        }
    }

    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    /// Source char index of the first occurrence of `needle`
    pub fn find(&self, needle: &str) -> Option<usize> {
        let byte_idx = self.lowered.find(needle)?;
        let pos = self
            .origins
            .partition_point(|&(offset, _)| offset <= byte_idx)
            .checked_sub(1)?;
        Some(self.origins[pos].1)
    }
}

pub fn wrap_ellipsis(snippet: &str) -> String {
    format!("...{}...", snippet)
}
