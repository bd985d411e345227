//! Splitting of large text into bounded segments.
//!
//! Some renderers silently drop a single very long text node, so bodies are
//! displayed as a sequence of segments instead. Splitting is lossless: the
//! segments concatenate back to the input, and never split a char.

use crate::constants::LARGE_TEXT_ERROR;
use crate::error::InspectorError;

/// Iterator over consecutive segments of at most `size` chars
#[derive(Clone, Debug)]
pub struct Chunks<'a> {
    rest: &'a str,
    size: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let end = self
            .rest
            .char_indices()
            .nth(self.size)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        Some(head)
    }
}

/// Split `text` into segments of at most `size` chars.
///
/// Empty text yields no segments. A zero size cannot make progress on
/// non-empty text and is rejected.
pub fn chunks(text: &str, size: usize) -> Result<Chunks<'_>, InspectorError> {
    if size == 0 && !text.is_empty() {
        return Err(InspectorError::ChunkBound {
            len: text.chars().count(),
            size,
        });
    }
    Ok(Chunks { rest: text, size })
}

/// Display-ready body text: either segments or the visible error marker
#[derive(Clone, Debug)]
pub enum LargeText<'a> {
    Segments(Chunks<'a>),
    RenderError,
}

impl<'a> LargeText<'a> {
    pub fn new(text: &'a str, size: usize) -> Self {
        match chunks(text, size) {
            Ok(segments) => LargeText::Segments(segments),
            Err(err) => {
                tracing::warn!(error = %err, "Could not split text for display");
                LargeText::RenderError
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LargeText::RenderError)
    }

    /// Segments to render, in order; the error marker when splitting failed
    pub fn segments(&self) -> Vec<&'a str> {
        match self {
            LargeText::Segments(chunks) => chunks.clone().collect(),
            LargeText::RenderError => vec![LARGE_TEXT_ERROR],
        }
    }
}
