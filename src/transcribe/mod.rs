pub mod whisper_cli;

use async_trait::async_trait;
use std::path::Path;

use crate::config::Language;
use crate::error::{Result, SublateError};

/// One chunk-local timed unit of transcribed text. Timestamps are seconds
/// relative to the start of the chunk the fragment came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptFragment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl TranscriptFragment {
    /// Validates timing at the boundary; malformed fragments are rejected
    /// here instead of propagating into the timeline.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() || start < 0.0 || start >= end {
            return Err(SublateError::InvalidInput(format!(
                "fragment times {start}..{end} are not a valid range"
            )));
        }
        Ok(Self {
            start,
            end,
            text: text.into(),
        })
    }
}

/// Turns one audio chunk into an ordered list of chunk-local fragments.
/// A `Language::Auto` hint requests source-language detection.
#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    async fn transcribe(
        &self,
        audio: &Path,
        language_hint: Language,
    ) -> Result<Vec<TranscriptFragment>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordered_fragment() {
        let fragment = TranscriptFragment::new(1.5, 3.0, "hello").unwrap();
        assert_eq!(fragment.start, 1.5);
        assert_eq!(fragment.end, 3.0);
        assert_eq!(fragment.text, "hello");
    }

    #[test]
    fn rejects_empty_or_inverted_range() {
        assert!(matches!(
            TranscriptFragment::new(2.0, 2.0, "x"),
            Err(SublateError::InvalidInput(_))
        ));
        assert!(matches!(
            TranscriptFragment::new(3.0, 2.0, "x"),
            Err(SublateError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_negative_and_non_finite_times() {
        assert!(TranscriptFragment::new(-0.5, 2.0, "x").is_err());
        assert!(TranscriptFragment::new(f64::NAN, 2.0, "x").is_err());
        assert!(TranscriptFragment::new(0.0, f64::INFINITY, "x").is_err());
    }
}
