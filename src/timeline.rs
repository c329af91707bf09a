use crate::config::Language;
use crate::error::Result;
use crate::transcribe::TranscriptFragment;
use crate::translate::TranslationClient;

/// A fragment placed on the asset's absolute timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// One transcribed chunk ready for reconciliation: its re-probed artifact
/// duration and its chunk-local fragments, in transcription order.
#[derive(Debug, Clone)]
pub struct ChunkTranscript {
    pub measured_length: f64,
    pub fragments: Vec<TranscriptFragment>,
}

/// Folds chunk transcripts into one global segment list. The running offset
/// starts at zero and advances by each chunk's *measured* length, so the
/// timeline stays aligned even when the split tool trims chunk boundaries
/// imprecisely. Chunks must already be in ascending index order; fragments
/// are appended as-is and never re-sorted.
pub fn reconcile(chunks: &[ChunkTranscript]) -> Vec<GlobalSegment> {
    let (_, segments) = chunks.iter().fold(
        (0.0_f64, Vec::new()),
        |(offset, mut out), chunk| {
            for fragment in &chunk.fragments {
                out.push(GlobalSegment {
                    start: fragment.start + offset,
                    end: fragment.end + offset,
                    text: fragment.text.clone(),
                });
            }
            (offset + chunk.measured_length, out)
        },
    );
    segments
}

/// Replaces each fragment's text with its translation. Timestamps pass
/// through untouched; only the text is substituted.
pub async fn translate_fragments(
    fragments: Vec<TranscriptFragment>,
    client: &dyn TranslationClient,
    target: Language,
) -> Result<Vec<TranscriptFragment>> {
    let mut out = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        let translated = client.translate(&fragment.text, target).await?;
        out.push(TranscriptFragment {
            text: translated,
            ..fragment
        });
    }
    Ok(out)
}
