use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable, confidence-selected chunk of transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedSegment {
    /// Transcribed text, without the separating space
    pub text: String,

    /// Confidence score (0.0 to 1.0)
    pub confidence: f32,

    /// When this segment was finalized
    pub received_at: DateTime<Utc>,
}

/// The three transcript projections observed by consumers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TranscriptSnapshot {
    /// Finalized segments, each followed by one space
    #[serde(rename = "final")]
    pub final_text: String,

    /// Current best guess for speech still in progress
    pub interim: String,

    /// `final_text` followed by `interim`
    pub combined: String,
}

/// Ordered finalized segments plus the current interim hypothesis
#[derive(Debug, Clone, Default)]
pub struct TranscriptAccumulator {
    segments: Vec<FinalizedSegment>,
    final_text: String,
    interim: String,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finalized segment; finalized text is never retracted
    pub fn append_final(&mut self, text: impl Into<String>, confidence: f32) {
        let text = text.into();
        self.final_text.push_str(&text);
        self.final_text.push(' ');
        self.segments.push(FinalizedSegment {
            text,
            confidence: clamp_confidence(confidence),
            received_at: Utc::now(),
        });
    }

    /// Replace the interim hypothesis wholesale
    pub fn set_interim(&mut self, text: impl Into<String>) {
        self.interim = text.into();
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.final_text.clear();
        self.interim.clear();
    }

    pub fn final_text(&self) -> &str {
        &self.final_text
    }

    pub fn interim(&self) -> &str {
        &self.interim
    }

    pub fn segments(&self) -> &[FinalizedSegment] {
        &self.segments
    }

    pub fn snapshot(&self) -> TranscriptSnapshot {
        TranscriptSnapshot {
            final_text: self.final_text.clone(),
            interim: self.interim.clone(),
            combined: format!("{}{}", self.final_text, self.interim),
        }
    }
}

fn clamp_confidence(confidence: f32) -> f32 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}
