//! Completion event payload from the conversation provider

use serde::Deserialize;

use crate::domain::TranscriptMessage;

/// Provider status value that marks a conversation as fully ended
pub const TERMINAL_STATUS: &str = "done";

/// Envelope of the post-call completion webhook
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionEvent {
    pub data: CompletionData,
}

/// Body of the completion event
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionData {
    /// Correlation id echoed from the session URL
    pub conversation_id: String,
    /// Provider status; only [`TERMINAL_STATUS`] triggers processing
    pub status: String,
    /// Role-labelled, timestamped transcript
    #[serde(default)]
    pub transcript: Vec<TranscriptMessage>,
    #[serde(default)]
    pub metadata: CallMetadata,
}

/// Call-level metadata
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallMetadata {
    #[serde(default)]
    pub call_duration_secs: u32,
}

impl CompletionData {
    /// Whether this event carries a terminal status
    pub fn is_terminal(&self) -> bool {
        self.status == TERMINAL_STATUS
    }
}
