//! Transcript types shared by the webhook payload and report generation

use serde::{Deserialize, Serialize};

/// Who spoke a transcript line
///
/// The provider labels the candidate `"user"` on the wire; the simulated
/// caller is `"agent"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerRole {
    Agent,
    #[serde(rename = "user")]
    Candidate,
}

impl SpeakerRole {
    /// Wire label for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeakerRole::Agent => "agent",
            SpeakerRole::Candidate => "user",
        }
    }
}

/// One timestamped line of the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub role: SpeakerRole,
    pub message: String,
    /// Seconds into the call when the line was spoken
    pub time_in_call_secs: u32,
}

/// Aggregate statistics over a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptStats {
    pub total_messages: usize,
    pub candidate_messages: usize,
    pub agent_messages: usize,
    pub call_duration_secs: u32,
}

impl TranscriptStats {
    /// Compute stats over a transcript
    pub fn from_transcript(transcript: &[TranscriptMessage], call_duration_secs: u32) -> Self {
        let candidate_messages = transcript
            .iter()
            .filter(|m| m.role == SpeakerRole::Candidate)
            .count();
        Self {
            total_messages: transcript.len(),
            candidate_messages,
            agent_messages: transcript.len() - candidate_messages,
            call_duration_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(role: SpeakerRole, secs: u32) -> TranscriptMessage {
        TranscriptMessage {
            role,
            message: "hello".to_string(),
            time_in_call_secs: secs,
        }
    }

    #[test]
    fn candidate_role_uses_user_on_the_wire() {
        let json = serde_json::to_string(&SpeakerRole::Candidate).unwrap();
        assert_eq!(json, "\"user\"");

        let parsed: SpeakerRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(parsed, SpeakerRole::Candidate);
    }

    #[test]
    fn stats_count_per_role() {
        let transcript = vec![
            line(SpeakerRole::Agent, 0),
            line(SpeakerRole::Candidate, 3),
            line(SpeakerRole::Agent, 7),
            line(SpeakerRole::Candidate, 12),
            line(SpeakerRole::Candidate, 20),
        ];
        let stats = TranscriptStats::from_transcript(&transcript, 42);
        assert_eq!(stats.total_messages, 5);
        assert_eq!(stats.candidate_messages, 3);
        assert_eq!(stats.agent_messages, 2);
        assert_eq!(stats.call_duration_secs, 42);
    }

    #[test]
    fn stats_on_empty_transcript() {
        let stats = TranscriptStats::from_transcript(&[], 0);
        assert_eq!(stats.total_messages, 0);
        assert_eq!(stats.candidate_messages, 0);
        assert_eq!(stats.agent_messages, 0);
    }
}
