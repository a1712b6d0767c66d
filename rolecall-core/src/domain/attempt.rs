//! Attempt: one candidate's run at a module

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of an attempt
///
/// The only legal transition is Pending -> Completed. It is never reversed,
/// and once Completed the conversation id is immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    Pending,
    Completed,
}

/// A candidate's attempt at a module
///
/// The conversation id correlates the attempt with the provider's session:
/// it is embedded in the signed session URL at issuance and echoed back by
/// the completion webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    /// Unique attempt identifier
    pub id: String,
    /// Module being attempted
    pub module_id: String,
    /// Subject id of the candidate
    pub candidate: String,
    /// Current status
    pub status: AttemptStatus,
    /// Correlation id from the provider session URL
    pub conversation_id: String,
    /// Signed session URL the candidate connects to
    pub session_url: String,
    /// Linked performance report, set on completion
    pub report_id: Option<String>,
    /// When the attempt was created
    pub created_at: DateTime<Utc>,
    /// When the attempt was last updated
    pub updated_at: DateTime<Utc>,
}

impl Attempt {
    /// Create a new pending attempt with a correlated session
    pub fn new(
        module_id: impl Into<String>,
        candidate: impl Into<String>,
        conversation_id: impl Into<String>,
        session_url: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            module_id: module_id.into(),
            candidate: candidate.into(),
            status: AttemptStatus::Pending,
            conversation_id: conversation_id.into(),
            session_url: session_url.into(),
            report_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the attempt has reached its terminal state
    pub fn is_completed(&self) -> bool {
        self.status == AttemptStatus::Completed
    }
}
