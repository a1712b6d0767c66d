//! Performance report produced after a completed attempt

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transcript::TranscriptStats;

/// Overall score at or above this is a HIRE recommendation
pub const HIRE_THRESHOLD: u8 = 80;

/// Overall score at or above this (and below [`HIRE_THRESHOLD`]) is MAYBE
pub const MAYBE_THRESHOLD: u8 = HIRE_THRESHOLD - 15;

/// Hiring recommendation derived purely from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Hire,
    Maybe,
    NoHire,
}

impl Recommendation {
    /// Derive the recommendation from an overall score in [0, 100]
    pub fn from_score(score: u8) -> Self {
        if score >= HIRE_THRESHOLD {
            Recommendation::Hire
        } else if score >= MAYBE_THRESHOLD {
            Recommendation::Maybe
        } else {
            Recommendation::NoHire
        }
    }
}

/// Score and feedback for one evaluation dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    /// Dimension score in [0, 100]
    pub score: u8,
    /// Specific feedback for this dimension
    pub feedback: String,
}

/// The five fixed evaluation dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedFeedback {
    pub communication: DimensionScore,
    pub problem_solving: DimensionScore,
    pub professionalism: DimensionScore,
    pub empathy: DimensionScore,
    pub domain_knowledge: DimensionScore,
}

impl DetailedFeedback {
    /// All five dimension scores, for range validation
    pub fn scores(&self) -> [u8; 5] {
        [
            self.communication.score,
            self.problem_solving.score,
            self.professionalism.score,
            self.empathy.score,
            self.domain_knowledge.score,
        ]
    }
}

/// Immutable performance report, created at most once per attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptReport {
    /// Unique report identifier
    pub id: String,
    /// The attempt this report scores (exactly 1:1)
    pub attempt_id: String,
    /// Correlation id of the scored conversation
    pub conversation_id: String,
    /// Overall score in [0, 100]
    pub overall_score: u8,
    /// Recommendation derived from the overall score
    pub recommendation: Recommendation,
    /// Short summary of the candidate's performance
    pub summary: String,
    /// Enumerated strengths
    pub strengths: Vec<String>,
    /// Enumerated improvement areas
    pub areas_for_improvement: Vec<String>,
    /// Per-dimension scores and feedback
    pub feedback: DetailedFeedback,
    /// Aggregate transcript statistics
    pub transcript_stats: TranscriptStats,
    /// When the report was created
    pub created_at: DateTime<Utc>,
}

impl AttemptReport {
    /// Allocate a fresh report id
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }
}
