//! Assessment module: a configured scenario candidates attempt

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capability::ShareCapability;

/// Scenario difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Scenario configuration for a module
///
/// The agent-side fields drive the simulated caller; the candidate-side
/// fields describe what the candidate is told before the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Conversation topic (e.g. "billing dispute")
    pub topic: String,
    /// Difficulty level, considered during scoring
    pub difficulty: Difficulty,
    /// Role the simulated agent plays
    pub agent_role: String,
    /// System prompt driving the simulated agent
    pub agent_prompt: String,
    /// Opening line spoken by the simulated agent
    pub agent_first_message: String,
    /// Role the candidate is asked to play
    pub candidate_role: String,
    /// Scenario/problem statement shown to the candidate
    pub problem_statement: String,
}

/// An assessment module owned by an organization identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// Unique module identifier
    pub id: String,
    /// Subject id of the owning identity
    pub owner: String,
    /// Human-readable title
    pub title: String,
    /// Inactive modules reject all candidate access
    pub active: bool,
    /// Emails of candidates allowed to attempt this module
    pub candidate_emails: Vec<String>,
    /// Scenario configuration
    pub scenario: ScenarioConfig,
    /// Active share capability, if one has been issued
    pub share: Option<ShareCapability>,
    /// When the module was created
    pub created_at: DateTime<Utc>,
}

impl Module {
    /// Create a new active module
    pub fn new(
        owner: impl Into<String>,
        title: impl Into<String>,
        candidate_emails: Vec<String>,
        scenario: ScenarioConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner: owner.into(),
            title: title.into(),
            active: true,
            candidate_emails,
            scenario,
            share: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the given candidate email is on the allowlist
    pub fn allows_candidate(&self, email: &str) -> bool {
        self.candidate_emails.iter().any(|e| e == email)
    }

    /// Redacted projection safe to show an anonymous or candidate caller
    ///
    /// Excludes the owner and the agent-side scoring configuration.
    pub fn public_view(&self) -> ModulePublic {
        ModulePublic {
            id: self.id.clone(),
            title: self.title.clone(),
            topic: self.scenario.topic.clone(),
            candidate_role: self.scenario.candidate_role.clone(),
            problem_statement: self.scenario.problem_statement.clone(),
        }
    }
}

/// Public projection of a module for share/candidate access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulePublic {
    pub id: String,
    pub title: String,
    pub topic: String,
    pub candidate_role: String,
    pub problem_statement: String,
}
