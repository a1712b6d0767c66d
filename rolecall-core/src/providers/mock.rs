//! Mock collaborators for tests
//!
//! Each mock is scriptable: queue responses or failures before driving the
//! component under test, then assert on call counts.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;

use super::{ConversationProvider, Identity, IdentityVerifier, ScoringEngine, SignedSession};
use crate::domain::ScenarioConfig;
use crate::error::CoreError;

/// Mock conversation provider issuing deterministic session URLs
#[derive(Default)]
pub struct MockConversationProvider {
    counter: AtomicU64,
    failing: AtomicBool,
}

impl MockConversationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `open_session` call fail upstream
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of sessions issued so far
    pub fn sessions_issued(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConversationProvider for MockConversationProvider {
    async fn open_session(&self, _scenario: &ScenarioConfig) -> Result<SignedSession, CoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::Upstream(
                "conversation provider unavailable".to_string(),
            ));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let conversation_id = format!("conv-{n}");
        Ok(SignedSession {
            session_url: format!(
                "wss://provider.test/session?conversation_id={conversation_id}&sig=mock"
            ),
            conversation_id,
        })
    }
}

/// Mock scoring engine returning queued responses
///
/// With nothing queued it returns a well-formed evaluation with the
/// configured default score.
pub struct MockScoringEngine {
    responses: Mutex<VecDeque<Result<String, CoreError>>>,
    default_score: u8,
    calls: AtomicU64,
}

impl MockScoringEngine {
    pub fn new(default_score: u8) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            default_score,
            calls: AtomicU64::new(0),
        }
    }

    /// Queue a raw response to be returned by the next `evaluate` call
    pub fn queue_response(&self, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.into()));
    }

    /// Queue an upstream failure
    pub fn queue_failure(&self, message: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(CoreError::Upstream(message.into())));
    }

    /// Number of times `evaluate` was invoked
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// A conforming evaluation JSON document with the given overall score
    pub fn canned_evaluation(score: u8) -> String {
        let dimension = |s: u8| {
            serde_json::json!({ "score": s, "feedback": "solid handling throughout" })
        };
        serde_json::json!({
            "overallScore": score,
            "summary": "Handled the call competently with a few rough edges.",
            "strengths": ["clear openings", "kept the caller informed"],
            "areasForImprovement": ["confirm resolution before closing"],
            "detailedFeedback": {
                "communication": dimension(score),
                "problemSolving": dimension(score),
                "professionalism": dimension(score),
                "empathy": dimension(score),
                "domainKnowledge": dimension(score),
            }
        })
        .to_string()
    }
}

#[async_trait]
impl ScoringEngine for MockScoringEngine {
    async fn evaluate(&self, _prompt: &str) -> Result<String, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(Self::canned_evaluation(self.default_score)),
        }
    }
}

/// Identity verifier backed by a static bearer-token table
#[derive(Default)]
pub struct StaticIdentityVerifier {
    identities: Mutex<HashMap<String, Identity>>,
}

impl StaticIdentityVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bearer token for an identity
    pub fn insert(&self, bearer: impl Into<String>, identity: Identity) {
        self.identities
            .lock()
            .unwrap()
            .insert(bearer.into(), identity);
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn verify(&self, bearer: &str) -> Result<Identity, CoreError> {
        self.identities
            .lock()
            .unwrap()
            .get(bearer)
            .cloned()
            .ok_or_else(|| CoreError::NotAuthorized("invalid credential".to_string()))
    }
}
