//! Shared test fixtures for rolecall-server integration tests

use std::sync::Arc;

use axum_test::TestServer;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use rolecall_core::{
    Difficulty, Identity, MemoryStore, MockConversationProvider, MockScoringEngine, Module,
    ScenarioConfig, StaticIdentityVerifier, Store,
};
use rolecall_server::{AppState, AuthLayer, create_router};

pub const WEBHOOK_SECRET: &str = "whsec_integration";
pub const OWNER_TOKEN: &str = "owner-token";
pub const CANDIDATE_TOKEN: &str = "candidate-token";
pub const CANDIDATE_EMAIL: &str = "candidate@example.com";

pub struct TestContext {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub provider: Arc<MockConversationProvider>,
    pub engine: Arc<MockScoringEngine>,
    pub module_id: String,
}

/// Spin up a test server with one seeded module, an owner, and a candidate
pub async fn setup(default_score: u8) -> TestContext {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(MockConversationProvider::new());
    let engine = Arc::new(MockScoringEngine::new(default_score));

    let module = Module::new(
        "owner-1",
        "Returns desk",
        vec![CANDIDATE_EMAIL.to_string()],
        ScenarioConfig {
            topic: "product returns".to_string(),
            difficulty: Difficulty::Medium,
            agent_role: "frustrated customer".to_string(),
            agent_prompt: "You want a refund for a damaged order.".to_string(),
            agent_first_message: "Hi, my order arrived broken.".to_string(),
            candidate_role: "support representative".to_string(),
            problem_statement: "Resolve a damaged-order complaint.".to_string(),
        },
    );
    let module_id = module.id.clone();
    store.insert_module(module).await.unwrap();

    let verifier = StaticIdentityVerifier::new();
    verifier.insert(
        OWNER_TOKEN,
        Identity {
            subject: "owner-1".to_string(),
            email: "owner@example.com".to_string(),
        },
    );
    verifier.insert(
        CANDIDATE_TOKEN,
        Identity {
            subject: "cand-1".to_string(),
            email: CANDIDATE_EMAIL.to_string(),
        },
    );

    let state = Arc::new(AppState::new(
        store.clone(),
        provider.clone(),
        engine.clone(),
        WEBHOOK_SECRET,
    ));
    let auth = AuthLayer::new(Arc::new(verifier));
    let server = TestServer::new(create_router(state, auth)).unwrap();

    TestContext {
        server,
        store,
        provider,
        engine,
        module_id,
    }
}

/// Sign a webhook body the way the provider does
pub fn sign(body: &[u8], timestamp: i64) -> String {
    let t = timestamp.to_string();
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(t.as_bytes());
    mac.update(b".");
    mac.update(body);
    format!("t={t},v0={}", hex::encode(mac.finalize().into_bytes()))
}

/// A terminal completion payload for the given conversation id
pub fn completion_body(conversation_id: &str, status: &str) -> Vec<u8> {
    serde_json::json!({
        "data": {
            "conversation_id": conversation_id,
            "status": status,
            "transcript": [
                { "role": "agent", "message": "Hi, my order arrived broken.", "time_in_call_secs": 0 },
                { "role": "user", "message": "I'm sorry to hear that, let me help.", "time_in_call_secs": 4 },
                { "role": "agent", "message": "I'd like a refund please.", "time_in_call_secs": 9 },
                { "role": "user", "message": "I can issue that right away.", "time_in_call_secs": 15 }
            ],
            "metadata": { "call_duration_secs": 180 }
        }
    })
    .to_string()
    .into_bytes()
}
