//! Report generation: scores a completed attempt through the scoring engine
//!
//! Generation is idempotent at two levels: an existing linked report is
//! returned without re-invoking the engine, and the final persist+link is a
//! single atomic store operation that keeps whichever report won a race.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use crate::domain::{
    AttemptReport, DetailedFeedback, DimensionScore, Module, Recommendation, TranscriptMessage,
    TranscriptStats,
};
use crate::error::CoreError;
use crate::providers::{Identity, ScoringEngine};
use crate::store::Store;

/// Strictly-parsed evaluation returned by the scoring engine
///
/// The recommendation is deliberately absent: it is derived locally from
/// the overall score, never taken from the engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoredEvaluation {
    overall_score: u8,
    summary: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    areas_for_improvement: Vec<String>,
    detailed_feedback: EngineFeedback,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EngineFeedback {
    communication: EngineDimension,
    problem_solving: EngineDimension,
    professionalism: EngineDimension,
    empathy: EngineDimension,
    domain_knowledge: EngineDimension,
}

#[derive(Debug, Clone, Deserialize)]
struct EngineDimension {
    score: u8,
    feedback: String,
}

impl From<EngineDimension> for DimensionScore {
    fn from(d: EngineDimension) -> Self {
        DimensionScore {
            score: d.score,
            feedback: d.feedback,
        }
    }
}

impl From<EngineFeedback> for DetailedFeedback {
    fn from(f: EngineFeedback) -> Self {
        DetailedFeedback {
            communication: f.communication.into(),
            problem_solving: f.problem_solving.into(),
            professionalism: f.professionalism.into(),
            empathy: f.empathy.into(),
            domain_knowledge: f.domain_knowledge.into(),
        }
    }
}

/// Generates and persists idempotent performance reports
pub struct ReportGenerator {
    store: Arc<dyn Store>,
    engine: Arc<dyn ScoringEngine>,
}

impl ReportGenerator {
    pub fn new(store: Arc<dyn Store>, engine: Arc<dyn ScoringEngine>) -> Self {
        Self { store, engine }
    }

    /// Generate the report for an attempt, or return the existing one
    ///
    /// On success the report is persisted and linked atomically, which also
    /// sets the attempt COMPLETED if it is not already (covers direct
    /// invocation outside the webhook path).
    pub async fn generate(
        &self,
        attempt_id: &str,
        transcript: &[TranscriptMessage],
        call_duration_secs: u32,
    ) -> Result<AttemptReport, CoreError> {
        let attempt = self
            .store
            .attempt(attempt_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("attempt not found: {attempt_id}")))?;

        if let Some(report_id) = &attempt.report_id {
            if let Some(existing) = self.store.report(report_id).await? {
                tracing::debug!(attempt_id, %report_id, "report already generated");
                return Ok(existing);
            }
        }

        let module = self
            .store
            .module(&attempt.module_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound(format!("module not found: {}", attempt.module_id))
            })?;

        let prompt = build_evaluation_prompt(&module, transcript);
        let raw = self.engine.evaluate(&prompt).await?;
        let evaluation = parse_evaluation(&raw)?;

        let report = AttemptReport {
            id: AttemptReport::new_id(),
            attempt_id: attempt.id.clone(),
            conversation_id: attempt.conversation_id.clone(),
            overall_score: evaluation.overall_score,
            recommendation: Recommendation::from_score(evaluation.overall_score),
            summary: evaluation.summary,
            strengths: evaluation.strengths,
            areas_for_improvement: evaluation.areas_for_improvement,
            feedback: evaluation.detailed_feedback.into(),
            transcript_stats: TranscriptStats::from_transcript(transcript, call_duration_secs),
            created_at: Utc::now(),
        };

        tracing::info!(
            attempt_id,
            report_id = %report.id,
            score = report.overall_score,
            "performance report generated"
        );
        self.store.link_report(report).await
    }

    /// Fetch a report, requiring the caller to own the module behind it
    pub async fn report_for_owner(
        &self,
        report_id: &str,
        caller: &Identity,
    ) -> Result<AttemptReport, CoreError> {
        let report = self
            .store
            .report(report_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("report not found: {report_id}")))?;

        let attempt = self
            .store
            .attempt(&report.attempt_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("attempt for report not found".to_string()))?;
        let module = self
            .store
            .module(&attempt.module_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("module for report not found".to_string()))?;

        if module.owner != caller.subject {
            return Err(CoreError::NotAuthorized(
                "you do not have access to this report".to_string(),
            ));
        }

        Ok(report)
    }
}

/// Build the evaluation prompt from scenario metadata and the transcript
fn build_evaluation_prompt(module: &Module, transcript: &[TranscriptMessage]) -> String {
    let mut lines = String::new();
    for message in transcript {
        let _ = writeln!(
            lines,
            "[{}s] {}: {}",
            message.time_in_call_secs,
            message.role.as_str().to_uppercase(),
            message.message
        );
    }

    format!(
        "You are an expert evaluator analyzing a candidate's performance in a \
simulated voice conversation.\n\n\
## Scenario\n\
- Title: {title}\n\
- Topic: {topic}\n\
- Difficulty: {difficulty:?}\n\
- Agent's role: {agent_role}\n\
- Candidate's role: {candidate_role}\n\
- Problem statement: {problem}\n\
- Background: {background}\n\n\
## Transcript\n\
The USER lines are the candidate under evaluation; the AGENT lines are the \
simulated caller.\n\n\
{lines}\n\
## Response format\n\
Respond ONLY with one valid JSON object (no markdown, no code fences) with \
this exact structure:\n\
{{\"overallScore\": <0-100>, \"summary\": \"...\", \"strengths\": [\"...\"], \
\"areasForImprovement\": [\"...\"], \"detailedFeedback\": {{\
\"communication\": {{\"score\": <0-100>, \"feedback\": \"...\"}}, \
\"problemSolving\": {{\"score\": <0-100>, \"feedback\": \"...\"}}, \
\"professionalism\": {{\"score\": <0-100>, \"feedback\": \"...\"}}, \
\"empathy\": {{\"score\": <0-100>, \"feedback\": \"...\"}}, \
\"domainKnowledge\": {{\"score\": <0-100>, \"feedback\": \"...\"}}}}}}\n\
Be fair but critical, and weigh the difficulty level when scoring.",
        title = module.title,
        topic = module.scenario.topic,
        difficulty = module.scenario.difficulty,
        agent_role = module.scenario.agent_role,
        candidate_role = module.scenario.candidate_role,
        problem = module.scenario.problem_statement,
        background = module.scenario.agent_prompt,
    )
}

/// Parse the engine's raw response into a conforming evaluation
///
/// Any enclosing code-fence markup is stripped before structural parsing.
/// A malformed or out-of-range result fails rather than defaulting.
fn parse_evaluation(raw: &str) -> Result<ScoredEvaluation, CoreError> {
    let cleaned = strip_code_fences(raw);

    let evaluation: ScoredEvaluation = serde_json::from_str(&cleaned)
        .map_err(|e| CoreError::ReportParse(format!("non-conforming engine response: {e}")))?;

    if evaluation.overall_score > 100 {
        return Err(CoreError::ReportParse(format!(
            "overall score {} out of range",
            evaluation.overall_score
        )));
    }
    for score in evaluation.detailed_feedback_scores() {
        if score > 100 {
            return Err(CoreError::ReportParse(format!(
                "dimension score {score} out of range"
            )));
        }
    }

    Ok(evaluation)
}

impl ScoredEvaluation {
    fn detailed_feedback_scores(&self) -> [u8; 5] {
        [
            self.detailed_feedback.communication.score,
            self.detailed_feedback.problem_solving.score,
            self.detailed_feedback.professionalism.score,
            self.detailed_feedback.empathy.score,
            self.detailed_feedback.domain_knowledge.score,
        ]
    }
}

fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}
