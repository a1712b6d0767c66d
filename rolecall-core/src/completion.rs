//! Completion coordination: transitions an attempt exactly once
//!
//! Webhook deliveries are at-least-once and unordered. The coordinator
//! absorbs duplicates with a guarded conditional status flip; only the
//! delivery that actually flips the status triggers report generation, and
//! the generator's own idempotence is an independent second guard.

use std::sync::Arc;

use crate::error::CoreError;
use crate::reporting::ReportGenerator;
use crate::store::Store;
use crate::webhook::CompletionData;

/// What a completion delivery amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Non-terminal status: acknowledged with no state change
    Ignored,
    /// Attempt was already COMPLETED; duplicate delivery absorbed
    AlreadyCompleted,
    /// This delivery flipped the attempt and produced the report
    Completed { report_id: String },
}

/// Coordinates the terminal attempt transition and report trigger
pub struct CompletionCoordinator {
    store: Arc<dyn Store>,
    reports: Arc<ReportGenerator>,
}

impl CompletionCoordinator {
    pub fn new(store: Arc<dyn Store>, reports: Arc<ReportGenerator>) -> Self {
        Self { store, reports }
    }

    /// Process an admitted completion event
    ///
    /// Unknown correlation ids are a hard NotFound: an attempt is never
    /// synthesized for an event. If report generation fails after the flip,
    /// the attempt stays COMPLETED without a report; the error surfaces and
    /// no in-process retry is made (known limitation).
    pub async fn complete(&self, event: &CompletionData) -> Result<CompletionOutcome, CoreError> {
        if !event.is_terminal() {
            tracing::debug!(
                conversation_id = %event.conversation_id,
                status = %event.status,
                "ignoring non-terminal completion event"
            );
            return Ok(CompletionOutcome::Ignored);
        }

        // The provider only knows the correlation id, never our attempt id
        let attempt = self
            .store
            .attempt_by_conversation(&event.conversation_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound(format!(
                    "no attempt for conversation: {}",
                    event.conversation_id
                ))
            })?;

        let flipped = self.store.complete_attempt_if_pending(&attempt.id).await?;
        if !flipped {
            tracing::debug!(
                attempt_id = %attempt.id,
                "duplicate completion delivery absorbed"
            );
            return Ok(CompletionOutcome::AlreadyCompleted);
        }

        tracing::info!(attempt_id = %attempt.id, "attempt completed");

        let report = self
            .reports
            .generate(
                &attempt.id,
                &event.transcript,
                event.metadata.call_duration_secs,
            )
            .await?;

        Ok(CompletionOutcome::Completed {
            report_id: report.id,
        })
    }
}
