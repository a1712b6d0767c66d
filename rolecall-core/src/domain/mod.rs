//! Domain entities for assessment modules, attempts, and reports

mod attempt;
mod module;
mod report;
mod transcript;

pub use attempt::{Attempt, AttemptStatus};
pub use module::{Difficulty, Module, ModulePublic, ScenarioConfig};
pub use report::{
    AttemptReport, DetailedFeedback, DimensionScore, HIRE_THRESHOLD, MAYBE_THRESHOLD,
    Recommendation,
};
pub use transcript::{SpeakerRole, TranscriptMessage, TranscriptStats};
