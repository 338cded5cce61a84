// src/lib.rs
// Public library surface for the CLI, integration tests and embedding callers.

pub mod analyze;
pub mod config;
pub mod error;
pub mod story;
pub mod text;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{
    score_story, EthicsScoreResult, EthicsScorer, HypeScorer, ImpactTag, Score, ScoreRecord,
    ScoringPipeline, ScoringPipelineResult, ScoringReport,
};
pub use crate::config::ScoringConfig;
pub use crate::error::{LexiconError, ScoringError};
pub use crate::story::StoryContent;
