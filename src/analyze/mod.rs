// src/analyze/mod.rs
//! Scoring pipeline entry: runs the hype and ethics scorers on one story and
//! assembles the combined result.
//!
//! Both scorers see the same `StoryContent` and nothing else; neither result
//! feeds into the other. The pipeline holds only compiled, read-only lexicons,
//! so one instance can serve any number of threads.

pub mod ethics;
pub mod hype;
pub mod lexicon;
pub mod scoring;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

use crate::config::ScoringConfig;
use crate::error::ScoringError;
use crate::story::StoryContent;

// Re-export convenient types.
pub use crate::analyze::ethics::{
    CategoryImpact, EthicsBreakdown, EthicsScoreResult, EthicsScorer, ImpactTag,
};
pub use crate::analyze::hype::{HypeBreakdown, HypeScorer};
pub use crate::analyze::scoring::Score;

static SHARED: Lazy<ScoringPipeline> = Lazy::new(|| {
    ScoringPipeline::new(&ScoringConfig::builtin()).expect("built-in lexicon compiles")
});

static DEV_LOG: Lazy<bool> = Lazy::new(dev_logging_enabled);

/// Which part of the story a lexicon hit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Content,
}

/// One lexicon hit as it counted towards a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub term: String,
    /// Signed contribution after title multiplier / negation.
    pub weight: f64,
    pub field: Field,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub negated: bool,
}

/// Combined output for one story. The caller persists it; the pipeline does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringPipelineResult {
    pub hype_score: Score,
    pub ethics: EthicsScoreResult,
}

/// Flat shape for the storage layer (`hype_score`, `ethics_impact_score`, `ethical_impact_tags`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub hype_score: u8,
    pub ethics_impact_score: u8,
    pub ethical_impact_tags: Vec<String>,
}

impl ScoringPipelineResult {
    pub fn to_record(&self) -> ScoreRecord {
        ScoreRecord {
            hype_score: self.hype_score.get(),
            ethics_impact_score: self.ethics.score.get(),
            ethical_impact_tags: self
                .ethics
                .impact_tags
                .iter()
                .map(|t| t.as_str().to_string())
                .collect(),
        }
    }

    pub fn impact_tags(&self) -> &BTreeSet<ImpactTag> {
        &self.ethics.impact_tags
    }
}

/// `run` result plus both breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringReport {
    pub result: ScoringPipelineResult,
    pub hype: HypeBreakdown,
    pub ethics: EthicsBreakdown,
}

#[derive(Debug, Clone)]
pub struct ScoringPipeline {
    hype: HypeScorer,
    ethics: EthicsScorer,
}

impl ScoringPipeline {
    /// Compile both lexicons from `cfg`.
    pub fn new(cfg: &ScoringConfig) -> Result<Self, ScoringError> {
        cfg.validate()?;
        Ok(Self {
            hype: HypeScorer::new(&cfg.hype)?,
            ethics: EthicsScorer::new(&cfg.ethics)?,
        })
    }

    pub fn from_scorers(hype: HypeScorer, ethics: EthicsScorer) -> Self {
        Self { hype, ethics }
    }

    /// Pipeline over `$SCORING_CONFIG_PATH`, or the built-in table when unset.
    pub fn from_env() -> anyhow::Result<Self> {
        let cfg = ScoringConfig::from_env()?;
        Ok(Self::new(&cfg)?)
    }

    /// Process-wide pipeline over the built-in table, compiled on first use.
    pub fn shared() -> &'static ScoringPipeline {
        &SHARED
    }

    pub fn hype(&self) -> &HypeScorer {
        &self.hype
    }

    pub fn ethics(&self) -> &EthicsScorer {
        &self.ethics
    }

    /// Score one story. Never fails on a constructed `StoryContent`.
    pub fn run(&self, story: &StoryContent) -> ScoringPipelineResult {
        let hype_score = self.hype.score(story);
        let ethics = self.ethics.score(story);
        let result = ScoringPipelineResult { hype_score, ethics };
        dev_log_scoring(story, &result);
        result
    }

    /// Score a slice; output order matches input order.
    pub fn run_batch(&self, stories: &[StoryContent]) -> Vec<ScoringPipelineResult> {
        stories.iter().map(|s| self.run(s)).collect()
    }

    /// Like `run`, plus the matched terms and signal parts behind each score.
    pub fn explain(&self, story: &StoryContent) -> ScoringReport {
        let hype = self.hype.explain(story);
        let ethics = self.ethics.explain(story);
        ScoringReport {
            result: ScoringPipelineResult {
                hype_score: hype.score,
                ethics: ethics.result.clone(),
            },
            hype,
            ethics,
        }
    }
}

/// Score with the shared built-in pipeline.
pub fn score_story(story: &StoryContent) -> ScoringPipelineResult {
    ScoringPipeline::shared().run(story)
}

// Dev logging gate: SCORING_DEV_LOG=1 AND dev env (debug or SCORING_ENV in {local,development,dev})
pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var("SCORING_DEV_LOG").ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SCORING_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Short, stable, non-reversible id for a story (first 6 bytes of SHA-256, hex).
pub(crate) fn anon_hash(story: &StoryContent) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(story.title.as_bytes());
    hasher.update([0u8]);
    hasher.update(story.content.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

pub(crate) fn truncate_vec<T: ToString>(v: impl IntoIterator<Item = T>, max: usize) -> Vec<String> {
    v.into_iter().take(max).map(|x| x.to_string()).collect()
}

fn dev_log_scoring(story: &StoryContent, result: &ScoringPipelineResult) {
    if !*DEV_LOG {
        return;
    }
    let id = anon_hash(story);
    let tags = truncate_vec(result.ethics.impact_tags.iter(), 5);
    // Never log raw text. Only hashed id + scores.
    info!(
        target: "scoring",
        %id,
        hype = result.hype_score.get(),
        ethics = result.ethics.score.get(),
        tags = ?tags,
        "scored"
    );
}
