// src/config/scoring.rs
//! Scoring configuration: lexicon tables plus the tuning knobs of both scorers.
//!
//! TOML shape (see `config/scoring.toml` for the built-in table):
//!
//! ```toml
//! [hype]
//! curve_scale = 4.0
//! title_weight = 1.5
//! terms = ["incredible", { term = "revolutionary", weight = 2.0 }]
//!
//! [ethics]
//! negation_window = 3
//!
//! [ethics.categories.privacy]
//! positive = [{ term = "end-to-end encryption", weight = 2.0 }]
//! negative = ["tracks everything"]
//! ```
//!
//! A term is either a bare string (weight 1.0) or `{ term, weight }`.
//! The built-in table is embedded at compile time; `SCORING_CONFIG_PATH`
//! swaps in a file instead.

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analyze::ethics::ImpactTag;
use crate::error::{LexiconError, ScoringError};

pub const ENV_SCORING_CONFIG_PATH: &str = "SCORING_CONFIG_PATH";

/// Built-in lexicon and knobs.
pub const BUILTIN_SCORING_TOML: &str = include_str!("../../config/scoring.toml");

/// Upper bound for `ethics.negation_window`.
pub const MAX_NEGATION_WINDOW: usize = 16;

static BUILTIN: Lazy<ScoringConfig> = Lazy::new(|| {
    ScoringConfig::from_toml_str(BUILTIN_SCORING_TOML).expect("valid built-in scoring config")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub hype: HypeConfig,
    pub ethics: EthicsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypeConfig {
    /// Raw signal at which the score has covered ~63% of the 1..10 range.
    #[serde(default = "default_curve_scale")]
    pub curve_scale: f64,
    /// Multiplier for lexicon hits found in the title.
    #[serde(default = "default_title_weight")]
    pub title_weight: f64,
    /// Signal per lone `!`.
    #[serde(default = "default_exclamation_weight")]
    pub exclamation_weight: f64,
    /// Signal per run of two or more `!`.
    #[serde(default = "default_exclamation_run_weight")]
    pub exclamation_run_weight: f64,
    /// Signal per fully upper-case word.
    #[serde(default = "default_shout_weight")]
    pub shout_weight: f64,
    #[serde(default = "default_shout_min_len")]
    pub shout_min_len: usize,
    /// Cap on the summed punctuation/shouting signal.
    #[serde(default = "default_emphasis_cap")]
    pub emphasis_cap: f64,
    #[serde(default)]
    pub terms: Vec<TermCfg>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthicsConfig {
    /// Multiplier applied to the summed category deltas before clamping.
    #[serde(default = "default_delta_scale")]
    pub delta_scale: f64,
    /// How many tokens back a negator still flips a term. 0 disables negation.
    #[serde(default = "default_negation_window")]
    pub negation_window: usize,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryCfg>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryCfg {
    #[serde(default)]
    pub positive: Vec<TermCfg>,
    #[serde(default)]
    pub negative: Vec<TermCfg>,
}

/// `"phrase"` or `{ term = "phrase", weight = 1.5 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TermCfg {
    Plain(String),
    Weighted {
        term: String,
        #[serde(default = "default_term_weight")]
        weight: f64,
    },
}

impl TermCfg {
    pub fn phrase(&self) -> &str {
        match self {
            TermCfg::Plain(s) => s,
            TermCfg::Weighted { term, .. } => term,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            TermCfg::Plain(_) => default_term_weight(),
            TermCfg::Weighted { weight, .. } => *weight,
        }
    }

    /// Reject NaN/inf/negative weights; the sign comes from the list a term sits in.
    pub(crate) fn checked_weight(&self, context: &str) -> Result<f64, LexiconError> {
        let w = self.weight();
        if !w.is_finite() || w < 0.0 {
            return Err(LexiconError::InvalidWeight {
                phrase: self.phrase().to_string(),
                context: context.to_string(),
                weight: w,
            });
        }
        Ok(w)
    }
}

fn default_curve_scale() -> f64 {
    4.0
}
fn default_title_weight() -> f64 {
    1.5
}
fn default_exclamation_weight() -> f64 {
    0.5
}
fn default_exclamation_run_weight() -> f64 {
    1.0
}
fn default_shout_weight() -> f64 {
    0.5
}
fn default_shout_min_len() -> usize {
    5
}
fn default_emphasis_cap() -> f64 {
    2.0
}
fn default_delta_scale() -> f64 {
    1.0
}
fn default_negation_window() -> usize {
    3
}
fn default_term_weight() -> f64 {
    1.0
}

impl ScoringConfig {
    /// The embedded default table (parsed once per process).
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ScoringError> {
        let cfg: ScoringConfig = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from an explicit file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading scoring config from {}", path.display()))?;
        let cfg = Self::from_toml_str(&content)
            .with_context(|| format!("parsing scoring config {}", path.display()))?;
        info!(target: "scoring", path = %path.display(), "loaded scoring config");
        Ok(cfg)
    }

    /// `$SCORING_CONFIG_PATH` if set, otherwise the built-in table.
    /// A set-but-unreadable path is an error, not a silent fallback.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var(ENV_SCORING_CONFIG_PATH) {
            Ok(p) if !p.trim().is_empty() => Self::from_path(&PathBuf::from(p.trim())),
            _ => {
                info!(target: "scoring", "using built-in scoring config");
                Ok(Self::builtin())
            }
        }
    }

    /// Knob sanity checks. Terms are checked when the scorers compile them.
    pub fn validate(&self) -> Result<(), LexiconError> {
        let h = &self.hype;
        positive_finite("hype.curve_scale", h.curve_scale, false)?;
        positive_finite("hype.title_weight", h.title_weight, true)?;
        positive_finite("hype.exclamation_weight", h.exclamation_weight, true)?;
        positive_finite("hype.exclamation_run_weight", h.exclamation_run_weight, true)?;
        positive_finite("hype.shout_weight", h.shout_weight, true)?;
        positive_finite("hype.emphasis_cap", h.emphasis_cap, true)?;
        if h.shout_min_len == 0 {
            return Err(LexiconError::InvalidSetting {
                name: "hype.shout_min_len",
                reason: "must be at least 1".into(),
            });
        }

        let e = &self.ethics;
        positive_finite("ethics.delta_scale", e.delta_scale, true)?;
        if e.negation_window > MAX_NEGATION_WINDOW {
            return Err(LexiconError::InvalidSetting {
                name: "ethics.negation_window",
                reason: format!("must be <= {MAX_NEGATION_WINDOW}"),
            });
        }
        for name in e.categories.keys() {
            name.parse::<ImpactTag>()?;
        }
        Ok(())
    }
}

fn positive_finite(name: &'static str, v: f64, allow_zero: bool) -> Result<(), LexiconError> {
    let ok = v.is_finite() && if allow_zero { v >= 0.0 } else { v > 0.0 };
    if ok {
        Ok(())
    } else {
        Err(LexiconError::InvalidSetting {
            name,
            reason: format!("got {v}"),
        })
    }
}
