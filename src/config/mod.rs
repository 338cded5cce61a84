// src/config/mod.rs
pub mod scoring;

pub use scoring::{
    CategoryCfg, EthicsConfig, HypeConfig, ScoringConfig, TermCfg, ENV_SCORING_CONFIG_PATH,
};
