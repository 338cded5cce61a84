//! Error types for the scoring core.
//!
//! Scoring itself is infallible on a well-formed `StoryContent`; errors only
//! happen at the boundaries: parsing untrusted input records and compiling
//! lexicon/configuration tables.

use thiserror::Error;

/// Problems found while compiling a lexicon or validating config knobs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexiconError {
    #[error("empty phrase in {context}")]
    EmptyPhrase { context: String },

    #[error("phrase `{phrase}` in {context}: `*` is only allowed once, at the end of a word")]
    MisplacedWildcard { phrase: String, context: String },

    #[error("phrase `{phrase}` appears twice in {context}")]
    DuplicatePhrase { phrase: String, context: String },

    #[error("unknown impact category `{0}`")]
    UnknownCategory(String),

    #[error("term `{phrase}` in {context}: weight must be finite and >= 0 (got {weight})")]
    InvalidWeight {
        phrase: String,
        context: String,
        weight: f64,
    },

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

/// Errors surfaced by the public scoring API.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// A story record whose fields are not all strings.
    #[error("malformed story: field `{field}` must be a string (found {found})")]
    MalformedInput { field: &'static str, found: String },

    /// The input record is not a JSON object at all.
    #[error("malformed story: expected a JSON object (found {found})")]
    NotAnObject { found: String },

    #[error("invalid scoring config: {0}")]
    Config(#[from] LexiconError),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ScoringError>;
