// src/story.rs
//! Input record for the scoring core plus the text normalizer used before scanning.
//!
//! Well-formedness is enforced at the boundary: a `StoryContent` always holds
//! three strings (possibly empty). Untrusted JSON goes through
//! [`StoryContent::from_json_value`], which rejects missing/null/non-string fields
//! instead of coercing them.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ScoringError;

/// Minimal story record handed over by the ingestion layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryContent {
    pub title: String,
    pub content: String,
    /// Opaque; never validated or fetched by the scorers.
    #[serde(rename = "sourceUrl", alias = "source_url")]
    pub source_url: String,
}

impl StoryContent {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            source_url: source_url.into(),
        }
    }

    /// Validate an untrusted JSON record.
    ///
    /// All three fields must be present and be strings. `sourceUrl` may also be
    /// spelled `source_url`. Unknown extra fields are ignored.
    pub fn from_json_value(value: &Value) -> Result<Self, ScoringError> {
        let obj = value.as_object().ok_or_else(|| ScoringError::NotAnObject {
            found: json_kind(value).to_string(),
        })?;

        let field = |names: &[&str], label: &'static str| -> Result<String, ScoringError> {
            let v = names.iter().find_map(|n| obj.get(*n));
            match v {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Err(ScoringError::MalformedInput {
                    field: label,
                    found: json_kind(other).to_string(),
                }),
                None => Err(ScoringError::MalformedInput {
                    field: label,
                    found: "nothing".to_string(),
                }),
            }
        };

        Ok(Self {
            title: field(&["title"], "title")?,
            content: field(&["content"], "content")?,
            source_url: field(&["sourceUrl", "source_url"], "sourceUrl")?,
        })
    }

    /// True when both scanned fields are empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }
}

impl TryFrom<Value> for StoryContent {
    type Error = ScoringError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json_value(&value)
    }
}

impl TryFrom<&Value> for StoryContent {
    type Error = ScoringError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::from_json_value(value)
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Normalize story text before scanning:
/// HTML entities decoded, tags stripped, typographic quotes folded, whitespace collapsed.
///
/// Punctuation is kept as-is (runs of `!` are a hype signal) and there is no length cap.
pub fn normalize_text(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }

    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[a-z][^>]*>").expect("tag regex"));
    out = re_tags.replace_all(&out, " ").into_owned();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace, but keep line breaks as clause hints
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"[^\S\n]+").expect("whitespace regex"));
    out = re_ws.replace_all(&out, " ").into_owned();

    static RE_NL: OnceCell<Regex> = OnceCell::new();
    let re_nl = RE_NL.get_or_init(|| Regex::new(r" ?\n[\s]*").expect("newline regex"));
    out = re_nl.replace_all(&out, "\n").into_owned();

    out.trim().to_string()
}
