// src/analyze/ethics.rs
//! Ethics-impact scorer.
//!
//! Every category owns a positive and a negative term list and is scanned on
//! its own, so tagging is independent per category. Hits add their signed weight
//! to the category delta (a negator a few tokens earlier in the same clause flips
//! the sign). Category deltas are summed algebraically; there is no per-category
//! winner-take-all. The total shifts the neutral baseline 5, then clamps/rounds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::lexicon::{PhraseMatch, PhraseMatcher};
use super::scoring::{ethics_curve, Score};
use super::{Field, Signal};
use crate::config::EthicsConfig;
use crate::error::LexiconError;
use crate::story::{normalize_text, StoryContent};
use crate::text::{is_focus_particle, is_negator, is_scope_breaker, tokenize, Token};

/// Closed vocabulary of impact categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactTag {
    Privacy,
    Labor,
    Environment,
    Safety,
    Fairness,
    Transparency,
    Accessibility,
}

impl ImpactTag {
    pub const ALL: [ImpactTag; 7] = [
        ImpactTag::Privacy,
        ImpactTag::Labor,
        ImpactTag::Environment,
        ImpactTag::Safety,
        ImpactTag::Fairness,
        ImpactTag::Transparency,
        ImpactTag::Accessibility,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ImpactTag::Privacy => "privacy",
            ImpactTag::Labor => "labor",
            ImpactTag::Environment => "environment",
            ImpactTag::Safety => "safety",
            ImpactTag::Fairness => "fairness",
            ImpactTag::Transparency => "transparency",
            ImpactTag::Accessibility => "accessibility",
        }
    }
}

impl fmt::Display for ImpactTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImpactTag {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        ImpactTag::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(LexiconError::UnknownCategory(s))
    }
}

/// Ethics score plus the categories that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthicsScoreResult {
    pub score: Score,
    /// Deduplicated; iteration order is fixed but carries no meaning.
    pub impact_tags: BTreeSet<ImpactTag>,
}

impl EthicsScoreResult {
    pub fn neutral() -> Self {
        Self {
            score: Score::NEUTRAL,
            impact_tags: BTreeSet::new(),
        }
    }

    pub fn has_tag(&self, tag: ImpactTag) -> bool {
        self.impact_tags.contains(&tag)
    }
}

impl Default for EthicsScoreResult {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Net contribution of one category, with the hits behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryImpact {
    pub tag: ImpactTag,
    pub delta: f64,
    pub hits: Vec<Signal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EthicsBreakdown {
    pub result: EthicsScoreResult,
    pub total_delta: f64,
    /// Only categories that matched, in tag order.
    pub categories: Vec<CategoryImpact>,
}

#[derive(Debug, Clone)]
struct EthicsTerm {
    label: String,
    /// Positive list → +weight, negative list → -weight.
    signed_weight: f64,
}

#[derive(Debug, Clone)]
struct CategoryLexicon {
    tag: ImpactTag,
    matcher: PhraseMatcher,
    terms: Vec<EthicsTerm>,
}

/// Stateless after construction; share freely across threads.
#[derive(Debug, Clone)]
pub struct EthicsScorer {
    categories: Vec<CategoryLexicon>,
    delta_scale: f64,
    negation_window: usize,
}

impl EthicsScorer {
    pub fn new(cfg: &EthicsConfig) -> Result<Self, LexiconError> {
        let mut categories = Vec::with_capacity(cfg.categories.len());

        for (name, cat) in &cfg.categories {
            let tag: ImpactTag = name.parse()?;
            let context = format!("ethics.categories.{name}");

            let mut phrases = Vec::new();
            let mut terms = Vec::new();
            for (list, sign) in [(&cat.positive, 1.0), (&cat.negative, -1.0)] {
                for t in list {
                    let w = t.checked_weight(&context)?;
                    phrases.push(t.phrase());
                    terms.push(EthicsTerm {
                        label: t.phrase().trim().to_string(),
                        signed_weight: sign * w,
                    });
                }
            }
            let matcher = PhraseMatcher::compile(&phrases, &context)?;
            if matcher.is_empty() {
                continue;
            }
            categories.push(CategoryLexicon {
                tag,
                matcher,
                terms,
            });
        }
        categories.sort_by_key(|c| c.tag);

        Ok(Self {
            categories,
            delta_scale: cfg.delta_scale,
            negation_window: cfg.negation_window,
        })
    }

    /// Categories this scorer can tag.
    pub fn categories(&self) -> Vec<ImpactTag> {
        self.categories.iter().map(|c| c.tag).collect()
    }

    /// Score in [1,10] (5 = neutral) and the set of triggered categories.
    pub fn score(&self, story: &StoryContent) -> EthicsScoreResult {
        self.explain(story).result
    }

    pub fn explain(&self, story: &StoryContent) -> EthicsBreakdown {
        let title = normalize_text(&story.title);
        let content = normalize_text(&story.content);
        if title.is_empty() && content.is_empty() {
            return EthicsBreakdown {
                result: EthicsScoreResult::neutral(),
                total_delta: 0.0,
                categories: Vec::new(),
            };
        }

        let fields = [
            self.scan_field(Field::Title, &title),
            self.scan_field(Field::Content, &content),
        ];

        let mut total = 0.0f64;
        let mut impact_tags = BTreeSet::new();
        let mut categories = Vec::new();

        for (ci, cat) in self.categories.iter().enumerate() {
            let mut delta = 0.0f64;
            let mut hits = Vec::new();

            for scan in &fields {
                for m in &scan.matches[ci] {
                    let term = &cat.terms[m.phrase];
                    let negated = self.is_negated(scan, m);
                    let w = if negated {
                        -term.signed_weight
                    } else {
                        term.signed_weight
                    };
                    delta += w;
                    hits.push(Signal {
                        term: term.label.clone(),
                        weight: w,
                        field: scan.field,
                        negated,
                    });
                }
            }

            if hits.is_empty() {
                continue;
            }
            impact_tags.insert(cat.tag);
            total += delta;
            categories.push(CategoryImpact {
                tag: cat.tag,
                delta,
                hits,
            });
        }

        EthicsBreakdown {
            result: EthicsScoreResult {
                score: ethics_curve(total, self.delta_scale),
                impact_tags,
            },
            total_delta: total,
            categories,
        }
    }

    /// Run every category matcher over one field and record which tokens
    /// any hit covers, so negation never reaches into another hit.
    fn scan_field(&self, field: Field, text: &str) -> FieldScan {
        let tokens = tokenize(text);
        let matches: Vec<Vec<PhraseMatch>> = self
            .categories
            .iter()
            .map(|c| c.matcher.find(&tokens))
            .collect();

        let mut covered = vec![false; tokens.len()];
        let mut hit_ends = vec![false; tokens.len() + 1];
        for m in matches.iter().flatten() {
            covered[m.first..m.end()].fill(true);
            hit_ends[m.end()] = true;
        }

        // floor_at[i]: end of the latest hit (any category) that ends at or before i
        let mut floor_at = Vec::with_capacity(hit_ends.len());
        let mut cur = 0usize;
        for (i, ends) in hit_ends.iter().enumerate() {
            if *ends {
                cur = i;
            }
            floor_at.push(cur);
        }

        FieldScan {
            field,
            tokens,
            matches,
            covered,
            floor_at,
        }
    }

    /// A negator within `negation_window` tokens before the hit, same clause,
    /// no conjunction in between and not inside or before an earlier hit of
    /// any category. "not only" / "not just" is emphasis, not negation.
    fn is_negated(&self, scan: &FieldScan, m: &PhraseMatch) -> bool {
        if self.negation_window == 0 || m.first == 0 {
            return false;
        }
        let tokens = &scan.tokens;
        let clause = tokens[m.first].clause;
        let lo = m
            .first
            .saturating_sub(self.negation_window)
            .max(scan.floor_at[m.first]);

        for i in (lo..m.first).rev() {
            let tok = &tokens[i];
            if tok.clause != clause || is_scope_breaker(&tok.text) {
                return false;
            }
            if scan.covered[i] || !is_negator(&tok.text) {
                continue;
            }
            let focus = tokens
                .get(i + 1)
                .is_some_and(|next| is_focus_particle(&next.text));
            return !focus;
        }
        false
    }
}

/// One field's tokens plus every category's matches over them.
struct FieldScan {
    field: Field,
    tokens: Vec<Token>,
    /// Indexed like `EthicsScorer::categories`.
    matches: Vec<Vec<PhraseMatch>>,
    covered: Vec<bool>,
    floor_at: Vec<usize>,
}
