// src/analyze/hype.rs
//! Hype scorer: marketing/sensationalism vocabulary plus a capped emphasis signal.
//!
//! raw = Σ(term weight × title multiplier) + min(emphasis, emphasis_cap)
//!
//! Lexicon vocabulary is the dominant signal. `!` runs and shouted words only add,
//! and their total is capped, so they can lift an otherwise dry story a little
//! but never outrank real hype terms.

use serde::Serialize;

use super::lexicon::PhraseMatcher;
use super::scoring::{hype_curve, Score};
use super::{Field, Signal};
use crate::config::HypeConfig;
use crate::error::LexiconError;
use crate::story::{normalize_text, StoryContent};
use crate::text::{tokenize, Emphasis};

#[derive(Debug, Clone)]
struct HypeTerm {
    label: String,
    weight: f64,
}

/// Stateless after construction; share freely across threads.
#[derive(Debug, Clone)]
pub struct HypeScorer {
    matcher: PhraseMatcher,
    terms: Vec<HypeTerm>,
    cfg: HypeConfig,
}

/// Everything `HypeScorer::score` looked at, for debugging and UI tooltips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HypeBreakdown {
    pub score: Score,
    pub lexicon_signal: f64,
    /// After `emphasis_cap`.
    pub emphasis_signal: f64,
    pub raw_signal: f64,
    pub emphasis: Emphasis,
    pub hits: Vec<Signal>,
}

impl HypeScorer {
    /// Compile the hype lexicon. Fails on malformed phrases or weights.
    pub fn new(cfg: &HypeConfig) -> Result<Self, LexiconError> {
        let context = "hype.terms";
        let mut phrases = Vec::with_capacity(cfg.terms.len());
        let mut terms = Vec::with_capacity(cfg.terms.len());
        for t in &cfg.terms {
            let weight = t.checked_weight(context)?;
            phrases.push(t.phrase());
            terms.push(HypeTerm {
                label: t.phrase().trim().to_string(),
                weight,
            });
        }
        let matcher = PhraseMatcher::compile(&phrases, context)?;

        let mut cfg = cfg.clone();
        cfg.terms.clear();
        Ok(Self {
            matcher,
            terms,
            cfg,
        })
    }

    pub fn term_count(&self) -> usize {
        self.matcher.len()
    }

    /// Hype score in [1,10]. Empty title and content always give 1.
    pub fn score(&self, story: &StoryContent) -> Score {
        self.measure(story, None).0
    }

    /// Same score as [`HypeScorer::score`], plus the matched terms and signal parts.
    pub fn explain(&self, story: &StoryContent) -> HypeBreakdown {
        let mut hits = Vec::new();
        let (score, lexicon_signal, emphasis_signal, emphasis) =
            self.measure(story, Some(&mut hits));
        HypeBreakdown {
            score,
            lexicon_signal,
            emphasis_signal,
            raw_signal: lexicon_signal + emphasis_signal,
            emphasis,
            hits,
        }
    }

    fn measure(
        &self,
        story: &StoryContent,
        mut hits: Option<&mut Vec<Signal>>,
    ) -> (Score, f64, f64, Emphasis) {
        let title = normalize_text(&story.title);
        let content = normalize_text(&story.content);
        if title.is_empty() && content.is_empty() {
            return (Score::MIN, 0.0, 0.0, Emphasis::default());
        }

        let mut lexicon = 0.0f64;
        for (field, text, mult) in [
            (Field::Title, title.as_str(), self.cfg.title_weight),
            (Field::Content, content.as_str(), 1.0),
        ] {
            let tokens = tokenize(text);
            for m in self.matcher.find(&tokens) {
                let term = &self.terms[m.phrase];
                let w = term.weight * mult;
                lexicon += w;
                if let Some(out) = hits.as_deref_mut() {
                    out.push(Signal {
                        term: term.label.clone(),
                        weight: w,
                        field,
                        negated: false,
                    });
                }
            }
        }

        let emphasis = Emphasis::scan(&title, self.cfg.shout_min_len)
            .merge(Emphasis::scan(&content, self.cfg.shout_min_len));
        let emphasis_signal = (emphasis.single_bangs as f64 * self.cfg.exclamation_weight
            + emphasis.bang_runs as f64 * self.cfg.exclamation_run_weight
            + emphasis.shouted_words as f64 * self.cfg.shout_weight)
            .min(self.cfg.emphasis_cap);

        let score = hype_curve(lexicon + emphasis_signal, self.cfg.curve_scale);
        (score, lexicon, emphasis_signal, emphasis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScoringConfig, TermCfg};

    fn cfg(terms: &[(&str, f64)]) -> HypeConfig {
        let mut c = ScoringConfig::builtin().hype;
        c.terms = terms
            .iter()
            .map(|(t, w)| TermCfg::Weighted {
                term: t.to_string(),
                weight: *w,
            })
            .collect();
        c
    }

    fn story(title: &str, content: &str) -> StoryContent {
        StoryContent::new(title, content, "")
    }

    #[test]
    fn empty_story_is_minimum() {
        let s = HypeScorer::new(&cfg(&[("incredible", 1.0)])).unwrap();
        assert_eq!(s.score(&story("", "")), Score::MIN);
        assert_eq!(s.score(&story("  ", "\n\t")), Score::MIN);
    }

    #[test]
    fn title_hits_weigh_more() {
        let s = HypeScorer::new(&cfg(&[("incredible", 1.0)])).unwrap();
        let t = s.explain(&story("Incredible", ""));
        let c = s.explain(&story("", "incredible"));
        assert!((t.lexicon_signal - 1.5).abs() < 1e-9);
        assert!((c.lexicon_signal - 1.0).abs() < 1e-9);
        assert_eq!(t.hits[0].field, Field::Title);
    }

    #[test]
    fn repeated_terms_accumulate() {
        let s = HypeScorer::new(&cfg(&[("incredible", 1.0)])).unwrap();
        let one = s.score(&story("", "incredible"));
        let many = s.score(&story("", &"incredible ".repeat(12)));
        assert!(many > one);
        assert_eq!(many, Score::MAX);
    }

    #[test]
    fn emphasis_is_capped_and_secondary() {
        let s = HypeScorer::new(&cfg(&[("revolutionary", 2.0)])).unwrap();
        let bangs = s.explain(&story("Update!!!", &"Wow!!! ".repeat(50)));
        assert!((bangs.emphasis_signal - 2.0).abs() < 1e-9);
        assert_eq!(bangs.score.get(), 5);

        // vocabulary plus bangs never scores below vocabulary alone
        let words = s.score(&story("", "revolutionary revolutionary"));
        let both = s.score(&story("", "revolutionary!!! revolutionary!!!"));
        assert!(both >= words);
    }

    #[test]
    fn explain_agrees_with_score() {
        let s = HypeScorer::new(&ScoringConfig::builtin().hype).unwrap();
        let st = story(
            "An unprecedented breakthrough!",
            "A game-changing, mind-blowing launch.",
        );
        let b = s.explain(&st);
        assert_eq!(b.score, s.score(&st));
        assert!(b.hits.len() >= 4, "{:?}", b.hits);
    }

    #[test]
    fn rejects_bad_weight() {
        assert!(HypeScorer::new(&cfg(&[("wow", f64::NAN)])).is_err());
    }
}
