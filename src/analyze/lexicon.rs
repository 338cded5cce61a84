// src/analyze/lexicon.rs
//! Compiled phrase matcher over lower-cased tokens.
//!
//! Phrases are tokenized with the same tokenizer as the scanned text, so
//! "game-changing" and "game changing" compile to the same word sequence.
//! Any word may end in `*` for a prefix match (`layoff*` hits "layoffs",
//! `sell* user data` hits "selling user data").
//!
//! Matching is leftmost-longest and non-overlapping: at each token position the
//! longest phrase that fits wins and consumes its tokens. Ties on length go to
//! the phrase declared first.

use std::collections::{HashMap, HashSet};

use crate::error::LexiconError;
use crate::text::{words, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Word {
    Exact(String),
    Prefix(String),
}

impl Word {
    #[inline]
    fn matches(&self, tok: &str) -> bool {
        match self {
            Word::Exact(w) => tok == w,
            Word::Prefix(p) => tok.starts_with(p.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
struct Phrase {
    words: Vec<Word>,
}

/// One non-overlapping phrase occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseMatch {
    /// Index of the phrase in the order it was compiled.
    pub phrase: usize,
    /// Index of the first matched token.
    pub first: usize,
    /// Number of tokens consumed.
    pub len: usize,
}

impl PhraseMatch {
    pub fn end(&self) -> usize {
        self.first + self.len
    }
}

/// Immutable matcher built once per lexicon table.
#[derive(Debug, Clone, Default)]
pub struct PhraseMatcher {
    phrases: Vec<Phrase>,
    by_first: HashMap<String, Vec<usize>>,
    prefix_first: Vec<usize>,
}

impl PhraseMatcher {
    /// Compile `phrases` (in order). `context` only feeds error messages.
    pub fn compile<S: AsRef<str>>(phrases: &[S], context: &str) -> Result<Self, LexiconError> {
        let mut out = PhraseMatcher::default();
        let mut seen = HashSet::new();

        for raw in phrases {
            let words = parse_phrase(raw.as_ref(), context)?;
            let key = canonical_key(&words);
            if !seen.insert(key) {
                return Err(LexiconError::DuplicatePhrase {
                    phrase: raw.as_ref().trim().to_string(),
                    context: context.to_string(),
                });
            }

            let id = out.phrases.len();
            match &words[0] {
                Word::Exact(w) => out.by_first.entry(w.clone()).or_default().push(id),
                Word::Prefix(_) => out.prefix_first.push(id),
            }
            out.phrases.push(Phrase { words });
        }

        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Scan `tokens` and return all non-overlapping matches in text order.
    pub fn find(&self, tokens: &[Token]) -> Vec<PhraseMatch> {
        let mut hits = Vec::new();
        if self.phrases.is_empty() {
            return hits;
        }

        let mut i = 0;
        while i < tokens.len() {
            match self.longest_at(tokens, i) {
                Some(m) => {
                    i = m.end();
                    hits.push(m);
                }
                None => i += 1,
            }
        }
        hits
    }

    fn longest_at(&self, tokens: &[Token], at: usize) -> Option<PhraseMatch> {
        let first = tokens[at].text.as_str();
        let exact = self.by_first.get(first).map(Vec::as_slice).unwrap_or(&[]);

        let mut best: Option<PhraseMatch> = None;
        for &id in exact.iter().chain(self.prefix_first.iter()) {
            let words = &self.phrases[id].words;
            if at + words.len() > tokens.len() {
                continue;
            }
            let fits = words
                .iter()
                .zip(&tokens[at..])
                .all(|(w, t)| w.matches(t.text.as_str()));
            if !fits {
                continue;
            }
            let better = match best {
                None => true,
                Some(b) => words.len() > b.len || (words.len() == b.len && id < b.phrase),
            };
            if better {
                best = Some(PhraseMatch {
                    phrase: id,
                    first: at,
                    len: words.len(),
                });
            }
        }
        best
    }
}

fn parse_phrase(raw: &str, context: &str) -> Result<Vec<Word>, LexiconError> {
    let trimmed = raw.trim();
    let misplaced = || LexiconError::MisplacedWildcard {
        phrase: trimmed.to_string(),
        context: context.to_string(),
    };

    let mut out = Vec::new();
    for chunk in trimmed.split_whitespace() {
        let stars = chunk.matches('*').count();
        let body = chunk.trim_end_matches('*');
        let wildcard = stars > 0;
        if wildcard
            && (stars != 1
                || !chunk.ends_with('*')
                || !body.chars().last().is_some_and(char::is_alphanumeric))
        {
            return Err(misplaced());
        }

        let mut ws: Vec<Word> = words(body).into_iter().map(Word::Exact).collect();
        if wildcard {
            match ws.pop() {
                Some(Word::Exact(last)) => ws.push(Word::Prefix(last)),
                _ => return Err(misplaced()),
            }
        }
        out.extend(ws);
    }

    if out.is_empty() {
        return Err(LexiconError::EmptyPhrase {
            context: context.to_string(),
        });
    }
    Ok(out)
}

fn canonical_key(words: &[Word]) -> String {
    words
        .iter()
        .map(|w| match w {
            Word::Exact(s) => s.clone(),
            Word::Prefix(p) => format!("{p}*"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize;

    fn hits(m: &PhraseMatcher, text: &str) -> Vec<usize> {
        m.find(&tokenize(text)).into_iter().map(|h| h.phrase).collect()
    }

    #[test]
    fn longest_phrase_wins_and_consumes() {
        let m = PhraseMatcher::compile(&["consent", "without consent", "data"], "test").unwrap();
        // "without consent" swallows "consent"; "data" still hits on its own
        assert_eq!(hits(&m, "They collect data without consent."), vec![2, 1]);
    }

    #[test]
    fn hyphen_and_space_spellings_match() {
        let m = PhraseMatcher::compile(&["game-changing"], "test").unwrap();
        assert_eq!(hits(&m, "A game changing idea"), vec![0]);
        assert_eq!(hits(&m, "A GAME-CHANGING idea"), vec![0]);
    }

    #[test]
    fn prefix_wildcards() {
        let m = PhraseMatcher::compile(&["layoff*", "replac* work*"], "test").unwrap();
        assert_eq!(hits(&m, "Layoffs follow; AI is replacing workers"), vec![0, 1]);
        assert!(hits(&m, "a replacement part").is_empty());

        for bad in ["lay*off", "layoff**", "re* *", "data-*"] {
            assert!(
                matches!(
                    PhraseMatcher::compile(&[bad], "test"),
                    Err(LexiconError::MisplacedWildcard { .. })
                ),
                "{bad}"
            );
        }
    }

    #[test]
    fn repeated_hits_all_count() {
        let m = PhraseMatcher::compile(&["incredible"], "test").unwrap();
        assert_eq!(hits(&m, "incredible, incredible, INCREDIBLE").len(), 3);
    }

    #[test]
    fn rejects_empty_and_duplicates() {
        assert!(matches!(
            PhraseMatcher::compile(&["  "], "test"),
            Err(LexiconError::EmptyPhrase { .. })
        ));
        assert!(matches!(
            PhraseMatcher::compile(&["Paradigm Shift", "paradigm-shift"], "test"),
            Err(LexiconError::DuplicatePhrase { .. })
        ));
        assert!(matches!(
            PhraseMatcher::compile(&["*"], "test"),
            Err(LexiconError::MisplacedWildcard { .. })
        ));
    }

    #[test]
    fn phrase_must_not_run_past_end() {
        let m = PhraseMatcher::compile(&["paradigm shift"], "test").unwrap();
        assert!(hits(&m, "a paradigm").is_empty());
        assert!(hits(&m, "").is_empty());
    }
}
