// src/text.rs
//! Tokenizer and small lexical helpers shared by the scorers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)\w+(?:'\w+)*").expect("tokenizer regex"));

static SHOUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)\b\p{Lu}+\b").expect("shout regex"));

static BANG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[!！]+").expect("bang regex"));

/// A single lower-cased token with byte span, sequential index and clause number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
    /// 0-based token index in the sequence
    pub index: usize,
    /// Bumped every time sentence/clause punctuation separates two tokens.
    pub clause: usize,
}

/// Unicode word tokenizer. Apostrophes inside words are kept (`don't`), hyphens split.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let mut clause = 0usize;
    let mut prev_end = 0usize;

    for (i, m) in WORD_RE.find_iter(input).enumerate() {
        if i > 0 && input[prev_end..m.start()].chars().any(is_clause_break) {
            clause += 1;
        }
        out.push(Token {
            text: m.as_str().to_lowercase(),
            start: m.start(),
            end: m.end(),
            index: i,
            clause,
        });
        prev_end = m.end();
    }
    out
}

/// Lower-cased words only, used for compiling lexicon phrases.
pub fn words(input: &str) -> Vec<String> {
    WORD_RE
        .find_iter(input)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

fn is_clause_break(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | ';' | ':' | '!' | '?' | '(' | ')' | '[' | ']' | '\n' | '\u{2014}' | '\u{2013}'
    )
}

/// Negators that flip the polarity of a following ethics term.
pub fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "without"
            | "nor"
            | "neither"
            | "cannot"
            | "can't"
            | "don't"
            | "doesn't"
            | "didn't"
            | "won't"
            | "isn't"
            | "aren't"
            | "wasn't"
            | "weren't"
            | "lacks"
            | "lacking"
    )
}

/// Conjunctions end a negation's reach ("no fines and sells data" does not negate "sells").
pub fn is_scope_breaker(tok: &str) -> bool {
    matches!(
        tok,
        "and" | "but" | "or" | "while" | "although" | "though" | "yet" | "whereas"
    )
}

/// Words that turn a preceding negator into emphasis ("not only", "not just").
pub fn is_focus_particle(tok: &str) -> bool {
    matches!(tok, "only" | "just" | "merely" | "simply")
}

/// Emphasis markers found in raw (un-lowercased) text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Emphasis {
    /// Runs of exactly one `!`.
    pub single_bangs: usize,
    /// Runs of two or more `!`.
    pub bang_runs: usize,
    /// Fully upper-case words of at least the configured length.
    pub shouted_words: usize,
}

impl Emphasis {
    pub fn scan(raw: &str, shout_min_len: usize) -> Self {
        let mut e = Emphasis::default();
        for m in BANG_RE.find_iter(raw) {
            if m.as_str().chars().count() >= 2 {
                e.bang_runs += 1;
            } else {
                e.single_bangs += 1;
            }
        }
        e.shouted_words = SHOUT_RE
            .find_iter(raw)
            .filter(|m| m.as_str().chars().count() >= shout_min_len)
            .count();
        e
    }

    pub fn merge(self, other: Emphasis) -> Emphasis {
        Emphasis {
            single_bangs: self.single_bangs + other.single_bangs,
            bang_runs: self.bang_runs + other.bang_runs,
            shouted_words: self.shouted_words + other.shouted_words,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_basic() {
        let toks = tokenize("The App doesn't sell data.");
        assert_eq!(
            toks.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["the", "app", "doesn't", "sell", "data"]
        );
        assert!(toks[1].start < toks[1].end);
        assert_eq!(toks[4].index, 4);
    }

    #[test]
    fn hyphens_split_into_words() {
        assert_eq!(words("Game-Changing"), vec!["game", "changing"]);
        assert_eq!(words("end-to-end encryption").len(), 4);
    }

    #[test]
    fn clauses_follow_punctuation() {
        let toks = tokenize("no fines, sells data; done\nnext");
        let clauses: Vec<usize> = toks.iter().map(|t| t.clause).collect();
        assert_eq!(clauses, vec![0, 0, 1, 1, 2, 3]);
    }

    #[test]
    fn unicode_words_are_lowercased() {
        let toks = tokenize("ÜBER Straße");
        assert_eq!(toks[0].text, "über");
        assert_eq!(toks[1].text, "straße");
    }

    #[test]
    fn emphasis_counts_runs_and_shouting() {
        let e = Emphasis::scan("WOW! This is HUGE!!! REVOLUTIONARY AI", 5);
        assert_eq!(e.single_bangs, 1);
        assert_eq!(e.bang_runs, 1);
        // HUGE is 4 letters, AI is 2 letters
        assert_eq!(e.shouted_words, 1);
    }

    #[test]
    fn negators_and_breakers() {
        assert!(is_negator("without"));
        assert!(is_negator("doesn't"));
        assert!(!is_negator("know"));
        assert!(is_scope_breaker("and"));
        assert!(is_focus_particle("only"));
        assert!(!is_focus_particle("sell"));
    }
}
