// tests/pipeline_properties.rs
//! Invariants of the combined pipeline: range, determinism, empty input,
//! robustness against odd input and concurrent use.

use rand::{rngs::StdRng, Rng, SeedableRng};
use story_scorer::{
    score_story, EthicsScorer, HypeScorer, ImpactTag, Score, ScoringConfig, ScoringPipeline,
    StoryContent,
};

const VOCAB: &[&str] = &[
    "incredible", "layoffs", "end-to-end", "encryption", "not", "without", "consent",
    "sells", "user", "data", "and", "renewable", "energy", "the", "a", "company", "!!!",
    "REVOLUTIONARY", ",", ".", "carbon", "footprint", "injured", "open", "source",
    "paradigm", "shift", "quarterly", "revenue", "<b>", "</b>", "&amp;", "\n",
];

fn random_text(rng: &mut StdRng, max_words: usize) -> String {
    let n = rng.random_range(0..=max_words);
    let mut out = String::new();
    for _ in 0..n {
        if rng.random_range(0..10) == 0 {
            // occasional raw code point, including controls and astral planes
            let c = char::from_u32(rng.random_range(0..0x2_0000)).unwrap_or('\u{fffd}');
            out.push(c);
        } else {
            out.push_str(VOCAB[rng.random_range(0..VOCAB.len())]);
        }
        out.push(' ');
    }
    out
}

fn random_story(rng: &mut StdRng) -> StoryContent {
    StoryContent::new(
        random_text(rng, 12),
        random_text(rng, 120),
        "https://example.com/x",
    )
}

fn in_range(s: Score) -> bool {
    (1..=10).contains(&s.get())
}

#[test]
fn scores_stay_in_range_on_random_input() {
    let mut rng = StdRng::seed_from_u64(0x5c0e);
    let p = ScoringPipeline::shared();
    for _ in 0..500 {
        let r = p.run(&random_story(&mut rng));
        assert!(in_range(r.hype_score), "{r:?}");
        assert!(in_range(r.ethics.score), "{r:?}");
    }
}

#[test]
fn identical_input_gives_identical_output() {
    let mut rng = StdRng::seed_from_u64(42);
    let p = ScoringPipeline::shared();
    let fresh = ScoringPipeline::new(&ScoringConfig::builtin()).unwrap();
    for _ in 0..200 {
        let s = random_story(&mut rng);
        let a = p.run(&s);
        assert_eq!(a, p.run(&s));
        assert_eq!(a, fresh.run(&s));
        assert_eq!(a, score_story(&s));
    }
}

#[test]
fn pipeline_from_separately_built_scorers_matches_shared() {
    let cfg = ScoringConfig::builtin();
    let p = ScoringPipeline::from_scorers(
        HypeScorer::new(&cfg.hype).unwrap(),
        EthicsScorer::new(&cfg.ethics).unwrap(),
    );
    let s = StoryContent::new(
        "Unprecedented layoffs",
        "The firm sells user data and skipped safety testing.",
        "",
    );
    let r = p.run(&s);
    assert_eq!(r, score_story(&s));
    let tags: Vec<ImpactTag> = r.impact_tags().iter().copied().collect();
    assert_eq!(tags, vec![ImpactTag::Privacy, ImpactTag::Labor, ImpactTag::Safety]);
}

#[test]
fn source_url_does_not_affect_scores() {
    let p = ScoringPipeline::shared();
    let a = StoryContent::new("Incredible layoffs", "It sells user data.", "https://a.example");
    let b = StoryContent::new("Incredible layoffs", "It sells user data.", "not even a url");
    assert_eq!(p.run(&a), p.run(&b));
}

#[test]
fn empty_story_is_minimum_hype_and_neutral_ethics() {
    let r = score_story(&StoryContent::default());
    assert_eq!(r.hype_score, Score::MIN);
    assert_eq!(r.ethics.score, Score::NEUTRAL);
    assert!(r.ethics.impact_tags.is_empty());

    let r = score_story(&StoryContent::new(" \t", "\n \n", ""));
    assert_eq!(r.hype_score.get(), 1);
    assert_eq!(r.ethics.score.get(), 5);
}

#[test]
fn very_long_input_is_handled() {
    let body = "Incredible breakthrough. The company sells user data without consent. "
        .repeat(20_000);
    let r = score_story(&StoryContent::new("Big news", body, ""));
    assert_eq!(r.hype_score, Score::MAX);
    assert_eq!(r.ethics.score, Score::MIN);
    assert!(r.ethics.has_tag(ImpactTag::Privacy));
}

#[test]
fn garbled_unicode_is_handled() {
    let junk = "\u{0}\u{feff}\u{202e}\u{1f600}\u{fffd}ﾟ･✿ヾ╲(｡◕‿◕｡)╱✿･ﾟ \u{301}\u{301}Zalgơ̸̢";
    let r = score_story(&StoryContent::new(junk, junk.repeat(50), junk));
    assert!(in_range(r.hype_score));
    assert_eq!(r.ethics.score, Score::NEUTRAL);

    let mixed = format!("{junk} layoffs {junk}");
    let r = score_story(&StoryContent::new("", mixed, ""));
    assert!(r.ethics.has_tag(ImpactTag::Labor));
}

#[test]
fn tags_are_unique_and_from_closed_vocabulary() {
    let r = score_story(&StoryContent::new(
        "Layoffs, layoffs, layoffs",
        "More layoffs. Job cuts. Laid off staff.",
        "",
    ));
    let tags: Vec<ImpactTag> = r.ethics.impact_tags.iter().copied().collect();
    assert_eq!(tags, vec![ImpactTag::Labor]);
    assert_eq!(r.to_record().ethical_impact_tags, vec!["labor".to_string()]);
}

#[test]
fn batch_keeps_input_order() {
    let mut rng = StdRng::seed_from_u64(7);
    let stories: Vec<StoryContent> = (0..50).map(|_| random_story(&mut rng)).collect();
    let p = ScoringPipeline::shared();
    let batch = p.run_batch(&stories);
    assert_eq!(batch.len(), stories.len());
    for (s, r) in stories.iter().zip(&batch) {
        assert_eq!(&p.run(s), r);
    }
}

#[test]
fn concurrent_scoring_matches_sequential() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ScoringPipeline>();

    let mut rng = StdRng::seed_from_u64(99);
    let stories: Vec<StoryContent> = (0..64).map(|_| random_story(&mut rng)).collect();
    let p = ScoringPipeline::shared();
    let expected = p.run_batch(&stories);

    let got: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = stories
            .chunks(8)
            .map(|chunk| scope.spawn(move || p.run_batch(chunk)))
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });
    assert_eq!(got, expected);
}
