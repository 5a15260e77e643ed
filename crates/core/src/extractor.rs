//! Best-effort place-name extraction from free-text tourism queries.
//!
//! Extraction runs three ordered stages and the first one that produces a
//! usable candidate wins:
//!
//! 1. trigger phrases ("go to", "weather", "in", ...) around a capitalized run,
//! 2. the first Title-Case word sequence that is not a reserved word,
//! 3. the whole input when it is at most two words long.
//!
//! The result is a heuristic guess, not a gazetteer lookup. Downstream
//! geocoding decides whether the candidate is a real place.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ExtractionStage, PlaceCandidate};

/// One or more whitespace-separated words that each start with an uppercase letter.
const CAPITALIZED_PHRASE: &str = r"\p{Lu}\p{L}*(?:\s+\p{Lu}\p{L}*)*";

const DESTINATION_STOP_WORDS: &[&str] = &["let", "what", "and", "or"];
const PREPOSITION_STOP_WORDS: &[&str] = &["it", "the", "these"];

const RESERVED_WORDS: &[&str] = &[
    "I", "I'm", "Let", "Let's", "What", "Where", "When", "How", "The", "This", "That", "These",
    "Those", "And", "Or", "But",
];

const PLACE_KEYWORDS: &[&str] = &[
    "weather",
    "temperature",
    "places",
    "attractions",
    "visit",
    "go",
    "travel",
];

const MIN_CANDIDATE_CHARS: usize = 3;
const SIMPLE_QUERY_MAX_WORDS: usize = 3;
const SHORT_INPUT_MAX_WORDS: usize = 2;

struct PlacePattern {
    stage: ExtractionStage,
    regex: Regex,
    stop_words: &'static [&'static str],
}

impl PlacePattern {
    fn new(
        stage: ExtractionStage,
        pattern: &str,
        stop_words: &'static [&'static str],
    ) -> Self {
        Self {
            stage,
            regex: Regex::new(pattern).expect("valid place pattern"),
            stop_words,
        }
    }

    fn capture<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|group| group.as_str())
    }
}

static PLACE_PATTERNS: Lazy<Vec<PlacePattern>> = Lazy::new(|| {
    vec![
        PlacePattern::new(
            ExtractionStage::Destination,
            &format!(
                r"\b(?i:planning to visit|going to|go to|visit|travel to|heading to)\s+(?:(?i:the)\s+)?({CAPITALIZED_PHRASE})"
            ),
            DESTINATION_STOP_WORDS,
        ),
        PlacePattern::new(
            ExtractionStage::WeatherPhrase,
            &format!(r"({CAPITALIZED_PHRASE})\s+(?i:weather|temperature|climate)\b"),
            &[],
        ),
        PlacePattern::new(
            ExtractionStage::AttractionsPhrase,
            &format!(r"({CAPITALIZED_PHRASE})\s+(?i:places|attractions|tourist|sights)\b"),
            &[],
        ),
        PlacePattern::new(
            ExtractionStage::InPreposition,
            &format!(r"\b(?i:in)\s+({CAPITALIZED_PHRASE})"),
            PREPOSITION_STOP_WORDS,
        ),
        PlacePattern::new(
            ExtractionStage::AtPreposition,
            &format!(r"\b(?i:at)\s+({CAPITALIZED_PHRASE})"),
            PREPOSITION_STOP_WORDS,
        ),
    ]
});

static TITLE_CASE_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+)*\b").expect("valid title-case regex")
});

static FILLER_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:the|a|an|to|in|at|for|with)\b").expect("valid filler regex")
});

/// Extracts a candidate place name, or `None` when nothing looks like one.
pub fn extract_place_name(text: &str) -> Option<String> {
    extract_place(text).map(|candidate| candidate.name)
}

/// Like [`extract_place_name`] but hands back the trimmed input on no match,
/// so callers always have something to geocode.
pub fn extract_place_or_input(text: &str) -> String {
    extract_place_name(text).unwrap_or_else(|| text.trim().to_string())
}

/// Runs the extraction stages in order and reports which one matched.
pub fn extract_place(text: &str) -> Option<PlaceCandidate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    match_patterns(text)
        .or_else(|| match_capitalized_run(text))
        .or_else(|| match_short_input(trimmed))
}

/// Removes stand-alone filler words and collapses the leftover whitespace.
pub fn clean_candidate(raw: &str) -> String {
    normalize_text(&FILLER_WORDS.replace_all(raw, ""))
}

fn normalize_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn match_patterns(text: &str) -> Option<PlaceCandidate> {
    PLACE_PATTERNS.iter().find_map(|pattern| {
        let captured = pattern.capture(text)?;
        let phrase = cut_at_stop_word(captured, pattern.stop_words);
        let name = clean_candidate(&phrase);

        // too-short captures fall through to the next pattern
        long_enough(&name).then_some(PlaceCandidate {
            name,
            stage: pattern.stage,
        })
    })
}

fn match_capitalized_run(text: &str) -> Option<PlaceCandidate> {
    let lower = text.to_lowercase();
    let qualifies =
        contains_any(&lower, PLACE_KEYWORDS) || word_count(text) <= SIMPLE_QUERY_MAX_WORDS;

    TITLE_CASE_RUN
        .find_iter(text)
        .map(|run| run.as_str())
        .filter(|run| !RESERVED_WORDS.contains(run))
        .find(|run| long_enough(run))
        .filter(|_| qualifies)
        .map(|run| PlaceCandidate {
            name: run.to_string(),
            stage: ExtractionStage::CapitalizedRun,
        })
}

fn match_short_input(trimmed: &str) -> Option<PlaceCandidate> {
    (word_count(trimmed) <= SHORT_INPUT_MAX_WORDS).then(|| PlaceCandidate {
        name: trimmed.to_string(),
        stage: ExtractionStage::ShortInput,
    })
}

/// The first word of a capture always belongs to the place; any later stop
/// word ends the phrase.
fn cut_at_stop_word(captured: &str, stop_words: &[&str]) -> String {
    let mut words = Vec::new();
    for (index, word) in captured.split_whitespace().enumerate() {
        if index > 0
            && stop_words
                .iter()
                .any(|stop| word.eq_ignore_ascii_case(stop))
        {
            break;
        }
        words.push(word);
    }
    words.join(" ")
}

fn long_enough(candidate: &str) -> bool {
    candidate.chars().count() >= MIN_CANDIDATE_CHARS
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
