//! Lexicon-based sentiment scoring.
//!
//! Each token found in the lexicon contributes its polarity. A preceding
//! intensifier ("very", "extremely", ...) scales it, a preceding negation
//! ("not", "never", "don't", ...) flips and damps it by `-0.5`. The review's
//! polarity is the mean over contributing tokens, clamped to `[-1, 1]`.
//! Text without any lexicon hit scores exactly `0.0`.

use std::{collections::HashMap, fmt};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Polarity strictly above this is positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Polarity strictly below this is negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

const NEGATION_FACTOR: f64 = -0.5;

static LEXICON: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        // positive
        ("good", 0.7),
        ("great", 0.8),
        ("excellent", 1.0),
        ("amazing", 0.6),
        ("awesome", 1.0),
        ("wonderful", 1.0),
        ("fantastic", 0.4),
        ("perfect", 1.0),
        ("best", 1.0),
        ("better", 0.5),
        ("nice", 0.6),
        ("love", 0.5),
        ("loved", 0.7),
        ("like", 0.2),
        ("happy", 0.8),
        ("easy", 0.43),
        ("simple", 0.2),
        ("fast", 0.2),
        ("quick", 0.33),
        ("smooth", 0.4),
        ("reliable", 0.5),
        ("secure", 0.4),
        ("safe", 0.5),
        ("helpful", 0.5),
        ("convenient", 0.4),
        ("useful", 0.3),
        ("friendly", 0.38),
        ("beautiful", 0.85),
        ("impressive", 1.0),
        ("satisfied", 0.5),
        ("recommend", 0.4),
        ("thanks", 0.2),
        ("thank", 0.2),
        ("wow", 0.1),
        ("cool", 0.35),
        ("efficient", 0.5),
        ("working", 0.2),
        ("works", 0.2),
        ("improved", 0.4),
        ("superb", 1.0),
        // negative
        ("bad", -0.7),
        ("worse", -0.4),
        ("worst", -1.0),
        ("terrible", -1.0),
        ("horrible", -1.0),
        ("awful", -1.0),
        ("poor", -0.4),
        ("useless", -0.5),
        ("hate", -0.8),
        ("annoying", -0.8),
        ("disappointed", -0.75),
        ("disappointing", -0.6),
        ("frustrating", -0.6),
        ("slow", -0.3),
        ("error", -0.4),
        ("errors", -0.4),
        ("fail", -0.5),
        ("fails", -0.5),
        ("failed", -0.5),
        ("failing", -0.5),
        ("failure", -0.5),
        ("crash", -0.6),
        ("crashes", -0.6),
        ("crashed", -0.6),
        ("crashing", -0.6),
        ("bug", -0.4),
        ("bugs", -0.4),
        ("buggy", -0.5),
        ("broken", -0.6),
        ("stuck", -0.4),
        ("problem", -0.3),
        ("problems", -0.3),
        ("issue", -0.2),
        ("issues", -0.2),
        ("difficult", -0.5),
        ("confusing", -0.4),
        ("unreliable", -0.5),
        ("waste", -0.6),
        ("scam", -0.8),
        ("stupid", -0.8),
        ("rubbish", -0.8),
        ("lag", -0.3),
        ("laggy", -0.4),
        ("freeze", -0.4),
        ("freezes", -0.4),
        ("unable", -0.5),
        ("wrong", -0.5),
        ("nothing", -0.1),
        ("boring", -1.0),
        ("disgusting", -1.0),
        ("pathetic", -1.0),
    ]
    .into_iter()
    .collect()
});

static INTENSIFIERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("very", 1.3),
        ("really", 1.3),
        ("so", 1.3),
        ("too", 1.2),
        ("extremely", 1.5),
        ("super", 1.3),
        ("totally", 1.3),
        ("absolutely", 1.4),
        ("quite", 1.1),
        ("somewhat", 0.7),
        ("slightly", 0.5),
        ("bit", 0.6),
    ]
    .into_iter()
    .collect()
});

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "dont", "don't", "doesnt", "doesn't", "didnt", "didn't", "isnt",
    "isn't", "wasnt", "wasn't", "cant", "can't", "cannot", "wont", "won't", "aint", "ain't",
    "nor", "without",
];

/// Three-way sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Applies the fixed thresholds; `0.1` and `-0.1` themselves are neutral.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if polarity < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label plus the polarity it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    /// Polarity in `[-1, 1]`.
    pub score: f64,
}

impl Sentiment {
    pub const NEUTRAL: Sentiment = Sentiment {
        label: SentimentLabel::Neutral,
        score: 0.0,
    };
}

/// Scores `text`. Empty or whitespace-only input is `(neutral, 0.0)`.
pub fn classify(text: &str) -> Sentiment {
    if text.trim().is_empty() {
        return Sentiment::NEUTRAL;
    }

    let score = polarity(text);
    Sentiment {
        label: SentimentLabel::from_polarity(score),
        score,
    }
}

/// Missing text is scored like empty text.
pub fn classify_opt(text: Option<&str>) -> Sentiment {
    text.map_or(Sentiment::NEUTRAL, classify)
}

/// Mean polarity of the lexicon hits in `text`, `0.0` if there are none.
pub fn polarity(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .collect();

    let mut total = 0.0;
    let mut hits = 0usize;

    for (idx, token) in tokens.iter().enumerate() {
        let Some(&base) = LEXICON.get(token) else {
            continue;
        };

        let mut value = base;
        let mut lookback = idx;
        // An intensifier and a negation may both precede the word ("not very good").
        for _ in 0..2 {
            if lookback == 0 {
                break;
            }
            lookback -= 1;
            let prev = tokens[lookback];
            if let Some(&factor) = INTENSIFIERS.get(prev) {
                value *= factor;
            } else if NEGATIONS.contains(&prev) {
                value *= NEGATION_FACTOR;
                break;
            } else {
                break;
            }
        }

        total += value.clamp(-1.0, 1.0);
        hits += 1;
    }

    if hits == 0 {
        return 0.0;
    }
    (total / hits as f64).clamp(-1.0, 1.0)
}
