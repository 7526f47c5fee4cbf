//! Grouped TF-IDF keyword extraction.
//!
//! Every group (usually one bank) is its own corpus and every review text one
//! document. Terms are lowercased `\w\w+` tokens with English stop words
//! removed, plus the bigrams formed from the remaining tokens. Scoring:
//!
//! * vocabulary capped at `max_features` terms by total count, ties going to
//!   the term seen first;
//! * smoothed idf, `ln((1 + n) / (1 + df)) + 1`, with `n` the group size;
//! * raw term counts times idf, each document row L2-normalized;
//! * terms ranked by their column sum, ties again going to the term seen first.
//!
//! A group with fewer than two documents that contain any term falls back to
//! raw term counts. A group with no terms at all yields no keywords.

use std::collections::{BTreeMap, HashMap, HashSet};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use stop_words::{LANGUAGE, get};
use tracing::debug;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

static STOP_WORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    get(LANGUAGE::English)
        .into_iter()
        .map(|w| w.to_lowercase())
        .collect()
});

/// Extraction knobs, usually read from the `[analysis]` config table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeywordConfig {
    /// Keywords kept per group.
    pub top_n: usize,
    /// Vocabulary cap per group; `0` disables the cap.
    pub max_features: usize,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            max_features: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTerm {
    pub term: String,
    pub score: f64,
}

/// Unigrams followed by bigrams of `text`, stop words removed.
pub fn terms(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !STOP_WORDS.contains(*t))
        .collect();

    let bigrams = tokens.windows(2).map(|w| format!("{} {}", w[0], w[1]));
    tokens
        .iter()
        .map(|t| t.to_string())
        .chain(bigrams)
        .collect()
}

/// Vocabulary of one group, in first-seen order.
#[derive(Debug)]
struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    fn build(docs: &[Vec<String>], max_features: usize) -> Self {
        let mut seen: IndexMap<&str, usize> = IndexMap::new();
        for term in docs.iter().flatten() {
            *seen.entry(term.as_str()).or_insert(0) += 1;
        }

        let mut kept: Vec<usize> = (0..seen.len()).collect();
        if max_features > 0 && kept.len() > max_features {
            // Stable sort: equal counts keep first-seen order.
            kept.sort_by(|&a, &b| seen[b].cmp(&seen[a]));
            kept.truncate(max_features);
            kept.sort_unstable();
        }

        let terms: Vec<String> = kept
            .into_iter()
            .filter_map(|i| seen.get_index(i).map(|(t, _)| t.to_string()))
            .collect();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { terms, index }
    }

    fn len(&self) -> usize {
        self.terms.len()
    }

    /// Term counts of one document, restricted to the vocabulary.
    fn counts(&self, doc: &[String]) -> BTreeMap<usize, f64> {
        let mut counts = BTreeMap::new();
        for term in doc {
            if let Some(&i) = self.index.get(term) {
                *counts.entry(i).or_insert(0.0) += 1.0;
            }
        }
        counts
    }
}

/// Scores the vocabulary of one group and returns the best `config.top_n`
/// terms, highest first.
pub fn rank_terms(texts: &[&str], config: &KeywordConfig) -> Vec<ScoredTerm> {
    if config.top_n == 0 {
        return Vec::new();
    }

    let docs: Vec<Vec<String>> = texts.iter().map(|t| terms(t)).collect();
    let non_empty = docs.iter().filter(|d| !d.is_empty()).count();
    if non_empty == 0 {
        return Vec::new();
    }

    let vocab = Vocabulary::build(&docs, config.max_features);
    let rows: Vec<BTreeMap<usize, f64>> = docs.iter().map(|d| vocab.counts(d)).collect();
    let mut scores = vec![0.0_f64; vocab.len()];

    if non_empty < 2 {
        for row in &rows {
            for (&i, &count) in row {
                scores[i] += count;
            }
        }
    } else {
        let n = docs.len() as f64;
        let mut df = vec![0.0_f64; vocab.len()];
        for row in &rows {
            for &i in row.keys() {
                df[i] += 1.0;
            }
        }
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d)).ln() + 1.0)
            .collect();

        for row in &rows {
            let weighted: Vec<(usize, f64)> =
                row.iter().map(|(&i, &tf)| (i, tf * idf[i])).collect();
            let norm = weighted.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm == 0.0 {
                continue;
            }
            for (i, w) in weighted {
                scores[i] += w / norm;
            }
        }
    }

    let mut order: Vec<usize> = (0..vocab.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    order
        .into_iter()
        .take(config.top_n)
        .map(|i| ScoredTerm {
            term: vocab.terms[i].clone(),
            score: scores[i],
        })
        .collect()
}

/// Top keywords per group for `(group, text)` rows.
///
/// Groups come out in order of first appearance. Every group present in the
/// input has an entry, possibly empty.
pub fn extract_top_keywords<'a, I>(rows: I, config: &KeywordConfig) -> IndexMap<String, Vec<String>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut groups: IndexMap<&'a str, Vec<&'a str>> = IndexMap::new();
    for (group, text) in rows {
        groups.entry(group).or_default().push(text);
    }

    groups
        .into_iter()
        .map(|(group, texts)| {
            let ranked = rank_terms(&texts, config);
            debug!(
                group,
                documents = texts.len(),
                keywords = ranked.len(),
                top = ranked.first().map(|t| t.term.as_str()).unwrap_or(""),
                "extracted keywords"
            );
            (
                group.to_string(),
                ranked.into_iter().map(|t| t.term).collect(),
            )
        })
        .collect()
}
