//! Rule-based theme assignment.
//!
//! A [`ThemeDictionary`] maps each theme label to trigger phrases. A theme is
//! assigned when any trigger occurs, case-insensitively, as a substring of any
//! of the review's keywords (or of its raw text when it has no keywords).
//! Labels come out sorted, so the result never depends on dictionary or
//! keyword order. No match yields the single label [`OTHER_THEME`].

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label used when nothing matches.
pub const OTHER_THEME: &str = "Other";

/// Separator used when a theme set is rendered as a single field.
pub const THEME_SEPARATOR: &str = ", ";

/// Immutable theme → trigger phrase table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, Vec<String>>", into = "IndexMap<String, Vec<String>>")]
pub struct ThemeDictionary {
    themes: IndexMap<String, Vec<String>>,
}

impl ThemeDictionary {
    /// Builds a dictionary, lowercasing triggers and dropping blank ones.
    ///
    /// Labels are trimmed; a blank label is dropped together with its
    /// triggers.
    pub fn new<I, L, T>(themes: I) -> Self
    where
        I: IntoIterator<Item = (L, Vec<T>)>,
        L: Into<String>,
        T: AsRef<str>,
    {
        let mut table: IndexMap<String, Vec<String>> = IndexMap::new();
        for (label, triggers) in themes {
            let label = label.into().trim().to_string();
            if label.is_empty() {
                continue;
            }
            let entry = table.entry(label).or_default();
            for trigger in triggers {
                let trigger = trigger.as_ref().trim().to_lowercase();
                if !trigger.is_empty() && !entry.contains(&trigger) {
                    entry.push(trigger);
                }
            }
        }
        Self { themes: table }
    }

    /// The banking dictionary used when no `[themes]` table is configured.
    pub fn banking() -> Self {
        Self::new([
            (
                "Account Access Issues",
                vec!["login", "password", "account", "otp", "verification"],
            ),
            (
                "Transaction Performance",
                vec!["transfer", "payment", "slow", "failed", "transaction"],
            ),
            (
                "User Interface & Experience",
                vec!["ui", "interface", "experience", "navigation", "easy", "design"],
            ),
            (
                "Customer Support",
                vec!["support", "customer service", "help", "response", "call"],
            ),
            (
                "Feature Requests",
                vec!["feature", "option", "add", "request", "improve"],
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    pub fn triggers(&self, label: &str) -> Option<&[String]> {
        self.themes.get(label).map(Vec::as_slice)
    }

    /// Themes whose triggers occur in any of `phrases`.
    pub fn matching<'p, I>(&self, phrases: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'p str>,
    {
        let lowered: Vec<String> = phrases.into_iter().map(str::to_lowercase).collect();
        self.themes
            .iter()
            .filter(|(_, triggers)| {
                triggers
                    .iter()
                    .any(|t| lowered.iter().any(|p| p.contains(t.as_str())))
            })
            .map(|(label, _)| label.clone())
            .collect()
    }

    /// Themes for one review's keywords, or `["Other"]`.
    pub fn assign<S: AsRef<str>>(&self, keywords: &[S]) -> Vec<String> {
        with_fallback(self.matching(keywords.iter().map(AsRef::as_ref)))
    }

    /// Keyword matching first; raw text only when the review has no keywords.
    pub fn assign_with_text<S: AsRef<str>>(&self, keywords: &[S], text: &str) -> Vec<String> {
        if keywords.is_empty() {
            with_fallback(self.matching([text]))
        } else {
            self.assign(keywords)
        }
    }
}

impl Default for ThemeDictionary {
    fn default() -> Self {
        Self::banking()
    }
}

impl From<IndexMap<String, Vec<String>>> for ThemeDictionary {
    fn from(themes: IndexMap<String, Vec<String>>) -> Self {
        Self::new(themes)
    }
}

impl From<ThemeDictionary> for IndexMap<String, Vec<String>> {
    fn from(dict: ThemeDictionary) -> Self {
        dict.themes
    }
}

fn with_fallback(themes: BTreeSet<String>) -> Vec<String> {
    if themes.is_empty() {
        vec![OTHER_THEME.to_string()]
    } else {
        themes.into_iter().collect()
    }
}

/// Joins labels into the single `identified_theme` field.
pub fn render_themes<S: AsRef<str>>(themes: &[S]) -> String {
    themes
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(THEME_SEPARATOR)
}
