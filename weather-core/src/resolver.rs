//! Free-text city name resolution against the gazetteer.
//!
//! Stages run in a fixed order and the first hit wins:
//! alias substitution, suffix stripping, exact match, substring match and
//! finally a fuzzy match on normalized Levenshtein similarity.

use std::{
    collections::HashMap,
    sync::{Arc, LazyLock},
};

use regex::Regex;
use tracing::debug;

use crate::{gazetteer::Gazetteer, model::ResolutionResult};

/// Minimum similarity accepted by the fuzzy stage.
pub const FUZZY_CUTOFF: f64 = 0.8;

static SUFFIX_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:city|district)\b").expect("valid suffix pattern"));

const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("delhi", "new delhi"),
    ("bombay", "mumbai"),
    ("bangalore", "bengaluru"),
    ("madras", "chennai"),
    ("calcutta", "kolkata"),
];

/// Colloquial name -> canonical name, both lowercase.
#[derive(Debug, Clone)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl Default for AliasTable {
    fn default() -> Self {
        let aliases = BUILTIN_ALIASES
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self { aliases }
    }
}

impl AliasTable {
    /// Built-in aliases plus `extra`; `extra` wins on conflicting keys.
    pub fn with_extra<'a, I>(extra: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut table = Self::default();
        for (k, v) in extra {
            table.aliases.insert(k.trim().to_lowercase(), v.trim().to_lowercase());
        }
        table
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.aliases.get(key).map(String::as_str)
    }
}

/// Maps raw user text onto a gazetteer entry.
#[derive(Debug, Clone)]
pub struct CityResolver {
    gazetteer: Arc<Gazetteer>,
    aliases: AliasTable,
}

impl CityResolver {
    pub fn new(gazetteer: Arc<Gazetteer>, aliases: AliasTable) -> Self {
        Self { gazetteer, aliases }
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    pub fn resolve(&self, raw: &str) -> ResolutionResult {
        if raw.trim().is_empty() {
            return ResolutionResult::Unresolved;
        }

        // An input of only suffix words leaves an empty query, which the
        // substring stage matches against the first stored entry.
        let query = self.normalize(raw);

        let entries = self.gazetteer.entries();
        let lowered: Vec<String> = entries.iter().map(|e| e.name.to_lowercase()).collect();

        let hit = lowered
            .iter()
            .position(|name| *name == query)
            .inspect(|_| debug!(%query, "exact match"))
            .or_else(|| {
                lowered
                    .iter()
                    .position(|name| name.contains(&query))
                    .inspect(|_| debug!(%query, "substring match"))
            })
            .or_else(|| {
                closest_match(&query, &lowered).inspect(|i| {
                    debug!(%query, candidate = %lowered[*i], "fuzzy match")
                })
            });

        match hit {
            Some(i) => ResolutionResult::Resolved {
                id: entries[i].id.clone(),
                display_name: entries[i].name.clone(),
            },
            None => {
                debug!(%query, "no gazetteer match");
                ResolutionResult::Unresolved
            }
        }
    }

    fn normalize(&self, raw: &str) -> String {
        let lowered = raw.trim().to_lowercase();
        let aliased = self.aliases.get(&lowered).unwrap_or(lowered.as_str());
        strip_suffix_words(aliased)
    }
}

/// Removes whole-word `city`/`district` and collapses the remaining whitespace.
fn strip_suffix_words(text: &str) -> String {
    SUFFIX_WORDS.replace_all(text, "").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Index of the most similar candidate at or above the cutoff.
/// Ties keep the earliest candidate.
fn closest_match(query: &str, candidates: &[String]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, candidate) in candidates.iter().enumerate() {
        let score = strsim::normalized_levenshtein(query, candidate);
        if score < FUZZY_CUTOFF {
            continue;
        }
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((i, score));
        }
    }

    best.map(|(i, _)| i)
}
