//! Retrieved passages and their deduplicated collection.

use faqbot_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// A scored hit from the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// Primary key in the index
    pub id: String,

    /// Passage text, also the deduplication key
    pub text: String,

    /// Page the passage was scraped from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,

    /// Similarity in [0, 1], higher is more similar
    pub relevance_score: f32,
}

impl Passage {
    /// Build a passage, rejecting hits without a usable score.
    ///
    /// An unscored hit or a score outside [0, 1] means the index broke its
    /// contract, which is reported as `RetrievalUnavailable`.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        source_uri: Option<String>,
        score: Option<f32>,
    ) -> AppResult<Self> {
        let id = id.into();
        let relevance_score = match score {
            Some(score) if score.is_finite() && (0.0..=1.0).contains(&score) => score,
            Some(score) => {
                return Err(AppError::RetrievalUnavailable(format!(
                    "passage '{}' has score {} outside [0, 1]",
                    id, score
                )))
            }
            None => {
                return Err(AppError::RetrievalUnavailable(format!(
                    "passage '{}' has no relevance score",
                    id
                )))
            }
        };

        Ok(Self {
            id,
            text: text.into(),
            source_uri,
            relevance_score,
        })
    }

    /// First `max_graphemes` user-perceived characters of the text, with an
    /// ellipsis when cut.
    pub fn snippet(&self, max_graphemes: usize) -> String {
        let mut graphemes = self.text.graphemes(true);
        let head: String = graphemes.by_ref().take(max_graphemes).collect();
        if graphemes.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }
}

/// Passages keyed by exact text, in first-seen order.
///
/// Inserting a passage whose text is already present is a no-op, so the
/// metadata of the first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct PassageSet {
    passages: Vec<Passage>,
    seen: HashSet<String>,
}

impl PassageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `passage` unless its text was seen before. Returns whether it was kept.
    pub fn insert(&mut self, passage: Passage) -> bool {
        if self.seen.contains(&passage.text) {
            return false;
        }
        self.seen.insert(passage.text.clone());
        self.passages.push(passage);
        true
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub fn contains_text(&self, text: &str) -> bool {
        self.seen.contains(text)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Passage> {
        self.passages.iter()
    }

    pub fn as_slice(&self) -> &[Passage] {
        &self.passages
    }

    pub fn into_vec(self) -> Vec<Passage> {
        self.passages
    }
}

impl Extend<Passage> for PassageSet {
    fn extend<I: IntoIterator<Item = Passage>>(&mut self, iter: I) {
        for passage in iter {
            self.insert(passage);
        }
    }
}

impl FromIterator<Passage> for PassageSet {
    fn from_iter<I: IntoIterator<Item = Passage>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a PassageSet {
    type Item = &'a Passage;
    type IntoIter = std::slice::Iter<'a, Passage>;

    fn into_iter(self) -> Self::IntoIter {
        self.passages.iter()
    }
}
