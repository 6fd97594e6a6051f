//! TF-IDF keyword extraction for naming clusters.
//!
//! Weighting follows the common smooth-idf convention:
//! - tokens are lower-cased runs of two or more word characters
//! - English stopwords are dropped
//! - the vocabulary keeps the `max_features` most frequent terms (ties
//!   alphabetical) and is then ordered alphabetically
//! - `tf` is the raw count, `idf = ln((1 + n) / (1 + df)) + 1`
//! - each document row is L2-normalized
//!
//! A term's score is its mean weight over the member documents.

use std::collections::BTreeMap;

use crate::stopwords::is_stopword;

/// Extracts the most discriminative terms of a group of texts.
#[derive(Debug, Clone, Copy)]
pub struct KeywordExtractor {
    top_k: usize,
    max_features: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(4, 1000)
    }
}

impl KeywordExtractor {
    #[must_use]
    pub const fn new(top_k: usize, max_features: usize) -> Self {
        Self {
            top_k,
            max_features,
        }
    }

    /// Up to `top_k` terms by descending mean TF-IDF weight.
    ///
    /// Zero-weight terms are never returned; equal scores keep vocabulary
    /// (alphabetical) order. Returns an empty list when no document has a
    /// non-stopword token.
    #[must_use]
    pub fn extract<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        let docs: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t.as_ref())).collect();
        let vocabulary = self.vocabulary(&docs);
        if vocabulary.is_empty() {
            tracing::debug!(docs = docs.len(), "empty keyword vocabulary");
            return Vec::new();
        }

        let index: BTreeMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
            .collect();

        let counts: Vec<Vec<(usize, f64)>> = docs
            .iter()
            .map(|doc| {
                let mut row: BTreeMap<usize, f64> = BTreeMap::new();
                for token in doc {
                    if let Some(&col) = index.get(token.as_str()) {
                        *row.entry(col).or_default() += 1.0;
                    }
                }
                row.into_iter().collect()
            })
            .collect();

        let idf = inverse_document_frequency(&counts, vocabulary.len());

        let mut scores = vec![0.0_f64; vocabulary.len()];
        for row in &counts {
            let weighted: Vec<(usize, f64)> =
                row.iter().map(|&(col, tf)| (col, tf * idf[col])).collect();
            let norm = weighted.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm == 0.0 {
                continue;
            }
            for (col, w) in weighted {
                scores[col] += w / norm;
            }
        }
        #[allow(clippy::cast_precision_loss)]
        let n_docs = docs.len() as f64;

        let mut ranked: Vec<usize> = (0..vocabulary.len())
            .filter(|&col| scores[col] > 0.0)
            .collect();
        // Stable sort keeps ascending vocabulary order among equal scores.
        ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        ranked
            .into_iter()
            .take(self.top_k)
            .map(|col| {
                tracing::trace!(term = %vocabulary[col], score = scores[col] / n_docs, "keyword");
                vocabulary[col].clone()
            })
            .collect()
    }

    /// Alphabetical vocabulary capped at `max_features` by corpus frequency.
    fn vocabulary(&self, docs: &[Vec<String>]) -> Vec<String> {
        let mut frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for token in docs.iter().flatten() {
            *frequency.entry(token.as_str()).or_default() += 1;
        }
        let mut terms: Vec<(&str, usize)> = frequency.into_iter().collect();
        if terms.len() > self.max_features {
            terms.sort_by(|a, b| b.1.cmp(&a.1));
            terms.truncate(self.max_features);
            terms.sort_by(|a, b| a.0.cmp(b.0));
        }
        terms.into_iter().map(|(t, _)| t.to_string()).collect()
    }
}

fn inverse_document_frequency(counts: &[Vec<(usize, f64)>], n_terms: usize) -> Vec<f64> {
    let mut df = vec![0_usize; n_terms];
    for row in counts {
        for &(col, _) in row {
            df[col] += 1;
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let n = counts.len() as f64;
    df.into_iter()
        .map(|d| {
            #[allow(clippy::cast_precision_loss)]
            let d = d as f64;
            ((1.0 + n) / (1.0 + d)).ln() + 1.0
        })
        .collect()
}

/// Lower-cased runs of at least two word characters, stopwords removed.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2 && !is_stopword(token))
        .map(str::to_string)
        .collect()
}
