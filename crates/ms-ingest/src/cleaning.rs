//! Boilerplate stripping, language detection, spam filtering and deduplication.

use std::collections::HashSet;

use ms_core::entities::{EmailRecord, Language};
use regex::Regex;

use crate::error::IngestError;

/// Signature starts; the body is cut at the first match.
const SIGNATURE_PATTERNS: [&str; 4] = [
    r"(?m)^--\s*$",
    r"(?mi)^sent from my .*",
    r"(?mi)^best regards,.*$",
    r"(?mi)^saludos,.*$",
];

/// Quoted-reply headers; the body is cut at the first match.
const QUOTE_PATTERNS: [&str; 5] = [
    r"(?mi)^on .* wrote:\s*$",
    r"(?mi)^from: .*",
    r"(?mi)^sent: .*",
    r"(?mi)^to: .*",
    r"(?mi)^subject: .*",
];

const SPAM_EN: [&str; 7] = [
    "casino",
    "betting",
    "lottery",
    "free money",
    "urgent transfer",
    "crypto giveaway",
    "click here",
];

const SPAM_ES: [&str; 7] = [
    "casino",
    "apuesta",
    "loteria",
    "dinero gratis",
    "transferencia urgente",
    "regalo cripto",
    "haga clic",
];

const STOPWORDS_EN: [&str; 24] = [
    "the", "and", "is", "are", "you", "your", "we", "our", "for", "with", "this", "that", "have",
    "please", "thanks", "thank", "will", "would", "can", "could", "of", "to", "in", "on",
];

const STOPWORDS_ES: [&str; 24] = [
    "el", "la", "los", "las", "de", "del", "que", "en", "por", "para", "con", "una", "un", "es",
    "su", "sus", "nos", "muchas", "gracias", "favor", "hola", "saludos", "estimado", "usted",
];

/// Compiled boilerplate patterns.
#[derive(Debug, Clone)]
pub struct Cleaner {
    cut_patterns: Vec<Regex>,
}

impl Cleaner {
    /// # Errors
    ///
    /// Returns [`IngestError::Pattern`] if a built-in pattern fails to compile.
    pub fn new() -> Result<Self, IngestError> {
        let cut_patterns = SIGNATURE_PATTERNS
            .iter()
            .chain(QUOTE_PATTERNS.iter())
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { cut_patterns })
    }

    /// Cut `text` at each signature or quote pattern in turn, then trim.
    #[must_use]
    pub fn strip_boilerplate(&self, text: &str) -> String {
        let mut cleaned = text;
        for pattern in &self.cut_patterns {
            if let Some(m) = pattern.find(cleaned) {
                cleaned = &cleaned[..m.start()];
            }
        }
        cleaned.trim().to_string()
    }

    /// Split `emails` into kept and removed records.
    ///
    /// A record is removed when its subject or body is blank, nothing is left
    /// after stripping boilerplate, its language is undetected, or it looks
    /// like spam. Kept records carry the cleaned body and detected language.
    #[must_use]
    pub fn filter_emails(&self, emails: Vec<EmailRecord>) -> (Vec<EmailRecord>, Vec<EmailRecord>) {
        let mut kept = Vec::new();
        let mut removed = Vec::new();
        for mut email in emails {
            if email.subject.trim().is_empty() || email.body.trim().is_empty() {
                removed.push(email);
                continue;
            }
            let cleaned = self.strip_boilerplate(&email.body);
            let language = detect_language(&cleaned);
            match language {
                Some(lang) if !cleaned.is_empty() && !is_spam(&cleaned, Some(lang)) => {
                    email.body = cleaned;
                    email.language = Some(lang);
                    kept.push(email);
                }
                _ => removed.push(email),
            }
        }
        tracing::debug!(kept = kept.len(), removed = removed.len(), "filtered emails");
        (kept, removed)
    }
}

/// Guess English or Spanish from stopword and accent evidence.
///
/// Falls back to English when the text is more than 90% ASCII and the
/// evidence is inconclusive. Returns `None` for blank text.
#[must_use]
pub fn detect_language(text: &str) -> Option<Language> {
    if text.trim().is_empty() {
        return None;
    }
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();
    let en = words.iter().filter(|w| STOPWORDS_EN.contains(w)).count();
    let accents = lowered.chars().filter(|c| "áéíóúñ¿¡".contains(*c)).count();
    let es = words.iter().filter(|w| STOPWORDS_ES.contains(w)).count() + accents;

    match en.cmp(&es) {
        std::cmp::Ordering::Greater => Some(Language::En),
        std::cmp::Ordering::Less => Some(Language::Es),
        std::cmp::Ordering::Equal => {
            let total = text.chars().count().max(1);
            let ascii = text.chars().filter(char::is_ascii).count();
            #[allow(clippy::cast_precision_loss)]
            let ratio = ascii as f64 / total as f64;
            (ratio > 0.9).then_some(Language::En)
        }
    }
}

/// Whether `text` contains a spam phrase for `language` (both lists when unknown).
#[must_use]
pub fn is_spam(text: &str, language: Option<Language>) -> bool {
    let lowered = text.to_lowercase();
    let hit = |list: &[&str]| list.iter().any(|k| lowered.contains(k));
    match language {
        Some(Language::En) => hit(&SPAM_EN),
        Some(Language::Es) => hit(&SPAM_ES),
        None => hit(&SPAM_EN) || hit(&SPAM_ES),
    }
}

/// Lower-case and collapse whitespace runs to single spaces.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Keep the first record per normalized subject, body and attachment set.
#[must_use]
pub fn deduplicate(emails: Vec<EmailRecord>) -> Vec<EmailRecord> {
    let mut seen = HashSet::new();
    emails
        .into_iter()
        .filter(|email| {
            let mut attachments = email.attachments.clone();
            attachments.sort();
            let key = normalize_text(&format!(
                "{}\n{}\n{}",
                email.subject,
                email.body,
                attachments.join(",")
            ));
            seen.insert(key)
        })
        .collect()
}
