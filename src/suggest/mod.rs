//! Rewrite suggestions: shared types plus the local fallback generator.
//!
//! Remote rewrites are preferred; the generator here exists so the user
//! still gets usable suggestions when the service is down. It picks from
//! static template pools, steered by a coarse context read of the message,
//! and avoids repeating anything shown recently.

mod templates;

use crate::api::{RemoteSuggestion, Tone};
use crate::risk::RiskLevel;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use tracing::debug;
use uuid::Uuid;

/// Most-recently-shown strings remembered for anti-repetition.
pub const HISTORY_SIZE: usize = 9;

/// Where a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionSource {
    /// Produced by the remote mediation service.
    Remote,
    /// Generated locally from template pools.
    Local,
}

/// Register of a suggestion: which pool it was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionTag {
    Calm,
    Firm,
    Educational,
}

impl SuggestionTag {
    pub fn label(&self) -> &'static str {
        match self {
            SuggestionTag::Calm => "Calm",
            SuggestionTag::Firm => "Firm",
            SuggestionTag::Educational => "Educational",
        }
    }
}

/// One rewrite candidate offered to the user.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub id: Uuid,
    pub text: String,
    pub reason: Option<String>,
    pub tag: SuggestionTag,
    pub source: SuggestionSource,
    pub created_at: DateTime<Utc>,
}

impl Suggestion {
    pub fn local(text: impl Into<String>, reason: impl Into<String>, tag: SuggestionTag) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            reason: Some(reason.into()),
            tag,
            source: SuggestionSource::Local,
            created_at: Utc::now(),
        }
    }

    pub fn remote(text: impl Into<String>, reason: Option<String>, tag: SuggestionTag) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            reason,
            tag,
            source: SuggestionSource::Remote,
            created_at: Utc::now(),
        }
    }

    pub fn from_remote(remote: RemoteSuggestion, tag: SuggestionTag) -> Self {
        Self::remote(remote.text, remote.reason, tag)
    }
}

/// Coarse message categorization used to specialize template pools.
/// Detection is an ordered first-match scan: a message containing both
/// insult and threat words buckets as a threat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextBucket {
    Threat,
    Insult,
    Anger,
    Neutral,
}

impl ContextBucket {
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();

        for keyword in templates::THREAT_KEYWORDS {
            if lower.contains(keyword) {
                return ContextBucket::Threat;
            }
        }
        for keyword in templates::INSULT_KEYWORDS {
            if lower.contains(keyword) {
                return ContextBucket::Insult;
            }
        }
        for keyword in templates::ANGER_KEYWORDS {
            if lower.contains(keyword) {
                return ContextBucket::Anger;
            }
        }
        ContextBucket::Neutral
    }
}

/// Bounded FIFO of recently shown suggestion texts. Reselection moves an
/// entry back to most-recent rather than duplicating it.
#[derive(Debug, Default)]
struct HistoryCache {
    entries: VecDeque<String>,
}

impl HistoryCache {
    fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|e| e == text)
    }

    fn push(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(pos) = self.entries.iter().position(|e| e == text) {
            self.entries.remove(pos);
        }
        self.entries.push_back(text.to_string());
        while self.entries.len() > HISTORY_SIZE {
            self.entries.pop_front();
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Three tagged suggestions, one per tone register.
#[derive(Debug, Clone)]
pub struct SuggestionSet {
    pub calm: String,
    pub firm: String,
    pub educational: String,
}

/// Local, templated suggestion generator with anti-repetition.
#[derive(Debug, Default)]
pub struct FallbackSuggestionGenerator {
    history: HistoryCache,
}

impl FallbackSuggestionGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate one suggestion per tone register for `text`.
    ///
    /// Anti-repetition holds while the pool outnumbers the history window;
    /// once every candidate has been shown recently the constraint degrades
    /// to a uniform random pick rather than blocking.
    pub fn generate(&mut self, text: &str, lang: &str, risk: RiskLevel) -> SuggestionSet {
        let context = ContextBucket::detect(text);

        let calm = self.pick_unique(&templates::calm_pool(lang, context));
        let firm = self.pick_unique(&templates::firm_pool(lang, context));
        let educational = self.pick_unique(&templates::educational_pool(lang));

        self.history.push(&calm);
        self.history.push(&firm);
        self.history.push(&educational);

        debug!(
            lang,
            risk = risk.badge(),
            ?context,
            history = self.history.len(),
            "generated local suggestions"
        );

        SuggestionSet {
            calm,
            firm,
            educational,
        }
    }

    /// Generate the full set and order/annotate it for the requested tone,
    /// ready to show in place of a failed remote rewrite.
    pub fn generate_for_tone(&mut self, text: &str, lang: &str, tone: Tone) -> Vec<Suggestion> {
        let set = self.generate(text, lang, RiskLevel::Risky);

        let calm = |reason: &str| Suggestion::local(&set.calm, reason, SuggestionTag::Calm);
        let firm = |reason: &str| Suggestion::local(&set.firm, reason, SuggestionTag::Firm);
        let edu =
            |reason: &str| Suggestion::local(&set.educational, reason, SuggestionTag::Educational);

        match tone {
            Tone::Calm => vec![
                calm("Calm approach"),
                firm("Clear boundaries"),
                edu("Informative tone"),
            ],
            Tone::Friendly => vec![
                calm("Respectful tone"),
                edu("Understanding approach"),
                firm("Direct but kind"),
            ],
            Tone::Professional => vec![
                firm("Professional clarity"),
                calm("Composed response"),
                edu("Constructive feedback"),
            ],
        }
    }

    /// Forget recently shown suggestions.
    pub fn clear_history(&mut self) {
        self.history = HistoryCache::default();
    }

    fn pick_unique(&self, pool: &[&'static str]) -> String {
        let mut rng = rand::thread_rng();

        let mut shuffled: Vec<&str> = pool.to_vec();
        shuffled.shuffle(&mut rng);

        for candidate in &shuffled {
            if !self.history.contains(candidate) {
                return candidate.to_string();
            }
        }

        // Everything was shown recently; the history constraint is advisory.
        shuffled
            .choose(&mut rng)
            .map(|s| s.to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threat_outranks_insult() {
        assert_eq!(
            ContextBucket::detect("you idiot, you'll regret this"),
            ContextBucket::Threat
        );
    }

    #[test]
    fn test_bucket_detection_order() {
        assert_eq!(ContextBucket::detect("watch out"), ContextBucket::Threat);
        assert_eq!(ContextBucket::detect("you are stupid"), ContextBucket::Insult);
        assert_eq!(ContextBucket::detect("i am so furious"), ContextBucket::Anger);
        assert_eq!(ContextBucket::detect("nice weather today"), ContextBucket::Neutral);
    }

    #[test]
    fn test_detection_is_case_insensitive() {
        assert_eq!(ContextBucket::detect("You IDIOT"), ContextBucket::Insult);
    }

    #[test]
    fn test_no_repeats_within_history_window() {
        // History holds 9 entries and each call pushes 3, so the last 3
        // calls are fully covered by the window. A calm pool of 15 must
        // therefore never repeat within 3 consecutive calls.
        for _ in 0..20 {
            let mut generator = FallbackSuggestionGenerator::new();
            let mut recent = Vec::new();
            for _ in 0..3 {
                let set = generator.generate("hello", "en", RiskLevel::Safe);
                recent.push(set.calm);
            }
            let unique: std::collections::HashSet<_> = recent.iter().collect();
            assert_eq!(unique.len(), recent.len(), "calm suggestion repeated");
        }
    }

    #[test]
    fn test_three_tones_are_distinct_strings() {
        let mut generator = FallbackSuggestionGenerator::new();
        let set = generator.generate("whatever", "en", RiskLevel::Risky);
        assert_ne!(set.calm, set.firm);
        assert_ne!(set.calm, set.educational);
        assert_ne!(set.firm, set.educational);
    }

    #[test]
    fn test_exhausted_pool_still_produces_output() {
        let mut generator = FallbackSuggestionGenerator::new();
        // Far more calls than the pools can cover without repetition.
        for _ in 0..50 {
            let set = generator.generate("text", "en", RiskLevel::Safe);
            assert!(!set.calm.is_empty());
            assert!(!set.firm.is_empty());
            assert!(!set.educational.is_empty());
        }
    }

    #[test]
    fn test_insult_context_can_draw_apology_templates() {
        // The apology templates only enter the calm pool for insult
        // contexts; across enough runs at least one must surface.
        let mut seen_apology = false;
        for _ in 0..200 {
            let mut generator = FallbackSuggestionGenerator::new();
            let set = generator.generate("you are an idiot", "en", RiskLevel::Risky);
            if templates::EN_APOLOGY.contains(&set.calm.as_str()) {
                seen_apology = true;
                break;
            }
        }
        assert!(seen_apology);
    }

    #[test]
    fn test_threat_context_can_draw_safety_templates() {
        let mut seen_safety = false;
        for _ in 0..200 {
            let mut generator = FallbackSuggestionGenerator::new();
            let set = generator.generate("you will regret this", "en", RiskLevel::Danger);
            if templates::EN_SAFETY.contains(&set.firm.as_str()) {
                seen_safety = true;
                break;
            }
        }
        assert!(seen_safety);
    }

    #[test]
    fn test_french_pool_selected() {
        let mut generator = FallbackSuggestionGenerator::new();
        let set = generator.generate("bonjour", "fr", RiskLevel::Safe);
        assert!(templates::FR_CALM.contains(&set.calm.as_str()));
    }

    #[test]
    fn test_darija_falls_back_to_arabic_pool() {
        let mut generator = FallbackSuggestionGenerator::new();
        let set = generator.generate("salam", "darija", RiskLevel::Safe);
        assert!(templates::AR_CALM.contains(&set.calm.as_str()));
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let mut generator = FallbackSuggestionGenerator::new();
        let set = generator.generate("hola", "es", RiskLevel::Safe);
        assert!(templates::EN_CALM.contains(&set.calm.as_str()));
    }

    #[test]
    fn test_generate_for_tone_returns_three_local_suggestions() {
        let mut generator = FallbackSuggestionGenerator::new();
        let suggestions = generator.generate_for_tone("text", "en", Tone::Professional);
        assert_eq!(suggestions.len(), 3);
        assert!(suggestions
            .iter()
            .all(|s| s.source == SuggestionSource::Local));
        // Professional ordering leads with the firm register.
        assert_eq!(suggestions[0].tag, SuggestionTag::Firm);
    }

    #[test]
    fn test_history_moves_reselected_to_most_recent() {
        let mut history = HistoryCache::default();
        for i in 0..HISTORY_SIZE {
            history.push(&format!("entry {}", i));
        }
        history.push("entry 0");
        assert_eq!(history.len(), HISTORY_SIZE);
        assert_eq!(history.entries.back().map(String::as_str), Some("entry 0"));

        // One more distinct push evicts the oldest remaining entry.
        history.push("fresh");
        assert_eq!(history.len(), HISTORY_SIZE);
        assert!(!history.contains("entry 1"));
        assert!(history.contains("entry 0"));
    }
}
