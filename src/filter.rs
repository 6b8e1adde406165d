// src/filter.rs
use tracing::debug;

use crate::config::WatchConfig;
use crate::seen::SeenSet;

/// Keyword predicate: some location (code or alias) must appear verbatim,
/// event phrase in any case.
#[derive(Debug, Clone)]
pub struct MatchRule {
    // codes plus alias names, all matched case-sensitively
    needles: Vec<String>,
    event_phrase_lower: String,
}

impl MatchRule {
    pub fn new(location: &str, event_phrase: &str) -> Self {
        Self::for_locations([location], event_phrase)
    }

    /// Match if the text names any of `locations`.
    pub fn for_locations<I, S>(locations: I, event_phrase: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let needles = locations
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        Self {
            needles,
            event_phrase_lower: event_phrase.to_lowercase(),
        }
    }

    /// Also accept `name` wherever its code is one of the watched locations.
    pub fn with_alias(mut self, name: &str, code: &str) -> Self {
        let name = name.trim();
        if !name.is_empty() && self.needles.iter().any(|n| n == code) {
            self.needles.push(name.to_string());
        }
        self
    }

    pub fn from_config(cfg: &WatchConfig) -> Self {
        cfg.location_aliases.iter().fold(
            Self::for_locations(&cfg.locations, &cfg.event_phrase),
            |rule, (name, code)| rule.with_alias(name, code),
        )
    }

    pub fn matches(&self, text: &str) -> bool {
        self.needles.iter().any(|n| text.contains(n.as_str()))
            && text.to_lowercase().contains(&self.event_phrase_lower)
    }
}

/// Keep matching candidates not yet in `seen`, in input order, and mark every
/// match as seen. Membership is checked before marking, so a first-time match
/// is always emitted and a repeat (also within the same batch) never is.
pub fn filter_new_matches<I>(candidates: I, rule: &MatchRule, seen: &mut SeenSet) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut fresh = Vec::new();
    for text in candidates {
        if !rule.matches(&text) {
            continue;
        }
        let is_new = !seen.contains(&text);
        seen.insert(&text);
        if is_new {
            fresh.push(text);
        } else {
            debug!(target: "watch", "already notified, skipping");
        }
    }
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> MatchRule {
        MatchRule::new("CPH", "electrical shutdown")
    }

    #[test]
    fn event_phrase_is_case_insensitive() {
        let r = rule();
        assert!(r.matches("CPH Electrical Shutdown on Friday"));
        assert!(r.matches("CPH electrical shutdown on Friday"));
        assert!(r.matches("ELECTRICAL SHUTDOWN - CPH"));
    }

    #[test]
    fn location_is_case_sensitive() {
        let r = rule();
        assert!(!r.matches("cph electrical shutdown"));
        assert!(!r.matches("Cph electrical shutdown"));
    }

    #[test]
    fn both_parts_required() {
        let r = rule();
        assert!(!r.matches("CPH water shutdown"));
        assert!(!r.matches("DC electrical shutdown"));
        assert!(!r.matches("CPH electrical maintenance, shutdown later"));
    }

    #[test]
    fn non_matches_are_not_remembered() {
        let mut seen = SeenSet::new();
        let out = filter_new_matches(vec!["DC electrical shutdown".to_string()], &rule(), &mut seen);
        assert!(out.is_empty());
        assert!(seen.is_empty());
    }

    #[test]
    fn duplicates_within_one_batch_emit_once() {
        let mut seen = SeenSet::new();
        let s = "CPH electrical shutdown March 3".to_string();
        let out = filter_new_matches(vec![s.clone(), s.clone()], &rule(), &mut seen);
        assert_eq!(out, vec![s]);
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn any_listed_location_matches() {
        let r = MatchRule::for_locations(["CPH", "E2"], "electrical shutdown");
        assert!(r.matches("E2 electrical shutdown Saturday"));
        assert!(r.matches("CPH electrical shutdown Saturday"));
        assert!(!r.matches("DWE electrical shutdown Saturday"));
        assert!(!r.matches("e2 electrical shutdown Saturday"));
    }

    #[test]
    fn alias_counts_only_for_watched_codes() {
        let r = rule()
            .with_alias("Carl A Pollock Hall", "CPH")
            .with_alias("Douglas Wright Engineering", "DWE");
        assert!(r.matches("Carl A Pollock Hall - Electrical Shutdown"));
        assert!(!r.matches("Douglas Wright Engineering - Electrical Shutdown"));
        assert!(!r.matches("carl a pollock hall - electrical shutdown"));
    }

    #[test]
    fn from_config_uses_default_aliases() {
        let r = MatchRule::from_config(&WatchConfig::default());
        assert!(r.matches("Carl A. Pollock Hall electrical shutdown"));
        assert!(r.matches("CPH electrical shutdown"));
    }
}
