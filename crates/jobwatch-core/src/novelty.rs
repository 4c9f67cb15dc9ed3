//! In-memory per-site baselines of previously seen job titles.
//!
//! Title is the only identity key: a retitled posting is new, and a repeated
//! title at a different URL is not. Baselines are keyed by site name, so the
//! same title at two sites never collides.

use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default)]
pub struct NoveltyTracker {
    baselines: HashMap<String, BTreeSet<String>>,
}

impl NoveltyTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the baseline for `site` from persisted state, replacing any
    /// existing entry.
    pub fn load_baseline(&mut self, site: &str, titles: BTreeSet<String>) {
        self.baselines.insert(site.to_owned(), titles);
    }

    /// Returns `true` if `title` has not been seen for `site`.
    ///
    /// A site with no baseline behaves as an empty set.
    #[must_use]
    pub fn is_new(&self, site: &str, title: &str) -> bool {
        self.baselines
            .get(site)
            .is_none_or(|seen| !seen.contains(title))
    }

    /// Replaces the stored set for `site` with exactly `titles`.
    ///
    /// Titles missing from `titles` drop out of the baseline; disappearance
    /// is not tracked.
    pub fn record_observed(&mut self, site: &str, titles: BTreeSet<String>) {
        self.baselines.insert(site.to_owned(), titles);
    }

    #[must_use]
    pub fn baseline(&self, site: &str) -> Option<&BTreeSet<String>> {
        self.baselines.get(site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn unknown_site_treats_everything_as_new() {
        let tracker = NoveltyTracker::new();
        assert!(tracker.is_new("Acme", "Engineer"));
        assert!(tracker.baseline("Acme").is_none());
    }

    #[test]
    fn seen_title_is_not_new() {
        let mut tracker = NoveltyTracker::new();
        tracker.load_baseline("Acme", titles(&["Engineer"]));
        assert!(!tracker.is_new("Acme", "Engineer"));
        assert!(tracker.is_new("Acme", "Manager"));
    }

    #[test]
    fn title_match_is_exact() {
        let mut tracker = NoveltyTracker::new();
        tracker.load_baseline("Acme", titles(&["Engineer"]));
        assert!(tracker.is_new("Acme", "engineer"));
        assert!(tracker.is_new("Acme", "Engineer "));
    }

    #[test]
    fn baselines_are_per_site() {
        let mut tracker = NoveltyTracker::new();
        tracker.load_baseline("Acme", titles(&["Engineer"]));
        assert!(tracker.is_new("Globex", "Engineer"));
    }

    #[test]
    fn record_observed_replaces_rather_than_unions() {
        let mut tracker = NoveltyTracker::new();
        tracker.load_baseline("Acme", titles(&["A", "B"]));
        tracker.record_observed("Acme", titles(&["A"]));
        assert_eq!(tracker.baseline("Acme"), Some(&titles(&["A"])));
        assert!(tracker.is_new("Acme", "B"));
    }
}
