//! Deduplication and scoring of candidate rules
//!
//! Two candidates describe the same obligation when they share a normalized
//! content hash, or (near-duplicate merge) when their normalized authorities
//! are equal and their titles are similar enough. Matching is transitive:
//! groups are the connected components of all pairwise matches.
//!
//! Within a group the survivor is the most reliable rule; ties go to the most
//! recently updated, then to the smallest id. Groups are emitted in order of
//! their first occurrence in the input, which makes `dedupe` idempotent.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use shared_types::{normalize_text, ComplianceRule};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Also merge rules with different hashes but matching (title, authority)
    pub merge_near_duplicates: bool,
    /// Minimum Jaccard similarity of title word sets, in `[0, 1]`.
    /// `1.0` requires identical normalized titles.
    pub title_similarity_threshold: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            merge_near_duplicates: true,
            title_similarity_threshold: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DedupStats {
    pub before: usize,
    pub after: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    config: DedupConfig,
}

/// Union-find over candidate indices. The root of a set is its smallest index.
struct Groups {
    parent: Vec<usize>,
}

impl Groups {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        match ra.cmp(&rb) {
            Ordering::Less => self.parent[rb] = ra,
            Ordering::Greater => self.parent[ra] = rb,
            Ordering::Equal => {}
        }
    }
}

fn title_words(title: &str) -> BTreeSet<String> {
    normalize_text(title)
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// `Greater` when `a` should survive over `b`
fn survivor_order(a: &ComplianceRule, b: &ComplianceRule) -> Ordering {
    a.reliability()
        .total_cmp(&b.reliability())
        .then_with(|| a.last_updated().cmp(&b.last_updated()))
        .then_with(|| b.id.cmp(&a.id))
}

impl Deduplicator {
    pub fn new(config: DedupConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    pub fn dedupe(&self, rules: Vec<ComplianceRule>) -> Vec<ComplianceRule> {
        self.dedupe_with_stats(rules).0
    }

    pub fn dedupe_with_stats(
        &self,
        rules: Vec<ComplianceRule>,
    ) -> (Vec<ComplianceRule>, DedupStats) {
        let before = rules.len();
        let mut groups = Groups::new(before);

        let mut by_hash: HashMap<String, usize> = HashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            match by_hash.get(&rule.content_hash()) {
                Some(&first) => groups.union(first, i),
                None => {
                    by_hash.insert(rule.content_hash(), i);
                }
            }
        }

        if self.config.merge_near_duplicates {
            self.merge_near_duplicates(&rules, &mut groups);
        }

        let mut members: Vec<Vec<usize>> = vec![Vec::new(); before];
        for i in 0..before {
            let root = groups.find(i);
            members[root].push(i);
        }

        let mut keep = Vec::new();
        for group in members.iter().filter(|m| !m.is_empty()) {
            let mut best = group[0];
            for &candidate in &group[1..] {
                if survivor_order(&rules[candidate], &rules[best]) == Ordering::Greater {
                    best = candidate;
                }
            }
            keep.push(best);
        }

        let mut slots: Vec<Option<ComplianceRule>> = rules.into_iter().map(Some).collect();
        let deduped: Vec<ComplianceRule> =
            keep.into_iter().filter_map(|i| slots[i].take()).collect();

        let stats = DedupStats {
            before,
            after: deduped.len(),
        };
        debug!(before = stats.before, after = stats.after, "deduplicated candidate rules");
        (deduped, stats)
    }

    fn merge_near_duplicates(&self, rules: &[ComplianceRule], groups: &mut Groups) {
        let threshold = self.config.title_similarity_threshold.clamp(0.0, 1.0);

        let mut by_authority: HashMap<String, Vec<(usize, BTreeSet<String>)>> = HashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            let words = title_words(&rule.title);
            if words.is_empty() {
                continue;
            }
            by_authority
                .entry(normalize_text(&rule.authority))
                .or_default()
                .push((i, words));
        }

        for bucket in by_authority.values() {
            for (x, (i, words_i)) in bucket.iter().enumerate() {
                for (j, words_j) in &bucket[x + 1..] {
                    let matches = if threshold >= 1.0 {
                        words_i == words_j
                    } else {
                        jaccard(words_i, words_j) >= threshold
                    };
                    if matches {
                        groups.union(*i, *j);
                    }
                }
            }
        }
    }
}

/// Deduplicate with the default configuration
pub fn dedupe(rules: Vec<ComplianceRule>) -> Vec<ComplianceRule> {
    Deduplicator::default().dedupe(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use shared_types::{RuleLevel, SourceReference, SourceType, VerificationStatus};

    fn rule(
        id: &str,
        title: &str,
        authority: &str,
        hash: &str,
        score: f64,
        day: u32,
    ) -> ComplianceRule {
        ComplianceRule::new(id, title, RuleLevel::State, "California")
            .with_authority(authority)
            .with_source(SourceReference {
                source_id: format!("src-{}", id),
                source_type: SourceType::Manual,
                source_name: "test".to_string(),
                source_url: String::new(),
                external_id: None,
                reliability_score: score,
                last_updated: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
                verification_status: VerificationStatus::Verified,
                content_hash: hash.to_string(),
            })
    }

    fn ids(rules: &[ComplianceRule]) -> Vec<&str> {
        rules.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_same_hash_keeps_most_reliable() {
        let rules = vec![
            rule("low", "Seller's permit", "CDTFA", "h1", 7.0, 1),
            rule("high", "Seller permit", "Tax board", "h1", 9.0, 1),
        ];
        let deduped = dedupe(rules);
        assert_eq!(ids(&deduped), vec!["high"]);
    }

    #[test]
    fn test_hash_comparison_is_normalized() {
        let rules = vec![
            rule("a", "One", "X", "ABCDEF", 5.0, 1),
            rule("b", "Two", "Y", " abcdef ", 5.0, 1),
        ];
        assert_eq!(dedupe(rules).len(), 1);
    }

    #[test]
    fn test_tie_breaks_on_recency_then_id() {
        let rules = vec![
            rule("b", "T", "A", "h", 8.0, 1),
            rule("c", "T", "A", "h", 8.0, 5),
            rule("a", "T", "A", "h", 8.0, 5),
        ];
        assert_eq!(ids(&dedupe(rules)), vec!["a"]);
    }

    #[test]
    fn test_near_duplicates_merge_on_title_and_authority() {
        let rules = vec![
            rule("ai", "Register  for STATE payroll taxes", "EDD", "h1", 6.0, 1),
            rule("catalog", "register for state payroll taxes", "edd", "h2", 9.0, 1),
            rule("other", "register for state payroll taxes", "IRS", "h3", 9.0, 1),
        ];
        let deduped = dedupe(rules);
        assert_eq!(ids(&deduped), vec!["catalog", "other"]);
    }

    #[test]
    fn test_near_duplicate_merge_can_be_disabled() {
        let dedup = Deduplicator::new(DedupConfig {
            merge_near_duplicates: false,
            ..DedupConfig::default()
        });
        let rules = vec![
            rule("a", "Same title", "Agency", "h1", 6.0, 1),
            rule("b", "Same title", "Agency", "h2", 9.0, 1),
        ];
        assert_eq!(dedup.dedupe(rules).len(), 2);
    }

    #[test]
    fn test_similarity_threshold() {
        let dedup = Deduplicator::new(DedupConfig {
            merge_near_duplicates: true,
            title_similarity_threshold: 0.6,
        });
        let rules = vec![
            rule("a", "file annual franchise tax report", "Comptroller", "h1", 6.0, 1),
            rule("b", "file franchise tax report", "Comptroller", "h2", 9.0, 1),
            rule("c", "obtain sales permit", "Comptroller", "h3", 9.0, 1),
        ];
        assert_eq!(ids(&dedup.dedupe(rules)), vec!["b", "c"]);
    }

    #[test]
    fn test_grouping_is_transitive() {
        // a~b by hash, b~c by title/authority
        let rules = vec![
            rule("a", "Alpha", "X", "h1", 5.0, 1),
            rule("b", "Beta", "Y", "h1", 6.0, 1),
            rule("c", "beta", "y", "h2", 7.0, 1),
            rule("d", "Delta", "Z", "h3", 1.0, 1),
        ];
        let (deduped, stats) = Deduplicator::default().dedupe_with_stats(rules);
        assert_eq!(ids(&deduped), vec!["c", "d"]);
        assert_eq!(stats, DedupStats { before: 4, after: 2 });
    }

    #[test]
    fn test_output_follows_first_occurrence() {
        let rules = vec![
            rule("x", "X", "A", "hx", 5.0, 1),
            rule("y1", "Y", "B", "hy", 5.0, 1),
            rule("z", "Z", "C", "hz", 5.0, 1),
            rule("y2", "Y", "B", "hy", 9.0, 1),
        ];
        assert_eq!(ids(&dedupe(rules)), vec!["x", "y2", "z"]);
    }

    #[test]
    fn test_empty_input() {
        let (deduped, stats) = Deduplicator::default().dedupe_with_stats(Vec::new());
        assert!(deduped.is_empty());
        assert_eq!(stats, DedupStats::default());
    }

    fn arb_rule() -> impl Strategy<Value = ComplianceRule> {
        (
            "[a-f]{1,2}",
            prop::sample::select(vec!["Permit", "permit", "Payroll tax", "Annual report", ""]),
            prop::sample::select(vec!["IRS", "irs", "EDD", ""]),
            prop::sample::select(vec!["h1", "H1", "h2", "h3", ""]),
            0.0f64..10.0,
            1u32..4,
        )
            .prop_map(|(id, title, authority, hash, score, day)| {
                rule(&id, title, authority, hash, score, day)
            })
    }

    proptest! {
        #[test]
        fn prop_dedupe_is_idempotent(rules in prop::collection::vec(arb_rule(), 0..16)) {
            let once = dedupe(rules);
            let twice = dedupe(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_dedupe_is_deterministic(rules in prop::collection::vec(arb_rule(), 0..16)) {
            prop_assert_eq!(dedupe(rules.clone()), dedupe(rules));
        }

        #[test]
        fn prop_dedupe_never_grows(rules in prop::collection::vec(arb_rule(), 0..16)) {
            let n = rules.len();
            let deduped = dedupe(rules);
            prop_assert!(deduped.len() <= n);
            prop_assert_eq!(n == 0, deduped.is_empty());
        }

        #[test]
        fn prop_similarity_threshold_idempotent(
            rules in prop::collection::vec(arb_rule(), 0..16),
            threshold in 0.0f64..1.0,
        ) {
            let dedup = Deduplicator::new(DedupConfig {
                merge_near_duplicates: true,
                title_similarity_threshold: threshold,
            });
            let once = dedup.dedupe(rules);
            prop_assert_eq!(dedup.dedupe(once.clone()), once);
        }
    }
}
