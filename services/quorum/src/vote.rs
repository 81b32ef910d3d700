use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub voter_id: String,
    pub candidate_id: Option<String>,
    pub term: i64,
    pub approved: Option<bool>,
}

impl Vote {
    pub fn is_stale(&self, current_term: i64) -> bool {
        self.term < current_term
    }
}

/// Ignores votes with `term < term`. When a voter appears twice at `term`,
/// the later entry in `votes` wins.
pub fn count_votes(votes: &[Vote], term: i64) -> HashMap<String, i64> {
    let mut latest_by_voter: HashMap<&str, &Vote> = HashMap::new();
    for vote in votes {
        if vote.term < term {
            continue;
        }
        latest_by_voter.insert(vote.voter_id.as_str(), vote);
    }

    let mut counts: HashMap<String, i64> = HashMap::new();
    for vote in latest_by_voter.values() {
        if let Some(candidate) = &vote.candidate_id {
            *counts.entry(candidate.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Strictly highest count wins; ties break by lexicographically smallest
/// candidate id. Empty input returns `""`.
pub fn determine_leader(counts: &HashMap<String, i64>) -> String {
    if counts.is_empty() {
        return String::new();
    }
    let max_count = *counts.values().max().unwrap();
    counts
        .iter()
        .filter(|(_, &count)| count == max_count)
        .map(|(candidate, _)| candidate.clone())
        .min()
        .unwrap_or_default()
}

pub fn has_quorum(yes: i64, total: i64) -> bool {
    yes * 2 > total
}

pub fn is_term_valid(term: i64) -> bool {
    term >= 1
}

/// Keeps votes with `term >= min_term`, preserving relative order.
pub fn filter_stale(votes: &[Vote], min_term: i64) -> Vec<Vote> {
    votes.iter().filter(|v| v.term >= min_term).cloned().collect()
}

/// True iff at least two candidates share the top count, or the top two
/// counts differ by less than `min_gap`.
pub fn split_brain_detected(counts: &HashMap<String, i64>, min_gap: i64) -> bool {
    let mut sorted: Vec<i64> = counts.values().copied().collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    match sorted.as_slice() {
        [] | [_] => false,
        [top, second, ..] => top == second || (top - second) < min_gap,
    }
}

/// Preserves input order of candidates not present in `degraded`.
pub fn eligible_leaders(candidates: &[String], degraded: &[String]) -> Vec<String> {
    candidates
        .iter()
        .filter(|c| !degraded.contains(c))
        .cloned()
        .collect()
}

/// `(n - 1) / 3`, integer division.
pub fn byzantine_tolerance(n: i64) -> i64 {
    (n - 1) / 3
}

/// `#approved / #total`; 0 for empty input.
pub fn approval_ratio(votes: &[Vote]) -> f64 {
    if votes.is_empty() {
        return 0.0;
    }
    let approved = votes.iter().filter(|v| v.approved == Some(true)).count();
    approved as f64 / votes.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(voter: &str, candidate: &str, term: i64) -> Vote {
        Vote {
            voter_id: voter.to_string(),
            candidate_id: Some(candidate.to_string()),
            term,
            approved: Some(true),
        }
    }

    #[test]
    fn count_votes_ignores_stale_terms() {
        let votes = vec![vote("v1", "a", 1), vote("v2", "b", 2)];
        let counts = count_votes(&votes, 2);
        assert_eq!(counts.get("a"), None);
        assert_eq!(counts.get("b"), Some(&1));
    }

    #[test]
    fn count_votes_later_entry_overwrites_same_voter_same_term() {
        let votes = vec![vote("v1", "a", 1), vote("v1", "b", 1)];
        let counts = count_votes(&votes, 1);
        assert_eq!(counts.get("a"), None);
        assert_eq!(counts.get("b"), Some(&1));
    }

    #[test]
    fn determine_leader_breaks_ties_lexicographically() {
        let mut counts = HashMap::new();
        counts.insert("b".to_string(), 2);
        counts.insert("a".to_string(), 2);
        assert_eq!(determine_leader(&counts), "a");
    }

    #[test]
    fn determine_leader_of_empty_is_empty_string() {
        assert_eq!(determine_leader(&HashMap::new()), "");
    }

    #[test]
    fn has_quorum_requires_strict_majority() {
        assert!(!has_quorum(2, 4));
        assert!(has_quorum(3, 4));
    }

    #[test]
    fn split_brain_detects_tied_top_counts() {
        let mut counts = HashMap::new();
        counts.insert("a".to_string(), 3);
        counts.insert("b".to_string(), 3);
        assert!(split_brain_detected(&counts, 1));
    }

    #[test]
    fn split_brain_detects_narrow_gap() {
        let mut counts = HashMap::new();
        counts.insert("a".to_string(), 5);
        counts.insert("b".to_string(), 4);
        assert!(split_brain_detected(&counts, 2));
        assert!(!split_brain_detected(&counts, 1));
    }

    #[test]
    fn byzantine_tolerance_is_integer_division() {
        assert_eq!(byzantine_tolerance(4), 1);
        assert_eq!(byzantine_tolerance(7), 2);
    }

    #[test]
    fn approval_ratio_of_empty_is_zero() {
        assert_eq!(approval_ratio(&[]), 0.0);
    }

    #[test]
    fn eligible_leaders_preserves_order_minus_degraded() {
        let candidates = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let degraded = vec!["b".to_string()];
        assert_eq!(eligible_leaders(&candidates, &degraded), vec!["a", "c"]);
    }
}
