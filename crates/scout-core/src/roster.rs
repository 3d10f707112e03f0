// Squad under construction: members, usage counts and remaining budget.

use std::collections::HashMap;
use std::hash::Hash;

use crate::candidate::{Candidate, Position};

/// Counts how many squad members share a key (a club, a position).
/// Keys never seen count as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageCounter<K: Eq + Hash> {
    counts: HashMap<K, usize>,
}

impl<K: Eq + Hash> Default for UsageCounter<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> UsageCounter<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }
}

/// A squad being filled during one selection attempt.
///
/// Members borrow from the candidate pool. The budget is signed because the
/// last accepted candidate may overspend; callers detect that through
/// [`Roster::is_overspent`].
#[derive(Debug, Clone)]
pub struct Roster<'a> {
    members: Vec<&'a Candidate>,
    club_usage: UsageCounter<String>,
    position_usage: UsageCounter<Position>,
    remaining_budget: i64,
    top_performer_picks: usize,
}

impl<'a> Roster<'a> {
    pub fn new(budget: u32) -> Self {
        Self {
            members: Vec::new(),
            club_usage: UsageCounter::new(),
            position_usage: UsageCounter::new(),
            remaining_budget: i64::from(budget),
            top_performer_picks: 0,
        }
    }

    /// Add a candidate, charging its price and bumping its club and
    /// position counts. No constraint is checked here.
    pub fn accept(&mut self, candidate: &'a Candidate) {
        self.members.push(candidate);
        self.club_usage.increment(candidate.club.clone());
        self.position_usage.increment(candidate.position);
        self.remaining_budget -= i64::from(candidate.price);
    }

    /// Record that a pick came from the performance ranking.
    pub fn note_top_performer(&mut self) {
        self.top_performer_picks += 1;
    }

    pub fn contains(&self, id: u32) -> bool {
        self.members.iter().any(|c| c.id == id)
    }

    pub fn members(&self) -> &[&'a Candidate] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn club_count(&self, club: &str) -> usize {
        self.club_usage.get(&club.to_string())
    }

    pub fn position_count(&self, position: Position) -> usize {
        self.position_usage.get(&position)
    }

    pub fn remaining_budget(&self) -> i64 {
        self.remaining_budget
    }

    pub fn is_overspent(&self) -> bool {
        self.remaining_budget < 0
    }

    pub fn top_performer_picks(&self) -> usize {
        self.top_performer_picks
    }

    /// Sum of member prices.
    pub fn total_cost(&self) -> u64 {
        self.members.iter().map(|c| u64::from(c.price)).sum()
    }

    /// Member ids in selection order.
    pub fn ids(&self) -> Vec<u32> {
        self.members.iter().map(|c| c.id).collect()
    }
}
