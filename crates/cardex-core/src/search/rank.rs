use std::collections::HashSet;

use crate::models::Candidate;

/// Candidates merged across strategies; the first score seen for an id wins.
#[derive(Debug, Default)]
pub(super) struct CandidatePool {
    seen: HashSet<String>,
    ordered: Vec<Candidate>,
}

impl CandidatePool {
    pub(super) fn extend(&mut self, candidates: impl IntoIterator<Item = Candidate>) {
        for candidate in candidates {
            if self.seen.insert(candidate.record_id.clone()) {
                self.ordered.push(candidate);
            }
        }
    }

    pub(super) fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Score descending; ties keep discovery order.
    pub(super) fn into_ranked(mut self) -> Vec<Candidate> {
        self.ordered.sort_by(|a, b| b.score.cmp(&a.score));
        self.ordered
    }
}
