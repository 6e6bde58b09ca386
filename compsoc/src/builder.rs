use std::collections::HashMap;

pub use crate::config::*;
use crate::Profile;

/// A builder for adding ballots one at a time.
///
/// Identical ballots are merged into a single weighted ballot, in the order in
/// which they were first seen. Validation happens when the profile is built.
///
/// ```
/// pub use compsoc::builder::ProfileBuilder;
/// # use compsoc::VotingErrors;
///
/// let mut builder = ProfileBuilder::new();
/// builder.add_ballot_simple(&[0, 1, 2]);
/// builder.add_ballot(2, &[2, 0, 1]);
/// builder.add_ballot_simple(&[0, 1, 2]);
///
/// let profile = builder.build()?;
/// assert_eq!(profile.pairs().len(), 2);
/// assert_eq!(profile.total_voters(), 4);
///
/// # Ok::<(), VotingErrors>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProfileBuilder {
    _ballots: Vec<WeightedBallot>,
    _index: HashMap<Vec<CandidateId>, usize>,
}

impl ProfileBuilder {
    pub fn new() -> ProfileBuilder {
        ProfileBuilder::default()
    }

    /// Adds a ballot cast by a single voter.
    pub fn add_ballot_simple(&mut self, ranking: &[u32]) {
        self.add_ballot(1, ranking)
    }

    /// Adds a ballot cast by `count` voters.
    ///
    /// ranking: the candidates, from the most preferred to the least preferred.
    pub fn add_ballot(&mut self, count: u64, ranking: &[u32]) {
        self.add_weighted_ballot(&WeightedBallot::new(count, ranking))
    }

    pub fn add_weighted_ballot(&mut self, wb: &WeightedBallot) {
        match self._index.get(&wb.ranking) {
            // A zero count is kept as is so that the profile rejects it.
            Some(&idx) if wb.count > 0 => {
                self._ballots[idx].count += wb.count;
            }
            _ => {
                self._index.insert(wb.ranking.clone(), self._ballots.len());
                self._ballots.push(wb.clone());
            }
        }
    }

    /// The number of distinct ballots added so far.
    pub fn len(&self) -> usize {
        self._ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self._ballots.is_empty()
    }

    /// The merged ballots, without validation.
    pub fn into_ballots(self) -> Vec<WeightedBallot> {
        self._ballots
    }

    pub fn build(self) -> Result<Profile, VotingErrors> {
        Profile::new(self._ballots)
    }
}
