mod config;
mod rules;
mod utility;

pub mod builder;
pub mod manual;

use log::{debug, info};

use std::fmt::Display;

pub use crate::config::*;
pub use crate::rules::*;
pub use crate::utility::*;

/// A collection of weighted ballots over a fixed set of candidates.
///
/// A profile is validated once at construction and never modified afterwards.
/// All the ballots rank the same candidates, and the total number of voters is
/// strictly positive.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Profile {
    pairs: Vec<WeightedBallot>,
    // Sorted, deduplicated.
    candidates: Vec<CandidateId>,
    total_voters: u64,
}

impl Profile {
    /// Builds a profile from a collection of weighted ballots.
    ///
    /// Fails if there are no ballots, if a count is zero, or if the ballots do
    /// not all rank the same candidates exactly once.
    pub fn new(pairs: Vec<WeightedBallot>) -> Result<Profile, VotingErrors> {
        let candidates = checks(&pairs)?;
        let total_voters: u64 = pairs.iter().map(|wb| wb.count).sum();
        info!(
            "Profile: {} ballots, {} voters, {} candidates",
            pairs.len(),
            total_voters,
            candidates.len()
        );
        Ok(Profile {
            pairs,
            candidates,
            total_voters,
        })
    }

    /// Builds a profile from (count, ranking) pairs, as produced by the voter models.
    pub fn from_pairs(pairs: &[(u64, Vec<u32>)]) -> Result<Profile, VotingErrors> {
        Profile::new(
            pairs
                .iter()
                .map(|(count, ranking)| WeightedBallot::new(*count, ranking))
                .collect(),
        )
    }

    /// The candidates, in increasing order.
    pub fn candidates(&self) -> &[CandidateId] {
        &self.candidates
    }

    /// The weighted ballots, in the order in which they were provided.
    pub fn pairs(&self) -> &[WeightedBallot] {
        &self.pairs
    }

    pub fn num_candidates(&self) -> usize {
        self.candidates.len()
    }

    pub fn total_voters(&self) -> u64 {
        self.total_voters
    }

    /// Scores all the candidates with the given rule and sorts them by
    /// decreasing score.
    ///
    /// Candidates with equal scores are ordered by increasing identifier, so
    /// the result only depends on the content of the profile and on the rule.
    pub fn ranking<R: ScoringRule + ?Sized>(&self, rule: &R) -> Ranking {
        let mut entries: Vec<RankingEntry> = self
            .candidates
            .iter()
            .map(|&candidate| RankingEntry {
                candidate,
                score: rule.score(self, candidate),
            })
            .collect();
        entries.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.candidate.cmp(&b.candidate))
        });
        let ranking = Ranking { entries };
        debug!("ranking: rule {}: {}", rule.name(), ranking);
        ranking
    }
}

impl Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for wb in self.pairs.iter() {
            let names: Vec<String> = wb.ranking.iter().map(|c| c.to_string()).collect();
            writeln!(f, "{}: {}", wb.count, names.join(" > "))?;
        }
        Ok(())
    }
}

/// The number of voters who rank `a` strictly above `b`.
///
/// This is the building block of all the pairwise (Condorcet-style) rules.
/// Since ballots are strict rankings, for two distinct candidates
/// `pairwise_preference(p, a, b) + pairwise_preference(p, b, a)` is the total
/// number of voters.
pub fn pairwise_preference(profile: &Profile, a: CandidateId, b: CandidateId) -> u64 {
    profile
        .pairs
        .iter()
        .filter_map(|wb| match (wb.position(a), wb.position(b)) {
            (Some(pa), Some(pb)) if pa < pb => Some(wb.count),
            _ => None,
        })
        .sum()
}

// Returns the sorted candidates shared by all the ballots.
fn checks(pairs: &[WeightedBallot]) -> Result<Vec<CandidateId>, VotingErrors> {
    debug!("checks: {} ballots", pairs.len());
    let first = match pairs.first() {
        Some(wb) if !wb.ranking.is_empty() => wb,
        _ => return Err(VotingErrors::InvalidProfile(ProfileDefect::Empty)),
    };
    let expected_len = first.ranking.len();
    let mut reference: Vec<CandidateId> = first.ranking.clone();
    reference.sort();

    for (index, wb) in pairs.iter().enumerate() {
        if wb.count == 0 {
            return Err(VotingErrors::InvalidProfile(ProfileDefect::ZeroCount {
                index,
            }));
        }
        if wb.ranking.len() != expected_len {
            return Err(VotingErrors::InvalidProfile(
                ProfileDefect::InconsistentLength {
                    index,
                    expected: expected_len,
                    found: wb.ranking.len(),
                },
            ));
        }
        let mut sorted = wb.ranking.clone();
        sorted.sort();
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(VotingErrors::InvalidProfile(
                ProfileDefect::DuplicateCandidate {
                    index,
                    candidate: w[0],
                },
            ));
        }
        if sorted != reference {
            return Err(VotingErrors::InvalidProfile(
                ProfileDefect::InconsistentCandidates { index },
            ));
        }
    }
    Ok(reference)
}
