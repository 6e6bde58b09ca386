// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The identifier of a candidate.
///
/// Candidates are totally ordered by their identifier. This order is the one
/// used to break ties when ranking candidates.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct CandidateId(pub u32);

impl From<u32> for CandidateId {
    fn from(x: u32) -> Self {
        CandidateId(x)
    }
}

impl Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A group of voters who all cast the same ballot.
///
/// The ranking is complete and strict: the first element is the preferred
/// candidate, and every candidate of the election appears exactly once.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct WeightedBallot {
    pub count: u64,
    pub ranking: Vec<CandidateId>,
}

impl WeightedBallot {
    pub fn new(count: u64, ranking: &[u32]) -> WeightedBallot {
        WeightedBallot {
            count,
            ranking: ranking.iter().map(|&c| CandidateId(c)).collect(),
        }
    }

    /// The position of the candidate in this ballot (0 for the first choice).
    pub fn position(&self, candidate: CandidateId) -> Option<usize> {
        self.ranking.iter().position(|&c| c == candidate)
    }
}

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct RankingEntry {
    pub candidate: CandidateId,
    pub score: f64,
}

/// Candidates sorted by decreasing score.
///
/// Candidates with the same score are sorted by increasing identifier.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Ranking {
    pub entries: Vec<RankingEntry>,
}

impl Ranking {
    /// The candidates in elected order, the first one being the winner.
    pub fn elected(&self) -> Vec<CandidateId> {
        self.entries.iter().map(|e| e.candidate).collect()
    }

    pub fn winner(&self) -> Option<CandidateId> {
        self.entries.first().map(|e| e.candidate)
    }

    /// All the candidates that share the top score.
    pub fn winners(&self) -> Vec<CandidateId> {
        match self.entries.first() {
            Some(top) => self
                .entries
                .iter()
                .take_while(|e| e.score == top.score)
                .map(|e| e.candidate)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn score_of(&self, candidate: CandidateId) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.candidate == candidate)
            .map(|e| e.score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankingEntry> {
        self.entries.iter()
    }
}

impl Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("({}, {})", e.candidate, e.score))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// The utility that one voter (or a group of voters) derives from an election outcome.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct VoterUtility {
    /// Utility derived from the position of the voter's first choice.
    pub top: f64,
    /// Utility summed over the voter's first `topn` choices.
    pub topn: f64,
}

/// What is wrong with the ballots given to build a profile.
///
/// The `index` fields refer to the position of the faulty ballot in the input.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ProfileDefect {
    Empty,
    ZeroCount {
        index: usize,
    },
    InconsistentLength {
        index: usize,
        expected: usize,
        found: usize,
    },
    DuplicateCandidate {
        index: usize,
        candidate: CandidateId,
    },
    InconsistentCandidates {
        index: usize,
    },
}

impl Display for ProfileDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileDefect::Empty => write!(f, "no ballots"),
            ProfileDefect::ZeroCount { index } => {
                write!(f, "ballot {} has a count of zero", index)
            }
            ProfileDefect::InconsistentLength {
                index,
                expected,
                found,
            } => write!(
                f,
                "ballot {} ranks {} candidates, expected {}",
                index, found, expected
            ),
            ProfileDefect::DuplicateCandidate { index, candidate } => write!(
                f,
                "ballot {} ranks candidate {} more than once",
                index, candidate
            ),
            ProfileDefect::InconsistentCandidates { index } => write!(
                f,
                "ballot {} does not rank the same candidates as the first ballot",
                index
            ),
        }
    }
}

/// Errors that prevent building a profile or scoring its candidates.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    InvalidProfile(ProfileDefect),
    InvalidRuleParameter { rule: String, reason: String },
    InvalidTopN { topn: usize, num_candidates: usize },
    UnknownCandidate(CandidateId),
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::InvalidProfile(defect) => write!(f, "invalid profile: {}", defect),
            VotingErrors::InvalidRuleParameter { rule, reason } => {
                write!(f, "invalid parameter for rule {}: {}", rule, reason)
            }
            VotingErrors::InvalidTopN {
                topn,
                num_candidates,
            } => write!(
                f,
                "top-n of {} is larger than the number of candidates ({})",
                topn, num_candidates
            ),
            VotingErrors::UnknownCandidate(cid) => {
                write!(f, "candidate {} is not part of the election", cid)
            }
        }
    }
}
