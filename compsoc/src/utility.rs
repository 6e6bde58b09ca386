use log::debug;

use crate::{CandidateId, Profile, ProfileDefect, Ranking, VoterUtility, VotingErrors};

/// The utility of having a candidate elected at each position: the first
/// position is worth 1, the last one `1 / n`.
pub fn utility_increments(num_candidates: usize) -> Vec<f64> {
    (0..num_candidates)
        .map(|i| (num_candidates - i) as f64 / num_candidates as f64)
        .collect()
}

/// The utility a voter derives from an elected order, given the voter's own ballot.
///
/// `top` looks at where the voter's first choice ended up in the elected order.
/// `topn` adds up the same quantity for the first `topn` choices of the voter.
pub fn voter_utility(
    elected: &[CandidateId],
    ballot: &[CandidateId],
    topn: usize,
) -> Result<VoterUtility, VotingErrors> {
    let num_candidates = ballot.len();
    if topn > num_candidates {
        return Err(VotingErrors::InvalidTopN {
            topn,
            num_candidates,
        });
    }
    let increments = utility_increments(num_candidates);
    let increment = |cid: CandidateId| -> Result<f64, VotingErrors> {
        elected
            .iter()
            .position(|&c| c == cid)
            .and_then(|pos| increments.get(pos).cloned())
            .ok_or(VotingErrors::UnknownCandidate(cid))
    };

    let my_best = ballot
        .first()
        .ok_or(VotingErrors::InvalidProfile(ProfileDefect::Empty))?;
    let top = increment(*my_best)?;
    let mut total = 0.0;
    for &cid in ballot.iter().take(topn) {
        total += increment(cid)?;
    }
    Ok(VoterUtility { top, topn: total })
}

/// The utility of the whole electorate, each ballot being weighted by its count.
pub fn profile_utility(
    profile: &Profile,
    ranking: &Ranking,
    topn: usize,
) -> Result<VoterUtility, VotingErrors> {
    let elected = ranking.elected();
    let mut res = VoterUtility::default();
    for wb in profile.pairs() {
        let u = voter_utility(&elected, &wb.ranking, topn)?;
        debug!(
            "profile_utility: count {} ballot {:?} utility of first {}",
            wb.count, wb.ranking, u.top
        );
        res.top += wb.count as f64 * u.top;
        res.topn += wb.count as f64 * u.topn;
    }
    Ok(res)
}
