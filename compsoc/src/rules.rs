use log::debug;

use std::fmt::Display;

use crate::{pairwise_preference, CandidateId, Profile, VotingErrors};

/// A voting rule that gives a score to each candidate of a profile.
///
/// Rules are pure: the score only depends on the profile and on the parameters
/// the rule was built with. Higher scores are better.
pub trait ScoringRule {
    fn name(&self) -> String;
    fn score(&self, profile: &Profile, candidate: CandidateId) -> f64;
}

/// The Borda count: a candidate gets `n - 1 - position` points from every voter.
pub fn borda_rule(profile: &Profile, candidate: CandidateId) -> u64 {
    // Max score to be applied with borda count
    let top_score = profile.num_candidates() - 1;
    profile
        .pairs()
        .iter()
        .filter_map(|wb| wb.position(candidate).map(|pos| wb.count * (top_score - pos) as u64))
        .sum()
}

/// The Dowdall rule (also known as the Nauru method): a candidate gets
/// `1 / (position + 1)` points from every voter.
pub fn dowdall_rule(profile: &Profile, candidate: CandidateId) -> f64 {
    positional_score(profile, candidate, |pos| 1.0 / (pos + 1) as f64)
}

/// The number of voters who put the candidate at each position.
pub fn position_counts(profile: &Profile, candidate: CandidateId) -> Vec<u64> {
    let mut counts = vec![0; profile.num_candidates()];
    for wb in profile.pairs() {
        if let Some(pos) = wb.position(candidate) {
            counts[pos] += wb.count;
        }
    }
    counts
}

// Sums in position order, so that two candidates with the same position
// counts get bit-identical scores whatever the order of the ballots.
fn positional_score<F: Fn(usize) -> f64>(
    profile: &Profile,
    candidate: CandidateId,
    weight: F,
) -> f64 {
    position_counts(profile, candidate)
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(pos, &count)| count as f64 * weight(pos))
        .sum()
}

/// The Copeland rule: the number of pairwise victories minus the number of
/// pairwise defeats. Pairwise ties do not count.
pub fn copeland_rule(profile: &Profile, candidate: CandidateId) -> i64 {
    let mut score: i64 = 0;
    for &other in profile.candidates().iter().filter(|&&c| c != candidate) {
        let wins = pairwise_preference(profile, candidate, other);
        let losses = pairwise_preference(profile, other, candidate);
        if wins > losses {
            score += 1;
        } else if wins < losses {
            score -= 1;
        }
    }
    score
}

/// The Simpson (minimax) rule: the worst pairwise result of the candidate,
/// counted in voters who prefer it to its opponent.
///
/// A candidate without opponents has the support of every voter.
pub fn simpson_rule(profile: &Profile, candidate: CandidateId) -> u64 {
    profile
        .candidates()
        .iter()
        .filter(|&&c| c != candidate)
        .map(|&other| pairwise_preference(profile, candidate, other))
        .min()
        .unwrap_or_else(|| profile.total_voters())
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Borda;

impl ScoringRule for Borda {
    fn name(&self) -> String {
        "borda".to_string()
    }

    fn score(&self, profile: &Profile, candidate: CandidateId) -> f64 {
        borda_rule(profile, candidate) as f64
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Dowdall;

impl ScoringRule for Dowdall {
    fn name(&self) -> String {
        "dowdall".to_string()
    }

    fn score(&self, profile: &Profile, candidate: CandidateId) -> f64 {
        dowdall_rule(profile, candidate)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Copeland;

impl ScoringRule for Copeland {
    fn name(&self) -> String {
        "copeland".to_string()
    }

    fn score(&self, profile: &Profile, candidate: CandidateId) -> f64 {
        copeland_rule(profile, candidate) as f64
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Simpson;

impl ScoringRule for Simpson {
    fn name(&self) -> String {
        "simpson".to_string()
    }

    fn score(&self, profile: &Profile, candidate: CandidateId) -> f64 {
        simpson_rule(profile, candidate) as f64
    }
}

/// A Borda variant with geometric decay: the candidate at position `i` of a
/// ballot gets `gamma^i` points.
///
/// With `gamma = 1`, every candidate gets the same score (the number of voters).
/// Small values of `gamma` get close to the plurality rule.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct BordaGamma {
    gamma: f64,
}

impl BordaGamma {
    /// The decay must be finite, strictly positive and at most 1.
    pub fn new(gamma: f64) -> Result<BordaGamma, VotingErrors> {
        let reason = if !gamma.is_finite() {
            Some("the decay must be a finite number")
        } else if gamma <= 0.0 || gamma > 1.0 {
            Some("the decay must be in the interval (0, 1]")
        } else {
            None
        };
        match reason {
            Some(r) => Err(VotingErrors::InvalidRuleParameter {
                rule: "borda_gamma".to_string(),
                reason: format!("{} (got {})", r, gamma),
            }),
            None => Ok(BordaGamma { gamma }),
        }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl ScoringRule for BordaGamma {
    fn name(&self) -> String {
        format!("borda_gamma_{}", self.gamma)
    }

    fn score(&self, profile: &Profile, candidate: CandidateId) -> f64 {
        positional_score(profile, candidate, |pos| self.gamma.powi(pos as i32))
    }
}

/// Returns the Borda variant with the given decay.
pub fn get_borda_gamma(gamma: f64) -> Result<BordaGamma, VotingErrors> {
    BordaGamma::new(gamma)
}

/// The decays of the Borda variants evaluated by default.
pub const DEFAULT_GAMMAS: [f64; 6] = [1.0, 0.99, 0.75, 0.6, 0.25, 0.01];

/// All the rules that can be evaluated by the simulator.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum VotingRule {
    Borda,
    Copeland,
    Dowdall,
    Simpson,
    BordaGamma(BordaGamma),
}

impl ScoringRule for VotingRule {
    fn name(&self) -> String {
        match self {
            VotingRule::Borda => Borda.name(),
            VotingRule::Copeland => Copeland.name(),
            VotingRule::Dowdall => Dowdall.name(),
            VotingRule::Simpson => Simpson.name(),
            VotingRule::BordaGamma(bg) => bg.name(),
        }
    }

    fn score(&self, profile: &Profile, candidate: CandidateId) -> f64 {
        match self {
            VotingRule::Borda => Borda.score(profile, candidate),
            VotingRule::Copeland => Copeland.score(profile, candidate),
            VotingRule::Dowdall => Dowdall.score(profile, candidate),
            VotingRule::Simpson => Simpson.score(profile, candidate),
            VotingRule::BordaGamma(bg) => bg.score(profile, candidate),
        }
    }
}

impl Display for VotingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The four classic rules, followed by one Borda variant for each decay.
pub fn default_rules(gammas: &[f64]) -> Result<Vec<VotingRule>, VotingErrors> {
    let mut rules = vec![
        VotingRule::Borda,
        VotingRule::Copeland,
        VotingRule::Dowdall,
        VotingRule::Simpson,
    ];
    for &gamma in gammas {
        rules.push(VotingRule::BordaGamma(get_borda_gamma(gamma)?));
    }
    debug!("default_rules: {:?}", rules);
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: u32) -> CandidateId {
        CandidateId(x)
    }

    fn example() -> Profile {
        Profile::from_pairs(&[(3, vec![0, 1, 2]), (2, vec![1, 2, 0]), (1, vec![2, 0, 1])])
            .unwrap()
    }

    fn assert_close(x: f64, y: f64) {
        assert!((x - y).abs() < 1e-9, "{} != {}", x, y);
    }

    #[test]
    fn borda_example() {
        let p = example();
        assert_eq!(borda_rule(&p, c(0)), 7);
        assert_eq!(borda_rule(&p, c(1)), 7);
        assert_eq!(borda_rule(&p, c(2)), 4);
    }

    #[test]
    fn borda_extremes() {
        let p = Profile::from_pairs(&[(3, vec![2, 0, 1]), (4, vec![2, 1, 0])]).unwrap();
        // Always first
        assert_eq!(borda_rule(&p, c(2)), 7 * 2);
        let p = Profile::from_pairs(&[(3, vec![2, 0, 1]), (4, vec![0, 2, 1])]).unwrap();
        // Always last
        assert_eq!(borda_rule(&p, c(1)), 0);
    }

    #[test]
    fn dowdall_example() {
        let p = example();
        assert_close(dowdall_rule(&p, c(0)), 3.0 + 2.0 / 3.0 + 0.5);
        assert_close(dowdall_rule(&p, c(1)), 1.5 + 2.0 + 1.0 / 3.0);
        assert_close(dowdall_rule(&p, c(2)), 3.0);
        let r = p.ranking(&Dowdall);
        assert_eq!(r.elected(), vec![c(0), c(1), c(2)]);
    }

    fn cyclic(num_candidates: u32) -> Profile {
        let pairs: Vec<(u64, Vec<u32>)> = (0..num_candidates)
            .map(|shift| {
                (
                    1,
                    (0..num_candidates)
                        .map(|i| (i + shift) % num_candidates)
                        .collect(),
                )
            })
            .collect();
        Profile::from_pairs(&pairs).unwrap()
    }

    #[test]
    fn position_counts_example() {
        let p = example();
        assert_eq!(position_counts(&p, c(0)), vec![3, 1, 2]);
        assert_eq!(position_counts(&p, c(2)), vec![1, 2, 3]);
    }

    #[test]
    fn dowdall_cyclic_tie() {
        let p = cyclic(4);
        let r = p.ranking(&Dowdall);
        assert_eq!(r.elected(), vec![c(0), c(1), c(2), c(3)]);
        assert_eq!(r.winners().len(), 4);
        let score = dowdall_rule(&p, c(0));
        for x in 1..4 {
            assert_eq!(dowdall_rule(&p, c(x)).to_bits(), score.to_bits());
        }
    }

    #[test]
    fn borda_gamma_cyclic_tie() {
        let p = cyclic(6);
        let r = p.ranking(&get_borda_gamma(0.6).unwrap());
        assert_eq!(r.winners().len(), 6);
        assert_eq!(r.elected(), (0..6).map(c).collect::<Vec<_>>());
    }

    #[test]
    fn tie_ignores_ballot_order() {
        let p = cyclic(5);
        let mut pairs: Vec<(u64, Vec<u32>)> = p
            .pairs()
            .iter()
            .map(|wb| (wb.count, wb.ranking.iter().map(|x| x.0).collect()))
            .collect();
        pairs.reverse();
        let q = Profile::from_pairs(&pairs).unwrap();
        for rule in default_rules(&DEFAULT_GAMMAS).unwrap() {
            assert_eq!(p.ranking(&rule), q.ranking(&rule), "rule {}", rule);
        }
    }

    #[test]
    fn copeland_example() {
        let p = example();
        // 0 beats 1, ties with 2. 1 beats 2.
        assert_eq!(copeland_rule(&p, c(0)), 1);
        assert_eq!(copeland_rule(&p, c(1)), 0);
        assert_eq!(copeland_rule(&p, c(2)), -1);
    }

    #[test]
    fn copeland_condorcet_winner() {
        let p = Profile::from_pairs(&[
            (2, vec![1, 0, 2, 3]),
            (1, vec![1, 3, 2, 0]),
            (2, vec![0, 1, 3, 2]),
        ])
        .unwrap();
        assert_eq!(copeland_rule(&p, c(1)), 3);
        let r = p.ranking(&Copeland);
        assert_eq!(r.winner(), Some(c(1)));
        assert_eq!(r.score_of(c(1)), Some(3.0));
    }

    #[test]
    fn copeland_cycle() {
        let p = Profile::from_pairs(&[(1, vec![0, 1, 2]), (1, vec![1, 2, 0]), (1, vec![2, 0, 1])])
            .unwrap();
        for x in 0..3 {
            assert_eq!(copeland_rule(&p, c(x)), 0);
        }
        assert_eq!(p.ranking(&Copeland).elected(), vec![c(0), c(1), c(2)]);
    }

    #[test]
    fn simpson_example() {
        let p = example();
        assert_eq!(simpson_rule(&p, c(0)), 3);
        assert_eq!(simpson_rule(&p, c(1)), 2);
        assert_eq!(simpson_rule(&p, c(2)), 1);
    }

    #[test]
    fn simpson_single_candidate() {
        let p = Profile::from_pairs(&[(3, vec![4]), (2, vec![4])]).unwrap();
        assert_eq!(simpson_rule(&p, c(4)), 5);
        assert_eq!(copeland_rule(&p, c(4)), 0);
        assert_eq!(borda_rule(&p, c(4)), 0);
    }

    #[test]
    fn borda_gamma_example() {
        let p = example();
        let bg = get_borda_gamma(0.5).unwrap();
        assert_eq!(bg.score(&p, c(0)), 4.0);
        assert_eq!(bg.score(&p, c(1)), 3.75);
        assert_eq!(bg.score(&p, c(2)), 2.75);
        assert_eq!(bg.name(), "borda_gamma_0.5");
    }

    #[test]
    fn borda_gamma_one_counts_voters() {
        let p = example();
        let bg = get_borda_gamma(1.0).unwrap();
        for &cand in p.candidates() {
            assert_eq!(bg.score(&p, cand), 6.0);
        }
    }

    #[test]
    fn borda_gamma_invalid() {
        for gamma in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.0, -0.5, 1.5] {
            assert!(matches!(
                get_borda_gamma(gamma),
                Err(VotingErrors::InvalidRuleParameter { .. })
            ));
        }
        assert!(default_rules(&[0.5, f64::NAN]).is_err());
    }

    #[test]
    fn default_rule_names() {
        let names: Vec<String> = default_rules(&DEFAULT_GAMMAS)
            .unwrap()
            .iter()
            .map(|r| r.to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "borda",
                "copeland",
                "dowdall",
                "simpson",
                "borda_gamma_1",
                "borda_gamma_0.99",
                "borda_gamma_0.75",
                "borda_gamma_0.6",
                "borda_gamma_0.25",
                "borda_gamma_0.01",
            ]
        );
    }

    #[test]
    fn registry_matches_rules() {
        let p = example();
        for &cand in p.candidates() {
            assert_eq!(VotingRule::Borda.score(&p, cand), Borda.score(&p, cand));
            assert_eq!(VotingRule::Copeland.score(&p, cand), Copeland.score(&p, cand));
            assert_eq!(VotingRule::Simpson.score(&p, cand), Simpson.score(&p, cand));
            assert_eq!(VotingRule::Dowdall.score(&p, cand), Dowdall.score(&p, cand));
        }
    }
}
