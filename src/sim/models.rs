// Voter models: generative procedures for populations of ballots.

use crate::sim::*;

use compsoc::builder::ProfileBuilder;
use itertools::Itertools;
use rand::distributions::{Distribution, Open01, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use rand_distr::Dirichlet;
use statrs::distribution::{ContinuousCDF, Normal};

/// Beyond this, enumerating all the rankings is not reasonable (9! = 362880).
pub const GAUSSIAN_MAX_CANDIDATES: usize = 8;

/// The parameters of all the voter models.
#[derive(PartialEq, Debug, Clone)]
pub struct ModelParams {
    pub mu: f64,
    pub stdv: f64,
    pub alpha: Option<Vec<f64>>,
}

impl Default for ModelParams {
    fn default() -> Self {
        ModelParams {
            mu: 2.0,
            stdv: 1.0,
            alpha: None,
        }
    }
}

/// A procedure that draws the ballots of a population of voters.
///
/// The counts of the returned ballots add up to `num_voters`. All the
/// randomness comes from `rng`.
pub trait BallotGenerator {
    fn name(&self) -> &'static str;

    fn generate(
        &self,
        num_candidates: usize,
        num_voters: u64,
        rng: &mut dyn RngCore,
    ) -> SimResult<Vec<WeightedBallot>>;
}

pub type ModelFactory = fn(&ModelParams) -> Box<dyn BallotGenerator>;

fn make_random(_: &ModelParams) -> Box<dyn BallotGenerator> {
    Box::new(RandomModel)
}

fn make_gaussian(params: &ModelParams) -> Box<dyn BallotGenerator> {
    Box::new(GaussianModel {
        mu: params.mu,
        stdv: params.stdv,
    })
}

fn make_dirichlet(params: &ModelParams) -> Box<dyn BallotGenerator> {
    Box::new(DirichletModel {
        alpha: params.alpha.clone(),
    })
}

/// All the voter models, by name.
pub const REGISTRY: [(&str, ModelFactory); 3] = [
    ("random", make_random),
    ("gaussian", make_gaussian),
    ("multinomial_dirichlet", make_dirichlet),
];

pub fn model_names() -> Vec<String> {
    REGISTRY.iter().map(|(name, _)| name.to_string()).collect()
}

pub fn build_model(name: &str, params: &ModelParams) -> SimResult<Box<dyn BallotGenerator>> {
    match REGISTRY.iter().find(|(n, _)| *n == name) {
        Some((_, factory)) => Ok(factory(params)),
        None => UnknownModelSnafu {
            name,
            available: model_names(),
        }
        .fail(),
    }
}

fn candidate_list(num_candidates: usize) -> Vec<u32> {
    (0..num_candidates as u32).collect()
}

/// Every voter picks a ranking uniformly at random.
#[derive(Debug, Clone)]
pub struct RandomModel;

impl BallotGenerator for RandomModel {
    fn name(&self) -> &'static str {
        "random"
    }

    fn generate(
        &self,
        num_candidates: usize,
        num_voters: u64,
        rng: &mut dyn RngCore,
    ) -> SimResult<Vec<WeightedBallot>> {
        let mut builder = ProfileBuilder::new();
        let mut ranking = candidate_list(num_candidates);
        for _ in 0..num_voters {
            ranking.shuffle(rng);
            builder.add_ballot_simple(&ranking);
        }
        Ok(builder.into_ballots())
    }
}

/// The rankings, in lexicographic order, receive voters following a
/// discretized normal distribution centered in the middle of the list.
///
/// This model is deterministic.
#[derive(Debug, Clone)]
pub struct GaussianModel {
    pub mu: f64,
    pub stdv: f64,
}

impl BallotGenerator for GaussianModel {
    fn name(&self) -> &'static str {
        "gaussian"
    }

    fn generate(
        &self,
        num_candidates: usize,
        num_voters: u64,
        _rng: &mut dyn RngCore,
    ) -> SimResult<Vec<WeightedBallot>> {
        ensure!(
            num_candidates <= GAUSSIAN_MAX_CANDIDATES,
            ModelSnafu {
                model: self.name(),
                message: format!("too many candidates: {}", num_candidates)
            }
        );
        let permutations: Vec<Vec<u32>> = candidate_list(num_candidates)
            .into_iter()
            .permutations(num_candidates)
            .collect();
        let normal = Normal::new(0.0, self.stdv).map_err(|e| SimError::Model {
            model: self.name().to_string(),
            message: e.to_string(),
        })?;

        // Permutation k is placed at k - P/2.
        let half = permutations.len() as f64 / 2.0;
        let prob: Vec<f64> = (0..permutations.len())
            .map(|k| {
                let x = k as f64 - half;
                normal.cdf(x + self.mu) - normal.cdf(x - self.mu)
            })
            .collect();
        let total_prob: f64 = prob.iter().sum();
        ensure!(
            total_prob > 0.0,
            ModelSnafu {
                model: self.name(),
                message: format!("degenerate distribution (mu = {})", self.mu)
            }
        );

        let mut dist: Vec<u64> = prob
            .iter()
            .map(|p| (num_voters as f64 * p / total_prob) as u64)
            .collect();

        // Truncation loses a few voters: give them to the most popular ranking.
        let assigned: u64 = dist.iter().sum();
        let max_count = dist.iter().cloned().max().unwrap_or(0);
        if let Some(max_idx) = dist.iter().position(|&c| c == max_count) {
            dist[max_idx] += num_voters.saturating_sub(assigned);
        }
        debug!("gaussian: distribution {:?}", dist);

        // Remove rankings with 0 occurence
        Ok(dist
            .iter()
            .zip(permutations.iter())
            .filter(|(count, _)| **count > 0)
            .map(|(&count, ranking)| WeightedBallot::new(count, ranking))
            .collect())
    }
}

/// Candidates have a popularity drawn from a Dirichlet distribution. Each
/// voter then draws the candidates one after the other, without replacement,
/// proportionally to their popularity.
#[derive(Debug, Clone)]
pub struct DirichletModel {
    /// Drawn uniformly for each candidate when not provided.
    pub alpha: Option<Vec<f64>>,
}

impl DirichletModel {
    fn popularity(&self, num_candidates: usize, rng: &mut dyn RngCore) -> SimResult<Vec<f64>> {
        let alpha: Vec<f64> = match &self.alpha {
            Some(a) => {
                ensure!(
                    a.len() == num_candidates,
                    ModelSnafu {
                        model: self.name(),
                        message: format!(
                            "alpha should have {} values, but has {}",
                            num_candidates,
                            a.len()
                        )
                    }
                );
                a.clone()
            }
            None => (0..num_candidates).map(|_| rng.sample(Open01)).collect(),
        };
        debug!("multinomial_dirichlet: alpha {:?}", alpha);
        if num_candidates < 2 {
            return Ok(vec![1.0; num_candidates]);
        }
        let dirichlet = Dirichlet::new(&alpha).map_err(|e| SimError::Model {
            model: self.name().to_string(),
            message: format!("{:?}", e),
        })?;
        Ok(dirichlet.sample(rng))
    }
}

impl BallotGenerator for DirichletModel {
    fn name(&self) -> &'static str {
        "multinomial_dirichlet"
    }

    fn generate(
        &self,
        num_candidates: usize,
        num_voters: u64,
        rng: &mut dyn RngCore,
    ) -> SimResult<Vec<WeightedBallot>> {
        let p = self.popularity(num_candidates, rng)?;
        debug!("multinomial_dirichlet: popularity {:?}", p);
        let mut builder = ProfileBuilder::new();
        for _ in 0..num_voters {
            let ranking = draw_without_replacement(&p, rng);
            builder.add_ballot_simple(&ranking);
        }
        Ok(builder.into_ballots())
    }
}

// Draws all the candidates, one at a time, proportionally to the remaining weights.
fn draw_without_replacement(weights: &[f64], rng: &mut dyn RngCore) -> Vec<u32> {
    let mut remaining: Vec<(u32, f64)> = weights
        .iter()
        .enumerate()
        .map(|(idx, &w)| (idx as u32, w))
        .collect();
    let mut ranking: Vec<u32> = Vec::with_capacity(weights.len());
    while !remaining.is_empty() {
        let idx = match WeightedIndex::<f64>::new(remaining.iter().map(|(_, w)| *w)) {
            Ok(wi) => wi.sample(rng),
            // All the remaining weights vanished numerically.
            Err(_) => rng.gen_range(0..remaining.len()),
        };
        ranking.push(remaining.remove(idx).0);
    }
    ranking
}
