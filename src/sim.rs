use log::{debug, info};

use compsoc::*;
use snafu::prelude::*;

use std::collections::BTreeMap;
use std::fs;

use indicatif::ProgressBar;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::args::Args;
use crate::sim::config_reader::*;
use crate::sim::models::build_model;

pub mod config_reader;
pub mod io_summary;
pub mod models;

#[derive(Debug, Snafu)]
pub enum SimError {
    #[snafu(display("Error opening configuration file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration file {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the results: {source}"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing the results to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display(
        "Missing value for {name}: it must be provided on the command line or in the configuration file"
    ))]
    MissingArgument { name: String },
    #[snafu(display("Invalid configuration: {message}"))]
    InvalidConfig { message: String },
    #[snafu(display(
        "Unknown voter model {:?}, expected one of: {}",
        name,
        available.join(", ")
    ))]
    UnknownModel {
        name: String,
        available: Vec<String>,
    },
    #[snafu(display("Voter model {model} failed: {message}"))]
    Model { model: String, message: String },
    #[snafu(display("{source}"))]
    Voting { source: VotingErrors },
}

pub type SimResult<T> = Result<T, SimError>;

/// The outcome of one rule in one iteration.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct RuleOutcome {
    pub elected: Vec<u32>,
    pub top: f64,
    pub topn: f64,
}

/// The outcome of all the rules in one iteration, by rule name.
pub type IterationResult = BTreeMap<String, RuleOutcome>;

/// Statistics of one rule across all the iterations.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct RuleSummary {
    pub rule: String,
    #[serde(rename = "meanTop")]
    pub mean_top: f64,
    #[serde(rename = "stdTop")]
    pub std_top: f64,
    #[serde(rename = "meanTopn")]
    pub mean_topn: f64,
    #[serde(rename = "stdTopn")]
    pub std_topn: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct SimulationResults {
    pub iterations: BTreeMap<usize, IterationResult>,
    pub summary: Vec<RuleSummary>,
}

/// Scores one profile with all the rules, and measures the utility of the
/// voters for each outcome.
pub fn evaluate_voting_rules(
    profile: &Profile,
    rules: &[VotingRule],
    topn: usize,
) -> SimResult<IterationResult> {
    let mut result = IterationResult::new();
    for rule in rules.iter() {
        let rule_name = rule.name();
        let ranking = profile.ranking(rule);
        let elected = ranking.elected();
        debug!(
            "Ranking based on '{}' gives {} with winners {:?}",
            rule_name, ranking, elected
        );
        let u = profile_utility(profile, &ranking, topn).context(VotingSnafu)?;
        debug!("evaluate_voting_rules: {}: total utility {:?}", rule_name, u);
        result.insert(
            rule_name,
            RuleOutcome {
                elected: elected.iter().map(|c| c.0).collect(),
                top: u.top,
                topn: u.topn,
            },
        );
    }
    Ok(result)
}

/// Runs all the iterations of a simulation.
///
/// Every iteration draws a new population from the voter model, and all the
/// randomness comes from a generator seeded with the configured seed.
pub fn run_simulation(
    config: &SimulationConfig,
    show_progress: bool,
) -> SimResult<SimulationResults> {
    let rules = default_rules(&config.gammas).context(VotingSnafu)?;
    let model = build_model(&config.model, &config.model_params)?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    info!(
        "Running {} iterations: {} candidates, {} voters, model {}, seed {}",
        config.num_iterations, config.num_candidates, config.num_voters, config.model, config.seed
    );

    let pb = if show_progress {
        ProgressBar::new(config.num_iterations as u64)
    } else {
        ProgressBar::hidden()
    };

    let mut iterations: BTreeMap<usize, IterationResult> = BTreeMap::new();
    for i in 0..config.num_iterations {
        let pairs = model.generate(config.num_candidates, config.num_voters, &mut rng)?;
        let profile = Profile::new(pairs).context(VotingSnafu)?;
        debug!("Iteration {}: profile:\n{}", i, profile);
        let res = evaluate_voting_rules(&profile, &rules, config.topn)?;
        iterations.insert(i, res);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let summary = summarize(&rules, &iterations);
    Ok(SimulationResults {
        iterations,
        summary,
    })
}

fn mean_std(xs: &[f64]) -> (f64, f64) {
    if xs.is_empty() {
        return (0.0, 0.0);
    }
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let var = xs.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Mean and standard deviation of the utilities, in the order of the rules.
pub fn summarize(
    rules: &[VotingRule],
    iterations: &BTreeMap<usize, IterationResult>,
) -> Vec<RuleSummary> {
    rules
        .iter()
        .map(|rule| {
            let name = rule.name();
            let outcomes: Vec<&RuleOutcome> =
                iterations.values().filter_map(|it| it.get(&name)).collect();
            let tops: Vec<f64> = outcomes.iter().map(|o| o.top).collect();
            let topns: Vec<f64> = outcomes.iter().map(|o| o.topn).collect();
            let (mean_top, std_top) = mean_std(&tops);
            let (mean_topn, std_topn) = mean_std(&topns);
            RuleSummary {
                rule: name,
                mean_top,
                std_top,
                mean_topn,
                std_topn,
            }
        })
        .collect()
}

pub fn run(args: &Args) -> SimResult<()> {
    let file_config = match &args.config {
        Some(path) => read_config(path)?,
        None => SimConfigFile::default(),
    };
    let config = validate_config(args, &file_config)?;
    info!("config: {:?}", config);

    let results = run_simulation(&config, !args.verbose)?;

    println!("{}", io_summary::summary_table(&results.summary));

    if let Some(out_path) = &config.output_path {
        io_summary::write_results(&config, &results, out_path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::models::ModelParams;

    fn config(model: &str, seed: u64) -> SimulationConfig {
        SimulationConfig {
            num_candidates: 4,
            num_voters: 50,
            num_iterations: 3,
            topn: 2,
            model: model.to_string(),
            model_params: ModelParams::default(),
            seed,
            gammas: vec![1.0, 0.5],
            output_path: None,
        }
    }

    #[test]
    fn evaluate_example() {
        let p = Profile::from_pairs(&[(3, vec![0, 1, 2]), (2, vec![1, 2, 0]), (1, vec![2, 0, 1])])
            .unwrap();
        let rules = default_rules(&[]).unwrap();
        let res = evaluate_voting_rules(&p, &rules, 3).unwrap();
        let names: Vec<&String> = res.keys().collect();
        assert_eq!(names, vec!["borda", "copeland", "dowdall", "simpson"]);
        assert_eq!(res["borda"].elected, vec![0, 1, 2]);
        assert_eq!(res["simpson"].elected, vec![0, 1, 2]);
        // With all the choices counted, the utility does not depend on the outcome.
        assert!((res["borda"].topn - res["copeland"].topn).abs() < 1e-9);
    }

    #[test]
    fn simulation_is_reproducible() {
        for model in ["random", "gaussian", "multinomial_dirichlet"] {
            let r1 = run_simulation(&config(model, 17), false).unwrap();
            let r2 = run_simulation(&config(model, 17), false).unwrap();
            assert_eq!(r1, r2, "model {}", model);
            assert_eq!(r1.iterations.len(), 3);
            assert_eq!(r1.summary.len(), 6);
            for it in r1.iterations.values() {
                assert_eq!(it.len(), 6);
                assert!(it.contains_key("borda_gamma_0.5"));
            }
        }
    }

    #[test]
    fn utilities_are_bounded() {
        let c = config("random", 5);
        let r = run_simulation(&c, false).unwrap();
        for it in r.iterations.values() {
            for outcome in it.values() {
                // Every voter gets at most 1 per counted choice.
                assert!(outcome.top <= c.num_voters as f64 + 1e-9);
                assert!(outcome.topn <= (c.num_voters * c.topn as u64) as f64 + 1e-9);
                assert!(outcome.top > 0.0);
            }
        }
    }

    #[test]
    fn summary_statistics() {
        let rules = vec![VotingRule::Borda];
        let mut iterations: BTreeMap<usize, IterationResult> = BTreeMap::new();
        for (i, top) in [2.0, 4.0].iter().enumerate() {
            let mut it = IterationResult::new();
            it.insert(
                "borda".to_string(),
                RuleOutcome {
                    elected: vec![0, 1],
                    top: *top,
                    topn: 3.0,
                },
            );
            iterations.insert(i, it);
        }
        let s = summarize(&rules, &iterations);
        assert_eq!(
            s,
            vec![RuleSummary {
                rule: "borda".to_string(),
                mean_top: 3.0,
                std_top: 1.0,
                mean_topn: 3.0,
                std_topn: 0.0,
            }]
        );
    }
}
