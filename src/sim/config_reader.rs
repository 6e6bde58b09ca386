use crate::args::Args;
use crate::sim::models::{model_names, ModelParams, GAUSSIAN_MAX_CANDIDATES};
use crate::sim::*;

use serde::{Deserialize, Serialize};

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct GaussianSettings {
    pub mu: f64,
    pub stdv: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DirichletSettings {
    pub alpha: Option<Vec<f64>>,
}

/// The content of a configuration file. Every field is optional and may be
/// provided on the command line instead.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfigFile {
    #[serde(rename = "numCandidates")]
    pub num_candidates: Option<usize>,
    #[serde(rename = "numVoters")]
    pub num_voters: Option<u64>,
    #[serde(rename = "numIterations")]
    pub num_iterations: Option<usize>,
    #[serde(rename = "numTopn")]
    pub num_topn: Option<usize>,
    #[serde(rename = "votersModel")]
    pub voters_model: Option<String>,
    pub seed: Option<u64>,
    pub gammas: Option<Vec<f64>>,
    pub gaussian: Option<GaussianSettings>,
    pub dirichlet: Option<DirichletSettings>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

/// The validated settings of a simulation.
#[derive(PartialEq, Debug, Clone)]
pub struct SimulationConfig {
    pub num_candidates: usize,
    pub num_voters: u64,
    pub num_iterations: usize,
    pub topn: usize,
    pub model: String,
    pub model_params: ModelParams,
    pub seed: u64,
    pub gammas: Vec<f64>,
    pub output_path: Option<String>,
}

pub fn read_config(path: &str) -> SimResult<SimConfigFile> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: content: {:?}", contents);
    let config: SimConfigFile =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(config)
}

fn required<T>(cli: Option<T>, file: Option<T>, name: &str) -> SimResult<T> {
    cli.or(file).context(MissingArgumentSnafu { name })
}

/// Merges the command line and the configuration file, and checks that the
/// resulting settings describe a simulation that can run.
pub fn validate_config(args: &Args, file: &SimConfigFile) -> SimResult<SimulationConfig> {
    let num_candidates = required(args.num_candidates, file.num_candidates, "num_candidates")?;
    let num_voters = required(args.num_voters, file.num_voters, "num_voters")?;
    let num_iterations = required(args.num_iterations, file.num_iterations, "num_iterations")?;
    let topn = required(args.num_topn, file.num_topn, "num_topn")?;
    let model = required(
        args.voters_model.clone(),
        file.voters_model.clone(),
        "voters_model",
    )?;

    ensure!(
        num_candidates > 0,
        InvalidConfigSnafu {
            message: "the number of candidates must be positive"
        }
    );
    ensure!(
        num_voters > 0,
        InvalidConfigSnafu {
            message: "the number of voters must be positive"
        }
    );
    ensure!(
        num_iterations > 0,
        InvalidConfigSnafu {
            message: "the number of iterations must be positive"
        }
    );
    ensure!(
        topn <= num_candidates,
        InvalidConfigSnafu {
            message: format!(
                "top n ({}) cannot be larger than the number of candidates ({})",
                topn, num_candidates
            )
        }
    );

    let available = model_names();
    ensure!(
        available.contains(&model),
        UnknownModelSnafu {
            name: model.clone(),
            available
        }
    );

    let model_params = validate_model_params(&model, num_candidates, file)?;

    let gammas = file
        .gammas
        .clone()
        .unwrap_or_else(|| DEFAULT_GAMMAS.to_vec());
    // Fail early on invalid decays.
    default_rules(&gammas).context(VotingSnafu)?;
    let duplicate = gammas
        .iter()
        .enumerate()
        .find(|(i, g)| gammas[..*i].contains(*g))
        .map(|(_, g)| *g);
    if let Some(g) = duplicate {
        return InvalidConfigSnafu {
            message: format!("the decay {} is listed more than once in gammas", g),
        }
        .fail();
    }

    let seed = match args.seed.or(file.seed) {
        Some(s) => s,
        None => {
            let s: u64 = rand::random();
            info!("No seed provided, using seed {}", s);
            s
        }
    };

    let output_path = args.out.clone().or_else(|| file.output_path.clone());

    Ok(SimulationConfig {
        num_candidates,
        num_voters,
        num_iterations,
        topn,
        model,
        model_params,
        seed,
        gammas,
        output_path,
    })
}

fn validate_model_params(
    model: &str,
    num_candidates: usize,
    file: &SimConfigFile,
) -> SimResult<ModelParams> {
    let mut params = ModelParams::default();
    if let Some(g) = &file.gaussian {
        params.mu = g.mu;
        params.stdv = g.stdv;
    }
    params.alpha = file.dirichlet.as_ref().and_then(|d| d.alpha.clone());

    match model {
        "gaussian" => {
            ensure!(
                params.mu.is_finite() && params.mu > 0.0,
                InvalidConfigSnafu {
                    message: format!("gaussian mu must be positive, got {}", params.mu)
                }
            );
            ensure!(
                params.stdv.is_finite() && params.stdv > 0.0,
                InvalidConfigSnafu {
                    message: format!("gaussian stdv must be positive, got {}", params.stdv)
                }
            );
            ensure!(
                num_candidates <= GAUSSIAN_MAX_CANDIDATES,
                InvalidConfigSnafu {
                    message: format!(
                        "the gaussian model supports at most {} candidates",
                        GAUSSIAN_MAX_CANDIDATES
                    )
                }
            );
        }
        "multinomial_dirichlet" => {
            if let Some(alpha) = &params.alpha {
                ensure!(
                    alpha.len() == num_candidates,
                    InvalidConfigSnafu {
                        message: format!(
                            "alpha should have {} values, but has {}",
                            num_candidates,
                            alpha.len()
                        )
                    }
                );
                ensure!(
                    alpha.iter().all(|a| a.is_finite() && *a > 0.0),
                    InvalidConfigSnafu {
                        message: format!("alpha values must be positive: {:?}", alpha)
                    }
                );
            }
        }
        _ => {}
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(xs: &[&str]) -> Args {
        let mut all = vec!["compsoc"];
        all.extend_from_slice(xs);
        Args::parse_from(all)
    }

    #[test]
    fn from_command_line() {
        let a = args(&["5", "100", "3", "2", "random", "--seed", "7"]);
        let c = validate_config(&a, &SimConfigFile::default()).unwrap();
        assert_eq!(c.num_candidates, 5);
        assert_eq!(c.num_voters, 100);
        assert_eq!(c.num_iterations, 3);
        assert_eq!(c.topn, 2);
        assert_eq!(c.model, "random");
        assert_eq!(c.seed, 7);
        assert_eq!(c.gammas, DEFAULT_GAMMAS.to_vec());
        assert_eq!(c.model_params, ModelParams::default());
        assert_eq!(c.output_path, None);
    }

    #[test]
    fn command_line_overrides_file() {
        let file: SimConfigFile = serde_json::from_str(
            r#"{
                "numCandidates": 4,
                "numVoters": 50,
                "numIterations": 2,
                "numTopn": 1,
                "votersModel": "gaussian",
                "seed": 3,
                "gammas": [0.5],
                "gaussian": {"mu": 1.5, "stdv": 2.0},
                "outputPath": "out.json"
            }"#,
        )
        .unwrap();
        let c = validate_config(&args(&["3", "--seed", "9"]), &file).unwrap();
        assert_eq!(c.num_candidates, 3);
        assert_eq!(c.num_voters, 50);
        assert_eq!(c.model, "gaussian");
        assert_eq!(c.seed, 9);
        assert_eq!(c.gammas, vec![0.5]);
        assert_eq!(c.model_params.mu, 1.5);
        assert_eq!(c.model_params.stdv, 2.0);
        assert_eq!(c.output_path, Some("out.json".to_string()));
    }

    #[test]
    fn missing_argument() {
        let res = validate_config(&args(&["3", "10"]), &SimConfigFile::default());
        assert!(matches!(res, Err(SimError::MissingArgument { name }) if name == "num_iterations"));
    }

    #[test]
    fn unknown_model() {
        let res = validate_config(
            &args(&["3", "10", "1", "1", "impartial_culture"]),
            &SimConfigFile::default(),
        );
        assert!(matches!(res, Err(SimError::UnknownModel { .. })));
    }

    #[test]
    fn topn_too_large() {
        let res = validate_config(
            &args(&["3", "10", "1", "4", "random"]),
            &SimConfigFile::default(),
        );
        assert!(matches!(res, Err(SimError::InvalidConfig { .. })));
    }

    #[test]
    fn invalid_gamma() {
        let file = SimConfigFile {
            gammas: Some(vec![0.5, 2.0]),
            ..Default::default()
        };
        let res = validate_config(&args(&["3", "10", "1", "1", "random"]), &file);
        assert!(matches!(res, Err(SimError::Voting { .. })));
    }

    #[test]
    fn duplicate_gammas() {
        let file = SimConfigFile {
            gammas: Some(vec![0.5, 0.25, 0.5]),
            ..Default::default()
        };
        let res = validate_config(&args(&["3", "10", "1", "1", "random"]), &file);
        assert!(
            matches!(res, Err(SimError::InvalidConfig { message }) if message.contains("0.5"))
        );
    }

    #[test]
    fn alpha_length_mismatch() {
        let file = SimConfigFile {
            dirichlet: Some(DirichletSettings {
                alpha: Some(vec![1.1, 2.5, 3.8, 2.1, 1.3]),
            }),
            ..Default::default()
        };
        let res = validate_config(&args(&["3", "10", "1", "1", "multinomial_dirichlet"]), &file);
        assert!(matches!(res, Err(SimError::InvalidConfig { .. })));
    }

    #[test]
    fn gaussian_too_many_candidates() {
        let res = validate_config(
            &args(&["9", "10", "1", "1", "gaussian"]),
            &SimConfigFile::default(),
        );
        assert!(matches!(res, Err(SimError::InvalidConfig { .. })));
    }
}
