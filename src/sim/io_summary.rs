use crate::sim::*;

use serde_json::json;
use serde_json::Value as JSValue;

/// Assembles the JSON document with the settings, the summary and the
/// outcome of every iteration.
pub fn build_results_js(config: &SimulationConfig, results: &SimulationResults) -> JSValue {
    let iterations: Vec<JSValue> = results
        .iterations
        .iter()
        .map(|(i, res)| {
            json!({
                "iteration": i,
                "rules": res,
            })
        })
        .collect();

    json!({
        "config": {
            "numCandidates": config.num_candidates,
            "numVoters": config.num_voters,
            "numIterations": config.num_iterations,
            "numTopn": config.topn,
            "votersModel": config.model,
            "seed": config.seed,
            "gammas": config.gammas,
            "gaussian": {
                "mu": config.model_params.mu,
                "stdv": config.model_params.stdv,
            },
            "dirichlet": {
                "alpha": config.model_params.alpha,
            },
        },
        "summary": results.summary,
        "iterations": iterations,
    })
}

/// A plain text table of the summary, one line per rule.
pub fn summary_table(summary: &[RuleSummary]) -> String {
    let width = summary
        .iter()
        .map(|s| s.rule.len())
        .max()
        .unwrap_or(0)
        .max("rule".len());
    let mut lines = vec![format!(
        "{:<width$}  {:>12}  {:>12}  {:>12}  {:>12}",
        "rule",
        "mean top",
        "std top",
        "mean topn",
        "std topn",
        width = width
    )];
    for s in summary.iter() {
        lines.push(format!(
            "{:<width$}  {:>12.4}  {:>12.4}  {:>12.4}  {:>12.4}",
            s.rule,
            s.mean_top,
            s.std_top,
            s.mean_topn,
            s.std_topn,
            width = width
        ));
    }
    lines.join("\n")
}

/// Writes the results to a file, or to the standard output if the path is
/// `stdout`. An empty path writes nothing.
pub fn write_results(
    config: &SimulationConfig,
    results: &SimulationResults,
    out_path: &str,
) -> SimResult<()> {
    if out_path.is_empty() {
        debug!("write_results: empty output path, skipping");
        return Ok(());
    }
    let js = build_results_js(config, results);
    let pretty_js = serde_json::to_string_pretty(&js).context(SerializingJsonSnafu {})?;
    if out_path == "stdout" {
        println!("{}", pretty_js);
    } else {
        fs::write(out_path, pretty_js).context(WritingSummarySnafu { path: out_path })?;
        info!("Results written to {}", out_path);
    }
    Ok(())
}
