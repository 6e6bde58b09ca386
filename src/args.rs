use clap::Parser;

/// Simulates elections with synthetic voters and compares the utility of voting rules.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Number of candidates
    #[clap(value_parser)]
    pub num_candidates: Option<usize>,

    /// Number of voters
    #[clap(value_parser)]
    pub num_voters: Option<u64>,

    /// Number of iterations. Every iteration draws a new population of voters.
    #[clap(value_parser)]
    pub num_iterations: Option<usize>,

    /// Top N: the number of preferred candidates of each voter taken into account
    /// for the topn utility.
    #[clap(value_parser)]
    pub num_topn: Option<usize>,

    /// Model for the generation of voters: random, gaussian, multinomial_dirichlet
    #[clap(value_parser)]
    pub voters_model: Option<String>,

    /// (file path, optional) A JSON file with the settings of the simulation.
    /// The values passed on the command line override the ones in the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (optional) The seed of the random generator. If not provided, a seed is drawn
    /// and reported in the logs.
    #[clap(short, long, value_parser)]
    pub seed: Option<u64>,

    /// (file path, 'stdout' or empty) If specified, the results of all the iterations
    /// will be written in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// If passed as an argument, will turn on verbose logging.
    #[clap(short, long, takes_value = false)]
    pub verbose: bool,
}
