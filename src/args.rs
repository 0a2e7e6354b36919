use clap::Parser;

/// This is a leaderboard program for trading competitions.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file describing the competition (teams, storage, deadline) in JSON format.
    /// If not provided, the built-in competition with the seven sector teams is used.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (team name) The team that submits an upload. Must be used together with --upload.
    #[clap(short, long, value_parser, requires = "upload")]
    pub team: Option<String>,

    /// (file path) The account-history export (csv or xlsx) uploaded for the team given with --team.
    #[clap(short, long, value_parser, requires = "team")]
    pub upload: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the leaderboard will be written to the given location.
    /// Setting this option overrides the path that may be specified with the --config option,
    /// unless it is empty.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) The file holding the latest upload of each team between two runs.
    /// Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub session: Option<String>,

    /// (file path) A reference leaderboard in JSON or CSV format. If provided, tlb will
    /// check that the computed leaderboard matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// If passed as an argument, shows the time left until the deadline of the competition
    /// once the leaderboard is updated.
    #[clap(long, takes_value = false)]
    pub countdown: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
