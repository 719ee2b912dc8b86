use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "recordbook",
    version,
    about = "records board: page navigation, leaderboard and profiles",
    long_about = "Recordbook loads a records.json resource, ranks the people in it, and renders the records board the way a visitor would see it after a sequence of clicks.\n\nExamples:\n  recordbook --site https://example.com/\n  recordbook --records ./Assets/records.json --location 'http://localhost/?person=Ada#people'\n  recordbook --records ./Assets/records.json --step click:people --step open:Ada -o board.html\n\nTip: Use --config to persist the page layout and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(long = "no-color", help_heading = "Output", help = "Disable colored output.")]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the rendered board to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: text, json, html (inferred from --output otherwise)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 's',
        long = "site",
        value_name = "URL",
        help_heading = "Input",
        help = "Site root; images resolve under <site>/Assets/."
    )]
    pub site: Option<String>,

    #[arg(
        short = 'r',
        long = "records",
        value_name = "URL|FILE",
        help_heading = "Input",
        help = "Records resource (defaults to <site>/Assets/records.json)."
    )]
    pub records: Option<String>,

    #[arg(
        short = 'l',
        long = "location",
        value_name = "URL",
        help_heading = "Input",
        help = "Page URL the session starts from (defaults to the site root)."
    )]
    pub location: Option<String>,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.recordbook/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write the default config file if it does not exist, then exit."
    )]
    pub init_config: bool,

    #[arg(
        long = "default-page",
        visible_alias = "dp",
        value_name = "ID",
        help_heading = "Page",
        help = "Page shown when the URL hash names no page."
    )]
    pub default_page: Option<String>,

    #[arg(
        long = "pages",
        value_name = "IDS",
        help_heading = "Page",
        help = "Comma-separated page section ids."
    )]
    pub pages: Option<String>,

    #[arg(
        long = "person-param",
        value_name = "NAME",
        help_heading = "Page",
        help = "Query parameter carrying the profile name."
    )]
    pub person_param: Option<String>,

    #[arg(
        long = "step",
        value_name = "STEP",
        action = ArgAction::Append,
        help_heading = "Page",
        help = "Replay a user step (repeatable): click:<page>, hash:<page>, open:<name>, back, history-back, history-forward."
    )]
    pub steps: Vec<String>,

    #[arg(
        long = "timeout",
        value_name = "SECS",
        help_heading = "HTTP",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy for the records request."
    )]
    pub proxy: Option<String>,
}
