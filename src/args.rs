use clap::Parser;

/// This is a tabulation program for provider access spreadsheets.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON report configuration: data sources, column layout,
    /// alias table and output settings. For more information about the file format, read
    /// the documentation.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The market-share spreadsheet (.csv or .xlsx). Used when no --config
    /// is given; the format is inferred from the file extension.
    #[clap(short, long, value_parser)]
    pub market_file: Option<String>,

    /// (file path, optional) The access-method spreadsheet (.csv or .xlsx). Tabulated
    /// alongside the market-share data.
    #[clap(short, long, value_parser)]
    pub access_file: Option<String>,

    /// (string, optional) Looks up providers whose name contains this text. The search
    /// ignores case and accents. A message is printed when nothing matches.
    #[clap(short, long, value_parser)]
    pub search: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the report will be
    /// written in JSON format to the given location. Setting this option overrides the
    /// output directory that may be specified in the configuration.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the summary of a report in JSON format.
    /// If provided, provtally will check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
