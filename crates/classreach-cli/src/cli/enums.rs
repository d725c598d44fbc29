use clap::ValueEnum;

/// Output format for command results
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// One class per line, followed by a summary on stderr
    #[default]
    #[value(name = "text")]
    Text,

    /// A single JSON document on stdout
    #[value(name = "json")]
    Json,
}
