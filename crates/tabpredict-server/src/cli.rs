use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "tabpredict-server")]
#[command(author, version, about = "Serve predictions from a pre-fitted tabular classifier")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "tabpredict.yaml")]
    pub config: String,

    /// Classifier artifact path (overrides the config file)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Listen address
    #[arg(short = 'l', long, default_value = "0.0.0.0")]
    pub listen: String,

    /// Listen port
    #[arg(short = 'P', long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
