use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stormwatch")]
#[command(version = "0.1.0")]
#[command(about = "Multi-agent weather risk monitoring service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config directory path
    #[arg(short, long, default_value = "config")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one monitoring round and print the round envelope as JSON
    Round {
        /// Pretty-print the envelope
        #[arg(long)]
        pretty: bool,
    },
    /// Run continuous rounds, serving the read-only API when enabled
    Watch {
        /// Override the configured round interval in seconds
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Run one round and print the per-agent status table
    Status,
    /// Run one round and print the summary report as JSON
    Report,
}
