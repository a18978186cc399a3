use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tax-tracker", version, about = "Vehicle tax customer tracking service")]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (defaults to config/app if present)")]
    pub config: Option<String>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the HTTP service (default)
    Serve,
    /// Re-derive stored statuses for today and write back the ones that changed
    RefreshStatus {
        #[arg(long, default_value_t = false, help = "Report changes without writing")]
        dry_run: bool,
    },
}
