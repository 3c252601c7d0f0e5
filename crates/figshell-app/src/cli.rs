use std::path::PathBuf;

use clap::Parser;

/// A tabbed desktop shell for Figma.
#[derive(Parser, Debug)]
#[command(name = "figshell", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter override, e.g. `figshell=debug`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// URL to open in the first tab instead of the configured home page.
    pub url: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
