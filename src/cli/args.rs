use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(name = "hc-assistant")]
#[command(
    about = "Web form that answers HR policy questions through an LLM agent",
    long_about = "Web form that answers HR policy questions through an LLM agent\n\nConfig file loading:\n  - --config <path> (explicit file, overrides default path discovery)\n  - Default probe path when --config is not provided:\n    1. $XDG_CONFIG_HOME/hc-assistant/config.toml\n    2. ~/.config/hc-assistant/config.toml\n\nEnvironment variables (also read from .env) override the file; flags override both."
)]
pub struct CliArgs {
    /// Load config from this file path instead of the default discovery path.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Address to bind the web server on.
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Log provider HTTP traffic with secrets redacted.
    #[arg(short, long)]
    pub verbose: bool,
}
