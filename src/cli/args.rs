use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the configuration against the Hextris expectations
    Verify(VerifyArgs),
    /// Print the loaded configuration tree
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct VerifyArgs {
    #[arg(long, env = "HEXTRIS_TF_DIR", default_value = "infra")]
    pub dir: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    #[arg(long, env = "HEXTRIS_TF_DIR", default_value = "infra")]
    pub dir: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Tree)]
    pub format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Tree,
    Json,
}
