mod cli;

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, Format};
use hextris_infra::{output, scenario, terraform};

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Verify(args) => {
            let tree = terraform::load_from_path(&args.dir)?;
            let report = scenario::run(&tree, &scenario::hextris::scenarios());
            println!("{}", output::render_report(&report));

            if !report.is_success() {
                bail!("{} of {} scenarios failed", report.failed(), report.outcomes.len());
            }
            tracing::info!(count = report.passed(), "verification complete");
        }
        Command::Show(args) => {
            let tree = terraform::load_from_path(&args.dir)?;
            let rendered = match args.format {
                Format::Tree => output::render_tree(&args.dir.display().to_string(), &tree),
                Format::Json => output::render_json(&tree)?,
            };
            println!("{rendered}");
        }
    }

    Ok(())
}
