use anyhow::Result;
use clap::Parser;
use node_icon_gen::node_gen::{self, Args, Outcome};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Parser)]
#[clap(
    name = "node-icon-gen",
    about = "Generate the recipe-tree node textures for the CraftMastery mod"
)]
struct Cli {
    /// Output directory. Defaults to the mod's GUI texture folder next to this tool.
    #[clap(short, long, value_name = "DIR")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("node_icon_gen=info".parse()?);
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args {
        output: cli
            .output
            .unwrap_or_else(|| node_gen::output_dir(Path::new(env!("CARGO_MANIFEST_DIR")))),
    };

    let outcomes = node_gen::generate_nodes(&args)?;
    let generated = outcomes
        .iter()
        .filter(|(_, outcome)| *outcome == Outcome::Generated)
        .count();
    info!("Done: {generated} of {} textures generated", outcomes.len());

    Ok(())
}
