//! rf-jlcov - Coverage.jl annotation to JSON report converter
//!
//! Usage:
//!   rf-jlcov                  - Read ./src/*.jl.cov, write ./coverage/coverage.json
//!   rf-jlcov --root <DIR>     - Same layout, rooted at DIR

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rf_jlcov::ReportConfig;

#[derive(Parser)]
#[command(name = "rf-jlcov", about = "Convert Coverage.jl annotations into a JSON report")]
struct Cli {
    /// Project directory containing src/ and coverage/
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ReportConfig::default().with_root(&cli.root);
    rf_jlcov::run(&config)
        .with_context(|| format!("coverage report failed in {}", cli.root.display()))?;
    Ok(())
}
