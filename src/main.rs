use std::path::PathBuf;

use anyhow::{bail, Context};
use bassboost_vts::suite::generate_cases;
use bassboost_vts::{run_suite, FactoryRegistry, SuiteConfig};
use clap::Parser;

/// Bass boost strength range conformance suite
#[derive(Parser, Debug)]
#[command(name = "bassboost-vts", version)]
struct Args {
    /// JSON suite configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only run cases whose name contains this substring
    #[arg(short, long)]
    filter: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// List case names and exit
    #[arg(long)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SuiteConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => SuiteConfig::default(),
    };
    let registry = FactoryRegistry::with_defaults();
    log::info!("factories: {}", registry.names().join(", "));

    if args.list {
        for case in generate_cases(&registry, &config) {
            println!("{}", case.name());
        }
        return Ok(());
    }

    let report = run_suite(&registry, &config, args.filter.as_deref());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for outcome in &report.outcomes {
            let status = if outcome.passed() { "ok" } else { "FAILED" };
            println!("{} ... {}", outcome.name, status);
            for failure in &outcome.failures {
                println!("    [{:?}] {}", failure.step, failure.message);
            }
        }
        println!("\n{} passed, {} failed", report.passed, report.failed);
    }

    if !report.all_passed() {
        bail!("{} case(s) failed", report.failed);
    }
    Ok(())
}
