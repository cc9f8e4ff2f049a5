// Morph search CLI entry point.
//
// Reads a JSON job (see `job.rs`), runs it against the built-in metric
// registry, and prints the result as JSON on stdout. Logs go to stderr and
// are filtered by RUST_LOG (default `info`).
//
// Usage:
//   cargo run -p morph_search --bin morph -- job.json [--seed N]
//
// Without --seed the clock picks one; it is logged so the run can be
// repeated.

use anyhow::{Context, Result};
use morph_prng::MorphRng;
use morph_search::job::Job;
use morph_search::metric::MetricRegistry;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let job_path = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .context("usage: morph <job.json> [--seed N]")?;
    let seed: u64 = parse_flag(&args, "--seed").unwrap_or_else(clock_seed);

    let text =
        std::fs::read_to_string(job_path).with_context(|| format!("reading {job_path}"))?;
    let job: Job = serde_json::from_str(&text).with_context(|| format!("parsing {job_path}"))?;
    info!(seed, job = %job_path, "running job");

    let registry = MetricRegistry::builtin();
    let mut rng = MorphRng::new(seed);
    let output = job.run(&registry, &mut rng).context("job failed")?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
