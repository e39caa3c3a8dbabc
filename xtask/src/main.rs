use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const CORE: &str = "fare_core";
const CLI: &str = "fare_cli";
const LAMBDA: &str = "fare_distance_lambda";
const LAMBDA_BIN: &str = "distance_lambda";
const BUNDLED_PRICING: &str = "crates/fare_cli/config/pricing.toml";
const LAMBDA_DIST_DIR: &str = "target/lambda/distance";

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the fare comparison workspace"
)]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Rank fares for a trip using the bundled pricing table
    Compare {
        /// Trip distance in kilometres
        #[arg(long, default_value_t = 10.0)]
        distance: f64,
        /// Sort by cost or time
        #[arg(long, default_value = "cost")]
        sort: String,
    },
    /// Run the fare_core Criterion benchmarks
    Bench,
    /// CI gate
    Ci {
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Build the distance lookup Lambda and zip it as `bootstrap`
    LambdaPackage {
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build without --release
        #[arg(long)]
        debug: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CiJob {
    /// fmt, clippy, tests and the bundled pricing table
    Check,
    /// Benchmarks only
    Bench,
    /// Check, then benchmarks
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn cargo(args: &[&str]) -> Result<()> {
    eprintln!("+ cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .context("spawning cargo")?;
    if !status.success() {
        bail!("`cargo {}` exited with {status}", args.join(" "));
    }
    Ok(())
}

fn bench() -> Result<()> {
    eprintln!("\n=== Benchmarks ===");
    cargo(&["bench", "-p", CORE, "--bench", "performance"])
}

fn check() -> Result<()> {
    eprintln!("\n=== Formatting ===");
    cargo(&["fmt", "--all", "--", "--check"])?;

    eprintln!("\n=== Clippy ===");
    cargo(&["clippy", "--workspace", "--all-targets", "--all-features", "--", "-D", "warnings"])?;

    for package in [CORE, CLI, LAMBDA] {
        eprintln!("\n=== Tests: {package} ===");
        cargo(&["test", "-p", package])?;
    }

    eprintln!("\n=== Bundled pricing table ===");
    cargo(&["run", "-q", "-p", CLI, "--", "--config", BUNDLED_PRICING, "check-config"])
}

fn zip_bootstrap(binary: &Path, archive: &Path) -> Result<()> {
    let bytes = fs::read(binary)
        .with_context(|| format!("reading lambda binary {}", binary.display()))?;
    let file = fs::File::create(archive)
        .with_context(|| format!("creating {}", archive.display()))?;

    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options)?;
    zip.write_all(&bytes)?;
    zip.finish()?;
    Ok(())
}

fn package_lambda(target: &str, debug: bool) -> Result<PathBuf> {
    eprintln!("\n=== Build {LAMBDA_BIN} for {target} ===");
    let mut args = vec!["build", "-p", LAMBDA, "--bin", LAMBDA_BIN, "--target", target];
    if !debug {
        args.push("--release");
    }
    cargo(&args)?;

    let profile_dir = if debug { "debug" } else { "release" };
    let binary = Path::new("target").join(target).join(profile_dir).join(LAMBDA_BIN);
    let dist = Path::new(LAMBDA_DIST_DIR);
    fs::create_dir_all(dist).with_context(|| format!("creating {}", dist.display()))?;

    let archive = dist.join("bootstrap.zip");
    zip_bootstrap(&binary, &archive)?;
    Ok(archive)
}

// ── main ───────────────────────────────────────────────────────────

fn main() -> Result<()> {
    match Cli::parse().command {
        Task::Compare { distance, sort } => {
            let distance = distance.to_string();
            cargo(&[
                "run", "-q", "-p", CLI, "--", "--config", BUNDLED_PRICING, "compare",
                "--distance", &distance, "--sort", &sort,
            ])?;
        }
        Task::Bench => bench()?,
        Task::Ci { job } => {
            match job {
                CiJob::Check => check()?,
                CiJob::Bench => bench()?,
                CiJob::All => {
                    check()?;
                    bench()?;
                }
            }
            eprintln!("\nCI job passed.");
        }
        Task::LambdaPackage { target, debug } => {
            let archive = package_lambda(&target, debug)?;
            eprintln!("\nPackaged {}", archive.display());
        }
    }
    Ok(())
}
