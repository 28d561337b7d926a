//! Effix classification CLI
//!
//! # Usage
//!
//! ```bash
//! # Print the reduced signature of a summary
//! cargo run --bin effix-classify -- signature summary.json
//!
//! # Cluster candidates against the original procedure's summary
//! cargo run --bin effix-classify -- classify --baseline orig.json \
//!     --report report.json patch-0.json:4 patch-1.json:2
//!
//! # Target bug given on the command line instead of a report
//! cargo run --bin effix-classify -- classify --baseline orig.json \
//!     --bug-type MEMORY_LEAK_C --start-line 10 --end-line 12 patch-0.json
//! ```

use clap::{Args, Parser, Subcommand};
use effix_core::config::EffixConfig;
use effix_core::features::disjunct::application::read_summary;
use effix_core::{BugDescriptor, BugType, ClusterManager, FormulaOracle, SummaryParser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "effix-classify")]
#[command(about = "Signature clustering and reward classification for candidate patches", long_about = None)]
struct Cli {
    /// YAML configuration file (version 1)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the patch signature of one summary
    Signature {
        /// Analyzer summary (JSON)
        summary: PathBuf,

        /// Print labels and executed lines instead
        #[arg(long)]
        traces: bool,
    },

    /// Cluster candidate summaries and grade each cluster
    Classify {
        /// Summary of the original, buggy procedure
        #[arg(short, long)]
        baseline: PathBuf,

        #[command(flatten)]
        bug: BugArgs,

        /// Candidate summaries as PATH or PATH:SIZE; missing files count as non-compilable
        #[arg(required = true, value_parser = parse_candidate)]
        candidates: Vec<(PathBuf, usize)>,
    },
}

#[derive(Args)]
struct BugArgs {
    /// Analyzer report holding the target bug
    #[arg(long, conflicts_with = "bug_type")]
    report: Option<PathBuf>,

    /// Which bug of the report to target
    #[arg(long, default_value = "0", requires = "report")]
    bug_index: usize,

    /// Bug type (MEMORY_LEAK_C, NULLPTR_DEREFERENCE, USE_AFTER_FREE)
    #[arg(long, requires_all = ["start_line", "end_line"])]
    bug_type: Option<String>,

    #[arg(long)]
    start_line: Option<i64>,

    #[arg(long)]
    end_line: Option<i64>,

    #[arg(long, default_value = "")]
    procedure: String,

    #[arg(long, default_value = "")]
    file: String,
}

impl BugArgs {
    fn descriptor(&self) -> Result<BugDescriptor, Box<dyn std::error::Error>> {
        if let Some(report) = &self.report {
            let bugs = effix_core::features::reward::read_report(report)?;
            return bugs.get(self.bug_index).cloned().ok_or_else(|| {
                format!(
                    "Report {} has {} bugs; index {} out of range",
                    report.display(),
                    bugs.len(),
                    self.bug_index
                )
                .into()
            });
        }
        match (&self.bug_type, self.start_line, self.end_line) {
            (Some(bug_type), Some(start), Some(end)) => Ok(BugDescriptor::new(
                BugType::from(bug_type.clone()),
                self.procedure.clone(),
                self.file.clone(),
                start,
                end,
            )),
            _ => Err("Either --report or --bug-type with --start-line/--end-line is required".into()),
        }
    }
}

fn parse_candidate(arg: &str) -> Result<(PathBuf, usize), String> {
    if let Some((path, size)) = arg.rsplit_once(':') {
        if let Ok(size) = size.parse() {
            return Ok((PathBuf::from(path), size));
        }
    }
    Ok((PathBuf::from(arg), 0))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => EffixConfig::from_yaml(path)?,
        None => EffixConfig::default(),
    };
    let oracle = FormulaOracle::from_config(&config.oracle)?;
    let parser = SummaryParser::new(oracle.clone());

    match cli.command {
        Commands::Signature { summary, traces } => {
            if traces {
                for (label, lines) in parser.traces(&read_summary(&summary)?)? {
                    println!("{} {:?}", label, lines);
                }
            } else {
                println!("{}", parser.signature_from_path(&summary)?);
            }
        }
        Commands::Classify {
            baseline,
            bug,
            candidates,
        } => {
            let bug = bug.descriptor()?;
            tracing::info!("Target bug: {}", bug);
            let baseline = parser.signature_from_path(&baseline)?;
            let manager = ClusterManager::new(baseline, bug, oracle, &config.clusters);

            for (path, size) in candidates {
                if !path.exists() {
                    manager.add_non_compilable(path);
                    continue;
                }
                let signature = parser.signature_from_path(&path)?;
                let assignment = manager.add_patch(path.clone(), size, signature)?;
                println!(
                    "{} -> {} ({}; pe +{:.2}, ppie +{:.2})",
                    path.display(),
                    assignment.cluster,
                    assignment.verdict,
                    assignment.verdict.pe.adjustment_factor(&config.reward),
                    assignment.verdict.ppie.adjustment_factor(&config.reward)
                );
            }

            println!("{}", manager);
            println!(
                "{} patches in {} clusters ({:.2} per cluster)",
                manager.total_patches(),
                manager.cluster_count(),
                manager.average_patches_per_cluster()
            );
        }
    }

    Ok(())
}
