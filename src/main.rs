//! ei-merge CLI
//!
//! Entry point for the `ei-merge` command-line tool.

use clap::{Args, Parser, Subcommand};
use ei_model_merge::{
    logging, merge_roots, metadata, variables, MergeConfig, MergeReport, Overrides,
};
use std::path::{Path, PathBuf};
use std::process;

/// Exit code for a failed merge
const EXIT_MERGE: i32 = 1;
/// Exit code for an invalid configuration
const EXIT_CONFIG: i32 = 3;

#[derive(Parser)]
#[command(name = "ei-merge")]
#[command(about = "Merge two Edge Impulse model headers into one firmware build", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args)]
struct GlobalArgs {
    /// Path to config file (default: ./ei-merge.toml when present)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Print a JSON merge report instead of the confirmation line
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Name of the primary model (default: bee)
    #[arg(long, global = true)]
    primary_name: Option<String>,

    /// Name of the secondary model (default: varroa)
    #[arg(long, global = true)]
    secondary_name: Option<String>,

    /// Edge Impulse project id of the primary model
    #[arg(long, global = true)]
    primary_project_id: Option<u64>,

    /// Edge Impulse project id of the secondary model
    #[arg(long, global = true)]
    secondary_project_id: Option<u64>,
}

#[derive(Args)]
struct PairArgs {
    /// Header of the primary model
    #[arg(long, alias = "bee")]
    primary: PathBuf,

    /// Header of the secondary model
    #[arg(long, alias = "varroa")]
    secondary: PathBuf,

    /// Merged output header
    #[arg(long)]
    out: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge two model_metadata.h headers
    Meta(PairArgs),

    /// Merge two model_variables.h headers
    Vars(PairArgs),

    /// Merge both headers of two exported SDK trees
    All {
        /// SDK root of the primary model (contains model-parameters/)
        #[arg(long)]
        primary_root: PathBuf,

        /// SDK root of the secondary model
        #[arg(long)]
        secondary_root: PathBuf,

        /// Output SDK root
        #[arg(long)]
        out_root: PathBuf,
    },

    /// Print the effective configuration as JSON
    Config,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.global.verbose);

    let config = load_config(&cli.global);
    let json = cli.global.json;

    match cli.command {
        Commands::Meta(args) => run_meta(&config, &args, json),
        Commands::Vars(args) => run_vars(&config, &args, json),
        Commands::All {
            primary_root,
            secondary_root,
            out_root,
        } => run_all(&config, &primary_root, &secondary_root, &out_root, json),
        Commands::Config => run_config(&config),
    }
}

fn load_config(global: &GlobalArgs) -> MergeConfig {
    let overrides = Overrides {
        primary_name: global.primary_name.clone(),
        secondary_name: global.secondary_name.clone(),
        primary_project_id: global.primary_project_id,
        secondary_project_id: global.secondary_project_id,
    };

    match MergeConfig::load(global.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(EXIT_CONFIG);
        }
    }
}

fn run_meta(config: &MergeConfig, args: &PairArgs, json: bool) {
    match metadata::merge_with(config, &args.primary, &args.secondary, &args.out) {
        Ok(outcome) => emit(&[MergeReport::metadata(&outcome)], json),
        Err(e) => fail(&e),
    }
}

fn run_vars(config: &MergeConfig, args: &PairArgs, json: bool) {
    match variables::merge_with(config, &args.primary, &args.secondary, &args.out) {
        Ok(outcome) => emit(&[MergeReport::variables(&outcome)], json),
        Err(e) => fail(&e),
    }
}

fn run_all(
    config: &MergeConfig,
    primary_root: &Path,
    secondary_root: &Path,
    out_root: &Path,
    json: bool,
) {
    let (meta, vars) = match merge_roots(config, primary_root, secondary_root, out_root) {
        Ok(outcomes) => outcomes,
        Err(e) => fail(&e),
    };

    emit(
        &[MergeReport::metadata(&meta), MergeReport::variables(&vars)],
        json,
    );
}

fn run_config(config: &MergeConfig) {
    match config.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            process::exit(EXIT_MERGE);
        }
    }
}

/// One report prints as a JSON object, several as an array.
fn emit(reports: &[MergeReport], json: bool) {
    if !json {
        for report in reports {
            println!("{}", wrote_line(report));
        }
        return;
    }

    let rendered = match reports {
        [report] => report.to_json(),
        _ => serde_json::to_string_pretty(reports),
    };
    match rendered {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("Error serializing report: {}", e);
            process::exit(EXIT_MERGE);
        }
    }
}

fn wrote_line(report: &MergeReport) -> String {
    format!("Wrote: {}", report.output.path.display())
}

fn fail(err: &ei_model_merge::MergeError) -> ! {
    eprintln!("Error: {}", err);
    process::exit(EXIT_MERGE);
}
