use clap::{Parser, Subcommand};

use pairsync::commands;
use pairsync::core::matcher::DEFAULT_MATCH_THRESHOLD;
use pairsync::types::{DiffArgs, MatchArgs, ScanArgs};

#[derive(Parser)]
#[command(
    name = "pairsync",
    version,
    about = "Compare shared project file trees before joining a pair-programming session"
)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a project and write its file listing
    Scan {
        project: String,

        /// Listing file to write (.gz compresses); stdout when omitted
        #[arg(short = 'o', long)]
        output: Option<String>,

        /// Glob pattern to exclude (repeatable)
        #[arg(short = 'i', long)]
        ignore: Vec<String>,

        /// Record paths only, without content checksums
        #[arg(long)]
        no_checksums: bool,

        /// SQLite checksum cache
        #[arg(long)]
        cache: Option<String>,

        /// Project identifier recorded in the listing (default: directory name)
        #[arg(long)]
        project_id: Option<String>,
    },

    /// Compare two projects or listings
    Diff {
        /// Directory or listing file
        base: String,

        /// Directory or listing file
        target: String,

        /// Target is a deliberate subset of base; ignore removals
        #[arg(short = 'p', long)]
        partial: bool,

        #[arg(short = 'i', long)]
        ignore: Vec<String>,

        #[arg(long)]
        cache: Option<String>,
    },

    /// Pick the local project that best matches a remote listing
    Match {
        /// Remote listing file
        remote: String,

        /// Candidate project directories
        #[arg(required = true)]
        candidates: Vec<String>,

        /// Score (percent) a candidate must exceed to be reused
        #[arg(
            short = 't',
            long,
            default_value_t = DEFAULT_MATCH_THRESHOLD,
            value_parser = clap::value_parser!(u8).range(0..=100)
        )]
        threshold: u8,

        #[arg(short = 'i', long)]
        ignore: Vec<String>,

        #[arg(long)]
        cache: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Scan {
            project,
            output,
            ignore,
            no_checksums,
            cache,
            project_id,
        } => commands::scan::scan(&ScanArgs {
            project,
            output,
            ignore,
            no_checksums,
            cache,
            project_id,
        })
        .map(|_| ()),
        Commands::Diff {
            base,
            target,
            partial,
            ignore,
            cache,
        } => commands::diff::diff(&DiffArgs {
            base,
            target,
            partial,
            ignore,
            cache,
        })
        .map(|_| ()),
        Commands::Match {
            remote,
            candidates,
            threshold,
            ignore,
            cache,
        } => commands::matching::matching(&MatchArgs {
            remote,
            candidates,
            threshold,
            ignore,
            cache,
        })
        .map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
