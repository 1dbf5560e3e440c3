#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the flets address tools.
//!
//! Every subcommand prints JSON on stdout. Without a subcommand the tool
//! drops into an interactive `dialoguer` menu.
//!
//! Uses `indicatif-log-bridge` (via [`flets_area_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the batch progress bar never fight for the terminal.

mod batch;
mod interactive;
mod report;

use std::fs::File;
use std::io::{BufReader, stdout};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use flets_area_address::decompose::{decompose_with_rule, try_decompose};
use flets_area_address::{
    AddressMatcher, MatchCandidate, NormalizeOptions, WhitespaceMode, config, normalize, similarity,
};
use flets_area_cli_utils::IndicatifProgress;

use crate::report::{DecomposeReport, MatchReport};

#[derive(Parser)]
#[command(name = "flets_area", about = "Japanese address normalization and candidate matching")]
struct Cli {
    /// Matcher tuning file (TOML); defaults to the embedded configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the normalized form of an address
    Normalize {
        address: String,
        /// Remove `大字`/`字` markers
        #[arg(long)]
        strip_aza: bool,
        /// Replace every kanji numeral with digits
        #[arg(long)]
        kansuji: bool,
        /// Collapse whitespace runs to one space instead of removing them
        #[arg(long)]
        collapse: bool,
    },
    /// Split an address into prefecture, city, town, chōme and number
    Decompose {
        address: String,
        /// Fail when the prefecture or city is missing
        #[arg(long)]
        strict: bool,
        /// Include the cascade rule that produced the town parts
        #[arg(long)]
        explain: bool,
    },
    /// Similarity of two addresses (0-100)
    Similarity { a: String, b: String },
    /// Pick the best candidate for an address
    Match {
        address: String,
        /// A candidate display text; repeat for each candidate
        #[arg(long = "candidate")]
        candidates: Vec<String>,
        /// File with one candidate per line
        #[arg(long)]
        candidates_file: Option<PathBuf>,
        /// Whole-string comparison only, without decomposition or bonuses
        #[arg(long)]
        simple: bool,
        /// Include the per-candidate score breakdown, best first
        #[arg(long)]
        explain: bool,
    },
    /// Decompose every line of a file, printing JSON Lines
    Batch { path: PathBuf },
}

fn read_candidates(
    inline: Vec<String>,
    file: Option<&Path>,
) -> Result<Vec<MatchCandidate>, std::io::Error> {
    let mut texts = inline;
    if let Some(path) = file {
        let contents = std::fs::read_to_string(path)?;
        texts.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    Ok(MatchCandidate::from_texts(texts))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = flets_area_cli_utils::init_logger();
    let cli = Cli::parse();

    let match_config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::default_config()?,
    };
    let matcher = AddressMatcher::new(match_config);

    let Some(command) = cli.command else {
        return interactive::run(&matcher);
    };

    match command {
        Commands::Normalize {
            address,
            strip_aza,
            kansuji,
            collapse,
        } => {
            let options = NormalizeOptions {
                strip_aza,
                convert_kansuji: kansuji,
                whitespace: if collapse {
                    WhitespaceMode::Collapse
                } else {
                    WhitespaceMode::Remove
                },
            };
            println!("{}", serde_json::to_string(&normalize(&address, options))?);
        }
        Commands::Decompose {
            address,
            strict,
            explain,
        } => {
            if strict {
                try_decompose(&address)?;
            }
            let (components, rule) = decompose_with_rule(&address);
            let report = DecomposeReport::new(&address, components, rule.filter(|_| explain));
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Similarity { a, b } => {
            println!("{:.2}", similarity(&a, &b));
        }
        Commands::Match {
            address,
            candidates,
            candidates_file,
            simple,
            explain,
        } => {
            let candidates = read_candidates(candidates, candidates_file.as_deref())?;
            if candidates.is_empty() {
                log::warn!("No candidates given");
            }

            let result = if simple {
                matcher.find_best_match_simple(&address, &candidates)
            } else {
                matcher.find_best_match(&address, &candidates)
            };
            let ranking = (explain && !simple)
                .then(|| matcher.score_candidates(&address, &candidates));

            let report = MatchReport::new(&address, result, &candidates, ranking);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Batch { path } => {
            let reader = BufReader::new(File::open(&path)?);
            let progress = IndicatifProgress::batch_bar(&multi, &path.display().to_string());
            let count = batch::run(reader, stdout().lock(), progress.as_ref())?;
            log::info!("Wrote {count} records");
        }
    }

    Ok(())
}
