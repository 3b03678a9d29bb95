use crate::io::{FileOrStdout, write_json_line};
use anyhow::{Context, Result};
use clap::{self, Parser};
use itertools::iproduct;
use nimbus::{
    agent::rules::{RulesConfig, Strategy},
    nim::heaps::Heaps,
};
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use serde::Serialize;
use std::io::{BufWriter, Write};

/// Evaluate every combination of rule agent parameters against random play
#[derive(Parser, Debug)]
pub struct Args {
    /// Start from the position with heaps of 1, 3, 5, ... objects
    #[arg(long, default_value_t = 5)]
    rows: u32,

    /// Matches played by every configuration
    #[arg(long, default_value_t = 200)]
    matches: usize,

    /// Comma separated list of opening lengths
    #[arg(long, num_args=1.., value_delimiter=',', default_values_t = [1, 2, 3, 4])]
    k: Vec<usize>,

    /// Comma separated list of opening probabilities
    #[arg(long, num_args=1.., value_delimiter=',', default_values_t = [0.5, 0.7, 0.9, 1.0])]
    alpha: Vec<f64>,

    /// Comma separated list of endgame fractions
    #[arg(long, num_args=1.., value_delimiter=',', default_values_t = [0.2, 0.4, 0.6, 0.8, 1.0])]
    endgame_nim: Vec<f64>,

    /// Comma separated list of midgame weightings
    #[arg(long, num_args=1.., value_delimiter=',', default_values_t = Strategy::ALL)]
    strategy: Vec<Strategy>,

    /// Seed of the first configuration, following ones use consecutive seeds
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value = "-")]
    output: FileOrStdout,

    #[arg(long, default_value = None)]
    threads: Option<u32>,
}

#[derive(Serialize)]
struct Best<'a> {
    best: &'a super::Report,
}

pub fn run(args: Args) -> Result<()> {
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads as usize)
            .build_global()
            .context("Could not build the thread pool")?;
    }

    let configs = iproduct!(&args.k, &args.alpha, &args.endgame_nim, &args.strategy)
        .map(|(k, alpha, endgame_nim, strategy)| {
            RulesConfig::new(Some(*k), *alpha, *endgame_nim, *strategy)
                .context("Invalid rule agent configuration")
        })
        .collect::<Result<Vec<_>>>()?;
    log::info!("Evaluating {} configurations", configs.len());

    let start = Heaps::odd_rows(args.rows);
    let reports = configs
        .into_par_iter()
        .enumerate()
        .map(|(idx, config)| {
            super::evaluate_config(config, &start, args.matches, args.seed.wrapping_add(2 * idx as u64))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut output = BufWriter::new(
        args.output
            .create()
            .with_context(|| format!("Could not open output file `{}`", &args.output))?,
    );
    for report in &reports {
        write_json_line(&mut output, report)?;
    }
    if let Some(best) = reports
        .iter()
        .max_by(|lhs, rhs| lhs.win_ratio.total_cmp(&rhs.win_ratio))
    {
        write_json_line(&mut output, &Best { best })?;
    }
    output.flush().context("Could not flush output")?;

    Ok(())
}
