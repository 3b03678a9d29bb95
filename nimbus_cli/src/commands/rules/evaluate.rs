use crate::commands::common::{RulesArgs, seeded_rng};
use anyhow::Result;
use clap::{self, Parser};
use nimbus::nim::heaps::Heaps;
use rand::Rng;

/// Measure win ratio of the rule agent against random play
#[derive(Parser, Debug)]
pub struct Args {
    /// Start from the position with heaps of 1, 3, 5, ... objects
    #[arg(long, default_value_t = 5)]
    rows: u32,

    #[arg(long, default_value_t = 1000)]
    matches: usize,

    #[arg(long, default_value = None)]
    seed: Option<u64>,

    #[command(flatten)]
    rules: RulesArgs,
}

pub fn run(args: Args) -> Result<()> {
    let start = Heaps::odd_rows(args.rows);
    let seed = seeded_rng(args.seed).random();
    let report = super::evaluate_config(args.rules.config()?, &start, args.matches, seed)?;
    println!("{}", serde_json::ser::to_string(&report)?);
    Ok(())
}
