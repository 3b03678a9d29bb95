use crate::commands::*;
use anyhow::Result;
use clap::{self, Parser, Subcommand};

mod clap_utils;
mod commands;
mod io;

#[derive(Subcommand, Debug)]
enum Command {
    BestMove(best_move::Args),
    Play(play::Args),
    Rules(rules::Args),
    QLearning(q_learning::Args),
}

#[derive(Parser)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    match args.command {
        Command::BestMove(args) => best_move::run(args),
        Command::Play(args) => play::run(args),
        Command::Rules(args) => rules::run(args),
        Command::QLearning(args) => q_learning::run(args),
    }
}
