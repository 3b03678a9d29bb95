use crate::commands::common::{QLearningArgs, seeded_rng};
use anyhow::{Context, Result};
use clap::{self, Parser};
use nimbus::{
    agent::{Agent, q_learning::TrainingSchedule, random::RandomAgent},
    arena::{random_heaps, random_winning_heaps, win_ratio},
    nim::nim_game::NimGame,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;

/// Train a Q-learning agent by self-play and measure how well it plays
#[derive(Parser, Debug)]
pub struct Args {
    #[arg(long, default_value_t = 3)]
    heap_count: usize,

    /// Biggest heap in training and evaluation positions. Defaults to twice the number of
    /// heaps minus one
    #[arg(long, default_value = None)]
    max_heap: Option<u32>,

    /// Matches played against the random agent
    #[arg(long, default_value_t = 1000)]
    matches: usize,

    #[arg(long, default_value = None)]
    seed: Option<u64>,

    #[command(flatten)]
    q_learning: QLearningArgs,
}

#[derive(Debug, Serialize)]
struct Report {
    heap_count: usize,
    max_heap: u32,
    iterations: usize,
    learning_rate: f64,
    epsilon: f64,
    learned_transitions: usize,
    /// Wins against random play from random positions
    win_ratio: f64,
    /// Wins against random play from positions won by the player to move
    winning_start_win_ratio: f64,
    /// Fraction of winning positions where the agent moves to zero nim-sum
    optimal_move_ratio: f64,
}

pub fn run(args: Args) -> Result<()> {
    let iterations = args.q_learning.iterations;
    let schedule = match args.max_heap {
        Some(max_heap) => TrainingSchedule::new(iterations, args.heap_count, 1..=max_heap),
        None => TrainingSchedule::for_heap_count(iterations, args.heap_count),
    }
    .context("Invalid training schedule")?;
    let heap_values = schedule.heap_values().clone();

    let mut rng = seeded_rng(args.seed);
    let mut agent = nimbus::agent::q_learning::train(
        &schedule,
        args.q_learning.config()?,
        StdRng::seed_from_u64(rng.random()),
    )?;
    log::info!("Learned {} transitions", agent.table().len());

    let starts = (0..args.matches)
        .map(|_| random_heaps(&mut rng, args.heap_count, heap_values.clone()))
        .collect::<Vec<_>>();
    let winning_starts = (0..args.matches)
        .filter_map(|_| random_winning_heaps(&mut rng, args.heap_count, heap_values.clone()))
        .collect::<Vec<_>>();

    let mut opponent = RandomAgent::new(StdRng::seed_from_u64(rng.random()));
    let win_ratio_all = win_ratio(&mut agent, &mut opponent, starts)?;
    let winning_start_win_ratio =
        win_ratio(&mut agent, &mut opponent, winning_starts.iter().cloned())?;

    let optimal = winning_starts
        .iter()
        .filter(|start| {
            agent
                .best_move(*start)
                .is_some_and(|next| next.nim_sum().is_zero())
        })
        .count();
    let optimal_move_ratio = if winning_starts.is_empty() {
        0.0
    } else {
        optimal as f64 / winning_starts.len() as f64
    };

    let report = Report {
        heap_count: args.heap_count,
        max_heap: *heap_values.end(),
        iterations: schedule.iterations(),
        learning_rate: agent.config().learning_rate,
        epsilon: agent.config().epsilon,
        learned_transitions: agent.table().len(),
        win_ratio: win_ratio_all,
        winning_start_win_ratio,
        optimal_move_ratio,
    };
    println!("{}", serde_json::ser::to_string(&report)?);

    Ok(())
}
