use crate::commands::common::{AgentArgs, parse_heaps};
use anyhow::{Context, Result, bail};
use clap::{self, Parser};
use nimbus::{
    agent::Mode,
    nim::{
        moves::Move,
        nim_game::NimGame,
        turn::{GameTurnTracker, Player},
    },
};
use std::io::{BufRead, Write, stdin, stdout};

/// Play an interactive match against an agent.
///
/// Moves are entered as `heap count`, with heaps numbered from zero.
#[derive(Parser, Debug)]
pub struct Args {
    /// Comma separated list of heap sizes
    #[arg(long, num_args=1.., value_delimiter=',', default_values_t = [1, 3, 5, 7])]
    heaps: Vec<u32>,

    /// Let the agent make the first move
    #[arg(long, default_value_t = false)]
    agent_first: bool,

    #[command(flatten)]
    agent: AgentArgs,
}

fn parse_move(line: &str) -> Result<Move> {
    let mut words = line.split_whitespace();
    let (Some(heap), Some(count), None) = (words.next(), words.next(), words.next()) else {
        bail!("Expected `heap count`, got `{}`", line.trim());
    };
    let heap = heap
        .parse()
        .with_context(|| format!("Invalid heap index `{heap}`"))?;
    let count = count
        .parse()
        .with_context(|| format!("Invalid number of objects `{count}`"))?;
    Ok(Move::remove(heap, count))
}

pub fn run(args: Args) -> Result<()> {
    let heaps = parse_heaps(args.heaps)?;
    let mut agent = args.agent.build(heaps.heap_count())?;
    let human = if args.agent_first {
        Player::Second
    } else {
        Player::First
    };

    let mut tracker = GameTurnTracker::new(heaps);
    let mut lines = stdin().lock().lines();
    while !tracker.is_over() {
        if tracker.to_move() == human {
            println!("{}", tracker.game());
            print!("heap count> ");
            stdout().flush().context("Could not flush prompt")?;

            let Some(line) = lines.next() else {
                bail!("Input closed before the match ended");
            };
            let line = line.context("Could not read move")?;
            match parse_move(&line) {
                Ok(mov) => {
                    if let Err(err) = tracker.play(&mov) {
                        eprintln!("Illegal move: {err}");
                    }
                }
                Err(err) => eprintln!("{err:#}"),
            }
        } else {
            let before = tracker.game().clone();
            agent.propose_move(&mut tracker, Mode::Apply)?;
            log::debug!("{} moved from {} to {}", agent.name(), before, tracker.game());
            println!("{} plays {}", agent.name(), tracker.game());
        }
    }

    if tracker.winner() == Some(human) {
        println!("You won");
    } else {
        println!("{} won", agent.name());
    }

    Ok(())
}
