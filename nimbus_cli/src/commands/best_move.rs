use crate::commands::common::{AgentArgs, parse_heaps};
use anyhow::Result;
use clap::{self, Parser};
use nimbus::{
    agent::Mode,
    nim::{nim_game::NimGame, turn::GameTurnTracker},
};
use serde::Serialize;

/// Ask an agent for its move in a position without playing it
#[derive(Parser, Debug)]
pub struct Args {
    /// Comma separated list of heap sizes
    #[arg(long, num_args=1.., value_delimiter=',')]
    heaps: Vec<u32>,

    #[command(flatten)]
    agent: AgentArgs,
}

#[derive(Debug, Serialize)]
struct Report {
    agent: &'static str,
    position: String,
    nim_sum: String,
    best_move: Option<String>,
}

pub fn run(args: Args) -> Result<()> {
    let heaps = parse_heaps(args.heaps)?;
    let mut agent = args.agent.build(heaps.heap_count())?;

    let mut tracker = GameTurnTracker::new(heaps);
    let best_move = agent.propose_move(&mut tracker, Mode::Query)?;

    let report = Report {
        agent: agent.name(),
        position: tracker.game().to_string(),
        nim_sum: tracker.game().nim_sum().to_string(),
        best_move: best_move.map(|next| next.to_string()),
    };
    println!("{}", serde_json::ser::to_string(&report)?);

    Ok(())
}
