crate::clap_utils::mk_subcommand! {
    Evaluate => evaluate,
    GridSearch => grid_search,
}

use anyhow::Result;
use nimbus::{
    agent::{
        random::RandomAgent,
        rules::{RuleAgent, RulesConfig},
    },
    arena::win_ratio,
    nim::heaps::Heaps,
};
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
struct Report {
    k: Option<usize>,
    alpha: f64,
    endgame_nim: f64,
    strategy: String,
    matches: usize,
    win_ratio: f64,
}

/// Play `matches` matches from `start` against the random agent, the rule agent moving first
fn evaluate_config(
    config: RulesConfig,
    start: &Heaps,
    matches: usize,
    seed: u64,
) -> Result<Report> {
    let mut agent = RuleAgent::new(config, StdRng::seed_from_u64(seed))?;
    let mut opponent = RandomAgent::new(StdRng::seed_from_u64(seed.wrapping_add(1)));
    let win_ratio = win_ratio(
        &mut agent,
        &mut opponent,
        std::iter::repeat_n(start, matches).cloned(),
    )?;
    Ok(Report {
        k: config.k,
        alpha: config.alpha,
        endgame_nim: config.endgame_nim,
        strategy: config.strategy.to_string(),
        matches,
        win_ratio,
    })
}
