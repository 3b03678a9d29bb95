use anyhow::{Context, Result};
use nimbus::{
    agent::{
        Agent, AgentKind,
        minimax::MinimaxAgent,
        nim_sum::NimSumAgent,
        q_learning::{self, QLearningConfig, TrainingSchedule},
        random::RandomAgent,
        rules::{RuleAgent, RulesConfig, Strategy},
    },
    nim::heaps::Heaps,
};
use rand::{SeedableRng, rngs::StdRng};

/// Parameters of the rule-based agent
#[derive(clap::Args, Debug, Clone)]
pub struct RulesArgs {
    /// Opening lasts until that many heaps hold at most one object. Defaults to the number of
    /// heaps minus one
    #[arg(long)]
    pub k: Option<usize>,

    /// Probability of emptying the biggest heap in opening
    #[arg(long, default_value_t = 0.9)]
    pub alpha: f64,

    /// Fraction of the biggest heap taken in endgame
    #[arg(long, default_value_t = 0.6)]
    pub endgame_nim: f64,

    /// Midgame pair weighting: none, min, max or sum
    #[arg(long, default_value_t = Strategy::Unweighted)]
    pub strategy: Strategy,
}

impl RulesArgs {
    pub fn config(&self) -> Result<RulesConfig> {
        RulesConfig::new(self.k, self.alpha, self.endgame_nim, self.strategy)
            .context("Invalid rule agent configuration")
    }
}

/// Parameters of the Q-learning agent and its training
#[derive(clap::Args, Debug, Clone)]
pub struct QLearningArgs {
    #[arg(long, default_value_t = 0.5)]
    pub learning_rate: f64,

    /// Probability of a random move during training
    #[arg(long, default_value_t = 0.2)]
    pub epsilon: f64,

    /// Number of self-play training episodes
    #[arg(long, default_value_t = 10_000)]
    pub iterations: usize,
}

impl QLearningArgs {
    pub fn config(&self) -> Result<QLearningConfig> {
        QLearningConfig::new(self.learning_rate, self.epsilon)
            .context("Invalid Q-learning configuration")
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct AgentArgs {
    /// Agent choosing the moves: nim-sum, minimax, rules, q-learning or random
    #[arg(long, default_value_t = AgentKind::NimSum)]
    pub agent: AgentKind,

    #[command(flatten)]
    pub rules: RulesArgs,

    #[command(flatten)]
    pub q_learning: QLearningArgs,

    /// Seed of the random number generator. Random if not provided
    #[arg(long, default_value = None)]
    pub seed: Option<u64>,
}

impl AgentArgs {
    pub fn rng(&self) -> StdRng {
        seeded_rng(self.seed)
    }

    /// Build the selected agent, training it first if it learns
    pub fn build(&self, heap_count: usize) -> Result<Box<dyn Agent>> {
        let agent: Box<dyn Agent> = match self.agent {
            AgentKind::NimSum => Box::new(NimSumAgent),
            AgentKind::Minimax => Box::new(MinimaxAgent::new()),
            AgentKind::Rules => Box::new(RuleAgent::new(self.rules.config()?, self.rng())?),
            AgentKind::QLearning => {
                let schedule =
                    TrainingSchedule::for_heap_count(self.q_learning.iterations, heap_count)?;
                log::info!(
                    "Training Q-learning agent for {} episodes",
                    schedule.iterations()
                );
                Box::new(q_learning::train(
                    &schedule,
                    self.q_learning.config()?,
                    self.rng(),
                )?)
            }
            AgentKind::Random => Box::new(RandomAgent::new(self.rng())),
        };
        Ok(agent)
    }
}

pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

pub fn parse_heaps(heaps: Vec<u32>) -> Result<Heaps> {
    if heaps.is_empty() {
        anyhow::bail!("Position needs at least one heap. Use --heaps a,b,... to specify it.");
    }
    Ok(Heaps::new(heaps))
}
