//! Matches between agents

use std::ops::RangeInclusive;

use rand::Rng;

use crate::{
    agent::{Agent, Mode},
    nim::{
        heaps::Heaps,
        moves::InvalidMoveError,
        nim_game::NimGame,
        turn::{GameTurnTracker, Player},
    },
};

/// Play a single match from `start`, with `first` moving first, and return the winner.
///
/// # Errors
/// - When an agent proposes an illegal move, or no move at all in a live position
pub fn play_match<G, A, B>(
    first: &mut A,
    second: &mut B,
    start: G,
) -> Result<Player, InvalidMoveError>
where
    G: NimGame,
    A: Agent<G> + ?Sized,
    B: Agent<G> + ?Sized,
{
    let mut tracker = GameTurnTracker::new(start);
    while !tracker.is_over() {
        let to_move = tracker.to_move();
        match to_move {
            Player::First => first.propose_move(&mut tracker, Mode::Apply)?,
            Player::Second => second.propose_move(&mut tracker, Mode::Apply)?,
        };
        if tracker.to_move() == to_move {
            return Err(InvalidMoveError::NoChange);
        }
    }
    let winner = tracker.to_move().opposite();
    log::trace!("Match finished, {winner} player won");
    Ok(winner)
}

/// Fraction of matches won by `agent` moving first against `opponent`, one match per start.
/// Returns `0.0` when there are no starts.
///
/// # Errors
/// - When any match fails, see [`play_match`]
pub fn win_ratio<G, A, B, I>(
    agent: &mut A,
    opponent: &mut B,
    starts: I,
) -> Result<f64, InvalidMoveError>
where
    G: NimGame,
    A: Agent<G> + ?Sized,
    B: Agent<G> + ?Sized,
    I: IntoIterator<Item = G>,
{
    let mut played = 0usize;
    let mut won = 0usize;
    for start in starts {
        played += 1;
        if play_match(agent, opponent, start)? == Player::First {
            won += 1;
        }
    }
    if played == 0 {
        return Ok(0.0);
    }
    Ok(won as f64 / played as f64)
}

/// Random position with `heap_count` heaps, each drawn uniformly from `heap_values`
pub fn random_heaps<R>(rng: &mut R, heap_count: usize, heap_values: RangeInclusive<u32>) -> Heaps
where
    R: Rng + ?Sized,
{
    Heaps::new(
        (0..heap_count)
            .map(|_| rng.random_range(heap_values.clone()))
            .collect(),
    )
}

/// Random position won by the player to move, i.e. with non-zero nim-sum. Returns `None` if
/// the range admits no such position, which happens only for ranges collapsing to a single
/// value with an even number of heaps.
pub fn random_winning_heaps<R>(
    rng: &mut R,
    heap_count: usize,
    heap_values: RangeInclusive<u32>,
) -> Option<Heaps>
where
    R: Rng + ?Sized,
{
    let (low, high) = (*heap_values.start(), *heap_values.end());
    if heap_count == 0 || low > high || (low == high && (heap_count % 2 == 0 || low == 0)) {
        return None;
    }
    loop {
        let heaps = random_heaps(rng, heap_count, heap_values.clone());
        if !heaps.nim_sum().is_zero() {
            return Some(heaps);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{
        minimax::MinimaxAgent, nim_sum::NimSumAgent, random::RandomAgent, rules::RuleAgent,
        rules::RulesConfig,
    };
    use rand::{SeedableRng, rngs::StdRng};

    fn self_play(heaps: Vec<u32>) -> Player {
        play_match(&mut NimSumAgent, &mut NimSumAgent, Heaps::new(heaps)).unwrap()
    }

    #[test]
    fn last_mover_wins() {
        assert_eq!(self_play(vec![0, 3]), Player::First);
        assert_eq!(self_play(vec![2, 2]), Player::Second);
        assert_eq!(self_play(vec![0, 0]), Player::Second);
    }

    #[test]
    fn nim_sum_never_loses_a_winning_start() {
        let mut rng = StdRng::seed_from_u64(5);
        let starts = (0..200)
            .map(|_| random_winning_heaps(&mut rng, 4, 0..=9).unwrap())
            .collect::<Vec<_>>();
        let mut opponent = RandomAgent::new(StdRng::seed_from_u64(6));
        assert_eq!(win_ratio(&mut NimSumAgent, &mut opponent, starts).unwrap(), 1.0);
    }

    #[test]
    fn perfect_players_agree() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut minimax = MinimaxAgent::new();
        for _ in 0..50 {
            let start = random_heaps(&mut rng, 3, 0..=6);
            let expected = if start.nim_sum().is_zero() {
                Player::Second
            } else {
                Player::First
            };
            assert_eq!(
                play_match(&mut minimax, &mut NimSumAgent, start.clone()).unwrap(),
                expected
            );
            assert_eq!(
                play_match(&mut NimSumAgent, &mut minimax, start).unwrap(),
                expected
            );
        }
    }

    #[test]
    fn boxed_agents_play() {
        let mut first: Box<dyn Agent> = Box::new(NimSumAgent);
        let rules = RuleAgent::new(RulesConfig::default(), StdRng::seed_from_u64(1)).unwrap();
        let mut second: Box<dyn Agent> = Box::new(rules);
        let ratio = win_ratio(first.as_mut(), second.as_mut(), [Heaps::odd_rows(3)]).unwrap();
        assert_eq!(ratio, 1.0);
    }

    #[test]
    fn empty_range_has_no_winning_start() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(random_winning_heaps(&mut rng, 2, 3..=3), None);
        assert_eq!(random_winning_heaps(&mut rng, 3, 0..=0), None);
        assert_eq!(
            random_winning_heaps(&mut rng, 3, 3..=3),
            Some(Heaps::new(vec![3, 3, 3]))
        );
        let ratio = win_ratio(&mut NimSumAgent, &mut NimSumAgent, Vec::<Heaps>::new()).unwrap();
        assert!(ratio.abs() < f64::EPSILON);
    }
}
