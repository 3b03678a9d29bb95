use itertools::Itertools;
use nimbus::{
    agent::{
        Agent,
        minimax::{MinimaxAgent, Score},
        nim_sum::NimSumAgent,
    },
    nim::{heaps::Heaps, nim_game::NimGame},
};

fn positions(heap_count: usize, biggest: u32) -> impl Iterator<Item = Heaps> {
    (0..heap_count)
        .map(|_| 0..=biggest)
        .multi_cartesian_product()
        .map(Heaps::new)
}

#[test]
#[cfg(not(miri))]
fn minimax_agrees_with_nim_sum() {
    let mut minimax = MinimaxAgent::new();
    for heap_count in 1..=4 {
        for heaps in positions(heap_count, 6) {
            let expected = if heaps.nim_sum().is_zero() {
                Score::Loss
            } else {
                Score::Win
            };
            assert_eq!(minimax.minimax(&heaps, true), expected, "{heaps}");
        }
    }
}

#[test]
#[cfg(not(miri))]
fn both_agents_find_winning_moves() {
    let mut minimax = MinimaxAgent::new();
    for heaps in positions(3, 5).filter(|heaps| !heaps.nim_sum().is_zero()) {
        let by_nim_sum = NimSumAgent.best_move(&heaps).unwrap();
        let by_search = minimax.best_move(&heaps).unwrap();
        assert!(by_nim_sum.nim_sum().is_zero(), "{heaps} -> {by_nim_sum}");
        assert!(by_search.nim_sum().is_zero(), "{heaps} -> {by_search}");
    }
}
