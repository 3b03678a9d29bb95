use nimbus::{
    agent::{
        Agent,
        q_learning::{self, QLearningConfig, TrainingSchedule},
        random::RandomAgent,
    },
    arena::{random_winning_heaps, win_ratio},
    nim::nim_game::NimGame,
};
use rand::{SeedableRng, rngs::StdRng};

#[test]
#[cfg(not(miri))]
fn trained_agent_beats_random_play() {
    let schedule = TrainingSchedule::new(5000, 2, 1..=5).unwrap();
    let mut agent = q_learning::train(
        &schedule,
        QLearningConfig::default(),
        StdRng::seed_from_u64(42),
    )
    .unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    let starts = (0..300)
        .map(|_| random_winning_heaps(&mut rng, 2, 1..=5).unwrap())
        .collect::<Vec<_>>();
    let mut opponent = RandomAgent::new(StdRng::seed_from_u64(9));
    let ratio = win_ratio(&mut agent, &mut opponent, starts).unwrap();
    assert!(ratio >= 0.9, "win ratio {ratio}");
}

#[test]
#[cfg(not(miri))]
fn continued_training_keeps_learned_values() {
    let schedule = TrainingSchedule::for_heap_count(300, 2).unwrap();
    let mut agent = q_learning::train(
        &schedule,
        QLearningConfig::default(),
        StdRng::seed_from_u64(3),
    )
    .unwrap();
    let learned = agent.table().len();
    assert!(learned > 0);

    agent.train(&schedule);
    assert!(agent.table().len() >= learned);

    let start = nimbus::nim::heaps::Heaps::new(vec![3, 2]);
    let next = agent.best_move(&start).unwrap();
    assert!(next.total_objects() < start.total_objects());
}
