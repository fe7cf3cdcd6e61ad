use chain_dp::{ChainPlanner, Preset, Replay};

#[test]
fn pause_and_resume_from_saved_position() {
    let dims = Preset::Complex.dims();
    let mut replay = Replay::new(&dims);
    for _ in 0..5 {
        replay.advance();
    }
    // All length-2 subchains are revealed, nothing longer yet.
    assert!(replay.revealed().iter().all(|s| s.chain_len() == 2));
    assert_eq!(replay.revealed_cost().get(0, 2), None);
    assert_eq!(replay.current().map(|s| (s.i, s.j)), Some((4, 5)));

    let saved = replay.position();
    let mut resumed = replay.clone();
    replay.restart();
    replay.seek(saved);
    assert_eq!(replay, resumed);

    let rest: Vec<_> = resumed.by_ref().collect();
    assert_eq!(rest.len(), 10);
    assert!(resumed.is_finished());
}

#[test]
fn replay_from_traced_plan() {
    let dims = Preset::Medium.dims();
    let (plan, steps) = ChainPlanner::new().plan_traced(&dims);
    let mut replay = Replay::from_steps(steps);
    replay.seek(replay.len());
    assert_eq!(replay.revealed_cost(), plan.cost);
    assert_eq!(replay.revealed_split(), plan.split);
    assert_eq!(replay.current().map(|s| s.result_cost), Some(plan.min_cost()));
}
