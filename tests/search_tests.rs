//! Searchers driving the game through `PandemicProcess`.

use pandemic_sim::games::pandemic::{Choice, GameConfig, PandemicProcess};
use pandemic_sim::mcts::{
    Budget, Mcts, SearchConfig, SearchError, SpMcts, TreeWalker, WalkConfig,
};
use pandemic_sim::rules::DecisionProcess;

fn process(seed: u64) -> PandemicProcess {
    PandemicProcess::from_config(GameConfig::default().with_seed(seed)).unwrap()
}

fn config(iterations: u32) -> SearchConfig {
    SearchConfig::default()
        .with_iterations(iterations)
        .with_max_rollout_depth(40)
        .with_seed(2024)
}

// =============================================================================
// MCTS
// =============================================================================

#[test]
fn test_mcts_returns_legal_choice() {
    let root = process(1);
    let mut search = Mcts::new(config(60));
    let action = search.search(root.clone()).unwrap();

    assert!(root.choice(action).is_some());
    assert_eq!(search.stats().iterations, 60);
    let visits: u32 = search.action_visits().iter().map(|&(_, v)| v).sum();
    assert!(visits <= 60);
}

#[test]
fn test_mcts_is_deterministic() {
    let mut a = Mcts::new(config(80));
    let mut b = Mcts::new(config(80));

    assert_eq!(a.search(process(6)).unwrap(), b.search(process(6)).unwrap());
    assert_eq!(a.action_visits(), b.action_visits());
}

#[test]
fn test_mcts_with_focused_rollout() {
    let root = process(2);
    let mut search = Mcts::with_rollout(config(40), PandemicProcess::focused_rollout());
    let action = search.search(root.clone()).unwrap();
    assert!(root.legal_actions().contains(&action));
}

#[test]
fn test_mcts_plays_a_few_moves() {
    let mut state = process(3);
    for _ in 0..10 {
        if state.is_terminal() {
            break;
        }
        let action = if state.choices() == [Choice::Wait] {
            0
        } else {
            Mcts::new(config(20)).search(state.clone()).unwrap()
        };
        state = state.apply(action).unwrap();
    }
    assert!(state.state().turn() < 3);
}

#[test]
fn test_terminal_root_is_rejected() {
    let mut state = process(4);
    let mut steps = 0;
    while !state.is_terminal() {
        state = state.apply(0).unwrap();
        steps += 1;
        assert!(steps < 100_000);
    }
    assert_eq!(Mcts::new(config(10)).search(state), Err(SearchError::TerminalRoot));
}

// =============================================================================
// SP-MCTS
// =============================================================================

#[test]
fn test_sp_mcts_replans_from_best_line() {
    let mut search = SpMcts::with_rollout(config(50), PandemicProcess::focused_rollout());
    let first = search.search(process(5)).unwrap();
    let line = search.best_line();
    assert_eq!(line.first(), Some(&first));

    search.advance(first).unwrap();
    assert_eq!(search.best_line(), line[1..].to_vec());

    search.run().unwrap();
    let next = search.best_action().unwrap();
    let root = search.root_state().unwrap();
    assert!(root.legal_actions().contains(&next));
}

#[test]
fn test_sp_mcts_meta_search() {
    let mut search = SpMcts::new(config(0));
    let action = search
        .meta_search(process(7), 3, Budget::Iterations(15))
        .unwrap();

    assert!(process(7).choice(action).is_some());
    assert_eq!(search.stats().iterations, 45);
    assert!(search.best_reward().is_some());
}

// =============================================================================
// Tree walker
// =============================================================================

#[test]
fn test_walker_step_limit() {
    let config = WalkConfig::default().with_step_limit(200);
    let stats = TreeWalker::new(config).walk(process(8)).unwrap();

    assert!(!stats.complete);
    assert_eq!(stats.visited_nodes, 200);
    assert!(stats.discovered_nodes > stats.visited_nodes);
}

#[test]
fn test_walker_hybrid_playouts() {
    let config = WalkConfig {
        max_rollout_depth: 20,
        ..WalkConfig::default().with_playout_threshold(10).with_step_limit(150)
    };
    let stats = TreeWalker::new(config).walk(process(9)).unwrap();

    assert!(stats.playouts > 0);
    assert!(stats.max_reward.is_some());
    assert!(!stats.best_line.is_empty());
}
