//! Search adapter for the game.
//!
//! `PandemicProcess` numbers the legal moves of a state so the generic
//! searchers can pick them by index. Automatic phases are exposed as one
//! more choice, `Wait`, which advances the game without a decision.

use std::sync::Arc;

use super::action::{Action, Movement, Other};
use super::config::GameConfig;
use super::error::ConfigError;
use super::map::Color;
use super::state::{GameState, GameStatus};
use crate::mcts::FilteredRollout;
use crate::rules::DecisionProcess;

/// One numbered move.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Choice {
    Act(Action),
    /// Let the automatic phase run one step.
    Wait,
}

impl Choice {
    #[must_use]
    pub fn action(&self) -> Option<&Action> {
        match self {
            Choice::Act(action) => Some(action),
            Choice::Wait => None,
        }
    }
}

/// A game state with its choices enumerated.
#[derive(Clone, Debug)]
pub struct PandemicProcess {
    state: GameState,
    choices: Arc<Vec<Choice>>,
}

impl PandemicProcess {
    pub fn new(state: GameState) -> Self {
        let choices = if state.status().is_over() {
            Vec::new()
        } else {
            let mut choices: Vec<Choice> =
                state.legal_actions(None).into_iter().map(Choice::Act).collect();
            if state.awaits_advance() {
                choices.push(Choice::Wait);
            }
            choices
        };
        Self { state, choices: Arc::new(choices) }
    }

    pub fn from_config(config: GameConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(GameState::new(config)?))
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&Choice> {
        self.choices.get(index)
    }

    /// Drives, cures, card picks and waiting: the moves that make progress
    /// in a playout.
    #[must_use]
    pub fn is_focus_action(&self, index: usize) -> bool {
        matches!(
            self.choice(index),
            Some(
                Choice::Wait
                    | Choice::Act(
                        Action::Move(Movement::Drive { .. })
                            | Action::Other(Other::DiscoverCure { .. })
                            | Action::Choose { .. }
                    )
            )
        )
    }

    /// Random playouts that stick to focus actions when any are available.
    #[must_use]
    pub fn focused_rollout() -> FilteredRollout<fn(&PandemicProcess, usize) -> bool> {
        FilteredRollout::new(Self::is_focus_action as fn(&PandemicProcess, usize) -> bool)
    }

    /// Best fraction of a cure any single hand holds, over uncured colors.
    fn cure_progress(&self) -> f64 {
        let graph = self.state.graph();
        Color::ALL
            .iter()
            .filter(|&&color| !self.state.is_cured(color))
            .flat_map(|&color| {
                self.state.players().iter().map(move |p| {
                    let held = p.cards_of_color(color, graph).count() as f64;
                    let needed = f64::from(p.capabilities().cure_threshold.max(1));
                    (held / needed).min(1.0)
                })
            })
            .fold(0.0, f64::max)
    }
}

impl DecisionProcess for PandemicProcess {
    fn is_terminal(&self) -> bool {
        self.state.status().is_over()
    }

    fn legal_actions(&self) -> Vec<usize> {
        (0..self.choices.len()).collect()
    }

    fn apply(&self, action: usize) -> Option<Self> {
        let choice = self.choices.get(action)?;
        let mut state = self.state.clone();
        state.apply_legal(choice.action());
        Some(Self::new(state))
    }

    fn reward(&self) -> Option<f64> {
        match self.state.status() {
            GameStatus::Running => None,
            GameStatus::Won => Some(1.0),
            GameStatus::Lost(_) => Some(-1.0 + 0.25 * self.state.cure_count() as f64),
        }
    }

    fn heuristic(&self) -> f64 {
        if let Some(reward) = self.reward() {
            return reward;
        }
        let cures = 0.25 * self.state.cure_count() as f64;
        let limit = f64::from(self.state.config().outbreak_limit.max(1));
        let outbreaks = 0.25 * f64::from(self.state.outbreaks()) / limit;
        (cures + 0.1 * self.cure_progress() - outbreaks).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameRng;
    use crate::games::pandemic::state::Phase;

    fn process(seed: u64) -> PandemicProcess {
        PandemicProcess::from_config(GameConfig::default().with_seed(seed)).unwrap()
    }

    #[test]
    fn test_actions_phase_has_no_wait() {
        let p = process(1);
        assert_eq!(p.state().phase(), Phase::Actions);
        assert!(!p.choices().is_empty());
        assert!(!p.choices().contains(&Choice::Wait));
        assert_eq!(p.legal_actions(), (0..p.choices().len()).collect::<Vec<_>>());
        assert!(p.apply(p.choices().len()).is_none());
    }

    #[test]
    fn test_wait_after_actions() {
        let mut p = process(2);
        while p.state().phase() == Phase::Actions {
            let costly = p
                .choices()
                .iter()
                .position(|c| c.action().map_or(false, Action::costs_action))
                .unwrap();
            p = p.apply(costly).unwrap();
        }
        assert_eq!(p.state().phase(), Phase::DrawCards);
        assert!(p.choices().contains(&Choice::Wait));
    }

    #[test]
    fn test_apply_leaves_original_untouched() {
        let p = process(3);
        let before = p.state().clone();
        let next = p.apply(0).unwrap();
        assert_eq!(p.state(), &before);
        assert_ne!(next.state(), &before);
    }

    #[test]
    fn test_random_game_ends_with_reward() {
        let mut rng = GameRng::new(11);
        let mut p = process(4);
        let mut steps = 0;
        while !p.is_terminal() {
            assert!(p.reward().is_none());
            let h = p.heuristic();
            assert!((-1.0..=1.0).contains(&h));
            let actions = p.legal_actions();
            let pick = *rng.choose(&actions).unwrap();
            p = p.apply(pick).unwrap();
            steps += 1;
            assert!(steps < 100_000);
        }
        let reward = p.reward().unwrap();
        assert!(reward == 1.0 || (-1.0..=0.0).contains(&reward));
        assert!(p.legal_actions().is_empty());
    }

    #[test]
    fn test_focus_actions() {
        let p = process(5);
        let focus: Vec<usize> =
            p.legal_actions().into_iter().filter(|&i| p.is_focus_action(i)).collect();
        assert!(!focus.is_empty());
        for i in focus {
            assert!(matches!(
                p.choice(i),
                Some(Choice::Act(
                    Action::Move(Movement::Drive { .. }) | Action::Other(Other::DiscoverCure { .. })
                ))
            ));
        }
        assert!(!p.is_focus_action(usize::MAX));
    }
}
