//! Event cards and the text command format.

use std::collections::HashSet;

use pandemic_sim::core::GameRng;
use pandemic_sim::games::pandemic::cities::*;
use pandemic_sim::games::pandemic::{
    Action, Card, CityId, ConfigError, Engine, Event, EventKind, ForecastMode, GameConfig,
    GameState, Phase,
};

/// First seeded game where someone is dealt `kind`, with the holder's role.
fn dealt(kind: EventKind, mode: ForecastMode) -> (GameState, pandemic_sim::games::pandemic::Role) {
    for seed in 0..500 {
        let config = GameConfig::default().with_seed(seed).with_forecast_mode(mode);
        let state = GameState::new(config).unwrap();
        let holder = state
            .players()
            .iter()
            .find(|p| p.holds(Card::Event(kind)))
            .map(|p| p.role());
        if let Some(role) = holder {
            return (state, role);
        }
    }
    panic!("no seed deals {:?}", kind);
}

fn assert_round_trips(state: &GameState) {
    let graph = state.graph();
    for action in state.legal_actions(None) {
        let text = action.encode(graph);
        assert_eq!(Action::parse(&text, graph), Ok(action), "{}", text);
    }
}

// =============================================================================
// Forecast
// =============================================================================

#[test]
fn test_forecast_permutations() {
    let (mut state, role) = dealt(EventKind::Forecast, ForecastMode::Permutations);
    let top: Vec<CityId> = state.infection_deck().peek(6).copied().collect();

    state.apply(Some(&Event::Forecast { role }.into())).unwrap();
    assert_eq!(state.phase(), Phase::Forecast);
    assert!(state.player_discard().contains(&Card::Event(EventKind::Forecast)));

    let orders = state.legal_actions(None);
    assert_eq!(orders.len(), 720);
    assert!(orders.iter().all(|a| matches!(a, Action::Event(Event::ForecastOrder { .. }))));
    assert_eq!(orders.iter().collect::<HashSet<_>>().len(), 720);
    assert_round_trips(&state);

    let reversed: Vec<CityId> = top.iter().rev().copied().collect();
    let pick = orders
        .into_iter()
        .find(|a| matches!(a, Action::Event(Event::ForecastOrder { order, .. }) if order.as_slice() == reversed.as_slice()))
        .unwrap();
    state.apply(Some(&pick)).unwrap();

    assert_eq!(state.phase(), Phase::Actions);
    assert_eq!(state.actions_left(), 4);
    let new_top: Vec<CityId> = state.infection_deck().peek(6).copied().collect();
    assert_eq!(new_top, reversed);
}

#[test]
fn test_forecast_sequential_choices() {
    let (mut state, role) = dealt(EventKind::Forecast, ForecastMode::Sequential);
    let top: Vec<CityId> = state.infection_deck().peek(6).copied().collect();

    state.apply(Some(&Event::Forecast { role }.into())).unwrap();
    assert_eq!(state.phase(), Phase::ChooseCards);

    // Pick bottom-up, so the deck ends up reversed.
    for (i, &city) in top.iter().rev().enumerate() {
        let choices = state.legal_actions(None);
        assert_eq!(choices.len(), 6 - i);
        assert!(choices.iter().all(|a| matches!(a, Action::Choose { .. })));
        let pick = choices
            .into_iter()
            .find(|a| matches!(a, Action::Choose { card, .. } if *card == Card::City(city)))
            .unwrap();
        state.apply(Some(&pick)).unwrap();
    }

    assert_eq!(state.phase(), Phase::Actions);
    let new_top: Vec<CityId> = state.infection_deck().peek(6).copied().collect();
    assert_eq!(new_top, top.into_iter().rev().collect::<Vec<_>>());
}

#[test]
fn test_forecast_needs_a_positive_depth() {
    let config = GameConfig { forecast_depth: 0, ..GameConfig::default() };
    assert_eq!(GameState::new(config.clone()).unwrap_err(), ConfigError::ForecastDepth);
    assert!(Engine::new(config).is_err());
}

// =============================================================================
// Other events
// =============================================================================

#[test]
fn test_events_cost_no_action() {
    let (mut state, role) = dealt(EventKind::OneQuietNight, ForecastMode::Sequential);
    state.apply(Some(&Event::OneQuietNight { role }.into())).unwrap();

    assert!(state.quiet_night());
    assert_eq!(state.actions_left(), 4);
    assert!(!state.player(role).unwrap().holds(Card::Event(EventKind::OneQuietNight)));
}

#[test]
fn test_airlift_moves_any_pawn() {
    let (mut state, role) = dealt(EventKind::Airlift, ForecastMode::Sequential);
    let pawn = state.players().iter().map(|p| p.role()).find(|&r| r != role).unwrap();

    state.apply(Some(&Event::Airlift { role, pawn, to: SYDNEY }.into())).unwrap();
    assert_eq!(state.player(pawn).unwrap().city(), SYDNEY);
    assert_eq!(state.phase(), Phase::Actions);
}

#[test]
fn test_resilient_population_removes_card() {
    let (mut state, role) = dealt(EventKind::ResilientPopulation, ForecastMode::Sequential);
    let city = *state.infection_discard().iter().next().unwrap();

    state.apply(Some(&Event::ResilientPopulation { role, city }.into())).unwrap();
    assert_eq!(state.infection_discard().len(), 8);
    assert!(!state.infection_discard().contains(&city));
    assert!(!state.infection_deck().contains(&city));
}

#[test]
fn test_government_grant_builds_anywhere() {
    let (mut state, role) = dealt(EventKind::GovernmentGrant, ForecastMode::Sequential);
    state.apply(Some(&Event::GovernmentGrant { role, city: KARACHI }.into())).unwrap();

    assert!(state.has_station(KARACHI));
    assert_eq!(state.stations_left(), 4);
    assert_eq!(state.last_built_station(), Some(KARACHI));
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn test_commands_round_trip_through_random_games() {
    for (seed, mode) in [(3, ForecastMode::Sequential), (8, ForecastMode::Permutations)] {
        let mut engine = Engine::new(GameConfig::default().with_seed(seed).with_forecast_mode(mode)).unwrap();
        let mut rng = GameRng::new(seed);
        for _ in 0..300 {
            if engine.is_over() {
                break;
            }
            assert_round_trips(engine.state());
            let action = if engine.state().awaits_advance() {
                None
            } else {
                rng.choose(&engine.legal_actions(None)).cloned()
            };
            engine.step(action.as_ref()).unwrap();
        }
    }
}

#[test]
fn test_parsed_command_drives_engine() {
    let mut engine = Engine::new(GameConfig::default().with_seed(5)).unwrap();
    let role = engine.state().active_role();
    let text = format!("m d chicago {}", role.name());

    let action = Action::parse(&text, engine.state().graph()).unwrap();
    engine.step(Some(&action)).unwrap();
    assert_eq!(engine.state().active_player().city(), CHICAGO);
    assert_eq!(engine.state().actions_left(), 3);
}
