//! Text form of actions.
//!
//! Every action encodes to a whitespace-separated command: a family prefix
//! (`m` movement, `o` other, `e` event, `t` bookkeeping), a one-letter
//! sub-command and its operands. Operands are lower snake case tokens for
//! roles, cities, colors and cards. Text front ends match legal actions by
//! their encoding and parse the chosen line back.
//!
//! ```text
//! m d chicago medic                       drive
//! m o tokyo operations_expert paris       operations flight, discarding paris
//! o b atlanta                             build
//! o s medic atlanta scientist             medic gives atlanta to scientist
//! e o medic lima tokyo paris              forecast order, top first
//! t d medic epidemic_2                    hand-limit discard
//! ```

use smallvec::SmallVec;

use super::action::{Action, Event, Movement, Other};
use super::card::{Card, EventKind};
use super::error::CommandError;
use super::map::{CityGraph, CityId, Color};
use super::role::Role;

impl Action {
    /// Encode as a command line.
    #[must_use]
    pub fn encode(&self, graph: &CityGraph) -> String {
        let city = |c: CityId| graph.token(c);
        match self {
            Action::Move(m) => {
                let (code, role, to) = match *m {
                    Movement::Drive { role, to } => ("d", role, to),
                    Movement::DirectFlight { role, to } => ("f", role, to),
                    Movement::CharterFlight { role, to } => ("c", role, to),
                    Movement::ShuttleFlight { role, to } => ("s", role, to),
                    Movement::Dispatch { role, to } => ("p", role, to),
                    Movement::OperationsFlight { role, to, discard } => {
                        return format!("m o {} {} {}", city(to), role, city(discard));
                    }
                };
                format!("m {} {} {}", code, city(to), role)
            }
            Action::Other(o) => match *o {
                Other::TreatDisease { city: c, color } => format!("o t {} {}", city(c), color),
                Other::BuildResearchStation { city: c, displace: None } => format!("o b {}", city(c)),
                Other::BuildResearchStation { city: c, displace: Some(d) } => {
                    format!("o b {} {}", city(c), city(d))
                }
                Other::DiscoverCure { color } => format!("o d {}", color),
                Other::ShareKnowledge { giver, card, receiver } => {
                    format!("o s {} {} {}", giver, city(card), receiver)
                }
                Other::ReserveCard { card } => format!("o r {}", card.name()),
            },
            Action::Event(e) => match e {
                Event::Forecast { role } => format!("e f {}", role),
                Event::ForecastOrder { role, order } => {
                    let mut line = format!("e o {}", role);
                    for &c in order {
                        line.push(' ');
                        line.push_str(&city(c));
                    }
                    line
                }
                Event::GovernmentGrant { role, city: c } => format!("e g {} {}", role, city(*c)),
                Event::Airlift { role, pawn, to } => format!("e a {} {} {}", role, pawn, city(*to)),
                Event::ResilientPopulation { role, city: c } => format!("e r {} {}", role, city(*c)),
                Event::OneQuietNight { role } => format!("e q {}", role),
                Event::MoveResearchStation { role, city: c } => format!("e m {} {}", role, city(*c)),
            },
            Action::Discard { role, card } => format!("t d {} {}", role, card_token(*card, graph)),
            Action::Choose { role, card } => format!("t c {} {}", role, card_token(*card, graph)),
        }
    }

    /// Parse a command line produced by [`Action::encode`].
    pub fn parse(command: &str, graph: &CityGraph) -> Result<Action, CommandError> {
        let words: Vec<&str> = command.split_whitespace().collect();
        let (family, code, args) = match words.as_slice() {
            [] => return Err(CommandError::Empty),
            [family, code, args @ ..] => (*family, *code, args),
            [other] => return Err(CommandError::UnknownCommand((*other).to_string())),
        };
        let name = format!("{} {}", family, code);
        let arity = |n: usize| {
            if args.len() == n {
                Ok(())
            } else {
                Err(CommandError::Arity(name.clone()))
            }
        };
        let city = |s: &str| parse_city(s, graph);

        let action = match (family, code) {
            ("m", "o") => {
                arity(3)?;
                Movement::OperationsFlight {
                    to: city(args[0])?,
                    role: parse_role(args[1])?,
                    discard: city(args[2])?,
                }
                .into()
            }
            ("m", code) => {
                arity(2)?;
                let to = city(args[0])?;
                let role = parse_role(args[1])?;
                match code {
                    "d" => Movement::Drive { role, to },
                    "f" => Movement::DirectFlight { role, to },
                    "c" => Movement::CharterFlight { role, to },
                    "s" => Movement::ShuttleFlight { role, to },
                    "p" => Movement::Dispatch { role, to },
                    _ => return Err(CommandError::UnknownCommand(name)),
                }
                .into()
            }
            ("o", "t") => {
                arity(2)?;
                Other::TreatDisease { city: city(args[0])?, color: parse_color(args[1])? }.into()
            }
            ("o", "b") => {
                let displace = match args.len() {
                    1 => None,
                    2 => Some(city(args[1])?),
                    _ => return Err(CommandError::Arity(name)),
                };
                Other::BuildResearchStation { city: city(args[0])?, displace }.into()
            }
            ("o", "d") => {
                arity(1)?;
                Other::DiscoverCure { color: parse_color(args[0])? }.into()
            }
            ("o", "s") => {
                arity(3)?;
                Other::ShareKnowledge {
                    giver: parse_role(args[0])?,
                    card: city(args[1])?,
                    receiver: parse_role(args[2])?,
                }
                .into()
            }
            ("o", "r") => {
                arity(1)?;
                let card = EventKind::from_name(args[0])
                    .ok_or_else(|| CommandError::Card(args[0].to_string()))?;
                Other::ReserveCard { card }.into()
            }
            ("e", "o") => {
                if args.len() < 2 {
                    return Err(CommandError::Arity(name));
                }
                let order = args[1..]
                    .iter()
                    .map(|s| city(s))
                    .collect::<Result<SmallVec<[CityId; 6]>, _>>()?;
                Event::ForecastOrder { role: parse_role(args[0])?, order }.into()
            }
            ("e", "f") | ("e", "q") => {
                arity(1)?;
                let role = parse_role(args[0])?;
                if code == "f" {
                    Event::Forecast { role }.into()
                } else {
                    Event::OneQuietNight { role }.into()
                }
            }
            ("e", "a") => {
                arity(3)?;
                Event::Airlift {
                    role: parse_role(args[0])?,
                    pawn: parse_role(args[1])?,
                    to: city(args[2])?,
                }
                .into()
            }
            ("e", code @ ("g" | "r" | "m")) => {
                arity(2)?;
                let role = parse_role(args[0])?;
                let c = city(args[1])?;
                match code {
                    "g" => Event::GovernmentGrant { role, city: c },
                    "r" => Event::ResilientPopulation { role, city: c },
                    _ => Event::MoveResearchStation { role, city: c },
                }
                .into()
            }
            ("t", code @ ("d" | "c")) => {
                arity(2)?;
                let role = parse_role(args[0])?;
                let card = parse_card(args[1], graph)?;
                if code == "d" {
                    Action::Discard { role, card }
                } else {
                    Action::Choose { role, card }
                }
            }
            _ => return Err(CommandError::UnknownCommand(name)),
        };
        Ok(action)
    }
}

/// Token for a card: the city token, the event name, or `epidemic_<n>`.
#[must_use]
pub fn card_token(card: Card, graph: &CityGraph) -> String {
    match card {
        Card::City(city) => graph.token(city),
        Card::Event(kind) => kind.name().to_string(),
        Card::Epidemic(n) => format!("epidemic_{}", n),
    }
}

pub fn parse_card(token: &str, graph: &CityGraph) -> Result<Card, CommandError> {
    if let Some(kind) = EventKind::from_name(token) {
        return Ok(Card::Event(kind));
    }
    if let Some(n) = token.strip_prefix("epidemic_") {
        return n
            .parse()
            .map(Card::Epidemic)
            .map_err(|_| CommandError::Card(token.to_string()));
    }
    graph
        .find(token)
        .map(Card::City)
        .ok_or_else(|| CommandError::Card(token.to_string()))
}

fn parse_city(token: &str, graph: &CityGraph) -> Result<CityId, CommandError> {
    graph.find(token).ok_or_else(|| CommandError::City(token.to_string()))
}

fn parse_role(token: &str) -> Result<Role, CommandError> {
    Role::from_name(token).ok_or_else(|| CommandError::Role(token.to_string()))
}

fn parse_color(token: &str) -> Result<Color, CommandError> {
    Color::from_name(token).ok_or_else(|| CommandError::Color(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::pandemic::map::cities::*;

    fn round_trip(action: Action) {
        let graph = CityGraph::standard();
        let line = action.encode(&graph);
        assert_eq!(Action::parse(&line, &graph), Ok(action), "{line}");
    }

    #[test]
    fn test_encodings() {
        let graph = CityGraph::standard();
        let drive: Action = Movement::Drive { role: Role::Medic, to: CHICAGO }.into();
        assert_eq!(drive.encode(&graph), "m d chicago medic");

        let ops: Action = Movement::OperationsFlight { role: Role::OperationsExpert, to: TOKYO, discard: PARIS }.into();
        assert_eq!(ops.encode(&graph), "m o tokyo operations_expert paris");

        let share: Action = Other::ShareKnowledge { giver: Role::Medic, card: ATLANTA, receiver: Role::Scientist }.into();
        assert_eq!(share.encode(&graph), "o s medic atlanta scientist");

        let discard = Action::Discard { role: Role::Medic, card: Card::Epidemic(2) };
        assert_eq!(discard.encode(&graph), "t d medic epidemic_2");
    }

    #[test]
    fn test_codes_do_not_collide() {
        round_trip(Movement::Drive { role: Role::Dispatcher, to: MIAMI }.into());
        round_trip(Movement::Dispatch { role: Role::Medic, to: MIAMI }.into());
        round_trip(Event::GovernmentGrant { role: Role::Medic, city: LIMA }.into());
        round_trip(Event::Airlift { role: Role::Medic, pawn: Role::Scientist, to: LIMA }.into());
        round_trip(Event::Forecast { role: Role::Medic }.into());
        round_trip(
            Event::ForecastOrder { role: Role::Medic, order: SmallVec::from_slice(&[LIMA, TOKYO]) }.into(),
        );
    }

    #[test]
    fn test_multi_word_city_and_cards() {
        round_trip(Other::TreatDisease { city: HO_CHI_MINH_CITY, color: Color::Red }.into());
        round_trip(Other::BuildResearchStation { city: ST_PETERSBURG, displace: Some(SAO_PAULO) }.into());
        round_trip(Other::ReserveCard { card: EventKind::OneQuietNight }.into());
        round_trip(Action::Choose { role: Role::Scientist, card: Card::City(NEW_YORK) });
        round_trip(Action::Discard { role: Role::Scientist, card: Card::Event(EventKind::Airlift) });
    }

    #[test]
    fn test_parse_errors() {
        let graph = CityGraph::standard();
        assert_eq!(Action::parse("", &graph), Err(CommandError::Empty));
        assert_eq!(Action::parse("x y", &graph), Err(CommandError::UnknownCommand("x y".into())));
        assert_eq!(Action::parse("m d chicago", &graph), Err(CommandError::Arity("m d".into())));
        assert_eq!(Action::parse("m d gotham medic", &graph), Err(CommandError::City("gotham".into())));
        assert_eq!(Action::parse("m d chicago nurse", &graph), Err(CommandError::Role("nurse".into())));
        assert_eq!(Action::parse("o d green", &graph), Err(CommandError::Color("green".into())));
    }
}
