//! Token rendering
//!
//! Expands scheduled moves into per-arm token streams (`l`, `r`, `p`, `d`,
//! `n`), pads the streams to equal length and pairs them into one code per
//! tick. Progress messages are emitted right before the tick of the
//! manipulation they describe.

use super::assign::Schedule;
use crate::logic::{ObjectId, Relation};
use crate::world::physics::placement_relation;
use crate::world::WorldState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One primitive arm action occupying one tick
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Left,
    Right,
    Pick,
    Drop,
    Noop,
}

impl Token {
    pub fn as_char(self) -> char {
        match self {
            Token::Left => 'l',
            Token::Right => 'r',
            Token::Pick => 'p',
            Token::Drop => 'd',
            Token::Noop => 'n',
        }
    }

    pub fn from_char(c: char) -> Option<Token> {
        Some(match c {
            'l' => Token::Left,
            'r' => Token::Right,
            'p' => Token::Pick,
            'd' => Token::Drop,
            'n' => Token::Noop,
            _ => return None,
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A line of rendered plan output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum PlanLine {
    /// Free-text progress line
    Message(String),
    /// One tick: one token per arm
    Tick(String),
}

impl PlanLine {
    pub fn tick(&self) -> Option<&str> {
        match self {
            PlanLine::Tick(code) => Some(code),
            PlanLine::Message(_) => None,
        }
    }
}

impl fmt::Display for PlanLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanLine::Message(text) | PlanLine::Tick(text) => write!(f, "{}", text),
        }
    }
}

fn walk(stream: &mut Vec<Token>, from: usize, to: usize) {
    let step = if to > from { Token::Right } else { Token::Left };
    stream.extend(std::iter::repeat(step).take(from.abs_diff(to)));
}

fn pad(stream: &mut Vec<Token>, len: usize) {
    if stream.len() < len {
        stream.resize(len, Token::Noop);
    }
}

struct Narrator<'s> {
    state: &'s WorldState,
    arms: usize,
}

impl Narrator<'_> {
    fn prefix(&self, arm: usize, verb: &str) -> String {
        if self.arms == 1 {
            let mut chars = verb.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        } else {
            format!("Arm {}: {}", arm, verb)
        }
    }

    fn pickup(&self, arm: usize, object: ObjectId) -> String {
        let what = self.state.catalog.describe(object);
        format!("{} {}", self.prefix(arm, "picking up"), what)
    }

    fn drop(&self, arm: usize, object: ObjectId, support: Option<ObjectId>) -> String {
        let catalog = &self.state.catalog;
        let what = catalog.describe(object);
        let verb = self.prefix(arm, "putting");
        match support {
            None => format!("{} {} on the floor", verb, what),
            Some(s) => {
                let preposition = match placement_relation(Some(catalog.spec(s))) {
                    Relation::Inside => "inside",
                    _ => "on",
                };
                format!("{} {} {} {}", verb, what, preposition, catalog.describe(s))
            }
        }
    }
}

/// Per-arm token streams, padded to equal length
pub fn token_streams(schedule: &Schedule) -> Vec<Vec<Token>> {
    let mut streams: Vec<Vec<Token>> = vec![Vec::new(); schedule.arms.len()];
    for (stream, moves) in streams.iter_mut().zip(&schedule.arms) {
        for placed in moves {
            pad(stream, (placed.start + placed.wait) as usize);
            let mut at = placed.origin;
            if let Some(col) = placed.mv.pick {
                walk(stream, at, col);
                stream.push(Token::Pick);
                at = col;
            }
            if let Some(col) = placed.mv.drop {
                walk(stream, at, col);
                stream.push(Token::Drop);
            }
        }
    }
    let len = streams.iter().map(Vec::len).max().unwrap_or(0);
    for stream in &mut streams {
        pad(stream, len);
    }
    streams
}

/// Render a schedule as tick lines with interleaved progress messages.
///
/// `start` supplies object descriptions and the arm count.
pub fn render(schedule: &Schedule, start: &WorldState) -> Vec<PlanLine> {
    let narrator = Narrator {
        state: start,
        arms: start.arms(),
    };
    let mut messages: BTreeMap<u64, Vec<String>> = BTreeMap::new();
    for placed in schedule.in_path_order() {
        if let Some(tick) = placed.pick_tick {
            messages
                .entry(tick)
                .or_default()
                .push(narrator.pickup(placed.arm, placed.mv.object));
        }
        if let Some(tick) = placed.drop_tick {
            messages.entry(tick).or_default().push(narrator.drop(
                placed.arm,
                placed.mv.object,
                placed.mv.support,
            ));
        }
    }

    let streams = token_streams(schedule);
    let ticks = streams.first().map_or(0, Vec::len);
    let mut lines = Vec::new();
    for tick in 0..ticks {
        if let Some(texts) = messages.remove(&(tick as u64)) {
            lines.extend(texts.into_iter().map(PlanLine::Message));
        }
        let code: String = streams.iter().map(|s| s[tick].as_char()).collect();
        lines.push(PlanLine::Tick(code));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{Catalog, Form, ObjectSpec, Size};
    use crate::schedule::{assign, extract_moves};
    use std::sync::Arc;

    fn world(arms: usize) -> (WorldState, ObjectId, ObjectId) {
        let mut catalog = Catalog::new();
        let ball = catalog
            .insert("ball", ObjectSpec::new(Form::Ball, Size::Small, "white"))
            .unwrap();
        let bx = catalog.insert("box", ObjectSpec::new(Form::Box, Size::Large, "red")).unwrap();
        let state = WorldState::new(
            vec![vec![ball], vec![], vec![bx]],
            vec![None; arms],
            vec![0; arms],
            Arc::new(catalog),
        )
        .unwrap();
        (state, ball, bx)
    }

    #[test]
    fn test_single_arm_lines() {
        let (s0, _, _) = world(1);
        let mut s1 = s0.clone();
        s1.apply_pickup(0, 0);
        let mut s2 = s1.clone();
        s2.apply_drop(0, 2);

        let path = vec![s0.clone(), s1, s2];
        let schedule = assign(&extract_moves(&path).unwrap(), &s0);
        let lines = render(&schedule, &s0);
        assert_eq!(
            lines,
            vec![
                PlanLine::Message("Picking up the small white ball".into()),
                PlanLine::Tick("p".into()),
                PlanLine::Tick("r".into()),
                PlanLine::Tick("r".into()),
                PlanLine::Message("Putting the small white ball inside the large red box".into()),
                PlanLine::Tick("d".into()),
            ]
        );
    }

    #[test]
    fn test_two_arm_codes_are_paired_and_padded() {
        let (s0, _, _) = world(2);
        let mut s1 = s0.clone();
        s1.apply_pickup(0, 0);
        let mut s2 = s1.clone();
        s2.apply_drop(0, 1);

        let path = vec![s0.clone(), s1, s2];
        let schedule = assign(&extract_moves(&path).unwrap(), &s0);
        let ticks: Vec<String> = render(&schedule, &s0)
            .iter()
            .filter_map(|l| l.tick().map(str::to_string))
            .collect();
        assert_eq!(ticks, vec!["pn", "rn", "dn"]);
    }

    #[test]
    fn test_token_chars() {
        for token in [Token::Left, Token::Right, Token::Pick, Token::Drop, Token::Noop] {
            assert_eq!(Token::from_char(token.as_char()), Some(token));
        }
        assert_eq!(Token::from_char('x'), None);
    }
}
