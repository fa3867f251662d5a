// Property-based tests for the tape and the simulation engine.
//
// Machines are generated over small numeric state and symbol sets. Symbol 0 is the blank.

use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use tur_sim::{simulate, simulate_batch, Direction, MachineConfig, Tape, TransitionRule, Verdict};

const STATES: u8 = 4;
const SYMBOLS: u8 = 3;
const BLANK: u8 = 0;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Left),
        Just(Direction::Right),
        Just(Direction::Stay),
    ]
}

fn rule() -> impl Strategy<Value = TransitionRule<u8, u8>> {
    (0..STATES, 0..SYMBOLS, 0..SYMBOLS, direction(), 0..STATES)
        .prop_map(|(from, read, write, direction, to)| {
            TransitionRule::new(from, read, write, direction, to)
        })
}

/// A random deterministic machine: later rules for an existing key are dropped.
fn machine() -> impl Strategy<Value = MachineConfig<u8, u8>> {
    (
        prop::collection::vec(rule(), 0..12),
        prop::collection::btree_set(0..STATES, 0..2),
    )
        .prop_map(|(rules, accept)| {
            let mut unique = BTreeMap::new();
            for rule in rules {
                unique.entry((rule.from, rule.read)).or_insert(rule);
            }

            MachineConfig::builder()
                .alphabet(BLANK, 0..SYMBOLS)
                .and_then(|b| b.states(0..STATES))
                .and_then(|b| b.rules(unique.into_values()))
                .and_then(|b| b.accept(accept))
                .and_then(|b| b.start(0u8))
                .and_then(|b| b.build())
                .unwrap()
        })
}

fn input() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0..SYMBOLS, 0..8)
}

proptest! {
    /// Property: every run terminates under a step limit, going at most one transition past it
    #[test]
    fn bounded_runs_terminate(config in machine(), cells in input(), limit in 0usize..200) {
        let result = simulate(&config, Tape::from_symbols(BLANK, cells), Some(limit));

        if result.verdict == Verdict::StepLimitExceeded {
            prop_assert_eq!(result.steps, limit + 1);
        } else {
            prop_assert!(result.steps <= limit);
        }
        prop_assert_ne!(result.verdict, Verdict::Cancelled);
    }

    /// Property: the same machine and tape always give the same result
    #[test]
    fn runs_are_deterministic(config in machine(), cells in input()) {
        let tape = Tape::from_symbols(BLANK, cells);
        let first = simulate(&config, tape.clone(), Some(100));
        let second = simulate(&config, tape, Some(100));

        prop_assert_eq!(first, second);
    }

    /// Property: an accepting start state accepts without applying a transition
    #[test]
    fn accepting_start_accepts_immediately(config in machine(), cells in input()) {
        let config = MachineConfig::new(
            config.alphabet().clone(),
            config.states().clone(),
            config.table().clone(),
            [0u8],
            0u8,
        )
        .unwrap();

        let result = simulate(&config, Tape::from_symbols(BLANK, cells.clone()), Some(100));
        prop_assert_eq!(result.verdict, Verdict::Accepted);
        prop_assert_eq!(result.steps, 0);
        prop_assert_eq!(result.tape, Tape::from_symbols(BLANK, cells).snapshot());
    }

    /// Property: the verdict matches what the final state and symbol imply
    #[test]
    fn verdict_matches_final_configuration(config in machine(), cells in input()) {
        let result = simulate(&config, Tape::from_symbols(BLANK, cells), Some(100));
        let symbol = result.tape.head_symbol().unwrap();

        match result.verdict {
            Verdict::Accepted => prop_assert!(config.is_accepting(&result.state)),
            Verdict::Rejected => {
                prop_assert!(!config.is_accepting(&result.state));
                prop_assert!(config.lookup(&result.state, symbol).is_none());
            }
            Verdict::StepLimitExceeded => prop_assert_eq!(result.steps, 101),
            Verdict::Cancelled => prop_assert!(false, "no cancellation flag was given"),
        }
    }

    /// Property: a batch run equals the sequential runs
    #[test]
    fn batch_matches_sequential(config in machine(), inputs in prop::collection::vec(input(), 0..6)) {
        let sequential: Vec<_> = inputs
            .iter()
            .map(|cells| simulate(&config, Tape::from_symbols(BLANK, cells.clone()), Some(50)))
            .collect();
        let tapes = inputs.into_iter().map(|cells| Tape::from_symbols(BLANK, cells)).collect();

        prop_assert_eq!(simulate_batch(&config, tapes, Some(50), None), sequential);
    }

    /// Property: the tape behaves like an infinite map from positions to symbols,
    /// blank wherever nothing was written
    #[test]
    fn tape_matches_unbounded_model(
        cells in input(),
        moves in prop::collection::vec((direction(), prop::option::of(1..SYMBOLS)), 0..64)
    ) {
        let mut tape = Tape::from_symbols(BLANK, cells.clone());
        let mut model: HashMap<i64, u8> =
            cells.iter().enumerate().map(|(i, &c)| (i as i64, c)).collect();
        let mut position = 0i64;
        let (mut lowest, mut highest) = (0i64, (cells.len() as i64 - 1).max(0));

        for (direction, write) in moves {
            if let Some(symbol) = write {
                tape.write(symbol);
                model.insert(position, symbol);
            }
            tape.shift(direction);
            position += match direction {
                Direction::Left => -1,
                Direction::Right => 1,
                Direction::Stay => 0,
            };
            lowest = lowest.min(position);
            highest = highest.max(position);

            prop_assert_eq!(tape.read(), model.get(&position).copied().unwrap_or(BLANK));
        }

        prop_assert_eq!(tape.len() as i64, highest - lowest + 1);
        prop_assert_eq!(tape.head() as i64, position - lowest);

        let snapshot = tape.snapshot();
        for (offset, &cell) in snapshot.cells.iter().enumerate() {
            let expected = model.get(&(lowest + offset as i64)).copied().unwrap_or(BLANK);
            prop_assert_eq!(cell, expected);
        }
    }
}
