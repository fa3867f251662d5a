//! This module defines the transition rules and the deterministic `TransitionTable`
//! that maps a (state, symbol) pair to at most one rule.

use crate::config::{Alphabet, StateSet};
use crate::types::{Direction, State, Symbol, TuringMachineError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single transition rule: in state `from` reading `read`, write `write`,
/// move the head in `direction` and continue in state `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule<Q, S> {
    pub from: Q,
    pub read: S,
    pub write: S,
    pub direction: Direction,
    pub to: Q,
}

impl<Q: State, S: Symbol> TransitionRule<Q, S> {
    pub fn new(from: Q, read: S, write: S, direction: Direction, to: Q) -> Self {
        Self {
            from,
            read,
            write,
            direction,
            to,
        }
    }

    /// Checks that every symbol and state the rule mentions is declared.
    pub fn validate(
        &self,
        alphabet: &Alphabet<S>,
        states: &StateSet<Q>,
    ) -> Result<(), TuringMachineError> {
        for symbol in [&self.read, &self.write] {
            if !alphabet.contains(symbol) {
                return Err(TuringMachineError::unknown_symbol(symbol));
            }
        }
        for state in [&self.from, &self.to] {
            if !states.contains(state) {
                return Err(TuringMachineError::unknown_state(state));
            }
        }
        Ok(())
    }
}

/// Formats the rule as `(from, read) -> (write, direction, to)`.
impl<Q: fmt::Debug, S: fmt::Debug> fmt::Display for TransitionRule<Q, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:?}, {:?}) -> ({:?}, {}, {:?})",
            self.from,
            self.read,
            self.write,
            self.direction.as_char(),
            self.to
        )
    }
}

/// The transition function of a deterministic machine.
///
/// Rules are grouped by source state, then keyed by the symbol read, so a lookup is two
/// hash probes and never clones the state.
#[derive(Debug, Clone)]
pub struct TransitionTable<Q, S> {
    rules: HashMap<Q, HashMap<S, TransitionRule<Q, S>>>,
    len: usize,
}

impl<Q: State, S: Symbol> PartialEq for TransitionTable<Q, S> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.rules == other.rules
    }
}

impl<Q: State, S: Symbol> Eq for TransitionTable<Q, S> {}

impl<Q, S> Default for TransitionTable<Q, S> {
    fn default() -> Self {
        Self {
            rules: HashMap::new(),
            len: 0,
        }
    }
}

impl<Q: State, S: Symbol> TransitionTable<Q, S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `rules`, checking key uniqueness and that every
    /// referenced symbol and state is declared.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::DuplicateTransition)` naming the first repeated key.
    /// * `Err(TuringMachineError::UnknownSymbol)` or `Err(TuringMachineError::UnknownState)`
    ///   for the first undeclared member.
    pub fn try_from_rules<I>(
        rules: I,
        alphabet: &Alphabet<S>,
        states: &StateSet<Q>,
    ) -> Result<Self, TuringMachineError>
    where
        I: IntoIterator<Item = TransitionRule<Q, S>>,
    {
        let mut table = Self::new();
        for rule in rules {
            rule.validate(alphabet, states)?;
            table.insert(rule)?;
        }
        Ok(table)
    }

    /// Adds a rule, rejecting a second rule for an existing (state, symbol) key.
    pub fn insert(&mut self, rule: TransitionRule<Q, S>) -> Result<(), TuringMachineError> {
        let by_symbol = self.rules.entry(rule.from.clone()).or_default();
        if by_symbol.contains_key(&rule.read) {
            return Err(TuringMachineError::duplicate(&rule.from, &rule.read));
        }

        by_symbol.insert(rule.read, rule);
        self.len += 1;
        Ok(())
    }

    /// Returns the rule for `state` reading `symbol`, or `None` when the machine rejects.
    pub fn lookup(&self, state: &Q, symbol: S) -> Option<&TransitionRule<Q, S>> {
        self.rules.get(state)?.get(&symbol)
    }

    /// Iterates over the rules leaving `state`, in no particular order.
    pub fn transitions_from<'t>(
        &'t self,
        state: &Q,
    ) -> impl Iterator<Item = &'t TransitionRule<Q, S>> + 't {
        self.rules
            .get(state)
            .into_iter()
            .flat_map(|by_symbol| by_symbol.values())
    }

    /// Returns `true` if at least one rule leaves `state`.
    pub fn has_transitions(&self, state: &Q) -> bool {
        self.rules
            .get(state)
            .is_some_and(|by_symbol| !by_symbol.is_empty())
    }

    /// Iterates over every rule, in no particular order.
    pub fn rules(&self) -> impl Iterator<Item = &TransitionRule<Q, S>> {
        self.rules.values().flat_map(|by_symbol| by_symbol.values())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
