//! This module defines the declared symbol and state sets and the immutable `MachineConfig`
//! bundle, together with the validating `MachineBuilder` used to assemble one.

use crate::table::{TransitionRule, TransitionTable};
use crate::types::{Direction, State, Symbol, TuringMachineError};
use std::collections::HashSet;
use tracing::debug;

/// The finite tape alphabet. The blank symbol is always a member.
#[derive(Debug, Clone)]
pub struct Alphabet<S> {
    blank: S,
    symbols: HashSet<S>,
}

impl<S: Symbol> PartialEq for Alphabet<S> {
    fn eq(&self, other: &Self) -> bool {
        self.blank == other.blank && self.symbols == other.symbols
    }
}

impl<S: Symbol> Eq for Alphabet<S> {}

impl<S: Symbol> Alphabet<S> {
    pub fn new<I>(blank: S, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut symbols: HashSet<S> = symbols.into_iter().collect();
        symbols.insert(blank);
        Self { blank, symbols }
    }

    pub fn blank(&self) -> S {
        self.blank
    }

    pub fn contains(&self, symbol: &S) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Never true, the blank is always declared.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// The finite set of machine states.
#[derive(Debug, Clone)]
pub struct StateSet<Q> {
    states: HashSet<Q>,
}

impl<Q: State> PartialEq for StateSet<Q> {
    fn eq(&self, other: &Self) -> bool {
        self.states == other.states
    }
}

impl<Q: State> Eq for StateSet<Q> {}

impl<Q: State> StateSet<Q> {
    pub fn new<I>(states: I) -> Self
    where
        I: IntoIterator<Item = Q>,
    {
        Self {
            states: states.into_iter().collect(),
        }
    }

    pub fn contains(&self, state: &Q) -> bool {
        self.states.contains(state)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Q> {
        self.states.iter()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// A complete, validated machine definition. Immutable once built; the engine borrows it.
#[derive(Debug, Clone)]
pub struct MachineConfig<Q, S> {
    alphabet: Alphabet<S>,
    states: StateSet<Q>,
    table: TransitionTable<Q, S>,
    accept: HashSet<Q>,
    start: Q,
}

impl<Q: State, S: Symbol> PartialEq for MachineConfig<Q, S> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.accept == other.accept
            && self.alphabet == other.alphabet
            && self.states == other.states
            && self.table == other.table
    }
}

impl<Q: State, S: Symbol> Eq for MachineConfig<Q, S> {}

impl<Q: State, S: Symbol> MachineConfig<Q, S> {
    /// Starts a new definition. See `MachineBuilder`.
    pub fn builder() -> MachineBuilder<Q, S> {
        MachineBuilder::default()
    }

    /// Bundles already assembled parts, re-checking every cross reference.
    pub fn new<I>(
        alphabet: Alphabet<S>,
        states: StateSet<Q>,
        table: TransitionTable<Q, S>,
        accept: I,
        start: Q,
    ) -> Result<Self, TuringMachineError>
    where
        I: IntoIterator<Item = Q>,
    {
        for rule in table.rules() {
            rule.validate(&alphabet, &states)?;
        }

        let accept: HashSet<Q> = accept.into_iter().collect();
        if let Some(unknown) = accept.iter().find(|q| !states.contains(q)) {
            return Err(TuringMachineError::unknown_state(unknown));
        }
        if !states.contains(&start) {
            return Err(TuringMachineError::unknown_state(&start));
        }

        Ok(Self {
            alphabet,
            states,
            table,
            accept,
            start,
        })
    }

    pub fn alphabet(&self) -> &Alphabet<S> {
        &self.alphabet
    }

    pub fn blank(&self) -> S {
        self.alphabet.blank()
    }

    pub fn states(&self) -> &StateSet<Q> {
        &self.states
    }

    pub fn table(&self) -> &TransitionTable<Q, S> {
        &self.table
    }

    pub fn accept_states(&self) -> &HashSet<Q> {
        &self.accept
    }

    pub fn start(&self) -> &Q {
        &self.start
    }

    /// Returns `true` if `state` belongs to the accept set.
    pub fn is_accepting(&self, state: &Q) -> bool {
        self.accept.contains(state)
    }

    /// Looks up the rule for `state` reading `symbol`.
    pub fn lookup(&self, state: &Q, symbol: S) -> Option<&TransitionRule<Q, S>> {
        self.table.lookup(state, symbol)
    }
}

/// Assembles a `MachineConfig` step by step.
///
/// Every call validates what can be checked against the parts declared so far, so
/// the alphabet, states, rules and accept set may be supplied in any order:
///
/// ```
/// use tur_sim::{Direction, MachineConfig};
///
/// let config = MachineConfig::<&str, char>::builder()
///     .alphabet('_', ['a', 'b'])?
///     .states(["q0", "q1"])?
///     .rule("q0", 'a', 'b', Direction::Right, "q1")?
///     .accept(["q1"])?
///     .start("q0")?
///     .build()?;
///
/// assert!(config.is_accepting(&"q1"));
/// # Ok::<(), tur_sim::TuringMachineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MachineBuilder<Q, S> {
    alphabet: Option<Alphabet<S>>,
    states: Option<StateSet<Q>>,
    table: TransitionTable<Q, S>,
    accept: HashSet<Q>,
    start: Option<Q>,
}

impl<Q, S> Default for MachineBuilder<Q, S> {
    fn default() -> Self {
        Self {
            alphabet: None,
            states: None,
            table: TransitionTable::default(),
            accept: HashSet::new(),
            start: None,
        }
    }
}

impl<Q: State, S: Symbol> MachineBuilder<Q, S> {
    /// Declares the alphabet. `blank` is added to `symbols` if missing.
    pub fn alphabet<I>(mut self, blank: S, symbols: I) -> Result<Self, TuringMachineError>
    where
        I: IntoIterator<Item = S>,
    {
        let alphabet = Alphabet::new(blank, symbols);
        if let Some(rule) = self
            .table
            .rules()
            .find(|r| !alphabet.contains(&r.read) || !alphabet.contains(&r.write))
        {
            let symbol = if alphabet.contains(&rule.read) {
                &rule.write
            } else {
                &rule.read
            };
            return Err(TuringMachineError::unknown_symbol(symbol));
        }

        self.alphabet = Some(alphabet);
        Ok(self)
    }

    /// Declares the state set.
    pub fn states<I, T>(mut self, states: I) -> Result<Self, TuringMachineError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Q>,
    {
        let states = StateSet::new(states.into_iter().map(Into::into));

        let referenced = self
            .table
            .rules()
            .flat_map(|r| [&r.from, &r.to])
            .chain(self.accept.iter())
            .chain(self.start.iter());
        for state in referenced {
            if !states.contains(state) {
                return Err(TuringMachineError::unknown_state(state));
            }
        }

        self.states = Some(states);
        Ok(self)
    }

    /// Adds the rule `(from, read) -> (write, direction, to)`.
    pub fn rule(
        mut self,
        from: impl Into<Q>,
        read: S,
        write: S,
        direction: Direction,
        to: impl Into<Q>,
    ) -> Result<Self, TuringMachineError> {
        let rule = TransitionRule::new(from.into(), read, write, direction, to.into());
        self.check_rule(&rule)?;
        self.table.insert(rule)?;
        Ok(self)
    }

    /// Adds several rules at once, stopping at the first invalid one.
    pub fn rules<I>(mut self, rules: I) -> Result<Self, TuringMachineError>
    where
        I: IntoIterator<Item = TransitionRule<Q, S>>,
    {
        for rule in rules {
            self.check_rule(&rule)?;
            self.table.insert(rule)?;
        }
        Ok(self)
    }

    /// Replaces the accept set. An empty set is allowed; such a machine never accepts.
    pub fn accept<I, T>(mut self, states: I) -> Result<Self, TuringMachineError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Q>,
    {
        let accept: HashSet<Q> = states.into_iter().map(Into::into).collect();
        if let Some(declared) = &self.states {
            if let Some(unknown) = accept.iter().find(|q| !declared.contains(q)) {
                return Err(TuringMachineError::unknown_state(unknown));
            }
        }

        self.accept = accept;
        Ok(self)
    }

    /// Sets the start state.
    pub fn start(mut self, state: impl Into<Q>) -> Result<Self, TuringMachineError> {
        let state = state.into();
        if let Some(declared) = &self.states {
            if !declared.contains(&state) {
                return Err(TuringMachineError::unknown_state(&state));
            }
        }

        self.start = Some(state);
        Ok(self)
    }

    /// Finishes the definition.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::ValidationError)` if the alphabet, the states or the
    ///   start state were never declared.
    pub fn build(self) -> Result<MachineConfig<Q, S>, TuringMachineError> {
        let alphabet = self.alphabet.ok_or_else(|| missing("alphabet"))?;
        let states = self.states.ok_or_else(|| missing("state set"))?;
        let start = self.start.ok_or_else(|| missing("start state"))?;

        let config = MachineConfig::new(alphabet, states, self.table, self.accept, start)?;
        debug!(
            symbols = config.alphabet.len(),
            states = config.states.len(),
            rules = config.table.len(),
            accept = config.accept.len(),
            "machine configuration built"
        );
        Ok(config)
    }

    fn check_rule(&self, rule: &TransitionRule<Q, S>) -> Result<(), TuringMachineError> {
        if let Some(alphabet) = &self.alphabet {
            for symbol in [&rule.read, &rule.write] {
                if !alphabet.contains(symbol) {
                    return Err(TuringMachineError::unknown_symbol(symbol));
                }
            }
        }
        if let Some(states) = &self.states {
            for state in [&rule.from, &rule.to] {
                if !states.contains(state) {
                    return Err(TuringMachineError::unknown_state(state));
                }
            }
        }
        Ok(())
    }
}

fn missing(part: &str) -> TuringMachineError {
    TuringMachineError::ValidationError(format!("Machine definition has no {}", part))
}
