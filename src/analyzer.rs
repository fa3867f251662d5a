//! This module provides static checks over a `MachineConfig` and its input that catch common
//! definition mistakes before execution: a start state that cannot do anything, states that
//! can never be entered, accept states out of reach, and input symbols no rule reads.
//!
//! None of these make a definition invalid; a run would simply reject or loop. They are
//! reported so that callers can surface them.

use crate::config::MachineConfig;
use crate::tape::Tape;
use crate::types::{State, Symbol, TuringMachineError};
use std::collections::HashSet;
use std::fmt::Debug;

/// Represents the findings of an analysis. State and symbol names are rendered with `Debug`
/// and sorted, so the output is deterministic.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The start state is not accepting and has no outgoing transitions, so every run
    /// rejects immediately.
    InvalidStartState(String),
    /// Declared states that cannot be reached from the start state.
    UnreachableStates(Vec<String>),
    /// The accept set is non-empty, but none of its states can be reached.
    AcceptStatesUnreachable(Vec<String>),
    /// Input symbols outside the alphabet, or never read by any transition.
    InvalidTapeSymbols(Vec<String>),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InvalidStartState(state) => TuringMachineError::ValidationError(
                format!("Start state {} can neither accept nor move", state),
            ),
            AnalysisError::UnreachableStates(states) => TuringMachineError::ValidationError(
                format!("Unreachable states detected: {}", states.join(", ")),
            ),
            AnalysisError::AcceptStatesUnreachable(states) => {
                TuringMachineError::ValidationError(format!(
                    "No accept state is reachable: {}",
                    states.join(", ")
                ))
            }
            AnalysisError::InvalidTapeSymbols(symbols) => {
                TuringMachineError::ValidationError(format!(
                    "Input contains symbols not handled by any transition: {}",
                    symbols.join(", ")
                ))
            }
        }
    }
}

/// Analyzes a machine definition.
///
/// # Returns
///
/// * `Ok(())` if no finding is reported.
/// * `Err(TuringMachineError::ValidationError)` describing the first finding.
pub fn analyze<Q: State, S: Symbol>(config: &MachineConfig<Q, S>) -> Result<(), TuringMachineError> {
    first_finding(&findings(config))
}

/// Analyzes a machine definition together with the tape it is about to run on.
pub fn analyze_input<Q: State, S: Symbol>(
    config: &MachineConfig<Q, S>,
    tape: &Tape<S>,
) -> Result<(), TuringMachineError> {
    let mut all = findings(config);
    all.extend(check_tape_symbols(config, tape).err());
    first_finding(&all)
}

/// Runs every definition check and collects all findings.
pub fn findings<Q: State, S: Symbol>(config: &MachineConfig<Q, S>) -> Vec<AnalysisError> {
    let checks: [fn(&MachineConfig<Q, S>) -> Result<(), AnalysisError>; 3] = [
        check_valid_start_state,
        check_unreachable_states,
        check_accept_states_reachable,
    ];

    checks
        .iter()
        .filter_map(|check| check(config).err())
        .collect()
}

fn first_finding(findings: &[AnalysisError]) -> Result<(), TuringMachineError> {
    match findings.first() {
        Some(finding) => Err(finding.clone().into()),
        None => Ok(()),
    }
}

/// Checks that a run can do something in the start state.
fn check_valid_start_state<Q: State, S: Symbol>(
    config: &MachineConfig<Q, S>,
) -> Result<(), AnalysisError> {
    let start = config.start();
    if config.is_accepting(start) || config.table().has_transitions(start) {
        return Ok(());
    }

    Err(AnalysisError::InvalidStartState(format!("{:?}", start)))
}

/// Checks for unreachable states with a depth-first traversal from the start state.
fn check_unreachable_states<Q: State, S: Symbol>(
    config: &MachineConfig<Q, S>,
) -> Result<(), AnalysisError> {
    let visited = reachable_states(config);

    let unreachable = sorted_names(config.states().iter().filter(|q| !visited.contains(q)));
    if !unreachable.is_empty() {
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}

/// Checks that at least one accept state is reachable. An empty accept set is legal and
/// is not reported.
fn check_accept_states_reachable<Q: State, S: Symbol>(
    config: &MachineConfig<Q, S>,
) -> Result<(), AnalysisError> {
    let accept = config.accept_states();
    if accept.is_empty() {
        return Ok(());
    }

    let visited = reachable_states(config);
    if accept.iter().any(|q| visited.contains(q)) {
        return Ok(());
    }

    Err(AnalysisError::AcceptStatesUnreachable(sorted_names(
        accept.iter(),
    )))
}

/// Checks that every symbol on the initial tape is declared and read by some transition.
/// The blank is always considered handled.
fn check_tape_symbols<Q: State, S: Symbol>(
    config: &MachineConfig<Q, S>,
    tape: &Tape<S>,
) -> Result<(), AnalysisError> {
    let mut handled: HashSet<S> = config.table().rules().map(|rule| rule.read).collect();
    handled.insert(config.blank());

    let unhandled: HashSet<S> = tape
        .cells()
        .into_iter()
        .filter(|symbol| !config.alphabet().contains(symbol) || !handled.contains(symbol))
        .collect();

    if !unhandled.is_empty() {
        return Err(AnalysisError::InvalidTapeSymbols(sorted_names(
            unhandled.iter(),
        )));
    }

    Ok(())
}

fn reachable_states<Q: State, S: Symbol>(config: &MachineConfig<Q, S>) -> HashSet<&Q> {
    let mut visited = HashSet::new();
    let mut queue = vec![config.start()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        for rule in config.table().transitions_from(state) {
            if !visited.contains(&rule.to) {
                queue.push(&rule.to);
            }
        }
    }

    visited
}

fn sorted_names<'i, T: Debug + 'i>(items: impl Iterator<Item = &'i T>) -> Vec<String> {
    let mut names: Vec<String> = items.map(|item| format!("{:?}", item)).collect();
    names.sort();
    names
}
