//! This module defines the `TuringMachine` engine, which drives a `Tape` with the rules of a
//! borrowed `MachineConfig` until the machine accepts, rejects or runs out of steps.

use crate::config::MachineConfig;
use crate::table::TransitionRule;
use crate::tape::{Tape, TapeSnapshot};
use crate::types::{State, Step, Symbol, Verdict};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

/// The outcome of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult<Q, S> {
    pub verdict: Verdict,
    /// The state the machine was in when it halted.
    pub state: Q,
    pub tape: TapeSnapshot<S>,
    /// Number of transitions applied.
    pub steps: usize,
}

/// Runs `config` on `tape` until a terminal condition is reached.
///
/// With `step_limit` set, the run ends with `Verdict::StepLimitExceeded` as soon as the
/// number of applied transitions exceeds it, so such a run reports `limit + 1` steps.
/// Without a limit a non-halting machine runs forever.
pub fn simulate<Q: State, S: Symbol>(
    config: &MachineConfig<Q, S>,
    tape: Tape<S>,
    step_limit: Option<usize>,
) -> SimulationResult<Q, S> {
    let mut machine = TuringMachine::new(config, tape);
    machine.run(step_limit);
    machine.into_result()
}

/// A single run of a machine.
///
/// The engine owns its tape and reads the configuration through a shared borrow, so many
/// engines may run against one configuration at the same time.
#[derive(Debug, Clone)]
pub struct TuringMachine<'a, Q, S> {
    config: &'a MachineConfig<Q, S>,
    state: Q,
    tape: Tape<S>,
    initial_tape: Tape<S>,
    step_count: usize,
    verdict: Option<Verdict>,
}

impl<'a, Q: State, S: Symbol> TuringMachine<'a, Q, S> {
    /// Creates an engine in the start state of `config`, positioned on `tape`.
    pub fn new(config: &'a MachineConfig<Q, S>, tape: Tape<S>) -> Self {
        Self {
            config,
            state: config.start().clone(),
            initial_tape: tape.clone(),
            tape,
            step_count: 0,
            verdict: None,
        }
    }

    /// Executes a single step.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition was applied.
    /// * `Step::Halt(Verdict::Accepted)` if the current state is accepting. Acceptance is
    ///   checked before the table, so an accepting state needs no outgoing rules.
    /// * `Step::Halt(Verdict::Rejected)` if no rule matches the current state and symbol.
    ///
    /// Once halted, every further call returns the same `Step::Halt`.
    pub fn step(&mut self) -> Step {
        self.advance(None, || false)
    }

    /// Like `step`, but halts with `Verdict::StepLimitExceeded` once the transition just
    /// applied brings the total above `step_limit`.
    pub fn step_with_limit(&mut self, step_limit: Option<usize>) -> Step {
        self.advance(step_limit, || false)
    }

    /// Runs until the machine halts or the applied transitions exceed `step_limit`.
    pub fn run(&mut self, step_limit: Option<usize>) -> Verdict {
        self.run_until(step_limit, || false)
    }

    /// Like `run`, but polls `cancel` once per step and stops with `Verdict::Cancelled`
    /// once it is set.
    pub fn run_with_cancel(&mut self, step_limit: Option<usize>, cancel: &AtomicBool) -> Verdict {
        self.run_until(step_limit, || cancel.load(Ordering::Relaxed))
    }

    fn run_until<F>(&mut self, step_limit: Option<usize>, cancelled: F) -> Verdict
    where
        F: Fn() -> bool,
    {
        loop {
            if let Step::Halt(verdict) = self.advance(step_limit, &cancelled) {
                return verdict;
            }
        }
    }

    fn advance<F>(&mut self, step_limit: Option<usize>, cancelled: F) -> Step
    where
        F: Fn() -> bool,
    {
        if let Some(verdict) = self.verdict {
            return Step::Halt(verdict);
        }

        let rule = match self.next_rule() {
            Ok(rule) => rule,
            Err(verdict) => return self.halt(verdict),
        };

        if cancelled() {
            return self.halt(Verdict::Cancelled);
        }

        self.apply(rule);

        if step_limit.is_some_and(|limit| self.step_count > limit) {
            return self.halt(Verdict::StepLimitExceeded);
        }
        Step::Continue
    }

    /// Decides the current step: the rule to apply, or the verdict if the machine halts here.
    fn next_rule(&self) -> Result<&'a TransitionRule<Q, S>, Verdict> {
        let config = self.config;
        if config.is_accepting(&self.state) {
            return Err(Verdict::Accepted);
        }

        config
            .lookup(&self.state, self.tape.read())
            .ok_or(Verdict::Rejected)
    }

    fn apply(&mut self, rule: &TransitionRule<Q, S>) {
        trace!(
            step = self.step_count,
            state = ?self.state,
            read = ?rule.read,
            write = ?rule.write,
            direction = ?rule.direction,
            next = ?rule.to,
            "applying transition"
        );

        self.tape.write(rule.write);
        self.tape.shift(rule.direction);
        self.state = rule.to.clone();
        self.step_count += 1;
    }

    fn halt(&mut self, verdict: Verdict) -> Step {
        debug!(
            %verdict,
            state = ?self.state,
            steps = self.step_count,
            "machine halted"
        );
        self.verdict = Some(verdict);
        Step::Halt(verdict)
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &Q {
        &self.state
    }

    /// Returns the start state of the machine.
    pub fn initial_state(&self) -> &Q {
        self.config.start()
    }

    pub fn config(&self) -> &'a MachineConfig<Q, S> {
        self.config
    }

    pub fn tape(&self) -> &Tape<S> {
        &self.tape
    }

    /// Returns the total number of transitions applied.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the verdict once the machine has halted.
    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    pub fn is_halted(&self) -> bool {
        self.verdict.is_some()
    }

    /// Returns the rule the next step would apply, if any.
    pub fn transition(&self) -> Option<&'a TransitionRule<Q, S>> {
        if self.is_halted() {
            return None;
        }
        self.next_rule().ok()
    }

    /// Resets the machine to its start state and initial tape.
    pub fn reset(&mut self) {
        self.state = self.config.start().clone();
        self.tape = self.initial_tape.clone();
        self.step_count = 0;
        self.verdict = None;
    }

    /// Finishes the run and reports it.
    ///
    /// A machine that has not halted yet reports `Verdict::Cancelled`.
    pub fn into_result(self) -> SimulationResult<Q, S> {
        SimulationResult {
            verdict: self.verdict.unwrap_or(Verdict::Cancelled),
            tape: self.tape.snapshot(),
            state: self.state,
            steps: self.step_count,
        }
    }
}
