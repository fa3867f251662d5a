//! Runs many inputs against one machine definition on several threads.
//!
//! The configuration is shared read-only between workers and every run owns its tape,
//! so no locking is involved.

use crate::config::MachineConfig;
use crate::machine::{simulate, SimulationResult};
use crate::tape::Tape;
use crate::types::{State, Symbol};
use std::num::NonZeroUsize;
use std::thread;
use tracing::debug;

/// Simulates every tape in `tapes` against `config` with the same `step_limit`.
///
/// Inputs are split into contiguous chunks, one per worker, and run on scoped threads.
/// Results come back in input order. `workers` defaults to the available parallelism
/// and is never larger than the number of inputs.
pub fn simulate_batch<Q, S>(
    config: &MachineConfig<Q, S>,
    tapes: Vec<Tape<S>>,
    step_limit: Option<usize>,
    workers: Option<NonZeroUsize>,
) -> Vec<SimulationResult<Q, S>>
where
    Q: State + Send + Sync,
    S: Symbol + Send + Sync,
{
    if tapes.is_empty() {
        return Vec::new();
    }

    let workers = workers
        .or_else(|| thread::available_parallelism().ok())
        .map_or(1, NonZeroUsize::get)
        .min(tapes.len());
    let chunk_size = tapes.len().div_ceil(workers);

    debug!(
        inputs = tapes.len(),
        workers,
        chunk_size,
        "starting batch simulation"
    );

    if workers == 1 {
        return tapes
            .into_iter()
            .map(|tape| simulate(config, tape, step_limit))
            .collect();
    }

    let mut chunks: Vec<Vec<Tape<S>>> = Vec::with_capacity(workers);
    let mut remaining = tapes.into_iter().peekable();
    while remaining.peek().is_some() {
        chunks.push(remaining.by_ref().take(chunk_size).collect());
    }

    thread::scope(|scope| {
        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .into_iter()
                        .map(|tape| simulate(config, tape, step_limit))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(results) => results,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Verdict};

    /// Accepts binary strings with an even number of `1`s.
    fn create_parity_program() -> MachineConfig<&'static str, char> {
        MachineConfig::builder()
            .alphabet('_', ['0', '1'])
            .unwrap()
            .states(["even", "odd", "accept"])
            .unwrap()
            .rule("even", '0', '0', Direction::Right, "even")
            .unwrap()
            .rule("even", '1', '1', Direction::Right, "odd")
            .unwrap()
            .rule("odd", '0', '0', Direction::Right, "odd")
            .unwrap()
            .rule("odd", '1', '1', Direction::Right, "even")
            .unwrap()
            .rule("even", '_', '_', Direction::Stay, "accept")
            .unwrap()
            .accept(["accept"])
            .unwrap()
            .start("even")
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let config = create_parity_program();
        let inputs = ["", "1", "11", "101", "0110", "111", "1111", "10"];
        let tapes = inputs.iter().map(|i| Tape::from_input('_', i)).collect();

        let results = simulate_batch(&config, tapes, Some(100), NonZeroUsize::new(3));

        let verdicts: Vec<Verdict> = results.iter().map(|r| r.verdict).collect();
        assert_eq!(
            verdicts,
            vec![
                Verdict::Accepted,
                Verdict::Rejected,
                Verdict::Accepted,
                Verdict::Accepted,
                Verdict::Accepted,
                Verdict::Rejected,
                Verdict::Accepted,
                Verdict::Rejected,
            ]
        );
        assert_eq!(results[4].steps, 5);
    }

    #[test]
    fn test_batch_matches_sequential_runs() {
        let config = create_parity_program();
        let inputs: Vec<String> = (0u32..32).map(|n| format!("{:b}", n)).collect();

        let sequential: Vec<_> = inputs
            .iter()
            .map(|i| simulate(&config, Tape::from_input('_', i), Some(100)))
            .collect();
        let tapes = inputs.iter().map(|i| Tape::from_input('_', i)).collect();
        let parallel = simulate_batch(&config, tapes, Some(100), None);

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_empty_batch() {
        let config = create_parity_program();
        let results = simulate_batch(&config, Vec::new(), None, NonZeroUsize::new(4));
        assert!(results.is_empty());
    }
}
