//! This crate provides the core logic for a deterministic single-tape Turing machine simulator.
//! It includes modules for declaring a machine, running it on an unbounded tape, running many
//! inputs in parallel, analyzing definitions, and a catalog of built-in machines.

pub mod analyzer;
pub mod batch;
pub mod config;
pub mod machine;
pub mod programs;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the `analyze` functions and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, analyze_input, AnalysisError};
/// Re-exports the parallel runner from the batch module.
pub use batch::simulate_batch;
/// Re-exports the machine definition types from the config module.
pub use config::{Alphabet, MachineBuilder, MachineConfig, StateSet};
/// Re-exports the engine and its entry point from the machine module.
pub use machine::{simulate, SimulationResult, TuringMachine};
/// Re-exports `Program`, `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{Program, ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the transition types from the table module.
pub use table::{TransitionRule, TransitionTable};
/// Re-exports the tape and its snapshot from the tape module.
pub use tape::{Tape, TapeSnapshot};
/// Re-exports the shared types from the types module.
pub use types::{
    Direction, State, Step, Symbol, TuringMachineError, Verdict, DEFAULT_BLANK_SYMBOL,
    INPUT_BLANK_SYMBOL, MAX_EXECUTION_STEPS,
};
