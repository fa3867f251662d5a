//! A catalog of built-in machines, assembled in code with `MachineConfig::builder()`.

use crate::config::MachineConfig;
use crate::tape::Tape;
use crate::types::{TuringMachineError, DEFAULT_BLANK_SYMBOL};

use std::sync::RwLock;
use tracing::warn;

use crate::types::Direction::{Left as L, Right as R, Stay as S};

const BLANK: char = DEFAULT_BLANK_SYMBOL;

type Config = MachineConfig<String, char>;

/// A named machine with a sample input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub name: String,
    pub description: String,
    /// Sample input; `_` stands for the blank symbol.
    pub input: String,
    pub config: Config,
}

impl Program {
    /// Builds the tape for `input` using this machine's blank symbol.
    pub fn tape(&self, input: &str) -> Tape<char> {
        Tape::from_input(self.config.blank(), input)
    }

    /// Builds the tape for the sample input.
    pub fn initial_tape(&self) -> Tape<char> {
        self.tape(&self.input)
    }
}

type ProgramFactory = fn() -> Result<Program, TuringMachineError>;

const PROGRAM_FACTORIES: [ProgramFactory; 7] = [
    trivial_reject,
    trivial_accept,
    binary_increment,
    palindrome_checker,
    even_ones,
    busy_beaver_3,
    endless_right,
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<Program>> = RwLock::new(Vec::new());
}

pub struct ProgramManager;

impl ProgramManager {
    /// Builds the built-in programs and stores them in `PROGRAMS`.
    pub fn load() -> Result<(), TuringMachineError> {
        let mut programs = Vec::new();

        for factory in PROGRAM_FACTORIES {
            match factory() {
                Ok(program) => programs.push(program),
                Err(e) => warn!(error = %e, "failed to build built-in program"),
            }
        }

        if let Ok(mut write_guard) = PROGRAMS.write() {
            *write_guard = programs;
        } else {
            return Err(TuringMachineError::ValidationError(
                "Failed to acquire write lock".to_string(),
            ));
        }

        Ok(())
    }

    /// Loads the programs on first use.
    fn ensure_loaded() -> Result<(), TuringMachineError> {
        let loaded = !PROGRAMS.read().map_err(|_| lock_error())?.is_empty();
        if !loaded {
            Self::load()?;
        }
        Ok(())
    }

    /// Like `ensure_loaded`, for the lookups that cannot report an error.
    fn ensure_loaded_or_warn() {
        if let Err(e) = Self::ensure_loaded() {
            warn!(error = %e, "failed to load built-in programs");
        }
    }

    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        Self::ensure_loaded_or_warn();

        PROGRAMS.read().map(|programs| programs.len()).unwrap_or(0)
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, TuringMachineError> {
        Self::ensure_loaded()?;

        PROGRAMS
            .read()
            .map_err(|_| lock_error())?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    /// Get a program by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<Program, TuringMachineError> {
        Self::ensure_loaded()?;

        PROGRAMS
            .read()
            .map_err(|_| lock_error())?
            .iter()
            .find(|program| program.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program '{}' not found", name))
            })
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        Self::ensure_loaded_or_warn();

        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .map(|program| program.name.clone())
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let program = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: program.name.clone(),
            description: program.description.clone(),
            initial_state: program.config.start().clone(),
            input: program.input.clone(),
            state_count: program.config.states().len(),
            transition_count: program.config.table().len(),
        })
    }

    /// Search for programs by name
    pub fn search_programs(query: &str) -> Vec<usize> {
        Self::ensure_loaded_or_warn();

        let query = query.to_lowercase();
        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .enumerate()
                    .filter(|(_, program)| program.name.to_lowercase().contains(&query))
                    .map(|(index, _)| index)
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub description: String,
    pub initial_state: String,
    pub input: String,
    pub state_count: usize,
    pub transition_count: usize,
}

fn lock_error() -> TuringMachineError {
    TuringMachineError::ValidationError("Failed to acquire read lock".to_string())
}

fn program(name: &str, description: &str, input: &str, config: Config) -> Program {
    Program {
        name: name.to_string(),
        description: description.to_string(),
        input: input.to_string(),
        config,
    }
}

/// One rule from `q0` on `a`; the only accept state is never entered.
fn trivial_reject() -> Result<Program, TuringMachineError> {
    let config = trivial_machine("q2")?;
    Ok(program(
        "Trivial reject",
        "Rewrites a to b, then finds no rule in q1",
        "a",
        config,
    ))
}

fn trivial_accept() -> Result<Program, TuringMachineError> {
    let config = trivial_machine("q1")?;
    Ok(program(
        "Trivial accept",
        "Rewrites a to b and accepts in q1",
        "a",
        config,
    ))
}

fn trivial_machine(accept: &str) -> Result<Config, TuringMachineError> {
    Config::builder()
        .alphabet(BLANK, ['a', 'b'])?
        .states(["q0", "q1", "q2", "q3"])?
        .rule("q0", 'a', 'b', R, "q1")?
        .accept([accept])?
        .start("q0")?
        .build()
}

fn binary_increment() -> Result<Program, TuringMachineError> {
    let config = Config::builder()
        .alphabet(BLANK, ['0', '1'])?
        .states(["right", "carry", "done"])?
        .rule("right", '0', '0', R, "right")?
        .rule("right", '1', '1', R, "right")?
        .rule("right", BLANK, BLANK, L, "carry")?
        .rule("carry", '1', '0', L, "carry")?
        .rule("carry", '0', '1', S, "done")?
        .rule("carry", BLANK, '1', S, "done")?
        .accept(["done"])?
        .start("right")?
        .build()?;

    Ok(program(
        "Binary increment",
        "Adds one to a binary number",
        "1011",
        config,
    ))
}

/// Erases matching outer symbols until nothing or a single symbol is left.
fn palindrome_checker() -> Result<Program, TuringMachineError> {
    let mut builder = Config::builder()
        .alphabet(BLANK, ['a', 'b'])?
        .states([
            "start", "have_a", "have_b", "match_a", "match_b", "back", "accept",
        ])?
        .rule("start", BLANK, BLANK, S, "accept")?
        .rule("start", 'a', BLANK, R, "have_a")?
        .rule("start", 'b', BLANK, R, "have_b")?
        .rule("match_a", 'a', BLANK, L, "back")?
        .rule("match_b", 'b', BLANK, L, "back")?
        .rule("match_a", BLANK, BLANK, S, "accept")?
        .rule("match_b", BLANK, BLANK, S, "accept")?;

    for symbol in ['a', 'b'] {
        builder = builder
            .rule("have_a", symbol, symbol, R, "have_a")?
            .rule("have_b", symbol, symbol, R, "have_b")?
            .rule("back", symbol, symbol, L, "back")?;
    }

    let config = builder
        .rule("have_a", BLANK, BLANK, L, "match_a")?
        .rule("have_b", BLANK, BLANK, L, "match_b")?
        .rule("back", BLANK, BLANK, R, "start")?
        .accept(["accept"])?
        .start("start")?
        .build()?;

    Ok(program(
        "Palindrome checker",
        "Accepts palindromes over a and b",
        "abba",
        config,
    ))
}

fn even_ones() -> Result<Program, TuringMachineError> {
    let config = Config::builder()
        .alphabet(BLANK, ['0', '1'])?
        .states(["even", "odd", "accept"])?
        .rule("even", '0', '0', R, "even")?
        .rule("even", '1', '1', R, "odd")?
        .rule("odd", '0', '0', R, "odd")?
        .rule("odd", '1', '1', R, "even")?
        .rule("even", BLANK, BLANK, S, "accept")?
        .accept(["accept"])?
        .start("even")?
        .build()?;

    Ok(program(
        "Even number of ones",
        "Accepts binary strings containing an even number of 1s",
        "1001",
        config,
    ))
}

/// The 3-state, 2-symbol busy beaver: 14 steps, six 1s.
fn busy_beaver_3() -> Result<Program, TuringMachineError> {
    let config = Config::builder()
        .alphabet('0', ['1'])?
        .states(["A", "B", "C", "H"])?
        .rule("A", '0', '1', R, "B")?
        .rule("A", '1', '1', R, "H")?
        .rule("B", '0', '0', R, "C")?
        .rule("B", '1', '1', R, "B")?
        .rule("C", '0', '1', L, "C")?
        .rule("C", '1', '1', L, "A")?
        .accept(["H"])?
        .start("A")?
        .build()?;

    Ok(program(
        "Busy beaver 3",
        "Writes six 1s on a blank tape and halts",
        "",
        config,
    ))
}

/// Never halts; only a step limit stops it.
fn endless_right() -> Result<Program, TuringMachineError> {
    let config = Config::builder()
        .alphabet(BLANK, ['1'])?
        .states(["run"])?
        .rule("run", BLANK, '1', R, "run")?
        .rule("run", '1', '1', R, "run")?
        .start("run")?
        .build()?;

    Ok(program(
        "Endless right",
        "Fills the tape with 1s forever",
        "",
        config,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{analyze, AnalysisError};
    use crate::machine::simulate;
    use crate::types::{Verdict, MAX_EXECUTION_STEPS};

    fn run(name: &str, input: &str) -> crate::machine::SimulationResult<String, char> {
        let program = ProgramManager::get_program_by_name(name).unwrap();
        simulate(&program.config, program.tape(input), Some(MAX_EXECUTION_STEPS))
    }

    fn trimmed_output(name: &str, input: &str) -> String {
        let result = run(name, input);
        result.tape.trimmed(BLANK).cells.iter().collect()
    }

    #[test]
    fn test_program_manager_initialization() {
        let result = ProgramManager::load();
        assert!(result.is_ok());

        assert_eq!(ProgramManager::get_program_count(), PROGRAM_FACTORIES.len());
    }

    #[test]
    fn test_lookups_load_catalog_on_demand() {
        assert!(ProgramManager::ensure_loaded().is_ok());
        assert_eq!(PROGRAMS.read().unwrap().len(), PROGRAM_FACTORIES.len());

        assert!(ProgramManager::get_program_by_name("busy beaver 3").is_ok());
        assert!(matches!(
            ProgramManager::get_program_by_index(PROGRAM_FACTORIES.len()),
            Err(TuringMachineError::ValidationError(msg)) if msg.contains("out of range")
        ));
    }

    #[test]
    fn test_all_programs_are_valid() {
        for factory in PROGRAM_FACTORIES {
            let program = factory().unwrap();
            if program.name.starts_with("Trivial") {
                continue;
            }
            assert!(
                analyze(&program.config).is_ok(),
                "Program '{}' is invalid",
                program.name
            );
        }
    }

    #[test]
    fn test_trivial_programs_declare_unused_states() {
        let program = trivial_reject().unwrap();
        let findings = crate::analyzer::findings(&program.config);
        assert_eq!(
            findings,
            vec![
                AnalysisError::UnreachableStates(vec![
                    "\"q2\"".to_string(),
                    "\"q3\"".to_string(),
                ]),
                AnalysisError::AcceptStatesUnreachable(vec!["\"q2\"".to_string()]),
            ]
        );
    }

    #[test]
    fn test_program_names() {
        let names = ProgramManager::list_program_names();
        assert!(names.contains(&"Trivial reject".to_string()));
        assert!(names.contains(&"Binary increment".to_string()));
        assert!(names.contains(&"Palindrome checker".to_string()));
        assert!(names.contains(&"Busy beaver 3".to_string()));
    }

    #[test]
    fn test_trivial_programs() {
        let result = run("Trivial reject", "a");
        assert_eq!(result.verdict, Verdict::Rejected);
        assert_eq!(result.tape.cells, vec!['b', BLANK]);
        assert_eq!(result.steps, 1);

        let result = run("Trivial accept", "a");
        assert_eq!(result.verdict, Verdict::Accepted);
        assert_eq!(result.steps, 1);
    }

    #[test]
    fn test_binary_increment() {
        assert_eq!(trimmed_output("Binary increment", "1011"), "1100");
        assert_eq!(trimmed_output("Binary increment", "111"), "1000");
        assert_eq!(trimmed_output("Binary increment", "0"), "1");

        let result = run("Binary increment", "1011");
        assert_eq!(result.verdict, Verdict::Accepted);
        assert_eq!(result.steps, 8);
    }

    #[test]
    fn test_palindrome_checker() {
        for input in ["", "a", "abba", "aba", "babbab"] {
            assert_eq!(
                run("Palindrome checker", input).verdict,
                Verdict::Accepted,
                "{input}"
            );
        }
        for input in ["ab", "abb", "abab"] {
            assert_eq!(
                run("Palindrome checker", input).verdict,
                Verdict::Rejected,
                "{input}"
            );
        }
    }

    #[test]
    fn test_even_ones() {
        assert_eq!(run("Even number of ones", "1001").verdict, Verdict::Accepted);
        assert_eq!(run("Even number of ones", "1011").verdict, Verdict::Rejected);
    }

    #[test]
    fn test_busy_beaver() {
        let result = run("Busy beaver 3", "");
        assert_eq!(result.verdict, Verdict::Accepted);
        assert_eq!(result.steps, 14);
        assert_eq!(result.tape.cells, vec!['1'; 6]);
        assert_eq!(result.tape.head, 3);
    }

    #[test]
    fn test_endless_program_hits_step_limit() {
        let result = run("Endless right", "");
        assert_eq!(result.verdict, Verdict::StepLimitExceeded);
        assert_eq!(result.steps, MAX_EXECUTION_STEPS + 1);
    }

    #[test]
    fn test_program_manager_get_program_by_index() {
        let program = ProgramManager::get_program_by_index(0);
        assert!(program.is_ok());

        let result = ProgramManager::get_program_by_index(999);
        assert!(result.is_err());
    }

    #[test]
    fn test_program_manager_get_program_by_name() {
        let program = ProgramManager::get_program_by_name("binary INCREMENT");
        assert!(program.is_ok());
        assert_eq!(program.unwrap().input, "1011");

        let result = ProgramManager::get_program_by_name("Nonexistent");
        assert!(result.is_err());
    }

    #[test]
    fn test_program_manager_get_program_info() {
        let info = ProgramManager::get_program_info(2).unwrap();
        assert_eq!(info.index, 2);
        assert_eq!(info.name, "Binary increment");
        assert_eq!(info.initial_state, "right");
        assert_eq!(info.state_count, 3);
        assert_eq!(info.transition_count, 6);

        let result = ProgramManager::get_program_info(999);
        assert!(result.is_err());
    }

    #[test]
    fn test_program_manager_search_programs() {
        let results = ProgramManager::search_programs("trivial");
        assert_eq!(results, vec![0, 1]);

        let results = ProgramManager::search_programs("palindrome");
        assert!(!results.is_empty());

        let results = ProgramManager::search_programs("nonexistent");
        assert_eq!(results.len(), 0);
    }
}
