use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tur_sim::{
    analyze_input, Program, ProgramManager, SimulationResult, Step, TapeSnapshot, TuringMachine,
    Verdict, INPUT_BLANK_SYMBOL, MAX_EXECUTION_STEPS,
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  tur-sim --list
  tur-sim -p \"Binary increment\" -i 1011
  tur-sim -p 3 -i abba --json
  RUST_LOG=tur_sim=trace tur-sim -p \"Busy beaver 3\"")]
struct Cli {
    /// The built-in program to run, by name or index
    #[clap(short, long)]
    program: Option<String>,

    /// The input written on the tape; `_` stands for the blank symbol.
    /// Defaults to the program's sample input
    #[clap(short, long)]
    input: Option<String>,

    /// Maximum number of transitions to apply
    #[clap(short, long, default_value_t = MAX_EXECUTION_STEPS)]
    limit: usize,

    /// Run without a step limit
    #[clap(long, conflicts_with = "limit")]
    unbounded: bool,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print the result as JSON
    #[clap(long)]
    json: bool,

    /// List the built-in programs and exit
    #[clap(long)]
    list: bool,

    /// Report definition problems before running
    #[clap(short, long)]
    analyze: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(3)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn Error>> {
    if cli.list {
        list_programs()?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(selector) = cli.program.as_deref() else {
        return Err("no program given, use --program or --list".into());
    };

    let program = match selector.parse::<usize>() {
        Ok(index) => ProgramManager::get_program_by_index(index)?,
        Err(_) => ProgramManager::get_program_by_name(selector)?,
    };
    let input = cli.input.as_deref().unwrap_or(&program.input);
    let tape = program.tape(input);
    info!(program = %program.name, input, "running program");

    if cli.analyze {
        match analyze_input(&program.config, &tape) {
            Ok(()) => eprintln!("Analysis: no findings"),
            Err(e) => eprintln!("Analysis: {}", e),
        }
    }

    let step_limit = (!cli.unbounded).then_some(cli.limit);
    let mut machine = TuringMachine::new(&program.config, tape);

    if cli.debug {
        print_state(&machine);
        while let Step::Continue = machine.step_with_limit(step_limit) {
            print_state(&machine);
        }
        println!();
    } else {
        machine.run(step_limit);
    }

    let result = machine.into_result();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&program, input, &result);
    }

    Ok(exit_code(result.verdict))
}

fn list_programs() -> Result<(), Box<dyn Error>> {
    for index in 0..ProgramManager::get_program_count() {
        let info = ProgramManager::get_program_info(index)?;
        println!(
            "{:>2}  {:<22} {} (states: {}, rules: {}, sample: {:?})",
            info.index,
            info.name,
            info.description,
            info.state_count,
            info.transition_count,
            info.input
        );
    }
    Ok(())
}

/// Renders a tape with blank cells shown as `INPUT_BLANK_SYMBOL`.
fn render_tape(tape: &TapeSnapshot<char>, blank: char) -> String {
    tape.render(|c| {
        if c == blank {
            INPUT_BLANK_SYMBOL.to_string()
        } else {
            c.to_string()
        }
    })
}

fn print_state(machine: &TuringMachine<'_, String, char>) {
    let tape = render_tape(&machine.tape().snapshot(), machine.tape().blank());
    match machine.transition() {
        Some(rule) => println!(
            "Step: {}, State: {}, Tape: {}, Next: {}",
            machine.step_count(),
            machine.state(),
            tape,
            rule
        ),
        None => println!(
            "Step: {}, State: {}, Tape: {}",
            machine.step_count(),
            machine.state(),
            tape
        ),
    }
}

fn print_result(program: &Program, input: &str, result: &SimulationResult<String, char>) {
    let tape = render_tape(&result.tape, program.config.blank());

    println!("Program: {}", program.name);
    println!("Input:   {}", input);
    println!("Verdict: {}", result.verdict);
    println!("State:   {}", result.state);
    println!("Steps:   {}", result.steps);
    println!("Tape:    {}", tape);
}

fn exit_code(verdict: Verdict) -> ExitCode {
    match verdict {
        Verdict::Accepted => ExitCode::SUCCESS,
        Verdict::Rejected => ExitCode::from(1),
        Verdict::StepLimitExceeded | Verdict::Cancelled => ExitCode::from(2),
    }
}
