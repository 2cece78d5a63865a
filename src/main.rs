//! it CLI: Execute files, evaluate code, or run the REPL.

use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::process;

use colored::Colorize;

use itlang::error::ItlangError;
use itlang::repl::Repl;
use itlang::{ExecutionMode, RunOptions, RunOutcome};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI command to execute.
enum Command {
    /// Run a script file
    Run { file: String },
    /// Evaluate a string
    Eval { code: String },
    /// Start the REPL
    Repl,
}

/// CLI options parsed from arguments.
struct Options {
    command: Command,
    run: RunOptions,
    /// Print the bytecode listing before running.
    disassemble: bool,
}

const USAGE: &str = "\
Usage: it [options]              Start the REPL
       it [options] <file>
       it [options] -f <file>
       it [options] -c <code>

Options:
  -f <file>        Execute a file
  -c <code>        Execute a string of code
  --vm             Run on the bytecode VM (integer/boolean subset)
  --disassemble    Print the bytecode listing before running (with --vm)
  --max-steps N    Abort after N statements or instructions
  --version, -v    Show version
  --help, -h       Show this help message

REPL commands:
  :q               Quit
  :tokens <code>   Show the token stream
  :ast <code>      Show the parsed program

Examples:
  it -c 'println(1 + 2 * 3);'
  it --vm --disassemble -c 'if (2 > 1) { 3; }'
";

fn print_usage() {
    eprintln!("it {} - itlang interpreter", VERSION);
    eprintln!();
    eprint!("{}", USAGE);
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", message);
    print_usage();
    process::exit(64);
}

fn parse_args() -> Options {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut options = Options {
        command: Command::Repl,
        run: RunOptions::default(),
        disassemble: false,
    };

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            "--version" | "-v" => {
                println!("it {}", VERSION);
                process::exit(0);
            }
            "--vm" => options.run.mode = ExecutionMode::Bytecode,
            "--disassemble" => options.disassemble = true,
            "--max-steps" => {
                i += 1;
                let Some(value) = args.get(i) else {
                    usage_error("--max-steps requires a number");
                };
                match value.parse::<u64>() {
                    Ok(n) => options.run.max_steps = Some(n),
                    Err(_) => usage_error(&format!("Invalid step count: {}", value)),
                }
            }
            "-c" => {
                i += 1;
                let Some(code) = args.get(i) else {
                    usage_error("-c requires a code argument");
                };
                set_command(&mut options, Command::Eval { code: code.clone() });
            }
            "-f" => {
                i += 1;
                let Some(file) = args.get(i) else {
                    usage_error("-f requires a file argument");
                };
                set_command(&mut options, Command::Run { file: file.clone() });
            }
            _ if arg.starts_with('-') => usage_error(&format!("Unknown option: {}", arg)),
            _ => set_command(&mut options, Command::Run { file: arg.clone() }),
        }
        i += 1;
    }

    if options.disassemble && options.run.mode != ExecutionMode::Bytecode {
        usage_error("--disassemble requires --vm");
    }

    options
}

fn set_command(options: &mut Options, command: Command) {
    if !matches!(options.command, Command::Repl) {
        usage_error("Only one script file or -c argument can be specified");
    }
    options.command = command;
}

fn main() {
    itlang::init_tracing();

    let options = parse_args();

    match &options.command {
        Command::Repl => run_repl(&options),
        Command::Run { file } if !options.disassemble => {
            report(itlang::run_file(Path::new(file), options.run))
        }
        Command::Run { file } => report(
            fs::read_to_string(file)
                .map_err(ItlangError::from)
                .and_then(|source| run_listed(&source, options.run)),
        ),
        Command::Eval { code } if options.disassemble => report(run_listed(code, options.run)),
        Command::Eval { code } => report(itlang::run_with_options(code, options.run)),
    }
}

/// Compile, print the listing, then run the same bytecode.
fn run_listed(source: &str, options: RunOptions) -> Result<RunOutcome, ItlangError> {
    let compiled = itlang::compile(source)?;
    print!("{}", itlang::disassemble(&compiled));
    println!("---");
    itlang::run_bytecode(&compiled, options.max_steps)
}

fn report(result: Result<RunOutcome, ItlangError>) {
    match result {
        Ok(RunOutcome::Stack(stack)) if !stack.is_empty() => {
            println!("stack: {:?}", stack);
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(70);
        }
    }
}

fn run_repl(options: &Options) {
    if options.run.mode == ExecutionMode::Bytecode {
        usage_error("The REPL runs on the tree-walking interpreter; --vm is not supported");
    }

    let mut repl = Repl::new().with_step_limit(options.run.max_steps);
    let stdin = io::stdin();
    if let Err(e) = repl.run(stdin.lock(), &mut io::stdout()) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(70);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_lists_brace_examples_literally() {
        assert!(USAGE.contains("-c 'if (2 > 1) { 3; }'"));
        assert!(USAGE.ends_with('\n'));
    }
}
