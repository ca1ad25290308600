mod output;

use clap::{Arg, ArgAction, ArgMatches, Command};
use fuc_core::{CompileOptions, IrModule, Target, compile_tree_to_ir};
use std::fs;
use std::io;
use std::process::ExitCode;

use output::Printer;

fn main() -> ExitCode {
    let cli = Command::new("fuc")
        .version("0.1.0")
        .about("Lower C-like syntax trees into a control-flow-graph IR");

    let cli = setup_cli(cli);
    let matches = cli.get_matches();
    // Write failures on stdout or stderr fail the run.
    dispatch_commands(&matches).unwrap_or(ExitCode::FAILURE)
}

/// Arguments shared by `build` and `check`.
fn compile_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("file")
            .help("The tree dump to compile")
            .required(true)
            .index(1),
    )
    .arg(
        Arg::new("target")
            .help("Output platform (windows-x86, windows-x64, linux-x86, linux-x64, wasm32)")
            .short('t')
            .long("target")
            .value_parser(clap::value_parser!(String))
            .value_name("TARGET"),
    )
    .arg(
        Arg::new("config")
            .help("JSON file with compile options")
            .short('c')
            .long("config")
            .value_parser(clap::value_parser!(String))
            .value_name("FILE"),
    )
    .arg(
        Arg::new("single-pass")
            .help("Do not register function signatures ahead of their bodies")
            .long("single-pass")
            .action(ArgAction::SetTrue),
    )
}

/// Sets up the CLI with its subcommands and arguments.
fn setup_cli(cli: Command) -> Command {
    cli.subcommand(
        compile_args(Command::new("build").about("Lower a tree dump and print a module summary"))
            .arg(
                Arg::new("json")
                    .help("Print the summary as JSON")
                    .long("json")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("output")
                    .help("Write the JSON summary to a file")
                    .short('o')
                    .long("output")
                    .value_parser(clap::value_parser!(String))
                    .value_name("FILE"),
            ),
    )
    .subcommand(compile_args(
        Command::new("check").about("Lower and verify a tree dump without printing the module"),
    ))
    .subcommand(Command::new("targets").about("List the supported output platforms"))
}

/// Config file first, then command line flags on top.
fn resolve_options(sub_m: &ArgMatches) -> Result<CompileOptions, String> {
    let mut options = match sub_m.get_one::<String>("config") {
        Some(path) => CompileOptions::load_from_file(path)?,
        None => CompileOptions::default(),
    };
    if let Some(target) = sub_m.get_one::<String>("target") {
        options.target = Some(target.parse::<Target>()?);
    }
    if sub_m.get_flag("single-pass") {
        options.single_pass = true;
    }
    Ok(options)
}

/// Read, lower and verify the file named on the command line. Failures are
/// reported on stderr and yield `None`.
fn compile(sub_m: &ArgMatches, err: &mut Printer<io::Stderr>) -> io::Result<Option<IrModule>> {
    let Some(file) = sub_m.get_one::<String>("file") else {
        return Ok(None);
    };

    let options = match resolve_options(sub_m) {
        Ok(options) => options,
        Err(e) => {
            err.error(&format!("error: {}", e))?;
            return Ok(None);
        }
    };

    let text = match fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            err.error(&format!("error: cannot read '{}': {}", file, e))?;
            return Ok(None);
        }
    };

    match compile_tree_to_ir(&text, file, &options) {
        Ok(module) => Ok(Some(module)),
        Err(e) => {
            err.report(e.as_ref())?;
            Ok(None)
        }
    }
}

/// Dispatches the command based on the parsed arguments. An `Err` means
/// stdout or stderr could not be written.
fn dispatch_commands(matches: &ArgMatches) -> io::Result<ExitCode> {
    let mut out = Printer::new(io::stdout());
    let mut err = Printer::new(io::stderr());

    match matches.subcommand() {
        Some(("build", sub_m)) => {
            let Some(module) = compile(sub_m, &mut err)? else {
                return Ok(ExitCode::FAILURE);
            };
            let summary = module.summary();

            let json = match serde_json::to_string_pretty(&summary) {
                Ok(json) => json,
                Err(e) => {
                    err.error(&format!("error: cannot encode summary: {}", e))?;
                    return Ok(ExitCode::FAILURE);
                }
            };

            if let Some(path) = sub_m.get_one::<String>("output") {
                if let Err(e) = fs::write(path, &json) {
                    err.error(&format!("error: cannot write '{}': {}", path, e))?;
                    return Ok(ExitCode::FAILURE);
                }
            }

            if sub_m.get_flag("json") {
                out.message(&json)?;
            } else {
                let target = summary.target.as_deref().unwrap_or("host");
                out.title(&format!("module for {}", target))?;
                out.message(&output::summary_table(&summary).to_string())?;
                out.info(&format!("{} global(s)", summary.globals))?;
            }
            out.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Some(("check", sub_m)) => match compile(sub_m, &mut err)? {
            Some(module) => {
                let defined = module.functions().iter().filter(|f| !f.is_declaration()).count();
                out.success(&format!("ok: {} function(s) lowered and verified", defined))?;
                out.flush()?;
                Ok(ExitCode::SUCCESS)
            }
            None => Ok(ExitCode::FAILURE),
        },
        Some(("targets", _)) => {
            out.message(&output::targets_table().to_string())?;
            out.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            out.message("No valid subcommand was used. Use --help for more information.")?;
            Ok(ExitCode::FAILURE)
        }
    }
}
