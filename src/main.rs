//! CLI tool to convert pysh scripts and run them with Python.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::process::{Command, ExitCode};

use log::LevelFilter;
use pysh_rs::{Config, Converter, Error, SIGNATURE};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

/// Environment variable holding the log level.
const LOG_ENV: &str = "PYSH_LOG";

fn main() -> ExitCode {
    init_logging();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let emit = args.first().is_some_and(|a| a == "--emit");
    if emit {
        args.remove(0);
    }

    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        return usage();
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pysh: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match args[0].as_str() {
        "-" => run_inline(io::stdin().lock(), &args[1..], &config, emit),
        "-c" => {
            if args.len() < 2 {
                return usage();
            }
            run_inline(args[1].as_bytes(), &args[2..], &config, emit)
        }
        script => run_script(Path::new(script), &args[1..], &config, emit),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("pysh: {e}");
            ExitCode::FAILURE
        }
    }
}

fn usage() -> ExitCode {
    eprintln!("Usage: pysh [--emit] [-c cmd | file | -] [args...]");
    eprintln!();
    eprintln!("  -c cmd   Convert and run the given source text");
    eprintln!("  file     Convert file to file.py and run it");
    eprintln!("  -        Convert and run source read from stdin");
    eprintln!("  --emit   Print the generated Python (without banner) instead of running it");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PYSH_CONFIG  TOML config file");
    eprintln!("  PYSH_LOG     Log level (off, error, warn, info, debug, trace)");
    ExitCode::from(2)
}

fn init_logging() {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    // a second logger cannot be installed; ignoring is fine
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn run_inline(
    reader: impl Read,
    argv: &[String],
    config: &Config,
    emit: bool,
) -> Result<ExitCode, Error> {
    let mut converter =
        Converter::with_runtime(BufReader::new(reader), Vec::new(), config.runtime());
    converter.convert()?;
    let code = String::from_utf8_lossy(&converter.into_writer()).into_owned();

    if emit {
        io::stdout().lock().write_all(code.as_bytes())?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut command = Command::new(&config.interpreter);
    command.arg("-c").arg(&code).args(argv);
    Ok(launch(command)?)
}

fn run_script(
    script: &Path,
    argv: &[String],
    config: &Config,
    emit: bool,
) -> Result<ExitCode, Error> {
    if script.extension().is_some_and(|ext| ext == "py") {
        eprintln!("pysh: an input file shouldn't be *.py");
        return Ok(ExitCode::from(2));
    }

    let reader = BufReader::new(File::open(script)?);
    if emit {
        // no file is generated, so no banner
        Converter::with_runtime(reader, io::stdout().lock(), config.runtime()).convert()?;
        return Ok(ExitCode::SUCCESS);
    }

    let output = script.with_extension("py");
    write_program(reader, BufWriter::new(File::create(&output)?), config)?;
    log::info!("wrote {}", output.display());

    let mut command = Command::new(&config.interpreter);
    command.arg(&output).args(argv);
    Ok(launch(command)?)
}

fn write_program(reader: impl Read, mut writer: impl Write, config: &Config) -> Result<(), Error> {
    if config.signature {
        writer.write_all(SIGNATURE.as_bytes())?;
    }
    Converter::with_runtime(reader, writer, config.runtime()).convert()?;
    Ok(())
}

#[cfg(unix)]
fn launch(mut command: Command) -> io::Result<ExitCode> {
    use std::os::unix::process::CommandExt;

    log::debug!("exec {command:?}");
    // only returns on failure
    Err(command.exec())
}

#[cfg(not(unix))]
fn launch(mut command: Command) -> io::Result<ExitCode> {
    log::debug!("spawn {command:?}");
    let status = command.status()?;
    Ok(status
        .code()
        .and_then(|c| u8::try_from(c).ok())
        .map_or(ExitCode::FAILURE, ExitCode::from))
}
