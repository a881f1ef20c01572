//! gif-speed CLI - Change GIF playback speed by rewriting frame delays.

use gif_speed::prelude::*;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

/// Verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verbosity {
    Quiet,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    fn filter(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Info => "gif_speed=info",
            Verbosity::Debug => "gif_speed=debug",
            Verbosity::Trace => "gif_speed=trace",
        }
    }
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Help,
    Version,
    Convert(Options),
}

#[derive(Debug, Clone, PartialEq)]
struct Options {
    input: PathBuf,
    output: Option<PathBuf>,
    speed: String,
    ranges: Option<String>,
    json: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let (verbosity, command) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            eprintln!("Usage: gif-speed [options] <input.gif> <speed> [ranges]");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(verbosity);

    match command {
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("{}", version_string());
            ExitCode::SUCCESS
        }
        Command::Convert(opts) => match cmd_convert(&opts) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Failed to convert {}: {}", opts.input.display(), e);
                ExitCode::FAILURE
            }
        },
    }
}

/// Filter global flags first, then positionals.
fn parse_args(args: &[String]) -> std::result::Result<(Verbosity, Command), String> {
    let mut verbosity = Verbosity::Info;
    let mut output = None;
    let mut json = false;
    let mut positional: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => verbosity = Verbosity::Debug,
            "-vv" | "--trace" => verbosity = Verbosity::Trace,
            "-q" | "--quiet" => verbosity = Verbosity::Quiet,
            "-j" | "--json" => json = true,
            "-o" | "--output" => {
                let path = iter.next().ok_or("missing value for --output")?;
                output = Some(PathBuf::from(path));
            }
            "-h" | "--help" | "help" => return Ok((verbosity, Command::Help)),
            "-V" | "--version" => return Ok((verbosity, Command::Version)),
            s if s.starts_with('-') && s.len() > 1 && !looks_numeric(s) => {
                return Err(format!("unknown option: {}", s));
            }
            s => positional.push(s),
        }
    }

    if positional.is_empty() {
        return Ok((verbosity, Command::Help));
    }
    let (input, speed, ranges) = match positional.as_slice() {
        [input, speed] => (*input, *speed, None),
        [input, speed, ranges] => (*input, *speed, Some(ranges.to_string())),
        [_] => return Err("missing speed argument".to_string()),
        _ => return Err("too many arguments".to_string()),
    };

    Ok((
        verbosity,
        Command::Convert(Options {
            input: PathBuf::from(input),
            output,
            speed: speed.to_string(),
            ranges,
            json,
        }),
    ))
}

/// Negative numbers reach the speed parser so it can report them.
fn looks_numeric(s: &str) -> bool {
    s[1..].starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

/// RUST_LOG wins over the verbosity flags.
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_convert(opts: &Options) -> Result<()> {
    let plan = parse_plan(&opts.speed, opts.ranges.as_deref())?;
    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&opts.input));

    tracing::debug!(
        default = %plan.default_speed(),
        overrides = plan.directives().len(),
        "speed plan"
    );

    let report = convert_file(&opts.input, &output, &plan)?;

    for frame in &report.frames {
        tracing::info!("#{}: {} -> {}", frame.index, frame.original, frame.replacement);
    }

    if opts.json {
        println!("{}", report_json(&opts.input, &output, &report));
    } else {
        let (before, after) = report.total_hundredths();
        tracing::info!(
            "{} frames ({} changed), {:.2}s -> {:.2}s",
            report.frame_count(),
            report.changed_frames(),
            before as f64 / 100.0,
            after as f64 / 100.0
        );
        println!("Wrote modified GIF to {}", output.display());
    }
    Ok(())
}

fn report_json(input: &std::path::Path, output: &std::path::Path, report: &ConversionReport) -> String {
    let frames: Vec<serde_json::Value> = report
        .frames
        .iter()
        .map(|f| {
            serde_json::json!({
                "index": f.index,
                "original": f.original.hundredths(),
                "replacement": f.replacement.hundredths(),
            })
        })
        .collect();
    let (before, after) = report.total_hundredths();
    serde_json::to_string_pretty(&serde_json::json!({
        "input": input.display().to_string(),
        "output": output.display().to_string(),
        "width": report.width,
        "height": report.height,
        "xmp_skipped": report.xmp_skipped,
        "total_before": before,
        "total_after": after,
        "bytes": report.bytes_written,
        "frames": frames,
    }))
    .unwrap_or_default()
}

fn version_string() -> String {
    let date = option_env!("GIF_SPEED_BUILD_DATE").unwrap_or("unknown");
    let time = option_env!("GIF_SPEED_BUILD_TIME").unwrap_or("unknown");
    format!("gif-speed {} (built {} {})", env!("CARGO_PKG_VERSION"), date, time)
}

fn print_help() {
    println!("gif-speed - Change GIF playback speed");
    println!();
    println!("Usage: gif-speed [options] <input.gif> <speed> [ranges]");
    println!();
    println!("Arguments:");
    println!("  <speed>    Nx divides every delay by N (2x = twice as fast),");
    println!("             a bare number sets the delay in seconds (0.04)");
    println!("  [ranges]   Per-frame overrides, first match wins: 1-3:2x,7:0.1");
    println!();
    println!("Options:");
    println!("  -o, --output <path>  Output file (default: <input>-speed.gif)");
    println!("  -j, --json           Print the conversion report as JSON");
    println!("  -v, --verbose        Debug output");
    println!("  -vv, --trace         Trace output (per-frame details)");
    println!("  -q, --quiet          Only warnings and errors");
    println!("  -V, --version        Show version");
    println!("  -h, --help           Show this help");
    println!();
    println!("RUST_LOG overrides the log filter.");
}
