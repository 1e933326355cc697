use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use covtrace::logging::{LogFormat, init_logging};
use covtrace::{CoverageConfig, CoverageError, CoverageRecorder, load_entries};
use tracing::info;

#[derive(Debug, Default)]
struct CliConfig {
    entries_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    subject: Option<String>,
    output_dir: Option<PathBuf>,
    print_summary: bool,
    log_format: LogFormat,
    verbose: bool,
}

fn print_help() {
    let help = "\
coverage_report: replay recorded coverage entries into subject and requirement reports

USAGE:
    coverage_report --entries <PATH> [OPTIONS]

OPTIONS:
    --entries <PATH>      JSON-lines file, one {\"test\",\"scenario\",\"requirements\"} object per line
    --config <PATH>       TOML config (subject, output_dir, clean_on_start)
    --subject <NAME>      Report subject (overrides config and COVTRACE_SUBJECT)
    --output-dir <PATH>   Report directory (overrides config and COVTRACE_OUTPUT_DIR)
    --summary             Print the run summary as JSON on stdout
    --log-format <FMT>    compact | json (default: compact)
    -v, --verbose         Log at trace level unless RUST_LOG is set
    -h, --help            Show this help
";
    println!("{help}");
}

fn take_value(args: &[String], index: &mut usize, flag: &str) -> Result<String, String> {
    *index += 1;
    args.get(*index)
        .cloned()
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_args(args: &[String]) -> Result<CliConfig, String> {
    let mut cli = CliConfig::default();

    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--entries" => {
                cli.entries_path = Some(PathBuf::from(take_value(args, &mut index, "--entries")?));
            }
            "--config" => {
                cli.config_path = Some(PathBuf::from(take_value(args, &mut index, "--config")?));
            }
            "--subject" => {
                cli.subject = Some(take_value(args, &mut index, "--subject")?);
            }
            "--output-dir" => {
                cli.output_dir = Some(PathBuf::from(take_value(
                    args,
                    &mut index,
                    "--output-dir",
                )?));
            }
            "--log-format" => {
                let value = take_value(args, &mut index, "--log-format")?;
                cli.log_format = LogFormat::parse(&value)
                    .ok_or_else(|| format!("unknown log format: {value}"))?;
            }
            "--summary" => cli.print_summary = true,
            "-v" | "--verbose" => cli.verbose = true,
            "-h" | "--help" => {
                print_help();
                return Err(String::new());
            }
            unknown => {
                return Err(format!("unknown option: {unknown}"));
            }
        }
        index += 1;
    }

    if cli.entries_path.is_none() {
        return Err("--entries is required".to_owned());
    }
    Ok(cli)
}

fn resolve_config(cli: &CliConfig) -> Result<CoverageConfig, CoverageError> {
    let mut config = match &cli.config_path {
        Some(path) => CoverageConfig::load(path)?,
        None => CoverageConfig::default(),
    };
    config.apply_env_overrides()?;
    if let Some(subject) = &cli.subject {
        config.subject.clone_from(subject);
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output_dir.clone_from(output_dir);
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &CliConfig) -> Result<(), CoverageError> {
    let config = resolve_config(cli)?;
    let mut recorder = CoverageRecorder::new(config)?;

    let entries = match &cli.entries_path {
        Some(path) => load_entries(path)?,
        None => Vec::new(),
    };
    let stats = recorder.replay(&entries);
    let written = recorder.write()?;
    info!(
        accepted = stats.accepted,
        dropped = stats.dropped,
        subject_report = %written.subject_report.display(),
        "coverage_report finished"
    );

    if cli.print_summary {
        let payload = serde_json::json!({
            "replay": stats,
            "reports": written,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(error) if error.is_empty() => return ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("ERROR coverage_report: {error}");
            return ExitCode::from(2);
        }
    };

    if let Err(error) = init_logging(cli.log_format, cli.verbose) {
        eprintln!("WARN coverage_report: {error}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("ERROR coverage_report failed: {error}");
            ExitCode::from(u8::try_from(error.exit_code()).unwrap_or(2))
        }
    }
}
