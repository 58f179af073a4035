//! showflows - parse captured appliance "show flows" output into JSON.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use showflows::{Dialect, OutputSection, ShowflowsConfig, parse_report_with_config, render_json};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "showflows",
    about = "Parse appliance \"show flows\" reports",
    long_about = "Reads the captured output of the appliance's flow report command and\n\
                  prints the active-flow table and flow-state counters as JSON.",
    version,
    propagate_version = true
)]
struct Cli {
    /// YAML configuration file (parser and logging settings)
    #[arg(long, global = true, value_name = "YAML")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a report and print it as JSON
    Parse(ParseArgs),

    /// Print the dialect detected for a report
    Dialect(DialectArgs),
}

#[derive(Args)]
struct ParseArgs {
    /// Report file; stdin when omitted or `-`
    file: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Part of the report to print
    #[arg(long, value_enum, default_value_t = OutputSection::All)]
    section: OutputSection,
}

#[derive(Args)]
struct DialectArgs {
    /// Report file; stdin when omitted or `-`
    file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    };
    init_tracing(&config);

    if let Err(e) = run(cli.command, &config) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<ShowflowsConfig> {
    match path {
        Some(path) => ShowflowsConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ShowflowsConfig::default()),
    }
}

fn init_tracing(config: &ShowflowsConfig) {
    let filter = EnvFilter::try_new(config.log_filter()).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);

    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(command: Commands, config: &ShowflowsConfig) -> Result<()> {
    match command {
        Commands::Parse(args) => {
            let text = read_input(args.file.as_deref())?;
            let report = parse_report_with_config(&text, &config.parser_config())
                .with_context(|| format!("parsing {}", input_name(args.file.as_deref())))?;
            let json = render_json(&report, args.section, args.pretty)
                .context("serializing report")?;
            write_line(&json)
        }
        Commands::Dialect(args) => {
            let text = read_input(args.file.as_deref())?;
            let dialect = Dialect::detect(&text)
                .with_context(|| format!("detecting dialect of {}", input_name(args.file.as_deref())))?;
            write_line(dialect.name())
        }
    }
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}

fn input_name(file: Option<&Path>) -> String {
    match file {
        Some(path) if path != Path::new("-") => path.display().to_string(),
        _ => "stdin".to_string(),
    }
}

fn write_line(text: &str) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{text}").context("writing output")?;
    Ok(())
}
