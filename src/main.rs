use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use xslmap::{AppError, Generator, OutputFormat, ProjectConfig, validate, validate_format};
use xslmap_xslt::validator::check_format;

#[derive(Parser, Debug)]
#[clap(version, about)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a stylesheet from a project file.
    Generate {
        project: PathBuf,
        /// xml, json, flat or csv; overrides the project file.
        #[clap(short, long)]
        format: Option<String>,
        /// Column delimiter for flat output; overrides the project file.
        #[clap(short, long)]
        delimiter: Option<String>,
        /// Write the stylesheet here instead of stdout.
        #[clap(short, long)]
        output: Option<PathBuf>,
        /// Skip the structural check of the generated stylesheet.
        #[clap(long)]
        no_validate: bool,
    },
    /// Check that a file is a well-formed stylesheet.
    Validate {
        stylesheet: PathBuf,
        /// Also apply the rules of this output format.
        #[clap(short, long)]
        format: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<ExitCode, AppError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Generate {
            project,
            format,
            delimiter,
            output,
            no_validate,
        } => {
            let config = ProjectConfig::load(&project)?;
            let format = config.format(format.as_deref())?;
            let generator = Generator::new(config.options(delimiter.as_deref()));
            let report = generator.generate_report(format, &config.mapping_set)?;
            if report.skipped > 0 {
                log::warn!("{} mapping(s) skipped as malformed", report.skipped);
            }
            if !no_validate {
                check_format(format, &report.stylesheet)?;
            }

            match output {
                Some(path) => {
                    fs::write(&path, &report.stylesheet)?;
                    log::info!("Wrote {} stylesheet to {}", format, path.display());
                }
                None => io::stdout().write_all(report.stylesheet.as_bytes())?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { stylesheet, format } => {
            let text = fs::read_to_string(&stylesheet)?;
            let report = match format {
                Some(name) => validate_format(name.parse::<OutputFormat>()?, &text),
                None => validate(&text),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(if report.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
