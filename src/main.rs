use anyhow::Context;
use bms_point_converter::cli::{Args, ReportFormat, report, setup_logging};
use bms_point_converter::{ConsolePrompter, Converter};
use clap::Parser;
use std::process::ExitCode;
use tracing::warn;

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    setup_logging(args).context("Failed to initialize logging")?;

    if let Some(building) = &args.building {
        warn!(
            "--building '{}' is ignored; the building name is always entered at the prompt",
            building
        );
    }

    let converter = Converter::new(args.to_config()).context("Invalid configuration")?;

    let mut prompter = ConsolePrompter::stdio();
    let stats = match converter.run(&mut prompter) {
        Ok(stats) => stats,
        Err(e) if e.is_run_level() => {
            return Err(anyhow::Error::new(e).context("Conversion aborted"));
        }
        Err(e) => {
            return Err(anyhow::Error::new(e).context("Unexpected failure during conversion"));
        }
    };

    let mut stdout = std::io::stdout().lock();
    match args.report {
        ReportFormat::Human => report::write_human_report(&mut stdout, &stats)?,
        ReportFormat::Json => report::write_json_report(&mut stdout, &stats)?,
    }

    Ok(())
}
