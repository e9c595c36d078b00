use std::io;

use anyhow::{anyhow, Context};
use clap::Parser;
use log::{info, LevelFilter};

mod app;
mod cli;

use cli::{Args, CliError, Command};

fn main() {
    match trackdec() {
        Ok(()) => {}
        Err(cli_error) => cli_error.exit(),
    }
}

fn trackdec() -> Result<(), CliError> {
    // Parse options and start logging
    let args = Args::try_parse()?;
    log_setup(&args);

    // file setup: locks stdin in case we need it
    let stdin = io::stdin();
    let stdin_handle = stdin.lock();
    let stdout = io::BufWriter::new(io::stdout().lock());
    let diag: Box<dyn io::Write> = if args.quiet {
        Box::new(io::sink())
    } else {
        Box::new(io::stderr())
    };

    match &args.command {
        Command::DecodeTrack(decode) => {
            let input = file_setup(&decode.capture, stdin_handle)?;
            app::decode_track(decode, input, stdout)?;
        }
        Command::ExtractData(extract) => {
            let input = file_setup(&extract.digitized, stdin_handle)?;
            app::extract_data(extract, input, stdout, diag)?;
        }
        Command::Recover(recover) => {
            let input = file_setup(&recover.capture, stdin_handle)?;
            app::recover(recover, input, stdout, diag)?;
        }
    }

    Ok(())
}

fn log_setup(args: &Args) {
    if args.quiet {
        // no logging
        return;
    } else if std::env::var_os("RUST_LOG").is_none() {
        // parameter controls
        let log_filter = match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        pretty_env_logger::formatted_builder()
            .filter_module("trackrec", log_filter)
            .filter_module("trackdec", log_filter)
            .init();
    } else {
        // environment controls
        pretty_env_logger::init();
    }
}

fn file_setup<'stdin>(
    file: &str,
    stdin: std::io::StdinLock<'stdin>,
) -> Result<Box<dyn io::BufRead + 'stdin>, anyhow::Error> {
    if cli::is_stdin(file) {
        info!("reading standard input");
        if !is_terminal(&std::io::stdin()) {
            Ok(Box::new(io::BufReader::new(stdin)))
        } else {
            Err(anyhow!(
                "cowardly refusing to read a capture from a terminal.

Name a CSV file, or pipe one into this program."
            ))
        }
    } else {
        info!("reading file: \"{}\"", file);
        Ok(Box::new(io::BufReader::new(
            std::fs::File::open(file).with_context(|| format!("Unable to open \"{}\"", file))?,
        )))
    }
}

#[cfg(not(target_os = "windows"))]
fn is_terminal<S>(stream: &S) -> bool
where
    S: std::os::fd::AsRawFd,
{
    terminal_size::terminal_size_using_fd(stream.as_raw_fd()).is_some()
}

#[cfg(target_os = "windows")]
fn is_terminal<S>(stream: &S) -> bool
where
    S: std::os::windows::io::AsRawHandle,
{
    terminal_size::terminal_size_using_handle(stream.as_raw_handle()).is_some()
}
