//! A CLI tool for inspecting the contents of files
//! by printing their data sets in a human readable format.
use clap::Parser;
use dcmtree_dump::{ColorMode, DumpOptions};
use dcmtree_object::open_file;
use snafu::{Report, ResultExt, Whatever};
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Exit code for when a file could not be read cleanly or printed.
const ERROR_FILE: i32 = 1;

/// Dump the contents of data set files
#[derive(Debug, Parser)]
#[command(version)]
struct App {
    /// The file(s) to read
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Do not print the file meta group
    #[arg(long = "no-meta")]
    no_meta: bool,
    /// The width of the display
    /// (default is to check automatically)
    #[arg(short = 'w', long = "width")]
    width: Option<u32>,
    /// The maximum number of characters printed per value
    #[arg(long = "max-value-len", default_value_t = 64)]
    max_value_len: usize,
    /// Print all values to the end
    #[arg(long = "no-limit")]
    no_limit: bool,
    /// The color mode
    #[arg(long = "color", default_value = "auto")]
    color: ColorMode,
    /// Print debug messages while reading
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() {
    let app = App::parse();

    let level = if app.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(level)
            .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
            .with_writer(std::io::stderr)
            .finish(),
    )
    .whatever_context("Could not set up global logging subscriber")
    .unwrap_or_else(|e: Whatever| {
        eprintln!("[ERROR] {}", Report::from_error(e));
    });

    std::process::exit(run(app));
}

fn run(app: App) -> i32 {
    let App {
        files: filenames,
        no_meta,
        width,
        max_value_len,
        no_limit,
        color,
        verbose: _,
    } = app;

    let mut options = DumpOptions::new();
    options
        .meta(!no_meta)
        .max_value_len(if no_limit { None } else { Some(max_value_len) })
        .color_mode(color);
    if let Some(width) = width {
        options.width(width);
    }

    let mut status = 0;
    for filename in &filenames {
        println!("{}: ", filename.display());
        match open_file(filename) {
            Err(e) => {
                eprintln!("[ERROR] {}", Report::from_error(e));
                status = ERROR_FILE;
            }
            Ok(obj) => {
                if let Err(e) = options.dump_file(&obj) {
                    if e.kind() == ErrorKind::BrokenPipe {
                        // nobody is reading anymore
                        return status;
                    }
                    eprintln!("[ERROR] {}", Report::from_error(e));
                    status = ERROR_FILE;
                }
                if !obj.is_complete() {
                    warn!(
                        "{}: {} problem(s) found while reading",
                        filename.display(),
                        obj.diagnostic_count()
                    );
                    status = ERROR_FILE;
                }
            }
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use crate::App;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        App::command().debug_assert();
    }
}
