mod cue;
mod error;
mod parser;
mod serialiser;
mod session;
mod store;
mod timestamp;
mod track;

use crate::session::Session;

use std::io::{self, BufRead, BufReader, Write};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;

fn main() {
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Write WebVTT captions for a video, one command at a time")]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to read commands from. If not supplied, commands will be read from standard input.",
        default_value = "-"
    )]
    input: String,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to write responses to. If not supplied, responses will be written to standard output.",
        default_value = "-"
    )]
    output: String,
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        help = "Length of the video being captioned. Times past the end are accepted with a warning."
    )]
    duration: Option<f64>,
    #[arg(short, long, help = "Log every change made to the cues.")]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input: Box<dyn BufRead> = if cli.input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = std::fs::File::open(&cli.input)
            .context(format!("Failed to open input file: '{}'", cli.input))?;
        Box::new(BufReader::new(file))
    };

    let output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        let file = std::fs::File::create(&cli.output)
            .context(format!("Failed to create output file: '{}'", cli.output))?;
        Box::new(file)
    };

    let mut session = Session::new(output);
    if let Some(secs) = cli.duration {
        session = session
            .with_duration(secs)
            .context("Invalid video duration")?;
    }
    session.run(input)
}
