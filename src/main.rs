use std::path::PathBuf;

use eyre::Result;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use piweb_drawing::dump_helper;

#[derive(StructOpt)]
enum Options {
    /// Write a drawing file as s-expressions
    Dump {
        #[structopt(short)]
        output: Option<PathBuf>,

        input: PathBuf,
    },
    /// Record a JSON script into a drawing file
    Encode {
        #[structopt(short)]
        output: Option<PathBuf>,

        input: PathBuf,
    },
    /// Print the bounds of a drawing file
    Measure { input: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Options::from_args() {
        Options::Dump { output, input } => dump_helper::dump(input, output)?,
        Options::Encode { output, input } => dump_helper::encode(input, output)?,
        Options::Measure { input } => {
            let bounds = dump_helper::measure_file(input)?;
            println!("{} {} {} {}", bounds.x0, bounds.y0, bounds.width(), bounds.height());
        }
    }

    Ok(())
}
