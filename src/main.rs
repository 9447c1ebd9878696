//! Peclet Params - parameter file checker
//!
//! Validates a parameter file, writes the echo of every resolved value and
//! prints the bound records.
//!
//! # Usage
//!
//! ```bash
//! peclet-params input.prm --echo used_parameters.prm
//! RUST_LOG=debug peclet-params input.prm
//! ```

use std::io;
use std::path::PathBuf;

use clap::Parser;
use peclet_params::{
    error::Result, read_meta_parameters, write_defaults, ParameterLoader, ECHO_FILE_NAME,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Convection-diffusion parameter file checker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the parameter file (.prm); defaults are used when omitted
    #[arg(value_name = "PARAMETER_FILE")]
    parameter_file: Option<PathBuf>,

    /// Where to write the echo of the resolved parameters
    #[arg(short, long, value_name = "PATH", default_value = ECHO_FILE_NAME)]
    echo: PathBuf,

    /// Print the all-defaults parameter file for the file's dimension to stdout
    #[arg(long)]
    print_defaults: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let input = args.parameter_file.as_deref();
    let meta = read_meta_parameters(input)?;
    info!(dim = meta.dim, "read meta parameters");

    if args.print_defaults {
        return write_defaults(meta.dim, io::stdout().lock());
    }

    let mut loader = ParameterLoader::new(meta.dim).echo_to(&args.echo);
    if let Some(path) = input {
        loader = loader.input(path);
    }

    let params = loader.read()?;
    println!("{:#?}", params.structured);
    println!("{:#?}", params.functions);

    Ok(())
}
