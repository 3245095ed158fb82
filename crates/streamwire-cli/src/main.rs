//! `streamwire` binary.

use std::{
    error::Error,
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{ArgAction, Args, Parser, Subcommand};
use streamwire_cli::{Assignment, CliError, Field, codec_for, run_decode, run_encode};
use streamwire_codec::{ByteOrder, TextEncoding};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "streamwire", version, about = "Decode and encode streamwire frames")]
struct Cli {
    /// Log codec activity to stderr (repeat for more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args, Debug)]
struct CodecArgs {
    /// Byte order for every field: big, little or native
    #[arg(long, default_value = "native")]
    order: ByteOrder,

    /// Text encoding (default: UTF-16 in the chosen byte order)
    #[arg(long)]
    encoding: Option<TextEncoding>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Decode a frame and print `name: value` per field
    Decode {
        /// Comma-separated fields, e.g. `u32,short-text,fixed-text:8`
        #[arg(long, value_delimiter = ',', required = true)]
        layout: Vec<Field>,

        #[command(flatten)]
        codec: CodecArgs,

        /// Input file (default: stdin)
        file: Option<PathBuf>,
    },
    /// Encode `kind=value` assignments into a frame
    Encode {
        /// Field assignment, repeatable. Blob values are hex.
        #[arg(long = "field", required = true)]
        fields: Vec<Assignment>,

        #[command(flatten)]
        codec: CodecArgs,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn run(cmd: Cmd) -> Result<(), CliError> {
    match cmd {
        Cmd::Decode { layout, codec, file } => {
            let codec = codec_for(codec.order, codec.encoding);
            let mut source: Box<dyn Read> = match &file {
                Some(path) => Box::new(BufReader::new(File::open(path)?)),
                None => Box::new(io::stdin().lock()),
            };
            let mut out = io::stdout().lock();
            run_decode(&codec, &mut source, &layout, &mut out)?;
            out.flush()?;
        },
        Cmd::Encode { fields, codec, output } => {
            let codec = codec_for(codec.order, codec.encoding);
            let mut sink = BufWriter::new(File::create(&output)?);
            run_encode(&codec, &fields, &mut sink)?;
            info!(path = %output.display(), fields = fields.len(), "frame written");
        },
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.cmd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut stderr = io::stderr().lock();
            let _ = write!(stderr, "error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                let _ = write!(stderr, ": {cause}");
                source = cause.source();
            }
            let _ = writeln!(stderr);
            ExitCode::FAILURE
        },
    }
}
