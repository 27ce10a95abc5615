use std::num::ParseIntError;

use clap::{Parser, ValueEnum};
use log::{debug, error};
use thiserror::Error;

use simple_adpcm::AdpcmState;

/// Encodes or decodes values given on the command line
#[derive(Parser)]
#[command(name = "codec-tester")]
#[command(about = "Encode or decode IMA ADPCM and A-law values", long_about = None)]
struct Args {
    command: Command,

    format: Format,

    /// Samples (encode) or encoded bytes (decode), decimal
    #[arg(allow_negative_numbers = true)]
    values: Vec<String>,

    /// Initial ADPCM predicted sample
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    predictor: i16,

    /// Initial ADPCM step index (0-88)
    #[arg(long, default_value = "0")]
    step_index: u8,

    /// Number of samples to keep when decoding ADPCM (drops the padding sample)
    #[arg(long)]
    samples: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Command {
    Encode,
    Decode,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Adpcm,
    Alaw,
}

#[derive(Debug, Error)]
enum TesterError {
    #[error("bad value '{value}': {source}")]
    BadValue {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid initial state: {0}")]
    State(#[from] simple_adpcm::Error),
}

fn parse_values<T>(values: &[String]) -> Result<Vec<T>, TesterError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    values
        .iter()
        .map(|v| {
            v.parse::<T>().map_err(|source| TesterError::BadValue {
                value: v.clone(),
                source,
            })
        })
        .collect()
}

fn run(args: &Args) -> Result<Vec<String>, TesterError> {
    let mut state = AdpcmState::from_parts(args.predictor, args.step_index)?;
    let output = match (args.command, args.format) {
        (Command::Encode, Format::Adpcm) => {
            let samples = parse_values::<i16>(&args.values)?;
            let encoded = simple_adpcm::encode_adpcm_ima(&samples, &mut state);
            debug!("final state: {:?}", state);
            encoded.iter().map(|b| b.to_string()).collect()
        }
        (Command::Decode, Format::Adpcm) => {
            let bytes = parse_values::<u8>(&args.values)?;
            let mut decoded = simple_adpcm::decode_adpcm_ima(&bytes, &mut state);
            if let Some(count) = args.samples {
                decoded.truncate(count);
            }
            debug!("final state: {:?}", state);
            decoded.iter().map(|s| s.to_string()).collect()
        }
        (Command::Encode, Format::Alaw) => {
            let samples = parse_values::<i16>(&args.values)?;
            simple_adpcm::encode_alaw_buf(&samples)
                .iter()
                .map(|b| b.to_string())
                .collect()
        }
        (Command::Decode, Format::Alaw) => {
            let bytes = parse_values::<u8>(&args.values)?;
            simple_adpcm::decode_alaw_buf(&bytes)
                .iter()
                .map(|s| s.to_string())
                .collect()
        }
    };
    Ok(output)
}

fn main() -> Result<(), TesterError> {
    // default level INFO, RUST_LOG overrides it
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    debug!("{} values", args.values.len());

    match run(&args) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e)
        }
    }
}
