use clap::Parser;
use pic2data::{ExtractConfig, FourierConfig};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pic2data", about = "Hand-drawn chart image to numeric function samples")]
struct Cli {
    /// Input image path (PNG, JPEG, BMP)
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV path (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of Fourier harmonics; adds a reconstruction column
    #[arg(short = 'n', long)]
    harmonics: Option<usize>,

    /// Pad the ends before the Fourier transform to reduce edge ringing
    #[arg(long, requires = "harmonics")]
    suppress_gibbs: bool,

    /// Emit this many evenly spaced points of the Fourier series instead
    /// of the raw samples
    #[arg(long, requires = "harmonics")]
    resample: Option<usize>,

    /// Per-channel colour tolerance (0-255)
    #[arg(long, default_value = "60")]
    tolerance: u8,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = ExtractConfig {
        color_tolerance: cli.tolerance,
        ..ExtractConfig::default()
    };

    log::info!("pic2data · {}", cli.input.display());
    let img = pic2data::load_image(&cli.input)?;

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match cli.harmonics {
        None => {
            let extraction = pic2data::extract(&img, &config)?;
            writeln!(out, "x,y")?;
            for s in &extraction.samples {
                writeln!(out, "{},{}", s.x, s.y)?;
            }
        }
        Some(harmonics) => {
            let fourier = FourierConfig {
                harmonics,
                suppress_gibbs: cli.suppress_gibbs,
            };
            let (extraction, spectrum) = pic2data::extract_with_fourier(&img, &config, &fourier)?;
            if let Some(count) = cli.resample {
                writeln!(out, "x,fourier")?;
                for s in spectrum.resample(count) {
                    writeln!(out, "{},{}", s.x, s.y)?;
                }
            } else {
                // Uneven input is reported on the resampled uniform grid.
                writeln!(out, "x,y,fourier")?;
                for (s, r) in extraction.samples.iter().zip(&spectrum.reconstruction) {
                    if s.x == r.x {
                        writeln!(out, "{},{},{}", r.x, s.y, r.y)?;
                    } else {
                        writeln!(out, "{},,{}", r.x, r.y)?;
                    }
                }
            }
        }
    }
    out.flush()?;

    if let Some(path) = &cli.output {
        log::info!("✓ {}", path.display());
    }
    Ok(())
}
