//! Benchmark driver: generate data, truncate, zlib, report.
use anyhow::Result;
use clap::{Parser, ValueEnum};
use mantissa_trunc::benchmark::{sweep_bits, sweep_levels, verify_round_trip, Benchmark};
use mantissa_trunc::compressor::{TruncatingCompressor, ZlibCompressor};
use mantissa_trunc::datagen::{add_noise, generate, n_floats_for_megabytes, DataSource};
use mantissa_trunc::precision::bits_for_precision;
use mantissa_trunc::Truncation;
use tracing::info;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Data {
    Uniform,
    Gaussian,
    Sine,
    Polynomial,
}

#[derive(clap::Parser, Debug)]
#[command(about = "Compare zlib compression of f32 data with and without mantissa truncation")]
struct Cli {
    /// Kind of synthetic data
    #[arg(long, value_enum, default_value_t = Data::Uniform)]
    data: Data,

    /// Amount of data in MB (1 MB = 10^6 bytes)
    #[arg(long, default_value_t = 10.0)]
    size_mb: f64,

    /// Lower bound for uniform data
    #[arg(long, default_value_t = 0.0)]
    min: f32,

    /// Upper bound for uniform data
    #[arg(long, default_value_t = 100.0)]
    max: f32,

    /// Mean of gaussian data
    #[arg(long, default_value_t = 0.0)]
    mean: f32,

    /// Standard deviation of gaussian data
    #[arg(long, default_value_t = 1.0)]
    stddev: f32,

    /// First x of sine / polynomial data
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    xmin: f64,

    /// Last x of sine / polynomial data
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    xmax: f64,

    /// Standard deviation of gaussian noise added on top of the data
    #[arg(long, default_value_t = 0.0)]
    noise: f32,

    /// Seed for the data generator
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Mantissa bits to drop (0..=23). Takes precedence over --precision
    #[arg(long, allow_negative_numbers = true)]
    bits: Option<i32>,

    /// Decimal digits to keep (1..=7)
    #[arg(long, default_value_t = 3)]
    precision: i32,

    /// zlib compression level (0..=9)
    #[arg(long, default_value_t = 9)]
    level: i32,

    /// Zero the dropped bits without rounding
    #[arg(long)]
    no_round: bool,

    /// Number of timed compress/decompress repetitions
    #[arg(long, default_value_t = 5)]
    iterations: u32,

    /// Sweep zlib levels 1..=9 instead of using --level
    #[arg(long, conflicts_with = "sweep_bits")]
    sweep: bool,

    /// Sweep dropped bits 0..=23 at --level instead of using --bits / --precision
    #[arg(long)]
    sweep_bits: bool,
}

impl Cli {
    fn source(&self) -> DataSource {
        match self.data {
            Data::Uniform => DataSource::Uniform { min: self.min, max: self.max },
            Data::Gaussian => DataSource::Gaussian { mean: self.mean, stddev: self.stddev },
            Data::Sine => DataSource::Sine { xmin: self.xmin, xmax: self.xmax },
            Data::Polynomial => DataSource::Polynomial { xmin: self.xmin, xmax: self.xmax },
        }
    }

    fn bits(&self) -> Result<i32> {
        match self.bits {
            Some(b) => Ok(b),
            None => Ok(bits_for_precision(self.precision)? as i32),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("mantissa_trunc=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let bits = cli.bits()?;
    let round = !cli.no_round;
    let n = n_floats_for_megabytes(cli.size_mb);
    let mut data = generate(cli.source(), n, cli.seed)?;
    // separate stream so the noise doesn't repeat the random data
    add_noise(&mut data, cli.noise, cli.seed.wrapping_add(1))?;
    info!(n_floats = n, bits, round, noise = cli.noise, "generated {:?} data", cli.data);

    let reports = if cli.sweep {
        sweep_levels(&data, bits, round, 1..=9, cli.iterations)?
    } else if cli.sweep_bits {
        sweep_bits(&data, 0..=23, cli.level, round, cli.iterations)?
    } else {
        let bench = Benchmark::new(format!("{:?}", cli.data).to_lowercase(), cli.iterations)?;
        let baseline = bench.run(&ZlibCompressor::new(cli.level)?, &data)?;
        let truncated = bench.run(&TruncatingCompressor::zlib(bits, cli.level, round)?, &data)?;
        vec![baseline, truncated]
    };
    for r in &reports {
        println!("{r}");
    }

    let compressor = TruncatingCompressor::zlib(bits, cli.level, round)?;
    let ok = verify_round_trip(&compressor, &data, Truncation::new(bits, round)?)?;
    println!("round trip matches truncated data: {ok}");
    Ok(())
}
