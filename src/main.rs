//! Command-line runner for the cache-effects micro-benchmarks.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use tilebench::clock::MonotonicClock;
use tilebench::stride::{run_stride_command, StrideConfig};
use tilebench::sweep::{run_matmul_command, run_orderings_command, OrderingConfig, SweepConfig};
use tilebench::{DEFAULT_DIM, DEFAULT_MAX_STRIDE, DEFAULT_SEED, DEFAULT_STRIDE_TOUCHES};

#[derive(Parser)]
#[command(about = "Micro-benchmarks demonstrating CPU cache effects", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Blocked matrix multiplication sweep across candidate block sizes
    Matmul {
        #[arg(long, default_value_t = DEFAULT_DIM, help = "Square matrix dimension")]
        dim: usize,
        #[arg(
            long,
            value_delimiter = ',',
            default_value = "8,16,32,64,128,256",
            help = "Comma-separated candidate block sizes"
        )]
        block_sizes: Vec<usize>,
        #[arg(long, default_value_t = DEFAULT_SEED, help = "Seed for the input matrices")]
        seed: u64,
        #[arg(
            long,
            default_value = "blocked_matmul_results.txt",
            help = "Report artifact path (overwritten)"
        )]
        output: PathBuf,
    },
    /// Compare the i-j-k and i-k-j multiplication loop orderings
    Orderings {
        #[arg(long, default_value_t = DEFAULT_DIM, help = "Rows of the left matrix")]
        a_rows: usize,
        #[arg(long, default_value_t = DEFAULT_DIM, help = "Columns of the left matrix")]
        a_cols: usize,
        #[arg(long, default_value_t = DEFAULT_DIM, help = "Rows of the right matrix")]
        b_rows: usize,
        #[arg(long, default_value_t = DEFAULT_DIM, help = "Columns of the right matrix")]
        b_cols: usize,
        #[arg(long, default_value_t = DEFAULT_SEED, help = "Seed for the input matrices")]
        seed: u64,
        #[arg(
            long,
            default_value = "loop_ordering_results.txt",
            help = "Report artifact path (overwritten)"
        )]
        output: PathBuf,
    },
    /// Strided-access bandwidth probe
    Stride {
        #[arg(
            long,
            default_value_t = DEFAULT_STRIDE_TOUCHES,
            help = "Elements touched per pass"
        )]
        touches: usize,
        #[arg(long, default_value_t = DEFAULT_MAX_STRIDE, help = "Largest stride to probe")]
        max_stride: usize,
        #[arg(long, help = "Optional report artifact path (overwritten)")]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> tilebench::Result<()> {
    let clock = MonotonicClock::new();
    let stdout = io::stdout();
    let mut console = stdout.lock();

    match cli.command {
        Command::Matmul {
            dim,
            block_sizes,
            seed,
            output,
        } => {
            let config = SweepConfig {
                dim,
                block_sizes,
                seed,
            };
            run_matmul_command(&config, &output, &clock, &mut console)?;
            println!("\nResults saved to {}", output.display());
        }
        Command::Orderings {
            a_rows,
            a_cols,
            b_rows,
            b_cols,
            seed,
            output,
        } => {
            let config = OrderingConfig {
                a_rows,
                a_cols,
                b_rows,
                b_cols,
                seed,
            };
            run_orderings_command(&config, &output, &clock, &mut console)?;
            println!("\nResults saved to {}", output.display());
        }
        Command::Stride {
            touches,
            max_stride,
            output,
        } => {
            let config = StrideConfig {
                touches,
                max_stride,
            };
            run_stride_command(&config, output.as_deref(), &clock, &mut console)?;
            if let Some(path) = output {
                println!("\nResults saved to {}", path.display());
            }
        }
    }

    Ok(())
}
