//! kmdiff: difference between two sorted k-mer matrices
//!
//! Usage: kmdiff [OPTIONS] <MATRIX_1> <MATRIX_2>

use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use kmdiff::config::{DiffConfig, KmerSize, DEFAULT_KMER_SIZE};
use kmdiff::matrix::{is_stdin, open_input, MatrixError};
use kmdiff::order::KmerOrder;
use kmdiff::streaming::create_output;
use kmdiff::StreamingDiffCommand;

#[derive(Parser)]
#[command(name = "kmdiff")]
#[command(author = "Manish Kumar Bobbili")]
#[command(version)]
#[command(about = "Difference between two sorted k-mer matrices", long_about = None)]
#[command(after_help = "Removes from <MATRIX_1> the k-mers in <MATRIX_2>.")]
struct Cli {
    /// Matrix to remove k-mers from (use - for stdin)
    matrix_1: PathBuf,

    /// Matrix of k-mers to remove (use - for stdin)
    matrix_2: PathBuf,

    /// Size of k-mers of input matrices
    #[arg(short = 'k', long = "kmer-size", default_value_t = DEFAULT_KMER_SIZE, value_parser = parse_kmer_size)]
    kmer_size: usize,

    /// Write output matrix to FILE [default: stdout]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Use kmtricks order of nucleotides: A<C<T<G
    #[arg(short = 'z', long)]
    kmtricks_order: bool,

    /// Write a blank line for every shared or B-only k-mer, like km_diff
    #[arg(long)]
    legacy_blank_lines: bool,

    /// Fail if a matrix is not sorted (checks adjacent k-mers)
    #[arg(long)]
    check_sorted: bool,

    /// Print run statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Only report warnings and errors on stderr
    #[arg(short, long)]
    quiet: bool,
}

fn parse_kmer_size(s: &str) -> Result<usize, String> {
    let k: i64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if k <= 0 {
        return Err(format!("Invalid value of k: {k}"));
    }
    usize::try_from(k).map_err(|_| format!("Invalid value of k: {k}"))
}

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    if let Err(e) = run_diff(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_diff(cli: Cli) -> Result<(), MatrixError> {
    let ksize = KmerSize::new(cli.kmer_size)?;

    if is_stdin(&cli.matrix_1) && is_stdin(&cli.matrix_2) {
        return Err(MatrixError::StdinTwice);
    }

    // Open everything before the first line is written
    let a = open_input(&cli.matrix_1)?;
    let b = open_input(&cli.matrix_2)?;

    let config = DiffConfig::new(ksize)
        .with_order(KmerOrder::from_kmtricks_flag(cli.kmtricks_order))
        .with_legacy_blank_lines(cli.legacy_blank_lines)
        .with_check_sorted(cli.check_sorted);
    let cmd = StreamingDiffCommand::new(config);

    let stats = match cli.output {
        Some(path) => {
            let mut file = create_output(&path)?;
            cmd.run_readers(a, b, &mut file)?
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            cmd.run_readers(a, b, &mut handle)?
        }
    };

    if cli.stats {
        eprintln!("Streaming diff stats: {}", stats);
    }

    Ok(())
}
