use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use wikisearch::config::{ConvertOptions, OUTPUT_BUFFER_CAPACITY};
use wikisearch::sink::OutputFormat;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "wikisearch")]
#[command(about = "Convert Wikipedia dumps into search-engine bulk-load formats")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a dump into a Groonga load script, CSV, or SQL
    Convert(ConvertArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// Path to the Wikipedia dump (.xml or .xml.bz2), or - for stdin
    #[arg(short, long)]
    input: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Groonga)]
    format: OutputFormat,

    /// Stop after this many accepted pages (negative = unlimited)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    max_records: i64,

    /// Truncate page text to this many characters (negative = unlimited)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    max_characters: i64,

    /// Emit a single multi-row INSERT (sql format only)
    #[arg(long)]
    bulk: bool,

    /// Show a progress spinner on stderr
    #[arg(long)]
    progress: bool,
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let input = wikisearch::parser::open_dump(&args.input)?;

    let out: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(BufWriter::with_capacity(OUTPUT_BUFFER_CAPACITY, file))
        }
        None => Box::new(BufWriter::with_capacity(
            OUTPUT_BUFFER_CAPACITY,
            io::stdout().lock(),
        )),
    };

    let options = ConvertOptions {
        show_progress: args.progress,
        ..ConvertOptions::from_limits(args.max_records, args.max_characters)
    };

    let start = Instant::now();
    let stats =
        wikisearch::convert::convert_to(input, out, args.format, args.bulk, &options)?;
    let duration = start.elapsed();
    info!(duration_secs = duration.as_secs_f64(), "Conversion complete");

    eprintln!();
    eprintln!("=== Summary ===");
    eprintln!("Conversion time:    {:.2}s", duration.as_secs_f64());
    eprintln!("Pages seen:         {}", stats.pages_seen);
    eprintln!("Pages written:      {}", stats.pages_accepted);
    eprintln!("Redirects skipped:  {}", stats.redirects_skipped);
    eprintln!("Other namespaces:   {}", stats.namespace_skipped);
    eprintln!("Bodies truncated:   {}", stats.bodies_truncated);
    eprintln!("Categories found:   {}", stats.categories_emitted);
    if stats.stopped_early {
        eprintln!("Stopped at record limit");
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // stdout may carry the converted output, so logs go to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Convert(args) => run_convert(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
