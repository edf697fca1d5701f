use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use seedix_core::io::read_sequences;
use seedix_core::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

mod config;

use config::{Config, Overrides};

#[derive(Parser)]
#[command(name = "seedix")]
#[command(about = "Seedix - partitioned seed index for sequence similarity search")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./seedix.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Worker threads (0 = all cores)
    #[arg(short, long, global = true)]
    threads: Option<usize>,

    /// Spaced seed pattern, e.g. 111010010100110111
    #[arg(long, global = true)]
    shape: Option<String>,

    /// Low seed bits used as partition id
    #[arg(long, global = true)]
    partition_bits: Option<u32>,

    /// Sequence chunks processed by independent build jobs
    #[arg(long, global = true)]
    seq_chunks: Option<usize>,

    /// Partition ranges built one after another into one buffer
    #[arg(long, global = true)]
    index_chunks: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index of a sequence file and report its statistics
    Build {
        /// Input FASTA/FASTQ file (optionally gzipped)
        #[arg(short, long)]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Count seeds shared between query and reference sequences
    Shared {
        /// Query FASTA/FASTQ file
        #[arg(short, long)]
        query: PathBuf,

        /// Reference FASTA/FASTQ file
        #[arg(short, long)]
        reference: PathBuf,

        /// Number of sequence pairs to print
        #[arg(long)]
        top: Option<usize>,

        /// Skip seeds whose query x reference bucket product exceeds this
        #[arg(long, default_value = "4096")]
        max_bucket: usize,
    },

    /// Print the effective configuration, or write it to a file
    Config {
        /// Write the configuration here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(serde::Serialize)]
struct RangeReport {
    range: PartitionRange,
    #[serde(flatten)]
    stats: IndexStats,
    seconds: f64,
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref())?.apply(Overrides {
        threads: cli.threads,
        shape: cli.shape,
        partition_bits: cli.partition_bits,
        seq_chunks: cli.seq_chunks,
        index_chunks: cli.index_chunks,
    })?;

    match cli.command {
        Commands::Build { input, json } => cmd_build(&config, input, json || config.output.json),
        Commands::Shared { query, reference, top, max_bucket } => cmd_shared(
            &config,
            query,
            reference,
            top.unwrap_or(config.output.top),
            max_bucket,
        ),
        Commands::Config { output } => cmd_config(&config, output),
    }
}

fn cmd_config(config: &Config, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            config.save_to_file(&path)?;
            log::info!("Configuration written to {}", path.display());
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}

/// Sequences plus everything needed to build any of their partition ranges
struct Prepared {
    seqs: SequenceSet,
    chunks: Vec<usize>,
    histogram: SeedHistogram,
}

fn prepare(
    path: &Path,
    shape: &SpacedShape,
    config: &Config,
    pool: &rayon::ThreadPool,
) -> Result<Prepared> {
    let seqs = read_sequences(path)
        .with_context(|| format!("Failed to read sequences from {}", path.display()))?;
    log::info!(
        "Loaded {} sequences ({} letters) from {}",
        seqs.len(),
        seqs.letters(),
        path.display()
    );
    let chunks = seqs.partition(config.index.seq_chunks);
    let histogram = SeedHistogram::compute(&seqs, shape, &chunks, pool);
    log::info!("Seed histogram: {} seeds in {} chunks", histogram.total(), histogram.chunk_count());
    Ok(Prepared { seqs, chunks, histogram })
}

fn cmd_build(config: &Config, input: PathBuf, json: bool) -> Result<()> {
    let shape = config.index.shape()?;
    let pool = config.index.thread_pool()?;
    let input = prepare(&input, &shape, config, &pool)?;

    let ranges = config.index.partition_ranges()?;
    let capacity = input.histogram.max_chunk_size(&ranges);
    let mut buffer = SeedBuffer::allocate(capacity).context("Failed to allocate seed buffer")?;
    log::info!("Seed buffer sized for {} entries over {} ranges", capacity, ranges.len());

    let mut reports = Vec::with_capacity(ranges.len());
    for &range in &ranges {
        let timer = Instant::now();
        let index = SortedSeedIndex::build(
            &mut buffer,
            &input.seqs,
            &shape,
            &input.histogram,
            range,
            &input.chunks,
            &pool,
        )?;
        let stats = index.stats();
        reports.push(RangeReport {
            range,
            stats,
            seconds: timer.elapsed().as_secs_f64(),
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("range\tentries\tbuckets\tmax_bucket\tpartitions\tseconds");
        for r in &reports {
            println!(
                "{}..{}\t{}\t{}\t{}\t{}\t{:.3}",
                r.range.begin,
                r.range.end,
                r.stats.entries,
                r.stats.buckets,
                r.stats.max_bucket,
                r.stats.active_partitions,
                r.seconds
            );
        }
    }
    Ok(())
}

fn cmd_shared(
    config: &Config,
    query: PathBuf,
    reference: PathBuf,
    top: usize,
    max_bucket: usize,
) -> Result<()> {
    let shape = config.index.shape()?;
    let pool = config.index.thread_pool()?;
    let query = prepare(&query, &shape, config, &pool)?;
    let reference = prepare(&reference, &shape, config, &pool)?;

    let ranges = config.index.partition_ranges()?;
    let mut query_buffer = SeedBuffer::allocate(query.histogram.max_chunk_size(&ranges))
        .context("Failed to allocate query seed buffer")?;
    let mut reference_buffer = SeedBuffer::allocate(reference.histogram.max_chunk_size(&ranges))
        .context("Failed to allocate reference seed buffer")?;

    let mut pairs: HashMap<(usize, usize), usize> = HashMap::new();
    let mut skipped = 0usize;
    for &range in &ranges {
        let qi = SortedSeedIndex::build(
            &mut query_buffer,
            &query.seqs,
            &shape,
            &query.histogram,
            range,
            &query.chunks,
            &pool,
        )?;
        let ri = SortedSeedIndex::build(
            &mut reference_buffer,
            &reference.seqs,
            &shape,
            &reference.histogram,
            range,
            &reference.chunks,
            &pool,
        )?;

        let (local, local_skipped) = pool.install(|| {
            range
                .iter()
                .into_par_iter()
                .map(|p| count_shared(&qi, &ri, p, &query.seqs, &reference.seqs, max_bucket))
                .reduce(
                    || (HashMap::new(), 0),
                    |(mut a, sa), (b, sb)| {
                        for (k, v) in b {
                            *a.entry(k).or_insert(0) += v;
                        }
                        (a, sa + sb)
                    },
                )
        });
        for (k, v) in local {
            *pairs.entry(k).or_insert(0) += v;
        }
        skipped += local_skipped;
        log::debug!("Merged partitions {}..{}", range.begin, range.end);
    }

    if skipped > 0 {
        log::info!("Skipped {} seeds with bucket product above {}", skipped, max_bucket);
    }
    let mut ranked: Vec<((usize, usize), usize)> = pairs.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    log::info!("{} sequence pairs share at least one seed", ranked.len());

    println!("query\treference\tshared_seeds");
    for ((q, r), n) in ranked.into_iter().take(top) {
        println!("{}\t{}\t{}", query.seqs.id(q), reference.seqs.id(r), n);
    }
    Ok(())
}

/// Merge one partition of both indices and count seed hits per sequence pair
fn count_shared(
    qi: &SortedSeedIndex<'_>,
    ri: &SortedSeedIndex<'_>,
    partition: usize,
    query: &SequenceSet,
    reference: &SequenceSet,
    max_bucket: usize,
) -> (HashMap<(usize, usize), usize>, usize) {
    let mut counts = HashMap::new();
    let mut skipped = 0;
    for (left, right) in MergeIter::new(qi.grouped(partition), ri.grouped(partition)) {
        if left.len() * right.len() > max_bucket {
            skipped += 1;
            continue;
        }
        for q in left.locations() {
            let (qs, _) = query.local_position(q);
            for r in right.locations() {
                let (rs, _) = reference.local_position(r);
                *counts.entry((qs, rs)).or_insert(0) += 1;
            }
        }
    }
    (counts, skipped)
}
