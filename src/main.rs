use addrgram::query::parse_query;
use addrgram::{AddressIndex, Record};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Ingest a JSONL file of address rows into an in-memory index; optional REPL to query
    Ingest {
        path: String,
        /// Start interactive REPL after ingest
        #[arg(long)]
        repl: bool,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Ingest { path, repl } => run_ingest(path, repl)?,
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_ingest(path: String, repl: bool) -> anyhow::Result<()> {
    let f = File::open(&path)?;
    let br = BufReader::new(f);

    let started = Instant::now();
    let mut records = Vec::new();
    for line in br.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let r: Record = serde_json::from_str(&line)?;
        records.push(r);
    }
    let idx = AddressIndex::from_records_par(records);
    tracing::info!(
        records = idx.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "ingested"
    );

    if repl {
        use std::io::{stdin, stdout, Write};
        let mut input = String::new();
        loop {
            input.clear();
            print!("query> ");
            stdout().flush().ok();
            if stdin().read_line(&mut input).is_err() {
                break;
            }
            let s = input.trim();
            if s.is_empty() || s == ":q" || s == ":quit" {
                break;
            }

            let (q, opts) = parse_query(s);
            let started = Instant::now();
            let hits = idx.search(&q, opts);
            tracing::debug!(elapsed_us = started.elapsed().as_micros() as u64, "query done");
            for (rank, h) in hits.iter().enumerate() {
                println!(
                    "{}\t{}\t{}\t{}",
                    rank + 1 + opts.offset,
                    h.score,
                    h.record.code(),
                    h.record.assembled_text()
                );
            }
        }
    }

    Ok(())
}
