// Файл: crates/addrctl/src/main.rs
mod config;

use addrgram::query::{paginate, search_hits, SearchOpts};
use addrgram::{build_inverted_index, build_inverted_index_par};
use addrgram_store::ingest::load_records;
use addrgram_store::{open_any, write_any, Format};
use anyhow::Result;
use clap::{Parser, Subcommand};
use config::CtlConfig;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(version, about = "addrgram control: build/search address bigram indexes")]
struct Cli {
    /// JSON-конфиг; без него — переменные окружения ADDRGRAM_*
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Построить индекс из JSONL или CSV
    Build {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, value_enum)]
        format: Option<Format>,
        /// Кодировка CSV (utf-8, shift_jis, euc-jp, ...)
        #[arg(long)]
        encoding: Option<String>,
    },
    /// Поиск по сохранённому индексу
    Search {
        #[arg(long)]
        q: String,
        #[arg(long)]
        index: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long, default_value_t = false)]
        debug_metrics: bool,
    },
    /// Показать метаданные индекса
    Inspect {
        #[arg(long)]
        index: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(p) => CtlConfig::from_file(p)?,
        None => CtlConfig::from_env(),
    };

    match cli.cmd {
        Cmd::Build {
            input,
            out,
            format,
            encoding,
        } => {
            let out = out.unwrap_or_else(|| cfg.index_dir.clone());
            let format = format.unwrap_or(cfg.format);
            let encoding = encoding.unwrap_or_else(|| cfg.encoding.clone());

            let t = Instant::now();
            let records = load_records(&input, &encoding)?;
            tracing::info!(
                input = %input.display(),
                records = records.len(),
                elapsed_ms = t.elapsed().as_millis() as u64,
                "records loaded"
            );

            let t = Instant::now();
            let index = if cfg.parallelism > 1 {
                build_inverted_index_par(&records)
            } else {
                build_inverted_index(&records)
            };
            tracing::info!(elapsed_ms = t.elapsed().as_millis() as u64, "index built");

            let t = Instant::now();
            let meta = write_any(format, &index, &records, &out)?;
            tracing::info!(
                out = %out.display(),
                %format,
                grams = meta.gram_count,
                elapsed_ms = t.elapsed().as_millis() as u64,
                "index written"
            );
        }
        Cmd::Search {
            q,
            index,
            limit,
            offset,
            debug_metrics,
        } => {
            let dir = index.unwrap_or_else(|| cfg.index_dir.clone());
            let opts = SearchOpts {
                limit: limit.unwrap_or(cfg.limit),
                offset,
            };

            let t = Instant::now();
            let loaded = open_any(&dir)?;
            let load_ms = t.elapsed().as_millis() as u64;

            let t = Instant::now();
            let hits = search_hits(&q, &loaded.index, &loaded.records);
            let total = hits.len();
            let search_us = t.elapsed().as_micros() as u64;

            for (rank, h) in paginate(hits, opts).iter().enumerate() {
                println!(
                    "{}\t{}\t{}\t{}",
                    rank + 1 + opts.offset,
                    h.score,
                    h.record.code(),
                    h.record.assembled_text()
                );
            }
            tracing::debug!(query = %q, total, load_ms, search_us, "search done");
            if debug_metrics {
                eprintln!(
                    "records_total={} hits_total={} load_ms={} search_us={}",
                    loaded.records.len(),
                    total,
                    load_ms,
                    search_us
                );
            }
        }
        Cmd::Inspect { index } => {
            let dir = index.unwrap_or_else(|| cfg.index_dir.clone());
            let loaded = open_any(&dir)?;
            let out = serde_json::json!({
                "path": dir.display().to_string(),
                "format": loaded.format,
                "meta": loaded.meta,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
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
