// Файл: crates/addrgram_store/src/segjson.rs
use crate::{IndexMeta, IndexReader, IndexWriter, StoreError};
use addrgram::{InvertedIndex, Record};

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub const META_FILE: &str = "meta.json";
pub const GRAMS_FILE: &str = "grams.json";
pub const RECORDS_FILE: &str = "records.jsonl";
pub const VERSION: u32 = 1;

/// JSON-контейнер V1:
/// - grams.json    : { bigram -> [record_id, ...] }, id по возрастанию
/// - records.jsonl : запись по строке, порядок = record_id
/// - meta.json     : IndexMeta
#[derive(Default)]
pub struct JsonIndexWriter;

impl IndexWriter for JsonIndexWriter {
    fn write_index(
        &mut self,
        index: &InvertedIndex,
        records: &[Record],
        out_dir: &Path,
    ) -> Result<IndexMeta> {
        fs::create_dir_all(out_dir)?;

        // grams.json — BTreeMap для детерминированного вывода
        let grams_dump: BTreeMap<&str, Vec<u32>> = index.postings().into_iter().collect();
        let mut gf = BufWriter::new(File::create(out_dir.join(GRAMS_FILE))?);
        serde_json::to_writer(&mut gf, &grams_dump)?;
        gf.flush()?;

        // records.jsonl
        let mut rf = BufWriter::new(File::create(out_dir.join(RECORDS_FILE))?);
        for r in records {
            serde_json::to_writer(&mut rf, r)?;
            rf.write_all(b"\n")?;
        }
        rf.flush()?;

        // meta.json пишем последним: по нему определяется формат
        let meta = IndexMeta {
            version: VERSION,
            record_count: records.len() as u32,
            gram_count: index.gram_count() as u32,
        };
        let mf = File::create(out_dir.join(META_FILE))?;
        serde_json::to_writer_pretty(mf, &meta)?;
        Ok(meta)
    }
}

pub struct JsonIndexReader {
    meta: IndexMeta,
    index: InvertedIndex,
    records: Vec<Record>,
}

impl IndexReader for JsonIndexReader {
    fn open_index(path: &Path) -> Result<Self> {
        if !path.join(META_FILE).is_file() {
            return Err(StoreError::Missing(path.join(META_FILE)).into());
        }
        let meta: IndexMeta = read_json(&path.join(META_FILE))?;
        if meta.version != VERSION {
            return Err(StoreError::VersionMismatch {
                file: META_FILE.into(),
                found: meta.version,
                expected: VERSION,
            }
            .into());
        }

        let grams_map: BTreeMap<String, Vec<u32>> = read_json(&path.join(GRAMS_FILE))?;
        let index = InvertedIndex::from_postings(grams_map);

        let records = read_jsonl::<Record>(&path.join(RECORDS_FILE))?;
        if records.len() != meta.record_count as usize {
            return Err(StoreError::corrupt(
                RECORDS_FILE,
                format!("{} records, meta says {}", records.len(), meta.record_count),
            )
            .into());
        }
        if index.gram_count() != meta.gram_count as usize {
            return Err(StoreError::corrupt(
                GRAMS_FILE,
                format!("{} grams, meta says {}", index.gram_count(), meta.gram_count),
            )
            .into());
        }

        Ok(Self {
            meta,
            index,
            records,
        })
    }

    fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    fn index(&self) -> &InvertedIndex {
        &self.index
    }

    fn records(&self) -> &[Record] {
        &self.records
    }

    fn into_parts(self) -> (InvertedIndex, Vec<Record>) {
        (self.index, self.records)
    }
}

// -------- helpers --------
fn read_json<T: for<'de> serde::Deserialize<'de>>(path: &Path) -> Result<T> {
    let f = File::open(path).map_err(|_| StoreError::Missing(path.to_path_buf()))?;
    serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parse {}", path.display()))
}

fn read_jsonl<T: for<'de> serde::Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let f = File::open(path).map_err(|_| StoreError::Missing(path.to_path_buf()))?;
    let br = BufReader::new(f);
    let mut out = Vec::new();
    for (i, line) in br.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        out.push(
            serde_json::from_str(&line)
                .with_context(|| format!("{}:{}", path.display(), i + 1))?,
        );
    }
    Ok(out)
}
