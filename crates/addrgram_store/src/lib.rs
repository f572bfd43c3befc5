pub mod error;
pub mod ingest;
pub mod segjson;
pub mod v2;

use addrgram::{InvertedIndex, Record};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use error::StoreError;

/// Метаданные сохранённого индекса
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMeta {
    pub version: u32,
    pub record_count: u32,
    pub gram_count: u32,
}

/// Формат контейнера на диске
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// V1: meta.json + grams.json + records.jsonl
    Json,
    /// V2: meta.bin + grams.idx/dat + records.dat, CRC64 в каждом файле
    Bin,
}

impl std::str::FromStr for Format {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" | "v1" => Ok(Format::Json),
            "bin" | "v2" => Ok(Format::Bin),
            other => Err(StoreError::UnknownFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Json => f.write_str("json"),
            Format::Bin => f.write_str("bin"),
        }
    }
}

/// Точки расширения: писатель/читатель контейнера
pub trait IndexWriter {
    fn write_index(
        &mut self,
        index: &InvertedIndex,
        records: &[Record],
        out_dir: &Path,
    ) -> Result<IndexMeta>;
}

pub trait IndexReader {
    fn open_index(path: &Path) -> Result<Self>
    where
        Self: Sized;
    fn meta(&self) -> &IndexMeta;
    fn index(&self) -> &InvertedIndex;
    fn records(&self) -> &[Record];
    fn into_parts(self) -> (InvertedIndex, Vec<Record>)
    where
        Self: Sized;
}

/// Результат `open_any`: формат + содержимое
pub struct LoadedIndex {
    pub format: Format,
    pub meta: IndexMeta,
    pub index: InvertedIndex,
    pub records: Vec<Record>,
}

/// Определить формат по маркерному файлу в каталоге
pub fn detect_format(dir: &Path) -> Result<Format> {
    if dir.join(segjson::META_FILE).is_file() {
        Ok(Format::Json)
    } else if dir.join(v2::writer::META_FILE).is_file() {
        Ok(Format::Bin)
    } else {
        Err(StoreError::Missing(dir.to_path_buf()).into())
    }
}

pub fn open_any(dir: &Path) -> Result<LoadedIndex> {
    let format = detect_format(dir)?;
    let (meta, (index, records)) = match format {
        Format::Json => {
            let r = segjson::JsonIndexReader::open_index(dir)?;
            (r.meta().clone(), r.into_parts())
        }
        Format::Bin => {
            let r = v2::reader::BinIndexReader::open_index(dir)?;
            (r.meta().clone(), r.into_parts())
        }
    };
    tracing::debug!(path = %dir.display(), %format, records = meta.record_count, "index opened");
    Ok(LoadedIndex {
        format,
        meta,
        index,
        records,
    })
}

pub fn write_any(
    format: Format,
    index: &InvertedIndex,
    records: &[Record],
    out_dir: &Path,
) -> Result<IndexMeta> {
    match format {
        Format::Json => segjson::JsonIndexWriter.write_index(index, records, out_dir),
        Format::Bin => v2::writer::BinIndexWriter.write_index(index, records, out_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_aliases() {
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("v2".parse::<Format>().unwrap(), Format::Bin);
        assert!(matches!(
            "xml".parse::<Format>(),
            Err(StoreError::UnknownFormat(_))
        ));
    }

    #[test]
    fn detect_on_empty_dir_is_missing() {
        let td = tempfile::tempdir().unwrap();
        let err = detect_format(td.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Missing(_))
        ));
    }
}
