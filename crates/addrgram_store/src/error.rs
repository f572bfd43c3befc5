use std::path::PathBuf;

/// Ошибки хранилища и ingest. Отличаются от «ноль результатов» поиска.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("index not found: {0}")]
    Missing(PathBuf),
    #[error("{file}: bad magic")]
    BadMagic { file: String },
    #[error("{file}: version {found}, expected {expected}")]
    VersionMismatch {
        file: String,
        found: u32,
        expected: u32,
    },
    #[error("{file}: crc mismatch")]
    CrcMismatch { file: String },
    #[error("{file}: corrupt ({reason})")]
    Corrupt { file: String, reason: String },
    #[error("line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
    #[error("input is not valid {encoding}")]
    Decode { encoding: &'static str },
    #[error("unknown encoding label: {0}")]
    UnknownEncoding(String),
    #[error("unsupported input: {0}")]
    UnsupportedInput(PathBuf),
    #[error("unknown index format: {0}")]
    UnknownFormat(String),
}

impl StoreError {
    pub(crate) fn corrupt(file: &str, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            file: file.to_string(),
            reason: reason.into(),
        }
    }
}
