// path: crates/addrctl/src/config.rs
use addrgram_store::Format;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct CtlConfig {
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,
    #[serde(default = "default_format")]
    pub format: Format,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_index_dir() -> PathBuf {
    index_dir_for_env("dev")
}
fn default_format() -> Format {
    Format::Bin
}
fn default_encoding() -> String {
    "utf-8".into()
}
fn default_parallelism() -> usize {
    4
}
fn default_limit() -> usize {
    20
}

/// Каталог индекса по умолчанию для окружения ADDRGRAM_ENV
pub fn index_dir_for_env(env: &str) -> PathBuf {
    match env {
        "prod" | "production" => PathBuf::from("data/prod/index"),
        "test" => PathBuf::from("target/addrgram-test/index"),
        _ => PathBuf::from("data/dev/index"),
    }
}

impl Default for CtlConfig {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
            format: default_format(),
            encoding: default_encoding(),
            parallelism: default_parallelism(),
            limit: default_limit(),
        }
    }
}

impl CtlConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Источник переменных подставляется снаружи, чтобы тесты не трогали env процесса
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let env = get("ADDRGRAM_ENV").unwrap_or_else(|| "dev".into());
        let index_dir = get("ADDRGRAM_INDEX_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| index_dir_for_env(&env));
        let format = get("ADDRGRAM_FORMAT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(default_format());
        let encoding = get("ADDRGRAM_ENCODING").unwrap_or_else(default_encoding);
        let parallelism = get("ADDRGRAM_PARALLELISM")
            .and_then(|s| s.parse().ok())
            .unwrap_or(default_parallelism());
        let limit = get("ADDRGRAM_LIMIT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(default_limit());

        Self {
            index_dir,
            format,
            encoding,
            parallelism,
            limit,
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let f = std::fs::File::open(path)
            .with_context(|| format!("open config {}", path.display()))?;
        serde_json::from_reader(f).with_context(|| format!("parse config {}", path.display()))
    }
}
