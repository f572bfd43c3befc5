use crate::index::gram::generate_grams;
use crate::record::Record;
use croaring::Bitmap;
use rayon::prelude::*;
use std::collections::HashMap;

/// Positional index of a record in the corpus slice.
pub type RecordId = u32;

/// Gram -> set of record ids whose searchable fields contain it.
#[derive(Clone, Default)]
pub struct InvertedIndex {
    grams: HashMap<String, Bitmap>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every searchable field of `record` under `id`. Grams are produced
    /// per field, so none spans a field boundary.
    pub fn add_record(&mut self, id: RecordId, record: &Record) {
        for (_, value) in record.searchable_fields() {
            for g in generate_grams(value) {
                self.grams.entry(g).or_default().add(id);
            }
        }
    }

    pub fn get(&self, gram: &str) -> Option<&Bitmap> {
        self.grams.get(gram)
    }

    pub fn contains(&self, gram: &str) -> bool {
        self.grams.contains_key(gram)
    }

    pub fn gram_count(&self) -> usize {
        self.grams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grams.is_empty()
    }

    /// Ordered view for persistence: grams sorted, ids ascending.
    pub fn postings(&self) -> Vec<(&str, Vec<RecordId>)> {
        let mut out: Vec<(&str, Vec<RecordId>)> = self
            .grams
            .iter()
            .map(|(g, bm)| (g.as_str(), bm.iter().collect()))
            .collect();
        out.sort_unstable_by(|a, b| a.0.cmp(b.0));
        out
    }

    pub fn from_postings<I, S>(postings: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<RecordId>)>,
        S: Into<String>,
    {
        let mut grams: HashMap<String, Bitmap> = HashMap::new();
        for (g, ids) in postings {
            let bm = grams.entry(g.into()).or_default();
            for id in ids {
                bm.add(id);
            }
        }
        Self { grams }
    }

    fn merge(mut self, other: InvertedIndex) -> Self {
        for (g, bm) in other.grams {
            match self.grams.get_mut(&g) {
                Some(acc) => acc.or_inplace(&bm),
                None => {
                    self.grams.insert(g, bm);
                }
            }
        }
        self
    }
}

impl std::fmt::Debug for InvertedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvertedIndex")
            .field("grams", &self.grams.len())
            .finish()
    }
}

/// Build the index over `records`, using each record's position as its id.
pub fn build_inverted_index(records: &[Record]) -> InvertedIndex {
    let mut idx = InvertedIndex::new();
    for (i, r) in records.iter().enumerate() {
        idx.add_record(i as RecordId, r);
    }
    tracing::info!(records = records.len(), grams = idx.gram_count(), "inverted index built");
    idx
}

/// Same result as [`build_inverted_index`]; gram extraction runs on the rayon
/// pool and partial indexes are unioned afterwards.
pub fn build_inverted_index_par(records: &[Record]) -> InvertedIndex {
    let idx = records
        .par_iter()
        .enumerate()
        .fold(InvertedIndex::new, |mut acc, (i, r)| {
            acc.add_record(i as RecordId, r);
            acc
        })
        .reduce(InvertedIndex::new, InvertedIndex::merge);
    tracing::info!(records = records.len(), grams = idx.gram_count(), "inverted index built (parallel)");
    idx
}
