use crate::index::gram::generate_grams;
use crate::index::inverted::{InvertedIndex, RecordId};
use crate::record::Record;
use croaring::Bitmap;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy)]
pub struct SearchOpts {
    pub limit: usize,
    pub offset: usize,
}

impl Default for SearchOpts {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

/// A ranked match: record position, literal occurrence count and the record.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub id: RecordId,
    pub score: usize,
    pub record: &'a Record,
}

/// Split trailing `--limit N` / `--offset N` off a REPL line.
/// Returns the remaining query text and the options.
pub fn parse_query(s: &str) -> (String, SearchOpts) {
    let mut parts: Vec<&str> = s.split_whitespace().collect();
    let mut opts = SearchOpts::default();
    let mut i = 0;
    while i < parts.len() {
        if parts[i] == "--limit" && i + 1 < parts.len() {
            opts.limit = parts[i + 1].parse().unwrap_or(opts.limit);
            parts.drain(i..=i + 1);
        } else if parts[i] == "--offset" && i + 1 < parts.len() {
            opts.offset = parts[i + 1].parse().unwrap_or(0);
            parts.drain(i..=i + 1);
        } else {
            i += 1;
        }
    }
    (parts.join(" "), opts)
}

/// Count non-overlapping literal occurrences of `needle` in `haystack`.
pub fn occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Ids of records containing every query gram that exists in the index.
///
/// Query grams unknown to the index are dropped instead of emptying the
/// result. `None` means no query gram is known at all.
pub fn candidates(query: &str, index: &InvertedIndex) -> Option<Bitmap> {
    let grams: HashSet<String> = generate_grams(query).into_iter().collect();
    let mut present: Vec<&Bitmap> = grams.iter().filter_map(|g| index.get(g)).collect();
    if present.is_empty() {
        return None;
    }
    // smallest posting first keeps the running intersection small
    present.sort_by_key(|bm| bm.cardinality());
    let mut it = present.into_iter();
    let mut acc = it.next()?.clone();
    for bm in it {
        if acc.is_empty() {
            break;
        }
        acc.and_inplace(bm);
    }
    Some(acc)
}

/// Candidates resolved against `records` and ranked by how often the raw
/// query occurs in each record's assembled text. Equal scores keep corpus
/// order.
pub fn search_hits<'a>(query: &str, index: &InvertedIndex, records: &'a [Record]) -> Vec<Hit<'a>> {
    let Some(ids) = candidates(query, index) else {
        return Vec::new();
    };

    let mut hits: Vec<Hit<'a>> = ids
        .iter()
        .filter_map(|id| {
            let record = records.get(id as usize)?;
            Some(Hit {
                id,
                score: occurrences(record.assembled_text(), query),
                record,
            })
        })
        .collect();

    // stable: ascending ids stay in corpus order among equal scores
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits
}

pub fn search<'a>(query: &str, index: &InvertedIndex, records: &'a [Record]) -> Vec<&'a Record> {
    search_hits(query, index, records)
        .into_iter()
        .map(|h| h.record)
        .collect()
}

pub fn paginate<T>(items: Vec<T>, opts: SearchOpts) -> Vec<T> {
    items.into_iter().skip(opts.offset).take(opts.limit).collect()
}
