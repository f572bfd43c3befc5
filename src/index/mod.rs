pub mod gram;
pub mod inverted;
pub mod normalizer;

use crate::query::{paginate, search_hits, Hit, SearchOpts};
use crate::record::Record;
use inverted::{build_inverted_index, build_inverted_index_par, InvertedIndex};

/// Records together with the index built over them.
pub struct AddressIndex {
    inv: InvertedIndex,   // gram -> bitmap(record ids)
    records: Vec<Record>, // id = position
}

impl AddressIndex {
    pub fn from_records(records: Vec<Record>) -> Self {
        let inv = build_inverted_index(&records);
        Self { inv, records }
    }

    pub fn from_records_par(records: Vec<Record>) -> Self {
        let inv = build_inverted_index_par(&records);
        Self { inv, records }
    }

    /// Pair an already loaded index with its records.
    pub fn from_parts(inv: InvertedIndex, records: Vec<Record>) -> Self {
        Self { inv, records }
    }

    pub fn inverted(&self) -> &InvertedIndex {
        &self.inv
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn search(&self, query: &str, opts: SearchOpts) -> Vec<Hit<'_>> {
        paginate(search_hits(query, &self.inv, &self.records), opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    #[test]
    fn search_is_paginated() {
        let records = (0..5)
            .map(|i| {
                Record::new(format!("{i}"))
                    .with(Field::Prefecture, "北海道")
                    .with(Field::City, "札幌市")
            })
            .collect();
        let idx = AddressIndex::from_records(records);
        let page = idx.search("札幌", SearchOpts { limit: 2, offset: 1 });
        let ids: Vec<u32> = page.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
