pub mod index;
pub mod query;
pub mod record;

pub use index::inverted::{build_inverted_index, build_inverted_index_par, InvertedIndex, RecordId};
pub use index::AddressIndex;
pub use query::{search, search_hits, Hit, SearchOpts};
pub use record::{Field, Record};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_insert_search() {
        let idx = AddressIndex::from_records(vec![Record::new("1500002")
            .with(Field::Prefecture, "東京都")
            .with(Field::City, "渋谷区")]);
        let hits = idx.search("渋谷", SearchOpts::default());
        assert!(!hits.is_empty());
    }
}
