// crates/addrgram_store/src/v2/reader.rs
use addrgram::{Field, InvertedIndex, Record};
use anyhow::Result;
use memmap2::Mmap;
use std::{fs::File, path::Path};

use super::codec::Slice;
use super::crc::crc64_ecma;
use super::types::{MetaHeader, GRAMS_IDX_MAGIC, RECORDS_MAGIC};
use super::writer::{GRAMS_DAT_FILE, GRAMS_IDX_FILE, META_FILE, RECORDS_DAT_FILE};
use crate::{IndexMeta, IndexReader, StoreError};

/// Читает V2 целиком в память: индекс и записи нужны поиску полностью.
pub struct BinIndexReader {
    header: MetaHeader,
    meta: IndexMeta,
    index: InvertedIndex,
    records: Vec<Record>,
}

impl BinIndexReader {
    pub fn header(&self) -> &MetaHeader {
        &self.header
    }
}

impl IndexReader for BinIndexReader {
    fn open_index(path: &Path) -> Result<Self> {
        let meta_m = mmap_with_crc(path, META_FILE)?;
        let header = MetaHeader::decode(body(&meta_m))?;

        let idx_m = mmap_with_crc(path, GRAMS_IDX_FILE)?;
        let dat_m = mmap_with_crc(path, GRAMS_DAT_FILE)?;
        let rec_m = mmap_with_crc(path, RECORDS_DAT_FILE)?;

        for (file, got, want) in [
            (GRAMS_IDX_FILE, body(&idx_m).len(), header.grams_idx_len),
            (GRAMS_DAT_FILE, body(&dat_m).len(), header.grams_dat_len),
            (RECORDS_DAT_FILE, body(&rec_m).len(), header.records_dat_len),
        ] {
            if got as u64 != want {
                return Err(StoreError::corrupt(file, "length differs from meta.bin").into());
            }
        }

        let index = parse_grams(body(&idx_m), body(&dat_m), header.gram_count)?;
        let records = parse_records(body(&rec_m), header.record_count)?;

        let meta = IndexMeta {
            version: header.version as u32,
            record_count: records.len() as u32,
            gram_count: index.gram_count() as u32,
        };
        Ok(Self {
            header,
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

fn body(m: &Mmap) -> &[u8] {
    &m[..m.len() - 8]
}

/// mmap файла и проверка CRC64 футера
fn mmap_with_crc(dir: &Path, name: &str) -> Result<Mmap> {
    let p = dir.join(name);
    let f = File::open(&p).map_err(|_| StoreError::Missing(p.clone()))?;
    let m = unsafe { Mmap::map(&f)? };
    if m.len() < 8 {
        return Err(StoreError::corrupt(name, "file too small").into());
    }
    let (data, footer) = m.split_at(m.len() - 8);
    let mut crc = [0u8; 8];
    crc.copy_from_slice(footer);
    if crc64_ecma(data) != u64::from_le_bytes(crc) {
        return Err(StoreError::CrcMismatch {
            file: name.to_string(),
        }
        .into());
    }
    Ok(m)
}

fn parse_grams(idx: &[u8], dat: &[u8], expected: u64) -> Result<InvertedIndex, StoreError> {
    let mut s = Slice::new(idx, GRAMS_IDX_FILE);
    if s.u32_le()? != GRAMS_IDX_MAGIC {
        return Err(StoreError::BadMagic {
            file: GRAMS_IDX_FILE.into(),
        });
    }
    let _version = s.u16_le()?;
    let _flags = s.u16_le()?;
    let count = s.u32_le()? as u64;
    if count != expected {
        return Err(StoreError::corrupt(GRAMS_IDX_FILE, "gram count differs from meta.bin"));
    }

    // каждая запись idx занимает хотя бы 3 байта, больше count — заведомо битый файл
    let mut postings: Vec<(String, Vec<u32>)> =
        Vec::with_capacity((count as usize).min(s.remaining() / 3));
    for _ in 0..count {
        let gram = s.str()?;
        let off = s.varint()? as usize;
        let len = s.varint()? as usize;
        let end = off
            .checked_add(len)
            .filter(|&e| e <= dat.len())
            .ok_or_else(|| StoreError::corrupt(GRAMS_DAT_FILE, "posting out of range"))?;

        let mut p = Slice::new(&dat[off..end], GRAMS_DAT_FILE);
        let n = p.varint()? as usize;
        let mut ids = Vec::with_capacity(n.min(p.remaining()));
        let mut prev = 0u64;
        for i in 0..n {
            let v = p.varint()?;
            let id = if i == 0 { v } else { prev + v };
            if id > u32::MAX as u64 {
                return Err(StoreError::corrupt(GRAMS_DAT_FILE, "record id overflow"));
            }
            ids.push(id as u32);
            prev = id;
        }
        postings.push((gram.to_string(), ids));
    }
    if s.remaining() != 0 {
        return Err(StoreError::corrupt(GRAMS_IDX_FILE, "trailing bytes"));
    }
    Ok(InvertedIndex::from_postings(postings))
}

fn parse_records(buf: &[u8], expected: u64) -> Result<Vec<Record>, StoreError> {
    let mut s = Slice::new(buf, RECORDS_DAT_FILE);
    if s.bytes(8)? != RECORDS_MAGIC {
        return Err(StoreError::BadMagic {
            file: RECORDS_DAT_FILE.into(),
        });
    }
    let count = s.u64_le()?;
    if count != expected {
        return Err(StoreError::corrupt(RECORDS_DAT_FILE, "record count differs from meta.bin"));
    }
    let mut offsets = Vec::with_capacity((count as usize).saturating_add(1).min(s.remaining() / 8));
    for _ in 0..=count {
        offsets.push(s.u64_le()? as usize);
    }
    let payload = s.bytes(s.remaining())?;
    if offsets.last().copied() != Some(payload.len()) {
        return Err(StoreError::corrupt(RECORDS_DAT_FILE, "guard offset mismatch"));
    }

    let mut out = Vec::with_capacity(offsets.len() - 1);
    for w in offsets.windows(2) {
        let (from, to) = (w[0], w[1]);
        if from > to || to > payload.len() {
            return Err(StoreError::corrupt(RECORDS_DAT_FILE, "offsets not monotonic"));
        }
        let mut rs = Slice::new(&payload[from..to], RECORDS_DAT_FILE);
        let mut r = Record::new(rs.str()?);
        for field in Field::ALL {
            let v = rs.str()?;
            if !v.is_empty() {
                r = r.with(field, v);
            }
        }
        out.push(r);
    }
    Ok(out)
}
