// crates/addrgram_store/src/v2/writer.rs
use addrgram::{InvertedIndex, Record};
use anyhow::Result;
use std::{fs::File, io::Write, path::Path};

use super::codec::{put_str, put_varint};
use super::crc::crc64_ecma;
use super::types::{MetaHeader, GRAMS_IDX_MAGIC, RECORDS_MAGIC};
use crate::{IndexMeta, IndexWriter};

pub const META_FILE: &str = "meta.bin";
pub const GRAMS_IDX_FILE: &str = "grams.idx";
pub const GRAMS_DAT_FILE: &str = "grams.dat";
pub const RECORDS_DAT_FILE: &str = "records.dat";

#[derive(Default)]
pub struct BinIndexWriter;

impl IndexWriter for BinIndexWriter {
    fn write_index(
        &mut self,
        index: &InvertedIndex,
        records: &[Record],
        out_dir: &Path,
    ) -> Result<IndexMeta> {
        std::fs::create_dir_all(out_dir)?;

        // --- grams.dat: [varint n][varint first][varint delta...] подряд ---
        // --- grams.idx: header + [str gram][varint off][varint len] по возрастанию ключа ---
        let postings = index.postings();
        let mut grams_dat = Vec::new();
        let mut grams_idx = Vec::new();
        grams_idx.extend_from_slice(&GRAMS_IDX_MAGIC.to_le_bytes());
        grams_idx.extend_from_slice(&1u16.to_le_bytes()); // version
        grams_idx.extend_from_slice(&0u16.to_le_bytes()); // flags
        grams_idx.extend_from_slice(&(postings.len() as u32).to_le_bytes());

        for (gram, ids) in &postings {
            let offset = grams_dat.len() as u64;
            put_varint(ids.len() as u64, &mut grams_dat);
            let mut prev = 0u32;
            for (i, &id) in ids.iter().enumerate() {
                // первый id целиком, дальше дельты (ids отсортированы)
                let v = if i == 0 { id } else { id - prev };
                put_varint(v as u64, &mut grams_dat);
                prev = id;
            }
            put_str(gram, &mut grams_idx);
            put_varint(offset, &mut grams_idx);
            put_varint(grams_dat.len() as u64 - offset, &mut grams_idx);
        }

        // --- records.dat: magic, count, offsets[count+1], payload ---
        let mut payload = Vec::new();
        let mut rel_offsets: Vec<u64> = Vec::with_capacity(records.len() + 1);
        for r in records {
            rel_offsets.push(payload.len() as u64);
            put_str(r.code(), &mut payload);
            for field in addrgram::Field::ALL {
                put_str(r.field(field), &mut payload);
            }
        }
        rel_offsets.push(payload.len() as u64); // guard

        let mut records_dat = Vec::with_capacity(16 + rel_offsets.len() * 8 + payload.len());
        records_dat.extend_from_slice(RECORDS_MAGIC);
        records_dat.extend_from_slice(&(records.len() as u64).to_le_bytes());
        for o in &rel_offsets {
            records_dat.extend_from_slice(&o.to_le_bytes());
        }
        records_dat.extend_from_slice(&payload);

        write_with_crc64(&out_dir.join(GRAMS_DAT_FILE), &grams_dat)?;
        write_with_crc64(&out_dir.join(GRAMS_IDX_FILE), &grams_idx)?;
        write_with_crc64(&out_dir.join(RECORDS_DAT_FILE), &records_dat)?;

        // meta.bin последним
        let hdr = MetaHeader {
            record_count: records.len() as u64,
            gram_count: postings.len() as u64,
            grams_idx_len: grams_idx.len() as u64,
            grams_dat_len: grams_dat.len() as u64,
            records_dat_len: records_dat.len() as u64,
            ..MetaHeader::default()
        };
        write_with_crc64(&out_dir.join(META_FILE), &hdr.encode())?;

        tracing::debug!(
            grams_dat = grams_dat.len(),
            records_dat = records_dat.len(),
            "v2 index written"
        );
        Ok(IndexMeta {
            version: hdr.version as u32,
            record_count: records.len() as u32,
            gram_count: postings.len() as u32,
        })
    }
}

// --- helpers ---

/// Тело + CRC64 футер по телу
fn write_with_crc64(path: &Path, body: &[u8]) -> Result<()> {
    let mut f = File::create(path)?;
    f.write_all(body)?;
    f.write_all(&crc64_ecma(body).to_le_bytes())?;
    f.sync_all()?;
    Ok(())
}
