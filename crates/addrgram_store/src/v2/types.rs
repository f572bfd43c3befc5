use super::codec::Slice;
use crate::StoreError;

pub const META_MAGIC: u32 = 0x5849_4741; // "AGIX"
pub const META_VERSION: u16 = 2;
pub const META_HEADER_LEN: u16 = 48;

pub const GRAMS_IDX_MAGIC: u32 = 0x4947_4741; // "AGGI"
pub const RECORDS_MAGIC: &[u8; 8] = b"AGRECS2\0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaHeader {
    pub magic: u32,
    pub version: u16,
    pub header_len: u16,
    pub record_count: u64,
    pub gram_count: u64,
    pub grams_idx_len: u64,
    pub grams_dat_len: u64,
    pub records_dat_len: u64,
}

impl Default for MetaHeader {
    fn default() -> Self {
        Self {
            magic: META_MAGIC,
            version: META_VERSION,
            header_len: META_HEADER_LEN,
            record_count: 0,
            gram_count: 0,
            grams_idx_len: 0,
            grams_dat_len: 0,
            records_dat_len: 0,
        }
    }
}

impl MetaHeader {
    /// Ровно META_HEADER_LEN байт, little-endian
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(META_HEADER_LEN as usize);
        buf.extend_from_slice(&self.magic.to_le_bytes());
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(&self.header_len.to_le_bytes());
        buf.extend_from_slice(&self.record_count.to_le_bytes());
        buf.extend_from_slice(&self.gram_count.to_le_bytes());
        buf.extend_from_slice(&self.grams_idx_len.to_le_bytes());
        buf.extend_from_slice(&self.grams_dat_len.to_le_bytes());
        buf.extend_from_slice(&self.records_dat_len.to_le_bytes());
        buf.resize(META_HEADER_LEN as usize, 0);
        buf
    }

    pub fn decode(body: &[u8]) -> Result<Self, StoreError> {
        let mut s = Slice::new(body, "meta.bin");
        let magic = s.u32_le()?;
        if magic != META_MAGIC {
            return Err(StoreError::BadMagic {
                file: "meta.bin".into(),
            });
        }
        let version = s.u16_le()?;
        if version != META_VERSION {
            return Err(StoreError::VersionMismatch {
                file: "meta.bin".into(),
                found: version as u32,
                expected: META_VERSION as u32,
            });
        }
        Ok(Self {
            magic,
            version,
            header_len: s.u16_le()?,
            record_count: s.u64_le()?,
            gram_count: s.u64_le()?,
            grams_idx_len: s.u64_le()?,
            grams_dat_len: s.u64_le()?,
            records_dat_len: s.u64_le()?,
        })
    }
}
